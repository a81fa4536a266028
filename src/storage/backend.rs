use super::{
    Address, DataMap, FileHost, HostBackend, LocalBackend, SqliteStore, StorageBackend,
};
use crate::config::Config;
use crate::errors::AppResult;
use serde_json::Value;

/// The backend picked for this process: host session when one is configured,
/// the local SQLite store otherwise.
#[derive(Debug)]
pub enum AnyBackend {
    Host(HostBackend<FileHost>),
    Local(LocalBackend<SqliteStore>),
}

impl AnyBackend {
    pub fn select(cfg: &Config) -> AppResult<Self> {
        match &cfg.host_dir {
            Some(dir) => {
                log::debug!("Using host session in {dir}");
                Ok(AnyBackend::Host(HostBackend::new(FileHost::new(dir))))
            }
            None => {
                log::debug!("Using local storage in {}", cfg.database);
                let store = SqliteStore::open(&cfg.database)?;
                Ok(AnyBackend::Local(LocalBackend::new(
                    store,
                    &cfg.storage_prefix,
                )))
            }
        }
    }
}

impl StorageBackend for AnyBackend {
    fn name(&self) -> &'static str {
        match self {
            AnyBackend::Host(b) => b.name(),
            AnyBackend::Local(b) => b.name(),
        }
    }

    async fn get(&self, address: &Address) -> AppResult<Option<Value>> {
        match self {
            AnyBackend::Host(b) => b.get(address).await,
            AnyBackend::Local(b) => b.get(address).await,
        }
    }

    async fn get_all(&self) -> AppResult<DataMap> {
        match self {
            AnyBackend::Host(b) => b.get_all().await,
            AnyBackend::Local(b) => b.get_all().await,
        }
    }

    async fn set(&self, address: &Address, value: &Value) -> AppResult<()> {
        match self {
            AnyBackend::Host(b) => b.set(address, value).await,
            AnyBackend::Local(b) => b.set(address, value).await,
        }
    }

    async fn remove(&self, address: &Address) -> AppResult<()> {
        match self {
            AnyBackend::Host(b) => b.remove(address).await,
            AnyBackend::Local(b) => b.remove(address).await,
        }
    }
}
