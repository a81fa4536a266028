use super::{Address, DataMap, Scope, StorageBackend, Visibility, filter_data};
use crate::core::context::Context;
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

/// The storage adapter used by the rest of the crate.
///
/// - symbolic scopes are resolved against the acting [`Context`];
/// - host outages degrade: reads return the default, writes are dropped;
/// - values over the host's size limit fail with
///   [`AppError::CapacityExceeded`], they are never written elsewhere;
/// - after every successful `set`/`remove` the "all data" snapshot is reloaded
///   and published to subscribers. Snapshots are immutable.
pub struct Storage<B: StorageBackend> {
    backend: B,
    context: Context,
    snapshot: watch::Sender<Arc<DataMap>>,
}

impl<B: StorageBackend> Storage<B> {
    pub fn new(backend: B, context: Context) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(DataMap::new()));
        Self {
            backend,
            context,
            snapshot,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Concrete scope id for `scope` in the current context.
    pub fn resolve(&self, scope: &Scope) -> AppResult<String> {
        Ok(match scope {
            Scope::Card => self.context.require_card()?.to_string(),
            Scope::Member => self.context.member.clone(),
            Scope::Board => "board".to_string(),
            Scope::Organization => "organization".to_string(),
            Scope::Id(id) => id.clone(),
        })
    }

    fn address(&self, scope: &Scope, visibility: Visibility, key: &str) -> AppResult<Address> {
        Ok(Address::new(self.resolve(scope)?, visibility, key))
    }

    async fn fetch(&self, address: &Address) -> AppResult<Option<Value>> {
        match self.backend.get(address).await {
            Err(AppError::BackendUnavailable(msg)) => {
                log::warn!("Reading {address} from {} failed: {msg}", self.backend.name());
                Ok(None)
            }
            other => other,
        }
    }

    /// Stored value, or `default` when absent or unreadable.
    pub async fn get_value(
        &self,
        scope: &Scope,
        visibility: Visibility,
        key: &str,
        default: Value,
    ) -> AppResult<Value> {
        let address = self.address(scope, visibility, key)?;
        Ok(self.fetch(&address).await?.unwrap_or(default))
    }

    /// Typed read. A value of the wrong shape is logged and treated as absent.
    pub async fn get<T: DeserializeOwned>(
        &self,
        scope: &Scope,
        visibility: Visibility,
        key: &str,
    ) -> AppResult<Option<T>> {
        let address = self.address(scope, visibility, key)?;
        let Some(value) = self.fetch(&address).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(typed) => Ok(Some(typed)),
            Err(e) => {
                log::warn!("Ignoring malformed record {address}: {e}");
                Ok(None)
            }
        }
    }

    /// All stored data, optionally narrowed to one scope, one visibility
    /// and/or keys accepted by `predicate`. The result is a fresh map.
    pub async fn get_all(
        &self,
        scope: Option<&Scope>,
        visibility: Option<Visibility>,
        predicate: Option<&dyn Fn(&str) -> bool>,
    ) -> AppResult<DataMap> {
        let scope = scope.map(|s| self.resolve(s)).transpose()?;
        let data = match self.backend.get_all().await {
            Ok(data) => data,
            Err(AppError::BackendUnavailable(msg)) => {
                log::warn!("Listing {} data failed: {msg}", self.backend.name());
                DataMap::new()
            }
            Err(e) => return Err(e),
        };
        Ok(filter_data(&data, scope.as_deref(), visibility, predicate))
    }

    pub async fn set<T: Serialize + ?Sized>(
        &self,
        scope: &Scope,
        visibility: Visibility,
        key: &str,
        value: &T,
    ) -> AppResult<()> {
        let value = serde_json::to_value(value)?;
        self.set_value(scope, visibility, key, &value).await
    }

    pub async fn set_value(
        &self,
        scope: &Scope,
        visibility: Visibility,
        key: &str,
        value: &Value,
    ) -> AppResult<()> {
        let address = self.address(scope, visibility, key)?;
        match self.backend.set(&address, value).await {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(AppError::BackendUnavailable(msg)) => {
                log::error!("Writing {address} to {} failed: {msg}", self.backend.name());
                Ok(())
            }
            Err(e @ AppError::CapacityExceeded { .. }) => {
                log::warn!("Not stored: {e}");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a value; a missing key is fine.
    pub async fn remove(&self, scope: &Scope, visibility: Visibility, key: &str) -> AppResult<()> {
        let address = self.address(scope, visibility, key)?;
        match self.backend.remove(&address).await {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(AppError::BackendUnavailable(msg)) => {
                log::error!("Removing {address} from {} failed: {msg}", self.backend.name());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Reload the "all data" snapshot from the backend.
    pub async fn refresh(&self) {
        match self.backend.get_all().await {
            Ok(data) => {
                self.snapshot.send_replace(Arc::new(data));
            }
            Err(e) => log::warn!("Keeping stale data snapshot: {e}"),
        }
    }

    /// Last published snapshot of all stored data.
    pub fn snapshot(&self) -> Arc<DataMap> {
        self.snapshot.borrow().clone()
    }

    /// Change feed: receivers wake up whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DataMap>> {
        self.snapshot.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{HostBackend, LocalBackend, MemoryHost, MemoryLocalStore};
    use serde_json::json;

    fn ctx() -> Context {
        Context::new("m1").with_card("c1")
    }

    #[tokio::test]
    async fn symbolic_scopes_resolve_to_context_ids() {
        let storage = Storage::new(LocalBackend::new(MemoryLocalStore::new(), "app"), ctx());
        storage
            .set(&Scope::Card, Visibility::Shared, "k", &json!(1))
            .await
            .unwrap();
        storage
            .set(&Scope::Member, Visibility::Private, "k", &json!(2))
            .await
            .unwrap();

        let all = storage.get_all(None, None, None).await.unwrap();
        assert_eq!(all["c1"]["shared"]["k"], json!(1));
        assert_eq!(all["m1"]["private"]["k"], json!(2));
        assert_eq!(
            storage
                .get_value(&Scope::id("c1"), Visibility::Shared, "k", json!(0))
                .await
                .unwrap(),
            json!(1)
        );
    }

    #[tokio::test]
    async fn card_scope_without_card_is_missing_context() {
        let storage = Storage::new(
            LocalBackend::new(MemoryLocalStore::new(), "app"),
            Context::new("m1"),
        );
        let err = storage
            .set(&Scope::Card, Visibility::Shared, "k", &json!(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingContext(_)));
    }

    #[tokio::test]
    async fn offline_host_degrades_to_defaults_and_noops() {
        let host = MemoryHost::new();
        let storage = Storage::new(HostBackend::new(host.clone()), ctx());
        storage
            .set(&Scope::Card, Visibility::Shared, "k", &json!("kept"))
            .await
            .unwrap();

        host.set_offline(true);
        assert_eq!(
            storage
                .get_value(&Scope::Card, Visibility::Shared, "k", json!("default"))
                .await
                .unwrap(),
            json!("default")
        );
        storage
            .set(&Scope::Card, Visibility::Shared, "k", &json!("lost"))
            .await
            .unwrap();
        storage
            .remove(&Scope::Card, Visibility::Shared, "k")
            .await
            .unwrap();
        assert!(storage.get_all(None, None, None).await.unwrap().is_empty());

        host.set_offline(false);
        assert_eq!(
            storage
                .get_value(&Scope::Card, Visibility::Shared, "k", json!(null))
                .await
                .unwrap(),
            json!("kept")
        );
    }

    #[tokio::test]
    async fn only_mutations_publish_snapshots() {
        let storage = Storage::new(HostBackend::new(MemoryHost::new()), ctx());
        let mut changes = storage.subscribe();
        assert!(storage.snapshot().is_empty());

        storage
            .set(&Scope::Card, Visibility::Shared, "a", &json!(1))
            .await
            .unwrap();
        assert!(changes.has_changed().unwrap());
        let first = changes.borrow_and_update().clone();
        assert_eq!(first["c1"]["shared"]["a"], json!(1));

        storage
            .get_all(Some(&Scope::Card), None, None)
            .await
            .unwrap();
        storage
            .get_value(&Scope::Card, Visibility::Shared, "a", json!(null))
            .await
            .unwrap();
        assert!(!changes.has_changed().unwrap());

        storage
            .remove(&Scope::Card, Visibility::Shared, "a")
            .await
            .unwrap();
        assert!(storage.snapshot().is_empty());
        assert_eq!(first["c1"]["shared"]["a"], json!(1));
    }

    #[tokio::test]
    async fn malformed_typed_record_reads_as_none() {
        #[derive(serde::Deserialize, Debug)]
        struct Pointer {
            #[allow(dead_code)]
            track: String,
        }

        let storage = Storage::new(HostBackend::new(MemoryHost::new()), ctx());
        storage
            .set(&Scope::Member, Visibility::Shared, "p", &json!([1, 2, 3]))
            .await
            .unwrap();
        let read: Option<Pointer> = storage
            .get(&Scope::Member, Visibility::Shared, "p")
            .await
            .unwrap();
        assert!(read.is_none());
    }
}
