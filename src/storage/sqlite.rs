//! SQLite-backed [`LocalStore`]: the `local_storage` table of the app database.

use super::local::LocalStore;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;

#[derive(Debug)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Open the database at `path`, running pending migrations.
    pub fn open(path: &str) -> AppResult<Self> {
        Self::from_pool(DbPool::new(path)?)
    }

    pub fn in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::in_memory()?)
    }

    fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }
}

impl LocalStore for SqliteStore {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(queries::get_item(&self.pool.conn, key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        Ok(queries::set_item(&self.pool.conn, key, value)?)
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        Ok(queries::remove_item(&self.pool.conn, key)?)
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        Ok(queries::list_keys(&self.pool.conn)?)
    }
}
