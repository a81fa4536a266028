//! # Host session backend
//!
//! The host platform exposes its own key/value API. [`HostSession`] is that
//! API as the crate sees it; [`HostBackend`] adapts any session to
//! [`StorageBackend`] and translates host failures into the crate's error
//! kinds.
//!
//! The host rejects values whose serialized form is longer than
//! [`HOST_VALUE_LIMIT`] characters. The only way to tell that failure apart
//! from an outage is the text of the error message, so the backend looks for
//! [`LENGTH_LIMIT_MESSAGE`] in it.

use super::{Address, DataMap, StorageBackend, insert_entry, lookup, remove_entry};
use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Maximum serialized length of a single value accepted by the host.
pub const HOST_VALUE_LIMIT: usize = 4096;

/// Message fragment the host uses when a value is too long.
pub const LENGTH_LIMIT_MESSAGE: &str = "PluginData length of 4096 characters exceeded";

/// Error raised by a host session. Hosts only give us a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn length_exceeded() -> Self {
        Self::new(format!(
            "{LENGTH_LIMIT_MESSAGE}. Store less data or split it over several keys."
        ))
    }

    pub fn is_length_limit(&self) -> bool {
        self.message.contains(LENGTH_LIMIT_MESSAGE)
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HostError {}

/// The host platform's key/value API.
pub trait HostSession {
    fn get(&self, address: &Address) -> impl Future<Output = Result<Option<Value>, HostError>>;

    fn get_all(&self) -> impl Future<Output = Result<DataMap, HostError>>;

    fn set(&self, address: &Address, value: &Value) -> impl Future<Output = Result<(), HostError>>;

    fn remove(&self, address: &Address) -> impl Future<Output = Result<(), HostError>>;
}

/// Length of a value the way the host measures it.
pub fn serialized_len(value: &Value) -> usize {
    value.to_string().chars().count()
}

/// [`StorageBackend`] over a host session.
#[derive(Debug, Clone)]
pub struct HostBackend<H: HostSession> {
    session: H,
}

impl<H: HostSession> HostBackend<H> {
    pub fn new(session: H) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &H {
        &self.session
    }
}

fn unavailable(e: HostError) -> AppError {
    AppError::BackendUnavailable(e.message)
}

impl<H: HostSession> StorageBackend for HostBackend<H> {
    fn name(&self) -> &'static str {
        "host"
    }

    async fn get(&self, address: &Address) -> AppResult<Option<Value>> {
        self.session.get(address).await.map_err(unavailable)
    }

    async fn get_all(&self) -> AppResult<DataMap> {
        self.session.get_all().await.map_err(unavailable)
    }

    async fn set(&self, address: &Address, value: &Value) -> AppResult<()> {
        match self.session.set(address, value).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_length_limit() => Err(AppError::CapacityExceeded {
                key: address.key.clone(),
                len: serialized_len(value),
                limit: HOST_VALUE_LIMIT,
            }),
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn remove(&self, address: &Address) -> AppResult<()> {
        self.session.remove(address).await.map_err(unavailable)
    }
}

/// In-process host. Clones share the same data, so several sessions (for
/// example two members) can work against one host.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    data: Rc<RefCell<DataMap>>,
    offline: Rc<Cell<bool>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails like an unreachable host would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    fn check_online(&self) -> Result<(), HostError> {
        if self.offline.get() {
            return Err(HostError::new("Host session is not reachable"));
        }
        Ok(())
    }
}

impl HostSession for MemoryHost {
    async fn get(&self, address: &Address) -> Result<Option<Value>, HostError> {
        self.check_online()?;
        Ok(lookup(&self.data.borrow(), address).cloned())
    }

    async fn get_all(&self) -> Result<DataMap, HostError> {
        self.check_online()?;
        Ok(self.data.borrow().clone())
    }

    async fn set(&self, address: &Address, value: &Value) -> Result<(), HostError> {
        self.check_online()?;
        if serialized_len(value) > HOST_VALUE_LIMIT {
            return Err(HostError::length_exceeded());
        }
        insert_entry(&mut self.data.borrow_mut(), address, value.clone());
        Ok(())
    }

    async fn remove(&self, address: &Address) -> Result<(), HostError> {
        self.check_online()?;
        remove_entry(&mut self.data.borrow_mut(), address);
        Ok(())
    }
}
