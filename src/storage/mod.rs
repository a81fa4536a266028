//! # Scoped key/value storage
//!
//! Every record is addressed by `(scope, visibility, key)`. A scope is the
//! entity the value is attached to (a card, a member, or a symbolic name), a
//! visibility says who may read it. [`Storage`] is the adapter the rest of the
//! crate talks to; it resolves symbolic scopes against the acting [`Context`],
//! degrades on backend outages and publishes an "all data" snapshot after
//! every successful write.
//!
//! ## Backends
//!
//! | Backend | Module | Used when |
//! |---------|--------|-----------|
//! | [`HostBackend`] | [`host`] | a host session is available (in-process or shared directory) |
//! | [`LocalBackend`] | [`local`] | no host; values go to a string-keyed local store |
//!
//! [`AnyBackend::select`] is the single place where the choice is made.
//!
//! [`Context`]: crate::core::context::Context

pub mod adapter;
pub mod backend;
pub mod file_host;
pub mod host;
pub mod local;
pub mod sqlite;

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::str::FromStr;

pub use adapter::Storage;
pub use backend::AnyBackend;
pub use file_host::FileHost;
pub use host::{HostBackend, HostError, HostSession, MemoryHost};
pub use local::{LocalBackend, LocalStore, MemoryLocalStore};
pub use sqlite::SqliteStore;

/// key → value
pub type KeyMap = BTreeMap<String, Value>;
/// visibility → key → value
pub type VisibilityMap = BTreeMap<String, KeyMap>;
/// scope → visibility → key → value
pub type DataMap = BTreeMap<String, VisibilityMap>;

/// Who may read a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Shared,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Shared => "shared",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(Visibility::Shared),
            "private" => Ok(Visibility::Private),
            other => Err(AppError::Other(format!("Invalid visibility: {other}"))),
        }
    }
}

/// The entity a value is attached to.
///
/// `Card` and `Member` stand for the card and member of the acting context and
/// are resolved to concrete ids before any backend sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Card,
    Member,
    Board,
    Organization,
    Id(String),
}

impl Scope {
    pub fn id(id: impl Into<String>) -> Self {
        Scope::Id(id.into())
    }
}

/// A fully resolved storage address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub scope: String,
    pub visibility: Visibility,
    pub key: String,
}

impl Address {
    pub fn new(scope: impl Into<String>, visibility: Visibility, key: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            visibility,
            key: key.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.scope, self.visibility, self.key)
    }
}

/// Async interface every storage backend implements.
///
/// Reads of missing keys return `Ok(None)`; removing a missing key is `Ok(())`.
/// Host outages are reported as [`AppError::BackendUnavailable`] and size
/// violations as [`AppError::CapacityExceeded`]; the adapter decides how to
/// degrade.
pub trait StorageBackend {
    fn name(&self) -> &'static str;

    fn get(&self, address: &Address) -> impl Future<Output = AppResult<Option<Value>>>;

    fn get_all(&self) -> impl Future<Output = AppResult<DataMap>>;

    fn set(&self, address: &Address, value: &Value) -> impl Future<Output = AppResult<()>>;

    fn remove(&self, address: &Address) -> impl Future<Output = AppResult<()>>;
}

pub(crate) fn insert_entry(data: &mut DataMap, address: &Address, value: Value) {
    data.entry(address.scope.clone())
        .or_default()
        .entry(address.visibility.as_str().to_string())
        .or_default()
        .insert(address.key.clone(), value);
}

pub(crate) fn remove_entry(data: &mut DataMap, address: &Address) {
    let Some(by_visibility) = data.get_mut(&address.scope) else {
        return;
    };
    if let Some(keys) = by_visibility.get_mut(address.visibility.as_str()) {
        keys.remove(&address.key);
        if keys.is_empty() {
            by_visibility.remove(address.visibility.as_str());
        }
    }
    if by_visibility.is_empty() {
        data.remove(&address.scope);
    }
}

pub(crate) fn lookup<'a>(data: &'a DataMap, address: &Address) -> Option<&'a Value> {
    data.get(&address.scope)?
        .get(address.visibility.as_str())?
        .get(&address.key)
}

/// Copy the entries of `data` that match every given filter.
///
/// The source map is only read; empty branches are left out of the result.
pub fn filter_data(
    data: &DataMap,
    scope: Option<&str>,
    visibility: Option<Visibility>,
    predicate: Option<&dyn Fn(&str) -> bool>,
) -> DataMap {
    let mut out = DataMap::new();
    for (s, by_visibility) in data {
        if scope.is_some_and(|wanted| wanted != s) {
            continue;
        }
        let mut vis_out = VisibilityMap::new();
        for (v, keys) in by_visibility {
            if visibility.is_some_and(|wanted| wanted.as_str() != v) {
                continue;
            }
            let kept: KeyMap = keys
                .iter()
                .filter(|(k, _)| predicate.is_none_or(|p| p(k)))
                .map(|(k, value)| (k.clone(), value.clone()))
                .collect();
            if !kept.is_empty() {
                vis_out.insert(v.clone(), kept);
            }
        }
        if !vis_out.is_empty() {
            out.insert(s.clone(), vis_out);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DataMap {
        let mut data = DataMap::new();
        insert_entry(&mut data, &Address::new("c1", Visibility::Shared, "timerlist-a"), json!(1));
        insert_entry(&mut data, &Address::new("c1", Visibility::Shared, "other"), json!(2));
        insert_entry(&mut data, &Address::new("c1", Visibility::Private, "timerlist-b"), json!(3));
        insert_entry(&mut data, &Address::new("c2", Visibility::Shared, "timerlist-c"), json!(4));
        data
    }

    #[test]
    fn filter_by_scope_keeps_only_that_scope() {
        let data = sample();
        let out = filter_data(&data, Some("c1"), None, None);
        assert_eq!(out.len(), 1);
        assert!(out.contains_key("c1"));
        assert_eq!(out["c1"].len(), 2);
    }

    #[test]
    fn filter_by_visibility_and_predicate() {
        let data = sample();
        let pred = |k: &str| k.starts_with("timerlist-");
        let out = filter_data(&data, None, Some(Visibility::Shared), Some(&pred));

        assert_eq!(out["c1"]["shared"].keys().collect::<Vec<_>>(), ["timerlist-a"]);
        assert_eq!(out["c2"]["shared"]["timerlist-c"], json!(4));
        assert!(!out["c1"].contains_key("private"));
    }

    #[test]
    fn filtering_leaves_source_untouched() {
        let data = sample();
        let before = data.clone();
        let pred = |_: &str| false;
        let out = filter_data(&data, Some("c2"), Some(Visibility::Private), Some(&pred));
        assert!(out.is_empty());
        assert_eq!(data, before);
    }

    #[test]
    fn remove_entry_prunes_empty_branches() {
        let mut data = sample();
        remove_entry(&mut data, &Address::new("c2", Visibility::Shared, "timerlist-c"));
        assert!(!data.contains_key("c2"));
        remove_entry(&mut data, &Address::new("nope", Visibility::Shared, "x"));
        assert_eq!(data.len(), 1);
        assert_eq!(
            lookup(&data, &Address::new("c1", Visibility::Private, "timerlist-b")),
            Some(&json!(3))
        );
    }

    #[test]
    fn visibility_parses_round_trip() {
        assert_eq!("shared".parse::<Visibility>().unwrap(), Visibility::Shared);
        assert_eq!("private".parse::<Visibility>().unwrap(), Visibility::Private);
        assert!("public".parse::<Visibility>().is_err());
    }
}
