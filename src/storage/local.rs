//! # Local fallback backend
//!
//! Without a host session values are kept in a flat, string-keyed
//! [`LocalStore`] (SQLite in the CLI, a map in tests). Each address becomes one
//! composite key:
//!
//! ```text
//! <prefix>|:|<scope>|:|<visibility>|:|<key>
//! ```
//!
//! The prefix keeps several deployments apart when they share one store.
//! Components are escaped (`%` → `%25`, `|` → `%7C`) so the separator can
//! never appear inside them and every key decodes back to its address.
//!
//! Values are stored as JSON text. A value that no longer parses is reported
//! with a warning and treated as absent.

use super::{Address, DataMap, StorageBackend, Visibility, insert_entry};
use crate::errors::AppResult;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub const KEY_SEPARATOR: &str = "|:|";

/// A synchronous, persistent string-keyed store.
pub trait LocalStore {
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove_item(&self, key: &str) -> AppResult<()>;
    fn keys(&self) -> AppResult<Vec<String>>;
}

fn escape(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for c in component.chars() {
        match c {
            '%' => out.push_str("%25"),
            '|' => out.push_str("%7C"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(component: &str) -> Option<String> {
    let mut out = String::with_capacity(component.len());
    let mut rest = component;
    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let code = rest.get(idx + 1..idx + 3)?;
        match code {
            "25" => out.push('%'),
            "7C" => out.push('|'),
            _ => return None,
        }
        rest = &rest[idx + 3..];
    }
    out.push_str(rest);
    Some(out)
}

pub fn composite_key(prefix: &str, address: &Address) -> String {
    [
        escape(prefix),
        escape(&address.scope),
        escape(address.visibility.as_str()),
        escape(&address.key),
    ]
    .join(KEY_SEPARATOR)
}

/// Decode a composite key written under `prefix`. Keys of other prefixes or
/// foreign entries of the store yield `None`.
pub fn parse_composite_key(prefix: &str, raw: &str) -> Option<Address> {
    let parts: Vec<&str> = raw.split(KEY_SEPARATOR).collect();
    let [p, scope, visibility, key] = parts.as_slice() else {
        return None;
    };
    if *p != escape(prefix) {
        return None;
    }
    let visibility: Visibility = unescape(visibility)?.parse().ok()?;
    Some(Address::new(unescape(scope)?, visibility, unescape(key)?))
}

/// [`StorageBackend`] over a [`LocalStore`].
#[derive(Debug, Clone)]
pub struct LocalBackend<L: LocalStore> {
    store: L,
    prefix: String,
}

impl<L: LocalStore> LocalBackend<L> {
    pub fn new(store: L, prefix: &str) -> Self {
        Self {
            store,
            prefix: prefix.to_string(),
        }
    }

    pub fn store(&self) -> &L {
        &self.store
    }

    fn parse_value(&self, key: &str, raw: &str) -> Option<Value> {
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unreadable local value '{key}': {e}");
                None
            }
        }
    }
}

impl<L: LocalStore> StorageBackend for LocalBackend<L> {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn get(&self, address: &Address) -> AppResult<Option<Value>> {
        let key = composite_key(&self.prefix, address);
        Ok(self
            .store
            .get_item(&key)?
            .and_then(|raw| self.parse_value(&key, &raw)))
    }

    async fn get_all(&self) -> AppResult<DataMap> {
        let mut data = DataMap::new();
        for key in self.store.keys()? {
            let Some(address) = parse_composite_key(&self.prefix, &key) else {
                continue;
            };
            let Some(raw) = self.store.get_item(&key)? else {
                continue;
            };
            if let Some(value) = self.parse_value(&key, &raw) {
                insert_entry(&mut data, &address, value);
            }
        }
        Ok(data)
    }

    async fn set(&self, address: &Address, value: &Value) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store
            .set_item(&composite_key(&self.prefix, address), &raw)
    }

    async fn remove(&self, address: &Address) -> AppResult<()> {
        self.store
            .remove_item(&composite_key(&self.prefix, address))
    }
}

/// Map-backed [`LocalStore`]; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocalStore {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        Ok(self.items.borrow().keys().cloned().collect())
    }
}
