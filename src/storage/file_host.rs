//! # Shared-directory host
//!
//! [`FileHost`] is a [`HostSession`] that keeps the host's plugin data in a
//! JSON document inside a directory several users can share (a network drive,
//! a synced folder). It behaves like the remote API: same address space, same
//! length limit, failures reported as [`HostError`] messages.
//!
//! ## Layout
//!
//! ```text
//! <dir>/
//! └── plugindata.json    # scope → visibility → key → value
//! ```
//!
//! Writes go to a temp file private to the writer (`plugindata.json.<pid>.<n>.tmp`)
//! and are renamed over the document, so readers never see a half-written file
//! and two writers never share a temp file. Concurrent writers still race: the
//! last rename wins.

use super::host::{HOST_VALUE_LIMIT, HostError, HostSession, serialized_len};
use super::{Address, DataMap, insert_entry, lookup, remove_entry};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const DOCUMENT: &str = "plugindata.json";

static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FileHost {
    dir: PathBuf,
}

impl FileHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document(&self) -> PathBuf {
        self.dir.join(DOCUMENT)
    }

    fn load(&self) -> Result<DataMap, HostError> {
        match fs::read_to_string(self.document()) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| HostError::new(format!("Host data is corrupt: {e}"))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DataMap::new()),
            Err(e) => Err(HostError::new(format!("Host data unreadable: {e}"))),
        }
    }

    /// Unique per process and per write.
    fn temp_path(&self) -> PathBuf {
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!("{DOCUMENT}.{}.{seq}.tmp", std::process::id()))
    }

    fn save(&self, data: &DataMap) -> Result<(), HostError> {
        let tmp = self.temp_path();
        let write = || -> std::io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            fs::write(&tmp, serde_json::to_vec_pretty(data)?)?;
            fs::rename(&tmp, self.document())
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            HostError::new(format!("Host data not writable: {e}"))
        })
    }
}

impl HostSession for FileHost {
    async fn get(&self, address: &Address) -> Result<Option<Value>, HostError> {
        Ok(lookup(&self.load()?, address).cloned())
    }

    async fn get_all(&self) -> Result<DataMap, HostError> {
        self.load()
    }

    async fn set(&self, address: &Address, value: &Value) -> Result<(), HostError> {
        if serialized_len(value) > HOST_VALUE_LIMIT {
            return Err(HostError::length_exceeded());
        }
        let mut data = self.load()?;
        insert_entry(&mut data, address, value.clone());
        self.save(&data)
    }

    async fn remove(&self, address: &Address) -> Result<(), HostError> {
        let mut data = self.load()?;
        remove_entry(&mut data, address);
        self.save(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Visibility;
    use serde_json::json;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rtimetracker_filehost_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = temp_dir("reopen");
        let addr = Address::new("card-1", Visibility::Shared, "timerlist-1");

        FileHost::new(&dir)
            .set(&addr, &json!({"id": "1", "timers": []}))
            .await
            .unwrap();

        let reopened = FileHost::new(&dir);
        assert_eq!(
            reopened.get(&addr).await.unwrap(),
            Some(json!({"id": "1", "timers": []}))
        );

        reopened.remove(&addr).await.unwrap();
        assert!(reopened.get_all().await.unwrap().is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_directory_reads_as_empty() {
        let host = FileHost::new(temp_dir("missing"));
        assert!(host.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_value_is_rejected_with_length_message() {
        let dir = temp_dir("limit");
        let host = FileHost::new(&dir);
        let addr = Address::new("card-1", Visibility::Shared, "big");

        let err = host.set(&addr, &json!("y".repeat(4100))).await.unwrap_err();
        assert!(err.is_length_limit());
        assert!(!dir.join(DOCUMENT).exists());
    }

    #[tokio::test]
    async fn corrupt_document_is_a_host_error() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DOCUMENT), "{not json").unwrap();

        let err = FileHost::new(&dir).get_all().await.unwrap_err();
        assert!(!err.is_length_limit());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn writers_never_share_a_temp_file() {
        let host = FileHost::new(temp_dir("tmpname"));
        let a = host.temp_path();
        let b = host.temp_path();
        assert_ne!(a, b);
        assert!(
            a.to_string_lossy()
                .contains(&format!("{DOCUMENT}.{}.", std::process::id()))
        );
    }

    #[test]
    fn concurrent_writers_leave_a_readable_document() {
        let dir = temp_dir("concurrent");
        let writers: Vec<_> = (0..4)
            .map(|w| {
                let dir = dir.clone();
                std::thread::spawn(move || {
                    let rt = tokio::runtime::Builder::new_current_thread()
                        .build()
                        .unwrap();
                    let host = FileHost::new(&dir);
                    for i in 0..25 {
                        let addr =
                            Address::new("card-1", Visibility::Shared, &format!("w{w}-{i}"));
                        rt.block_on(host.set(&addr, &json!({"w": w, "i": i})))
                            .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let data = rt.block_on(FileHost::new(&dir).get_all()).unwrap();
        assert!(!data["card-1"]["shared"].is_empty());

        let leftovers = fs::read_dir(&dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);

        let _ = fs::remove_dir_all(&dir);
    }
}
