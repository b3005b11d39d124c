// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

use gigboard::Store;
use gigboard_domain::now;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Errors that can occur during persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// An I/O error occurred reading or writing the store file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The store document could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The document on disk was written by a newer build.
    #[error("unsupported store version {found} (this build supports up to {supported})")]
    UnsupportedVersion {
        /// The version found in the document.
        found: u32,
        /// The highest version this build can read.
        supported: u32,
    },
}

/// Whole-document JSON file store for the marketplace aggregate.
///
/// `load` returns a consistent snapshot; `save` replaces the document
/// atomically (write to a temporary sibling, then rename), so a reader can
/// never observe a partially written store. The store does NOT serialize
/// concurrent read-modify-write cycles itself; callers that mutate
/// concurrently must hold a single-writer lock across the full cycle.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Path of the persisted document.
    path: PathBuf,
}

impl FileStore {
    /// Creates a file store backed by the given path.
    ///
    /// Nothing is touched on disk until the first `load` or `save`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the persisted document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole aggregate.
    ///
    /// A missing file yields a fresh empty store (created lazily on first
    /// use); it is persisted on the next `save`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or was
    /// written by a newer schema version.
    pub fn load(&self) -> Result<Store, PersistenceError> {
        let raw: String = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file absent, starting fresh");
                return Ok(Store::new(now()));
            }
            Err(err) => return Err(err.into()),
        };
        let store: Store = serde_json::from_str(&raw)?;
        migrate(store)
    }

    /// Atomically replaces the whole aggregate.
    ///
    /// The document is serialized to `<path>.tmp` and renamed over the
    /// target, so concurrent readers observe either the old or the new
    /// document, never a torn one. Parent directories are created as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or written.
    pub fn save(&self, store: &Store) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp: PathBuf = self.tmp_path();
        let document: String = serde_json::to_string_pretty(store)?;
        fs::write(&tmp, document)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), tasks = store.tasks.len(), "store saved");
        Ok(())
    }

    /// Sibling path used for the atomic write.
    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

/// Brings a loaded document up to the current schema version.
///
/// Version 1 is the first persisted schema, so there is nothing to rewrite
/// yet; this is the seam where future shape changes land. Documents from a
/// newer build are refused rather than guessed at.
fn migrate(store: Store) -> Result<Store, PersistenceError> {
    if store.version > Store::CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: store.version,
            supported: Store::CURRENT_VERSION,
        });
    }
    if store.version < Store::CURRENT_VERSION {
        info!(
            from = store.version,
            to = Store::CURRENT_VERSION,
            "migrating store document"
        );
        let mut upgraded: Store = store;
        upgraded.version = Store::CURRENT_VERSION;
        return Ok(upgraded);
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigboard::{Command, apply};
    use gigboard_domain::{PhoneNumber, Role};
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("state").join("gigboard.json")
    }

    fn populated_store() -> Store {
        let store: Store = Store::new(1_700_000_000);
        apply(
            &store,
            Command::Register {
                phone: PhoneNumber::normalize("+31611111111"),
                role: Role::Both,
            },
            1_700_000_000,
        )
        .expect("register accepted")
        .new_store
    }

    #[test]
    fn test_load_missing_file_yields_fresh_store() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = FileStore::new(store_path(&dir));

        let store: Store = file_store.load().unwrap();
        assert_eq!(store.version, Store::CURRENT_VERSION);
        assert!(store.users.is_empty());
        assert!(store.tasks.is_empty());
        assert_eq!(store.seq, 0);
        // Lazy creation: nothing on disk until the first save.
        assert!(!store_path(&dir).exists());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = FileStore::new(store_path(&dir));
        let store: Store = populated_store();

        file_store.save(&store).unwrap();
        let loaded: Store = file_store.load().unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = FileStore::new(store_path(&dir));

        file_store.save(&Store::new(0)).unwrap();
        assert!(store_path(&dir).exists());
    }

    #[test]
    fn test_save_leaves_no_temporary_file_behind() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = FileStore::new(store_path(&dir));

        file_store.save(&Store::new(0)).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path().join("state"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("gigboard.json")]);
    }

    #[test]
    fn test_save_replaces_previous_document_whole() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = FileStore::new(store_path(&dir));

        file_store.save(&Store::new(0)).unwrap();
        let store: Store = populated_store();
        file_store.save(&store).unwrap();

        let loaded: Store = file_store.load().unwrap();
        assert_eq!(loaded.users.len(), 1);
    }

    #[test]
    fn test_newer_schema_version_is_refused() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = FileStore::new(store_path(&dir));
        let mut store: Store = Store::new(0);
        store.version = Store::CURRENT_VERSION + 1;
        file_store.save(&store).unwrap();

        let err = file_store.load().unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnsupportedVersion { found, .. }
                if found == Store::CURRENT_VERSION + 1
        ));
    }

    #[test]
    fn test_corrupt_document_is_a_serialization_error() {
        let dir: TempDir = TempDir::new().unwrap();
        let path: PathBuf = store_path(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        let err = FileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }

    #[test]
    fn test_persisted_document_uses_the_wire_shape() {
        let dir: TempDir = TempDir::new().unwrap();
        let file_store: FileStore = FileStore::new(store_path(&dir));
        file_store.save(&populated_store()).unwrap();

        let raw: String = fs::read_to_string(store_path(&dir)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("version").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("users").is_some());
        assert!(value.get("tasks").is_some());
        assert!(value.get("seq").is_some());
    }
}
