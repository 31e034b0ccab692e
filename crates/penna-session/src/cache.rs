// SPDX-FileCopyrightText: 2026 Penna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable session cache: a two-entry file pair under the cache directory.
//!
//! `credential` holds the opaque bearer token; `identity.json` holds the
//! serialized identity record. Both entries must be present and parseable
//! for restoration to succeed; a partial or corrupt pair is treated as
//! absent and purged. Writes go through a temp file + rename so a crashed
//! write never leaves a half-written entry behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

const CREDENTIAL_FILE: &str = "credential";
const IDENTITY_FILE: &str = "identity.json";

/// The cached identity record, stored alongside the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedIdentity {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Handle to the on-disk session cache.
#[derive(Debug, Clone)]
pub struct SessionCache {
    dir: PathBuf,
}

impl SessionCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn credential_path(&self) -> PathBuf {
        self.dir.join(CREDENTIAL_FILE)
    }

    fn identity_path(&self) -> PathBuf {
        self.dir.join(IDENTITY_FILE)
    }

    /// Reads the cached pair. Returns `None` — purging whatever was found —
    /// unless both entries are present and parseable.
    pub fn load(&self) -> Option<(String, CachedIdentity)> {
        let credential = fs::read_to_string(self.credential_path()).ok();
        let identity_raw = fs::read_to_string(self.identity_path()).ok();

        match (credential, identity_raw) {
            (Some(credential), Some(identity_raw)) => {
                let credential = credential.trim().to_string();
                match serde_json::from_str::<CachedIdentity>(&identity_raw) {
                    Ok(identity) if !credential.is_empty() => Some((credential, identity)),
                    Ok(_) => {
                        warn!("cached credential is empty, purging session cache");
                        self.purge();
                        None
                    }
                    Err(e) => {
                        warn!(error = %e, "cached identity record is corrupt, purging session cache");
                        self.purge();
                        None
                    }
                }
            }
            (None, None) => None,
            _ => {
                warn!("partial session cache found, purging");
                self.purge();
                None
            }
        }
    }

    /// Persists both entries. The pair is only considered written once both
    /// renames land; a failure part-way is cleaned up by the next `load`.
    pub fn store(&self, credential: &str, identity: &CachedIdentity) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let identity_json = serde_json::to_vec(identity)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        write_atomic(&self.credential_path(), credential.as_bytes())?;
        write_atomic(&self.identity_path(), &identity_json)?;
        Ok(())
    }

    /// Removes both entries. Missing files are not an error.
    pub fn purge(&self) {
        let _ = fs::remove_file(self.credential_path());
        let _ = fs::remove_file(self.identity_path());
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> CachedIdentity {
        CachedIdentity {
            id: 1,
            email: "me@example.com".into(),
            created_at: "2026-03-01T09:30:00Z".parse().unwrap(),
            is_active: true,
        }
    }

    #[test]
    fn empty_directory_loads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        assert!(cache.load().is_none());
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        cache.store("tok-123", &identity()).unwrap();

        let (credential, loaded) = cache.load().unwrap();
        assert_eq!(credential, "tok-123");
        assert_eq!(loaded, identity());
    }

    #[test]
    fn load_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        cache.store("tok-123", &identity()).unwrap();

        let first = cache.load().unwrap();
        let second = cache.load().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn partial_pair_is_purged() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        cache.store("tok-123", &identity()).unwrap();
        fs::remove_file(dir.path().join(IDENTITY_FILE)).unwrap();

        assert!(cache.load().is_none());
        // The surviving half must have been purged too.
        assert!(!dir.path().join(CREDENTIAL_FILE).exists());
    }

    #[test]
    fn corrupt_identity_is_purged() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        cache.store("tok-123", &identity()).unwrap();
        fs::write(dir.path().join(IDENTITY_FILE), "{not json").unwrap();

        assert!(cache.load().is_none());
        assert!(!dir.path().join(CREDENTIAL_FILE).exists());
        assert!(!dir.path().join(IDENTITY_FILE).exists());
    }

    #[test]
    fn purge_on_empty_directory_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        cache.purge();
        cache.purge();
        assert!(cache.load().is_none());
    }

    #[test]
    fn store_overwrites_previous_pair() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        cache.store("tok-old", &identity()).unwrap();
        cache.store("tok-new", &identity()).unwrap();

        let (credential, _) = cache.load().unwrap();
        assert_eq!(credential, "tok-new");
    }
}
