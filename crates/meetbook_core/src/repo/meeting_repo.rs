//! Meeting snapshot repository contracts and file implementation.
//!
//! # Responsibility
//! - Load the snapshot file once at startup with local recovery.
//! - Rewrite the full snapshot after every mutation.
//!
//! # Invariants
//! - Saves go through a sibling temp file and an atomic rename, so a failed
//!   save never leaves a half-written snapshot behind.
//! - Load outcomes are logged; only save failures reach the caller.

use crate::codec::DecodeError;
use crate::config::StoreConfig;
use crate::store::MeetingStore;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure surfaced to callers.
#[derive(Debug)]
pub enum RepoError {
    /// Writing or replacing the snapshot file failed.
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// How the last `load` call resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Snapshot decoded completely.
    Loaded,
    /// No snapshot file exists yet.
    Missing,
    /// The file exists but could not be read.
    Unreadable(String),
    /// Decode stopped early; entries before the failure were kept.
    Partial(DecodeError),
}

/// Repository interface for the meeting snapshot.
pub trait MeetingRepository {
    /// Reads the persisted snapshot, recovering locally from every failure.
    fn load(&self) -> (MeetingStore, LoadStatus);
    /// Replaces the persisted snapshot with `store`.
    fn save(&self, store: &MeetingStore) -> RepoResult<()>;
}

/// Snapshot stored in one binary file.
#[derive(Debug, Clone)]
pub struct FileMeetingRepository {
    path: PathBuf,
}

impl FileMeetingRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MeetingRepository for FileMeetingRepository {
    fn load(&self) -> (MeetingStore, LoadStatus) {
        let started_at = Instant::now();
        info!(
            "event=store_load module=repo status=start path={}",
            self.path.display()
        );

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "event=store_load module=repo status=ok result=missing path={} duration_ms={}",
                    self.path.display(),
                    started_at.elapsed().as_millis()
                );
                return (MeetingStore::new(), LoadStatus::Missing);
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=store_read_failed path={} duration_ms={} error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                return (MeetingStore::new(), LoadStatus::Unreadable(err.to_string()));
            }
        };

        let outcome = MeetingStore::decode(&bytes);
        match outcome.error {
            Some(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=store_decode_failed path={} bytes={} dates_recovered={} meetings_recovered={} duration_ms={} error={}",
                    self.path.display(),
                    bytes.len(),
                    outcome.store.date_count(),
                    outcome.store.meeting_count(),
                    started_at.elapsed().as_millis(),
                    err
                );
                (outcome.store, LoadStatus::Partial(err))
            }
            None => {
                if outcome.trailing_bytes > 0 {
                    warn!(
                        "event=store_load module=repo status=ok path={} trailing_bytes={}",
                        self.path.display(),
                        outcome.trailing_bytes
                    );
                }
                info!(
                    "event=store_load module=repo status=ok result=loaded path={} dates={} meetings={} duration_ms={}",
                    self.path.display(),
                    outcome.store.date_count(),
                    outcome.store.meeting_count(),
                    started_at.elapsed().as_millis()
                );
                (outcome.store, LoadStatus::Loaded)
            }
        }
    }

    fn save(&self, store: &MeetingStore) -> RepoResult<()> {
        let started_at = Instant::now();
        let bytes = store.encode();

        match write_replace(&self.path, staging_dir(&self.path), &bytes) {
            Ok(()) => {
                info!(
                    "event=store_save module=repo status=ok path={} bytes={} dates={} duration_ms={}",
                    self.path.display(),
                    bytes.len(),
                    store.date_count(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=repo status=error error_code=store_write_failed path={} duration_ms={} error={}",
                    self.path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(RepoError::Io {
                    path: self.path.clone(),
                    source: err,
                })
            }
        }
    }
}

/// Temp files are staged next to the snapshot so the rename stays on one
/// filesystem.
fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes `bytes` to a temp file in `staging` and renames it over `path`.
/// On any error `path` keeps its previous content.
fn write_replace(path: &Path, staging: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(staging)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_replace, FileMeetingRepository, LoadStatus, MeetingRepository};
    use crate::model::date::Date;
    use crate::store::MeetingStore;

    #[test]
    fn save_replaces_snapshot_without_leaving_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileMeetingRepository::new(dir.path().join("calendar.bin"));

        let mut store = MeetingStore::new();
        store.add(Date::new(2024, 3, 15).unwrap(), "Standup").unwrap();
        repo.save(&store).unwrap();

        let (loaded, status) = repo.load();
        assert_eq!(status, LoadStatus::Loaded);
        assert_eq!(loaded, store);
        // Only the snapshot remains; the temp file was renamed over it.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn directory_in_place_of_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileMeetingRepository::new(dir.path());

        let (store, status) = repo.load();
        assert!(store.is_empty());
        assert!(matches!(status, LoadStatus::Unreadable(_)));
    }

    #[test]
    fn failed_replace_leaves_previous_snapshot_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.bin");
        let repo = FileMeetingRepository::new(&path);

        let mut store = MeetingStore::new();
        store.add(Date::new(2024, 3, 15).unwrap(), "Standup").unwrap();
        repo.save(&store).unwrap();
        let before = std::fs::read(&path).unwrap();

        let mut grown = store.clone();
        grown.add(Date::new(2024, 3, 16).unwrap(), "Lunch").unwrap();
        let err = write_replace(&path, &dir.path().join("gone"), &grown.encode()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);

        assert_eq!(std::fs::read(&path).unwrap(), before);
        let (loaded, status) = repo.load();
        assert_eq!(status, LoadStatus::Loaded);
        assert_eq!(loaded, store);
    }
}
