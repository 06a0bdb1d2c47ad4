//! Meeting use-case service.
//!
//! # Responsibility
//! - Own the in-memory store for the process lifetime.
//! - Persist the full store after every successful mutation.
//!
//! # Invariants
//! - In-memory state never diverges from the last successful save: a failed
//!   save rolls the mutation back before the error is returned.
//! - Meeting names are never blank.

use crate::config::StoreConfig;
use crate::model::date::Date;
use crate::repo::meeting_repo::{
    FileMeetingRepository, LoadStatus, MeetingRepository, RepoError,
};
use crate::store::{BlankMeetingName, MeetingStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for meeting use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Meeting name is empty or whitespace only.
    EmptyMeetingName,
    /// Persistence-layer failure; the mutation was rolled back.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMeetingName => write!(f, "meeting name cannot be empty"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyMeetingName => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<BlankMeetingName> for ServiceError {
    fn from(_: BlankMeetingName) -> Self {
        Self::EmptyMeetingName
    }
}

/// Meeting store plus the repository that persists it.
pub struct MeetingService<R: MeetingRepository> {
    repo: R,
    store: MeetingStore,
    load_status: LoadStatus,
}

impl MeetingService<FileMeetingRepository> {
    /// Loads the file-backed store named by `config`.
    pub fn open(config: &StoreConfig) -> Self {
        Self::load(FileMeetingRepository::from_config(config))
    }
}

impl<R: MeetingRepository> MeetingService<R> {
    /// Loads the persisted store through `repo`.
    ///
    /// Never fails; see `LoadStatus` for how the snapshot resolved.
    pub fn load(repo: R) -> Self {
        let (store, load_status) = repo.load();
        Self {
            repo,
            store,
            load_status,
        }
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// Read-only view of the whole store.
    pub fn store(&self) -> &MeetingStore {
        &self.store
    }

    /// Appends `name` to `date` and persists.
    ///
    /// # Errors
    /// - `EmptyMeetingName` when `name` is blank; nothing is written.
    /// - `Repo` when the save fails; the entry is not kept.
    pub fn add_meeting(&mut self, date: Date, name: impl Into<String>) -> ServiceResult<()> {
        self.store.add(date, name)?;
        if let Err(err) = self.repo.save(&self.store) {
            self.store.pop_last(date);
            warn!("event=meeting_add module=service status=error date={date} rolled_back=true");
            return Err(err.into());
        }

        info!(
            "event=meeting_add module=service status=ok date={date} meetings_on_date={}",
            self.store.list(date).len()
        );
        Ok(())
    }

    /// Removes the first meeting named `name` on `date` and persists.
    ///
    /// Returns `false` without writing when no entry matches.
    ///
    /// # Errors
    /// - `Repo` when the save fails; the entry is restored in place.
    pub fn remove_meeting(&mut self, date: Date, name: &str) -> ServiceResult<bool> {
        let Some(index) = self.store.remove_first(date, name) else {
            return Ok(false);
        };

        if let Err(err) = self.repo.save(&self.store) {
            self.store.insert_at(date, index, name.to_owned());
            warn!("event=meeting_remove module=service status=error date={date} rolled_back=true");
            return Err(err.into());
        }

        info!(
            "event=meeting_remove module=service status=ok date={date} pruned={}",
            !self.store.has_meetings(date)
        );
        Ok(true)
    }

    /// Meetings on `date` in insertion order.
    pub fn list_meetings(&self, date: Date) -> &[String] {
        self.store.list(date)
    }

    pub fn has_meetings(&self, date: Date) -> bool {
        self.store.has_meetings(date)
    }
}

#[cfg(test)]
mod tests {
    use super::{MeetingService, ServiceError};
    use crate::model::date::Date;
    use crate::repo::meeting_repo::{LoadStatus, MeetingRepository, RepoError, RepoResult};
    use crate::store::MeetingStore;
    use std::cell::{Cell, RefCell};
    use std::path::PathBuf;

    #[derive(Default)]
    struct MemoryRepository {
        saved: RefCell<Option<MeetingStore>>,
        saves: Cell<usize>,
        fail_saves: Cell<bool>,
    }

    impl MeetingRepository for &MemoryRepository {
        fn load(&self) -> (MeetingStore, LoadStatus) {
            (MeetingStore::new(), LoadStatus::Missing)
        }

        fn save(&self, store: &MeetingStore) -> RepoResult<()> {
            if self.fail_saves.get() {
                return Err(RepoError::Io {
                    path: PathBuf::from("memory"),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.saves.set(self.saves.get() + 1);
            *self.saved.borrow_mut() = Some(store.clone());
            Ok(())
        }
    }

    fn day() -> Date {
        Date::new(2024, 3, 15).unwrap()
    }

    #[test]
    fn every_mutation_saves_the_full_store() {
        let repo = MemoryRepository::default();
        let mut service = MeetingService::load(&repo);

        service.add_meeting(day(), "Standup").unwrap();
        service.add_meeting(day(), "Review").unwrap();
        assert!(service.remove_meeting(day(), "Standup").unwrap());

        assert_eq!(repo.saves.get(), 3);
        let saved = repo.saved.borrow().clone().unwrap();
        assert_eq!(saved.list(day()), ["Review"]);
    }

    #[test]
    fn blank_names_are_rejected_without_saving() {
        let repo = MemoryRepository::default();
        let mut service = MeetingService::load(&repo);

        let err = service.add_meeting(day(), "   ").unwrap_err();
        assert!(matches!(err, ServiceError::EmptyMeetingName));
        assert_eq!(repo.saves.get(), 0);
        assert!(!service.has_meetings(day()));
    }

    #[test]
    fn removing_unknown_name_does_not_save() {
        let repo = MemoryRepository::default();
        let mut service = MeetingService::load(&repo);
        service.add_meeting(day(), "Standup").unwrap();

        assert!(!service.remove_meeting(day(), "Lunch").unwrap());
        assert_eq!(repo.saves.get(), 1);
    }

    #[test]
    fn failed_save_rolls_back_add_and_remove() {
        let repo = MemoryRepository::default();
        let mut service = MeetingService::load(&repo);
        service.add_meeting(day(), "A").unwrap();
        service.add_meeting(day(), "B").unwrap();

        repo.fail_saves.set(true);
        let err = service.add_meeting(day(), "C").unwrap_err();
        assert!(matches!(err, ServiceError::Repo(_)));
        assert_eq!(service.list_meetings(day()), ["A", "B"]);

        let err = service.remove_meeting(day(), "A").unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(service.list_meetings(day()), ["A", "B"]);
    }
}
