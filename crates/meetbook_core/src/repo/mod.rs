//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the load/save contract for meeting snapshots.
//! - Keep file I/O and recovery policy out of the service layer.
//!
//! # Invariants
//! - `load` never fails: missing files yield an empty store, corrupt files
//!   yield whatever decoded before the first bad field.
//! - `save` replaces the whole snapshot or leaves the previous one intact.

pub mod meeting_repo;

pub use meeting_repo::{
    FileMeetingRepository, LoadStatus, MeetingRepository, RepoError, RepoResult,
};
