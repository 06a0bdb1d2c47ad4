//! In-memory meeting store and its snapshot encoding.
//!
//! # Responsibility
//! - Hold the date-ordered meeting mapping that callers treat as the source
//!   of truth.
//! - Convert the mapping to and from the binary snapshot layout.
//!
//! # Invariants
//! - No date key is ever present with an empty meeting list.
//! - Entries keep insertion order within a date; dates iterate ascending.

pub mod meeting_store;

pub use meeting_store::{BlankMeetingName, DecodeOutcome, MeetingStore};
