//! Date-ordered meeting mapping.
//!
//! Snapshot layout (see `crate::codec` for field encodings):
//!
//! ```text
//! i64 date_count
//! date_count x {
//!     Date date
//!     i64  meeting_count
//!     meeting_count x { i64 name_len, name_len bytes }
//! }
//! ```

use crate::codec::{ByteReader, ByteWriter, DecodeError};
use crate::model::date::Date;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Meeting name is empty or whitespace only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankMeetingName {
    pub date: Date,
}

impl Display for BlankMeetingName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "blank meeting name on {}", self.date)
    }
}

impl Error for BlankMeetingName {}

/// Ordered mapping from day to meeting names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingStore {
    meetings: BTreeMap<Date, Vec<String>>,
}

/// Result of decoding a snapshot with partial recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOutcome {
    /// Entries decoded before the first failure (all of them on success).
    pub store: MeetingStore,
    /// First decode failure, if any.
    pub error: Option<DecodeError>,
    /// Unread bytes after a complete decode.
    pub trailing_bytes: usize,
}

impl MeetingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from `(date, name)` pairs in order.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (Date, &'a str)>,
    ) -> Result<Self, BlankMeetingName> {
        let mut store = MeetingStore::new();
        for (date, name) in entries {
            store.add(date, name)?;
        }
        Ok(store)
    }

    /// Appends `name` to the list for `date`, creating the list when absent.
    ///
    /// # Errors
    /// - `BlankMeetingName` when `name` is empty or whitespace only; the
    ///   store is left unchanged.
    pub fn add(&mut self, date: Date, name: impl Into<String>) -> Result<(), BlankMeetingName> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BlankMeetingName { date });
        }
        self.meetings.entry(date).or_default().push(name);
        Ok(())
    }

    /// Removes the first entry equal to `name` under `date`.
    ///
    /// Prunes the date when its list becomes empty. Returns the removed
    /// position so callers can undo the removal.
    pub fn remove_first(&mut self, date: Date, name: &str) -> Option<usize> {
        let list = self.meetings.get_mut(&date)?;
        let index = list.iter().position(|entry| entry == name)?;
        list.remove(index);
        if list.is_empty() {
            self.meetings.remove(&date);
        }
        Some(index)
    }

    /// Re-inserts `name` at `index` under `date`.
    pub(crate) fn insert_at(&mut self, date: Date, index: usize, name: String) {
        let list = self.meetings.entry(date).or_default();
        let index = index.min(list.len());
        list.insert(index, name);
    }

    /// Removes the most recently appended entry under `date`.
    pub(crate) fn pop_last(&mut self, date: Date) -> Option<String> {
        let list = self.meetings.get_mut(&date)?;
        let popped = list.pop();
        if list.is_empty() {
            self.meetings.remove(&date);
        }
        popped
    }

    /// Meetings on `date` in insertion order; empty when there are none.
    pub fn list(&self, date: Date) -> &[String] {
        self.meetings
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_meetings(&self, date: Date) -> bool {
        self.meetings.contains_key(&date)
    }

    /// Dates carrying at least one meeting, ascending.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.meetings.keys().copied()
    }

    /// `(date, meetings)` pairs, ascending by date.
    pub fn iter(&self) -> impl Iterator<Item = (Date, &[String])> + '_ {
        self.meetings
            .iter()
            .map(|(date, list)| (*date, list.as_slice()))
    }

    /// Number of dates with meetings.
    pub fn date_count(&self) -> usize {
        self.meetings.len()
    }

    /// Total number of meeting entries across all dates.
    pub fn meeting_count(&self) -> usize {
        self.meetings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    /// Encodes the whole store in the snapshot layout.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_len(self.meetings.len());
        for (date, list) in &self.meetings {
            writer.write_date(*date);
            writer.write_len(list.len());
            for name in list {
                writer.write_str(name);
            }
        }
        writer.into_bytes()
    }

    /// Decodes a snapshot, keeping everything read before the first error.
    ///
    /// Negative counts decode as zero iterations. A blank meeting name can
    /// never come from `encode` and is treated as corruption.
    pub fn decode(bytes: &[u8]) -> DecodeOutcome {
        let mut store = MeetingStore::new();
        let mut reader = ByteReader::new(bytes);

        let date_count = reader.read_i64();
        let mut date_index = 0;
        while date_index < date_count && !reader.is_failed() {
            let date = reader.read_date();
            let meeting_count = reader.read_i64();
            let mut meeting_index = 0;
            while meeting_index < meeting_count && !reader.is_failed() {
                let name = reader.read_string();
                if reader.is_failed() {
                    break;
                }
                if let Err(err) = store.add(date, name) {
                    reader.fail(DecodeError::InvalidRecord(err.to_string()));
                    break;
                }
                meeting_index += 1;
            }
            date_index += 1;
        }

        match reader.finish() {
            Ok(trailing_bytes) => DecodeOutcome {
                store,
                error: None,
                trailing_bytes,
            },
            Err(err) => DecodeOutcome {
                store,
                error: Some(err),
                trailing_bytes: 0,
            },
        }
    }
}
