//! Core calendar logic for meetbook.
//! This crate owns the meeting store, its snapshot file and the date rules
//! the calendar panel relies on.

pub mod calendar;
pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod panel;
pub mod repo;
pub mod service;
pub mod store;

pub use calendar::{
    days_in_month, is_leap_year, month_short_name, today, Clock, FixedClock, SystemClock,
    MAX_YEAR, MIN_YEAR,
};
pub use codec::{ByteReader, ByteWriter, DecodeError, ReadOp};
pub use config::StoreConfig;
pub use logging::{init_logging, logging_status, LogSettings, LoggingError};
pub use model::date::{Date, DateValidationError};
pub use panel::{CalendarPanel, DayCell, DayMark, MeetingListView, MonthRow, PanelError};
pub use repo::meeting_repo::{
    FileMeetingRepository, LoadStatus, MeetingRepository, RepoError, RepoResult,
};
pub use service::meeting_service::{MeetingService, ServiceError, ServiceResult};
pub use store::{BlankMeetingName, DecodeOutcome, MeetingStore};
