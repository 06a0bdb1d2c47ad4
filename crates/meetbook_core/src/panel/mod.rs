//! Calendar panel state driven by the immediate-mode UI.
//!
//! # Responsibility
//! - Track the selected date and date-picker edits with day clamping.
//! - Project the selected year into a marked day grid.
//! - Hold the add-meeting draft and route mutations into `MeetingService`.
//!
//! # Invariants
//! - The selected date is always a valid `Date`.
//! - The panel performs no rendering; widgets read these projections once
//!   per frame and call back into the selection/mutation methods.

pub mod calendar_panel;

pub use calendar_panel::{
    CalendarPanel, DayCell, DayMark, MeetingListView, MonthRow, PanelError, PanelResult,
    DRAFT_MAX_BYTES,
};
