//! Calendar panel state machine.

use crate::calendar::{days_in_month, month_short_name, Clock, MAX_YEAR, MIN_YEAR};
use crate::model::date::{Date, DateValidationError};
use crate::repo::meeting_repo::MeetingRepository;
use crate::service::meeting_service::{MeetingService, ServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// Largest draft meeting name in bytes.
pub const DRAFT_MAX_BYTES: usize = 127;

pub type PanelResult<T> = Result<T, PanelError>;

/// Panel interaction failures.
#[derive(Debug)]
pub enum PanelError {
    /// Picker value does not form a valid date.
    InvalidSelection(DateValidationError),
    /// Meeting mutation failed.
    Service(ServiceError),
}

impl Display for PanelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSelection(err) => write!(f, "invalid selection: {err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PanelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSelection(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<DateValidationError> for PanelError {
    fn from(value: DateValidationError) -> Self {
        Self::InvalidSelection(value)
    }
}

impl From<ServiceError> for PanelError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// Highlight applied to one grid day, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMark {
    Today,
    Selected,
    HasMeetings,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: Date,
    pub mark: DayMark,
}

/// One month line of the year grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRow {
    pub month: i8,
    pub label: &'static str,
    pub days: Vec<DayCell>,
}

/// What the meeting list area shows for the selected date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingListView<'a> {
    NoMeetingsAtAll,
    NoMeetingsOnDate,
    Meetings(&'a [String]),
}

/// Selection, draft and store for one calendar panel.
pub struct CalendarPanel<R: MeetingRepository, C: Clock> {
    service: MeetingService<R>,
    clock: C,
    selected: Date,
    add_meeting_open: bool,
    draft: String,
}

impl<R: MeetingRepository, C: Clock> CalendarPanel<R, C> {
    /// Opens the panel with today selected.
    pub fn open(service: MeetingService<R>, clock: C) -> Self {
        let selected = clock.today();
        Self {
            service,
            clock,
            selected,
            add_meeting_open: false,
            draft: String::new(),
        }
    }

    pub fn service(&self) -> &MeetingService<R> {
        &self.service
    }

    pub fn selected(&self) -> Date {
        self.selected
    }

    pub fn today(&self) -> Date {
        self.clock.today()
    }

    /// Day choices for the selected month.
    pub fn day_options(&self) -> RangeInclusive<i8> {
        1..=days_in_month(self.selected.month(), self.selected.year())
    }

    pub fn year_options(&self) -> RangeInclusive<i16> {
        MIN_YEAR..=MAX_YEAR
    }

    pub fn select_date(&mut self, date: Date) {
        self.selected = date;
    }

    pub fn select_day(&mut self, day: i8) -> PanelResult<()> {
        self.selected = self.selected.with_day(day)?;
        Ok(())
    }

    /// Moves to `month`, clamping the day to the month's length.
    pub fn select_month(&mut self, month: i8) -> PanelResult<()> {
        self.selected = self.selected.with_month(month)?;
        Ok(())
    }

    /// Moves to `year`, clamping the day to the month's length.
    pub fn select_year(&mut self, year: i16) -> PanelResult<()> {
        self.selected = self.selected.with_year(year)?;
        Ok(())
    }

    /// All twelve months of the selected year with per-day marks.
    pub fn year_grid(&self) -> Vec<MonthRow> {
        let year = self.selected.year();
        let today = self.clock.today();
        (1..=12)
            .map(|month| {
                let days = (1..=days_in_month(month, year))
                    .filter_map(|day| Date::new(year, month, day).ok())
                    .map(|date| DayCell {
                        date,
                        mark: self.mark_for(date, today),
                    })
                    .collect();
                MonthRow {
                    month,
                    label: month_short_name(month),
                    days,
                }
            })
            .collect()
    }

    fn mark_for(&self, date: Date, today: Date) -> DayMark {
        if date == today {
            DayMark::Today
        } else if date == self.selected {
            DayMark::Selected
        } else if self.service.has_meetings(date) {
            DayMark::HasMeetings
        } else {
            DayMark::Plain
        }
    }

    pub fn header_label(&self) -> String {
        format!("Meetings on {}: ", self.selected.short_label())
    }

    pub fn meeting_list(&self) -> MeetingListView<'_> {
        if self.service.store().is_empty() {
            return MeetingListView::NoMeetingsAtAll;
        }
        match self.service.list_meetings(self.selected) {
            [] => MeetingListView::NoMeetingsOnDate,
            meetings => MeetingListView::Meetings(meetings),
        }
    }

    /// Removes the first meeting named `name` on the selected date.
    pub fn delete_meeting(&mut self, name: &str) -> PanelResult<bool> {
        Ok(self.service.remove_meeting(self.selected, name)?)
    }

    pub fn is_add_meeting_open(&self) -> bool {
        self.add_meeting_open
    }

    pub fn open_add_meeting(&mut self) {
        self.add_meeting_open = true;
    }

    pub fn add_meeting_title(&self) -> String {
        format!("Add meeting to {}", self.selected.short_label())
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replaces the draft, truncated to `DRAFT_MAX_BYTES` on a char boundary.
    pub fn set_draft(&mut self, text: &str) {
        let mut end = text.len().min(DRAFT_MAX_BYTES);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        self.draft.clear();
        self.draft.push_str(&text[..end]);
    }

    /// Adds the draft to the selected date, then clears and closes the dialog.
    ///
    /// On error the dialog stays open with the draft intact.
    pub fn save_draft(&mut self) -> PanelResult<()> {
        self.service
            .add_meeting(self.selected, self.draft.clone())?;
        self.draft.clear();
        self.add_meeting_open = false;
        Ok(())
    }

    pub fn cancel_draft(&mut self) {
        self.draft.clear();
        self.add_meeting_open = false;
    }
}
