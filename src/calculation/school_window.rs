//! School-year window resolution.
//!
//! Tuition accrues only inside the window configured by
//! [`SchoolCalendar`]. This module decides which window a date belongs to
//! and how many of its months have already started.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::SchoolCalendar;
use crate::models::YearMonth;

/// The months of one school year, e.g. February through November 2026.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchoolWindow {
    year: i32,
    first_month: u32,
    last_month: u32,
}

impl SchoolWindow {
    /// The window of `year` under `calendar`.
    pub fn new(year: i32, calendar: &SchoolCalendar) -> Self {
        Self {
            year,
            first_month: calendar.first_month,
            last_month: calendar.last_month,
        }
    }

    /// The school year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Number of months in the window; at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u32 {
        self.last_month + 1 - self.first_month
    }

    /// Every month of the window in calendar order.
    ///
    /// ```
    /// use tuition_ledger::calculation::SchoolWindow;
    /// use tuition_ledger::config::SchoolCalendar;
    ///
    /// let window = SchoolWindow::new(2026, &SchoolCalendar::default());
    /// let months = window.months();
    /// assert_eq!(months.len(), 10);
    /// assert_eq!(months[0].to_string(), "2026-02");
    /// assert_eq!(months[9].to_string(), "2026-11");
    /// ```
    pub fn months(&self) -> Vec<YearMonth> {
        (self.first_month..=self.last_month)
            .filter_map(|month| YearMonth::new(self.year, month).ok())
            .collect()
    }

    /// Returns true if `month` falls inside the window.
    pub fn contains(&self, month: YearMonth) -> bool {
        month.year() == self.year && (self.first_month..=self.last_month).contains(&month.month())
    }

    /// Window months whose first day is strictly before `today`.
    pub fn elapsed(&self, today: NaiveDate) -> Vec<YearMonth> {
        self.months()
            .into_iter()
            .filter(|m| m.first_day() < today)
            .collect()
    }

    /// How many window months have started before `today`.
    pub fn elapsed_months(&self, today: NaiveDate) -> u32 {
        self.elapsed(today).len() as u32
    }
}

/// Where a date falls relative to the school year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "position", content = "window", rename_all = "snake_case")]
pub enum WindowPosition {
    /// The date is inside the window.
    InSession(SchoolWindow),
    /// The date is in the break; the window is the one payments apply to.
    OutOfSession(SchoolWindow),
}

impl WindowPosition {
    /// The window that applies.
    pub fn window(&self) -> SchoolWindow {
        match self {
            WindowPosition::InSession(window) | WindowPosition::OutOfSession(window) => *window,
        }
    }

    /// Returns true inside the window.
    pub fn is_in_session(&self) -> bool {
        matches!(self, WindowPosition::InSession(_))
    }
}

impl SchoolCalendar {
    /// The window of `year`.
    pub fn window(&self, year: i32) -> SchoolWindow {
        SchoolWindow::new(year, self)
    }

    /// Resolves the window relevant on `today`.
    ///
    /// After the last month, the upcoming window of next year applies.
    /// Before the first month, the window of this year has not started yet.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tuition_ledger::calculation::WindowPosition;
    /// use tuition_ledger::config::SchoolCalendar;
    ///
    /// let calendar = SchoolCalendar::default();
    /// let december = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
    /// let position = calendar.position(december);
    /// assert!(!position.is_in_session());
    /// assert_eq!(position.window().year(), 2026);
    /// ```
    pub fn position(&self, today: NaiveDate) -> WindowPosition {
        let month = today.month();
        let year = today.year();
        if month > self.last_month {
            WindowPosition::OutOfSession(self.window(year + 1))
        } else if month < self.first_month {
            WindowPosition::OutOfSession(self.window(year))
        } else {
            WindowPosition::InSession(self.window(year))
        }
    }
}
