// libs/scheduling-cell/src/services/recurrence.rs
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::models::{ScheduleWindow, WindowConfigError, WindowIssue};

/// Expands schedule windows into the concrete dates they cover within a
/// target month.
pub struct RecurrenceExpander;

impl RecurrenceExpander {
    pub fn new() -> Self {
        Self
    }

    /// Expand one window into ascending calendar dates within `year`/`month`.
    ///
    /// Recurring rules match every day of the month whose weekday (and,
    /// when set, week-of-month bucket) agrees with the rule; specific rules
    /// contribute their date when it falls inside the month. An empty
    /// result is valid, not an error.
    pub fn expand(
        &self,
        window: &ScheduleWindow,
        year: i32,
        month: u32,
    ) -> Result<Vec<NaiveDate>, WindowConfigError> {
        window.validate()?;
        Ok(month_days(year, month)
            .filter(|day| window.applies_on(*day))
            .collect())
    }

    /// Union of the dates offered by a whole window set, ascending and
    /// deduplicated. A date is either offered or not, independent of how
    /// many windows cover it. Malformed windows are skipped and collected,
    /// never fatal to the remaining windows.
    pub fn month_dates(
        &self,
        windows: &[ScheduleWindow],
        year: i32,
        month: u32,
    ) -> (Vec<NaiveDate>, Vec<WindowIssue>) {
        debug!("Expanding {} schedule windows for {}-{:02}", windows.len(), year, month);

        let mut dates = BTreeSet::new();
        let mut skipped = Vec::new();

        for window in windows {
            match self.expand(window, year, month) {
                Ok(expanded) => dates.extend(expanded),
                Err(error) => {
                    warn!("Skipping malformed schedule window {}: {}", window.id, error);
                    skipped.push(WindowIssue { window_id: window.id, error });
                }
            }
        }

        (dates.into_iter().collect(), skipped)
    }
}

impl Default for RecurrenceExpander {
    fn default() -> Self {
        Self::new()
    }
}

/// Every valid calendar day of the month, in order. Short months simply
/// yield fewer days.
fn month_days(year: i32, month: u32) -> impl Iterator<Item = NaiveDate> {
    (1..=31).filter_map(move |day| NaiveDate::from_ymd_opt(year, month, day))
}
