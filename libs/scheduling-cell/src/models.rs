// libs/scheduling-cell/src/models.rs
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_models::Booking;

// ==============================================================================
// SCHEDULE WINDOW MODELS
// ==============================================================================

/// How a schedule window maps onto the calendar.
///
/// The recurring/specific split is a tagged enum on purpose: a recurring
/// window cannot carry a calendar date and a specific window cannot carry a
/// weekday, so the mutual-exclusion invariant needs no runtime check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowRule {
    /// Weekly recurrence on `day_of_week`, optionally narrowed to the n-th
    /// occurrence of that weekday within the month.
    Recurring {
        day_of_week: u8, // 0 = Sunday, 6 = Saturday
        #[serde(default, skip_serializing_if = "Option::is_none")]
        week_of_month: Option<u8>, // 1..=5, None = every week
    },
    /// One-off window on an exact calendar date.
    Specific { date: NaiveDate },
}

impl WindowRule {
    /// Whether this rule covers the given calendar date.
    ///
    /// Week-of-month uses fixed 7-day buckets counted from day 1, i.e.
    /// `ceil(day / 7)`; the fifth bucket may hold fewer than 7 days.
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        match *self {
            WindowRule::Recurring { day_of_week, week_of_month } => {
                if date.weekday().num_days_from_sunday() != day_of_week as u32 {
                    return false;
                }
                match week_of_month {
                    Some(week) => (date.day() + 6) / 7 == week as u32,
                    None => true,
                }
            }
            WindowRule::Specific { date: specific } => specific == date,
        }
    }
}

/// A declared interval in which a service may be booked.
///
/// Read-only to this cell; created and edited by the configuration
/// collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub id: Uuid,
    pub service_id: Uuid,
    #[serde(flatten)]
    pub rule: WindowRule,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ScheduleWindow {
    pub fn validate(&self) -> Result<(), WindowConfigError> {
        if self.end_time <= self.start_time {
            return Err(WindowConfigError::EmptyTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        match self.rule {
            WindowRule::Recurring { day_of_week, week_of_month } => {
                if day_of_week > 6 {
                    return Err(WindowConfigError::InvalidDayOfWeek(day_of_week));
                }
                if let Some(week) = week_of_month {
                    if !(1..=5).contains(&week) {
                        return Err(WindowConfigError::InvalidWeekOfMonth(week));
                    }
                }
            }
            WindowRule::Specific { .. } => {}
        }
        Ok(())
    }

    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.rule.matches_date(date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum WindowConfigError {
    #[error("window end time {end} is not after start time {start}")]
    EmptyTimeRange { start: NaiveTime, end: NaiveTime },

    #[error("day of week must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidDayOfWeek(u8),

    #[error("week of month must be between 1 and 5, got {0}")]
    InvalidWeekOfMonth(u8),
}

/// A malformed window skipped during a computation, reported to the caller
/// instead of aborting the rest of the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowIssue {
    pub window_id: Uuid,
    pub error: WindowConfigError,
}

// ==============================================================================
// DERIVED AVAILABILITY MODELS
// ==============================================================================

/// A fixed-duration bookable unit, produced fresh on every availability
/// query. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub booking: Option<Booking>,
}

/// The dates of one month on which a service offers at least one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAvailability {
    pub service_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub dates: Vec<NaiveDate>,
    pub skipped_windows: Vec<WindowIssue>,
}

/// Full slot classification of one service day.
///
/// `unscheduled` holds confirmed bookings whose time matches no generated
/// slot (the window was edited or removed after booking); they are surfaced
/// as information, never silently dropped. `waitlist` holds the day's
/// waitlisted bookings; their stored time is advisory and blocks nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
    pub unscheduled: Vec<Booking>,
    pub waitlist: Vec<Booking>,
    pub skipped_windows: Vec<WindowIssue>,
}

// ==============================================================================
// BOOKING CLASSIFICATION MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service_id: Uuid,
    pub pharmacy_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Explicit caller opt-in to waitlist semantics when the requested slot
    /// is occupied or does not exist. Never chosen automatically.
    pub allow_waitlist: bool,
    /// When editing an existing booking, its id; the booking's own slot is
    /// treated as vacated before resolving availability.
    pub exclude_booking_id: Option<Uuid>,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingOutcome {
    Confirmed,
    Waitlisted,
    Rejected,
}

impl fmt::Display for BookingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingOutcome::Confirmed => write!(f, "confirmed"),
            BookingOutcome::Waitlisted => write!(f, "waitlisted"),
            BookingOutcome::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingClassification {
    pub outcome: BookingOutcome,
    pub reason: Option<String>,
}

impl BookingClassification {
    pub fn confirmed() -> Self {
        Self { outcome: BookingOutcome::Confirmed, reason: None }
    }

    pub fn waitlisted(reason: impl Into<String>) -> Self {
        Self { outcome: BookingOutcome::Waitlisted, reason: Some(reason.into()) }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self { outcome: BookingOutcome::Rejected, reason: Some(reason.into()) }
    }
}

// ==============================================================================
// CONFIGURATION & ERROR TYPES
// ==============================================================================

/// Bounds applied to a service's slot duration before generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingRules {
    pub min_slot_minutes: i32,
    pub max_slot_minutes: i32,
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            min_slot_minutes: 5,
            max_slot_minutes: 480,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum SchedulingError {
    #[error("Service not found")]
    ServiceNotFound,

    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    #[error("Service duration must be between {min} and {max} minutes, got {actual}")]
    InvalidDuration { actual: i32, min: i32, max: i32 },

    #[error("Store error: {0}")]
    Store(String),
}
