// libs/shared/models/src/booking.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A client booked into a service, either holding a concrete slot
/// (`Confirmed`) or parked on the day's waitlist (`Waitlisted`).
///
/// `scheduled_at` is pharmacy-local wall-clock time. For a waitlisted
/// booking the stored time is advisory only; it never reserves a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub service_id: Uuid,
    pub pharmacy_id: Uuid,
    pub scheduled_at: NaiveDateTime,
    pub status: BookingStatus,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn date(&self) -> NaiveDate {
        self.scheduled_at.date()
    }

    /// Time-of-day truncated to minute precision. Stored timestamps may
    /// carry seconds artifacts from the persistence layer; slot matching
    /// only ever compares hours and minutes.
    pub fn slot_time(&self) -> NaiveTime {
        truncate_to_minute(self.scheduled_at.time())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Waitlisted,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Waitlisted => write!(f, "waitlisted"),
        }
    }
}

/// Drop seconds and sub-second precision from a time of day.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}
