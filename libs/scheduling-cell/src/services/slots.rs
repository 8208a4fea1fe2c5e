// libs/scheduling-cell/src/services/slots.rs
use chrono::{Duration, NaiveDate, NaiveTime};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use shared_models::Service;

use crate::models::{ScheduleWindow, SchedulingError, SchedulingRules, WindowIssue};

/// Derives the bookable slot start-times of one date from the service
/// duration and its schedule windows.
pub struct SlotGenerator {
    rules: SchedulingRules,
}

impl SlotGenerator {
    pub fn new() -> Self {
        Self { rules: SchedulingRules::default() }
    }

    pub fn with_rules(rules: SchedulingRules) -> Self {
        Self { rules }
    }

    /// Generate the ordered slot start-times for `date`.
    ///
    /// Per applicable window, successive starts are spaced one service
    /// duration apart while `start + duration <= end`; a trailing remainder
    /// shorter than one duration is discarded, never emitted as a short
    /// slot. Starts produced by overlapping windows appear once, ascending,
    /// independent of window declaration order. No applicable windows means
    /// an empty sequence, not an error.
    pub fn generate(
        &self,
        date: NaiveDate,
        service: &Service,
        windows: &[ScheduleWindow],
    ) -> Result<(Vec<NaiveTime>, Vec<WindowIssue>), SchedulingError> {
        let duration = self.slot_duration(service)?;

        let mut starts = BTreeSet::new();
        let mut skipped = Vec::new();

        for window in windows {
            if let Err(error) = window.validate() {
                warn!("Skipping malformed schedule window {}: {}", window.id, error);
                skipped.push(WindowIssue { window_id: window.id, error });
                continue;
            }
            if !window.applies_on(date) {
                continue;
            }

            let mut cursor = window.start_time;
            loop {
                let (slot_end, wrapped) = cursor.overflowing_add_signed(duration);
                if wrapped != 0 || slot_end > window.end_time {
                    break;
                }
                starts.insert(cursor);
                cursor = slot_end;
            }
        }

        debug!(
            "Generated {} slot starts for service {} on {}",
            starts.len(),
            service.id,
            date
        );

        Ok((starts.into_iter().collect(), skipped))
    }

    fn slot_duration(&self, service: &Service) -> Result<Duration, SchedulingError> {
        let minutes = service.duration_minutes;
        if minutes < self.rules.min_slot_minutes || minutes > self.rules.max_slot_minutes {
            return Err(SchedulingError::InvalidDuration {
                actual: minutes,
                min: self.rules.min_slot_minutes,
                max: self.rules.max_slot_minutes,
            });
        }
        Ok(Duration::minutes(minutes as i64))
    }
}

impl Default for SlotGenerator {
    fn default() -> Self {
        Self::new()
    }
}
