// libs/scheduling-cell/src/services/booking.rs
use std::sync::Arc;
use tracing::{debug, info};

use shared_models::truncate_to_minute;

use crate::models::{BookingClassification, BookingRequest, SchedulingError, SchedulingRules};
use crate::services::availability::AvailabilityService;
use crate::store::SchedulingStore;

/// Decides whether a booking request is confirmed, waitlisted or rejected.
///
/// Classification only: persistence of the resulting booking is the
/// caller's collaborator's job, including failing the write when another
/// client confirmed the same slot between this snapshot and the commit.
pub struct BookingPolicyService<S> {
    availability: AvailabilityService<S>,
}

impl<S: SchedulingStore> BookingPolicyService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { availability: AvailabilityService::new(store) }
    }

    pub fn with_rules(store: Arc<S>, rules: SchedulingRules) -> Self {
        Self { availability: AvailabilityService::with_rules(store, rules) }
    }

    /// Classify a booking request against a fresh snapshot.
    ///
    /// Structural violations reject outright. Otherwise a free slot at the
    /// requested time confirms; an occupied or non-existent slot waitlists
    /// only when the caller explicitly opted in, and rejects with the
    /// reason otherwise.
    pub async fn classify(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingClassification, SchedulingError> {
        debug!(
            "Classifying booking request for service {} on {} at {}",
            request.service_id, request.date, request.time
        );

        if request.client_name.trim().is_empty() {
            return Ok(BookingClassification::rejected("client name is required"));
        }

        let service = self.availability.fetch_service(request.service_id).await?;
        if service.pharmacy_id != request.pharmacy_id {
            return Ok(BookingClassification::rejected(
                "service does not belong to the selected pharmacy",
            ));
        }

        let schedule = self
            .availability
            .day_schedule_excluding(request.service_id, request.date, request.exclude_booking_id)
            .await?;

        let requested = truncate_to_minute(request.time);
        let classification = match schedule.slots.iter().find(|slot| slot.start_time == requested) {
            Some(slot) if slot.is_available => BookingClassification::confirmed(),
            Some(_) if request.allow_waitlist => BookingClassification::waitlisted("slot occupied"),
            Some(_) => BookingClassification::rejected("slot occupied"),
            None if request.allow_waitlist => {
                BookingClassification::waitlisted("no bookable slot at the requested time")
            }
            None => BookingClassification::rejected("no bookable slot at the requested time"),
        };

        info!(
            "Booking request for service {} on {} at {} classified as {}",
            request.service_id, request.date, requested, classification.outcome
        );

        Ok(classification)
    }
}
