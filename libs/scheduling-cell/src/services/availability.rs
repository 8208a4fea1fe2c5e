// libs/scheduling-cell/src/services/availability.rs
use chrono::{NaiveDate, NaiveTime};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::{Booking, BookingStatus, Service};

use crate::models::{DaySchedule, MonthAvailability, SchedulingError, SchedulingRules, Slot};
use crate::services::recurrence::RecurrenceExpander;
use crate::services::slots::SlotGenerator;
use crate::store::SchedulingStore;

/// Classifies generated slot starts against the day's bookings.
pub struct AvailabilityResolver;

impl AvailabilityResolver {
    pub fn new() -> Self {
        Self
    }

    /// Pure resolution: the same date, service, slot list and booking list
    /// always produce the same classification, independent of booking fetch
    /// order.
    ///
    /// A confirmed booking occupies the slot whose start equals its
    /// minute-truncated time-of-day; confirmed bookings matching no slot
    /// land in `unscheduled`. Waitlisted bookings never occupy a slot,
    /// whatever time they carry. `exclude_booking_id` vacates that booking
    /// before matching, so an edited booking cannot conflict with itself.
    pub fn resolve(
        &self,
        date: NaiveDate,
        service: &Service,
        slot_starts: &[NaiveTime],
        bookings: &[Booking],
        exclude_booking_id: Option<Uuid>,
    ) -> DaySchedule {
        let duration = service.slot_duration();

        let mut confirmed: Vec<&Booking> = Vec::new();
        let mut waitlist: Vec<Booking> = Vec::new();

        for booking in bookings {
            if exclude_booking_id == Some(booking.id) {
                continue;
            }
            if booking.service_id != service.id || booking.date() != date {
                continue;
            }
            match booking.status {
                BookingStatus::Confirmed => confirmed.push(booking),
                BookingStatus::Waitlisted => waitlist.push(booking.clone()),
            }
        }

        // Pin determinism to booking content, not fetch order.
        confirmed.sort_by_key(|booking| (booking.slot_time(), booking.id));
        waitlist.sort_by_key(|booking| (booking.scheduled_at, booking.id));

        let generated: BTreeSet<NaiveTime> = slot_starts.iter().copied().collect();
        let mut occupied: BTreeMap<NaiveTime, Booking> = BTreeMap::new();
        let mut unscheduled: Vec<Booking> = Vec::new();

        for booking in confirmed {
            let time = booking.slot_time();
            if generated.contains(&time) && !occupied.contains_key(&time) {
                occupied.insert(time, booking.clone());
            } else {
                // Outside every window, or a second confirmed booking on an
                // already-taken slot: surfaced, never silently dropped.
                warn!(
                    "Confirmed booking {} at {} matches no free slot for service {} on {}",
                    booking.id, time, service.id, date
                );
                unscheduled.push(booking.clone());
            }
        }

        let slots = slot_starts
            .iter()
            .map(|start| {
                let booking = occupied.remove(start);
                let (end_time, _) = start.overflowing_add_signed(duration);
                Slot {
                    start_time: *start,
                    end_time,
                    is_available: booking.is_none(),
                    booking,
                }
            })
            .collect();

        DaySchedule {
            service_id: service.id,
            date,
            slots,
            unscheduled,
            waitlist,
            skipped_windows: Vec::new(),
        }
    }
}

impl Default for AvailabilityResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot-fetching facade over the pure expansion, generation and
/// resolution steps. Every query re-reads the store; no scheduling state is
/// held in process.
pub struct AvailabilityService<S> {
    store: Arc<S>,
    expander: RecurrenceExpander,
    generator: SlotGenerator,
    resolver: AvailabilityResolver,
}

impl<S: SchedulingStore> AvailabilityService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            expander: RecurrenceExpander::new(),
            generator: SlotGenerator::new(),
            resolver: AvailabilityResolver::new(),
        }
    }

    pub fn with_rules(store: Arc<S>, rules: SchedulingRules) -> Self {
        Self {
            store,
            expander: RecurrenceExpander::new(),
            generator: SlotGenerator::with_rules(rules),
            resolver: AvailabilityResolver::new(),
        }
    }

    /// The dates of `year`/`month` on which the service offers at least one
    /// window. Drives the booking date picker.
    pub async fn available_dates(
        &self,
        service_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<MonthAvailability, SchedulingError> {
        debug!("Computing available dates for service {} in {}-{:02}", service_id, year, month);

        if !(1..=12).contains(&month) {
            return Err(SchedulingError::InvalidMonth(month));
        }

        let service = self.fetch_service(service_id).await?;
        let windows = self
            .store
            .windows_for_service(service.id)
            .await
            .map_err(|e| SchedulingError::Store(e.to_string()))?;

        let (dates, skipped_windows) = self.expander.month_dates(&windows, year, month);

        Ok(MonthAvailability {
            service_id: service.id,
            year,
            month,
            dates,
            skipped_windows,
        })
    }

    /// Full slot classification of one service day.
    pub async fn day_schedule(
        &self,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<DaySchedule, SchedulingError> {
        self.day_schedule_excluding(service_id, date, None).await
    }

    /// Same as [`day_schedule`](Self::day_schedule), with one booking
    /// treated as vacated before resolution (exclude-self semantics for
    /// edits).
    pub async fn day_schedule_excluding(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<DaySchedule, SchedulingError> {
        debug!("Resolving day schedule for service {} on {}", service_id, date);

        let service = self.fetch_service(service_id).await?;
        let windows = self
            .store
            .windows_for_service(service.id)
            .await
            .map_err(|e| SchedulingError::Store(e.to_string()))?;
        let bookings = self
            .store
            .bookings_for_date(service.id, date)
            .await
            .map_err(|e| SchedulingError::Store(e.to_string()))?;

        let (slot_starts, skipped_windows) = self.generator.generate(date, &service, &windows)?;

        let mut schedule =
            self.resolver
                .resolve(date, &service, &slot_starts, &bookings, exclude_booking_id);
        schedule.skipped_windows = skipped_windows;

        Ok(schedule)
    }

    pub(crate) async fn fetch_service(
        &self,
        service_id: Uuid,
    ) -> Result<Service, SchedulingError> {
        self.store
            .service(service_id)
            .await
            .map_err(|e| SchedulingError::Store(e.to_string()))?
            .ok_or(SchedulingError::ServiceNotFound)
    }
}
