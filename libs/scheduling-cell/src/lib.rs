// =====================================================================================
// SCHEDULING CELL - SLOT AVAILABILITY & RECURRENCE EXPANSION ENGINE
// =====================================================================================
//
// This cell owns the temporal logic of the appointment manager:
// - Expanding recurring schedule windows into concrete dates per month
// - Deriving the bookable time slots of a day from window + service duration
// - Classifying each slot as free or occupied against the day's bookings
// - Deciding whether a booking request is confirmed, waitlisted or rejected
//
// Persistence, access control and notification delivery live with external
// collaborators behind the `SchedulingStore` seam.
//
// =====================================================================================

pub mod models;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use models::{
    BookingClassification, BookingOutcome, BookingRequest, DaySchedule,
    MonthAvailability, ScheduleWindow, SchedulingError, SchedulingRules,
    Slot, WindowConfigError, WindowIssue, WindowRule,
};

pub use services::{
    AvailabilityResolver, AvailabilityService, BookingPolicyService,
    RecurrenceExpander, SlotGenerator,
};

pub use store::{InMemoryStore, SchedulingStore, StoreError};
