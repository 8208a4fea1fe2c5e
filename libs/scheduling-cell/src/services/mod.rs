pub mod availability;
pub mod booking;
pub mod recurrence;
pub mod slots;

pub use availability::{AvailabilityResolver, AvailabilityService};
pub use booking::BookingPolicyService;
pub use recurrence::RecurrenceExpander;
pub use slots::SlotGenerator;
