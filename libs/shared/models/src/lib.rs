pub mod booking;
pub mod service;

// Re-export the cross-cell entities for external use
pub use booking::{truncate_to_minute, Booking, BookingStatus};
pub use service::Service;
