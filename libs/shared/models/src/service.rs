// libs/shared/models/src/service.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable pharmacy service (vaccination, medication review, ...).
///
/// `duration_minutes` is the fixed slot length every booking of this
/// service occupies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub pharmacy_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Calendar display palette; indexed by a stable hash of the service id.
const SERVICE_PALETTE: [&str; 8] = [
    "#1f77b4", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#17becf", "#bcbd22",
];

impl Service {
    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes as i64)
    }

    /// Deterministic display color for calendar views. A pure function of
    /// the service id, so every caller renders the same service the same
    /// way without any process-wide lookup table.
    pub fn display_color(&self) -> &'static str {
        let index = self
            .id
            .as_bytes()
            .iter()
            .fold(0usize, |acc, byte| acc.wrapping_mul(31).wrapping_add(*byte as usize));
        SERVICE_PALETTE[index % SERVICE_PALETTE.len()]
    }
}
