// libs/scheduling-cell/src/store.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared_models::{Booking, Service};

use crate::models::ScheduleWindow;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Read-side snapshot access to the scheduling data owned by the
/// persistence collaborator.
///
/// The engine re-fetches a fresh snapshot for every query and never writes.
/// Two concurrent callers can therefore observe the same slot as free; the
/// store must enforce uniqueness of (service, date, confirmed slot-time) at
/// write time and surface the violation, so the caller re-queries and may
/// offer the waitlist instead.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn service(&self, service_id: Uuid) -> Result<Option<Service>, StoreError>;

    async fn windows_for_service(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<ScheduleWindow>, StoreError>;

    async fn bookings_for_date(
        &self,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError>;
}

/// In-memory store backing the integration tests; doubles as the reference
/// implementation of the persistence seam.
#[derive(Default)]
pub struct InMemoryStore {
    services: RwLock<HashMap<Uuid, Service>>,
    windows: RwLock<Vec<ScheduleWindow>>,
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_service(&self, service: Service) {
        self.services.write().await.insert(service.id, service);
    }

    pub async fn insert_window(&self, window: ScheduleWindow) {
        self.windows.write().await.push(window);
    }

    pub async fn insert_booking(&self, booking: Booking) {
        self.bookings.write().await.push(booking);
    }

    pub async fn remove_booking(&self, booking_id: Uuid) {
        self.bookings.write().await.retain(|booking| booking.id != booking_id);
    }
}

#[async_trait]
impl SchedulingStore for InMemoryStore {
    async fn service(&self, service_id: Uuid) -> Result<Option<Service>, StoreError> {
        Ok(self.services.read().await.get(&service_id).cloned())
    }

    async fn windows_for_service(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<ScheduleWindow>, StoreError> {
        Ok(self
            .windows
            .read()
            .await
            .iter()
            .filter(|window| window.service_id == service_id)
            .cloned()
            .collect())
    }

    async fn bookings_for_date(
        &self,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|booking| booking.service_id == service_id && booking.date() == date)
            .cloned()
            .collect())
    }
}
