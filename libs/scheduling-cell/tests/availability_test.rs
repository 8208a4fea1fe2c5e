// libs/scheduling-cell/tests/availability_test.rs
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use scheduling_cell::models::{ScheduleWindow, SchedulingError, WindowRule};
use scheduling_cell::services::AvailabilityService;
use scheduling_cell::store::InMemoryStore;
use shared_models::{Booking, BookingStatus, Service};

// 2024-03-11 is a Monday
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn service(duration_minutes: i32) -> Service {
    Service {
        id: Uuid::new_v4(),
        pharmacy_id: Uuid::new_v4(),
        name: "Medication review".to_string(),
        description: None,
        duration_minutes,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn monday_window(service_id: Uuid) -> ScheduleWindow {
    ScheduleWindow {
        id: Uuid::new_v4(),
        service_id,
        rule: WindowRule::Recurring { day_of_week: 1, week_of_month: None },
        start_time: time(9, 0),
        end_time: time(11, 0),
    }
}

fn booking(svc: &Service, at: (u32, u32, u32), status: BookingStatus) -> Booking {
    Booking {
        id: Uuid::new_v4(),
        service_id: svc.id,
        pharmacy_id: svc.pharmacy_id,
        scheduled_at: monday().and_hms_opt(at.0, at.1, at.2).unwrap(),
        status,
        client_name: "Maria Rossi".to_string(),
        client_email: Some("maria@example.com".to_string()),
        client_phone: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn setup(svc: &Service) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.insert_service(svc.clone()).await;
    store.insert_window(monday_window(svc.id)).await;
    store
}

#[tokio::test]
async fn confirmed_booking_occupies_exactly_its_slot() {
    let svc = service(30);
    let store = setup(&svc).await;
    let booked = booking(&svc, (9, 30, 0), BookingStatus::Confirmed);
    store.insert_booking(booked.clone()).await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let schedule = availability.day_schedule(svc.id, monday()).await.unwrap();

    assert_eq!(schedule.slots.len(), 4);
    for slot in &schedule.slots {
        if slot.start_time == time(9, 30) {
            assert!(!slot.is_available);
            assert_eq!(slot.booking.as_ref().map(|b| b.id), Some(booked.id));
        } else {
            assert!(slot.is_available);
            assert!(slot.booking.is_none());
        }
    }
    assert!(schedule.unscheduled.is_empty());
    assert!(schedule.waitlist.is_empty());
}

#[tokio::test]
async fn waitlisted_booking_never_blocks_a_slot() {
    let svc = service(30);
    let store = setup(&svc).await;
    store
        .insert_booking(booking(&svc, (10, 0, 0), BookingStatus::Waitlisted))
        .await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let schedule = availability.day_schedule(svc.id, monday()).await.unwrap();

    assert!(schedule.slots.iter().all(|slot| slot.is_available));
    assert_eq!(schedule.waitlist.len(), 1);
}

#[tokio::test]
async fn confirmed_booking_outside_windows_is_surfaced_not_dropped() {
    let svc = service(30);
    let store = setup(&svc).await;
    let orphan = booking(&svc, (13, 0, 0), BookingStatus::Confirmed);
    store.insert_booking(orphan.clone()).await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let schedule = availability.day_schedule(svc.id, monday()).await.unwrap();

    assert!(schedule.slots.iter().all(|slot| slot.is_available));
    assert_eq!(schedule.unscheduled.len(), 1);
    assert_eq!(schedule.unscheduled[0].id, orphan.id);
}

#[tokio::test]
async fn stored_seconds_do_not_break_slot_matching() {
    let svc = service(30);
    let store = setup(&svc).await;
    store
        .insert_booking(booking(&svc, (9, 30, 27), BookingStatus::Confirmed))
        .await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let schedule = availability.day_schedule(svc.id, monday()).await.unwrap();

    let slot = schedule
        .slots
        .iter()
        .find(|slot| slot.start_time == time(9, 30))
        .unwrap();
    assert!(!slot.is_available);
}

#[tokio::test]
async fn day_schedule_is_idempotent_for_unchanged_inputs() {
    let svc = service(30);
    let store = setup(&svc).await;
    store
        .insert_booking(booking(&svc, (9, 30, 0), BookingStatus::Confirmed))
        .await;
    store
        .insert_booking(booking(&svc, (10, 0, 0), BookingStatus::Waitlisted))
        .await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let first = availability.day_schedule(svc.id, monday()).await.unwrap();
    let second = availability.day_schedule(svc.id, monday()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn excluded_booking_is_treated_as_vacated() {
    let svc = service(30);
    let store = setup(&svc).await;
    let booked = booking(&svc, (9, 30, 0), BookingStatus::Confirmed);
    store.insert_booking(booked.clone()).await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let schedule = availability
        .day_schedule_excluding(svc.id, monday(), Some(booked.id))
        .await
        .unwrap();

    assert!(schedule.slots.iter().all(|slot| slot.is_available));
    assert!(schedule.unscheduled.is_empty());
}

#[tokio::test]
async fn duplicate_confirmed_bookings_resolve_deterministically() {
    let svc = service(30);
    let store = setup(&svc).await;
    store
        .insert_booking(booking(&svc, (9, 30, 0), BookingStatus::Confirmed))
        .await;
    store
        .insert_booking(booking(&svc, (9, 30, 0), BookingStatus::Confirmed))
        .await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let schedule = availability.day_schedule(svc.id, monday()).await.unwrap();

    let occupied = schedule.slots.iter().filter(|slot| !slot.is_available).count();
    assert_eq!(occupied, 1);
    assert_eq!(schedule.unscheduled.len(), 1);
}

#[tokio::test]
async fn available_dates_merge_recurring_and_specific_windows() {
    let svc = service(30);
    let store = setup(&svc).await;
    store
        .insert_window(ScheduleWindow {
            id: Uuid::new_v4(),
            service_id: svc.id,
            rule: WindowRule::Specific { date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap() },
            start_time: time(14, 0),
            end_time: time(16, 0),
        })
        .await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let month = availability.available_dates(svc.id, 2024, 3).await.unwrap();

    let expected: Vec<NaiveDate> = [4, 11, 15, 18, 25]
        .iter()
        .map(|day| NaiveDate::from_ymd_opt(2024, 3, *day).unwrap())
        .collect();
    assert_eq!(month.dates, expected);
    assert!(month.skipped_windows.is_empty());
}

#[tokio::test]
async fn malformed_window_is_reported_alongside_valid_dates() {
    let svc = service(30);
    let store = setup(&svc).await;
    store
        .insert_window(ScheduleWindow {
            id: Uuid::new_v4(),
            service_id: svc.id,
            rule: WindowRule::Recurring { day_of_week: 2, week_of_month: None },
            start_time: time(16, 0),
            end_time: time(14, 0),
        })
        .await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let month = availability.available_dates(svc.id, 2024, 3).await.unwrap();

    assert_eq!(month.dates.len(), 4);
    assert_eq!(month.skipped_windows.len(), 1);
}

#[tokio::test]
async fn month_without_matching_recurrence_is_empty_not_an_error() {
    let svc = service(30);
    let store = Arc::new(InMemoryStore::new());
    store.insert_service(svc.clone()).await;
    store
        .insert_window(ScheduleWindow {
            id: Uuid::new_v4(),
            service_id: svc.id,
            rule: WindowRule::Recurring { day_of_week: 5, week_of_month: Some(5) },
            start_time: time(9, 0),
            end_time: time(11, 0),
        })
        .await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    // February 2024 has only four Fridays
    let month = availability.available_dates(svc.id, 2024, 2).await.unwrap();

    assert!(month.dates.is_empty());
    assert!(month.skipped_windows.is_empty());
}

#[tokio::test]
async fn out_of_range_month_is_rejected() {
    let svc = service(30);
    let store = setup(&svc).await;

    let availability = AvailabilityService::new(Arc::clone(&store));
    let result = availability.available_dates(svc.id, 2024, 13).await;

    assert_matches!(result, Err(SchedulingError::InvalidMonth(13)));
}

#[tokio::test]
async fn unknown_service_is_an_error() {
    let store = Arc::new(InMemoryStore::new());
    let availability = AvailabilityService::new(Arc::clone(&store));

    let result = availability.day_schedule(Uuid::new_v4(), monday()).await;

    assert_matches!(result, Err(SchedulingError::ServiceNotFound));
}
