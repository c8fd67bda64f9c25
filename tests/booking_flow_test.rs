//! Integration tests for booking-kit
//!
//! These tests drive the full end-to-end flow through [`BookingService`]:
//! seed, login, book, list, transition, and slot reuse.

use booking_kit::backend::InMemoryBackend;
use booking_kit::seed::ReferenceSource;
use booking_kit::{
    AppointmentFilter, BookingRequest, BookingService, Error, Result, Role, Service, Status, User,
};
use chrono::{Datelike, Days, Utc};

// Fixed reference data so the tests never depend on environment variables.
struct FixtureSource;

impl ReferenceSource for FixtureSource {
    async fn load_services(&self) -> Result<Vec<Service>> {
        Ok(vec![
            Service {
                id: "SVC-001".to_string(),
                name: "Account Opening".to_string(),
            },
            Service {
                id: "SVC-002".to_string(),
                name: "Loan Application".to_string(),
            },
        ])
    }

    async fn load_users(&self) -> Result<Vec<User>> {
        Ok(vec![
            User {
                username: "admin".to_string(),
                password: "fixture-admin".to_string(),
                role: Role::Admin,
                display_name: "Admin User".to_string(),
            },
            User {
                username: "staff".to_string(),
                password: "fixture-staff".to_string(),
                role: Role::Staff,
                display_name: "Staff User".to_string(),
            },
        ])
    }
}

async fn seeded_service() -> BookingService<InMemoryBackend> {
    let _ = env_logger::builder().is_test(true).try_init();
    let service = BookingService::new(InMemoryBackend::new());
    service
        .init(&FixtureSource)
        .await
        .expect("Failed to seed reference data");
    service
}

fn future_date(days: u64) -> String {
    Utc::now()
        .date_naive()
        .checked_add_days(Days::new(days))
        .expect("date within range")
        .format("%Y-%m-%d")
        .to_string()
}

fn request(date: &str, time: &str) -> BookingRequest {
    BookingRequest {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        id_number: "AB12345".to_string(),
        phone: "0771234567".to_string(),
        service_id: "SVC-001".to_string(),
        date: date.to_string(),
        time: time.to_string(),
    }
}

/// The complete happy path: seed, book, staff login, transition, rebook.
#[tokio::test]
async fn test_end_to_end_booking_flow() {
    let service = seeded_service().await;
    let date = future_date(3);
    let year = Utc::now().date_naive().year();

    // Booking needs no session.
    let booked = service
        .book(&request(&date, "09:00 AM"))
        .await
        .expect("Booking should succeed");
    assert_eq!(booked.number, format!("APT-{}-0001", year));
    assert_eq!(booked.status, Status::Pending);
    assert_eq!(booked.service_name, "Account Opening");

    // The held slot rejects a second booking.
    let err = service
        .book(&request(&date, "09:00 AM"))
        .await
        .expect_err("Slot conflict expected");
    assert!(matches!(err, Error::Conflict(_)));

    // Staff complete the appointment.
    let session = service
        .login("staff", "fixture-staff")
        .await
        .expect("Login should succeed");
    let completed = service
        .transition(&session, &booked.id, Status::Completed)
        .await
        .expect("Transition should succeed");
    assert_eq!(completed.status, Status::Completed);
    assert!(completed.updated_at.is_some());

    // The slot is free again and numbering continues, never reusing 0001.
    let rebooked = service
        .book(&request(&date, "09:00 AM"))
        .await
        .expect("Released slot should be bookable");
    assert_eq!(rebooked.number, format!("APT-{}-0002", year));
}

#[tokio::test]
async fn test_listing_filters_and_order() {
    let service = seeded_service().await;
    let near = future_date(1);
    let far = future_date(2);

    service
        .book(&request(&far, "09:00 AM"))
        .await
        .expect("Booking should succeed");
    service
        .book(&request(&near, "02:00 PM"))
        .await
        .expect("Booking should succeed");
    let mut third = request(&near, "10:00 AM");
    third.name = "Bob Jones".to_string();
    third.email = "bob@x.com".to_string();
    service.book(&third).await.expect("Booking should succeed");

    let session = service
        .login("staff", "fixture-staff")
        .await
        .expect("Login should succeed");

    // Chronological: earlier date first, then slot order within the day.
    let all = service
        .list(&session, &AppointmentFilter::default())
        .await
        .expect("Listing should succeed");
    let times: Vec<(&str, &str)> = all
        .iter()
        .map(|a| (a.date.as_str(), a.time.as_str()))
        .collect();
    assert_eq!(
        times,
        vec![
            (near.as_str(), "10:00 AM"),
            (near.as_str(), "02:00 PM"),
            (far.as_str(), "09:00 AM"),
        ]
    );

    // Search hits any requester field, case-insensitively.
    let bobs = service
        .list(&session, &AppointmentFilter::default().search("BOB@X.COM"))
        .await
        .expect("Listing should succeed");
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].name, "Bob Jones");

    // Filters are conjunctive.
    let janes_near = service
        .list(
            &session,
            &AppointmentFilter::default()
                .search("jane")
                .date(near.clone())
                .status(Status::Pending),
        )
        .await
        .expect("Listing should succeed");
    assert_eq!(janes_near.len(), 1);
    assert_eq!(janes_near[0].time, "02:00 PM");
}

#[tokio::test]
async fn test_validation_messages_surface_through_facade() {
    let service = seeded_service().await;

    let mut bad = request(&future_date(1), "09:00 AM");
    bad.email = "not-an-email".to_string();

    let err = service
        .book(&bad)
        .await
        .expect_err("Validation failure expected");
    match err {
        Error::Validation { field, message } => {
            assert_eq!(field, "email");
            assert_eq!(message, "Please enter a valid email address.");
        }
        other => panic!("Expected Validation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_terminal_appointment_cannot_move_again() {
    let service = seeded_service().await;
    let booked = service
        .book(&request(&future_date(1), "11:15 AM"))
        .await
        .expect("Booking should succeed");

    let session = service
        .login("admin", "fixture-admin")
        .await
        .expect("Login should succeed");
    service
        .transition(&session, &booked.id, Status::Cancelled)
        .await
        .expect("Transition should succeed");

    let err = service
        .transition(&session, &booked.id, Status::Completed)
        .await
        .expect_err("Second transition must fail");
    assert!(matches!(err, Error::InvalidTransition { .. }));

    let stored = service
        .find_by_number(&booked.number)
        .await
        .expect("Appointment should exist");
    assert_eq!(stored.status, Status::Cancelled);
}

#[tokio::test]
async fn test_user_admin_through_facade() {
    let service = seeded_service().await;

    let admin = service
        .login("admin", "fixture-admin")
        .await
        .expect("Login should succeed");
    service
        .add_user(&admin, "teller1", "pw-teller", "Front Desk", Role::Staff)
        .await
        .expect("Failed to add user");

    // The new account can log in immediately.
    let teller = service
        .login("teller1", "pw-teller")
        .await
        .expect("New account should log in");
    assert_eq!(teller.role, Role::Staff);

    // And cannot manage accounts.
    let err = service
        .list_users(&teller)
        .await
        .expect_err("Staff must not list users");
    assert!(matches!(err, Error::Unauthorized(_)));

    service
        .delete_user(&admin, "teller1")
        .await
        .expect("Failed to delete user");
    assert!(service.login("teller1", "pw-teller").await.is_err());
}

#[tokio::test]
async fn test_clear_all_preserves_numbering() {
    let service = seeded_service().await;
    let year = Utc::now().date_naive().year();

    service
        .book(&request(&future_date(1), "09:00 AM"))
        .await
        .expect("Booking should succeed");
    service
        .book(&request(&future_date(1), "09:15 AM"))
        .await
        .expect("Booking should succeed");

    let admin = service
        .login("admin", "fixture-admin")
        .await
        .expect("Login should succeed");
    service.clear_all(&admin).await.expect("Failed to clear");
    assert_eq!(service.query().total().await, 0);

    // Reference data and the session survive the clear.
    assert_eq!(service.services().await.len(), 2);
    assert!(service.current_session().await.is_some());

    let next = service
        .book(&request(&future_date(1), "09:00 AM"))
        .await
        .expect("Booking should succeed");
    assert_eq!(next.number, format!("APT-{}-0003", year));
}
