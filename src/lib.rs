//! # booking-kit
//!
//! A type-safe, storage-agnostic appointment booking engine for Rust.
//!
//! ## Features
//!
//! - **Backend Agnostic:** Support for in-memory, JSON-file, and custom storage backends
//! - **Slot-Exclusive Booking:** One PENDING appointment per `(date, time)` slot
//! - **Durable Numbering:** `APT-<year>-<seq>` numbers from persisted per-year counters, never reissued
//! - **Filtered Views:** Search, status, and date filters with chronological ordering
//! - **Data Portability:** Export COMPLETED records and merge them back, duplicate-safe
//! - **Role Enforcement:** Public booking, staff transitions, admin-only data management
//!
//! ## Quick Start
//!
//! Use [`BookingService`] as the single entry point:
//!
//! ```no_run
//! use booking_kit::{BookingService, BookingRequest, Status};
//! use booking_kit::backend::InMemoryBackend;
//! use booking_kit::seed::BuiltinDefaults;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Create the service over a backend (swap in JsonFileBackend to persist)
//!     let service = BookingService::new(InMemoryBackend::new());
//!
//!     // 2. Seed services and accounts, once per storage lifetime
//!     service.init(&BuiltinDefaults).await?;
//!
//!     // 3. Book - no session needed
//!     let appointment = service
//!         .book(&BookingRequest {
//!             name: "Jane Doe".into(),
//!             email: "jane@example.com".into(),
//!             id_number: "AB12345".into(),
//!             phone: "0771234567".into(),
//!             service_id: "SVC-001".into(),
//!             date: "2026-09-01".into(),
//!             time: "09:00 AM".into(),
//!         })
//!         .await?;
//!     println!("Booked {}", appointment.number); // APT-2026-0001
//!
//!     // 4. Staff complete it - BookingService is Clone for thread sharing
//!     let session = service.login("staff", "staff123").await?;
//!     service.transition(&session, &appointment.id, Status::Completed).await?;
//!
//!     Ok(())
//! }
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod error;
pub mod model;
pub mod query;
pub mod repository;
pub mod seed;
pub mod service;
pub mod session;
pub mod slots;
pub mod store;
pub mod transfer;
pub mod users;

// Re-exports for convenience
pub use backend::{InMemoryBackend, JsonFileBackend, StorageBackend};
pub use error::{Error, Result};
pub use model::{Appointment, BookingRequest, Role, Service, Session, Status, User};
pub use query::{AppointmentFilter, QueryEngine};
pub use repository::AppointmentRepository;
pub use seed::{BuiltinDefaults, ReferenceSource, SeedLoader};
pub use service::BookingService;
pub use session::SessionStore;
pub use store::Store;
pub use transfer::{DataTransfer, ExportFile, ImportSummary};
pub use users::UserAdmin;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
