//! Appointment repository: create, transition, lookup.
//!
//! The appointment collection is the single source of truth, stored as one
//! JSON document. Every mutation is a full read-modify-write cycle: read the
//! collection, mutate a copy, persist the whole collection back.

use crate::error::{Error, Result};
use crate::model::{
    format_number, parse_number, Appointment, BookingRequest, Service, Status,
};
use crate::seed::default_services;
use crate::slots;
use crate::store::{Store, KEY_APPOINTMENTS, KEY_COUNTERS, KEY_SERVICES};
use crate::StorageBackend;
use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use uuid::Uuid;

/// RFC-lite email shape: something@something.tld, no whitespace.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"));

/// Per-year monotonic counters backing appointment numbering.
///
/// Persisted independently of the collection so that deletions, clears, and
/// import merges can never cause a number to be reissued.
type YearCounters = BTreeMap<i32, u64>;

/// CRUD over the appointment collection.
#[derive(Clone)]
pub struct AppointmentRepository<B: StorageBackend> {
    store: Store<B>,
}

impl<B: StorageBackend> AppointmentRepository<B> {
    pub fn new(store: Store<B>) -> Self {
        AppointmentRepository { store }
    }

    /// The full appointment collection, oldest first.
    pub async fn all(&self) -> Vec<Appointment> {
        self.store.get_or(KEY_APPOINTMENTS, Vec::new()).await
    }

    /// Book a new appointment.
    ///
    /// Inputs are validated in a fixed order (name, email, idNumber, phone,
    /// serviceId, date, time, slot availability) and validation short-circuits
    /// on the first failure, so callers receive exactly one field-level error
    /// at a time. On success the appointment is appended with status PENDING,
    /// a fresh opaque id, and the next `APT-<year>-<seq>` number.
    ///
    /// # Errors
    /// - `Error::Validation` for the first failing input field
    /// - `Error::Conflict` when a PENDING appointment already holds `(date, time)`
    /// - `Error::Backend`/`Error::Serialization` when persisting fails
    pub async fn create(&self, input: &BookingRequest) -> Result<Appointment> {
        let name = input.name.trim();
        if name.chars().count() < 2 {
            return Err(Error::validation("name", "Please enter your full name."));
        }

        let email = input.email.trim();
        if !EMAIL_RE.is_match(email) {
            return Err(Error::validation(
                "email",
                "Please enter a valid email address.",
            ));
        }

        let id_number = input.id_number.trim();
        if id_number.chars().count() < 5 {
            return Err(Error::validation(
                "idNumber",
                "Please enter a valid ID or passport number.",
            ));
        }

        let phone = input.phone.trim();
        if phone.chars().count() < 7 {
            return Err(Error::validation(
                "phone",
                "Please enter a valid phone number.",
            ));
        }

        let services: Vec<Service> = self.store.get_or(KEY_SERVICES, default_services()).await;
        let service = services
            .iter()
            .find(|s| s.id == input.service_id)
            .ok_or_else(|| Error::validation("serviceId", "Please select a service type."))?;

        let today = Utc::now().date_naive();
        let date = NaiveDate::parse_from_str(&input.date, "%Y-%m-%d")
            .ok()
            .filter(|d| *d >= today)
            .ok_or_else(|| Error::validation("date", "Please select a valid date."))?;
        // Normalized form; also used for the conflict check so padding
        // differences in the input cannot slip past it.
        let date = date.format("%Y-%m-%d").to_string();

        if !slots::is_valid_slot(&input.time) {
            return Err(Error::validation("time", "Please select a time slot."));
        }

        let mut appointments = self.all().await;
        if is_slot_taken(&appointments, &date, &input.time) {
            return Err(Error::Conflict(
                "That time slot is already booked. Please choose another time.".to_string(),
            ));
        }

        let year = today.year();
        let number = self.allocate_number(year, &appointments).await?;

        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            number: number.clone(),
            year,
            name: name.to_string(),
            email: email.to_string(),
            id_number: id_number.to_string(),
            phone: phone.to_string(),
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            date,
            time: input.time.clone(),
            status: Status::Pending,
            created_at: Utc::now().to_rfc3339(),
            updated_at: None,
        };

        appointments.push(appointment.clone());
        self.store.set(KEY_APPOINTMENTS, &appointments).await?;

        info!(
            "Booked {} for {} at {} {}",
            number, appointment.name, appointment.date, appointment.time
        );
        Ok(appointment)
    }

    /// Move a PENDING appointment to COMPLETED or CANCELLED.
    ///
    /// Terminal states admit no further transitions: a second call on the
    /// same appointment fails and the stored status keeps its first terminal
    /// value. `updatedAt` is stamped on success.
    ///
    /// # Errors
    /// - `Error::NotFound` when no appointment has the given id
    /// - `Error::InvalidTransition` when the target is PENDING or the
    ///   appointment is already terminal
    pub async fn transition(&self, id: &str, new_status: Status) -> Result<Appointment> {
        let mut appointments = self.all().await;
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound(format!("appointment {} not found", id)))?;

        if !new_status.is_terminal() || appointment.status.is_terminal() {
            return Err(Error::InvalidTransition {
                from: appointment.status,
                to: new_status,
            });
        }

        appointment.status = new_status;
        appointment.updated_at = Some(Utc::now().to_rfc3339());
        let updated = appointment.clone();

        self.store.set(KEY_APPOINTMENTS, &appointments).await?;
        info!("Appointment {} -> {}", updated.number, updated.status);
        Ok(updated)
    }

    /// Look up an appointment by its human-readable number, exact match.
    pub async fn find_by_number(&self, number: &str) -> Option<Appointment> {
        self.all().await.into_iter().find(|a| a.number == number)
    }

    /// Empty the appointment collection.
    ///
    /// Year counters are deliberately left intact: numbers issued before the
    /// clear are never reissued after it.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be written
    pub async fn clear_all(&self) -> Result<()> {
        self.store
            .set(KEY_APPOINTMENTS, &Vec::<Appointment>::new())
            .await?;
        warn!("⚠ Appointment collection cleared");
        Ok(())
    }

    /// Allocate the next number for `year` and persist the updated counter.
    ///
    /// The counter is floored at the highest sequence already present in the
    /// collection for that year, so a lost or reset counter key degrades to
    /// the collection-derived value instead of issuing a duplicate.
    async fn allocate_number(&self, year: i32, appointments: &[Appointment]) -> Result<String> {
        let mut counters: YearCounters = self.store.get_or(KEY_COUNTERS, YearCounters::new()).await;

        let floor = max_sequence_for_year(appointments, year);
        let current = counters.get(&year).copied().unwrap_or(0).max(floor);
        let seq = current + 1;

        counters.insert(year, seq);
        self.store.set(KEY_COUNTERS, &counters).await?;

        Ok(format_number(year, seq))
    }

    /// Raise the persisted counters so no future allocation collides with
    /// any of the given numbers. Used after import merges.
    pub(crate) async fn bump_counters_past<'a>(
        &self,
        numbers: impl Iterator<Item = &'a str>,
    ) -> Result<()> {
        let mut counters: YearCounters = self.store.get_or(KEY_COUNTERS, YearCounters::new()).await;
        let mut changed = false;

        for number in numbers {
            if let Some((year, seq)) = parse_number(number) {
                let entry = counters.entry(year).or_insert(0);
                if seq > *entry {
                    *entry = seq;
                    changed = true;
                }
            }
        }

        if changed {
            self.store.set(KEY_COUNTERS, &counters).await?;
        }
        Ok(())
    }
}

/// True when a PENDING appointment already occupies `(date, time)`.
///
/// COMPLETED and CANCELLED appointments release their slot.
fn is_slot_taken(appointments: &[Appointment], date: &str, time: &str) -> bool {
    appointments
        .iter()
        .any(|a| a.date == date && a.time == time && a.status == Status::Pending)
}

fn max_sequence_for_year(appointments: &[Appointment], year: i32) -> u64 {
    appointments
        .iter()
        .filter_map(|a| parse_number(&a.number))
        .filter(|(y, _)| *y == year)
        .map(|(_, seq)| seq)
        .max()
        .unwrap_or(0)
}
