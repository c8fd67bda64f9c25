//! Read-side queries over the appointment collection.
//!
//! Filtering happens in memory over the full collection. Results are always
//! sorted chronologically: by date first, then by slot position within the
//! day, so "02:00 PM" correctly lands after "10:00 AM".

use crate::model::{Appointment, Status};
use crate::slots;
use crate::store::{Store, KEY_APPOINTMENTS};
use crate::StorageBackend;
use std::collections::BTreeMap;

/// Composable filter for appointment listings.
///
/// All criteria are optional and conjunctive: a record must match every one
/// that is set. The default filter matches everything.
#[derive(Clone, Debug, Default)]
pub struct AppointmentFilter {
    /// Case-insensitive substring matched against name, email, ID number,
    /// phone, appointment number, and service name.
    pub search: Option<String>,
    pub status: Option<Status>,
    /// Exact `YYYY-MM-DD` date.
    pub date: Option<String>,
}

impl AppointmentFilter {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    fn matches(&self, appointment: &Appointment) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = [
                &appointment.name,
                &appointment.email,
                &appointment.id_number,
                &appointment.phone,
                &appointment.number,
                &appointment.service_name,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if let Some(status) = self.status {
            if appointment.status != status {
                return false;
            }
        }

        if let Some(date) = &self.date {
            if &appointment.date != date {
                return false;
            }
        }

        true
    }
}

/// Filtered, sorted views over the appointment collection.
#[derive(Clone)]
pub struct QueryEngine<B: StorageBackend> {
    store: Store<B>,
}

impl<B: StorageBackend> QueryEngine<B> {
    pub fn new(store: Store<B>) -> Self {
        QueryEngine { store }
    }

    /// Appointments matching `filter`, sorted by date then slot position.
    ///
    /// Records whose time is not a recognized slot label sort after the
    /// recognized slots of the same date.
    pub async fn list(&self, filter: &AppointmentFilter) -> Vec<Appointment> {
        let mut matched: Vec<Appointment> = self
            .store
            .get_or(KEY_APPOINTMENTS, Vec::new())
            .await
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect();

        matched.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        matched
    }

    /// Number of appointments with the given status.
    pub async fn count_by_status(&self, status: Status) -> usize {
        self.store
            .get_or(KEY_APPOINTMENTS, Vec::<Appointment>::new())
            .await
            .iter()
            .filter(|a| a.status == status)
            .count()
    }

    /// Record counts per status, covering the whole collection.
    pub async fn status_counts(&self) -> BTreeMap<Status, usize> {
        let mut counts = BTreeMap::new();
        for appointment in self.store.get_or(KEY_APPOINTMENTS, Vec::<Appointment>::new()).await {
            *counts.entry(appointment.status).or_insert(0) += 1;
        }
        counts
    }

    /// Number of appointments on the given `YYYY-MM-DD` date.
    pub async fn count_for_date(&self, date: &str) -> usize {
        self.store
            .get_or(KEY_APPOINTMENTS, Vec::<Appointment>::new())
            .await
            .iter()
            .filter(|a| a.date == date)
            .count()
    }

    /// Size of the whole collection.
    pub async fn total(&self) -> usize {
        self.store
            .get_or(KEY_APPOINTMENTS, Vec::<Appointment>::new())
            .await
            .len()
    }
}

fn sort_key(appointment: &Appointment) -> (String, usize, String) {
    let position = slots::slot_index(&appointment.time).unwrap_or(usize::MAX);
    (
        appointment.date.clone(),
        position,
        appointment.time.clone(),
    )
}
