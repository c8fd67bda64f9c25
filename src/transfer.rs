//! Export and import of appointment records.
//!
//! Export produces a pretty-printed JSON array of COMPLETED appointments,
//! named for the day it was produced. Import merges such an array back into
//! the collection, skipping records whose appointment number is already
//! present. Import validation is all-or-nothing: one bad element rejects the
//! whole payload and leaves storage untouched.

use crate::error::{Error, Result};
use crate::model::{Appointment, Status};
use crate::repository::AppointmentRepository;
use crate::store::{Store, KEY_APPOINTMENTS};
use crate::StorageBackend;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashSet;

/// Fields every import element must carry as non-empty strings.
const REQUIRED_FIELDS: [&str; 8] = [
    "id",
    "number",
    "name",
    "email",
    "date",
    "time",
    "serviceName",
    "status",
];

/// An export payload ready to be written wherever the caller wants it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name, `served-appointments-<YYYY-MM-DD>.json`.
    pub file_name: String,
    /// Pretty-printed JSON array of COMPLETED appointments.
    pub contents: String,
}

/// Outcome of an import merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Records appended to the collection.
    pub imported: usize,
    /// Records skipped because their number was already present.
    pub skipped: usize,
}

/// Export/import operations over the appointment collection.
#[derive(Clone)]
pub struct DataTransfer<B: StorageBackend> {
    store: Store<B>,
    repository: AppointmentRepository<B>,
}

impl<B: StorageBackend> DataTransfer<B> {
    pub fn new(store: Store<B>) -> Self {
        DataTransfer {
            repository: AppointmentRepository::new(store.clone()),
            store,
        }
    }

    /// Export all COMPLETED appointments as a dated JSON payload.
    ///
    /// Returns `Ok(None)` when there is nothing to export; no empty files.
    ///
    /// # Errors
    /// Returns `Err` if the records cannot be encoded
    pub async fn export_completed(&self) -> Result<Option<ExportFile>> {
        let completed: Vec<Appointment> = self
            .store
            .get_or(KEY_APPOINTMENTS, Vec::<Appointment>::new())
            .await
            .into_iter()
            .filter(|a| a.status == Status::Completed)
            .collect();

        if completed.is_empty() {
            info!("No completed appointments to export");
            return Ok(None);
        }

        let contents = serde_json::to_string_pretty(&completed)?;
        let file_name = format!(
            "served-appointments-{}.json",
            Utc::now().date_naive().format("%Y-%m-%d")
        );

        info!("Exported {} completed appointments", completed.len());
        Ok(Some(ExportFile {
            file_name,
            contents,
        }))
    }

    /// Merge an exported JSON array back into the collection.
    ///
    /// Records are appended in payload order; a record whose number already
    /// exists in the collection is skipped, not overwritten. The numbering
    /// counters are raised past every imported number so future bookings
    /// cannot collide with merged records.
    ///
    /// # Errors
    /// Returns `Error::Format` when the payload is not a JSON array, an
    /// element is missing a required field, or an element does not decode as
    /// an appointment record. Nothing is persisted in that case.
    pub async fn import_merge(&self, payload: &str) -> Result<ImportSummary> {
        let parsed: Value = serde_json::from_str(payload)
            .map_err(|e| Error::Format(format!("import payload is not valid JSON: {}", e)))?;

        let elements = parsed
            .as_array()
            .ok_or_else(|| Error::Format("import payload must be a JSON array".to_string()))?;

        let mut incoming = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            validate_element(index, element)?;
            let record: Appointment = serde_json::from_value(element.clone()).map_err(|e| {
                Error::Format(format!("import record {} is not valid: {}", index, e))
            })?;
            incoming.push(record);
        }

        let mut appointments = self
            .store
            .get_or(KEY_APPOINTMENTS, Vec::<Appointment>::new())
            .await;
        let mut known: HashSet<String> =
            appointments.iter().map(|a| a.number.clone()).collect();

        let mut summary = ImportSummary::default();
        let mut numbers = Vec::new();
        for record in incoming {
            if !known.insert(record.number.clone()) {
                summary.skipped += 1;
                continue;
            }
            numbers.push(record.number.clone());
            appointments.push(record);
            summary.imported += 1;
        }

        if summary.imported > 0 {
            self.store.set(KEY_APPOINTMENTS, &appointments).await?;
            self.repository
                .bump_counters_past(numbers.iter().map(String::as_str))
                .await?;
        }

        info!(
            "Import merged {} records, skipped {} duplicates",
            summary.imported, summary.skipped
        );
        Ok(summary)
    }
}

fn validate_element(index: usize, element: &Value) -> Result<()> {
    let object = element
        .as_object()
        .ok_or_else(|| Error::Format(format!("import record {} is not an object", index)))?;

    for field in REQUIRED_FIELDS {
        let present = object
            .get(field)
            .and_then(Value::as_str)
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false);
        if !present {
            return Err(Error::Format(format!(
                "import record {} is missing required field {:?}",
                index, field
            )));
        }
    }
    Ok(())
}
