//! Core domain types persisted and exchanged by the booking engine.
//!
//! All wire names are camelCase to stay compatible with the persisted JSON
//! documents and the export file format (`displayName`, `idNumber`,
//! `serviceName`, `createdAt`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bookable service from the static reference list.
///
/// Seeded once per storage lifetime and never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
}

/// Role attached to a staff-side account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff-side account. Passwords are stored in plaintext: credential
/// security is an explicit non-goal of this engine, matching the system it
/// models. Do not treat this as an authentication mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique key, matched case-sensitively.
    pub username: String,
    pub password: String,
    pub role: Role,
    pub display_name: String,
}

/// The single active authenticated identity, or absent when logged out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub display_name: String,
    /// RFC 3339 timestamp stamped at login.
    pub login_at: String,
}

impl Session {
    /// Require an admin session.
    pub fn require_admin(&self) -> crate::error::Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(crate::error::Error::Unauthorized(
                "Admin access required".to_string(),
            ))
        }
    }

    /// Require a staff or admin session.
    pub fn require_staff(&self) -> crate::error::Result<()> {
        match self.role {
            Role::Admin | Role::Staff => Ok(()),
        }
    }
}

/// Appointment lifecycle status.
///
/// PENDING occupies its `(date, time)` slot; the terminal states release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pending,
    Completed,
    Cancelled,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::Completed => "COMPLETED",
            Status::Cancelled => "CANCELLED",
        }
    }

    /// True for COMPLETED and CANCELLED, which admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Pending)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked appointment.
///
/// Identity fields (`id`, `number`) and requester fields are immutable after
/// creation; only `status` and `updatedAt` change, on status transitions.
///
/// Fields outside the import-required set deserialize with defaults so that
/// minimal-but-valid import payloads are accepted (the importer checks the
/// required set separately).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Opaque unique id, generated at creation.
    pub id: String,
    /// Human identifier `APT-<year>-<4-digit-seq>`, unique across the collection.
    pub number: String,
    /// Creation year, the numbering scope for the sequence counter.
    #[serde(default)]
    pub year: i32,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service_id: String,
    /// Denormalized copy of the chosen service's name at booking time.
    pub service_name: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Display-formatted slot label (e.g. `"09:15 AM"`), not a raw timestamp.
    pub time: String,
    pub status: Status,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Prefix of every appointment number.
pub const NUMBER_PREFIX: &str = "APT";

/// Parse an appointment number into its `(year, sequence)` components.
///
/// Returns `None` for anything that does not match `APT-<year>-<seq>`.
pub fn parse_number(number: &str) -> Option<(i32, u64)> {
    let rest = number.strip_prefix(NUMBER_PREFIX)?.strip_prefix('-')?;
    let (year, seq) = rest.split_once('-')?;
    Some((year.parse().ok()?, seq.parse().ok()?))
}

/// Format an appointment number from its components.
pub fn format_number(year: i32, seq: u64) -> String {
    format!("{}-{}-{:04}", NUMBER_PREFIX, year, seq)
}

/// User-supplied input for booking an appointment.
///
/// All fields arrive as raw strings; [`crate::repository::AppointmentRepository::create`]
/// validates them in a fixed order, reporting one field at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub id_number: String,
    pub phone: String,
    pub service_id: String,
    pub date: String,
    pub time: String,
}
