use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of reminders this system knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderType {
    /// Sent roughly 24 hours before an appointment
    #[serde(rename = "24h")]
    TwentyFourHours,
    /// Sent roughly 1 hour before an appointment
    #[serde(rename = "1h")]
    OneHour,
    /// Sent on the patient's birthday, not tied to an appointment
    #[serde(rename = "birthday")]
    Birthday,
}

impl ReminderType {
    /// Reminder types that are evaluated per appointment
    pub const APPOINTMENT_TYPES: [ReminderType; 2] = [Self::TwentyFourHours, Self::OneHour];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwentyFourHours => "24h",
            Self::OneHour => "1h",
            Self::Birthday => "birthday",
        }
    }
}

impl Display for ReminderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid reminder type: {0}")]
pub struct InvalidReminderTypeError(String);

impl FromStr for ReminderType {
    type Err = InvalidReminderTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Self::TwentyFourHours),
            "1h" => Ok(Self::OneHour),
            "birthday" => Ok(Self::Birthday),
            _ => Err(InvalidReminderTypeError(s.to_string())),
        }
    }
}

/// Outcome of one reminder evaluation as stored in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Succeeded,
    SkippedQuietHours,
    SkippedAlreadySent,
    FailedPrecondition,
    FailedDelivery,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::SkippedQuietHours => "skipped_quiet_hours",
            Self::SkippedAlreadySent => "skipped_already_sent",
            Self::FailedPrecondition => "failed_precondition",
            Self::FailedDelivery => "failed_delivery",
        }
    }
}

impl Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid attempt status: {0}")]
pub struct InvalidAttemptStatusError(String);

impl FromStr for AttemptStatus {
    type Err = InvalidAttemptStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "succeeded" => Ok(Self::Succeeded),
            "skipped_quiet_hours" => Ok(Self::SkippedQuietHours),
            "skipped_already_sent" => Ok(Self::SkippedAlreadySent),
            "failed_precondition" => Ok(Self::FailedPrecondition),
            "failed_delivery" => Ok(Self::FailedDelivery),
            _ => Err(InvalidAttemptStatusError(s.to_string())),
        }
    }
}

/// A `ReminderAttempt` is one row of the append-only audit trail: every
/// reminder evaluation that is due produces exactly one attempt, whether it
/// was sent, skipped or failed. Attempts are never updated or deleted.
///
/// At most one attempt with status `Succeeded` may exist per
/// (patient, appointment, reminder type, occasion) key. The `occasion` is the
/// local calendar date the reminder concerns, which disambiguates recurring
/// occasions such as yearly birthdays.
#[derive(Debug, Clone)]
pub struct ReminderAttempt {
    pub id: ID,
    pub tenant_id: ID,
    /// Absent for patient-level reminders such as birthdays
    pub appointment_id: Option<ID>,
    pub patient_id: ID,
    pub reminder_type: ReminderType,
    pub occasion: NaiveDate,
    /// UTC timestamp in millis at which the decision was made
    pub attempted_at: i64,
    pub status: AttemptStatus,
    /// Stable machine-readable reason, e.g. "quiet_hours" or "missing_phone"
    pub reason_code: String,
    /// Short human-readable explanation for the audit view
    pub note: String,
    /// Open-ended debugging context, e.g. the delivery error detail
    pub details: Option<serde_json::Value>,
}

impl Entity for ReminderAttempt {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Legacy marker written next to every `Succeeded` attempt. It acts as a
/// secondary confirmation index; the attempt log is authoritative.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: ID,
    pub tenant_id: ID,
    pub appointment_id: Option<ID>,
    pub patient_id: ID,
    pub reminder_type: ReminderType,
    pub occasion: NaiveDate,
    pub sent_at: i64,
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}
