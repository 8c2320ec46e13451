use crate::shared::entity::{Entity, ID};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid appointment status: {0}")]
pub struct InvalidAppointmentStatusError(String);

impl FromStr for AppointmentStatus {
    type Err = InvalidAppointmentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(InvalidAppointmentStatusError(s.to_string())),
        }
    }
}

/// An `Appointment` is a scheduled visit of a `Patient` at a clinic.
/// Appointments are created and cancelled by flows outside of this core,
/// which only reads them to decide reminder eligibility. Cancellation is
/// terminal and permanently excludes the appointment from reminders.
#[derive(Debug, Clone)]
pub struct Appointment {
    pub id: ID,
    pub tenant_id: ID,
    pub patient_id: ID,
    /// UTC timestamp in millis at which the appointment starts
    pub start_ts: i64,
    pub notes: String,
    pub status: AppointmentStatus,
    pub cancelled_at_ts: Option<i64>,
}

impl Appointment {
    pub fn new(tenant_id: &ID, patient_id: &ID, start_ts: i64) -> Self {
        Self {
            id: Default::default(),
            tenant_id: tenant_id.clone(),
            patient_id: patient_id.clone(),
            start_ts,
            notes: String::new(),
            status: AppointmentStatus::Scheduled,
            cancelled_at_ts: None,
        }
    }

    pub fn cancel(&mut self, at_ts: i64) {
        if self.is_cancelled() {
            return;
        }
        self.status = AppointmentStatus::Cancelled;
        self.cancelled_at_ts = Some(at_ts);
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }
}

impl Entity for Appointment {
    fn id(&self) -> &ID {
        &self.id
    }
}
