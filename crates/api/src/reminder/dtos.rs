use chrono::NaiveDate;
use clinic_reminders_domain::{AttemptStatus, ReminderAttempt, ReminderType, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderAttemptDTO {
    pub id: ID,
    pub appointment_id: Option<ID>,
    pub patient_id: ID,
    pub reminder_type: ReminderType,
    pub occasion: NaiveDate,
    pub attempted_at: i64,
    pub status: AttemptStatus,
    pub reason_code: String,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<ReminderAttempt> for ReminderAttemptDTO {
    fn from(attempt: ReminderAttempt) -> Self {
        Self {
            id: attempt.id,
            appointment_id: attempt.appointment_id,
            patient_id: attempt.patient_id,
            reminder_type: attempt.reminder_type,
            occasion: attempt.occasion,
            attempted_at: attempt.attempted_at,
            status: attempt.status,
            reason_code: attempt.reason_code,
            note: attempt.note,
            details: attempt.details,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptsResponse {
    pub attempts: Vec<ReminderAttemptDTO>,
}

impl AttemptsResponse {
    pub fn new(attempts: Vec<ReminderAttempt>) -> Self {
        Self {
            attempts: attempts.into_iter().map(|a| a.into()).collect(),
        }
    }
}
