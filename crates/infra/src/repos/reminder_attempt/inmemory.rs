use super::IReminderAttemptRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::NaiveDate;
use clinic_reminders_domain::{AttemptStatus, ReminderAttempt, ReminderType, ID};

pub struct InMemoryReminderAttemptRepo {
    attempts: std::sync::Mutex<Vec<ReminderAttempt>>,
}

impl InMemoryReminderAttemptRepo {
    pub fn new() -> Self {
        Self {
            attempts: std::sync::Mutex::new(Vec::new()),
        }
    }
}

fn matches_key(
    attempt: &ReminderAttempt,
    tenant_id: &ID,
    patient_id: &ID,
    appointment_id: Option<&ID>,
    reminder_type: ReminderType,
    occasion: NaiveDate,
) -> bool {
    attempt.tenant_id == *tenant_id
        && attempt.patient_id == *patient_id
        && attempt.appointment_id.as_ref() == appointment_id
        && attempt.reminder_type == reminder_type
        && attempt.occasion == occasion
}

#[async_trait::async_trait]
impl IReminderAttemptRepo for InMemoryReminderAttemptRepo {
    async fn insert(&self, attempt: &ReminderAttempt) -> anyhow::Result<ID> {
        if attempt.status == AttemptStatus::Succeeded {
            if let Some(existing) = self
                .find_succeeded(
                    &attempt.tenant_id,
                    &attempt.patient_id,
                    attempt.appointment_id.as_ref(),
                    attempt.reminder_type,
                    attempt.occasion,
                )
                .await?
            {
                return Ok(existing.id);
            }
        }
        insert(attempt, &self.attempts);
        Ok(attempt.id.clone())
    }

    async fn find_succeeded(
        &self,
        tenant_id: &ID,
        patient_id: &ID,
        appointment_id: Option<&ID>,
        reminder_type: ReminderType,
        occasion: NaiveDate,
    ) -> anyhow::Result<Option<ReminderAttempt>> {
        let found = find_by(&self.attempts, |a| {
            a.status == AttemptStatus::Succeeded
                && matches_key(a, tenant_id, patient_id, appointment_id, reminder_type, occasion)
        });
        Ok(found.into_iter().next())
    }

    async fn find_by_appointment(
        &self,
        appointment_id: &ID,
        limit: usize,
    ) -> anyhow::Result<Vec<ReminderAttempt>> {
        let mut attempts = find_by(&self.attempts, |a| {
            a.appointment_id.as_ref() == Some(appointment_id)
        });
        attempts.sort_by(|a1, a2| a2.attempted_at.cmp(&a1.attempted_at));
        attempts.truncate(limit);
        Ok(attempts)
    }

    async fn find_by_tenant(
        &self,
        tenant_id: &ID,
        skip: usize,
        limit: usize,
    ) -> anyhow::Result<Vec<ReminderAttempt>> {
        let mut attempts = find_by(&self.attempts, |a| a.tenant_id == *tenant_id);
        attempts.sort_by(|a1, a2| a2.attempted_at.cmp(&a1.attempted_at));
        Ok(attempts.into_iter().skip(skip).take(limit).collect())
    }
}
