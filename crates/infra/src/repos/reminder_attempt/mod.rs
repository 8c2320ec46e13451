mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderAttemptRepo;
pub use postgres::PostgresReminderAttemptRepo;

use chrono::NaiveDate;
use clinic_reminders_domain::{ReminderAttempt, ReminderType, ID};

/// Append-only store of reminder decisions. There is no update or delete:
/// corrections are new rows. `insert` guarantees that at most one `Succeeded`
/// attempt exists per (tenant, patient, appointment, type, occasion) key,
/// even when ticks overlap.
#[async_trait::async_trait]
pub trait IReminderAttemptRepo: Send + Sync {
    /// Persists the attempt and returns its id. When a `Succeeded` attempt
    /// for the same key already exists, the existing id is returned and
    /// nothing is written.
    async fn insert(&self, attempt: &ReminderAttempt) -> anyhow::Result<ID>;

    async fn find_succeeded(
        &self,
        tenant_id: &ID,
        patient_id: &ID,
        appointment_id: Option<&ID>,
        reminder_type: ReminderType,
        occasion: NaiveDate,
    ) -> anyhow::Result<Option<ReminderAttempt>>;

    /// Audit view: attempts for one appointment, newest first
    async fn find_by_appointment(
        &self,
        appointment_id: &ID,
        limit: usize,
    ) -> anyhow::Result<Vec<ReminderAttempt>>;

    /// Audit view: paginated attempts for one tenant, newest first
    async fn find_by_tenant(
        &self,
        tenant_id: &ID,
        skip: usize,
        limit: usize,
    ) -> anyhow::Result<Vec<ReminderAttempt>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_reminders_domain::AttemptStatus;

    fn attempt(status: AttemptStatus, attempted_at: i64) -> ReminderAttempt {
        ReminderAttempt {
            id: Default::default(),
            tenant_id: Default::default(),
            appointment_id: Some(Default::default()),
            patient_id: Default::default(),
            reminder_type: ReminderType::TwentyFourHours,
            occasion: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
            attempted_at,
            status,
            reason_code: "sent".to_string(),
            note: "Reminder delivered".to_string(),
            details: None,
        }
    }

    #[tokio::test]
    async fn insert_is_idempotent_for_succeeded_attempts() {
        let repo = InMemoryReminderAttemptRepo::new();

        let first = attempt(AttemptStatus::Succeeded, 100);
        let first_id = repo.insert(&first).await.unwrap();
        assert_eq!(first_id, first.id);

        // Same key, different row id: the existing id wins
        let mut second = attempt(AttemptStatus::Succeeded, 200);
        second.tenant_id = first.tenant_id.clone();
        second.patient_id = first.patient_id.clone();
        second.appointment_id = first.appointment_id.clone();
        let second_id = repo.insert(&second).await.unwrap();
        assert_eq!(second_id, first_id);

        let found = repo
            .find_succeeded(
                &first.tenant_id,
                &first.patient_id,
                first.appointment_id.as_ref(),
                ReminderType::TwentyFourHours,
                first.occasion,
            )
            .await
            .unwrap()
            .expect("Succeeded attempt to exist");
        assert_eq!(found.id, first_id);
    }

    #[tokio::test]
    async fn non_success_attempts_accumulate() {
        let repo = InMemoryReminderAttemptRepo::new();

        let first = attempt(AttemptStatus::SkippedQuietHours, 100);
        let mut second = attempt(AttemptStatus::SkippedQuietHours, 200);
        second.tenant_id = first.tenant_id.clone();
        second.patient_id = first.patient_id.clone();
        second.appointment_id = first.appointment_id.clone();

        repo.insert(&first).await.unwrap();
        repo.insert(&second).await.unwrap();

        let appointment_id = first.appointment_id.clone().unwrap();
        let attempts = repo.find_by_appointment(&appointment_id, 10).await.unwrap();
        assert_eq!(attempts.len(), 2);
        // Newest first
        assert_eq!(attempts[0].attempted_at, 200);
        assert_eq!(attempts[1].attempted_at, 100);
    }

    #[tokio::test]
    async fn tenant_feed_is_paginated() {
        let repo = InMemoryReminderAttemptRepo::new();
        let tenant_id = ID::default();

        for i in 0..5 {
            let mut a = attempt(AttemptStatus::FailedDelivery, i);
            a.tenant_id = tenant_id.clone();
            repo.insert(&a).await.unwrap();
        }

        let page = repo.find_by_tenant(&tenant_id, 1, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].attempted_at, 3);
        assert_eq!(page[1].attempted_at, 2);
    }

    #[tokio::test]
    async fn succeeded_lookup_distinguishes_occasions() {
        let repo = InMemoryReminderAttemptRepo::new();

        let first = attempt(AttemptStatus::Succeeded, 100);
        repo.insert(&first).await.unwrap();

        let other_occasion = repo
            .find_succeeded(
                &first.tenant_id,
                &first.patient_id,
                first.appointment_id.as_ref(),
                ReminderType::TwentyFourHours,
                NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            )
            .await
            .unwrap();
        assert!(other_occasion.is_none());

        let other_type = repo
            .find_succeeded(
                &first.tenant_id,
                &first.patient_id,
                first.appointment_id.as_ref(),
                ReminderType::OneHour,
                first.occasion,
            )
            .await
            .unwrap();
        assert!(other_type.is_none());
    }
}
