use super::IReminderAttemptRepo;
use chrono::NaiveDate;
use clinic_reminders_domain::{AttemptStatus, ReminderAttempt, ReminderType, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresReminderAttemptRepo {
    pool: PgPool,
}

impl PostgresReminderAttemptRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderAttemptRaw {
    attempt_uid: Uuid,
    tenant_uid: Uuid,
    appointment_uid: Option<Uuid>,
    patient_uid: Uuid,
    reminder_type: String,
    occasion: NaiveDate,
    attempted_at: i64,
    status: String,
    reason_code: String,
    note: String,
    details: Option<serde_json::Value>,
}

impl TryFrom<ReminderAttemptRaw> for ReminderAttempt {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderAttemptRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.attempt_uid.into(),
            tenant_id: raw.tenant_uid.into(),
            appointment_id: raw.appointment_uid.map(|uid| uid.into()),
            patient_id: raw.patient_uid.into(),
            reminder_type: raw.reminder_type.parse::<ReminderType>()?,
            occasion: raw.occasion,
            attempted_at: raw.attempted_at,
            status: raw.status.parse::<AttemptStatus>()?,
            reason_code: raw.reason_code,
            note: raw.note,
            details: raw.details,
        })
    }
}

#[async_trait::async_trait]
impl IReminderAttemptRepo for PostgresReminderAttemptRepo {
    async fn insert(&self, attempt: &ReminderAttempt) -> anyhow::Result<ID> {
        // Check-then-insert; the partial unique index on succeeded attempts
        // is the backstop when two ticks race between check and insert.
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

        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO reminder_attempts
            (attempt_uid, tenant_uid, appointment_uid, patient_uid, reminder_type,
             occasion, attempted_at, status, reason_code, note, details)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT DO NOTHING
            RETURNING attempt_uid
            "#,
        )
        .bind(attempt.id.inner_ref())
        .bind(attempt.tenant_id.inner_ref())
        .bind(attempt.appointment_id.as_ref().map(|id| *id.inner_ref()))
        .bind(attempt.patient_id.inner_ref())
        .bind(attempt.reminder_type.as_str())
        .bind(attempt.occasion)
        .bind(attempt.attempted_at)
        .bind(attempt.status.as_str())
        .bind(&attempt.reason_code)
        .bind(&attempt.note)
        .bind(&attempt.details)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some((attempt_uid,)) => Ok(attempt_uid.into()),
            None => {
                // Lost the race: another tick already recorded the success
                let existing = self
                    .find_succeeded(
                        &attempt.tenant_id,
                        &attempt.patient_id,
                        attempt.appointment_id.as_ref(),
                        attempt.reminder_type,
                        attempt.occasion,
                    )
                    .await?
                    .ok_or_else(|| {
                        anyhow::anyhow!("Reminder attempt insert conflicted without a succeeded row")
                    })?;
                Ok(existing.id)
            }
        }
    }

    async fn find_succeeded(
        &self,
        tenant_id: &ID,
        patient_id: &ID,
        appointment_id: Option<&ID>,
        reminder_type: ReminderType,
        occasion: NaiveDate,
    ) -> anyhow::Result<Option<ReminderAttempt>> {
        let attempt = sqlx::query_as::<_, ReminderAttemptRaw>(
            r#"
            SELECT * FROM reminder_attempts
            WHERE tenant_uid = $1
                AND patient_uid = $2
                AND appointment_uid IS NOT DISTINCT FROM $3
                AND reminder_type = $4
                AND occasion = $5
                AND status = 'succeeded'
            "#,
        )
        .bind(tenant_id.inner_ref())
        .bind(patient_id.inner_ref())
        .bind(appointment_id_param(appointment_id))
        .bind(reminder_type.as_str())
        .bind(occasion)
        .fetch_optional(&self.pool)
        .await?;

        attempt.map(ReminderAttempt::try_from).transpose()
    }

    async fn find_by_appointment(
        &self,
        appointment_id: &ID,
        limit: usize,
    ) -> anyhow::Result<Vec<ReminderAttempt>> {
        let attempts = sqlx::query_as::<_, ReminderAttemptRaw>(
            r#"
            SELECT * FROM reminder_attempts
            WHERE appointment_uid = $1
            ORDER BY attempted_at DESC
            LIMIT $2
            "#,
        )
        .bind(appointment_id.inner_ref())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        attempts
            .into_iter()
            .map(ReminderAttempt::try_from)
            .collect()
    }

    async fn find_by_tenant(
        &self,
        tenant_id: &ID,
        skip: usize,
        limit: usize,
    ) -> anyhow::Result<Vec<ReminderAttempt>> {
        let attempts = sqlx::query_as::<_, ReminderAttemptRaw>(
            r#"
            SELECT * FROM reminder_attempts
            WHERE tenant_uid = $1
            ORDER BY attempted_at DESC
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(tenant_id.inner_ref())
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        attempts
            .into_iter()
            .map(ReminderAttempt::try_from)
            .collect()
    }
}

fn appointment_id_param(appointment_id: Option<&ID>) -> Option<Uuid> {
    appointment_id.map(|id| *id.inner_ref())
}
