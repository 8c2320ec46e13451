use super::IReminderRepo;
use chrono::NaiveDate;
use clinic_reminders_domain::{Reminder, ReminderType, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    tenant_uid: Uuid,
    appointment_uid: Option<Uuid>,
    patient_uid: Uuid,
    reminder_type: String,
    occasion: NaiveDate,
    sent_at: i64,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.reminder_uid.into(),
            tenant_id: raw.tenant_uid.into(),
            appointment_id: raw.appointment_uid.map(|uid| uid.into()),
            patient_id: raw.patient_uid.into(),
            reminder_type: raw.reminder_type.parse::<ReminderType>()?,
            occasion: raw.occasion,
            sent_at: raw.sent_at,
        })
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, tenant_uid, appointment_uid, patient_uid, reminder_type, occasion, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.tenant_id.inner_ref())
        .bind(reminder.appointment_id.as_ref().map(|id| *id.inner_ref()))
        .bind(reminder.patient_id.inner_ref())
        .bind(reminder.reminder_type.as_str())
        .bind(reminder.occasion)
        .bind(reminder.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE appointment_uid = $1
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        reminders.into_iter().map(Reminder::try_from).collect()
    }
}
