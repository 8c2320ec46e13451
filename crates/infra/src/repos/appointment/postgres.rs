use super::IAppointmentRepo;
use clinic_reminders_domain::{Appointment, AppointmentStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AppointmentRaw {
    appointment_uid: Uuid,
    tenant_uid: Uuid,
    patient_uid: Uuid,
    start_ts: i64,
    notes: String,
    status: String,
    cancelled_at_ts: Option<i64>,
}

impl TryFrom<AppointmentRaw> for Appointment {
    type Error = anyhow::Error;

    fn try_from(raw: AppointmentRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.appointment_uid.into(),
            tenant_id: raw.tenant_uid.into(),
            patient_id: raw.patient_uid.into(),
            start_ts: raw.start_ts,
            notes: raw.notes,
            status: raw.status.parse::<AppointmentStatus>()?,
            cancelled_at_ts: raw.cancelled_at_ts,
        })
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for PostgresAppointmentRepo {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments
            (appointment_uid, tenant_uid, patient_uid, start_ts, notes, status, cancelled_at_ts)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(appointment.id.inner_ref())
        .bind(appointment.tenant_id.inner_ref())
        .bind(appointment.patient_id.inner_ref())
        .bind(appointment.start_ts)
        .bind(&appointment.notes)
        .bind(appointment.status.as_str())
        .bind(appointment.cancelled_at_ts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE appointments SET
                start_ts = $2,
                notes = $3,
                status = $4,
                cancelled_at_ts = $5
            WHERE appointment_uid = $1
            "#,
        )
        .bind(appointment.id.inner_ref())
        .bind(appointment.start_ts)
        .bind(&appointment.notes)
        .bind(appointment.status.as_str())
        .bind(appointment.cancelled_at_ts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        sqlx::query_as::<_, AppointmentRaw>(
            r#"
            SELECT * FROM appointments
            WHERE appointment_uid = $1
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(|appointment| Appointment::try_from(appointment).ok())
    }

    async fn find_scheduled_in_range(
        &self,
        tenant_id: &ID,
        from_ts: i64,
        to_ts: i64,
    ) -> anyhow::Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, AppointmentRaw>(
            r#"
            SELECT * FROM appointments
            WHERE tenant_uid = $1
                AND status = 'scheduled'
                AND start_ts >= $2
                AND start_ts <= $3
            "#,
        )
        .bind(tenant_id.inner_ref())
        .bind(from_ts)
        .bind(to_ts)
        .fetch_all(&self.pool)
        .await?;

        appointments
            .into_iter()
            .map(Appointment::try_from)
            .collect()
    }
}
