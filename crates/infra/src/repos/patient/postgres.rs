use super::IPatientRepo;
use chrono::NaiveDate;
use clinic_reminders_domain::{Patient, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresPatientRepo {
    pool: PgPool,
}

impl PostgresPatientRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PatientRaw {
    patient_uid: Uuid,
    tenant_uid: Uuid,
    phone: String,
    name: Option<String>,
    birth_date: Option<NaiveDate>,
}

impl From<PatientRaw> for Patient {
    fn from(raw: PatientRaw) -> Self {
        Self {
            id: raw.patient_uid.into(),
            tenant_id: raw.tenant_uid.into(),
            phone: raw.phone,
            name: raw.name,
            birth_date: raw.birth_date,
        }
    }
}

#[async_trait::async_trait]
impl IPatientRepo for PostgresPatientRepo {
    async fn insert(&self, patient: &Patient) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO patients (patient_uid, tenant_uid, phone, name, birth_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(patient.id.inner_ref())
        .bind(patient.tenant_id.inner_ref())
        .bind(&patient.phone)
        .bind(&patient.name)
        .bind(patient.birth_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, patient_id: &ID) -> Option<Patient> {
        sqlx::query_as::<_, PatientRaw>(
            r#"
            SELECT * FROM patients
            WHERE patient_uid = $1
            "#,
        )
        .bind(patient_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|patient| patient.into())
    }

    async fn find_many(&self, patient_ids: &[ID]) -> anyhow::Result<Vec<Patient>> {
        let ids = patient_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let patients = sqlx::query_as::<_, PatientRaw>(
            r#"
            SELECT * FROM patients
            WHERE patient_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(patients.into_iter().map(|patient| patient.into()).collect())
    }

    async fn find_with_birth_date(&self, tenant_id: &ID) -> anyhow::Result<Vec<Patient>> {
        let patients = sqlx::query_as::<_, PatientRaw>(
            r#"
            SELECT * FROM patients
            WHERE tenant_uid = $1 AND birth_date IS NOT NULL
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(patients.into_iter().map(|patient| patient.into()).collect())
    }
}
