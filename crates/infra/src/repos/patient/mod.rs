mod inmemory;
mod postgres;

pub use inmemory::InMemoryPatientRepo;
pub use postgres::PostgresPatientRepo;

use clinic_reminders_domain::{Patient, ID};

#[async_trait::async_trait]
pub trait IPatientRepo: Send + Sync {
    async fn insert(&self, patient: &Patient) -> anyhow::Result<()>;
    async fn find(&self, patient_id: &ID) -> Option<Patient>;
    async fn find_many(&self, patient_ids: &[ID]) -> anyhow::Result<Vec<Patient>>;
    /// Birthday reminder candidates for a tenant
    async fn find_with_birth_date(&self, tenant_id: &ID) -> anyhow::Result<Vec<Patient>>;
}
