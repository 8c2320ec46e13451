mod inmemory;
mod postgres;

pub use inmemory::InMemoryAppointmentRepo;
pub use postgres::PostgresAppointmentRepo;

use clinic_reminders_domain::{Appointment, ID};

#[async_trait::async_trait]
pub trait IAppointmentRepo: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()>;
    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()>;
    async fn find(&self, appointment_id: &ID) -> Option<Appointment>;
    /// Non-cancelled appointments of a tenant starting within
    /// `[from_ts, to_ts]`. This is the reminder candidate query.
    async fn find_scheduled_in_range(
        &self,
        tenant_id: &ID,
        from_ts: i64,
        to_ts: i64,
    ) -> anyhow::Result<Vec<Appointment>>;
}
