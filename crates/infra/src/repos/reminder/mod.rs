mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

use clinic_reminders_domain::{Reminder, ID};

/// Legacy successful-send markers. One row per delivered reminder, written
/// next to the authoritative `Succeeded` attempt.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<Reminder>>;
}
