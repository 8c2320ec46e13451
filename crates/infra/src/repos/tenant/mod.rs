mod inmemory;
mod postgres;

pub use inmemory::InMemoryTenantRepo;
pub use postgres::PostgresTenantRepo;

use clinic_reminders_domain::{Tenant, ID};

#[async_trait::async_trait]
pub trait ITenantRepo: Send + Sync {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()>;
    async fn find(&self, tenant_id: &ID) -> Option<Tenant>;
    /// All tenants; the orchestrator iterates these on every tick
    async fn all(&self) -> anyhow::Result<Vec<Tenant>>;
}
