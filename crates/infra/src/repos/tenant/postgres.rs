use super::ITenantRepo;
use clinic_reminders_domain::{Tenant, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresTenantRepo {
    pool: PgPool,
}

impl PostgresTenantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantRaw {
    tenant_uid: Uuid,
    name: String,
}

impl From<TenantRaw> for Tenant {
    fn from(raw: TenantRaw) -> Self {
        Self {
            id: raw.tenant_uid.into(),
            name: raw.name,
        }
    }
}

#[async_trait::async_trait]
impl ITenantRepo for PostgresTenantRepo {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tenants (tenant_uid, name)
            VALUES ($1, $2)
            "#,
        )
        .bind(tenant.id.inner_ref())
        .bind(&tenant.name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, tenant_id: &ID) -> Option<Tenant> {
        sqlx::query_as::<_, TenantRaw>(
            r#"
            SELECT * FROM tenants
            WHERE tenant_uid = $1
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|tenant| tenant.into())
    }

    async fn all(&self) -> anyhow::Result<Vec<Tenant>> {
        let tenants = sqlx::query_as::<_, TenantRaw>(
            r#"
            SELECT * FROM tenants
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tenants.into_iter().map(|tenant| tenant.into()).collect())
    }
}
