use super::dtos::AttemptsResponse;
use crate::error::ClinicError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use clinic_reminders_domain::{ReminderAttempt, ID};
use clinic_reminders_infra::ClinicContext;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PathParams {
    tenant_id: ID,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    skip: Option<usize>,
    limit: Option<usize>,
}

pub async fn get_tenant_attempts_controller(
    path: web::Path<PathParams>,
    query: web::Query<QueryParams>,
    ctx: web::Data<ClinicContext>,
) -> Result<HttpResponse, ClinicError> {
    let usecase = GetTenantAttemptsUseCase {
        tenant_id: path.tenant_id.clone(),
        skip: query.skip.unwrap_or(0),
        limit: query.limit.unwrap_or(20).min(100),
    };

    execute(usecase, &ctx)
        .await
        .map(|attempts| HttpResponse::Ok().json(AttemptsResponse::new(attempts)))
        .map_err(|e| match e {
            UseCaseError::TenantNotFound(id) => {
                ClinicError::NotFound(format!("Tenant with id: {} was not found", id))
            }
            UseCaseError::StorageError => ClinicError::InternalError,
        })
}

/// Audit view: the reminder decisions recorded across one tenant, newest
/// first, paginated with skip/limit.
#[derive(Debug)]
pub struct GetTenantAttemptsUseCase {
    pub tenant_id: ID,
    pub skip: usize,
    pub limit: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    TenantNotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTenantAttemptsUseCase {
    type Response = Vec<ReminderAttempt>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetTenantAttempts";

    async fn execute(&mut self, ctx: &ClinicContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.tenants.find(&self.tenant_id).await.is_none() {
            return Err(UseCaseError::TenantNotFound(self.tenant_id.clone()));
        }

        ctx.repos
            .reminder_attempts
            .find_by_tenant(&self.tenant_id, self.skip, self.limit)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clinic_reminders_domain::{AttemptStatus, ReminderType, Tenant};

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_tenant() {
        let ctx = ClinicContext::create_inmemory();
        let mut usecase = GetTenantAttemptsUseCase {
            tenant_id: Default::default(),
            skip: 0,
            limit: 20,
        };
        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::TenantNotFound(_))));
    }

    #[actix_web::main]
    #[test]
    async fn paginates_newest_first() {
        let ctx = ClinicContext::create_inmemory();
        let tenant = Tenant::new("Sunrise Clinic");
        ctx.repos.tenants.insert(&tenant).await.unwrap();

        for attempted_at in [100, 200, 300] {
            let attempt = ReminderAttempt {
                id: Default::default(),
                tenant_id: tenant.id.clone(),
                appointment_id: None,
                patient_id: Default::default(),
                reminder_type: ReminderType::Birthday,
                occasion: chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                attempted_at,
                status: AttemptStatus::SkippedQuietHours,
                reason_code: "quiet_hours".to_string(),
                note: String::new(),
                details: None,
            };
            ctx.repos.reminder_attempts.insert(&attempt).await.unwrap();
        }

        let mut usecase = GetTenantAttemptsUseCase {
            tenant_id: tenant.id.clone(),
            skip: 1,
            limit: 1,
        };
        let attempts = usecase.execute(&ctx).await.unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].attempted_at, 200);
    }
}
