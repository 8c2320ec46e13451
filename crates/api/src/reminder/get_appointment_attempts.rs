use super::dtos::AttemptsResponse;
use crate::error::ClinicError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use clinic_reminders_domain::{ReminderAttempt, ID};
use clinic_reminders_infra::ClinicContext;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PathParams {
    appointment_id: ID,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    limit: Option<usize>,
}

pub async fn get_appointment_attempts_controller(
    path: web::Path<PathParams>,
    query: web::Query<QueryParams>,
    ctx: web::Data<ClinicContext>,
) -> Result<HttpResponse, ClinicError> {
    let usecase = GetAppointmentAttemptsUseCase {
        appointment_id: path.appointment_id.clone(),
        limit: query.limit.unwrap_or(20).min(100),
    };

    execute(usecase, &ctx)
        .await
        .map(|attempts| HttpResponse::Ok().json(AttemptsResponse::new(attempts)))
        .map_err(|e| match e {
            UseCaseError::AppointmentNotFound(id) => {
                ClinicError::NotFound(format!("Appointment with id: {} was not found", id))
            }
            UseCaseError::StorageError => ClinicError::InternalError,
        })
}

/// Audit view: the reminder decisions recorded for one appointment, newest
/// first.
#[derive(Debug)]
pub struct GetAppointmentAttemptsUseCase {
    pub appointment_id: ID,
    pub limit: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    AppointmentNotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAppointmentAttemptsUseCase {
    type Response = Vec<ReminderAttempt>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetAppointmentAttempts";

    async fn execute(&mut self, ctx: &ClinicContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.appointments.find(&self.appointment_id).await.is_none() {
            return Err(UseCaseError::AppointmentNotFound(self.appointment_id.clone()));
        }

        ctx.repos
            .reminder_attempts
            .find_by_appointment(&self.appointment_id, self.limit)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clinic_reminders_domain::{Appointment, AttemptStatus, ReminderType, Tenant};

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_appointment() {
        let ctx = ClinicContext::create_inmemory();
        let mut usecase = GetAppointmentAttemptsUseCase {
            appointment_id: Default::default(),
            limit: 20,
        };
        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::AppointmentNotFound(_))));
    }

    #[actix_web::main]
    #[test]
    async fn returns_attempts_newest_first() {
        let ctx = ClinicContext::create_inmemory();
        let tenant = Tenant::new("Sunrise Clinic");
        let appointment = Appointment::new(&tenant.id, &Default::default(), 1000);
        ctx.repos.appointments.insert(&appointment).await.unwrap();

        for (attempted_at, status) in [
            (100, AttemptStatus::FailedDelivery),
            (200, AttemptStatus::Succeeded),
        ] {
            let attempt = ReminderAttempt {
                id: Default::default(),
                tenant_id: tenant.id.clone(),
                appointment_id: Some(appointment.id.clone()),
                patient_id: appointment.patient_id.clone(),
                reminder_type: ReminderType::TwentyFourHours,
                occasion: chrono::NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
                attempted_at,
                status,
                reason_code: "sent".to_string(),
                note: String::new(),
                details: None,
            };
            ctx.repos.reminder_attempts.insert(&attempt).await.unwrap();
        }

        let mut usecase = GetAppointmentAttemptsUseCase {
            appointment_id: appointment.id.clone(),
            limit: 20,
        };
        let attempts = usecase.execute(&ctx).await.unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].status, AttemptStatus::Succeeded);
        assert_eq!(attempts[1].status, AttemptStatus::FailedDelivery);
    }
}
