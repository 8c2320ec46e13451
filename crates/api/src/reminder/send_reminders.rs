use crate::error::ClinicError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use clinic_reminders_domain::eligibility::{Decision, ReminderSettings};
use clinic_reminders_domain::{
    eligibility, time, Appointment, AttemptStatus, Patient, Reminder, ReminderAttempt,
    ReminderType, Tenant, ID,
};
use clinic_reminders_infra::ClinicContext;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{error, info};

pub async fn trigger_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<ClinicContext>,
) -> Result<HttpResponse, ClinicError> {
    let secret = http_req
        .headers()
        .get("clinic-trigger-secret")
        .and_then(|header| header.to_str().ok())
        .unwrap_or("");
    if secret != ctx.config.trigger_secret {
        return Err(ClinicError::Unauthorized(
            "Invalid or missing clinic-trigger-secret header".to_string(),
        ));
    }

    execute(SendRemindersUseCase, &ctx)
        .await
        .map(|summary| HttpResponse::Ok().json(summary))
        .map_err(|_| ClinicError::InternalError)
}

/// Runs one reminder tick: for every tenant, load the appointments whose
/// reminder windows could be open right now plus the birthday candidates,
/// evaluate each (candidate, reminder type) pair and apply the decision.
/// Every decision except "not due yet" leaves a row in the attempt log.
#[derive(Debug)]
pub struct SendRemindersUseCase;

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct TickSummary {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl TickSummary {
    fn absorb(&mut self, other: TickSummary) {
        self.sent += other.sent;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendRemindersUseCase {
    type Response = TickSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "SendReminders";

    async fn execute(&mut self, ctx: &ClinicContext) -> Result<Self::Response, Self::Error> {
        let now_ts = ctx.sys.get_timestamp_millis();
        let settings = &ctx.config.reminder_settings;

        let tenants = ctx.repos.tenants.all().await.map_err(|e| {
            error!("Unable to load tenants for reminder tick: {:?}", e);
            UseCaseError::StorageError
        })?;

        let mut summary = TickSummary::default();
        for tenant in &tenants {
            let tenant_summary = process_tenant(tenant, now_ts, settings, ctx)
                .await
                .map_err(|e| {
                    error!(
                        "Unable to load reminder candidates for tenant: {}, aborting tick: {:?}",
                        tenant.id, e
                    );
                    UseCaseError::StorageError
                })?;
            summary.absorb(tenant_summary);
        }

        info!(
            "Reminder tick done. sent: {}, skipped: {}, failed: {}",
            summary.sent, summary.skipped, summary.failed
        );
        Ok(summary)
    }
}

/// One reminder candidate: an (appointment, type) pair or a patient's
/// birthday. `occasion` is the local calendar date part of the idempotency
/// key.
struct ReminderCandidate<'a> {
    appointment: Option<&'a Appointment>,
    patient: &'a Patient,
    reminder_type: ReminderType,
    occasion: chrono::NaiveDate,
}

impl ReminderCandidate<'_> {
    fn appointment_id(&self) -> Option<&ID> {
        self.appointment.map(|appointment| &appointment.id)
    }

    fn attempt(
        &self,
        now_ts: i64,
        status: AttemptStatus,
        reason_code: &str,
        note: &str,
        details: Option<serde_json::Value>,
    ) -> ReminderAttempt {
        ReminderAttempt {
            id: Default::default(),
            tenant_id: self.patient.tenant_id.clone(),
            appointment_id: self.appointment_id().cloned(),
            patient_id: self.patient.id.clone(),
            reminder_type: self.reminder_type,
            occasion: self.occasion,
            attempted_at: now_ts,
            status,
            reason_code: reason_code.to_string(),
            note: note.to_string(),
            details,
        }
    }
}

async fn process_tenant(
    tenant: &Tenant,
    now_ts: i64,
    settings: &ReminderSettings,
    ctx: &ClinicContext,
) -> anyhow::Result<TickSummary> {
    let mut summary = TickSummary::default();

    let horizon_ts = now_ts + settings.candidate_horizon_millis();
    let appointments = ctx
        .repos
        .appointments
        .find_scheduled_in_range(&tenant.id, now_ts, horizon_ts)
        .await?;
    let patient_ids = appointments
        .iter()
        .map(|appointment| appointment.patient_id.clone())
        .collect::<Vec<_>>();
    let patients = ctx
        .repos
        .patients
        .find_many(&patient_ids)
        .await?
        .into_iter()
        .map(|patient| (patient.id.clone(), patient))
        .collect::<HashMap<_, _>>();

    for appointment in &appointments {
        let occasion = eligibility::appointment_occasion(appointment, settings);
        let patient = match patients.get(&appointment.patient_id) {
            Some(patient) => patient,
            None => {
                record_missing_patient(appointment, occasion, now_ts, settings, ctx, &mut summary)
                    .await;
                continue;
            }
        };

        for reminder_type in ReminderType::APPOINTMENT_TYPES {
            let candidate = ReminderCandidate {
                appointment: Some(appointment),
                patient,
                reminder_type,
                occasion,
            };
            if let Err(e) = evaluate_candidate(candidate, now_ts, settings, ctx, &mut summary).await
            {
                error!(
                    "Unable to process {} reminder for appointment: {}: {:?}",
                    reminder_type, appointment.id, e
                );
                summary.failed += 1;
            }
        }
    }

    for patient in &ctx.repos.patients.find_with_birth_date(&tenant.id).await? {
        // No occasion means no birthday this year (Feb 29)
        let occasion = match eligibility::birthday_occasion(patient, now_ts, settings) {
            Some(occasion) => occasion,
            None => continue,
        };
        let candidate = ReminderCandidate {
            appointment: None,
            patient,
            reminder_type: ReminderType::Birthday,
            occasion,
        };
        if let Err(e) = evaluate_candidate(candidate, now_ts, settings, ctx, &mut summary).await {
            error!(
                "Unable to process birthday reminder for patient: {}: {:?}",
                patient.id, e
            );
            summary.failed += 1;
        }
    }

    Ok(summary)
}

async fn evaluate_candidate(
    candidate: ReminderCandidate<'_>,
    now_ts: i64,
    settings: &ReminderSettings,
    ctx: &ClinicContext,
    summary: &mut TickSummary,
) -> anyhow::Result<()> {
    let prior_success = ctx
        .repos
        .reminder_attempts
        .find_succeeded(
            &candidate.patient.tenant_id,
            &candidate.patient.id,
            candidate.appointment_id(),
            candidate.reminder_type,
            candidate.occasion,
        )
        .await?;

    let decision = match candidate.appointment {
        Some(appointment) => eligibility::evaluate_appointment(
            appointment,
            candidate.patient,
            candidate.reminder_type,
            now_ts,
            prior_success.is_some(),
            settings,
        ),
        None => {
            eligibility::evaluate_birthday(candidate.patient, now_ts, prior_success.is_some(), settings)
        }
    };

    match decision {
        Decision::SkipNotDue => {}
        Decision::Send => match ctx
            .sms
            .send(&candidate.patient.phone, &render_message(&candidate, settings))
            .await
        {
            Ok(()) => {
                let attempt = candidate.attempt(
                    now_ts,
                    AttemptStatus::Succeeded,
                    "sent",
                    "Reminder delivered",
                    None,
                );
                ctx.repos.reminder_attempts.insert(&attempt).await?;
                let marker = Reminder {
                    id: Default::default(),
                    tenant_id: candidate.patient.tenant_id.clone(),
                    appointment_id: candidate.appointment_id().cloned(),
                    patient_id: candidate.patient.id.clone(),
                    reminder_type: candidate.reminder_type,
                    occasion: candidate.occasion,
                    sent_at: now_ts,
                };
                ctx.repos.reminders.insert(&marker).await?;
                summary.sent += 1;
            }
            Err(delivery_error) => {
                let attempt = candidate.attempt(
                    now_ts,
                    AttemptStatus::FailedDelivery,
                    "delivery_error",
                    "The SMS gateway reported a failure",
                    Some(serde_json::json!({ "error": delivery_error.to_string() })),
                );
                ctx.repos.reminder_attempts.insert(&attempt).await?;
                summary.failed += 1;
            }
        },
        Decision::SkipAlreadySent => {
            let attempt = candidate.attempt(
                now_ts,
                AttemptStatus::SkippedAlreadySent,
                "already_sent",
                "A reminder for this occasion was already delivered",
                None,
            );
            ctx.repos.reminder_attempts.insert(&attempt).await?;
            summary.skipped += 1;
        }
        Decision::SkipQuietHours => {
            let attempt = candidate.attempt(
                now_ts,
                AttemptStatus::SkippedQuietHours,
                "quiet_hours",
                "Within the clinic quiet hours",
                None,
            );
            ctx.repos.reminder_attempts.insert(&attempt).await?;
            summary.skipped += 1;
        }
        Decision::FailPrecondition { reason_code, note } => {
            let attempt = candidate.attempt(
                now_ts,
                AttemptStatus::FailedPrecondition,
                reason_code,
                &note,
                None,
            );
            ctx.repos.reminder_attempts.insert(&attempt).await?;
            summary.failed += 1;
        }
    }

    Ok(())
}

/// An appointment referencing a nonexistent patient cannot be evaluated, but
/// it must not vanish from the audit trail either. One precondition failure
/// per reminder type whose window is open.
async fn record_missing_patient(
    appointment: &Appointment,
    occasion: chrono::NaiveDate,
    now_ts: i64,
    settings: &ReminderSettings,
    ctx: &ClinicContext,
    summary: &mut TickSummary,
) {
    for reminder_type in ReminderType::APPOINTMENT_TYPES {
        let due = settings
            .lead_window(reminder_type)
            .map(|window| window.contains(appointment.start_ts, now_ts))
            .unwrap_or(false);
        if !due {
            continue;
        }
        let attempt = ReminderAttempt {
            id: Default::default(),
            tenant_id: appointment.tenant_id.clone(),
            appointment_id: Some(appointment.id.clone()),
            patient_id: appointment.patient_id.clone(),
            reminder_type,
            occasion,
            attempted_at: now_ts,
            status: AttemptStatus::FailedPrecondition,
            reason_code: "missing_patient".to_string(),
            note: "Appointment references a patient that does not exist".to_string(),
            details: None,
        };
        match ctx.repos.reminder_attempts.insert(&attempt).await {
            Ok(_) => summary.failed += 1,
            Err(e) => {
                error!(
                    "Unable to record missing patient for appointment: {}: {:?}",
                    appointment.id, e
                );
                summary.failed += 1;
            }
        }
    }
}

fn render_message(candidate: &ReminderCandidate<'_>, settings: &ReminderSettings) -> String {
    let greeting = match &candidate.patient.name {
        Some(name) => format!("Hi {}", name),
        None => "Hi".to_string(),
    };
    match candidate.appointment {
        Some(appointment) => {
            let local = time::local_components(appointment.start_ts, &settings.timezone);
            match candidate.reminder_type {
                ReminderType::TwentyFourHours => format!(
                    "{}! This is a reminder that you have an appointment tomorrow at {:02}:{:02}.",
                    greeting, local.hour, local.minute
                ),
                _ => format!(
                    "{}! Your appointment starts soon, at {:02}:{:02}. See you there!",
                    greeting, local.hour, local.minute
                ),
            }
        }
        None => format!(
            "{}! Everyone at the clinic wishes you a happy birthday!",
            greeting
        ),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};
    use clinic_reminders_infra::{ISys, InMemorySmsGateway};
    use std::sync::Arc;

    fn ts(datetime: &str) -> i64 {
        datetime
            .parse::<DateTime<Utc>>()
            .expect("Valid rfc3339 datetime")
            .timestamp_millis()
    }

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    struct TestApp {
        ctx: ClinicContext,
        gateway: Arc<InMemorySmsGateway>,
        tenant: Tenant,
    }

    impl TestApp {
        async fn new() -> Self {
            let gateway = Arc::new(InMemorySmsGateway::new());
            let mut ctx = ClinicContext::create_inmemory();
            ctx.sms = gateway.clone();

            let tenant = Tenant::new("Sunrise Clinic");
            ctx.repos.tenants.insert(&tenant).await.unwrap();

            Self {
                ctx,
                gateway,
                tenant,
            }
        }

        async fn patient(&self, phone: &str) -> Patient {
            let mut patient = Patient::new(&self.tenant.id, phone);
            patient.name = Some("Alice".to_string());
            self.ctx.repos.patients.insert(&patient).await.unwrap();
            patient
        }

        async fn appointment(&self, patient: &Patient, start_ts: i64) -> Appointment {
            let appointment = Appointment::new(&self.tenant.id, &patient.id, start_ts);
            self.ctx
                .repos
                .appointments
                .insert(&appointment)
                .await
                .unwrap();
            appointment
        }

        async fn tick(&mut self, now: &str) -> TickSummary {
            self.ctx.sys = Arc::new(StaticTimeSys(ts(now)));
            execute(SendRemindersUseCase, &self.ctx).await.unwrap()
        }

        async fn attempts(&self, appointment: &Appointment) -> Vec<ReminderAttempt> {
            self.ctx
                .repos
                .reminder_attempts
                .find_by_appointment(&appointment.id, 100)
                .await
                .unwrap()
        }
    }

    #[actix_web::main]
    #[test]
    async fn sends_24h_reminder_once() {
        let mut app = TestApp::new().await;
        let patient = app.patient("+15550100").await;
        let appointment = app
            .appointment(&patient, ts("2024-06-02T15:00:00Z"))
            .await;

        let summary = app.tick("2024-06-01T15:00:00Z").await;
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 0);

        let sent = app.gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].phone, "+15550100");
        assert!(sent[0].message.contains("tomorrow at 15:00"));

        let attempts = app.attempts(&appointment).await;
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].status, AttemptStatus::Succeeded);
        assert_eq!(attempts[0].reminder_type, ReminderType::TwentyFourHours);
        assert_eq!(
            attempts[0].occasion,
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );

        // The legacy success marker is written next to the attempt
        let markers = app
            .ctx
            .repos
            .reminders
            .find_by_appointment(&appointment.id)
            .await
            .unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].reminder_type, ReminderType::TwentyFourHours);

        // A later tick in the same window skips and records the skip
        let summary = app.tick("2024-06-01T15:15:00Z").await;
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(app.gateway.sent().len(), 1);

        let attempts = app.attempts(&appointment).await;
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].status, AttemptStatus::SkippedAlreadySent);
    }

    #[actix_web::main]
    #[test]
    async fn every_tick_in_the_window_sends_at_most_once() {
        let mut app = TestApp::new().await;
        let patient = app.patient("+15550100").await;
        let appointment = app
            .appointment(&patient, ts("2024-06-02T15:00:00Z"))
            .await;

        for now in [
            "2024-06-01T14:00:00Z",
            "2024-06-01T14:15:00Z",
            "2024-06-01T14:30:00Z",
            "2024-06-01T15:45:00Z",
        ] {
            app.tick(now).await;
        }

        assert_eq!(app.gateway.sent().len(), 1);
        let succeeded = app
            .attempts(&appointment)
            .await
            .into_iter()
            .filter(|a| a.status == AttemptStatus::Succeeded)
            .count();
        assert_eq!(succeeded, 1);
    }

    #[actix_web::main]
    #[test]
    async fn both_reminder_types_fire_for_one_appointment() {
        let mut app = TestApp::new().await;
        let patient = app.patient("+15550100").await;
        let appointment = app
            .appointment(&patient, ts("2024-06-02T15:00:00Z"))
            .await;

        app.tick("2024-06-01T15:00:00Z").await;
        app.tick("2024-06-02T14:00:00Z").await;

        assert_eq!(app.gateway.sent().len(), 2);
        let mut types = app
            .attempts(&appointment)
            .await
            .into_iter()
            .filter(|a| a.status == AttemptStatus::Succeeded)
            .map(|a| a.reminder_type)
            .collect::<Vec<_>>();
        types.sort_by_key(|t| t.as_str());
        assert_eq!(
            types,
            vec![ReminderType::OneHour, ReminderType::TwentyFourHours]
        );
    }

    #[actix_web::main]
    #[test]
    async fn quiet_hours_are_recorded_and_nothing_is_sent() {
        let mut app = TestApp::new().await;
        let patient = app.patient("+15550100").await;
        // Due window for 24h is [20:30, 22:30) UTC, tick at 21:30 is quiet
        let appointment = app
            .appointment(&patient, ts("2024-06-02T21:30:00Z"))
            .await;

        let summary = app.tick("2024-06-01T21:30:00Z").await;
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.skipped, 1);
        assert!(app.gateway.sent().is_empty());

        let attempts = app.attempts(&appointment).await;
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].status, AttemptStatus::SkippedQuietHours);
        assert_eq!(attempts[0].reason_code, "quiet_hours");
    }

    #[actix_web::main]
    #[test]
    async fn cancelled_appointment_is_excluded() {
        let mut app = TestApp::new().await;
        let patient = app.patient("+15550100").await;
        let mut appointment = app
            .appointment(&patient, ts("2024-06-02T15:00:00Z"))
            .await;
        appointment.cancel(ts("2024-06-01T10:00:00Z"));
        app.ctx.repos.appointments.save(&appointment).await.unwrap();

        let summary = app.tick("2024-06-01T15:00:00Z").await;
        assert_eq!(summary.sent, 0);
        assert!(app.gateway.sent().is_empty());
        // Cancelled appointments never enter the candidate set, so no
        // attempt row is written either
        assert!(app.attempts(&appointment).await.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn delivery_failure_is_retried_on_the_next_tick() {
        let mut app = TestApp::new().await;
        let patient = app.patient("+15550100").await;
        let appointment = app
            .appointment(&patient, ts("2024-06-02T15:00:00Z"))
            .await;

        app.gateway.fail_with("provider is down");
        let summary = app.tick("2024-06-01T14:30:00Z").await;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.sent, 0);

        let attempts = app.attempts(&appointment).await;
        assert_eq!(attempts[0].status, AttemptStatus::FailedDelivery);
        assert_eq!(attempts[0].reason_code, "delivery_error");
        let details = attempts[0].details.as_ref().unwrap();
        assert!(details["error"]
            .as_str()
            .unwrap()
            .contains("provider is down"));

        // The absence of a succeeded attempt makes the next tick retry
        app.gateway.succeed();
        let summary = app.tick("2024-06-01T15:30:00Z").await;
        assert_eq!(summary.sent, 1);
        assert_eq!(app.gateway.sent().len(), 1);

        let attempts = app.attempts(&appointment).await;
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].status, AttemptStatus::Succeeded);
    }

    #[actix_web::main]
    #[test]
    async fn missing_phone_is_logged_as_a_precondition_failure() {
        let mut app = TestApp::new().await;
        let patient = app.patient("").await;
        let appointment = app
            .appointment(&patient, ts("2024-06-02T15:00:00Z"))
            .await;

        let summary = app.tick("2024-06-01T15:00:00Z").await;
        assert_eq!(summary.failed, 1);
        assert!(app.gateway.sent().is_empty());

        let attempts = app.attempts(&appointment).await;
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].status, AttemptStatus::FailedPrecondition);
        assert_eq!(attempts[0].reason_code, "missing_phone");
    }

    #[actix_web::main]
    #[test]
    async fn birthday_reminder_fires_once_per_year() {
        let mut app = TestApp::new().await;
        let mut patient = Patient::new(&app.tenant.id, "+15550100");
        patient.name = Some("Alice".to_string());
        patient.birth_date = NaiveDate::from_ymd_opt(1990, 3, 15);
        app.ctx.repos.patients.insert(&patient).await.unwrap();

        let summary = app.tick("2024-03-15T12:00:00Z").await;
        assert_eq!(summary.sent, 1);
        let sent = app.gateway.sent();
        assert!(sent[0].message.contains("happy birthday"));

        // Same day again: skip. Next year: a new occasion, send again.
        let summary = app.tick("2024-03-15T18:00:00Z").await;
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.skipped, 1);

        let summary = app.tick("2025-03-15T12:00:00Z").await;
        assert_eq!(summary.sent, 1);
        assert_eq!(app.gateway.sent().len(), 2);

        let attempts = app
            .ctx
            .repos
            .reminder_attempts
            .find_by_tenant(&app.tenant.id, 0, 100)
            .await
            .unwrap();
        let occasions = attempts
            .iter()
            .filter(|a| a.status == AttemptStatus::Succeeded)
            .map(|a| a.occasion)
            .collect::<Vec<_>>();
        assert_eq!(
            occasions,
            vec![
                NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            ]
        );
        assert!(attempts.iter().all(|a| a.appointment_id.is_none()));
    }

    #[actix_web::main]
    #[test]
    async fn feb_29_birthday_only_fires_in_leap_years() {
        let mut app = TestApp::new().await;
        let mut patient = Patient::new(&app.tenant.id, "+15550100");
        patient.birth_date = NaiveDate::from_ymd_opt(1996, 2, 29);
        app.ctx.repos.patients.insert(&patient).await.unwrap();

        let summary = app.tick("2023-02-28T12:00:00Z").await;
        assert_eq!(summary.sent, 0);
        let summary = app.tick("2023-03-01T12:00:00Z").await;
        assert_eq!(summary.sent, 0);

        let summary = app.tick("2024-02-29T12:00:00Z").await;
        assert_eq!(summary.sent, 1);
    }

    #[actix_web::main]
    #[test]
    async fn tenants_are_isolated() {
        let mut app = TestApp::new().await;
        let patient = app.patient("+15550100").await;
        app.appointment(&patient, ts("2024-06-02T15:00:00Z")).await;

        let other_tenant = Tenant::new("Moonrise Clinic");
        app.ctx.repos.tenants.insert(&other_tenant).await.unwrap();
        let other_patient = Patient::new(&other_tenant.id, "+15550199");
        app.ctx
            .repos
            .patients
            .insert(&other_patient)
            .await
            .unwrap();
        let other_appointment =
            Appointment::new(&other_tenant.id, &other_patient.id, ts("2024-06-02T15:00:00Z"));
        app.ctx
            .repos
            .appointments
            .insert(&other_appointment)
            .await
            .unwrap();

        let summary = app.tick("2024-06-01T15:00:00Z").await;
        assert_eq!(summary.sent, 2);

        for tenant_id in [&app.tenant.id, &other_tenant.id] {
            let attempts = app
                .ctx
                .repos
                .reminder_attempts
                .find_by_tenant(tenant_id, 0, 100)
                .await
                .unwrap();
            assert_eq!(attempts.len(), 1);
            assert_eq!(&attempts[0].tenant_id, tenant_id);
        }
    }

    #[actix_web::main]
    #[test]
    async fn orphaned_appointment_is_recorded_not_sent() {
        let mut app = TestApp::new().await;
        let ghost = ID::default();
        let appointment = Appointment::new(&app.tenant.id, &ghost, ts("2024-06-02T15:00:00Z"));
        app.ctx
            .repos
            .appointments
            .insert(&appointment)
            .await
            .unwrap();

        let summary = app.tick("2024-06-01T15:00:00Z").await;
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.failed, 1);
        assert!(app.gateway.sent().is_empty());

        let attempts = app.attempts(&appointment).await;
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].reason_code, "missing_patient");
    }

    #[actix_web::main]
    #[test]
    async fn occasions_use_the_clinic_local_date() {
        let mut app = TestApp::new().await;
        app.ctx.config.reminder_settings.timezone = chrono_tz::America::New_York;
        // Equal bounds disable quiet hours; the whole 24h window here is at
        // night local time
        app.ctx.config.reminder_settings.quiet_start = app.ctx.config.reminder_settings.quiet_end;
        let patient = app.patient("+15550100").await;
        // 03:30 UTC on June 2nd is 23:30 on June 1st in New York
        let appointment = app
            .appointment(&patient, ts("2024-06-02T03:30:00Z"))
            .await;

        let summary = app.tick("2024-06-01T03:30:00Z").await;
        assert_eq!(summary.sent, 1);

        let attempts = app.attempts(&appointment).await;
        assert_eq!(
            attempts[0].occasion,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(app.gateway.sent()[0].message.contains("23:30"));
    }
}
