mod appointment;
mod patient;
mod reminder;
mod reminder_attempt;
mod shared;
mod tenant;

use appointment::{IAppointmentRepo, InMemoryAppointmentRepo, PostgresAppointmentRepo};
use patient::{IPatientRepo, InMemoryPatientRepo, PostgresPatientRepo};
use reminder::{IReminderRepo, InMemoryReminderRepo, PostgresReminderRepo};
use reminder_attempt::{
    IReminderAttemptRepo, InMemoryReminderAttemptRepo, PostgresReminderAttemptRepo,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tenant::{ITenantRepo, InMemoryTenantRepo, PostgresTenantRepo};
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub tenants: Arc<dyn ITenantRepo>,
    pub patients: Arc<dyn IPatientRepo>,
    pub appointments: Arc<dyn IAppointmentRepo>,
    pub reminder_attempts: Arc<dyn IReminderAttemptRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub async fn create_postgres(
        connection_string: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            tenants: Arc::new(PostgresTenantRepo::new(pool.clone())),
            patients: Arc::new(PostgresPatientRepo::new(pool.clone())),
            appointments: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            reminder_attempts: Arc::new(PostgresReminderAttemptRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            tenants: Arc::new(InMemoryTenantRepo::new()),
            patients: Arc::new(InMemoryPatientRepo::new()),
            appointments: Arc::new(InMemoryAppointmentRepo::new()),
            reminder_attempts: Arc::new(InMemoryReminderAttemptRepo::new()),
            reminders: Arc::new(InMemoryReminderRepo::new()),
        }
    }
}
