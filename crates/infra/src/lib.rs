mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::Repos;
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct ClinicContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub sms: Arc<dyn ISmsGateway>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl ClinicContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let sms = create_sms_gateway(&config);
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            sms,
        }
    }

    /// Context backed entirely by in-memory repositories and an in-memory
    /// SMS gateway. Used by tests.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            sms: Arc::new(InMemorySmsGateway::new()),
        }
    }
}

fn create_sms_gateway(config: &Config) -> Arc<dyn ISmsGateway> {
    match &config.sms_gateway_url {
        Some(url) => Arc::new(WebhookSmsGateway::new(url, &config.sms_gateway_key)),
        None => {
            tracing::warn!(
                "SMS_GATEWAY_URL is not set. Outbound reminders will be kept in memory only."
            );
            Arc::new(InMemorySmsGateway::new())
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> ClinicContext {
    ClinicContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
