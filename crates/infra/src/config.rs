use chrono::NaiveTime;
use chrono_tz::Tz;
use clinic_reminders_domain::ReminderSettings;
use rand::Rng;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Shared secret required by the external cron trigger endpoint
    pub trigger_secret: String,
    /// Webhook endpoint of the SMS transport. When unset, sends are kept
    /// in memory, which is only useful for local development.
    pub sms_gateway_url: Option<String>,
    /// Key sent along with every SMS gateway request
    pub sms_gateway_key: String,
    /// Clinic timezone, quiet hours and lead windows. Passed into the
    /// eligibility evaluator on every tick.
    pub reminder_settings: ReminderSettings,
}

impl Config {
    pub fn new() -> Self {
        let trigger_secret = match std::env::var("TRIGGER_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find TRIGGER_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(16);
                info!(
                    "Secret for triggering reminder ticks was generated and set to: {}",
                    secret
                );
                secret
            }
        };

        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().expect("Valid default port")
            }
        };

        let mut reminder_settings = ReminderSettings::default();
        if let Ok(timezone) = std::env::var("CLINIC_TIMEZONE") {
            match timezone.parse::<Tz>() {
                Ok(tz) => reminder_settings.timezone = tz,
                Err(_) => warn!(
                    "The given CLINIC_TIMEZONE: {} is not a valid timezone, falling back to UTC.",
                    timezone
                ),
            }
        }
        if let Some(quiet_start) = parse_quiet_hour("QUIET_HOURS_START") {
            reminder_settings.quiet_start = quiet_start;
        }
        if let Some(quiet_end) = parse_quiet_hour("QUIET_HOURS_END") {
            reminder_settings.quiet_end = quiet_end;
        }

        Self {
            port,
            trigger_secret,
            sms_gateway_url: std::env::var("SMS_GATEWAY_URL").ok(),
            sms_gateway_key: std::env::var("SMS_GATEWAY_KEY")
                .unwrap_or_else(|_| create_random_secret(30)),
            reminder_settings,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_quiet_hour(env_var: &str) -> Option<NaiveTime> {
    let value = std::env::var(env_var).ok()?;
    match NaiveTime::parse_from_str(&value, "%H:%M") {
        Ok(time) => Some(time),
        Err(_) => {
            warn!(
                "The given {}: {} is not a valid HH:MM time, falling back to the default.",
                env_var, value
            );
            None
        }
    }
}

fn create_random_secret(secret_len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}
