use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmsDeliveryError {
    #[error("SMS gateway request failed: {0}")]
    Transport(String),
    #[error("SMS gateway rejected the message: {0}")]
    Rejected(String),
}

/// Capability to deliver one rendered reminder message to a phone number.
/// Message templating and the actual transport live behind this trait;
/// the reminder core only consumes success or failure.
#[async_trait::async_trait]
pub trait ISmsGateway: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Result<(), SmsDeliveryError>;
}

#[derive(Debug, Serialize)]
struct SmsPayload<'a> {
    to: &'a str,
    message: &'a str,
}

/// Gateway that forwards messages to an external SMS provider through a
/// webhook endpoint. Any transport error or non-success response is reported
/// back as a delivery failure, to be recorded in the attempt log.
pub struct WebhookSmsGateway {
    url: String,
    key: String,
    client: reqwest::Client,
}

impl WebhookSmsGateway {
    pub fn new(url: &str, key: &str) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl ISmsGateway for WebhookSmsGateway {
    async fn send(&self, phone: &str, message: &str) -> Result<(), SmsDeliveryError> {
        let res = self
            .client
            .post(&self.url)
            .header("clinic-sms-key", &self.key)
            .json(&SmsPayload { to: phone, message })
            .send()
            .await
            .map_err(|e| SmsDeliveryError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SmsDeliveryError::Rejected(format!(
                "status: {}, body: {}",
                status, body
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentSms {
    pub phone: String,
    pub message: String,
}

/// Gateway that records messages instead of delivering them. Used in tests
/// and as the local development fallback when no gateway URL is configured.
pub struct InMemorySmsGateway {
    sent: Mutex<Vec<SentSms>>,
    fail_with: Mutex<Option<String>>,
}

impl InMemorySmsGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }

    /// Makes every subsequent send fail with the given detail
    pub fn fail_with(&self, detail: &str) {
        *self.fail_with.lock().unwrap() = Some(detail.to_string());
    }

    /// Makes subsequent sends succeed again
    pub fn succeed(&self) {
        *self.fail_with.lock().unwrap() = None;
    }
}

impl Default for InMemorySmsGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISmsGateway for InMemorySmsGateway {
    async fn send(&self, phone: &str, message: &str) -> Result<(), SmsDeliveryError> {
        let fail_with = self.fail_with.lock().unwrap().clone();
        if let Some(detail) = fail_with {
            return Err(SmsDeliveryError::Rejected(detail));
        }
        self.sent.lock().unwrap().push(SentSms {
            phone: phone.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}
