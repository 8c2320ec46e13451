mod sms;

pub use sms::{ISmsGateway, InMemorySmsGateway, SentSms, SmsDeliveryError, WebhookSmsGateway};
