use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;

/// A `Patient` belongs to a `Tenant` and is the delivery target for
/// reminders. The phone number is required as it is the only delivery
/// channel, the birth date is optional and only used for birthday reminders.
#[derive(Debug, Clone)]
pub struct Patient {
    pub id: ID,
    pub tenant_id: ID,
    pub phone: String,
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl Patient {
    pub fn new(tenant_id: &ID, phone: &str) -> Self {
        Self {
            id: Default::default(),
            tenant_id: tenant_id.clone(),
            phone: phone.to_string(),
            name: None,
            birth_date: None,
        }
    }
}

impl Entity for Patient {
    fn id(&self) -> &ID {
        &self.id
    }
}
