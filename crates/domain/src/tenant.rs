use crate::shared::entity::{Entity, ID};

/// A `Tenant` is an isolated clinic. It acts as a namespace for patients,
/// appointments and reminder attempts so that multiple clinics can share the
/// same instance of this server without interfering with each other.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: ID,
    pub name: String,
}

impl Tenant {
    pub fn new(name: &str) -> Self {
        Self {
            id: Default::default(),
            name: name.to_string(),
        }
    }
}

impl Entity for Tenant {
    fn id(&self) -> &ID {
        &self.id
    }
}
