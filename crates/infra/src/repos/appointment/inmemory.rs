use super::IAppointmentRepo;
use crate::repos::shared::inmemory_repo::*;
use clinic_reminders_domain::{Appointment, ID};

pub struct InMemoryAppointmentRepo {
    appointments: std::sync::Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentRepo {
    pub fn new() -> Self {
        Self {
            appointments: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for InMemoryAppointmentRepo {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        insert(appointment, &self.appointments);
        Ok(())
    }

    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()> {
        save(appointment, &self.appointments);
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        find(appointment_id, &self.appointments)
    }

    async fn find_scheduled_in_range(
        &self,
        tenant_id: &ID,
        from_ts: i64,
        to_ts: i64,
    ) -> anyhow::Result<Vec<Appointment>> {
        Ok(find_by(&self.appointments, |a| {
            a.tenant_id == *tenant_id
                && !a.is_cancelled()
                && a.start_ts >= from_ts
                && a.start_ts <= to_ts
        }))
    }
}
