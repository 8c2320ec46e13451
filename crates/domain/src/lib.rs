mod appointment;
pub mod eligibility;
mod patient;
mod reminder;
mod shared;
mod tenant;
pub mod time;

pub use appointment::{Appointment, AppointmentStatus};
pub use eligibility::{Decision, LeadWindow, ReminderSettings};
pub use patient::Patient;
pub use reminder::{AttemptStatus, Reminder, ReminderAttempt, ReminderType};
pub use shared::entity::{Entity, ID};
pub use tenant::Tenant;
