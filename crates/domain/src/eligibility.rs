use crate::time;
use crate::{Appointment, Patient, ReminderType};
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

const MILLIS_PER_MINUTE: i64 = 60 * 1000;

/// The time range before an appointment during which a reminder type is
/// considered due. The tolerance widens the window around the lead mark so
/// that a 15-minute tick cadence cannot step over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadWindow {
    pub lead_minutes: i64,
    pub tolerance_minutes: i64,
}

impl LeadWindow {
    /// Whether `now_ts` falls within the half-open due window
    /// `[start_ts - lead - tolerance, start_ts - lead + tolerance)`.
    pub fn contains(&self, start_ts: i64, now_ts: i64) -> bool {
        let lead = self.lead_minutes * MILLIS_PER_MINUTE;
        let tolerance = self.tolerance_minutes * MILLIS_PER_MINUTE;
        let opens_at = start_ts - lead - tolerance;
        let closes_at = start_ts - lead + tolerance;
        now_ts >= opens_at && now_ts < closes_at
    }

    fn horizon_millis(&self) -> i64 {
        (self.lead_minutes + self.tolerance_minutes) * MILLIS_PER_MINUTE
    }
}

/// Reminder policy for the whole system: clinic timezone, quiet hours and
/// the per-type lead windows. Passed explicitly into the evaluator and the
/// orchestrator so tests can inject alternate timezones and windows.
#[derive(Debug, Clone)]
pub struct ReminderSettings {
    pub timezone: Tz,
    pub quiet_start: NaiveTime,
    pub quiet_end: NaiveTime,
    pub twenty_four_hours: LeadWindow,
    pub one_hour: LeadWindow,
}

impl ReminderSettings {
    pub fn lead_window(&self, reminder_type: ReminderType) -> Option<LeadWindow> {
        match reminder_type {
            ReminderType::TwentyFourHours => Some(self.twenty_four_hours),
            ReminderType::OneHour => Some(self.one_hour),
            ReminderType::Birthday => None,
        }
    }

    /// How far ahead of `now` an appointment can start and still have one of
    /// its reminder windows open. Used to bound the candidate query.
    pub fn candidate_horizon_millis(&self) -> i64 {
        self.twenty_four_hours
            .horizon_millis()
            .max(self.one_hour.horizon_millis())
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            // 21:00-08:00 local, no reminders at night
            quiet_start: NaiveTime::from_hms_opt(21, 0, 0).expect("valid quiet start"),
            quiet_end: NaiveTime::from_hms_opt(8, 0, 0).expect("valid quiet end"),
            twenty_four_hours: LeadWindow {
                lead_minutes: 24 * 60,
                tolerance_minutes: 60,
            },
            one_hour: LeadWindow {
                lead_minutes: 60,
                tolerance_minutes: 15,
            },
        }
    }
}

/// The outcome of evaluating one (entity, reminder type, occasion)
/// combination at one instant. `SkipNotDue` is the only decision that does
/// not get recorded in the audit trail, to avoid one row per future
/// appointment on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Send,
    SkipAlreadySent,
    SkipQuietHours,
    SkipNotDue,
    FailPrecondition {
        reason_code: &'static str,
        note: String,
    },
}

/// The occasion an appointment reminder concerns: the appointment's local
/// calendar date. Part of the idempotency key.
pub fn appointment_occasion(appointment: &Appointment, settings: &ReminderSettings) -> NaiveDate {
    time::local_date(appointment.start_ts, &settings.timezone)
}

/// This year's occurrence of the patient's birthday relative to `now_ts`,
/// localized. `None` when the patient has no birth date or the date does not
/// exist this year (Feb 29 outside leap years).
pub fn birthday_occasion(patient: &Patient, now_ts: i64, settings: &ReminderSettings) -> Option<NaiveDate> {
    let birth_date = patient.birth_date?;
    let today = time::local_date(now_ts, &settings.timezone);
    time::birthday_occasion(birth_date, today)
}

/// Decides whether an appointment reminder is due right now.
///
/// Precedence: outside the lead window nothing else matters (keeps the audit
/// trail bounded to the window), then data preconditions, then the
/// already-sent check against the attempt log, then quiet hours.
pub fn evaluate_appointment(
    appointment: &Appointment,
    patient: &Patient,
    reminder_type: ReminderType,
    now_ts: i64,
    already_succeeded: bool,
    settings: &ReminderSettings,
) -> Decision {
    let window = match settings.lead_window(reminder_type) {
        Some(window) => window,
        None => {
            return Decision::FailPrecondition {
                reason_code: "unsupported_reminder_type",
                note: format!(
                    "Reminder type {} is not an appointment reminder",
                    reminder_type
                ),
            }
        }
    };

    if !window.contains(appointment.start_ts, now_ts) {
        return Decision::SkipNotDue;
    }
    if appointment.is_cancelled() {
        return Decision::FailPrecondition {
            reason_code: "cancelled_appointment",
            note: "Appointment was cancelled".to_string(),
        };
    }
    if patient.phone.trim().is_empty() {
        return Decision::FailPrecondition {
            reason_code: "missing_phone",
            note: "Patient has no phone number".to_string(),
        };
    }
    if already_succeeded {
        return Decision::SkipAlreadySent;
    }
    if time::is_within_quiet_hours(
        now_ts,
        &settings.timezone,
        settings.quiet_start,
        settings.quiet_end,
    ) {
        return Decision::SkipQuietHours;
    }

    Decision::Send
}

/// Decides whether a birthday reminder is due right now. Due means the
/// localized calendar date of `now_ts` matches the patient's birth
/// month/day. Patients without a birth date are simply never due.
pub fn evaluate_birthday(
    patient: &Patient,
    now_ts: i64,
    already_succeeded: bool,
    settings: &ReminderSettings,
) -> Decision {
    let today = time::local_date(now_ts, &settings.timezone);
    match birthday_occasion(patient, now_ts, settings) {
        Some(occasion) if occasion == today => {}
        _ => return Decision::SkipNotDue,
    }

    if patient.phone.trim().is_empty() {
        return Decision::FailPrecondition {
            reason_code: "missing_phone",
            note: "Patient has no phone number".to_string(),
        };
    }
    if already_succeeded {
        return Decision::SkipAlreadySent;
    }
    if time::is_within_quiet_hours(
        now_ts,
        &settings.timezone,
        settings.quiet_start,
        settings.quiet_end,
    ) {
        return Decision::SkipQuietHours;
    }

    Decision::Send
}
