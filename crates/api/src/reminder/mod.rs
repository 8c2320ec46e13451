mod dtos;
mod get_appointment_attempts;
mod get_tenant_attempts;
pub mod send_reminders;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // External cron entrypoint: run one reminder tick now
    cfg.route(
        "/reminders/trigger",
        web::post().to(send_reminders::trigger_reminders_controller),
    );
    // Audit trail consumed by the (external) admin UI
    cfg.route(
        "/appointments/{appointment_id}/attempts",
        web::get().to(get_appointment_attempts::get_appointment_attempts_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/attempts",
        web::get().to(get_tenant_attempts::get_tenant_attempts_controller),
    );
}
