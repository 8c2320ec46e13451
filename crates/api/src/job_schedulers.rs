use crate::reminder::send_reminders::SendRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep};
use clinic_reminders_infra::ClinicContext;
use std::time::Duration;
use tracing::{error, info};

/// Ticks run every quarter hour, matching the width the lead window
/// tolerances were chosen for.
const TICK_INTERVAL_SECS: i64 = 15 * 60;

/// Seconds to wait before the first tick so that ticks land on quarter-hour
/// boundaries, the same instants an external cron trigger would use.
fn get_start_delay_secs(now_ts_millis: i64, interval_secs: i64) -> i64 {
    let now_secs = now_ts_millis / 1000;
    interval_secs - now_secs % interval_secs
}

pub fn start_send_reminders_job(ctx: ClinicContext) {
    actix_web::rt::spawn(async move {
        let delay = get_start_delay_secs(ctx.sys.get_timestamp_millis(), TICK_INTERVAL_SECS);
        sleep(Duration::from_secs(delay as u64)).await;

        let mut tick_interval = interval(Duration::from_secs(TICK_INTERVAL_SECS as u64));
        loop {
            tick_interval.tick().await;
            let job_ctx = ctx.clone();
            actix_web::rt::spawn(async move {
                match execute(SendRemindersUseCase, &job_ctx).await {
                    Ok(summary) => info!(
                        "Scheduled reminder tick done. sent: {}, skipped: {}, failed: {}",
                        summary.sent, summary.skipped, summary.failed
                    ),
                    Err(e) => error!("Scheduled reminder tick failed: {:?}", e),
                }
            });
        }
    });
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_tick_aligns_with_the_quarter_hour() {
        // 12:07:30 => 7.5 minutes until 12:15
        assert_eq!(get_start_delay_secs(450_000, TICK_INTERVAL_SECS), 450);
        // One second past a boundary waits almost the full interval
        assert_eq!(get_start_delay_secs(901_000, TICK_INTERVAL_SECS), 899);
        // Exactly on a boundary waits for the next one
        assert_eq!(get_start_delay_secs(900_000, TICK_INTERVAL_SECS), 900);
    }
}
