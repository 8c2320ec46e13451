use chrono::Utc;

/// Clock seam for the reminder tick. Every usecase reads the current instant
/// through this trait so tests can freeze time at a chosen tick.
pub trait ISys: Send + Sync {
    /// Current UTC timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// The wall clock, used outside of tests
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
