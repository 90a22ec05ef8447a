pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
/// Session tokens are valid for 30 days from issuance
pub const TOKEN_LIFETIME_SECS: i64 = 30 * 24 * 60 * 60;
/// Capacity of the change-event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
/// Number of recent entries shown on the admin dashboard
pub const DASHBOARD_RECENT_LIMIT: usize = 5;
