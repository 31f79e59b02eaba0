/// Configuration for anti-spam and anti-flood protection on lobby and game sockets.
/// All values are in seconds or counts per second.
pub const MAX_RESPONSES_PER_SECOND: u32 = 10;
pub const MAX_REQUESTS_PER_SECOND: u32 = 20;
pub const BAN_DURATION_SECONDS: u64 = 120;
