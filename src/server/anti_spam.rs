use std::time::{Duration, Instant};

use log::warn;

use crate::config::anti_spam::{BAN_DURATION_SECONDS, MAX_REQUESTS_PER_SECOND, MAX_RESPONSES_PER_SECOND};
use crate::game::types::PlayerId;

/// Tracks anti-spam state for a single socket (lobby or game).
pub struct AntiSpamState {
    // Last error code sent (for suppression)
    last_error_code: Option<String>,
    // Start of the current one-second window
    last_tick: Instant,
    responses_this_tick: u32,
    requests_this_tick: u32,
    banned_until: Option<Instant>,
}

impl Default for AntiSpamState {
    fn default() -> Self {
        Self::new()
    }
}

impl AntiSpamState {
    pub fn new() -> Self {
        Self {
            last_error_code: None,
            last_tick: Instant::now(),
            responses_this_tick: 0,
            requests_this_tick: 0,
            banned_until: None,
        }
    }

    /// Call at the start of every incoming message.
    /// Returns true if the session is currently banned.
    pub fn record_request(&mut self, player_id: PlayerId) -> bool {
        self.tick();
        self.requests_this_tick += 1;
        if self.requests_this_tick > MAX_REQUESTS_PER_SECOND {
            self.ban(player_id, "Too many requests per second");
            return true;
        }
        self.is_banned()
    }

    /// Call before every direct reply (including errors).
    /// Returns true if the session is currently banned.
    pub fn record_response(&mut self, player_id: PlayerId) -> bool {
        self.tick();
        self.responses_this_tick += 1;
        if self.responses_this_tick > MAX_RESPONSES_PER_SECOND {
            self.ban(player_id, "Too many responses per second");
            return true;
        }
        self.is_banned()
    }

    /// Returns true if the error should be sent, false if it repeats the last one.
    pub fn should_send_error(&mut self, error_code: &str, player_id: PlayerId) -> bool {
        if self.last_error_code.as_deref() == Some(error_code) {
            warn!("[AntiSpam] Suppressed duplicate error '{}' for player={}", error_code, player_id);
            return false;
        }
        self.last_error_code = Some(error_code.to_string());
        true
    }

    /// Call when an action was accepted.
    pub fn reset_on_valid_action(&mut self) {
        self.last_error_code = None;
    }

    pub fn is_banned(&self) -> bool {
        self.banned_until.is_some_and(|until| Instant::now() < until)
    }

    /// Remaining ban duration in seconds, or 0 if not banned.
    pub fn ban_remaining_secs(&self) -> u64 {
        self.banned_until
            .map(|until| until.saturating_duration_since(Instant::now()).as_secs())
            .unwrap_or(0)
    }

    fn ban(&mut self, player_id: PlayerId, reason: &str) {
        let until = Instant::now() + Duration::from_secs(BAN_DURATION_SECONDS);
        self.banned_until = Some(until);
        warn!("[AntiSpam] Banned player={} until {:?} for reason: {}", player_id, until, reason);
    }

    /// Reset per-second counters if a new second has started.
    fn tick(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_tick) >= Duration::from_secs(1) {
            self.last_tick = now;
            self.responses_this_tick = 0;
            self.requests_this_tick = 0;
        }
    }
}
