/// Server configuration.
///
/// Bind address defaults plus the room lobby parameters. Host and port can be
/// overridden at startup through `CAMEL_UP_HOST` and `CAMEL_UP_PORT`.
use std::env;

use log::warn;

/// Default interface the HTTP server binds to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Length of generated room codes.
pub const ROOM_CODE_LEN: usize = 6;

/// Maximum members in a lobby room (one seat each).
pub const MAX_ROOM_MEMBERS: usize = crate::config::game::MAX_PLAYERS;

/// Resolve the bind address from the environment, falling back to the defaults.
pub fn bind_address() -> (String, u16) {
    let host = env::var("CAMEL_UP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = match env::var("CAMEL_UP_PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("[Config] Ignoring invalid CAMEL_UP_PORT={}", raw);
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    };
    (host, port)
}
