/// Game sessions: one actor per running game, holding the authoritative engine.

pub mod messages;
pub mod server;
pub mod session;
