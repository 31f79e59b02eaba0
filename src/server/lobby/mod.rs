/// Room lobby: players gather in rooms, pick characters, get ready, and the host starts a game.

pub mod messages;
pub mod server;
pub mod session;
pub mod types;
