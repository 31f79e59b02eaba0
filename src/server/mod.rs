//! Server layer root module.
//!
//! - Application state and routing
//! - Room lobby (rooms, readiness, character picks, game start)
//! - Game sessions (one actor per running game, one per connected socket)
//! - Shared socket helpers: error frames, anti-spam, address checks

pub mod anti_spam;
pub mod game_session;
pub mod lobby;
pub mod router;
pub mod session_utils;
pub mod state;
pub mod ws_actor_utils;
pub mod ws_error;
