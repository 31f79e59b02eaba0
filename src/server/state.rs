//! Application state shared by the HTTP/WebSocket handlers.

use actix::Addr;

use crate::server::game_session::server::GameSessionManager;
use crate::server::lobby::server::LobbyServer;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Room lobby actor.
    pub lobby_addr: Addr<LobbyServer>,
    /// Owner of every running game session.
    pub game_session_manager: Addr<GameSessionManager>,
}

impl AppState {
    pub fn new(lobby_addr: Addr<LobbyServer>, game_session_manager: Addr<GameSessionManager>) -> Self {
        AppState {
            lobby_addr,
            game_session_manager,
        }
    }
}
