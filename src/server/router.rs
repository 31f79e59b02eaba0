//! HTTP and WebSocket routing configuration.
//!
//! Each endpoint is handled by a dedicated WebSocket actor.

use actix_web::web;

use crate::server::game_session::session::ws_game;
use crate::server::lobby::session::ws_lobby;

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws/lobby").to(ws_lobby))
        .service(web::resource("/ws/game/{game_id}").to(ws_game));
}
