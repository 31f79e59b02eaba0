//! Camel Up game server.
//!
//! Starts the actor system and the HTTP server with the lobby and game WebSocket
//! endpoints.

use actix::Actor;
use actix_web::{App, HttpServer, web};
use log::info;

use server::game_session::server::GameSessionManager;
use server::lobby::server::LobbyServer;

pub mod config;
mod game;
mod server;

#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // RUST_LOG controls the level.
    env_logger::init();

    let game_session_manager = GameSessionManager::new().start();
    let lobby_addr = LobbyServer::new(game_session_manager.clone()).start();

    let state = web::Data::new(server::state::AppState::new(lobby_addr, game_session_manager));

    let (host, port) = config::server::bind_address();
    info!("[Server] Listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*")),
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
