/// WebSocket session handler for the room lobby.
///
/// One actor per lobby socket. It parses client commands, forwards them to the
/// lobby server, and writes server messages back to the client.
use std::borrow::Cow;

use actix::prelude::*;
use actix_web::{Error, HttpRequest, HttpResponse, http::StatusCode, web};
use actix_web_actors::ws;
use log::error;

use super::messages::{ClientWsMessage, ServerWsMessage, SessionKicked};
use super::server::{Join, Leave, LobbyCommand, LobbyServer};
use crate::game::types::PlayerId;
use crate::server::anti_spam::AntiSpamState;
use crate::server::ws_actor_utils::WsActorUtils;
use crate::server::ws_error::{http_error_response, ws_session_kicked_message};

pub struct LobbySession {
    pub player_id: PlayerId,
    pub username: String,
    pub lobby_addr: Addr<LobbyServer>,
    pub anti_spam: AntiSpamState,
}

impl WsActorUtils for LobbySession {
    fn anti_spam(&mut self) -> &mut AntiSpamState {
        &mut self.anti_spam
    }

    fn player_id(&self) -> PlayerId {
        self.player_id
    }
}

impl Actor for LobbySession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.lobby_addr.do_send(Join {
            player_id: self.player_id,
            username: self.username.clone(),
            addr: ctx.address(),
        });
    }

    fn stopped(&mut self, ctx: &mut Self::Context) {
        self.lobby_addr.do_send(Leave {
            player_id: self.player_id,
            addr: ctx.address(),
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for LobbySession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                if self.anti_spam.record_request(self.player_id) {
                    self.send_ban_and_close(ctx);
                    return;
                }
                match serde_json::from_str::<ClientWsMessage>(&text) {
                    Ok(command) => self.lobby_addr.do_send(LobbyCommand {
                        player_id: self.player_id,
                        addr: ctx.address(),
                        command,
                    }),
                    Err(e) => {
                        self.send_error_and_maybe_ban(ctx, "INVALID_MESSAGE", &format!("Invalid client message: {}", e), None)
                    }
                }
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<ServerWsMessage> for LobbySession {
    type Result = ();

    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) {
        if let ServerWsMessage::Error { code, message, context } = msg {
            self.send_error_and_maybe_ban(ctx, &code, &message, context);
            return;
        }
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                error!("[Lobby] Failed to serialize ServerWsMessage: {}", e);
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }
}

impl Handler<SessionKicked> for LobbySession {
    type Result = ();

    fn handle(&mut self, _msg: SessionKicked, ctx: &mut Self::Context) {
        ctx.text(ws_session_kicked_message(None));
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Policy,
            description: Some("Replaced by a newer session".into()),
        }));
        ctx.stop();
    }
}

/// Split a query string into decoded `player_id` and `username`.
pub(crate) fn parse_identity(query: &str) -> (Option<PlayerId>, String) {
    let mut player_id = None;
    let mut username = String::new();

    for kv in query.split('&') {
        let mut split = kv.split('=');
        match (split.next(), split.next()) {
            (Some("player_id"), Some(raw)) => player_id = PlayerId::parse_str(raw).ok(),
            (Some("username"), Some(name)) => {
                username = urlencoding::decode(name)
                    .unwrap_or_else(|_| Cow::Borrowed(""))
                    .into_owned();
            }
            _ => {}
        }
    }
    (player_id, username)
}

/// WebSocket endpoint for the room lobby.
///
/// Expects query parameters: `player_id` (uuid), `username` (optional).
/// If username is missing, a default is derived from the player id.
pub async fn ws_lobby(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let (player_id, mut username) = parse_identity(req.query_string());

    let Some(player_id) = player_id else {
        return Ok(http_error_response(
            "MISSING_PLAYER_ID",
            "Missing or invalid player_id",
            None,
            StatusCode::BAD_REQUEST,
        ));
    };

    if username.trim().is_empty() {
        username = format!("Player_{}", &player_id.simple().to_string()[..6]);
    }

    ws::start(
        LobbySession {
            player_id,
            username,
            lobby_addr: data.lobby_addr.clone(),
            anti_spam: AntiSpamState::new(),
        },
        &req,
        stream,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity() {
        let id = PlayerId::new_v4();
        let (parsed, name) = parse_identity(&format!("player_id={}&username=Ada%20L", id));
        assert_eq!(parsed, Some(id));
        assert_eq!(name, "Ada L");

        let (parsed, name) = parse_identity("player_id=nope");
        assert_eq!(parsed, None);
        assert!(name.is_empty());
    }

    #[test]
    fn test_client_commands_parse() {
        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"action":"SelectCharacter","data":{"character":"priest"}}"#).unwrap();
        assert_eq!(
            msg,
            ClientWsMessage::SelectCharacter {
                character: crate::game::types::CharacterType::Priest
            }
        );
        let msg: ClientWsMessage = serde_json::from_str(r#"{"action":"CreateRoom"}"#).unwrap();
        assert_eq!(msg, ClientWsMessage::CreateRoom);
    }
}
