use actix::{Actor, ActorContext, Addr, AsyncContext, Handler, StreamHandler};
use actix_web::{Error, HttpRequest, HttpResponse, error, http::StatusCode, web};
use actix_web_actors::ws;
use log::error;
use uuid::Uuid;

use crate::game::types::PlayerId;
use crate::server::anti_spam::AntiSpamState;
use crate::server::game_session::messages::{
    ActionApplied, ActionRejected, ClientMessage, GameStateUpdate, ProcessClientMessage, RequestRejected, ServerFrame,
    SessionKicked,
};
use crate::server::game_session::server::{GameSession, GetGameSession, IsPlayer, RegisterSession, UnregisterSession};
use crate::server::lobby::session::parse_identity;
use crate::server::ws_actor_utils::WsActorUtils;
use crate::server::ws_error::{http_error_response, ws_session_kicked_message};

/// One player's socket into a running game.
pub struct GameSessionActor {
    pub game_id: Uuid,
    pub player_id: PlayerId,
    pub session_addr: Addr<GameSession>,
    pub anti_spam: AntiSpamState,
}

impl WsActorUtils for GameSessionActor {
    fn anti_spam(&mut self) -> &mut AntiSpamState {
        &mut self.anti_spam
    }

    fn player_id(&self) -> PlayerId {
        self.player_id
    }
}

impl GameSessionActor {
    fn send_frame(&mut self, frame: &ServerFrame<'_>, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(frame) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                error!("[GameSession] Failed to serialize frame for game {}: {}", self.game_id, e);
                self.send_error_and_maybe_ban(ctx, "INTERNAL_ERROR", "Failed to serialize game state", None);
            }
        }
    }
}

impl Actor for GameSessionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.session_addr.do_send(RegisterSession {
            player_id: self.player_id,
            addr: ctx.address(),
        });
    }

    fn stopped(&mut self, ctx: &mut Self::Context) {
        self.session_addr.do_send(UnregisterSession {
            player_id: self.player_id,
            addr: ctx.address(),
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSessionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                if self.anti_spam.record_request(self.player_id) {
                    self.send_ban_and_close(ctx);
                    return;
                }
                let msg: ClientMessage = match serde_json::from_str(&text) {
                    Ok(m) => m,
                    Err(_) => {
                        self.send_error_and_maybe_ban(ctx, "INVALID_COMMAND", "Invalid command", None);
                        return;
                    }
                };
                self.session_addr.do_send(ProcessClientMessage {
                    msg,
                    player_id: self.player_id,
                    addr: ctx.address(),
                });
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(_)) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<GameStateUpdate> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: GameStateUpdate, ctx: &mut Self::Context) -> Self::Result {
        self.send_frame(&ServerFrame::GameState(&msg.state), ctx);
    }
}

impl Handler<ActionApplied> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: ActionApplied, ctx: &mut Self::Context) -> Self::Result {
        if msg.player_id == self.player_id {
            self.anti_spam.reset_on_valid_action();
        }
        self.send_frame(
            &ServerFrame::ActionApplied {
                player_id: msg.player_id,
                outcome: &msg.outcome,
            },
            ctx,
        );
    }
}

impl Handler<ActionRejected> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: ActionRejected, ctx: &mut Self::Context) -> Self::Result {
        let context = serde_json::json!({ "game_id": self.game_id });
        self.send_action_error(ctx, &msg.error, Some(context));
    }
}

impl Handler<RequestRejected> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: RequestRejected, ctx: &mut Self::Context) -> Self::Result {
        let context = serde_json::json!({ "game_id": self.game_id });
        self.send_error_and_maybe_ban(ctx, msg.error.code(), &msg.error.to_string(), Some(context));
    }
}

impl Handler<SessionKicked> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, _msg: SessionKicked, ctx: &mut Self::Context) -> Self::Result {
        ctx.text(ws_session_kicked_message(None));
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Policy,
            description: Some("Replaced by a newer session".into()),
        }));
        ctx.stop();
    }
}

/// WebSocket endpoint for a running game. Only seated players may connect.
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let game_id = req
        .match_info()
        .get("game_id")
        .ok_or_else(|| error::ErrorBadRequest("Missing game id"))?;
    let game_id = Uuid::parse_str(game_id).map_err(error::ErrorBadRequest)?;

    let (player_id, _) = parse_identity(req.query_string());
    let Some(player_id) = player_id else {
        return Ok(http_error_response(
            "MISSING_PLAYER_ID",
            "Missing or invalid player_id",
            None,
            StatusCode::BAD_REQUEST,
        ));
    };

    let session_addr = match data
        .game_session_manager
        .send(GetGameSession { game_id })
        .await
        .map_err(error::ErrorInternalServerError)?
    {
        Ok(addr) => addr,
        Err(message) => {
            let context = game_id.to_string();
            return Ok(http_error_response("GAME_NOT_FOUND", &message, Some(&context), StatusCode::NOT_FOUND));
        }
    };

    let is_player = session_addr
        .send(IsPlayer(player_id))
        .await
        .map_err(error::ErrorInternalServerError)?;
    if !is_player {
        let context = player_id.to_string();
        return Ok(http_error_response(
            "NOT_A_PLAYER",
            "Only seated players can join this game",
            Some(&context),
            StatusCode::FORBIDDEN,
        ));
    }

    ws::start(
        GameSessionActor {
            game_id,
            player_id,
            session_addr,
            anti_spam: AntiSpamState::new(),
        },
        &req,
        stream,
    )
}
