use actix::ActorContext;
use actix_web_actors::ws;
use serde_json::Value;

use crate::game::ActionError;
use crate::game::types::PlayerId;
use crate::server::anti_spam::AntiSpamState;
use crate::server::ws_error::{ws_action_error_message, ws_error_message};

/// Error replies shared by the lobby and game socket actors. Every reply counts
/// against the socket's response budget; an exhausted budget bans the socket.
pub trait WsActorUtils {
    fn anti_spam(&mut self) -> &mut AntiSpamState;
    fn player_id(&self) -> PlayerId;

    /// Send a ban notice, then close and stop the actor.
    fn send_ban_and_close<A>(&mut self, ctx: &mut ws::WebsocketContext<A>)
    where
        A: actix::Actor<Context = ws::WebsocketContext<A>>,
    {
        let context = serde_json::json!({
            "player_id": self.player_id(),
            "ban_remaining_secs": self.anti_spam().ban_remaining_secs(),
        });
        ctx.text(ws_error_message(
            "BANNED",
            "You have been banned for spamming. Please try again later.",
            Some(context),
        ));
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Policy,
            description: Some("Banned for spam".into()),
        }));
        ctx.stop();
    }

    /// Send an already formatted error frame, skipping it if `code` repeats the last one.
    fn send_error_frame<A>(&mut self, ctx: &mut ws::WebsocketContext<A>, code: &str, frame: String)
    where
        A: actix::Actor<Context = ws::WebsocketContext<A>>,
    {
        let player_id = self.player_id();
        if !self.anti_spam().should_send_error(code, player_id) {
            return;
        }
        if self.anti_spam().record_response(player_id) {
            self.send_ban_and_close(ctx);
            return;
        }
        ctx.text(frame);
    }

    fn send_error_and_maybe_ban<A>(
        &mut self,
        ctx: &mut ws::WebsocketContext<A>,
        code: &str,
        message: &str,
        context: Option<Value>,
    ) where
        A: actix::Actor<Context = ws::WebsocketContext<A>>,
    {
        self.send_error_frame(ctx, code, ws_error_message(code, message, context));
    }

    /// Report a rule rejection from the engine.
    fn send_action_error<A>(&mut self, ctx: &mut ws::WebsocketContext<A>, err: &ActionError, context: Option<Value>)
    where
        A: actix::Actor<Context = ws::WebsocketContext<A>>,
    {
        self.send_error_frame(ctx, err.code(), ws_action_error_message(err, context));
    }
}
