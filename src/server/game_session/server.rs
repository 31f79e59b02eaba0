use std::collections::HashMap;
use std::time::Duration;

use actix::prelude::*;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::game::{AI_TURN_DELAY_MS, IDLE_SESSION_TIMEOUT_SECS};
use crate::game::types::{GamePhase, PlayerId};
use crate::game::{ActionResult, GameEngine, GameState};
use crate::server::game_session::messages::{
    ActionApplied, ActionRejected, ClientMessage, GameStateUpdate, ProcessClientMessage, RegisterGame,
    RequestRejected, SessionError, SessionKicked, SessionRequest,
};
use crate::server::game_session::session::GameSessionActor;
use crate::server::session_utils::is_game_session_addr_valid;

/// One running game. Holds the only authoritative engine for it and pushes the full
/// snapshot to every connected socket after each change.
pub struct GameSession {
    pub game_id: Uuid,
    pub host_id: PlayerId,
    engine: GameEngine,
    connections: HashMap<PlayerId, Addr<GameSessionActor>>,
    ai_timer: Option<SpawnHandle>,
    /// Runs while nobody is connected. Firing closes the session.
    idle_timer: Option<SpawnHandle>,
    idle_timeout: Duration,
    manager: Addr<GameSessionManager>,
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.arm_idle_timer(ctx);
        self.schedule_ai(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.manager.do_send(RemoveGame { game_id: self.game_id });
    }
}

impl GameSession {
    pub fn new(engine: GameEngine, host_id: PlayerId, manager: Addr<GameSessionManager>, idle_timeout: Duration) -> Self {
        Self {
            game_id: engine.state().game_id,
            host_id,
            engine,
            connections: HashMap::new(),
            ai_timer: None,
            idle_timer: None,
            idle_timeout,
            manager,
        }
    }

    /// (Re)start the countdown that closes the session if nobody connects in time.
    fn arm_idle_timer(&mut self, ctx: &mut Context<Self>) {
        self.disarm_idle_timer(ctx);
        let handle = ctx.run_later(self.idle_timeout, |act, ctx| {
            act.idle_timer = None;
            if act.connections.is_empty() {
                info!(
                    "[GameSession] Game {} idle for {:?} in phase {}, closing",
                    act.game_id,
                    act.idle_timeout,
                    act.engine.phase()
                );
                ctx.stop();
            }
        });
        self.idle_timer = Some(handle);
    }

    fn disarm_idle_timer(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.idle_timer.take() {
            ctx.cancel_future(handle);
        }
    }

    pub fn send_state(&self) {
        let state = self.engine.game_state();
        debug!(
            "[GameSession] Broadcast GameState: game_id={} phase={} leg={} dice_rolled={} connections={}",
            self.game_id,
            state.phase,
            state.leg_number,
            state.pyramid.resolved_count(),
            self.connections.len()
        );
        for addr in self.connections.values() {
            addr.do_send(GameStateUpdate { state: state.clone() });
        }
    }

    fn broadcast_outcome(&self, player_id: PlayerId, result: &ActionResult) {
        if let Ok(outcome) = result {
            for addr in self.connections.values() {
                addr.do_send(ActionApplied {
                    player_id,
                    outcome: outcome.clone(),
                });
            }
        }
    }

    /// Queue the next AI move if an AI holds the current seat.
    fn schedule_ai(&mut self, ctx: &mut Context<Self>) {
        if self.ai_timer.is_some() || !self.engine.is_ai_turn() {
            return;
        }
        let handle = ctx.run_later(Duration::from_millis(AI_TURN_DELAY_MS), |act, ctx| {
            act.ai_timer = None;
            let ai_id = act.engine.current_player().map(|p| p.id);
            if let (Some(result), Some(ai_id)) = (act.engine.play_ai_turn(), ai_id) {
                if let Err(err) = &result {
                    warn!("[GameSession] AI {} could not act: {}", ai_id, err);
                }
                act.broadcast_outcome(ai_id, &result);
                act.send_state();
            }
            act.schedule_ai(ctx);
        });
        self.ai_timer = Some(handle);
    }

    /// Host only: overwrite the engine with `state` and push it to everyone.
    fn replace_state(&mut self, player_id: PlayerId, state: GameState) -> Result<(), SessionError> {
        if player_id != self.host_id {
            warn!("[GameSession] Non-host {} tried to replace state of {}", player_id, self.game_id);
            return Err(SessionError::NotHost);
        }
        self.engine.replace_state(state);
        info!("[GameSession] Host replaced state of game {}", self.game_id);
        self.send_state();
        Ok(())
    }

    fn handle_request(&mut self, request: SessionRequest, player_id: PlayerId, addr: &Addr<GameSessionActor>) {
        match request {
            SessionRequest::ReplaceState(state) => {
                if let Err(error) = self.replace_state(player_id, *state) {
                    addr.do_send(RequestRejected { error });
                }
            }
            SessionRequest::RequestState => addr.do_send(GameStateUpdate {
                state: self.engine.game_state(),
            }),
            SessionRequest::Ping => {}
        }
    }
}

pub struct GameSessionManager {
    sessions: HashMap<Uuid, Addr<GameSession>>,
    idle_timeout: Duration,
}

impl GameSessionManager {
    pub fn new() -> Self {
        Self::with_idle_timeout(Duration::from_secs(IDLE_SESSION_TIMEOUT_SECS))
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
        }
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

impl Handler<RegisterGame> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: RegisterGame, ctx: &mut Context<Self>) -> Self::Result {
        let game_id = msg.engine.state().game_id;
        let session = GameSession::new(*msg.engine, msg.host_id, ctx.address(), self.idle_timeout).start();

        self.sessions.insert(game_id, session);
        info!("[GameSession] Game {} registered ({} running)", game_id, self.sessions.len());
    }
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RemoveGame {
    pub game_id: Uuid,
}

impl Handler<RemoveGame> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: RemoveGame, _: &mut Context<Self>) -> Self::Result {
        if self.sessions.remove(&msg.game_id).is_some() {
            info!("[GameSession] Game {} removed", msg.game_id);
        }
    }
}

#[derive(Message)]
#[rtype(result = "Result<Addr<GameSession>, String>")]
pub struct GetGameSession {
    pub game_id: Uuid,
}

impl Handler<GetGameSession> for GameSessionManager {
    type Result = Result<Addr<GameSession>, String>;

    fn handle(&mut self, msg: GetGameSession, _: &mut Context<Self>) -> Self::Result {
        self.sessions
            .get(&msg.game_id)
            .cloned()
            .ok_or_else(|| "Game session not found".to_string())
    }
}

/// True if the player holds a seat in this game.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct IsPlayer(pub PlayerId);

impl Handler<IsPlayer> for GameSession {
    type Result = bool;

    fn handle(&mut self, msg: IsPlayer, _: &mut Context<Self>) -> Self::Result {
        self.engine.state().player(msg.0).is_some_and(|p| !p.is_ai)
    }
}

impl Handler<ProcessClientMessage> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ProcessClientMessage, ctx: &mut Context<Self>) -> Self::Result {
        if !is_game_session_addr_valid(&self.connections, &msg.player_id, &msg.addr) {
            warn!("[GameSession] Message from unregistered socket of {}", msg.player_id);
            return;
        }

        let action = match msg.msg {
            ClientMessage::Action(action) => action,
            ClientMessage::Session(request) => {
                self.handle_request(request, msg.player_id, &msg.addr);
                self.schedule_ai(ctx);
                return;
            }
        };

        let result = self.engine.apply_action_for(msg.player_id, action);
        match &result {
            Ok(outcome) => debug!("[GameSession] {}: {}", msg.player_id, outcome.message),
            Err(error) => msg.addr.do_send(ActionRejected { error: error.clone() }),
        }
        if result.is_ok() {
            self.broadcast_outcome(msg.player_id, &result);
            self.send_state();
            if self.engine.phase() == GamePhase::GameEnd {
                if let Some(winner) = self.engine.winner() {
                    info!("[GameSession] Game {} won by {} with {} EP", self.game_id, winner.name, winner.money);
                }
            }
        }
        self.schedule_ai(ctx);
    }
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RegisterSession {
    pub player_id: PlayerId,
    pub addr: Addr<GameSessionActor>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct UnregisterSession {
    pub player_id: PlayerId,
    pub addr: Addr<GameSessionActor>,
}

impl Handler<RegisterSession> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: RegisterSession, ctx: &mut Context<Self>) -> Self::Result {
        self.disarm_idle_timer(ctx);
        if let Some(old) = self.connections.insert(msg.player_id, msg.addr.clone()) {
            if old != msg.addr {
                old.do_send(SessionKicked);
            }
        }
        debug!("[GameSession] Player {} connected to game {}", msg.player_id, self.game_id);
        msg.addr.do_send(GameStateUpdate {
            state: self.engine.game_state(),
        });
    }
}

impl Handler<UnregisterSession> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: UnregisterSession, ctx: &mut Context<Self>) -> Self::Result {
        if !is_game_session_addr_valid(&self.connections, &msg.player_id, &msg.addr) {
            return;
        }
        self.connections.remove(&msg.player_id);
        debug!("[GameSession] Player {} left game {}", msg.player_id, self.game_id);

        if !self.connections.is_empty() {
            return;
        }
        if self.engine.phase() == GamePhase::GameEnd {
            ctx.stop();
        } else {
            self.arm_idle_timer(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::seats_for;
    use crate::game::types::CamelColor;

    fn engine() -> GameEngine {
        GameEngine::with_seed(seats_for(&["Ada", "Bo"], 0, &[]), 1).unwrap()
    }

    #[actix::test]
    async fn test_unjoined_game_is_closed_after_idle_timeout() {
        let manager = GameSessionManager::with_idle_timeout(Duration::from_millis(50)).start();
        let mut game_ids = Vec::new();
        for _ in 0..3 {
            let engine = engine();
            game_ids.push(engine.state().game_id);
            let host_id = engine.state().players[0].id;
            manager
                .send(RegisterGame {
                    engine: Box::new(engine),
                    host_id,
                })
                .await
                .unwrap();
        }
        for &game_id in &game_ids {
            assert!(manager.send(GetGameSession { game_id }).await.unwrap().is_ok());
        }

        actix::clock::sleep(Duration::from_millis(300)).await;

        for &game_id in &game_ids {
            assert!(manager.send(GetGameSession { game_id }).await.unwrap().is_err());
        }
    }

    #[actix::test]
    async fn test_only_host_replaces_state() {
        let manager = GameSessionManager::new().start();
        let engine = engine();
        let (ada, bo) = (engine.state().players[0].id, engine.state().players[1].id);
        let mut session = GameSession::new(engine, ada, manager, Duration::from_secs(60));

        let mut source = GameEngine::with_seed(seats_for(&["X", "Y", "Z"], 0, &[]), 2).unwrap();
        source.place_leg_bet(CamelColor::Red).unwrap();
        let incoming = source.game_state();

        let before = session.engine.game_state();
        assert_eq!(session.replace_state(bo, incoming.clone()), Err(SessionError::NotHost));
        assert_eq!(session.engine.game_state(), before);

        session.replace_state(ada, incoming.clone()).unwrap();
        assert_eq!(session.engine.game_state(), incoming);
    }
}
