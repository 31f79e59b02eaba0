use actix::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::session::GameSessionActor;
use crate::game::types::{PlayerAction, PlayerId};
use crate::game::{ActionError, ActionOutcome, GameEngine, GameState};

/// Anything a game socket may send.
///
/// Turn actions share the `{"action":..., "data":...}` shape with the session requests,
/// so the two are told apart by trying the actions first.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ClientMessage {
    Action(PlayerAction),
    Session(SessionRequest),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", content = "data")]
pub enum SessionRequest {
    /// Host only: overwrite the authoritative state with this snapshot.
    ReplaceState(Box<GameState>),
    /// Ask for the current snapshot again, e.g. after a reload.
    RequestState,
    Ping,
}

/// Frames written to game sockets.
#[derive(Serialize, Debug)]
#[serde(tag = "action", content = "data")]
pub enum ServerFrame<'a> {
    GameState(&'a GameState),
    ActionApplied {
        player_id: PlayerId,
        outcome: &'a ActionOutcome,
    },
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ProcessClientMessage {
    pub msg: ClientMessage,
    pub player_id: PlayerId,
    pub addr: Addr<GameSessionActor>,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct GameStateUpdate {
    pub state: GameState,
}

/// Broadcast after an action went through, so clients can show what happened.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct ActionApplied {
    pub player_id: PlayerId,
    pub outcome: ActionOutcome,
}

/// Sent to the acting socket only.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct ActionRejected {
    pub error: ActionError,
}

/// Refusals of session requests, as opposed to rule rejections from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Only the game host can replace the game state")]
    NotHost,
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotHost => "NOT_HOST",
        }
    }
}

/// Sent to the requesting socket only.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct RequestRejected {
    pub error: SessionError,
}

/// Sent to a socket replaced by a newer connection with the same player id.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SessionKicked;

/// Lobby -> manager: a room has started this game.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RegisterGame {
    pub engine: Box<GameEngine>,
    pub host_id: PlayerId,
}
