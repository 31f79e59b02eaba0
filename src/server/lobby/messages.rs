use actix::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::types::{LobbyError, Room, RoomId, RoomSummary};
use crate::game::types::CharacterType;

/// Client -> lobby.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", content = "data")]
pub enum ClientWsMessage {
    CreateRoom,
    JoinRoom { room_id: RoomId },
    ListRooms,
    LeaveRoom,
    SetReady { ready: bool },
    SelectCharacter { character: CharacterType },
    StartGame { ai_players: usize },
    Ping,
}

/// Lobby -> client.
#[derive(Message, Serialize, Deserialize, Clone, Debug)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerWsMessage {
    RoomUpdate(Room),
    RoomList(Vec<RoomSummary>),
    LeftRoom,
    GameStarted {
        game_id: Uuid,
    },
    Error {
        code: String,
        message: String,
        context: Option<Value>,
    },
}

impl ServerWsMessage {
    pub fn error(err: &LobbyError) -> Self {
        Self::Error {
            code: err.code().to_string(),
            message: err.to_string(),
            context: None,
        }
    }
}

/// Sent to a socket replaced by a newer connection with the same player id.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SessionKicked;
