//! Room model for the lobby.
//!
//! Rooms only gather players and their choices. Nothing here touches game rules;
//! `Room::seats` is the hand-off point to the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::game::{MAX_PLAYERS, MIN_PLAYERS};
use crate::config::server::MAX_ROOM_MEMBERS;
use crate::game::SetupError;
use crate::game::entities::Seat;
use crate::game::types::{CharacterType, PlayerId};

pub type RoomId = String;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub username: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomMember {
    pub id: PlayerId,
    pub username: String,
    pub ready: bool,
    pub character: Option<CharacterType>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub host_id: PlayerId,
    /// In join order. The first member takes over when the host leaves.
    pub members: Vec<RoomMember>,
}

/// Room entry in the public room list.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: RoomId,
    pub host_name: String,
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("Room {0} does not exist")]
    RoomNotFound(RoomId),

    #[error("Room is full")]
    RoomFull,

    #[error("You are not in a room")]
    NotInRoom,

    #[error("You are already in a room")]
    AlreadyInRoom,

    #[error("Only the room host can do this")]
    NotHost,

    #[error("Every player must be ready")]
    NotAllReady,

    #[error("The {0} is already taken")]
    CharacterTaken(CharacterType),

    #[error(transparent)]
    Setup(#[from] SetupError),
}

impl LobbyError {
    pub fn code(&self) -> &'static str {
        match self {
            LobbyError::RoomNotFound(_) => "ROOM_NOT_FOUND",
            LobbyError::RoomFull => "ROOM_FULL",
            LobbyError::NotInRoom => "NOT_IN_ROOM",
            LobbyError::AlreadyInRoom => "ALREADY_IN_ROOM",
            LobbyError::NotHost => "NOT_HOST",
            LobbyError::NotAllReady => "NOT_ALL_READY",
            LobbyError::CharacterTaken(_) => "CHARACTER_TAKEN",
            LobbyError::Setup(_) => "INVALID_PLAYER_COUNT",
        }
    }
}

impl Room {
    pub fn new(id: RoomId, host: PlayerInfo) -> Self {
        let host_id = host.id;
        let mut room = Self {
            id,
            host_id,
            members: Vec::new(),
        };
        room.members.push(RoomMember {
            id: host.id,
            username: host.username,
            ready: false,
            character: None,
        });
        room
    }

    pub fn is_member(&self, id: PlayerId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    fn member_mut(&mut self, id: PlayerId) -> Result<&mut RoomMember, LobbyError> {
        self.members.iter_mut().find(|m| m.id == id).ok_or(LobbyError::NotInRoom)
    }

    pub fn add_member(&mut self, info: PlayerInfo) -> Result<(), LobbyError> {
        if self.is_member(info.id) {
            return Ok(());
        }
        if self.members.len() >= MAX_ROOM_MEMBERS {
            return Err(LobbyError::RoomFull);
        }
        self.members.push(RoomMember {
            id: info.id,
            username: info.username,
            ready: false,
            character: None,
        });
        Ok(())
    }

    /// Remove a member, handing the host role on if needed. Returns true if the room is now empty.
    pub fn remove_member(&mut self, id: PlayerId) -> bool {
        self.members.retain(|m| m.id != id);
        if self.host_id == id {
            if let Some(next) = self.members.first() {
                self.host_id = next.id;
            }
        }
        self.members.is_empty()
    }

    pub fn set_ready(&mut self, id: PlayerId, ready: bool) -> Result<(), LobbyError> {
        self.member_mut(id)?.ready = ready;
        Ok(())
    }

    /// Pick a character. Each character can be held by one member at a time.
    pub fn select_character(&mut self, id: PlayerId, character: CharacterType) -> Result<(), LobbyError> {
        if self.members.iter().any(|m| m.id != id && m.character == Some(character)) {
            return Err(LobbyError::CharacterTaken(character));
        }
        self.member_mut(id)?.character = Some(character);
        Ok(())
    }

    /// Seats for a new game: members in join order, then `ai_players` AI seats.
    pub fn seats(&self, ai_players: usize) -> Result<Vec<Seat>, LobbyError> {
        if self.members.iter().any(|m| !m.ready) {
            return Err(LobbyError::NotAllReady);
        }
        let total = self.members.len() + ai_players;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&total) {
            return Err(SetupError::PlayerCount(total).into());
        }

        let humans = self.members.iter().map(|m| {
            let seat = Seat::human(&m.username).with_id(m.id);
            match m.character {
                Some(character) => seat.with_character(character),
                None => seat,
            }
        });
        Ok(humans.chain((1..=ai_players).map(Seat::ai)).collect())
    }

    pub fn summary(&self) -> RoomSummary {
        let host_name = self
            .members
            .iter()
            .find(|m| m.id == self.host_id)
            .map(|m| m.username.clone())
            .unwrap_or_default();
        RoomSummary {
            id: self.id.clone(),
            host_name,
            member_count: self.members.len(),
        }
    }
}
