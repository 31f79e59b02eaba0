/// Lobby server actor.
///
/// Tracks connected lobby sockets and the open rooms. Room changes are broadcast to
/// the room's members. Starting a game builds the engine here and hands it to the
/// game session manager.
use std::collections::HashMap;

use actix::prelude::*;
use log::{debug, info, warn};
use rand::Rng;

use super::messages::{ClientWsMessage, ServerWsMessage, SessionKicked};
use super::session::LobbySession;
use super::types::{LobbyError, PlayerInfo, Room, RoomId};
use crate::config::server::ROOM_CODE_LEN;
use crate::game::GameEngine;
use crate::game::types::PlayerId;
use crate::server::game_session::messages::RegisterGame;
use crate::server::game_session::server::GameSessionManager;
use crate::server::session_utils::get_by_addr_mut;

type SessionAddr = Addr<LobbySession>;

const ROOM_CODE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// A lobby socket and the room it sits in, if any.
struct ConnectedPlayer {
    info: PlayerInfo,
    addr: SessionAddr,
    room: Option<RoomId>,
}

pub struct LobbyServer {
    players: HashMap<PlayerId, ConnectedPlayer>,
    rooms: HashMap<RoomId, Room>,
    game_session_manager: Addr<GameSessionManager>,
}

impl LobbyServer {
    pub fn new(game_session_manager: Addr<GameSessionManager>) -> Self {
        Self {
            players: HashMap::new(),
            rooms: HashMap::new(),
            game_session_manager,
        }
    }

    fn send_to(&self, player_id: PlayerId, msg: ServerWsMessage) {
        if let Some(player) = self.players.get(&player_id) {
            player.addr.do_send(msg);
        }
    }

    /// Push the room's current state to every member.
    fn broadcast_room(&self, room_id: &RoomId) {
        let Some(room) = self.rooms.get(room_id) else {
            return;
        };
        debug!("[Lobby] Broadcast room {} ({} members)", room.id, room.members.len());
        for member in &room.members {
            self.send_to(member.id, ServerWsMessage::RoomUpdate(room.clone()));
        }
    }

    fn room_list(&self) -> ServerWsMessage {
        let mut rooms: Vec<_> = self.rooms.values().map(Room::summary).collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        ServerWsMessage::RoomList(rooms)
    }

    fn new_room_code(&self) -> RoomId {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..ROOM_CODE_LEN)
                .map(|_| ROOM_CODE_CHARS[rng.random_range(0..ROOM_CODE_CHARS.len())] as char)
                .collect();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    fn current_room(&self, player_id: PlayerId) -> Result<RoomId, LobbyError> {
        self.players
            .get(&player_id)
            .and_then(|p| p.room.clone())
            .ok_or(LobbyError::NotInRoom)
    }

    fn ensure_roomless(&self, player_id: PlayerId) -> Result<PlayerInfo, LobbyError> {
        match self.players.get(&player_id) {
            Some(player) if player.room.is_none() => Ok(player.info.clone()),
            Some(_) => Err(LobbyError::AlreadyInRoom),
            None => Err(LobbyError::NotInRoom),
        }
    }

    fn set_room(&mut self, player_id: PlayerId, room: Option<RoomId>) {
        if let Some(player) = self.players.get_mut(&player_id) {
            player.room = room;
        }
    }

    fn create_room(&mut self, player_id: PlayerId) -> Result<(), LobbyError> {
        let info = self.ensure_roomless(player_id)?;
        let room_id = self.new_room_code();
        self.rooms.insert(room_id.clone(), Room::new(room_id.clone(), info));
        self.set_room(player_id, Some(room_id.clone()));
        info!("[Lobby] Room {} created by {}", room_id, player_id);
        self.broadcast_room(&room_id);
        Ok(())
    }

    fn join_room(&mut self, player_id: PlayerId, room_id: RoomId) -> Result<(), LobbyError> {
        let info = self.ensure_roomless(player_id)?;
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| LobbyError::RoomNotFound(room_id.clone()))?;
        room.add_member(info)?;
        self.set_room(player_id, Some(room_id.clone()));
        debug!("[Lobby] Player {} joined room {}", player_id, room_id);
        self.broadcast_room(&room_id);
        Ok(())
    }

    fn leave_room(&mut self, player_id: PlayerId) -> Result<(), LobbyError> {
        let room_id = self.current_room(player_id)?;
        self.set_room(player_id, None);

        let now_empty = self
            .rooms
            .get_mut(&room_id)
            .is_some_and(|room| room.remove_member(player_id));
        if now_empty {
            self.rooms.remove(&room_id);
            info!("[Lobby] Room {} closed", room_id);
        } else {
            self.broadcast_room(&room_id);
        }
        debug!("[Lobby] Player {} left room {}", player_id, room_id);
        Ok(())
    }

    fn update_room(
        &mut self,
        player_id: PlayerId,
        change: impl FnOnce(&mut Room) -> Result<(), LobbyError>,
    ) -> Result<(), LobbyError> {
        let room_id = self.current_room(player_id)?;
        let room = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| LobbyError::RoomNotFound(room_id.clone()))?;
        change(room)?;
        self.broadcast_room(&room_id);
        Ok(())
    }

    /// Host only: build the game from the room, then dissolve the room.
    fn start_game(&mut self, player_id: PlayerId, ai_players: usize) -> Result<(), LobbyError> {
        let room_id = self.current_room(player_id)?;
        let room = self
            .rooms
            .get(&room_id)
            .ok_or_else(|| LobbyError::RoomNotFound(room_id.clone()))?;
        if room.host_id != player_id {
            return Err(LobbyError::NotHost);
        }

        let engine = GameEngine::new(room.seats(ai_players)?)?;
        let game_id = engine.state().game_id;
        let members: Vec<PlayerId> = room.members.iter().map(|m| m.id).collect();

        self.game_session_manager.do_send(RegisterGame {
            engine: Box::new(engine),
            host_id: player_id,
        });
        for member in &members {
            self.send_to(*member, ServerWsMessage::GameStarted { game_id });
            self.set_room(*member, None);
        }
        self.rooms.remove(&room_id);

        info!(
            "[Lobby] Room {} started game {} with {} players and {} AI",
            room_id,
            game_id,
            members.len(),
            ai_players
        );
        Ok(())
    }

    /// Drop a closed socket's player, leaving their room first if they were in one.
    fn disconnect(&mut self, player_id: PlayerId) {
        match self.leave_room(player_id) {
            Ok(()) | Err(LobbyError::NotInRoom) => {}
            Err(err) => warn!("[Lobby] Player {} could not leave their room: {}", player_id, err),
        }
        self.players.remove(&player_id);
        debug!("[Lobby] Player {} disconnected", player_id);
    }

    fn handle_command(&mut self, player_id: PlayerId, command: ClientWsMessage) -> Result<(), LobbyError> {
        match command {
            ClientWsMessage::CreateRoom => self.create_room(player_id),
            ClientWsMessage::JoinRoom { room_id } => self.join_room(player_id, room_id),
            ClientWsMessage::ListRooms => {
                self.send_to(player_id, self.room_list());
                Ok(())
            }
            ClientWsMessage::LeaveRoom => {
                self.leave_room(player_id)?;
                self.send_to(player_id, ServerWsMessage::LeftRoom);
                Ok(())
            }
            ClientWsMessage::SetReady { ready } => self.update_room(player_id, |room| room.set_ready(player_id, ready)),
            ClientWsMessage::SelectCharacter { character } => {
                self.update_room(player_id, |room| room.select_character(player_id, character))
            }
            ClientWsMessage::StartGame { ai_players } => self.start_game(player_id, ai_players),
            ClientWsMessage::Ping => Ok(()),
        }
    }
}

/// Message: a lobby socket opened.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub player_id: PlayerId,
    pub username: String,
    pub addr: SessionAddr,
}

/// Message: a lobby socket closed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub player_id: PlayerId,
    pub addr: SessionAddr,
}

/// Message: a client command from a lobby socket.
#[derive(Message)]
#[rtype(result = "()")]
pub struct LobbyCommand {
    pub player_id: PlayerId,
    pub addr: SessionAddr,
    pub command: ClientWsMessage,
}

impl Actor for LobbyServer {
    type Context = Context<Self>;
}

impl Handler<Join> for LobbyServer {
    type Result = ();

    /// Register the socket. A second socket for the same player replaces the first.
    fn handle(&mut self, msg: Join, _ctx: &mut Self::Context) -> Self::Result {
        if let Some(player) = self.players.get_mut(&msg.player_id) {
            if player.addr != msg.addr {
                player.addr.do_send(SessionKicked);
                player.addr = msg.addr;
                debug!("[Lobby] Player {} reconnected (old session kicked)", msg.player_id);
            }
        } else {
            self.players.insert(
                msg.player_id,
                ConnectedPlayer {
                    info: PlayerInfo {
                        id: msg.player_id,
                        username: msg.username,
                    },
                    addr: msg.addr,
                    room: None,
                },
            );
            debug!("[Lobby] Player {} connected", msg.player_id);
        }

        self.send_to(msg.player_id, self.room_list());
        if let Ok(room_id) = self.current_room(msg.player_id) {
            self.broadcast_room(&room_id);
        }
    }
}

impl Handler<Leave> for LobbyServer {
    type Result = ();

    fn handle(&mut self, msg: Leave, _ctx: &mut Self::Context) -> Self::Result {
        if get_by_addr_mut(&mut self.players, &msg.player_id, &msg.addr, |p| &p.addr).is_none() {
            // Stale socket, already replaced.
            return;
        }
        self.disconnect(msg.player_id);
    }
}

impl Handler<LobbyCommand> for LobbyServer {
    type Result = ();

    fn handle(&mut self, msg: LobbyCommand, _ctx: &mut Self::Context) -> Self::Result {
        if get_by_addr_mut(&mut self.players, &msg.player_id, &msg.addr, |p| &p.addr).is_none() {
            warn!("[Lobby] Command from unregistered session of {}", msg.player_id);
            return;
        }
        if let Err(err) = self.handle_command(msg.player_id, msg.command) {
            debug!("[Lobby] Command from {} refused: {}", msg.player_id, err);
            msg.addr.do_send(ServerWsMessage::error(&err));
        }
    }
}
