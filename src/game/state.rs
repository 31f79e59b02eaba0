use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::entities::{Player, Pyramid, Seat};
use crate::game::systems::BettingBoard;
use crate::game::track::CamelTrack;
use crate::game::types::{GamePhase, HistoryEntry, PlayerId, SpectatorTile};

/// The whole game as one value. This is the snapshot broadcast to every client and
/// the unit accepted back by `GameEngine::replace_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub game_id: Uuid,
    pub phase: GamePhase,
    pub current_player_index: usize,
    pub leg_number: u32,
    pub players: Vec<Player>,
    #[serde(flatten)]
    pub track: CamelTrack,
    pub pyramid: Pyramid,
    #[serde(flatten)]
    pub betting: BettingBoard,
    pub history: Vec<HistoryEntry>,
}

impl GameState {
    /// A game in the `Setup` phase: players seated, camels on their start cells.
    pub fn new<R: Rng>(seats: Vec<Seat>, rng: &mut R) -> Self {
        let mut track = CamelTrack::new();
        track.initialize_camels(rng);

        GameState {
            game_id: Uuid::new_v4(),
            phase: GamePhase::Setup,
            current_player_index: 0,
            leg_number: 1,
            players: seats.into_iter().map(Seat::into_player).collect(),
            track,
            pyramid: Pyramid::new(rng),
            betting: BettingBoard::new(),
            history: Vec::new(),
        }
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Tiles currently on the track, taken from their owners.
    pub fn active_tiles(&self) -> Vec<SpectatorTile> {
        self.players
            .iter()
            .filter_map(|p| p.spectator_tile.clone())
            .filter(|tile| tile.position.is_some())
            .collect()
    }
}
