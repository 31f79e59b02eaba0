//! Plain data records shared by the rules engine.
//!
//! Everything here is serializable with camelCase field names, since the whole
//! game state is exchanged as a single JSON snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a seat at the table.
pub type PlayerId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CamelColor {
    Red,
    Blue,
    Green,
    Yellow,
    White,
}

impl CamelColor {
    pub fn name(self) -> &'static str {
        match self {
            CamelColor::Red => "red",
            CamelColor::Blue => "blue",
            CamelColor::Green => "green",
            CamelColor::Yellow => "yellow",
            CamelColor::White => "white",
        }
    }
}

impl fmt::Display for CamelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spectator tile face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectatorType {
    /// Pushes an arriving stack one cell forward.
    Oasis,
    /// Pushes an arriving stack one cell back.
    Mirage,
}

impl SpectatorType {
    /// Extra cells travelled by a stack that lands on this tile.
    pub fn offset(self) -> i64 {
        match self {
            SpectatorType::Oasis => 1,
            SpectatorType::Mirage => -1,
        }
    }
}

impl fmt::Display for SpectatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectatorType::Oasis => f.write_str("oasis"),
            SpectatorType::Mirage => f.write_str("mirage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterType {
    Pharaoh,
    Merchant,
    Priest,
    Explorer,
    Princess,
    Sheikh,
    Nomad,
    Scholar,
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharacterType::Pharaoh => "Pharaoh",
            CharacterType::Merchant => "Merchant",
            CharacterType::Priest => "Priest",
            CharacterType::Explorer => "Explorer",
            CharacterType::Princess => "Princess",
            CharacterType::Sheikh => "Sheikh",
            CharacterType::Nomad => "Nomad",
            CharacterType::Scholar => "Scholar",
        };
        f.write_str(name)
    }
}

/// Lifecycle of a game: `Setup -> Playing <-> LegEnd -> GameEnd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Setup,
    Playing,
    LegEnd,
    GameEnd,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Setup => "setup",
            GamePhase::Playing => "playing",
            GamePhase::LegEnd => "leg end",
            GamePhase::GameEnd => "game end",
        };
        f.write_str(name)
    }
}

/// A racing camel. Its color doubles as its identity, since each color races once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camel {
    pub color: CamelColor,
    pub position: u32,
    /// Rank inside its cell, 0 = bottom.
    pub stack_position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectatorTile {
    pub player_id: PlayerId,
    #[serde(rename = "type")]
    pub tile_type: SpectatorType,
    /// `None` while the tile sits in front of its owner.
    pub position: Option<u32>,
}

/// One cell of the track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSpace {
    pub position: u32,
    /// Occupying camels, bottom to top.
    pub camels: Vec<CamelColor>,
    pub spectator_tile: Option<SpectatorTile>,
}

impl TrackSpace {
    pub fn new(position: u32) -> Self {
        Self {
            position,
            camels: Vec::new(),
            spectator_tile: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegBet {
    pub player_id: PlayerId,
    pub camel_color: CamelColor,
    /// Face value of the card taken from the stack.
    pub value: i32,
    /// Position among the bets on this color this leg (0-based).
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceBet {
    pub player_id: PlayerId,
    pub camel_color: CamelColor,
    /// `true` bets on the overall winner, `false` on the last camel.
    pub is_winner: bool,
    /// Position among race bets with the same `is_winner` flag (0-based).
    pub order: usize,
}

/// A pyramid die. Its value is fixed when the die is created and only revealed by a roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dice {
    pub color: CamelColor,
    pub value: u32,
    pub rolled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryKind {
    Roll,
    Bet,
    Spectator,
    Skill,
    Leg,
    Game,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub player_name: String,
    pub timestamp_ms: u64,
    pub details: String,
}

/// Tile that fired during a move, reported so the engine can pay its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectatorEffect {
    pub tile_type: SpectatorType,
    pub player_id: PlayerId,
    /// Cell the tile occupied.
    pub position: u32,
}

/// Result of moving one camel (and whatever rides on it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResult {
    pub camel_color: CamelColor,
    pub dice_value: u32,
    pub old_position: u32,
    pub new_position: u32,
    /// The moved camel and everything stacked on it, bottom to top.
    pub carried_camels: Vec<CamelColor>,
    pub spectator_effect: Option<SpectatorEffect>,
}

impl MoveResult {
    pub fn hit_spectator(&self) -> bool {
        self.spectator_effect.is_some()
    }
}

/// Everything a seat can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all_fields = "camelCase")]
pub enum PlayerAction {
    LegBet { color: CamelColor },
    RollDice,
    PlaceSpectator { position: u32, tile_type: SpectatorType },
    RaceBet { color: CamelColor, is_winner: bool },
    PriestOracle,
    SheikhMoveTile { position: u32 },
    ContinueLeg,
}
