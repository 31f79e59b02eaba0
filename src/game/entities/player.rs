//! Player entity.
//!
//! Seats are created once at game setup and mutated by every reward and settlement path.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::game::STARTING_MONEY;
use crate::game::types::{CharacterType, PlayerId, SpectatorTile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub character: Option<CharacterType>,
    /// Balance in EP. May go negative after penalties.
    pub money: i32,
    pub spectator_tile: Option<SpectatorTile>,
    pub has_rolled_dice: bool,
    pub is_ai: bool,
    /// Priest oracle used this leg.
    pub priest_revealed_dice: bool,
    /// Sheikh tile move used this leg.
    pub sheikh_moved_tile: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String, character: Option<CharacterType>, is_ai: bool) -> Self {
        Self {
            id,
            name,
            character,
            money: STARTING_MONEY,
            spectator_tile: None,
            has_rolled_dice: false,
            is_ai,
            priest_revealed_dice: false,
            sheikh_moved_tile: false,
        }
    }

    pub fn is(&self, character: CharacterType) -> bool {
        self.character == Some(character)
    }

    /// Position of this player's tile, if it is on the track.
    pub fn placed_tile_position(&self) -> Option<u32> {
        self.spectator_tile.as_ref().and_then(|tile| tile.position)
    }

    /// Clear the flags that only last for one leg.
    pub fn reset_leg_flags(&mut self) {
        self.has_rolled_dice = false;
        self.priest_revealed_dice = false;
        self.sheikh_moved_tile = false;
    }
}

/// Seat description handed to the engine at setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
    pub character: Option<CharacterType>,
    pub is_ai: bool,
}

impl Seat {
    pub fn human(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            character: None,
            is_ai: false,
        }
    }

    /// AI seats are numbered from 1.
    pub fn ai(number: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("AI Player {}", number),
            character: None,
            is_ai: true,
        }
    }

    pub fn with_id(mut self, id: PlayerId) -> Self {
        self.id = id;
        self
    }

    pub fn with_character(mut self, character: CharacterType) -> Self {
        self.character = Some(character);
        self
    }

    pub fn into_player(self) -> Player {
        Player::new(self.id, self.name, self.character, self.is_ai)
    }
}

/// Build the seat list for `names` human players followed by `ai_count` AI players.
/// `characters` are assigned in seat order; missing entries leave a seat without one.
pub fn seats_for(names: &[&str], ai_count: usize, characters: &[CharacterType]) -> Vec<Seat> {
    let humans = names.iter().map(|name| Seat::human(name));
    let bots = (1..=ai_count).map(Seat::ai);

    humans
        .chain(bots)
        .enumerate()
        .map(|(i, seat)| match characters.get(i) {
            Some(&character) => seat.with_character(character),
            None => seat,
        })
        .collect()
}
