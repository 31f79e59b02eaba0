//! Character skills.
//!
//! Passive skills are a table of pure functions keyed by character and trigger point.
//! Looking up a bonus never mutates anything. The two active skills (Priest oracle,
//! Sheikh tile move) are explicit actions gated by per-leg flags on the player.

use serde::{Deserialize, Serialize};

use crate::game::entities::Player;
use crate::game::error::ActionError;
use crate::game::types::CharacterType;

/// Points in the game where a passive skill may add money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// The player's turn just started.
    TurnStart,
    /// The player rolled a die.
    DiceRoll,
    /// The player placed a spectator tile.
    TilePlaced,
    /// A camel landed on the player's tile.
    TileTriggered,
    /// The player's leg bet was on the leg winner.
    LegBetFirstPlace,
    /// The player's race bet (winner or loser side) was correct.
    RaceBetCorrect,
}

/// What a passive skill can see when it fires.
#[derive(Debug, Clone, Copy)]
pub struct SkillContext<'a> {
    pub players: &'a [Player],
}

pub type SkillEffect = fn(&Player, &SkillContext<'_>) -> i32;

#[derive(Debug, Clone, Copy)]
pub struct PassiveSkill {
    pub character: CharacterType,
    pub trigger: Trigger,
    pub effect: SkillEffect,
}

fn royal_grant(player: &Player, ctx: &SkillContext<'_>) -> i32 {
    let lowest = ctx.players.iter().map(|p| p.money).min().unwrap_or(player.money);
    if player.money == lowest { 1 } else { 0 }
}

fn flat<const N: i32>(_: &Player, _: &SkillContext<'_>) -> i32 {
    N
}

/// Every passive skill in the game.
pub const PASSIVE_SKILLS: [PassiveSkill; 6] = [
    PassiveSkill { character: CharacterType::Pharaoh, trigger: Trigger::TurnStart, effect: royal_grant },
    // Merchant earns 2 per roll: base reward plus one.
    PassiveSkill { character: CharacterType::Merchant, trigger: Trigger::DiceRoll, effect: flat::<1> },
    PassiveSkill { character: CharacterType::Explorer, trigger: Trigger::TilePlaced, effect: flat::<1> },
    // Nomad earns 2 per triggered tile: base reward plus one.
    PassiveSkill { character: CharacterType::Nomad, trigger: Trigger::TileTriggered, effect: flat::<1> },
    PassiveSkill { character: CharacterType::Princess, trigger: Trigger::LegBetFirstPlace, effect: flat::<2> },
    PassiveSkill { character: CharacterType::Scholar, trigger: Trigger::RaceBetCorrect, effect: flat::<3> },
];

/// Lookup table from (character, trigger) to bonus.
#[derive(Debug, Clone, Copy)]
pub struct SkillTable {
    skills: &'static [PassiveSkill],
}

impl Default for SkillTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl SkillTable {
    pub const fn standard() -> Self {
        Self { skills: &PASSIVE_SKILLS }
    }

    /// A table with no passive skills at all.
    pub const fn none() -> Self {
        Self { skills: &[] }
    }

    /// Bonus `player` earns at `trigger`, 0 if their character has no skill there.
    pub fn bonus(&self, player: &Player, trigger: Trigger, ctx: &SkillContext<'_>) -> i32 {
        let Some(character) = player.character else {
            return 0;
        };
        self.skills
            .iter()
            .filter(|skill| skill.character == character && skill.trigger == trigger)
            .map(|skill| (skill.effect)(player, ctx))
            .sum()
    }
}

/// Priest may peek at one hidden die per leg.
pub fn check_priest_oracle(player: &Player) -> Result<(), ActionError> {
    if !player.is(CharacterType::Priest) {
        return Err(ActionError::NotYourCharacter(CharacterType::Priest));
    }
    if player.priest_revealed_dice {
        return Err(ActionError::SkillAlreadyUsed);
    }
    Ok(())
}

/// Sheikh may move their placed tile once per leg.
pub fn check_sheikh_move(player: &Player) -> Result<u32, ActionError> {
    if !player.is(CharacterType::Sheikh) {
        return Err(ActionError::NotYourCharacter(CharacterType::Sheikh));
    }
    if player.sheikh_moved_tile {
        return Err(ActionError::SkillAlreadyUsed);
    }
    player.placed_tile_position().ok_or(ActionError::NoTilePlaced)
}
