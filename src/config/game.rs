/// Game configuration constants.
///
/// Track geometry, player limits, and every reward table used by the rules engine.
use crate::game::types::CamelColor;

/// Number of cells on the track after the start cell (cells are indexed 0..=TRACK_LENGTH).
pub const TRACK_LENGTH: u32 = 16;

/// A camel whose position reaches this cell ends the race.
pub const FINISH_LINE: u32 = 16;

/// The five racing camels, in their fixed table order.
pub const CAMEL_COLORS: [CamelColor; 5] = [
    CamelColor::Red,
    CamelColor::Blue,
    CamelColor::Green,
    CamelColor::Yellow,
    CamelColor::White,
];

/// Minimum number of seats in a game.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of seats in a game.
pub const MAX_PLAYERS: usize = 8;

/// Money every player starts with (EP).
pub const STARTING_MONEY: i32 = 3;

/// Reward for rolling a die.
pub const DICE_ROLL_REWARD: i32 = 1;

/// Reward paid to a tile's owner when a camel lands on it.
pub const SPECTATOR_TILE_REWARD: i32 = 1;

/// Faces of a pyramid die.
pub const DICE_VALUES: [u32; 3] = [1, 2, 3];

/// Lowest and highest start cell for a camel.
pub const START_POSITION_MIN: u32 = 1;
pub const START_POSITION_MAX: u32 = 3;

/// Leg-bet cards per camel, top of the stack first.
pub const LEG_BET_VALUES: [i32; 6] = [5, 3, 2, 2, 1, 1];

/// Leg-bet payout for bets on the leg leader, by bet order.
pub const LEG_FIRST_REWARDS: [i32; 4] = [5, 3, 2, 1];

/// Leg-bet payout for bets on the runner-up, by bet order.
pub const LEG_SECOND_REWARDS: [i32; 4] = [3, 2, 1, 1];

/// Race-bet payout for a correct winner or loser call, by bet order.
pub const RACE_REWARDS: [i32; 5] = [8, 5, 3, 2, 1];

/// Payout for a correct bet placed after the reward table runs out.
pub const OVERFLOW_REWARD: i32 = 1;

/// Charged for every wrong leg or race bet.
pub const WRONG_BET_PENALTY: i32 = -1;

/// Delay before the server plays an AI seat's turn, in milliseconds.
pub const AI_TURN_DELAY_MS: u64 = 800;

/// A game session with no connected player for this long is closed, whatever its phase.
pub const IDLE_SESSION_TIMEOUT_SECS: u64 = 300;
