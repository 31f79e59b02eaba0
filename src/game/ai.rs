//! Heuristic AI for computer seats.
//!
//! Scores the four basic actions from the current snapshot, picks the best one, then
//! fills in its target. The result goes through the same engine entry points as a
//! human action.

use rand::Rng;

use crate::config::game::{CAMEL_COLORS, TRACK_LENGTH};
use crate::game::entities::Player;
use crate::game::state::GameState;
use crate::game::types::{Camel, PlayerAction, SpectatorType};

const LEADER_BET_WEIGHT: f64 = 1.5;
const RUNNER_UP_BET_WEIGHT: f64 = 1.2;
const CROWDED_RACE_BETS: usize = 8;
const OASIS_CHANCE: f64 = 0.7;
const WINNER_BET_CHANCE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Candidate {
    LegBet,
    Roll,
    Tile,
    RaceBet,
}

/// Pick an action for the player in `player_index`. Falls back to rolling.
pub fn decide<R: Rng>(state: &GameState, player_index: usize, rng: &mut R) -> PlayerAction {
    let Some(player) = state.players.get(player_index) else {
        return PlayerAction::RollDice;
    };
    let rankings = state.track.rankings();
    let (Some(&leader), Some(&runner_up), Some(&trailing)) = (rankings.first(), rankings.get(1), rankings.last())
    else {
        return PlayerAction::RollDice;
    };

    let scores = [
        (Candidate::LegBet, leg_bet_score(state, leader, runner_up)),
        (Candidate::Roll, roll_score(state)),
        (Candidate::Tile, tile_score(player, leader)),
        (Candidate::RaceBet, race_bet_score(state, leader)),
    ];
    // Ties keep the earlier candidate.
    let best = scores
        .iter()
        .fold(scores[0], |best, &current| if current.1 > best.1 { current } else { best });

    match best.0 {
        Candidate::LegBet => choose_leg_bet(state, leader, runner_up),
        Candidate::Roll => PlayerAction::RollDice,
        Candidate::Tile => choose_tile(state, leader, rng),
        Candidate::RaceBet => choose_race_bet(leader, trailing, rng),
    }
}

fn leg_bet_score(state: &GameState, leader: &Camel, runner_up: &Camel) -> f64 {
    let lead = state.betting.top_card(leader.color).map_or(0.0, |v| f64::from(v) * LEADER_BET_WEIGHT);
    let second = state
        .betting
        .top_card(runner_up.color)
        .map_or(0.0, |v| f64::from(v) * RUNNER_UP_BET_WEIGHT);
    lead.max(second)
}

fn roll_score(state: &GameState) -> f64 {
    1.0 + 0.1 * state.pyramid.remaining() as f64
}

fn tile_score(player: &Player, leader: &Camel) -> f64 {
    if player.placed_tile_position().is_some() {
        0.0
    } else if leader.position > TRACK_LENGTH - 4 {
        0.5
    } else {
        2.0
    }
}

fn race_bet_score(state: &GameState, leader: &Camel) -> f64 {
    let early = if state.leg_number <= 2 { 1.5 } else { 1.0 };
    if state.betting.race_bets().len() > CROWDED_RACE_BETS {
        0.5 * early
    } else if leader.position < TRACK_LENGTH / 2 {
        2.5 * early
    } else {
        early
    }
}

/// Back the leader unless the runner-up's card is worth clearly more.
fn choose_leg_bet(state: &GameState, leader: &Camel, runner_up: &Camel) -> PlayerAction {
    let lead = state.betting.top_card(leader.color);
    let second = state.betting.top_card(runner_up.color);

    let color = match (lead, second) {
        (Some(l), Some(s)) if s > l + 2 => Some(runner_up.color),
        (Some(_), _) => Some(leader.color),
        (None, Some(_)) => Some(runner_up.color),
        (None, None) => CAMEL_COLORS
            .iter()
            .copied()
            .find(|&c| state.betting.top_card(c).is_some()),
    };

    match color {
        Some(color) => PlayerAction::LegBet { color },
        None => PlayerAction::RollDice,
    }
}

/// A cell with no camel and no tile on or next to it.
fn is_open(state: &GameState, position: u32) -> bool {
    let free = |p: u32| state.track.space(p).is_none_or(|s| s.spectator_tile.is_none());
    state
        .track
        .space(position)
        .is_some_and(|s| s.camels.is_empty() && s.spectator_tile.is_none())
        && free(position - 1)
        && free(position + 1)
}

/// An oasis a few cells ahead of the leader, or failing that the first open cell.
fn choose_tile<R: Rng>(state: &GameState, leader: &Camel, rng: &mut R) -> PlayerAction {
    let oasis = rng.random_bool(OASIS_CHANCE);

    if oasis {
        let target = (leader.position + rng.random_range(2..=4)).min(TRACK_LENGTH - 2);
        if is_open(state, target) {
            return PlayerAction::PlaceSpectator {
                position: target,
                tile_type: SpectatorType::Oasis,
            };
        }
    }

    let tile_type = if oasis { SpectatorType::Oasis } else { SpectatorType::Mirage };
    (1..TRACK_LENGTH - 1)
        .find(|&p| is_open(state, p))
        .map_or(PlayerAction::RollDice, |position| PlayerAction::PlaceSpectator { position, tile_type })
}

fn choose_race_bet<R: Rng>(leader: &Camel, trailing: &Camel, rng: &mut R) -> PlayerAction {
    if rng.random_bool(WINNER_BET_CHANCE) {
        PlayerAction::RaceBet {
            color: leader.color,
            is_winner: true,
        }
    } else {
        PlayerAction::RaceBet {
            color: trailing.color,
            is_winner: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::seats_for;
    use crate::game::track::CamelTrack;
    use crate::game::types::{CamelColor, SpectatorTile};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn state() -> (GameState, StdRng) {
        let mut rng = StdRng::seed_from_u64(21);
        let mut state = GameState::new(seats_for(&["Ada"], 1, &[]), &mut rng);
        state.track = CamelTrack::with_camels(&[
            (CamelColor::Red, 1),
            (CamelColor::Blue, 2),
            (CamelColor::Green, 3),
            (CamelColor::Yellow, 3),
            (CamelColor::White, 1),
        ]);
        (state, rng)
    }

    #[test]
    fn test_fresh_leg_bets_on_leader() {
        let (state, mut rng) = state();
        assert_eq!(
            decide(&state, 1, &mut rng),
            PlayerAction::LegBet { color: CamelColor::Yellow }
        );
    }

    #[test]
    fn test_switches_to_runner_up_for_a_better_card() {
        let (mut state, _) = state();
        let id = state.players[0].id;
        for _ in 0..4 {
            state.betting.place_leg_bet(id, CamelColor::Yellow).unwrap();
        }
        let leader = *state.track.rankings().first().unwrap();
        let runner_up = *state.track.rankings().get(1).unwrap();
        assert_eq!(
            choose_leg_bet(&state, leader, runner_up),
            PlayerAction::LegBet { color: CamelColor::Green }
        );
    }

    #[test]
    fn test_rolls_when_nothing_else_pays() {
        let (mut state, mut rng) = state();
        let id = state.players[0].id;
        for color in CAMEL_COLORS {
            while state.betting.place_leg_bet(id, color).is_ok() {}
        }
        for _ in 0..9 {
            state.betting.place_race_bet(id, CamelColor::Red, true);
        }
        state.leg_number = 3;
        state.players[1].spectator_tile = Some(SpectatorTile {
            player_id: state.players[1].id,
            tile_type: SpectatorType::Oasis,
            position: Some(9),
        });

        assert_eq!(decide(&state, 1, &mut rng), PlayerAction::RollDice);
    }

    #[test]
    fn test_tile_choice_is_always_placeable() {
        let (state, mut rng) = state();
        let leader = *state.track.rankings().first().unwrap();
        for _ in 0..50 {
            match choose_tile(&state, leader, &mut rng) {
                PlayerAction::PlaceSpectator { position, .. } => {
                    let mut track = state.track.clone();
                    let tile = SpectatorTile {
                        player_id: state.players[1].id,
                        tile_type: SpectatorType::Mirage,
                        position: None,
                    };
                    assert!(track.place_spectator_tile(position, tile));
                }
                other => panic!("expected a tile placement, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_race_bet_sides() {
        let (state, mut rng) = state();
        let rankings = state.track.rankings();
        let (leader, trailing) = (rankings[0], rankings[rankings.len() - 1]);
        for _ in 0..50 {
            match choose_race_bet(leader, trailing, &mut rng) {
                PlayerAction::RaceBet { color, is_winner: true } => assert_eq!(color, CamelColor::Yellow),
                PlayerAction::RaceBet { color, is_winner: false } => assert_eq!(color, CamelColor::Red),
                other => panic!("expected a race bet, got {:?}", other),
            }
        }
    }
}
