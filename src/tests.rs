//! Whole-game scenarios driven through the engine's public entry points.

use proptest::prelude::*;

use crate::config::game::{CAMEL_COLORS, LEG_BET_VALUES};
use crate::game::entities::{Pyramid, seats_for};
use crate::game::track::CamelTrack;
use crate::game::types::{CamelColor, GamePhase, PlayerAction, SpectatorType};
use crate::game::{ActionError, GameEngine};

/// Camels on separate cells, three apart, so single steps never stack them.
fn spread_track(white_at: u32) -> CamelTrack {
    CamelTrack::with_camels(&[
        (CamelColor::Red, 1),
        (CamelColor::Blue, 4),
        (CamelColor::Green, 7),
        (CamelColor::Yellow, 10),
        (CamelColor::White, white_at),
    ])
}

/// A pyramid whose hidden dice all show `value`.
fn pyramid_of(colors: &[CamelColor], value: u32) -> Pyramid {
    let dice: Vec<(CamelColor, u32)> = colors.iter().map(|&color| (color, value)).collect();
    Pyramid::with_dice(&dice)
}

fn two_player_game() -> GameEngine {
    let mut engine = GameEngine::with_seed(seats_for(&["Ada", "Bo"], 0, &[]), 7).unwrap();
    engine.state_mut().track = spread_track(13);
    engine.state_mut().pyramid = pyramid_of(&CAMEL_COLORS, 1);
    engine
}

#[test]
fn test_full_leg_then_continue() {
    let mut engine = two_player_game();

    let outcome = engine.place_leg_bet(CamelColor::White).unwrap();
    assert_eq!(outcome.message, "Leg bet placed, card worth 5 EP");
    assert_eq!(engine.state().betting.stack(CamelColor::White), &LEG_BET_VALUES[1..]);

    engine.place_race_bet(CamelColor::White, true).unwrap();

    // Five single steps: Ada, Bo, Ada, Bo, Ada.
    for _ in 0..5 {
        assert_eq!(engine.phase(), GamePhase::Playing);
        engine.roll_dice().unwrap();
    }
    assert_eq!(engine.phase(), GamePhase::LegEnd);

    let state = engine.state();
    assert_eq!(state.track.leading_camel().unwrap().color, CamelColor::White);
    assert_eq!(state.track.camel(CamelColor::White).unwrap().position, 14);
    // Ada: 3 start + 3 rolls + 5 for the leading White card.
    assert_eq!(state.players[0].money, 11);
    // Bo: 3 start + 2 rolls. Race bets wait for the end of the race.
    assert_eq!(state.players[1].money, 5);

    assert_eq!(engine.roll_dice(), Err(ActionError::WrongPhase(GamePhase::LegEnd)));

    engine.continue_to_next_leg().unwrap();
    let state = engine.state();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.leg_number, 2);
    assert_eq!(state.pyramid.remaining(), CAMEL_COLORS.len());
    assert!(state.betting.leg_bets().is_empty());
    assert_eq!(state.betting.stack(CamelColor::White), &LEG_BET_VALUES);
    assert_eq!(state.betting.race_bets().len(), 1);
    assert!(state.players.iter().all(|p| !p.has_rolled_dice));
}

#[test]
fn test_rejected_tile_changes_nothing() {
    let mut engine = two_player_game();
    let before = engine.game_state();

    assert_eq!(
        engine.place_spectator_tile(4, SpectatorType::Oasis),
        Err(ActionError::InvalidTilePosition(4))
    );
    assert_eq!(
        engine.place_spectator_tile(17, SpectatorType::Oasis),
        Err(ActionError::InvalidTilePosition(17))
    );
    assert_eq!(engine.game_state(), before);
}

#[test]
fn test_race_end_settles_leg_then_race() {
    let mut engine = two_player_game();
    engine.state_mut().track = spread_track(15);
    engine.state_mut().pyramid = pyramid_of(&[CamelColor::White], 1);

    engine.place_race_bet(CamelColor::White, true).unwrap();
    engine.place_race_bet(CamelColor::Red, false).unwrap();
    engine.roll_dice().unwrap();

    assert_eq!(engine.phase(), GamePhase::GameEnd);
    let state = engine.state();
    // Ada: 3 + 1 roll + 8 for the first correct winner call.
    assert_eq!(state.players[0].money, 12);
    // Bo: 3 + 8 for the first correct loser call.
    assert_eq!(state.players[1].money, 11);
    // The turn does not move on once the race is over.
    assert_eq!(state.current_player_index, 0);
    assert_eq!(engine.winner().unwrap().name, "Ada");

    assert_eq!(engine.roll_dice(), Err(ActionError::WrongPhase(GamePhase::GameEnd)));
    assert_eq!(
        engine.apply_action(PlayerAction::ContinueLeg),
        Err(ActionError::WrongPhase(GamePhase::GameEnd))
    );
}

#[test]
fn test_snapshot_wire_shape() {
    let mut engine = two_player_game();
    engine.place_leg_bet(CamelColor::Blue).unwrap();

    let json = serde_json::to_value(engine.game_state()).unwrap();
    for key in [
        "gameId",
        "phase",
        "currentPlayerIndex",
        "legNumber",
        "players",
        "camels",
        "track",
        "pyramid",
        "legBets",
        "raceBets",
        "legBetStacks",
        "history",
    ] {
        assert!(json.get(key).is_some(), "missing key {}", key);
    }
    assert_eq!(json["phase"], "playing");
    assert_eq!(json["legBets"][0]["value"], 5);

    let back: crate::game::GameState = serde_json::from_value(json).unwrap();
    assert_eq!(back, engine.game_state());
}

/// Let AI seats play a whole game, continuing every leg. Returns the number of legs.
fn play_out(engine: &mut GameEngine) -> u32 {
    for _ in 0..5_000 {
        match engine.phase() {
            GamePhase::GameEnd => return engine.state().leg_number,
            GamePhase::LegEnd => {
                engine.continue_to_next_leg().unwrap();
            }
            _ => {
                engine.play_ai_turn().unwrap().unwrap();
            }
        }
    }
    panic!("game did not finish");
}

#[test]
fn test_ai_game_runs_to_the_end() {
    let mut engine = GameEngine::with_seed(seats_for(&[], 4, &[]), 2024).unwrap();
    let legs = play_out(&mut engine);

    assert!(legs >= 1);
    assert!(engine.state().track.is_game_finished());
    assert!(engine.winner().is_some());
    assert_eq!(engine.play_ai_turn(), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_ai_games_always_finish(seed in any::<u64>(), seats in 2usize..=8) {
        let mut engine = GameEngine::with_seed(seats_for(&[], seats, &[]), seed).unwrap();
        play_out(&mut engine);
        prop_assert_eq!(engine.phase(), GamePhase::GameEnd);
        prop_assert!(engine.winner().is_some());
    }
}
