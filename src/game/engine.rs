//! Game engine.
//!
//! Owns one `GameState` and the random generator that drives it. Every player action
//! goes through here: it is validated, delegated to the track, pyramid or betting
//! board, rewarded, logged to the history, and then the turn passes on. A rejected
//! action leaves the state untouched and the same player still to act.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::game::{DICE_ROLL_REWARD, MAX_PLAYERS, MIN_PLAYERS, SPECTATOR_TILE_REWARD};
use crate::game::ai;
use crate::game::entities::{Player, Seat};
use crate::game::error::{ActionError, SetupError};
use crate::game::state::GameState;
use crate::game::systems::{check_priest_oracle, check_sheikh_move, Settlement, SkillContext, SkillTable, Trigger};
use crate::game::types::{
    CamelColor, GamePhase, HistoryEntry, HistoryKind, MoveResult, PlayerAction, PlayerId, SpectatorEffect,
    SpectatorTile, SpectatorType,
};
use crate::game::utils::now_ms;

const SYSTEM: &str = "System";

/// What an accepted action produced, beyond the state change itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OutcomeDetail {
    None,
    LegBet { color: CamelColor, value: i32 },
    Roll { result: MoveResult },
    Oracle { color: CamelColor, value: u32 },
    TileMoved { from: u32, to: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub message: String,
    pub detail: OutcomeDetail,
}

impl ActionOutcome {
    fn new(message: String, detail: OutcomeDetail) -> Self {
        Self { message, detail }
    }
}

pub type ActionResult = Result<ActionOutcome, ActionError>;

fn rejected(err: ActionError) -> ActionError {
    warn!("[Engine] Action rejected: {}", err);
    err
}

pub struct GameEngine {
    state: GameState,
    rng: StdRng,
    skills: SkillTable,
}

impl GameEngine {
    /// Seat the players and start the first leg, with an OS-seeded generator.
    pub fn new(seats: Vec<Seat>) -> Result<Self, SetupError> {
        Self::with_rng(seats, StdRng::from_os_rng())
    }

    /// Same as `new` with a fixed seed, so a whole game can be reproduced.
    pub fn with_seed(seats: Vec<Seat>, seed: u64) -> Result<Self, SetupError> {
        Self::with_rng(seats, StdRng::seed_from_u64(seed))
    }

    fn with_rng(seats: Vec<Seat>, mut rng: StdRng) -> Result<Self, SetupError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&seats.len()) {
            return Err(SetupError::PlayerCount(seats.len()));
        }

        let state = GameState::new(seats, &mut rng);
        let mut engine = Self {
            state,
            rng,
            skills: SkillTable::standard(),
        };

        engine.state.phase = GamePhase::Playing;
        engine.add_history(HistoryKind::Game, SYSTEM, "Game started".to_string());
        info!(
            "[Engine] Game {} started with {} players",
            engine.state.game_id,
            engine.state.players.len()
        );
        Ok(engine)
    }

    /// Take the top leg-bet card for `color`.
    pub fn place_leg_bet(&mut self, color: CamelColor) -> ActionResult {
        let index = self.acting_player().map_err(rejected)?;
        let player_id = self.state.players[index].id;

        let value = self.state.betting.place_leg_bet(player_id, color).map_err(rejected)?;

        let name = self.state.players[index].name.clone();
        self.add_history(HistoryKind::Bet, &name, format!("Leg bet {} EP on {}", value, color));
        debug!("[Engine] {} took the {} card for {}", name, value, color);
        self.next_player();

        Ok(ActionOutcome::new(
            format!("Leg bet placed, card worth {} EP", value),
            OutcomeDetail::LegBet { color, value },
        ))
    }

    /// Reveal a die, move its camel, pay the roller and any tile owner hit, then
    /// settle the leg and the race if this roll ended them.
    pub fn roll_dice(&mut self) -> ActionResult {
        let index = self.acting_player().map_err(rejected)?;
        let (color, value) = self.state.pyramid.roll(&mut self.rng).map_err(rejected)?;

        let tiles = self.state.active_tiles();
        let result = self.state.track.move_camel(color, value, &tiles);

        let reward = DICE_ROLL_REWARD + self.bonus(index, Trigger::DiceRoll);
        let player = &mut self.state.players[index];
        player.money += reward;
        player.has_rolled_dice = true;
        let name = player.name.clone();

        if let Some(effect) = result.spectator_effect {
            self.pay_tile_owner(effect);
        }

        let message = format!("Rolled {}, moved {} cells", color, value);
        self.add_history(HistoryKind::Roll, &name, message.clone());
        debug!("[Engine] {} {} ({} -> {})", name, message, result.old_position, result.new_position);

        if self.state.pyramid.is_leg_finished() {
            self.end_leg();
        }
        if self.state.track.is_game_finished() {
            self.end_game();
        }
        if self.state.phase != GamePhase::GameEnd {
            self.next_player();
        }

        Ok(ActionOutcome::new(message, OutcomeDetail::Roll { result }))
    }

    /// Put the acting player's tile on the track.
    pub fn place_spectator_tile(&mut self, position: u32, tile_type: SpectatorType) -> ActionResult {
        let index = self.acting_player().map_err(rejected)?;
        let player = &self.state.players[index];
        if player.placed_tile_position().is_some() {
            return Err(rejected(ActionError::TileAlreadyPlaced));
        }

        let tile = SpectatorTile {
            player_id: player.id,
            tile_type,
            position: Some(position),
        };
        if !self.state.track.place_spectator_tile(position, tile.clone()) {
            return Err(rejected(ActionError::InvalidTilePosition(position)));
        }

        let bonus = self.bonus(index, Trigger::TilePlaced);
        let player = &mut self.state.players[index];
        player.spectator_tile = Some(tile);
        player.money += bonus;
        let name = player.name.clone();

        self.add_history(
            HistoryKind::Spectator,
            &name,
            format!("Placed {} tile at {}", tile_type, position),
        );
        if bonus > 0 {
            self.add_history(HistoryKind::Skill, &name, format!("Explorer bonus +{} EP", bonus));
        }
        self.next_player();

        Ok(ActionOutcome::new(
            format!("{} tile placed at {}", tile_type, position),
            OutcomeDetail::None,
        ))
    }

    /// Bet on the overall winner (`is_winner`) or the last camel.
    pub fn place_race_bet(&mut self, color: CamelColor, is_winner: bool) -> ActionResult {
        let index = self.acting_player().map_err(rejected)?;
        let player_id = self.state.players[index].id;
        self.state.betting.place_race_bet(player_id, color, is_winner);

        let side = if is_winner { "win" } else { "finish last" };
        let message = format!("Race bet on {} to {}", color, side);
        let name = self.state.players[index].name.clone();
        self.add_history(HistoryKind::Bet, &name, message.clone());
        self.next_player();

        Ok(ActionOutcome::new(message, OutcomeDetail::None))
    }

    /// Priest: learn the committed value of one hidden die. The die stays in the pyramid.
    pub fn use_priest_oracle(&mut self) -> ActionResult {
        let index = self.acting_player().map_err(rejected)?;
        check_priest_oracle(&self.state.players[index]).map_err(rejected)?;

        let (color, value) = self
            .state
            .pyramid
            .peek_random(&mut self.rng)
            .ok_or(ActionError::PyramidEmpty)
            .map_err(rejected)?;

        let player = &mut self.state.players[index];
        player.priest_revealed_dice = true;
        let name = player.name.clone();

        let message = format!("Oracle: {} will move {} cells", color, value);
        self.add_history(HistoryKind::Skill, &name, message.clone());
        self.next_player();

        Ok(ActionOutcome::new(message, OutcomeDetail::Oracle { color, value }))
    }

    /// Sheikh: move the acting player's placed tile to `new_position`.
    pub fn use_sheikh_move_tile(&mut self, new_position: u32) -> ActionResult {
        let index = self.acting_player().map_err(rejected)?;
        let old_position = check_sheikh_move(&self.state.players[index]).map_err(rejected)?;

        if !self.state.track.move_spectator_tile(old_position, new_position) {
            return Err(rejected(ActionError::InvalidTilePosition(new_position)));
        }

        let player = &mut self.state.players[index];
        if let Some(tile) = player.spectator_tile.as_mut() {
            tile.position = Some(new_position);
        }
        player.sheikh_moved_tile = true;
        let name = player.name.clone();

        let message = format!("Moved tile from {} to {}", old_position, new_position);
        self.add_history(HistoryKind::Skill, &name, message.clone());
        self.next_player();

        Ok(ActionOutcome::new(
            message,
            OutcomeDetail::TileMoved {
                from: old_position,
                to: new_position,
            },
        ))
    }

    /// Leave the leg summary: fresh pyramid and leg-bet stacks, per-leg flags cleared,
    /// leg counter advanced. Race bets carry over.
    pub fn continue_to_next_leg(&mut self) -> ActionResult {
        if self.state.phase != GamePhase::LegEnd {
            return Err(rejected(ActionError::WrongPhase(self.state.phase)));
        }

        self.state.pyramid.reset(&mut self.rng);
        self.state.betting.reset_leg_bets();
        for player in &mut self.state.players {
            player.reset_leg_flags();
        }
        self.state.leg_number += 1;
        self.state.phase = GamePhase::Playing;

        let message = format!("Leg {} started", self.state.leg_number);
        self.add_history(HistoryKind::Leg, SYSTEM, message.clone());
        info!("[Engine] Game {}: {}", self.state.game_id, message);

        Ok(ActionOutcome::new(message, OutcomeDetail::None))
    }

    /// Run any action through its entry point.
    pub fn apply_action(&mut self, action: PlayerAction) -> ActionResult {
        match action {
            PlayerAction::LegBet { color } => self.place_leg_bet(color),
            PlayerAction::RollDice => self.roll_dice(),
            PlayerAction::PlaceSpectator { position, tile_type } => self.place_spectator_tile(position, tile_type),
            PlayerAction::RaceBet { color, is_winner } => self.place_race_bet(color, is_winner),
            PlayerAction::PriestOracle => self.use_priest_oracle(),
            PlayerAction::SheikhMoveTile { position } => self.use_sheikh_move_tile(position),
            PlayerAction::ContinueLeg => self.continue_to_next_leg(),
        }
    }

    /// Run an action on behalf of `player_id`. Turn actions require that player to
    /// hold the current seat; any seated player may continue to the next leg.
    pub fn apply_action_for(&mut self, player_id: PlayerId, action: PlayerAction) -> ActionResult {
        if self.state.player(player_id).is_none() {
            return Err(rejected(ActionError::NoActivePlayer));
        }
        if action != PlayerAction::ContinueLeg {
            let index = self.acting_player().map_err(rejected)?;
            if self.state.players[index].id != player_id {
                return Err(rejected(ActionError::NotYourTurn));
            }
        }
        self.apply_action(action)
    }

    pub fn is_ai_turn(&self) -> bool {
        self.state.phase == GamePhase::Playing && self.state.current_player().is_some_and(|p| p.is_ai)
    }

    /// Let the AI in the current seat act. Returns `None` when it is not an AI's turn.
    /// If the chosen action is refused the AI rolls instead.
    pub fn play_ai_turn(&mut self) -> Option<ActionResult> {
        if !self.is_ai_turn() {
            return None;
        }

        let action = ai::decide(&self.state, self.state.current_player_index, &mut self.rng);
        debug!("[Engine] AI chose {:?}", action);
        let result = match self.apply_action(action) {
            Ok(outcome) => Ok(outcome),
            Err(_) => self.roll_dice(),
        };
        Some(result)
    }

    /// Owned snapshot of the whole game.
    pub fn game_state(&self) -> GameState {
        self.state.clone()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.state.current_player()
    }

    /// Overwrite everything with an incoming snapshot. Nothing is re-validated.
    pub fn replace_state(&mut self, incoming: GameState) {
        let GameState {
            game_id,
            phase,
            current_player_index,
            leg_number,
            players,
            track,
            pyramid,
            betting,
            history,
        } = incoming;

        self.state.game_id = game_id;
        self.state.phase = phase;
        self.state.current_player_index = current_player_index;
        self.state.leg_number = leg_number;
        self.state.players = players;
        self.state.history = history;
        self.state.track.replace_state(track);
        self.state.pyramid.replace_state(pyramid);
        self.state.betting.replace_state(betting);
        debug!("[Engine] State of game {} replaced", self.state.game_id);
    }

    /// Richest player once the game is over.
    ///
    /// A money tie goes to the earlier seat, the one that acted first in every round,
    /// not to the last seat compared.
    pub fn winner(&self) -> Option<&Player> {
        if self.state.phase != GamePhase::GameEnd {
            return None;
        }
        self.state
            .players
            .iter()
            .reduce(|best, p| if p.money > best.money { p } else { best })
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn acting_player(&self) -> Result<usize, ActionError> {
        if self.state.phase != GamePhase::Playing {
            return Err(ActionError::WrongPhase(self.state.phase));
        }
        if self.state.current_player_index < self.state.players.len() {
            Ok(self.state.current_player_index)
        } else {
            Err(ActionError::NoActivePlayer)
        }
    }

    fn bonus(&self, index: usize, trigger: Trigger) -> i32 {
        let ctx = SkillContext {
            players: &self.state.players,
        };
        self.skills.bonus(&self.state.players[index], trigger, &ctx)
    }

    /// Pay the owner of a triggered tile and hand the tile back to them.
    fn pay_tile_owner(&mut self, effect: SpectatorEffect) {
        self.state.track.remove_spectator_tile(effect.position);
        let Some(owner) = self.state.players.iter().position(|p| p.id == effect.player_id) else {
            return;
        };

        let reward = SPECTATOR_TILE_REWARD + self.bonus(owner, Trigger::TileTriggered);
        let player = &mut self.state.players[owner];
        player.money += reward;
        player.spectator_tile = None;
        let name = player.name.clone();

        self.add_history(
            HistoryKind::Spectator,
            &name,
            format!("{} tile at {} triggered, +{} EP", effect.tile_type, effect.position, reward),
        );
    }

    fn end_leg(&mut self) {
        let first = self.state.track.leading_camel().map(|c| c.color);
        let second = self.state.track.second_place_camel().map(|c| c.color);

        let settlement = self
            .state
            .betting
            .settle_leg_bets(&mut self.state.players, first, second, &self.skills);
        self.log_bonuses(&settlement, "Leg bet on the leader");

        let name_of = |c: Option<CamelColor>| c.map_or("none", CamelColor::name);
        let message = format!(
            "Leg {} over. 1st: {}, 2nd: {}",
            self.state.leg_number,
            name_of(first),
            name_of(second)
        );
        self.add_history(HistoryKind::Leg, SYSTEM, message.clone());
        let dice: Vec<String> = self
            .state
            .pyramid
            .rolled_dice()
            .map(|d| format!("{} {}", d.color, d.value))
            .collect();
        debug!("[Engine] Leg {} dice: {}", self.state.leg_number, dice.join(", "));
        self.state.phase = GamePhase::LegEnd;
        info!("[Engine] Game {}: {} (net payout {})", self.state.game_id, message, settlement.net());
    }

    fn end_game(&mut self) {
        let winner = self.state.track.leading_camel().map(|c| c.color);
        let loser = self.state.track.last_camel().map(|c| c.color);

        let settlement = self
            .state
            .betting
            .settle_race_bets(&mut self.state.players, winner, loser, &self.skills);
        self.log_bonuses(&settlement, "Correct race bet");

        for player in &self.state.players {
            let (leg, race) = self.state.betting.bet_counts(player.id);
            debug!(
                "[Engine] {} finished on {} EP ({} leg bets this leg, {} race bets)",
                player.name, player.money, leg, race
            );
        }
        self.state.phase = GamePhase::GameEnd;
        self.add_history(HistoryKind::Game, SYSTEM, "Game over".to_string());
        info!(
            "[Engine] Game {} over, winner camel {:?}, last camel {:?}",
            self.state.game_id, winner, loser
        );
    }

    fn log_bonuses(&mut self, settlement: &Settlement, reason: &str) {
        for bonus in &settlement.bonuses {
            let Some(name) = self.state.player(bonus.player_id).map(|p| p.name.clone()) else {
                continue;
            };
            self.add_history(HistoryKind::Skill, &name, format!("{}: bonus +{} EP", reason, bonus.amount));
        }
    }

    /// Pass the turn on, then apply the new player's turn-start bonus.
    fn next_player(&mut self) {
        if self.state.players.is_empty() {
            return;
        }
        let index = (self.state.current_player_index + 1) % self.state.players.len();
        self.state.current_player_index = index;

        let bonus = self.bonus(index, Trigger::TurnStart);
        if bonus > 0 {
            let player = &mut self.state.players[index];
            player.money += bonus;
            let name = player.name.clone();
            self.add_history(HistoryKind::Skill, &name, format!("Pharaoh bonus +{} EP", bonus));
        }
    }

    fn add_history(&mut self, kind: HistoryKind, player_name: &str, details: String) {
        self.state.history.push(HistoryEntry {
            kind,
            player_name: player_name.to_string(),
            timestamp_ms: now_ms(),
            details,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::seats_for;
    use crate::game::track::CamelTrack;
    use crate::game::types::CharacterType;

    fn engine(characters: &[CharacterType]) -> GameEngine {
        GameEngine::with_seed(seats_for(&["Ada", "Bo"], 0, characters), 1).unwrap()
    }

    #[test]
    fn test_player_count_bounds() {
        assert_eq!(
            GameEngine::with_seed(seats_for(&["solo"], 0, &[]), 0).err(),
            Some(SetupError::PlayerCount(1))
        );
        assert_eq!(
            GameEngine::new(seats_for(&[], 9, &[])).err(),
            Some(SetupError::PlayerCount(9))
        );
        let engine = GameEngine::with_seed(seats_for(&[], 8, &[]), 0).unwrap();
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.state().players.len(), 8);
    }

    #[test]
    fn test_failed_action_keeps_turn() {
        let mut engine = engine(&[]);
        for _ in 0..6 {
            engine.state_mut().current_player_index = 0;
            engine.place_leg_bet(CamelColor::Red).unwrap();
        }
        engine.state_mut().current_player_index = 0;
        let before = engine.game_state();

        assert_eq!(
            engine.place_leg_bet(CamelColor::Red),
            Err(ActionError::NoCardsLeft(CamelColor::Red))
        );
        assert_eq!(engine.game_state(), before);
    }

    #[test]
    fn test_game_state_is_idempotent() {
        let engine = engine(&[]);
        assert_eq!(engine.game_state(), engine.game_state());
    }

    #[test]
    fn test_tile_rejections() {
        let mut engine = engine(&[]);
        engine.state_mut().track = CamelTrack::with_camels(&[
            (CamelColor::Red, 1),
            (CamelColor::Blue, 1),
            (CamelColor::Green, 2),
            (CamelColor::Yellow, 3),
            (CamelColor::White, 3),
        ]);

        assert_eq!(
            engine.place_spectator_tile(2, SpectatorType::Oasis),
            Err(ActionError::InvalidTilePosition(2))
        );
        engine.place_spectator_tile(8, SpectatorType::Oasis).unwrap();
        assert_eq!(engine.state().current_player_index, 1);

        let before = engine.game_state();
        assert_eq!(
            engine.place_spectator_tile(9, SpectatorType::Mirage),
            Err(ActionError::InvalidTilePosition(9))
        );
        assert_eq!(engine.game_state(), before);

        engine.state_mut().current_player_index = 0;
        assert_eq!(
            engine.place_spectator_tile(12, SpectatorType::Mirage),
            Err(ActionError::TileAlreadyPlaced)
        );
    }

    #[test]
    fn test_triggered_tile_pays_owner_and_returns() {
        let mut engine = engine(&[CharacterType::Nomad]);
        engine.state_mut().track = CamelTrack::with_camels(&[
            (CamelColor::Red, 2),
            (CamelColor::Blue, 1),
            (CamelColor::Green, 1),
            (CamelColor::Yellow, 1),
            (CamelColor::White, 1),
        ]);
        engine.state_mut().pyramid = crate::game::entities::Pyramid::with_dice(&[(CamelColor::Red, 3)]);
        engine.place_spectator_tile(5, SpectatorType::Oasis).unwrap();

        let outcome = engine.roll_dice().unwrap();
        let OutcomeDetail::Roll { result } = outcome.detail else {
            panic!("expected a roll outcome");
        };

        assert_eq!(result.camel_color, CamelColor::Red);
        assert_eq!(result.new_position, 6);
        assert!(result.hit_spectator());

        // Nomad earns 2 for the tile, the roller earns 1.
        let state = engine.state();
        assert_eq!(state.players[0].money, 5);
        assert_eq!(state.players[1].money, 4);
        assert!(state.players[0].spectator_tile.is_none());
        assert!(state.track.space(5).unwrap().spectator_tile.is_none());
        assert!(state.active_tiles().is_empty());

        // That was the last die. Next leg, the tile is back in hand and can be placed again.
        assert_eq!(engine.phase(), GamePhase::LegEnd);
        engine.continue_to_next_leg().unwrap();
        engine.place_spectator_tile(9, SpectatorType::Mirage).unwrap();
    }

    #[test]
    fn test_priest_peeks_without_rolling() {
        let mut engine = engine(&[CharacterType::Priest]);
        let remaining = engine.state().pyramid.remaining();

        let outcome = engine.use_priest_oracle().unwrap();
        let OutcomeDetail::Oracle { color, value } = outcome.detail else {
            panic!("expected an oracle outcome");
        };
        assert_eq!(engine.state().pyramid.remaining(), remaining);
        assert_eq!(engine.state().pyramid.peek(color), Some(value));
        assert!(engine.state().players[0].priest_revealed_dice);

        engine.state_mut().current_player_index = 0;
        assert_eq!(engine.use_priest_oracle(), Err(ActionError::SkillAlreadyUsed));
        engine.state_mut().current_player_index = 1;
        assert_eq!(
            engine.use_priest_oracle(),
            Err(ActionError::NotYourCharacter(CharacterType::Priest))
        );
    }

    #[test]
    fn test_sheikh_moves_tile_once_per_leg() {
        let mut engine = engine(&[CharacterType::Sheikh]);
        engine.state_mut().track = CamelTrack::with_camels(&[
            (CamelColor::Red, 1),
            (CamelColor::Blue, 1),
            (CamelColor::Green, 1),
            (CamelColor::Yellow, 1),
            (CamelColor::White, 1),
        ]);

        assert_eq!(engine.use_sheikh_move_tile(9), Err(ActionError::NoTilePlaced));
        engine.place_spectator_tile(6, SpectatorType::Mirage).unwrap();
        engine.state_mut().current_player_index = 0;

        engine.use_sheikh_move_tile(10).unwrap();
        assert_eq!(engine.state().players[0].placed_tile_position(), Some(10));
        assert!(engine.state().track.space(6).unwrap().spectator_tile.is_none());
        assert!(engine.state().track.space(10).unwrap().spectator_tile.is_some());

        engine.state_mut().current_player_index = 0;
        assert_eq!(engine.use_sheikh_move_tile(12), Err(ActionError::SkillAlreadyUsed));
    }

    #[test]
    fn test_pharaoh_bonus_on_turn_start() {
        let mut engine = engine(&[CharacterType::Merchant, CharacterType::Pharaoh]);
        engine.place_race_bet(CamelColor::Blue, true).unwrap();

        // Both players are on 3 EP, so the Pharaoh is tied for lowest.
        assert_eq!(engine.state().players[1].money, 4);
        assert_eq!(engine.state().history.last().unwrap().kind, HistoryKind::Skill);
    }

    #[test]
    fn test_actions_rejected_outside_playing() {
        let mut engine = engine(&[]);
        assert_eq!(
            engine.continue_to_next_leg(),
            Err(ActionError::WrongPhase(GamePhase::Playing))
        );

        engine.state_mut().phase = GamePhase::LegEnd;
        assert_eq!(engine.roll_dice(), Err(ActionError::WrongPhase(GamePhase::LegEnd)));
        assert_eq!(
            engine.place_race_bet(CamelColor::Red, false),
            Err(ActionError::WrongPhase(GamePhase::LegEnd))
        );
    }

    #[test]
    fn test_apply_action_for_checks_seat() {
        let mut engine = engine(&[]);
        let (ada, bo) = (engine.state().players[0].id, engine.state().players[1].id);

        assert_eq!(
            engine.apply_action_for(bo, PlayerAction::RollDice),
            Err(ActionError::NotYourTurn)
        );
        assert_eq!(
            engine.apply_action_for(PlayerId::new_v4(), PlayerAction::RollDice),
            Err(ActionError::NoActivePlayer)
        );
        engine.apply_action_for(ada, PlayerAction::LegBet { color: CamelColor::Green }).unwrap();
        assert_eq!(engine.current_player().unwrap().id, bo);
    }

    #[test]
    fn test_winner_tie_goes_to_earlier_seat() {
        let mut engine = GameEngine::with_seed(seats_for(&["Ada", "Bo", "Cy"], 0, &[]), 5).unwrap();
        assert!(engine.winner().is_none());

        let state = engine.state_mut();
        state.phase = GamePhase::GameEnd;
        state.players[0].money = 7;
        state.players[1].money = 9;
        state.players[2].money = 9;
        assert_eq!(engine.winner().unwrap().name, "Bo");
    }

    #[test]
    fn test_replace_state_is_full_replace() {
        let mut source = engine(&[]);
        source.place_leg_bet(CamelColor::Yellow).unwrap();
        source.roll_dice().unwrap();

        let mut mirror = GameEngine::with_seed(seats_for(&["X", "Y", "Z"], 0, &[]), 99).unwrap();
        mirror.replace_state(source.game_state());
        assert_eq!(mirror.game_state(), source.game_state());
    }
}
