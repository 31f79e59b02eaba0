//! Leg and race betting.
//!
//! Leg bets draw from a per-color card stack that is refilled every leg. Race bets
//! have no stack and stay open until the game ends.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::game::{
    CAMEL_COLORS, LEG_BET_VALUES, LEG_FIRST_REWARDS, LEG_SECOND_REWARDS, OVERFLOW_REWARD, RACE_REWARDS,
    WRONG_BET_PENALTY,
};
use crate::game::entities::Player;
use crate::game::error::ActionError;
use crate::game::systems::skills::{SkillContext, SkillTable, Trigger};
use crate::game::types::{CamelColor, LegBet, PlayerId, RaceBet};

/// Money moved to one player by a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub player_id: PlayerId,
    pub amount: i32,
}

/// Outcome of settling a set of bets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// One entry per settled bet: reward from the table, or the wrong-bet penalty.
    pub payouts: Vec<Payout>,
    /// Character bonuses paid on top of the payouts.
    pub bonuses: Vec<Payout>,
    /// Names of players who earned a character bonus, each listed once.
    pub bonus_players: Vec<String>,
}

impl Settlement {
    /// Net money moved by bet payouts alone.
    pub fn net(&self) -> i32 {
        self.payouts.iter().map(|p| p.amount).sum()
    }

    fn credit(&mut self, players: &mut [Player], player_id: PlayerId, amount: i32) {
        if let Some(player) = players.iter_mut().find(|p| p.id == player_id) {
            player.money += amount;
            self.payouts.push(Payout { player_id, amount });
        }
    }

    fn credit_bonus(&mut self, players: &mut [Player], player_id: PlayerId, amount: i32) {
        if amount == 0 {
            return;
        }
        if let Some(player) = players.iter_mut().find(|p| p.id == player_id) {
            player.money += amount;
            self.bonuses.push(Payout { player_id, amount });
            if !self.bonus_players.contains(&player.name) {
                self.bonus_players.push(player.name.clone());
            }
        }
    }
}

fn reward(table: &[i32], order: usize) -> i32 {
    table.get(order).copied().unwrap_or(OVERFLOW_REWARD)
}

fn fresh_stacks() -> BTreeMap<CamelColor, Vec<i32>> {
    CAMEL_COLORS
        .iter()
        .map(|&color| (color, LEG_BET_VALUES.to_vec()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingBoard {
    leg_bets: Vec<LegBet>,
    race_bets: Vec<RaceBet>,
    /// Remaining leg-bet cards per color, top of the stack first.
    leg_bet_stacks: BTreeMap<CamelColor, Vec<i32>>,
}

impl Default for BettingBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl BettingBoard {
    pub fn new() -> Self {
        Self {
            leg_bets: Vec::new(),
            race_bets: Vec::new(),
            leg_bet_stacks: fresh_stacks(),
        }
    }

    /// Take the top card of `color`'s stack. Returns the card value.
    pub fn place_leg_bet(&mut self, player_id: PlayerId, color: CamelColor) -> Result<i32, ActionError> {
        let stack = self
            .leg_bet_stacks
            .get_mut(&color)
            .filter(|stack| !stack.is_empty())
            .ok_or(ActionError::NoCardsLeft(color))?;
        let value = stack.remove(0);

        let order = self.leg_bets.iter().filter(|b| b.camel_color == color).count();
        self.leg_bets.push(LegBet {
            player_id,
            camel_color: color,
            value,
            order,
        });
        Ok(value)
    }

    pub fn place_race_bet(&mut self, player_id: PlayerId, color: CamelColor, is_winner: bool) {
        let order = self.race_bets.iter().filter(|b| b.is_winner == is_winner).count();
        self.race_bets.push(RaceBet {
            player_id,
            camel_color: color,
            is_winner,
            order,
        });
    }

    /// Pay leg bets: the leader's backers by `LEG_FIRST_REWARDS`, the runner-up's by
    /// `LEG_SECOND_REWARDS`, every other bet loses one.
    pub fn settle_leg_bets(
        &self,
        players: &mut [Player],
        first: Option<CamelColor>,
        second: Option<CamelColor>,
        skills: &SkillTable,
    ) -> Settlement {
        let mut settlement = Settlement::default();
        let Some(first) = first else {
            return settlement;
        };

        for bet in &self.leg_bets {
            if bet.camel_color == first {
                settlement.credit(players, bet.player_id, reward(&LEG_FIRST_REWARDS, bet.order));
                let bonus = bonus_for(players, bet.player_id, Trigger::LegBetFirstPlace, skills);
                settlement.credit_bonus(players, bet.player_id, bonus);
            } else if Some(bet.camel_color) == second {
                settlement.credit(players, bet.player_id, reward(&LEG_SECOND_REWARDS, bet.order));
            } else {
                settlement.credit(players, bet.player_id, WRONG_BET_PENALTY);
            }
        }

        debug!("[Betting] Leg settled: {} bets, net {}", self.leg_bets.len(), settlement.net());
        settlement
    }

    /// Pay race bets against the actual winner and last camel.
    pub fn settle_race_bets(
        &self,
        players: &mut [Player],
        winner: Option<CamelColor>,
        loser: Option<CamelColor>,
        skills: &SkillTable,
    ) -> Settlement {
        let mut settlement = Settlement::default();
        let (Some(winner), Some(loser)) = (winner, loser) else {
            return settlement;
        };

        let (winner_bets, loser_bets): (Vec<&RaceBet>, Vec<&RaceBet>) =
            self.race_bets.iter().partition(|b| b.is_winner);

        for (bets, actual) in [(winner_bets, winner), (loser_bets, loser)] {
            for bet in bets {
                if bet.camel_color == actual {
                    settlement.credit(players, bet.player_id, reward(&RACE_REWARDS, bet.order));
                    let bonus = bonus_for(players, bet.player_id, Trigger::RaceBetCorrect, skills);
                    settlement.credit_bonus(players, bet.player_id, bonus);
                } else {
                    settlement.credit(players, bet.player_id, WRONG_BET_PENALTY);
                }
            }
        }

        debug!("[Betting] Race settled: {} bets, net {}", self.race_bets.len(), settlement.net());
        settlement
    }

    /// Clear leg bets and refill every stack. Race bets are kept.
    pub fn reset_leg_bets(&mut self) {
        self.leg_bets.clear();
        self.leg_bet_stacks = fresh_stacks();
    }

    /// Value of the next card for `color`, if any remain.
    pub fn top_card(&self, color: CamelColor) -> Option<i32> {
        self.leg_bet_stacks.get(&color).and_then(|stack| stack.first().copied())
    }

    pub fn stack(&self, color: CamelColor) -> &[i32] {
        self.leg_bet_stacks.get(&color).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn leg_bets(&self) -> &[LegBet] {
        &self.leg_bets
    }

    pub fn race_bets(&self) -> &[RaceBet] {
        &self.race_bets
    }

    /// (leg bets, race bets) placed by `player_id`.
    pub fn bet_counts(&self, player_id: PlayerId) -> (usize, usize) {
        (
            self.leg_bets.iter().filter(|b| b.player_id == player_id).count(),
            self.race_bets.iter().filter(|b| b.player_id == player_id).count(),
        )
    }

    /// Replace all bets and stacks with a received snapshot. The snapshot is trusted as-is.
    pub fn replace_state(&mut self, other: BettingBoard) {
        *self = other;
    }
}

fn bonus_for(players: &[Player], player_id: PlayerId, trigger: Trigger, skills: &SkillTable) -> i32 {
    let ctx = SkillContext { players };
    players
        .iter()
        .find(|p| p.id == player_id)
        .map(|p| skills.bonus(p, trigger, &ctx))
        .unwrap_or(0)
}
