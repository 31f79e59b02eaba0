//! Dice pyramid.
//!
//! One die per camel. Every die's value is drawn when the pyramid is created or reset,
//! and a roll only reveals it. This is what lets the Priest peek at a die truthfully.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::game::{CAMEL_COLORS, DICE_VALUES};
use crate::game::error::ActionError;
use crate::game::types::{CamelColor, Dice};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pyramid {
    dice: Vec<Dice>,
    /// Colors whose die is still hidden in the pyramid.
    available_dice: Vec<CamelColor>,
}

fn draw_value<R: Rng>(rng: &mut R) -> u32 {
    DICE_VALUES[rng.random_range(0..DICE_VALUES.len())]
}

impl Pyramid {
    /// Create a full pyramid with freshly committed values.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let dice = CAMEL_COLORS
            .iter()
            .map(|&color| Dice {
                color,
                value: draw_value(rng),
                rolled: false,
            })
            .collect();

        Self {
            dice,
            available_dice: CAMEL_COLORS.to_vec(),
        }
    }

    /// Reveal a uniformly chosen hidden die and take it out of the pyramid.
    pub fn roll<R: Rng>(&mut self, rng: &mut R) -> Result<(CamelColor, u32), ActionError> {
        if self.available_dice.is_empty() {
            return Err(ActionError::PyramidEmpty);
        }

        let color = self.available_dice.remove(rng.random_range(0..self.available_dice.len()));
        let die = self
            .dice
            .iter_mut()
            .find(|d| d.color == color)
            .ok_or(ActionError::PyramidEmpty)?;
        die.rolled = true;

        Ok((color, die.value))
    }

    /// Put every die back and commit new values for all of them.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        for die in &mut self.dice {
            die.value = draw_value(rng);
            die.rolled = false;
        }
        self.available_dice = CAMEL_COLORS.to_vec();
    }

    /// Committed value of a die still in the pyramid. No side effect.
    pub fn peek(&self, color: CamelColor) -> Option<u32> {
        if !self.available_dice.contains(&color) {
            return None;
        }
        self.dice.iter().find(|d| d.color == color).map(|d| d.value)
    }

    /// Peek at a randomly chosen hidden die.
    pub fn peek_random<R: Rng>(&self, rng: &mut R) -> Option<(CamelColor, u32)> {
        if self.available_dice.is_empty() {
            return None;
        }
        let color = self.available_dice[rng.random_range(0..self.available_dice.len())];
        self.peek(color).map(|value| (color, value))
    }

    pub fn is_leg_finished(&self) -> bool {
        self.available_dice.is_empty()
    }

    /// Number of dice revealed this leg.
    pub fn resolved_count(&self) -> usize {
        self.dice.len() - self.available_dice.len()
    }

    pub fn remaining(&self) -> usize {
        self.available_dice.len()
    }

    pub fn available_dice(&self) -> &[CamelColor] {
        &self.available_dice
    }

    pub fn rolled_dice(&self) -> impl Iterator<Item = &Dice> {
        self.dice.iter().filter(|d| d.rolled)
    }

    pub fn dice(&self) -> &[Dice] {
        &self.dice
    }

    /// A pyramid holding only the given hidden dice, in that order.
    #[cfg(test)]
    pub(crate) fn with_dice(hidden: &[(CamelColor, u32)]) -> Self {
        Self {
            dice: hidden
                .iter()
                .map(|&(color, value)| Dice {
                    color,
                    value,
                    rolled: false,
                })
                .collect(),
            available_dice: hidden.iter().map(|&(color, _)| color).collect(),
        }
    }

    /// Replace the whole pyramid with a received snapshot. The snapshot is trusted as-is.
    pub fn replace_state(&mut self, other: Pyramid) {
        *self = other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fresh_pyramid_has_all_dice() {
        let mut rng = StdRng::seed_from_u64(7);
        let pyramid = Pyramid::new(&mut rng);

        assert_eq!(pyramid.remaining(), 5);
        assert_eq!(pyramid.resolved_count(), 0);
        assert!(!pyramid.is_leg_finished());
        assert!(pyramid.dice().iter().all(|d| (1..=3).contains(&d.value) && !d.rolled));
    }

    #[test]
    fn test_roll_reveals_committed_value() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pyramid = Pyramid::new(&mut rng);
        let committed: Vec<(CamelColor, u32)> = pyramid.dice().iter().map(|d| (d.color, d.value)).collect();

        for _ in 0..5 {
            let (color, value) = pyramid.roll(&mut rng).unwrap();
            assert!(committed.contains(&(color, value)));
        }
        assert!(pyramid.is_leg_finished());
        assert_eq!(pyramid.roll(&mut rng), Err(ActionError::PyramidEmpty));
    }

    #[test]
    fn test_peek_has_no_side_effect() {
        let mut rng = StdRng::seed_from_u64(3);
        let pyramid = Pyramid::new(&mut rng);
        let before = pyramid.clone();

        let value = pyramid.peek(CamelColor::Green).unwrap();
        assert_eq!(pyramid, before);
        assert_eq!(
            value,
            pyramid.dice().iter().find(|d| d.color == CamelColor::Green).unwrap().value
        );
    }

    #[test]
    fn test_peek_rolled_die_is_none() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pyramid = Pyramid::new(&mut rng);
        let (color, _) = pyramid.roll(&mut rng).unwrap();
        assert_eq!(pyramid.peek(color), None);
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut pyramid = Pyramid::new(&mut rng);
        while pyramid.roll(&mut rng).is_ok() {}

        pyramid.reset(&mut rng);
        assert_eq!(pyramid.remaining(), 5);
        assert_eq!(pyramid.rolled_dice().count(), 0);
    }

    #[test]
    fn test_with_dice_rolls_only_given_dice() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pyramid = Pyramid::with_dice(&[(CamelColor::Blue, 2)]);
        assert_eq!(pyramid.peek(CamelColor::Blue), Some(2));
        assert_eq!(pyramid.peek(CamelColor::Red), None);
        assert_eq!(pyramid.roll(&mut rng), Ok((CamelColor::Blue, 2)));
        assert!(pyramid.is_leg_finished());
    }

    proptest! {
        #[test]
        fn prop_each_roll_removes_exactly_one_color(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pyramid = Pyramid::new(&mut rng);

            for expected_left in (0..5).rev() {
                let before: Vec<CamelColor> = pyramid.available_dice().to_vec();
                let (color, _) = pyramid.roll(&mut rng).unwrap();
                prop_assert_eq!(pyramid.remaining(), expected_left);
                prop_assert!(before.contains(&color));
                prop_assert!(!pyramid.available_dice().contains(&color));
            }
            prop_assert!(pyramid.is_leg_finished());
        }
    }
}
