//! Camel track: positions, stacking, and spectator tiles.
//!
//! Stack order is held on each camel as `stack_position`. A moving camel carries
//! everything above it, and the carried group is always set down on top of the
//! camels already in the destination cell, keeping its own relative order.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::game::{CAMEL_COLORS, FINISH_LINE, START_POSITION_MAX, START_POSITION_MIN, TRACK_LENGTH};
use crate::game::types::{Camel, CamelColor, MoveResult, SpectatorEffect, SpectatorTile, TrackSpace};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CamelTrack {
    camels: Vec<Camel>,
    /// Cells `0..=TRACK_LENGTH`. Camels past the last cell are only tracked on `camels`.
    track: Vec<TrackSpace>,
}

impl Default for CamelTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl CamelTrack {
    /// An empty track with no camels on it.
    pub fn new() -> Self {
        Self {
            camels: Vec::new(),
            track: (0..=TRACK_LENGTH).map(TrackSpace::new).collect(),
        }
    }

    /// Drop every camel on a random start cell. Camels sharing a cell stack in table order.
    pub fn initialize_camels<R: Rng>(&mut self, rng: &mut R) {
        self.camels.clear();
        for &color in CAMEL_COLORS.iter() {
            let position = rng.random_range(START_POSITION_MIN..=START_POSITION_MAX);
            let stack_position = self.height_at(position);
            self.camels.push(Camel {
                color,
                position,
                stack_position,
            });
        }
        self.sync_cells();
    }

    /// Place camels at explicit cells, stacked in the given order.
    pub fn with_camels(placements: &[(CamelColor, u32)]) -> Self {
        let mut track = Self::new();
        for &(color, position) in placements {
            let stack_position = track.height_at(position);
            track.camels.push(Camel {
                color,
                position,
                stack_position,
            });
        }
        track.sync_cells();
        track
    }

    /// Move `color` by `steps`, carrying every camel stacked on it, then apply the
    /// tile in the landing cell if there is one.
    ///
    /// The tile itself stays on the track; the caller removes it and pays its owner.
    pub fn move_camel(&mut self, color: CamelColor, steps: u32, active_tiles: &[SpectatorTile]) -> MoveResult {
        let old_position = self.camel(color).map(|c| c.position).unwrap_or(0);
        let carried = self.stack_from(color);

        let mut new_position = old_position + steps;
        self.relocate(&carried, new_position);

        let tile = active_tiles
            .iter()
            .find(|tile| tile.position == Some(new_position));

        let spectator_effect = tile.map(|tile| {
            let effect = SpectatorEffect {
                tile_type: tile.tile_type,
                player_id: tile.player_id,
                position: new_position,
            };
            let shifted = (i64::from(new_position) + tile.tile_type.offset()).max(0);
            new_position = u32::try_from(shifted).unwrap_or(0);
            self.relocate(&carried, new_position);
            effect
        });

        debug!(
            "[Track] {} moved {} -> {} carrying {:?}",
            color, old_position, new_position, carried
        );

        MoveResult {
            camel_color: color,
            dice_value: steps,
            old_position,
            new_position,
            carried_camels: carried,
            spectator_effect,
        }
    }

    /// Put a tile on the track. Fails (returns `false`) outside `1..=TRACK_LENGTH`,
    /// on a cell holding a tile or a camel, or next to another tile.
    pub fn place_spectator_tile(&mut self, position: u32, tile: SpectatorTile) -> bool {
        if !(1..=TRACK_LENGTH).contains(&position) {
            return false;
        }

        let index = position as usize;
        let space = &self.track[index];
        if space.spectator_tile.is_some() || !space.camels.is_empty() {
            return false;
        }

        let has_tile = |i: usize| self.track.get(i).is_some_and(|s| s.spectator_tile.is_some());
        if has_tile(index - 1) || has_tile(index + 1) {
            return false;
        }

        self.track[index].spectator_tile = Some(SpectatorTile {
            position: Some(position),
            ..tile
        });
        true
    }

    /// Move the tile at `from` to `to` under the placement rules, ignoring the tile
    /// itself. On failure the tile stays at `from`.
    pub fn move_spectator_tile(&mut self, from: u32, to: u32) -> bool {
        let Some(tile) = self
            .track
            .get_mut(from as usize)
            .and_then(|space| space.spectator_tile.take())
        else {
            return false;
        };

        if self.place_spectator_tile(to, tile.clone()) {
            return true;
        }
        self.track[from as usize].spectator_tile = Some(tile);
        false
    }

    pub fn remove_spectator_tile(&mut self, position: u32) {
        if let Some(space) = self.track.get_mut(position as usize) {
            space.spectator_tile = None;
        }
    }

    /// All camels from first to last place.
    pub fn rankings(&self) -> Vec<&Camel> {
        let mut ranked: Vec<&Camel> = self.camels.iter().collect();
        ranked.sort_by(|a, b| {
            b.position
                .cmp(&a.position)
                .then(b.stack_position.cmp(&a.stack_position))
        });
        ranked
    }

    /// Top camel of the furthest stack.
    pub fn leading_camel(&self) -> Option<&Camel> {
        self.rankings().first().copied()
    }

    /// Camel just below the leader in its stack, or the top of the next stack back.
    pub fn second_place_camel(&self) -> Option<&Camel> {
        self.rankings().get(1).copied()
    }

    /// Bottom camel of the rearmost stack.
    pub fn last_camel(&self) -> Option<&Camel> {
        self.rankings().last().copied()
    }

    pub fn is_game_finished(&self) -> bool {
        self.camels.iter().any(|c| c.position >= FINISH_LINE)
    }

    pub fn camel(&self, color: CamelColor) -> Option<&Camel> {
        self.camels.iter().find(|c| c.color == color)
    }

    pub fn camels(&self) -> &[Camel] {
        &self.camels
    }

    pub fn spaces(&self) -> &[TrackSpace] {
        &self.track
    }

    pub fn space(&self, position: u32) -> Option<&TrackSpace> {
        self.track.get(position as usize)
    }

    /// Replace camels and cells with a received snapshot. The snapshot is trusted as-is.
    pub fn replace_state(&mut self, other: CamelTrack) {
        *self = other;
    }

    /// Number of camels currently in `position`.
    fn height_at(&self, position: u32) -> usize {
        self.camels.iter().filter(|c| c.position == position).count()
    }

    /// `color` and every camel above it, bottom to top.
    fn stack_from(&self, color: CamelColor) -> Vec<CamelColor> {
        let Some(camel) = self.camel(color) else {
            return Vec::new();
        };
        let mut stack: Vec<&Camel> = self
            .camels
            .iter()
            .filter(|c| c.position == camel.position && c.stack_position >= camel.stack_position)
            .collect();
        stack.sort_by_key(|c| c.stack_position);
        stack.into_iter().map(|c| c.color).collect()
    }

    /// Move `group` (bottom to top) onto the top of the stack at `position`.
    fn relocate(&mut self, group: &[CamelColor], position: u32) {
        let resident = self
            .camels
            .iter()
            .filter(|c| c.position == position && !group.contains(&c.color))
            .count();

        for (offset, color) in group.iter().enumerate() {
            if let Some(camel) = self.camels.iter_mut().find(|c| c.color == *color) {
                camel.position = position;
                camel.stack_position = resident + offset;
            }
        }
        self.normalize_stacks();
        self.sync_cells();
    }

    /// Re-rank every cell 0..n-1, keeping the existing relative order.
    fn normalize_stacks(&mut self) {
        let mut order: Vec<usize> = (0..self.camels.len()).collect();
        order.sort_by_key(|&i| (self.camels[i].position, self.camels[i].stack_position));

        let mut previous: Option<u32> = None;
        let mut rank = 0;
        for i in order {
            let position = self.camels[i].position;
            if previous != Some(position) {
                rank = 0;
                previous = Some(position);
            }
            self.camels[i].stack_position = rank;
            rank += 1;
        }
    }

    /// Rebuild each cell's bottom-to-top camel list from the camels.
    fn sync_cells(&mut self) {
        for space in &mut self.track {
            space.camels.clear();
        }

        let mut ordered: Vec<&Camel> = self.camels.iter().collect();
        ordered.sort_by_key(|c| (c.position, c.stack_position));
        for camel in ordered {
            if let Some(space) = self.track.get_mut(camel.position as usize) {
                space.camels.push(camel.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::SpectatorType;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    fn tile(tile_type: SpectatorType, position: u32) -> SpectatorTile {
        SpectatorTile {
            player_id: Uuid::new_v4(),
            tile_type,
            position: Some(position),
        }
    }

    fn stack_at(track: &CamelTrack, position: u32) -> Vec<CamelColor> {
        track.space(position).unwrap().camels.clone()
    }

    #[test]
    fn test_initialize_places_camels_on_start_cells() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut track = CamelTrack::new();
        track.initialize_camels(&mut rng);

        assert_eq!(track.camels().len(), 5);
        for camel in track.camels() {
            assert!((1..=3).contains(&camel.position));
        }
        let total: usize = track.spaces().iter().map(|s| s.camels.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_move_carries_camels_above() {
        use CamelColor::*;
        let mut track = CamelTrack::with_camels(&[(Red, 2), (Blue, 2), (Green, 2), (Yellow, 1), (White, 5)]);

        let result = track.move_camel(Blue, 3, &[]);

        assert_eq!(result.old_position, 2);
        assert_eq!(result.new_position, 5);
        assert_eq!(result.carried_camels, vec![Blue, Green]);
        assert_eq!(stack_at(&track, 2), vec![Red]);
        // Arrivals land on top of the resident camel.
        assert_eq!(stack_at(&track, 5), vec![White, Blue, Green]);
        assert_eq!(track.camel(Green).unwrap().stack_position, 2);
    }

    #[test]
    fn test_oasis_pushes_stack_forward() {
        use CamelColor::*;
        let mut track = CamelTrack::with_camels(&[(Red, 1), (Blue, 1), (Green, 3), (Yellow, 3), (White, 8)]);
        let tiles = [tile(SpectatorType::Oasis, 4)];

        let result = track.move_camel(Red, 3, &tiles);

        assert_eq!(result.new_position, 5);
        assert_eq!(result.spectator_effect.unwrap().tile_type, SpectatorType::Oasis);
        assert_eq!(result.spectator_effect.unwrap().position, 4);
        assert_eq!(stack_at(&track, 5), vec![Red, Blue]);
        assert!(stack_at(&track, 4).is_empty());
    }

    #[test]
    fn test_mirage_drops_stack_on_top_of_previous_cell() {
        use CamelColor::*;
        let mut track = CamelTrack::with_camels(&[(Red, 1), (Blue, 3), (Green, 6), (Yellow, 6), (White, 9)]);
        let tiles = [tile(SpectatorType::Mirage, 4)];

        let result = track.move_camel(Red, 3, &tiles);

        assert_eq!(result.new_position, 3);
        assert!(result.hit_spectator());
        assert_eq!(stack_at(&track, 3), vec![Blue, Red]);
    }

    #[test]
    fn test_place_tile_rules() {
        use CamelColor::*;
        let mut track = CamelTrack::with_camels(&[(Red, 1), (Blue, 2), (Green, 3), (Yellow, 3), (White, 3)]);

        assert!(!track.place_spectator_tile(0, tile(SpectatorType::Oasis, 0)));
        assert!(!track.place_spectator_tile(TRACK_LENGTH + 1, tile(SpectatorType::Oasis, 0)));
        assert!(!track.place_spectator_tile(2, tile(SpectatorType::Oasis, 2)));
        assert!(track.place_spectator_tile(6, tile(SpectatorType::Oasis, 6)));

        let before = track.clone();
        assert!(!track.place_spectator_tile(6, tile(SpectatorType::Mirage, 6)));
        assert!(!track.place_spectator_tile(5, tile(SpectatorType::Mirage, 5)));
        assert!(!track.place_spectator_tile(7, tile(SpectatorType::Mirage, 7)));
        assert_eq!(track, before);

        assert!(track.place_spectator_tile(8, tile(SpectatorType::Mirage, 8)));
        track.remove_spectator_tile(6);
        assert!(track.space(6).unwrap().spectator_tile.is_none());
    }

    #[test]
    fn test_move_tile_keeps_it_on_failure() {
        use CamelColor::*;
        let mut track = CamelTrack::with_camels(&[(Red, 1), (Blue, 1), (Green, 2), (Yellow, 2), (White, 3)]);
        assert!(track.place_spectator_tile(6, tile(SpectatorType::Oasis, 6)));
        assert!(track.place_spectator_tile(10, tile(SpectatorType::Mirage, 10)));

        assert!(!track.move_spectator_tile(6, 11));
        assert!(!track.move_spectator_tile(6, 3));
        assert!(track.space(6).unwrap().spectator_tile.is_some());

        // Its own old cell does not block the move.
        assert!(track.move_spectator_tile(6, 7));
        assert!(track.space(6).unwrap().spectator_tile.is_none());
        assert_eq!(track.space(7).unwrap().spectator_tile.as_ref().unwrap().position, Some(7));
        assert!(!track.move_spectator_tile(4, 5));
    }

    #[test]
    fn test_rankings() {
        use CamelColor::*;
        let track = CamelTrack::with_camels(&[(Red, 4), (Blue, 7), (Green, 7), (Yellow, 2), (White, 2)]);

        assert_eq!(track.leading_camel().unwrap().color, Green);
        assert_eq!(track.second_place_camel().unwrap().color, Blue);
        assert_eq!(track.last_camel().unwrap().color, Yellow);

        let lone_leader = CamelTrack::with_camels(&[(Red, 4), (Blue, 9), (Green, 4), (Yellow, 2), (White, 2)]);
        assert_eq!(lone_leader.leading_camel().unwrap().color, Blue);
        assert_eq!(lone_leader.second_place_camel().unwrap().color, Green);
    }

    #[test]
    fn test_finish_line() {
        use CamelColor::*;
        let mut track = CamelTrack::with_camels(&[(Red, 14), (Blue, 2), (Green, 2), (Yellow, 2), (White, 2)]);
        assert!(!track.is_game_finished());

        track.move_camel(Red, 3, &[]);
        assert!(track.is_game_finished());
        assert_eq!(track.camel(Red).unwrap().position, 17);
        assert_eq!(track.leading_camel().unwrap().color, Red);
    }

    proptest! {
        #[test]
        fn prop_carried_stack_keeps_order(
            seed in any::<u64>(),
            pick in 0usize..5,
            steps in 1u32..=3,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut track = CamelTrack::new();
            track.initialize_camels(&mut rng);

            let color = CAMEL_COLORS[pick];
            let expected = track.stack_from(color);
            let result = track.move_camel(color, steps, &[]);
            let destination = stack_at(&track, result.new_position);

            prop_assert_eq!(&result.carried_camels, &expected);
            // The carried group sits on top of the destination stack, in order.
            prop_assert!(destination.ends_with(&expected));

            for space in track.spaces() {
                for (rank, c) in space.camels.iter().enumerate() {
                    prop_assert_eq!(track.camel(*c).unwrap().stack_position, rank);
                }
            }
        }
    }
}
