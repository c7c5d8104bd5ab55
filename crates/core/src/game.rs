//! The turn-based simulation: one player walking a generated dungeon.
//! Every action runs to completion synchronously; once the game is over,
//! every mutating action is rejected.

mod shot;

use crate::error::GameError;
use crate::mapgen::{self, Cell, Doors, DungeonConfig, DungeonMap, Health};
use crate::rng::NumberSource;
use crate::types::{
    Coord, DeathCause, Direction, GameStatus, ShotOutcome, Smell, Treasure, Variant,
};

#[derive(Clone, Debug)]
struct Player {
    name: String,
    treasures: Vec<Treasure>,
    arrows: usize,
    alive: bool,
    death: Option<DeathCause>,
}

impl Player {
    fn new(name: String) -> Self {
        Self { name, treasures: Vec::new(), arrows: 3, alive: true, death: None }
    }

    fn kill(&mut self, cause: DeathCause) {
        self.alive = false;
        self.death = Some(cause);
    }
}

/// A live game: the generated map plus the player walking it. The number
/// source that generated the map keeps feeding gameplay rolls (wounded
/// monsters, pits), so its recorded sequence covers everything needed to
/// rebuild the dungeon.
pub struct Dungeon {
    config: DungeonConfig,
    map: DungeonMap,
    start: Coord,
    end: Coord,
    player: Player,
    player_at: Coord,
    source: Box<dyn NumberSource>,
}

impl Dungeon {
    pub fn new(
        config: DungeonConfig,
        player_name: impl Into<String>,
        mut source: Box<dyn NumberSource>,
    ) -> Result<Self, GameError> {
        let generated = mapgen::generate(&config, source.as_mut())?;
        let mut dungeon = Self {
            config,
            map: generated.map,
            start: generated.start,
            end: generated.end,
            player: Player::new(player_name.into()),
            player_at: generated.start,
            source,
        };
        dungeon.map.cell_mut(generated.start).mark_visited();
        Ok(dungeon)
    }

    // --- read surface -----------------------------------------------------

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.map.rows()
    }

    pub fn cols(&self) -> usize {
        self.map.cols()
    }

    pub fn map(&self) -> &DungeonMap {
        &self.map
    }

    /// Deep copy of one cell for external inspection.
    pub fn cell_snapshot(&self, coord: Coord) -> Cell {
        self.map.cell(coord).clone()
    }

    pub fn start_cell(&self) -> Cell {
        self.cell_snapshot(self.start)
    }

    pub fn end_cell(&self) -> Cell {
        self.cell_snapshot(self.end)
    }

    pub fn current_cell(&self) -> Cell {
        self.cell_snapshot(self.player_at)
    }

    pub fn player_coord(&self) -> Coord {
        self.player_at
    }

    pub fn player_name(&self) -> &str {
        &self.player.name
    }

    pub fn player_arrows(&self) -> usize {
        self.player.arrows
    }

    pub fn player_treasures(&self) -> &[Treasure] {
        &self.player.treasures
    }

    pub fn player_treasure_count(&self, kind: Treasure) -> usize {
        self.player.treasures.iter().filter(|&&t| t == kind).count()
    }

    pub fn is_player_alive(&self) -> bool {
        self.player.alive
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.player.death
    }

    /// Loss takes precedence: dying on the end cell is still a loss.
    pub fn status(&self) -> GameStatus {
        if !self.player.alive {
            GameStatus::Lost
        } else if self.player_at == self.end {
            GameStatus::Won
        } else {
            GameStatus::Active
        }
    }

    pub fn doors_here(&self) -> Doors {
        self.map.doors(self.player_at)
    }

    pub fn smell_at(&self, coord: Coord) -> Option<Smell> {
        self.map.smell_at(coord)
    }

    pub fn smell_here(&self) -> Option<Smell> {
        self.map.smell_at(self.player_at)
    }

    pub fn has_pit(&self, coord: Coord) -> bool {
        self.map.cell(coord).has_pit()
    }

    pub fn has_thief(&self, coord: Coord) -> bool {
        self.map.cell(coord).has_thief()
    }

    /// Directions whose door leads to a cell holding a pit.
    pub fn pits_around(&self, coord: Coord) -> Vec<Direction> {
        let doors = self.map.doors(coord);
        Direction::ALL
            .into_iter()
            .filter(|&direction| {
                doors.get(direction).is_some_and(|target| self.map.cell(target).has_pit())
            })
            .collect()
    }

    /// Every value the number source has emitted, generation and gameplay
    /// rolls alike. Feeding this to a scripted source rebuilds the dungeon.
    pub fn recorded_draws(&self) -> &[usize] {
        self.source.recorded()
    }

    // --- command surface --------------------------------------------------

    pub fn move_player(&mut self, direction: Direction) -> Result<(), GameError> {
        self.ensure_active()?;
        let Some(destination) = self.map.doors(self.player_at).get(direction) else {
            return Err(GameError::NoDoor(direction));
        };
        self.player_at = destination;
        self.map.cell_mut(destination).mark_visited();
        self.apply_monster_encounter(destination);
        if self.config.variant == Variant::PitsAndThieves {
            self.apply_hazard_encounter(destination);
        }
        Ok(())
    }

    fn apply_monster_encounter(&mut self, at: Coord) {
        let Some(monster) = self.map.cell(at).monster() else {
            return;
        };
        match monster.health() {
            Health::Full => self.player.kill(DeathCause::EatenByMonster),
            Health::Weakened => {
                // A wounded monster kills on a coin flip.
                if self.source.next_in_range(0, 1) == 0 {
                    self.player.kill(DeathCause::EatenByMonster);
                }
            }
            Health::Dead => {}
        }
    }

    fn apply_hazard_encounter(&mut self, at: Coord) {
        // The pit roll happens even when the monster already killed the
        // player, keeping the draw sequence identical either way.
        if self.map.cell(at).has_pit() && self.source.next_in_range(0, 2) == 0 {
            self.player.kill(DeathCause::FellIntoPit);
        }
        if self.map.cell(at).has_thief() {
            self.player.treasures.clear();
        }
    }

    /// Fires one arrow. The arrow is spent whatever happens; the outcome
    /// reports what it hit.
    pub fn shoot(
        &mut self,
        distance: usize,
        direction: Direction,
    ) -> Result<ShotOutcome, GameError> {
        self.ensure_active()?;
        if !(1..=4).contains(&distance) {
            return Err(GameError::DistanceOutOfRange(distance));
        }
        if self.player.arrows == 0 {
            return Err(GameError::OutOfArrows);
        }
        self.player.arrows -= 1;
        let Some(impact) = shot::fly(&self.map, self.player_at, distance, direction) else {
            return Ok(ShotOutcome::Unaffected);
        };
        if !self.map.cell(impact).has_live_monster() {
            return Ok(ShotOutcome::Unaffected);
        }
        match self.map.cell_mut(impact).wound_monster() {
            Health::Weakened => Ok(ShotOutcome::Injured),
            _ => Ok(ShotOutcome::Dead),
        }
    }

    pub fn pick_treasure(&mut self, kind: Treasure) -> Result<(), GameError> {
        self.ensure_active()?;
        let cell = self.map.cell(self.player_at);
        if cell.treasures().is_empty() {
            return Err(GameError::NoTreasureHere);
        }
        if !self.map.cell_mut(self.player_at).remove_treasure(kind) {
            return Err(GameError::TreasureNotPresent(kind));
        }
        self.player.treasures.push(kind);
        Ok(())
    }

    pub fn pick_all_treasures(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        if self.map.cell(self.player_at).treasures().is_empty() {
            return Err(GameError::NoTreasureHere);
        }
        let mut found = self.map.cell_mut(self.player_at).take_all_treasures();
        self.player.treasures.append(&mut found);
        Ok(())
    }

    pub fn pick_arrow(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        if self.map.cell(self.player_at).arrows() == 0 {
            return Err(GameError::NoArrowsHere);
        }
        self.map.cell_mut(self.player_at).take_arrow();
        self.player.arrows += 1;
        Ok(())
    }

    pub fn pick_all_arrows(&mut self) -> Result<(), GameError> {
        self.ensure_active()?;
        if self.map.cell(self.player_at).arrows() == 0 {
            return Err(GameError::NoArrowsHere);
        }
        self.player.arrows += self.map.cell_mut(self.player_at).take_all_arrows();
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        match self.status() {
            GameStatus::Active => Ok(()),
            GameStatus::Won => Err(GameError::AlreadyWon),
            GameStatus::Lost => Err(GameError::AlreadyLost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RecordingSource;

    fn any_dungeon(variant: Variant) -> Dungeon {
        for seed in 0..50 {
            let config = DungeonConfig {
                rows: 6,
                cols: 6,
                interconnectivity: 2,
                wrapping: false,
                treasure_arrow_percent: 50,
                difficulty: 2,
                variant,
            };
            let source = Box::new(RecordingSource::new(seed));
            if let Ok(dungeon) = Dungeon::new(config, "rook", source) {
                return dungeon;
            }
        }
        panic!("no seed generated a dungeon");
    }

    #[test]
    fn a_new_game_is_active_with_three_arrows() {
        let dungeon = any_dungeon(Variant::Standard);
        assert_eq!(dungeon.status(), GameStatus::Active);
        assert!(dungeon.is_player_alive());
        assert_eq!(dungeon.player_arrows(), 3);
        assert!(dungeon.player_treasures().is_empty());
        assert_eq!(dungeon.player_name(), "rook");
        assert!(dungeon.current_cell().visited());
        assert_eq!(dungeon.death_cause(), None);
    }

    #[test]
    fn moving_through_a_missing_door_is_rejected_in_place() {
        let mut dungeon = any_dungeon(Variant::Standard);
        let doors = dungeon.doors_here();
        let Some(blocked) = Direction::ALL.into_iter().find(|&d| !doors.contains(d)) else {
            // Start cave with doors on all four sides; nothing to assert.
            return;
        };
        let before = dungeon.player_coord();
        assert_eq!(dungeon.move_player(blocked), Err(GameError::NoDoor(blocked)));
        assert_eq!(dungeon.player_coord(), before);
    }

    #[test]
    fn shot_distance_is_validated_before_the_arrow_is_spent() {
        let mut dungeon = any_dungeon(Variant::Standard);
        assert_eq!(
            dungeon.shoot(0, Direction::North),
            Err(GameError::DistanceOutOfRange(0))
        );
        assert_eq!(
            dungeon.shoot(5, Direction::North),
            Err(GameError::DistanceOutOfRange(5))
        );
        assert_eq!(dungeon.player_arrows(), 3);
    }

    #[test]
    fn every_shot_spends_exactly_one_arrow() {
        let mut dungeon = any_dungeon(Variant::Standard);
        let direction = dungeon.doors_here().directions()[0];
        for remaining in (0..3).rev() {
            dungeon.shoot(4, direction).unwrap();
            assert_eq!(dungeon.player_arrows(), remaining);
        }
        assert_eq!(dungeon.shoot(1, direction), Err(GameError::OutOfArrows));
        assert_eq!(dungeon.player_arrows(), 0);
    }

    #[test]
    fn snapshots_do_not_alias_live_state() {
        let mut dungeon = any_dungeon(Variant::Standard);
        let before = dungeon.current_cell();
        let direction = dungeon.doors_here().directions()[0];
        let _ = dungeon.move_player(direction);
        assert_eq!(before.coord(), dungeon.start_cell().coord());
    }

    #[test]
    fn picks_at_an_empty_cell_fail_without_changing_inventory() {
        let mut dungeon = any_dungeon(Variant::Standard);
        let cell = dungeon.current_cell();
        if cell.treasures().is_empty() {
            assert_eq!(dungeon.pick_all_treasures(), Err(GameError::NoTreasureHere));
            assert_eq!(
                dungeon.pick_treasure(Treasure::Ruby),
                Err(GameError::NoTreasureHere)
            );
        }
        if cell.arrows() == 0 {
            assert_eq!(dungeon.pick_arrow(), Err(GameError::NoArrowsHere));
            assert_eq!(dungeon.pick_all_arrows(), Err(GameError::NoArrowsHere));
        }
        assert!(dungeon.player_treasures().is_empty());
        assert_eq!(dungeon.player_arrows(), 3);
    }
}
