//! Data model for a generated dungeon: cells, monsters, and the dense grid
//! they live in, plus the canonical byte encoding used for fingerprinting.

use std::collections::VecDeque;

use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Coord, Direction, Smell, Treasure};

/// Monster health steps down by one level per arrow hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Health {
    Full,
    Weakened,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Monster {
    health: Health,
}

impl Monster {
    pub(crate) fn new() -> Self {
        Self { health: Health::Full }
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health != Health::Dead
    }

    pub(crate) fn wound(&mut self) {
        self.health = match self.health {
            Health::Full => Health::Weakened,
            Health::Weakened | Health::Dead => Health::Dead,
        };
    }
}

/// One grid location. Adjacency is kept in insertion order; the crooked-shot
/// traversal and the smell scan both walk it positionally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: Coord,
    adjacent: Vec<Coord>,
    treasures: Vec<Treasure>,
    arrows: usize,
    monster: Option<Monster>,
    pit: bool,
    thief: bool,
    visited: bool,
}

impl Cell {
    fn new(coord: Coord) -> Self {
        Self {
            coord,
            adjacent: Vec::new(),
            treasures: Vec::new(),
            arrows: 0,
            monster: None,
            pit: false,
            thief: false,
            visited: false,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn adjacent(&self) -> &[Coord] {
        &self.adjacent
    }

    /// Degree 2 makes a tunnel; anything else is a cave.
    pub fn is_cave(&self) -> bool {
        self.adjacent.len() != 2
    }

    pub fn treasures(&self) -> &[Treasure] {
        &self.treasures
    }

    pub fn treasure_count(&self, kind: Treasure) -> usize {
        self.treasures.iter().filter(|&&t| t == kind).count()
    }

    pub fn arrows(&self) -> usize {
        self.arrows
    }

    pub fn monster(&self) -> Option<&Monster> {
        self.monster.as_ref()
    }

    pub fn has_live_monster(&self) -> bool {
        self.monster.as_ref().is_some_and(Monster::is_alive)
    }

    pub fn has_pit(&self) -> bool {
        self.pit
    }

    pub fn has_thief(&self) -> bool {
        self.thief
    }

    pub fn visited(&self) -> bool {
        self.visited
    }

    pub(crate) fn link(&mut self, other: Coord) {
        self.adjacent.push(other);
    }

    pub(crate) fn add_treasure(&mut self, kind: Treasure) {
        self.treasures.push(kind);
    }

    pub(crate) fn remove_treasure(&mut self, kind: Treasure) -> bool {
        match self.treasures.iter().position(|&t| t == kind) {
            Some(index) => {
                self.treasures.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_all_treasures(&mut self) -> Vec<Treasure> {
        std::mem::take(&mut self.treasures)
    }

    pub(crate) fn set_arrows(&mut self, count: usize) {
        self.arrows = count;
    }

    pub(crate) fn take_arrow(&mut self) {
        self.arrows -= 1;
    }

    pub(crate) fn take_all_arrows(&mut self) -> usize {
        std::mem::take(&mut self.arrows)
    }

    pub(crate) fn place_monster(&mut self) {
        self.monster = Some(Monster::new());
    }

    pub(crate) fn wound_monster(&mut self) -> Health {
        let monster = self.monster.as_mut();
        debug_assert!(monster.is_some());
        match monster {
            Some(monster) => {
                monster.wound();
                monster.health()
            }
            None => Health::Dead,
        }
    }

    pub(crate) fn place_pit(&mut self) {
        self.pit = true;
    }

    pub(crate) fn place_thief(&mut self) {
        self.thief = true;
    }

    pub(crate) fn mark_visited(&mut self) {
        self.visited = true;
    }
}

/// The connected grid. Topology is fixed once generation completes; only
/// cell contents mutate during play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DungeonMap {
    rows: usize,
    cols: usize,
    wrapping: bool,
    cells: Vec<Cell>,
}

impl DungeonMap {
    pub(crate) fn new(rows: usize, cols: usize, wrapping: bool) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(Coord::new(row, col)));
            }
        }
        Self { rows, cols, wrapping, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn wrapping(&self) -> bool {
        self.wrapping
    }

    fn index(&self, coord: Coord) -> usize {
        coord.row * self.cols + coord.col
    }

    pub fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[self.index(coord)]
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        let index = self.index(coord);
        &mut self.cells[index]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row-major coordinates of every cell.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Coord::new(row, col)))
    }

    pub fn caves(&self) -> Vec<Coord> {
        self.coords().filter(|&c| self.cell(c).is_cave()).collect()
    }

    pub fn tunnels(&self) -> Vec<Coord> {
        self.coords().filter(|&c| !self.cell(c).is_cave()).collect()
    }

    pub(crate) fn link(&mut self, a: Coord, b: Coord) {
        self.cell_mut(a).link(b);
        self.cell_mut(b).link(a);
    }

    pub fn edge_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.adjacent().len()).sum::<usize>() / 2
    }

    /// Unweighted shortest-path length between two cells. The graph is
    /// connected once generation finishes, so the target is always found.
    pub fn bfs_distance(&self, from: Coord, to: Coord) -> usize {
        let mut distance = vec![usize::MAX; self.cells.len()];
        let mut queue = VecDeque::new();
        distance[self.index(from)] = 0;
        queue.push_back(from);
        while let Some(current) = queue.pop_front() {
            if current == to {
                break;
            }
            let next_distance = distance[self.index(current)] + 1;
            for &neighbor in self.cell(current).adjacent() {
                let slot = self.index(neighbor);
                if distance[slot] == usize::MAX {
                    distance[slot] = next_distance;
                    queue.push_back(neighbor);
                }
            }
        }
        distance[self.index(to)]
    }

    /// Compass doors out of a cell, derived from adjacency and the grid
    /// dimensions. Wrap seams relabel after the plain offsets, so a seam
    /// neighbor wins the slot it wraps into.
    pub fn doors(&self, coord: Coord) -> Doors {
        let mut doors = Doors::default();
        let Coord { row, col } = coord;
        for &adjacent in self.cell(coord).adjacent() {
            if adjacent.row == row + 1 {
                doors.set(Direction::South, adjacent);
            } else if adjacent.row + 1 == row {
                doors.set(Direction::North, adjacent);
            } else if adjacent.col == col + 1 {
                doors.set(Direction::East, adjacent);
            } else if adjacent.col + 1 == col {
                doors.set(Direction::West, adjacent);
            }
            if row + (self.rows - 1) == adjacent.row {
                doors.set(Direction::North, adjacent);
            } else if adjacent.row + (self.rows - 1) == row {
                doors.set(Direction::South, adjacent);
            }
            if col + (self.cols - 1) == adjacent.col {
                doors.set(Direction::West, adjacent);
            } else if adjacent.col + (self.cols - 1) == col {
                doors.set(Direction::East, adjacent);
            }
        }
        doors
    }

    /// Smell at a cell: a live monster one hop away is strongly pungent;
    /// otherwise one live monster in the dedupe'd two-hop neighborhood is
    /// weak and more than one is strong. The two-hop list includes the cell
    /// itself when a neighbor links back, so a monster underfoot registers.
    pub fn smell_at(&self, coord: Coord) -> Option<Smell> {
        let mut two_away: Vec<Coord> = Vec::new();
        for &near in self.cell(coord).adjacent() {
            for &far in self.cell(near).adjacent() {
                if !two_away.contains(&far) {
                    two_away.push(far);
                }
            }
            if self.cell(near).has_live_monster() {
                return Some(Smell::StrongPungent);
            }
        }
        let monsters =
            two_away.iter().filter(|&&c| self.cell(c).has_live_monster()).count();
        match monsters {
            0 => None,
            1 => Some(Smell::WeakPungent),
            _ => Some(Smell::StrongPungent),
        }
    }

    /// Stable encoding of topology and feature placement. Two maps with
    /// equal fingerprints were generated from the same draw sequence.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.rows as u32).to_le_bytes());
        bytes.extend((self.cols as u32).to_le_bytes());
        bytes.push(u8::from(self.wrapping));
        for cell in &self.cells {
            bytes.extend((cell.adjacent.len() as u32).to_le_bytes());
            for neighbor in &cell.adjacent {
                bytes.extend((neighbor.row as u32).to_le_bytes());
                bytes.extend((neighbor.col as u32).to_le_bytes());
            }
            bytes.extend((cell.treasures.len() as u32).to_le_bytes());
            for treasure in &cell.treasures {
                bytes.push(match treasure {
                    Treasure::Diamond => 0,
                    Treasure::Ruby => 1,
                    Treasure::Sapphire => 2,
                });
            }
            bytes.extend((cell.arrows as u32).to_le_bytes());
            bytes.push(match cell.monster {
                None => 0,
                Some(_) => 1,
            });
            bytes.push(u8::from(cell.pit));
            bytes.push(u8::from(cell.thief));
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

/// Compass-indexed door table for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Doors {
    slots: [Option<Coord>; 4],
}

impl Doors {
    pub fn get(&self, direction: Direction) -> Option<Coord> {
        self.slots[direction.index()]
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.get(direction).is_some()
    }

    pub fn directions(&self) -> Vec<Direction> {
        Direction::ALL.into_iter().filter(|&d| self.contains(d)).collect()
    }

    fn set(&mut self, direction: Direction, target: Coord) {
        self.slots[direction.index()] = Some(target);
    }
}

/// Output of the generation pipeline.
#[derive(Clone, Debug)]
pub struct GeneratedDungeon {
    pub map: DungeonMap,
    pub start: Coord,
    pub end: Coord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_cell_line() -> DungeonMap {
        let mut map = DungeonMap::new(1, 3, false);
        map.link(Coord::new(0, 0), Coord::new(0, 1));
        map.link(Coord::new(0, 1), Coord::new(0, 2));
        map
    }

    #[test]
    fn degree_two_is_a_tunnel_and_everything_else_a_cave() {
        let map = three_cell_line();
        assert!(map.cell(Coord::new(0, 0)).is_cave());
        assert!(!map.cell(Coord::new(0, 1)).is_cave());
        assert!(map.cell(Coord::new(0, 2)).is_cave());
        assert_eq!(map.caves(), vec![Coord::new(0, 0), Coord::new(0, 2)]);
        assert_eq!(map.tunnels(), vec![Coord::new(0, 1)]);
    }

    #[test]
    fn doors_follow_plain_offsets() {
        let mut map = DungeonMap::new(2, 3, false);
        map.link(Coord::new(0, 0), Coord::new(0, 1));
        map.link(Coord::new(0, 1), Coord::new(0, 2));
        let doors = map.doors(Coord::new(0, 1));
        assert_eq!(doors.get(Direction::West), Some(Coord::new(0, 0)));
        assert_eq!(doors.get(Direction::East), Some(Coord::new(0, 2)));
        assert!(!doors.contains(Direction::North));
        assert_eq!(doors.directions(), vec![Direction::East, Direction::West]);
    }

    #[test]
    fn wrap_seam_neighbors_relabel_across_the_edge() {
        let mut map = DungeonMap::new(3, 3, true);
        map.link(Coord::new(0, 0), Coord::new(2, 0));
        let doors = map.doors(Coord::new(0, 0));
        assert_eq!(doors.get(Direction::North), Some(Coord::new(2, 0)));
        let doors = map.doors(Coord::new(2, 0));
        assert_eq!(doors.get(Direction::South), Some(Coord::new(0, 0)));
    }

    #[test]
    fn bfs_distance_counts_hops() {
        let map = three_cell_line();
        assert_eq!(map.bfs_distance(Coord::new(0, 0), Coord::new(0, 2)), 2);
        assert_eq!(map.bfs_distance(Coord::new(0, 1), Coord::new(0, 1)), 0);
    }

    #[test]
    fn monster_underfoot_smells_weak_through_a_backlink() {
        let mut map = three_cell_line();
        map.cell_mut(Coord::new(0, 0)).place_monster();
        // (0,0)'s only neighbor links back, so its own monster is two hops.
        assert_eq!(map.smell_at(Coord::new(0, 0)), Some(Smell::WeakPungent));
        assert_eq!(map.smell_at(Coord::new(0, 1)), Some(Smell::StrongPungent));
    }

    #[test]
    fn dead_monsters_stop_smelling() {
        let mut map = three_cell_line();
        map.cell_mut(Coord::new(0, 2)).place_monster();
        assert_eq!(map.smell_at(Coord::new(0, 1)), Some(Smell::StrongPungent));
        map.cell_mut(Coord::new(0, 2)).wound_monster();
        map.cell_mut(Coord::new(0, 2)).wound_monster();
        assert_eq!(map.smell_at(Coord::new(0, 1)), None);
    }

    #[test]
    fn two_wounds_kill_a_monster() {
        let mut monster = Monster::new();
        assert!(monster.is_alive());
        monster.wound();
        assert_eq!(monster.health(), Health::Weakened);
        assert!(monster.is_alive());
        monster.wound();
        assert_eq!(monster.health(), Health::Dead);
        assert!(!monster.is_alive());
    }

    #[test]
    fn fingerprint_tracks_feature_placement() {
        let base = three_cell_line();
        let mut treasured = base.clone();
        treasured.cell_mut(Coord::new(0, 0)).add_treasure(Treasure::Ruby);
        assert_ne!(base.fingerprint(), treasured.fingerprint());
        assert_eq!(base.fingerprint(), three_cell_line().fingerprint());
    }
}
