//! Feature placement over the connected grid: treasure, the BFS-verified
//! start/end pair, monsters, and arrows. Each pass draws from the shared
//! number source in a fixed order so a recorded sequence replays the exact
//! same dungeon.

use std::collections::BTreeSet;

use crate::error::GameError;
use crate::rng::NumberSource;
use crate::types::{Coord, Treasure};

use super::model::DungeonMap;

/// Fraction-of-count quota, truncated. Matches `count * (pct / 100)` in
/// binary floating point rather than exact integer arithmetic; the two
/// disagree on a handful of inputs and replayed dungeons depend on this one.
fn percent_quota(count: usize, percent: u32) -> usize {
    (count as f64 * (f64::from(percent) / 100.0)) as usize
}

/// Drops treasure on cells until the quota of distinct treasured cells is
/// met. Quota is a percentage of the cave count, but the pick ranges over
/// every cell, so tunnels can end up holding treasure too. Each chosen cell
/// gets one to three unit draws; a unit draw of 3 places nothing.
pub(super) fn place_treasure(map: &mut DungeonMap, percent: u32, source: &mut dyn NumberSource) {
    let quota = percent_quota(map.caves().len(), percent);
    let mut treasured = 0;
    while treasured != quota {
        let row = source.next_in_range(0, map.rows() - 1);
        let col = source.next_in_range(0, map.cols() - 1);
        let coord = Coord::new(row, col);
        if !map.cell(coord).treasures().is_empty() {
            continue;
        }
        let units = source.next_in_range(1, 3);
        for _ in 0..units {
            match source.next_in_range(0, 3) {
                0 => map.cell_mut(coord).add_treasure(Treasure::Diamond),
                1 => map.cell_mut(coord).add_treasure(Treasure::Ruby),
                2 => map.cell_mut(coord).add_treasure(Treasure::Sapphire),
                _ => {}
            }
        }
        treasured += 1;
    }
}

/// Draws cave pairs until one sits strictly more than five hops apart,
/// spending attempt budget only on pairs never tried before. The budget is
/// half the number of unordered cave pairs; running out means the requested
/// grid cannot satisfy the distance constraint.
pub(super) fn choose_start_end(
    map: &DungeonMap,
    source: &mut dyn NumberSource,
) -> Result<(Coord, Coord), GameError> {
    let caves = map.caves();
    if caves.len() < 2 {
        return Err(GameError::TooFewCaves);
    }
    let mut budget = caves.len() * (caves.len() - 1) / 2 / 2;
    let mut tried: BTreeSet<(Coord, Coord)> = BTreeSet::new();
    let mut a = source.next_in_range(0, caves.len() - 1);
    let mut b = source.next_in_range(0, caves.len() - 1);
    while map.bfs_distance(caves[a], caves[b]) <= 5 && budget > 0 {
        let pair = if caves[a] <= caves[b] { (caves[a], caves[b]) } else { (caves[b], caves[a]) };
        if tried.insert(pair) {
            budget -= 1;
        }
        a = source.next_in_range(0, caves.len() - 1);
        b = source.next_in_range(0, caves.len() - 1);
    }
    if budget == 0 {
        return Err(GameError::StartEndTooClose);
    }
    Ok((caves[a], caves[b]))
}

/// The end cave always holds a monster; the rest of the quota lands on
/// random caves, skipping the start and caves already occupied.
pub(super) fn place_monsters(
    map: &mut DungeonMap,
    start: Coord,
    end: Coord,
    difficulty: u32,
    source: &mut dyn NumberSource,
) {
    let caves = map.caves();
    map.cell_mut(end).place_monster();
    let mut quota = difficulty as usize - 1;
    if quota >= caves.len() {
        quota = caves.len() - 2;
    }
    while quota > 0 {
        let pick = caves[source.next_in_range(0, caves.len() - 1)];
        if pick == start || map.cell(pick).monster().is_some() {
            continue;
        }
        map.cell_mut(pick).place_monster();
        quota -= 1;
    }
}

/// Quota is a percentage of the full cell count; caves and tunnels both
/// qualify. A chosen cell's count is set to the 1-3 draw, and cells that
/// already hold arrows are re-rolled.
pub(super) fn place_arrows(map: &mut DungeonMap, percent: u32, source: &mut dyn NumberSource) {
    let quota = percent_quota(map.rows() * map.cols(), percent);
    let mut stocked = 0;
    while stocked != quota {
        let row = source.next_in_range(0, map.rows() - 1);
        let col = source.next_in_range(0, map.cols() - 1);
        let coord = Coord::new(row, col);
        if map.cell(coord).arrows() > 0 {
            continue;
        }
        let count = source.next_in_range(1, 3);
        map.cell_mut(coord).set_arrows(count);
        stocked += 1;
    }
}
