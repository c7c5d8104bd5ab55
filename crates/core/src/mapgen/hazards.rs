//! Extended-variant hazard passes: pits on caves, thieves on tunnels.

use crate::rng::NumberSource;
use crate::types::Coord;

use super::model::DungeonMap;

/// Pits land on `difficulty` distinct caves, skipping start, end, and caves
/// that already have one. The quota caps at caves - 2 so the start/end
/// exclusions cannot starve the draw loop.
pub(super) fn place_pits(
    map: &mut DungeonMap,
    start: Coord,
    end: Coord,
    difficulty: u32,
    source: &mut dyn NumberSource,
) {
    let caves = map.caves();
    let mut quota = difficulty as usize;
    if quota >= caves.len() {
        quota = caves.len() - 2;
    }
    while quota > 0 {
        let pick = caves[source.next_in_range(0, caves.len() - 1)];
        if pick == start || pick == end || map.cell(pick).has_pit() {
            continue;
        }
        map.cell_mut(pick).place_pit();
        quota -= 1;
    }
}

/// Thieves land on `difficulty` distinct tunnels, skipping start, end, and
/// tunnels that already have one. Unlike pits, the cap is the full tunnel
/// count with no slots reserved for the exclusions; start and end are always
/// caves, so the skip never bites, and the lopsided cap is kept as-is.
pub(super) fn place_thieves(
    map: &mut DungeonMap,
    start: Coord,
    end: Coord,
    difficulty: u32,
    source: &mut dyn NumberSource,
) {
    let tunnels = map.tunnels();
    let mut quota = difficulty as usize;
    if quota >= tunnels.len() {
        quota = tunnels.len();
    }
    while quota > 0 {
        let pick = tunnels[source.next_in_range(0, tunnels.len() - 1)];
        if pick == start || pick == end || map.cell(pick).has_thief() {
            continue;
        }
        map.cell_mut(pick).place_thief();
        quota -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::graph::{candidate_edges, link_spanning_tree};
    use crate::mapgen::placement::choose_start_end;
    use crate::rng::RecordingSource;

    fn map_with_start_end() -> (DungeonMap, Coord, Coord) {
        for seed in 0..20 {
            let mut map = DungeonMap::new(6, 6, false);
            let candidates = candidate_edges(6, 6, false);
            let mut source = RecordingSource::new(seed);
            link_spanning_tree(&mut map, &candidates, &mut source);
            if map.caves().len() < 8 || map.tunnels().len() < 4 {
                continue;
            }
            if let Ok((start, end)) = choose_start_end(&map, &mut source) {
                return (map, start, end);
            }
        }
        panic!("no seed produced a start/end pair");
    }

    #[test]
    fn pits_avoid_start_and_end_and_hit_the_quota() {
        let (mut map, start, end) = map_with_start_end();
        let mut source = RecordingSource::new(40);
        place_pits(&mut map, start, end, 4, &mut source);
        let pits: Vec<Coord> = map.coords().filter(|&c| map.cell(c).has_pit()).collect();
        assert_eq!(pits.len(), 4);
        assert!(pits.iter().all(|&c| map.cell(c).is_cave()));
        assert!(!pits.contains(&start));
        assert!(!pits.contains(&end));
    }

    #[test]
    fn thieves_land_only_on_tunnels() {
        let (mut map, start, end) = map_with_start_end();
        let mut source = RecordingSource::new(41);
        place_thieves(&mut map, start, end, 3, &mut source);
        let thieves: Vec<Coord> = map.coords().filter(|&c| map.cell(c).has_thief()).collect();
        assert_eq!(thieves.len(), 3);
        assert!(thieves.iter().all(|&c| !map.cell(c).is_cave()));
    }

    #[test]
    fn oversized_thief_quota_caps_at_the_full_tunnel_count() {
        let (mut map, start, end) = map_with_start_end();
        let tunnels = map.tunnels().len();
        let mut source = RecordingSource::new(42);
        place_thieves(&mut map, start, end, tunnels as u32 + 5, &mut source);
        let placed = map.coords().filter(|&c| map.cell(c).has_thief()).count();
        assert_eq!(placed, tunnels);
    }
}
