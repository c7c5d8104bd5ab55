//! Connectivity pass: candidate-edge enumeration, a randomized Kruskal
//! spanning tree over a parent-pointer union-find, and the extra
//! interconnectivity edges drawn from the leftover pool.

use std::collections::BTreeSet;

use crate::error::GameError;
use crate::rng::NumberSource;
use crate::types::Coord;

use super::model::DungeonMap;

/// Unordered pair key for a candidate edge.
type EdgeKey = (Coord, Coord);

fn edge_key(a: Coord, b: Coord) -> EdgeKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// All candidate edges in row-major order, east edge then south edge per
/// cell. Wrap edges are appended afterwards: top row to bottom row per
/// column, then leftmost column to rightmost per row. On a 2-row or 2-column
/// wrapping grid the wrap pass re-lists an existing pair; the duplicate stays
/// in the pool.
pub(super) fn candidate_edges(rows: usize, cols: usize, wrapping: bool) -> Vec<(Coord, Coord)> {
    let mut edges = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if col + 1 < cols {
                edges.push((Coord::new(row, col), Coord::new(row, col + 1)));
            }
            if row + 1 < rows {
                edges.push((Coord::new(row, col), Coord::new(row + 1, col)));
            }
        }
    }
    if wrapping {
        for col in 0..cols {
            edges.push((Coord::new(0, col), Coord::new(rows - 1, col)));
        }
        for row in 0..rows {
            edges.push((Coord::new(row, 0), Coord::new(row, cols - 1)));
        }
    }
    edges
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self { parent: (0..size).collect() }
    }

    fn find(&self, mut node: usize) -> usize {
        while self.parent[node] != node {
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        self.parent[root_a] = root_b;
    }
}

/// Links a random spanning tree into `map` and returns the set of consumed
/// edge keys. Draws an index into the full candidate list each round and
/// re-rolls while it lands on a consumed edge; a draw that lands on a
/// same-component edge is skipped without consuming it, so that edge stays
/// available for interconnectivity.
pub(super) fn link_spanning_tree(
    map: &mut DungeonMap,
    candidates: &[(Coord, Coord)],
    source: &mut dyn NumberSource,
) -> BTreeSet<EdgeKey> {
    let cols = map.cols();
    let cell_count = map.rows() * cols;
    let mut components = DisjointSet::new(cell_count);
    let mut used: BTreeSet<EdgeKey> = BTreeSet::new();
    let mut linked = 0;
    let index_of = move |c: Coord| c.row * cols + c.col;
    while linked < cell_count - 1 {
        let mut pick = source.next_in_range(0, candidates.len() - 1);
        while used.contains(&edge_key(candidates[pick].0, candidates[pick].1)) {
            pick = source.next_in_range(0, candidates.len() - 1);
        }
        let (a, b) = candidates[pick];
        if components.find(index_of(a)) == components.find(index_of(b)) {
            continue;
        }
        components.union(index_of(a), index_of(b));
        used.insert(edge_key(a, b));
        map.link(a, b);
        linked += 1;
    }
    used
}

/// Adds `count` extra edges drawn from the pool the spanning tree left
/// behind. Picked edges stay in the pool, so a later draw may double up an
/// edge.
pub(super) fn link_extra_edges(
    map: &mut DungeonMap,
    candidates: &[(Coord, Coord)],
    used: &BTreeSet<EdgeKey>,
    count: usize,
    source: &mut dyn NumberSource,
) -> Result<(), GameError> {
    let mut seen: BTreeSet<EdgeKey> = BTreeSet::new();
    let mut unused: Vec<(Coord, Coord)> = Vec::new();
    for &(a, b) in candidates {
        let key = edge_key(a, b);
        if !seen.insert(key) {
            continue;
        }
        if !used.contains(&key) {
            unused.push((a, b));
        }
    }
    if count > unused.len() {
        return Err(GameError::InterconnectivityTooHigh {
            requested: count,
            available: unused.len(),
        });
    }
    for _ in 0..count {
        let pick = source.next_in_range(0, unused.len() - 1);
        let (a, b) = unused[pick];
        map.link(a, b);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RecordingSource, ScriptedSource};

    #[test]
    fn candidate_enumeration_is_row_major_east_then_south() {
        let edges = candidate_edges(2, 2, false);
        assert_eq!(
            edges,
            vec![
                (Coord::new(0, 0), Coord::new(0, 1)),
                (Coord::new(0, 0), Coord::new(1, 0)),
                (Coord::new(0, 1), Coord::new(1, 1)),
                (Coord::new(1, 0), Coord::new(1, 1)),
            ]
        );
    }

    #[test]
    fn wrap_edges_append_column_pairs_then_row_pairs() {
        let edges = candidate_edges(3, 3, true);
        let plain = candidate_edges(3, 3, false);
        assert_eq!(&edges[..plain.len()], &plain[..]);
        assert_eq!(edges[plain.len()], (Coord::new(0, 0), Coord::new(2, 0)));
        assert_eq!(edges.len(), plain.len() + 6);
    }

    #[test]
    fn spanning_tree_links_exactly_cell_count_minus_one_edges() {
        let mut map = DungeonMap::new(4, 5, false);
        let candidates = candidate_edges(4, 5, false);
        let mut source = RecordingSource::new(11);
        let used = link_spanning_tree(&mut map, &candidates, &mut source);
        assert_eq!(used.len(), 19);
        assert_eq!(map.edge_count(), 19);
        for target in map.coords().collect::<Vec<_>>() {
            assert_ne!(map.bfs_distance(Coord::new(0, 0), target), usize::MAX);
        }
    }

    #[test]
    fn extra_edges_fail_when_the_pool_is_too_small() {
        let mut map = DungeonMap::new(3, 3, false);
        let candidates = candidate_edges(3, 3, false);
        let mut source = RecordingSource::new(3);
        let used = link_spanning_tree(&mut map, &candidates, &mut source);
        // 12 candidates, 8 in the tree, 4 left over.
        let result = link_extra_edges(&mut map, &candidates, &used, 5, &mut source);
        assert_eq!(
            result,
            Err(GameError::InterconnectivityTooHigh { requested: 5, available: 4 })
        );
        assert_eq!(map.edge_count(), 8);
    }

    #[test]
    fn consumed_edge_draws_reroll_without_linking() {
        // Candidates on a 1x3 line: (0,0)-(0,1) then (0,1)-(0,2). The second
        // draw repeats the consumed edge and must re-roll.
        let mut map = DungeonMap::new(1, 3, false);
        let candidates = candidate_edges(1, 3, false);
        let mut source = ScriptedSource::new(vec![0, 0, 1]);
        let used = link_spanning_tree(&mut map, &candidates, &mut source);
        assert_eq!(used.len(), 2);
        assert_eq!(source.consumed(), 3);
    }

    #[test]
    fn same_component_draws_stay_in_the_pool_and_extras_may_repeat() {
        // 2x3 candidates in enumeration order:
        // 0 (0,0)-(0,1), 1 (0,0)-(1,0), 2 (0,1)-(0,2), 3 (0,1)-(1,1),
        // 4 (0,2)-(1,2), 5 (1,0)-(1,1), 6 (1,1)-(1,2).
        // After drawing 0, 1, 5 the draw of 3 closes a cycle: it is skipped
        // but not consumed, so it stays available for interconnectivity.
        let mut map = DungeonMap::new(2, 3, false);
        let candidates = candidate_edges(2, 3, false);
        let mut source = ScriptedSource::new(vec![0, 1, 5, 3, 2, 4, 0, 0]);
        let used = link_spanning_tree(&mut map, &candidates, &mut source);
        assert_eq!(used.len(), 5);
        assert_eq!(source.consumed(), 6);

        // Pool is [edge 3, edge 6]; both extra draws hit edge 3.
        link_extra_edges(&mut map, &candidates, &used, 2, &mut source).unwrap();
        assert_eq!(map.edge_count(), 7);
        let doubled = map
            .cell(Coord::new(0, 1))
            .adjacent()
            .iter()
            .filter(|&&c| c == Coord::new(1, 1))
            .count();
        assert_eq!(doubled, 2);
    }
}
