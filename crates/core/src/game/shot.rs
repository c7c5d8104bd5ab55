//! Crooked-arrow flight. The arrow slides straight through tunnels without
//! spending distance and must keep its compass heading through caves,
//! spending one unit per cave. Both impact-point branches below are load
//! bearing; collapsing them changes observable hit/miss outcomes.

use crate::mapgen::DungeonMap;
use crate::types::{Coord, Direction};

/// Returns the cell the arrow lands in, or `None` when it flies into
/// darkness (no initial door, or a cave mid-flight without the required
/// exit).
pub(super) fn fly(
    map: &DungeonMap,
    from: Coord,
    mut distance: usize,
    direction: Direction,
) -> Option<Coord> {
    let mut heading = direction;
    let mut previous = from;
    let mut current = map.doors(from).get(direction);
    current?;
    let mut entered = false;
    while distance > 0 {
        entered = true;
        let at = current?;
        let doors = map.doors(at);
        if map.cell(at).is_cave() {
            previous = at;
            current = doors.get(heading);
            heading = heading.opposite();
            distance -= 1;
            if !doors.contains(heading) {
                return None;
            }
        } else {
            // Tunnels have exactly two exits; leave through the one the
            // arrow did not come in by, then relabel the heading.
            let exits = map.cell(at).adjacent();
            let next = if exits[0] == previous { exits[1] } else { exits[0] };
            for candidate in Direction::ALL {
                if doors.get(candidate) == Some(next) {
                    heading = candidate;
                }
            }
            previous = at;
            current = Some(next);
        }
    }
    if entered { Some(previous) } else { current }
}
