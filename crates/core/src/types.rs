use std::fmt;

use serde::{Deserialize, Serialize};

/// Row/column address of a cell. Row 0 is the top of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Fixed scan order used wherever doors are examined one by one.
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::South, Direction::East, Direction::West];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        })
    }
}

/// Discriminant order matches the placement draw: 0 diamond, 1 ruby,
/// 2 sapphire (a draw of 3 places nothing).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Treasure {
    Diamond,
    Ruby,
    Sapphire,
}

impl fmt::Display for Treasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Treasure::Diamond => "diamond",
            Treasure::Ruby => "ruby",
            Treasure::Sapphire => "sapphire",
        })
    }
}

/// Monster proximity signal, recomputed on every read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Smell {
    WeakPungent,
    StrongPungent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The arrow finished the monster at the impact cell.
    Dead,
    /// The arrow wounded a full-health monster.
    Injured,
    /// The arrow flew into darkness or struck an empty cell.
    Unaffected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    EatenByMonster,
    FellIntoPit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Won,
    Lost,
}

/// Which rule set a dungeon was generated and played under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    Standard,
    /// Adds pits on caves and thieves on tunnels, with their move
    /// consequences.
    PitsAndThieves,
}
