pub mod error;
pub mod game;
pub mod mapgen;
pub mod replay;
pub mod rng;
pub mod types;

pub use error::{ErrorKind, GameError};
pub use game::Dungeon;
pub use mapgen::{Cell, Doors, DungeonConfig, DungeonMap, Health, Monster};
pub use replay::reconstruct;
pub use rng::{NumberSource, RecordingSource, ScriptedSource};
pub use types::*;
