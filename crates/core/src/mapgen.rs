//! Dungeon generation pipeline. Passes run in a fixed order over the shared
//! number source: spanning tree, interconnectivity, treasure, start/end,
//! monsters, arrows, then pits and thieves for the extended variant. The
//! order is part of the replay contract.

pub mod model;

mod graph;
mod hazards;
mod placement;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::rng::NumberSource;
use crate::types::Variant;

pub use model::{Cell, Doors, DungeonMap, GeneratedDungeon, Health, Monster};

/// Generation inputs, validated eagerly before any draw happens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonConfig {
    pub rows: usize,
    pub cols: usize,
    pub interconnectivity: usize,
    pub wrapping: bool,
    /// Percentage of caves to treasure; also the percentage of all cells to
    /// stock with arrows.
    pub treasure_arrow_percent: u32,
    /// Monster count; the extended variant reuses it as the pit and thief
    /// count.
    pub difficulty: u32,
    pub variant: Variant,
}

impl DungeonConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::EmptyGrid);
        }
        if self.treasure_arrow_percent > 100 {
            return Err(GameError::PercentOutOfRange(self.treasure_arrow_percent));
        }
        if self.difficulty == 0 {
            return Err(GameError::ZeroDifficulty);
        }
        Ok(())
    }
}

pub fn generate(
    config: &DungeonConfig,
    source: &mut dyn NumberSource,
) -> Result<GeneratedDungeon, GameError> {
    config.validate()?;
    let mut map = DungeonMap::new(config.rows, config.cols, config.wrapping);
    let candidates = graph::candidate_edges(config.rows, config.cols, config.wrapping);
    let used = graph::link_spanning_tree(&mut map, &candidates, source);
    graph::link_extra_edges(&mut map, &candidates, &used, config.interconnectivity, source)?;
    placement::place_treasure(&mut map, config.treasure_arrow_percent, source);
    let (start, end) = placement::choose_start_end(&map, source)?;
    placement::place_monsters(&mut map, start, end, config.difficulty, source);
    placement::place_arrows(&mut map, config.treasure_arrow_percent, source);
    if config.variant == Variant::PitsAndThieves {
        hazards::place_pits(&mut map, start, end, config.difficulty, source);
        hazards::place_thieves(&mut map, start, end, config.difficulty, source);
    }
    Ok(GeneratedDungeon { map, start, end })
}
