//! Recipe files: the generation inputs and recorded draws of a finished
//! dungeon, enough to rebuild it exactly. No game state is saved.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dungeon_core::DungeonConfig;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub config: DungeonConfig,
    pub player: String,
    pub draws: Vec<usize>,
}

pub fn save(recipe: &Recipe, path: &Path) -> Result<()> {
    let data = serde_json::to_string_pretty(recipe)
        .context("Failed to serialize recipe JSON")?;
    fs::write(path, data)
        .with_context(|| format!("Failed to write recipe file: {}", path.display()))?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Recipe> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipe file: {}", path.display()))?;
    let recipe: Recipe =
        serde_json::from_str(&data).context("Failed to deserialize recipe JSON")?;
    Ok(recipe)
}
