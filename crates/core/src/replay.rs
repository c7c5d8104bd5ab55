//! Rebuilding a dungeon from a recorded draw sequence. Replay re-runs
//! generation through a scripted source; it never shares state with the
//! original game.

use crate::error::GameError;
use crate::game::Dungeon;
use crate::mapgen::DungeonConfig;
use crate::rng::ScriptedSource;

/// Builds a fresh game from the config and draw log of a previous run. The
/// scripted source replays generation exactly; once gameplay outruns the
/// log, it falls back to coin flips.
pub fn reconstruct(
    config: DungeonConfig,
    player_name: impl Into<String>,
    draws: &[usize],
) -> Result<Dungeon, GameError> {
    Dungeon::new(config, player_name, Box::new(ScriptedSource::new(draws.to_vec())))
}
