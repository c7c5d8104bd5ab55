mod recipe;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dungeon_core::{
    Cell, Direction, Dungeon, DungeonConfig, ErrorKind, GameStatus, RecordingSource,
    ScriptedSource, ShotOutcome, Smell, Treasure, Variant,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a fresh dungeon and play it on the console
    New {
        #[arg(long, default_value_t = 5)]
        rows: usize,
        #[arg(long, default_value_t = 6)]
        cols: usize,
        #[arg(long, default_value_t = 2)]
        interconnectivity: usize,
        #[arg(long)]
        wrapping: bool,
        /// Treasure/arrow percentage (0-100)
        #[arg(long, default_value_t = 40)]
        percent: u32,
        /// Monster count (pit/thief count too with --extended)
        #[arg(long, default_value_t = 3)]
        difficulty: u32,
        /// Enable the pits-and-thieves variant
        #[arg(long)]
        extended: bool,
        #[arg(long, default_value = "player")]
        name: String,
        /// Generation seed; defaults to the clock
        #[arg(long)]
        seed: Option<u64>,
        /// Write a recipe file that can rebuild this exact dungeon
        #[arg(long)]
        recipe: Option<PathBuf>,
    },
    /// Rebuild the dungeon from a recipe file and play it again
    Replay {
        /// Path to the recipe JSON file
        #[arg(long)]
        recipe: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::New {
            rows,
            cols,
            interconnectivity,
            wrapping,
            percent,
            difficulty,
            extended,
            name,
            seed,
            recipe,
        } => {
            let config = DungeonConfig {
                rows,
                cols,
                interconnectivity,
                wrapping,
                treasure_arrow_percent: percent,
                difficulty,
                variant: if extended { Variant::PitsAndThieves } else { Variant::Standard },
            };
            let seed = seed.unwrap_or_else(clock_seed);
            let source = Box::new(RecordingSource::new(seed));
            let dungeon = Dungeon::new(config.clone(), name.clone(), source)
                .map_err(|e| anyhow::anyhow!("Generation failed: {e}"))?;
            println!("Generated a {rows}x{cols} dungeon from seed {seed}.");
            println!("Fingerprint: {:016x}", dungeon.map().fingerprint());
            if let Some(path) = recipe {
                let recipe = recipe::Recipe {
                    config,
                    player: name,
                    draws: dungeon.recorded_draws().to_vec(),
                };
                recipe::save(&recipe, &path)?;
                println!("Recipe written to {}.", path.display());
            }
            play(dungeon)
        }
        Command::Replay { recipe } => {
            let recipe = recipe::load(&recipe)?;
            let source = Box::new(ScriptedSource::new(recipe.draws));
            let dungeon = Dungeon::new(recipe.config, recipe.player, source)
                .map_err(|e| anyhow::anyhow!("Replay generation failed: {e}"))?;
            println!("Rebuilt dungeon, fingerprint {:016x}.", dungeon.map().fingerprint());
            play(dungeon)
        }
    }
}

fn clock_seed() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_nanos() as u64,
        Err(_) => 0,
    }
}

/// Console turn driver. All game logic stays in the engine; this loop only
/// parses commands and prints state.
fn play(mut dungeon: Dungeon) -> Result<()> {
    println!("Good luck, {}. Commands: move <dir>, shoot <distance> <dir>,", dungeon.player_name());
    println!("pick <arrow|arrows|treasures|diamond|ruby|sapphire>, look, quit.");
    describe(&dungeon);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read command")? == 0 {
            return Ok(());
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["q"] => return Ok(()),
            // The post-command status block prints the description.
            ["look"] => {}
            ["move", dir] => match parse_direction(dir) {
                Ok(direction) => report(dungeon.move_player(direction).map(|()| String::new())),
                Err(message) => println!("{message}"),
            },
            ["shoot", distance, dir] => match (distance.parse::<usize>(), parse_direction(dir)) {
                (Ok(distance), Ok(direction)) => {
                    report(dungeon.shoot(distance, direction).map(|outcome| {
                        match outcome {
                            ShotOutcome::Dead => "You hear a great howl, then silence.",
                            ShotOutcome::Injured => "You hear a painful roar in the distance.",
                            ShotOutcome::Unaffected => "The arrow flies into darkness.",
                        }
                        .to_owned()
                    }));
                }
                (Err(_), _) => println!("Distance must be a number."),
                (_, Err(message)) => println!("{message}"),
            },
            ["pick", "arrow"] => report(dungeon.pick_arrow().map(|()| String::new())),
            ["pick", "arrows"] => report(dungeon.pick_all_arrows().map(|()| String::new())),
            ["pick", "treasures"] => report(dungeon.pick_all_treasures().map(|()| String::new())),
            ["pick", kind] => match parse_treasure(kind) {
                Ok(kind) => report(dungeon.pick_treasure(kind).map(|()| String::new())),
                Err(message) => println!("{message}"),
            },
            _ => println!("Unrecognized command."),
        }
        match dungeon.status() {
            GameStatus::Active => describe(&dungeon),
            GameStatus::Won => {
                println!("You reached the end alive. You win!");
                return Ok(());
            }
            GameStatus::Lost => {
                match dungeon.death_cause() {
                    Some(dungeon_core::DeathCause::FellIntoPit) => {
                        println!("You fell into a pit. Game over.");
                    }
                    _ => println!("Chomp, chomp, you are eaten by a monster. Game over."),
                }
                return Ok(());
            }
        }
    }
}

fn report(result: Result<String, dungeon_core::GameError>) {
    match result {
        Ok(message) if message.is_empty() => {}
        Ok(message) => println!("{message}"),
        Err(error) => match error.kind() {
            ErrorKind::InvalidArgument => println!("You can't do that: {error}."),
            ErrorKind::InvalidState => println!("Not now: {error}."),
        },
    }
}

fn describe(dungeon: &Dungeon) {
    let cell = dungeon.current_cell();
    let kind = if cell.is_cave() { "cave" } else { "tunnel" };
    println!("You are in a {kind} at {}.", cell.coord());
    let doors: Vec<String> =
        dungeon.doors_here().directions().iter().map(|d| d.to_string()).collect();
    println!("Doors lead {}.", doors.join(", "));
    describe_contents(&cell);
    match dungeon.smell_here() {
        Some(Smell::StrongPungent) => println!("Something smells terribly pungent nearby."),
        Some(Smell::WeakPungent) => println!("You smell something faintly pungent."),
        None => {}
    }
    let pits = dungeon.pits_around(dungeon.player_coord());
    if !pits.is_empty() {
        let dirs: Vec<String> = pits.iter().map(|d| d.to_string()).collect();
        println!("A cold draft rises from the {}.", dirs.join(" and "));
    }
    println!(
        "You carry {} arrows, {} diamonds, {} rubies, {} sapphires.",
        dungeon.player_arrows(),
        dungeon.player_treasure_count(Treasure::Diamond),
        dungeon.player_treasure_count(Treasure::Ruby),
        dungeon.player_treasure_count(Treasure::Sapphire),
    );
}

fn describe_contents(cell: &Cell) {
    if !cell.treasures().is_empty() {
        let names: Vec<String> = cell.treasures().iter().map(|t| t.to_string()).collect();
        println!("Treasure glitters here: {}.", names.join(", "));
    }
    if cell.arrows() > 0 {
        println!("You spot {} arrows on the ground.", cell.arrows());
    }
}

fn parse_direction(word: &str) -> Result<Direction, String> {
    match word {
        "n" | "north" => Ok(Direction::North),
        "s" | "south" => Ok(Direction::South),
        "e" | "east" => Ok(Direction::East),
        "w" | "west" => Ok(Direction::West),
        other => Err(format!("Unknown direction: {other}.")),
    }
}

fn parse_treasure(word: &str) -> Result<Treasure, String> {
    match word {
        "diamond" => Ok(Treasure::Diamond),
        "ruby" => Ok(Treasure::Ruby),
        "sapphire" => Ok(Treasure::Sapphire),
        other => Err(format!("Unknown treasure: {other}.")),
    }
}
