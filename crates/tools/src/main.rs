use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cellmerge_core::{
    GameConfig, GameSession, LoadOutcome, MemoryStorage, SavedGame, format_snapshot_hash,
};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Summarise a saved game", long_about = None)]
struct Args {
    /// Path to the saved-game JSON file
    #[arg(short, long)]
    save: PathBuf,
    /// Optional TOML game config; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SaveSummary {
    player_cell: String,
    position: [f64; 2],
    held_token: Option<u64>,
    movement_mode: String,
    overlay_cells: usize,
    emptied_cells: usize,
    max_token: Option<u64>,
    target_value: u64,
    won: Option<u64>,
    snapshot_hash: String,
}

fn summarise(config: GameConfig, raw: &str) -> Result<SaveSummary> {
    // Decode up front so a broken file reports why instead of starting fresh.
    let saved = SavedGame::from_json(raw).context("Save file is not a valid saved game")?;

    let storage = MemoryStorage::with_slot(&config.save_key, raw);
    let mut session = GameSession::new(config, Box::new(storage));
    if let LoadOutcome::Fresh(reason) = session.load(None) {
        bail!("Save could not be restored: {reason:?}");
    }

    let store = session.store();
    let emptied_cells = store.entries().filter(|(_, value)| value.is_none()).count();
    let max_token = store
        .entries()
        .filter_map(|(_, value)| value)
        .chain(saved.held_token)
        .max();

    Ok(SaveSummary {
        player_cell: session.player_cell().to_string(),
        position: [saved.player_lat, saved.player_lng],
        held_token: saved.held_token,
        movement_mode: session.movement_mode().to_string(),
        overlay_cells: store.len(),
        emptied_cells,
        max_token,
        target_value: session.config().target_value,
        won: session.check_win(),
        snapshot_hash: format_snapshot_hash(session.snapshot_hash()),
    })
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };
    let raw = fs::read_to_string(&args.save)
        .with_context(|| format!("Failed to read save file: {}", args.save.display()))?;

    let summary = summarise(config, &raw)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Player cell: {}", summary.player_cell);
    println!("Position: {:.6}, {:.6}", summary.position[0], summary.position[1]);
    match summary.held_token {
        Some(value) => println!("Holding: [{value}]"),
        None => println!("Holding: nothing"),
    }
    println!("Movement: {}", summary.movement_mode);
    println!("Changed cells: {} ({} emptied)", summary.overlay_cells, summary.emptied_cells);
    match summary.max_token {
        Some(value) => println!("Largest token: [{value}] of {}", summary.target_value),
        None => println!("Largest token: none"),
    }
    match summary.won {
        Some(value) => println!("Won: yes, with [{value}]"),
        None => println!("Won: not yet"),
    }
    println!("Snapshot Hash: {}", summary.snapshot_hash);

    Ok(())
}
