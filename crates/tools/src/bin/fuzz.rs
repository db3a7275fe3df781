use anyhow::{Result, bail, ensure};
use cellmerge_core::{
    ClickOutcome, Direction, GameConfig, GameSession, Inventory, MemoryStorage, ViewportBounds,
    format_snapshot_hash,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    actions: u32,
    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct FuzzReport {
    seed: u64,
    actions: u32,
    steps: u32,
    pickups: u32,
    merges: u32,
    rejected_clicks: u32,
    mode_switches: u32,
    resets: u32,
    overlay_cells: usize,
    best_token: u64,
    won: Option<u64>,
    snapshot_hash: String,
}

const DIRECTIONS: [Direction; 4] =
    [Direction::North, Direction::South, Direction::East, Direction::West];

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn viewport_around(session: &GameSession) -> ViewportBounds {
    let half = session.config().tile_degrees * 8.0;
    ViewportBounds::around(session.player().position, half, half)
}

fn run(seed: u64, actions: u32) -> Result<FuzzReport> {
    let config = GameConfig { target_value: 64, ..GameConfig::default() };
    let mut session = GameSession::new(config, Box::new(MemoryStorage::new()));
    session.load(None);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut report = FuzzReport { seed, actions, ..FuzzReport::default() };

    for _ in 0..actions {
        session.recompute_grid(viewport_around(&session));

        match rng.next_u64() % 100 {
            0..=44 => {
                session.step(choose(&mut rng, &DIRECTIONS));
                report.steps += 1;
            }
            45..=96 => {
                let radius = session.config().interact_radius as i32 + 1;
                let span = (2 * radius + 1) as u64;
                let di = (rng.next_u64() % span) as i32 - radius;
                let dj = (rng.next_u64() % span) as i32 - radius;
                let coord = session.player_cell().offset(di, dj);

                let held_before = session.inventory();
                let cell_before = session.store().get(coord);
                let hash_before = session.snapshot_hash();

                match session.click(coord) {
                    ClickOutcome::PickedUp(value) => {
                        ensure!(held_before == Inventory::Empty, "picked up while holding");
                        ensure!(cell_before == Some(value), "picked up a value the cell lacked");
                        ensure!(session.store().get(coord).is_none(), "cell kept its token");
                        report.pickups += 1;
                    }
                    ClickOutcome::Merged(value) => {
                        let Inventory::Holding(held) = held_before else {
                            bail!("merged with empty hands");
                        };
                        ensure!(cell_before == Some(held), "merged unequal tokens");
                        ensure!(value == held * 2, "merge did not double");
                        ensure!(session.inventory() == Inventory::Empty, "hands not emptied");
                        report.merges += 1;
                    }
                    _ => {
                        ensure!(session.snapshot_hash() == hash_before, "rejected click mutated");
                        report.rejected_clicks += 1;
                    }
                }
            }
            97..=98 => {
                session.toggle_movement_mode();
                report.mode_switches += 1;
            }
            _ => {
                session.new_game();
                ensure!(session.store().is_empty(), "new game kept overlay entries");
                report.resets += 1;
            }
        }

        if let Inventory::Holding(value) = session.inventory() {
            report.best_token = report.best_token.max(value);
        }
        for (_, value) in session.store().entries() {
            report.best_token = report.best_token.max(value.unwrap_or(0));
        }
    }

    report.overlay_cells = session.store().len();
    report.won = session.check_win();
    report.snapshot_hash = format_snapshot_hash(session.snapshot_hash());
    Ok(report)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();

    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} actions...", args.seed, args.actions);
    let report = run(args.seed, args.actions)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "steps={} pickups={} merges={} rejected={} switches={} resets={}",
            report.steps,
            report.pickups,
            report.merges,
            report.rejected_clicks,
            report.mode_switches,
            report.resets
        );
        println!("Best token: [{}], won: {:?}", report.best_token, report.won);
        println!("Snapshot Hash: {}", report.snapshot_hash);
    }
    println!("Fuzzing completed successfully.");
    Ok(())
}
