//! Dungeon Hunt
//!
//! Headless runner: generates a world, replays scripted player moves while
//! the hunter gives chase, and prints the map and event log.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dh_core::dungeon::Direction;
use dh_core::{Difficulty, GameEvent, World, WorldConfig, WorldSnapshot};

/// Generate a dungeon and watch the hunter
#[derive(Parser, Debug)]
#[command(name = "dungeon-hunt")]
#[command(author, version, about = "Dungeon Hunt - escape before the hunter finds you", long_about = None)]
struct Args {
    /// JSON world config; flags below override its fields
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// World seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Difficulty level (1 and up)
    #[arg(short = 'd', long = "difficulty")]
    difficulty: Option<u32>,

    /// Grid width
    #[arg(long = "width")]
    width: Option<usize>,

    /// Grid height
    #[arg(long = "height")]
    height: Option<usize>,

    /// Number of consumables
    #[arg(long = "consumables")]
    consumables: Option<usize>,

    /// Number of obstacles
    #[arg(long = "obstacles")]
    obstacles: Option<usize>,

    /// Exact room count
    #[arg(long = "rooms")]
    rooms: Option<usize>,

    /// Seed for the hunter's search walk
    #[arg(long = "search-seed")]
    search_seed: Option<u64>,

    /// Player moves as WASD keys, one per tick
    #[arg(short = 'm', long = "moves", default_value = "")]
    moves: String,

    /// Number of ticks to simulate
    #[arg(short = 't', long = "ticks", default_value_t = 0)]
    ticks: usize,

    /// Start concealed
    #[arg(long = "concealed")]
    concealed: bool,

    /// Draw the hunter's path on the map
    #[arg(long = "show-path")]
    show_path: bool,

    /// Ignore vision limits when printing the map
    #[arg(long = "reveal")]
    reveal: bool,

    /// Print a JSON report instead of the map
    #[arg(long = "json")]
    json: bool,
}

#[derive(Serialize)]
struct TickEvent {
    tick: usize,
    event: GameEvent,
}

#[derive(Serialize)]
struct Report {
    ticks: usize,
    caught: bool,
    level_complete: bool,
    events: Vec<TickEvent>,
    state: WorldSnapshot,
}

fn load_config(args: &Args) -> Result<WorldConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => WorldConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(d) = args.difficulty {
        config.difficulty = Difficulty(d);
    }
    if let Some(w) = args.width {
        config.width = w;
    }
    if let Some(h) = args.height {
        config.height = h;
    }
    if let Some(n) = args.consumables {
        config.consumables = n;
    }
    if let Some(n) = args.obstacles {
        config.obstacles = n;
    }
    if args.rooms.is_some() {
        config.rooms = args.rooms;
    }
    if args.search_seed.is_some() {
        config.search_seed = args.search_seed;
    }
    Ok(config)
}

/// Run the scripted ticks; returns the events with the tick they happened on
fn simulate(world: &mut World, moves: &[Direction], ticks: usize) -> (usize, Vec<TickEvent>) {
    let mut log = Vec::new();
    let mut ran = 0;

    for tick in 0..ticks {
        if world.is_over() {
            break;
        }
        if world.is_sliding() {
            world.advance_slide();
        } else if let Some(&dir) = moves.get(tick)
            && !world.move_player(dir)
        {
            debug!(tick, ?dir, "move blocked");
        }
        world.tick_hunter();
        log.extend(
            world
                .drain_events()
                .into_iter()
                .map(|event| TickEvent { tick, event }),
        );
        ran = tick + 1;
    }
    (ran, log)
}

/// `RUST_LOG` directives when set and valid, `info` otherwise
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut world = World::create(config).context("creating world")?;
    world.set_concealed(args.concealed);
    if args.show_path {
        world.toggle_path_display();
    }

    let moves: Vec<Direction> = args.moves.chars().filter_map(Direction::from_key).collect();
    let (ran, events) = simulate(&mut world, &moves, args.ticks);
    info!(ticks = ran, events = events.len(), "simulation finished");

    if args.json {
        let report = Report {
            ticks: ran,
            caught: world.is_caught(),
            level_complete: world.is_level_complete(),
            events,
            state: world.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let view = if args.reveal {
        world.full_view()
    } else {
        world.visible_grid()
    };
    print!("{view}");
    println!();
    println!(
        "seed {}  score {}  player {}  hunter {}  door {}",
        world.config().seed,
        world.score(),
        world.player_position(),
        world.hunter_position(),
        world
            .door_position()
            .map_or_else(|| "none".to_string(), |p| p.to_string()),
    );
    for TickEvent { tick, event } in &events {
        println!("[{tick:>4}] {event}");
    }
    if world.is_caught() {
        println!("The hunter caught you.");
    } else if world.is_level_complete() {
        println!("You escaped through the door.");
    }
    Ok(())
}
