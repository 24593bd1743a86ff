use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use linker_core::{DoorEdge, RoomLookup, load_collection_from_file};
use log::{LevelFilter, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the room collection manifest (JSON)
    #[arg(short, long)]
    collection: PathBuf,
    /// Only list candidates entered through this edge (north, east, west, south)
    #[arg(short, long)]
    edge: Option<DoorEdge>,
    /// Hide candidates whose exit estimate is below this budget
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    min_exits: i32,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let _ = Builder::from_env(Env::default().default_filter_or(level.to_string())).try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let collection = load_collection_from_file(&args.collection).with_context(|| {
        format!("Failed to load room collection: {}", args.collection.display())
    })?;
    let lookup = RoomLookup::new(&collection);

    println!("Collection: {} ({} rooms)", collection.name(), collection.len());
    for room in collection.templates() {
        for door_index in room.invalid_doors() {
            let door = &room.doors()[door_index];
            warn!(
                "room `{}` door {door_index} at ({}, {}) is not on its {:?} edge",
                room.name(),
                door.local_position.x,
                door.local_position.y,
                door.edge
            );
        }
    }

    let edges: Vec<DoorEdge> = match args.edge {
        Some(edge) => vec![edge],
        None => DoorEdge::ALL.to_vec(),
    };
    for edge in edges {
        println!("{edge:?} entrances (min exits {}):", args.min_exits);
        for candidate in lookup.candidates_for_edge(edge, args.min_exits) {
            println!(
                "  {} doors={:?} exits<={}",
                candidate.room().name(),
                candidate.entrance_door_indices(),
                candidate.exit_count_estimate()
            );
        }
    }

    Ok(())
}
