use anyhow::{Result, bail};
use clap::Parser;
use env_logger::{Builder, Env};
use linker_core::{
    BuilderError, CollectionRef, LevelGraph, LevelGraphBuilder, NodeId, RoomTemplateCollection,
};
use log::{LevelFilter, debug, info};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of independent builder scripts to run
    #[arg(long, default_value_t = 100)]
    scripts: u32,
    /// Builder operations per script
    #[arg(long, default_value_t = 200)]
    ops: u32,
    #[arg(short, long)]
    verbose: bool,
}

const LABELS: [&str; 4] = ["entry", "hub", "boss", "secret"];

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn run_script(rng: &mut ChaCha8Rng, collections: &[CollectionRef], ops: u32) -> Result<LevelGraph> {
    let mut builders = vec![LevelGraphBuilder::new()];
    builders[0].add(&collections[0])?;
    let mut current = 0;
    let mut adds = 1_usize;

    for _ in 0..ops {
        let roll = rng.next_u64() % 10;
        if roll == 9 {
            current = rng.next_u64() as usize % builders.len();
            continue;
        }
        let builder = &mut builders[current];
        let outcome = match roll {
            0..=3 => {
                adds += 1;
                builder.add(&choose(rng, collections)).map(|_| None)
            }
            4 => builder.label(choose(rng, &LABELS)).map(|_| None),
            5 => builder.jump_to(choose(rng, &LABELS)).map(|_| None),
            6 => builder.enter_scope().map(|_| None),
            7 => builder.exit_scope().map(|_| None),
            _ => {
                // Bias towards forking at the cursor
                if rng.next_u64() % 3 == 0 {
                    builder.fork_at(choose(rng, &LABELS)).map(Some)
                } else {
                    builder.fork().map(Some)
                }
            }
        };
        match outcome {
            Ok(Some(fork)) => builders.push(fork),
            Ok(None) | Err(BuilderError::UnknownLabel(_)) | Err(BuilderError::EmptyScopeStack) => {}
            Err(other) => bail!("builder rejected a valid operation: {other}"),
        }
    }

    debug!("script used {} builders and {adds} adds", builders.len());
    let root_builder = builders.swap_remove(0);
    drop(builders);
    let graph = root_builder.into_graph()?;
    if graph.len() != adds {
        bail!("Invariant failed: {} nodes for {adds} adds", graph.len());
    }
    Ok(graph)
}

fn check_tree(graph: &LevelGraph) -> Result<()> {
    for (index, node) in graph.iter().enumerate() {
        if node.id() != NodeId(index as u32) {
            bail!("Invariant failed: node at {index} has id {}", node.id());
        }
        if let Some(parent) = node.parent() {
            let Some(parent_node) = graph.node(parent) else {
                bail!("Invariant failed: {node} points at missing parent {parent}");
            };
            if parent >= node.id() || !parent_node.children().contains(&node.id()) {
                bail!("Invariant failed: {node} is not registered under {parent_node}");
            }
        } else if index != 0 {
            bail!("Invariant failed: {node} has no parent but is not the root");
        }
        for &child in node.children() {
            if graph.node(child).and_then(|child| child.parent()) != Some(node.id()) {
                bail!("Invariant failed: child {child} of {node} disagrees about its parent");
            }
        }
    }
    if graph.depth_first().count() != graph.len() {
        bail!("Invariant failed: depth-first walk does not reach every node");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let _ = Builder::from_env(Env::default().default_filter_or(level.to_string())).try_init();

    info!("Fuzzing {} builder scripts of {} ops from seed {}", args.scripts, args.ops, args.seed);
    let collections: Vec<CollectionRef> = ["start", "corridor", "hub", "vault"]
        .into_iter()
        .map(|name| RoomTemplateCollection::new(name, Vec::new()).into_shared())
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut total_nodes = 0;
    for script in 0..args.scripts {
        let graph = run_script(&mut rng, &collections, args.ops)?;
        check_tree(&graph)?;
        debug!("script {script}: {} nodes, fingerprint {:016x}", graph.len(), graph.fingerprint());
        total_nodes += graph.len();
    }

    println!(
        "Fuzzing completed successfully: {total_nodes} nodes across {} scripts.",
        args.scripts
    );
    Ok(())
}
