//! Command-line front end for the Schattenlauf combat engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sl",
    about = "Schattenlauf: dice-pool combat matches and batch statistics",
    version,
    propagate_version = true
)]
struct Cli {
    /// Show every dice roll and engine debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample roster file to get started
    Init {
        /// Roster file to create
        file: PathBuf,
    },

    /// Fight a single match and print the blow-by-blow
    Match {
        /// Roster file (characters, factions, modifiers)
        #[arg(short, long)]
        roster: PathBuf,

        /// Map file with cover cells
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// RNG seed for a reproducible match
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Starting distance between factions in metres
        #[arg(short, long, default_value = "10")]
        distance: u32,
    },

    /// Run many matches and tabulate who wins
    Batch {
        /// Roster file (characters, factions, modifiers)
        #[arg(short, long)]
        roster: PathBuf,

        /// Map file with cover cells
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Number of matches
        #[arg(short = 'n', long, default_value = "100")]
        matches: usize,

        /// Base RNG seed; match i uses seed + i
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Starting distance between factions in metres
        #[arg(short, long, default_value = "10")]
        distance: u32,

        /// Run on one thread instead of the rayon pool
        #[arg(long)]
        sequential: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "sl=debug,sl_combat=debug"
    } else {
        "sl=warn,sl_combat=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { file } => commands::init::run(&file),
        Commands::Match {
            roster,
            map,
            seed,
            distance,
        } => commands::fight::run(&roster, map.as_deref(), seed, distance, cli.verbose),
        Commands::Batch {
            roster,
            map,
            matches,
            seed,
            distance,
            sequential,
        } => commands::batch::run(
            &roster,
            map.as_deref(),
            matches,
            seed,
            distance,
            !sequential,
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
