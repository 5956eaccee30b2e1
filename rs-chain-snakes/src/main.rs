use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rs_chain_core::{Generator, MarkovChain, Start, WalkConfig};

mod board;

/// Default bound on the number of cells in one walk.
const MAX_GENERATION_LENGTH: usize = 60;

/// Generates random snakes-and-ladders games, each starting at cell 1.
#[derive(Parser, Debug)]
#[command(name = "rs-chain-snakes", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
	/// Seed of the random source
	seed: u64,

	/// Number of walks to generate
	paths: usize,

	/// Maximum number of cells per walk
	#[arg(long, default_value_t = MAX_GENERATION_LENGTH)]
	max_length: usize,

	/// Print each walk as a JSON array of cells
	#[arg(long)]
	json: bool,
}

fn main() -> Result<()> {
	env_logger::init();
	let cli = Cli::parse();

	let mut chain = MarkovChain::new();
	board::fill_chain(&mut chain).context("building the board")?;
	info!("board ready: {:?}", chain.stats());

	let mut generator = Generator::seeded(&chain, cli.seed);
	let config = WalkConfig::with_max_length(cli.max_length).starting_at(Start::First);

	let stdout = io::stdout();
	let mut out = stdout.lock();
	for index in 1..=cli.paths {
		let walk = generator.walk(&config)?;
		if cli.json {
			let cells: Vec<&board::Cell> = walk.collect();
			serde_json::to_writer(&mut out, &cells)?;
			writeln!(out)?;
		} else {
			write!(out, "Random Walk {index}: ")?;
			walk.render_to(&mut out, " ")?;
		}
	}

	Ok(())
}
