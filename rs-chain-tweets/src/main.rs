use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rs_chain_core::{DEFAULT_MAX_LENGTH, Generator, MarkovChain, WalkConfig};

mod corpus;
mod word;

/// Generates tweets from the word transitions of a text corpus.
#[derive(Parser, Debug)]
#[command(name = "rs-chain-tweets", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
	/// Seed of the random source
	seed: u64,

	/// Number of tweets to generate
	tweets: usize,

	/// Path to the text corpus
	corpus: PathBuf,

	/// Maximum number of words to read from the corpus (everything if omitted)
	words_to_read: Option<usize>,

	/// Maximum number of words per tweet
	#[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
	max_length: usize,

	/// Print each tweet as a JSON array of words
	#[arg(long)]
	json: bool,
}

fn main() -> Result<()> {
	env_logger::init();
	let cli = Cli::parse();

	let file = File::open(&cli.corpus).with_context(|| format!("invalid corpus path {}", cli.corpus.display()))?;

	let mut chain = MarkovChain::new();
	let consumed = corpus::fill_chain(BufReader::new(file), cli.words_to_read, &mut chain)?;
	let stats = chain.stats();
	info!("read {consumed} words: {} distinct, {} edges", stats.nodes, stats.edges);

	let mut generator = Generator::seeded(&chain, cli.seed);
	let config = WalkConfig::with_max_length(cli.max_length);

	let stdout = io::stdout();
	let mut out = stdout.lock();
	for index in 1..=cli.tweets {
		let walk = generator.walk(&config).context("generating a tweet")?;
		if cli.json {
			let words = walk.render_each()?;
			serde_json::to_writer(&mut out, &words)?;
			writeln!(out)?;
		} else {
			write!(out, "Tweet {index}: ")?;
			walk.render_to(&mut out, " ")?;
		}
	}

	Ok(())
}
