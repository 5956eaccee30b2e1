use std::io::Write;
use std::iter::FusedIterator;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::NodeId;
use super::chain::MarkovChain;
use super::state::ChainState;
use super::walk_input::{Start, WalkConfig};
use crate::error::ChainError;

/// High-level walk generator over one chain.
///
/// # Responsibilities
/// - Own the random source used for start selection and sampling
/// - Pick random start nodes among non-terminal states
/// - Produce walks bounded by a maximum length
///
/// The random source is seeded once by the caller; two generators built
/// with the same seed over the same chain produce the same walks.
#[derive(Debug)]
pub struct Generator<'c, S: ChainState, R = StdRng> {
	chain: &'c MarkovChain<S>,
	rng: R,
}

impl<'c, S: ChainState> Generator<'c, S, StdRng> {
	/// Creates a generator whose random source is seeded with `seed`.
	pub fn seeded(chain: &'c MarkovChain<S>, seed: u64) -> Self {
		Self::with_rng(chain, StdRng::seed_from_u64(seed))
	}
}

impl<'c, S: ChainState, R: Rng> Generator<'c, S, R> {
	/// Creates a generator driven by the given random source.
	pub fn with_rng(chain: &'c MarkovChain<S>, rng: R) -> Self {
		Self { chain, rng }
	}

	/// The chain walks are drawn from.
	pub fn chain(&self) -> &'c MarkovChain<S> {
		self.chain
	}

	/// Picks a random start node.
	///
	/// Draws uniform indices into the registry and rejects terminal states
	/// until a non-terminal one comes up, so every non-terminal node is
	/// equally likely.
	///
	/// # Errors
	/// Returns [`ChainError::NoEligibleStart`] if the chain is empty or every
	/// state is terminal.
	pub fn random_start(&mut self) -> Result<NodeId, ChainError> {
		if !self.chain.iter().any(|(_, node)| !node.state().is_terminal()) {
			return Err(ChainError::NoEligibleStart);
		}

		loop {
			let id = NodeId(self.rng.random_range(0..self.chain.len()));
			if !self.chain.node(id).state().is_terminal() {
				return Ok(id);
			}
		}
	}

	/// Starts a walk.
	///
	/// # Parameters
	/// - `start`: node to start from; `None` picks one with `random_start`.
	/// - `max_length`: maximum number of states the walk yields.
	///
	/// # Behavior
	/// - The start state is always yielded first (if `max_length > 0`),
	///   whether or not it is terminal.
	/// - Each following state is a weighted sample among the successors of
	///   the previous one.
	/// - The walk ends after a terminal state, at a node without successors,
	///   or once `max_length` states were yielded.
	///
	/// # Errors
	/// - [`ChainError::UnknownNode`] if `start` was not issued by the chain.
	/// - [`ChainError::NoEligibleStart`] if a random start is impossible.
	pub fn generate_walk(&mut self, start: Option<NodeId>, max_length: usize) -> Result<Walk<'_, S, R>, ChainError> {
		let start = match start {
			Some(id) => {
				self.chain.get(id).ok_or(ChainError::UnknownNode(id))?;
				id
			}
			None => self.random_start()?,
		};
		debug!("walk from {start}, at most {max_length} states");

		Ok(Walk {
			chain: self.chain,
			rng: &mut self.rng,
			cursor: Cursor::Start(start),
			yielded: 0,
			max_length,
		})
	}

	/// Starts a walk described by `config`.
	///
	/// # Errors
	/// Same as [`generate_walk`](Self::generate_walk); `Start::First` on an
	/// empty chain reports [`ChainError::NoEligibleStart`].
	pub fn walk(&mut self, config: &WalkConfig) -> Result<Walk<'_, S, R>, ChainError> {
		let start = match config.start {
			Start::Random => None,
			Start::First => Some(self.chain.first().ok_or(ChainError::NoEligibleStart)?),
			Start::Node(id) => Some(id),
		};
		self.generate_walk(start, config.max_length)
	}
}

/// Position of a walk between two yielded states.
#[derive(Debug, Copy, Clone)]
enum Cursor {
	/// Nothing yielded yet.
	Start(NodeId),
	/// `NodeId` was the last yielded state.
	After(NodeId),
	Done,
}

/// A lazy walk over a chain.
///
/// Yields references to the states it visits. Each successor is sampled
/// only when requested, so a walk is produced once and cannot be replayed.
#[derive(Debug)]
pub struct Walk<'a, S: ChainState, R> {
	chain: &'a MarkovChain<S>,
	rng: &'a mut R,
	cursor: Cursor,
	yielded: usize,
	max_length: usize,
}

impl<'a, S: ChainState, R: Rng> Walk<'a, S, R> {
	/// Number of states yielded so far.
	pub fn len_so_far(&self) -> usize {
		self.yielded
	}

	/// Renders every remaining state to `out`, followed by a newline.
	///
	/// States are separated by `separator` and rendered as soon as they are
	/// reached. Returns the number of states rendered.
	///
	/// # Errors
	/// Returns [`ChainError::Render`] if writing to `out` fails.
	pub fn render_to<W: Write + ?Sized>(self, out: &mut W, separator: &str) -> Result<usize, ChainError> {
		let mut rendered = 0;
		for state in self {
			if rendered > 0 {
				out.write_all(separator.as_bytes())?;
			}
			state.render(out)?;
			rendered += 1;
		}
		writeln!(out)?;
		Ok(rendered)
	}

	/// Renders every remaining state into its own string.
	///
	/// # Errors
	/// Returns [`ChainError::Render`] if a state fails to render.
	pub fn render_each(self) -> Result<Vec<String>, ChainError> {
		self.map(|state| state.rendered().map_err(ChainError::from)).collect()
	}
}

impl<'a, S: ChainState, R: Rng> Iterator for Walk<'a, S, R> {
	type Item = &'a S;

	fn next(&mut self) -> Option<Self::Item> {
		if self.yielded >= self.max_length {
			self.cursor = Cursor::Done;
			return None;
		}

		let chain = self.chain;
		let id = match std::mem::replace(&mut self.cursor, Cursor::Done) {
			Cursor::Start(id) => id,
			Cursor::After(previous) => {
				let next = chain.node(previous).sample(&mut *self.rng)?;
				let state = chain.node(next).state();
				if state.is_terminal() {
					self.yielded += 1;
					return Some(state);
				}
				next
			}
			Cursor::Done => return None,
		};

		self.yielded += 1;
		self.cursor = Cursor::After(id);
		Some(chain.node(id).state())
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.max_length.saturating_sub(self.yielded);
		match self.cursor {
			Cursor::Done => (0, Some(0)),
			Cursor::Start(_) => (remaining.min(1), Some(remaining)),
			Cursor::After(_) => (0, Some(remaining)),
		}
	}
}

impl<S: ChainState, R: Rng> FusedIterator for Walk<'_, S, R> {}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io;

	#[derive(PartialEq, Debug)]
	struct Word(&'static str);

	impl ChainState for Word {
		fn try_copy(&self) -> Result<Self, ChainError> {
			Ok(Word(self.0))
		}

		fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
			out.write_all(self.0.as_bytes())
		}

		fn is_terminal(&self) -> bool {
			self.0.ends_with('.')
		}
	}

	fn chain_of(words: &[&'static str]) -> MarkovChain<Word> {
		let states: Vec<Word> = words.iter().map(|w| Word(*w)).collect();
		let mut chain = MarkovChain::new();
		chain.observe_sequence(&states).unwrap();
		chain
	}

	fn collect(walk: Walk<'_, Word, StdRng>) -> Vec<&'static str> {
		walk.map(|word| word.0).collect()
	}

	#[test]
	fn walk_stops_after_terminal() {
		let chain = chain_of(&["the", "cat", "sat."]);
		let mut generator = Generator::seeded(&chain, 3);
		let walk = generator.generate_walk(chain.first(), 100).unwrap();
		assert_eq!(collect(walk), vec!["the", "cat", "sat."]);
	}

	#[test]
	fn walk_respects_max_length() {
		// "a" -> "a" forever
		let chain = chain_of(&["a", "a"]);
		let mut generator = Generator::seeded(&chain, 3);
		for max_length in 0..6 {
			let walk = generator.generate_walk(chain.first(), max_length).unwrap();
			assert_eq!(collect(walk).len(), max_length);
		}
	}

	#[test]
	fn node_without_successors_yields_itself() {
		let chain = chain_of(&["a", "b"]);
		let b = chain.lookup(&Word("b")).unwrap();
		let mut generator = Generator::seeded(&chain, 3);
		for max_length in [1, 2, 50] {
			let walk = generator.generate_walk(Some(b), max_length).unwrap();
			assert_eq!(collect(walk), vec!["b"]);
		}
	}

	#[test]
	fn terminal_start_is_not_a_stop() {
		let chain = chain_of(&["end.", "more", "end."]);
		let mut generator = Generator::seeded(&chain, 3);
		let walk = generator.generate_walk(chain.first(), 10).unwrap();
		assert_eq!(collect(walk), vec!["end.", "more", "end."]);
	}

	#[test]
	fn random_start_skips_terminal_states() {
		let chain = chain_of(&["one.", "two", "three."]);
		let two = chain.lookup(&Word("two")).unwrap();
		let mut generator = Generator::seeded(&chain, 11);
		for _ in 0..100 {
			assert_eq!(generator.random_start().unwrap(), two);
		}
	}

	#[test]
	fn random_start_without_candidates() {
		let chain = chain_of(&["one.", "two."]);
		let mut generator = Generator::seeded(&chain, 11);
		assert!(matches!(generator.random_start(), Err(ChainError::NoEligibleStart)));

		let empty: MarkovChain<Word> = MarkovChain::new();
		let mut generator = Generator::seeded(&empty, 11);
		assert!(matches!(generator.generate_walk(None, 5), Err(ChainError::NoEligibleStart)));
	}

	#[test]
	fn unknown_start_is_rejected() {
		let chain = chain_of(&["a"]);
		let mut generator = Generator::seeded(&chain, 1);
		assert!(matches!(generator.generate_walk(Some(NodeId(5)), 5), Err(ChainError::UnknownNode(NodeId(5)))));
	}

	#[test]
	fn render_to_joins_states() {
		let chain = chain_of(&["hello", "world."]);
		let mut generator = Generator::seeded(&chain, 1);
		let mut out = Vec::new();
		let rendered = generator.generate_walk(chain.first(), 10).unwrap().render_to(&mut out, " ").unwrap();
		assert_eq!(rendered, 2);
		assert_eq!(String::from_utf8(out).unwrap(), "hello world.\n");
	}

	#[test]
	fn len_so_far_counts_yielded_states() {
		let chain = chain_of(&["the", "cat", "sat."]);
		let mut generator = Generator::seeded(&chain, 5);
		let mut walk = generator.generate_walk(chain.first(), 10).unwrap();
		assert_eq!(walk.len_so_far(), 0);
		walk.next();
		assert_eq!(walk.len_so_far(), 1);
		walk.by_ref().for_each(drop);
		assert_eq!(walk.len_so_far(), 3);
		assert_eq!(walk.next(), None);
		assert_eq!(walk.len_so_far(), 3);
	}

	#[test]
	fn generator_exposes_its_chain() {
		let chain = chain_of(&["a", "b."]);
		let generator = Generator::seeded(&chain, 5);
		assert!(std::ptr::eq(generator.chain(), &chain));
		assert_eq!(generator.chain().len(), 2);
	}

	#[test]
	fn config_first_start() {
		let chain = chain_of(&["x", "y."]);
		let mut generator = Generator::seeded(&chain, 1);
		let config = WalkConfig::with_max_length(1).starting_at(Start::First);
		let states = generator.walk(&config).unwrap().render_each().unwrap();
		assert_eq!(states, vec!["x".to_owned()]);
	}

	#[test]
	fn same_seed_same_walks() {
		let chain = chain_of(&["a", "b", "a", "c", "a", "b", "b", "c", "a"]);
		let run = |seed| {
			let mut generator = Generator::seeded(&chain, seed);
			(0..5)
				.map(|_| collect(generator.generate_walk(None, 12).unwrap()))
				.collect::<Vec<_>>()
		};
		assert_eq!(run(99), run(99));
	}
}
