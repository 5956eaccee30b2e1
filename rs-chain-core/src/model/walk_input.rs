use serde::{Deserialize, Serialize};

use super::NodeId;

/// Default bound on the number of states a walk renders.
pub const DEFAULT_MAX_LENGTH: usize = 20;

/// Strategy used to select the node a walk starts from.
///
/// # Variants
/// - `Random`: draw uniformly among the registered nodes until a
///   non-terminal one comes up.
/// - `First`: the first node ever registered.
/// - `Node(NodeId)`: an explicit node.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Start {
	#[default]
	Random,
	First,
	Node(NodeId),
}

/// Parameters for generating a walk.
///
/// # Invariants
/// - A walk never renders more than `max_length` states
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct WalkConfig {
	/// Maximum number of states rendered by one walk.
	pub max_length: usize,

	/// How the start node is chosen.
	pub start: Start,
}

impl Default for WalkConfig {
	fn default() -> Self {
		Self { max_length: DEFAULT_MAX_LENGTH, start: Start::Random }
	}
}

impl WalkConfig {
	/// Config with the given length bound and a random start.
	pub fn with_max_length(max_length: usize) -> Self {
		Self { max_length, ..Self::default() }
	}

	/// Replaces the start strategy.
	pub fn starting_at(mut self, start: Start) -> Self {
		self.start = start;
		self
	}
}
