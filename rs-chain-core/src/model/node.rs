use rand::Rng;

use super::NodeId;
use crate::error::ChainError;

/// Weighted edge toward another node of the same chain.
///
/// The target is a handle, not an owner: the node itself belongs to the
/// registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	/// Node that followed the source node.
	pub target: NodeId,
	/// How many times this transition was observed (always >= 1).
	pub count: usize,
}

/// Represents a node in a chain.
///
/// A `Node` owns a private copy of one distinct state and stores all
/// observed transitions from this state to its successors.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during ingestion
/// - Pick a successor using weighted random sampling
///
/// ## Invariants
/// - No two edges reference the same target
/// - Each edge count is strictly positive
/// - Edges are kept in first-occurrence order
#[derive(Debug)]
pub struct Node<S> {
	/// Owned copy of the state.
	pub(crate) state: S,
	/// Outgoing transitions in first-occurrence order.
	/// Example: [(#3, 42), (#0, 3)]
	pub(crate) edges: Vec<Edge>,
}

impl<S> Node<S> {
	/// Creates a node with an empty edge table.
	pub(crate) fn new(state: S) -> Self {
		Self { state, edges: Vec::new() }
	}

	/// The state owned by this node.
	pub fn state(&self) -> &S {
		&self.state
	}

	/// Outgoing edges in first-occurrence order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Sum of all edge counts.
	pub fn total_weight(&self) -> usize {
		self.edges.iter().map(|edge| edge.count).sum()
	}

	/// Records `by` occurrences of a transition toward `target`.
	///
	/// - If the edge already exists, its count is increased.
	/// - Otherwise the table grows by one slot and a new edge is appended.
	///
	/// Returns the updated count.
	///
	/// # Errors
	/// Returns [`ChainError::Allocation`] if the table could not grow. The
	/// table is left untouched in that case.
	pub(crate) fn add_transition(&mut self, target: NodeId, by: usize) -> Result<usize, ChainError> {
		if let Some(edge) = self.edges.iter_mut().find(|edge| edge.target == target) {
			edge.count += by;
			return Ok(edge.count);
		}

		self.edges.try_reserve(1)?;
		self.edges.push(Edge { target, count: by });
		Ok(by)
	}

	/// Picks a successor using weighted random sampling.
	///
	/// The probability of selecting a target is `count / total`. Targets are
	/// laid out in table order, each occupying `count` consecutive ranks, and
	/// a uniform rank in `[0, total)` selects one of them.
	///
	/// Returns `None` if the node has no outgoing edges.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<NodeId> {
		let total = self.total_weight();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for edge in &self.edges {
			if r < edge.count {
				return Some(edge.target);
			}
			r -= edge.count;
		}

		// Unreachable while counts sum to `total`.
		self.edges.last().map(|edge| edge.target)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn bump_existing_edge() {
		let mut node = Node::new("a");
		assert_eq!(node.add_transition(NodeId(1), 1).unwrap(), 1);
		assert_eq!(node.add_transition(NodeId(2), 1).unwrap(), 1);
		assert_eq!(node.add_transition(NodeId(1), 1).unwrap(), 2);

		assert_eq!(node.edges(), &[
			Edge { target: NodeId(1), count: 2 },
			Edge { target: NodeId(2), count: 1 },
		]);
		assert_eq!(node.total_weight(), 3);
	}

	#[test]
	fn sample_without_edges() {
		let node = Node::new("alone");
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(node.sample(&mut rng), None);
	}

	#[test]
	fn sample_single_edge_is_deterministic() {
		let mut node = Node::new("a");
		node.add_transition(NodeId(4), 5).unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		for _ in 0..50 {
			assert_eq!(node.sample(&mut rng), Some(NodeId(4)));
		}
	}

	#[test]
	fn sample_follows_counts() {
		let mut node = Node::new("a");
		node.add_transition(NodeId(1), 1).unwrap();
		node.add_transition(NodeId(2), 3).unwrap();

		let mut rng = StdRng::seed_from_u64(42);
		let draws = 8000;
		let hits = (0..draws).filter(|_| node.sample(&mut rng) == Some(NodeId(2))).count();
		let ratio = hits as f64 / draws as f64;
		assert!((ratio - 0.75).abs() < 0.03, "ratio was {ratio}");
	}
}
