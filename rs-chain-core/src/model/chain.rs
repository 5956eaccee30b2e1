use log::{debug, info, trace};

use super::NodeId;
use super::node::{Edge, Node};
use super::state::ChainState;
use crate::error::ChainError;

/// Size summary of a chain.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainStats {
	/// Number of distinct states.
	pub nodes: usize,
	/// Number of distinct (source, target) pairs.
	pub edges: usize,
	/// Sum of all edge counts.
	pub transitions: usize,
}

/// Represents a Markov chain over caller-defined states.
///
/// The `MarkovChain` is the registry of every distinct state seen so far,
/// each wrapped in a `Node` that also owns its outgoing edges.
///
/// # Responsibilities
/// - Store exactly one node per distinct state, in discovery order
/// - Accumulate transition counts between nodes
/// - Release every state copy once when torn down
/// - Merge with another chain of the same state type
///
/// # Invariants
/// - No two nodes hold states that compare equal
/// - `len()` equals the number of distinct states inserted
/// - Every `NodeId` stored in an edge is a valid index into `nodes`
///
/// Lookups scan the registry linearly; no ordering among states is assumed.
#[derive(Debug)]
pub struct MarkovChain<S: ChainState> {
	/// Nodes in registration order.
	nodes: Vec<Node<S>>,
}

impl<S: ChainState> Default for MarkovChain<S> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: ChainState> MarkovChain<S> {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self { nodes: Vec::new() }
	}

	/// Number of distinct states.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Returns the node behind `id`, if this chain issued it.
	pub fn get(&self, id: NodeId) -> Option<&Node<S>> {
		self.nodes.get(id.0)
	}

	/// Returns the state behind `id`, if this chain issued it.
	pub fn state(&self, id: NodeId) -> Option<&S> {
		self.get(id).map(Node::state)
	}

	/// Outgoing edges of `id` in first-occurrence order.
	///
	/// Empty for an unknown handle.
	pub fn successors(&self, id: NodeId) -> &[Edge] {
		self.get(id).map(Node::edges).unwrap_or(&[])
	}

	/// Handle of the first registered node.
	pub fn first(&self) -> Option<NodeId> {
		if self.nodes.is_empty() { None } else { Some(NodeId(0)) }
	}

	/// Iterates over all nodes in registration order.
	pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S>)> {
		self.nodes.iter().enumerate().map(|(index, node)| (NodeId(index), node))
	}

	/// Indexes a node by a handle known to be valid.
	///
	/// # Panics
	/// Panics if `id` was not issued by this chain. Callers only pass handles
	/// read from the registry itself or already checked with `get`.
	pub(crate) fn node(&self, id: NodeId) -> &Node<S> {
		&self.nodes[id.0]
	}

	/// Finds the node holding a state equal to `state`.
	///
	/// Returns the first match in registration order, or `None`.
	pub fn lookup(&self, state: &S) -> Option<NodeId> {
		self.nodes
			.iter()
			.position(|node| node.state == *state)
			.map(NodeId)
	}

	/// Returns the node for `state`, registering it if it is new.
	///
	/// A new node gets a private copy of `state` (via `ChainState::try_copy`)
	/// and an empty edge table, and is appended at the end of the registry.
	///
	/// # Errors
	/// Returns [`ChainError::Allocation`] if the registry could not grow or
	/// the copy failed. No node is registered in that case.
	pub fn lookup_or_insert(&mut self, state: &S) -> Result<NodeId, ChainError> {
		if let Some(id) = self.lookup(state) {
			return Ok(id);
		}

		// Reserve first so a failed growth never strands a copy.
		self.nodes.try_reserve(1)?;
		let copy = state.try_copy()?;

		let id = NodeId(self.nodes.len());
		self.nodes.push(Node::new(copy));
		debug!("registered node {id}");
		Ok(id)
	}

	/// Records one observed transition `from -> to`.
	///
	/// Returns the updated count of the edge.
	///
	/// # Errors
	/// - [`ChainError::UnknownNode`] if either handle was not issued by this chain.
	/// - [`ChainError::Allocation`] if the edge table could not grow.
	pub fn add_transition(&mut self, from: NodeId, to: NodeId) -> Result<usize, ChainError> {
		self.add_transitions(from, to, 1)
	}

	/// Records `count` observations of `from -> to` at once.
	fn add_transitions(&mut self, from: NodeId, to: NodeId, count: usize) -> Result<usize, ChainError> {
		if to.0 >= self.nodes.len() {
			return Err(ChainError::UnknownNode(to));
		}
		let node = self.nodes.get_mut(from.0).ok_or(ChainError::UnknownNode(from))?;
		let count = node.add_transition(to, count)?;
		trace!("edge {from} -> {to} now {count}");
		Ok(count)
	}

	/// Ingests a sequence of states.
	///
	/// Each state is looked up or inserted, and every consecutive pair is
	/// recorded as a transition. Returns the number of states consumed.
	///
	/// # Errors
	/// Stops at the first failure; everything ingested before it is kept.
	pub fn observe_sequence<'a, I>(&mut self, states: I) -> Result<usize, ChainError>
	where
		I: IntoIterator<Item = &'a S>,
		S: 'a,
	{
		let mut previous: Option<NodeId> = None;
		let mut consumed = 0;
		for state in states {
			let current = self.lookup_or_insert(state)?;
			if let Some(previous) = previous {
				self.add_transition(previous, current)?;
			}
			previous = Some(current);
			consumed += 1;
		}
		Ok(consumed)
	}

	/// Computes node, edge and transition totals.
	pub fn stats(&self) -> ChainStats {
		self.nodes.iter().fold(ChainStats::default(), |mut stats, node| {
			stats.nodes += 1;
			stats.edges += node.edges.len();
			stats.transitions += node.total_weight();
			stats
		})
	}

	/// Merges another chain into this one.
	///
	/// # Notes
	/// - States missing from `self` are copied in, in `other`'s order.
	/// - Counts of matching edges are summed; new edges are appended.
	///
	/// # Errors
	/// Returns [`ChainError::Allocation`] on the first failed copy or growth.
	/// Nodes and edges merged before the failure are kept.
	pub fn merge(&mut self, other: &Self) -> Result<(), ChainError> {
		let mut mapping = Vec::with_capacity(other.nodes.len());
		for node in &other.nodes {
			mapping.push(self.lookup_or_insert(&node.state)?);
		}

		for (source, node) in other.nodes.iter().enumerate() {
			for edge in &node.edges {
				self.add_transitions(mapping[source], mapping[edge.target.0], edge.count)?;
			}
		}

		info!("merged {} nodes, chain now has {}", other.nodes.len(), self.nodes.len());
		Ok(())
	}

	/// Releases every node in registration order.
	///
	/// For each node the edge table is freed first, then its state copy is
	/// handed to `ChainState::release`. Calling this again, or on an empty
	/// chain, does nothing. Also run on drop.
	pub fn teardown(&mut self) {
		if self.nodes.is_empty() {
			return;
		}

		let released = self.nodes.len();
		for Node { state, edges } in self.nodes.drain(..) {
			drop(edges);
			state.release();
		}
		debug!("released {released} nodes");
	}
}

impl<S: ChainState> Drop for MarkovChain<S> {
	fn drop(&mut self) {
		self.teardown();
	}
}
