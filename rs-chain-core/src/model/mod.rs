//! Top-level module for the chain model.
//!
//! This module provides the weighted random-walk system, including:
//! - The state capability trait (`ChainState`)
//! - Graph nodes and their weighted edge tables (`Node`, `Edge`)
//! - The state registry (`MarkovChain`)
//! - Walk configuration (`WalkConfig`, `Start`)
//! - The walk generator (`Generator`, `Walk`)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Capability set a state type implements to be stored in a chain.
pub mod state;

/// Graph node owning one state and its outgoing weighted edges.
///
/// Handles increment-or-insert of edges and weighted successor sampling.
pub mod node;

/// Duplicate-free, insertion-ordered registry of nodes.
///
/// Owns every node; edges refer to nodes through `NodeId` handles.
pub mod chain;

/// Walk configuration: length bound and start strategy.
pub mod walk_input;

/// Random start selection and lazy walk generation.
pub mod generator;

/// Stable handle to a node inside a `MarkovChain`.
///
/// A handle is the node's position in registration order. It stays valid
/// until the chain is torn down.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
	/// Position of the node in registration order.
	pub fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}
