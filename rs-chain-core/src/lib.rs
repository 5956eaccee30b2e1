//! Generic weighted random-walk engine.
//!
//! This crate provides a Markov chain over caller-defined states:
//! - A duplicate-free, insertion-ordered state registry
//! - Per-state weighted successor tables built from observed transitions
//! - Weighted successor sampling proportional to observation counts
//! - Lazy walk generation with a terminal-state and length policy
//!
//! States plug in through the [`ChainState`] capability trait. The engine
//! never looks inside a state beyond that trait.

/// Chain model: registry, edge tables, sampling and walks.
pub mod model;

/// Error type shared by every fallible operation.
pub mod error;

pub use error::ChainError;
pub use model::chain::{ChainStats, MarkovChain};
pub use model::generator::{Generator, Walk};
pub use model::node::{Edge, Node};
pub use model::state::ChainState;
pub use model::walk_input::{DEFAULT_MAX_LENGTH, Start, WalkConfig};
pub use model::NodeId;
