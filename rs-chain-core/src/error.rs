use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

use crate::model::NodeId;

/// Errors reported by the chain and its walk generator.
///
/// Allocation failures leave every structure in the state it had before the
/// failing call. Nothing is retried.
#[derive(Debug, Error)]
pub enum ChainError {
	/// A state copy or a table growth could not obtain memory.
	#[error("allocation failure: {0}")]
	Allocation(#[from] TryReserveError),

	/// Random start selection found no node whose state is non-terminal.
	#[error("no non-terminal state available to start a walk")]
	NoEligibleStart,

	/// The handle was not issued by this chain.
	#[error("unknown node {0}")]
	UnknownNode(NodeId),

	/// The render sink failed.
	#[error("render error: {0}")]
	Render(#[from] io::Error),
}
