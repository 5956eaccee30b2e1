use std::io::{self, Write};

use crate::error::ChainError;

/// Capabilities a value needs to be stored in a `MarkovChain`.
///
/// The chain treats states as opaque. Equality comes from `PartialEq` and is
/// the only comparison used: two states are the same node iff `a == b`.
///
/// ## Lifecycle
/// - The chain keeps a private copy made by [`try_copy`](Self::try_copy)
///   the first time a state is seen.
/// - At teardown every copy is handed back exactly once through
///   [`release`](Self::release).
pub trait ChainState: PartialEq + Sized {
	/// Produces an independent owned copy of the state.
	///
	/// # Errors
	/// Returns [`ChainError::Allocation`] if the copy could not obtain memory.
	fn try_copy(&self) -> Result<Self, ChainError>;

	/// Writes a presentation of the state to `out`.
	fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()>;

	/// Returns `true` if a walk must stop after reaching this state.
	fn is_terminal(&self) -> bool;

	/// Releases a copy previously produced by [`try_copy`](Self::try_copy).
	///
	/// Called once per copy when the chain is torn down. The default simply
	/// drops the value.
	fn release(self) {}

	/// Renders the state into an owned string.
	fn rendered(&self) -> io::Result<String> {
		let mut buffer = Vec::new();
		self.render(&mut buffer)?;
		Ok(String::from_utf8_lossy(&buffer).into_owned())
	}
}
