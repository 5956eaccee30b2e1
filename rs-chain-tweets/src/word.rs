use std::io::{self, Write};

use rs_chain_core::{ChainError, ChainState};

/// Byte that ends a tweet when it closes a word.
pub(crate) const END_OF_TWEET: u8 = b'.';

/// A single corpus word.
///
/// Kept as raw bytes: a corpus is not required to be valid UTF-8, and two
/// words are the same only when their bytes are.
#[derive(PartialEq, Eq, Debug)]
pub(crate) struct Word(Vec<u8>);

impl Word {
	pub(crate) fn new(bytes: &[u8]) -> Self {
		Self(bytes.to_vec())
	}

	#[cfg(test)]
	pub(crate) fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl ChainState for Word {
	fn try_copy(&self) -> Result<Self, ChainError> {
		let mut copy = Vec::new();
		copy.try_reserve_exact(self.0.len())?;
		copy.extend_from_slice(&self.0);
		Ok(Self(copy))
	}

	fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
		out.write_all(&self.0)
	}

	/// A word ending with a full stop closes the tweet.
	fn is_terminal(&self) -> bool {
		self.0.last() == Some(&END_OF_TWEET)
	}
}
