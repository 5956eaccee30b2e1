use std::io::BufRead;

use anyhow::{Context, Result};
use log::debug;
use rs_chain_core::MarkovChain;

use crate::word::Word;

/// Bytes separating words in the corpus.
const DELIMITERS: &[u8] = b"\n\r\t ";

/// Reads a corpus and feeds its words into `chain`.
///
/// - Reads line by line as raw bytes; words are separated by spaces, tabs
///   and line breaks, any other byte belongs to a word
/// - Consecutive words of the same line become a transition, a new line
///   starts without a predecessor
/// - Stops once `words_to_read` words were consumed (`None` reads everything)
///
/// Returns the number of words consumed.
pub(crate) fn fill_chain<R: BufRead>(reader: R, words_to_read: Option<usize>, chain: &mut MarkovChain<Word>) -> Result<usize> {
	let mut reader = reader;
	let mut consumed = 0;
	let mut line = Vec::new();

	for number in 1.. {
		let remaining = match words_to_read {
			Some(limit) if consumed >= limit => break,
			Some(limit) => limit - consumed,
			None => usize::MAX,
		};

		line.clear();
		let read = reader
			.read_until(b'\n', &mut line)
			.with_context(|| format!("reading corpus line {number}"))?;
		if read == 0 {
			break;
		}

		let words: Vec<Word> = line
			.split(|byte| DELIMITERS.contains(byte))
			.filter(|token| !token.is_empty())
			.take(remaining)
			.map(Word::new)
			.collect();

		consumed += chain
			.observe_sequence(&words)
			.with_context(|| format!("adding line {number} to the chain"))?;
	}

	debug!("consumed {consumed} words");
	Ok(consumed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rs_chain_core::Edge;

	fn chain_from(text: &[u8], words_to_read: Option<usize>) -> (MarkovChain<Word>, usize) {
		let mut chain = MarkovChain::new();
		let consumed = fill_chain(text, words_to_read, &mut chain).unwrap();
		(chain, consumed)
	}

	#[test]
	fn words_are_linked_within_a_line() {
		let (chain, consumed) = chain_from(b"the cat\tsat.\nthe dog sat.\n", None);
		assert_eq!(consumed, 6);

		let order: Vec<&[u8]> = chain.iter().map(|(_, node)| node.state().as_bytes()).collect();
		assert_eq!(order, vec![&b"the"[..], b"cat", b"sat.", b"dog"]);

		let the = chain.lookup(&Word::new(b"the")).unwrap();
		let cat = chain.lookup(&Word::new(b"cat")).unwrap();
		let dog = chain.lookup(&Word::new(b"dog")).unwrap();
		assert_eq!(chain.successors(the), &[
			Edge { target: cat, count: 1 },
			Edge { target: dog, count: 1 },
		]);
	}

	#[test]
	fn lines_do_not_link() {
		let (chain, _) = chain_from(b"alpha\nbeta\n", None);
		let alpha = chain.lookup(&Word::new(b"alpha")).unwrap();
		assert!(chain.successors(alpha).is_empty());
	}

	#[test]
	fn word_limit_spans_lines() {
		let (chain, consumed) = chain_from(b"a b c\nd e f\n", Some(4));
		assert_eq!(consumed, 4);
		assert_eq!(chain.len(), 4);
		assert_eq!(chain.lookup(&Word::new(b"e")), None);
	}

	#[test]
	fn blank_lines_and_repeated_spaces() {
		let (chain, consumed) = chain_from(b"\n  a   b \r\n\n", None);
		assert_eq!(consumed, 2);
		assert_eq!(chain.stats().transitions, 1);
	}

	#[test]
	fn bytes_outside_utf8_form_words() {
		let (chain, consumed) = chain_from(b"the caf\xe9 opened.\nthe dog sat.\n", None);
		assert_eq!(consumed, 6);
		assert_eq!(chain.len(), 5);

		let cafe = chain.lookup(&Word::new(b"caf\xe9")).unwrap();
		let opened = chain.lookup(&Word::new(b"opened.")).unwrap();
		assert_eq!(chain.successors(cafe), &[Edge { target: opened, count: 1 }]);
		assert_eq!(chain.lookup(&Word::new(b"caf\xe8")), None);
	}

	#[test]
	fn last_line_without_newline() {
		let (chain, consumed) = chain_from(b"one two", None);
		assert_eq!(consumed, 2);
		assert_eq!(chain.stats().transitions, 1);
	}
}
