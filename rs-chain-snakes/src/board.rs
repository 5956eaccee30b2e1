use std::io::{self, Write};

use rs_chain_core::{ChainError, ChainState, MarkovChain, NodeId};
use serde::Serialize;

/// Number of cells on the board; the last one ends the game.
pub(crate) const BOARD_SIZE: usize = 100;

/// Highest face of the die.
pub(crate) const DICE_MAX: usize = 6;

/// Ladders and snakes as `(from, to)`.
/// A pair is a ladder when `from < to`, a snake otherwise.
pub(crate) const SHORTCUTS: [(usize, usize); 20] = [
	(13, 4),
	(85, 17),
	(95, 67),
	(97, 58),
	(66, 89),
	(87, 31),
	(57, 83),
	(91, 25),
	(28, 50),
	(35, 11),
	(8, 30),
	(41, 62),
	(81, 43),
	(69, 32),
	(20, 39),
	(33, 70),
	(79, 99),
	(23, 76),
	(15, 47),
	(61, 14),
];

/// One square of the board.
#[derive(Serialize, Copy, Clone, Debug)]
pub(crate) struct Cell {
	/// Cell number, 1 to `BOARD_SIZE`.
	pub(crate) number: usize,
	/// Destination of the ladder starting here.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) ladder_to: Option<usize>,
	/// Destination of the snake starting here.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) snake_to: Option<usize>,
}

impl Cell {
	fn plain(number: usize) -> Self {
		Self { number, ladder_to: None, snake_to: None }
	}

	/// Where a player landing here is sent, if anywhere.
	pub(crate) fn shortcut(&self) -> Option<usize> {
		self.ladder_to.or(self.snake_to)
	}
}

/// Cells are identified by their number alone.
impl PartialEq for Cell {
	fn eq(&self, other: &Self) -> bool {
		self.number == other.number
	}
}

impl ChainState for Cell {
	fn try_copy(&self) -> Result<Self, ChainError> {
		Ok(*self)
	}

	fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
		write!(out, "[{}]", self.number)?;
		if let Some(to) = self.ladder_to {
			write!(out, "-ladder to {to}")?;
		} else if let Some(to) = self.snake_to {
			write!(out, "-snake to {to}")?;
		}
		if !self.is_terminal() {
			write!(out, " ->")?;
		}
		Ok(())
	}

	fn is_terminal(&self) -> bool {
		self.number == BOARD_SIZE
	}
}

/// Builds the board cells in order, with their ladders and snakes.
pub(crate) fn build_board() -> Vec<Cell> {
	let mut cells: Vec<Cell> = (1..=BOARD_SIZE).map(Cell::plain).collect();
	for (from, to) in SHORTCUTS {
		let cell = &mut cells[from - 1];
		if from < to {
			cell.ladder_to = Some(to);
		} else {
			cell.snake_to = Some(to);
		}
	}
	cells
}

/// Registers every cell and the moves between them.
///
/// - A cell with a ladder or snake has one edge, to its destination
/// - Any other cell has one edge per die face that stays on the board
pub(crate) fn fill_chain(chain: &mut MarkovChain<Cell>) -> Result<(), ChainError> {
	let cells = build_board();
	let ids = cells
		.iter()
		.map(|cell| chain.lookup_or_insert(cell))
		.collect::<Result<Vec<NodeId>, _>>()?;

	for (index, cell) in cells.iter().enumerate() {
		if let Some(to) = cell.shortcut() {
			chain.add_transition(ids[index], ids[to - 1])?;
			continue;
		}
		for roll in 1..=DICE_MAX {
			let to = cell.number + roll;
			if to > BOARD_SIZE {
				break;
			}
			chain.add_transition(ids[index], ids[to - 1])?;
		}
	}
	Ok(())
}
