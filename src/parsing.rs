use crate::grammar::Node;

mod lalr;
mod ll;
mod lr;

pub use ll::LLParser;
pub use lr::{Action, LRParser};

/// A position inside an alternative of a nonterminal. The offset counts
/// grammar symbols, the empty string excluded.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
	pub nt: usize,
	pub alternative: usize,
	pub offset: usize,
}

impl Item {
	pub fn new(nt: usize, alternative: usize) -> Item {
		Item {
			nt,
			alternative,
			offset: 0,
		}
	}

	pub fn shifted(&self) -> Item {
		Item {
			nt: self.nt,
			alternative: self.alternative,
			offset: self.offset + 1,
		}
	}
}

/// The grammar symbols of an alternative, the empty string excluded.
/// An alternative reading `[Empty]` contributes no symbols, so its items
/// reduce immediately.
pub(crate) fn symbols<T>(alternative: &[Node<T>]) -> impl Iterator<Item = &Node<T>> {
	alternative
		.iter()
		.filter(|node| !matches!(node, Node::Empty))
}
