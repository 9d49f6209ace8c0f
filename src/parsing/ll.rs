use crate::grammar::{Grammar, Node};
use std::collections::BTreeMap;

/// Table-driven predictive parser with one terminal of lookahead.
pub struct LLParser<T> {
	grammar: Grammar<T>,
	table: Vec<BTreeMap<T, usize>>,
}

impl<T: Clone + Ord> LLParser<T> {
	/// Builds the parse table from the first and follow sets.
	///
	/// Left recursion is eliminated and common prefixes are factored out
	/// first. Panics when the grammar still is not backtrack free.
	pub fn new(grammar: &Grammar<T>) -> LLParser<T> {
		let mut grammar = grammar.clone();
		grammar.eliminate_left_recursion();
		grammar.left_refactor();
		let nullable = grammar.nullable();
		let first = grammar.first(&nullable);
		let follow = grammar.follow(&nullable, &first);
		assert!(
			grammar.is_backtrack_free(&nullable, &first, &follow),
			"grammar is not backtrack free"
		);
		let mut table: Vec<BTreeMap<T, usize>> =
			vec![BTreeMap::new(); grammar.productions().len()];
		for s in 0..grammar.productions().len() {
			for (t, alternatives) in &first[s] {
				// backtrack free, so exactly one alternative
				if let Some(&p) = alternatives.iter().next() {
					table[s].insert(t.clone(), p);
				}
			}
			if let Some(&p) = nullable[s].iter().next() {
				for t in &follow[s] {
					table[s].insert(t.clone(), p);
				}
			}
		}
		log::debug!("built an LL(1) table over {} nonterminals", table.len());
		LLParser { grammar, table }
	}

	/// The grammar after left recursion elimination and left factoring.
	pub fn grammar(&self) -> &Grammar<T> {
		&self.grammar
	}

	pub fn table(&self) -> &[BTreeMap<T, usize>] {
		&self.table
	}

	/// Recognizes `input` by expanding the predicted alternative for every
	/// nonterminal reaching the top of the stack.
	pub fn parse(&self, input: &[T]) -> bool {
		let mut it = input.iter();
		let mut lookahead = it.next();
		let mut stack = vec![Node::Nonterminal(self.grammar.start())];
		while let Some(top) = stack.pop() {
			match top {
				Node::Empty => (),
				Node::Terminal(t) => match lookahead {
					Some(symbol) if *symbol == t => lookahead = it.next(),
					_ => return false,
				},
				Node::Nonterminal(nt) => {
					let p = match lookahead.and_then(|symbol| self.table[nt].get(symbol)) {
						Some(&p) => p,
						None => return false,
					};
					stack.extend(self.grammar.alternative(nt, p).iter().rev().cloned());
				}
			}
		}
		lookahead.is_none()
	}
}
