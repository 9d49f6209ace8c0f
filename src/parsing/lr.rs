use super::symbols;
use crate::{
	automaton::{DFA, NFA},
	grammar::{Grammar, Node},
};
use std::collections::{BTreeMap, BTreeSet};

/// A parse table action. A reduction carries the nonterminal, the number of
/// grammar symbols to pop and its lookahead set; an empty lookahead set
/// makes the reduction viable at end of input only.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Action<T> {
	Shift,
	Reduce(usize, usize, BTreeSet<T>),
	Accept,
	Error,
}

/// Bottom-up shift/reduce parser.
///
/// The table is a deterministic automaton over grammar symbols whose states
/// accept with a set of actions. Conflicting actions are kept in the table
/// and resolved against the lookahead while parsing.
pub struct LRParser<T> {
	grammar: Grammar<T>,
	table: DFA<BTreeSet<Action<T>>, Node<T>>,
}

impl<T: Clone + Ord> LRParser<T> {
	/// LR(0) table with follow-set lookaheads, known as SLR(1).
	///
	/// Every position in every alternative becomes one state of a
	/// non-deterministic automaton. A position before a nonterminal has
	/// epsilon moves to the starting positions of its alternatives, and the
	/// end of an alternative reduces. Determinizing that automaton yields
	/// the canonical collection of item sets.
	pub fn new(grammar: &Grammar<T>) -> LRParser<T> {
		let grammar = grammar.augmented();
		let nullable = grammar.nullable();
		let first = grammar.first(&nullable);
		let follow = grammar.follow(&nullable, &first);

		let mut starting: Vec<Vec<usize>> = Vec::with_capacity(grammar.productions().len());
		let mut count = 0;
		for alternatives in grammar.productions() {
			let mut row = Vec::with_capacity(alternatives.len());
			for alt in alternatives {
				row.push(count);
				count += symbols(alt).count() + 1;
			}
			starting.push(row);
		}

		let mut transitions: BTreeMap<Node<T>, Vec<(usize, usize)>> = BTreeMap::new();
		let mut epsilon: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
		let mut accepting: BTreeMap<usize, Action<T>> = BTreeMap::new();
		let mut q = 0;
		for (s, alternatives) in grammar.productions().iter().enumerate() {
			for alt in alternatives {
				let mut len = 0;
				for symbol in symbols(alt) {
					if let Node::Nonterminal(nt) = symbol {
						epsilon
							.entry(q)
							.or_insert_with(Vec::new)
							.extend(starting[*nt].iter().copied());
					}
					transitions
						.entry(symbol.clone())
						.or_insert_with(Vec::new)
						.push((q, q + 1));
					accepting.insert(q, Action::Shift);
					q += 1;
					len += 1;
				}
				accepting.insert(q, Action::Reduce(s, len, follow[s].clone()));
				q += 1;
			}
		}
		debug_assert_eq!(q, count);

		// shifting the goal symbol itself accepts
		let initial = starting[grammar.start()][0];
		let accept = count;
		transitions
			.entry(Node::Nonterminal(grammar.start()))
			.or_insert_with(Vec::new)
			.push((initial, accept));
		accepting.insert(accept, Action::Accept);

		let nfa = NFA::new(count + 1, transitions, epsilon, initial, accepting);
		let table = nfa.determinize().minimized();
		log::debug!(
			"built an SLR(1) table with {} states from {} items",
			table.states(),
			count
		);
		LRParser { grammar, table }
	}

	/// SLR(1) table. `new` already sources its lookaheads from the follow
	/// sets, so this is the same construction under its usual name.
	pub fn slr(grammar: &Grammar<T>) -> LRParser<T> {
		LRParser::new(grammar)
	}

	pub(super) fn from_parts(
		grammar: Grammar<T>,
		table: DFA<BTreeSet<Action<T>>, Node<T>>,
	) -> LRParser<T> {
		LRParser { grammar, table }
	}

	/// The augmented grammar the table was built from.
	pub fn grammar(&self) -> &Grammar<T> {
		&self.grammar
	}

	pub fn table(&self) -> &DFA<BTreeSet<Action<T>>, Node<T>> {
		&self.table
	}

	fn action(&self, stack: &[Node<T>], lookahead: Option<&T>) -> Action<T> {
		let actions = match self.table.matches(stack.iter().cloned()) {
			Some(actions) => actions,
			None => return Action::Error,
		};
		if actions.len() == 1 {
			return actions.iter().next().cloned().unwrap_or(Action::Error);
		}
		// prefer a reduction viable under the lookahead, then a shift
		let viable = actions.iter().find(|action| match action {
			Action::Reduce(_, _, la) => match lookahead {
				Some(t) => la.contains(t),
				None => true,
			},
			_ => false,
		});
		match viable {
			Some(action) => action.clone(),
			None if actions.contains(&Action::Shift) => Action::Shift,
			None => Action::Error,
		}
	}

	/// Recognizes `input`, replaying the symbol stack through the table
	/// after every move.
	pub fn parse(&self, input: &[T]) -> bool {
		let mut it = input.iter();
		let mut lookahead = it.next();
		let mut stack: Vec<Node<T>> = Vec::new();
		loop {
			match self.action(&stack, lookahead) {
				Action::Shift => match lookahead {
					Some(t) => {
						stack.push(Node::Terminal(t.clone()));
						lookahead = it.next();
					}
					None => return false,
				},
				Action::Reduce(nt, len, _) => {
					if stack.len() < len {
						return false;
					}
					stack.truncate(stack.len() - len);
					stack.push(Node::Nonterminal(nt));
				}
				Action::Accept => return lookahead.is_none(),
				Action::Error => return false,
			}
		}
	}
}
