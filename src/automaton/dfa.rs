use super::Error;
use crate::matcher::Matcher;
use std::collections::{BTreeMap, BTreeSet};

/// Deterministic finite automaton.
///
/// Transitions are grouped per state and ordered by matcher, and a step
/// takes the first matcher accepting the symbol. Determinization keeps the
/// matchers of a state pairwise disjoint in practice, but the order makes
/// stepping well defined either way.
#[derive(Clone, Debug)]
pub struct DFA<T, M> {
	states: usize,
	transitions: BTreeMap<usize, BTreeMap<M, usize>>,
	initial: usize,
	accepting: BTreeMap<usize, T>,
}

impl<T: Clone + Ord, M: Clone + Ord> DFA<T, M> {
	pub fn new(
		states: usize,
		transitions: BTreeMap<(usize, M), usize>,
		initial: usize,
		accepting: BTreeMap<usize, T>,
	) -> DFA<T, M> {
		debug_assert!(initial < states);
		debug_assert!(accepting.keys().all(|&q| q < states));
		let mut grouped: BTreeMap<usize, BTreeMap<M, usize>> = BTreeMap::new();
		for ((from, m), to) in transitions {
			debug_assert!(from < states && to < states);
			grouped.entry(from).or_insert_with(BTreeMap::new).insert(m, to);
		}
		DFA {
			states,
			transitions: grouped,
			initial,
			accepting,
		}
	}

	pub fn states(&self) -> usize {
		self.states
	}

	pub fn initial(&self) -> usize {
		self.initial
	}

	pub fn accepting(&self) -> &BTreeMap<usize, T> {
		&self.accepting
	}

	pub fn transitions(&self) -> impl Iterator<Item = (usize, &M, usize)> {
		self.transitions
			.iter()
			.flat_map(|(&from, map)| map.iter().map(move |(m, &to)| (from, m, to)))
	}

	/// Moore partition refinement.
	///
	/// The initial partition groups states by accepting value, with every
	/// non-accepting state in one block, and is refined until every block
	/// behaves uniformly on every matcher. A missing transition is its own
	/// behavior, distinct from any block.
	pub fn minimized(&self) -> DFA<T, M> {
		let values: BTreeSet<&T> = self.accepting.values().collect();
		let value_id: BTreeMap<&T, usize> =
			values.iter().enumerate().map(|(i, &v)| (v, i + 1)).collect();
		let mut partition: Vec<usize> = (0..self.states)
			.map(|q| match self.accepting.get(&q) {
				Some(v) => value_id[v],
				None => 0,
			})
			.collect();
		// block 0 is empty when every state accepts
		let mut count = partition.iter().collect::<BTreeSet<_>>().len();
		let alphabet: BTreeSet<&M> = self
			.transitions
			.values()
			.flat_map(|map| map.keys())
			.collect();
		loop {
			let mut ids: BTreeMap<(usize, Vec<Option<usize>>), usize> = BTreeMap::new();
			let mut next = Vec::with_capacity(self.states);
			for q in 0..self.states {
				let signature: Vec<Option<usize>> = alphabet
					.iter()
					.map(|m| {
						self.transitions
							.get(&q)
							.and_then(|map| map.get(m))
							.map(|&to| partition[to])
					})
					.collect();
				let fresh = ids.len();
				let id = *ids.entry((partition[q], signature)).or_insert(fresh);
				next.push(id);
			}
			let stable = ids.len() == count;
			count = ids.len();
			partition = next;
			if stable {
				break;
			}
		}
		log::debug!("minimized {} states into {}", self.states, count);
		let mut transitions = BTreeMap::new();
		for (from, map) in &self.transitions {
			for (m, to) in map {
				transitions.insert((partition[*from], m.clone()), partition[*to]);
			}
		}
		let accepting = self
			.accepting
			.iter()
			.map(|(q, v)| (partition[*q], v.clone()))
			.collect();
		DFA::new(count, transitions, partition[self.initial], accepting)
	}
}

impl<T, M: Matcher> DFA<T, M> {
	/// One step from `state` over `symbol`, if any edge matches.
	pub fn step(&self, state: usize, symbol: &M::Element) -> Option<usize> {
		let map = self.transitions.get(&state)?;
		map.iter()
			.find(|(m, _)| m.matches(symbol))
			.map(|(_, &to)| to)
	}

	/// Runs the automaton over the whole input.
	pub fn matches<I>(&self, input: I) -> Option<&T>
	where
		I: IntoIterator<Item = M::Element>,
	{
		let mut state = self.initial;
		for symbol in input {
			state = self.step(state, &symbol)?;
		}
		self.accepting.get(&state)
	}

	/// Maximal munch: the longest prefix of `input` ending in an accepting
	/// state, together with its length in symbols.
	pub fn prefix_match<I>(&self, input: I) -> Option<(&T, usize)>
	where
		I: IntoIterator<Item = M::Element>,
	{
		let mut state = self.initial;
		let mut best = self.accepting.get(&state).map(|v| (v, 0));
		for (i, symbol) in input.into_iter().enumerate() {
			match self.step(state, &symbol) {
				Some(to) => {
					state = to;
					if let Some(v) = self.accepting.get(&state) {
						best = Some((v, i + 1));
					}
				}
				None => break,
			}
		}
		best
	}
}

impl<T: Clone + Ord, M: Clone + Ord> DFA<BTreeSet<T>, M> {
	/// Collapses each accepting set to its smallest value.
	pub fn resolved(&self) -> DFA<T, M> {
		let accepting = self
			.accepting
			.iter()
			.filter_map(|(q, values)| values.iter().next().cloned().map(|v| (*q, v)))
			.collect();
		self.with_accepting(accepting)
	}

	/// Fails on any accepting set with more than one value.
	pub fn consistent(&self) -> Result<DFA<T, M>, Error<T>> {
		let mut accepting = BTreeMap::new();
		for (q, values) in &self.accepting {
			let mut it = values.iter();
			match (it.next(), it.next()) {
				(Some(a), Some(b)) => {
					return Err(Error::AmbiguousAccept(a.clone(), b.clone()))
				}
				(Some(a), None) => {
					accepting.insert(*q, a.clone());
				}
				_ => (),
			}
		}
		Ok(self.with_accepting(accepting))
	}

	fn with_accepting(&self, accepting: BTreeMap<usize, T>) -> DFA<T, M> {
		DFA {
			states: self.states,
			transitions: self.transitions.clone(),
			initial: self.initial,
			accepting,
		}
	}
}
