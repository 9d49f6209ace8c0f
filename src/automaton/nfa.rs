use super::{DFA, Error};
use crate::{
	matcher::{Matcher, ScalarClass},
	regexp::RegExp,
};
use once_cell::unsync::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

/// Non-deterministic finite automaton with epsilon moves.
///
/// States are indices below `states`. Labeled transitions are grouped by
/// matcher so the alphabet of an automaton is exactly the set of matchers
/// appearing on its edges. Accepting states carry a value of type `T`,
/// which survives determinization.
#[derive(Clone, Debug)]
pub struct NFA<T, M> {
	states: usize,
	transitions: BTreeMap<M, Vec<(usize, usize)>>,
	epsilon: BTreeMap<usize, Vec<usize>>,
	initial: usize,
	accepting: BTreeMap<usize, T>,
	closures: OnceCell<Vec<BTreeSet<usize>>>,
}

impl<T: Clone + Ord, M: Clone + Ord> NFA<T, M> {
	pub fn new(
		states: usize,
		transitions: BTreeMap<M, Vec<(usize, usize)>>,
		epsilon: BTreeMap<usize, Vec<usize>>,
		initial: usize,
		accepting: BTreeMap<usize, T>,
	) -> NFA<T, M> {
		debug_assert!(initial < states);
		debug_assert!(transitions
			.values()
			.flatten()
			.all(|&(a, b)| a < states && b < states));
		debug_assert!(epsilon
			.iter()
			.all(|(q, ts)| *q < states && ts.iter().all(|&t| t < states)));
		debug_assert!(accepting.keys().all(|&q| q < states));
		NFA {
			states,
			transitions,
			epsilon,
			initial,
			accepting,
			closures: OnceCell::new(),
		}
	}

	/// Two-state automaton accepting exactly the symbols matched by `matcher`.
	pub fn single(matcher: M, value: T) -> NFA<T, M> {
		let mut transitions = BTreeMap::new();
		transitions.insert(matcher, vec![(0, 1)]);
		let mut accepting = BTreeMap::new();
		accepting.insert(1, value);
		NFA::new(2, transitions, BTreeMap::new(), 0, accepting)
	}

	/// Renumbers every state upwards by `by`.
	fn offset(self, by: usize) -> NFA<T, M> {
		if by == 0 {
			return self;
		}
		NFA {
			states: self.states + by,
			transitions: self
				.transitions
				.into_iter()
				.map(|(m, edges)| {
					(
						m,
						edges.into_iter().map(|(a, b)| (a + by, b + by)).collect(),
					)
				})
				.collect(),
			epsilon: self
				.epsilon
				.into_iter()
				.map(|(q, ts)| (q + by, ts.into_iter().map(|t| t + by).collect()))
				.collect(),
			initial: self.initial + by,
			accepting: self
				.accepting
				.into_iter()
				.map(|(q, v)| (q + by, v))
				.collect(),
			closures: OnceCell::new(),
		}
	}

	/// Language concatenation. The accepting values of `a` are discarded.
	pub fn concatenation(a: NFA<T, M>, b: NFA<T, M>) -> NFA<T, M> {
		let b = b.offset(a.states);
		let mut transitions = a.transitions;
		for (m, edges) in b.transitions {
			transitions.entry(m).or_insert_with(Vec::new).extend(edges)
		}
		let mut epsilon = a.epsilon;
		for (q, ts) in b.epsilon {
			epsilon.entry(q).or_insert_with(Vec::new).extend(ts)
		}
		for q in a.accepting.keys() {
			epsilon.entry(*q).or_insert_with(Vec::new).push(b.initial)
		}
		NFA::new(b.states, transitions, epsilon, a.initial, b.accepting)
	}

	/// Language union through a fresh initial state.
	pub fn alternation(a: NFA<T, M>, b: NFA<T, M>) -> NFA<T, M> {
		NFA::union(vec![a, b])
	}

	/// Union of any number of alternatives through a fresh initial state.
	pub fn union(alternatives: Vec<NFA<T, M>>) -> NFA<T, M> {
		let mut states = 1;
		let mut transitions: BTreeMap<M, Vec<(usize, usize)>> = BTreeMap::new();
		let mut epsilon: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
		let mut accepting = BTreeMap::new();
		for nfa in alternatives {
			let nfa = nfa.offset(states);
			for (m, edges) in nfa.transitions {
				transitions.entry(m).or_insert_with(Vec::new).extend(edges)
			}
			for (q, ts) in nfa.epsilon {
				epsilon.entry(q).or_insert_with(Vec::new).extend(ts)
			}
			epsilon.entry(0).or_insert_with(Vec::new).push(nfa.initial);
			accepting.extend(nfa.accepting);
			states = nfa.states;
		}
		NFA::new(states, transitions, epsilon, 0, accepting)
	}

	/// Kleene star. The initial state becomes accepting so the empty input
	/// is part of the language.
	pub fn closure(mut a: NFA<T, M>) -> NFA<T, M> {
		let value = a.accepting.values().next().cloned();
		let back: Vec<usize> = a.accepting.keys().copied().collect();
		for q in back {
			a.epsilon.entry(q).or_insert_with(Vec::new).push(a.initial)
		}
		if let Some(value) = value {
			a.accepting.entry(a.initial).or_insert(value);
		}
		a.closures = OnceCell::new();
		a
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

	/// Matchers appearing on at least one edge.
	pub fn alphabet(&self) -> impl Iterator<Item = &M> {
		self.transitions.keys()
	}

	fn closures(&self) -> &[BTreeSet<usize>] {
		self.closures.get_or_init(|| {
			(0..self.states)
				.map(|s| {
					let mut closure = BTreeSet::new();
					let mut stack = vec![s];
					while let Some(q) = stack.pop() {
						if closure.insert(q) {
							if let Some(ts) = self.epsilon.get(&q) {
								stack.extend(ts.iter().copied())
							}
						}
					}
					closure
				})
				.collect()
		})
	}

	/// States reachable from `states` through epsilon moves alone,
	/// including `states` itself.
	pub fn epsilon_closure(&self, states: &BTreeSet<usize>) -> BTreeSet<usize> {
		let closures = self.closures();
		let mut result = BTreeSet::new();
		for &q in states {
			result.extend(closures[q].iter().copied())
		}
		result
	}

	/// Targets of `matcher`-labeled edges leaving `states`. No epsilon
	/// closure is taken on either side.
	pub fn reachable(&self, states: &BTreeSet<usize>, matcher: &M) -> BTreeSet<usize> {
		match self.transitions.get(matcher) {
			Some(edges) => edges
				.iter()
				.filter(|(from, _)| states.contains(from))
				.map(|&(_, to)| to)
				.collect(),
			None => BTreeSet::new(),
		}
	}

	fn subset_construction(&self) -> (Vec<BTreeSet<usize>>, BTreeMap<(usize, M), usize>) {
		let start = {
			let mut s = BTreeSet::new();
			s.insert(self.initial);
			self.epsilon_closure(&s)
		};
		let mut subsets = vec![start.clone()];
		let mut index = BTreeMap::new();
		index.insert(start, 0usize);
		let mut transitions = BTreeMap::new();
		let mut stack = vec![0usize];
		while let Some(q) = stack.pop() {
			let subset = subsets[q].clone();
			for m in self.transitions.keys() {
				let target = self.epsilon_closure(&self.reachable(&subset, m));
				if target.is_empty() {
					continue;
				}
				let to = match index.get(&target) {
					Some(&to) => to,
					None => {
						let to = subsets.len();
						subsets.push(target.clone());
						index.insert(target, to);
						stack.push(to);
						to
					}
				};
				transitions.insert((q, m.clone()), to);
			}
		}
		(subsets, transitions)
	}

	/// Subset construction. Each deterministic state accepts with the set
	/// of values accepted by its member states.
	pub fn determinize(&self) -> DFA<BTreeSet<T>, M> {
		let (subsets, transitions) = self.subset_construction();
		log::debug!(
			"determinized {} states into {} subsets",
			self.states,
			subsets.len()
		);
		let mut accepting = BTreeMap::new();
		for (i, subset) in subsets.iter().enumerate() {
			let values: BTreeSet<T> = subset
				.iter()
				.filter_map(|q| self.accepting.get(q).cloned())
				.collect();
			if !values.is_empty() {
				accepting.insert(i, values);
			}
		}
		DFA::new(subsets.len(), transitions, 0, accepting)
	}

	/// Subset construction requiring a single accepting value per
	/// deterministic state.
	pub fn determinize_consistent(&self) -> Result<DFA<T, M>, Error<T>> {
		self.determinize().consistent()
	}
}

impl<T: Clone + Ord, M: Clone + Ord + Matcher> NFA<T, M> {
	/// One step over `symbol` from `states`. No epsilon closure is taken.
	pub fn step(&self, states: &BTreeSet<usize>, symbol: &M::Element) -> BTreeSet<usize> {
		let mut result = BTreeSet::new();
		for (m, edges) in &self.transitions {
			if m.matches(symbol) {
				for (from, to) in edges {
					if states.contains(from) {
						result.insert(*to);
					}
				}
			}
		}
		result
	}

	/// Runs the automaton over `input` and returns every value accepted
	/// at the end of it.
	pub fn matches<I>(&self, input: I) -> BTreeSet<T>
	where
		I: IntoIterator<Item = M::Element>,
	{
		let mut states = {
			let mut s = BTreeSet::new();
			s.insert(self.initial);
			self.epsilon_closure(&s)
		};
		for symbol in input {
			states = self.epsilon_closure(&self.step(&states, &symbol));
			if states.is_empty() {
				break;
			}
		}
		states
			.iter()
			.filter_map(|q| self.accepting.get(q).cloned())
			.collect()
	}
}

impl<T: Clone + Ord> NFA<T, ScalarClass> {
	/// Union of one token automaton per regular expression, each accepting
	/// with its token value.
	pub fn scanner(tokens: &[(RegExp, T)]) -> NFA<T, ScalarClass> {
		NFA::union(
			tokens
				.iter()
				.map(|(e, value)| e.nfa_with(value.clone()))
				.collect(),
		)
	}
}
