use crate::matcher::Matcher;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A grammar symbol: a terminal of type `T`, a nonterminal index, or the
/// empty string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Node<T> {
	Terminal(T),
	Nonterminal(usize),
	Empty,
}

impl<T: PartialEq> Matcher for Node<T> {
	type Element = Node<T>;

	fn matches(&self, e: &Node<T>) -> bool {
		self == e
	}
}

impl<T: fmt::Display> fmt::Display for Node<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Node::Terminal(t) => t.fmt(f),
			Node::Nonterminal(nt) => write!(f, "S{}", nt),
			Node::Empty => write!(f, "ε"),
		}
	}
}

/// A context-free grammar over terminals of type `T`.
///
/// Nonterminals are indices into `productions`; each nonterminal holds its
/// ordered list of alternatives. Alternatives are referred to everywhere by
/// their index within the nonterminal.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grammar<T> {
	productions: Vec<Vec<Vec<Node<T>>>>,
	start: usize,
	eof: Option<T>,
}

impl<T> Grammar<T> {
	pub fn new(productions: Vec<Vec<Vec<Node<T>>>>, start: usize) -> Grammar<T> {
		Grammar::build(productions, start, None)
	}

	/// Grammar whose input is terminated by a dedicated `eof` terminal.
	/// The terminal seeds the follow set of the start symbol.
	pub fn with_eof(productions: Vec<Vec<Vec<Node<T>>>>, start: usize, eof: T) -> Grammar<T> {
		Grammar::build(productions, start, Some(eof))
	}

	fn build(productions: Vec<Vec<Vec<Node<T>>>>, start: usize, eof: Option<T>) -> Grammar<T> {
		assert!(start < productions.len(), "start symbol out of range");
		assert!(
			productions.iter().flatten().flatten().all(|node| match node {
				Node::Nonterminal(nt) => *nt < productions.len(),
				_ => true,
			}),
			"nonterminal out of range"
		);
		Grammar {
			productions,
			start,
			eof,
		}
	}

	pub fn productions(&self) -> &[Vec<Vec<Node<T>>>] {
		&self.productions
	}

	pub fn alternative(&self, nt: usize, p: usize) -> &[Node<T>] {
		&self.productions[nt][p]
	}

	pub fn start(&self) -> usize {
		self.start
	}

	pub fn eof(&self) -> Option<&T> {
		self.eof.as_ref()
	}
}

impl<T: Clone + Ord> Grammar<T> {
	/// Grammar with a fresh goal symbol `G -> S` as its start. Parser table
	/// constructions work on the augmented grammar so acceptance is a
	/// reduction like any other.
	pub fn augmented(&self) -> Grammar<T> {
		let mut g = self.clone();
		let goal = g.productions.len();
		g.productions.push(vec![vec![Node::Nonterminal(g.start)]]);
		g.start = goal;
		g
	}

	/// Rewrites the grammar so no derivation `S =>+ S α` exists.
	///
	/// Nonterminals are processed in index order. Alternatives starting
	/// with an earlier nonterminal are substituted first, then direct
	/// recursion on the nonterminal is split off into a fresh tail
	/// nonterminal whose alternative 0 is the empty string.
	pub fn eliminate_left_recursion(&mut self) {
		for i in 0..self.productions.len() {
			for j in 0..i {
				let mut p = 0;
				while p < self.productions[i].len() {
					if self.productions[i][p].first() == Some(&Node::Nonterminal(j)) {
						let tail: Vec<Node<T>> = self.productions[i][p][1..].to_vec();
						self.productions[i].remove(p);
						let substituted: Vec<Vec<Node<T>>> = self.productions[j]
							.iter()
							.map(|alt| alt.iter().chain(tail.iter()).cloned().collect())
							.collect();
						self.productions[i].extend(substituted);
					} else {
						p += 1;
					}
				}
			}
			let recursive = self.productions[i]
				.iter()
				.any(|alt| alt.first() == Some(&Node::Nonterminal(i)));
			if recursive {
				let fresh = self.productions.len();
				let mut tails = vec![vec![Node::Empty]];
				let alternatives = std::mem::take(&mut self.productions[i]);
				for alt in alternatives {
					if alt.first() == Some(&Node::Nonterminal(i)) {
						let mut tail: Vec<Node<T>> = alt[1..].to_vec();
						tail.push(Node::Nonterminal(fresh));
						tails.push(tail);
					} else {
						let mut alt = alt;
						alt.push(Node::Nonterminal(fresh));
						self.productions[i].push(alt);
					}
				}
				self.productions.push(tails);
			}
		}
	}

	/// Left factoring to a fixpoint.
	///
	/// Whenever two or more alternatives of a nonterminal share a first
	/// symbol, their longest common prefix is pulled out and the differing
	/// tails move to a fresh nonterminal. An empty tail becomes the empty
	/// string.
	pub fn left_refactor(&mut self) {
		loop {
			let mut changed = false;
			for i in 0..self.productions.len() {
				while let Some(shared) = self.shared_prefix_group(i) {
					let len = self.common_prefix_len(i, &shared);
					let fresh = self.productions.len();
					let tails: Vec<Vec<Node<T>>> = shared
						.iter()
						.map(|&p| {
							let tail = self.productions[i][p][len..].to_vec();
							if tail.is_empty() {
								vec![Node::Empty]
							} else {
								tail
							}
						})
						.collect();
					let mut factored = self.productions[i][shared[0]][..len].to_vec();
					factored.push(Node::Nonterminal(fresh));
					self.productions[i][shared[0]] = factored;
					for &p in shared[1..].iter().rev() {
						self.productions[i].remove(p);
					}
					self.productions.push(tails);
					changed = true;
				}
			}
			if !changed {
				break;
			}
		}
	}

	/// First group of two or more alternatives of `nt` sharing a first
	/// symbol, in alternative order.
	fn shared_prefix_group(&self, nt: usize) -> Option<Vec<usize>> {
		for (p, alt) in self.productions[nt].iter().enumerate() {
			let head = match alt.first() {
				Some(Node::Empty) | None => continue,
				Some(head) => head,
			};
			let group: Vec<usize> = self.productions[nt]
				.iter()
				.enumerate()
				.filter(|(_, other)| other.first() == Some(head))
				.map(|(q, _)| q)
				.collect();
			if group.len() > 1 {
				debug_assert_eq!(group[0], p);
				return Some(group);
			}
		}
		None
	}

	fn common_prefix_len(&self, nt: usize, group: &[usize]) -> usize {
		let first = &self.productions[nt][group[0]];
		let mut len = 1;
		while len < first.len()
			&& group[1..].iter().all(|&p| {
				self.productions[nt][p].get(len) == Some(&first[len])
			}) {
			len += 1;
		}
		len
	}

	/// For each nonterminal, the set of alternative indices deriving the
	/// empty string. Computed as a fixpoint.
	pub fn nullable(&self) -> Vec<BTreeSet<usize>> {
		let mut nullable = vec![BTreeSet::new(); self.productions.len()];
		loop {
			let mut changed = false;
			for (s, alternatives) in self.productions.iter().enumerate() {
				for (p, alt) in alternatives.iter().enumerate() {
					if nullable[s].contains(&p) {
						continue;
					}
					let empty = alt.iter().all(|node| match node {
						Node::Empty => true,
						Node::Terminal(_) => false,
						Node::Nonterminal(nt) => !nullable[*nt].is_empty(),
					});
					if empty {
						nullable[s].insert(p);
						changed = true;
					}
				}
			}
			if !changed {
				break;
			}
		}
		nullable
	}

	/// For each nonterminal, maps every terminal that can begin one of its
	/// derivations to the alternatives it can begin.
	pub fn first(&self, nullable: &[BTreeSet<usize>]) -> Vec<BTreeMap<T, BTreeSet<usize>>> {
		let mut first: Vec<BTreeMap<T, BTreeSet<usize>>> =
			vec![BTreeMap::new(); self.productions.len()];
		loop {
			let mut changed = false;
			for (s, alternatives) in self.productions.iter().enumerate() {
				for (p, alt) in alternatives.iter().enumerate() {
					for node in alt {
						match node {
							Node::Empty => continue,
							Node::Terminal(t) => {
								changed |=
									first[s].entry(t.clone()).or_insert_with(BTreeSet::new).insert(p);
								break;
							}
							Node::Nonterminal(nt) => {
								let terminals: Vec<T> = first[*nt].keys().cloned().collect();
								for t in terminals {
									changed |=
										first[s].entry(t).or_insert_with(BTreeSet::new).insert(p);
								}
								if nullable[*nt].is_empty() {
									break;
								}
							}
						}
					}
				}
			}
			if !changed {
				break;
			}
		}
		first
	}

	/// For each nonterminal, the terminals that can follow it in some
	/// derivation from the start symbol. The eof terminal, when present,
	/// follows the start symbol.
	pub fn follow(
		&self,
		nullable: &[BTreeSet<usize>],
		first: &[BTreeMap<T, BTreeSet<usize>>],
	) -> Vec<BTreeSet<T>> {
		let mut follow: Vec<BTreeSet<T>> = vec![BTreeSet::new(); self.productions.len()];
		if let Some(eof) = &self.eof {
			follow[self.start].insert(eof.clone());
		}
		loop {
			let mut changed = false;
			for (s, alternatives) in self.productions.iter().enumerate() {
				for alt in alternatives {
					let mut trailer = follow[s].clone();
					for node in alt.iter().rev() {
						match node {
							Node::Empty => (),
							Node::Terminal(t) => {
								trailer = std::iter::once(t.clone()).collect();
							}
							Node::Nonterminal(nt) => {
								let before = follow[*nt].len();
								follow[*nt].extend(trailer.iter().cloned());
								changed |= follow[*nt].len() != before;
								let heads = first[*nt].keys().cloned();
								if nullable[*nt].is_empty() {
									trailer = heads.collect();
								} else {
									trailer.extend(heads);
								}
							}
						}
					}
				}
			}
			if !changed {
				break;
			}
		}
		follow
	}

	/// A grammar is backtrack free when every terminal selects at most one
	/// alternative, at most one alternative is nullable, and for a nullable
	/// nonterminal no terminal is both in its first and its follow set.
	/// Exactly the condition for predictive parsing with one lookahead.
	pub fn is_backtrack_free(
		&self,
		nullable: &[BTreeSet<usize>],
		first: &[BTreeMap<T, BTreeSet<usize>>],
		follow: &[BTreeSet<T>],
	) -> bool {
		for s in 0..self.productions.len() {
			if first[s].values().any(|alternatives| alternatives.len() > 1) {
				return false;
			}
			if nullable[s].len() > 1 {
				return false;
			}
			if !nullable[s].is_empty() && first[s].keys().any(|t| follow[s].contains(t)) {
				return false;
			}
		}
		true
	}
}

impl<T: fmt::Display> fmt::Display for Grammar<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (s, alternatives) in self.productions.iter().enumerate() {
			writeln!(
				f,
				"S{} -> {}",
				s,
				alternatives
					.iter()
					.map(|alt| alt.iter().format(" "))
					.format(" | ")
			)?
		}
		Ok(())
	}
}
