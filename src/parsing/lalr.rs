use super::{symbols, Action, Item, LRParser};
use crate::{
	automaton::DFA,
	grammar::{Grammar, Node},
};
use std::collections::{BTreeMap, BTreeSet};

impl<T: Clone + Ord> LRParser<T> {
	/// LALR(1) table.
	///
	/// The canonical LR(0) collection is built explicitly, then reduce
	/// lookaheads are computed per state with DeRemer and Pennello's
	/// relational method: `Read = digraph(Reads, DirectRead)` over
	/// nonterminal transitions, `Follow = digraph(Includes, Read)`, and
	/// the lookahead of a reduction is the union of `Follow` over its
	/// lookback transitions.
	pub fn lalr(grammar: &Grammar<T>) -> LRParser<T> {
		let grammar = grammar.augmented();
		let nullable = grammar.nullable();
		let nullable_nt = |nt: usize| !nullable[nt].is_empty();

		// canonical collection
		let mut sets: Vec<BTreeSet<Item>> = Vec::new();
		let mut index: BTreeMap<BTreeSet<Item>, usize> = BTreeMap::new();
		let mut goto: BTreeMap<(usize, Node<T>), usize> = BTreeMap::new();
		let start = closure(
			&grammar,
			std::iter::once(Item::new(grammar.start(), 0)).collect(),
		);
		index.insert(start.clone(), 0);
		sets.push(start);
		let mut stack = vec![0usize];
		while let Some(q) = stack.pop() {
			let current = sets[q].clone();
			let mut moves: BTreeMap<Node<T>, BTreeSet<Item>> = BTreeMap::new();
			for &item in &current {
				if let Some(symbol) = symbol_at(&grammar, item) {
					moves
						.entry(symbol.clone())
						.or_insert_with(BTreeSet::new)
						.insert(item.shifted());
				}
			}
			for (symbol, kernel) in moves {
				let target = closure(&grammar, kernel);
				let to = match index.get(&target) {
					Some(&to) => to,
					None => {
						let to = sets.len();
						sets.push(target.clone());
						index.insert(target, to);
						stack.push(to);
						to
					}
				};
				goto.insert((q, symbol), to);
			}
		}

		// nonterminal transitions, indexed
		let mut trans: Vec<(usize, usize)> = Vec::new();
		let mut tindex: BTreeMap<(usize, usize), usize> = BTreeMap::new();
		for (key, _) in &goto {
			if let (q, Node::Nonterminal(nt)) = key {
				tindex.insert((*q, *nt), trans.len());
				trans.push((*q, *nt));
			}
		}
		let mut out: Vec<BTreeMap<Node<T>, usize>> = vec![BTreeMap::new(); sets.len()];
		for ((q, symbol), to) in &goto {
			out[*q].insert(symbol.clone(), *to);
		}

		let direct_read: Vec<BTreeSet<T>> = trans
			.iter()
			.map(|&(q, nt)| {
				let r = goto[&(q, Node::Nonterminal(nt))];
				out[r]
					.keys()
					.filter_map(|symbol| match symbol {
						Node::Terminal(t) => Some(t.clone()),
						_ => None,
					})
					.collect()
			})
			.collect();
		let reads: Vec<Vec<usize>> = trans
			.iter()
			.map(|&(q, nt)| {
				let r = goto[&(q, Node::Nonterminal(nt))];
				out[r]
					.keys()
					.filter_map(|symbol| match symbol {
						Node::Nonterminal(c) if nullable_nt(*c) => {
							tindex.get(&(r, *c)).copied()
						}
						_ => None,
					})
					.collect()
			})
			.collect();

		// walking each alternative of a transition's nonterminal yields
		// both the includes edges and the lookback of its reduction
		let mut includes: Vec<Vec<usize>> = vec![Vec::new(); trans.len()];
		let mut lookback: BTreeMap<(usize, usize, usize), Vec<usize>> = BTreeMap::new();
		for (ti, &(p, b)) in trans.iter().enumerate() {
			for (alt_idx, alt) in grammar.productions()[b].iter().enumerate() {
				let syms: Vec<&Node<T>> = symbols(alt).collect();
				let mut q = p;
				for (i, symbol) in syms.iter().enumerate() {
					if let Node::Nonterminal(a) = symbol {
						let rest_nullable = syms[i + 1..].iter().all(|s| match s {
							Node::Nonterminal(c) => nullable_nt(*c),
							_ => false,
						});
						if rest_nullable {
							if let Some(&tj) = tindex.get(&(q, *a)) {
								includes[tj].push(ti);
							}
						}
					}
					q = goto[&(q, (**symbol).clone())];
				}
				lookback
					.entry((q, b, alt_idx))
					.or_insert_with(Vec::new)
					.push(ti);
			}
		}

		let read = digraph(&reads, &direct_read);
		let follow = digraph(&includes, &read);

		let accept = sets.len();
		let mut accepting: BTreeMap<usize, BTreeSet<Action<T>>> = BTreeMap::new();
		for (q, set) in sets.iter().enumerate() {
			let mut actions = BTreeSet::new();
			for &item in set {
				match symbol_at(&grammar, item) {
					Some(Node::Terminal(_)) => {
						actions.insert(Action::Shift);
					}
					Some(_) => (),
					None => {
						let len =
							symbols(grammar.alternative(item.nt, item.alternative)).count();
						let la: BTreeSet<T> = lookback
							.get(&(q, item.nt, item.alternative))
							.map(|ts| {
								ts.iter().flat_map(|&t| follow[t].iter().cloned()).collect()
							})
							.unwrap_or_default();
						actions.insert(Action::Reduce(item.nt, len, la));
					}
				}
			}
			if !actions.is_empty() {
				accepting.insert(q, actions);
			}
		}
		let mut accept_actions = BTreeSet::new();
		accept_actions.insert(Action::Accept);
		accepting.insert(accept, accept_actions);

		let mut transitions = goto;
		transitions.insert((0, Node::Nonterminal(grammar.start())), accept);
		let table = DFA::new(sets.len() + 1, transitions, 0, accepting).minimized();
		log::debug!(
			"built an LALR(1) table with {} states from {} item sets",
			table.states(),
			sets.len()
		);
		LRParser::from_parts(grammar, table)
	}
}

fn symbol_at<T>(grammar: &Grammar<T>, item: Item) -> Option<&Node<T>> {
	symbols(grammar.alternative(item.nt, item.alternative)).nth(item.offset)
}

fn closure<T: Clone + Ord>(grammar: &Grammar<T>, mut set: BTreeSet<Item>) -> BTreeSet<Item> {
	let mut stack: Vec<Item> = set.iter().copied().collect();
	while let Some(item) = stack.pop() {
		if let Some(Node::Nonterminal(nt)) = symbol_at(grammar, item) {
			let nt = *nt;
			for p in 0..grammar.productions()[nt].len() {
				let item = Item::new(nt, p);
				if set.insert(item) {
					stack.push(item);
				}
			}
		}
	}
	set
}

/// Computes the smallest relation `f` with `f(x) ⊇ base(x)` and
/// `f(x) ⊇ f(y)` for every edge `x → y`. Members of a cycle end up
/// sharing one merged set.
fn digraph<T: Clone + Ord>(edges: &[Vec<usize>], base: &[BTreeSet<T>]) -> Vec<BTreeSet<T>> {
	let mut f: Vec<BTreeSet<T>> = base.to_vec();
	let mut mark = vec![0usize; base.len()];
	let mut scc = Vec::new();
	for x in 0..base.len() {
		if mark[x] == 0 {
			traverse(x, edges, &mut f, &mut mark, &mut scc);
		}
	}
	f
}

fn traverse<T: Clone + Ord>(
	root: usize,
	edges: &[Vec<usize>],
	f: &mut [BTreeSet<T>],
	mark: &mut [usize],
	scc: &mut Vec<usize>,
) {
	scc.push(root);
	mark[root] = scc.len();
	// frame: node, its depth on entry, next edge to follow
	let mut frames = vec![(root, scc.len(), 0usize)];
	loop {
		let (v, depth, i) = match frames.last_mut() {
			Some(frame) => {
				let step = (frame.0, frame.1, frame.2);
				frame.2 += 1;
				step
			}
			None => break,
		};
		if let Some(&w) = edges[v].get(i) {
			if mark[w] == 0 {
				scc.push(w);
				mark[w] = scc.len();
				frames.push((w, scc.len(), 0));
			} else {
				mark[v] = mark[v].min(mark[w]);
				let merged = f[w].clone();
				f[v].extend(merged);
			}
		} else {
			frames.pop();
			if mark[v] == depth {
				while let Some(&z) = scc.last() {
					scc.pop();
					mark[z] = usize::MAX;
					if z == v {
						break;
					}
					f[z] = f[v].clone();
				}
			}
			if let Some(parent) = frames.last() {
				let p = parent.0;
				mark[p] = mark[p].min(mark[v]);
				let merged = f[v].clone();
				f[p].extend(merged);
			}
		}
	}
}
