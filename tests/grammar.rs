use kleene::{Grammar, Node};
use lazy_static::lazy_static;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
enum Token {
	Plus,
	Minus,
	Multiply,
	Divide,
	LeftBracket,
	RightBracket,
	Num,
	Name,
	Eof,
}

use Token::*;

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let s = match self {
			Plus => "'+'",
			Minus => "'-'",
			Multiply => "'*'",
			Divide => "'/'",
			LeftBracket => "'('",
			RightBracket => "')'",
			Num => "num",
			Name => "name",
			Eof => "eof",
		};
		write!(f, "{}", s)
	}
}

fn t(token: Token) -> Node<Token> {
	Node::Terminal(token)
}

fn nt(index: usize) -> Node<Token> {
	Node::Nonterminal(index)
}

fn set<T: Ord>(values: Vec<T>) -> BTreeSet<T> {
	values.into_iter().collect()
}

fn map<K: Ord, V>(entries: Vec<(K, V)>) -> BTreeMap<K, V> {
	entries.into_iter().collect()
}

lazy_static! {
	// the classic expression grammar
	static ref EXPRESSION: Grammar<Token> = Grammar::new(
		vec![
			// (0) Goal   -> Expr eof
			vec![vec![nt(1), t(Eof)]],
			// (1) Expr   -> Expr + Term | Expr - Term | Term
			vec![
				vec![nt(1), t(Plus), nt(2)],
				vec![nt(1), t(Minus), nt(2)],
				vec![nt(2)],
			],
			// (2) Term   -> Term * Factor | Term / Factor | Factor
			vec![
				vec![nt(2), t(Multiply), nt(3)],
				vec![nt(2), t(Divide), nt(3)],
				vec![nt(3)],
			],
			// (3) Factor -> ( Expr ) | num | name
			vec![
				vec![t(LeftBracket), nt(1), t(RightBracket)],
				vec![t(Num)],
				vec![t(Name)],
			],
		],
		0,
	);
}

#[test]
fn left_recursion_elimination() {
	let mut g = EXPRESSION.clone();
	g.eliminate_left_recursion();
	assert_eq!(g.productions().len(), 6);

	let nullable = g.nullable();
	assert_eq!(
		nullable,
		vec![
			set(vec![]),
			set(vec![]),
			set(vec![]),
			set(vec![]),
			set(vec![0]),
			set(vec![0]),
		]
	);

	let first = g.first(&nullable);
	assert_eq!(
		first,
		vec![
			map(vec![
				(Num, set(vec![0])),
				(LeftBracket, set(vec![0])),
				(Name, set(vec![0])),
			]),
			map(vec![
				(Num, set(vec![0])),
				(LeftBracket, set(vec![0])),
				(Name, set(vec![0])),
			]),
			map(vec![
				(Num, set(vec![0])),
				(LeftBracket, set(vec![0])),
				(Name, set(vec![0])),
			]),
			map(vec![
				(Num, set(vec![1])),
				(LeftBracket, set(vec![0])),
				(Name, set(vec![2])),
			]),
			map(vec![(Plus, set(vec![1])), (Minus, set(vec![2]))]),
			map(vec![(Multiply, set(vec![1])), (Divide, set(vec![2]))]),
		]
	);

	let follow = g.follow(&nullable, &first);
	assert_eq!(
		follow,
		vec![
			set(vec![]),
			set(vec![Eof, RightBracket]),
			set(vec![Eof, RightBracket, Plus, Minus]),
			set(vec![Eof, RightBracket, Plus, Minus, Multiply, Divide]),
			set(vec![Eof, RightBracket]),
			set(vec![Eof, RightBracket, Plus, Minus]),
		]
	);

	assert!(g.is_backtrack_free(&nullable, &first, &follow));
}

#[test]
fn left_refactoring() {
	let mut g = Grammar::new(
		vec![
			// (0) Goal   -> Expr
			vec![vec![nt(1)]],
			// (1) Expr   -> Expr + Term | Expr - Term | Term
			vec![
				vec![nt(1), t(Plus), nt(2)],
				vec![nt(1), t(Minus), nt(2)],
				vec![nt(2)],
			],
			// (2) Term   -> Term * Factor | Term / Factor | Factor
			vec![
				vec![nt(2), t(Multiply), nt(3)],
				vec![nt(2), t(Divide), nt(3)],
				vec![nt(3)],
			],
			// (3) Factor -> ( Expr ) | num | name | name ( ArgList )
			vec![
				vec![t(LeftBracket), nt(1), t(RightBracket)],
				vec![t(Num)],
				vec![t(Name)],
				vec![t(Name), t(LeftBracket), nt(4), t(RightBracket)],
			],
			// (4) ArgList -> Expr
			vec![vec![nt(1)]],
		],
		0,
	);

	g.eliminate_left_recursion();
	assert_eq!(g.productions().len(), 7);

	// two alternatives of Factor start with name, so the grammar needs
	// left factoring before predictive parsing
	let nullable = g.nullable();
	let first = g.first(&nullable);
	let follow = g.follow(&nullable, &first);
	assert_eq!(first[3][&Name].len(), 2);
	assert!(!g.is_backtrack_free(&nullable, &first, &follow));

	g.left_refactor();
	let nullable = g.nullable();
	let first = g.first(&nullable);
	let follow = g.follow(&nullable, &first);
	assert_eq!(first[3][&Name].len(), 1);
	assert!(g.is_backtrack_free(&nullable, &first, &follow));
}

#[test]
fn eof_seeds_follow() {
	// Goal -> name, with a dedicated eof terminal
	let g = Grammar::with_eof(vec![vec![vec![t(Name)]]], 0, Eof);
	let nullable = g.nullable();
	let first = g.first(&nullable);
	let follow = g.follow(&nullable, &first);
	assert_eq!(follow, vec![set(vec![Eof])]);
}

#[test]
fn augmented() {
	let g = EXPRESSION.augmented();
	assert_eq!(g.productions().len(), 5);
	assert_eq!(g.start(), 4);
	assert_eq!(g.productions()[4], vec![vec![nt(0)]]);
}

#[test]
fn display() {
	let rendered = EXPRESSION.to_string();
	assert!(rendered.contains("S3 -> '(' S1 ')' | num | name"));
}
