use kleene::{automaton::Error, RegExp, ScalarClass, DFA, NFA};
use std::collections::{BTreeMap, BTreeSet};

fn set<T: Ord>(values: Vec<T>) -> BTreeSet<T> {
	values.into_iter().collect()
}

#[test]
fn nfa() {
	// a*ab
	let mut transitions = BTreeMap::new();
	transitions.insert(ScalarClass::Single('a'), vec![(0, 0), (1, 2)]);
	transitions.insert(ScalarClass::Single('b'), vec![(2, 3)]);
	let mut epsilon = BTreeMap::new();
	epsilon.insert(0, vec![1]);
	let mut accepting = BTreeMap::new();
	accepting.insert(3, true);
	let nfa = NFA::new(4, transitions, epsilon, 0, accepting);

	assert!(nfa.matches("aaab".chars()).contains(&true));
	assert!(!nfa.matches("aaa".chars()).contains(&true));
	assert!(nfa.matches("ab".chars()).contains(&true));
	assert!(!nfa.matches("b".chars()).contains(&true));
	assert!(!nfa.matches("bbbbab".chars()).contains(&true));
}

#[test]
fn regexp_nfa() {
	// a*ab
	let re = RegExp::single('a').star() + (RegExp::single('a') + RegExp::single('b'));
	let nfa = re.nfa();

	assert!(nfa.matches("aaab".chars()).contains(&true));
	assert!(!nfa.matches("aaa".chars()).contains(&true));
	assert!(nfa.matches("ab".chars()).contains(&true));
	assert!(!nfa.matches("b".chars()).contains(&true));
	assert!(!nfa.matches("bbbbab".chars()).contains(&true));
}

#[test]
fn nfa_accepts_through_epsilon_moves() {
	// a(b|c)* accepts "a" without taking a labeled edge after it
	let re = RegExp::single('a') + (RegExp::single('b') | RegExp::single('c')).star();
	assert!(re.nfa().matches("a".chars()).contains(&true));
	assert!(re.nfa().matches("abcb".chars()).contains(&true));
}

#[test]
fn dfa() {
	// a(b|c)*
	let mut transitions = BTreeMap::new();
	transitions.insert((0, ScalarClass::Single('a')), 1);
	transitions.insert((1, ScalarClass::Single('b')), 1);
	transitions.insert((1, ScalarClass::Single('c')), 1);
	let mut accepting = BTreeMap::new();
	accepting.insert(1, true);
	let dfa = DFA::new(2, transitions, 0, accepting);

	assert_eq!(dfa.matches("a".chars()), Some(&true));
	assert_eq!(dfa.matches("ab".chars()), Some(&true));
	assert_eq!(dfa.matches("ac".chars()), Some(&true));
	assert_eq!(dfa.matches("abc".chars()), Some(&true));
	assert_eq!(dfa.matches("acb".chars()), Some(&true));
	assert_eq!(dfa.matches("abbbb".chars()), Some(&true));
	assert_eq!(dfa.matches("acccc".chars()), Some(&true));
	assert_eq!(dfa.matches("abbccbbccbc".chars()), Some(&true));

	assert_eq!(dfa.matches("aa".chars()), None);
	assert_eq!(dfa.matches("aba".chars()), None);
	assert_eq!(dfa.matches("abac".chars()), None);
	assert_eq!(dfa.matches("abbccbbccbca".chars()), None);
}

#[test]
fn regexp_to_dfa() {
	// a(b|c)*
	let re = RegExp::single('a') + (RegExp::single('b') | RegExp::single('c')).star();
	let dfa = re.nfa().determinize_consistent().unwrap();

	assert_eq!(dfa.matches("a".chars()), Some(&true));
	assert_eq!(dfa.matches("abbccbbccbc".chars()), Some(&true));
	assert_eq!(dfa.matches("aa".chars()), None);
	assert_eq!(dfa.matches("cbcab".chars()), None);
	assert_eq!(dfa.matches("".chars()), None);
}

#[test]
fn regexp_to_minimized_dfa() {
	let re = RegExp::single('a') + (RegExp::single('b') | RegExp::single('c')).star();
	let dfa = re.nfa().determinize_consistent().unwrap();
	let minimized = dfa.minimized();
	assert!(minimized.states() <= dfa.states());

	assert_eq!(minimized.matches("a".chars()), Some(&true));
	assert_eq!(minimized.matches("acb".chars()), Some(&true));
	assert_eq!(minimized.matches("abbccbbccbc".chars()), Some(&true));
	assert_eq!(minimized.matches("aa".chars()), None);
	assert_eq!(minimized.matches("abac".chars()), None);
	assert_eq!(minimized.matches("cbcab".chars()), None);
}

#[test]
fn minimize_all_accepting_dfa() {
	// chain 0 -a-> 1 -a-> 2 with every state accepting: refinement must
	// still separate the states by how much input they have left
	let mut transitions = BTreeMap::new();
	transitions.insert((0, ScalarClass::Single('a')), 1);
	transitions.insert((1, ScalarClass::Single('a')), 2);
	let mut accepting = BTreeMap::new();
	accepting.insert(0, true);
	accepting.insert(1, true);
	accepting.insert(2, true);
	let dfa = DFA::new(3, transitions, 0, accepting);
	let minimized = dfa.minimized();

	for input in &["", "a", "aa", "aaa", "aaaa"] {
		assert_eq!(
			minimized.matches(input.chars()),
			dfa.matches(input.chars()),
			"on {:?}",
			input
		);
	}
	assert_eq!(minimized.matches("aa".chars()), Some(&true));
	assert_eq!(minimized.matches("aaa".chars()), None);
}

#[test]
fn minimize_distinct_accepting_values() {
	// same chain, a different value at every depth: nothing may merge
	let mut transitions = BTreeMap::new();
	transitions.insert((0, ScalarClass::Single('a')), 1);
	transitions.insert((1, ScalarClass::Single('a')), 2);
	let mut accepting = BTreeMap::new();
	accepting.insert(0, 1u8);
	accepting.insert(1, 2u8);
	accepting.insert(2, 3u8);
	let dfa = DFA::new(3, transitions, 0, accepting);
	let minimized = dfa.minimized();

	assert_eq!(minimized.states(), 3);
	assert_eq!(minimized.matches("".chars()), Some(&1));
	assert_eq!(minimized.matches("a".chars()), Some(&2));
	assert_eq!(minimized.matches("aa".chars()), Some(&3));
	assert_eq!(minimized.matches("aaa".chars()), None);
}

#[test]
fn multi_accepting_dfa() {
	#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
	enum Token {
		Aa,
		Ab,
		Ac,
	}

	let mut transitions = BTreeMap::new();
	transitions.insert((0, ScalarClass::Single('a')), 1);
	transitions.insert((1, ScalarClass::Single('a')), 2);
	transitions.insert((1, ScalarClass::Single('b')), 3);
	transitions.insert((1, ScalarClass::Single('c')), 4);
	let mut accepting = BTreeMap::new();
	accepting.insert(2, Token::Aa);
	accepting.insert(3, Token::Ab);
	accepting.insert(4, Token::Ac);
	let dfa = DFA::new(5, transitions, 0, accepting);

	assert_eq!(dfa.matches("aa".chars()), Some(&Token::Aa));
	assert_eq!(dfa.matches("ab".chars()), Some(&Token::Ab));
	assert_eq!(dfa.matches("ac".chars()), Some(&Token::Ac));
	assert_eq!(dfa.matches("bb".chars()), None);
}

#[test]
fn scanner() {
	#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
	enum Token {
		Integer,
		Decimal,
		Identifier,
	}

	let tokens = vec![
		(RegExp::digit() + RegExp::digit().star(), Token::Integer),
		(
			RegExp::digit()
				+ RegExp::digit().star()
				+ RegExp::single('.')
				+ RegExp::digit() + RegExp::digit().star(),
			Token::Decimal,
		),
		(RegExp::alpha() + RegExp::alphanum().star(), Token::Identifier),
	];
	let dfa = NFA::scanner(&tokens).determinize().minimized();

	assert_eq!(dfa.matches("134".chars()), Some(&set(vec![Token::Integer])));
	assert_eq!(dfa.matches("61.613".chars()), Some(&set(vec![Token::Decimal])));
	assert_eq!(dfa.matches("x1".chars()), Some(&set(vec![Token::Identifier])));
	assert_eq!(dfa.matches("1xy".chars()), None);
}

#[test]
fn inseparable_scanner_values() {
	#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
	enum Token {
		A,
		B,
	}

	let tokens = vec![
		(RegExp::single('a'), Token::A),
		(RegExp::single('a'), Token::B),
	];
	match NFA::scanner(&tokens).determinize_consistent() {
		Err(Error::AmbiguousAccept(a, b)) => assert_eq!((a, b), (Token::A, Token::B)),
		Ok(_) => panic!("expected an ambiguity"),
	}
}

#[test]
fn prefix_match() {
	let re = RegExp::digit() + RegExp::digit().star();
	let dfa = re.nfa().determinize_consistent().unwrap();

	assert_eq!(dfa.prefix_match("123abc".chars()), Some((&true, 3)));
	assert_eq!(dfa.prefix_match("7".chars()), Some((&true, 1)));
	assert_eq!(dfa.prefix_match("abc".chars()), None);
	assert_eq!(dfa.prefix_match("".chars()), None);
}
