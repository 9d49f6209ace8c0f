use crate::{
	automaton::NFA,
	matcher::ScalarClass,
};
use std::{
	fmt,
	ops::{Add, BitOr},
};

/// Regular expression over unicode scalar classes.
///
/// The four algebraic cases are enough for scanner definitions; repetition
/// sugar (`+`, `?`) is expressed through `then`/`or`/`star`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum RegExp {
	Scalar(ScalarClass),
	Concatenation(Box<RegExp>, Box<RegExp>),
	Alternation(Box<RegExp>, Box<RegExp>),
	Closure(Box<RegExp>),
}

impl RegExp {
	pub fn single(c: char) -> RegExp {
		RegExp::Scalar(ScalarClass::Single(c))
	}

	pub fn range(first: char, last: char) -> RegExp {
		RegExp::Scalar(ScalarClass::Range(first, last))
	}

	/// Concatenation of the single-scalar classes of `s`.
	///
	/// Panics on an empty literal, which denotes no scanner token.
	pub fn literal(s: &str) -> RegExp {
		let mut chars = s.chars();
		let first = chars.next().expect("empty literal");
		chars.fold(RegExp::single(first), |e, c| e.then(RegExp::single(c)))
	}

	pub fn digit() -> RegExp {
		RegExp::range('0', '9')
	}

	pub fn lowercase() -> RegExp {
		RegExp::range('a', 'z')
	}

	pub fn uppercase() -> RegExp {
		RegExp::range('A', 'Z')
	}

	pub fn alpha() -> RegExp {
		RegExp::lowercase().or(RegExp::uppercase())
	}

	pub fn alphanum() -> RegExp {
		RegExp::alpha().or(RegExp::digit())
	}

	pub fn then(self, other: RegExp) -> RegExp {
		RegExp::Concatenation(Box::new(self), Box::new(other))
	}

	pub fn or(self, other: RegExp) -> RegExp {
		RegExp::Alternation(Box::new(self), Box::new(other))
	}

	pub fn star(self) -> RegExp {
		RegExp::Closure(Box::new(self))
	}

	/// Thompson's construction with the given accepting value.
	pub fn nfa_with<T: Clone + Ord>(&self, value: T) -> NFA<T, ScalarClass> {
		match self {
			RegExp::Scalar(class) => NFA::single(*class, value),
			RegExp::Concatenation(a, b) => {
				NFA::concatenation(a.nfa_with(value.clone()), b.nfa_with(value))
			}
			RegExp::Alternation(a, b) => {
				NFA::alternation(a.nfa_with(value.clone()), b.nfa_with(value))
			}
			RegExp::Closure(a) => NFA::closure(a.nfa_with(value)),
		}
	}

	/// Thompson's construction of a recognizer.
	pub fn nfa(&self) -> NFA<bool, ScalarClass> {
		self.nfa_with(true)
	}
}

impl Add for RegExp {
	type Output = RegExp;

	fn add(self, rhs: RegExp) -> RegExp {
		self.then(rhs)
	}
}

impl BitOr for RegExp {
	type Output = RegExp;

	fn bitor(self, rhs: RegExp) -> RegExp {
		self.or(rhs)
	}
}

impl From<char> for RegExp {
	fn from(c: char) -> RegExp {
		RegExp::single(c)
	}
}

impl fmt::Display for RegExp {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			RegExp::Scalar(class) => class.fmt(f),
			RegExp::Concatenation(a, b) => write!(f, "{}{}", a, b),
			RegExp::Alternation(a, b) => write!(f, "({} | {})", a, b),
			RegExp::Closure(a) => match a.as_ref() {
				RegExp::Scalar(class) => write!(f, "{}*", class),
				a => write!(f, "({})*", a),
			},
		}
	}
}
