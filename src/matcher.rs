use std::fmt;

/// A predicate over alphabet symbols.
///
/// Automaton transitions are keyed by matchers rather than by raw symbols,
/// so a single edge can cover a whole class of symbols.
pub trait Matcher {
	type Element;

	fn matches(&self, e: &Self::Element) -> bool;
}

/// A class of unicode scalars: an exact scalar or an inclusive range.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ScalarClass {
	Single(char),
	Range(char, char),
}

impl Matcher for ScalarClass {
	type Element = char;

	fn matches(&self, c: &char) -> bool {
		match self {
			ScalarClass::Single(s) => c == s,
			ScalarClass::Range(first, last) => first <= c && c <= last,
		}
	}
}

impl From<char> for ScalarClass {
	fn from(c: char) -> ScalarClass {
		ScalarClass::Single(c)
	}
}

pub struct DisplayChar(pub char);

impl fmt::Display for DisplayChar {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let c = self.0;
		match c {
			'\\' => write!(f, "\\\\"),
			'\r' => write!(f, "\\r"),
			'\n' => write!(f, "\\n"),
			' ' => write!(f, "\\s"),
			'\t' => write!(f, "\\t"),
			_ if c.is_control() => {
				let d = c as u32;
				if d <= 0xff {
					write!(f, "\\x{:02x}", d)
				} else if d <= 0xffff {
					write!(f, "\\u{:04x}", d)
				} else {
					write!(f, "\\U{:08x}", d)
				}
			}
			_ => c.fmt(f),
		}
	}
}

impl fmt::Display for ScalarClass {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ScalarClass::Single(c) => DisplayChar(*c).fmt(f),
			ScalarClass::Range(first, last) => {
				write!(f, "[{}-{}]", DisplayChar(*first), DisplayChar(*last))
			}
		}
	}
}
