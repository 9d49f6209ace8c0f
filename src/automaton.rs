use std::fmt;

mod dfa;
mod nfa;

pub use dfa::DFA;
pub use nfa::NFA;

/// Determinization errors.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Error<T> {
	/// Two distinct accepting values ended up in the same deterministic
	/// state and cannot be told apart.
	AmbiguousAccept(T, T),
}

impl<T: fmt::Debug> fmt::Display for Error<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::AmbiguousAccept(a, b) => {
				write!(f, "inseparable accepting values {:?} and {:?}", a, b)
			}
		}
	}
}

impl<T: fmt::Debug> std::error::Error for Error<T> {}
