use crate::{
	automaton::{Error, DFA, NFA},
	matcher::ScalarClass,
	regexp::RegExp,
};

/// Maximal-munch tokenizer over a set of token regular expressions and a
/// trivia expression for the input to skip between tokens.
pub struct Tokenizer<T> {
	tokens: DFA<T, ScalarClass>,
	trivia: DFA<bool, ScalarClass>,
}

impl<T: Clone + Ord> Tokenizer<T> {
	/// Compiles the token and trivia automata.
	///
	/// Fails when two token kinds cannot be told apart, that is when some
	/// input is accepted by both of their expressions.
	pub fn new(tokens: &[(RegExp, T)], trivia: &RegExp) -> Result<Tokenizer<T>, Error<T>> {
		let tokens = NFA::scanner(tokens).determinize_consistent()?.minimized();
		let trivia = trivia.nfa().determinize().resolved().minimized();
		Ok(Tokenizer { tokens, trivia })
	}

	/// Splits `source` into token and unknown spans, dropping trivia.
	///
	/// A span of kind `None` covers input no token or trivia expression
	/// matches; consecutive unknown scalars coalesce into one span.
	/// Zero-length matches are treated as absent so the cursor always
	/// advances.
	pub fn tokenize<'a>(&self, source: &'a str) -> Vec<(Option<T>, &'a str)> {
		let mut spans = Vec::new();
		let mut pos = 0;
		let mut unknown = 0;
		while pos < source.len() {
			let rest = &source[pos..];
			match self.trivia.prefix_match(rest.chars()) {
				Some((_, len)) if len > 0 => {
					if unknown < pos {
						spans.push((None, &source[unknown..pos]));
					}
					pos += byte_length(rest, len);
					unknown = pos;
					continue;
				}
				_ => (),
			}
			match self.tokens.prefix_match(rest.chars()) {
				Some((value, len)) if len > 0 => {
					if unknown < pos {
						spans.push((None, &source[unknown..pos]));
					}
					let bytes = byte_length(rest, len);
					spans.push((Some(value.clone()), &source[pos..pos + bytes]));
					pos += bytes;
					unknown = pos;
					continue;
				}
				_ => (),
			}
			pos += match rest.chars().next() {
				Some(c) => c.len_utf8(),
				None => break,
			};
		}
		if unknown < pos {
			spans.push((None, &source[unknown..pos]));
		}
		spans
	}
}

/// Byte length of the first `chars` scalars of `s`.
fn byte_length(s: &str, chars: usize) -> usize {
	s.char_indices()
		.nth(chars)
		.map(|(i, _)| i)
		.unwrap_or_else(|| s.len())
}
