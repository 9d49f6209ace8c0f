pub mod automaton;
pub mod grammar;
pub mod matcher;
pub mod parsing;
pub mod regexp;
pub mod tokenizer;

pub use automaton::{DFA, NFA};
pub use grammar::{Grammar, Node};
pub use matcher::{Matcher, ScalarClass};
pub use parsing::{Action, Item, LLParser, LRParser};
pub use regexp::RegExp;
pub use tokenizer::Tokenizer;
