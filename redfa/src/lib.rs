//!# redfa
//!
//! `redfa` is a Rust library that compiles regular expressions over a finite symbol set into the
//! smallest deterministic finite automaton (DFA) recognizing the same language, and simulates that
//! DFA over input strings, reporting an accept/reject verdict together with the exact sequence of
//! states visited.
//!
//! ## Usage
//!
//! ```rust
//! use redfa::parser;
//!
//! fn main() {
//!     // Translating the surface syntax to postfix form normalizes alternation,
//!     // closures, grouping, bracket classes and bounded repetition down to the
//!     // reduced operator set {., |, *, +, ?, literal, ε}
//!     let regex = parser::regex("(a|b)*abb").unwrap();
//!     assert_eq!(regex.to_string(), "ab|*a.b.b.");
//!
//!     // Thompson construction gives an ε-NFA with a single accepting state
//!     let nfa = regex.to_nfa().unwrap();
//!
//!     // The subset construction gives a DFA, and Hopcroft's algorithm contracts
//!     // it to the unique minimal DFA. For this regex the textbook answer has
//!     // exactly four states
//!     let dfa = nfa.to_dfa();
//!     let minimal = dfa.minimized();
//!     assert_eq!(minimal.states().len(), 4);
//!
//!     assert!(minimal.accepts_graphemes("abb"));
//!     assert!(minimal.accepts_graphemes("aababb"));
//!     assert!(!minimal.accepts_graphemes("abba"));
//!
//!     // Simulation reports the visited states, not just the verdict
//!     let run = minimal.simulate_graphemes("abb");
//!     assert!(run.accepted);
//!     assert_eq!(run.path.len(), 4);
//! }
//! ```
//!
//! ## Pipeline
//!
//! The library is organized as a pipeline of pure stages, each producing a fresh value that the
//! next stage consumes:
//!
//! * [Parsing and desugaring](parser::regex) the surface regex to a postfix token stream
//! * [Thompson construction](regex::Regex::to_nfa) of an ε-NFA from the postfix stream
//! * [Subset construction](nfa::Nfa::to_dfa) of a DFA from the ε-NFA
//! * [Hopcroft minimization](dfa::Dfa::minimized) of the DFA
//! * [Simulation](dfa::Dfa::simulate) of input strings, with the visited path
//! * [Serialization](format) of any automaton to a JSON record or a Graphviz DOT graph
//!
//! Matching is anchored: an automaton accepts a string iff the whole string is in the language.
//! There is no support for backreferences, lookaround, captures or searching within a string.
//!
//! ## Surface syntax
//!
//! The operators recognized on the surface are `|` (alternation), implicit concatenation,
//! the postfix unaries `*`, `+` and `?`, grouping `(`/`)`, bracket classes `[abc]`/`[a-z]`,
//! bounded repetition `{n}`/`{n,m}` (upper bound capped at 20), the wildcard `.` (ASCII letters
//! and digits) and `\`-escapes. The letter `e` and the character `ε` both denote the empty
//! string. Expressions are capped at 1000 characters.
//!
//! All observable iteration orders are deterministic: compiling the same expression twice
//! produces byte-identical serialized output.

pub mod dfa;
pub mod format;
pub mod nfa;
pub mod parser;
pub mod regex;
mod util;

#[cfg(test)]
mod tests;
