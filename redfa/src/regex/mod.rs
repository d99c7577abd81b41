//! # Regular expressions in postfix form
//! A [`Regex`] is the result of [parsing](crate::parser::regex) a surface expression: a flat
//! postfix (reverse Polish) token stream over the reduced operator set `{., |, *, +, ?}` plus
//! literal symbols and ε. Postfix form permits linear left-to-right evaluation with a stack,
//! which is exactly how the Thompson construction in [`Regex::to_nfa`] consumes it.
//!
//! ```
//! use redfa::parser;
//!
//! let regex = parser::regex("0*1(0|ε)").unwrap();
//! assert_eq!(regex.to_string(), "0*1.0ε|.");
//!
//! let nfa = regex.to_nfa().unwrap();
//! assert!(nfa.accepts_graphemes("1"));
//! assert!(nfa.accepts_graphemes("0001"));
//! assert!(nfa.accepts_graphemes("10"));
//! assert!(!nfa.accepts_graphemes("100"));
//! ```
//!
//! The construction composes small single-entry/single-exit fragments, allocating fresh states
//! for every rule and never repurposing the states of an inner fragment. The resulting ε-NFA
//! therefore has exactly one accepting state. A stream that underflows the fragment stack, or
//! leaves more than one fragment on it, is rejected with [`MalformedPostfixError`]; streams
//! produced by the parser are always well-formed.

use crate::nfa::{Nfa, NfaState};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// One token of a postfix stream: a literal symbol, ε, or one of the five operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(Rc<str>),
    Epsilon,
    Concat,
    Alt,
    Star,
    Plus,
    Question,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(symbol) => f.write_str(symbol),
            Token::Epsilon => f.write_str("ε"),
            Token::Concat => f.write_str("."),
            Token::Alt => f.write_str("|"),
            Token::Star => f.write_str("*"),
            Token::Plus => f.write_str("+"),
            Token::Question => f.write_str("?"),
        }
    }
}

/// A regular expression, held as its postfix token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pub postfix: Vec<Token>,
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.postfix {
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// An error raised when a postfix stream does not describe exactly one expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedPostfixError {
    #[error("operator '{0}' has too few operands")]
    StackUnderflow(Token),
    #[error("postfix stream left {0} fragments on the stack instead of 1")]
    LeftoverFragments(usize),
}

/// A partially built NFA during Thompson construction: the entry state and the exit states
/// still to be wired into the enclosing fragment.
struct Fragment {
    start: usize,
    exits: Vec<usize>,
}

fn fresh_state(states: &mut Vec<NfaState>, alphabet_len: usize) -> usize {
    let idx = states.len();
    states.push(NfaState {
        name: Rc::from(format!("s{idx}")),
        initial: false,
        accepting: false,
        epsilon_transitions: Vec::new(),
        transitions: vec![Vec::new(); alphabet_len],
    });
    idx
}

fn pop(stack: &mut Vec<Fragment>, operator: &Token) -> Result<Fragment, MalformedPostfixError> {
    stack
        .pop()
        .ok_or_else(|| MalformedPostfixError::StackUnderflow(operator.clone()))
}

impl Regex {
    /// Builds an ε-NFA from this expression using the Thompson construction. The automaton has
    /// exactly one initial and one accepting state, and its alphabet is the sorted set of
    /// distinct literal symbols of the stream (ε excluded).
    ///
    /// ```
    /// use redfa::parser;
    ///
    /// let nfa = parser::regex("(ab)+").unwrap().to_nfa().unwrap();
    /// assert_eq!(nfa.alphabet().len(), 2);
    /// assert!(nfa.accepts_graphemes("abab"));
    /// assert!(!nfa.accepts_graphemes(""));
    /// ```
    pub fn to_nfa(&self) -> Result<Nfa, MalformedPostfixError> {
        let alphabet: Rc<[Rc<str>]> = self
            .postfix
            .iter()
            .filter_map(|token| match token {
                Token::Literal(symbol) => Some(symbol.clone()),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: HashMap<Rc<str>, usize> = alphabet
            .iter()
            .enumerate()
            .map(|(idx, symbol)| (symbol.clone(), idx))
            .collect();

        let mut states: Vec<NfaState> = Vec::new();
        let mut stack: Vec<Fragment> = Vec::new();

        for token in &self.postfix {
            match token {
                Token::Literal(symbol) => {
                    let start = fresh_state(&mut states, alphabet.len());
                    let end = fresh_state(&mut states, alphabet.len());
                    states[start].transitions[index[symbol]].push(end);
                    stack.push(Fragment {
                        start,
                        exits: vec![end],
                    });
                }
                Token::Epsilon => {
                    let start = fresh_state(&mut states, alphabet.len());
                    let end = fresh_state(&mut states, alphabet.len());
                    states[start].epsilon_transitions.push(end);
                    stack.push(Fragment {
                        start,
                        exits: vec![end],
                    });
                }
                Token::Concat => {
                    let second = pop(&mut stack, token)?;
                    let first = pop(&mut stack, token)?;
                    for &exit in &first.exits {
                        states[exit].epsilon_transitions.push(second.start);
                    }
                    stack.push(Fragment {
                        start: first.start,
                        exits: second.exits,
                    });
                }
                Token::Alt => {
                    let second = pop(&mut stack, token)?;
                    let first = pop(&mut stack, token)?;
                    let start = fresh_state(&mut states, alphabet.len());
                    let end = fresh_state(&mut states, alphabet.len());
                    states[start]
                        .epsilon_transitions
                        .extend([first.start, second.start]);
                    for &exit in first.exits.iter().chain(&second.exits) {
                        states[exit].epsilon_transitions.push(end);
                    }
                    stack.push(Fragment {
                        start,
                        exits: vec![end],
                    });
                }
                Token::Star => {
                    let inner = pop(&mut stack, token)?;
                    let start = fresh_state(&mut states, alphabet.len());
                    let end = fresh_state(&mut states, alphabet.len());
                    states[start]
                        .epsilon_transitions
                        .extend([inner.start, end]);
                    for &exit in &inner.exits {
                        states[exit].epsilon_transitions.extend([inner.start, end]);
                    }
                    stack.push(Fragment {
                        start,
                        exits: vec![end],
                    });
                }
                Token::Plus => {
                    // Like star, but without the ε edge skipping the body: one pass is mandatory
                    let inner = pop(&mut stack, token)?;
                    let start = fresh_state(&mut states, alphabet.len());
                    let end = fresh_state(&mut states, alphabet.len());
                    states[start].epsilon_transitions.push(inner.start);
                    for &exit in &inner.exits {
                        states[exit].epsilon_transitions.extend([inner.start, end]);
                    }
                    stack.push(Fragment {
                        start,
                        exits: vec![end],
                    });
                }
                Token::Question => {
                    let inner = pop(&mut stack, token)?;
                    let start = fresh_state(&mut states, alphabet.len());
                    let end = fresh_state(&mut states, alphabet.len());
                    states[start]
                        .epsilon_transitions
                        .extend([inner.start, end]);
                    for &exit in &inner.exits {
                        states[exit].epsilon_transitions.push(end);
                    }
                    stack.push(Fragment {
                        start,
                        exits: vec![end],
                    });
                }
            }
        }

        let Some(fragment) = stack.pop() else {
            return Err(MalformedPostfixError::LeftoverFragments(0));
        };
        if !stack.is_empty() {
            return Err(MalformedPostfixError::LeftoverFragments(stack.len() + 1));
        }

        states[fragment.start].initial = true;
        for &exit in &fragment.exits {
            states[exit].accepting = true;
        }
        Ok(Nfa {
            alphabet,
            states,
            initial_state: fragment.start,
        })
    }
}
