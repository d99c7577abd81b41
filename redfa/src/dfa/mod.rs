//! # Deterministic Finite Automaton
//! The DFA module includes the [`Dfa`] struct, which represents a deterministic finite
//! automaton. Instances are created by the [subset construction](crate::nfa::Nfa::to_dfa), by
//! [Hopcroft minimization](Dfa::minimized) or by reading back a serialized
//! [`Record`](crate::format::Record).
//!
//! Transitions are *partial*: a state need not have a move on every symbol. Running into a
//! missing transition (or a symbol outside the alphabet) rejects the input but is not an
//! error — the simulation simply reports the states visited up to that point.
//!
//! ## Example
//! ```
//! use redfa::parser;
//!
//! let dfa = parser::regex("a|b").unwrap().to_nfa().unwrap().to_dfa();
//! assert_eq!(dfa.states().len(), 3);
//!
//! // q1 and q2 are not distinguishable, so the minimal DFA merges them into m0
//! let minimal = dfa.minimized();
//! assert_eq!(minimal.states().len(), 2);
//! assert!(minimal.accepts_graphemes("a"));
//! assert!(!minimal.accepts_graphemes("ab"));
//!
//! let run = minimal.simulate_graphemes("a");
//! assert!(run.accepted);
//! let path: Vec<&str> = run.path.iter().map(|s| s.as_ref()).collect();
//! assert_eq!(path, ["q0", "m0"]);
//! ```
//!
//! ## Minimization
//! [`Dfa::minimized`] produces a fresh automaton: it discards the states unreachable from the
//! initial state (found breadth-first), then refines the accepting/non-accepting partition with
//! Hopcroft's algorithm until no block can be split, and finally contracts each block to a
//! single state. A block of one state keeps its name; merged blocks are named `m0, m1, …` in
//! the order the final partition is enumerated. The result is the unique minimal DFA for the
//! language, up to state naming.
//!
//! ## Equivalence
//! [`Dfa::equivalent_to`] checks language equality by walking reachable state pairs, without
//! building any product automaton. The test-suite leans on it for the minimality and
//! idempotence properties.

use crate::nfa::{Nfa, NfaState};
use crate::util::{alphabet_equal, sorted_symbol_indices};
pub use eval::{DfaEvaluator, Run};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub mod eval;

/// A deterministic finite automaton, defined by its alphabet, its states (one of which is
/// initial, some of which are accepting) and a partial transition function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial_state: usize,
}

/// A state in a DFA: its name, whether it is initial or accepting, and at most one target
/// state per element of the alphabet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) name: Rc<str>,
    pub(crate) initial: bool,
    pub(crate) accepting: bool,
    pub(crate) transitions: Vec<Option<usize>>,
}

impl DfaState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if this state is the initial state
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Gets the transitions of this state, one optional target per element of the alphabet,
    /// in the alphabet's ordering
    pub fn transitions(&self) -> &[Option<usize>] {
        self.transitions.as_slice()
    }
}

impl From<DfaState> for NfaState {
    fn from(value: DfaState) -> Self {
        let DfaState {
            name,
            initial,
            accepting,
            transitions,
        } = value;
        NfaState {
            name,
            initial,
            accepting,
            epsilon_transitions: vec![],
            transitions: transitions
                .into_iter()
                .map(|target| target.into_iter().collect())
                .collect(),
        }
    }
}

impl From<Dfa> for Nfa {
    fn from(value: Dfa) -> Self {
        value.to_nfa()
    }
}

/// An error raised when an input string contains a symbol outside a DFA's alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("symbol '{symbol}' is not part of the alphabet")]
pub struct UnknownSymbolError {
    pub symbol: String,
}

impl Dfa {
    /// Returns the unique (up to state naming) minimal DFA accepting the same language as this
    /// one. This automaton is left untouched.
    ///
    /// ```
    /// use redfa::parser;
    ///
    /// let dfa = parser::regex("(a|b)*abb").unwrap().to_nfa().unwrap().to_dfa();
    /// let minimal = dfa.minimized();
    /// assert_eq!(minimal.states().len(), 4);
    /// assert!(minimal.equivalent_to(&dfa));
    /// ```
    pub fn minimized(&self) -> Dfa {
        let reachable = self.reachable_in_bfs_order();
        let accepting: BTreeSet<usize> = reachable
            .iter()
            .copied()
            .filter(|&q| self.states[q].accepting)
            .collect();

        // A DFA without reachable accepting states recognizes the empty language: one dead
        // state, no transitions, nothing to refine
        if accepting.is_empty() {
            let name: Rc<str> = if reachable.len() == 1 {
                self.states[self.initial_state].name.clone()
            } else {
                Rc::from("m0")
            };
            return Dfa {
                alphabet: self.alphabet.clone(),
                states: vec![DfaState {
                    name,
                    initial: true,
                    accepting: false,
                    transitions: vec![None; self.alphabet.len()],
                }],
                initial_state: 0,
            };
        }

        let rest: BTreeSet<usize> = reachable
            .iter()
            .copied()
            .filter(|&q| !self.states[q].accepting)
            .collect();
        let mut partition: Vec<BTreeSet<usize>> = vec![accepting.clone()];
        if !rest.is_empty() {
            partition.push(rest);
        }
        let mut worklist: Vec<BTreeSet<usize>> = vec![accepting];
        let symbol_order = sorted_symbol_indices(&self.alphabet);

        while let Some(splitter) = worklist.pop() {
            for &sym in &symbol_order {
                // Preimage of the splitter under this symbol
                let image: BTreeSet<usize> = reachable
                    .iter()
                    .copied()
                    .filter(|&q| {
                        self.states[q].transitions[sym].map_or(false, |t| splitter.contains(&t))
                    })
                    .collect();
                if image.is_empty() {
                    continue;
                }
                let mut next_partition = Vec::with_capacity(partition.len());
                for block in partition {
                    let inside: BTreeSet<usize> = block.intersection(&image).copied().collect();
                    let outside: BTreeSet<usize> = block.difference(&image).copied().collect();
                    if inside.is_empty() || outside.is_empty() {
                        next_partition.push(block);
                        continue;
                    }
                    if let Some(pos) = worklist.iter().position(|b| *b == block) {
                        worklist.remove(pos);
                        worklist.push(inside.clone());
                        worklist.push(outside.clone());
                    } else if inside.len() <= outside.len() {
                        worklist.push(inside.clone());
                    } else {
                        worklist.push(outside.clone());
                    }
                    next_partition.push(inside);
                    next_partition.push(outside);
                }
                partition = next_partition;
            }
        }

        let mut block_of: HashMap<usize, usize> = HashMap::new();
        for (idx, block) in partition.iter().enumerate() {
            for &q in block {
                block_of.insert(q, idx);
            }
        }

        let mut merged = 0usize;
        let mut states = Vec::with_capacity(partition.len());
        let mut initial_block = 0usize;
        for (idx, block) in partition.iter().enumerate() {
            // Blocks are never empty
            let rep = block.iter().copied().next().unwrap_or(self.initial_state);
            let name: Rc<str> = if block.len() == 1 {
                self.states[rep].name.clone()
            } else {
                let n = merged;
                merged += 1;
                Rc::from(format!("m{n}"))
            };
            if block.contains(&self.initial_state) {
                initial_block = idx;
            }
            let transitions = (0..self.alphabet.len())
                .map(|sym| {
                    self.states[rep].transitions[sym].and_then(|t| block_of.get(&t).copied())
                })
                .collect();
            states.push(DfaState {
                name,
                initial: block.contains(&self.initial_state),
                accepting: self.states[rep].accepting,
                transitions,
            });
        }

        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: initial_block,
        }
    }

    /// The states reachable from the initial state, in breadth-first discovery order.
    fn reachable_in_bfs_order(&self) -> Vec<usize> {
        let mut order = vec![self.initial_state];
        let mut seen = HashSet::from([self.initial_state]);
        let mut head = 0;
        while head < order.len() {
            let q = order[head];
            head += 1;
            for &target in self.states[q].transitions.iter().flatten() {
                if seen.insert(target) {
                    order.push(target);
                }
            }
        }
        order
    }

    /// Finds the states unreachable from the initial state
    pub fn unreachable_states(&self) -> Vec<&DfaState> {
        let reachable: HashSet<usize> = self.reachable_in_bfs_order().into_iter().collect();
        (0..self.states.len())
            .filter(|idx| !reachable.contains(idx))
            .map(|idx| &self.states[idx])
            .collect()
    }

    /// Runs the DFA over a string of symbols, recording every state visited. The walk starts
    /// at the initial state; a symbol outside the alphabet or a missing transition stops it,
    /// and the input is rejected with the partial path.
    ///
    /// ```
    /// use redfa::parser;
    ///
    /// let dfa = parser::regex("ab").unwrap().to_nfa().unwrap().to_dfa().minimized();
    /// let run = dfa.simulate(&["a", "b"]);
    /// assert!(run.accepted);
    /// assert_eq!(run.path.len(), 3);
    ///
    /// // 'c' is not part of the alphabet: the path ends where the walk got stuck
    /// let run = dfa.simulate(&["a", "c"]);
    /// assert!(!run.accepted);
    /// assert_eq!(run.path.len(), 2);
    /// ```
    pub fn simulate(&self, symbols: &[&str]) -> Run {
        let mut eval = self.evaluator();
        let mut path = vec![self.states[self.initial_state].name.clone()];
        for symbol in symbols {
            match eval.step(symbol) {
                Some(state) => path.push(state.name.clone()),
                None => {
                    return Run {
                        path,
                        accepted: false,
                    }
                }
            }
        }
        Run {
            path,
            accepted: eval.is_accepting(),
        }
    }

    /// Like [`Dfa::simulate`], treating every extended grapheme cluster of the input as one
    /// symbol
    pub fn simulate_graphemes(&self, input: &str) -> Run {
        let graphemes = input.graphemes(true).collect::<Vec<_>>();
        self.simulate(&graphemes)
    }

    /// Splits a string into alphabet symbols, one extended grapheme cluster each, failing on
    /// the first symbol that is not part of the alphabet
    pub fn symbols_of<'a>(&self, input: &'a str) -> Result<Vec<&'a str>, UnknownSymbolError> {
        input
            .graphemes(true)
            .map(|g| {
                self.alphabet
                    .iter()
                    .any(|s| s.as_ref() == g)
                    .then_some(g)
                    .ok_or_else(|| UnknownSymbolError {
                        symbol: g.to_string(),
                    })
            })
            .collect()
    }

    /// Checks if this automaton accepts the given string of symbols
    pub fn accepts(&self, string: &[&str]) -> bool {
        let mut eval = self.evaluator();
        eval.step_multiple(string);
        eval.is_accepting()
    }

    /// Checks if this automaton accepts the given string, treating every extended grapheme
    /// cluster as one symbol. See [`Dfa::graphemes_only`]
    pub fn accepts_graphemes(&self, string: &str) -> bool {
        let graphemes = string.graphemes(true).collect::<Vec<_>>();
        self.accepts(&graphemes)
    }

    /// Checks if the alphabet of this automaton consists of single grapheme clusters only
    pub fn graphemes_only(&self) -> bool {
        self.alphabet.iter().all(|s| s.graphemes(true).count() == 1)
    }

    /// Gets an evaluator, which is a struct that is used to evaluate strings with the automaton
    pub fn evaluator(&self) -> DfaEvaluator<'_> {
        self.into()
    }

    /// Checks if this DFA is equivalent to another DFA, that is, if they accept the same
    /// language. DFAs over different alphabets are never equivalent, but the order of the
    /// alphabet, the number of states and the state names don't matter. Missing transitions
    /// are treated as moves into an implicit dead state.
    pub fn equivalent_to(&self, other: &Dfa) -> bool {
        if !alphabet_equal(&self.alphabet, &other.alphabet) {
            return false;
        }
        let translation: Vec<Option<usize>> = self
            .alphabet
            .iter()
            .map(|symbol| other.alphabet.iter().position(|o| o == symbol))
            .collect();

        let start = (Some(self.initial_state), Some(other.initial_state));
        let mut to_explore = vec![start];
        let mut explored = HashSet::from([start]);

        while let Some((s1, s2)) = to_explore.pop() {
            let a1 = s1.map_or(false, |q| self.states[q].accepting);
            let a2 = s2.map_or(false, |q| other.states[q].accepting);
            if a1 != a2 {
                return false;
            }
            for (sym, translated) in translation.iter().enumerate() {
                let Some(other_sym) = translated else {
                    return false;
                };
                let d1 = s1.and_then(|q| self.states[q].transitions[sym]);
                let d2 = s2.and_then(|q| other.states[q].transitions[*other_sym]);
                if explored.insert((d1, d2)) {
                    to_explore.push((d1, d2));
                }
            }
        }
        true
    }

    /// Converts this DFA to an NFA by converting each state on its own: every defined
    /// transition becomes a one-element target set, missing ones become empty sets. State
    /// names are kept, so this is a cheap operation
    pub fn to_nfa(self) -> Nfa {
        let Dfa {
            alphabet,
            states,
            initial_state,
        } = self;
        let states = states.into_iter().map(Into::into).collect();
        Nfa {
            alphabet,
            states,
            initial_state,
        }
    }

    /// Gets the alphabet of this DFA
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this DFA
    pub fn initial_state(&self) -> &DfaState {
        &self.states[self.initial_state]
    }

    /// Get the index of the initial state of this DFA
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }
}
