//! # Nondeterministic Finite Automaton, with or without ε-moves
//! The NFA module includes the [`Nfa`] struct, which represents a nondeterministic finite
//! automaton with or without ε-moves. Instances are created by the
//! [Thompson construction](crate::regex::Regex::to_nfa) or by reading back a serialized
//! [`Record`](crate::format::Record).
//!
//! ## Example
//! ```
//! use redfa::parser;
//!
//! // (a|b)*abb accepts every string over {a, b} ending in "abb"
//! let nfa = parser::regex("(a|b)*abb").unwrap().to_nfa().unwrap();
//! assert!(nfa.accepts_graphemes("abb"));
//! assert!(nfa.accepts_graphemes("babb"));
//! assert!(!nfa.accepts_graphemes("abba"));
//!
//! // The subset construction names the DFA states q0, q1, … in discovery order
//! let dfa = nfa.to_dfa();
//! assert_eq!(dfa.states()[0].name(), "q0");
//! assert!(dfa.accepts_graphemes("aabb"));
//! ```
//!
//! ## Operations
//! Word acceptance is checked with [`Nfa::accepts`] (a list of symbols) or
//! [`Nfa::accepts_graphemes`] (a string split into extended grapheme clusters, one symbol per
//! cluster; see [`Nfa::graphemes_only`]). Internally a [`NfaEvaluator`] tracks the ε-closed set
//! of current states; it can be driven step by step via [`Nfa::evaluator`].
//!
//! [`Nfa::to_dfa`] runs the subset construction: DFA states correspond to the ε-closed subsets
//! of NFA states that are actually reachable, discovered in breadth-first order while iterating
//! the alphabet in sorted order, so the resulting names are deterministic. Transitions whose
//! target subset would be empty are simply left out, so the DFA may be partial.
//!
//! ε-closures are computed on demand by a depth-first walk over the ε-edges; there is no memo
//! table to invalidate while an automaton is still under construction.

use crate::dfa::{Dfa, DfaState};
use crate::util::sorted_symbol_indices;
pub use eval::NfaEvaluator;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

pub mod eval;

/// A nondeterministic finite automaton, denoted by its alphabet, states and initial state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<NfaState>,
    pub(crate) initial_state: usize,
}

/// A state in an NFA: its name, whether it is initial or accepting, its ε-transitions and one
/// set of transitions per element of the alphabet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NfaState {
    pub(crate) name: Rc<str>,
    pub(crate) initial: bool,
    pub(crate) accepting: bool,
    pub(crate) epsilon_transitions: Vec<usize>,
    pub(crate) transitions: Vec<Vec<usize>>,
}

impl NfaState {
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

    /// Gets a list of transitions, as sets of state indices for each element of the alphabet,
    /// in the alphabet's ordering
    pub fn transitions(&self) -> &[Vec<usize>] {
        self.transitions.as_slice()
    }

    /// Gets the epsilon transitions as a set of state indices
    pub fn epsilon_transitions(&self) -> &[usize] {
        self.epsilon_transitions.as_slice()
    }
}

impl Nfa {
    /// Converts this NFA to a DFA using the subset construction. The first discovered state is
    /// named `q0` (the ε-closure of the initial state), and every newly discovered subset gets
    /// the next sequential name while the worklist is processed in FIFO order and the alphabet
    /// is iterated in sorted order. A DFA state is accepting iff its subset contains an
    /// accepting NFA state. Symbols on which no NFA state of the subset can move produce no
    /// transition at all.
    pub fn to_dfa(&self) -> Dfa {
        let symbol_order = sorted_symbol_indices(&self.alphabet);

        let start = self.closure_of(&[self.initial_state]);
        let mut subset_ids: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut dfa_states: Vec<DfaState> = Vec::new();
        let mut queue: VecDeque<Vec<usize>> = VecDeque::new();

        dfa_states.push(self.subset_state(0, &start));
        subset_ids.insert(start.clone(), 0);
        queue.push_back(start);

        while let Some(subset) = queue.pop_front() {
            let src = subset_ids[&subset];
            for &sym in &symbol_order {
                let moved: Vec<usize> = subset
                    .iter()
                    .flat_map(|&q| self.states[q].transitions[sym].iter().copied())
                    .collect();
                if moved.is_empty() {
                    continue;
                }
                let target = self.closure_of(&moved);
                let dst = match subset_ids.get(&target) {
                    Some(&idx) => idx,
                    None => {
                        let idx = dfa_states.len();
                        dfa_states.push(self.subset_state(idx, &target));
                        subset_ids.insert(target.clone(), idx);
                        queue.push_back(target);
                        idx
                    }
                };
                dfa_states[src].transitions[sym] = Some(dst);
            }
        }

        Dfa {
            alphabet: self.alphabet.clone(),
            states: dfa_states,
            initial_state: 0,
        }
    }

    fn subset_state(&self, idx: usize, subset: &[usize]) -> DfaState {
        DfaState {
            name: Rc::from(format!("q{idx}")),
            initial: idx == 0,
            accepting: subset.iter().any(|&q| self.states[q].accepting),
            transitions: vec![None; self.alphabet.len()],
        }
    }

    /// Checks if this automaton accepts the given string of symbols. This is equivalent to
    /// getting the evaluator, stepping it over the symbols and checking if it is accepting
    pub fn accepts(&self, string: &[&str]) -> bool {
        let mut eval = self.evaluator();
        eval.step_multiple(string);
        eval.is_accepting()
    }

    /// Checks if this automaton accepts the given string, treating every extended grapheme
    /// cluster as one symbol. Symbols spanning multiple clusters won't be recognized; see
    /// [`Nfa::graphemes_only`]
    pub fn accepts_graphemes(&self, string: &str) -> bool {
        let graphemes = string.graphemes(true).collect::<Vec<_>>();
        self.accepts(&graphemes)
    }

    /// Checks if the alphabet of this automaton consists of single grapheme clusters only, in
    /// which case [`Nfa::accepts_graphemes`] recognizes every symbol
    pub fn graphemes_only(&self) -> bool {
        self.alphabet.iter().all(|s| s.graphemes(true).count() == 1)
    }

    /// Checks if this automaton has any ε-moves
    pub fn has_epsilon_moves(&self) -> bool {
        self.states
            .iter()
            .any(|state| !state.epsilon_transitions.is_empty())
    }

    /// Gets an evaluator, which is a struct that is used to check strings against the automaton
    pub fn evaluator(&self) -> NfaEvaluator<'_> {
        self.into()
    }

    /// Gives the ε-closure of a state, given the state index
    pub fn closure(&self, start: usize) -> Option<HashSet<usize>> {
        (start < self.states.len()).then(|| self.closure_of(&[start]).into_iter().collect())
    }

    /// The ε-closure of a set of states as a sorted index vector, suitable as a subset key.
    /// Computed by a depth-first walk over the ε-edges.
    pub(crate) fn closure_of(&self, seed: &[usize]) -> Vec<usize> {
        let mut all: HashSet<usize> = seed.iter().copied().collect();
        let mut stack: Vec<usize> = seed.to_vec();
        while let Some(state) = stack.pop() {
            for &next in &self.states[state].epsilon_transitions {
                if all.insert(next) {
                    stack.push(next);
                }
            }
        }
        let mut sorted: Vec<usize> = all.into_iter().collect();
        sorted.sort_unstable();
        sorted
    }

    /// Gets the alphabet of this NFA
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the states of this NFA
    pub fn states(&self) -> &[NfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this NFA
    pub fn initial_state(&self) -> &NfaState {
        &self.states[self.initial_state]
    }

    /// Get the index of the initial state of this NFA
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }
}
