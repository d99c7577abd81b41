use crate::nfa::{Nfa, NfaState};
use std::collections::{HashMap, HashSet};

/// Step-by-step evaluation of an NFA: tracks the ε-closed set of states the automaton is in
/// after the symbols seen so far. Stepping on a symbol outside the alphabet empties the set,
/// after which nothing is accepted.
#[derive(Clone, Debug)]
pub struct NfaEvaluator<'a> {
    nfa: &'a Nfa,
    rev_map: HashMap<&'a str, usize>,
    current_states: HashSet<usize>,
}

impl<'a> NfaEvaluator<'a> {
    pub fn is_accepting(&self) -> bool {
        self.current_states().iter().any(|s| s.accepting)
    }

    pub fn current_states(&self) -> Vec<&NfaState> {
        self.current_states
            .iter()
            .map(|&s| &self.nfa.states[s])
            .collect()
    }

    pub fn current_states_idx(&self) -> &HashSet<usize> {
        &self.current_states
    }

    /// Advances over one symbol: moves every current state on the symbol, then closes the
    /// result under ε-transitions. A symbol outside the alphabet strands the evaluator in the
    /// empty state set and returns `None`.
    pub fn step(&mut self, elem: &str) -> Option<()> {
        let Some(&idx) = self.rev_map.get(elem) else {
            self.current_states.clear();
            return None;
        };
        let moved: Vec<usize> = self
            .current_states
            .iter()
            .flat_map(|&state| self.nfa.states[state].transitions[idx].iter().copied())
            .collect();
        self.current_states = self.nfa.closure_of(&moved).into_iter().collect();
        Some(())
    }

    pub fn step_multiple(&mut self, elems: &[&str]) -> Option<()> {
        elems.iter().try_for_each(|e| self.step(e))
    }
}

impl<'a> From<&'a Nfa> for NfaEvaluator<'a> {
    fn from(value: &'a Nfa) -> Self {
        let rev_map = value
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, c)| (c as &str, idx))
            .collect();
        Self {
            nfa: value,
            rev_map,
            current_states: value
                .closure_of(&[value.initial_state])
                .into_iter()
                .collect(),
        }
    }
}
