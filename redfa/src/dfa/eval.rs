use crate::dfa::{Dfa, DfaState};
use std::collections::HashMap;
use std::rc::Rc;

/// The result of running a DFA over an input: the ordered list of state names visited
/// (starting at the initial state) and whether the input was accepted. An input that cannot be
/// fully consumed is rejected with the partial path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub path: Vec<Rc<str>>,
    pub accepted: bool,
}

/// Step-by-step evaluation of a DFA: tracks the current state, if any. Once a symbol outside
/// the alphabet or a missing transition is seen the evaluator is stuck and nothing is accepted.
#[derive(Debug, Clone)]
pub struct DfaEvaluator<'a> {
    dfa: &'a Dfa,
    rev_map: HashMap<&'a str, usize>,
    current_state: Option<usize>,
}

impl<'a> DfaEvaluator<'a> {
    pub fn is_accepting(&self) -> bool {
        self.current_state().map_or(false, DfaState::is_accepting)
    }

    pub fn current_state(&self) -> Option<&DfaState> {
        self.current_state.map(|idx| &self.dfa.states[idx])
    }

    pub fn current_state_idx(&self) -> Option<usize> {
        self.current_state
    }

    /// Advances over one symbol, returning the new state, or `None` if the symbol is outside
    /// the alphabet or the current state has no move on it.
    pub fn step(&mut self, elem: &str) -> Option<&DfaState> {
        let state = self.current_state?;
        self.current_state = match self.rev_map.get(elem) {
            None => None,
            Some(&idx) => self.dfa.states[state].transitions[idx],
        };
        self.current_state()
    }

    pub fn step_multiple(&mut self, elems: &[&str]) -> Option<&DfaState> {
        elems
            .iter()
            .try_for_each(|e| self.step(e).map(|_| ()))
            .and(self.current_state())
    }
}

impl<'a> From<&'a Dfa> for DfaEvaluator<'a> {
    fn from(value: &'a Dfa) -> Self {
        let rev_map = value
            .alphabet
            .iter()
            .enumerate()
            .map(|(idx, c)| (c as &str, idx))
            .collect();
        Self {
            dfa: value,
            rev_map,
            current_state: Some(value.initial_state),
        }
    }
}
