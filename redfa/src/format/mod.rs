//! # Wire format
//! A [`Record`] is the serialized form of an automaton: a pure reader over the data model that
//! neither mutates nor retains it. The JSON encoding is UTF-8 with a stable key order:
//!
//! ```text
//! ESTADOS      : ordered list of integers [0 .. N-1]
//! SIMBOLOS     : sorted list of alphabet symbols (ε excluded)
//! INICIO       : a one-element list holding the initial state's integer
//! ACEPTACION   : sorted list of accepting-state integers
//! TRANSICIONES : list of [src, label, dst] triples, the empty string labelling ε
//! ```
//!
//! Before serialization states are renumbered sequentially from 0: the initial state becomes 0
//! and the remaining states follow, sorted by their prior string identity. Transition triples
//! are sorted, so serializing the same automaton twice yields byte-identical output, and
//! serialize → parse-back → re-serialize is the identity.
//!
//! ```
//! use redfa::format::Record;
//! use redfa::parser;
//!
//! let dfa = parser::regex("a|b").unwrap().to_nfa().unwrap().to_dfa().minimized();
//! let record = Record::from_dfa(&dfa);
//! let json = record.to_json().unwrap();
//! assert_eq!(Record::from_json(&json).unwrap(), record);
//!
//! let read_back = record.to_dfa().unwrap();
//! assert!(read_back.equivalent_to(&dfa));
//! ```
//!
//! Reading a record back checks the invariants the data model promises: every referenced state
//! and symbol must be declared, ε may not appear in the alphabet, and a record read as a DFA
//! may contain neither ε-labels nor a second target for the same (state, symbol) pair.

pub mod dot;

use crate::dfa::{Dfa, DfaState};
use crate::nfa::{Nfa, NfaState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// An error raised while reading a [`Record`] back into an automaton, or while decoding JSON.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("record has no initial state")]
    NoInitialState,
    #[error("record declares more than one initial state")]
    MultipleInitialStates,
    #[error("record is not a DFA: it has an ε-move or several targets for one symbol")]
    NotADfa,
    #[error("reference to undeclared state {0}")]
    UnknownState(usize),
    #[error("transition labelled with undeclared symbol '{0}'")]
    UndeclaredSymbol(String),
    #[error("duplicate alphabet symbol '{0}'")]
    DuplicateSymbol(String),
    #[error("ε may not be part of the alphabet")]
    EpsilonInAlphabet,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The serialized form of an automaton. Field order is the wire key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "ESTADOS")]
    pub states: Vec<usize>,
    #[serde(rename = "SIMBOLOS")]
    pub symbols: Vec<String>,
    #[serde(rename = "INICIO")]
    pub initial: Vec<usize>,
    #[serde(rename = "ACEPTACION")]
    pub accepting: Vec<usize>,
    #[serde(rename = "TRANSICIONES")]
    pub transitions: Vec<(usize, String, usize)>,
}

/// Renumbering used before serialization: the initial state first, the rest sorted by their
/// prior string identity. Returns the new integer for every old state index.
fn sequential_ids(names: &[&str], initial: usize) -> Vec<usize> {
    let mut rest: Vec<usize> = (0..names.len()).filter(|&idx| idx != initial).collect();
    rest.sort_by(|&a, &b| names[a].cmp(names[b]));
    let mut ids = vec![0; names.len()];
    for (new, old) in std::iter::once(initial).chain(rest).enumerate() {
        ids[old] = new;
    }
    ids
}

impl Record {
    /// Serializes an NFA, renumbering its states sequentially.
    pub fn from_nfa(nfa: &Nfa) -> Record {
        let names: Vec<&str> = nfa.states().iter().map(NfaState::name).collect();
        let ids = sequential_ids(&names, nfa.initial_state_index());

        let mut transitions: Vec<(usize, String, usize)> = Vec::new();
        for (old, state) in nfa.states().iter().enumerate() {
            let src = ids[old];
            for &dst in state.epsilon_transitions() {
                transitions.push((src, String::new(), ids[dst]));
            }
            for (sym, targets) in state.transitions().iter().enumerate() {
                for &dst in targets {
                    transitions.push((src, nfa.alphabet()[sym].to_string(), ids[dst]));
                }
            }
        }
        transitions.sort();
        transitions.dedup();

        let mut symbols: Vec<String> = nfa.alphabet().iter().map(ToString::to_string).collect();
        symbols.sort();

        let mut accepting: Vec<usize> = nfa
            .states()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_accepting())
            .map(|(old, _)| ids[old])
            .collect();
        accepting.sort_unstable();

        Record {
            states: (0..names.len()).collect(),
            symbols,
            initial: vec![0],
            accepting,
            transitions,
        }
    }

    /// Serializes a DFA, renumbering its states sequentially.
    pub fn from_dfa(dfa: &Dfa) -> Record {
        let names: Vec<&str> = dfa.states().iter().map(DfaState::name).collect();
        let ids = sequential_ids(&names, dfa.initial_state_index());

        let mut transitions: Vec<(usize, String, usize)> = Vec::new();
        for (old, state) in dfa.states().iter().enumerate() {
            let src = ids[old];
            for (sym, target) in state.transitions().iter().enumerate() {
                if let Some(dst) = target {
                    transitions.push((src, dfa.alphabet()[sym].to_string(), ids[*dst]));
                }
            }
        }
        transitions.sort();

        let mut symbols: Vec<String> = dfa.alphabet().iter().map(ToString::to_string).collect();
        symbols.sort();

        let mut accepting: Vec<usize> = dfa
            .states()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_accepting())
            .map(|(old, _)| ids[old])
            .collect();
        accepting.sort_unstable();

        Record {
            states: (0..names.len()).collect(),
            symbols,
            initial: vec![0],
            accepting,
            transitions,
        }
    }

    /// Encodes this record as pretty-printed JSON in the wire key order.
    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes a record from JSON.
    pub fn from_json(input: &str) -> Result<Record, FormatError> {
        Ok(serde_json::from_str(input)?)
    }

    fn initial_state(&self) -> Result<usize, FormatError> {
        match self.initial.as_slice() {
            [] => Err(FormatError::NoInitialState),
            [one] => Ok(*one),
            _ => Err(FormatError::MultipleInitialStates),
        }
    }

    fn alphabet(&self) -> Result<(Rc<[Rc<str>]>, HashMap<Rc<str>, usize>), FormatError> {
        let mut symbols: Vec<Rc<str>> = Vec::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            if symbol == "ε" || symbol.is_empty() {
                return Err(FormatError::EpsilonInAlphabet);
            }
            symbols.push(Rc::from(symbol.as_str()));
        }
        symbols.sort();
        let alphabet: Rc<[Rc<str>]> = symbols.into();
        let index: HashMap<Rc<str>, usize> = alphabet
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.clone(), idx))
            .collect();
        if index.len() != alphabet.len() {
            let dup = self
                .symbols
                .iter()
                .find(|s| self.symbols.iter().filter(|o| o == s).count() > 1)
                .cloned()
                .unwrap_or_default();
            return Err(FormatError::DuplicateSymbol(dup));
        }
        Ok((alphabet, index))
    }

    fn dense_ids(&self) -> HashMap<usize, usize> {
        self.states
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect()
    }

    /// Rebuilds an NFA from this record. State names are the serialized integers.
    pub fn to_nfa(&self) -> Result<Nfa, FormatError> {
        let initial = self.initial_state()?;
        let (alphabet, index) = self.alphabet()?;
        let positions = self.dense_ids();
        let position = |id: usize| positions.get(&id).copied().ok_or(FormatError::UnknownState(id));

        let mut states: Vec<NfaState> = self
            .states
            .iter()
            .map(|&id| NfaState {
                name: Rc::from(id.to_string()),
                initial: id == initial,
                accepting: false,
                epsilon_transitions: Vec::new(),
                transitions: vec![Vec::new(); alphabet.len()],
            })
            .collect();
        for &id in &self.accepting {
            let pos = position(id)?;
            states[pos].accepting = true;
        }
        for (src, label, dst) in &self.transitions {
            let from = position(*src)?;
            let to = position(*dst)?;
            if label.is_empty() {
                states[from].epsilon_transitions.push(to);
            } else {
                let sym = index
                    .get(label.as_str())
                    .ok_or_else(|| FormatError::UndeclaredSymbol(label.clone()))?;
                states[from].transitions[*sym].push(to);
            }
        }

        Ok(Nfa {
            alphabet,
            states,
            initial_state: position(initial)?,
        })
    }

    /// Rebuilds a DFA from this record. Fails with [`FormatError::NotADfa`] if the record has
    /// an ε-move or maps one (state, symbol) pair to several targets.
    pub fn to_dfa(&self) -> Result<Dfa, FormatError> {
        let initial = self.initial_state()?;
        let (alphabet, index) = self.alphabet()?;
        let positions = self.dense_ids();
        let position = |id: usize| positions.get(&id).copied().ok_or(FormatError::UnknownState(id));

        let mut states: Vec<DfaState> = self
            .states
            .iter()
            .map(|&id| DfaState {
                name: Rc::from(id.to_string()),
                initial: id == initial,
                accepting: false,
                transitions: vec![None; alphabet.len()],
            })
            .collect();
        for &id in &self.accepting {
            let pos = position(id)?;
            states[pos].accepting = true;
        }
        for (src, label, dst) in &self.transitions {
            let from = position(*src)?;
            let to = position(*dst)?;
            if label.is_empty() {
                return Err(FormatError::NotADfa);
            }
            let sym = index
                .get(label.as_str())
                .ok_or_else(|| FormatError::UndeclaredSymbol(label.clone()))?;
            if states[from].transitions[*sym].is_some() {
                return Err(FormatError::NotADfa);
            }
            states[from].transitions[*sym] = Some(to);
        }

        Ok(Dfa {
            alphabet,
            states,
            initial_state: position(initial)?,
        })
    }
}
