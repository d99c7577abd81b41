//! Graphviz DOT rendering of automata: a point-shaped pseudo-node feeds an arrow into the
//! initial state, accepting states are drawn as double circles, and parallel edges between the
//! same pair of states are collapsed into one comma-separated, alphabetically sorted label.
//! Rendering the text to an image is left to an external tool such as `dot`.

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use std::collections::{BTreeMap, BTreeSet};

type Edges<'a> = BTreeMap<(&'a str, &'a str), BTreeSet<String>>;

/// Renders an NFA as a DOT digraph, ε-edges labelled `ε`.
pub fn nfa_to_dot(nfa: &Nfa) -> String {
    let mut edges: Edges = BTreeMap::new();
    for state in nfa.states() {
        for &dst in state.epsilon_transitions() {
            edges
                .entry((state.name(), nfa.states()[dst].name()))
                .or_default()
                .insert("ε".to_string());
        }
        for (sym, targets) in state.transitions().iter().enumerate() {
            for &dst in targets {
                edges
                    .entry((state.name(), nfa.states()[dst].name()))
                    .or_default()
                    .insert(nfa.alphabet()[sym].to_string());
            }
        }
    }
    let nodes = nfa.states().iter().map(|s| (s.name(), s.is_accepting()));
    render(nodes, nfa.initial_state().name(), &edges)
}

/// Renders a DFA as a DOT digraph.
pub fn dfa_to_dot(dfa: &Dfa) -> String {
    let mut edges: Edges = BTreeMap::new();
    for state in dfa.states() {
        for (sym, target) in state.transitions().iter().enumerate() {
            if let Some(dst) = target {
                edges
                    .entry((state.name(), dfa.states()[*dst].name()))
                    .or_default()
                    .insert(dfa.alphabet()[sym].to_string());
            }
        }
    }
    let nodes = dfa.states().iter().map(|s| (s.name(), s.is_accepting()));
    render(nodes, dfa.initial_state().name(), &edges)
}

fn render<'a>(
    nodes: impl Iterator<Item = (&'a str, bool)>,
    initial: &str,
    edges: &Edges,
) -> String {
    let mut sorted_nodes: Vec<(&str, bool)> = nodes.collect();
    sorted_nodes.sort_unstable();

    let mut out = String::from("digraph Automaton {\nrankdir=LR;\n__start__ [shape=point];\n");
    for (name, accepting) in &sorted_nodes {
        let shape = if *accepting { "doublecircle" } else { "circle" };
        out.push_str(&format!("\"{name}\" [shape={shape}];\n"));
    }
    out.push_str(&format!("__start__ -> \"{initial}\";\n"));
    for ((src, dst), labels) in edges {
        let label = labels
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("\"{src}\" -> \"{dst}\" [label=\"{label}\"];\n"));
    }
    out.push_str("}\n");
    out
}
