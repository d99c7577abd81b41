use redfa::dfa::Dfa;
use redfa::nfa::Nfa;
use redfa::parser::{self, InvalidRegexError};
use redfa::regex::{MalformedPostfixError, Regex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid regular expression: {0}")]
    InvalidRegex(#[from] InvalidRegexError),
    #[error("malformed postfix stream: {0}")]
    MalformedPostfix(#[from] MalformedPostfixError),
}

/// Every artifact produced for one regular expression: the postfix form, the Thompson ε-NFA,
/// the subset-construction DFA and the automaton used for simulation (minimal unless
/// minimization was disabled).
pub struct Compiled {
    pub source: String,
    pub regex: Regex,
    pub nfa: Nfa,
    pub dfa: Dfa,
    pub minimal: Dfa,
}

/// Runs the full pipeline over one expression.
pub fn compile(source: &str, with_minimization: bool) -> Result<Compiled, CompileError> {
    let regex = parser::regex(source)?;
    let nfa = regex.to_nfa()?;
    let dfa = nfa.to_dfa();
    let minimal = if with_minimization {
        dfa.minimized()
    } else {
        dfa.clone()
    };
    Ok(Compiled {
        source: source.to_string(),
        regex,
        nfa,
        dfa,
        minimal,
    })
}
