//! # redfa parser
//! This module turns the surface syntax of a regular expression into the postfix (reverse Polish)
//! token stream consumed by the Thompson construction. The surface operators, by precedence from
//! low to high, are:
//!
//! * `|` — alternation (left-associative)
//! * implicit concatenation
//! * `*`, `+`, `?` — postfix unaries (right-associative)
//!
//! plus grouping with `(`/`)`, bracket classes `[abc]` and `[a-z]` (ranges expand by codepoint),
//! bounded repetition `{n}` and `{n,m}`, the wildcard `.` and `\`-escapes. `\n`, `\t` and `\r`
//! denote the corresponding control characters; escaping any other character of the escape table
//! yields that literal character. The letter `e` and the character `ε` both denote the empty
//! string.
//!
//! Desugaring happens in passes: the expression is validated, bracket classes become
//! parenthesized alternations, bounded repetitions are unrolled (`X{2,4}` becomes
//! `XX(X)?(X)?`; upper bounds are capped at 20 to avoid a combinatorial explosion), the
//! wildcard becomes an alternation over the ASCII letters and digits, explicit concatenation
//! operators are inserted, and a shunting-yard translation emits the postfix stream over the
//! reduced operator set `{., |, *, +, ?, literal, ε}`.
//!
//! ```
//! use redfa::parser;
//!
//! let regex = parser::regex("(a|b)*abb").unwrap();
//! assert_eq!(regex.to_string(), "ab|*a.b.b.");
//!
//! let regex = parser::regex("[a-c]{2}").unwrap();
//! assert_eq!(regex.to_string(), "ab|c|ab|c|.");
//! ```
//!
//! Invalid expressions are rejected with an [`InvalidRegexError`] describing the violated rule:
//!
//! ```
//! use redfa::parser::{self, InvalidRegexError};
//!
//! assert_eq!(parser::regex(""), Err(InvalidRegexError::Empty));
//! assert_eq!(parser::regex("a**"), Err(InvalidRegexError::ConsecutiveOperators { first: '*', second: '*' }));
//! assert_eq!(parser::regex("a{3,2}"), Err(InvalidRegexError::QuantifierBounds { min: 3, max: 2 }));
//! ```

mod desugar;
mod postfix;

use crate::regex::Regex;
use thiserror::Error;

/// Characters that may follow a backslash.
const VALID_ESCAPES: [char; 17] = [
    'n', 't', 'r', '\\', '(', ')', '[', ']', '{', '}', '|', '*', '+', '?', '.', '^', '$',
];

/// The longest accepted expression, in characters.
const MAX_LENGTH: usize = 1000;

/// An error describing why a surface expression is not a valid regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRegexError {
    #[error("empty regular expression")]
    Empty,
    #[error("regular expression longer than 1000 characters")]
    TooLong,
    #[error("'{0}' without a matching closing delimiter")]
    UnmatchedOpen(char),
    #[error("'{0}' without a matching opening delimiter")]
    UnmatchedClose(char),
    #[error("backslash at the end of the expression")]
    TrailingBackslash,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("operator '{0}' at the start of the expression")]
    LeadingOperator(char),
    #[error("operator '{op}' directly after '{prev}'")]
    OperatorAfter { op: char, prev: char },
    #[error("consecutive unary operators '{first}{second}'")]
    ConsecutiveOperators { first: char, second: char },
    #[error("misplaced '|' operator")]
    MisplacedAlternation,
    #[error("empty group '()'")]
    EmptyGroup,
    #[error("empty bracket class")]
    EmptyClass,
    #[error("descending range '{start}-{end}' in bracket class")]
    DescendingRange { start: char, end: char },
    #[error("invalid repetition quantifier '{{{0}}}'")]
    BadQuantifier(String),
    #[error("repetition upper bound {max} exceeds the maximum of 20")]
    QuantifierTooLarge { max: u32 },
    #[error("repetition lower bound {min} exceeds upper bound {max}")]
    QuantifierBounds { min: u32, max: u32 },
    #[error("repetition quantifier without a preceding atom")]
    QuantifierWithoutAtom,
    #[error("character '{0}' is not allowed here")]
    InvalidCharacter(char),
    #[error("expression expands to nothing")]
    ExpandsToNothing,
    #[error("an operator was left without operands after expansion")]
    DanglingOperator,
}

/// Parses a regular expression into its postfix form according to the rules above. All regexes
/// accepted by this function are guaranteed to produce a well-formed postfix stream, so
/// [`Regex::to_nfa`] cannot underflow on its result.
pub fn regex(input: &str) -> Result<Regex, InvalidRegexError> {
    validate(input)?;
    let pieces = desugar::scan(input)?;
    let pieces = desugar::expand_classes(pieces)?;
    let pieces = desugar::expand_quantifiers(pieces)?;
    let pieces = desugar::expand_wildcards(pieces);
    let tokens = postfix::tokenize(&pieces)?;
    let tokens = postfix::insert_concat(tokens);
    let stream = postfix::shunting_yard(tokens)?;
    if stream.is_empty() {
        return Err(InvalidRegexError::ExpandsToNothing);
    }
    postfix::check_well_formed(&stream)?;
    Ok(Regex { postfix: stream })
}

/// Checks the surface expression before any desugaring: length, delimiter balance, escape
/// sequences and operator placement.
fn validate(input: &str) -> Result<(), InvalidRegexError> {
    if input.is_empty() {
        return Err(InvalidRegexError::Empty);
    }
    if input.chars().count() > MAX_LENGTH {
        return Err(InvalidRegexError::TooLong);
    }
    check_balance(input)?;
    check_operators(&strip_escapes(input))
}

fn check_balance(input: &str) -> Result<(), InvalidRegexError> {
    let mut paren = 0i32;
    let mut bracket = 0i32;
    let mut brace = 0i32;

    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                None => return Err(InvalidRegexError::TrailingBackslash),
                Some(next) if !VALID_ESCAPES.contains(&next) => {
                    return Err(InvalidRegexError::InvalidEscape(next))
                }
                Some(_) => {}
            },
            '(' => paren += 1,
            ')' => {
                paren -= 1;
                if paren < 0 {
                    return Err(InvalidRegexError::UnmatchedClose(')'));
                }
            }
            '[' => bracket += 1,
            ']' => {
                bracket -= 1;
                if bracket < 0 {
                    return Err(InvalidRegexError::UnmatchedClose(']'));
                }
            }
            '{' => brace += 1,
            '}' => {
                brace -= 1;
                if brace < 0 {
                    return Err(InvalidRegexError::UnmatchedClose('}'));
                }
            }
            _ => {}
        }
    }

    if paren > 0 {
        Err(InvalidRegexError::UnmatchedOpen('('))
    } else if bracket > 0 {
        Err(InvalidRegexError::UnmatchedOpen('['))
    } else if brace > 0 {
        Err(InvalidRegexError::UnmatchedOpen('{'))
    } else {
        Ok(())
    }
}

/// Replaces every escape sequence with a generic symbol so that operator placement can be
/// checked position by position without tripping over escaped metacharacters.
fn strip_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
            out.push('a');
        } else {
            out.push(c);
        }
    }
    out
}

fn check_operators(cleaned: &str) -> Result<(), InvalidRegexError> {
    let chars: Vec<char> = cleaned.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '*' | '+' | '?' => {
                let Some(prev) = i.checked_sub(1).map(|p| chars[p]) else {
                    return Err(InvalidRegexError::LeadingOperator(c));
                };
                if prev == '|' || prev == '(' {
                    return Err(InvalidRegexError::OperatorAfter { op: c, prev });
                }
                if matches!(prev, '*' | '+' | '?') {
                    return Err(InvalidRegexError::ConsecutiveOperators {
                        first: prev,
                        second: c,
                    });
                }
            }
            '|' => {
                if i == 0 || i == chars.len() - 1 {
                    return Err(InvalidRegexError::MisplacedAlternation);
                }
                if matches!(chars[i - 1], '|' | '(') || matches!(chars[i + 1], '|' | ')') {
                    return Err(InvalidRegexError::MisplacedAlternation);
                }
            }
            '(' => {
                if chars.get(i + 1) == Some(&')') {
                    return Err(InvalidRegexError::EmptyGroup);
                }
            }
            _ => {}
        }
    }
    Ok(())
}
