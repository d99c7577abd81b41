//! Desugaring passes: escape resolution, bracket classes, bounded repetition and the wildcard.
//! Each pass rewrites a stream of [`Piece`]s, keeping resolved literals apart from
//! still-uninterpreted source characters so that an escaped `*` can never be mistaken for the
//! Kleene star.

use crate::parser::InvalidRegexError;
use nom::branch::alt;
use nom::character::complete;
use nom::character::complete::anychar;
use nom::combinator::{all_consuming, map, opt, verify};
use nom::multi::many0;
use nom::sequence::{pair, preceded};
use nom::{Finish, IResult};
use std::collections::BTreeSet;

/// One element of the partially desugared expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Piece {
    /// A character that is definitely a literal symbol (produced by escapes and expansions).
    Lit(char),
    /// A source character that may still turn out to be an operator.
    Raw(char),
}

/// Splits the surface expression into pieces, resolving escape sequences on the way.
pub(super) fn scan(input: &str) -> Result<Vec<Piece>, InvalidRegexError> {
    all_consuming(many0(piece))(input)
        .finish()
        .map(|(_, pieces)| pieces)
        .map_err(|_: nom::error::Error<&str>| InvalidRegexError::TrailingBackslash)
}

fn piece(input: &str) -> IResult<&str, Piece> {
    alt((escaped, plain))(input)
}

fn escaped(input: &str) -> IResult<&str, Piece> {
    map(preceded(complete::char('\\'), anychar), |c| {
        Piece::Lit(unescape(c))
    })(input)
}

fn plain(input: &str) -> IResult<&str, Piece> {
    map(verify(anychar, |&c| c != '\\'), Piece::Raw)(input)
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}

/// Rewrites every bracket class `[…]` into a parenthesized alternation over its symbols,
/// sorted and deduplicated. Ranges expand by codepoint; a descending range and an empty class
/// are errors.
pub(super) fn expand_classes(pieces: Vec<Piece>) -> Result<Vec<Piece>, InvalidRegexError> {
    let mut out = Vec::with_capacity(pieces.len());
    let mut i = 0;
    while i < pieces.len() {
        match pieces[i] {
            Piece::Raw('[') => {
                let mut j = i + 1;
                while j < pieces.len() && pieces[j] != Piece::Raw(']') {
                    j += 1;
                }
                if j >= pieces.len() {
                    return Err(InvalidRegexError::UnmatchedOpen('['));
                }
                let symbols = class_symbols(&pieces[i + 1..j])?;
                out.push(Piece::Raw('('));
                for (n, c) in symbols.into_iter().enumerate() {
                    if n > 0 {
                        out.push(Piece::Raw('|'));
                    }
                    out.push(Piece::Lit(c));
                }
                out.push(Piece::Raw(')'));
                i = j + 1;
            }
            p => {
                out.push(p);
                i += 1;
            }
        }
    }
    Ok(out)
}

fn class_symbols(body: &[Piece]) -> Result<BTreeSet<char>, InvalidRegexError> {
    if body.is_empty() {
        return Err(InvalidRegexError::EmptyClass);
    }
    let mut symbols = BTreeSet::new();
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            Piece::Lit(c) => {
                symbols.insert(c);
                i += 1;
            }
            Piece::Raw(start) => {
                if i + 2 < body.len() && body[i + 1] == Piece::Raw('-') {
                    if let Piece::Raw(end) = body[i + 2] {
                        if start > end {
                            return Err(InvalidRegexError::DescendingRange { start, end });
                        }
                        symbols.extend(start..=end);
                        i += 3;
                        continue;
                    }
                }
                symbols.insert(start);
                i += 1;
            }
        }
    }
    Ok(symbols)
}

/// Unrolls bounded repetitions: `X{n}` becomes `X` repeated `n` times, and `X{n,m}` appends
/// `(X)?` for the optional tail. The repeated atom is the preceding parenthesized group or the
/// preceding single piece; only unescaped parentheses take part in the group matching.
pub(super) fn expand_quantifiers(pieces: Vec<Piece>) -> Result<Vec<Piece>, InvalidRegexError> {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
    let mut i = 0;
    while i < pieces.len() {
        match pieces[i] {
            Piece::Raw('{') => {
                let mut j = i + 1;
                while j < pieces.len() && pieces[j] != Piece::Raw('}') {
                    j += 1;
                }
                if j >= pieces.len() {
                    return Err(InvalidRegexError::UnmatchedOpen('{'));
                }
                let (min, max) = parse_bounds(&pieces[i + 1..j])?;
                let atom = take_atom(&mut out)?;
                for _ in 0..min {
                    out.extend(atom.iter().copied());
                }
                for _ in 0..max.saturating_sub(min) {
                    out.push(Piece::Raw('('));
                    out.extend(atom.iter().copied());
                    out.push(Piece::Raw(')'));
                    out.push(Piece::Raw('?'));
                }
                i = j + 1;
            }
            p => {
                out.push(p);
                i += 1;
            }
        }
    }
    Ok(out)
}

fn parse_bounds(body: &[Piece]) -> Result<(u32, u32), InvalidRegexError> {
    let mut text = String::new();
    for piece in body {
        match piece {
            Piece::Raw(c) => text.push(*c),
            // An escape has no business inside a quantifier body
            Piece::Lit(_) => return Err(InvalidRegexError::BadQuantifier(render(body))),
        }
    }
    let parsed = all_consuming(bounds)(text.as_str())
        .finish()
        .map(|(_, parsed)| parsed)
        .map_err(|_: nom::error::Error<&str>| ());
    let Ok((lo, hi)) = parsed else {
        return Err(InvalidRegexError::BadQuantifier(text));
    };
    let min = match lo {
        Some(n) => n,
        None if hi.is_none() => return Err(InvalidRegexError::BadQuantifier(text)),
        None => 0,
    };
    let max = match hi {
        None => min,
        Some(None) => min + 5,
        Some(Some(m)) => m,
    };
    if max > 20 {
        return Err(InvalidRegexError::QuantifierTooLarge { max });
    }
    if min > max {
        return Err(InvalidRegexError::QuantifierBounds { min, max });
    }
    Ok((min, max))
}

fn bounds(input: &str) -> IResult<&str, (Option<u32>, Option<Option<u32>>)> {
    pair(
        opt(complete::u32),
        opt(preceded(complete::char(','), opt(complete::u32))),
    )(input)
}

fn render(body: &[Piece]) -> String {
    body.iter()
        .map(|piece| match piece {
            Piece::Lit(c) | Piece::Raw(c) => *c,
        })
        .collect()
}

/// Removes and returns the atom a quantifier applies to: the whole group if the rewritten
/// stream ends in `)`, otherwise the last piece alone.
fn take_atom(out: &mut Vec<Piece>) -> Result<Vec<Piece>, InvalidRegexError> {
    if out.last() == Some(&Piece::Raw(')')) {
        let mut depth = 0i32;
        let mut start = None;
        for (idx, piece) in out.iter().enumerate().rev() {
            match piece {
                Piece::Raw(')') => depth += 1,
                Piece::Raw('(') => {
                    depth -= 1;
                    if depth == 0 {
                        start = Some(idx);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(start) = start else {
            return Err(InvalidRegexError::UnmatchedClose(')'));
        };
        Ok(out.split_off(start))
    } else {
        match out.pop() {
            Some(last) => Ok(vec![last]),
            None => Err(InvalidRegexError::QuantifierWithoutAtom),
        }
    }
}

/// Rewrites the wildcard `.` into an alternation over the ASCII letters and digits. The
/// alternatives are emitted as literals, so a wildcard can match the letter `e` even though a
/// bare `e` in the source denotes ε.
pub(super) fn expand_wildcards(pieces: Vec<Piece>) -> Vec<Piece> {
    let mut out = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if piece == Piece::Raw('.') {
            out.push(Piece::Raw('('));
            for (n, c) in ('a'..='z').chain('A'..='Z').chain('0'..='9').enumerate() {
                if n > 0 {
                    out.push(Piece::Raw('|'));
                }
                out.push(Piece::Lit(c));
            }
            out.push(Piece::Raw(')'));
        } else {
            out.push(piece);
        }
    }
    out
}
