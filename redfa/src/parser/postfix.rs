//! Final translation steps: tokenizing the desugared stream, inserting explicit concatenation
//! operators and running the shunting-yard algorithm to obtain the postfix form.

use crate::parser::desugar::Piece;
use crate::parser::InvalidRegexError;
use crate::regex::Token;
use std::rc::Rc;

/// A token of the fully desugared infix expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Infix {
    Literal(char),
    Epsilon,
    LParen,
    RParen,
    Alt,
    Concat,
    Star,
    Plus,
    Question,
}

/// Maps the desugared pieces onto infix tokens. Spaces are dropped, a bare `e` or `ε` becomes
/// the ε token, and anything that is neither an operator nor a plausible symbol is rejected.
pub(super) fn tokenize(pieces: &[Piece]) -> Result<Vec<Infix>, InvalidRegexError> {
    let mut out = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let token = match *piece {
            Piece::Lit('ε') => Infix::Epsilon,
            Piece::Lit(c) => Infix::Literal(c),
            Piece::Raw(c) => match c {
                '(' => Infix::LParen,
                ')' => Infix::RParen,
                '|' => Infix::Alt,
                '*' => Infix::Star,
                '+' => Infix::Plus,
                '?' => Infix::Question,
                'ε' | 'e' => Infix::Epsilon,
                ' ' => continue,
                '\n' | '\t' | '\r' => Infix::Literal(c),
                c if c.is_alphanumeric() => Infix::Literal(c),
                c => return Err(InvalidRegexError::InvalidCharacter(c)),
            },
        };
        out.push(token);
    }
    Ok(out)
}

fn ends_atom(token: &Infix) -> bool {
    matches!(
        token,
        Infix::Literal(_)
            | Infix::Epsilon
            | Infix::RParen
            | Infix::Star
            | Infix::Plus
            | Infix::Question
    )
}

fn begins_atom(token: &Infix) -> bool {
    matches!(token, Infix::Literal(_) | Infix::Epsilon | Infix::LParen)
}

/// Inserts an explicit concatenation operator between every pair of adjacent tokens where the
/// first may end an atom and the second may begin one.
pub(super) fn insert_concat(tokens: Vec<Infix>) -> Vec<Infix> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        let ends = ends_atom(&token);
        out.push(token);
        if let Some(next) = iter.peek() {
            if ends && begins_atom(next) {
                out.push(Infix::Concat);
            }
        }
    }
    out
}

fn precedence(op: &Infix) -> u8 {
    match op {
        Infix::Alt => 1,
        Infix::Concat => 2,
        _ => 3,
    }
}

fn right_associative(op: &Infix) -> bool {
    matches!(op, Infix::Star | Infix::Plus | Infix::Question)
}

fn operator_token(op: Infix) -> Token {
    match op {
        Infix::Alt => Token::Alt,
        Infix::Concat => Token::Concat,
        Infix::Star => Token::Star,
        Infix::Plus => Token::Plus,
        Infix::Question => Token::Question,
        _ => unreachable!("only operators end up on the shunting-yard stack"),
    }
}

/// Verifies that every operator of the stream has its operands, so that evaluating it with a
/// stack can never underflow. A bounded repetition with a zero count can erase an operand of
/// an enclosing operator; that surfaces here.
pub(super) fn check_well_formed(stream: &[Token]) -> Result<(), InvalidRegexError> {
    let mut depth = 0usize;
    for token in stream {
        match token {
            Token::Literal(_) | Token::Epsilon => depth += 1,
            Token::Concat | Token::Alt => {
                if depth < 2 {
                    return Err(InvalidRegexError::DanglingOperator);
                }
                depth -= 1;
            }
            Token::Star | Token::Plus | Token::Question => {
                if depth == 0 {
                    return Err(InvalidRegexError::DanglingOperator);
                }
            }
        }
    }
    if depth == 1 {
        Ok(())
    } else {
        Err(InvalidRegexError::DanglingOperator)
    }
}

/// Standard shunting-yard translation from infix to postfix.
pub(super) fn shunting_yard(tokens: Vec<Infix>) -> Result<Vec<Token>, InvalidRegexError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Infix> = Vec::new();

    for token in tokens {
        match token {
            Infix::Literal(c) => output.push(Token::Literal(Rc::from(c.to_string()))),
            Infix::Epsilon => output.push(Token::Epsilon),
            Infix::LParen => stack.push(Infix::LParen),
            Infix::RParen => loop {
                match stack.pop() {
                    Some(Infix::LParen) => break,
                    Some(op) => output.push(operator_token(op)),
                    None => return Err(InvalidRegexError::UnmatchedClose(')')),
                }
            },
            op => {
                while let Some(top) = stack.last() {
                    let pops = !matches!(top, Infix::LParen)
                        && (precedence(top) > precedence(&op)
                            || (precedence(top) == precedence(&op) && !right_associative(&op)));
                    if !pops {
                        break;
                    }
                    if let Some(popped) = stack.pop() {
                        output.push(operator_token(popped));
                    }
                }
                stack.push(op);
            }
        }
    }

    while let Some(op) = stack.pop() {
        if matches!(op, Infix::LParen | Infix::RParen) {
            return Err(InvalidRegexError::UnmatchedOpen('('));
        }
        output.push(operator_token(op));
    }

    Ok(output)
}
