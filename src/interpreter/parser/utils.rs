use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::ParseResult,
    },
    util::num::f64_to_i64_checked,
};

/// Builds the uniform `Expected X, got Y` error.
///
/// A missing token (an iterator that ran out without an `EOF` token) is
/// reported as `EOF` at position `0:0`.
pub(in crate::interpreter::parser) fn unexpected(expected: &str, found: Option<&Token>)
                                                 -> ParseError {
    match found {
        Some(token) => ParseError::Expected { expected: expected.to_string(),
                                              found:    token.kind.name().to_string(),
                                              line:     token.line,
                                              column:   token.column, },
        None => ParseError::Expected { expected: expected.to_string(),
                                       found:    TokenKind::Eof.name().to_string(),
                                       line:     0,
                                       column:   0, },
    }
}

/// Returns the kind of the next token without consuming it.
pub(in crate::interpreter::parser) fn peek_kind<'a, I>(tokens: &mut Peekable<I>)
                                                       -> Option<&'a TokenKind>
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map(|&token| &token.kind)
}

/// Consumes the next token if it is exactly `kind`.
///
/// # Returns
/// `true` if a token was consumed.
pub(in crate::interpreter::parser) fn eat<'a, I>(tokens: &mut Peekable<I>, kind: &TokenKind) -> bool
    where I: Iterator<Item = &'a Token>
{
    if peek_kind(tokens) == Some(kind) {
        tokens.next();
        return true;
    }
    false
}

/// Consumes the next token, which must be exactly `kind`.
///
/// # Errors
/// `Expected <KIND>, got <found>` otherwise.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: &TokenKind)
                                                    -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if &token.kind == kind => Ok(token),
        other => Err(unexpected(kind.name(), other)),
    }
}

/// Consumes an integral number literal.
///
/// Float literals with no fractional part (`3.0`) are accepted.
///
/// # Errors
/// `Expected INTEGER, got <found>` for anything else.
pub(in crate::interpreter::parser) fn expect_integer<'a, I>(tokens: &mut Peekable<I>)
                                                            -> ParseResult<i64>
    where I: Iterator<Item = &'a Token>
{
    let token = tokens.next();
    match token.map(|t| &t.kind) {
        Some(TokenKind::Integer(n)) => Ok(*n),
        Some(TokenKind::Float(x)) => f64_to_i64_checked(*x, unexpected("INTEGER", token)),
        _ => Err(unexpected("INTEGER", token)),
    }
}

/// Consumes a string literal and returns its decoded text.
pub(in crate::interpreter::parser) fn expect_string<'a, I>(tokens: &mut Peekable<I>)
                                                           -> ParseResult<String>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(Token { kind: TokenKind::Str(text),
                     .. }) => Ok(text.clone()),
        other => Err(unexpected("STRING", other)),
    }
}

/// Skips any run of newline tokens.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    while eat(tokens, &TokenKind::Newline) {}
}
