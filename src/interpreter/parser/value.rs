use std::iter::Peekable;

use crate::{
    ast::{RandomCall, ValueExpr},
    interpreter::{
        lexer::{Keyword, Token, TokenKind},
        parser::{
            core::ParseResult,
            utils::{eat, expect, expect_integer, peek_kind, skip_newlines, unexpected},
        },
    },
};

/// Parses a single value.
///
/// Grammar: `value := NUMBER | STRING | random_call | IDENTIFIER`
///
/// The identifiers `null` and `none` (any case) produce `ValueExpr::Null`.
/// Other identifiers are kept by name and resolved when the operation runs.
///
/// # Errors
/// `Expected VALUE, got <found>` when the next token cannot start a value.
pub fn parse_value<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ValueExpr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = tokens.next();
    match token {
        Some(Token { kind: TokenKind::Integer(n),
                     .. }) => Ok(ValueExpr::Integer(*n)),
        Some(Token { kind: TokenKind::Float(x),
                     .. }) => Ok(ValueExpr::Float(*x)),
        Some(Token { kind: TokenKind::Str(text),
                     .. }) => Ok(ValueExpr::Text(text.clone())),
        Some(Token { kind: TokenKind::Keyword(Keyword::Random),
                     line,
                     column,
                     .. }) => parse_random_call(tokens, *line, *column),
        Some(Token { kind: TokenKind::Identifier(name),
                     .. }) => {
            let lower = name.to_lowercase();
            if lower == "null" || lower == "none" {
                Ok(ValueExpr::Null)
            } else {
                Ok(ValueExpr::Identifier(name.clone()))
            }
        },
        other => Err(unexpected("VALUE", other)),
    }
}

/// Whether a token of this kind can begin a value.
pub(in crate::interpreter::parser) const fn starts_value(kind: Option<&TokenKind>) -> bool {
    matches!(kind,
             Some(TokenKind::Integer(_)
                  | TokenKind::Float(_)
                  | TokenKind::Str(_)
                  | TokenKind::Identifier(_)
                  | TokenKind::Keyword(Keyword::Random)))
}

/// Parses the argument list of `random`, after the keyword.
///
/// Grammar: `random_call := "random" "(" INTEGER ["," INTEGER] ")"`
///
/// `random(max)` is shorthand for `random(0, max)`. The bounds are not
/// checked here; an empty range is reported when the call is evaluated.
///
/// # Parameters
/// - `tokens`: Token iterator positioned after `random`.
/// - `line`, `column`: Position of the `random` keyword.
fn parse_random_call<'a, I>(tokens: &mut Peekable<I>,
                            line: usize,
                            column: usize)
                            -> ParseResult<ValueExpr>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, &TokenKind::LParen)?;
    let first = expect_integer(tokens)?;

    let (min, max) = if eat(tokens, &TokenKind::Comma) {
        (first, expect_integer(tokens)?)
    } else {
        (0, first)
    };

    expect(tokens, &TokenKind::RParen)?;

    Ok(ValueExpr::Random(RandomCall { min,
                                      max,
                                      line,
                                      column }))
}

/// Parses an array literal.
///
/// Grammar: `array := "[" { value [","] } "]"`
///
/// Commas between elements are optional and newlines inside the brackets
/// are ignored, so long arrays may be split across lines.
///
/// # Errors
/// - `Expected LBRACKET` when the array does not open.
/// - `Expected VALUE or RBRACKET` for any other token inside.
pub fn parse_array<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<ValueExpr>>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, &TokenKind::LBracket)?;

    let mut values = Vec::new();
    loop {
        skip_newlines(tokens);
        match peek_kind(tokens) {
            Some(TokenKind::RBracket) => {
                tokens.next();
                break;
            },
            kind if starts_value(kind) => {
                values.push(parse_value(tokens)?);
                eat(tokens, &TokenKind::Comma);
            },
            _ => return Err(unexpected("VALUE or RBRACKET", tokens.next())),
        }
    }

    Ok(values)
}
