use std::iter::Peekable;

use crate::{
    ast::{DeleteTarget, Direction, Operation, OperationKind},
    interpreter::{
        lexer::{Keyword, Token, TokenKind},
        parser::{
            core::ParseResult,
            utils::{eat, expect_integer, expect_string, peek_kind, unexpected},
            value::{parse_array, parse_value, starts_value},
        },
    },
};

/// Parses a single operation inside a declaration body.
///
/// The operation keyword decides which operands follow:
///
/// ```text
/// init [..] [capacity N]        insert v [at N] [left|right]
/// delete at N | delete v        search v          clear
/// push v | pop | peek           enqueue v | dequeue | front | rear
/// build [..]                    build_text "s"    build_numbers [..]
/// traverse <order> [recursive|iterative]
/// height | min | max | reverse  encode "s" | decode "s" | show_codes
/// insert_head v | insert_tail v | delete_head | delete_tail
/// get N | size                  speed v | pause [v]
/// ```
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the operation keyword.
///
/// # Returns
/// The operation tagged with the keyword's line and column.
///
/// # Errors
/// `Expected OPERATION, got <found>` for a token that starts no operation,
/// or the error of the first operand that fails to parse.
pub fn parse_operation<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Operation>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = tokens.next();
    let Some(Token { kind: TokenKind::Keyword(keyword),
                     line,
                     column,
                     .. }) = token
    else {
        return Err(unexpected("OPERATION", token));
    };

    let kind = match keyword {
        Keyword::Init => {
            let values = parse_array(tokens)?;
            let capacity = if eat(tokens, &TokenKind::Keyword(Keyword::Capacity)) {
                Some(expect_integer(tokens)?)
            } else {
                None
            };
            OperationKind::Init { values, capacity }
        },
        Keyword::Insert => parse_insert(tokens)?,
        Keyword::Delete => {
            if eat(tokens, &TokenKind::Keyword(Keyword::At)) {
                OperationKind::Delete(DeleteTarget::Index(expect_integer(tokens)?))
            } else {
                OperationKind::Delete(DeleteTarget::Value(parse_value(tokens)?))
            }
        },
        Keyword::Search => OperationKind::Search(parse_value(tokens)?),
        Keyword::Clear => OperationKind::Clear,
        Keyword::Push => OperationKind::Push(parse_value(tokens)?),
        Keyword::Pop => OperationKind::Pop,
        Keyword::Peek => OperationKind::Peek,
        Keyword::Enqueue => OperationKind::Enqueue(parse_value(tokens)?),
        Keyword::Dequeue => OperationKind::Dequeue,
        Keyword::Front => OperationKind::Front,
        Keyword::Rear => OperationKind::Rear,
        Keyword::Build => OperationKind::Build(parse_array(tokens)?),
        Keyword::BuildText => OperationKind::BuildText(expect_string(tokens)?),
        Keyword::BuildNumbers => OperationKind::BuildNumbers(parse_array(tokens)?),
        Keyword::Traverse => parse_traverse(tokens)?,
        Keyword::Height => OperationKind::Height,
        Keyword::Min => OperationKind::Min,
        Keyword::Max => OperationKind::Max,
        Keyword::Reverse => OperationKind::Reverse,
        Keyword::Encode => OperationKind::Encode(expect_string(tokens)?),
        Keyword::Decode => OperationKind::Decode(expect_string(tokens)?),
        Keyword::ShowCodes => OperationKind::ShowCodes,
        Keyword::InsertHead => OperationKind::InsertHead(parse_value(tokens)?),
        Keyword::InsertTail => OperationKind::InsertTail(parse_value(tokens)?),
        Keyword::DeleteHead => OperationKind::DeleteHead,
        Keyword::DeleteTail => OperationKind::DeleteTail,
        Keyword::Get => OperationKind::Get(expect_integer(tokens)?),
        Keyword::Size => OperationKind::Size,
        Keyword::Speed => OperationKind::Speed(parse_value(tokens)?),
        Keyword::Pause => {
            if starts_value(peek_kind(tokens)) {
                OperationKind::Pause(Some(parse_value(tokens)?))
            } else {
                OperationKind::Pause(None)
            }
        },
        Keyword::At
        | Keyword::Capacity
        | Keyword::Random
        | Keyword::Left
        | Keyword::Right
        | Keyword::Recursive
        | Keyword::Iterative => return Err(unexpected("OPERATION", token)),
    };

    Ok(Operation { kind,
                   line: *line,
                   column: *column })
}

/// Parses the operands of `insert`.
///
/// Grammar: `insert := "insert" value ["at" INTEGER] ["left" | "right"]`
fn parse_insert<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<OperationKind>
    where I: Iterator<Item = &'a Token> + Clone
{
    let value = parse_value(tokens)?;

    let index = if eat(tokens, &TokenKind::Keyword(Keyword::At)) {
        Some(expect_integer(tokens)?)
    } else {
        None
    };

    let direction = if eat(tokens, &TokenKind::Keyword(Keyword::Left)) {
        Some(Direction::Left)
    } else if eat(tokens, &TokenKind::Keyword(Keyword::Right)) {
        Some(Direction::Right)
    } else {
        None
    };

    Ok(OperationKind::Insert { value,
                               index,
                               direction })
}

/// Parses the operands of `traverse`.
///
/// Grammar: `traverse := "traverse" ORDER ["recursive" | "iterative"]`
///
/// Traversals are recursive unless `iterative` is written.
fn parse_traverse<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<OperationKind>
    where I: Iterator<Item = &'a Token> + Clone
{
    let order = match tokens.next() {
        Some(Token { kind: TokenKind::Order(order),
                     .. }) => *order,
        other => return Err(unexpected("TRAVERSAL_ORDER", other)),
    };

    let recursive = if eat(tokens, &TokenKind::Keyword(Keyword::Iterative)) {
        false
    } else {
        eat(tokens, &TokenKind::Keyword(Keyword::Recursive));
        true
    };

    Ok(OperationKind::Traverse { order, recursive })
}
