use std::iter::Peekable;

use crate::{
    ast::{Program, StructureDeclaration},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            operation::parse_operation,
            utils::{expect, peek_kind, skip_newlines, unexpected},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Name given to declarations that omit one.
pub const DEFAULT_NAME: &str = "default";

/// Parses a complete token stream into a `Program`.
///
/// Grammar: `program := { declaration }`
///
/// Newlines between declarations are skipped. Parsing stops at the `EOF`
/// token (or at the end of the slice, if the caller dropped it).
///
/// # Errors
/// Returns the first `ParseError`; no partial program is produced.
///
/// # Example
/// ```
/// use dsviz::interpreter::{lexer::tokenize, parser::core::parse};
///
/// let tokens = tokenize("Stack s { push 1 pop }\nQueue { enqueue 2 }").unwrap();
/// let program = parse(&tokens).unwrap();
/// assert_eq!(program.structures.len(), 2);
/// assert_eq!(program.structures[1].name, "default");
/// ```
pub fn parse(tokens: &[Token]) -> ParseResult<Program> {
    let mut iter = tokens.iter().peekable();
    let mut structures = Vec::new();

    loop {
        skip_newlines(&mut iter);
        match peek_kind(&mut iter) {
            None | Some(TokenKind::Eof) => break,
            Some(_) => structures.push(parse_declaration(&mut iter)?),
        }
    }

    Ok(Program { structures })
}

/// Parses one structure declaration.
///
/// Grammar: `declaration := StructureType [Identifier] "{" { operation } "}"`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the structure keyword.
///
/// # Returns
/// The declaration with its operations in source order.
///
/// # Errors
/// - `Expected STRUCTURE_TYPE` when the block does not start with a kind.
/// - `Expected LBRACE` / `Expected RBRACE` for missing braces.
/// - Any error raised while parsing an operation.
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<StructureDeclaration>
    where I: Iterator<Item = &'a Token> + Clone
{
    let (kind, line, column) = match tokens.next() {
        Some(Token { kind: TokenKind::Structure(kind),
                     line,
                     column,
                     .. }) => (*kind, *line, *column),
        other => return Err(unexpected("STRUCTURE_TYPE", other)),
    };

    let name = match peek_kind(tokens) {
        Some(TokenKind::Identifier(name)) => {
            let name = name.clone();
            tokens.next();
            name
        },
        _ => DEFAULT_NAME.to_string(),
    };

    expect(tokens, &TokenKind::LBrace)?;

    let mut operations = Vec::new();
    loop {
        skip_newlines(tokens);
        match peek_kind(tokens) {
            Some(TokenKind::RBrace) => {
                tokens.next();
                break;
            },
            None | Some(TokenKind::Eof) => return Err(unexpected("RBRACE", tokens.next())),
            Some(_) => operations.push(parse_operation(tokens)?),
        }
    }

    Ok(StructureDeclaration { kind,
                              name,
                              operations,
                              line,
                              column })
}
