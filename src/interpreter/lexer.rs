use std::fmt;

use logos::{FilterResult, Lexer, Logos};

use crate::{
    ast::{StructureKind, TraversalOrder},
    error::{LexErrorKind, LexicalError},
};

/// Raw lexemes recognised by logos.
///
/// Words are classified into keywords, structure kinds, traversal orders and
/// identifiers afterwards, because keyword lookup is case-insensitive.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
enum Lexeme {
    /// `3.14`, `-0.5`
    #[regex(r"-?[0-9]+\.[0-9]+", parse_float)]
    Float(f64),
    /// `42`, `-7`
    #[regex(r"-?[0-9]+", parse_integer)]
    Integer(i64),
    /// Keywords and identifiers.
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Word,
    /// `"text"` or `'text'`
    #[token("\"", |lex| lex_string(lex, '"'))]
    #[token("'", |lex| lex_string(lex, '\''))]
    Str(String),
    /// `// Comments.`
    #[token("//", skip_line_comment)]
    LineComment,
    /// `/* Block comments. */`
    #[token("/*", skip_block_comment)]
    BlockComment,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// Statement separator.
    #[token("\n")]
    Newline,
    /// Spaces, tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

macro_rules! keywords {
    ($($variant:ident => $word:literal, $name:literal;)*) => {
        /// Reserved words other than structure kinds and traversal orders.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $word, "`")]
                $variant,
            )*
        }

        impl Keyword {
            /// Looks up a keyword from a lower-cased word.
            #[must_use]
            pub fn from_word(word: &str) -> Option<Self> {
                match word {
                    $($word => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Source spelling.
            #[must_use]
            pub const fn word(self) -> &'static str {
                match self {
                    $(Self::$variant => $word,)*
                }
            }

            /// Upper-case token name used in parse errors.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

keywords! {
    Init => "init", "INIT";
    Insert => "insert", "INSERT";
    Delete => "delete", "DELETE";
    Search => "search", "SEARCH";
    Clear => "clear", "CLEAR";
    Push => "push", "PUSH";
    Pop => "pop", "POP";
    Peek => "peek", "PEEK";
    Enqueue => "enqueue", "ENQUEUE";
    Dequeue => "dequeue", "DEQUEUE";
    Front => "front", "FRONT";
    Rear => "rear", "REAR";
    Build => "build", "BUILD";
    BuildText => "build_text", "BUILD_TEXT";
    BuildNumbers => "build_numbers", "BUILD_NUMBERS";
    Traverse => "traverse", "TRAVERSE";
    Height => "height", "HEIGHT";
    Min => "min", "MIN";
    Max => "max", "MAX";
    Reverse => "reverse", "REVERSE";
    Encode => "encode", "ENCODE";
    Decode => "decode", "DECODE";
    ShowCodes => "show_codes", "SHOW_CODES";
    InsertHead => "insert_head", "INSERT_HEAD";
    InsertTail => "insert_tail", "INSERT_TAIL";
    DeleteHead => "delete_head", "DELETE_HEAD";
    DeleteTail => "delete_tail", "DELETE_TAIL";
    Get => "get", "GET";
    Size => "size", "SIZE";
    Speed => "speed", "SPEED";
    Pause => "pause", "PAUSE";
    At => "at", "AT";
    Capacity => "capacity", "CAPACITY";
    Random => "random", "RANDOM";
    Left => "left", "LEFT";
    Right => "right", "RIGHT";
    Recursive => "recursive", "RECURSIVE";
    Iterative => "iterative", "ITERATIVE";
}

/// The category of a token, with its decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `Sequential`, `BST`, ...
    Structure(StructureKind),
    /// Operation and modifier keywords.
    Keyword(Keyword),
    /// `preorder`, `inorder`, `postorder`, `levelorder`
    Order(TraversalOrder),
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal with escapes resolved.
    Str(String),
    /// Any other word.
    Identifier(String),
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// Line break.
    Newline,
    /// End of input; always the last token.
    Eof,
}

impl TokenKind {
    /// Upper-case name used in `Expected X, got Y` messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Structure(kind) => match kind {
                StructureKind::Sequential => "SEQUENTIAL",
                StructureKind::Linked => "LINKED",
                StructureKind::Stack => "STACK",
                StructureKind::Queue => "QUEUE",
                StructureKind::Binary => "BINARY",
                StructureKind::Bst => "BST",
                StructureKind::Avl => "AVL",
                StructureKind::Huffman => "HUFFMAN",
            },
            Self::Keyword(keyword) => keyword.name(),
            Self::Order(order) => match order {
                TraversalOrder::Preorder => "PREORDER",
                TraversalOrder::Inorder => "INORDER",
                TraversalOrder::Postorder => "POSTORDER",
                TraversalOrder::LevelOrder => "LEVELORDER",
            },
            Self::Integer(_) | Self::Float(_) => "NUMBER",
            Self::Str(_) => "STRING",
            Self::Identifier(_) => "IDENTIFIER",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::Comma => "COMMA",
            Self::Colon => "COLON",
            Self::Dot => "DOT",
            Self::Newline => "NEWLINE",
            Self::Eof => "EOF",
        }
    }
}

/// Represents a lexical token in the source input.
///
/// `value` keeps the original text of the token, so a keyword written `BST`
/// or `bst` can be echoed back as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Category and payload.
    pub kind:   TokenKind,
    /// Source text of the token.
    pub value:  String,
    /// 1-based line.
    pub line:   usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) at {}:{}", self.kind.name(), self.value, self.line, self.column)
    }
}

/// Maps byte offsets to line and column numbers.
struct LineIndex<'s> {
    source: &'s str,
    starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    fn new(source: &'s str) -> Self {
        let starts = std::iter::once(0).chain(source.match_indices('\n').map(|(i, _)| i + 1))
                                       .collect();
        Self { source, starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[line.saturating_sub(1)];
        let column = self.source
                         .get(line_start..offset)
                         .map_or(1, |prefix| prefix.chars().count() + 1);
        (line, column)
    }
}

/// Tokenizes a whole program.
///
/// The returned vector always ends with a `TokenKind::Eof` token. Newline
/// tokens are kept; comments and other whitespace are dropped.
///
/// # Errors
/// Returns a `LexicalError` at the first unterminated string, unterminated
/// block comment, oversized number or unrecognised character. No partial
/// token stream is returned.
///
/// # Example
/// ```
/// use dsviz::interpreter::lexer::{TokenKind, tokenize};
///
/// let tokens = tokenize("Stack s { push 1 }").unwrap();
/// let names: Vec<_> = tokens.iter().map(|t| t.kind.name()).collect();
/// assert_eq!(names, ["STACK", "IDENTIFIER", "LBRACE", "PUSH", "NUMBER", "RBRACE", "EOF"]);
/// assert!(matches!(tokens[4].kind, TokenKind::Integer(1)));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    let index = LineIndex::new(source);
    let mut lexer = Lexeme::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let (line, column) = index.position(span.start);

        let lexeme = result.map_err(|kind| {
                               let kind = match kind {
                                   LexErrorKind::UnexpectedCharacter(_) => {
                                       let found = source.get(span.start..)
                                                         .and_then(|rest| rest.chars().next());
                                       LexErrorKind::UnexpectedCharacter(found.unwrap_or('\0'))
                                   },
                                   other => other,
                               };
                               LexicalError { kind,
                                              line,
                                              column }
                           })?;

        let slice = lexer.slice();
        let kind = match lexeme {
            Lexeme::Float(x) => TokenKind::Float(x),
            Lexeme::Integer(n) => TokenKind::Integer(n),
            Lexeme::Word => classify_word(slice),
            Lexeme::Str(s) => TokenKind::Str(s),
            Lexeme::LBrace => TokenKind::LBrace,
            Lexeme::RBrace => TokenKind::RBrace,
            Lexeme::LBracket => TokenKind::LBracket,
            Lexeme::RBracket => TokenKind::RBracket,
            Lexeme::LParen => TokenKind::LParen,
            Lexeme::RParen => TokenKind::RParen,
            Lexeme::Comma => TokenKind::Comma,
            Lexeme::Colon => TokenKind::Colon,
            Lexeme::Dot => TokenKind::Dot,
            Lexeme::Newline => TokenKind::Newline,
            // Skipped by their callbacks.
            Lexeme::LineComment | Lexeme::BlockComment | Lexeme::Ignored => continue,
        };

        tokens.push(Token { kind,
                            value: slice.to_string(),
                            line,
                            column });
    }

    let (line, column) = index.position(source.len());
    tokens.push(Token { kind: TokenKind::Eof,
                        value: String::new(),
                        line,
                        column });

    Ok(tokens)
}

/// Sorts a word into structure kind, keyword, traversal order or identifier.
fn classify_word(word: &str) -> TokenKind {
    let lower = word.to_lowercase();
    if let Some(kind) = StructureKind::from_keyword(&lower) {
        TokenKind::Structure(kind)
    } else if let Some(keyword) = Keyword::from_word(&lower) {
        TokenKind::Keyword(keyword)
    } else if let Some(order) = TraversalOrder::from_keyword(&lower) {
        TokenKind::Order(order)
    } else {
        TokenKind::Identifier(word.to_string())
    }
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &Lexer<Lexeme>) -> Result<f64, LexErrorKind> {
    lex.slice().parse().map_err(|_| LexErrorKind::InvalidNumber)
}

/// Parses an integer literal from the current token slice.
///
/// # Returns
/// - `Ok(i64)`: The parsed value.
/// - `Err(LexErrorKind::InvalidNumber)`: If the literal does not fit `i64`.
fn parse_integer(lex: &Lexer<Lexeme>) -> Result<i64, LexErrorKind> {
    lex.slice().parse().map_err(|_| LexErrorKind::InvalidNumber)
}

/// Reads the body of a string literal after its opening quote.
///
/// Supports `\n`, `\t`, `\\` and an escaped closing quote; any other escaped
/// character stands for itself.
fn lex_string(lex: &mut Lexer<Lexeme>, quote: char) -> Result<String, LexErrorKind> {
    let mut text = String::new();
    let mut chars = lex.remainder().char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            c if c == quote => {
                lex.bump(i + c.len_utf8());
                return Ok(text);
            },
            c => text.push(c),
        }
    }

    Err(LexErrorKind::UnterminatedString)
}

fn skip_line_comment(lex: &mut Lexer<Lexeme>) -> logos::Skip {
    let rest = lex.remainder();
    lex.bump(rest.find('\n').unwrap_or(rest.len()));
    logos::Skip
}

fn skip_block_comment(lex: &mut Lexer<Lexeme>) -> FilterResult<(), LexErrorKind> {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        },
        None => {
            lex.bump(rest.len());
            FilterResult::Error(LexErrorKind::UnterminatedComment)
        },
    }
}
