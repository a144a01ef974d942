//! Tokens produced by the lexer.

use std::fmt;

use crate::{Name, Span};

/// Token kinds of the binding-expression language.
///
/// Literal payloads are already decoded: numbers carry their value (floats as
/// raw bits so the enum stays `Eq + Hash`), strings and identifiers are
/// interned. Template literals carry their *raw* body; the parser splits and
/// re-lexes the `{...}` segments.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    Int(u64),
    Long(u64),
    Float(u32),
    Double(u64),
    Char(char),
    Str(Name),
    Template(Name),
    Ident(Name),

    // Keywords
    True,
    False,
    Null,
    This,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Tilde,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    Question,
    Colon,

    // Punctuation
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,

    /// Lexical error; the lexer reports the detail separately.
    Error,
    Eof,
}

impl TokenKind {
    /// Human-readable token description for diagnostics.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) | TokenKind::Long(_) => "integer literal",
            TokenKind::Float(_) | TokenKind::Double(_) => "floating-point literal",
            TokenKind::Char(_) => "character literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Template(_) => "template string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::This => "this",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of expression",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A token with its source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Lexer output: a token vector always terminated by `Eof`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Get the token at `index`, clamping to the trailing `Eof`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index).or_else(|| self.tokens.last())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Token kinds without spans, for tests and debug dumps.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}
