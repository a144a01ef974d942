//! Raw tokens recognized by `logos`, before decoding and interning.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum RawToken {
    // Keywords
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("this")]
    This,

    // Operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<<")]
    Shl,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">>")]
    Shr,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AmpAmp,
    #[token("&")]
    Amp,
    #[token("||")]
    PipePipe,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Punctuation
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Literals. Values are decoded in `convert` so range errors carry spans.
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+[lL]")]
    Long,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[dD]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[dD]?")]
    #[regex(r"[0-9]+[dD]")]
    Double,
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?[fF]")]
    Float,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedStr,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,
    #[regex(r"'([^'\\\n]|\\.)*")]
    UnterminatedChar,

    #[regex(r"`([^`\\]|\\.)*`")]
    Template,
    #[regex(r"`([^`\\]|\\.)*")]
    UnterminatedTemplate,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}
