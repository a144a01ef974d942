//! Lexer for binding expressions using logos with string interning.
//!
//! Produces a [`TokenList`] terminated by `Eof` plus every lexical error
//! found. Lexing never stops early: a bad token becomes `TokenKind::Error`
//! and the parser reports the first error it meets.
//!
//! Template literals are kept raw; the parser splits them and re-lexes each
//! `{...}` segment with [`lex_with_offset`] so spans stay relative to the
//! full expression.

mod escape;
mod lex_error;
mod raw_token;

use bind_ir::{Span, StringInterner, Token, TokenKind, TokenList};
use logos::Logos;

pub use escape::{unescape, EscapeError};
pub use lex_error::{LexError, LexErrorKind};
use raw_token::RawToken;

/// Result of lexing one expression.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

/// Lex a complete expression.
pub fn lex(source: &str, interner: &StringInterner) -> LexOutput {
    lex_with_offset(source, 0, interner)
}

/// Lex `source` as if it started at byte `offset` of a larger text.
#[tracing::instrument(level = "trace", skip_all, fields(len = source.len(), offset = offset))]
pub fn lex_with_offset(source: &str, offset: u32, interner: &StringInterner) -> LexOutput {
    let mut output = LexOutput::default();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let local = Span::try_from_range(logos.span()).unwrap_or(Span::DUMMY);
        let span = local.shift(offset);
        let slice = logos.slice();

        let kind = match result {
            Ok(raw) => convert(raw, slice, span, interner, &mut output.errors),
            Err(()) => {
                let c = slice.chars().next().unwrap_or('\u{FFFD}');
                output
                    .errors
                    .push(LexError::new(span, LexErrorKind::InvalidCharacter(c)));
                TokenKind::Error
            }
        };
        output.tokens.push(Token::new(kind, span));
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    output
        .tokens
        .push(Token::new(TokenKind::Eof, Span::point(end).shift(offset)));

    tracing::trace!(
        tokens = output.tokens.len(),
        errors = output.errors.len(),
        "lexed"
    );
    output
}

/// Decode one raw token, interning text payloads.
fn convert(
    raw: RawToken,
    slice: &str,
    span: Span,
    interner: &StringInterner,
    errors: &mut Vec<LexError>,
) -> TokenKind {
    let mut fail = |kind: LexErrorKind| {
        errors.push(LexError::new(span, kind));
        TokenKind::Error
    };

    match raw {
        RawToken::Int => match slice.parse::<u64>() {
            Ok(v) => TokenKind::Int(v),
            Err(_) => fail(LexErrorKind::NumberOutOfRange),
        },
        RawToken::Long => match slice[..slice.len() - 1].parse::<u64>() {
            Ok(v) => TokenKind::Long(v),
            Err(_) => fail(LexErrorKind::NumberOutOfRange),
        },
        RawToken::Double => {
            let digits = slice.trim_end_matches(['d', 'D']);
            match digits.parse::<f64>() {
                Ok(v) if v.is_finite() => TokenKind::Double(v.to_bits()),
                _ => fail(LexErrorKind::NumberOutOfRange),
            }
        }
        RawToken::Float => match slice[..slice.len() - 1].parse::<f32>() {
            Ok(v) if v.is_finite() => TokenKind::Float(v.to_bits()),
            _ => fail(LexErrorKind::NumberOutOfRange),
        },
        RawToken::Str => match unescape(&slice[1..slice.len() - 1]) {
            Ok(text) => TokenKind::Str(interner.intern(&text)),
            Err(_) => fail(LexErrorKind::InvalidEscape),
        },
        RawToken::Char => match unescape(&slice[1..slice.len() - 1]) {
            Ok(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => TokenKind::Char(c),
                    _ => fail(LexErrorKind::BadCharLiteral),
                }
            }
            Err(_) => fail(LexErrorKind::InvalidEscape),
        },
        RawToken::Template => TokenKind::Template(interner.intern(&slice[1..slice.len() - 1])),
        RawToken::UnterminatedStr => fail(LexErrorKind::UnterminatedString),
        RawToken::UnterminatedChar => fail(LexErrorKind::UnterminatedChar),
        RawToken::UnterminatedTemplate => fail(LexErrorKind::UnterminatedTemplate),
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::This => TokenKind::This,

        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Shl => TokenKind::Shl,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Shr => TokenKind::Shr,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::Amp => TokenKind::Amp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,

        RawToken::Dot => TokenKind::Dot,
        RawToken::Comma => TokenKind::Comma,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
    }
}

#[cfg(test)]
mod tests;
