//! Recursive descent parser for binding expressions.
//!
//! Turns the text of one markup attribute expression into a flat AST. The
//! parser is a pure text-to-tree transform: no scope lookups, no types. The
//! target [`TypeHint`] is carried through unchanged for the resolver.

mod error;
mod grammar;
mod print;

use bind_ir::{ExprArena, ExprId, Span, StringInterner, Token, TokenKind, TokenList, Type};
use bind_stack::ensure_sufficient_stack;

pub use error::{ParseError, ParseErrorKind};
pub use print::to_sexpr;

/// Expected result type of the expression, supplied by the object-graph
/// compiler from the target slot.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum TypeHint {
    #[default]
    None,
    Expected(Type),
}

impl TypeHint {
    /// Component type when the hint is an array (possibly inside an
    /// observable slot); collection literals are then typed as arrays.
    pub fn array_component(&self) -> Option<&Type> {
        match self {
            TypeHint::Expected(ty) => match ty.value_type() {
                Type::Array(component) => Some(component),
                _ => None,
            },
            TypeHint::None => None,
        }
    }

    pub fn expected(&self) -> Option<&Type> {
        match self {
            TypeHint::Expected(ty) => Some(ty),
            TypeHint::None => None,
        }
    }
}

/// Output of a successful parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedExpr {
    pub arena: ExprArena,
    pub root: ExprId,
    pub hint: TypeHint,
}

/// Parse one binding expression.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(
    source: &str,
    hint: TypeHint,
    interner: &StringInterner,
) -> Result<ParsedExpr, ParseError> {
    let lexed = bind_lexer::lex(source, interner);
    if let Some(err) = lexed.errors.into_iter().next() {
        return Err(err.into());
    }

    let mut parser = Parser::new(&lexed.tokens, interner, ExprArena::new());
    let root = parser.parse_expr()?;
    parser.expect_end()?;

    tracing::trace!(nodes = parser.arena.len(), "parsed");
    Ok(ParsedExpr {
        arena: parser.arena,
        root,
        hint,
    })
}

/// Parser state over one token list.
pub(crate) struct Parser<'a> {
    tokens: &'a TokenList,
    pos: usize,
    pub(crate) arena: ExprArena,
    pub(crate) interner: &'a StringInterner,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a TokenList, interner: &'a StringInterner, arena: ExprArena) -> Self {
        Parser {
            tokens,
            pos: 0,
            arena,
            interner,
        }
    }

    #[inline]
    pub(crate) fn current(&self) -> Token {
        self.tokens
            .get(self.pos)
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, Span::DUMMY))
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    /// Kind of the token after the current one.
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    #[inline]
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume a closing delimiter opened at `open`.
    pub(crate) fn expect_close(
        &mut self,
        kind: TokenKind,
        open: Span,
        delimiter: char,
    ) -> Result<Span, ParseError> {
        if self.check(kind) {
            return Ok(self.advance().span);
        }
        let span = self.current_span();
        let err = if self.is_at_end() {
            ParseErrorKind::UnclosedDelimiter { open, delimiter }
        } else {
            ParseErrorKind::UnexpectedToken {
                expected: kind.display_name(),
                found: self.current_kind(),
            }
        };
        Err(ParseError::new(err, span))
    }

    /// Fail on trailing tokens after a complete expression.
    pub(crate) fn expect_end(&self) -> Result<(), ParseError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected: "end of expression",
                    found: self.current_kind(),
                },
                self.current_span(),
            ))
        }
    }

    /// Parse an expression (ternary level).
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_ternary())
    }
}
