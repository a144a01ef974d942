//! Postfix chains: `.name`, `.name(args)`, `[index]`.

use bind_ir::{Expr, ExprId, ExprKind, ExprRange, Span, TokenKind};

use crate::{ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    pub(crate) fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let TokenKind::Ident(name) = self.current_kind() else {
                        return Err(ParseError::new(
                            ParseErrorKind::ExpectedMember {
                                found: self.current_kind(),
                            },
                            self.current_span(),
                        ));
                    };
                    let name_span = self.advance().span;
                    let start = self.arena.get_expr(expr).span;

                    let (kind, end) = if self.check(TokenKind::LParen) {
                        let (args, close) = self.parse_call_args()?;
                        (
                            ExprKind::MethodCall {
                                receiver: expr,
                                method: name,
                                args,
                            },
                            close,
                        )
                    } else {
                        (
                            ExprKind::Field {
                                receiver: expr,
                                name,
                            },
                            name_span,
                        )
                    };
                    expr = self.arena.alloc_expr(Expr::new(kind, start.merge(end)));
                }
                TokenKind::LBracket => {
                    let open = self.advance().span;
                    let index = self.parse_expr()?;
                    let close = self.expect_close(TokenKind::RBracket, open, '[')?;
                    let span = self.arena.get_expr(expr).span.merge(close);
                    expr = self.arena.alloc_expr(Expr::new(
                        ExprKind::Index {
                            receiver: expr,
                            index,
                        },
                        span,
                    ));
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `( expr, ... )` starting at the current `(`; returns the closing span.
    pub(crate) fn parse_call_args(&mut self) -> Result<(ExprRange, Span), ParseError> {
        let open = self.advance().span;
        self.parse_list(TokenKind::RParen, open, '(')
    }

    /// Comma-separated expressions up to `close`. A trailing comma is allowed.
    pub(crate) fn parse_list(
        &mut self,
        close: TokenKind,
        open: Span,
        delimiter: char,
    ) -> Result<(ExprRange, Span), ParseError> {
        let mut items = Vec::new();
        while !self.check(close) && !self.is_at_end() {
            items.push(self.parse_expr()?);
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let close_span = self.expect_close(close, open, delimiter)?;
        Ok((self.arena.alloc_expr_list(&items), close_span))
    }
}
