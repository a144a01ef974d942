//! Primary expressions.

use bind_ir::{Expr, ExprId, ExprKind, TokenKind};

use crate::{ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    pub(crate) fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.current();
        let span = token.span;

        let kind = match token.kind {
            TokenKind::Int(value) => {
                let value = i32::try_from(value)
                    .map_err(|_| ParseError::new(ParseErrorKind::IntegerOutOfRange, span))?;
                ExprKind::Int(value)
            }
            TokenKind::Long(value) => {
                let value = i64::try_from(value)
                    .map_err(|_| ParseError::new(ParseErrorKind::IntegerOutOfRange, span))?;
                ExprKind::Long(value)
            }
            TokenKind::Float(bits) => ExprKind::Float(bits),
            TokenKind::Double(bits) => ExprKind::Double(bits),
            TokenKind::Char(c) => ExprKind::Char(c),
            TokenKind::Str(name) => ExprKind::Str(name),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::This => ExprKind::This,

            TokenKind::Template(body) => {
                self.advance();
                return self.parse_template(body, span);
            }

            TokenKind::Ident(name) => {
                if self.peek_kind() == TokenKind::LParen {
                    self.advance();
                    let (args, close) = self.parse_call_args()?;
                    return Ok(self
                        .arena
                        .alloc_expr(Expr::new(ExprKind::Call { func: name, args }, span.merge(close))));
                }
                ExprKind::Ident(name)
            }

            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                let close = self.expect_close(TokenKind::RParen, span, '(')?;
                // Re-span so diagnostics cover the parentheses.
                let expr = *self.arena.get_expr(inner);
                return Ok(self
                    .arena
                    .alloc_expr(Expr::new(expr.kind, span.merge(close))));
            }

            TokenKind::LBracket => {
                self.advance();
                let (items, close) = self.parse_list(TokenKind::RBracket, span, '[')?;
                return Ok(self
                    .arena
                    .alloc_expr(Expr::new(ExprKind::Collection(items), span.merge(close))));
            }

            found => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedExpression { found },
                    span,
                ));
            }
        };

        self.advance();
        Ok(self.arena.alloc_expr(Expr::new(kind, span)))
    }
}
