//! Operators: ternary, the binary precedence chain, unary prefix.

use bind_ir::{BinaryOp, Expr, ExprId, ExprKind, TokenKind, UnaryOp};
use bind_stack::ensure_sufficient_stack;

use crate::{ParseError, ParseErrorKind, Parser};

/// Loosest binary level (`||`); see [`BinaryOp::precedence`].
const LOWEST_BINARY: u8 = 12;
/// Tightest binary level (`* / %`).
const HIGHEST_BINARY: u8 = 3;

/// Magnitude of `i32::MIN`, only valid directly under unary minus.
const INT_MIN_MAGNITUDE: u64 = 1 << 31;
const LONG_MIN_MAGNITUDE: u64 = 1 << 63;

impl Parser<'_> {
    /// `cond ? a : b`, right-associative.
    pub(crate) fn parse_ternary(&mut self) -> Result<ExprId, ParseError> {
        let cond = self.parse_binary(LOWEST_BINARY)?;
        if !self.check(TokenKind::Question) {
            return Ok(cond);
        }
        self.advance();
        let then_expr = self.parse_expr()?;
        if !self.check(TokenKind::Colon) {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected: "`:`",
                    found: self.current_kind(),
                },
                self.current_span(),
            ));
        }
        self.advance();
        let else_expr = self.parse_expr()?;

        let span = self
            .arena
            .get_expr(cond)
            .span
            .merge(self.arena.get_expr(else_expr).span);
        Ok(self.arena.alloc_expr(Expr::new(
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            },
            span,
        )))
    }

    /// One level of the left-associative binary chain.
    fn parse_binary(&mut self, level: u8) -> Result<ExprId, ParseError> {
        if level < HIGHEST_BINARY {
            return self.parse_unary();
        }

        let mut left = self.parse_binary(level - 1)?;
        while let Some(op) = self.match_binary_op().filter(|op| op.precedence() == level) {
            self.advance();
            let right = self.parse_binary(level - 1)?;

            let span = self
                .arena
                .get_expr(left)
                .span
                .merge(self.arena.get_expr(right).span);
            left = self
                .arena
                .alloc_expr(Expr::new(ExprKind::Binary { op, left, right }, span));
        }
        Ok(left)
    }

    fn match_binary_op(&self) -> Option<BinaryOp> {
        let op = match self.current_kind() {
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Shl => BinaryOp::Shl,
            TokenKind::Shr => BinaryOp::Shr,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::PipePipe => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        }
    }

    /// Prefix `- ! ~`.
    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let Some(op) = self.match_unary_op() else {
            return self.parse_postfix();
        };
        let op_span = self.advance().span;

        // `-2147483648` and `-9223372036854775808L` are only expressible as
        // a negated literal.
        if op == UnaryOp::Neg {
            let literal = match self.current_kind() {
                TokenKind::Int(INT_MIN_MAGNITUDE) => Some(ExprKind::Int(i32::MIN)),
                TokenKind::Long(LONG_MIN_MAGNITUDE) => Some(ExprKind::Long(i64::MIN)),
                _ => None,
            };
            if let Some(kind) = literal {
                let span = op_span.merge(self.advance().span);
                return Ok(self.arena.alloc_expr(Expr::new(kind, span)));
            }
        }

        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = op_span.merge(self.arena.get_expr(operand).span);
        Ok(self
            .arena
            .alloc_expr(Expr::new(ExprKind::Unary { op, operand }, span)))
    }
}
