//! Arena storage for the flat expression AST.

use crate::{Expr, ExprId, ExprRange, TemplatePart, TemplatePartRange};

/// Contiguous storage for one parsed expression tree.
///
/// Children are referenced by `ExprId`; argument and element lists are
/// flattened into `expr_lists` and addressed by `ExprRange`.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    template_parts: Vec<TemplatePart>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its id.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("expression arena exceeded u32::MAX nodes"));
        self.exprs.push(expr);
        ExprId::new(index)
    }

    /// Get an expression by id.
    ///
    /// # Panics
    /// Panics if the id did not come from this arena.
    #[inline]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Allocate a list of expression ids.
    pub fn alloc_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = u32::try_from(self.expr_lists.len())
            .unwrap_or_else(|_| panic!("expression list storage exceeded u32::MAX"));
        let len = u16::try_from(ids.len())
            .unwrap_or_else(|_| panic!("expression list longer than u16::MAX"));
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, len)
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    pub fn alloc_template_parts(&mut self, parts: &[TemplatePart]) -> TemplatePartRange {
        let start = u32::try_from(self.template_parts.len())
            .unwrap_or_else(|_| panic!("template part storage exceeded u32::MAX"));
        let len = u16::try_from(parts.len())
            .unwrap_or_else(|_| panic!("template with more than u16::MAX segments"));
        self.template_parts.extend_from_slice(parts);
        TemplatePartRange { start, len }
    }

    #[inline]
    pub fn get_template_parts(&self, range: TemplatePartRange) -> &[TemplatePart] {
        let start = range.start as usize;
        &self.template_parts[start..start + range.len as usize]
    }

    /// Number of allocated expressions.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

#[cfg(test)]
mod tests;
