//! Numeric scalar expressions.

use std::sync::Arc;

use crate::expression::Expr;

/// A server-side numeric value.
///
/// Like every handle in this crate it is lazy: arithmetic only appends
/// nodes to the expression graph.
#[derive(Debug, Clone)]
pub struct EngineNumber {
    expr: Arc<Expr>,
}

impl EngineNumber {
    /// Wraps a literal number.
    pub fn constant(value: f64) -> Self {
        Self::from_expr(Expr::constant(value))
    }

    pub(crate) fn from_expr(expr: Expr) -> Self {
        Self {
            expr: Arc::new(expr),
        }
    }

    /// `self - other`.
    pub fn subtract(&self, other: &EngineNumber) -> EngineNumber {
        EngineNumber::from_expr(
            Expr::invoke("Number.subtract")
                .arg("left", self.expr.clone())
                .arg("right", other.expr.clone())
                .build(),
        )
    }

    /// The underlying expression.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub(crate) fn expr_arc(&self) -> Arc<Expr> {
        self.expr.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtraction_builds_an_invocation() {
        let delta = EngineNumber::constant(90.0).subtract(&EngineNumber::constant(135.5));
        assert_eq!(delta.expr().ops(), vec!["Number.subtract"]);
    }
}
