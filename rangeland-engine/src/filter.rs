//! Filter predicates for collections and joins.

use std::sync::Arc;

use crate::expression::Expr;

/// A predicate over collection elements, evaluated by the engine.
#[derive(Debug, Clone)]
pub struct Filter {
    expr: Arc<Expr>,
}

impl Filter {
    /// Keeps elements whose numeric `property` is at most `value`.
    pub fn lte(property: &str, value: f64) -> Self {
        Self::from_expr(
            Expr::invoke("Filter.lessThanOrEquals")
                .const_arg("leftField", property)
                .const_arg("rightValue", value)
                .build(),
        )
    }

    /// Matches elements whose `left_field` equals the other element's
    /// `right_field`. This is the join-by-index condition.
    pub fn equals_fields(left_field: &str, right_field: &str) -> Self {
        Self::from_expr(
            Expr::invoke("Filter.equals")
                .const_arg("leftField", left_field)
                .const_arg("rightField", right_field)
                .build(),
        )
    }

    /// Conjunction of two filters.
    pub fn and(&self, other: &Filter) -> Filter {
        Self::from_expr(
            Expr::invoke("Filter.and")
                .arg(
                    "filters",
                    Expr::List(vec![self.expr.clone(), other.expr.clone()]),
                )
                .build(),
        )
    }

    fn from_expr(expr: Expr) -> Self {
        Self {
            expr: Arc::new(expr),
        }
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
    fn lte_wire_shape() {
        let filter = Filter::lte("CLOUDY_PIXEL_PERCENTAGE", 60.0);
        let serialized = serde_json::to_value(filter.expr()).expect("serialization failed");
        let invocation = &serialized["functionInvocationValue"];
        assert_eq!(invocation["functionName"], "Filter.lessThanOrEquals");
        assert_eq!(
            invocation["arguments"]["leftField"]["constantValue"],
            "CLOUDY_PIXEL_PERCENTAGE"
        );
        assert_eq!(invocation["arguments"]["rightValue"]["constantValue"], 60.0);
    }

    #[test]
    fn conjunction_nests_both_sides() {
        let combined = Filter::lte("CLOUD_COVER", 100.0)
            .and(&Filter::equals_fields("system:index", "system:index"));
        assert_eq!(
            combined.expr().ops(),
            vec!["Filter.and", "Filter.lessThanOrEquals", "Filter.equals"]
        );
    }
}
