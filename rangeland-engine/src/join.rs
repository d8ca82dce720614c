//! Joins between two collections.

use std::sync::Arc;

use crate::collection::ImageCollection;
use crate::expression::Expr;
use crate::filter::Filter;

/// A join strategy applied to a primary and a secondary collection.
#[derive(Debug, Clone)]
pub struct Join {
    expr: Arc<Expr>,
}

impl Join {
    /// For every primary element, stores the first matching secondary
    /// element under the given property name.
    pub fn save_first(property: &str) -> Self {
        Self {
            expr: Arc::new(
                Expr::invoke("Join.saveFirst")
                    .const_arg("matchKey", property)
                    .build(),
            ),
        }
    }

    /// Applies the join, producing the primary collection enriched with
    /// the matches.
    pub fn apply(
        &self,
        primary: &ImageCollection,
        secondary: &ImageCollection,
        condition: &Filter,
    ) -> ImageCollection {
        ImageCollection::from_expr(
            Expr::invoke("Join.apply")
                .arg("join", self.expr.clone())
                .arg("primary", primary.expr_arc())
                .arg("secondary", secondary.expr_arc())
                .arg("condition", condition.expr_arc())
                .build(),
        )
    }
}
