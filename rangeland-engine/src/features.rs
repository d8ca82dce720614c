//! Feature collection handle.

use std::sync::Arc;

use crate::expression::Expr;
use crate::geometry::Geometry;

/// A server-side collection of vector features.
///
/// Used as the paint target by the polygon mask helpers: the geometries of
/// the collection are rasterized onto an image server-side.
#[derive(Debug, Clone)]
pub struct FeatureCollection {
    expr: Arc<Expr>,
}

impl FeatureCollection {
    /// Loads a table asset by id.
    pub fn load(table_id: &str) -> Self {
        Self {
            expr: Arc::new(
                Expr::invoke("Collection.loadTable")
                    .const_arg("tableId", table_id)
                    .build(),
            ),
        }
    }

    /// Builds a collection from client-side polygons.
    pub fn from_polygons(polygons: &[geo_types::Polygon<f64>]) -> Self {
        let features = polygons
            .iter()
            .map(|polygon| {
                Expr::invoke("Feature")
                    .arg("geometry", Geometry::from_geo(polygon.clone()).expr_arc())
                    .build()
            })
            .collect::<Vec<_>>();
        Self {
            expr: Arc::new(
                Expr::invoke("Collection")
                    .arg("features", Expr::list(features))
                    .build(),
            ),
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
    use geo_types::polygon;

    use super::*;

    #[test]
    fn polygons_become_features() {
        let exclosure = polygon![
            (x: 28.0, y: 44.5),
            (x: 28.1, y: 44.5),
            (x: 28.1, y: 44.6),
        ];
        let collection = FeatureCollection::from_polygons(&[exclosure]);
        assert_eq!(
            collection.expr().ops(),
            vec!["Collection", "Feature"]
        );
    }
}
