//! Geometry handle and the accessors that pull geometry data back from
//! the engine.

use std::sync::Arc;

use crate::client::EngineClient;
use crate::error::EngineError;
use crate::expression::Expr;

/// A server-side geometry.
///
/// Client-side geometries enter the graph as GeoJSON constants; everything
/// derived from them (centroids, bounds) stays on the server until fetched.
#[derive(Debug, Clone)]
pub struct Geometry {
    expr: Arc<Expr>,
}

impl Geometry {
    /// Encodes a `geo-types` geometry as a GeoJSON constant.
    pub fn from_geo<G: Into<geo_types::Geometry<f64>>>(geometry: G) -> Self {
        let geometry: geo_types::Geometry<f64> = geometry.into();
        let geojson = geojson::Geometry::new(geojson::Value::from(&geometry));
        let value =
            serde_json::to_value(&geojson).expect("GeoJSON geometries serialize to plain JSON");
        Self::from_expr(Expr::Constant(value))
    }

    pub(crate) fn from_expr(expr: Expr) -> Self {
        Self {
            expr: Arc::new(expr),
        }
    }

    /// Centroid of the geometry.
    pub fn centroid(&self) -> Geometry {
        self.unary("Geometry.centroid")
    }

    /// Bounding rectangle of the geometry.
    pub fn bounds(&self) -> Geometry {
        self.unary("Geometry.bounds")
    }

    /// Coordinate list of the geometry, as an expression.
    pub fn coordinates(&self) -> Expr {
        Expr::invoke("Geometry.coordinates")
            .arg("geometry", self.expr.clone())
            .build()
    }

    fn unary(&self, function: &str) -> Geometry {
        Self::from_expr(
            Expr::invoke(function)
                .arg("geometry", self.expr.clone())
                .build(),
        )
    }

    /// Evaluates the geometry on the engine and returns it as GeoJSON.
    pub fn fetch(&self, client: &EngineClient) -> Result<geojson::Geometry, EngineError> {
        let value = client.compute(&self.expr)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Evaluates the centroid and returns it as `(lat, lon)`.
    ///
    /// Note the order: GeoJSON positions are `[lon, lat]`, but map widgets
    /// center on `(lat, lon)`, so the pair is reversed here.
    pub fn centroid_coordinates(&self, client: &EngineClient) -> Result<(f64, f64), EngineError> {
        let value = client.compute(&self.centroid().coordinates())?;
        let coords = value
            .as_array()
            .filter(|coords| coords.len() >= 2)
            .ok_or_else(|| EngineError::UnexpectedValue(format!("not a position: {value}")))?;
        match (coords[0].as_f64(), coords[1].as_f64()) {
            (Some(lon), Some(lat)) => Ok((lat, lon)),
            _ => Err(EngineError::UnexpectedValue(format!(
                "non-numeric position: {value}"
            ))),
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
