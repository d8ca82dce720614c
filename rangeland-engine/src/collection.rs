//! Image collection handle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::dates::DateRange;
use crate::expression::Expr;
use crate::filter::Filter;
use crate::geometry::Geometry;
use crate::image::Image;

static MAP_ARG: AtomicUsize = AtomicUsize::new(0);

/// A server-side collection of images.
///
/// Filters are declarative: each one appends an invocation node and the
/// engine decides how to evaluate the chain.
#[derive(Debug, Clone)]
pub struct ImageCollection {
    expr: Arc<Expr>,
}

impl ImageCollection {
    /// Loads a collection asset by id.
    pub fn load(id: &str) -> Self {
        Self::from_expr(
            Expr::invoke("ImageCollection.load")
                .const_arg("id", id)
                .build(),
        )
    }

    pub(crate) fn from_expr(expr: Expr) -> Self {
        Self {
            expr: Arc::new(expr),
        }
    }

    /// Keeps images intersecting the given geometry.
    pub fn filter_bounds(&self, aoi: &Geometry) -> ImageCollection {
        Self::from_expr(
            Expr::invoke("Collection.filterBounds")
                .arg("collection", self.expr.clone())
                .arg("geometry", aoi.expr_arc())
                .build(),
        )
    }

    /// Keeps images acquired within the date range.
    pub fn filter_date(&self, range: &DateRange) -> ImageCollection {
        let mut builder = Expr::invoke("Collection.filterDate")
            .arg("collection", self.expr.clone())
            .const_arg("start", range.start());
        if let Some(end) = range.end() {
            builder = builder.const_arg("end", end);
        }
        Self::from_expr(builder.build())
    }

    /// Keeps images matching the filter.
    pub fn filter(&self, filter: &Filter) -> ImageCollection {
        Self::from_expr(
            Expr::invoke("Collection.filter")
                .arg("collection", self.expr.clone())
                .arg("filter", filter.expr_arc())
                .build(),
        )
    }

    /// Applies `f` to every image of the collection.
    ///
    /// The closure runs once, against a placeholder image; the handle chain
    /// it builds becomes a lambda the engine applies server-side. Parameter
    /// names are generated per call, so nested mappings cannot shadow each
    /// other.
    pub fn map<F>(&self, f: F) -> ImageCollection
    where
        F: FnOnce(Image) -> Image,
    {
        let param = format!("_map_arg_{}", MAP_ARG.fetch_add(1, Ordering::Relaxed));
        let body = f(Image::from_expr(Expr::arg_ref(param.clone())));
        Self::from_expr(
            Expr::invoke("Collection.map")
                .arg("collection", self.expr.clone())
                .arg(
                    "baseAlgorithm",
                    Expr::function(vec![param], body.expr().clone()),
                )
                .build(),
        )
    }

    /// Applies the collection's radiometric scale and offset factors to
    /// every image.
    pub fn scale_and_offset(&self) -> ImageCollection {
        Self::from_expr(
            Expr::invoke("ImageCollection.scaleAndOffset")
                .arg("collection", self.expr.clone())
                .build(),
        )
    }

    /// The first image of the collection.
    pub fn first(&self) -> Image {
        Image::from_expr(
            Expr::invoke("Collection.first")
                .arg("collection", self.expr.clone())
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
