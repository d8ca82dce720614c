//! Image handle: lazy band algebra over the expression graph.

use std::sync::Arc;

use crate::expression::Expr;
use crate::features::FeatureCollection;
use crate::number::EngineNumber;

/// A server-side image.
///
/// Every method appends a single invocation node to the expression graph
/// and returns a new handle; nothing is computed until the graph is
/// submitted with [`EngineClient::compute`](crate::EngineClient::compute).
#[derive(Debug, Clone)]
pub struct Image {
    expr: Arc<Expr>,
}

/// A server-side map projection, as attached to an image band.
#[derive(Debug, Clone)]
pub struct Projection {
    expr: Arc<Expr>,
}

impl Image {
    /// Loads an image asset by id.
    pub fn load(id: &str) -> Self {
        Self::from_expr(Expr::invoke("Image.load").const_arg("id", id).build())
    }

    /// An image where every band is the given constant.
    pub fn constant(value: f64) -> Self {
        Self::from_expr(
            Expr::invoke("Image.constant")
                .const_arg("value", value)
                .build(),
        )
    }

    /// Concatenates the bands of several images into one image.
    pub fn cat(images: &[Image]) -> Self {
        Self::from_expr(
            Expr::invoke("Image.cat")
                .arg(
                    "images",
                    Expr::List(images.iter().map(Image::expr_arc).collect()),
                )
                .build(),
        )
    }

    pub(crate) fn from_expr(expr: Expr) -> Self {
        Self {
            expr: Arc::new(expr),
        }
    }

    /// Selects bands by name.
    pub fn select<S: AsRef<str>>(&self, bands: &[S]) -> Image {
        let names: Vec<serde_json::Value> = bands
            .iter()
            .map(|band| band.as_ref().into())
            .collect();
        self.select_inner(names.into())
    }

    /// Selects bands by a regular expression evaluated by the engine.
    pub fn select_pattern(&self, pattern: &str) -> Image {
        self.select_inner(serde_json::json!([pattern]))
    }

    /// Selects a single band by position.
    pub fn band(&self, index: u32) -> Image {
        self.select_inner(serde_json::json!([index]))
    }

    fn select_inner(&self, selectors: serde_json::Value) -> Image {
        Self::from_expr(
            Expr::invoke("Image.select")
                .arg("input", self.expr.clone())
                .const_arg("bandSelectors", selectors)
                .build(),
        )
    }

    /// Renames the bands of the image.
    pub fn rename<S: AsRef<str>>(&self, names: &[S]) -> Image {
        let names: Vec<serde_json::Value> = names.iter().map(|name| name.as_ref().into()).collect();
        Self::from_expr(
            Expr::invoke("Image.rename")
                .arg("input", self.expr.clone())
                .const_arg("names", names)
                .build(),
        )
    }

    /// Appends the bands of `other` to this image.
    pub fn add_bands(&self, other: &Image) -> Image {
        Self::from_expr(
            Expr::invoke("Image.addBands")
                .arg("dstImg", self.expr.clone())
                .arg("srcImg", other.expr.clone())
                .build(),
        )
    }

    /// Masks out pixels where `mask` is zero, keeping the current mask.
    pub fn update_mask(&self, mask: &Image) -> Image {
        Self::from_expr(
            Expr::invoke("Image.updateMask")
                .arg("image", self.expr.clone())
                .arg("mask", mask.expr.clone())
                .build(),
        )
    }

    /// Replaces the image mask.
    pub fn mask(&self, mask: &Image) -> Image {
        Self::from_expr(
            Expr::invoke("Image.mask")
                .arg("image", self.expr.clone())
                .arg("mask", mask.expr.clone())
                .build(),
        )
    }

    /// Per-pixel sum.
    pub fn add(&self, other: &Image) -> Image {
        self.binary("Image.add", other)
    }

    /// Per-pixel product.
    pub fn multiply(&self, other: &Image) -> Image {
        self.binary("Image.multiply", other)
    }

    /// Per-pixel logical and.
    pub fn and(&self, other: &Image) -> Image {
        self.binary("Image.and", other)
    }

    /// Per-pixel division by a constant.
    pub fn divide(&self, value: f64) -> Image {
        self.binary("Image.divide", &Image::constant(value))
    }

    /// 1 where the pixel is greater than `value`, else 0.
    pub fn gt(&self, value: f64) -> Image {
        self.binary("Image.gt", &Image::constant(value))
    }

    /// 1 where the pixel is less than `value`, else 0.
    pub fn lt(&self, value: f64) -> Image {
        self.binary("Image.lt", &Image::constant(value))
    }

    /// 1 where the pixel equals `value`, else 0.
    pub fn eq(&self, value: f64) -> Image {
        self.binary("Image.eq", &Image::constant(value))
    }

    /// 1 where the pixel differs from `value`, else 0.
    pub fn neq(&self, value: f64) -> Image {
        self.binary("Image.neq", &Image::constant(value))
    }

    /// Per-pixel bitwise and with a constant.
    pub fn bitwise_and(&self, value: i64) -> Image {
        self.binary("Image.bitwiseAnd", &Image::constant(value as f64))
    }

    fn binary(&self, function: &str, other: &Image) -> Image {
        Self::from_expr(
            Expr::invoke(function)
                .arg("image1", self.expr.clone())
                .arg("image2", other.expr.clone())
                .build(),
        )
    }

    /// Per-pixel logical negation.
    pub fn not(&self) -> Image {
        Self::from_expr(
            Expr::invoke("Image.not")
                .arg("value", self.expr.clone())
                .build(),
        )
    }

    /// Casts all bands to unsigned 8-bit integers.
    pub fn to_byte(&self) -> Image {
        Self::from_expr(
            Expr::invoke("Image.byte")
                .arg("value", self.expr.clone())
                .build(),
        )
    }

    /// Paints the geometries of a feature collection onto the image with
    /// the given value.
    pub fn paint(&self, features: &FeatureCollection, value: f64) -> Image {
        Self::from_expr(
            Expr::invoke("Image.paint")
                .arg("input", self.expr.clone())
                .arg("featureCollection", features.expr_arc())
                .const_arg("color", value)
                .build(),
        )
    }

    /// Morphological erosion with the given kernel radius, in pixels.
    pub fn focal_min(&self, radius: f64) -> Image {
        self.focal("Image.focalMin", radius)
    }

    /// Morphological dilation with the given kernel radius, in pixels.
    pub fn focal_max(&self, radius: f64) -> Image {
        self.focal("Image.focalMax", radius)
    }

    fn focal(&self, function: &str, radius: f64) -> Image {
        Self::from_expr(
            Expr::invoke(function)
                .arg("image", self.expr.clone())
                .const_arg("radius", radius)
                .build(),
        )
    }

    /// Per-pixel distance to the nearest non-zero pixel along the given
    /// azimuth, up to `max_steps` pixels. Produces `distance` and related
    /// bands; the result is masked beyond the reach of the transform.
    pub fn directional_distance_transform(
        &self,
        azimuth: &EngineNumber,
        max_steps: u32,
    ) -> Image {
        Self::from_expr(
            Expr::invoke("Image.directionalDistanceTransform")
                .arg("image", self.expr.clone())
                .arg("angle", azimuth.expr_arc())
                .const_arg("maxDistance", max_steps)
                .build(),
        )
    }

    /// Mask of the image: 1 where pixels are valid, 0 elsewhere.
    pub fn mask_value(&self) -> Image {
        Self::from_expr(
            Expr::invoke("Image.mask")
                .arg("image", self.expr.clone())
                .build(),
        )
    }

    /// Forces the image into the given projection and scale (meters per
    /// pixel).
    pub fn reproject(&self, crs: &Projection, scale: f64) -> Image {
        Self::from_expr(
            Expr::invoke("Image.reproject")
                .arg("image", self.expr.clone())
                .arg("crs", crs.expr.clone())
                .const_arg("scale", scale)
                .build(),
        )
    }

    /// Projection of the image's first band.
    pub fn projection(&self) -> Projection {
        Projection {
            expr: Arc::new(
                Expr::invoke("Image.projection")
                    .arg("image", self.expr.clone())
                    .build(),
            ),
        }
    }

    /// Reads a numeric metadata property of the image.
    pub fn get_number(&self, property: &str) -> EngineNumber {
        EngineNumber::from_expr(self.get(property))
    }

    /// Reads a metadata property holding another image, e.g. one attached
    /// by a save-first join.
    pub fn get_image(&self, property: &str) -> Image {
        let expr = self.get(property);
        Self::from_expr(expr)
    }

    fn get(&self, property: &str) -> Expr {
        Expr::invoke("Element.get")
            .arg("object", self.expr.clone())
            .const_arg("property", property)
            .build()
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
    fn qa_bit_mask_chain() {
        let qa = Image::load("LANDSAT/LC09/C02/T1_L2/LC09_TEST").select(&["QA_PIXEL"]);
        let clear = qa.bitwise_and((1 << 3) as i64).eq(0.0);

        let ops = clear.expr().ops();
        assert_eq!(ops[0], "Image.eq");
        assert!(clear.expr().invokes("Image.bitwiseAnd"));
        assert!(clear.expr().invokes("Image.select"));
    }

    #[test]
    fn comparisons_wrap_constants() {
        let thresholded = Image::constant(0.0).gt(60.0);
        assert_eq!(
            thresholded.expr().ops(),
            vec!["Image.gt", "Image.constant", "Image.constant"]
        );
    }

    #[test]
    fn band_selectors() {
        let image = Image::load("COPERNICUS/S2_SR_HARMONIZED/TEST");
        assert!(image.select_pattern("B.*").expr().invokes("Image.select"));
        assert!(image.band(0).expr().invokes("Image.select"));
    }

    #[test]
    fn reproject_uses_band_projection() {
        let image = Image::load("COPERNICUS/S2_SR_HARMONIZED/TEST");
        let reprojected = image.reproject(&image.band(0).projection(), 100.0);

        let ops = reprojected.expr().ops();
        assert_eq!(ops[0], "Image.reproject");
        assert!(reprojected.expr().invokes("Image.projection"));
    }
}
