//! Polygon mask helpers.
//!
//! Both helpers rasterize a feature collection onto a constant byte image
//! server-side and use the result as the image mask.

use rangeland_engine::{FeatureCollection, Image};

/// Masks out the regions covered by `polygons`.
///
/// The polygons are painted with 0 over a constant image of 1, so pixels
/// inside them become invalid while the rest of the image keeps its mask.
pub fn mask_exclude(image: &Image, polygons: &FeatureCollection) -> Image {
    image.update_mask(&Image::constant(1.0).to_byte().paint(polygons, 0.0))
}

/// Keeps only the regions covered by `polygons`.
///
/// The polygons are painted with 1 over a constant image of 0, which
/// replaces the image mask entirely.
pub fn mask_include(image: &Image, polygons: &FeatureCollection) -> Image {
    image.mask(&Image::constant(0.0).to_byte().paint(polygons, 1.0))
}
