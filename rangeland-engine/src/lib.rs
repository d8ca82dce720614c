//! Typed client for a remote geospatial image-algebra engine.
//!
//! The crate exposes lazy handles ([`Image`], [`ImageCollection`],
//! [`Filter`], [`Geometry`], ...) that assemble a declarative
//! [expression graph](expression). No pixels, geometries or numbers are
//! computed locally: a chain of handle calls describes a computation, and
//! [`EngineClient::compute`] submits the description for server-side
//! evaluation.
//!
//! ```
//! use rangeland_engine::{DateRange, Filter, Geometry, ImageCollection};
//! use geo_types::polygon;
//!
//! let aoi = Geometry::from_geo(polygon![
//!     (x: 28.0, y: 44.5),
//!     (x: 28.5, y: 44.5),
//!     (x: 28.5, y: 45.0),
//! ]);
//! let range = DateRange::new("2020-01-01", "2020-12-31")?;
//! let collection = ImageCollection::load("COPERNICUS/S2_SR_HARMONIZED")
//!     .filter_bounds(&aoi)
//!     .filter_date(&range)
//!     .filter(&Filter::lte("CLOUDY_PIXEL_PERCENTAGE", 60.0));
//!
//! assert!(collection.expr().invokes("Collection.filterBounds"));
//! # Ok::<(), rangeland_engine::error::EngineError>(())
//! ```

pub mod client;
pub mod dates;
pub mod error;
pub mod expression;

mod collection;
mod features;
mod filter;
mod geometry;
mod image;
mod join;
mod number;

pub use client::{EngineClient, EngineClientBuilder};
pub use collection::ImageCollection;
pub use dates::DateRange;
pub use features::FeatureCollection;
pub use filter::Filter;
pub use geometry::Geometry;
pub use image::{Image, Projection};
pub use join::Join;
pub use number::EngineNumber;
