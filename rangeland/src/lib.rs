//! Remote-sensing helpers for ecological analysis.
//!
//! The crate bundles the recurring plumbing of a vegetation-monitoring
//! workflow:
//!
//! * [`data`] — satellite collection loaders (Landsat 5/7/8/9, Sentinel-2)
//!   with cloud and shadow masking applied server-side;
//! * [`mask`] — masking an image by field polygons (exclosures, water
//!   bodies, infrastructure);
//! * [`io`] — importing KML/KMZ files from field-mapping tools into flat
//!   geometry tables;
//! * [`map`] — exporting geometries as an interactive web map.
//!
//! All image processing is delegated to a remote image-algebra engine
//! through the [`rangeland-engine`](rangeland_engine) crate; this crate
//! only assembles declarative expression chains and adapts file formats.
//!
//! # Quick start
//!
//! Load a year of cloud-masked Sentinel-2 imagery over a pasture imported
//! from KML:
//!
//! ```no_run
//! use rangeland::data::Sentinel2Sr;
//! use rangeland::engine::Geometry;
//! use rangeland::io::read_kml;
//!
//! # fn main() -> Result<(), rangeland::error::RangelandError> {
//! let pastures = read_kml("pastures.kml")?;
//! let aoi = Geometry::from_geo(pastures.records()[0].geometry.clone());
//! let collection = Sentinel2Sr::new().load(&aoi);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod io;
pub mod map;
pub mod mask;

pub use error::RangelandError;
pub use io::{GeometryFrame, GeometryRecord};
pub use map::WebMap;

// Reexport the engine crate.
pub use rangeland_engine as engine;
