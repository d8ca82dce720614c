//! Satellite dataset loaders.
//!
//! Each loader builds a filtered, masked [`ImageCollection`] for an area
//! of interest; the masking itself runs on the engine.
//!
//! [`ImageCollection`]: rangeland_engine::ImageCollection

mod landsat;
mod sentinel2;

pub use landsat::{LandsatMission, LandsatSr};
pub use sentinel2::Sentinel2Sr;
