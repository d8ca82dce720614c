//! Error types used by the crate.

use thiserror::Error;

/// Rangeland error type.
#[derive(Debug, Error)]
pub enum RangelandError {
    /// Error from the engine client.
    #[error(transparent)]
    Engine(#[from] rangeland_engine::error::EngineError),
    /// Error reading/writing data to the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
    /// Malformed KML content.
    #[error("failed to parse KML")]
    Kml(#[from] kml::Error),
    /// Malformed KMZ archive.
    #[error("failed to read KMZ archive")]
    Zip(#[from] zip::result::ZipError),
    /// The KMZ archive contains no KML document.
    #[error("no KML document found in archive")]
    NoKmlEntry,
    /// A dataset loader was asked for a date range it has no default for.
    #[error("no default date range for {0}, set one explicitly")]
    MissingDateRange(&'static str),
    /// The map-layer adapter does not support this geometry kind.
    #[error("geometry kind {kind} is not supported for layer `{layer}`")]
    UnsupportedGeometry {
        /// Kind of the rejected geometry.
        kind: &'static str,
        /// Name of the layer it was destined for.
        layer: String,
    },
    /// JSON serialization error while embedding map data.
    #[error("failed to serialize layer data")]
    Json(#[from] serde_json::Error),
}
