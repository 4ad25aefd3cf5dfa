//! Forward coordinate transformation behind a narrow interface.
//!
//! The conversion engine only needs "CRS pair + coordinate arrays -> arrays".
//! [`TransformProvider`] builds reusable [`CoordinateTransform`] handles and
//! [`TransformerCache`] memoizes them per `(source, destination)` pair.

pub mod cache;
pub mod proj_backend;

pub use cache::{CacheStats, TransformerCache};
pub use proj_backend::{Proj4rsProvider, Proj4rsTransform};

use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("CRS '{0}' is not supported")]
    UnsupportedCrs(String),

    #[error("Could not build transformer {source_crs} -> {target_crs}: {message}")]
    Initialization {
        source_crs: String,
        target_crs: String,
        message: String,
    },

    #[error("Transform failed for point ({x}, {y}): {message}")]
    Transform { x: f64, y: f64, message: String },

    #[error("Transform produced a non-finite result for point ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("Coordinate arrays differ in length ({x_len} vs {y_len})")]
    LengthMismatch { x_len: usize, y_len: usize },
}

/// A reusable forward transform between two fixed CRSs.
///
/// Coordinates follow the always-xy convention: the first array is
/// longitude/easting, the second latitude/northing, whatever the native
/// axis order of either CRS.
pub trait CoordinateTransform: Send + Sync {
    fn transform(&self, xs: &[f64], ys: &[f64]) -> Result<(Vec<f64>, Vec<f64>), ProjectionError>;
}

/// Builds transform handles for a CRS pair.
pub trait TransformProvider: Send + Sync {
    fn create(
        &self,
        source_crs: &str,
        target_crs: &str,
    ) -> Result<Arc<dyn CoordinateTransform>, ProjectionError>;
}
