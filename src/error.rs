//! Conversion error taxonomy.

use thiserror::Error;

use crate::PlanarGeometry;

/// Reasons the reduce step of the repair pipeline can refuse to run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReduceError {
    /// The reduce tolerance is NaN, infinite, or negative.
    #[error("invalid reduce tolerance: {0}")]
    InvalidTolerance(f64),
}

/// Errors produced when converting between geometries and geographies.
///
/// `RepairFailed` and `StillInvalid` carry the original input geometry so a
/// caller can inspect or log exactly what failed to convert; no partially
/// built geography is ever exposed.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The planar variant has no geography counterpart.
    /// Raised for `Line`, `Rect`, and `Triangle` geometries.
    #[error("cannot convert `{0}` geometry to a geography")]
    UnsupportedType(&'static str),

    /// The repair pipeline itself raised while trying to fix an invalid
    /// geography built from the given input.
    #[error("failed to repair geography built from input geometry")]
    RepairFailed {
        /// Underlying cause.
        #[source]
        source: ReduceError,
        /// The original input geometry, for diagnostics.
        geometry: Box<PlanarGeometry>,
    },

    /// Repair ran to completion but the geography still reports invalid;
    /// the input is unrepairable at the configured tolerance.
    #[error("geography is still invalid after repair")]
    StillInvalid {
        /// The original input geometry, for diagnostics.
        geometry: Box<PlanarGeometry>,
    },
}
