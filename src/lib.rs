#![doc = "Bidirectional codec between planar vector geometries and geodetic geography shapes"]
mod convert;
mod error;
mod factory;
mod geography;
mod orient;

#[doc(inline)]
pub use convert::{
    DecodeAll, EncodeAll, GeographyConverter, PlanarGeometry, DEFAULT_REDUCE_TOLERANCE,
};

#[doc(inline)]
pub use error::{ConvertError, ReduceError};

#[doc(inline)]
pub use factory::{set_precision_registry, GeometryFactory, Precision, SRID_UNSET};

#[doc(inline)]
pub use geography::{Geography, GeographyBuilder, GeographyKind, LatLon};
