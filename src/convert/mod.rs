//! Bidirectional conversion between planar geometries and geographies.

mod decode;
mod encode;

use geo::Geometry;

use crate::error::ConvertError;
use crate::factory::{GeometryFactory, SRID_UNSET};
use crate::geography::Geography;

/// Default reduce tolerance applied by the encode-side repair fallback, in
/// the geography model's native angular unit.
pub const DEFAULT_REDUCE_TOLERANCE: f64 = 1.0;

/// A planar geometry tagged with its spatial reference id.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarGeometry {
    pub geometry: Geometry<f64>,
    pub srid: i32,
}

impl PlanarGeometry {
    pub fn new(geometry: impl Into<Geometry<f64>>, srid: i32) -> Self {
        Self { geometry: geometry.into(), srid }
    }

    /// A geometry with the unset SRID sentinel.
    pub fn unreferenced(geometry: impl Into<Geometry<f64>>) -> Self {
        Self::new(geometry, SRID_UNSET)
    }
}

/// Converter between the planar geometry model and the geodetic geography
/// model.
///
/// Holds the reduce tolerance used when an encoded geography comes out
/// invalid and has to go through the repair pipeline. Converters are cheap
/// to clone and hold no other state.
#[derive(Debug, Clone)]
pub struct GeographyConverter {
    reduce_tolerance: f64,
}

impl GeographyConverter {
    pub fn new() -> Self {
        Self { reduce_tolerance: DEFAULT_REDUCE_TOLERANCE }
    }

    /// A converter with a non-default reduce tolerance.
    pub fn with_tolerance(reduce_tolerance: f64) -> Self {
        Self { reduce_tolerance }
    }

    #[inline] pub fn reduce_tolerance(&self) -> f64 { self.reduce_tolerance }

    /// Convert one planar geometry to a geography.
    ///
    /// If the freshly built geography is invalid it is reduced with the
    /// converter's tolerance and repaired; a repair that raises yields
    /// [`ConvertError::RepairFailed`], a repair that leaves the geography
    /// invalid yields [`ConvertError::StillInvalid`], both carrying the
    /// original input.
    pub fn encode(&self, input: &PlanarGeometry) -> Result<Geography, ConvertError> {
        encode::encode(input, self.reduce_tolerance)
    }

    /// Lazily convert a series of planar geometries.
    ///
    /// The returned iterator is cold and single-pass: each input is encoded
    /// only when pulled, and the first failure fuses the iterator so later
    /// inputs are never converted.
    pub fn encode_all<'a, I>(&self, inputs: I) -> EncodeAll<I::IntoIter>
    where
        I: IntoIterator<Item = &'a PlanarGeometry>,
    {
        EncodeAll {
            inputs: inputs.into_iter(),
            tolerance: self.reduce_tolerance,
            done: false,
        }
    }

    /// Convert one geography back to a planar geometry.
    ///
    /// Null geographies decode to `None`; empty geographies decode to an
    /// empty geometry collection. When no factory is supplied one is
    /// resolved from the geography's SRID and shared by the whole recursive
    /// walk.
    ///
    /// # Panics
    /// Panics when a composite geography holds a member of the wrong kind or
    /// a polygon geography has no counter-clockwise ring; both are defects
    /// of the input value, not recoverable conditions.
    pub fn decode(
        &self,
        geography: &Geography,
        factory: Option<&GeometryFactory>,
    ) -> Option<PlanarGeometry> {
        decode::decode(geography, factory)
    }

    /// Lazily convert a series of geographies.
    ///
    /// When no factory is supplied, one is resolved from the first pulled
    /// element's SRID and reused for every element of the batch.
    pub fn decode_all<'a, I>(
        &self,
        geographies: I,
        factory: Option<&GeometryFactory>,
    ) -> DecodeAll<I::IntoIter>
    where
        I: IntoIterator<Item = &'a Geography>,
    {
        DecodeAll {
            geographies: geographies.into_iter(),
            factory: factory.cloned(),
        }
    }
}

impl Default for GeographyConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy fail-fast encode sequence, see [`GeographyConverter::encode_all`].
pub struct EncodeAll<I> {
    inputs: I,
    tolerance: f64,
    done: bool,
}

impl<'a, I> Iterator for EncodeAll<I>
where
    I: Iterator<Item = &'a PlanarGeometry>,
{
    type Item = Result<Geography, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let input = self.inputs.next()?;
        let result = encode::encode(input, self.tolerance);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Lazy decode sequence, see [`GeographyConverter::decode_all`].
pub struct DecodeAll<I> {
    geographies: I,
    factory: Option<GeometryFactory>,
}

impl<'a, I> Iterator for DecodeAll<I>
where
    I: Iterator<Item = &'a Geography>,
{
    type Item = Option<PlanarGeometry>;

    fn next(&mut self) -> Option<Self::Item> {
        let geography = self.geographies.next()?;
        let factory = self
            .factory
            .get_or_insert_with(|| GeometryFactory::for_srid(geography.srid()));
        Some(decode::decode(geography, Some(factory)))
    }
}
