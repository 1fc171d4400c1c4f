//! Planar geometry construction with per-SRID coordinate precision.

use std::sync::OnceLock;

use ahash::AHashMap;
use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};

/// Sentinel SRID for geometries with no assigned spatial reference system.
pub const SRID_UNSET: i32 = 0;

/// Coordinate precision context applied by a [`GeometryFactory`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precision {
    /// Full f64 precision; coordinates pass through unmodified.
    Floating,
    /// Coordinates snapped to a grid with cells of `1 / scale`.
    Fixed(f64),
}

impl Precision {
    #[inline]
    fn apply(&self, c: Coord<f64>) -> Coord<f64> {
        match *self {
            Precision::Floating => c,
            Precision::Fixed(scale) => Coord {
                x: (c.x * scale).round() / scale,
                y: (c.y * scale).round() / scale,
            },
        }
    }
}

/// Process-wide SRID -> precision table, set at most once and read-only after.
static PRECISION_REGISTRY: OnceLock<AHashMap<i32, Precision>> = OnceLock::new();

fn registry() -> &'static AHashMap<i32, Precision> {
    PRECISION_REGISTRY.get_or_init(AHashMap::new)
}

/// Install the process-wide SRID -> precision table used by
/// [`GeometryFactory::for_srid`]. Returns `false` if a table was already
/// installed (the existing table is kept).
pub fn set_precision_registry<I>(entries: I) -> bool
where
    I: IntoIterator<Item = (i32, Precision)>,
{
    PRECISION_REGISTRY.set(entries.into_iter().collect()).is_ok()
}

/// Constructs planar geometries from decoded coordinate data, applying a
/// spatial-reference-dependent precision context to every coordinate.
///
/// One factory is shared by all recursive calls of a single decode, so every
/// output coordinate lives in the same precision context.
#[derive(Debug, Clone)]
pub struct GeometryFactory {
    srid: i32,
    precision: Precision,
}

impl GeometryFactory {
    pub fn new(srid: i32, precision: Precision) -> Self {
        Self { srid, precision }
    }

    /// Resolve a working factory for a spatial reference id from the
    /// process-wide registry. Unregistered ids get full floating precision.
    pub fn for_srid(srid: i32) -> Self {
        let precision = registry().get(&srid).copied().unwrap_or(Precision::Floating);
        Self { srid, precision }
    }

    #[inline] pub fn srid(&self) -> i32 { self.srid }

    #[inline] pub fn precision(&self) -> Precision { self.precision }

    pub fn create_point(&self, coord: Coord<f64>) -> Point<f64> {
        Point::from(self.precision.apply(coord))
    }

    pub fn create_line_string(&self, coords: Vec<Coord<f64>>) -> LineString<f64> {
        LineString(coords.into_iter().map(|c| self.precision.apply(c)).collect())
    }

    /// Assemble a polygon from rings already built by this factory.
    pub fn create_polygon(
        &self,
        exterior: LineString<f64>,
        interiors: Vec<LineString<f64>>,
    ) -> Polygon<f64> {
        Polygon::new(exterior, interiors)
    }

    pub fn create_multi_point(&self, points: Vec<Point<f64>>) -> MultiPoint<f64> {
        MultiPoint(points)
    }

    pub fn create_multi_line_string(&self, lines: Vec<LineString<f64>>) -> MultiLineString<f64> {
        MultiLineString(lines)
    }

    pub fn create_multi_polygon(&self, polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
        MultiPolygon(polygons)
    }

    pub fn create_geometry_collection(
        &self,
        geometries: Vec<Geometry<f64>>,
    ) -> GeometryCollection<f64> {
        GeometryCollection(geometries)
    }
}
