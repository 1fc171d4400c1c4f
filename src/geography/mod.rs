//! Geodetic geography model: an opaque shape value constructed through the
//! append-only [`GeographyBuilder`] protocol and inspected through numbered
//! 1-based accessors.

pub mod builder;
mod valid;

pub use builder::{GeographyBuilder, GeographyKind};

use crate::factory::SRID_UNSET;

/// A geodetic position: latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// The seven-variant geography shape tree.
///
/// Point and LineString hold a single figure; a Polygon holds one figure per
/// ring (the exterior first by construction order, counter-clockwise by the
/// geography convention); composites hold child shapes in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape {
    Point(Vec<LatLon>),
    LineString(Vec<LatLon>),
    Polygon(Vec<Vec<LatLon>>),
    MultiPoint(Vec<Shape>),
    MultiLineString(Vec<Shape>),
    MultiPolygon(Vec<Shape>),
    GeometryCollection(Vec<Shape>),
}

impl Shape {
    pub(crate) fn kind(&self) -> GeographyKind {
        match self {
            Shape::Point(_) => GeographyKind::Point,
            Shape::LineString(_) => GeographyKind::LineString,
            Shape::Polygon(_) => GeographyKind::Polygon,
            Shape::MultiPoint(_) => GeographyKind::MultiPoint,
            Shape::MultiLineString(_) => GeographyKind::MultiLineString,
            Shape::MultiPolygon(_) => GeographyKind::MultiPolygon,
            Shape::GeometryCollection(_) => GeographyKind::GeometryCollection,
        }
    }

    fn children(&self) -> Option<&[Shape]> {
        match self {
            Shape::MultiPoint(c)
            | Shape::MultiLineString(c)
            | Shape::MultiPolygon(c)
            | Shape::GeometryCollection(c) => Some(c),
            _ => None,
        }
    }

    fn count_points(&self) -> usize {
        match self {
            Shape::Point(points) | Shape::LineString(points) => points.len(),
            Shape::Polygon(rings) => rings.iter().map(Vec::len).sum(),
            _ => self
                .children()
                .expect("composite shape has children")
                .iter()
                .map(Shape::count_points)
                .sum(),
        }
    }

    /// Depth-first point lookup, 0-based.
    fn point_at(&self, mut index: usize) -> Option<LatLon> {
        match self {
            Shape::Point(points) | Shape::LineString(points) => points.get(index).copied(),
            Shape::Polygon(rings) => {
                for ring in rings {
                    if index < ring.len() {
                        return ring.get(index).copied();
                    }
                    index -= ring.len();
                }
                None
            }
            _ => {
                for child in self.children().expect("composite shape has children") {
                    let count = child.count_points();
                    if index < count {
                        return child.point_at(index);
                    }
                    index -= count;
                }
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// An opaque geodetic shape value carrying a spatial reference id and a null
/// flag.
///
/// Values are constructed only through [`GeographyBuilder`] (or
/// [`Geography::null`]) and inspected only through the read accessors below;
/// index accessors are 1-based and return `None` out of range, matching the
/// numbered-accessor read protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct Geography {
    srid: i32,
    shape: Option<Shape>,
}

impl Geography {
    /// The null geography.
    pub fn null() -> Self {
        Self { srid: SRID_UNSET, shape: None }
    }

    pub(crate) fn new(srid: i32, shape: Option<Shape>) -> Self {
        Self { srid, shape }
    }

    pub(crate) fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    #[inline] pub fn is_null(&self) -> bool { self.shape.is_none() }

    #[inline] pub fn srid(&self) -> i32 { self.srid }

    pub(crate) fn kind(&self) -> Option<GeographyKind> {
        self.shape.as_ref().map(Shape::kind)
    }

    /// OGC shape type name, or `None` for the null geography.
    pub fn shape_type(&self) -> Option<&'static str> {
        self.kind().map(|kind| match kind {
            GeographyKind::Point => "Point",
            GeographyKind::LineString => "LineString",
            GeographyKind::Polygon => "Polygon",
            GeographyKind::MultiPoint => "MultiPoint",
            GeographyKind::MultiLineString => "MultiLineString",
            GeographyKind::MultiPolygon => "MultiPolygon",
            GeographyKind::GeometryCollection => "GeometryCollection",
        })
    }

    /// Whether the shape carries no figures or children. Null is not empty.
    pub fn is_empty(&self) -> bool {
        match &self.shape {
            None => false,
            Some(Shape::Point(points)) | Some(Shape::LineString(points)) => points.is_empty(),
            Some(Shape::Polygon(rings)) => rings.is_empty(),
            Some(shape) => shape
                .children()
                .expect("composite shape has children")
                .is_empty(),
        }
    }

    // -----------------------------------------------------------------------
    // Numbered read accessors (1-based)
    // -----------------------------------------------------------------------

    /// Number of immediate member geometries: child count for composites,
    /// one for simple shapes, zero for null.
    pub fn num_geometries(&self) -> usize {
        match &self.shape {
            None => 0,
            Some(shape) => shape.children().map_or(1, <[Shape]>::len),
        }
    }

    /// The `n`-th member geometry (1-based). For simple shapes `n == 1`
    /// returns the geography itself.
    pub fn geometry_n(&self, n: usize) -> Option<Geography> {
        let shape = self.shape.as_ref()?;
        match shape.children() {
            Some(children) => children
                .get(n.checked_sub(1)?)
                .map(|child| Geography::new(self.srid, Some(child.clone()))),
            None => (n == 1).then(|| self.clone()),
        }
    }

    /// Total number of positions in the shape, figures flattened in order.
    pub fn num_points(&self) -> usize {
        self.shape.as_ref().map_or(0, Shape::count_points)
    }

    /// The `n`-th position (1-based) as a point geography.
    pub fn point_n(&self, n: usize) -> Option<Geography> {
        let position = self.shape.as_ref()?.point_at(n.checked_sub(1)?)?;
        Some(Geography::new(self.srid, Some(Shape::Point(vec![position]))))
    }

    /// Number of rings of a polygon geography; zero for every other shape.
    pub fn num_rings(&self) -> usize {
        match &self.shape {
            Some(Shape::Polygon(rings)) => rings.len(),
            _ => 0,
        }
    }

    /// The `n`-th ring of a polygon geography (1-based), as a line string
    /// geography.
    pub fn ring_n(&self, n: usize) -> Option<Geography> {
        match &self.shape {
            Some(Shape::Polygon(rings)) => rings
                .get(n.checked_sub(1)?)
                .map(|ring| Geography::new(self.srid, Some(Shape::LineString(ring.clone())))),
            _ => None,
        }
    }

    /// Longitude of a point geography, `None` for any other shape.
    pub fn long(&self) -> Option<f64> {
        match &self.shape {
            Some(Shape::Point(points)) => points.first().map(|p| p.lon),
            _ => None,
        }
    }

    /// Latitude of a point geography, `None` for any other shape.
    pub fn lat(&self) -> Option<f64> {
        match &self.shape {
            Some(Shape::Point(points)) => points.first().map(|p| p.lat),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::builder::{GeographyBuilder, GeographyKind};
    use super::Geography;

    fn sample_line() -> Geography {
        let mut builder = GeographyBuilder::new();
        builder.set_srid(4326);
        builder.begin_geography(GeographyKind::LineString);
        builder.begin_figure(1.0, 10.0);
        builder.add_line(2.0, 20.0);
        builder.add_line(3.0, 30.0);
        builder.end_figure();
        builder.end_geography();
        builder.finish()
    }

    #[test]
    fn null_geography_reports_null() {
        let null = Geography::null();
        assert!(null.is_null());
        assert_eq!(null.shape_type(), None);
        assert_eq!(null.num_geometries(), 0);
        assert_eq!(null.num_points(), 0);
    }

    #[test]
    fn line_accessors_are_one_based() {
        let line = sample_line();
        assert_eq!(line.shape_type(), Some("LineString"));
        assert_eq!(line.num_points(), 3);
        assert!(line.point_n(0).is_none());
        assert!(line.point_n(4).is_none());

        let second = line.point_n(2).expect("point 2 exists");
        assert_eq!(second.long(), Some(20.0));
        assert_eq!(second.lat(), Some(2.0));
        assert_eq!(second.srid(), 4326);
    }

    #[test]
    fn simple_shape_is_its_own_single_member() {
        let line = sample_line();
        assert_eq!(line.num_geometries(), 1);
        assert_eq!(line.geometry_n(1), Some(line.clone()));
        assert!(line.geometry_n(2).is_none());
    }
}
