//! Geography -> planar geometry decoding: a recursive walk over the numbered
//! read accessors, reconstructing polygon shells by orientation testing.

use geo::{Coord, Geometry, LineString, Point, Polygon};

use crate::factory::GeometryFactory;
use crate::geography::{Geography, GeographyKind};
use crate::orient;
use crate::PlanarGeometry;

pub(super) fn decode(
    geography: &Geography,
    factory: Option<&GeometryFactory>,
) -> Option<PlanarGeometry> {
    if geography.is_null() {
        return None;
    }

    let resolved;
    let factory = match factory {
        Some(factory) => factory,
        None => {
            resolved = GeometryFactory::for_srid(geography.srid());
            &resolved
        }
    };

    // Decode-side repair is topology-fix only; no tolerance reduction here.
    let repaired;
    let geography = if geography.is_valid() {
        geography
    } else {
        log::debug!("decoding invalid geography; applying repair first");
        repaired = geography.make_valid();
        &repaired
    };

    let geometry = decode_member(geography, factory);
    Some(PlanarGeometry::new(geometry, factory.srid()))
}

/// Full per-geography decode: an empty geography of any shape kind decodes to
/// an empty geometry collection. Applied at the top level and to collection
/// members; the typed composites narrow their members directly instead.
fn decode_member(geography: &Geography, factory: &GeometryFactory) -> Geometry<f64> {
    if geography.is_empty() {
        let empty = factory.create_geometry_collection(Vec::new());
        return Geometry::GeometryCollection(empty);
    }
    decode_geography(geography, factory)
}

fn decode_geography(geography: &Geography, factory: &GeometryFactory) -> Geometry<f64> {
    match geography.kind().expect("non-null geography has a shape") {
        GeographyKind::Point => Geometry::Point(decode_point(geography, factory)),
        GeographyKind::LineString => {
            Geometry::LineString(decode_line_string(geography, factory))
        }
        GeographyKind::Polygon => Geometry::Polygon(decode_polygon(geography, factory)),
        GeographyKind::MultiPoint => {
            let points = decode_members(geography, factory, |child| match child {
                Geometry::Point(point) => point,
                _ => panic!("MultiPoint geography holds a non-point member"),
            });
            Geometry::MultiPoint(factory.create_multi_point(points))
        }
        GeographyKind::MultiLineString => {
            let lines = decode_members(geography, factory, |child| match child {
                Geometry::LineString(line) => line,
                _ => panic!("MultiLineString geography holds a non-line member"),
            });
            Geometry::MultiLineString(factory.create_multi_line_string(lines))
        }
        GeographyKind::MultiPolygon => {
            let polygons = decode_members(geography, factory, |child| match child {
                Geometry::Polygon(polygon) => polygon,
                _ => panic!("MultiPolygon geography holds a non-polygon member"),
            });
            Geometry::MultiPolygon(factory.create_multi_polygon(polygons))
        }
        GeographyKind::GeometryCollection => {
            let count = geography.num_geometries();
            let mut members = Vec::with_capacity(count);
            for n in 1..=count {
                let child = geography
                    .geometry_n(n)
                    .expect("member index within reported count");
                members.push(decode_member(&child, factory));
            }
            Geometry::GeometryCollection(factory.create_geometry_collection(members))
        }
    }
}

/// Decode every member of a composite geography (1-based enumeration) with
/// the shared factory, narrowing each to the container's member type.
///
/// A member of the wrong kind is a defect of the geography value; `narrow`
/// panics rather than recovers.
fn decode_members<T>(
    geography: &Geography,
    factory: &GeometryFactory,
    narrow: impl Fn(Geometry<f64>) -> T,
) -> Vec<T> {
    let count = geography.num_geometries();
    let mut members = Vec::with_capacity(count);
    for n in 1..=count {
        let child = geography
            .geometry_n(n)
            .expect("member index within reported count");
        members.push(narrow(decode_geography(&child, factory)));
    }
    members
}

/// Stored ordinates are already longitude/latitude; no axis swap here.
fn decode_point(geography: &Geography, factory: &GeometryFactory) -> Point<f64> {
    let x = geography.long().expect("point geography has a longitude");
    let y = geography.lat().expect("point geography has a latitude");
    factory.create_point(Coord { x, y })
}

fn decode_coords(geography: &Geography) -> Vec<Coord<f64>> {
    let count = geography.num_points();
    let mut coords = Vec::with_capacity(count);
    for n in 1..=count {
        let point = geography
            .point_n(n)
            .expect("point index within reported count");
        coords.push(Coord {
            x: point.long().expect("point geography has a longitude"),
            y: point.lat().expect("point geography has a latitude"),
        });
    }
    coords
}

fn decode_line_string(geography: &Geography, factory: &GeometryFactory) -> LineString<f64> {
    factory.create_line_string(decode_coords(geography))
}

fn decode_polygon(geography: &Geography, factory: &GeometryFactory) -> Polygon<f64> {
    let count = geography.num_rings();
    let mut rings = Vec::with_capacity(count);
    for n in 1..=count {
        let ring = geography
            .ring_n(n)
            .expect("ring index within reported count");
        rings.push(factory.create_line_string(decode_coords(&ring)));
    }

    // The shell is not tagged; it is the ring that decodes counter-clockwise.
    // Well-formed input has exactly one such ring; with several, the first
    // wins, which is a precondition violation rather than a tie-break.
    let shell_index = rings
        .iter()
        .position(|ring| orient::is_ccw(&ring.0))
        .expect("polygon geography has a counter-clockwise shell ring");
    let shell = orient::reversed(&rings[shell_index]);
    rings.remove(shell_index);
    factory.create_polygon(shell, rings)
}
