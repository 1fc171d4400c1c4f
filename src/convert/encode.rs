//! Planar geometry -> geography encoding: a recursive walk emitting builder
//! protocol calls, with the repair fallback applied once at the top level.

use geo::{Geometry, LineString, Point, Polygon};

use crate::error::ConvertError;
use crate::geography::{Geography, GeographyBuilder, GeographyKind};
use crate::orient;
use crate::PlanarGeometry;

pub(super) fn encode(
    input: &PlanarGeometry,
    tolerance: f64,
) -> Result<Geography, ConvertError> {
    let mut builder = GeographyBuilder::new();
    builder.set_srid(input.srid);
    encode_geometry(&mut builder, &input.geometry)?;

    let mut geography = builder.finish();
    if !geography.is_valid() {
        log::warn!(
            "encoded geography is invalid; reducing with tolerance {tolerance} and repairing"
        );
        geography = geography
            .reduce(tolerance)
            .map_err(|source| ConvertError::RepairFailed {
                source,
                geometry: Box::new(input.clone()),
            })?
            .make_valid();
    }
    if !geography.is_valid() {
        return Err(ConvertError::StillInvalid { geometry: Box::new(input.clone()) });
    }
    Ok(geography)
}

fn encode_geometry(
    builder: &mut GeographyBuilder,
    geometry: &Geometry<f64>,
) -> Result<(), ConvertError> {
    match geometry {
        Geometry::Point(point) => encode_point(builder, point),
        Geometry::LineString(line) => encode_line_string(builder, line),
        Geometry::Polygon(polygon) => encode_polygon(builder, polygon),
        Geometry::MultiPoint(multi) => {
            builder.begin_geography(GeographyKind::MultiPoint);
            for point in &multi.0 {
                encode_point(builder, point);
            }
            builder.end_geography();
        }
        Geometry::MultiLineString(multi) => {
            builder.begin_geography(GeographyKind::MultiLineString);
            for line in &multi.0 {
                encode_line_string(builder, line);
            }
            builder.end_geography();
        }
        Geometry::MultiPolygon(multi) => {
            builder.begin_geography(GeographyKind::MultiPolygon);
            for polygon in &multi.0 {
                encode_polygon(builder, polygon);
            }
            builder.end_geography();
        }
        Geometry::GeometryCollection(collection) => {
            builder.begin_geography(GeographyKind::GeometryCollection);
            for child in &collection.0 {
                encode_geometry(builder, child)?;
            }
            builder.end_geography();
        }
        Geometry::Line(_) => return Err(ConvertError::UnsupportedType("Line")),
        Geometry::Rect(_) => return Err(ConvertError::UnsupportedType("Rect")),
        Geometry::Triangle(_) => return Err(ConvertError::UnsupportedType("Triangle")),
    }
    Ok(())
}

/// Builder ordinates are latitude first, so planar axes swap on the way in.
fn encode_point(builder: &mut GeographyBuilder, point: &Point<f64>) {
    builder.begin_geography(GeographyKind::Point);
    builder.begin_figure(point.y(), point.x());
    builder.end_figure();
    builder.end_geography();
}

fn encode_line_string(builder: &mut GeographyBuilder, line: &LineString<f64>) {
    builder.begin_geography(GeographyKind::LineString);
    if let Some((first, rest)) = line.0.split_first() {
        builder.begin_figure(first.y, first.x);
        for coord in rest {
            builder.add_line(coord.y, coord.x);
        }
        builder.end_figure();
    }
    builder.end_geography();
}

fn encode_polygon(builder: &mut GeographyBuilder, polygon: &Polygon<f64>) {
    builder.begin_geography(GeographyKind::Polygon);
    // Exterior ring handedness flips between the two models; interior rings
    // pass through unmodified.
    add_ring(builder, &orient::reversed(polygon.exterior()));
    for interior in polygon.interiors() {
        add_ring(builder, interior);
    }
    builder.end_geography();
}

/// Emit one polygon ring as a figure. Rings with fewer than three distinct
/// points are dropped entirely; no degenerate figure is emitted for them.
fn add_ring(builder: &mut GeographyBuilder, ring: &LineString<f64>) {
    if effective_points(ring) < 3 {
        return;
    }
    let (first, rest) = ring.0.split_first().expect("ring has at least three points");
    builder.begin_figure(first.y, first.x);
    for coord in rest {
        builder.add_line(coord.y, coord.x);
    }
    builder.end_figure();
}

/// Point count of a ring, not counting the closing coordinate.
fn effective_points(ring: &LineString<f64>) -> usize {
    match ring.0.len() {
        0 | 1 => ring.0.len(),
        len if ring.0[0] == ring.0[len - 1] => len - 1,
        len => len,
    }
}
