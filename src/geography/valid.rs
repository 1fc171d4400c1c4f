//! Geography validity, tolerance-based reduction, and structural repair.

use geo::{LineString, Simplify};

use super::{Geography, LatLon, Shape};
use crate::error::ReduceError;

/// A position is valid when finite and within geodetic coordinate ranges.
fn position_valid(p: &LatLon) -> bool {
    p.lat.is_finite()
        && p.lon.is_finite()
        && (-90.0..=90.0).contains(&p.lat)
        && (-180.0..=180.0).contains(&p.lon)
}

fn ring_closed(ring: &[LatLon]) -> bool {
    ring.len() >= 2 && ring.first() == ring.last()
}

fn shape_valid(shape: &Shape) -> bool {
    match shape {
        Shape::Point(points) => points.len() <= 1 && points.iter().all(position_valid),
        Shape::LineString(points) => {
            points.len() != 1 && points.iter().all(position_valid)
        }
        Shape::Polygon(rings) => rings.iter().all(|ring| {
            ring.len() >= 4 && ring_closed(ring) && ring.iter().all(position_valid)
        }),
        Shape::MultiPoint(children)
        | Shape::MultiLineString(children)
        | Shape::MultiPolygon(children)
        | Shape::GeometryCollection(children) => children.iter().all(shape_valid),
    }
}

/// Douglas-Peucker reduction of a single figure. Endpoints are preserved, so
/// ring closure survives; figures of two or fewer points pass through.
fn reduce_figure(points: &[LatLon], tolerance: f64) -> Vec<LatLon> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let line = LineString::from(
        points.iter().map(|p| (p.lon, p.lat)).collect::<Vec<_>>(),
    );
    line.simplify(&tolerance)
        .0
        .into_iter()
        .map(|c| LatLon { lat: c.y, lon: c.x })
        .collect()
}

fn reduce_shape(shape: &Shape, tolerance: f64) -> Shape {
    match shape {
        Shape::Point(points) => Shape::Point(points.clone()),
        Shape::LineString(points) => Shape::LineString(reduce_figure(points, tolerance)),
        Shape::Polygon(rings) => Shape::Polygon(
            rings.iter().map(|ring| reduce_figure(ring, tolerance)).collect(),
        ),
        Shape::MultiPoint(children) => Shape::MultiPoint(reduce_children(children, tolerance)),
        Shape::MultiLineString(children) => {
            Shape::MultiLineString(reduce_children(children, tolerance))
        }
        Shape::MultiPolygon(children) => {
            Shape::MultiPolygon(reduce_children(children, tolerance))
        }
        Shape::GeometryCollection(children) => {
            Shape::GeometryCollection(reduce_children(children, tolerance))
        }
    }
}

fn reduce_children(children: &[Shape], tolerance: f64) -> Vec<Shape> {
    children.iter().map(|child| reduce_shape(child, tolerance)).collect()
}

/// Close an open ring, then drop it if degenerate.
fn repair_ring(ring: &[LatLon]) -> Option<Vec<LatLon>> {
    if ring.is_empty() {
        return None;
    }
    let mut ring = ring.to_vec();
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    (ring.len() >= 4).then_some(ring)
}

fn repair_shape(shape: &Shape) -> Shape {
    match shape {
        Shape::Point(points) => Shape::Point(points.iter().take(1).copied().collect()),
        Shape::LineString(points) => Shape::LineString(if points.len() == 1 {
            Vec::new()
        } else {
            points.clone()
        }),
        Shape::Polygon(rings) => {
            Shape::Polygon(rings.iter().filter_map(|ring| repair_ring(ring)).collect())
        }
        Shape::MultiPoint(children) => Shape::MultiPoint(repair_children(children)),
        Shape::MultiLineString(children) => Shape::MultiLineString(repair_children(children)),
        Shape::MultiPolygon(children) => Shape::MultiPolygon(repair_children(children)),
        Shape::GeometryCollection(children) => {
            Shape::GeometryCollection(repair_children(children))
        }
    }
}

fn repair_children(children: &[Shape]) -> Vec<Shape> {
    children.iter().map(repair_shape).collect()
}

impl Geography {
    /// Whether the shape satisfies the geography validity rules: finite
    /// positions within coordinate ranges, line figures of at least two
    /// points, closed polygon rings of at least four, point figures of at
    /// most one. Null and empty geographies are valid.
    pub fn is_valid(&self) -> bool {
        self.shape().is_none_or(shape_valid)
    }

    /// Tolerance-based simplification of every figure, Douglas-Peucker with
    /// `tolerance` in the geography's native angular unit.
    ///
    /// Fails when the tolerance is NaN, infinite, or negative.
    pub fn reduce(&self, tolerance: f64) -> Result<Geography, ReduceError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ReduceError::InvalidTolerance(tolerance));
        }
        Ok(match self.shape() {
            None => self.clone(),
            Some(shape) => Geography::new(self.srid(), Some(reduce_shape(shape, tolerance))),
        })
    }

    /// Structural topology repair: closes open rings, drops rings that stay
    /// degenerate, drops one-point line figures, and truncates over-long
    /// point figures. Out-of-range coordinates are not repairable.
    pub fn make_valid(&self) -> Geography {
        match self.shape() {
            None => self.clone(),
            Some(shape) => Geography::new(self.srid(), Some(repair_shape(shape))),
        }
    }
}
