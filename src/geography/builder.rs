//! Append-only write protocol for constructing [`Geography`] values.

use geo::Coord;

use super::{Geography, LatLon, Shape};
use crate::factory::SRID_UNSET;
use crate::orient;

/// The seven geography shape kinds accepted by
/// [`GeographyBuilder::begin_geography`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeographyKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeographyKind {
    fn is_composite(&self) -> bool {
        matches!(
            self,
            GeographyKind::MultiPoint
                | GeographyKind::MultiLineString
                | GeographyKind::MultiPolygon
                | GeographyKind::GeometryCollection
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotStarted,
    InGeography,
    InFigure,
    Done,
}

struct Pending {
    kind: GeographyKind,
    figures: Vec<Vec<LatLon>>,
    children: Vec<Shape>,
}

/// Explicit state machine over {NotStarted, InGeography, InFigure, Done}
/// enforcing strict nesting of begin/end calls.
///
/// Misuse of the protocol is a caller defect and panics; the builder never
/// produces a partially bracketed geography. Member kinds of composite
/// geographies are deliberately not checked against their container, matching
/// the permissive write protocol this models.
pub struct GeographyBuilder {
    state: State,
    srid: i32,
    stack: Vec<Pending>,
    figure: Vec<LatLon>,
    root: Option<Shape>,
}

impl GeographyBuilder {
    pub fn new() -> Self {
        Self {
            state: State::NotStarted,
            srid: SRID_UNSET,
            stack: Vec::new(),
            figure: Vec::new(),
            root: None,
        }
    }

    /// Set the spatial reference id of the geography under construction.
    ///
    /// # Panics
    /// Panics if construction has already started.
    pub fn set_srid(&mut self, srid: i32) {
        assert!(
            self.state == State::NotStarted,
            "SetSrid must precede BeginGeography"
        );
        self.srid = srid;
    }

    /// Open a geography of the given kind, either the root or a member of the
    /// currently open composite.
    ///
    /// # Panics
    /// Panics when called inside a figure, after the root geography was
    /// closed, or inside a non-composite geography.
    pub fn begin_geography(&mut self, kind: GeographyKind) {
        match self.state {
            State::NotStarted => {}
            State::InGeography => {
                let parent = self.stack.last().expect("open geography on the stack");
                assert!(
                    parent.kind.is_composite(),
                    "cannot nest a geography inside {:?}",
                    parent.kind
                );
            }
            State::InFigure => panic!("BeginGeography called inside a figure"),
            State::Done => panic!("BeginGeography called after the root geography was closed"),
        }
        self.stack.push(Pending {
            kind,
            figures: Vec::new(),
            children: Vec::new(),
        });
        self.state = State::InGeography;
    }

    /// Start a figure at the given position.
    ///
    /// # Panics
    /// Panics outside a geography, inside a composite geography, or when a
    /// point or line string already has its figure.
    pub fn begin_figure(&mut self, lat: f64, lon: f64) {
        assert!(
            self.state == State::InGeography,
            "BeginFigure called outside a geography"
        );
        let pending = self.stack.last().expect("open geography on the stack");
        assert!(
            !pending.kind.is_composite(),
            "{:?} geography cannot hold figures directly",
            pending.kind
        );
        if !matches!(pending.kind, GeographyKind::Polygon) {
            assert!(
                pending.figures.is_empty(),
                "{:?} geography holds a single figure",
                pending.kind
            );
        }
        self.figure = vec![LatLon { lat, lon }];
        self.state = State::InFigure;
    }

    /// Append a position to the open figure.
    ///
    /// # Panics
    /// Panics outside a figure, or inside a point figure.
    pub fn add_line(&mut self, lat: f64, lon: f64) {
        assert!(self.state == State::InFigure, "AddLine called outside a figure");
        let pending = self.stack.last().expect("open geography on the stack");
        assert!(
            pending.kind != GeographyKind::Point,
            "a point figure holds a single position"
        );
        self.figure.push(LatLon { lat, lon });
    }

    /// Close the open figure.
    ///
    /// # Panics
    /// Panics when no figure is open.
    pub fn end_figure(&mut self) {
        assert!(self.state == State::InFigure, "EndFigure called outside a figure");
        let figure = std::mem::take(&mut self.figure);
        self.stack
            .last_mut()
            .expect("open geography on the stack")
            .figures
            .push(figure);
        self.state = State::InGeography;
    }

    /// Close the current geography, attaching it to its parent composite or
    /// finishing construction at the root.
    ///
    /// # Panics
    /// Panics when no geography is open or a figure is still open.
    pub fn end_geography(&mut self) {
        assert!(
            self.state == State::InGeography,
            "EndGeography called with no open geography or an open figure"
        );
        let pending = self.stack.pop().expect("open geography on the stack");
        let shape = seal(pending);
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(shape),
            None => {
                self.root = Some(shape);
                self.state = State::Done;
            }
        }
    }

    /// The finished geography.
    ///
    /// # Panics
    /// Panics unless the root geography has been closed.
    pub fn finish(self) -> Geography {
        assert!(
            self.state == State::Done,
            "geography accessed before construction is complete"
        );
        Geography::new(self.srid, Some(self.root.expect("sealed root shape")))
    }
}

impl Default for GeographyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn seal(pending: Pending) -> Shape {
    let Pending { kind, figures, children } = pending;
    match kind {
        GeographyKind::Point => Shape::Point(figures.into_iter().next().unwrap_or_default()),
        GeographyKind::LineString => {
            Shape::LineString(figures.into_iter().next().unwrap_or_default())
        }
        GeographyKind::Polygon => Shape::Polygon(normalize_rings(figures)),
        GeographyKind::MultiPoint => Shape::MultiPoint(children),
        GeographyKind::MultiLineString => Shape::MultiLineString(children),
        GeographyKind::MultiPolygon => Shape::MultiPolygon(children),
        GeographyKind::GeometryCollection => Shape::GeometryCollection(children),
    }
}

/// Geography ring convention on ingest: the first figure (the exterior ring)
/// winds counter-clockwise, every later figure clockwise. Figures arriving
/// with the opposite winding are reversed; zero-area figures are kept as-is.
fn normalize_rings(mut figures: Vec<Vec<LatLon>>) -> Vec<Vec<LatLon>> {
    for (index, figure) in figures.iter_mut().enumerate() {
        let coords: Vec<Coord<f64>> =
            figure.iter().map(|p| Coord { x: p.lon, y: p.lat }).collect();
        let area = orient::signed_area(&coords);
        let want_ccw = index == 0;
        if area != 0.0 && (area > 0.0) != want_ccw {
            figure.reverse();
        }
    }
    figures
}

#[cfg(test)]
mod tests {
    use super::{GeographyBuilder, GeographyKind};

    #[test]
    fn builds_a_point() {
        let mut builder = GeographyBuilder::new();
        builder.set_srid(4326);
        builder.begin_geography(GeographyKind::Point);
        builder.begin_figure(20.0, 10.0);
        builder.end_figure();
        builder.end_geography();

        let point = builder.finish();
        assert_eq!(point.srid(), 4326);
        assert_eq!(point.shape_type(), Some("Point"));
        assert_eq!(point.lat(), Some(20.0));
        assert_eq!(point.long(), Some(10.0));
    }

    #[test]
    fn builds_nested_collection() {
        let mut builder = GeographyBuilder::new();
        builder.begin_geography(GeographyKind::GeometryCollection);
        builder.begin_geography(GeographyKind::Point);
        builder.begin_figure(1.0, 2.0);
        builder.end_figure();
        builder.end_geography();
        builder.begin_geography(GeographyKind::LineString);
        builder.begin_figure(0.0, 0.0);
        builder.add_line(1.0, 1.0);
        builder.end_figure();
        builder.end_geography();
        builder.end_geography();

        let collection = builder.finish();
        assert_eq!(collection.shape_type(), Some("GeometryCollection"));
        assert_eq!(collection.num_geometries(), 2);
        assert_eq!(
            collection.geometry_n(2).and_then(|g| g.shape_type()),
            Some("LineString")
        );
    }

    #[test]
    fn polygon_rings_are_normalized_on_ingest() {
        let mut builder = GeographyBuilder::new();
        builder.begin_geography(GeographyKind::Polygon);
        // Exterior submitted clockwise; expect it flipped to counter-clockwise.
        builder.begin_figure(0.0, 0.0);
        builder.add_line(10.0, 0.0);
        builder.add_line(10.0, 10.0);
        builder.add_line(0.0, 10.0);
        builder.add_line(0.0, 0.0);
        builder.end_figure();
        builder.end_geography();

        let polygon = builder.finish();
        let ring = polygon.ring_n(1).expect("one ring");
        let first = ring.point_n(1).expect("ring start");
        let second = ring.point_n(2).expect("ring second point");
        assert_eq!((first.lat(), first.long()), (Some(0.0), Some(0.0)));
        assert_eq!((second.lat(), second.long()), (Some(0.0), Some(10.0)));
    }

    #[test]
    #[should_panic(expected = "BeginFigure called outside a geography")]
    fn figure_outside_geography_panics() {
        let mut builder = GeographyBuilder::new();
        builder.begin_figure(0.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "SetSrid must precede BeginGeography")]
    fn set_srid_after_start_panics() {
        let mut builder = GeographyBuilder::new();
        builder.begin_geography(GeographyKind::Point);
        builder.set_srid(4326);
    }

    #[test]
    #[should_panic(expected = "a point figure holds a single position")]
    fn add_line_in_point_figure_panics() {
        let mut builder = GeographyBuilder::new();
        builder.begin_geography(GeographyKind::Point);
        builder.begin_figure(0.0, 0.0);
        builder.add_line(1.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "EndGeography called with no open geography or an open figure")]
    fn end_geography_with_open_figure_panics() {
        let mut builder = GeographyBuilder::new();
        builder.begin_geography(GeographyKind::LineString);
        builder.begin_figure(0.0, 0.0);
        builder.end_geography();
    }

    #[test]
    #[should_panic(expected = "geography accessed before construction is complete")]
    fn finish_before_done_panics() {
        let mut builder = GeographyBuilder::new();
        builder.begin_geography(GeographyKind::Point);
        builder.finish();
    }

    #[test]
    #[should_panic(expected = "cannot nest a geography inside Point")]
    fn nesting_inside_simple_geography_panics() {
        let mut builder = GeographyBuilder::new();
        builder.begin_geography(GeographyKind::Point);
        builder.begin_geography(GeographyKind::Point);
    }
}
