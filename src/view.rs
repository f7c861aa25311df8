use geo::{BoundingRect, Coord, MultiPoint, Rect};

use crate::fcl::Fcl;

pub const DEFAULT_VIEW_SIZE: f64 = 1000.0;

/// Maps decimal degrees into a square `0..view_size` canvas, north up.
///
/// Computed once over all groups, so that every rendered document shares the
/// same origin and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    bounds: Rect,
    scale: f64,
    view_size: f64,
}

impl ViewTransform {
    /// `None` if there are no vertices at all.
    pub fn new(fcl: &Fcl, view_size: f64) -> Option<Self> {
        let points: MultiPoint = fcl.vertices().collect();
        let bounds = points.bounding_rect()?;
        let span = bounds.width().max(bounds.height());
        // a single distinct point has no extent to fit
        let scale = if span > 0.0 { view_size / span } else { 1.0 };

        Some(Self {
            bounds,
            scale,
            view_size,
        })
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn view_size(&self) -> f64 {
        self.view_size
    }

    pub fn span(&self) -> f64 {
        self.bounds.width().max(self.bounds.height())
    }

    pub fn project(&self, vertex: Coord) -> Coord {
        let min = self.bounds.min();
        Coord {
            x: (vertex.x - min.x) * self.scale,
            y: self.view_size - (vertex.y - min.y) * self.scale,
        }
    }
}
