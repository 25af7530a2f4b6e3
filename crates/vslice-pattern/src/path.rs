//! A single continuous print path and its bounding box.

use crate::{Point2, Vec2};

/// Axis-aligned bounding box in the path's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl Bounds {
    /// Bounds of a single point.
    pub fn point(p: Point2) -> Self {
        Self { min: p, max: p }
    }

    /// The smallest bounds containing both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Centre of the bounds.
    pub fn centre(&self) -> Point2 {
        Point2::new((self.min.x + self.max.x) / 2.0, (self.min.y + self.max.y) / 2.0)
    }

    /// Width (X extent).
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height (Y extent).
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// One continuous tool-down trajectory from the slicer.
///
/// Consecutive points are connected by print moves; the jump between two
/// paths is always a travel move. The optional `overlap` array holds the
/// slicer's per-point overlap fraction, used for variable-width extrusion.
#[derive(Debug, Clone)]
pub struct PrintPath {
    /// Ordered points along the path, in slicer pixel coordinates.
    pub points: Vec<Point2>,
    /// Per-point overlap fraction (0 = no overlap), same length as `points`.
    pub overlap: Option<Vec<f64>>,
}

impl PrintPath {
    /// Create a path from points, without overlap data.
    pub fn new(points: Vec<Point2>) -> Self {
        Self {
            points,
            overlap: None,
        }
    }

    /// Create a path with per-point overlap fractions.
    pub fn with_overlap(points: Vec<Point2>, overlap: Vec<f64>) -> Self {
        Self {
            points,
            overlap: Some(overlap),
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the path has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point of the path.
    pub fn start(&self) -> Option<&Point2> {
        self.points.first()
    }

    /// Last point of the path.
    pub fn end(&self) -> Option<&Point2> {
        self.points.last()
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Bounding box, or `None` for an empty path.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .skip(1)
                .fold(Bounds::point(first), |b, p| b.union(&Bounds::point(*p))),
        )
    }

    /// Scale all coordinates by `ratio`.
    ///
    /// Used to go from pixel-based representation to physical lengths.
    pub fn scale(&mut self, ratio: f64) {
        for p in &mut self.points {
            *p *= ratio;
        }
    }

    /// Translate all coordinates by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Rotate all coordinates by `angle` radians about `centre`.
    pub fn rotate(&mut self, angle: f64, centre: Point2) {
        let (sin, cos) = angle.sin_cos();
        for p in &mut self.points {
            let d = *p - centre;
            *p = centre + Vec2::new(cos * d.x - sin * d.y, sin * d.x + cos * d.y);
        }
    }

    /// Reverse the direction of the path.
    pub fn invert(&mut self) {
        self.points.reverse();
        if let Some(overlap) = &mut self.overlap {
            overlap.reverse();
        }
    }
}
