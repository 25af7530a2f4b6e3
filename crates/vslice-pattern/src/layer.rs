//! A single layer of print paths.

use crate::path::{Bounds, PrintPath};
use crate::{Point2, Vec2};

/// One layer of the sliced pattern: an ordered list of print paths.
///
/// Path order is physically meaningful and is preserved through translation.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Print paths in traversal order.
    pub paths: Vec<PrintPath>,
}

impl Layer {
    /// Create a layer from paths.
    pub fn new(paths: Vec<PrintPath>) -> Self {
        Self { paths }
    }

    /// Number of paths.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Bounding box over all paths, or `None` for an empty layer.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.paths.iter().filter_map(|p| p.bounds());
        let first = iter.next()?;
        Some(iter.fold(first, |b, p| b.union(&p)))
    }

    /// Total tool-down distance across all paths.
    pub fn printing_distance(&self) -> f64 {
        self.paths.iter().map(|p| p.length()).sum()
    }

    /// Total tool-up distance between consecutive paths.
    pub fn travel_distance(&self) -> f64 {
        self.paths
            .windows(2)
            .filter_map(|w| Some((*w[1].start()? - *w[0].end()?).norm()))
            .sum()
    }

    /// Scale all paths by `ratio`.
    pub fn scale(&mut self, ratio: f64) {
        for path in &mut self.paths {
            path.scale(ratio);
        }
    }

    /// Translate all paths by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        for path in &mut self.paths {
            path.translate(offset);
        }
    }

    /// Rotate all paths by `angle` radians about `centre`.
    pub fn rotate(&mut self, angle: f64, centre: Point2) {
        for path in &mut self.paths {
            path.rotate(angle, centre);
        }
    }

    /// Reverse the print order: the last path becomes the first, and every
    /// path is traversed backwards.
    pub fn invert(&mut self) {
        self.paths.reverse();
        for path in &mut self.paths {
            path.invert();
        }
    }
}
