//! A complete sliced pattern: layers, metadata, and whole-pattern transforms.

use std::path::Path;

use crate::error::Result;
use crate::layer::Layer;
use crate::path::Bounds;
use crate::{read, Point2, Vec2};

/// A named, layered set of print paths in slicer pixel coordinates.
///
/// Patterns are immutable during translation; `scale`/`translate`/`rotate`
/// exist for pre-translation placement of the whole job.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Pattern name, taken from the slicer header.
    pub name: String,
    /// Width of a printed line in slicer pixels ("print diameter").
    pub pixel_path_width: f64,
    /// Layers in print order.
    pub layers: Vec<Layer>,
}

impl Pattern {
    /// Read a pattern from the slicer's paths file.
    ///
    /// When the file lives in a directory named `paths`, the sibling
    /// overlap file `../overlap/<file name>` is picked up if it exists;
    /// for files anywhere else no overlap lookup happens.
    pub fn load(paths_file: impl AsRef<Path>) -> Result<Self> {
        read::load_pattern(paths_file.as_ref())
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Bounding box over all layers, or `None` when every layer is empty.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.layers.iter().filter_map(|l| l.bounds());
        let first = iter.next()?;
        Some(iter.fold(first, |b, l| b.union(&l)))
    }

    /// Centre of the pattern bounds, or the origin for an empty pattern.
    pub fn centre(&self) -> Point2 {
        self.bounds().map(|b| b.centre()).unwrap_or_else(Point2::origin)
    }

    /// Scale the pattern in place.
    ///
    /// Intended only for the pixel-to-physical conversion; scaling by other
    /// ratios changes the printed line spacing the slicer chose.
    pub fn scale(&mut self, ratio: f64) {
        for layer in &mut self.layers {
            layer.scale(ratio);
        }
    }

    /// Translate the pattern in place, in the current coordinate space.
    pub fn translate(&mut self, offset: Vec2) {
        for layer in &mut self.layers {
            layer.translate(offset);
        }
    }

    /// Rotate the pattern in place by `angle` radians.
    ///
    /// Rotates about `centre`, or about the pattern centre when `None`.
    pub fn rotate(&mut self, angle: f64, centre: Option<Point2>) {
        let centre = centre.unwrap_or_else(|| self.centre());
        for layer in &mut self.layers {
            layer.rotate(angle, centre);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PrintPath;
    use approx::assert_relative_eq;

    fn square_pattern() -> Pattern {
        Pattern {
            name: "square".into(),
            pixel_path_width: 9.0,
            layers: vec![Layer::new(vec![PrintPath::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ])])],
        }
    }

    #[test]
    fn centre_of_bounds() {
        let p = square_pattern();
        assert_relative_eq!(p.centre().x, 5.0);
        assert_relative_eq!(p.centre().y, 5.0);
    }

    #[test]
    fn rotate_about_own_centre_keeps_bounds() {
        let mut p = square_pattern();
        p.rotate(std::f64::consts::PI, None);
        let b = p.bounds().unwrap();
        assert_relative_eq!(b.min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.max.y, 10.0, epsilon = 1e-9);
    }
}
