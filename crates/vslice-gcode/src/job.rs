//! Job construction: unit conversion and layer stacking.

use vslice_pattern::{Pattern, Point2};

use crate::error::{GcodeError, Result};
use crate::profile::PrinterProfile;
use crate::units::PixelMap;

/// Options for one translation of a pattern against a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceOptions {
    /// Number of layers to print. Pattern layers are reused modulo their
    /// count, so a 2-layer pattern printed with 8 layers alternates.
    pub layers: usize,
    /// Job placement on the bed in millimetres, added to the profile's
    /// origin offset.
    pub offset: Option<[f64; 2]>,
    /// Override for the profile's first layer height (mm).
    pub first_layer_height: Option<f64>,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            layers: 1,
            offset: None,
            first_layer_height: None,
        }
    }
}

/// One path of the job in machine coordinates, ready for classification.
#[derive(Debug, Clone)]
pub struct PlannedPath {
    /// Points in millimetres.
    pub points: Vec<Point2>,
    /// Extrusion line width at each point (mm).
    pub widths: Vec<f64>,
    /// Z height of the layer this path belongs to (mm).
    pub z: f64,
}

/// A pattern converted into machine coordinates for one profile.
///
/// Paths are in strict print order across all layers. The job owns no
/// shared state; translating the same pattern against several profiles
/// builds independent jobs.
#[derive(Debug, Clone)]
pub struct Job {
    /// Paths in print order.
    pub paths: Vec<PlannedPath>,
}

impl Job {
    /// Convert a pattern into a job for `profile`.
    ///
    /// This is the unit conversion stage: every pixel coordinate is mapped
    /// to millimetres exactly once, layer Z heights are assigned, and the
    /// per-point line widths are resolved from overlap data.
    pub fn build(
        pattern: &Pattern,
        profile: &PrinterProfile,
        options: &SliceOptions,
    ) -> Result<Self> {
        profile.validate()?;
        if options.layers == 0 {
            return Err(GcodeError::Config(
                "cannot slice with zero layers".into(),
            ));
        }
        if pattern.layer_count() == 0 {
            return Err(GcodeError::EmptyJob);
        }
        if let Some(height) = options.first_layer_height {
            if !height.is_finite() || height <= 0.0 {
                return Err(GcodeError::Config(format!(
                    "first layer height must be positive and finite, got {height}"
                )));
            }
        }

        let map = PixelMap::for_job(profile, pattern, options.offset)?;
        let first_layer_height = options
            .first_layer_height
            .unwrap_or(profile.first_layer_height);

        let mut paths = Vec::new();
        let mut path_index = 0usize;
        for layer_number in 0..options.layers {
            let layer = &pattern.layers[layer_number % pattern.layer_count()];
            let z = first_layer_height + layer_number as f64 * profile.layer_height;
            for path in &layer.paths {
                paths.push(plan_path(path, z, &map, profile, path_index)?);
                path_index += 1;
            }
        }

        if paths.is_empty() {
            return Err(GcodeError::EmptyJob);
        }
        Ok(Self { paths })
    }
}

fn plan_path(
    path: &vslice_pattern::PrintPath,
    z: f64,
    map: &PixelMap,
    profile: &PrinterProfile,
    index: usize,
) -> Result<PlannedPath> {
    if path.is_empty() {
        return Err(GcodeError::InvalidPath {
            index,
            reason: "path has no points".into(),
        });
    }

    let mut points = Vec::with_capacity(path.len());
    for p in &path.points {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(GcodeError::Numeric {
                index,
                reason: format!("non-finite coordinate ({}, {})", p.x, p.y),
            });
        }
        let converted = map.to_physical(*p);
        if !profile.in_bounds(converted.x, converted.y, z) {
            return Err(GcodeError::OutOfBounds {
                x: converted.x,
                y: converted.y,
                z,
            });
        }
        points.push(converted);
    }

    let widths = match &path.overlap {
        Some(overlap) => {
            if overlap.len() != path.len() {
                return Err(GcodeError::InvalidPath {
                    index,
                    reason: format!(
                        "overlap has {} entries for {} points",
                        overlap.len(),
                        path.len()
                    ),
                });
            }
            let mut widths = Vec::with_capacity(overlap.len());
            for &fraction in overlap {
                let width = profile.line_width * (1.0 - fraction / 2.0);
                if !width.is_finite() || width <= 0.0 {
                    return Err(GcodeError::Numeric {
                        index,
                        reason: format!("overlap {fraction} yields non-positive line width"),
                    });
                }
                widths.push(width);
            }
            widths
        }
        None => vec![profile.line_width; path.len()],
    };

    Ok(PlannedPath { points, widths, z })
}
