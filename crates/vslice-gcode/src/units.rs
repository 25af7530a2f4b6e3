//! Pixel-to-physical coordinate conversion.

use vslice_pattern::{Pattern, Point2, Vec2};

use crate::error::{GcodeError, Result};
use crate::profile::PrinterProfile;

/// Affine map from slicer pixel coordinates to machine millimetres.
///
/// `physical = pixel * scale + offset`. The map is constant for one job and
/// invertible, so positions can be mapped back for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMap {
    scale: f64,
    offset: Vec2,
}

impl PixelMap {
    /// Create a map with an explicit scale and offset.
    pub fn new(scale: f64, offset: Vec2) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GcodeError::Config(format!(
                "pixel scale must be positive and finite, got {scale}"
            )));
        }
        if !offset.x.is_finite() || !offset.y.is_finite() {
            return Err(GcodeError::Config("origin offset must be finite".into()));
        }
        Ok(Self { scale, offset })
    }

    /// Derive the map for one job.
    ///
    /// The scale is the profile's explicit `pixel_size` when set, otherwise
    /// the physical pixel size implied by printing the slicer's path width
    /// at the profile's line width. `extra_offset` is the job placement in
    /// millimetres, added on top of the profile's origin offset.
    pub fn for_job(
        profile: &PrinterProfile,
        pattern: &Pattern,
        extra_offset: Option<[f64; 2]>,
    ) -> Result<Self> {
        let scale = match profile.pixel_size {
            Some(size) => size,
            None => {
                if pattern.pixel_path_width <= 0.0 {
                    return Err(GcodeError::Config(
                        "pattern pixel path width must be positive".into(),
                    ));
                }
                profile.line_width / pattern.pixel_path_width
            }
        };
        let extra = extra_offset.unwrap_or([0.0, 0.0]);
        let offset = Vec2::new(
            profile.origin_offset[0] + extra[0],
            profile.origin_offset[1] + extra[1],
        );
        Self::new(scale, offset)
    }

    /// Scale factor in millimetres per pixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Convert a pixel-space point to machine millimetres.
    pub fn to_physical(&self, p: Point2) -> Point2 {
        p * self.scale + self.offset
    }

    /// Inverse map, millimetres back to pixel space.
    pub fn to_pixels(&self, p: Point2) -> Point2 {
        (p - self.offset) / self.scale
    }
}
