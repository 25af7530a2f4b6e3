//! Extrusion flow calculation and extruder-position bookkeeping.

use std::f64::consts::PI;

use crate::error::{GcodeError, Result};
use crate::profile::{ExtrusionMode, PrinterProfile, Retraction};

/// Cross-section area of an extruded line, following the Slic3r flow model:
/// a rectangle with semicircular ends.
///
/// <https://manual.slic3r.org/advanced/flow-math>
pub fn cross_section(width: f64, height: f64) -> f64 {
    let apparent_width = width + height * (1.0 - PI / 4.0);
    (apparent_width - height) * height + PI * (height / 2.0).powi(2)
}

/// Cross-section area of round filament with the given diameter.
pub fn filament_cross_section(diameter: f64) -> f64 {
    PI * diameter * diameter / 4.0
}

/// Per-job extruder state: the running E position and retraction bookkeeping.
///
/// Created at the start of one job-profile translation and discarded at the
/// end; never shared between jobs or profiles, so concurrent translations
/// stay independent.
///
/// In absolute mode the accumulator is reset at every path start (paired
/// with a `G92 E0` in the stream), which keeps floating-point summation
/// error bounded to one path. In relative mode each move carries its own
/// amount and nothing accumulates in the stream.
#[derive(Debug)]
pub struct Extruder {
    mode: ExtrusionMode,
    flow_multiplier: f64,
    layer_height: f64,
    filament_area: f64,
    retraction: Option<Retraction>,
    accumulated: f64,
    total: f64,
    retracted: bool,
}

impl Extruder {
    /// Create the extruder state for one job against `profile`.
    pub fn new(profile: &PrinterProfile) -> Self {
        Self {
            mode: profile.extrusion_mode,
            flow_multiplier: profile.flow_multiplier,
            layer_height: profile.layer_height,
            filament_area: filament_cross_section(profile.filament_diameter),
            retraction: profile.retraction,
            accumulated: 0.0,
            total: 0.0,
            retracted: false,
        }
    }

    /// Deposition for a print segment of the given length and line width.
    ///
    /// Returns the E value to write: the segment's own amount in relative
    /// mode, the running position in absolute mode. Units are filament
    /// millimetres.
    pub fn deposition(&mut self, length: f64, width: f64, path_index: usize) -> Result<f64> {
        if !length.is_finite() || length < 0.0 {
            return Err(GcodeError::Numeric {
                index: path_index,
                reason: format!("invalid segment length {length}"),
            });
        }
        let amount =
            length * cross_section(width, self.layer_height) * self.flow_multiplier
                / self.filament_area;
        if !amount.is_finite() {
            return Err(GcodeError::Numeric {
                index: path_index,
                reason: "non-finite extrusion amount".into(),
            });
        }
        self.accumulated += amount;
        self.total += amount;
        Ok(match self.mode {
            ExtrusionMode::Relative => amount,
            ExtrusionMode::Absolute => self.accumulated,
        })
    }

    /// Zero the running E position; the emitter pairs this with `G92 E0`.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }

    /// Retraction to emit when leaving a print move, once per transition.
    pub fn retract(&mut self) -> Option<Retraction> {
        if self.retracted {
            return None;
        }
        let retraction = self.retraction?;
        self.retracted = true;
        Some(retraction)
    }

    /// Deretraction to emit when returning to a print move; pairs with the
    /// preceding [`Extruder::retract`].
    pub fn deretract(&mut self) -> Option<Retraction> {
        if !self.retracted {
            return None;
        }
        let retraction = self.retraction?;
        self.retracted = false;
        Some(retraction)
    }

    /// Total deposited filament length over the job (mm), excluding
    /// retraction moves.
    pub fn total_filament(&self) -> f64 {
        self.total
    }

    /// Total deposited volume over the job (mm³, i.e. microlitres).
    pub fn total_volume(&self) -> f64 {
        self.total * self.filament_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_section_matches_flow_math() {
        // 0.4 x 0.2 line: (0.4 + 0.2*(1 - pi/4) - 0.2)*0.2 + pi*0.01
        let area = cross_section(0.4, 0.2);
        let expected = (0.4 + 0.2 * (1.0 - PI / 4.0) - 0.2) * 0.2 + PI * 0.1f64.powi(2);
        assert_relative_eq!(area, expected);
        assert!(area > 0.0);
    }

    #[test]
    fn relative_mode_returns_per_segment_amounts() {
        let mut extruder = Extruder::new(&PrinterProfile::generic());
        let a = extruder.deposition(10.0, 0.4, 0).unwrap();
        let b = extruder.deposition(10.0, 0.4, 0).unwrap();
        assert_relative_eq!(a, b);
        assert_relative_eq!(extruder.total_filament(), a + b);
    }

    #[test]
    fn absolute_mode_accumulates_until_reset() {
        let mut profile = PrinterProfile::generic();
        profile.extrusion_mode = ExtrusionMode::Absolute;
        let mut extruder = Extruder::new(&profile);
        let a = extruder.deposition(10.0, 0.4, 0).unwrap();
        let b = extruder.deposition(10.0, 0.4, 0).unwrap();
        assert_relative_eq!(b, 2.0 * a);
        extruder.reset();
        let c = extruder.deposition(10.0, 0.4, 0).unwrap();
        assert_relative_eq!(c, a);
        // Total keeps counting across resets.
        assert_relative_eq!(extruder.total_filament(), 3.0 * a);
    }

    #[test]
    fn zero_length_deposits_nothing() {
        let mut extruder = Extruder::new(&PrinterProfile::generic());
        let amount = extruder.deposition(0.0, 0.4, 0).unwrap();
        assert_relative_eq!(amount, 0.0);
    }

    #[test]
    fn negative_length_is_a_numeric_error() {
        let mut extruder = Extruder::new(&PrinterProfile::generic());
        assert!(matches!(
            extruder.deposition(-1.0, 0.4, 3),
            Err(GcodeError::Numeric { index: 3, .. })
        ));
    }

    #[test]
    fn retraction_pairs_and_never_doubles() {
        let mut extruder = Extruder::new(&PrinterProfile::prusa_mk4s());
        assert!(extruder.deretract().is_none()); // not retracted yet
        assert!(extruder.retract().is_some());
        assert!(extruder.retract().is_none()); // already retracted
        assert!(extruder.deretract().is_some());
        assert!(extruder.deretract().is_none());
    }

    #[test]
    fn no_retraction_without_configuration() {
        let mut extruder = Extruder::new(&PrinterProfile::generic());
        assert!(extruder.retract().is_none());
    }
}
