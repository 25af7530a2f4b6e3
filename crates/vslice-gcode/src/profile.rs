//! Printer profile definitions.

use serde::{Deserialize, Serialize};

use crate::error::{GcodeError, Result};

/// How extrusion amounts are written into the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtrusionMode {
    /// Each `E` value is the amount for that move (`M83`).
    #[default]
    Relative,
    /// Each `E` value is the accumulated extruder position (`M82`), reset
    /// with `G92 E0` at the start of every path.
    Absolute,
}

/// What to emit for a path that has exactly one point.
///
/// Such a path still gets a travel move to its point; this policy decides
/// what happens once the tool is there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SinglePointPolicy {
    /// Reposition only, deposit nothing.
    #[default]
    Skip,
    /// Reposition, then dwell in place for the given time (`G4 P`).
    Dwell {
        /// Dwell time in milliseconds.
        ms: u32,
    },
}

/// Retraction settings for travel moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Retraction {
    /// Filament length to pull back (mm).
    pub length: f64,
    /// Retraction feedrate (mm/min).
    pub speed: f64,
}

/// Z-hop settings for long travel moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelLift {
    /// How far to lift the nozzle (mm).
    pub height: f64,
    /// Minimum XY travel distance before lifting (mm).
    pub min_distance: f64,
}

/// Printer profile with machine-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterProfile {
    /// Profile name.
    pub name: String,
    /// Printing feedrate (mm/min).
    pub print_speed: f64,
    /// Travel feedrate (mm/min).
    pub travel_speed: f64,
    /// Nominal extruded line width (mm).
    pub line_width: f64,
    /// Layer height for non-first layers (mm).
    pub layer_height: f64,
    /// First layer height (mm).
    pub first_layer_height: f64,
    /// Unitless extrusion gain.
    pub flow_multiplier: f64,
    /// Filament diameter (mm).
    pub filament_diameter: f64,
    /// Translation applied to all converted coordinates (mm).
    pub origin_offset: [f64; 2],
    /// Physical size of one slicer pixel (mm). When `None`, derived per job
    /// as `line_width / pattern.pixel_path_width`.
    pub pixel_size: Option<f64>,
    /// Number of print segments at each path end over which the feedrate
    /// ramps linearly up to `print_speed`. Zero disables ramping.
    pub ramp_segment_count: usize,
    /// Feedrate factor at the very start and end of a ramped path, in (0, 1].
    pub ramp_start_factor: f64,
    /// Extrusion value mode.
    pub extrusion_mode: ExtrusionMode,
    /// Policy for single-point paths and zero-length print segments.
    pub single_point_policy: SinglePointPolicy,
    /// Retraction on travel moves, if the printer wants it.
    pub retraction: Option<Retraction>,
    /// Z-hop on long travel moves, if the printer wants it.
    pub lift: Option<TravelLift>,
    /// Build volume X limit (mm); unlimited when `None`.
    pub max_x: Option<f64>,
    /// Build volume Y limit (mm); unlimited when `None`.
    pub max_y: Option<f64>,
    /// Build volume Z limit (mm); unlimited when `None`.
    pub max_z: Option<f64>,
    /// Name of the prologue template in the template store.
    pub prologue: String,
    /// Name of the epilogue template in the template store.
    pub epilogue: String,
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self::generic()
    }
}

impl PrinterProfile {
    /// Generic FFF printer profile with relative extrusion.
    pub fn generic() -> Self {
        Self {
            name: "Generic".into(),
            print_speed: 1200.0,
            travel_speed: 6000.0,
            line_width: 0.4,
            layer_height: 0.2,
            first_layer_height: 0.2,
            flow_multiplier: 1.0,
            filament_diameter: 1.75,
            origin_offset: [0.0, 0.0],
            pixel_size: None,
            ramp_segment_count: 0,
            ramp_start_factor: 0.5,
            extrusion_mode: ExtrusionMode::Relative,
            single_point_policy: SinglePointPolicy::Skip,
            retraction: None,
            lift: None,
            max_x: None,
            max_y: None,
            max_z: None,
            prologue: "generic/prologue".into(),
            epilogue: "generic/epilogue".into(),
        }
    }

    /// Prusa MK4S printing PLA with variable width and relative extrusion.
    pub fn prusa_mk4s() -> Self {
        Self {
            name: "Prusa MK4S".into(),
            print_speed: 2400.0,
            travel_speed: 18000.0,
            line_width: 0.8,
            layer_height: 0.2,
            first_layer_height: 0.2,
            flow_multiplier: 1.0,
            filament_diameter: 1.75,
            origin_offset: [0.0, 0.0],
            pixel_size: None,
            ramp_segment_count: 0,
            ramp_start_factor: 0.5,
            extrusion_mode: ExtrusionMode::Relative,
            single_point_policy: SinglePointPolicy::Skip,
            retraction: Some(Retraction {
                length: 1.0,
                speed: 1500.0,
            }),
            lift: Some(TravelLift {
                height: 0.8,
                min_distance: 5.0,
            }),
            max_x: Some(250.0),
            max_y: Some(210.0),
            max_z: Some(220.0),
            prologue: "prusa-mk4s/prologue".into(),
            epilogue: "prusa-mk4s/epilogue".into(),
        }
    }

    /// Hyrel System 30M direct-ink-writing head.
    ///
    /// Slow deposition, dwell on single-point paths instead of skipping
    /// them, no retraction (priming is handled by the prologue).
    pub fn hyrel_30m() -> Self {
        Self {
            name: "Hyrel System 30M".into(),
            print_speed: 240.0,
            travel_speed: 1200.0,
            line_width: 0.2,
            layer_height: 0.12,
            first_layer_height: 0.24,
            flow_multiplier: 1.0,
            filament_diameter: 1.75,
            origin_offset: [0.0, 0.0],
            pixel_size: None,
            ramp_segment_count: 0,
            ramp_start_factor: 0.5,
            extrusion_mode: ExtrusionMode::Relative,
            single_point_policy: SinglePointPolicy::Dwell { ms: 100 },
            retraction: None,
            lift: Some(TravelLift {
                height: 2.0,
                min_distance: 10.0,
            }),
            max_x: Some(200.0),
            max_y: Some(200.0),
            max_z: Some(120.0),
            prologue: "hyrel-30m/prologue".into(),
            epilogue: "hyrel-30m/epilogue".into(),
        }
    }

    /// Get all built-in profiles.
    pub fn all_profiles() -> Vec<Self> {
        vec![Self::generic(), Self::prusa_mk4s(), Self::hyrel_30m()]
    }

    /// Look up a built-in profile by name, case-insensitively.
    pub fn builtin(name: &str) -> Option<Self> {
        Self::all_profiles()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Check if a position is within the build volume.
    ///
    /// Negative coordinates are always out of bounds.
    pub fn in_bounds(&self, x: f64, y: f64, z: f64) -> bool {
        x >= 0.0
            && y >= 0.0
            && z >= 0.0
            && self.max_x.map_or(true, |limit| x <= limit)
            && self.max_y.map_or(true, |limit| y <= limit)
            && self.max_z.map_or(true, |limit| z <= limit)
    }

    /// Validate the profile.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("print_speed", self.print_speed),
            ("travel_speed", self.travel_speed),
            ("line_width", self.line_width),
            ("layer_height", self.layer_height),
            ("first_layer_height", self.first_layer_height),
            ("flow_multiplier", self.flow_multiplier),
            ("filament_diameter", self.filament_diameter),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GcodeError::Config(format!(
                    "{field} must be positive and finite, got {value}"
                )));
            }
        }
        if let Some(pixel_size) = self.pixel_size {
            if !pixel_size.is_finite() || pixel_size <= 0.0 {
                return Err(GcodeError::Config(format!(
                    "pixel_size must be positive and finite, got {pixel_size}"
                )));
            }
        }
        if self.origin_offset.iter().any(|v| !v.is_finite()) {
            return Err(GcodeError::Config("origin_offset must be finite".into()));
        }
        if !(self.ramp_start_factor > 0.0 && self.ramp_start_factor <= 1.0) {
            return Err(GcodeError::Config(format!(
                "ramp_start_factor must be in (0, 1], got {}",
                self.ramp_start_factor
            )));
        }
        if let Some(retraction) = &self.retraction {
            if retraction.length <= 0.0 || retraction.speed <= 0.0 {
                return Err(GcodeError::Config(
                    "retraction length and speed must be positive".into(),
                ));
            }
            if self.extrusion_mode == ExtrusionMode::Absolute {
                return Err(GcodeError::Config(
                    "retraction requires relative extrusion mode".into(),
                ));
            }
        }
        if let Some(lift) = &self.lift {
            if lift.height <= 0.0 || lift.min_distance < 0.0 {
                return Err(GcodeError::Config(
                    "lift height must be positive and min_distance non-negative".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_are_valid() {
        for profile in PrinterProfile::all_profiles() {
            profile.validate().unwrap();
        }
    }

    #[test]
    fn builtin_lookup_is_case_insensitive() {
        assert!(PrinterProfile::builtin("prusa mk4s").is_some());
        assert!(PrinterProfile::builtin("no such printer").is_none());
    }

    #[test]
    fn in_bounds_checks_limits_and_sign() {
        let profile = PrinterProfile::prusa_mk4s();
        assert!(profile.in_bounds(100.0, 100.0, 100.0));
        assert!(!profile.in_bounds(-1.0, 100.0, 100.0));
        assert!(!profile.in_bounds(100.0, 300.0, 100.0));
        let unlimited = PrinterProfile::generic();
        assert!(unlimited.in_bounds(1e6, 1e6, 1e6));
    }

    #[test]
    fn zero_line_width_is_rejected() {
        let mut profile = PrinterProfile::generic();
        profile.line_width = 0.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn retraction_with_absolute_extrusion_is_rejected() {
        let mut profile = PrinterProfile::prusa_mk4s();
        profile.extrusion_mode = ExtrusionMode::Absolute;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn profile_round_trips_through_serde() {
        let profile = PrinterProfile::hyrel_30m();
        let json = serde_json::to_string(&profile).unwrap();
        let back: PrinterProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, profile.name);
        assert_eq!(back.single_point_policy, profile.single_point_policy);
    }
}
