#![warn(missing_docs)]

//! G-code generation from vector slicer path output.
//!
//! This crate translates pixel-space print paths (read by
//! `vslice-pattern`) into printer-ready G-code: unit conversion, travel
//! versus print classification, extrusion flow and feedrate assignment,
//! instruction emission, and prologue/epilogue template assembly.
//!
//! Translation runs the linear pipeline convert -> classify ->
//! parameterize -> emit -> assemble for each pattern-profile pair. Pairs
//! are fully independent: translating one pattern against several profiles
//! shares nothing but the immutable inputs.
//!
//! # Example
//!
//! ```ignore
//! use vslice_gcode::{generate_gcode, PrinterProfile, SliceOptions, TemplateStore};
//! use vslice_pattern::Pattern;
//!
//! let pattern = Pattern::load("azimuthal_10_mm.csv")?;
//! let profile = PrinterProfile::prusa_mk4s();
//! let options = SliceOptions { layers: 8, ..Default::default() };
//! let output = generate_gcode(&pattern, &profile, &options, &TemplateStore::builtin())?;
//! std::fs::write("azimuthal_10_mm_mk4s.gcode", &output.gcode)?;
//! ```

pub mod emit;
pub mod error;
pub mod feedrate;
pub mod flow;
pub mod job;
pub mod profile;
pub mod segment;
pub mod stats;
pub mod template;
pub mod units;

pub use emit::emit_body;
pub use error::{GcodeError, Result};
pub use flow::Extruder;
pub use job::{Job, PlannedPath, SliceOptions};
pub use profile::{ExtrusionMode, PrinterProfile, Retraction, SinglePointPolicy, TravelLift};
pub use segment::{classify, MotionKind, Segment};
pub use stats::PrintStats;
pub use template::TemplateStore;
pub use units::PixelMap;

use log::info;
use vslice_pattern::Pattern;

/// A position in machine space (mm).
pub type Point3 = nalgebra::Point3<f64>;

/// The result of one pattern-profile translation.
#[derive(Debug, Clone)]
pub struct GcodeOutput {
    /// Complete G-code file content.
    pub gcode: String,
    /// Accumulated statistics for the job.
    pub stats: PrintStats,
}

/// Translate a pattern into G-code for one printer profile.
///
/// The output is byte-stable: translating the same pattern with the same
/// profile and options always yields identical text.
pub fn generate_gcode(
    pattern: &Pattern,
    profile: &PrinterProfile,
    options: &SliceOptions,
    templates: &TemplateStore,
) -> Result<GcodeOutput> {
    let started = std::time::Instant::now();

    let job = Job::build(pattern, profile, options)?;
    let mut segments = classify(&job)?;
    let mut extruder = Extruder::new(profile);
    parameterize(&mut segments, profile, &mut extruder)?;
    let (body, stats) = emit_body(&segments, profile, &mut extruder)?;

    let header = format!(
        "; generated by vslice {}\n; pattern: {}\n; profile: {}\n{}",
        env!("CARGO_PKG_VERSION"),
        pattern.name,
        profile.name,
        stats.header_comments(profile),
    );
    let gcode = templates.assemble(profile, &header, &body)?;

    info!(
        "generated {} segments for \"{}\" against {} in {:.2} ms",
        segments.len(),
        pattern.name,
        profile.name,
        started.elapsed().as_secs_f64() * 1e3,
    );
    Ok(GcodeOutput { gcode, stats })
}

/// Parameterization stage: assign feedrates and extrusion amounts.
///
/// Travels keep zero extrusion; in absolute mode the extruder position is
/// reset at each path boundary, mirrored by `G92 E0` in the emitted stream.
fn parameterize(
    segments: &mut [Segment],
    profile: &PrinterProfile,
    extruder: &mut Extruder,
) -> Result<()> {
    for segment in segments.iter_mut() {
        segment.feedrate = feedrate::feedrate(segment, profile);
        match segment.kind {
            MotionKind::Travel => {
                if profile.extrusion_mode == ExtrusionMode::Absolute {
                    extruder.reset();
                }
            }
            MotionKind::Print => {
                segment.extrusion =
                    extruder.deposition(segment.length(), segment.width, segment.path_index)?;
            }
        }
    }
    Ok(())
}
