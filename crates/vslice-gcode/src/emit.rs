//! Instruction emission: serializing segments into G-code text.

use std::fmt::Write;

use crate::error::Result;
use crate::flow::Extruder;
use crate::profile::{ExtrusionMode, PrinterProfile, SinglePointPolicy};
use crate::segment::{MotionKind, Segment};
use crate::stats::PrintStats;

/// Segments shorter than this count as zero-length and fall under the
/// single-point policy instead of producing a deposition command.
const ZERO_LENGTH_EPS: f64 = 1e-9;

/// Serialize parameterized segments into the G-code body, in strict input
/// order.
///
/// The stream opens by recording the extrusion mode once (`M83`/`M82` plus
/// `G92 E0`). Travel moves become `G0`, optionally split into a
/// lift-traverse-lower triple when the profile's lift policy triggers;
/// print moves become `G1` with their precomputed `E` and `F` words.
/// Retraction and deretraction lines are inserted at print-to-travel and
/// travel-to-print transitions. Input segments are not mutated.
pub fn emit_body(
    segments: &[Segment],
    profile: &PrinterProfile,
    extruder: &mut Extruder,
) -> Result<(String, PrintStats)> {
    let mut body = String::new();
    let mut stats = PrintStats::default();

    match profile.extrusion_mode {
        ExtrusionMode::Relative => body.push_str("; relative extrusion\nM83\nG92 E0\n"),
        ExtrusionMode::Absolute => body.push_str("; absolute extrusion\nM82\nG92 E0\n"),
    }

    let mut previous_kind: Option<MotionKind> = None;
    for segment in segments {
        match segment.kind {
            MotionKind::Travel => {
                if previous_kind == Some(MotionKind::Print) {
                    if let Some(retraction) = extruder.retract() {
                        let _ = writeln!(
                            body,
                            "G1 E-{:.5} F{:.0}",
                            retraction.length, retraction.speed
                        );
                    }
                }
                let _ = writeln!(body, "; path {}", segment.path_index);
                emit_travel(&mut body, segment, profile, &mut stats);
                if profile.extrusion_mode == ExtrusionMode::Absolute {
                    body.push_str("G92 E0\n");
                }
                if segment.path_print_count == 0 {
                    // Single-point path: the tool is in position, nothing to
                    // draw. The policy decides whether to dwell.
                    if let SinglePointPolicy::Dwell { ms } = profile.single_point_policy {
                        let _ = writeln!(body, "G4 P{ms}");
                    }
                }
            }
            MotionKind::Print => {
                if previous_kind == Some(MotionKind::Travel) {
                    if let Some(retraction) = extruder.deretract() {
                        let _ = writeln!(
                            body,
                            "G1 E{:.5} F{:.0}",
                            retraction.length, retraction.speed
                        );
                    }
                }
                let length = segment.length();
                if length <= ZERO_LENGTH_EPS {
                    if let SinglePointPolicy::Dwell { ms } = profile.single_point_policy {
                        let _ = writeln!(body, "G4 P{ms}");
                    }
                } else {
                    let _ = writeln!(
                        body,
                        "G1 X{:.3} Y{:.3} Z{:.3} E{:.5} F{:.0}",
                        segment.to.x, segment.to.y, segment.to.z, segment.extrusion,
                        segment.feedrate
                    );
                    stats.print_distance += length;
                    stats.print_time_minutes += length / segment.feedrate;
                }
            }
        }
        previous_kind = Some(segment.kind);
    }

    stats.extruded_volume = extruder.total_volume();
    Ok((body, stats))
}

/// Write the `G0` line(s) for one travel segment.
///
/// When the profile configures a lift and the move is long enough (and stays
/// on one layer), the move splits into lift, XY traverse, and lower.
fn emit_travel(
    body: &mut String,
    segment: &Segment,
    profile: &PrinterProfile,
    stats: &mut PrintStats,
) {
    let xy = segment.xy_length();
    let lift = profile
        .lift
        .filter(|l| xy >= l.min_distance && segment.from.z == segment.to.z);

    let distance = match lift {
        Some(lift) => {
            let raised = segment.from.z + lift.height;
            let _ = writeln!(body, "G0 Z{:.3} F{:.0}", raised, segment.feedrate);
            let _ = writeln!(
                body,
                "G0 X{:.3} Y{:.3} F{:.0}",
                segment.to.x, segment.to.y, segment.feedrate
            );
            let _ = writeln!(body, "G0 Z{:.3} F{:.0}", segment.to.z, segment.feedrate);
            2.0 * lift.height + xy
        }
        None => {
            let _ = writeln!(
                body,
                "G0 X{:.3} Y{:.3} Z{:.3} F{:.0}",
                segment.to.x, segment.to.y, segment.to.z, segment.feedrate
            );
            segment.length()
        }
    };

    stats.travel_distance += distance;
    stats.print_time_minutes += distance / segment.feedrate;
}
