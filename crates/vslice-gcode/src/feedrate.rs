//! Feedrate assignment.

use crate::profile::PrinterProfile;
use crate::segment::{MotionKind, Segment};

/// Assign a feedrate to one segment.
///
/// Travel segments run at `travel_speed`, print segments at `print_speed`.
/// When `ramp_segment_count` is non-zero, the first and last that many print
/// segments of each path interpolate linearly from `print_speed *
/// ramp_start_factor` up to the nominal speed, countering pressure lag at
/// path starts and ends. Pure function of the segment's position within its
/// path.
pub fn feedrate(segment: &Segment, profile: &PrinterProfile) -> f64 {
    match segment.kind {
        MotionKind::Travel => profile.travel_speed,
        MotionKind::Print => {
            let ramp = profile.ramp_segment_count;
            if ramp == 0 || segment.path_print_count == 0 {
                return profile.print_speed;
            }
            let from_start = segment.print_index;
            let from_end = segment.path_print_count - 1 - segment.print_index;
            let edge_distance = from_start.min(from_end);
            if edge_distance >= ramp {
                return profile.print_speed;
            }
            let factor = profile.ramp_start_factor
                + (1.0 - profile.ramp_start_factor) * edge_distance as f64 / ramp as f64;
            profile.print_speed * factor
        }
    }
}
