//! Segment classification: turning job paths into an ordered move list.

use crate::error::{GcodeError, Result};
use crate::job::Job;
use crate::Point3;

/// Whether a segment deposits material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    /// Repositioning move, nothing deposited.
    Travel,
    /// Deposition move.
    Print,
}

/// One directed move of the toolhead, in machine coordinates.
///
/// Segments exist only during the emission pass. `feedrate` and `extrusion`
/// are zero until the parameterization stage fills them in.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Start position (mm).
    pub from: Point3,
    /// End position (mm).
    pub to: Point3,
    /// Travel or print.
    pub kind: MotionKind,
    /// Extrusion line width at the segment's target (mm).
    pub width: f64,
    /// Assigned feedrate (mm/min).
    pub feedrate: f64,
    /// Deposition amount in filament millimetres; exactly zero for travel.
    pub extrusion: f64,
    /// Index of the job path this segment belongs to. A travel segment
    /// belongs to the path it moves into.
    pub path_index: usize,
    /// Position of this print segment within its path; zero for travel.
    pub print_index: usize,
    /// Number of print segments in this segment's path. Zero marks a
    /// single-point path, which the emitter handles by policy.
    pub path_print_count: usize,
}

impl Segment {
    /// Euclidean length of the segment (mm).
    pub fn length(&self) -> f64 {
        (self.to - self.from).norm()
    }

    /// Length of the XY projection (mm).
    pub fn xy_length(&self) -> f64 {
        let dx = self.to.x - self.from.x;
        let dy = self.to.y - self.from.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Build the ordered segment list for a job.
///
/// Every path is entered by exactly one travel segment, including the first
/// path (reached from the machine origin); points within a path connect
/// pairwise into print segments. Order follows input order exactly.
pub fn classify(job: &Job) -> Result<Vec<Segment>> {
    if job.paths.is_empty() {
        return Err(GcodeError::EmptyJob);
    }

    let mut segments = Vec::new();
    let mut position = Point3::origin();

    for (path_index, path) in job.paths.iter().enumerate() {
        if path.points.is_empty() {
            return Err(GcodeError::InvalidPath {
                index: path_index,
                reason: "path has no points".into(),
            });
        }
        let print_count = path.points.len() - 1;
        let start = Point3::new(path.points[0].x, path.points[0].y, path.z);

        segments.push(Segment {
            from: position,
            to: start,
            kind: MotionKind::Travel,
            width: 0.0,
            feedrate: 0.0,
            extrusion: 0.0,
            path_index,
            print_index: 0,
            path_print_count: print_count,
        });
        position = start;

        for (print_index, window) in path.points.windows(2).enumerate() {
            let to = Point3::new(window[1].x, window[1].y, path.z);
            let segment = Segment {
                from: position,
                to,
                kind: MotionKind::Print,
                width: path.widths[print_index + 1],
                feedrate: 0.0,
                extrusion: 0.0,
                path_index,
                print_index,
                path_print_count: print_count,
            };
            if !segment.length().is_finite() {
                return Err(GcodeError::Numeric {
                    index: path_index,
                    reason: "non-finite segment length".into(),
                });
            }
            segments.push(segment);
            position = to;
        }
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{Job, PlannedPath};
    use approx::assert_relative_eq;
    use vslice_pattern::Point2;

    fn planned(points: Vec<Point2>, z: f64) -> PlannedPath {
        let widths = vec![0.4; points.len()];
        PlannedPath { points, widths, z }
    }

    #[test]
    fn one_travel_into_each_path() {
        let job = Job {
            paths: vec![
                planned(vec![Point2::new(0.0, 0.0), Point2::new(5.0, 0.0)], 0.2),
                planned(vec![Point2::new(20.0, 0.0), Point2::new(25.0, 0.0)], 0.2),
            ],
        };
        let segments = classify(&job).unwrap();
        let travels: Vec<_> = segments
            .iter()
            .filter(|s| s.kind == MotionKind::Travel)
            .collect();
        let prints = segments
            .iter()
            .filter(|s| s.kind == MotionKind::Print)
            .count();
        assert_eq!(travels.len(), 2);
        assert_eq!(prints, 2);
        // Inter-path travel runs from (5,0) to (20,0).
        assert_relative_eq!(travels[1].from.x, 5.0);
        assert_relative_eq!(travels[1].to.x, 20.0);
        assert_relative_eq!(travels[1].length(), 15.0);
    }

    #[test]
    fn first_travel_starts_at_machine_origin() {
        let job = Job {
            paths: vec![planned(
                vec![Point2::new(3.0, 4.0), Point2::new(6.0, 4.0)],
                0.2,
            )],
        };
        let segments = classify(&job).unwrap();
        assert_eq!(segments[0].kind, MotionKind::Travel);
        assert_relative_eq!(segments[0].from.x, 0.0);
        assert_relative_eq!(segments[0].from.z, 0.0);
        assert_relative_eq!(segments[0].to.z, 0.2);
    }

    #[test]
    fn print_segment_count_matches_points() {
        let job = Job {
            paths: vec![planned(
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(10.0, 0.0),
                    Point2::new(10.0, 10.0),
                ],
                0.2,
            )],
        };
        let segments = classify(&job).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].kind, MotionKind::Travel);
        assert_eq!(segments[1].kind, MotionKind::Print);
        assert_eq!(segments[2].kind, MotionKind::Print);
        assert_eq!(segments[1].print_index, 0);
        assert_eq!(segments[2].print_index, 1);
    }

    #[test]
    fn single_point_path_yields_travel_only() {
        let job = Job {
            paths: vec![planned(vec![Point2::new(1.0, 1.0)], 0.2)],
        };
        let segments = classify(&job).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, MotionKind::Travel);
        assert_eq!(segments[0].path_print_count, 0);
    }

    #[test]
    fn layer_change_travel_carries_new_z() {
        let job = Job {
            paths: vec![
                planned(vec![Point2::new(0.0, 0.0), Point2::new(5.0, 0.0)], 0.2),
                planned(vec![Point2::new(0.0, 0.0), Point2::new(5.0, 0.0)], 0.4),
            ],
        };
        let segments = classify(&job).unwrap();
        let layer_travel = &segments[2];
        assert_eq!(layer_travel.kind, MotionKind::Travel);
        assert_relative_eq!(layer_travel.from.z, 0.2);
        assert_relative_eq!(layer_travel.to.z, 0.4);
    }

    #[test]
    fn empty_job_is_rejected() {
        let job = Job { paths: vec![] };
        assert!(matches!(classify(&job), Err(GcodeError::EmptyJob)));
    }
}
