//! Print statistics accumulated during emission.

use crate::profile::PrinterProfile;

/// Totals for one translated job.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrintStats {
    /// Total deposition distance (mm).
    pub print_distance: f64,
    /// Total travel distance (mm).
    pub travel_distance: f64,
    /// Estimated motion time (minutes), excluding heating and dwells.
    pub print_time_minutes: f64,
    /// Deposited material volume (mm³, i.e. microlitres).
    pub extruded_volume: f64,
}

impl PrintStats {
    /// Estimated time as `h:mm:ss`.
    pub fn format_time(&self) -> String {
        let total_seconds = (self.print_time_minutes * 60.0) as u64;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        format!("{hours}:{minutes:02}:{seconds:02}")
    }

    /// Render the stats as G-code comment lines for the output header.
    pub fn header_comments(&self, profile: &PrinterProfile) -> String {
        let volume = if self.extruded_volume < 1000.0 {
            format!("{:.2} ul", self.extruded_volume)
        } else {
            format!("{:.2} ml", self.extruded_volume / 1000.0)
        };
        format!(
            "; estimated print time: {} (excluding heating)\n\
             ; printing distance: {:.1} mm at {:.0} mm/min\n\
             ; travel distance: {:.1} mm at {:.0} mm/min\n\
             ; extruded volume: {}\n",
            self.format_time(),
            self.print_distance,
            profile.print_speed,
            self.travel_distance,
            profile.travel_speed,
            volume,
        )
    }
}
