//! Graph projection of a profile
//!
//! Produces a small set of representative points for visualization.
//! Sampling density is deliberately low: displays and web UIs for the
//! oven run on memory-constrained boards, and the phases are linear
//! anyway.

use heapless::Vec;

use super::profile::{Profile, MAX_PHASES};

/// Upper bound on points produced for one profile (4 per phase)
pub const MAX_GRAPH_POINTS: usize = MAX_PHASES * 4;

/// A single point of the profile graph
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphPoint {
    /// Absolute time from the start of the profile (minutes)
    pub time_minutes: f32,
    /// Target temperature at that time (°C)
    pub temperature: f32,
    /// Index of the phase the point falls in
    pub phase_index: usize,
}

/// Number of evenly spaced samples for a phase of the given duration
fn samples_for(duration_minutes: f32) -> usize {
    if duration_minutes <= 2.0 {
        2
    } else if duration_minutes <= 10.0 {
        3
    } else {
        4
    }
}

/// Project a profile onto evenly spaced graph points
///
/// Each phase contributes 2-4 points depending on its duration, always
/// including both endpoints. Pure function of the profile, independent of
/// any run state.
pub fn graph_points(profile: &Profile) -> Vec<GraphPoint, MAX_GRAPH_POINTS> {
    let mut points = Vec::new();
    let mut phase_start = 0.0f32;

    for (phase_index, phase) in profile.phases().iter().enumerate() {
        let samples = samples_for(phase.duration_minutes);
        for i in 0..samples {
            let time_in_phase =
                (i as f32 / (samples - 1) as f32) * phase.duration_minutes;
            let _ = points.push(GraphPoint {
                time_minutes: phase_start + time_in_phase,
                temperature: phase.target_at(time_in_phase),
                phase_index,
            });
        }
        phase_start += phase.duration_minutes;
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::phase::Phase;

    fn profile_with(durations: &[f32]) -> Profile {
        let mut phases = Vec::new();
        for (i, &d) in durations.iter().enumerate() {
            let _ = phases.push(Phase::new("p", i as f32, (i + 1) as f32, d).unwrap());
        }
        Profile::new("graph", phases).unwrap()
    }

    #[test]
    fn density_buckets() {
        assert_eq!(samples_for(0.5), 2);
        assert_eq!(samples_for(2.0), 2);
        assert_eq!(samples_for(5.0), 3);
        assert_eq!(samples_for(10.0), 3);
        assert_eq!(samples_for(15.0), 4);
    }

    #[test]
    fn short_phase_contributes_endpoints_only() {
        let profile = profile_with(&[2.0]);
        let points = graph_points(&profile);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time_minutes, 0.0);
        assert_eq!(points[0].temperature, 0.0);
        assert_eq!(points[1].time_minutes, 2.0);
        assert_eq!(points[1].temperature, 1.0);
    }

    #[test]
    fn times_are_absolute_across_phases() {
        let profile = profile_with(&[2.0, 4.0]);
        let points = graph_points(&profile);

        // 2 points for the first phase, 3 for the second
        assert_eq!(points.len(), 5);
        assert_eq!(points[2].time_minutes, 2.0);
        assert_eq!(points[2].phase_index, 1);
        assert_eq!(points[4].time_minutes, 6.0);

        // Middle sample of the 4-minute phase sits at its midpoint
        assert!((points[3].time_minutes - 4.0).abs() < 1e-6);
        assert!((points[3].temperature - 1.5).abs() < 1e-6);
    }

    #[test]
    fn long_phase_gets_four_points() {
        let profile = profile_with(&[12.0]);
        let points = graph_points(&profile);

        assert_eq!(points.len(), 4);
        assert_eq!(points[0].time_minutes, 0.0);
        assert!((points[1].time_minutes - 4.0).abs() < 1e-5);
        assert!((points[2].time_minutes - 8.0).abs() < 1e-5);
        assert_eq!(points[3].time_minutes, 12.0);
    }
}
