//! Complete temperature profile

use heapless::{String, Vec};

use super::phase::Phase;
use super::{bounded_name, MAX_NAME_LEN};
use crate::error::Error;

/// Maximum phases per profile
pub const MAX_PHASES: usize = 8;

/// Tolerance for the phase continuity check (°C)
///
/// Consecutive phases whose end/start temperatures differ by more than
/// this are reported as gaps. Gaps are legal (intentional temperature
/// steps) and only logged.
pub const CONTINUITY_TOLERANCE_C: f32 = 0.1;

/// Result of a target lookup at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseTarget {
    /// Index of the phase that owns the queried time
    pub phase_index: usize,
    /// Interpolated target temperature (°C)
    pub target_temp: f32,
}

/// A continuity mismatch between two consecutive phases
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContinuityGap {
    /// Index of the earlier phase
    pub phase_index: usize,
    /// End temperature of the earlier phase (°C)
    pub end_temp: f32,
    /// Start temperature of the following phase (°C)
    pub next_start_temp: f32,
}

/// An ordered sequence of phases with a derived total duration
///
/// Immutable once constructed; the constructor is the only validation
/// boundary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    name: String<MAX_NAME_LEN>,
    phases: Vec<Phase, MAX_PHASES>,
    total_duration: f32,
}

impl Profile {
    /// Create a new profile
    ///
    /// Fails with [`Error::InvalidProfile`] if `phases` is empty.
    /// Continuity gaps do not fail construction; callers that care log
    /// them via [`Profile::continuity_gaps`].
    pub fn new(name: &str, phases: Vec<Phase, MAX_PHASES>) -> Result<Self, Error> {
        if phases.is_empty() {
            return Err(Error::InvalidProfile);
        }

        let total_duration = phases.iter().map(|p| p.duration_minutes).sum();

        Ok(Self {
            name: bounded_name(name),
            phases,
            total_duration,
        })
    }

    /// Profile name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Phases in execution order (never empty)
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Sum of all phase durations in minutes
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Name of the phase at `index`, if it exists
    pub fn phase_name(&self, index: usize) -> Option<&str> {
        self.phases.get(index).map(|p| p.name.as_str())
    }

    /// Continuity gaps between consecutive phases larger than
    /// [`CONTINUITY_TOLERANCE_C`]
    pub fn continuity_gaps(&self) -> impl Iterator<Item = ContinuityGap> + '_ {
        self.phases.windows(2).enumerate().filter_map(|(i, pair)| {
            let gap = (pair[0].end_temp - pair[1].start_temp).abs();
            if gap > CONTINUITY_TOLERANCE_C {
                Some(ContinuityGap {
                    phase_index: i,
                    end_temp: pair[0].end_temp,
                    next_start_temp: pair[1].start_temp,
                })
            } else {
                None
            }
        })
    }

    /// Phase index and target temperature for the given elapsed time
    ///
    /// Negative elapsed time clamps to the first phase's start; elapsed
    /// time past the total duration returns the last phase and its end
    /// temperature (the completion plateau). A time exactly at a phase
    /// boundary belongs to the ending phase, not the next one.
    pub fn phase_and_target(&self, elapsed_minutes: f32) -> PhaseTarget {
        if elapsed_minutes < 0.0 {
            return PhaseTarget {
                phase_index: 0,
                target_temp: self.phases[0].start_temp,
            };
        }

        let mut cumulative = 0.0f32;
        for (i, phase) in self.phases.iter().enumerate() {
            if elapsed_minutes <= cumulative + phase.duration_minutes {
                return PhaseTarget {
                    phase_index: i,
                    target_temp: phase.target_at(elapsed_minutes - cumulative),
                };
            }
            cumulative += phase.duration_minutes;
        }

        // Past the end: hold the last phase's end temperature
        let last = self.phases.len() - 1;
        PhaseTarget {
            phase_index: last,
            target_temp: self.phases[last].end_temp,
        }
    }

    /// Check if a run at `elapsed_minutes` has finished this profile
    pub fn is_complete(&self, elapsed_minutes: f32) -> bool {
        elapsed_minutes >= self.total_duration
    }
}
