//! A single phase of a temperature profile

use heapless::String;

use super::{bounded_name, MAX_NAME_LEN};
use crate::error::Error;

/// A linear temperature ramp or hold segment
///
/// The target moves linearly from `start_temp` to `end_temp` over
/// `duration_minutes`. A hold is a phase whose start and end temperatures
/// are equal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase {
    /// Display name ("Preheat", "Soak", ...)
    pub name: String<MAX_NAME_LEN>,
    /// Temperature at the start of the phase (°C)
    pub start_temp: f32,
    /// Temperature at the end of the phase (°C)
    pub end_temp: f32,
    /// Phase duration in fractional minutes, always > 0
    pub duration_minutes: f32,
}

impl Phase {
    /// Create a new phase
    ///
    /// Fails with [`Error::InvalidPhase`] if the duration is not a
    /// positive finite number; a zero duration would divide by zero in
    /// [`Phase::target_at`].
    pub fn new(
        name: &str,
        start_temp: f32,
        end_temp: f32,
        duration_minutes: f32,
    ) -> Result<Self, Error> {
        if !duration_minutes.is_finite() || duration_minutes <= 0.0 {
            return Err(Error::InvalidPhase);
        }
        if !start_temp.is_finite() || !end_temp.is_finite() {
            return Err(Error::InvalidPhase);
        }

        Ok(Self {
            name: bounded_name(name),
            start_temp,
            end_temp,
            duration_minutes,
        })
    }

    /// Target temperature after `elapsed_minutes` inside this phase
    ///
    /// Clamps to `start_temp` before the phase and `end_temp` after it;
    /// linear interpolation in between.
    pub fn target_at(&self, elapsed_minutes: f32) -> f32 {
        if elapsed_minutes <= 0.0 {
            self.start_temp
        } else if elapsed_minutes >= self.duration_minutes {
            self.end_temp
        } else {
            let progress = elapsed_minutes / self.duration_minutes;
            self.start_temp + (self.end_temp - self.start_temp) * progress
        }
    }
}
