//! Hysteresis heater controller
//!
//! On/off control with an asymmetric hysteresis band: the heater turns on
//! only when the temperature falls below `target - hysteresis`, and turns
//! off the moment the target is reached. There is no overshoot tolerance
//! above the target; the band exists purely to prevent chatter on the way
//! up.

use crate::error::Error;

/// Minimum allowed hysteresis (°C)
pub const MIN_HYSTERESIS_C: f32 = 0.1;

/// Heater controller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeaterConfig {
    /// Hysteresis band below the target (°C)
    pub hysteresis: f32,
    /// Lowest accepted target temperature (°C)
    pub min_temp: f32,
    /// Highest accepted target temperature; also the hard off limit (°C)
    pub max_temp: f32,
}

impl Default for HeaterConfig {
    fn default() -> Self {
        Self {
            hysteresis: 1.0,
            min_temp: 0.0,
            max_temp: 300.0,
        }
    }
}

/// Snapshot of the heater state for the API/display layer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaterStatus {
    pub target_temp: Option<f32>,
    pub is_on: bool,
    pub hysteresis: f32,
    pub min_temp: f32,
    pub max_temp: f32,
}

/// Hysteresis heater controller
///
/// Pure decision logic: converts (current, target) into an on/off state.
/// Applying the state to the physical output is the control loop's job,
/// through a [`crate::traits::HeaterOutput`].
#[derive(Debug)]
pub struct Heater {
    hysteresis: f32,
    min_temp: f32,
    max_temp: f32,
    target_temp: Option<f32>,
    is_on: bool,
}

impl Heater {
    /// Create a new heater controller, initially off with no target
    pub fn new(config: HeaterConfig) -> Self {
        Self {
            hysteresis: config.hysteresis.max(MIN_HYSTERESIS_C),
            min_temp: config.min_temp,
            max_temp: config.max_temp,
            target_temp: None,
            is_on: false,
        }
    }

    /// Update the on/off decision from the current temperature
    ///
    /// Without a target the heater is forced off; it never runs on a
    /// stale setpoint. Readings at or above `max_temp` force off
    /// regardless of the target. State transitions are edge-detected and
    /// logged once.
    pub fn set_state(&mut self, current_temp: f32) -> bool {
        let was_on = self.is_on;

        match self.target_temp {
            None => {
                self.is_on = false;
            }
            Some(target) => {
                if current_temp >= self.max_temp {
                    // Hard limit, independent of the hysteresis band
                    self.is_on = false;
                } else if !self.is_on {
                    if current_temp < target - self.hysteresis {
                        self.is_on = true;
                    }
                } else if current_temp >= target {
                    // Reaching the target turns the heater off immediately
                    self.is_on = false;
                }
                // In the band between target - hysteresis and target the
                // previous state is held (chatter prevention)
            }
        }

        if self.is_on != was_on {
            info!("heater {}", if self.is_on { "ON" } else { "OFF" });
        }

        self.is_on
    }

    /// Set or clear the target temperature
    ///
    /// `None` always succeeds and disarms the heater: the next
    /// [`Heater::set_state`] call forces off. A value outside the
    /// configured limits fails with [`Error::OutOfRange`] and leaves the
    /// stored target untouched. A valid value only takes effect on the
    /// next `set_state` call.
    pub fn set_target_temp(&mut self, value: Option<f32>) -> Result<(), Error> {
        match value {
            None => {
                self.target_temp = None;
                Ok(())
            }
            Some(v) => {
                if v.is_finite() && v >= self.min_temp && v <= self.max_temp {
                    self.target_temp = Some(v);
                    Ok(())
                } else {
                    Err(Error::OutOfRange)
                }
            }
        }
    }

    /// Unconditionally force the heater off, bypassing hysteresis
    ///
    /// Idempotent; the stored target is kept so a later `set_state` can
    /// resume normal control.
    pub fn emergency_stop(&mut self) {
        if self.is_on {
            info!("heater OFF (emergency stop)");
        }
        self.is_on = false;
    }

    /// Set the hysteresis band, clamped to at least [`MIN_HYSTERESIS_C`]
    pub fn set_hysteresis(&mut self, hysteresis: f32) {
        self.hysteresis = hysteresis.max(MIN_HYSTERESIS_C);
    }

    /// Current on/off state
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Currently stored target temperature
    pub fn target_temp(&self) -> Option<f32> {
        self.target_temp
    }

    /// Configured (min, max) target limits
    pub fn temp_limits(&self) -> (f32, f32) {
        (self.min_temp, self.max_temp)
    }

    /// Complete heater status for the API layer
    pub fn status(&self) -> HeaterStatus {
        HeaterStatus {
            target_temp: self.target_temp,
            is_on: self.is_on,
            hysteresis: self.hysteresis,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
        }
    }
}

impl Default for Heater {
    fn default() -> Self {
        Self::new(HeaterConfig::default())
    }
}
