//! Per-tick control loop step
//!
//! Glues the pieces together: every tick the loop advances the profile
//! runner, feeds the resulting target to the hysteresis controller,
//! applies the decision to the physical output and records a sample.
//! The loop never panics on a bad reading; a sensor fault forces the
//! heater off for that tick and is surfaced in the returned status while
//! the run itself keeps going.

use crate::heater::Heater;
use crate::runner::ProfileRunner;
use crate::store::ProfileStore;
use crate::traits::{HeaterOutput, SensorError, TemperatureSensor};

/// Nominal period between control loop steps (milliseconds)
///
/// The core itself is time-agnostic; this is the cadence callers are
/// expected to drive [`ControlLoop::step`] at.
pub const LOOP_PERIOD_MS: u64 = 500;

/// Outcome of one control loop step
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopStatus {
    /// Measured temperature, absent on a sensor fault
    pub temperature: Option<f32>,
    /// Target commanded to the heater this tick
    pub target_temp: Option<f32>,
    /// Whether the heater output is on after this tick
    pub heater_on: bool,
    /// Sensor fault observed this tick, if any
    pub fault: Option<SensorError>,
}

/// Controller tying sensor, heater logic, output and runner together
pub struct ControlLoop<S, H, P> {
    sensor: S,
    output: H,
    heater: Heater,
    runner: ProfileRunner<P>,
}

impl<S, H, P> ControlLoop<S, H, P>
where
    S: TemperatureSensor,
    H: HeaterOutput,
    P: ProfileStore,
{
    pub fn new(sensor: S, output: H, heater: Heater, runner: ProfileRunner<P>) -> Self {
        Self {
            sensor,
            output,
            heater,
            runner,
        }
    }

    /// Execute one control tick at `now_ms`
    ///
    /// Order matters: the runner is advanced first so the heater always
    /// acts on this tick's target. A completed or stopped run yields no
    /// target, which disarms the heater on the same tick.
    pub fn step(&mut self, now_ms: u64) -> LoopStatus {
        let target = self.runner.tick(now_ms);

        match target {
            Some(temp) => {
                if self.heater.set_target_temp(Some(temp)).is_err() {
                    // Profile asks for more than the heater is configured
                    // to allow; run with no target rather than clamping
                    warn!("target {}°C outside heater limits, disarming", temp);
                    let _ = self.heater.set_target_temp(None);
                }
            }
            None => {
                let _ = self.heater.set_target_temp(None);
            }
        }

        match self.sensor.read_celsius() {
            Ok(current) => {
                let heater_on = self.heater.set_state(current);
                self.output.set_on(heater_on);
                self.runner.record_sample(current, now_ms);

                LoopStatus {
                    temperature: Some(current),
                    target_temp: self.heater.target_temp(),
                    heater_on,
                    fault: None,
                }
            }
            Err(fault) => {
                // No trusted reading: heater off this tick, run continues
                if self.heater.is_on() {
                    warn!("sensor fault, forcing heater off");
                }
                self.heater.emergency_stop();
                self.output.set_on(false);

                LoopStatus {
                    temperature: None,
                    target_temp: self.heater.target_temp(),
                    heater_on: false,
                    fault: Some(fault),
                }
            }
        }
    }

    pub fn runner(&self) -> &ProfileRunner<P> {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut ProfileRunner<P> {
        &mut self.runner
    }

    pub fn heater(&self) -> &Heater {
        &self.heater
    }

    pub fn heater_mut(&mut self) -> &mut Heater {
        &mut self.heater
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heater::HeaterConfig;
    use crate::runner::PhaseSpec;
    use crate::store::NullStore;

    struct MockSensor {
        reading: Result<f32, SensorError>,
    }

    impl TemperatureSensor for MockSensor {
        fn read_celsius(&mut self) -> Result<f32, SensorError> {
            self.reading
        }
    }

    #[derive(Default)]
    struct MockOutput {
        on: bool,
    }

    impl HeaterOutput for MockOutput {
        fn set_on(&mut self, on: bool) {
            self.on = on;
        }

        fn is_on(&self) -> bool {
            self.on
        }
    }

    const MIN: u64 = 60_000;

    fn control_loop(reading: f32) -> ControlLoop<MockSensor, MockOutput, NullStore> {
        let mut runner = ProfileRunner::new(NullStore);
        runner
            .create(
                "Ramp",
                &[
                    PhaseSpec {
                        name: "Heat",
                        start_temp: 25.0,
                        end_temp: 100.0,
                        duration_minutes: 5.0,
                    },
                    PhaseSpec {
                        name: "Hold",
                        start_temp: 100.0,
                        end_temp: 100.0,
                        duration_minutes: 2.0,
                    },
                ],
            )
            .unwrap();

        ControlLoop::new(
            MockSensor {
                reading: Ok(reading),
            },
            MockOutput::default(),
            Heater::default(),
            runner,
        )
    }

    #[test]
    fn idle_never_heats() {
        let mut ctrl = control_loop(10.0);

        let status = ctrl.step(0);
        assert!(!status.heater_on);
        assert_eq!(status.target_temp, None);
        assert_eq!(status.temperature, Some(10.0));
        assert!(ctrl.runner().temperature_series().is_empty());
    }

    #[test]
    fn running_drives_heater_toward_target() {
        let mut ctrl = control_loop(20.0);
        ctrl.runner_mut().activate("Ramp").unwrap();
        ctrl.runner_mut().start(0).unwrap();

        // t=0: target 25, reading 20 < 24 → on
        let status = ctrl.step(0);
        assert!(status.heater_on);
        assert_eq!(status.target_temp, Some(25.0));
        assert!(ctrl.output.is_on());

        // Reading reaches the target → off
        ctrl.sensor_mut().reading = Ok(25.0);
        let status = ctrl.step(1);
        assert!(!status.heater_on);
        assert!(!ctrl.output.is_on());
    }

    #[test]
    fn sensor_fault_forces_off_but_run_continues() {
        let mut ctrl = control_loop(20.0);
        ctrl.runner_mut().activate("Ramp").unwrap();
        ctrl.runner_mut().start(0).unwrap();
        assert!(ctrl.step(0).heater_on);

        ctrl.sensor_mut().reading = Err(SensorError::OpenCircuit);
        let status = ctrl.step(LOOP_PERIOD_MS);
        assert!(!status.heater_on);
        assert!(!ctrl.output.is_on());
        assert_eq!(status.fault, Some(SensorError::OpenCircuit));
        assert_eq!(status.temperature, None);
        assert!(ctrl.runner().is_running());

        // Recovery: next good reading resumes control
        ctrl.sensor_mut().reading = Ok(20.0);
        assert!(ctrl.step(2 * LOOP_PERIOD_MS).heater_on);
    }

    #[test]
    fn completion_disarms_heater() {
        let mut ctrl = control_loop(20.0);
        ctrl.runner_mut().activate("Ramp").unwrap();
        ctrl.runner_mut().start(0).unwrap();
        assert!(ctrl.step(0).heater_on);

        // Past the 7-minute total duration
        let status = ctrl.step(8 * MIN);
        assert!(!status.heater_on);
        assert_eq!(status.target_temp, None);
        assert!(!ctrl.runner().is_running());
    }

    #[test]
    fn samples_collected_while_running() {
        let mut ctrl = control_loop(20.0);
        ctrl.runner_mut().activate("Ramp").unwrap();
        ctrl.runner_mut().start(0).unwrap();

        ctrl.step(0);
        ctrl.step(MIN);
        ctrl.step(2 * MIN);
        assert_eq!(ctrl.runner().temperature_series().len(), 3);
    }

    #[test]
    fn target_beyond_heater_limits_disarms() {
        let mut runner = ProfileRunner::new(NullStore);
        runner
            .create(
                "Hot",
                &[PhaseSpec {
                    name: "Blast",
                    start_temp: 25.0,
                    end_temp: 400.0,
                    duration_minutes: 1.0,
                }],
            )
            .unwrap();
        runner.activate("Hot").unwrap();
        runner.start(0).unwrap();

        let mut ctrl = ControlLoop::new(
            MockSensor { reading: Ok(20.0) },
            MockOutput::default(),
            Heater::new(HeaterConfig {
                hysteresis: 1.0,
                min_temp: 0.0,
                max_temp: 300.0,
            }),
            runner,
        );

        // Near the end of the ramp the target exceeds max_temp
        let status = ctrl.step(59_000);
        assert!(!status.heater_on);
        assert_eq!(status.target_temp, None);
    }
}
