//! End-to-end run of the built-in test profile against a simulated plant
//!
//! Drives the full control loop (runner + hysteresis controller + output)
//! at the nominal tick rate over a first-order thermal model and checks
//! tracking, phase progression and the auto-stop on completion.

use std::cell::RefCell;
use std::rc::Rc;

use reflow_core::control::{ControlLoop, LOOP_PERIOD_MS};
use reflow_core::heater::Heater;
use reflow_core::runner::ProfileRunner;
use reflow_core::store::NullStore;
use reflow_core::traits::{HeaterOutput, SensorError, TemperatureSensor};

const AMBIENT_C: f32 = 25.0;
const HEATING_RATE_C_PER_MIN: f32 = 40.0;
const COOLING_COEFF_PER_MIN: f32 = 0.5;

/// First-order thermal model: fixed heating power, Newton cooling
struct Plant {
    temperature: f32,
    heater_on: bool,
}

impl Plant {
    fn step(&mut self, dt_minutes: f32) {
        if self.heater_on {
            self.temperature += HEATING_RATE_C_PER_MIN * dt_minutes;
        }
        self.temperature -= (self.temperature - AMBIENT_C) * COOLING_COEFF_PER_MIN * dt_minutes;
    }
}

/// Shared plant handle acting as both sensor and heater output
#[derive(Clone)]
struct PlantHandle(Rc<RefCell<Plant>>);

impl PlantHandle {
    fn new() -> Self {
        Self(Rc::new(RefCell::new(Plant {
            temperature: AMBIENT_C,
            heater_on: false,
        })))
    }

    fn temperature(&self) -> f32 {
        self.0.borrow().temperature
    }
}

impl TemperatureSensor for PlantHandle {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        Ok(self.0.borrow().temperature)
    }
}

impl HeaterOutput for PlantHandle {
    fn set_on(&mut self, on: bool) {
        self.0.borrow_mut().heater_on = on;
    }

    fn is_on(&self) -> bool {
        self.0.borrow().heater_on
    }
}

#[test]
fn test_profile_runs_to_completion() {
    let plant = PlantHandle::new();
    let runner = ProfileRunner::new(NullStore);
    let mut ctrl = ControlLoop::new(plant.clone(), plant.clone(), Heater::default(), runner);

    ctrl.runner_mut().activate("Test Profile").unwrap();
    ctrl.runner_mut().start(0).unwrap();

    let dt_minutes = LOOP_PERIOD_MS as f32 / 60_000.0;
    let mut max_temp = AMBIENT_C;
    let mut now_ms = 0u64;

    // 6 simulated minutes; the profile completes at 5
    let steps = (6 * 60_000) / LOOP_PERIOD_MS;
    for _ in 0..steps {
        plant.0.borrow_mut().step(dt_minutes);
        let status = ctrl.step(now_ms);
        max_temp = max_temp.max(plant.temperature());

        // Mid-run checkpoint: 3 minutes in we are holding at 50°C
        if now_ms == 3 * 60_000 {
            let runner_status = ctrl.runner().status(now_ms);
            assert!(runner_status.is_running);
            assert_eq!(runner_status.current_phase_index, 1);
            assert_eq!(runner_status.current_phase.as_deref(), Some("Hold"));
            assert_eq!(status.target_temp, Some(50.0));
            let temp = plant.temperature();
            assert!(
                (temp - 50.0).abs() < 3.0,
                "tracking error too large: {temp}°C at hold"
            );
        }

        now_ms += LOOP_PERIOD_MS;
    }

    // The hysteresis band keeps overshoot small
    assert!(max_temp < 55.0, "overshoot: peaked at {max_temp}°C");

    // Completed: auto-stopped back to selected, heater disarmed
    let runner_status = ctrl.runner().status(now_ms);
    assert!(!runner_status.is_running);
    assert_eq!(runner_status.active_profile_name.as_deref(), Some("Test Profile"));
    assert!(runner_status.can_run && runner_status.can_clear);
    assert!(!plant.is_on());
    assert_eq!(ctrl.heater().target_temp(), None);

    // The sample series is bounded and respects the minimum spacing
    let series = ctrl.runner().temperature_series();
    assert!(!series.is_empty());
    assert!(series.len() <= 50);
    let times: Vec<f32> = series.iter().map(|s| s.time_minutes).collect();
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= 0.15 - 1e-6);
    }
}

#[test]
fn stopping_mid_run_disarms_on_next_tick() {
    let plant = PlantHandle::new();
    let runner = ProfileRunner::new(NullStore);
    let mut ctrl = ControlLoop::new(plant.clone(), plant.clone(), Heater::default(), runner);

    ctrl.runner_mut().activate("Test Profile").unwrap();
    ctrl.runner_mut().start(0).unwrap();

    // One minute in the heater has been chasing the ramp
    let dt_minutes = LOOP_PERIOD_MS as f32 / 60_000.0;
    let mut now_ms = 0u64;
    let mut heated = false;
    for _ in 0..120 {
        plant.0.borrow_mut().step(dt_minutes);
        heated |= ctrl.step(now_ms).heater_on;
        now_ms += LOOP_PERIOD_MS;
    }
    assert!(heated);

    ctrl.runner_mut().stop().unwrap();
    let status = ctrl.step(now_ms);
    assert!(!status.heater_on);
    assert!(!plant.is_on());
    assert_eq!(status.target_temp, None);
}
