//! Simulated oven thermal model
//!
//! First-order plant: fixed heating power while the element is on, Newton
//! cooling toward ambient, and a little deterministic measurement noise
//! so emulated runs look like real sensor traces.

use std::cell::RefCell;
use std::rc::Rc;

use reflow_core::traits::{HeaterOutput, SensorError, TemperatureSensor};

const AMBIENT_C: f32 = 25.0;
const HEATING_RATE_C_PER_MIN: f32 = 60.0;
const COOLING_COEFF_PER_MIN: f32 = 0.35;
const NOISE_AMPLITUDE_C: f32 = 0.1;

struct Oven {
    temperature: f32,
    heater_on: bool,
    fault: Option<SensorError>,
    rng_state: u32,
}

impl Oven {
    fn step(&mut self, dt_minutes: f32) {
        if self.heater_on {
            self.temperature += HEATING_RATE_C_PER_MIN * dt_minutes;
        }
        self.temperature -= (self.temperature - AMBIENT_C) * COOLING_COEFF_PER_MIN * dt_minutes;
    }

    // xorshift32, plenty for measurement jitter
    fn noise(&mut self) -> f32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        (x as f32 / u32::MAX as f32 - 0.5) * 2.0 * NOISE_AMPLITUDE_C
    }
}

/// Shared handle acting as both the oven's sensor and its heater output
#[derive(Clone)]
pub struct PlantHandle(Rc<RefCell<Oven>>);

impl PlantHandle {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Oven {
            temperature: AMBIENT_C,
            heater_on: false,
            fault: None,
            rng_state: 0x2545_F491,
        })))
    }

    /// Advance the thermal model by `dt_minutes`
    pub fn step(&self, dt_minutes: f32) {
        self.0.borrow_mut().step(dt_minutes);
    }

    /// True oven temperature without measurement noise
    pub fn temperature(&self) -> f32 {
        self.0.borrow().temperature
    }

    /// Inject or clear a sensor fault
    pub fn set_fault(&self, fault: Option<SensorError>) {
        self.0.borrow_mut().fault = fault;
    }
}

impl TemperatureSensor for PlantHandle {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let mut oven = self.0.borrow_mut();
        if let Some(fault) = oven.fault {
            return Err(fault);
        }
        let noise = oven.noise();
        Ok(oven.temperature + noise)
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
