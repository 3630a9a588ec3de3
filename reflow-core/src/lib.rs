//! Board-agnostic core logic for the reflow oven controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (temperature sensor, heater output)
//! - Phase/profile model with linear temperature interpolation
//! - Hysteresis heater controller
//! - Profile runner state machine (idle / selected / running)
//! - Per-tick control loop step
//! - Profile persistence abstraction and record format

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod control;
pub mod error;
pub mod heater;
pub mod profile;
pub mod runner;
pub mod store;
pub mod traits;

pub use error::Error;
