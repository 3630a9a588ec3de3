//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in reflow-core for the
//! oven hardware:
//!
//! - Temperature sensors (NTC thermistor, MAX6675 thermocouple)
//! - Heater outputs (GPIO / SSR)

#![no_std]
#![deny(unsafe_code)]

pub mod heater;
pub mod sensor;
