//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod heater;
pub mod sensor;

pub use heater::HeaterOutput;
pub use sensor::{SensorError, TemperatureSensor};
