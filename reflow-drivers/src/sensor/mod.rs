//! Temperature sensor drivers

pub mod max6675;
pub mod thermistor;

pub use max6675::Max6675;
pub use thermistor::{AdcReader, Ntc10kSensor};
