//! Temperature sensor trait

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor disconnected (open circuit / open thermocouple)
    OpenCircuit,
    /// Sensor shorted to ground
    ShortCircuit,
    /// Reading outside the sensor's expected range
    OutOfRange,
    /// ADC or bus conversion error
    ConversionError,
}

/// Trait for temperature sensors
///
/// One implementation per sensor kind (NTC thermistor, MAX6675
/// thermocouple amplifier, simulated plant); which one drives the loop is
/// a construction-time choice. A disconnected sensor is reported through
/// the error, never by panicking.
pub trait TemperatureSensor {
    /// Read the current temperature in degrees Celsius
    ///
    /// Takes `&mut self` because ADC and bus reads typically require
    /// mutable access.
    fn read_celsius(&mut self) -> Result<f32, SensorError>;

    /// Check if the sensor currently produces a valid reading
    fn is_valid(&mut self) -> bool {
        self.read_celsius().is_ok()
    }
}
