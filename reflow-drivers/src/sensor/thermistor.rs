//! NTC 10K thermistor sensor
//!
//! Glass-bead thermistor mounted next to the heating element. Uses a
//! lookup table with linear interpolation between entries.

use reflow_core::traits::{SensorError, TemperatureSensor};

/// NTC 10K thermistor temperature lookup table
///
/// Table format: (resistance_ohms, temperature_celsius)
/// Generated using the beta equation with:
/// - R0 = 10,000 ohms at T0 = 25°C
/// - Beta = 3950K (typical for 10K NTC)
///
/// Temperature range: -20°C to 250°C
const TEMP_TABLE: &[(u32, f32)] = &[
    (105_400, -20.0),
    (58_240, -10.0),
    (33_620, 0.0),
    (20_180, 10.0),
    (12_540, 20.0),
    (10_000, 25.0), // R0
    (8_040, 30.0),
    (5_300, 40.0),
    (3_590, 50.0),
    (2_490, 60.0),
    (1_760, 70.0),
    (1_270, 80.0),
    (935, 90.0),
    (700, 100.0),
    (407, 120.0),
    (200, 150.0), // solder melting range begins
    (108, 180.0),
    (63, 210.0),
    (34, 250.0), // lead-free peak
];

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// NTC 10K thermistor with B=3950 behind a pull-up divider
pub struct Ntc10kSensor<ADC> {
    adc: ADC,
    /// Pull-up resistor value in ohms
    pullup_ohms: u32,
    /// ADC resolution (typically 4096 for 12-bit)
    adc_max: u16,
}

impl<ADC> Ntc10kSensor<ADC> {
    /// Create a new NTC sensor
    ///
    /// # Arguments
    /// - `adc`: ADC channel for reading the thermistor
    /// - `pullup_ohms`: Pull-up resistor value (typically 10_000)
    pub fn new(adc: ADC, pullup_ohms: u32) -> Self {
        Self {
            adc,
            pullup_ohms,
            adc_max: 4096, // 12-bit ADC
        }
    }

    /// Convert ADC reading to resistance
    ///
    /// Circuit: VCC -- pullup -- ADC_PIN -- NTC -- GND
    /// R_ntc = R_pullup * adc_value / (adc_max - adc_value)
    pub fn adc_to_resistance(&self, adc_value: u16) -> Result<u32, SensorError> {
        // ADC pinned at the top rail: the divider is open
        if adc_value >= self.adc_max - 10 {
            return Err(SensorError::OpenCircuit);
        }

        // ADC pinned at the bottom rail: the thermistor is shorted
        if adc_value < 10 {
            return Err(SensorError::ShortCircuit);
        }

        let numerator = self.pullup_ohms as u64 * adc_value as u64;
        let denominator = (self.adc_max - adc_value) as u64;

        Ok((numerator / denominator) as u32)
    }

    /// Calculate temperature from resistance using the lookup table
    ///
    /// Linear interpolation between table entries; resistances outside
    /// the table range are rejected rather than extrapolated.
    pub fn resistance_to_celsius(resistance: u32) -> Result<f32, SensorError> {
        // Table is sorted by decreasing resistance (increasing temperature)
        if resistance > TEMP_TABLE[0].0 || resistance < TEMP_TABLE[TEMP_TABLE.len() - 1].0 {
            return Err(SensorError::OutOfRange);
        }

        for window in TEMP_TABLE.windows(2) {
            let (r_high, t_low) = window[0];
            let (r_low, t_high) = window[1];

            if resistance <= r_high && resistance >= r_low {
                let fraction = (r_high - resistance) as f32 / (r_high - r_low) as f32;
                return Ok(t_low + (t_high - t_low) * fraction);
            }
        }

        Err(SensorError::OutOfRange)
    }
}

impl<ADC: AdcReader> TemperatureSensor for Ntc10kSensor<ADC> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let adc_value = self.adc.read().map_err(|_| SensorError::ConversionError)?;
        let resistance = self.adc_to_resistance(adc_value)?;
        Self::resistance_to_celsius(resistance)
    }
}
