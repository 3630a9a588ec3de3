//! MAX6675 K-type thermocouple amplifier
//!
//! SPI read-only device: 16-bit frame, temperature in bits D14..D3 at
//! 0.25°C per count (0 to 1023.75°C), open-thermocouple flag in D2.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use reflow_core::traits::{SensorError, TemperatureSensor};

/// Bit D2: thermocouple input is open
const OPEN_THERMOCOUPLE: u16 = 0x0004;

/// MAX6675 on a shared SPI bus with a dedicated chip-select pin
pub struct Max6675<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> Max6675<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    pub fn new(spi: SPI, mut cs: CS) -> Self {
        let _ = cs.set_high();
        Self { spi, cs }
    }

    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let mut frame = [0u8; 2];

        self.cs
            .set_low()
            .map_err(|_| SensorError::ConversionError)?;
        let result = self.spi.read(&mut frame);
        // Raise CS even when the transfer failed
        let _ = self.cs.set_high();
        result.map_err(|_| SensorError::ConversionError)?;

        Ok(u16::from_be_bytes(frame))
    }
}

impl<SPI, CS> TemperatureSensor for Max6675<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let raw = self.read_raw()?;

        if raw & OPEN_THERMOCOUPLE != 0 {
            return Err(SensorError::OpenCircuit);
        }

        Ok((raw >> 3) as f32 * 0.25)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// SPI bus that yields a fixed 16-bit frame
    struct MockSpi {
        frame: [u8; 2],
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = Infallible;
    }

    impl SpiBus for MockSpi {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            words.copy_from_slice(&self.frame);
            Ok(())
        }

        fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
            read.copy_from_slice(&self.frame);
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
            words.copy_from_slice(&self.frame);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockCs {
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for MockCs {
        type Error = Infallible;
    }

    impl OutputPin for MockCs {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    fn frame_for_counts(counts: u16) -> [u8; 2] {
        (counts << 3).to_be_bytes()
    }

    #[test]
    fn decodes_temperature() {
        // 100 counts × 0.25°C = 25°C
        let mut sensor = Max6675::new(
            MockSpi {
                frame: frame_for_counts(100),
            },
            MockCs::default(),
        );
        assert_eq!(sensor.read_celsius(), Ok(25.0));
    }

    #[test]
    fn quarter_degree_resolution() {
        let mut sensor = Max6675::new(
            MockSpi {
                frame: frame_for_counts(981),
            },
            MockCs::default(),
        );
        assert_eq!(sensor.read_celsius(), Ok(245.25));
    }

    #[test]
    fn open_thermocouple_flag() {
        let raw = (100u16 << 3) | OPEN_THERMOCOUPLE;
        let mut sensor = Max6675::new(
            MockSpi {
                frame: raw.to_be_bytes(),
            },
            MockCs::default(),
        );
        assert_eq!(sensor.read_celsius(), Err(SensorError::OpenCircuit));
    }

    #[test]
    fn chip_select_raised_after_read() {
        let mut sensor = Max6675::new(
            MockSpi {
                frame: frame_for_counts(0),
            },
            MockCs::default(),
        );
        let _ = sensor.read_celsius();
        assert!(sensor.cs.high);
    }
}
