//! Heater output trait

/// Trait for heater output control
///
/// Implementations drive the heater element via GPIO, SSR, or a simulated
/// plant. The hysteresis decision itself lives in
/// [`crate::heater::Heater`]; this trait only applies the on/off result.
pub trait HeaterOutput {
    /// Turn the heater on or off
    fn set_on(&mut self, on: bool);

    /// Check if the heater is currently on
    fn is_on(&self) -> bool;
}
