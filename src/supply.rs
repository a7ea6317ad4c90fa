//! The operations any programmable power supply offers, independent of its model and wire format.

/// A programmable bench supply with one output.
///
/// Callers such as a polling loop should be written against this trait rather than a concrete driver. Set
/// operations return `Ok(false)` when the supply answered but declined the command.
pub trait PowerSupply {
    type Error: core::fmt::Debug;

    /// Display name given to this supply by its owner.
    fn name(&self) -> &str;

    /// Set the voltage level in volts.
    fn set_voltage_level(&mut self, volts: f32) -> Result<bool, Self::Error>;

    /// Set the current level in amps.
    fn set_current_level(&mut self, amps: f32) -> Result<bool, Self::Error>;

    /// Return the voltage level setting value in volts.
    fn get_voltage_level(&mut self) -> Result<f32, Self::Error>;

    /// Return the current level setting value in amps.
    fn get_current_level(&mut self) -> Result<f32, Self::Error>;

    /// Return the measured output voltage in volts.
    fn get_display_voltage(&mut self) -> Result<f32, Self::Error>;

    /// Return the measured output current in amps.
    fn get_display_current(&mut self) -> Result<f32, Self::Error>;

    fn set_output_on(&mut self) -> Result<bool, Self::Error>;

    fn set_output_off(&mut self) -> Result<bool, Self::Error>;

    /// Release the connection to the supply. Calling it again does nothing.
    fn close(&mut self) -> Result<(), Self::Error>;
}
