//! One round of readings from a supply, the unit a polling publisher works in.
//!
//! Shipping the readings anywhere is left to the caller.

use log::warn;

use crate::supply::PowerSupply;

/// The four values polled from a supply. A value is `None` when reading it failed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readings {
    /// Voltage setting, volts.
    pub voltage_level: Option<f32>,
    /// Current setting, amps.
    pub current_level: Option<f32>,
    /// Measured output voltage, volts.
    pub display_voltage: Option<f32>,
    /// Measured output current, amps.
    pub display_current: Option<f32>,
}

impl Readings {
    /// True if every value was read.
    pub fn is_complete(&self) -> bool {
        self.voltage_level.is_some()
            && self.current_level.is_some()
            && self.display_voltage.is_some()
            && self.display_current.is_some()
    }
}

/// Poll each of the four values once.
///
/// Failures are logged and leave their value empty, so one bad reply only costs that value for this round.
pub fn read_readings<P: PowerSupply + ?Sized>(supply: &mut P) -> Readings {
    Readings {
        voltage_level: read_one(supply, "voltage level", P::get_voltage_level),
        current_level: read_one(supply, "current level", P::get_current_level),
        display_voltage: read_one(supply, "display voltage", P::get_display_voltage),
        display_current: read_one(supply, "display current", P::get_display_current),
    }
}

fn read_one<P: PowerSupply + ?Sized>(
    supply: &mut P,
    what: &str,
    read: fn(&mut P) -> Result<f32, P::Error>,
) -> Option<f32> {
    match read(supply) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{}: failed to read {}: {:?}", supply.name(), what, err);
            None
        }
    }
}
