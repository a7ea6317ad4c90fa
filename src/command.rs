//! The command set understood by the 168xB supplies.

use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

/// Every command the driver can send.
///
/// The strum serialization of each variant is its wire mnemonic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, EnumCount, IntoStaticStr)]
pub enum Command {
    /// __Query__ - Voltage and current settings.
    ///
    /// Payload is `VVVCCC`, both fields in tenths.
    #[strum(serialize = "GETS")]
    QuerySetting,
    /// __Query__ - Live voltage, current and regulation mode.
    ///
    /// Payload is `VVVVCCCCS`, voltage and current in hundredths.
    /// * `0` - CV.
    /// * `1` - CC.
    #[strum(serialize = "GETD")]
    QueryDisplay,
    /// __Set__ - Voltage setting, takes a setpoint. E.g. 1.0V => `VOLT010`.
    #[strum(serialize = "VOLT")]
    SetVoltage,
    /// __Set__ - Current setting, takes a setpoint. E.g. 2.5A => `CURR025`.
    #[strum(serialize = "CURR")]
    SetCurrent,
    /// __Set__ - Switch the output on.
    #[strum(serialize = "SOUT0")]
    OutputOn,
    /// __Set__ - Switch the output off.
    #[strum(serialize = "SOUT1")]
    OutputOff,
}

/// The shape of the reply the supply sends back for a command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A single `OK` line.
    Confirmation,
    /// A payload line, then an `OK` line.
    PayloadThenConfirmation,
}

impl Command {
    /// The ASCII mnemonic sent on the wire.
    pub fn mnemonic(self) -> &'static str {
        self.into()
    }

    /// Whether this command carries a 3 digit setpoint after its mnemonic.
    pub const fn takes_setpoint(self) -> bool {
        matches!(self, Command::SetVoltage | Command::SetCurrent)
    }

    pub const fn reply(self) -> Reply {
        match self {
            Command::QuerySetting | Command::QueryDisplay => Reply::PayloadThenConfirmation,
            _ => Reply::Confirmation,
        }
    }
}
