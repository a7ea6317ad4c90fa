//! This module contains types relevant to the PSU protocol data.

use strum_macros::{Display, EnumIter, EnumString};

/// This enum represents all supported product models.
///
/// All of them share one wire format, the model is only used to identify a supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
pub enum Model {
    /// 1-60V, 0-5A.
    #[strum(serialize = "1685B")]
    Bk1685B,
    /// 1-36V, 0-10A.
    #[strum(serialize = "1687B")]
    Bk1687B,
    /// 1-18V, 0-20A.
    #[strum(serialize = "1688B")]
    Bk1688B,
}

/// Represents the two possible power supply regulation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Constant voltage regulation mode.
    ConstantVoltage,
    /// Constant current regulation mode.
    ConstantCurrent,
}

impl TryFrom<u8> for OperatingMode {
    type Error = ();

    /// Convert the ASCII status digit of a `GETD` payload.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            b'0' => Ok(OperatingMode::ConstantVoltage),
            b'1' => Ok(OperatingMode::ConstantCurrent),
            _ => Err(()),
        }
    }
}

impl From<OperatingMode> for u8 {
    fn from(value: OperatingMode) -> Self {
        match value {
            OperatingMode::ConstantVoltage => b'0',
            OperatingMode::ConstantCurrent => b'1',
        }
    }
}

/// The configured (not measured) targets, as returned by `GETS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingReading {
    /// Volts.
    pub voltage: f32,
    /// Amps.
    pub current: f32,
}

/// The live measured output, as returned by `GETD`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayReading {
    /// Volts.
    pub voltage: f32,
    /// Amps.
    pub current: f32,
    pub mode: OperatingMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn model_names() {
        assert_eq!(Model::from_str("1685B"), Ok(Model::Bk1685B));
        assert_eq!(Model::from_str("1687B"), Ok(Model::Bk1687B));
        assert_eq!(Model::from_str("1688B"), Ok(Model::Bk1688B));
        assert!(Model::from_str("1689B").is_err());
    }

    #[test]
    fn model_name_conversions() {
        // Displaying a model and parsing it back should give the same model.
        for model in Model::iter() {
            let mut name: heapless::String<8> = heapless::String::new();
            core::fmt::write(&mut name, format_args!("{}", model)).unwrap();
            assert_eq!(Model::from_str(&name), Ok(model));
        }
    }

    #[test]
    fn operating_mode_digits() {
        assert_eq!(OperatingMode::try_from(b'0'), Ok(OperatingMode::ConstantVoltage));
        assert_eq!(OperatingMode::try_from(b'1'), Ok(OperatingMode::ConstantCurrent));
        assert_eq!(OperatingMode::try_from(b'2'), Err(()));
        assert_eq!(u8::from(OperatingMode::ConstantCurrent), b'1');
    }
}
