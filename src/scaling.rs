//! Fixed-width numeric fields used on the wire.
//!
//! Every number the 168xB supplies exchange is a zero padded run of ASCII digits. The width of the run and the
//! factor it is scaled by depend on the command, e.g. setpoints are 3 digits in tenths while display readings
//! are 4 digits in hundredths.

/// Describes one fixed-width decimal field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedField {
    /// Number of ASCII digits in the field.
    pub width: usize,
    /// Raw integer value divided by this gives volts or amps.
    pub divisor: f32,
}

impl FixedField {
    /// Voltage/current setpoints, as sent with `VOLT`/`CURR` and read back with `GETS`.
    ///
    /// E.g. `025` => 2.5.
    pub const SETPOINT: FixedField = FixedField::new(3, 10.0);

    /// Live readings returned by `GETD`.
    ///
    /// E.g. `0302` => 3.02.
    pub const DISPLAY: FixedField = FixedField::new(4, 100.0);

    pub const fn new(width: usize, divisor: f32) -> Self {
        Self { width, divisor }
    }

    /// Largest raw value the field can hold, i.e. all nines.
    pub const fn max_raw(&self) -> u32 {
        let mut max = 1u32;
        let mut i = 0;
        while i < self.width {
            max *= 10;
            i += 1;
        }
        max - 1
    }

    /// Convert a value into its raw integer, rounding half up.
    ///
    /// Returns `None` for negative, non-finite or too large values.
    pub fn to_raw(&self, value: f32) -> Option<u32> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        // `f32::round` is not available without std.
        let raw = (value * self.divisor + 0.5) as u32;
        (raw <= self.max_raw()).then_some(raw)
    }

    /// Convert a raw integer back into volts or amps.
    pub fn from_raw(&self, raw: u32) -> f32 {
        raw as f32 / self.divisor
    }

    /// Parse exactly `width` ASCII digits.
    ///
    /// Signs, spaces and any other characters are rejected, as is a slice of the wrong length.
    pub fn parse_raw(&self, digits: &[u8]) -> Option<u32> {
        if digits.len() != self.width {
            return None;
        }
        digits.iter().try_fold(0u32, |acc, &byte| {
            byte.is_ascii_digit()
                .then(|| acc * 10 + u32::from(byte - b'0'))
        })
    }

    /// Parse a field straight into volts or amps.
    pub fn decode(&self, digits: &[u8]) -> Option<f32> {
        self.parse_raw(digits).map(|raw| self.from_raw(raw))
    }
}
