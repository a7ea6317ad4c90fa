//! Serial port settings for talking to a supply.

use fugit::ExtU32;

/// The supplies use 8 data bits. Kept configurable for USB-serial adapters which need something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataBits {
    Seven,
    #[default]
    Eight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopBits {
    #[default]
    One,
    Two,
}

/// How to open the serial port a supply is connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// How long a read may block before giving up. This is the only timeout in play, the driver doesn't add
    /// its own.
    pub timeout: fugit::MillisDurationU32,
}

impl SerialConfig {
    /// The supplies only talk at this rate.
    pub const DEFAULT_BAUD_RATE: u32 = 9600;

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn with_timeout(mut self, timeout: fugit::MillisDurationU32) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SerialConfig {
    /// 9600 baud, 8N1, 5 second read timeout.
    fn default() -> Self {
        Self {
            baud_rate: Self::DEFAULT_BAUD_RATE,
            data_bits: DataBits::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            timeout: 5.secs(),
        }
    }
}
