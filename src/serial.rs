//! A [`Transport`] over a host serial port, using the `serialport` crate.

use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};

use crate::{
    config::{DataBits, Parity, SerialConfig, StopBits},
    transport::Transport,
};

/// Wraps an open serial port so the driver can use it.
pub struct SerialTransport(Box<dyn SerialPort>);

/// [`std::io::Error`] as an [`embedded_io::Error`].
#[derive(Debug)]
pub struct IoError(std::io::Error);

impl IoError {
    pub fn into_inner(self) -> std::io::Error {
        self.0
    }
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serialport::Error> for IoError {
    fn from(err: serialport::Error) -> Self {
        IoError(err.into())
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::NotConnected => embedded_io::ErrorKind::NotConnected,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            std::io::ErrorKind::OutOfMemory => embedded_io::ErrorKind::OutOfMemory,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl SerialTransport {
    /// Open `port`, e.g. `/dev/ttyUSB0` or `COM3`.
    ///
    /// Failing to open the port is returned as is, there is nothing to drive without it.
    pub fn open(port: &str, config: &SerialConfig) -> Result<Self, serialport::Error> {
        let port = serialport::new(port, config.baud_rate)
            .data_bits(match config.data_bits {
                DataBits::Seven => serialport::DataBits::Seven,
                DataBits::Eight => serialport::DataBits::Eight,
            })
            .parity(match config.parity {
                Parity::None => serialport::Parity::None,
                Parity::Odd => serialport::Parity::Odd,
                Parity::Even => serialport::Parity::Even,
            })
            .stop_bits(match config.stop_bits {
                StopBits::One => serialport::StopBits::One,
                StopBits::Two => serialport::StopBits::Two,
            })
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(config.timeout.to_millis().into()))
            .open()?;

        log::debug!("opened {} at {} baud", port.name().unwrap_or_default(), config.baud_rate);
        Ok(Self(port))
    }

    /// Use a port which has already been opened and configured.
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self(port)
    }
}

impl embedded_io::ErrorType for SerialTransport {
    type Error = IoError;
}

impl embedded_io::Read for SerialTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::Write for SerialTransport {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

impl Transport for SerialTransport {
    fn reset_input_buffer(&mut self) -> Result<(), Self::Error> {
        self.0.clear(ClearBuffer::Input).map_err(IoError::from)
    }

    fn reset_output_buffer(&mut self) -> Result<(), Self::Error> {
        self.0.clear(ClearBuffer::Output).map_err(IoError::from)
    }
}
