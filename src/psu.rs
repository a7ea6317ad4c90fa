use embedded_io::Error as _;
use log::{debug, error, trace, warn};

use crate::{
    codec::{self, CommandString, DecodeError},
    command::{Command, Reply},
    error::{Error, Result},
    supply::PowerSupply,
    transport::Transport,
    types::{DisplayReading, Model, OperatingMode, SettingReading},
};

/// Every command sent and every line received ends with this.
pub const TERMINATOR: u8 = b'\r';

/// The line the supply answers with when it accepted a command.
pub const CONFIRMATION: &[u8] = b"OK";

/// Skipped at the start of a line, for supplies which end lines with `\r\n`.
const LINE_FEED: u8 = b'\n';

/// Longest name a supply can be given.
pub const NAME_CAPACITY: usize = 32;

type Line<const L: usize> = heapless::Vec<u8, L>;

/// A line as read off the interface.
#[derive(Default)]
struct Received<const L: usize> {
    /// At most the first `L` bytes of the line.
    line: Line<L>,
    /// Set when the line didn't fit and its tail was dropped.
    overflowed: bool,
}

impl<const L: usize> Received<L> {
    fn is_confirmation(&self) -> bool {
        !self.overflowed && self.line.as_slice() == CONFIRMATION
    }
}

/// You can create a Bk168xB using any interface which implements [`Transport`].
///
/// Every operation is one complete transaction: both buffers of the interface are reset, the command is written,
/// and the reply line (or payload line and confirmation line for queries) is read back. Nothing is cached, every
/// read goes to the supply. `L` is the capacity of the buffer a single reply line is read into.
///
/// For its methods, "set" means to write a configuration and "get" means to read one back. The "display" values
/// are what the supply is measuring at its output.
///
/// Failures are never retried here. A timeout, an unconfirmed reply or a malformed payload is returned to the
/// caller, who can simply try again later.
pub struct Bk168xB<S: Transport, const L: usize = 32> {
    /// `None` once closed.
    interface: Option<S>,
    name: heapless::String<NAME_CAPACITY>,
    model: Model,
}

impl<S: Transport, const L: usize> Bk168xB<S, L> {
    /// Create a new Bk168xB instance, taking ownership of an already opened interface.
    ///
    /// The interface is closed again if the name doesn't fit.
    pub fn new(mut interface: S, name: &str, model: Model) -> Result<Self, S::Error> {
        let Ok(name) = heapless::String::try_from(name) else {
            if let Err(err) = interface.close() {
                warn!("{}: failed to close interface: {:?}", name, err);
            }
            return Err(Error::NameTooLong);
        };

        Ok(Self {
            interface: Some(interface),
            name,
            model,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn is_closed(&self) -> bool {
        self.interface.is_none()
    }

    /// Close the interface. Any later operation fails with [`Error::Closed`], closing again does nothing.
    pub fn close(&mut self) -> Result<(), S::Error> {
        match self.interface.take() {
            Some(mut interface) => {
                debug!("{}: closing", self.name);
                interface.close().map_err(Error::SerialError)
            }
            None => Ok(()),
        }
    }

    /// Hand the interface back without closing it.
    pub fn into_inner(mut self) -> Option<S> {
        self.interface.take()
    }

    /// Set the voltage level in volts, `0.0..=99.9`.
    ///
    /// The setpoint is sent with a resolution of 0.1V. Returns whether the supply acknowledged it, the applied
    /// value isn't read back.
    pub fn set_voltage_level(&mut self, volts: f32) -> Result<bool, S::Error> {
        self.command(Command::SetVoltage, Some(volts))
    }

    /// Set the current level in amps, `0.0..=99.9`.
    ///
    /// The setpoint is sent with a resolution of 0.1A.
    pub fn set_current_level(&mut self, amps: f32) -> Result<bool, S::Error> {
        self.command(Command::SetCurrent, Some(amps))
    }

    /// Switch the output on.
    pub fn set_output_on(&mut self) -> Result<bool, S::Error> {
        self.command(Command::OutputOn, None)
    }

    /// Switch the output off.
    pub fn set_output_off(&mut self) -> Result<bool, S::Error> {
        self.command(Command::OutputOff, None)
    }

    /// Get both the voltage and current settings.
    pub fn get_settings(&mut self) -> Result<SettingReading, S::Error> {
        let payload = self.query(Command::QuerySetting)?;
        self.decode(Command::QuerySetting, &payload, codec::decode_setting)
    }

    /// Return the voltage level setting value in volts.
    pub fn get_voltage_level(&mut self) -> Result<f32, S::Error> {
        Ok(self.get_settings()?.voltage)
    }

    /// Return the current level setting value in amps.
    pub fn get_current_level(&mut self) -> Result<f32, S::Error> {
        Ok(self.get_settings()?.current)
    }

    /// Get the measured output voltage and current, and the regulation mode.
    pub fn get_display(&mut self) -> Result<DisplayReading, S::Error> {
        let payload = self.query(Command::QueryDisplay)?;
        self.decode(Command::QueryDisplay, &payload, codec::decode_display)
    }

    /// Return the measured output voltage in volts.
    pub fn get_display_voltage(&mut self) -> Result<f32, S::Error> {
        Ok(self.get_display()?.voltage)
    }

    /// Return the measured output current in amps.
    pub fn get_display_current(&mut self) -> Result<f32, S::Error> {
        Ok(self.get_display()?.current)
    }

    /// Get whether the supply is regulating voltage or current.
    pub fn get_operating_mode(&mut self) -> Result<OperatingMode, S::Error> {
        Ok(self.get_display()?.mode)
    }

    /// Send a set or output command and check that it's acknowledged.
    ///
    /// A setpoint out of range is rejected before anything is written.
    fn command(&mut self, command: Command, value: Option<f32>) -> Result<bool, S::Error> {
        debug_assert_eq!(command.reply(), Reply::Confirmation);
        let message = codec::encode(command, value)?;

        self.send(&message)?;
        let response = self.read_line()?;

        let accepted = response.is_confirmation();
        if !accepted {
            warn!(
                "{}: `{}` was declined, response was {:?}",
                self.name,
                message,
                codec::capture(&response.line)
            );
        }
        Ok(accepted)
    }

    /// Send a query and return its payload line once the confirmation line has been checked.
    fn query(&mut self, command: Command) -> Result<Line<L>, S::Error> {
        debug_assert_eq!(command.reply(), Reply::PayloadThenConfirmation);
        let message = codec::encode(command, None)?;

        self.send(&message)?;
        let payload = self.read_line()?;

        // A missing confirmation means the payload can't be trusted either.
        let confirmation = match self.read_line() {
            Ok(received) => received,
            Err(Error::Timeout) => Received::default(),
            Err(err) => return Err(err),
        };

        if !confirmation.is_confirmation() {
            error!(
                "{}: response to `{}` was not confirmed with OK. Response was {:?}, confirmation was {:?}",
                self.name,
                message,
                codec::capture(&payload.line),
                codec::capture(&confirmation.line)
            );
            return Err(Error::ConfirmationMismatch(codec::capture(
                &confirmation.line,
            )));
        }

        if payload.overflowed {
            let err = DecodeError::MalformedPayload(codec::capture(&payload.line));
            error!(
                "{}: response to `{}` could not be decoded: {}",
                self.name, message, err
            );
            return Err(Error::DecodeError(err));
        }

        Ok(payload.line)
    }

    fn decode<T>(
        &self,
        command: Command,
        payload: &[u8],
        decoder: fn(&str) -> core::result::Result<T, DecodeError>,
    ) -> Result<T, S::Error> {
        core::str::from_utf8(payload)
            .map_err(|_| DecodeError::MalformedPayload(codec::capture(payload)))
            .and_then(decoder)
            .map_err(|err| {
                error!(
                    "{}: response to `{}` could not be decoded: {}",
                    self.name,
                    command.mnemonic(),
                    err
                );
                Error::DecodeError(err)
            })
    }

    /// Reset both buffers, then write the terminated message in one go.
    fn send(&mut self, message: &CommandString) -> Result<(), S::Error> {
        let interface = self.interface.as_mut().ok_or(Error::Closed)?;

        let mut framed: heapless::Vec<u8, { codec::COMMAND_CAPACITY + 1 }> = heapless::Vec::new();
        // Capacity covers the longest command plus terminator.
        let _ = framed.extend_from_slice(message.as_bytes());
        let _ = framed.push(TERMINATOR);

        // Drop anything left over from an earlier transaction that went wrong.
        interface
            .reset_input_buffer()
            .map_err(Error::SerialError)?;
        interface
            .reset_output_buffer()
            .map_err(Error::SerialError)?;

        debug!("{}: sending `{}`", self.name, message);
        interface.write_all(&framed).map_err(Error::SerialError)?;
        interface.flush().map_err(Error::SerialError)
    }

    /// Read up to and including the next terminator, which is not returned.
    ///
    /// Bytes are read one at a time so nothing past the terminator is consumed. Leading line feeds are skipped.
    /// A line longer than `L` is still read to its terminator, only the first `L` bytes are kept.
    fn read_line(&mut self) -> Result<Received<L>, S::Error> {
        let interface = self.interface.as_mut().ok_or(Error::Closed)?;

        let mut received = Received::<L>::default();
        let mut byte = [0u8; 1];
        loop {
            match interface.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == TERMINATOR => {
                    if received.overflowed {
                        warn!(
                            "{}: line longer than {} bytes, kept {:?}",
                            self.name,
                            L,
                            codec::capture(&received.line)
                        );
                    } else {
                        trace!("{}: received {:?}", self.name, codec::capture(&received.line));
                    }
                    return Ok(received);
                }
                Ok(_) if byte[0] == LINE_FEED && received.line.is_empty() && !received.overflowed => {
                    continue;
                }
                Ok(_) => {
                    if received.line.push(byte[0]).is_err() {
                        received.overflowed = true;
                    }
                }
                Err(err) if matches!(err.kind(), embedded_io::ErrorKind::TimedOut) => break,
                Err(err) => return Err(Error::SerialError(err)),
            }
        }

        if !received.line.is_empty() {
            warn!(
                "{}: timed out part way through a line, discarding {:?}",
                self.name,
                codec::capture(&received.line)
            );
        }
        Err(Error::Timeout)
    }
}

impl<S: Transport, const L: usize> Drop for Bk168xB<S, L> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("{}: failed to close interface: {:?}", self.name, err);
        }
    }
}

impl<S: Transport, const L: usize> PowerSupply for Bk168xB<S, L> {
    type Error = Error<S::Error>;

    fn name(&self) -> &str {
        Bk168xB::name(self)
    }

    fn set_voltage_level(&mut self, volts: f32) -> Result<bool, S::Error> {
        Bk168xB::set_voltage_level(self, volts)
    }

    fn set_current_level(&mut self, amps: f32) -> Result<bool, S::Error> {
        Bk168xB::set_current_level(self, amps)
    }

    fn get_voltage_level(&mut self) -> Result<f32, S::Error> {
        Bk168xB::get_voltage_level(self)
    }

    fn get_current_level(&mut self) -> Result<f32, S::Error> {
        Bk168xB::get_current_level(self)
    }

    fn get_display_voltage(&mut self) -> Result<f32, S::Error> {
        Bk168xB::get_display_voltage(self)
    }

    fn get_display_current(&mut self) -> Result<f32, S::Error> {
        Bk168xB::get_display_current(self)
    }

    fn set_output_on(&mut self) -> Result<bool, S::Error> {
        Bk168xB::set_output_on(self)
    }

    fn set_output_off(&mut self) -> Result<bool, S::Error> {
        Bk168xB::set_output_off(self)
    }

    fn close(&mut self) -> Result<(), S::Error> {
        Bk168xB::close(self)
    }
}
