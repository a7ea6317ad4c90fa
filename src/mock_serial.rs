//! We use this mocking module in unit tests to emulate a serial port.

use thiserror::Error;

use crate::transport::Transport;

/// Our mock type used to emulate a serial port.
///
/// The read data is scripted as whatever the supply sends after receiving a command. Buffer resets are therefore
/// only counted, they don't throw the script away.
pub struct MockSerial {
    /// Buffer to store data written to the mock serial port
    write_buffer: heapless::Vec<u8, 256>,
    /// Buffer containing pre-configured response data to be read
    read_buffer: heapless::Vec<u8, 256>,
    /// Current position in the read buffer
    read_position: usize,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
    /// Number of times the input buffer has been reset
    input_resets: usize,
    /// Number of times the output buffer has been reset
    output_resets: usize,
    /// Number of times the port has been closed
    closes: usize,
    /// Number of read calls made
    reads: usize,
}

#[derive(Error, Debug, PartialEq)]
pub enum MockSerialError {
    /// Simulated timeout, returned once the scripted data runs out
    #[error("Simulated timeout")]
    Timeout,
    /// Simulated buffer overflow
    #[error("Simulated buffer overflow")]
    BufferOverflow,
    /// Generic simulated error for testing
    #[error("Simulated error")]
    SimulatedError,
}

impl embedded_io::Error for MockSerialError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            MockSerialError::Timeout => embedded_io::ErrorKind::TimedOut,
            MockSerialError::BufferOverflow => embedded_io::ErrorKind::OutOfMemory,
            MockSerialError::SimulatedError => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = MockSerialError;
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }

        self.write_buffer
            .extend_from_slice(buf)
            .map_err(|_| MockSerialError::BufferOverflow)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.reads += 1;
        if self.should_error_on_read {
            return Err(MockSerialError::SimulatedError);
        }

        if self.read_position >= self.read_buffer.len() {
            return Err(MockSerialError::Timeout);
        }

        let available_bytes = self.read_buffer.len() - self.read_position;
        let bytes_to_read = core::cmp::min(buf.len(), available_bytes);

        buf[..bytes_to_read].copy_from_slice(
            &self.read_buffer[self.read_position..self.read_position + bytes_to_read],
        );

        self.read_position += bytes_to_read;
        Ok(bytes_to_read)
    }
}

impl Transport for MockSerial {
    fn reset_input_buffer(&mut self) -> Result<(), Self::Error> {
        self.input_resets += 1;
        Ok(())
    }

    fn reset_output_buffer(&mut self) -> Result<(), Self::Error> {
        self.output_resets += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closes += 1;
        if self.should_error_on_write {
            return Err(MockSerialError::SimulatedError);
        }
        Ok(())
    }
}

impl MockSerial {
    /// Create a new MockSerial instance with empty buffers
    pub fn new() -> Self {
        Self {
            write_buffer: heapless::Vec::new(),
            read_buffer: heapless::Vec::new(),
            read_position: 0,
            should_error_on_write: false,
            should_error_on_read: false,
            input_resets: 0,
            output_resets: 0,
            closes: 0,
            reads: 0,
        }
    }

    /// Create a new MockSerial which will answer with the given bytes
    pub fn with_response(data: &[u8]) -> Self {
        let mut mock = Self::new();
        mock.set_read_data(data).unwrap();
        mock
    }

    /// Set the data that will be returned when read() is called
    pub fn set_read_data(&mut self, data: &[u8]) -> Result<(), MockSerialError> {
        self.read_buffer.clear();
        self.read_position = 0;

        self.read_buffer
            .extend_from_slice(data)
            .map_err(|_| MockSerialError::BufferOverflow)
    }

    /// Get a reference to the data that was written to this mock serial port
    pub fn written_data(&self) -> &[u8] {
        &self.write_buffer
    }

    /// Number of scripted bytes not read yet
    pub fn unread(&self) -> usize {
        self.read_buffer.len() - self.read_position
    }

    /// Configure whether write operations, close included, should fail with an error
    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    /// Configure whether read operations should fail with an error
    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }

    pub fn input_resets(&self) -> usize {
        self.input_resets
    }

    pub fn output_resets(&self) -> usize {
        self.output_resets
    }

    pub fn closes(&self) -> usize {
        self.closes
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{Error, Read, Write};

    #[test]
    fn test_new_mock_serial() {
        let mock = MockSerial::new();
        assert_eq!(mock.written_data().len(), 0);
        assert_eq!(mock.unread(), 0);
        assert_eq!(mock.input_resets(), 0);
        assert_eq!(mock.output_resets(), 0);
        assert_eq!(mock.closes(), 0);
    }

    #[test]
    fn test_write_multiple_times() {
        let mut mock = MockSerial::new();
        mock.write(b"GETS").unwrap();
        mock.write(b"\r").unwrap();

        assert_eq!(mock.written_data(), b"GETS\r");
    }

    #[test]
    fn test_write_buffer_overflow() {
        let mut mock = MockSerial::new();
        let large_data = [0u8; 300]; // Larger than 256 byte capacity

        let result = mock.write(&large_data);
        assert_eq!(result, Err(MockSerialError::BufferOverflow));
    }

    #[test]
    fn test_read_byte_at_a_time() {
        let mut mock = MockSerial::with_response(b"OK\r");

        let mut byte = [0u8; 1];
        assert_eq!(mock.read(&mut byte), Ok(1));
        assert_eq!(&byte, b"O");
        assert_eq!(mock.read(&mut byte), Ok(1));
        assert_eq!(&byte, b"K");
        assert_eq!(mock.unread(), 1);
    }

    #[test]
    fn test_read_timeout_after_data_exhausted() {
        let mut mock = MockSerial::with_response(b"Hi");

        let mut buffer = [0u8; 10];
        assert_eq!(mock.read(&mut buffer), Ok(2));

        let result = mock.read(&mut buffer);
        assert_eq!(result, Err(MockSerialError::Timeout));
        assert_eq!(mock.reads(), 2);
    }

    #[test]
    fn test_error_simulation() {
        let mut mock = MockSerial::with_response(b"data");
        mock.set_write_error(true);
        mock.set_read_error(true);

        assert_eq!(mock.write(b"test"), Err(MockSerialError::SimulatedError));
        assert_eq!(mock.flush(), Err(MockSerialError::SimulatedError));
        let mut buffer = [0u8; 10];
        assert_eq!(mock.read(&mut buffer), Err(MockSerialError::SimulatedError));
        assert!(mock.written_data().is_empty());
    }

    #[test]
    fn test_resets_keep_scripted_data() {
        let mut mock = MockSerial::with_response(b"OK\r");
        mock.reset_input_buffer().unwrap();
        mock.reset_output_buffer().unwrap();

        assert_eq!(mock.input_resets(), 1);
        assert_eq!(mock.output_resets(), 1);
        assert_eq!(mock.unread(), 3);
    }

    #[test]
    fn test_errors_display() {
        assert_eq!(MockSerialError::Timeout.to_string(), "Simulated timeout");
        let err: crate::error::Error<MockSerialError> =
            crate::error::Error::SerialError(MockSerialError::SimulatedError);
        assert_eq!(err.to_string(), "Serial communication error");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(MockSerialError::Timeout.kind(), embedded_io::ErrorKind::TimedOut);
        assert_eq!(
            MockSerialError::BufferOverflow.kind(),
            embedded_io::ErrorKind::OutOfMemory
        );
        assert_eq!(
            MockSerialError::SimulatedError.kind(),
            embedded_io::ErrorKind::Other
        );
    }
}
