//! The byte channel a PSU is driven over.

/// You can drive a supply over any interface which implements [embedded_io::Read] & [embedded_io::Write] and
/// can throw away whatever is sitting in its buffers.
///
/// Reads are expected to block for at most the interface's own timeout. A read which times out should either
/// return `Ok(0)` or an error of kind [`embedded_io::ErrorKind::TimedOut`].
pub trait Transport: embedded_io::Read + embedded_io::Write {
    /// Discard any received bytes which haven't been read yet.
    fn reset_input_buffer(&mut self) -> Result<(), Self::Error>;

    /// Discard any bytes which have been written but not yet sent.
    fn reset_output_buffer(&mut self) -> Result<(), Self::Error>;

    /// Release the underlying device. Called once by the driver.
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn reset_input_buffer(&mut self) -> Result<(), Self::Error> {
        T::reset_input_buffer(self)
    }

    fn reset_output_buffer(&mut self) -> Result<(), Self::Error> {
        T::reset_output_buffer(self)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        T::close(self)
    }
}
