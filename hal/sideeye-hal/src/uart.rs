//! UART serial communication abstractions
//!
//! The host link is polled once per loop iteration, so reads never wait
//! for data that has not arrived yet.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Copy already-received bytes into `buf`
    ///
    /// Returns the number of bytes copied; `Ok(0)` means nothing is
    /// pending. Never waits for more data.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}
