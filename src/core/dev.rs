use core::repr::EthernetAddress;
use Result;

/// A low level interface for sending and receiving raw Ethernet frames.
///
/// The server logic is written against this trait so it can run over an
/// AF_PACKET socket in production and an in-memory queue in tests.
pub trait Device {
    /// Sends a frame across the link. The frame carries its own destination
    /// in the Ethernet header.
    fn send(&mut self, buffer: &[u8]) -> Result<()>;

    /// Reads a single frame from the link into a buffer, returning the frame
    /// length. Returns Error::Nothing if no frame is waiting.
    fn recv(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Returns the hardware address associated with the device.
    fn ethernet_addr(&self) -> EthernetAddress;
}
