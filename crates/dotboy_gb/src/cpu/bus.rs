use crate::error::BusError;
use crate::machine::FrameBuffer;

/// Abstraction over the Game Boy bus (memory and IO).
///
/// The CPU only ever talks to memory through this trait, so tests can run
/// instructions against a flat 64K array while the real machine uses
/// [`AddressSpace`](crate::machine::AddressSpace).
pub trait Bus {
    fn read8(&mut self, addr: u16) -> Result<u8, BusError>;
    fn write8(&mut self, addr: u16, value: u8) -> Result<(), BusError>;

    /// Advance bus-side peripherals by a given number of CPU cycles.
    ///
    /// Returns the finished frame when the pixel pipeline entered vertical
    /// blank during this advance. The default implementation does nothing.
    fn tick(&mut self, _cycles: u32) -> Option<FrameBuffer> {
        None
    }
}
