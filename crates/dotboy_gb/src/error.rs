use thiserror::Error;

/// An opcode byte with no entry in the instruction table.
///
/// `pc` is the address the offending byte was fetched from; for
/// CB-prefixed opcodes it points at the prefix byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognized opcode 0x{opcode:02X} (prefixed: {prefixed}) at 0x{pc:04X}")]
pub struct DecodeError {
    pub opcode: u8,
    pub prefixed: bool,
    pub pc: u16,
}

/// Violations of the memory map detected by the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("access to unmapped address 0x{0:04X}")]
    Unmapped(u16),
    #[error("write to 0x{0:04X} while the BIOS is mapped")]
    BiosWrite(u16),
    #[error("value {value} written to 0x{addr:04X} does not fit in a byte")]
    ValueOutOfRange { addr: u16, value: i32 },
    #[error("unrecognized I/O register 0x{0:04X}")]
    UnknownIo(u16),
}

/// Fatal emulation errors. Both kinds stop the current run and leave the
/// machine in an inspectable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmuError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Bus(#[from] BusError),
}
