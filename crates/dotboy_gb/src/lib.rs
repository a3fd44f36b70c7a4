//! Game Boy (DMG) emulation core.
//!
//! The crate is split the same way the hardware is: [`cpu`] decodes and
//! executes instructions against anything implementing [`cpu::Bus`], and
//! [`machine`] holds the memory map plus the peripherals hanging off it
//! (pixel pipeline, timer, joypad, serial, sound registers). [`pacer`]
//! drives a [`GameBoy`] in real time.

pub mod cpu;
pub mod error;
pub mod machine;
pub mod pacer;

pub use cpu::Cpu;
pub use error::{BusError, DecodeError, EmuError};
pub use machine::{AddressSpace, Breakpoints, Button, FrameBuffer, GameBoy, Joypad};
pub use pacer::{FramePacer, FrameSink, PacerConfig, StopToken};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;

/// CPU clock in T-cycles per second.
pub const CPU_CLOCK_HZ: u32 = 4_194_304;
/// One video frame: 154 scanlines of 456 T-cycles.
pub const CYCLES_PER_FRAME: u32 = 70_224;
