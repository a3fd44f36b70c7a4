mod apu;
mod breakpoints;
mod bus;
mod gameboy;
pub mod gpu;
pub mod interrupts;
mod joypad;
mod serial;
mod timer;

pub use apu::SoundRegisters;
pub use breakpoints::Breakpoints;
pub use bus::AddressSpace;
pub use gameboy::GameBoy;
pub use gpu::{FrameBuffer, Gpu};
pub use interrupts::InterruptFlags;
pub use joypad::{Button, Joypad};
pub use serial::Serial;
pub use timer::{Frequency, Timer};
