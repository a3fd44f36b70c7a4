use crate::cpu::{Cpu, FrameRun};
use crate::error::EmuError;
use dotboy_common::key::Key;

use super::{Breakpoints, Button, Joypad};

/// High-level Game Boy machine.
///
/// Holds the CPU core (which owns the whole memory map) together with the
/// images it was built from, so it can be rebuilt on reset, and the
/// host-owned breakpoint set. This is the entry point the frame pacer
/// drives.
pub struct GameBoy {
    pub cpu: Cpu,
    pub breakpoints: Breakpoints,
    bios: Option<Vec<u8>>,
    rom: Vec<u8>,
}

impl GameBoy {
    pub fn new(bios: Option<Vec<u8>>, rom: Vec<u8>) -> Self {
        let cpu = Cpu::new(bios.clone(), rom.clone(), Joypad::new());
        Self {
            cpu,
            breakpoints: Breakpoints::new(),
            bios,
            rom,
        }
    }

    /// Discard the whole machine and build a fresh one from the same
    /// images. Breakpoints are kept.
    pub fn reset(&mut self) {
        log::info!("GB reset");
        self.cpu = Cpu::new(self.bios.clone(), self.rom.clone(), Joypad::new());
    }

    /// Load a different ROM and reset.
    pub fn load_rom(&mut self, rom: Vec<u8>) {
        self.rom = rom;
        self.reset();
    }

    /// Unpause and run until the next frame or stop condition.
    pub fn advance_one_frame(&mut self) -> Result<FrameRun, EmuError> {
        self.cpu.unpause();
        self.cpu.run_frame(&self.breakpoints)
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        self.cpu.bus_mut().set_button(button, pressed);
    }

    /// Update joypad state from a frontend key event.
    ///
    /// - Z => A, X => B
    /// - A or Space => Select, S or Return => Start
    /// - Arrow keys => D-pad
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        let button = match key {
            Key::Right => Button::Right,
            Key::Left => Button::Left,
            Key::Up => Button::Up,
            Key::Down => Button::Down,
            Key::Z => Button::A,
            Key::X => Button::B,
            Key::A | Key::Space => Button::Select,
            Key::S | Key::Return => Button::Start,
            Key::None => return,
        };
        self.set_button(button, pressed);
    }

    /// Bytes the ROM has sent over the serial port so far.
    pub fn serial_output(&self) -> &[u8] {
        self.cpu.bus().serial.output()
    }
}
