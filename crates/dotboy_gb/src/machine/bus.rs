use super::apu::SoundRegisters;
use super::gpu::{Gpu, OAM_END, OAM_START, VRAM_END, VRAM_START};
use super::interrupts::{InterruptFlags, IE_ADDR};
use super::joypad::{Button, Joypad};
use super::serial::Serial;
use super::timer::Timer;
use super::FrameBuffer;
use crate::cpu::Bus;
use crate::error::BusError;

mod dma;
mod init;
mod mmio;

const BIOS_END: u16 = 0x00FF;
const ROM_END: u16 = 0x7FFF;
const WRAM_START: u16 = 0xC000;
const WRAM_END: u16 = 0xDFFF;
const ECHO_START: u16 = 0xE000;
const ECHO_END: u16 = 0xFDFF;
const UNUSABLE_START: u16 = 0xFEA0;
const UNUSABLE_END: u16 = 0xFEFF;
const IO_START: u16 = 0xFF00;
const IO_END: u16 = 0xFF7F;
const ZERO_PAGE_START: u16 = 0xFF80;
const ZERO_PAGE_END: u16 = 0xFFFE;

const WRAM_SIZE: usize = 0x2000;
const ZERO_PAGE_SIZE: usize = (ZERO_PAGE_END - ZERO_PAGE_START + 1) as usize;

/// The DMG memory map.
///
/// Every address either resolves to a backing store or peripheral, or is
/// reported as a [`BusError`]; nothing silently reads as a default value
/// except the ranges the hardware itself defines that way.
///
/// | Range       | Backing                                  |
/// |-------------|------------------------------------------|
/// | 0000–00FF   | BIOS while mapped, else ROM              |
/// | 0000–7FFF   | ROM (flat, no mapper)                    |
/// | 8000–9FFF   | VRAM (pixel pipeline)                    |
/// | A000–BFFF   | unmapped (no cartridge RAM)              |
/// | C000–DFFF   | working RAM                              |
/// | E000–FDFF   | echo of working RAM                      |
/// | FE00–FE9F   | OAM (pixel pipeline)                     |
/// | FEA0–FEFF   | unusable: reads 0xFF, ignores writes     |
/// | FF00–FF7F   | I/O registers                            |
/// | FF80–FFFE   | zero-page RAM                            |
/// | FFFF        | interrupt enable                         |
pub struct AddressSpace {
    bios: Option<Vec<u8>>,
    bios_mapped: bool,
    rom: Vec<u8>,
    wram: Box<[u8; WRAM_SIZE]>,
    zero_page: [u8; ZERO_PAGE_SIZE],

    pub gpu: Gpu,
    pub timer: Timer,
    pub joypad: Joypad,
    pub serial: Serial,
    pub apu: SoundRegisters,

    interrupt_flag: InterruptFlags,
    interrupt_enable: u8,
    /// Last value written to DMA (FF46).
    dma: u8,
}

impl AddressSpace {
    /// Without a BIOS the I/O registers start in their post-boot state.
    pub fn new(bios: Option<Vec<u8>>, rom: Vec<u8>, joypad: Joypad) -> Self {
        let bios_mapped = bios.is_some();
        let mut bus = Self {
            bios,
            bios_mapped,
            rom,
            wram: Box::new([0; WRAM_SIZE]),
            zero_page: [0; ZERO_PAGE_SIZE],
            gpu: Gpu::new(),
            timer: Timer::default(),
            joypad,
            serial: Serial::default(),
            apu: SoundRegisters::default(),
            interrupt_flag: InterruptFlags::empty(),
            interrupt_enable: 0,
            dma: 0,
        };
        if !bios_mapped {
            bus.apply_post_boot_io_state();
        }
        bus
    }

    pub fn bios_mapped(&self) -> bool {
        self.bios_mapped
    }

    /// Hand the low 256 bytes back to the cartridge. One-way and
    /// idempotent.
    pub fn unmap_bios(&mut self) {
        if self.bios_mapped {
            log::debug!("GB bus: BIOS unmapped");
        }
        self.bios_mapped = false;
    }

    pub fn interrupt_flag(&self) -> InterruptFlags {
        self.interrupt_flag
    }

    pub fn request_interrupt(&mut self, interrupt: InterruptFlags) {
        self.interrupt_flag.insert(interrupt);
    }

    pub fn interrupt_enable(&self) -> u8 {
        self.interrupt_enable
    }

    /// Press or release a button, raising the joypad interrupt on press.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if self.joypad.set_button(button, pressed) {
            self.request_interrupt(InterruptFlags::JOYPAD);
        }
    }

    pub fn read(&self, addr: u16) -> Result<u8, BusError> {
        match addr {
            0x0000..=BIOS_END if self.bios_mapped => self
                .bios
                .as_ref()
                .and_then(|bios| bios.get(addr as usize).copied())
                .ok_or(BusError::Unmapped(addr)),
            0x0000..=ROM_END => self
                .rom
                .get(addr as usize)
                .copied()
                .ok_or(BusError::Unmapped(addr)),
            VRAM_START..=VRAM_END => Ok(self.gpu.read_vram(addr)),
            WRAM_START..=WRAM_END => Ok(self.wram[(addr - WRAM_START) as usize]),
            ECHO_START..=ECHO_END => Ok(self.wram[(addr - ECHO_START) as usize]),
            OAM_START..=OAM_END => Ok(self.gpu.read_oam(addr)),
            UNUSABLE_START..=UNUSABLE_END => Ok(0xFF),
            IO_START..=IO_END => self.read_io(addr),
            ZERO_PAGE_START..=ZERO_PAGE_END => {
                Ok(self.zero_page[(addr - ZERO_PAGE_START) as usize])
            }
            IE_ADDR => Ok(self.interrupt_enable),
            // Cartridge RAM (A000–BFFF) is not backed.
            _ => Err(BusError::Unmapped(addr)),
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        match addr {
            0x0000..=BIOS_END if self.bios_mapped => Err(BusError::BiosWrite(addr)),
            0x0000..=ROM_END => {
                // Mapper control writes land here; there is no mapper.
                log::trace!("GB bus: ignoring ROM write 0x{value:02X} to 0x{addr:04X}");
                Ok(())
            }
            VRAM_START..=VRAM_END => {
                self.gpu.write_vram(addr, value);
                Ok(())
            }
            WRAM_START..=WRAM_END => {
                self.wram[(addr - WRAM_START) as usize] = value;
                Ok(())
            }
            ECHO_START..=ECHO_END => {
                self.wram[(addr - ECHO_START) as usize] = value;
                Ok(())
            }
            OAM_START..=OAM_END => {
                self.gpu.write_oam(addr, value);
                Ok(())
            }
            UNUSABLE_START..=UNUSABLE_END => Ok(()),
            IO_START..=IO_END => self.write_io(addr, value),
            ZERO_PAGE_START..=ZERO_PAGE_END => {
                self.zero_page[(addr - ZERO_PAGE_START) as usize] = value;
                Ok(())
            }
            IE_ADDR => {
                self.interrupt_enable = value;
                Ok(())
            }
            _ => Err(BusError::Unmapped(addr)),
        }
    }

    /// Write an untyped value, as entered in a debugger. Values outside
    /// 0..=255 are rejected.
    pub fn poke(&mut self, addr: u16, value: i32) -> Result<(), BusError> {
        let byte = u8::try_from(value).map_err(|_| BusError::ValueOutOfRange { addr, value })?;
        self.write(addr, byte)
    }

    /// Read `start..end` byte by byte, for inspection tooling.
    pub fn slice(&self, start: u16, end: u16) -> Result<Vec<u8>, BusError> {
        (start..end).map(|addr| self.read(addr)).collect()
    }
}

impl Bus for AddressSpace {
    #[inline]
    fn read8(&mut self, addr: u16) -> Result<u8, BusError> {
        self.read(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        self.write(addr, value)
    }

    /// Timer first, then the pixel pipeline, so both see the same cycle
    /// count before the next instruction is fetched.
    fn tick(&mut self, cycles: u32) -> Option<FrameBuffer> {
        self.timer.step(cycles, &mut self.interrupt_flag);
        self.gpu.step(cycles, &mut self.interrupt_flag)
    }
}
