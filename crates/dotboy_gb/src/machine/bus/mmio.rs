use super::AddressSpace;
use crate::error::BusError;
use crate::machine::interrupts::{InterruptFlags, IF_ADDR};

const BOOT_ROM_DISABLE: u16 = 0xFF50;
const DMA: u16 = 0xFF46;

/// Registers that exist on some hardware revision but are not emulated:
/// CGB speed switch, VRAM/WRAM banking, HDMA, palettes, and the
/// undocumented FF72–FF77 block. Reads give 0xFF, writes are dropped.
fn acknowledged(addr: u16) -> bool {
    matches!(
        addr,
        0xFF4C
            | 0xFF4D
            | 0xFF4F
            | 0xFF51..=0xFF56
            | 0xFF68..=0xFF6B
            | 0xFF70
            | 0xFF72..=0xFF77
            | 0xFF7F
    )
}

impl AddressSpace {
    pub(super) fn read_io(&self, addr: u16) -> Result<u8, BusError> {
        let value = match addr {
            0xFF00 => self.joypad.to_byte(),
            0xFF01..=0xFF02 => self.serial.read(addr),
            0xFF04..=0xFF07 => self.timer.read(addr),
            IF_ADDR => self.interrupt_flag.to_byte(),
            0xFF10..=0xFF3F => self.apu.read(addr),
            DMA => self.dma,
            0xFF40..=0xFF4B => self.gpu.read_register(addr),
            BOOT_ROM_DISABLE => 0xFF,
            _ if acknowledged(addr) => 0xFF,
            _ => return Err(BusError::UnknownIo(addr)),
        };
        Ok(value)
    }

    pub(super) fn write_io(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        match addr {
            0xFF00 => self.joypad.write(value),
            0xFF01..=0xFF02 => self.serial.write(addr, value, &mut self.interrupt_flag),
            0xFF04..=0xFF07 => self.timer.write(addr, value),
            IF_ADDR => self.interrupt_flag = InterruptFlags::from_byte(value),
            0xFF10..=0xFF3F => self.apu.write(addr, value),
            DMA => self.oam_dma(value)?,
            0xFF40..=0xFF4B => self.gpu.write_register(addr, value),
            BOOT_ROM_DISABLE => {
                if value != 0 {
                    self.unmap_bios();
                }
            }
            _ if acknowledged(addr) => {
                log::trace!("GB bus: ignoring write 0x{value:02X} to 0x{addr:04X}");
            }
            _ => return Err(BusError::UnknownIo(addr)),
        }
        Ok(())
    }
}
