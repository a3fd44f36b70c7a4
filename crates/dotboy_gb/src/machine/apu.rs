/// Sound register block (FF10–FF3F).
///
/// Registers are stored and read back the way the DMG exposes them, but
/// no samples are generated. Bits that are write-only or unused read as 1.
#[derive(Clone, Debug)]
pub struct SoundRegisters {
    /// NR10..NR51 (FF10–FF25).
    regs: [u8; 0x16],
    /// NR52 bit 7.
    powered: bool,
    /// FF30–FF3F.
    wave: [u8; 0x10],
}

const NR10: u16 = 0xFF10;
const NR51: u16 = 0xFF25;
const NR52: u16 = 0xFF26;
const WAVE_START: u16 = 0xFF30;
const WAVE_END: u16 = 0xFF3F;

/// OR-masks applied on read, indexed from FF10.
const READ_MASKS: [u8; 0x16] = [
    0x80, 0x3F, 0x00, 0xFF, 0xBF, // NR10-NR14
    0xFF, 0x3F, 0x00, 0xFF, 0xBF, // (FF15), NR21-NR24
    0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
    0xFF, 0xFF, 0x00, 0x00, 0xBF, // (FF1F), NR41-NR44
    0x00, 0x00, // NR50-NR51
];

impl Default for SoundRegisters {
    fn default() -> Self {
        Self {
            regs: [0; 0x16],
            powered: false,
            wave: [0; 0x10],
        }
    }
}

impl SoundRegisters {
    /// Values the boot ROM leaves behind.
    pub(super) fn init_post_boot(&mut self) {
        self.powered = true;
        self.regs = [
            0x80, 0xBF, 0xF3, 0xFF, 0xBF, // NR10-NR14
            0x00, 0x3F, 0x00, 0xFF, 0xBF, // (FF15), NR21-NR24
            0x7F, 0xFF, 0x9F, 0xFF, 0xBF, // NR30-NR34
            0x00, 0xFF, 0x00, 0x00, 0xBF, // (FF1F), NR41-NR44
            0x77, 0xF3, // NR50-NR51
        ];
    }

    /// Check whether the APU is currently powered on (NR52 bit 7).
    pub fn powered(&self) -> bool {
        self.powered
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            NR10..=NR51 => {
                let index = (addr - NR10) as usize;
                self.regs[index] | READ_MASKS[index]
            }
            // Channel status bits stay 0: no channel ever plays.
            NR52 => 0x70 | u8::from(self.powered) << 7,
            WAVE_START..=WAVE_END => self.wave[(addr - WAVE_START) as usize],
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            NR10..=NR51 => {
                // When powered off the registers are read-only.
                if self.powered {
                    self.regs[(addr - NR10) as usize] = value;
                } else {
                    log::trace!("GB APU write 0x{value:02X} to 0x{addr:04X} ignored while off");
                }
            }
            NR52 => self.write_nr52(value),
            WAVE_START..=WAVE_END => self.wave[(addr - WAVE_START) as usize] = value,
            _ => log::trace!("GB APU write 0x{value:02X} to unused 0x{addr:04X}"),
        }
    }

    fn write_nr52(&mut self, value: u8) {
        // Only bit 7 is writable. Turning audio off clears NR10-NR51;
        // wave RAM is left alone.
        let on = value & 0x80 != 0;
        if self.powered && !on {
            self.regs = [0; 0x16];
        }
        self.powered = on;
    }
}
