//! Timer / divider unit (FF04–FF07).
//!
//! TIMA counts up at the frequency selected by TAC; on overflow it is
//! reloaded from TMA and a timer interrupt is requested. DIV counts at a
//! fixed 16384 Hz independently of TAC.

use super::interrupts::InterruptFlags;
use crate::CPU_CLOCK_HZ;

/// T-cycles per DIV increment (4194304 / 16384).
const DIVIDER_PERIOD: u32 = 256;

/// TIMA input clock, selected by TAC bits 0–1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frequency {
    Hz4096,
    Hz262144,
    Hz65536,
    Hz16384,
}

impl Frequency {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b00 => Frequency::Hz4096,
            0b01 => Frequency::Hz262144,
            0b10 => Frequency::Hz65536,
            _ => Frequency::Hz16384,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Frequency::Hz4096 => 0b00,
            Frequency::Hz262144 => 0b01,
            Frequency::Hz65536 => 0b10,
            Frequency::Hz16384 => 0b11,
        }
    }

    pub fn hz(self) -> u32 {
        match self {
            Frequency::Hz4096 => 4_096,
            Frequency::Hz262144 => 262_144,
            Frequency::Hz65536 => 65_536,
            Frequency::Hz16384 => 16_384,
        }
    }

    /// CPU cycles per TIMA increment.
    pub fn period(self) -> u32 {
        CPU_CLOCK_HZ / self.hz()
    }
}

#[derive(Clone, Debug)]
pub struct Timer {
    pub frequency: Frequency,
    /// TIMA (FF05).
    pub value: u8,
    /// TMA (FF06).
    pub modulo: u8,
    /// TAC bit 2.
    pub on: bool,
    cycles: u32,
    /// DIV (FF04).
    divider: u8,
    divider_cycles: u32,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            frequency: Frequency::Hz4096,
            value: 0,
            modulo: 0,
            on: false,
            cycles: 0,
            divider: 0,
            divider_cycles: 0,
        }
    }
}

impl Timer {
    /// DMG state after the boot ROM: DIV has been running for a while.
    pub(super) fn init_post_boot(&mut self) {
        self.divider = 0xAB;
    }

    /// Advance by `cycles` CPU cycles, requesting a timer interrupt on
    /// every TIMA overflow.
    pub fn step(&mut self, cycles: u32, interrupts: &mut InterruptFlags) {
        self.divider_cycles += cycles;
        while self.divider_cycles >= DIVIDER_PERIOD {
            self.divider_cycles -= DIVIDER_PERIOD;
            self.divider = self.divider.wrapping_add(1);
        }

        if !self.on {
            return;
        }

        self.cycles += cycles;
        let period = self.frequency.period();
        while self.cycles >= period {
            self.cycles -= period;
            let (next, overflow) = self.value.overflowing_add(1);
            if overflow {
                self.value = self.modulo;
                interrupts.insert(InterruptFlags::TIMER);
            } else {
                self.value = next;
            }
        }
    }

    pub fn divider(&self) -> u8 {
        self.divider
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => self.divider,
            0xFF05 => self.value,
            0xFF06 => self.modulo,
            // Upper 5 bits of TAC are unused and read as 1.
            _ => 0xF8 | u8::from(self.on) << 2 | self.frequency.bits(),
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // Any write resets DIV.
            0xFF04 => {
                self.divider = 0;
                self.divider_cycles = 0;
            }
            0xFF05 => self.value = value,
            0xFF06 => self.modulo = value,
            _ => {
                self.on = value & 0x04 != 0;
                self.frequency = Frequency::from_bits(value);
            }
        }
    }
}
