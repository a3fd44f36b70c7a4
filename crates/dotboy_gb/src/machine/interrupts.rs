use bitflags::bitflags;

/// IF: interrupt request register.
pub const IF_ADDR: u16 = 0xFF0F;
/// IE: interrupt enable register.
pub const IE_ADDR: u16 = 0xFFFF;

bitflags! {
    /// The five interrupt lines, in priority order (bit 0 highest).
    ///
    /// Used both for the requested set (IF) and the enabled set (IE).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 1 << 0;
        const LCD_STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

impl InterruptFlags {
    /// Decode a register byte. Bits 5–7 are ignored.
    #[inline]
    pub fn from_byte(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }

    /// Encode as the IF register reads back: unused bits 5–7 are 1.
    #[inline]
    pub fn to_byte(self) -> u8 {
        self.bits() | 0xE0
    }

    /// The single highest-priority line in this set.
    pub fn highest_priority(self) -> Option<Self> {
        if self.is_empty() {
            return None;
        }
        let bits = self.bits();
        Some(Self::from_bits_truncate(bits & bits.wrapping_neg()))
    }

    /// Dispatch address for a single line: 0x40 + 8 * bit index.
    pub fn vector(self) -> u16 {
        0x0040 + 8 * self.bits().trailing_zeros() as u16
    }
}
