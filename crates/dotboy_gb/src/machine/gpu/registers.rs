use bitflags::bitflags;
use dotboy_common::Color;

bitflags! {
    /// LCDC (FF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const BG_ENABLE = 1 << 0;
        const OBJ_ENABLE = 1 << 1;
        /// 8x16 sprites when set.
        const OBJ_SIZE = 1 << 2;
        /// Background tile map at 0x9C00 when set, else 0x9800.
        const BG_TILE_MAP = 1 << 3;
        /// Unsigned tile data at 0x8000 when set, else signed at 0x8800.
        const TILE_DATA = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        /// Window tile map at 0x9C00 when set, else 0x9800.
        const WINDOW_TILE_MAP = 1 << 6;
        const DISPLAY_ENABLE = 1 << 7;
    }
}

bitflags! {
    /// Writable interrupt-select bits of STAT (FF41).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StatInterrupts: u8 {
        const HBLANK = 1 << 3;
        const VBLANK = 1 << 4;
        const OAM = 1 << 5;
        const LYC = 1 << 6;
    }
}

/// The four DMG greys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shade {
    White,
    LightGray,
    DarkGray,
    Black,
}

impl Shade {
    fn from_bits(bits: u8) -> Shade {
        match bits & 0x03 {
            0 => Shade::White,
            1 => Shade::LightGray,
            2 => Shade::DarkGray,
            _ => Shade::Black,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Shade::White => Color::WHITE,
            Shade::LightGray => Color::LIGHT_GRAY,
            Shade::DarkGray => Color::DARK_GRAY,
            Shade::Black => Color::BLACK,
        }
    }
}

/// BGP/OBP0/OBP1: two bits per color index, index 0 in the low bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Palette(pub u8);

impl Palette {
    /// Only the low two bits of `index` are used.
    #[inline]
    pub fn shade(self, index: u8) -> Shade {
        Shade::from_bits(self.0 >> ((index & 0x03) * 2))
    }

    #[inline]
    pub fn color(self, index: u8) -> Color {
        self.shade(index).color()
    }
}
