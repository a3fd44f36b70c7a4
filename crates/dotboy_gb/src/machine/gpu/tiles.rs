/// Decoded 8x8 tile: `[row][column]` color indices 0..=3.
pub type Tile = [[u8; 8]; 8];

/// Tiles addressable in VRAM (0x8000–0x97FF).
pub const TILE_COUNT: usize = 384;
/// Bytes of tile data at the start of VRAM.
pub const TILE_DATA_SIZE: usize = TILE_COUNT * 16;

/// Decode one tile row from its two bitplanes.
///
/// Bit 7 of each byte is pixel 0; each pixel is `(high << 1) | low`.
#[inline]
pub fn decode_row(low: u8, high: u8) -> [u8; 8] {
    let mut row = [0u8; 8];
    for (px, value) in row.iter_mut().enumerate() {
        let bit = 7 - px;
        *value = (((high >> bit) & 1) << 1) | ((low >> bit) & 1);
    }
    row
}

/// One OAM entry, decoded on every write to any of its four bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjectAttributes {
    /// Screen row of the top edge (OAM byte 0 minus 16).
    pub y: i16,
    /// Screen column of the left edge (OAM byte 1 minus 8).
    pub x: i16,
    pub tile: u8,
    /// Selects OBP1 instead of OBP0.
    pub palette: bool,
    pub x_flip: bool,
    pub y_flip: bool,
    /// Drawn above background and window. When clear, only background
    /// color index 0 shows the sprite.
    pub priority: bool,
}

impl ObjectAttributes {
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        let flags = bytes[3];
        Self {
            y: bytes[0] as i16 - 16,
            x: bytes[1] as i16 - 8,
            tile: bytes[2],
            palette: flags & 0x10 != 0,
            x_flip: flags & 0x20 != 0,
            y_flip: flags & 0x40 != 0,
            priority: flags & 0x80 == 0,
        }
    }
}
