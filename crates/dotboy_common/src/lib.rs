pub mod key;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);
    pub const RED: Color = Color::new_rgb(255, 0, 0);

    pub const LIGHT_GRAY: Color = Color::new_rgb(192, 192, 192);
    pub const DARK_GRAY: Color = Color::new_rgb(96, 96, 96);
    pub const MAGENTA: Color = Color::new_rgb(255, 0, 255);
    pub const YELLOW: Color = Color::new_rgb(255, 255, 0);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    #[inline]
    pub const fn new_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    #[inline]
    pub const fn rgba(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// RGBA8888 byte order, as stored in frame buffers.
    #[inline]
    pub const fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Color {
        Color::new_rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Average each channel with `other`, keeping this color's alpha.
    pub fn blend(&self, other: Color) -> Color {
        let mix = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Color::new_rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            self.a,
        )
    }

    pub fn to_u32(&self) -> u32 {
        u32::from_le_bytes(self.to_bytes())
    }
}
