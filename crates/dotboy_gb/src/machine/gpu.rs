//! Pixel pipeline: VRAM, OAM, LCD registers and the scanline timing state
//! machine.

mod registers;
mod render;
mod tiles;
pub mod viewer;

pub use registers::{LcdControl, Palette, Shade, StatInterrupts};
pub use tiles::{decode_row, ObjectAttributes, Tile, TILE_COUNT};

use dotboy_common::Color;

use super::interrupts::InterruptFlags;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const VRAM_START: u16 = 0x8000;
pub const VRAM_END: u16 = 0x9FFF;
pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;

const VRAM_SIZE: usize = 0x2000;
const OAM_SIZE: usize = 0xA0;
const OBJECT_COUNT: usize = 40;

/// Cycles spent in each mode of a visible scanline.
const OAM_ACCESS_CYCLES: u32 = 84;
const VRAM_ACCESS_CYCLES: u32 = 172;
const HBLANK_CYCLES: u32 = 200;
/// One full scanline; also the length of each vertical blank line.
pub const SCANLINE_CYCLES: u32 = OAM_ACCESS_CYCLES + VRAM_ACCESS_CYCLES + HBLANK_CYCLES;

const LAST_VISIBLE_LINE: u8 = 143;
const LAST_LINE: u8 = 153;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    HorizontalBlank,
    VerticalBlank,
    OamAccess,
    VramAccess,
}

impl Mode {
    /// STAT bits 0–1.
    fn bits(self) -> u8 {
        match self {
            Mode::HorizontalBlank => 0,
            Mode::VerticalBlank => 1,
            Mode::OamAccess => 2,
            Mode::VramAccess => 3,
        }
    }
}

/// A finished 160x144 RGBA8888 frame.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Box<[u8]>,
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &SCREEN_WIDTH)
            .field("height", &SCREEN_HEIGHT)
            .finish()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        let mut pixels = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 4];
        for pixel in pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&Color::WHITE.to_bytes());
        }
        Self {
            pixels: pixels.into_boxed_slice(),
        }
    }
}

impl FrameBuffer {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        let i = (y * SCREEN_WIDTH + x) * 4;
        Color::from_bytes([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    #[inline]
    pub(crate) fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        let i = (y * SCREEN_WIDTH + x) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color.to_bytes());
    }

    /// Raw RGBA8888 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

pub struct Gpu {
    vram: Box<[u8; VRAM_SIZE]>,
    oam: [u8; OAM_SIZE],
    /// Decoded copy of the tile data area, updated on every VRAM write.
    tile_set: Box<[Tile; TILE_COUNT]>,
    objects: [ObjectAttributes; OBJECT_COUNT],

    pub(crate) control: LcdControl,
    stat_interrupts: StatInterrupts,
    mode: Mode,
    line: u8,
    line_compare: u8,
    pub scroll_x: u8,
    pub scroll_y: u8,
    pub window_x: u8,
    pub window_y: u8,
    pub bg_palette: Palette,
    pub obj_palettes: [Palette; 2],

    /// Cycles accumulated in the current mode.
    cycles: u32,
    frame: FrameBuffer,
}

impl Default for Gpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpu {
    pub fn new() -> Self {
        Self {
            vram: Box::new([0; VRAM_SIZE]),
            oam: [0; OAM_SIZE],
            tile_set: Box::new([[[0; 8]; 8]; TILE_COUNT]),
            objects: [ObjectAttributes::default(); OBJECT_COUNT],
            control: LcdControl::empty(),
            stat_interrupts: StatInterrupts::empty(),
            mode: Mode::OamAccess,
            line: 0,
            line_compare: 0,
            scroll_x: 0,
            scroll_y: 0,
            window_x: 0,
            window_y: 0,
            bg_palette: Palette::default(),
            obj_palettes: [Palette::default(); 2],
            cycles: 0,
            frame: FrameBuffer::default(),
        }
    }

    /// LCD state after the DMG boot ROM: display and background on, BGP
    /// set to the usual 0xFC.
    pub(crate) fn init_post_boot(&mut self) {
        self.control = LcdControl::from_bits_retain(0x91);
        self.stat_interrupts = StatInterrupts::empty();
        self.bg_palette = Palette(0xFC);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn line(&self) -> u8 {
        self.line
    }

    pub fn line_compare(&self) -> u8 {
        self.line_compare
    }

    pub fn control(&self) -> LcdControl {
        self.control
    }

    pub fn tile(&self, index: usize) -> &Tile {
        &self.tile_set[index]
    }

    pub fn objects(&self) -> &[ObjectAttributes] {
        &self.objects
    }

    /// The frame currently being drawn.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Advance the state machine. Returns a copy of the frame buffer when
    /// vertical blank begins.
    pub fn step(&mut self, cycles: u32, interrupts: &mut InterruptFlags) -> Option<FrameBuffer> {
        if !self.control.contains(LcdControl::DISPLAY_ENABLE) {
            return None;
        }

        self.cycles += cycles;
        let mut finished = None;

        loop {
            match self.mode {
                Mode::OamAccess => {
                    if self.cycles < OAM_ACCESS_CYCLES {
                        break;
                    }
                    self.cycles -= OAM_ACCESS_CYCLES;
                    self.enter_mode(Mode::VramAccess, interrupts);
                }
                Mode::VramAccess => {
                    if self.cycles < VRAM_ACCESS_CYCLES {
                        break;
                    }
                    self.cycles -= VRAM_ACCESS_CYCLES;
                    self.render_scanline();
                    self.enter_mode(Mode::HorizontalBlank, interrupts);
                }
                Mode::HorizontalBlank => {
                    if self.cycles < HBLANK_CYCLES {
                        break;
                    }
                    self.cycles -= HBLANK_CYCLES;
                    self.set_line(self.line + 1, interrupts);

                    if self.line > LAST_VISIBLE_LINE {
                        interrupts.insert(InterruptFlags::VBLANK);
                        self.enter_mode(Mode::VerticalBlank, interrupts);
                        finished = Some(self.frame.clone());
                    } else {
                        self.enter_mode(Mode::OamAccess, interrupts);
                    }
                }
                Mode::VerticalBlank => {
                    if self.cycles < SCANLINE_CYCLES {
                        break;
                    }
                    self.cycles -= SCANLINE_CYCLES;

                    if self.line >= LAST_LINE {
                        self.set_line(0, interrupts);
                        self.enter_mode(Mode::OamAccess, interrupts);
                    } else {
                        self.set_line(self.line + 1, interrupts);
                    }
                }
            }
        }

        finished
    }

    fn enter_mode(&mut self, mode: Mode, interrupts: &mut InterruptFlags) {
        self.mode = mode;

        let select = match mode {
            Mode::HorizontalBlank => StatInterrupts::HBLANK,
            Mode::VerticalBlank => StatInterrupts::VBLANK,
            Mode::OamAccess => StatInterrupts::OAM,
            Mode::VramAccess => return,
        };
        if self.stat_interrupts.contains(select) {
            interrupts.insert(InterruptFlags::LCD_STAT);
        }
    }

    fn set_line(&mut self, line: u8, interrupts: &mut InterruptFlags) {
        self.line = line;
        if self.line == self.line_compare && self.stat_interrupts.contains(StatInterrupts::LYC) {
            interrupts.insert(InterruptFlags::LCD_STAT);
        }
    }

    pub fn read_vram(&self, addr: u16) -> u8 {
        self.vram[(addr - VRAM_START) as usize]
    }

    /// Store a VRAM byte and re-decode the tile row it belongs to.
    pub fn write_vram(&mut self, addr: u16, value: u8) {
        let offset = (addr - VRAM_START) as usize;
        self.vram[offset] = value;

        if offset >= tiles::TILE_DATA_SIZE {
            return;
        }

        let tile = offset / 16;
        let row = (offset % 16) / 2;
        let low = self.vram[offset & !1];
        let high = self.vram[offset | 1];
        self.tile_set[tile][row] = decode_row(low, high);
    }

    pub fn read_oam(&self, addr: u16) -> u8 {
        self.oam[(addr - OAM_START) as usize]
    }

    /// Store an OAM byte and re-decode the object it belongs to.
    pub fn write_oam(&mut self, addr: u16, value: u8) {
        let offset = (addr - OAM_START) as usize;
        self.oam[offset] = value;

        let index = offset / 4;
        let base = index * 4;
        let bytes = [
            self.oam[base],
            self.oam[base + 1],
            self.oam[base + 2],
            self.oam[base + 3],
        ];
        self.objects[index] = ObjectAttributes::from_bytes(bytes);
    }

    /// LCD registers FF40–FF4B, except DMA (FF46) which the bus owns.
    pub fn read_register(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.control.bits(),
            0xFF41 => {
                let mode = if self.control.contains(LcdControl::DISPLAY_ENABLE) {
                    self.mode.bits()
                } else {
                    0
                };
                let coincidence = u8::from(self.line == self.line_compare) << 2;
                0x80 | self.stat_interrupts.bits() | coincidence | mode
            }
            0xFF42 => self.scroll_y,
            0xFF43 => self.scroll_x,
            0xFF44 => self.line,
            0xFF45 => self.line_compare,
            0xFF47 => self.bg_palette.0,
            0xFF48 => self.obj_palettes[0].0,
            0xFF49 => self.obj_palettes[1].0,
            0xFF4A => self.window_y,
            0xFF4B => self.window_x,
            _ => 0xFF,
        }
    }

    pub fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF40 => self.write_control(value),
            0xFF41 => self.stat_interrupts = StatInterrupts::from_bits_truncate(value),
            0xFF42 => self.scroll_y = value,
            0xFF43 => self.scroll_x = value,
            0xFF44 => log::trace!("GB PPU: ignoring write 0x{value:02X} to LY"),
            0xFF45 => self.line_compare = value,
            0xFF47 => self.bg_palette = Palette(value),
            0xFF48 => self.obj_palettes[0] = Palette(value),
            0xFF49 => self.obj_palettes[1] = Palette(value),
            0xFF4A => self.window_y = value,
            0xFF4B => self.window_x = value,
            _ => {}
        }
    }

    fn write_control(&mut self, value: u8) {
        let was_on = self.control.contains(LcdControl::DISPLAY_ENABLE);
        self.control = LcdControl::from_bits_retain(value);
        let now_on = self.control.contains(LcdControl::DISPLAY_ENABLE);

        if was_on != now_on {
            log::debug!("GB PPU: display {}", if now_on { "on" } else { "off" });
            // Either way the next frame starts from line 0.
            self.line = 0;
            self.cycles = 0;
            self.mode = if now_on {
                Mode::OamAccess
            } else {
                Mode::HorizontalBlank
            };
        }
    }
}
