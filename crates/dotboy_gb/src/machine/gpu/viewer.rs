//! Debug visualizations of VRAM. Not used on the emulation path.

use dotboy_common::Color;
use typed_builder::TypedBuilder;

use super::{Gpu, LcdControl, TILE_COUNT};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const BACKGROUND_SIZE: usize = 256;
/// Tile atlas: 8 tiles per row, 48 rows.
pub const ATLAS_WIDTH: usize = 8 * 8;
pub const ATLAS_HEIGHT: usize = TILE_COUNT / 8 * 8;

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct RenderOptions {
    #[builder(default = false)]
    pub show_tile_outlines: bool,
    #[builder(default = true)]
    pub show_viewport_outline: bool,
    /// Tint every other tile so tile boundaries are visible.
    #[builder(default = false)]
    pub checkered: bool,
    /// Draw the part of the map outside the screen (dimmed). When off it is
    /// left transparent.
    #[builder(default = true)]
    pub show_outside_viewport: bool,
    /// Cache slot (0..384) to highlight.
    #[builder(default, setter(strip_option))]
    pub highlighted_tile: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions::builder().build()
    }
}

const OUTLINE: Color = Color::MAGENTA;
const VIEWPORT: Color = Color::RED;
const HIGHLIGHT: Color = Color::YELLOW;
const CHECKER: Color = Color::new_rgb(160, 200, 255);
const TRANSPARENT: Color = Color::new_rgba(0, 0, 0, 0);

struct Canvas {
    width: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            pixels: vec![0; width * height * 4],
        }
    }

    fn set(&mut self, x: usize, y: usize, color: Color) {
        let i = (y * self.width + x) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color.to_bytes());
    }
}

/// Distance from `start` to `pos` going right/down on a 256-wide torus.
#[inline]
fn wrapped_offset(pos: usize, start: u8) -> usize {
    (pos + BACKGROUND_SIZE - start as usize) % BACKGROUND_SIZE
}

/// The full 256x256 background map as RGBA8888, with the screen's
/// viewport marked.
pub fn render_background(gpu: &Gpu, options: &RenderOptions) -> Vec<u8> {
    let mut canvas = Canvas::new(BACKGROUND_SIZE, BACKGROUND_SIZE);
    let high_map = gpu.control.contains(LcdControl::BG_TILE_MAP);
    let map_base = if high_map { 0x1C00 } else { 0x1800 };

    for y in 0..BACKGROUND_SIZE {
        for x in 0..BACKGROUND_SIZE {
            let dx = wrapped_offset(x, gpu.scroll_x);
            let dy = wrapped_offset(y, gpu.scroll_y);
            let inside = dx < SCREEN_WIDTH && dy < SCREEN_HEIGHT;

            if !inside && !options.show_outside_viewport {
                canvas.set(x, y, TRANSPARENT);
                continue;
            }

            let index = gpu.map_pixel(high_map, x as u8, y as u8);
            let mut color = gpu.bg_palette.color(index);

            let (tile_x, tile_y) = (x / 8, y / 8);
            if options.checkered && (tile_x + tile_y) % 2 == 1 {
                color = color.blend(CHECKER);
            }
            if let Some(highlight) = options.highlighted_tile {
                let slot = gpu.tile_slot(gpu.vram[map_base + tile_y * 32 + tile_x]);
                if slot == highlight {
                    color = color.blend(HIGHLIGHT);
                }
            }
            if !inside {
                color = color.blend(Color::DARK_GRAY);
            }
            if options.show_tile_outlines && (x % 8 == 0 || y % 8 == 0) {
                color = OUTLINE;
            }
            if options.show_viewport_outline && on_viewport_edge(dx, dy) {
                color = VIEWPORT;
            }

            canvas.set(x, y, color);
        }
    }

    canvas.pixels
}

fn on_viewport_edge(dx: usize, dy: usize) -> bool {
    let within_x = dx < SCREEN_WIDTH;
    let within_y = dy < SCREEN_HEIGHT;
    (within_x && (dy == 0 || dy == SCREEN_HEIGHT - 1))
        || (within_y && (dx == 0 || dx == SCREEN_WIDTH - 1))
}

/// Every cached tile, 8 per row in slot order, as a 64x384 RGBA8888 image.
/// Tiles use the background palette.
pub fn render_tile_atlas(gpu: &Gpu, options: &RenderOptions) -> Vec<u8> {
    let mut canvas = Canvas::new(ATLAS_WIDTH, ATLAS_HEIGHT);

    for slot in 0..TILE_COUNT {
        let tile = gpu.tile(slot);
        let (origin_x, origin_y) = ((slot % 8) * 8, (slot / 8) * 8);
        let checker = options.checkered && ((slot % 8) + (slot / 8)) % 2 == 1;
        let highlighted = options.highlighted_tile == Some(slot);

        for (row, pixels) in tile.iter().enumerate() {
            for (col, &index) in pixels.iter().enumerate() {
                let mut color = gpu.bg_palette.color(index);
                if checker {
                    color = color.blend(CHECKER);
                }
                if highlighted {
                    color = color.blend(HIGHLIGHT);
                }
                if options.show_tile_outlines && (row == 0 || col == 0) {
                    color = OUTLINE;
                }
                canvas.set(origin_x + col, origin_y + row, color);
            }
        }
    }

    canvas.pixels
}
