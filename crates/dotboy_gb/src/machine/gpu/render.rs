use super::{Gpu, LcdControl, SCREEN_HEIGHT, SCREEN_WIDTH};
use dotboy_common::Color;

/// Offsets of the two 32x32 tile maps inside VRAM.
const TILE_MAP_LOW: usize = 0x1800;
const TILE_MAP_HIGH: usize = 0x1C00;

impl Gpu {
    /// Cache slot for a tile map entry under the current addressing mode.
    ///
    /// In signed (0x8800) mode indices 0..=127 live in the block at 0x9000,
    /// i.e. slots 256..=383; 128..=255 share slots with unsigned mode.
    #[inline]
    pub(super) fn tile_slot(&self, index: u8) -> usize {
        if !self.control.contains(LcdControl::TILE_DATA) && index < 128 {
            index as usize + 256
        } else {
            index as usize
        }
    }

    /// Color index at (x, y) of the background plane drawn from the
    /// selected tile map. Coordinates wrap at 256.
    pub(super) fn map_pixel(&self, high_map: bool, x: u8, y: u8) -> u8 {
        let base = if high_map { TILE_MAP_HIGH } else { TILE_MAP_LOW };
        let entry = base + (y as usize / 8) * 32 + (x as usize / 8);
        let slot = self.tile_slot(self.vram[entry]);
        self.tile_set[slot][(y % 8) as usize][(x % 8) as usize]
    }

    /// Composite the current line into the frame buffer: background, then
    /// window, then sprites.
    pub(super) fn render_scanline(&mut self) {
        let line = self.line as usize;
        if line >= SCREEN_HEIGHT {
            return;
        }

        // Background/window color index per column, for sprite priority.
        let mut drawn = [0u8; SCREEN_WIDTH];

        if self.control.contains(LcdControl::BG_ENABLE) {
            let high_map = self.control.contains(LcdControl::BG_TILE_MAP);
            let y = self.scroll_y.wrapping_add(self.line);
            for (x, slot) in drawn.iter_mut().enumerate() {
                let index = self.map_pixel(high_map, self.scroll_x.wrapping_add(x as u8), y);
                *slot = index;
                self.frame.set_pixel(x, line, self.bg_palette.color(index));
            }
        } else {
            for x in 0..SCREEN_WIDTH {
                self.frame.set_pixel(x, line, Color::WHITE);
            }
        }

        if self.control.contains(LcdControl::WINDOW_ENABLE) && self.line >= self.window_y {
            self.render_window_line(line, &mut drawn);
        }

        if self.control.contains(LcdControl::OBJ_ENABLE) {
            self.render_sprite_line(line, &drawn);
        }
    }

    fn render_window_line(&mut self, line: usize, drawn: &mut [u8; SCREEN_WIDTH]) {
        let high_map = self.control.contains(LcdControl::WINDOW_TILE_MAP);
        let left = self.window_x as i32 - 7;
        let y = self.line - self.window_y;

        for x in left.max(0)..SCREEN_WIDTH as i32 {
            let index = self.map_pixel(high_map, (x - left) as u8, y);
            drawn[x as usize] = index;
            self.frame.set_pixel(x as usize, line, self.bg_palette.color(index));
        }
    }

    /// Sprites are drawn in OAM order with no per-line limit, so a later
    /// entry overwrites an earlier one where they overlap.
    fn render_sprite_line(&mut self, line: usize, drawn: &[u8; SCREEN_WIDTH]) {
        let height: i16 = if self.control.contains(LcdControl::OBJ_SIZE) { 16 } else { 8 };
        let line = line as i16;

        for obj in self.objects {
            let mut row = line - obj.y;
            if row < 0 || row >= height {
                continue;
            }
            if obj.y_flip {
                row = height - 1 - row;
            }

            // In 8x16 mode the low bit of the tile index is ignored and the
            // lower half comes from the next tile.
            let tile = if height == 16 {
                (obj.tile & 0xFE) as usize + (row / 8) as usize
            } else {
                obj.tile as usize
            };
            let pixels = self.tile_set[tile][(row % 8) as usize];
            let palette = self.obj_palettes[usize::from(obj.palette)];

            for col in 0..8i16 {
                let x = obj.x + col;
                if x < 0 || x >= SCREEN_WIDTH as i16 {
                    continue;
                }
                let column = if obj.x_flip { 7 - col } else { col };
                let index = pixels[column as usize];
                // Index 0 is transparent.
                if index == 0 {
                    continue;
                }
                if !obj.priority && drawn[x as usize] != 0 {
                    continue;
                }
                self.frame.set_pixel(x as usize, line as usize, palette.color(index));
            }
        }
    }
}
