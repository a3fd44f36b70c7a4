/// The eight DMG buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

const SELECT_DPAD: u8 = 0x10;
const SELECT_BUTTONS: u8 = 0x20;

/// Joypad matrix behind P1/JOYP (0xFF00).
///
/// Button fields are `true` while held. The register exposes one column
/// at a time, chosen by bits 4 (d-pad) and 5 (buttons), with 0 selecting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Joypad {
    pub right: bool,
    pub left: bool,
    pub up: bool,
    pub down: bool,
    pub a: bool,
    pub b: bool,
    pub select: bool,
    pub start: bool,
    /// Column selection bits (4–5) as last written.
    column: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            right: false,
            left: false,
            up: false,
            down: false,
            a: false,
            b: false,
            select: false,
            start: false,
            // Neither column selected.
            column: SELECT_DPAD | SELECT_BUTTONS,
        }
    }
}

impl Joypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update one button. Returns `true` on a fresh press, which is when
    /// the hardware raises the joypad interrupt.
    pub fn set_button(&mut self, button: Button, pressed: bool) -> bool {
        let slot = match button {
            Button::Right => &mut self.right,
            Button::Left => &mut self.left,
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::A => &mut self.a,
            Button::B => &mut self.b,
            Button::Select => &mut self.select,
            Button::Start => &mut self.start,
        };
        let newly_pressed = pressed && !*slot;
        *slot = pressed;
        newly_pressed
    }

    /// Bit 0..3 of a column, 1 = held.
    fn dpad_bits(&self) -> u8 {
        u8::from(self.right)
            | u8::from(self.left) << 1
            | u8::from(self.up) << 2
            | u8::from(self.down) << 3
    }

    fn button_bits(&self) -> u8 {
        u8::from(self.a)
            | u8::from(self.b) << 1
            | u8::from(self.select) << 2
            | u8::from(self.start) << 3
    }

    /// Register value. Bits 6–7 read as 1; a held button reads as 0.
    pub fn to_byte(&self) -> u8 {
        let mut held = 0;
        if self.column & SELECT_DPAD == 0 {
            held |= self.dpad_bits();
        }
        if self.column & SELECT_BUTTONS == 0 {
            held |= self.button_bits();
        }
        0xC0 | self.column | (!held & 0x0F)
    }

    /// Only the column selection bits are writable.
    pub fn write(&mut self, value: u8) {
        self.column = value & (SELECT_DPAD | SELECT_BUTTONS);
    }
}
