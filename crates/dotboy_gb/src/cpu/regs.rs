use super::instruction::{Reg16, Reg8};

const ZERO_BIT: u8 = 7;
const SUBTRACT_BIT: u8 = 6;
const HALF_CARRY_BIT: u8 = 5;
const CARRY_BIT: u8 = 4;

/// The F register as four independent flags.
///
/// Layout of the packed byte (bit index, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlagRegister {
    pub zero: bool,
    pub subtract: bool,
    pub half_carry: bool,
    pub carry: bool,
}

impl From<FlagRegister> for u8 {
    fn from(flags: FlagRegister) -> u8 {
        (u8::from(flags.zero) << ZERO_BIT)
            | (u8::from(flags.subtract) << SUBTRACT_BIT)
            | (u8::from(flags.half_carry) << HALF_CARRY_BIT)
            | (u8::from(flags.carry) << CARRY_BIT)
    }
}

impl From<u8> for FlagRegister {
    fn from(byte: u8) -> FlagRegister {
        FlagRegister {
            zero: (byte >> ZERO_BIT) & 1 != 0,
            subtract: (byte >> SUBTRACT_BIT) & 1 != 0,
            half_carry: (byte >> HALF_CARRY_BIT) & 1 != 0,
            carry: (byte >> CARRY_BIT) & 1 != 0,
        }
    }
}

/// General purpose registers of the LR35902.
///
/// SP and PC live on [`Cpu`](super::Cpu) itself; this is only the
/// register file the ALU operates on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub f: FlagRegister,
}

impl Registers {
    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, u8::from(self.f)])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        // Lower 4 bits of F are always zero.
        self.f = FlagRegister::from(f);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    #[inline]
    pub fn get(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    #[inline]
    pub fn set(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.a = value,
            Reg8::B => self.b = value,
            Reg8::C => self.c = value,
            Reg8::D => self.d = value,
            Reg8::E => self.e = value,
            Reg8::H => self.h = value,
            Reg8::L => self.l = value,
        }
    }

    /// 16-bit pair by name. `SP` is not part of the register file and
    /// reads through [`Cpu::read_reg16`](super::Cpu) instead.
    #[inline]
    pub(crate) fn pair(&self, reg: Reg16) -> Option<u16> {
        match reg {
            Reg16::BC => Some(self.bc()),
            Reg16::DE => Some(self.de()),
            Reg16::HL => Some(self.hl()),
            Reg16::SP => None,
        }
    }
}
