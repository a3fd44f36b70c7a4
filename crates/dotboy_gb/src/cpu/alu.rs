use super::instruction::{AluOp, RotateOp};
use super::{Bus, Cpu};

/// 8-bit addition modulo 256.
#[inline]
pub fn wrapping_add(a: u8, b: u8) -> u8 {
    a.wrapping_add(b)
}

/// 8-bit subtraction modulo 256.
#[inline]
pub fn wrapping_sub(a: u8, b: u8) -> u8 {
    a.wrapping_sub(b)
}

/// Reinterpret a byte as a two's complement offset (JR, ADD SP,r8).
#[inline]
pub fn as_signed(value: u8) -> i8 {
    value as i8
}

impl<B: Bus> Cpu<B> {
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.alu_sub(value, false),
            AluOp::Sbc => self.alu_sub(value, true),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => self.alu_cp(value),
        }
    }

    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry_in = u8::from(use_carry && self.regs.f.carry);

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.a = result;
        self.regs.f.zero = result == 0;
        self.regs.f.subtract = false;
        self.regs.f.half_carry = half > 0x0F;
        self.regs.f.carry = full > 0xFF;
    }

    /// Core 8-bit SUB/SBC operation on A.
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let result = self.sub_flags(value, use_carry);
        self.regs.a = result;
    }

    /// CP: SUB without storing the result.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        self.sub_flags(value, false);
    }

    fn sub_flags(&mut self, value: u8, use_carry: bool) -> u8 {
        let a = self.regs.a;
        let carry_in = i16::from(use_carry && self.regs.f.carry);

        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        self.regs.f.zero = result == 0;
        self.regs.f.subtract = true;
        self.regs.f.half_carry = half < 0;
        self.regs.f.carry = full < 0;
        result
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a & value;
        self.regs.a = result;
        self.set_logic_flags(result, true);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a | value;
        self.regs.a = result;
        self.set_logic_flags(result, false);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a ^ value;
        self.regs.a = result;
        self.set_logic_flags(result, false);
    }

    #[inline]
    fn set_logic_flags(&mut self, result: u8, half_carry: bool) {
        self.regs.f.zero = result == 0;
        self.regs.f.subtract = false;
        self.regs.f.half_carry = half_carry;
        self.regs.f.carry = false;
    }

    /// INC r: carry is preserved.
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = wrapping_add(value, 1);
        self.regs.f.zero = result == 0;
        self.regs.f.subtract = false;
        self.regs.f.half_carry = (value & 0x0F) == 0x0F;
        result
    }

    /// DEC r: carry is preserved.
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = wrapping_sub(value, 1);
        self.regs.f.zero = result == 0;
        self.regs.f.subtract = true;
        self.regs.f.half_carry = (value & 0x0F) == 0;
        result
    }

    /// ADD HL,rr. Z is untouched; H is the carry out of bit 11.
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let (result, carry) = hl.overflowing_add(value);

        self.regs.set_hl(result);
        self.regs.f.subtract = false;
        self.regs.f.half_carry = (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
        self.regs.f.carry = carry;
    }

    /// SP plus a signed byte, shared by ADD SP,r8 and LD HL,SP+r8.
    ///
    /// H and C come from the unsigned add of the low byte; Z and N are
    /// cleared.
    pub(super) fn alu_add_sp_offset(&mut self, offset: u8) -> u16 {
        let sp = self.sp;
        let low = sp & 0x00FF;
        let offset16 = offset as u16;

        self.regs.f.zero = false;
        self.regs.f.subtract = false;
        self.regs.f.half_carry = (low & 0x0F) + (offset16 & 0x0F) > 0x0F;
        self.regs.f.carry = low + offset16 > 0xFF;

        sp.wrapping_add_signed(as_signed(offset) as i16)
    }

    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let mut carry = self.regs.f.carry;

        if !self.regs.f.subtract {
            let mut adjust = 0u8;
            if self.regs.f.half_carry || (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if carry || a > 0x99 {
                adjust |= 0x60;
                carry = true;
            }
            a = wrapping_add(a, adjust);
        } else {
            let mut adjust = 0u8;
            if self.regs.f.half_carry {
                adjust |= 0x06;
            }
            if carry {
                adjust |= 0x60;
            }
            a = wrapping_sub(a, adjust);
        }

        self.regs.a = a;
        self.regs.f.zero = a == 0;
        self.regs.f.half_carry = false;
        self.regs.f.carry = carry;
    }

    /// CB rotates and shifts. Sets Z from the result, clears N and H.
    pub(super) fn alu_rotate(&mut self, op: RotateOp, value: u8) -> u8 {
        let carry_in = self.regs.f.carry;
        let (result, carry) = match op {
            RotateOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            RotateOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            RotateOp::Rl => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
            RotateOp::Rr => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
            RotateOp::Sla => (value << 1, value & 0x80 != 0),
            // SRA keeps bit 7.
            RotateOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            RotateOp::Swap => (value.rotate_left(4), false),
            RotateOp::Srl => (value >> 1, value & 0x01 != 0),
        };

        self.regs.f.zero = result == 0;
        self.regs.f.subtract = false;
        self.regs.f.half_carry = false;
        self.regs.f.carry = carry;
        result
    }

    /// RLCA/RRCA/RLA/RRA: like the CB forms on A, but Z is always cleared.
    pub(super) fn alu_rotate_a(&mut self, op: RotateOp) {
        let a = self.regs.a;
        self.regs.a = self.alu_rotate(op, a);
        self.regs.f.zero = false;
    }

    /// BIT b: Z is set when the bit is clear. C is untouched.
    pub(super) fn alu_bit(&mut self, bit: u8, value: u8) {
        self.regs.f.zero = value & (1 << bit) == 0;
        self.regs.f.subtract = false;
        self.regs.f.half_carry = true;
    }
}
