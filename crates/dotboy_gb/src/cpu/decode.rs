//! Opcode tables.
//!
//! Both tables are built once on first use by walking the standard
//! `x/y/z/p/q` field split of the opcode byte:
//!
//! ```text
//!   7 6 | 5 4 3 | 2 1 0
//!    x  |   y   |   z       y = p << 1 | q
//! ```
//!
//! [`Instruction::opcode`] is the exact inverse of the table lookup.

use lazy_static::lazy_static;

use super::instruction::{
    AluOp, CbOp, Condition, Indirect, Instruction, Location8, Operand8, Reg16, RotateOp, StackReg,
};

/// First byte of every extended (CB-prefixed) opcode.
pub const PREFIX: u8 = 0xCB;

lazy_static! {
    static ref BASE_TABLE: [Option<Instruction>; 256] = {
        let mut table = [None; 256];
        for (opcode, slot) in table.iter_mut().enumerate() {
            *slot = decode_base(opcode as u8);
        }
        table
    };
    static ref PREFIXED_TABLE: [Instruction; 256] = {
        let mut table = [Instruction::Nop; 256];
        for (opcode, slot) in table.iter_mut().enumerate() {
            *slot = decode_prefixed(opcode as u8);
        }
        table
    };
}

impl Instruction {
    /// Look up an unprefixed opcode. Returns `None` for the prefix byte
    /// itself and for the eleven unused opcodes.
    #[inline]
    pub fn from_byte(opcode: u8) -> Option<Instruction> {
        BASE_TABLE[opcode as usize]
    }

    /// Look up the second byte of a CB-prefixed opcode. Every byte is
    /// defined.
    #[inline]
    pub fn from_prefixed_byte(opcode: u8) -> Instruction {
        PREFIXED_TABLE[opcode as usize]
    }

    /// Whether this instruction lives in the CB-prefixed table.
    #[inline]
    pub fn is_prefixed(&self) -> bool {
        matches!(self, Instruction::Prefixed(..))
    }

    /// The opcode byte this instruction was decoded from. For prefixed
    /// instructions this is the byte following [`PREFIX`].
    pub fn opcode(&self) -> u8 {
        use Instruction::*;

        match *self {
            Nop => 0x00,
            LdAddrSp => 0x08,
            Stop => 0x10,
            Jr(Condition::Always) => 0x18,
            Jr(cc) => 0x20 | cc_bits(cc),

            LdImm16(rr) => 0x01 | rr.index() << 4,
            AddHl(rr) => 0x09 | rr.index() << 4,
            LdIndirectA(ind) => 0x02 | ind.index() << 4,
            LdAIndirect(ind) => 0x0A | ind.index() << 4,
            Inc16(rr) => 0x03 | rr.index() << 4,
            Dec16(rr) => 0x0B | rr.index() << 4,
            Inc8(loc) => 0x04 | loc.index() << 3,
            Dec8(loc) => 0x05 | loc.index() << 3,
            Ld8 {
                dst,
                src: Operand8::Immediate,
            } => 0x06 | dst.index() << 3,

            Rlca => 0x07,
            Rrca => 0x0F,
            Rla => 0x17,
            Rra => 0x1F,
            Daa => 0x27,
            Cpl => 0x2F,
            Scf => 0x37,
            Ccf => 0x3F,

            Halt => 0x76,
            Ld8 { dst, src } => 0x40 | dst.index() << 3 | operand_index(src),

            Alu(op, Operand8::Immediate) => 0xC6 | op.index() << 3,
            Alu(op, src) => 0x80 | op.index() << 3 | operand_index(src),

            Ret(Condition::Always) => 0xC9,
            Ret(cc) => 0xC0 | cc_bits(cc),
            LdhAddrA => 0xE0,
            AddSpOffset => 0xE8,
            LdhAAddr => 0xF0,
            LdHlSpOffset => 0xF8,

            Pop(rr) => 0xC1 | rr.index() << 4,
            Reti => 0xD9,
            JpHl => 0xE9,
            LdSpHl => 0xF9,

            Jp(Condition::Always) => 0xC3,
            Jp(cc) => 0xC2 | cc_bits(cc),
            LdhCA => 0xE2,
            LdAddrA => 0xEA,
            LdhAC => 0xF2,
            LdAAddr => 0xFA,

            Di => 0xF3,
            Ei => 0xFB,

            Call(Condition::Always) => 0xCD,
            Call(cc) => 0xC4 | cc_bits(cc),
            Push(rr) => 0xC5 | rr.index() << 4,
            Rst(vector) => 0xC7 | (vector & 0x38),

            Prefixed(op, loc) => {
                let base = match op {
                    CbOp::Rotate(rot) => rot.index() << 3,
                    CbOp::Bit(bit) => 0x40 | (bit & 0x07) << 3,
                    CbOp::Res(bit) => 0x80 | (bit & 0x07) << 3,
                    CbOp::Set(bit) => 0xC0 | (bit & 0x07) << 3,
                };
                base | loc.index()
            }
        }
    }
}

#[inline]
fn cc_bits(cc: Condition) -> u8 {
    cc.index().unwrap_or(0) << 3
}

#[inline]
fn operand_index(src: Operand8) -> u8 {
    match src {
        Operand8::Reg(reg) => reg.index(),
        Operand8::HlIndirect | Operand8::Immediate => 6,
    }
}

fn decode_base(opcode: u8) -> Option<Instruction> {
    use Instruction::*;

    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = (y >> 1) as usize;
    let q = y & 0x01;

    let instruction = match (x, z) {
        (0, 0) => match y {
            0 => Nop,
            1 => LdAddrSp,
            2 => Stop,
            3 => Jr(Condition::Always),
            _ => Jr(Condition::FLAGGED[(y - 4) as usize]),
        },
        (0, 1) if q == 0 => LdImm16(Reg16::ALL[p]),
        (0, 1) => AddHl(Reg16::ALL[p]),
        (0, 2) if q == 0 => LdIndirectA(Indirect::ALL[p]),
        (0, 2) => LdAIndirect(Indirect::ALL[p]),
        (0, 3) if q == 0 => Inc16(Reg16::ALL[p]),
        (0, 3) => Dec16(Reg16::ALL[p]),
        (0, 4) => Inc8(Location8::from_index(y)),
        (0, 5) => Dec8(Location8::from_index(y)),
        (0, 6) => Ld8 {
            dst: Location8::from_index(y),
            src: Operand8::Immediate,
        },
        (0, _) => [Rlca, Rrca, Rla, Rra, Daa, Cpl, Scf, Ccf][y as usize],

        (1, 6) if y == 6 => Halt,
        (1, _) => Ld8 {
            dst: Location8::from_index(y),
            src: Location8::from_index(z).into(),
        },

        (2, _) => Alu(AluOp::ALL[y as usize], Location8::from_index(z).into()),

        (3, 0) => match y {
            0..=3 => Ret(Condition::FLAGGED[y as usize]),
            4 => LdhAddrA,
            5 => AddSpOffset,
            6 => LdhAAddr,
            _ => LdHlSpOffset,
        },
        (3, 1) if q == 0 => Pop(StackReg::ALL[p]),
        (3, 1) => [Ret(Condition::Always), Reti, JpHl, LdSpHl][p],
        (3, 2) => match y {
            0..=3 => Jp(Condition::FLAGGED[y as usize]),
            4 => LdhCA,
            5 => LdAddrA,
            6 => LdhAC,
            _ => LdAAddr,
        },
        (3, 3) => match y {
            0 => Jp(Condition::Always),
            6 => Di,
            7 => Ei,
            // 1 is the CB prefix; 2..=5 are unused.
            _ => return None,
        },
        (3, 4) if y < 4 => Call(Condition::FLAGGED[y as usize]),
        (3, 4) => return None,
        (3, 5) if q == 0 => Push(StackReg::ALL[p]),
        (3, 5) if p == 0 => Call(Condition::Always),
        (3, 5) => return None,
        (3, 6) => Alu(AluOp::ALL[y as usize], Operand8::Immediate),
        _ => Rst(y << 3),
    };

    Some(instruction)
}

fn decode_prefixed(opcode: u8) -> Instruction {
    let y = (opcode >> 3) & 0x07;
    let loc = Location8::from_index(opcode & 0x07);

    let op = match opcode >> 6 {
        0 => CbOp::Rotate(RotateOp::ALL[y as usize]),
        1 => CbOp::Bit(y),
        2 => CbOp::Res(y),
        _ => CbOp::Set(y),
    };

    Instruction::Prefixed(op, loc)
}
