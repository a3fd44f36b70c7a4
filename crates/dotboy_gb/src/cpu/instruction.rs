use std::fmt;

/// 8-bit registers in opcode-table order (B, C, D, E, H, L, -, A).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    A,
}

impl Reg8 {
    /// Register selected by a 3-bit opcode field. Index 6 is `(HL)` and
    /// has no register.
    pub(crate) fn from_index(index: u8) -> Option<Reg8> {
        match index & 0x07 {
            0 => Some(Reg8::B),
            1 => Some(Reg8::C),
            2 => Some(Reg8::D),
            3 => Some(Reg8::E),
            4 => Some(Reg8::H),
            5 => Some(Reg8::L),
            7 => Some(Reg8::A),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> u8 {
        match self {
            Reg8::B => 0,
            Reg8::C => 1,
            Reg8::D => 2,
            Reg8::E => 3,
            Reg8::H => 4,
            Reg8::L => 5,
            Reg8::A => 7,
        }
    }
}

/// Writable 8-bit destination: a register or the byte at `(HL)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location8 {
    Reg(Reg8),
    HlIndirect,
}

impl Location8 {
    pub(crate) fn from_index(index: u8) -> Location8 {
        Reg8::from_index(index).map_or(Location8::HlIndirect, Location8::Reg)
    }

    pub(crate) fn index(self) -> u8 {
        match self {
            Location8::Reg(reg) => reg.index(),
            Location8::HlIndirect => 6,
        }
    }
}

/// Readable 8-bit source. `Immediate` is the byte following the opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand8 {
    Reg(Reg8),
    HlIndirect,
    Immediate,
}

impl From<Location8> for Operand8 {
    fn from(location: Location8) -> Operand8 {
        match location {
            Location8::Reg(reg) => Operand8::Reg(reg),
            Location8::HlIndirect => Operand8::HlIndirect,
        }
    }
}

/// 16-bit register pairs as used by LD rr,d16 / INC rr / DEC rr / ADD HL,rr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    BC,
    DE,
    HL,
    SP,
}

impl Reg16 {
    pub(crate) const ALL: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::SP];

    pub(crate) fn index(self) -> u8 {
        match self {
            Reg16::BC => 0,
            Reg16::DE => 1,
            Reg16::HL => 2,
            Reg16::SP => 3,
        }
    }
}

/// 16-bit register pairs as used by PUSH/POP, where AF replaces SP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StackReg {
    BC,
    DE,
    HL,
    AF,
}

impl StackReg {
    pub(crate) const ALL: [StackReg; 4] = [StackReg::BC, StackReg::DE, StackReg::HL, StackReg::AF];

    pub(crate) fn index(self) -> u8 {
        match self {
            StackReg::BC => 0,
            StackReg::DE => 1,
            StackReg::HL => 2,
            StackReg::AF => 3,
        }
    }
}

/// Memory operand of `LD (rr),A` / `LD A,(rr)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Indirect {
    BC,
    DE,
    HLIncrement,
    HLDecrement,
}

impl Indirect {
    pub(crate) const ALL: [Indirect; 4] = [
        Indirect::BC,
        Indirect::DE,
        Indirect::HLIncrement,
        Indirect::HLDecrement,
    ];

    pub(crate) fn index(self) -> u8 {
        match self {
            Indirect::BC => 0,
            Indirect::DE => 1,
            Indirect::HLIncrement => 2,
            Indirect::HLDecrement => 3,
        }
    }
}

/// Branch predicate of JP/JR/CALL/RET.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    Always,
    NZ,
    Z,
    NC,
    C,
}

impl Condition {
    pub(crate) const FLAGGED: [Condition; 4] =
        [Condition::NZ, Condition::Z, Condition::NC, Condition::C];

    /// The 2-bit `cc` field, or `None` for the unconditional form.
    pub(crate) fn index(self) -> Option<u8> {
        match self {
            Condition::Always => None,
            Condition::NZ => Some(0),
            Condition::Z => Some(1),
            Condition::NC => Some(2),
            Condition::C => Some(3),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub(crate) const ALL: [AluOp; 8] = [
        AluOp::Add,
        AluOp::Adc,
        AluOp::Sub,
        AluOp::Sbc,
        AluOp::And,
        AluOp::Xor,
        AluOp::Or,
        AluOp::Cp,
    ];

    pub(crate) fn index(self) -> u8 {
        self as u8
    }
}

/// Rotates and shifts of the CB-prefixed table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotateOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl RotateOp {
    pub(crate) const ALL: [RotateOp; 8] = [
        RotateOp::Rlc,
        RotateOp::Rrc,
        RotateOp::Rl,
        RotateOp::Rr,
        RotateOp::Sla,
        RotateOp::Sra,
        RotateOp::Swap,
        RotateOp::Srl,
    ];

    pub(crate) fn index(self) -> u8 {
        self as u8
    }
}

/// Operation part of a CB-prefixed opcode. Bit numbers are 0..=7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CbOp {
    Rotate(RotateOp),
    Bit(u8),
    Res(u8),
    Set(u8),
}

/// One decoded LR35902 instruction.
///
/// Operands carry only their selector; immediate bytes and words are
/// fetched from `pc` while the instruction executes. Values are only ever
/// produced by the opcode tables in [`decode`](super::decode).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,

    /// `LD r,r'`, `LD r,(HL)`, `LD (HL),r`, `LD r,d8`, `LD (HL),d8`.
    Ld8 { dst: Location8, src: Operand8 },
    /// `LD rr,d16`.
    LdImm16(Reg16),
    /// `LD (rr),A`.
    LdIndirectA(Indirect),
    /// `LD A,(rr)`.
    LdAIndirect(Indirect),
    /// `LD (a16),SP`.
    LdAddrSp,
    /// `LDH (a8),A`.
    LdhAddrA,
    /// `LDH A,(a8)`.
    LdhAAddr,
    /// `LD (C),A`.
    LdhCA,
    /// `LD A,(C)`.
    LdhAC,
    /// `LD (a16),A`.
    LdAddrA,
    /// `LD A,(a16)`.
    LdAAddr,
    LdSpHl,
    /// `LD HL,SP+r8`.
    LdHlSpOffset,
    /// `ADD SP,r8`.
    AddSpOffset,

    Alu(AluOp, Operand8),
    Inc8(Location8),
    Dec8(Location8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),

    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,

    Jp(Condition),
    JpHl,
    Jr(Condition),
    Call(Condition),
    Ret(Condition),
    Reti,
    /// Restart; carries the target vector (0x00, 0x08, ..., 0x38).
    Rst(u8),

    Push(StackReg),
    Pop(StackReg),

    /// Any opcode of the 0xCB-prefixed table.
    Prefixed(CbOp, Location8),
}

/// Cycle cost of an instruction.
///
/// Conditional control flow costs `taken` when the predicate holds and
/// `not_taken` otherwise; every other instruction has both equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub taken: u32,
    pub not_taken: u32,
}

impl Timing {
    const fn fixed(cycles: u32) -> Timing {
        Timing {
            taken: cycles,
            not_taken: cycles,
        }
    }

    const fn branch(taken: u32, not_taken: u32) -> Timing {
        Timing { taken, not_taken }
    }

    #[inline]
    pub fn cycles(self, taken: bool) -> u32 {
        if taken {
            self.taken
        } else {
            self.not_taken
        }
    }
}

impl Instruction {
    /// T-cycles consumed by this instruction.
    pub fn timing(&self) -> Timing {
        use Instruction::*;

        match *self {
            Nop | Stop | Halt | Di | Ei => Timing::fixed(4),
            Rlca | Rrca | Rla | Rra | Daa | Cpl | Scf | Ccf => Timing::fixed(4),

            Ld8 { dst, src } => match (dst, src) {
                (Location8::Reg(_), Operand8::Reg(_)) => Timing::fixed(4),
                (Location8::HlIndirect, Operand8::Immediate) => Timing::fixed(12),
                _ => Timing::fixed(8),
            },
            LdImm16(_) => Timing::fixed(12),
            LdIndirectA(_) | LdAIndirect(_) => Timing::fixed(8),
            LdAddrSp => Timing::fixed(20),
            LdhAddrA | LdhAAddr => Timing::fixed(12),
            LdhCA | LdhAC => Timing::fixed(8),
            LdAddrA | LdAAddr => Timing::fixed(16),
            LdSpHl => Timing::fixed(8),
            LdHlSpOffset => Timing::fixed(12),
            AddSpOffset => Timing::fixed(16),

            Alu(_, Operand8::Reg(_)) => Timing::fixed(4),
            Alu(_, _) => Timing::fixed(8),
            Inc8(Location8::Reg(_)) | Dec8(Location8::Reg(_)) => Timing::fixed(4),
            Inc8(Location8::HlIndirect) | Dec8(Location8::HlIndirect) => Timing::fixed(12),
            Inc16(_) | Dec16(_) | AddHl(_) => Timing::fixed(8),

            Jp(Condition::Always) => Timing::fixed(16),
            Jp(_) => Timing::branch(16, 12),
            JpHl => Timing::fixed(4),
            Jr(Condition::Always) => Timing::fixed(12),
            Jr(_) => Timing::branch(12, 8),
            Call(Condition::Always) => Timing::fixed(24),
            Call(_) => Timing::branch(24, 12),
            Ret(Condition::Always) => Timing::fixed(16),
            Ret(_) => Timing::branch(20, 8),
            Reti => Timing::fixed(16),
            Rst(_) => Timing::fixed(16),

            Push(_) => Timing::fixed(16),
            Pop(_) => Timing::fixed(12),

            Prefixed(_, Location8::Reg(_)) => Timing::fixed(8),
            Prefixed(CbOp::Bit(_), Location8::HlIndirect) => Timing::fixed(12),
            Prefixed(_, Location8::HlIndirect) => Timing::fixed(16),
        }
    }

    /// Bytes occupied in memory, including the opcode (and prefix).
    pub fn length(&self) -> u16 {
        use Instruction::*;

        match *self {
            Ld8 {
                src: Operand8::Immediate,
                ..
            }
            | Alu(_, Operand8::Immediate)
            | LdhAddrA
            | LdhAAddr
            | LdHlSpOffset
            | AddSpOffset
            | Jr(_)
            | Stop
            | Prefixed(..) => 2,
            LdImm16(_) | LdAddrSp | LdAddrA | LdAAddr | Jp(_) | Call(_) => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg8::A => "A",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Location8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location8::Reg(reg) => write!(f, "{reg}"),
            Location8::HlIndirect => f.write_str("(HL)"),
        }
    }
}

impl fmt::Display for Operand8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand8::Reg(reg) => write!(f, "{reg}"),
            Operand8::HlIndirect => f.write_str("(HL)"),
            Operand8::Immediate => f.write_str("d8"),
        }
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for StackReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Indirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Indirect::BC => "(BC)",
            Indirect::DE => "(DE)",
            Indirect::HLIncrement => "(HL+)",
            Indirect::HLDecrement => "(HL-)",
        };
        f.write_str(name)
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        // Conditional forms print as e.g. "JP NZ,a16"; unconditional as "JP a16".
        let cond = |c: Condition| match c {
            Condition::Always => "",
            Condition::NZ => "NZ,",
            Condition::Z => "Z,",
            Condition::NC => "NC,",
            Condition::C => "C,",
        };

        match *self {
            Nop => f.write_str("NOP"),
            Stop => f.write_str("STOP"),
            Halt => f.write_str("HALT"),
            Di => f.write_str("DI"),
            Ei => f.write_str("EI"),
            Ld8 { dst, src } => write!(f, "LD {dst},{src}"),
            LdImm16(rr) => write!(f, "LD {rr},d16"),
            LdIndirectA(ind) => write!(f, "LD {ind},A"),
            LdAIndirect(ind) => write!(f, "LD A,{ind}"),
            LdAddrSp => f.write_str("LD (a16),SP"),
            LdhAddrA => f.write_str("LDH (a8),A"),
            LdhAAddr => f.write_str("LDH A,(a8)"),
            LdhCA => f.write_str("LD (C),A"),
            LdhAC => f.write_str("LD A,(C)"),
            LdAddrA => f.write_str("LD (a16),A"),
            LdAAddr => f.write_str("LD A,(a16)"),
            LdSpHl => f.write_str("LD SP,HL"),
            LdHlSpOffset => f.write_str("LD HL,SP+r8"),
            AddSpOffset => f.write_str("ADD SP,r8"),
            Alu(op, src) => write!(f, "{op}{src}"),
            Inc8(loc) => write!(f, "INC {loc}"),
            Dec8(loc) => write!(f, "DEC {loc}"),
            Inc16(rr) => write!(f, "INC {rr}"),
            Dec16(rr) => write!(f, "DEC {rr}"),
            AddHl(rr) => write!(f, "ADD HL,{rr}"),
            Rlca => f.write_str("RLCA"),
            Rrca => f.write_str("RRCA"),
            Rla => f.write_str("RLA"),
            Rra => f.write_str("RRA"),
            Daa => f.write_str("DAA"),
            Cpl => f.write_str("CPL"),
            Scf => f.write_str("SCF"),
            Ccf => f.write_str("CCF"),
            Jp(c) => write!(f, "JP {}a16", cond(c)),
            JpHl => f.write_str("JP HL"),
            Jr(c) => write!(f, "JR {}r8", cond(c)),
            Call(c) => write!(f, "CALL {}a16", cond(c)),
            Ret(Condition::Always) => f.write_str("RET"),
            Ret(c) => write!(f, "RET {}", cond(c).trim_end_matches(',')),
            Reti => f.write_str("RETI"),
            Rst(vector) => write!(f, "RST {vector:02X}H"),
            Push(rr) => write!(f, "PUSH {rr}"),
            Pop(rr) => write!(f, "POP {rr}"),
            Prefixed(CbOp::Rotate(op), loc) => {
                write!(f, "{} {loc}", format!("{op:?}").to_uppercase())
            }
            Prefixed(CbOp::Bit(bit), loc) => write!(f, "BIT {bit},{loc}"),
            Prefixed(CbOp::Res(bit), loc) => write!(f, "RES {bit},{loc}"),
            Prefixed(CbOp::Set(bit), loc) => write!(f, "SET {bit},{loc}"),
        }
    }
}
