mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::instruction::{Instruction, RotateOp};
use super::{Bus, Cpu};
use crate::error::EmuError;

impl<B: Bus> Cpu<B> {
    /// Execute a decoded instruction and return the number of cycles it
    /// consumed.
    ///
    /// Operand bytes are fetched from `pc`, which already points past the
    /// opcode. Conditional control flow reports whether the branch was
    /// taken so the two-valued timing can be resolved here.
    pub(super) fn execute(&mut self, instruction: Instruction) -> Result<u32, EmuError> {
        use Instruction::*;

        let mut taken = true;

        match instruction {
            Nop => {}
            Stop => self.exec_stop()?,
            Halt => self.exec_halt(),
            Di => self.exec_di(),
            Ei => self.exec_ei(),

            Ld8 { dst, src } => self.exec_ld8(dst, src)?,
            LdImm16(rr) => self.exec_ld_imm16(rr)?,
            LdIndirectA(ind) => self.exec_ld_indirect_a(ind)?,
            LdAIndirect(ind) => self.exec_ld_a_indirect(ind)?,
            LdAddrSp => self.exec_ld_addr_sp()?,
            LdhAddrA => self.exec_ldh_addr_a()?,
            LdhAAddr => self.exec_ldh_a_addr()?,
            LdhCA => self.write8(0xFF00 | self.regs.c as u16, self.regs.a)?,
            LdhAC => self.regs.a = self.read8(0xFF00 | self.regs.c as u16)?,
            LdAddrA => self.exec_ld_addr_a()?,
            LdAAddr => self.exec_ld_a_addr()?,
            LdSpHl => self.sp = self.regs.hl(),
            LdHlSpOffset => self.exec_ld_hl_sp_offset()?,
            AddSpOffset => self.exec_add_sp_offset()?,

            Alu(op, src) => self.exec_alu(op, src)?,
            Inc8(loc) => self.exec_inc8(loc)?,
            Dec8(loc) => self.exec_dec8(loc)?,
            Inc16(rr) => self.exec_inc16(rr),
            Dec16(rr) => self.exec_dec16(rr),
            AddHl(rr) => self.alu_add16_hl(self.read_reg16(rr)),

            Rlca => self.alu_rotate_a(RotateOp::Rlc),
            Rrca => self.alu_rotate_a(RotateOp::Rrc),
            Rla => self.alu_rotate_a(RotateOp::Rl),
            Rra => self.alu_rotate_a(RotateOp::Rr),
            Daa => self.alu_daa(),
            Cpl => self.exec_cpl(),
            Scf => self.exec_scf(),
            Ccf => self.exec_ccf(),

            Jp(cond) => taken = self.exec_jp(cond)?,
            JpHl => self.pc = self.regs.hl(),
            Jr(cond) => taken = self.exec_jr(cond)?,
            Call(cond) => taken = self.exec_call(cond)?,
            Ret(cond) => taken = self.exec_ret(cond)?,
            Reti => self.exec_reti()?,
            Rst(vector) => self.exec_rst(vector)?,

            Push(rr) => self.exec_push(rr)?,
            Pop(rr) => self.exec_pop(rr)?,

            Prefixed(op, loc) => self.exec_prefixed(op, loc)?,
        }

        Ok(instruction.timing().cycles(taken))
    }
}
