use crate::cpu::instruction::{AluOp, CbOp, Location8, Operand8};
use crate::cpu::{Bus, Cpu};
use crate::error::EmuError;

impl<B: Bus> Cpu<B> {
    pub(super) fn exec_alu(&mut self, op: AluOp, src: Operand8) -> Result<(), EmuError> {
        let value = self.read_operand(src)?;
        self.alu(op, value);
        Ok(())
    }

    pub(super) fn exec_cpl(&mut self) {
        self.regs.a = !self.regs.a;
        self.regs.f.subtract = true;
        self.regs.f.half_carry = true;
    }

    pub(super) fn exec_scf(&mut self) {
        self.regs.f.subtract = false;
        self.regs.f.half_carry = false;
        self.regs.f.carry = true;
    }

    pub(super) fn exec_ccf(&mut self) {
        self.regs.f.subtract = false;
        self.regs.f.half_carry = false;
        self.regs.f.carry = !self.regs.f.carry;
    }

    /// CB-prefixed bit operations, shifts and rotates.
    pub(super) fn exec_prefixed(&mut self, op: CbOp, loc: Location8) -> Result<(), EmuError> {
        let value = self.read_location(loc)?;

        match op {
            CbOp::Rotate(rot) => {
                let result = self.alu_rotate(rot, value);
                self.write_location(loc, result)?;
            }
            // BIT only reads; no write-back.
            CbOp::Bit(bit) => self.alu_bit(bit, value),
            CbOp::Res(bit) => self.write_location(loc, value & !(1 << bit))?,
            CbOp::Set(bit) => self.write_location(loc, value | (1 << bit))?,
        }

        Ok(())
    }
}
