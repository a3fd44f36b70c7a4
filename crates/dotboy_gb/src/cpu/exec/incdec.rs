use crate::cpu::instruction::{Location8, Reg16};
use crate::cpu::{Bus, Cpu};
use crate::error::EmuError;

impl<B: Bus> Cpu<B> {
    pub(super) fn exec_inc8(&mut self, loc: Location8) -> Result<(), EmuError> {
        let value = self.read_location(loc)?;
        let result = self.alu_inc8(value);
        self.write_location(loc, result)
    }

    pub(super) fn exec_dec8(&mut self, loc: Location8) -> Result<(), EmuError> {
        let value = self.read_location(loc)?;
        let result = self.alu_dec8(value);
        self.write_location(loc, result)
    }

    /// 16-bit INC/DEC leave every flag untouched.
    pub(super) fn exec_inc16(&mut self, rr: Reg16) {
        let value = self.read_reg16(rr).wrapping_add(1);
        self.write_reg16(rr, value);
    }

    pub(super) fn exec_dec16(&mut self, rr: Reg16) {
        let value = self.read_reg16(rr).wrapping_sub(1);
        self.write_reg16(rr, value);
    }
}
