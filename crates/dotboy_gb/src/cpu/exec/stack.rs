use crate::cpu::instruction::StackReg;
use crate::cpu::{Bus, Cpu};
use crate::error::EmuError;

impl<B: Bus> Cpu<B> {
    pub(super) fn exec_push(&mut self, rr: StackReg) -> Result<(), EmuError> {
        let value = self.read_stack_reg(rr);
        self.push_u16(value)
    }

    /// POP AF masks the low nibble of F through `set_af`.
    pub(super) fn exec_pop(&mut self, rr: StackReg) -> Result<(), EmuError> {
        let value = self.pop_u16()?;
        self.write_stack_reg(rr, value);
        Ok(())
    }
}
