use crate::cpu::alu::as_signed;
use crate::cpu::instruction::Condition;
use crate::cpu::{Bus, Cpu};
use crate::error::EmuError;

impl<B: Bus> Cpu<B> {
    /// JP cc,a16. The target is always fetched, taken or not.
    pub(super) fn exec_jp(&mut self, cond: Condition) -> Result<bool, EmuError> {
        let addr = self.fetch16()?;
        let taken = self.condition(cond);
        if taken {
            self.pc = addr;
        }
        Ok(taken)
    }

    pub(super) fn exec_jr(&mut self, cond: Condition) -> Result<bool, EmuError> {
        let offset = as_signed(self.fetch8()?);
        let taken = self.condition(cond);
        if taken {
            self.pc = self.pc.wrapping_add_signed(offset as i16);
        }
        Ok(taken)
    }

    pub(super) fn exec_call(&mut self, cond: Condition) -> Result<bool, EmuError> {
        let addr = self.fetch16()?;
        let taken = self.condition(cond);
        if taken {
            self.push_u16(self.pc)?;
            self.pc = addr;
        }
        Ok(taken)
    }

    pub(super) fn exec_ret(&mut self, cond: Condition) -> Result<bool, EmuError> {
        let taken = self.condition(cond);
        if taken {
            self.pc = self.pop_u16()?;
        }
        Ok(taken)
    }

    /// RETI: RET and enable interrupts immediately (no EI delay).
    pub(super) fn exec_reti(&mut self) -> Result<(), EmuError> {
        self.pc = self.pop_u16()?;
        self.ime = true;
        Ok(())
    }

    pub(super) fn exec_rst(&mut self, vector: u8) -> Result<(), EmuError> {
        self.push_u16(self.pc)?;
        self.pc = vector as u16;
        Ok(())
    }
}
