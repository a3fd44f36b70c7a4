use crate::cpu::instruction::{Indirect, Location8, Operand8, Reg16};
use crate::cpu::{Bus, Cpu};
use crate::error::EmuError;

impl<B: Bus> Cpu<B> {
    pub(super) fn exec_ld8(&mut self, dst: Location8, src: Operand8) -> Result<(), EmuError> {
        let value = self.read_operand(src)?;
        self.write_location(dst, value)
    }

    pub(super) fn exec_ld_imm16(&mut self, rr: Reg16) -> Result<(), EmuError> {
        let value = self.fetch16()?;
        self.write_reg16(rr, value);
        Ok(())
    }

    /// Resolve a `(BC)/(DE)/(HL+)/(HL-)` operand, applying the HL
    /// post-increment/decrement.
    fn indirect_addr(&mut self, ind: Indirect) -> u16 {
        match ind {
            Indirect::BC => self.regs.bc(),
            Indirect::DE => self.regs.de(),
            Indirect::HLIncrement => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HLDecrement => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_indirect_a(&mut self, ind: Indirect) -> Result<(), EmuError> {
        let addr = self.indirect_addr(ind);
        self.write8(addr, self.regs.a)
    }

    pub(super) fn exec_ld_a_indirect(&mut self, ind: Indirect) -> Result<(), EmuError> {
        let addr = self.indirect_addr(ind);
        self.regs.a = self.read8(addr)?;
        Ok(())
    }

    /// LD (a16),SP stores SP little-endian.
    pub(super) fn exec_ld_addr_sp(&mut self) -> Result<(), EmuError> {
        let addr = self.fetch16()?;
        let [lo, hi] = self.sp.to_le_bytes();
        self.write8(addr, lo)?;
        self.write8(addr.wrapping_add(1), hi)
    }

    pub(super) fn exec_ldh_addr_a(&mut self) -> Result<(), EmuError> {
        let offset = self.fetch8()?;
        self.write8(0xFF00 | offset as u16, self.regs.a)
    }

    pub(super) fn exec_ldh_a_addr(&mut self) -> Result<(), EmuError> {
        let offset = self.fetch8()?;
        self.regs.a = self.read8(0xFF00 | offset as u16)?;
        Ok(())
    }

    pub(super) fn exec_ld_addr_a(&mut self) -> Result<(), EmuError> {
        let addr = self.fetch16()?;
        self.write8(addr, self.regs.a)
    }

    pub(super) fn exec_ld_a_addr(&mut self) -> Result<(), EmuError> {
        let addr = self.fetch16()?;
        self.regs.a = self.read8(addr)?;
        Ok(())
    }

    pub(super) fn exec_ld_hl_sp_offset(&mut self) -> Result<(), EmuError> {
        let offset = self.fetch8()?;
        let value = self.alu_add_sp_offset(offset);
        self.regs.set_hl(value);
        Ok(())
    }

    pub(super) fn exec_add_sp_offset(&mut self) -> Result<(), EmuError> {
        let offset = self.fetch8()?;
        self.sp = self.alu_add_sp_offset(offset);
        Ok(())
    }
}
