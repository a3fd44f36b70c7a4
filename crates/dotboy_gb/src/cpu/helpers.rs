use super::instruction::{Condition, Location8, Operand8, Reg16, StackReg};
use super::{Bus, Cpu};
use crate::error::EmuError;

impl<B: Bus> Cpu<B> {
    #[inline]
    pub(super) fn fetch8(&mut self) -> Result<u8, EmuError> {
        let value = self.bus.read8(self.pc)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(value)
    }

    #[inline]
    pub(super) fn fetch16(&mut self) -> Result<u16, EmuError> {
        let lo = self.fetch8()?;
        let hi = self.fetch8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    #[inline]
    pub(super) fn read8(&mut self, addr: u16) -> Result<u8, EmuError> {
        Ok(self.bus.read8(addr)?)
    }

    #[inline]
    pub(super) fn write8(&mut self, addr: u16, value: u8) -> Result<(), EmuError> {
        Ok(self.bus.write8(addr, value)?)
    }

    pub(super) fn read_location(&mut self, location: Location8) -> Result<u8, EmuError> {
        match location {
            Location8::Reg(reg) => Ok(self.regs.get(reg)),
            Location8::HlIndirect => self.read8(self.regs.hl()),
        }
    }

    pub(super) fn write_location(&mut self, location: Location8, value: u8) -> Result<(), EmuError> {
        match location {
            Location8::Reg(reg) => {
                self.regs.set(reg, value);
                Ok(())
            }
            Location8::HlIndirect => self.write8(self.regs.hl(), value),
        }
    }

    pub(super) fn read_operand(&mut self, operand: Operand8) -> Result<u8, EmuError> {
        match operand {
            Operand8::Reg(reg) => Ok(self.regs.get(reg)),
            Operand8::HlIndirect => self.read8(self.regs.hl()),
            Operand8::Immediate => self.fetch8(),
        }
    }

    #[inline]
    pub(super) fn read_reg16(&self, reg: Reg16) -> u16 {
        self.regs.pair(reg).unwrap_or(self.sp)
    }

    #[inline]
    pub(super) fn write_reg16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::BC => self.regs.set_bc(value),
            Reg16::DE => self.regs.set_de(value),
            Reg16::HL => self.regs.set_hl(value),
            Reg16::SP => self.sp = value,
        }
    }

    #[inline]
    pub(super) fn read_stack_reg(&self, reg: StackReg) -> u16 {
        match reg {
            StackReg::BC => self.regs.bc(),
            StackReg::DE => self.regs.de(),
            StackReg::HL => self.regs.hl(),
            StackReg::AF => self.regs.af(),
        }
    }

    #[inline]
    pub(super) fn write_stack_reg(&mut self, reg: StackReg, value: u16) {
        match reg {
            StackReg::BC => self.regs.set_bc(value),
            StackReg::DE => self.regs.set_de(value),
            StackReg::HL => self.regs.set_hl(value),
            StackReg::AF => self.regs.set_af(value),
        }
    }

    #[inline]
    pub(super) fn condition(&self, condition: Condition) -> bool {
        match condition {
            Condition::Always => true,
            Condition::NZ => !self.regs.f.zero,
            Condition::Z => self.regs.f.zero,
            Condition::NC => !self.regs.f.carry,
            Condition::C => self.regs.f.carry,
        }
    }

    pub(super) fn push_u16(&mut self, value: u16) -> Result<(), EmuError> {
        let [hi, lo] = value.to_be_bytes();
        // Stack grows downward. We want memory[SP] = low, memory[SP+1] = high.
        self.sp = self.sp.wrapping_sub(1);
        self.write8(self.sp, hi)?;
        self.sp = self.sp.wrapping_sub(1);
        self.write8(self.sp, lo)
    }

    pub(super) fn pop_u16(&mut self) -> Result<u16, EmuError> {
        let lo = self.read8(self.sp)?;
        self.sp = self.sp.wrapping_add(1);
        let hi = self.read8(self.sp)?;
        self.sp = self.sp.wrapping_add(1);
        Ok(u16::from_be_bytes([hi, lo]))
    }
}
