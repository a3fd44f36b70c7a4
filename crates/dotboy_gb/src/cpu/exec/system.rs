use crate::cpu::{Bus, Cpu};
use crate::error::EmuError;

impl<B: Bus> Cpu<B> {
    /// STOP is encoded as `10 00`; the padding byte is skipped. The CPU
    /// then sleeps like HALT until an enabled interrupt is pending.
    pub(super) fn exec_stop(&mut self) -> Result<(), EmuError> {
        self.fetch8()?;
        self.halted = true;
        Ok(())
    }

    pub(super) fn exec_halt(&mut self) {
        self.halted = true;
    }

    pub(super) fn exec_di(&mut self) {
        self.ime = false;
        self.ime_pending = false;
    }

    /// EI takes effect after the following instruction.
    pub(super) fn exec_ei(&mut self) {
        self.ime_pending = true;
    }
}
