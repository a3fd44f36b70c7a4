use super::{Bus, Cpu};
use crate::error::EmuError;
use crate::machine::interrupts::{InterruptFlags, IE_ADDR, IF_ADDR};

/// T-cycles charged for an interrupt dispatch.
const DISPATCH_CYCLES: u32 = 20;

impl<B: Bus> Cpu<B> {
    /// Requested interrupts that are also enabled in IE.
    pub(super) fn pending_interrupts(&mut self) -> Result<InterruptFlags, EmuError> {
        let requested = self.read8(IF_ADDR)?;
        let enabled = self.read8(IE_ADDR)?;
        Ok(InterruptFlags::from_byte(requested & enabled))
    }

    /// Handle maskable interrupts if one is pending.
    ///
    /// A pending interrupt always wakes a halted CPU. It is only dispatched
    /// when IME is set: IME is cleared, PC pushed, the request bit cleared
    /// and PC redirected to the vector. Returns the cycles consumed, or 0
    /// when nothing was dispatched.
    pub(super) fn service_interrupts(&mut self) -> Result<u32, EmuError> {
        let pending = self.pending_interrupts()?;
        let Some(interrupt) = pending.highest_priority() else {
            return Ok(0);
        };

        self.halted = false;
        if !self.ime {
            return Ok(0);
        }

        self.ime = false;
        self.ime_pending = false;

        let pc = self.pc;
        self.push_u16(pc)?;

        let requested = InterruptFlags::from_byte(self.read8(IF_ADDR)?);
        self.write8(IF_ADDR, requested.difference(interrupt).to_byte())?;

        let vector = interrupt.vector();
        log::debug!(
            "GB CPU interrupt: {:?} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X}",
            interrupt,
            vector,
            pc,
            self.sp,
        );
        self.pc = vector;

        Ok(DISPATCH_CYCLES)
    }

    /// Whether a halted CPU could ever be woken, i.e. at least one source
    /// is enabled in IE.
    pub(super) fn can_wake(&mut self) -> Result<bool, EmuError> {
        let enabled = InterruptFlags::from_byte(self.read8(IE_ADDR)?);
        Ok(!enabled.is_empty())
    }
}
