use super::interrupts::InterruptFlags;

/// Serial port modelled via SB (FF01) / SC (FF02).
///
/// There is never a link partner: a transfer started with the internal
/// clock completes immediately, the outgoing byte is appended to `output`
/// and the incoming byte reads as 0xFF, as if the line were disconnected.
#[derive(Clone, Debug, Default)]
pub struct Serial {
    pub(crate) sb: u8,
    pub(crate) sc: u8,
    output: Vec<u8>,
}

impl Serial {
    pub(super) fn init_post_boot(&mut self) {
        self.sb = 0x00;
        self.sc = 0x7E;
    }

    /// Bytes sent so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Drain the sent bytes.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF01 => self.sb,
            // Bits 1–6 are unused on DMG.
            _ => self.sc | 0x7E,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8, interrupts: &mut InterruptFlags) {
        match addr {
            0xFF01 => self.sb = value,
            _ => {
                self.sc = value;
                // Internal clock & start bit set?
                if (self.sc & 0x81) == 0x81 {
                    self.output.push(self.sb);
                    self.sb = 0xFF;
                    // Clear transfer start bit.
                    self.sc &= !0x80;
                    interrupts.insert(InterruptFlags::SERIAL);
                }
            }
        }
    }
}
