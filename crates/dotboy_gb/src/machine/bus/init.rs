use super::AddressSpace;
use crate::machine::interrupts::InterruptFlags;

impl AddressSpace {
    /// Initialize I/O registers to match the DMG state right after the boot
    /// ROM hands over, for runs without a BIOS image.
    pub(super) fn apply_post_boot_io_state(&mut self) {
        self.serial.init_post_boot();
        self.timer.init_post_boot();
        self.apu.init_post_boot();
        self.gpu.init_post_boot();

        // The boot ROM leaves a VBlank request pending.
        self.interrupt_flag = InterruptFlags::VBLANK;
        self.interrupt_enable = 0x00;
        self.dma = 0xFF;
    }
}
