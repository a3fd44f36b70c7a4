use super::AddressSpace;
use crate::error::BusError;
use crate::machine::gpu::OAM_START;

const OAM_DMA_LEN: u16 = 0xA0;

impl AddressSpace {
    /// OAM DMA: copy 160 bytes from `value << 8` to FE00..FE9F.
    ///
    /// The transfer happens immediately. Bytes go through the normal OAM
    /// write path so the decoded objects stay in sync.
    pub(super) fn oam_dma(&mut self, value: u8) -> Result<(), BusError> {
        self.dma = value;
        let base = (value as u16) << 8;
        for i in 0..OAM_DMA_LEN {
            let byte = self.read(base.wrapping_add(i))?;
            self.gpu.write_oam(OAM_START + i, byte);
        }
        Ok(())
    }
}
