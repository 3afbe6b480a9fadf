//! GDMA OUT Channel Register Definitions
//!
//! Only the transmit (OUT) half of a channel is driven: link address,
//! start/stop, reset and the peripheral select that ties the channel to
//! PARL_IO.

use super::{GDMA_BASE, read_reg, write_bits, write_field, write_reg};
use crate::hal::peripheral::DmaChannel;
use crate::internal::dma::TxDescriptor;

// =============================================================================
// Register Offsets (channel 0; channels are CH_STRIDE apart)
// =============================================================================

/// Distance between consecutive channel register blocks
pub const CH_STRIDE: usize = 0xC0;

/// OUT configuration 0 (reset, burst)
pub const OUT_CONF0_OFFSET: usize = 0xD0;
/// OUT link (descriptor address, start, stop)
pub const OUT_LINK_OFFSET: usize = 0xE0;
/// OUT peripheral select
pub const OUT_PERI_SEL_OFFSET: usize = 0x100;
/// OUT interrupt clear for channel 0
pub const OUT_INT_CLR_OFFSET: usize = 0x3C;
/// Distance between consecutive channel interrupt blocks
pub const INT_STRIDE: usize = 0x10;

// =============================================================================
// Bits
// =============================================================================

/// Reset the OUT FSM and FIFO pointers
pub const OUT_CONF0_RST: u32 = 1 << 0;
/// Descriptor burst mode
pub const OUT_CONF0_DSCR_BURST_EN: u32 = 1 << 3;

/// Low address bits of the first descriptor
pub const OUT_LINK_ADDR_MASK: u32 = 0xF_FFFF;
/// Stop walking descriptors
pub const OUT_LINK_STOP: u32 = 1 << 20;
/// Start walking descriptors from the link address
pub const OUT_LINK_START: u32 = 1 << 21;

/// Peripheral select field mask
pub const OUT_PERI_SEL_MASK: u32 = 0x3F;

/// All OUT channel interrupt bits
pub const OUT_INT_ALL: u32 = 0x7F;

/// Peripheral select value for PARL_IO
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const PERI_SEL_PARL_IO: u32 = 9;
/// Peripheral select value for PARL_IO (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const PERI_SEL_PARL_IO: u32 = 3;

/// Number of GDMA channels on the chip
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const CHANNEL_COUNT: u8 = 3;
/// Number of AHB GDMA channels on the chip (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const CHANNEL_COUNT: u8 = 3;

// =============================================================================
// Channel
// =============================================================================

/// One GDMA OUT channel bound to PARL_IO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GdmaTxChannel {
    channel: u8,
}

impl GdmaTxChannel {
    /// Claim OUT channel `channel` for PARL_IO. Returns `None` if the
    /// channel does not exist.
    pub fn new(channel: u8) -> Option<Self> {
        if channel >= CHANNEL_COUNT {
            return None;
        }
        let ch = Self { channel };
        unsafe {
            write_field(ch.reg(OUT_PERI_SEL_OFFSET), OUT_PERI_SEL_MASK, 0, PERI_SEL_PARL_IO);
            write_bits(ch.reg(OUT_CONF0_OFFSET), OUT_CONF0_DSCR_BURST_EN, true);
        }
        Some(ch)
    }

    /// Channel number
    #[inline(always)]
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    #[inline(always)]
    fn reg(&self, offset: usize) -> usize {
        GDMA_BASE + self.channel as usize * CH_STRIDE + offset
    }
}

impl DmaChannel for GdmaTxChannel {
    fn start(&self, head: *const TxDescriptor) {
        let addr = self.reg(OUT_LINK_OFFSET);
        unsafe {
            write_reg(
                GDMA_BASE + self.channel as usize * INT_STRIDE + OUT_INT_CLR_OFFSET,
                OUT_INT_ALL,
            );
            let link = read_reg(addr) & !(OUT_LINK_ADDR_MASK | OUT_LINK_STOP);
            write_reg(addr, link | (head as usize as u32 & OUT_LINK_ADDR_MASK));
            write_bits(addr, OUT_LINK_START, true);
        }
    }

    fn stop(&self) {
        unsafe { write_bits(self.reg(OUT_LINK_OFFSET), OUT_LINK_STOP, true) }
    }

    fn reset(&self) {
        let addr = self.reg(OUT_CONF0_OFFSET);
        unsafe {
            write_bits(addr, OUT_CONF0_RST, true);
            write_bits(addr, OUT_CONF0_RST, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_bits_do_not_overlap_address() {
        assert_eq!(OUT_LINK_ADDR_MASK & (OUT_LINK_START | OUT_LINK_STOP), 0);
    }

    #[test]
    fn missing_channel_is_rejected() {
        assert_eq!(GdmaTxChannel::new(CHANNEL_COUNT), None);
    }
}
