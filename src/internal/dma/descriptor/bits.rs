//! GDMA descriptor bit field constants.
//!
//! Layout of word 0 of a GDMA link-list descriptor (ESP32-C6 TRM, GDMA chapter).

#![allow(dead_code)]

// =============================================================================
// DW0 (Descriptor Word 0) - Size, length and flags
// =============================================================================

/// Descriptor word 0 bit field constants
pub mod dw0 {
    /// Buffer size shift (12 bits)
    pub const SIZE_SHIFT: u32 = 0;
    /// Buffer size mask - capacity of the buffer in bytes
    pub const SIZE_MASK: u32 = 0xFFF;
    /// Length shift (12 bits)
    pub const LENGTH_SHIFT: u32 = 12;
    /// Length mask - number of valid bytes the DMA will move
    pub const LENGTH_MASK: u32 = 0xFFF << 12;
    /// Error EOF - set by hardware on a receive error (RX only)
    pub const ERR_EOF: u32 = 1 << 28;
    /// Successful EOF - last descriptor of the frame
    pub const SUC_EOF: u32 = 1 << 30;
    /// OWNER - when set, descriptor owned by DMA; when clear, owned by CPU
    pub const OWNER: u32 = 1 << 31;

    /// Largest value either 12-bit field can hold
    pub const FIELD_MAX: usize = 0xFFF;
}

#[cfg(test)]
mod tests {
    use super::dw0;

    #[test]
    fn fields_do_not_overlap() {
        assert_eq!(dw0::SIZE_MASK & dw0::LENGTH_MASK, 0);
        assert_eq!(dw0::LENGTH_MASK & dw0::SUC_EOF, 0);
        assert_eq!(dw0::SUC_EOF & dw0::OWNER, 0);
        assert_eq!(dw0::ERR_EOF & (dw0::SUC_EOF | dw0::OWNER), 0);
    }

    #[test]
    fn owner_is_top_bit() {
        assert_eq!(dw0::OWNER, 0x8000_0000);
    }

    #[test]
    fn length_field_holds_max() {
        let packed = (dw0::FIELD_MAX as u32) << dw0::LENGTH_SHIFT;
        assert_eq!(packed & dw0::LENGTH_MASK, packed);
    }
}
