//! TX (OUT-link) DMA descriptor for payload transmission.

use core::ptr;

use super::VolatileCell;
use super::bits::dw0;

/// GDMA OUT-link descriptor (12 bytes on the 32-bit targets).
#[repr(C)]
#[repr(align(4))]
pub struct TxDescriptor {
    /// DW0: size, length, EOF and owner bits
    dw0: VolatileCell<u32>,
    /// Address of the buffer this node moves
    buffer: VolatileCell<*const u8>,
    /// Next descriptor in the chain, null terminates the list
    next: VolatileCell<*const TxDescriptor>,
}

impl TxDescriptor {
    /// Size of the descriptor in bytes
    pub const SIZE: usize = core::mem::size_of::<TxDescriptor>();

    /// Create a new zeroed TX descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dw0: VolatileCell::new(0),
            buffer: VolatileCell::new(ptr::null()),
            next: VolatileCell::new(ptr::null()),
        }
    }

    /// Point this node at `len` bytes starting at `buffer` and hand it to the DMA.
    ///
    /// `len` must not exceed [`dw0::FIELD_MAX`]; the caller splits payloads
    /// at the node capacity before mounting.
    pub fn mount(&self, buffer: *const u8, len: usize, eof: bool, next: *const TxDescriptor) {
        let len = (len & dw0::FIELD_MAX) as u32;
        let mut word = (len << dw0::SIZE_SHIFT) | (len << dw0::LENGTH_SHIFT) | dw0::OWNER;
        if eof {
            word |= dw0::SUC_EOF;
        }

        self.buffer.set(buffer);
        self.next.set(next);
        // Flags last so the node is never observed half written
        self.dw0.set(word);
    }

    /// Check if descriptor is owned by DMA.
    #[inline(always)]
    #[must_use]
    pub fn is_owned(&self) -> bool {
        (self.dw0.get() & dw0::OWNER) != 0
    }

    /// Give ownership to DMA.
    #[cfg(test)]
    #[inline(always)]
    pub fn set_owned(&self) {
        self.dw0.update(|v| v | dw0::OWNER);
    }

    /// Take ownership from DMA for CPU use.
    #[inline(always)]
    pub fn clear_owned(&self) {
        self.dw0.update(|v| v & !dw0::OWNER);
    }

    /// Check if this node ends the frame.
    #[inline(always)]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        (self.dw0.get() & dw0::SUC_EOF) != 0
    }

    /// Number of bytes the DMA will move from this node.
    #[inline(always)]
    #[must_use]
    pub fn length(&self) -> usize {
        ((self.dw0.get() & dw0::LENGTH_MASK) >> dw0::LENGTH_SHIFT) as usize
    }

    /// Buffer capacity recorded in this node.
    #[cfg(test)]
    #[inline(always)]
    #[must_use]
    pub fn size(&self) -> usize {
        ((self.dw0.get() & dw0::SIZE_MASK) >> dw0::SIZE_SHIFT) as usize
    }

    /// Buffer address.
    #[inline(always)]
    #[must_use]
    pub fn buffer_addr(&self) -> *const u8 {
        self.buffer.get()
    }

    /// Next descriptor address.
    #[inline(always)]
    #[must_use]
    pub fn next_desc(&self) -> *const TxDescriptor {
        self.next.get()
    }

    /// Relink without touching the buffer fields.
    #[inline(always)]
    pub fn set_next(&self, next: *const TxDescriptor) {
        self.next.set(next);
    }

    /// Return the node to the CPU with no buffer attached, keeping the link.
    pub fn reset(&self) {
        self.dw0.set(0);
        self.buffer.set(ptr::null());
    }

    /// Get raw DW0 value for debugging.
    #[cfg(test)]
    #[inline(always)]
    #[must_use]
    pub fn raw_dw0(&self) -> u32 {
        self.dw0.get()
    }
}

impl Default for TxDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

// Safety: every field is a VolatileCell; the chain is only rewritten by the
// context that owns the running slot.
unsafe impl Sync for TxDescriptor {}
unsafe impl Send for TxDescriptor {}
