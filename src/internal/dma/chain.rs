//! DMA buffer chain mounted against caller payloads.

use core::ptr;

use super::descriptor::TxDescriptor;
use crate::driver::error::ResourceError;
use crate::internal::constants::DMA_NODE_CAPACITY;

/// Fixed storage of OUT-link descriptors walked by the DMA engine.
///
/// The chain owns no payload memory. Every transaction re-points the first
/// `ceil(len / DMA_NODE_CAPACITY)` nodes at slices of the payload and links
/// them, so the storage is never reallocated.
///
/// # Type Parameters
/// * `NODES` - Number of descriptor nodes reserved for the chain
pub struct DmaChain<const NODES: usize> {
    /// Descriptor storage
    nodes: [TxDescriptor; NODES],
    /// Nodes reserved for the configured maximum transfer size
    linked: usize,
}

impl<const NODES: usize> DmaChain<NODES> {
    /// Create an empty chain. Const-compatible.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: [const { TxDescriptor::new() }; NODES],
            linked: 0,
        }
    }

    /// Number of nodes needed to cover `bytes`.
    #[inline(always)]
    #[must_use]
    pub const fn nodes_for(bytes: usize) -> usize {
        bytes.div_ceil(DMA_NODE_CAPACITY)
    }

    /// Total memory used by the descriptor storage.
    #[must_use]
    pub const fn memory_usage() -> usize {
        NODES * TxDescriptor::SIZE
    }

    /// Reserve enough nodes for `max_transfer_bytes`.
    ///
    /// Returns the number of nodes reserved.
    pub fn init(&mut self, max_transfer_bytes: usize) -> Result<usize, ResourceError> {
        let needed = Self::nodes_for(max_transfer_bytes);
        if needed == 0 || needed > NODES {
            return Err(ResourceError::ChainTooShort);
        }

        for node in &self.nodes {
            node.reset();
            node.set_next(ptr::null());
        }
        self.linked = needed;
        Ok(needed)
    }

    /// Nodes reserved by [`init`](Self::init)
    #[cfg(test)]
    #[inline(always)]
    pub fn linked(&self) -> usize {
        self.linked
    }

    /// Largest payload the reserved nodes can carry.
    #[inline(always)]
    pub fn capacity_bytes(&self) -> usize {
        self.linked * DMA_NODE_CAPACITY
    }

    /// Mount `payload` onto the chain and return the number of nodes used.
    ///
    /// The last used node carries the EOF flag and a null link. The caller
    /// guarantees `payload` is non-empty, fits [`capacity_bytes`](Self::capacity_bytes)
    /// and stays alive until the DMA has finished with it.
    pub fn mount(&self, payload: &[u8]) -> usize {
        let len = payload.len().min(self.capacity_bytes());
        let count = Self::nodes_for(len);
        let mut offset = 0usize;

        for i in 0..count {
            let chunk = core::cmp::min(len - offset, DMA_NODE_CAPACITY);
            let last = i + 1 == count;
            let next = if last {
                ptr::null()
            } else {
                &self.nodes[i + 1] as *const TxDescriptor
            };

            self.nodes[i].mount(payload[offset..].as_ptr(), chunk, last, next);
            offset += chunk;
        }

        for node in &self.nodes[count..self.linked] {
            node.reset();
        }

        count
    }

    /// Head of the chain, handed to the DMA engine.
    #[inline(always)]
    pub fn head(&self) -> *const TxDescriptor {
        self.nodes.as_ptr()
    }

    /// Node at `index` (for inspection).
    #[cfg(test)]
    #[inline(always)]
    pub fn node(&self, index: usize) -> &TxDescriptor {
        &self.nodes[index % NODES]
    }

    /// Return every reserved node to the CPU.
    pub fn release(&self) {
        for node in &self.nodes[..self.linked] {
            node.clear_owned();
        }
    }
}

impl<const NODES: usize> Default for DmaChain<NODES> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
