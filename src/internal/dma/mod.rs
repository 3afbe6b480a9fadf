//! DMA Buffer Chain
//!
//! GDMA OUT-link descriptors and the fixed chain the transmit unit re-mounts
//! against each payload. All memory is statically allocated using const
//! generics.
//!
//! # Architecture
//!
//! - [`TxDescriptor`]: one OUT-link node (DW0 flags, buffer pointer, link)
//! - [`DmaChain`]: `NODES` descriptors, of which `ceil(max_transfer / 4092)`
//!   are reserved at construction and re-pointed per transaction
//!
//! # Example
//!
//! ```ignore
//! let mut chain: DmaChain<4> = DmaChain::new();
//! chain.init(10_000)?;          // reserves 3 nodes
//! let used = chain.mount(&frame);
//! dma.start(chain.head());
//! ```

mod chain;
pub mod descriptor;

pub use chain::DmaChain;
pub use descriptor::TxDescriptor;
