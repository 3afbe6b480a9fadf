//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: Raw memory-mapped PARL_IO and GDMA register definitions
//! - [`constants`]: Internal constants and magic numbers
//! - [`dma`]: GDMA OUT-link descriptors and the buffer chain
//! - [`queue`]: Index ring used for the ready/progress/complete queues
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. Do not depend on any types
//! or functions in this module from external code. They are subject to change
//! without notice.

pub(crate) mod constants;
pub(crate) mod dma;
pub(crate) mod queue;
pub(crate) mod register;
