//! Synchronization Support
//!
//! Primitives for state shared between the task that drives a TX unit and
//! the interrupt handler that completes its transactions:
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability, used for the
//!   transaction queues, the descriptor pool and the running slot
//! - [`AtomicWaker`] - waker storage drained by the completion ISR
//!   (`async` feature)
//!
//! The transmit state token and the outstanding counter are plain
//! `core::sync::atomic` values and live in the driver.

mod primitives;

#[cfg(feature = "async")]
pub use primitives::AtomicWaker;
pub use primitives::CriticalSectionCell;
