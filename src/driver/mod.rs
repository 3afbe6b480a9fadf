//! Core driver components for the PARL_IO transmitter.
//!
//! This module contains the building blocks of a TX unit:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`fsm`] - Transmit state machine shared with the interrupt
//! - [`callback`] - Completion handler and per-transaction status
//! - [`interrupt`] - Interrupt status flags
//! - [`unit`] - The [`TxUnit`] transaction scheduler
//!
//! # Example
//!
//! ```ignore
//! use ph_parlio_tx::driver::{Error, TransmitConfig, TxUnitConfig};
//!
//! let config = TxUnitConfig::new()
//!     .with_data_width(4)
//!     .with_queue_depth(2);
//! ```

// Submodules
pub mod callback;
pub mod config;
pub mod error;
pub mod fsm;
pub mod interrupt;
pub mod unit;

// Re-exports for convenience
pub use callback::{TransStatus, TxDoneEvent, TxDoneHandler, TxSummary};
pub use config::{BitPackOrder, BusConfig, SampleEdge, TransmitConfig, TxUnitConfig};
pub use error::{ArgumentError, Error, ErrorKind, ResourceError, Result, StateError};
pub use fsm::{TxFsm, TxState};
pub use interrupt::InterruptStatus;
pub use unit::{QueueLengths, TxUnit, TxUnitDefault, TxUnitLarge, TxUnitSmall};
