//! ESP32 PARL_IO Transmit Driver
//!
//! A `no_std`, `no_alloc` driver for the transmit half of the ESP32 Parallel IO
//! (PARL_IO) peripheral: a DMA-fed shift register that clocks caller buffers
//! out over 1 to 16 data lines.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Driver** ([`driver`]): the [`TxUnit`] transaction scheduler, its
//!    configuration, state machine and error types
//! 2. **HAL** ([`hal`]): collaborator interfaces ([`TxPeripheral`],
//!    [`DmaChannel`], [`PowerLock`]) plus clock divider arithmetic, GPIO
//!    validation and the TX unit registry
//! 3. **Internal**: MMIO register blocks, GDMA descriptors, the buffer chain
//!    and the index queues
//!
//! ## Transaction Flow
//!
//! Every unit owns a fixed pool of transaction descriptors. `submit` moves a
//! descriptor from the ready queue to the progress queue and starts it if the
//! bus is idle; the EOF interrupt moves the running descriptor to the
//! complete queue and immediately starts the next one, so queued frames go
//! out back to back. `wait_all_done` returns finished descriptors to the
//! ready queue.
//!
//! # Features
//!
//! - `esp32c6` (default): Target the ESP32-C6
//! - `esp32p4`: Target the ESP32-P4
//! - `defmt`: Enable defmt logging and formatting for public types
//! - `log`: Route driver logging through the `log` facade
//! - `async`: `wait_all_done_async`, woken from the completion interrupt
//!
//! # Example
//!
//! ```ignore
//! use ph_parlio_tx::{
//!     ClockConfig, GdmaTxChannel, GpioConfig, NoPowerLock, ParlIoRegs, TX_UNITS,
//!     TransmitConfig, TxUnit, TxUnitConfig, TxUnitDefault,
//! };
//!
//! static FRAME: [u8; 512] = [0x55; 512];
//!
//! let config = TxUnitConfig::new()
//!     .with_data_width(8)
//!     .with_max_transfer_bytes(512)
//!     .with_clock(ClockConfig::new().with_output_hz(10_000_000))
//!     .with_gpio(GpioConfig::new()
//!         .with_data_pins(&[0, 1, 2, 3, 4, 5, 6, 7])
//!         .with_clk_out(8));
//!
//! let unit: TxUnitDefault<'_, _, _> = TxUnit::new(
//!     &config,
//!     ParlIoRegs,
//!     GdmaTxChannel::new(0).unwrap(),
//!     &TX_UNITS,
//!     &NoPowerLock,
//! )?;
//!
//! unit.enable()?;
//! unit.submit(&FRAME, 512 * 8, &TransmitConfig::new())?;
//!
//! // In the PARL_IO interrupt handler:
//! //     unit.handle_interrupt();
//!
//! let summary = unit.wait_all_done(100, &mut delay)?;
//! ```
//!
//! # Memory Requirements
//!
//! Storage is sized by the `DEPTH` and `NODES` const parameters of
//! [`TxUnit`]. Each chain node is one 12-byte GDMA descriptor addressing up to
//! 4092 bytes of payload; the payload itself is borrowed, never copied. The
//! descriptor chain must live in DMA-capable internal SRAM.

#![cfg_attr(docsrs, doc(cfg_hide(feature = "esp32p4")))]
#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]
#[cfg(all(feature = "esp32c6", feature = "esp32p4"))]
compile_error!("Features 'esp32c6' and 'esp32p4' are mutually exclusive.");

#[cfg(not(any(feature = "esp32c6", feature = "esp32p4")))]
compile_error!(
    "Either feature 'esp32c6' or 'esp32p4' must be enabled. The default is 'esp32c6'."
);

// =============================================================================
// Modules
// =============================================================================

// Logging shims; must come first so the macros are visible everywhere
#[macro_use]
mod fmt;

pub mod driver;
pub mod hal;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::callback::{TransStatus, TxDoneEvent, TxDoneHandler, TxSummary};
pub use driver::config::{BitPackOrder, BusConfig, SampleEdge, TransmitConfig, TxUnitConfig};
pub use driver::error::{ArgumentError, Error, ErrorKind, ResourceError, Result, StateError};
pub use driver::fsm::TxState;
pub use driver::interrupt::InterruptStatus;
pub use driver::unit::{QueueLengths, TxUnit, TxUnitDefault, TxUnitLarge, TxUnitSmall};
pub use hal::{
    ClockConfig, ClockDivider, ClockSource, DmaChannel, GpioConfig, NoPowerLock, PowerLock,
    TX_UNITS, TxPeripheral, TxUnitRegistry, UnitId, UnitRegistry,
};
pub use internal::dma::TxDescriptor;
pub use internal::register::gdma::GdmaTxChannel;
pub use internal::register::parlio::ParlIoRegs;

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types.
pub mod constants {
    pub use crate::internal::constants::{
        // Bus limits
        BIT_GRANULAR_LENGTH,
        // Defaults
        DEFAULT_DATA_WIDTH,
        DEFAULT_MAX_TRANSFER_BYTES,
        DEFAULT_OUTPUT_CLK_HZ,
        // DMA
        DMA_NODE_CAPACITY,
        GPIO_COUNT,
        MAX_BITS_PER_FRAME,
        MAX_CLOCK_DIVIDER,
        MAX_DATA_WIDTH,
        // Clocks
        PLL_CLK_HZ,
        RC_FAST_CLK_HZ,
        // Timing
        WAIT_FOREVER,
        WAIT_POLL_INTERVAL_US,
        XTAL_CLK_HZ,
    };
}
