//! Centralized Constants
//!
//! This module provides a single source of truth for all magic numbers and
//! configuration constants used throughout the PARL_IO TX driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Bus limits**: data line count and per-frame bit limits
//! - **DMA**: descriptor node capacity
//! - **Timing**: polling intervals and spin limits
//! - **Clock frequencies**: clock source rates per chip
//! - **Default configurations**: default queue depth and chain sizes
//!
//! Register bit definitions remain in `internal::register`.

// =============================================================================
// Bus Limits
// =============================================================================

/// Number of TX data lines the peripheral provides
pub const MAX_DATA_WIDTH: usize = 16;

/// Largest number of bits a single frame may carry (16-bit byte counter)
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const MAX_BITS_PER_FRAME: usize = 0xFFFF * 8;

/// Largest number of bits a single frame may carry (19-bit bit counter)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const MAX_BITS_PER_FRAME: usize = (1 << 19) - 1;

/// Whether the frame length register counts bits rather than bytes
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const BIT_GRANULAR_LENGTH: bool = false;

/// Whether the frame length register counts bits rather than bytes
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const BIT_GRANULAR_LENGTH: bool = true;

/// Number of GPIO pads routable through the GPIO matrix
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const GPIO_COUNT: u8 = 31;

/// Number of GPIO pads routable through the GPIO matrix
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const GPIO_COUNT: u8 = 55;

/// Number of PARL_IO groups on the chip
pub const GROUP_COUNT: usize = 1;

/// Number of TX units per group
pub const TX_UNITS_PER_GROUP: usize = 1;

// =============================================================================
// DMA
// =============================================================================

/// Bytes one DMA descriptor node can address (12-bit length, word aligned)
pub const DMA_NODE_CAPACITY: usize = 4092;

// =============================================================================
// Timing Constants
// =============================================================================

/// Polling interval for `wait_all_done` in microseconds
pub const WAIT_POLL_INTERVAL_US: u32 = 10;

/// Timeout value that disables the `wait_all_done` deadline
pub const WAIT_FOREVER: u32 = u32::MAX;

/// Spin iterations to wait for the DMA to stage data in the TX FIFO
pub const TX_READY_SPIN_LIMIT: u32 = 100_000;

// =============================================================================
// Clock Frequencies
// =============================================================================

/// Crystal oscillator frequency
pub const XTAL_CLK_HZ: u32 = 40_000_000;

/// PLL-derived PARL_IO source clock
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const PLL_CLK_HZ: u32 = 240_000_000;

/// PLL-derived PARL_IO source clock
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const PLL_CLK_HZ: u32 = 160_000_000;

/// Internal fast RC oscillator
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const RC_FAST_CLK_HZ: u32 = 17_500_000;

/// Internal fast RC oscillator
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const RC_FAST_CLK_HZ: u32 = 20_000_000;

/// Largest clock divider the TX clock configuration accepts
pub const MAX_CLOCK_DIVIDER: u32 = 0xFFFF;

// =============================================================================
// Default Configurations
// =============================================================================

/// Default output clock frequency
pub const DEFAULT_OUTPUT_CLK_HZ: u32 = 10_000_000;

/// Default bus width
pub const DEFAULT_DATA_WIDTH: usize = 8;

/// Default maximum transfer size in bytes (one DMA node)
pub const DEFAULT_MAX_TRANSFER_BYTES: usize = DMA_NODE_CAPACITY;
