//! Configuration types for the PARL_IO TX driver

use crate::driver::error::{ArgumentError, Result};
use crate::hal::clock::{ClockConfig, ClockDivider};
use crate::hal::gpio::GpioConfig;
use crate::internal::constants::{
    DEFAULT_DATA_WIDTH, DEFAULT_MAX_TRANSFER_BYTES, MAX_BITS_PER_FRAME, MAX_DATA_WIDTH,
};

/// Clock edge on which the receiver samples the data lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleEdge {
    /// Data changes on the falling edge, sampled on the rising edge
    #[default]
    Pos,
    /// Data changes on the rising edge, sampled on the falling edge
    Neg,
}

/// Order in which bits of a payload byte are shifted onto the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitPackOrder {
    /// Least significant bit first
    #[default]
    Lsb,
    /// Most significant bit first
    Msb,
}

/// Bus shape handed to [`TxPeripheral::configure_bus`](crate::hal::TxPeripheral::configure_bus)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Number of data lines
    pub data_width: usize,
    /// Sample edge
    pub sample_edge: SampleEdge,
    /// Bit order within a byte
    pub bit_pack_order: BitPackOrder,
    /// Hardware valid signal on the top data line
    pub valid_line: bool,
    /// Valid signal is active low
    pub invert_valid: bool,
    /// Output clock runs only while valid is asserted
    pub clock_gating: bool,
}

/// TX unit configuration
///
/// Checked in full by [`TxUnit::new`](crate::TxUnit::new) before any
/// resource is acquired.
///
/// # Example
///
/// ```ignore
/// let config = TxUnitConfig::new()
///     .with_data_width(8)
///     .with_max_transfer_bytes(512)
///     .with_clock(ClockConfig::new().with_output_hz(10_000_000))
///     .with_gpio(GpioConfig::new()
///         .with_data_pins(&[0, 1, 2, 3, 4, 5, 6, 7])
///         .with_clk_out(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxUnitConfig {
    /// PARL_IO group to take the unit from
    pub group: usize,
    /// Number of data lines (1, 2, 4, 8 or 16)
    pub data_width: usize,
    /// Largest payload accepted by `submit`, in bytes
    pub max_transfer_bytes: usize,
    /// Descriptors available for submission; `None` uses the whole pool
    pub queue_depth: Option<usize>,
    /// TX clock
    pub clock: ClockConfig,
    /// Pad assignment
    pub gpio: GpioConfig,
    /// Sample edge
    pub sample_edge: SampleEdge,
    /// Bit order within a byte
    pub bit_pack_order: BitPackOrder,
    /// Gate the output clock with the valid signal
    pub clock_gating: bool,
    /// Drive the valid signal active low
    pub invert_valid: bool,
}

impl Default for TxUnitConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TxUnitConfig {
    /// 8-line bus, one DMA node of payload, whole pool, default clock
    #[must_use]
    pub const fn new() -> Self {
        Self {
            group: 0,
            data_width: DEFAULT_DATA_WIDTH,
            max_transfer_bytes: DEFAULT_MAX_TRANSFER_BYTES,
            queue_depth: None,
            clock: ClockConfig::new(),
            gpio: GpioConfig::new(),
            sample_edge: SampleEdge::Pos,
            bit_pack_order: BitPackOrder::Lsb,
            clock_gating: false,
            invert_valid: false,
        }
    }

    /// Set the group
    #[must_use]
    pub const fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Set the number of data lines
    #[must_use]
    pub const fn with_data_width(mut self, width: usize) -> Self {
        self.data_width = width;
        self
    }

    /// Set the largest payload in bytes
    #[must_use]
    pub const fn with_max_transfer_bytes(mut self, bytes: usize) -> Self {
        self.max_transfer_bytes = bytes;
        self
    }

    /// Limit the number of descriptors available for submission
    #[must_use]
    pub const fn with_queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = Some(depth);
        self
    }

    /// Set the TX clock
    #[must_use]
    pub const fn with_clock(mut self, clock: ClockConfig) -> Self {
        self.clock = clock;
        self
    }

    /// Set the pad assignment
    #[must_use]
    pub const fn with_gpio(mut self, gpio: GpioConfig) -> Self {
        self.gpio = gpio;
        self
    }

    /// Set the sample edge
    #[must_use]
    pub const fn with_sample_edge(mut self, edge: SampleEdge) -> Self {
        self.sample_edge = edge;
        self
    }

    /// Set the bit order
    #[must_use]
    pub const fn with_bit_pack_order(mut self, order: BitPackOrder) -> Self {
        self.bit_pack_order = order;
        self
    }

    /// Gate the output clock with the valid signal
    #[must_use]
    pub const fn with_clock_gating(mut self, enable: bool) -> Self {
        self.clock_gating = enable;
        self
    }

    /// Drive the valid signal active low
    #[must_use]
    pub const fn with_invert_valid(mut self, invert: bool) -> Self {
        self.invert_valid = invert;
        self
    }

    /// Largest payload accepted by `submit`, in bits
    #[inline(always)]
    pub const fn max_transfer_bits(&self) -> usize {
        self.max_transfer_bytes * 8
    }

    /// Mask applied to idle values: one bit per data line
    #[inline(always)]
    pub const fn idle_mask(&self) -> u32 {
        if self.data_width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.data_width) - 1
        }
    }

    /// Descriptors made available for a pool of `pool_size`
    #[inline(always)]
    pub const fn effective_depth(&self, pool_size: usize) -> usize {
        match self.queue_depth {
            Some(depth) => depth,
            None => pool_size,
        }
    }

    /// Bus shape derived from this configuration
    pub const fn bus(&self) -> BusConfig {
        BusConfig {
            data_width: self.data_width,
            sample_edge: self.sample_edge,
            bit_pack_order: self.bit_pack_order,
            valid_line: self.gpio.has_valid(),
            invert_valid: self.invert_valid,
            clock_gating: self.clock_gating,
        }
    }

    /// Check every field against a descriptor pool of `pool_size` and
    /// compute the clock divider.
    ///
    /// # Errors
    ///
    /// The first [`ArgumentError`] found, in field order: bus width, valid
    /// line, clock gating, transfer size, queue depth, GPIO, clock.
    pub fn validate(&self, pool_size: usize) -> Result<ClockDivider> {
        let width = self.data_width;
        if width == 0 || !width.is_power_of_two() || width > MAX_DATA_WIDTH {
            return Err(ArgumentError::InvalidDataWidth.into());
        }
        if self.gpio.has_valid() && width >= MAX_DATA_WIDTH {
            return Err(ArgumentError::ValidLineConflict.into());
        }
        if self.clock_gating && !self.gpio.has_valid() {
            return Err(ArgumentError::GatingWithoutValid.into());
        }
        if self.max_transfer_bytes == 0 || self.max_transfer_bits() > MAX_BITS_PER_FRAME {
            return Err(ArgumentError::InvalidTransferSize.into());
        }

        let depth = self.effective_depth(pool_size);
        if depth == 0 || depth > pool_size {
            return Err(ArgumentError::InvalidQueueDepth.into());
        }

        self.gpio.validate(width, self.clock.source.is_external())?;
        Ok(self.clock.divider()?)
    }
}

/// Per-transaction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitConfig {
    /// Level of the data lines once the frame has been shifted out
    pub idle_value: u32,
}

impl TransmitConfig {
    /// All lines idle low
    #[must_use]
    pub const fn new() -> Self {
        Self { idle_value: 0 }
    }

    /// Set the idle value (masked to the bus width on submit)
    #[must_use]
    pub const fn with_idle_value(mut self, value: u32) -> Self {
        self.idle_value = value;
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
