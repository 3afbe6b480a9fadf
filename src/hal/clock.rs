//! Clock Configuration HAL
//!
//! Source selection and integer divider arithmetic for the TX output clock.
//! The register side lives behind [`TxPeripheral::configure_clock`].
//!
//! [`TxPeripheral::configure_clock`]: crate::hal::peripheral::TxPeripheral::configure_clock

use crate::driver::error::ArgumentError;
use crate::internal::constants::{
    DEFAULT_OUTPUT_CLK_HZ, MAX_CLOCK_DIVIDER, PLL_CLK_HZ, RC_FAST_CLK_HZ, XTAL_CLK_HZ,
};

/// Clock feeding the TX divider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// 40 MHz crystal
    Xtal,
    /// 240 MHz PLL output
    #[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
    #[default]
    PllF240m,
    /// 160 MHz PLL output
    #[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
    #[default]
    PllF160m,
    /// Internal fast RC oscillator
    RcFast,
    /// Clock supplied on the clock input pin
    External {
        /// Frequency of the external clock
        freq_hz: u32,
    },
}

impl ClockSource {
    /// Frequency of the source in Hz.
    #[must_use]
    pub const fn freq_hz(&self) -> u32 {
        match self {
            ClockSource::Xtal => XTAL_CLK_HZ,
            #[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
            ClockSource::PllF240m => PLL_CLK_HZ,
            #[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
            ClockSource::PllF160m => PLL_CLK_HZ,
            ClockSource::RcFast => RC_FAST_CLK_HZ,
            ClockSource::External { freq_hz } => *freq_hz,
        }
    }

    /// True when the source needs the clock input pin.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self, ClockSource::External { .. })
    }
}

/// Requested TX clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Source feeding the divider
    pub source: ClockSource,
    /// Requested output frequency
    pub output_hz: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockConfig {
    /// Default PLL source at [`DEFAULT_OUTPUT_CLK_HZ`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
            source: ClockSource::PllF240m,
            #[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
            source: ClockSource::PllF160m,
            output_hz: DEFAULT_OUTPUT_CLK_HZ,
        }
    }

    /// Set the clock source
    #[must_use]
    pub const fn with_source(mut self, source: ClockSource) -> Self {
        self.source = source;
        self
    }

    /// Set the requested output frequency
    #[must_use]
    pub const fn with_output_hz(mut self, hz: u32) -> Self {
        self.output_hz = hz;
        self
    }

    /// Compute the divider for this configuration.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::ClockUnreachable`] when the frequency cannot be
    /// derived from the source.
    pub fn divider(&self) -> Result<ClockDivider, ArgumentError> {
        ClockDivider::compute(self.source.freq_hz(), self.output_hz)
    }
}

/// Integer clock divider and the frequency it achieves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivider {
    /// Divider, `1..=MAX_CLOCK_DIVIDER`
    pub divider: u32,
    /// `source / divider`
    pub actual_hz: u32,
}

impl ClockDivider {
    /// Round `source_hz / target_hz` to the nearest integer divider.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::ClockUnreachable`] if either frequency is zero, the
    /// target exceeds the source or the divider overflows
    /// [`MAX_CLOCK_DIVIDER`].
    pub fn compute(source_hz: u32, target_hz: u32) -> Result<Self, ArgumentError> {
        if source_hz == 0 || target_hz == 0 || target_hz > source_hz {
            return Err(ArgumentError::ClockUnreachable);
        }

        let source = u64::from(source_hz);
        let target = u64::from(target_hz);
        let divider = ((source + target / 2) / target).max(1);
        if divider > u64::from(MAX_CLOCK_DIVIDER) {
            return Err(ArgumentError::ClockUnreachable);
        }

        let divider = divider as u32;
        Ok(Self {
            divider,
            actual_hz: source_hz / divider,
        })
    }
}
