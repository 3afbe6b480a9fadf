//! GPIO Assignment
//!
//! Logical TX signals and the pads they are routed to through the GPIO
//! matrix. Every signal can land on any pad below [`GPIO_COUNT`].
//!
//! | Signal     | Lines | Direction | Required                         |
//! |------------|-------|-----------|----------------------------------|
//! | DATA[n]    | 0..16 | Output    | first `data_width` lines         |
//! | CLK_OUT    | 1     | Output    | no                               |
//! | CLK_IN     | 1     | Input     | with an external clock source    |
//! | VALID      | 1     | Output    | no (occupies the top data line)  |

use crate::driver::error::ArgumentError;
use crate::internal::constants::{GPIO_COUNT, MAX_DATA_WIDTH};

/// Pads assigned to the TX signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioConfig {
    /// Data line pads, index = line number
    pub data: [Option<u8>; MAX_DATA_WIDTH],
    /// Clock output pad
    pub clk_out: Option<u8>,
    /// Clock input pad (external clock source)
    pub clk_in: Option<u8>,
    /// Valid signal pad
    pub valid: Option<u8>,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioConfig {
    /// Nothing assigned
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: [None; MAX_DATA_WIDTH],
            clk_out: None,
            clk_in: None,
            valid: None,
        }
    }

    /// Assign data line `line` to `gpio`. Lines past the bus maximum are
    /// ignored.
    #[must_use]
    pub const fn with_data_pin(mut self, line: usize, gpio: u8) -> Self {
        if line < MAX_DATA_WIDTH {
            self.data[line] = Some(gpio);
        }
        self
    }

    /// Assign consecutive data lines starting at line 0.
    #[must_use]
    pub const fn with_data_pins(mut self, gpios: &[u8]) -> Self {
        let mut i = 0;
        while i < gpios.len() && i < MAX_DATA_WIDTH {
            self.data[i] = Some(gpios[i]);
            i += 1;
        }
        self
    }

    /// Assign the clock output pad
    #[must_use]
    pub const fn with_clk_out(mut self, gpio: u8) -> Self {
        self.clk_out = Some(gpio);
        self
    }

    /// Assign the clock input pad
    #[must_use]
    pub const fn with_clk_in(mut self, gpio: u8) -> Self {
        self.clk_in = Some(gpio);
        self
    }

    /// Assign the valid signal pad
    #[must_use]
    pub const fn with_valid(mut self, gpio: u8) -> Self {
        self.valid = Some(gpio);
        self
    }

    /// True when a valid signal pad is assigned.
    #[must_use]
    pub const fn has_valid(&self) -> bool {
        self.valid.is_some()
    }

    /// `(line, pad)` pairs of the first `width` data lines that are assigned.
    pub fn data_pins(&self, width: usize) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.data
            .iter()
            .take(width)
            .enumerate()
            .filter_map(|(line, pin)| pin.map(|p| (line, p)))
    }

    /// Check the assignment for a bus of `width` lines.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::InvalidGpio`] if a used data line is unassigned,
    /// a pad is out of range, a pad is used twice or `needs_clk_in` is set
    /// without a clock input pad.
    pub fn validate(&self, width: usize, needs_clk_in: bool) -> Result<(), ArgumentError> {
        if width > MAX_DATA_WIDTH || self.data[..width].iter().any(Option::is_none) {
            return Err(ArgumentError::InvalidGpio);
        }
        if needs_clk_in && self.clk_in.is_none() {
            return Err(ArgumentError::InvalidGpio);
        }

        let mut used: u64 = 0;
        let signals = self.data[..width]
            .iter()
            .chain([&self.clk_out, &self.clk_in, &self.valid]);
        for pin in signals.flatten() {
            if *pin >= GPIO_COUNT {
                return Err(ArgumentError::InvalidGpio);
            }
            let bit = 1u64 << *pin;
            if used & bit != 0 {
                return Err(ArgumentError::InvalidGpio);
            }
            used |= bit;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;

    #[test]
    fn eight_line_bus_is_valid() {
        let gpio = GpioConfig::new()
            .with_data_pins(&[0, 1, 2, 3, 4, 5, 6, 7])
            .with_clk_out(8);
        assert_eq!(gpio.validate(8, false), Ok(()));
    }

    #[test]
    fn missing_data_line_rejected() {
        let gpio = GpioConfig::new().with_data_pins(&[0, 1, 2]);
        assert_eq!(gpio.validate(4, false), Err(ArgumentError::InvalidGpio));
        assert_eq!(gpio.validate(2, false), Ok(()));
    }

    #[test]
    fn duplicate_pad_rejected() {
        let gpio = GpioConfig::new().with_data_pins(&[3, 4]).with_clk_out(4);
        assert_eq!(gpio.validate(2, false), Err(ArgumentError::InvalidGpio));
    }

    #[test]
    fn unused_lines_are_not_checked_for_duplicates() {
        let gpio = GpioConfig::new()
            .with_data_pins(&[1, 2, 5, 5])
            .with_clk_out(9);
        assert_eq!(gpio.validate(2, false), Ok(()));
    }

    #[test]
    fn out_of_range_pad_rejected() {
        let gpio = GpioConfig::new().with_data_pin(0, GPIO_COUNT);
        assert_eq!(gpio.validate(1, false), Err(ArgumentError::InvalidGpio));
    }

    #[test]
    fn external_clock_needs_input_pad() {
        let gpio = GpioConfig::new().with_data_pin(0, 1);
        assert_eq!(gpio.validate(1, true), Err(ArgumentError::InvalidGpio));
        assert_eq!(gpio.with_clk_in(2).validate(1, true), Ok(()));
    }

    #[test]
    fn data_pins_limits_to_width() {
        let gpio = GpioConfig::new().with_data_pins(&[10, 11, 12, 13]);
        let pins: Vec<_> = gpio.data_pins(2).collect();
        assert_eq!(pins, [(0, 10), (1, 11)]);
    }

    #[test]
    fn with_data_pin_ignores_out_of_range_line() {
        let gpio = GpioConfig::new().with_data_pin(MAX_DATA_WIDTH, 3);
        assert_eq!(gpio, GpioConfig::new());
        assert!(!gpio.has_valid());
        assert!(gpio.with_valid(4).has_valid());
    }
}
