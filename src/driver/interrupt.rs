//! Interrupt status handling for the PARL_IO transmitter.

use crate::internal::register::parlio::{INT_TX_EOF, INT_TX_FIFO_REMPTY};

/// Interrupt status flags parsed from the interrupt status register.
///
/// # Example
///
/// ```ignore
/// let status = peripheral.interrupt_status();
/// if status.tx_eof {
///     // Frame done
/// }
/// peripheral.clear_interrupt(status);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// Whole frame shifted out
    pub tx_eof: bool,
    /// TX FIFO ran empty
    pub tx_fifo_empty: bool,
}

impl InterruptStatus {
    /// Only the end-of-frame flag set
    pub const EOF: Self = Self {
        tx_eof: true,
        tx_fifo_empty: false,
    };

    /// Create from a raw register value
    #[inline]
    pub fn from_raw(status: u32) -> Self {
        Self {
            tx_eof: (status & INT_TX_EOF) != 0,
            tx_fifo_empty: (status & INT_TX_FIFO_REMPTY) != 0,
        }
    }

    /// Convert to raw value for clearing (write-1-to-clear)
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.tx_eof {
            val |= INT_TX_EOF;
        }
        if self.tx_fifo_empty {
            val |= INT_TX_FIFO_REMPTY;
        }
        val
    }

    /// Check if any interrupt is pending
    #[inline]
    pub fn any(&self) -> bool {
        self.tx_eof || self.tx_fifo_empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_decodes_eof() {
        let status = InterruptStatus::from_raw(INT_TX_EOF);
        assert!(status.tx_eof);
        assert!(!status.tx_fifo_empty);
        assert!(status.any());
    }

    #[test]
    fn raw_roundtrip() {
        let raw = INT_TX_EOF | INT_TX_FIFO_REMPTY;
        assert_eq!(InterruptStatus::from_raw(raw).to_raw(), raw);
    }

    #[test]
    fn unrelated_bits_ignored() {
        let status = InterruptStatus::from_raw(1 << 20);
        assert!(!status.any());
        assert_eq!(status.to_raw(), 0);
    }

    #[test]
    fn eof_constant() {
        assert_eq!(InterruptStatus::EOF.to_raw(), INT_TX_EOF);
        assert_eq!(InterruptStatus::default().to_raw(), 0);
    }
}
