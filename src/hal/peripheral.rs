//! Collaborator interfaces of a TX unit.
//!
//! The driver core never touches MMIO directly. It talks to the register
//! block through [`TxPeripheral`], to the DMA engine through
//! [`DmaChannel`] and to power management through [`PowerLock`], so the
//! scheduler can run against mocks on the host.

use crate::driver::config::BusConfig;
use crate::driver::error::ResourceError;
use crate::driver::interrupt::InterruptStatus;
use crate::hal::clock::ClockSource;
use crate::hal::gpio::GpioConfig;
use crate::hal::group::UnitId;
use crate::internal::dma::TxDescriptor;

/// Register interface of one PARL_IO transmitter.
///
/// Register writes cannot fail. Methods take `&self` because the same unit
/// is driven from task context and from the completion interrupt; the
/// transmit state machine guarantees only one of them issues a register
/// sequence at a time.
pub trait TxPeripheral {
    /// Program bus width, sample edge, bit order, valid line and gating.
    fn configure_bus(&self, bus: &BusConfig);

    /// Select the clock source and integer divider. The output clock stays
    /// disabled until [`enable_clock_output`](Self::enable_clock_output).
    fn configure_clock(&self, source: ClockSource, divider: u32);

    /// Route data, clock and valid signals to their pads.
    fn route_gpio(&self, gpio: &GpioConfig, bus: &BusConfig);

    /// Flush the TX FIFO.
    fn reset_fifo(&self);

    /// Reset the TX core clock domain.
    fn reset_core_clock(&self);

    /// Level held on the data lines while no frame is shifting.
    fn set_idle_value(&self, value: u32);

    /// Number of bits in the next frame.
    fn set_bit_length(&self, bits: u32);

    /// Assert or deassert the transmit start bit.
    fn set_tx_start(&self, on: bool);

    /// Gate the output clock.
    fn enable_clock_output(&self, on: bool);

    /// True once the DMA has staged data in the TX FIFO.
    fn is_tx_ready(&self) -> bool;

    /// Unmask or mask the end-of-frame interrupt.
    fn set_eof_interrupt(&self, on: bool);

    /// Pending (masked) interrupt sources.
    fn interrupt_status(&self) -> InterruptStatus;

    /// Acknowledge interrupt sources.
    fn clear_interrupt(&self, status: InterruptStatus);

    /// Reserve the interrupt source for `unit`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::InterruptUnavailable`] if the source is already held.
    fn bind_interrupt(&self, unit: UnitId) -> Result<(), ResourceError>;

    /// Release the interrupt source and mask it.
    fn unbind_interrupt(&self);
}

/// OUT direction of a DMA channel feeding the TX FIFO.
pub trait DmaChannel {
    /// Start walking the descriptor chain at `head`.
    fn start(&self, head: *const TxDescriptor);

    /// Stop the channel, abandoning the current chain.
    fn stop(&self);

    /// Reset the channel state machine.
    fn reset(&self);
}

/// Power management lock held while a unit is enabled.
///
/// Keeps the clock source from being gated by light sleep.
pub trait PowerLock: Sync {
    /// Take the lock.
    fn acquire(&self);

    /// Release the lock.
    fn release(&self);
}

/// Power lock for platforms without power gating.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPowerLock;

impl PowerLock for NoPowerLock {
    #[inline(always)]
    fn acquire(&self) {}

    #[inline(always)]
    fn release(&self) {}
}

impl<T: TxPeripheral + ?Sized> TxPeripheral for &T {
    fn configure_bus(&self, bus: &BusConfig) {
        (**self).configure_bus(bus);
    }
    fn configure_clock(&self, source: ClockSource, divider: u32) {
        (**self).configure_clock(source, divider);
    }
    fn route_gpio(&self, gpio: &GpioConfig, bus: &BusConfig) {
        (**self).route_gpio(gpio, bus);
    }
    fn reset_fifo(&self) {
        (**self).reset_fifo();
    }
    fn reset_core_clock(&self) {
        (**self).reset_core_clock();
    }
    fn set_idle_value(&self, value: u32) {
        (**self).set_idle_value(value);
    }
    fn set_bit_length(&self, bits: u32) {
        (**self).set_bit_length(bits);
    }
    fn set_tx_start(&self, on: bool) {
        (**self).set_tx_start(on);
    }
    fn enable_clock_output(&self, on: bool) {
        (**self).enable_clock_output(on);
    }
    fn is_tx_ready(&self) -> bool {
        (**self).is_tx_ready()
    }
    fn set_eof_interrupt(&self, on: bool) {
        (**self).set_eof_interrupt(on);
    }
    fn interrupt_status(&self) -> InterruptStatus {
        (**self).interrupt_status()
    }
    fn clear_interrupt(&self, status: InterruptStatus) {
        (**self).clear_interrupt(status);
    }
    fn bind_interrupt(&self, unit: UnitId) -> Result<(), ResourceError> {
        (**self).bind_interrupt(unit)
    }
    fn unbind_interrupt(&self) {
        (**self).unbind_interrupt();
    }
}

impl<T: DmaChannel + ?Sized> DmaChannel for &T {
    fn start(&self, head: *const TxDescriptor) {
        (**self).start(head);
    }
    fn stop(&self) {
        (**self).stop();
    }
    fn reset(&self) {
        (**self).reset();
    }
}
