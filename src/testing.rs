//! Test Utilities
//!
//! Mock collaborators for exercising the transmit scheduler on the host.
//! Every mock is `Sync` so a unit built on them can be shared with a second
//! thread standing in for the interrupt handler.
//!
//! # Example
//!
//! ```ignore
//! let peripheral = MockPeripheral::new();
//! let dma = MockDma::new();
//! let registry = TxUnitRegistry::new();
//! let unit: TxUnit<'_, _, _, 2, 1> =
//!     TxUnit::new(&config, &peripheral, &dma, &registry, &NoPowerLock)?;
//!
//! unit.enable()?;
//! unit.submit(&frame, 64, &TransmitConfig::new())?;
//! assert!(peripheral.eof_pending());
//! unit.handle_interrupt();
//! ```

#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::vec::Vec;

use crate::driver::config::BusConfig;
use crate::driver::error::ResourceError;
use crate::driver::interrupt::InterruptStatus;
use crate::hal::clock::ClockSource;
use crate::hal::gpio::GpioConfig;
use crate::hal::group::UnitId;
use crate::hal::peripheral::{DmaChannel, PowerLock, TxPeripheral};
use crate::internal::dma::TxDescriptor;

// =============================================================================
// Mock Peripheral
// =============================================================================

/// Register-level operations seen by [`MockPeripheral`], in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwEvent {
    /// `reset_fifo`
    FifoReset,
    /// `reset_core_clock`
    CoreClockReset,
    /// `set_idle_value`
    IdleValue(u32),
    /// `set_bit_length`
    BitLength(u32),
    /// `set_tx_start`
    TxStart(bool),
    /// `enable_clock_output`
    ClockOutput(bool),
    /// `set_eof_interrupt`
    EofInterrupt(bool),
}

/// In-memory stand-in for the PARL_IO register block.
///
/// Enabling the output clock "transmits" the frame immediately: the EOF
/// interrupt becomes pending.
#[derive(Debug, Default)]
pub struct MockPeripheral {
    events: Mutex<Vec<HwEvent>>,
    bus: Mutex<Option<BusConfig>>,
    clock: Mutex<Option<(ClockSource, u32)>>,
    gpio: Mutex<Option<GpioConfig>>,
    idle_value: AtomicU32,
    bit_length: AtomicU32,
    tx_start: AtomicBool,
    clock_output: AtomicBool,
    eof_enabled: AtomicBool,
    eof_pending: AtomicBool,
    tx_not_ready: AtomicBool,
    bound: AtomicBool,
    fail_bind: AtomicBool,
    frames: AtomicUsize,
}

impl MockPeripheral {
    /// Fresh register block with the TX FIFO always ready
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `bind_interrupt` fail
    pub fn failing_bind() -> Self {
        let mock = Self::new();
        mock.fail_bind.store(true, Ordering::SeqCst);
        mock
    }

    /// Keep `is_tx_ready` false
    pub fn set_tx_ready(&self, ready: bool) {
        self.tx_not_ready.store(!ready, Ordering::SeqCst);
    }

    /// Register operations recorded so far
    pub fn events(&self) -> Vec<HwEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Forget recorded register operations
    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Last bus configuration
    pub fn bus(&self) -> Option<BusConfig> {
        *self.bus.lock().unwrap()
    }

    /// Last clock configuration
    pub fn clock(&self) -> Option<(ClockSource, u32)> {
        *self.clock.lock().unwrap()
    }

    /// Last routed pad assignment
    pub fn gpio(&self) -> Option<GpioConfig> {
        *self.gpio.lock().unwrap()
    }

    /// Current idle value register
    pub fn idle_value(&self) -> u32 {
        self.idle_value.load(Ordering::SeqCst)
    }

    /// Current bit length register
    pub fn bit_length(&self) -> u32 {
        self.bit_length.load(Ordering::SeqCst)
    }

    /// Start bit state
    pub fn tx_started(&self) -> bool {
        self.tx_start.load(Ordering::SeqCst)
    }

    /// Output clock state
    pub fn clock_running(&self) -> bool {
        self.clock_output.load(Ordering::SeqCst)
    }

    /// EOF interrupt unmasked
    pub fn eof_enabled(&self) -> bool {
        self.eof_enabled.load(Ordering::SeqCst)
    }

    /// EOF raised and not yet cleared
    pub fn eof_pending(&self) -> bool {
        self.eof_pending.load(Ordering::SeqCst)
    }

    /// Raise EOF by hand (spurious or stale interrupt)
    pub fn raise_eof(&self) {
        self.eof_pending.store(true, Ordering::SeqCst);
    }

    /// Interrupt source currently held
    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::SeqCst)
    }

    /// Frames shifted out (output clock enabled)
    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }

    fn record(&self, event: HwEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl TxPeripheral for MockPeripheral {
    fn configure_bus(&self, bus: &BusConfig) {
        *self.bus.lock().unwrap() = Some(*bus);
    }

    fn configure_clock(&self, source: ClockSource, divider: u32) {
        *self.clock.lock().unwrap() = Some((source, divider));
    }

    fn route_gpio(&self, gpio: &GpioConfig, _bus: &BusConfig) {
        *self.gpio.lock().unwrap() = Some(*gpio);
    }

    fn reset_fifo(&self) {
        self.record(HwEvent::FifoReset);
    }

    fn reset_core_clock(&self) {
        self.record(HwEvent::CoreClockReset);
    }

    fn set_idle_value(&self, value: u32) {
        self.idle_value.store(value, Ordering::SeqCst);
        self.record(HwEvent::IdleValue(value));
    }

    fn set_bit_length(&self, bits: u32) {
        self.bit_length.store(bits, Ordering::SeqCst);
        self.record(HwEvent::BitLength(bits));
    }

    fn set_tx_start(&self, on: bool) {
        self.tx_start.store(on, Ordering::SeqCst);
        self.record(HwEvent::TxStart(on));
    }

    fn enable_clock_output(&self, on: bool) {
        self.record(HwEvent::ClockOutput(on));
        self.clock_output.store(on, Ordering::SeqCst);
        if on {
            self.frames.fetch_add(1, Ordering::SeqCst);
            self.eof_pending.store(true, Ordering::SeqCst);
        }
    }

    fn is_tx_ready(&self) -> bool {
        !self.tx_not_ready.load(Ordering::SeqCst)
    }

    fn set_eof_interrupt(&self, on: bool) {
        self.eof_enabled.store(on, Ordering::SeqCst);
        self.record(HwEvent::EofInterrupt(on));
    }

    fn interrupt_status(&self) -> InterruptStatus {
        InterruptStatus {
            tx_eof: self.eof_pending.load(Ordering::SeqCst),
            tx_fifo_empty: false,
        }
    }

    fn clear_interrupt(&self, status: InterruptStatus) {
        if status.tx_eof {
            self.eof_pending.store(false, Ordering::SeqCst);
        }
    }

    fn bind_interrupt(&self, _unit: UnitId) -> Result<(), ResourceError> {
        if self.fail_bind.load(Ordering::SeqCst) || self.bound.swap(true, Ordering::SeqCst) {
            return Err(ResourceError::InterruptUnavailable);
        }
        Ok(())
    }

    fn unbind_interrupt(&self) {
        self.eof_enabled.store(false, Ordering::SeqCst);
        self.bound.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Mock DMA
// =============================================================================

/// One chain handed to [`MockDma::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaTransfer {
    /// Buffer address of the head node (identifies the payload)
    pub buffer: usize,
    /// Nodes walked up to and including the EOF node
    pub nodes: usize,
    /// Bytes across all walked nodes
    pub bytes: usize,
    /// Every walked node was DMA-owned and the last one carried EOF
    pub well_formed: bool,
}

/// DMA channel that walks the chain it is given and records it.
#[derive(Debug, Default)]
pub struct MockDma {
    transfers: Mutex<Vec<DmaTransfer>>,
    stops: AtomicUsize,
    resets: AtomicUsize,
}

impl MockDma {
    /// Fresh channel
    pub fn new() -> Self {
        Self::default()
    }

    /// Chains started so far
    pub fn transfers(&self) -> Vec<DmaTransfer> {
        self.transfers.lock().unwrap().clone()
    }

    /// Number of chains started
    pub fn starts(&self) -> usize {
        self.transfers.lock().unwrap().len()
    }

    /// Number of `stop` calls
    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Number of `reset` calls
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl DmaChannel for MockDma {
    fn start(&self, head: *const TxDescriptor) {
        let mut transfer = DmaTransfer {
            buffer: 0,
            nodes: 0,
            bytes: 0,
            well_formed: true,
        };

        let mut node = head;
        while !node.is_null() {
            // SAFETY: the chain lives inside the unit that started it
            let desc = unsafe { &*node };
            if transfer.nodes == 0 {
                transfer.buffer = desc.buffer_addr() as usize;
            }
            transfer.nodes += 1;
            transfer.bytes += desc.length();
            transfer.well_formed &= desc.is_owned();
            if desc.is_eof() {
                break;
            }
            node = desc.next_desc();
        }
        // SAFETY: as above; null only if the walk ran off the end
        transfer.well_formed &= !node.is_null() && unsafe { (*node).is_eof() };

        self.transfers.lock().unwrap().push(transfer);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Mock Power Lock
// =============================================================================

/// Power lock that counts acquire/release calls.
#[derive(Debug, Default)]
pub struct MockPowerLock {
    acquires: AtomicUsize,
    releases: AtomicUsize,
}

impl MockPowerLock {
    /// Fresh lock
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `acquire` calls
    pub fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    /// Number of `release` calls
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// True while acquired more often than released
    pub fn is_held(&self) -> bool {
        self.acquires() > self.releases()
    }
}

impl PowerLock for MockPowerLock {
    fn acquire(&self) {
        self.acquires.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Delay that only accumulates the requested time.
///
/// Yields the thread on each call so a spinning waiter lets a concurrent
/// "interrupt" thread make progress.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: u64,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        std::thread::yield_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::dma::DmaChain;

    #[test]
    fn clock_enable_raises_eof() {
        let mock = MockPeripheral::new();
        mock.set_tx_start(true);
        assert!(!mock.eof_pending());

        mock.enable_clock_output(true);
        assert!(mock.eof_pending());
        assert_eq!(mock.frames(), 1);
        assert_eq!(
            mock.events(),
            [HwEvent::TxStart(true), HwEvent::ClockOutput(true)]
        );

        mock.clear_interrupt(InterruptStatus::EOF);
        assert!(!mock.eof_pending());
    }

    #[test]
    fn bind_is_exclusive() {
        let mock = MockPeripheral::new();
        let registry: crate::hal::UnitRegistry<1, 1> = crate::hal::UnitRegistry::new();
        let unit = registry.acquire_unit(0).unwrap();

        assert_eq!(mock.bind_interrupt(unit), Ok(()));
        assert_eq!(
            mock.bind_interrupt(unit),
            Err(ResourceError::InterruptUnavailable)
        );
        mock.unbind_interrupt();
        assert_eq!(mock.bind_interrupt(unit), Ok(()));
        assert!(MockPeripheral::failing_bind().bind_interrupt(unit).is_err());
    }

    #[test]
    fn dma_walks_mounted_chain() {
        let mut chain: DmaChain<3> = DmaChain::new();
        chain.init(9000).unwrap();
        let payload = [0u8; 9000];
        chain.mount(&payload);

        let dma = MockDma::new();
        dma.start(chain.head());

        let transfer = dma.transfers()[0];
        assert_eq!(transfer.nodes, 3);
        assert_eq!(transfer.bytes, 9000);
        assert_eq!(transfer.buffer, payload.as_ptr() as usize);
        assert!(transfer.well_formed);
    }

    #[test]
    fn power_lock_counts() {
        let lock = MockPowerLock::new();
        lock.acquire();
        assert!(lock.is_held());
        lock.release();
        assert!(!lock.is_held());
        assert_eq!((lock.acquires(), lock.releases()), (1, 1));
    }

    #[test]
    fn delay_accumulates() {
        use embedded_hal::delay::DelayNs;
        let mut delay = MockDelay::new();
        delay.delay_us(10);
        delay.delay_ms(1);
        assert_eq!(delay.total_us(), 1_010);
    }
}
