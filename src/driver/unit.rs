//! PARL_IO TX unit: transaction scheduler.
//!
//! A unit owns a fixed pool of transaction descriptors and moves their
//! indices between three queues:
//!
//! ```text
//!            submit                start                 EOF isr
//!   ready ──────────► progress ──────────► running ──────────────► complete
//!     ▲                                       │ disable (Aborted)      │
//!     │                                       └───────────────────────►│
//!     └──────────── wait_all_done / submit (recycle) ◄─────────────────┘
//! ```
//!
//! Task context (`submit`, `enable`, `disable`, `wait_all_done`) and the
//! completion interrupt (`handle_interrupt`) share the unit through `&self`.
//! The [`TxFsm`] token decides which of them may run a hardware start or
//! stop sequence; queue hand-off goes through critical sections.

use core::sync::atomic::{AtomicUsize, Ordering};

use embedded_hal::delay::DelayNs;

use super::callback::{TransStatus, TxDoneEvent, TxDoneHandler, TxSummary};
use super::config::{TransmitConfig, TxUnitConfig};
use super::error::{ArgumentError, Error, Result, StateError};
use super::fsm::{TxFsm, TxState};
use super::interrupt::InterruptStatus;
use crate::hal::group::{TxUnitRegistry, UnitId};
use crate::hal::peripheral::{DmaChannel, PowerLock, TxPeripheral};
use crate::internal::constants::{
    BIT_GRANULAR_LENGTH, TX_READY_SPIN_LIMIT, WAIT_FOREVER, WAIT_POLL_INTERVAL_US,
};
use crate::internal::dma::DmaChain;
use crate::internal::queue::TransQueue;
#[cfg(feature = "async")]
use crate::sync::AtomicWaker;
use crate::sync::CriticalSectionCell;

// =============================================================================
// Transaction Descriptor
// =============================================================================

/// One pool entry.
#[derive(Clone, Copy)]
struct TransDesc<'d> {
    payload: &'d [u8],
    payload_bits: usize,
    idle_value: u32,
    status: TransStatus,
}

impl TransDesc<'_> {
    const EMPTY: Self = Self {
        payload: &[],
        payload_bits: 0,
        idle_value: 0,
        status: TransStatus::Free,
    };
}

/// Snapshot of where the pool descriptors currently are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueLengths {
    /// Free descriptors
    pub ready: usize,
    /// Submitted, not yet started
    pub progress: usize,
    /// Finished or aborted, not yet recycled
    pub complete: usize,
    /// 1 while a transaction is on the bus
    pub running: usize,
}

impl QueueLengths {
    /// Descriptors accounted for across all four places
    #[inline]
    pub const fn total(&self) -> usize {
        self.ready + self.progress + self.complete + self.running
    }
}

// =============================================================================
// TX Unit
// =============================================================================

/// PARL_IO transmit unit
///
/// # Type Parameters
/// * `P` - Register interface ([`ParlIoRegs`](crate::ParlIoRegs) on target)
/// * `D` - DMA channel ([`GdmaTxChannel`](crate::GdmaTxChannel) on target)
/// * `DEPTH` - Descriptor pool size and queue capacity
/// * `NODES` - DMA chain storage; `max_transfer_bytes` must fit in
///   `NODES * 4092` bytes
///
/// Payloads are borrowed for `'d`, the lifetime of the unit's collaborators,
/// so a buffer can never be freed while the DMA may still read it.
///
/// # Example
/// ```ignore
/// static FRAME: [u8; 64] = [0xA5; 64];
///
/// let unit: TxUnitDefault<'_, _, _> = TxUnit::new(
///     &config,
///     ParlIoRegs,
///     GdmaTxChannel::new(0).unwrap(),
///     &TX_UNITS,
///     &NoPowerLock,
/// )?;
/// unit.enable()?;
/// unit.submit(&FRAME, 512, &TransmitConfig::new())?;
///
/// // From the PARL_IO interrupt vector:
/// unit.handle_interrupt();
///
/// let summary = unit.wait_all_done(100, &mut delay)?;
/// ```
pub struct TxUnit<'d, P, D, const DEPTH: usize, const NODES: usize>
where
    P: TxPeripheral,
    D: DmaChannel,
{
    peripheral: P,
    dma: D,
    registry: &'d TxUnitRegistry,
    power: &'d dyn PowerLock,
    unit: UnitId,
    /// Transmit state token
    fsm: TxFsm,
    /// Buffer chain; only touched by the context holding `RunWait`
    chain: DmaChain<NODES>,
    pool: CriticalSectionCell<[TransDesc<'d>; DEPTH]>,
    ready: CriticalSectionCell<TransQueue<DEPTH>>,
    progress: CriticalSectionCell<TransQueue<DEPTH>>,
    complete: CriticalSectionCell<TransQueue<DEPTH>>,
    running: CriticalSectionCell<Option<usize>>,
    callback: CriticalSectionCell<Option<&'d dyn TxDoneHandler>>,
    /// Descriptors in progress + complete + running
    outstanding: AtomicUsize,
    depth: usize,
    data_width: usize,
    max_transfer_bits: usize,
    idle_mask: u32,
    output_hz: u32,
    #[cfg(feature = "async")]
    waker: AtomicWaker,
}

/// Two descriptors, one DMA node (4092 bytes)
pub type TxUnitSmall<'d, P, D> = TxUnit<'d, P, D, 2, 1>;

/// Four descriptors, four DMA nodes (16 KiB)
pub type TxUnitDefault<'d, P, D> = TxUnit<'d, P, D, 4, 4>;

/// Sixteen descriptors, enough nodes for a 65535-byte frame
pub type TxUnitLarge<'d, P, D> = TxUnit<'d, P, D, 16, 17>;

impl<'d, P, D, const DEPTH: usize, const NODES: usize> TxUnit<'d, P, D, DEPTH, NODES>
where
    P: TxPeripheral,
    D: DmaChannel,
{
    /// Validate `config`, claim a unit and program the hardware.
    ///
    /// The unit starts in `Init` with the EOF interrupt masked. On failure
    /// everything acquired so far is released again.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for any configuration violation
    /// - `ResourceExhausted(NoFreeUnit)` if the group has no free unit
    /// - `ResourceExhausted(ChainTooShort)` if `NODES` cannot hold
    ///   `max_transfer_bytes`
    /// - `ResourceExhausted(InterruptUnavailable)` if the interrupt is taken
    pub fn new(
        config: &TxUnitConfig,
        peripheral: P,
        dma: D,
        registry: &'d TxUnitRegistry,
        power: &'d dyn PowerLock,
    ) -> Result<Self> {
        let divider = config.validate(DEPTH)?;
        let unit = registry.acquire_unit(config.group)?;

        let mut chain = DmaChain::new();
        if let Err(e) = chain.init(config.max_transfer_bytes) {
            registry.release_unit(unit);
            return Err(e.into());
        }

        if let Err(e) = peripheral.bind_interrupt(unit) {
            registry.release_unit(unit);
            return Err(e.into());
        }

        let bus = config.bus();
        peripheral.configure_clock(config.clock.source, divider.divider);
        peripheral.route_gpio(&config.gpio, &bus);
        peripheral.configure_bus(&bus);
        peripheral.set_idle_value(0);
        peripheral.set_eof_interrupt(false);
        dma.reset();

        let depth = config.effective_depth(DEPTH);
        info!(
            "parlio tx unit {}:{} ready, {} lines @ {} Hz, depth {}",
            unit.group(),
            unit.index(),
            config.data_width,
            divider.actual_hz,
            depth
        );

        Ok(Self {
            peripheral,
            dma,
            registry,
            power,
            unit,
            fsm: TxFsm::new(),
            chain,
            pool: CriticalSectionCell::new([TransDesc::EMPTY; DEPTH]),
            ready: CriticalSectionCell::new(TransQueue::filled(depth)),
            progress: CriticalSectionCell::new(TransQueue::new()),
            complete: CriticalSectionCell::new(TransQueue::new()),
            running: CriticalSectionCell::new(None),
            callback: CriticalSectionCell::new(None),
            outstanding: AtomicUsize::new(0),
            depth,
            data_width: config.data_width,
            max_transfer_bits: config.max_transfer_bits(),
            idle_mask: config.idle_mask(),
            output_hz: divider.actual_hz,
            #[cfg(feature = "async")]
            waker: AtomicWaker::new(),
        })
    }

    /// Release the unit.
    ///
    /// # Errors
    ///
    /// Hands the unit back with `InvalidState(NotInInit)` unless it is
    /// disabled.
    pub fn delete(self) -> core::result::Result<(), (Self, Error)> {
        if self.fsm.load() != TxState::Init {
            return Err((self, StateError::NotInInit.into()));
        }
        drop(self);
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Unit identity inside its group
    #[inline(always)]
    pub fn unit_id(&self) -> UnitId {
        self.unit
    }

    /// Achieved output clock frequency
    #[inline(always)]
    pub fn output_clock_hz(&self) -> u32 {
        self.output_hz
    }

    /// Current transmit state
    #[inline(always)]
    pub fn state(&self) -> TxState {
        self.fsm.load()
    }

    /// Transactions submitted and not yet recycled
    #[inline(always)]
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Descriptors available for submission
    #[inline(always)]
    pub fn queue_depth(&self) -> usize {
        self.depth
    }

    /// Where the pool descriptors currently are.
    ///
    /// Each queue is sampled in its own critical section, so a snapshot
    /// taken while the interrupt is active may be off by one transaction.
    pub fn queue_lengths(&self) -> QueueLengths {
        QueueLengths {
            ready: self.ready.with_ref(TransQueue::len),
            progress: self.progress.with_ref(TransQueue::len),
            complete: self.complete.with_ref(TransQueue::len),
            running: usize::from(self.running.get().is_some()),
        }
    }

    /// Status of pool slot `slot`
    pub fn trans_status(&self, slot: usize) -> Option<TransStatus> {
        self.pool.with_ref(|pool| pool.get(slot).map(|desc| desc.status))
    }

    /// Static memory used by the descriptor pool and the DMA chain
    pub const fn memory_usage() -> usize {
        DmaChain::<NODES>::memory_usage() + DEPTH * core::mem::size_of::<TransDesc<'static>>()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Install the completion handler, or remove it with `None`.
    ///
    /// # Errors
    ///
    /// `InvalidState(NotInInit)` unless the unit is disabled.
    pub fn register_callback(&self, handler: Option<&'d dyn TxDoneHandler>) -> Result<()> {
        if self.fsm.load() != TxState::Init {
            return Err(StateError::NotInInit.into());
        }
        self.callback.replace(handler);
        Ok(())
    }

    /// Enable the unit and start the first queued transaction, if any.
    ///
    /// # Errors
    ///
    /// `InvalidState(AlreadyEnabled)` unless the unit is in `Init`.
    pub fn enable(&self) -> Result<()> {
        self.fsm
            .transition(TxState::Init, TxState::EnableWait)
            .map_err(|_| StateError::AlreadyEnabled)?;

        self.power.acquire();
        self.peripheral.set_eof_interrupt(true);
        self.fsm.settle(TxState::Enable);
        info!("parlio tx unit {} enabled", self.unit.index());

        self.try_start_next();
        Ok(())
    }

    /// Disable the unit.
    ///
    /// A transaction on the bus is cut short and moved to the complete queue
    /// as [`TransStatus::Aborted`]. Queued transactions stay queued for the
    /// next [`enable`](Self::enable).
    ///
    /// # Errors
    ///
    /// `InvalidState(NotEnabled)` unless the unit is enabled or running.
    pub fn disable(&self) -> Result<()> {
        let was_running = loop {
            match self.fsm.load() {
                TxState::Enable => {
                    if self
                        .fsm
                        .transition(TxState::Enable, TxState::InitWait)
                        .is_ok()
                    {
                        break false;
                    }
                }
                TxState::Run => {
                    if self.fsm.transition(TxState::Run, TxState::InitWait).is_ok() {
                        break true;
                    }
                }
                // The interrupt is mid-transition; it settles without waiting on us
                TxState::RunWait | TxState::EnableWait => core::hint::spin_loop(),
                TxState::Init | TxState::InitWait => return Err(StateError::NotEnabled.into()),
            }
        };

        self.dma.stop();
        self.peripheral.set_tx_start(false);
        self.peripheral.enable_clock_output(false);
        self.peripheral.set_eof_interrupt(false);
        self.peripheral.clear_interrupt(InterruptStatus::EOF);
        self.chain.release();

        if was_running && let Some(slot) = self.running.replace(None) {
            self.pool.with(|pool| pool[slot].status = TransStatus::Aborted);
            let pushed = self.complete.with(|q| q.push(slot));
            debug_assert!(pushed, "complete queue overflow");
            warn!("parlio tx transaction {} aborted by disable", slot);
        }

        self.power.release();
        self.fsm.settle(TxState::Init);
        info!("parlio tx unit {} disabled", self.unit.index());

        #[cfg(feature = "async")]
        self.waker.wake();
        Ok(())
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    /// Queue `payload_bits` bits of `payload` for transmission.
    ///
    /// Never blocks. Starts the transaction right away if the unit is
    /// enabled and idle; otherwise it waits in the progress queue.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a zero, misaligned or oversized bit length,
    ///   or a payload shorter than `payload_bits`
    /// - `NoFreeDescriptor` if every descriptor is in flight
    pub fn submit(
        &self,
        payload: &'d [u8],
        payload_bits: usize,
        config: &TransmitConfig,
    ) -> Result<()> {
        self.check_payload(payload, payload_bits)?;

        let slot = match self.ready.with(TransQueue::pop) {
            Some(slot) => slot,
            None => {
                let slot = self
                    .complete
                    .with(TransQueue::pop)
                    .ok_or(Error::NoFreeDescriptor)?;
                self.outstanding.fetch_sub(1, Ordering::AcqRel);
                trace!("recycled finished descriptor {}", slot);
                slot
            }
        };

        self.pool.with(|pool| {
            pool[slot] = TransDesc {
                payload,
                payload_bits,
                idle_value: config.idle_value & self.idle_mask,
                status: TransStatus::Queued,
            };
        });

        self.outstanding.fetch_add(1, Ordering::AcqRel);
        let pushed = self.progress.with(|q| q.push(slot));
        debug_assert!(pushed, "progress queue overflow");

        self.try_start_next();
        Ok(())
    }

    fn check_payload(&self, payload: &[u8], payload_bits: usize) -> Result<()> {
        if payload_bits == 0 {
            return Err(ArgumentError::EmptyPayload.into());
        }
        if payload_bits % self.data_width != 0 || (!BIT_GRANULAR_LENGTH && payload_bits % 8 != 0)
        {
            return Err(ArgumentError::MisalignedLength.into());
        }
        if payload_bits > self.max_transfer_bits {
            return Err(ArgumentError::TransferTooLarge.into());
        }
        if payload.len() * 8 < payload_bits {
            return Err(ArgumentError::PayloadTooShort.into());
        }
        Ok(())
    }

    /// Start the oldest queued transaction if the unit is enabled and idle.
    fn try_start_next(&self) {
        loop {
            if self
                .fsm
                .transition(TxState::Enable, TxState::RunWait)
                .is_err()
            {
                return;
            }

            if let Some(slot) = self.progress.with(TransQueue::pop) {
                self.start_transaction(slot);
                return;
            }

            self.fsm.settle(TxState::Enable);

            // A submit that lost the race against our RunWait left its entry behind
            if self.progress.with_ref(TransQueue::is_empty) {
                return;
            }
        }
    }

    /// Put `slot` on the bus. Caller holds `RunWait`.
    fn start_transaction(&self, slot: usize) {
        let desc = self.pool.with(|pool| {
            pool[slot].status = TransStatus::Running;
            pool[slot]
        });
        self.running.replace(Some(slot));

        let bytes = desc.payload_bits.div_ceil(8);
        let nodes = self.chain.mount(&desc.payload[..bytes]);
        trace!(
            "start transaction {}: {} bits over {} nodes",
            slot,
            desc.payload_bits,
            nodes
        );

        self.peripheral.reset_fifo();
        self.peripheral.reset_core_clock();
        self.peripheral.set_idle_value(desc.idle_value);
        self.peripheral.set_bit_length(desc.payload_bits as u32);
        self.dma.start(self.chain.head());

        let mut spins = 0u32;
        while !self.peripheral.is_tx_ready() {
            if spins >= TX_READY_SPIN_LIMIT {
                warn!("parlio tx fifo not ready, starting anyway");
                break;
            }
            spins += 1;
            core::hint::spin_loop();
        }

        // Published before the start bit so the EOF interrupt always sees Run
        self.fsm.settle(TxState::Run);
        self.peripheral.set_tx_start(true);
        self.peripheral.enable_clock_output(true);
    }

    // =========================================================================
    // Interrupt
    // =========================================================================

    /// Service the PARL_IO TX interrupt. Call from the interrupt vector.
    ///
    /// Completes the running transaction, runs the completion handler and
    /// starts the next queued transaction before returning, so frames
    /// queued back to back go out without a task round trip.
    ///
    /// Returns the OR of the handler's reschedule hints.
    pub fn handle_interrupt(&self) -> bool {
        let status = self.peripheral.interrupt_status();
        if !status.tx_eof {
            return false;
        }

        self.peripheral.clear_interrupt(status);
        self.peripheral.enable_clock_output(false);
        self.peripheral.set_tx_start(false);

        if self
            .fsm
            .transition(TxState::Run, TxState::EnableWait)
            .is_err()
        {
            // disable() got here first and owns the cleanup
            trace!("stale tx eof ignored");
            return false;
        }

        let mut hint = false;
        if let Some(slot) = self.running.replace(None) {
            let event = self.pool.with(|pool| {
                let desc = &mut pool[slot];
                desc.status = TransStatus::Done;
                TxDoneEvent {
                    unit: self.unit,
                    slot,
                    payload_bits: desc.payload_bits,
                    idle_value: desc.idle_value,
                }
            });
            let pushed = self.complete.with(|q| q.push(slot));
            debug_assert!(pushed, "complete queue overflow");
            trace!("transaction {} done", slot);

            if let Some(handler) = self.callback.get() {
                hint |= handler.on_trans_done(&event);
            }
        }

        self.fsm.settle(TxState::Enable);

        #[cfg(feature = "async")]
        self.waker.wake();

        self.try_start_next();
        hint
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Wait until every submitted transaction has finished and return all
    /// descriptors to the ready queue.
    ///
    /// Polls every 10 µs. A zero `timeout_ms` makes a single pass;
    /// [`WAIT_FOREVER`] disables the deadline. Descriptors recycled before a
    /// timeout stay recycled, so the call can simply be repeated.
    ///
    /// # Errors
    ///
    /// `Timeout` if transactions are still outstanding at the deadline.
    pub fn wait_all_done<W: DelayNs>(&self, timeout_ms: u32, delay: &mut W) -> Result<TxSummary> {
        let mut summary = TxSummary::default();
        let limit_us = u64::from(timeout_ms) * 1_000;
        let mut waited_us = 0u64;

        loop {
            self.drain_complete(&mut summary);
            if self.outstanding() == 0 {
                return Ok(summary);
            }
            if timeout_ms != WAIT_FOREVER && waited_us >= limit_us {
                debug!(
                    "wait_all_done timed out with {} outstanding",
                    self.outstanding()
                );
                return Err(Error::Timeout);
            }
            delay.delay_us(WAIT_POLL_INTERVAL_US);
            waited_us += u64::from(WAIT_POLL_INTERVAL_US);
        }
    }

    /// Async version of [`wait_all_done`](Self::wait_all_done) without a
    /// deadline, woken from [`handle_interrupt`](Self::handle_interrupt).
    #[cfg(feature = "async")]
    pub async fn wait_all_done_async(&self) -> TxSummary {
        let mut summary = TxSummary::default();
        core::future::poll_fn(|cx| {
            self.waker.register(cx.waker());
            self.drain_complete(&mut summary);
            if self.outstanding() == 0 {
                core::task::Poll::Ready(summary)
            } else {
                core::task::Poll::Pending
            }
        })
        .await
    }

    /// Move everything in the complete queue back to ready.
    fn drain_complete(&self, summary: &mut TxSummary) {
        while let Some(slot) = self.complete.with(TransQueue::pop) {
            let status = self.pool.with(|pool| {
                let status = pool[slot].status;
                pool[slot] = TransDesc::EMPTY;
                status
            });
            summary.record(status);
            self.outstanding.fetch_sub(1, Ordering::AcqRel);
            let pushed = self.ready.with(|q| q.push(slot));
            debug_assert!(pushed, "ready queue overflow");
        }
    }
}

impl<P, D, const DEPTH: usize, const NODES: usize> Drop for TxUnit<'_, P, D, DEPTH, NODES>
where
    P: TxPeripheral,
    D: DmaChannel,
{
    fn drop(&mut self) {
        let state = self.fsm.load();
        if matches!(state, TxState::Enable | TxState::Run)
            && self.fsm.transition(state, TxState::InitWait).is_ok()
        {
            // No DMA read may outlive the payload borrows
            self.dma.stop();
            self.peripheral.set_tx_start(false);
            self.peripheral.enable_clock_output(false);
            self.peripheral.set_eof_interrupt(false);
            self.chain.release();
            self.power.release();
            self.fsm.settle(TxState::Init);
        }
        self.peripheral.unbind_interrupt();
        self.registry.release_unit(self.unit);
        debug!("parlio tx unit {} released", self.unit.index());
    }
}

// =============================================================================
// Tests
// =============================================================================
