//! Completion notification types.

use crate::hal::group::UnitId;

/// Lifecycle of one pool descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransStatus {
    /// In the ready queue
    #[default]
    Free,
    /// Submitted, waiting in the progress queue
    Queued,
    /// Owned by the hardware
    Running,
    /// Whole frame shifted out
    Done,
    /// Cut short by `disable()`; the frame may be partial
    Aborted,
}

/// Passed to the completion handler from interrupt context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxDoneEvent {
    /// Unit that finished the transaction
    pub unit: UnitId,
    /// Pool slot of the finished descriptor
    pub slot: usize,
    /// Bits transferred
    pub payload_bits: usize,
    /// Idle value now held on the bus
    pub idle_value: u32,
}

/// Completion handler invoked from the TX interrupt.
///
/// Runs in interrupt context: it must not block. User context is the
/// handler's own state. The return value is a reschedule hint that
/// [`TxUnit::handle_interrupt`](crate::TxUnit::handle_interrupt) forwards to
/// the ISR wrapper.
pub trait TxDoneHandler: Sync {
    /// One transaction finished.
    fn on_trans_done(&self, event: &TxDoneEvent) -> bool;
}

impl<F> TxDoneHandler for F
where
    F: Fn(&TxDoneEvent) -> bool + Sync,
{
    fn on_trans_done(&self, event: &TxDoneEvent) -> bool {
        self(event)
    }
}

/// What one `wait_all_done` call recycled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxSummary {
    /// Transactions that finished normally
    pub completed: usize,
    /// Transactions cut short by `disable()`
    pub aborted: usize,
}

impl TxSummary {
    /// Total descriptors recycled
    #[inline]
    pub const fn total(&self) -> usize {
        self.completed + self.aborted
    }

    pub(crate) fn record(&mut self, status: TransStatus) {
        if status == TransStatus::Aborted {
            self.aborted += 1;
        } else {
            self.completed += 1;
        }
    }
}
