//! Transmit state machine shared by task and interrupt context.
//!
//! One atomic token per unit. Every transition is a compare-and-swap from the
//! expected state into a `*Wait` state, followed by a plain store of the
//! final state once the hardware sequence is done. A competitor whose CAS
//! fails knows the other context owns the transition and backs off.
//!
//! ```text
//!            enable                         submit / isr
//!   Init ─────────► EnableWait ─► Enable ─────────────► RunWait ─► Run
//!    ▲                              ▲  ▲                   │        │
//!    │                              │  └── queue empty ────┘        │
//!    │                              └──── EnableWait ◄── isr (EOF) ─┘
//!    └──── InitWait ◄── disable (from Enable or Run)
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Transmit state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TxState {
    /// Disabled; configuration and deletion allowed
    #[default]
    Init = 0,
    /// `enable()` in progress
    EnableWait = 1,
    /// Enabled and idle
    Enable = 2,
    /// A context is starting a transaction
    RunWait = 3,
    /// A transaction is on the bus
    Run = 4,
    /// `disable()` in progress
    InitWait = 5,
}

impl TxState {
    /// Decode a raw token. Unknown values map to `Init`.
    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => TxState::EnableWait,
            2 => TxState::Enable,
            3 => TxState::RunWait,
            4 => TxState::Run,
            5 => TxState::InitWait,
            _ => TxState::Init,
        }
    }

    /// True for the transient `*Wait` states.
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            TxState::EnableWait | TxState::RunWait | TxState::InitWait
        )
    }

    /// True when `self -> next` is an edge of the state graph.
    pub const fn can_transition_to(&self, next: TxState) -> bool {
        matches!(
            (self, next),
            (TxState::Init, TxState::EnableWait)
                | (TxState::EnableWait, TxState::Enable)
                | (TxState::Enable, TxState::RunWait)
                | (TxState::Enable, TxState::InitWait)
                | (TxState::RunWait, TxState::Run)
                | (TxState::RunWait, TxState::Enable)
                | (TxState::Run, TxState::EnableWait)
                | (TxState::Run, TxState::InitWait)
                | (TxState::InitWait, TxState::Init)
        )
    }
}

/// Atomic holder of a [`TxState`].
pub struct TxFsm {
    state: AtomicU8,
}

impl TxFsm {
    /// Start in `Init` (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(TxState::Init as u8),
        }
    }

    /// Current state
    #[inline]
    pub fn load(&self) -> TxState {
        TxState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Move `from -> to` if the token still holds `from`.
    ///
    /// Returns the state actually observed on failure.
    #[inline]
    pub fn transition(&self, from: TxState, to: TxState) -> Result<(), TxState> {
        debug_assert!(from.can_transition_to(to));
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(TxState::from_raw)
    }

    /// Finish a transition owned by the caller.
    ///
    /// Only the context that won the CAS into the current `*Wait` state may
    /// settle, so the load below cannot race.
    #[inline]
    pub fn settle(&self, to: TxState) {
        debug_assert!(
            self.load().can_transition_to(to),
            "illegal settle {:?} -> {:?}",
            self.load(),
            to
        );
        self.state.store(to as u8, Ordering::Release);
    }
}

impl Default for TxFsm {
    fn default() -> Self {
        Self::new()
    }
}
