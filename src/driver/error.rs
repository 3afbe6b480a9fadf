//! Error types for the PARL_IO transmit driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ArgumentError`]: rejected parameters (construction or submission)
//! - [`StateError`]: transmit state machine preconditions
//! - [`ResourceError`]: hardware unit, buffer chain or interrupt exhaustion
//!
//! The unified [`Error`] enum wraps them together with the queue and timeout
//! failures, and [`Error::kind`] collapses every error onto [`ErrorKind`].

// =============================================================================
// Argument Errors
// =============================================================================

/// Invalid argument errors
///
/// Always detected synchronously, before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgumentError {
    /// Payload bit length is zero
    EmptyPayload,
    /// Payload bit length is not a multiple of the bus width
    MisalignedLength,
    /// Payload bit length exceeds the configured maximum transfer size
    TransferTooLarge,
    /// Payload slice is shorter than the requested bit length
    PayloadTooShort,
    /// Bus width is not a supported power of two
    InvalidDataWidth,
    /// Valid signal requested but every data line is already in use
    ValidLineConflict,
    /// Clock gating requested without a valid line
    GatingWithoutValid,
    /// Maximum transfer size is zero or exceeds the per-frame hardware limit
    InvalidTransferSize,
    /// Queue depth is zero or exceeds the pool capacity
    InvalidQueueDepth,
    /// Requested output clock cannot be derived from the clock source
    ClockUnreachable,
    /// GPIO assignment is incomplete, out of range or duplicated
    InvalidGpio,
    /// Group index does not exist
    InvalidGroup,
}

impl core::fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ArgumentError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ArgumentError::EmptyPayload => "payload bit length is zero",
            ArgumentError::MisalignedLength => "payload bit length must align to bus width",
            ArgumentError::TransferTooLarge => "payload bit length too large",
            ArgumentError::PayloadTooShort => "payload shorter than bit length",
            ArgumentError::InvalidDataWidth => "invalid data width",
            ArgumentError::ValidLineConflict => "no data line left for the valid signal",
            ArgumentError::GatingWithoutValid => "clock gating requires a valid line",
            ArgumentError::InvalidTransferSize => "invalid max transfer size",
            ArgumentError::InvalidQueueDepth => "invalid queue depth",
            ArgumentError::ClockUnreachable => "output clock unreachable",
            ArgumentError::InvalidGpio => "invalid GPIO assignment",
            ArgumentError::InvalidGroup => "invalid group",
        }
    }
}

// =============================================================================
// State Errors
// =============================================================================

/// Transmit state machine precondition violations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateError {
    /// `enable()` called on a unit that is not in INIT
    AlreadyEnabled,
    /// `disable()` called on a unit that is neither enabled nor running
    NotEnabled,
    /// Operation only legal while the unit is in INIT
    NotInInit,
}

impl core::fmt::Display for StateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            StateError::AlreadyEnabled => "already enabled",
            StateError::NotEnabled => "not enabled",
            StateError::NotInInit => "unit not in init state",
        }
    }
}

// =============================================================================
// Resource Errors
// =============================================================================

/// Resource exhaustion errors
///
/// Only reported during construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    /// Every TX unit in the group is taken
    NoFreeUnit,
    /// The DMA chain storage is too small for the maximum transfer size
    ChainTooShort,
    /// The interrupt source could not be bound
    InterruptUnavailable,
}

impl core::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResourceError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceError::NoFreeUnit => "no free tx unit",
            ResourceError::ChainTooShort => "no memory for the DMA chain",
            ResourceError::InterruptUnavailable => "interrupt unavailable",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// Coarse error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Payload size/alignment or configuration violation
    InvalidArgument,
    /// State machine precondition violated
    InvalidState,
    /// Queue depth exhausted
    NoFreeDescriptor,
    /// Deadline exceeded while waiting
    Timeout,
    /// Hardware unit, memory or interrupt exhausted
    ResourceExhausted,
}

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match unit.submit(&frame, bits, &TransmitConfig::new()) {
///     Err(Error::NoFreeDescriptor) => { /* wait_all_done and retry */ }
///     Err(Error::InvalidArgument(ArgumentError::MisalignedLength)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Invalid argument
    InvalidArgument(ArgumentError),
    /// Invalid state
    InvalidState(StateError),
    /// No free transaction descriptor, increase the queue depth
    NoFreeDescriptor,
    /// Timed out waiting for transactions
    Timeout,
    /// Resource exhausted
    ResourceExhausted(ResourceError),
}

impl Error {
    /// Classify the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::InvalidState(_) => ErrorKind::InvalidState,
            Error::NoFreeDescriptor => ErrorKind::NoFreeDescriptor,
            Error::Timeout => ErrorKind::Timeout,
            Error::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidArgument(e) => write!(f, "invalid argument: {}", e.as_str()),
            Error::InvalidState(e) => write!(f, "invalid state: {}", e.as_str()),
            Error::NoFreeDescriptor => {
                f.write_str("no free transaction descriptor, increase queue depth")
            }
            Error::Timeout => f.write_str("timed out waiting for transactions"),
            Error::ResourceExhausted(e) => write!(f, "resource exhausted: {}", e.as_str()),
        }
    }
}

impl From<ArgumentError> for Error {
    fn from(e: ArgumentError) -> Self {
        Error::InvalidArgument(e)
    }
}

impl From<StateError> for Error {
    fn from(e: StateError) -> Self {
        Error::InvalidState(e)
    }
}

impl From<ResourceError> for Error {
    fn from(e: ResourceError) -> Self {
        Error::ResourceExhausted(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Unit Tests
// =============================================================================
