//! Hardware Abstraction Layer
//!
//! Collaborators of the transmit scheduler, kept behind small interfaces so
//! the scheduler itself can be exercised on the host.
//!
//! # Modules
//!
//! - [`clock`]: clock sources and divider arithmetic
//! - [`gpio`]: pad assignment and validation
//! - [`group`]: TX unit pool with reference counting
//! - [`peripheral`]: register, DMA and power lock interfaces
//!
//! # Delay Integration
//!
//! Blocking waits use `embedded_hal::delay::DelayNs` directly. Pass any
//! delay implementation from your HAL (e.g., `esp_hal::delay::Delay`).

pub mod clock;
pub mod gpio;
pub mod group;
pub mod peripheral;

// Re-export commonly used types
pub use clock::{ClockConfig, ClockDivider, ClockSource};
pub use gpio::GpioConfig;
pub use group::{TX_UNITS, TxUnitRegistry, UnitId, UnitRegistry};
pub use peripheral::{DmaChannel, NoPowerLock, PowerLock, TxPeripheral};
