//! Memory-mapped register definitions for the PARL_IO transmitter
//!
//! Type-safe access to the PARL_IO, clock/reset, GPIO matrix and GDMA
//! register blocks. All register access is volatile.

pub mod gdma;
pub mod parlio;

// ESP32-C6 and ESP32-P4 are mutually exclusive; if both are enabled, prefer
// the C6. If neither is enabled, default to C6 addresses.

/// PARL_IO register block base address
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const PARL_IO_BASE: usize = 0x6001_5000;

/// Peripheral clock/reset control block (PCR) base address
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const CLKRST_BASE: usize = 0x6009_6000;

/// GPIO matrix base address
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const GPIO_BASE: usize = 0x6009_1000;

/// GDMA controller base address
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const GDMA_BASE: usize = 0x6008_0000;

/// PARL_IO register block base address (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const PARL_IO_BASE: usize = 0x500C_F000;

/// HP system clock/reset block base address (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const CLKRST_BASE: usize = 0x500E_6000;

/// GPIO matrix base address (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const GPIO_BASE: usize = 0x500E_0000;

/// AHB GDMA controller base address (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const GDMA_BASE: usize = 0x5008_5000;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Modify a register using a read-modify-write operation
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn modify_reg<F>(addr: usize, f: F)
where
    F: FnOnce(u32) -> u32,
{
    // SAFETY: caller guarantees address validity
    let value = unsafe { read_reg(addr) };
    unsafe { write_reg(addr, f(value)) }
}

/// Replace the `mask` field of a register with `value << shift`
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_field(addr: usize, mask: u32, shift: u32, value: u32) {
    // SAFETY: caller guarantees address validity
    unsafe { modify_reg(addr, |v| (v & !mask) | ((value << shift) & mask)) }
}

/// Set or clear `bits` depending on `on`
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_bits(addr: usize, bits: u32, on: bool) {
    // SAFETY: caller guarantees address validity
    unsafe { modify_reg(addr, |v| if on { v | bits } else { v & !bits }) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register.
///
/// # Example
/// ```ignore
/// impl ParlIoRegs {
///     reg_rw!(int_ena, set_int_ena, PARL_IO_BASE, INT_ENA_OFFSET,
///             "Interrupt Enable register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $base:expr, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn() -> u32 {
            unsafe { $crate::internal::register::read_reg($base + $offset) }
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(value: u32) {
            unsafe { $crate::internal::register::write_reg($base + $offset, value) }
        }
    };
}

/// Generate a read-only accessor method for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $base:expr, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn() -> u32 {
            unsafe { $crate::internal::register::read_reg($base + $offset) }
        }
    };
}

/// Generate a method that sets or clears one bit from a `bool`.
///
/// # Example
/// ```ignore
/// impl ParlIoRegs {
///     reg_bit_write!(write_tx_start, PARL_IO_BASE, TX_START_OFFSET, TX_START,
///                    "transmit start bit");
/// }
/// ```
macro_rules! reg_bit_write {
    ($fn:ident, $base:expr, $offset:expr, $bit:expr, $doc:expr) => {
        #[doc = concat!("Set or clear the ", $doc)]
        #[inline(always)]
        pub fn $fn(on: bool) {
            unsafe { $crate::internal::register::write_bits($base + $offset, $bit, on) }
        }
    };
}

/// Generate a bit check method (true when the bit is set).
macro_rules! reg_bit_check {
    ($fn:ident, $base:expr, $offset:expr, $bit:expr, $doc:expr) => {
        #[doc = $doc]
        #[inline(always)]
        pub fn $fn() -> bool {
            unsafe { ($crate::internal::register::read_reg($base + $offset) & $bit) != 0 }
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_bit_check;
pub(crate) use reg_bit_write;
pub(crate) use reg_ro;
pub(crate) use reg_rw;
