//! PARL_IO Transmitter Register Definitions
//!
//! The transmit half of the parallel IO peripheral: frame length, idle value,
//! start bit, bus shape and the EOF interrupt, plus the clock/reset bits in
//! the system clock block and the GPIO matrix routing for the TX signals.

use core::sync::atomic::{AtomicBool, Ordering};

use super::{
    CLKRST_BASE, GPIO_BASE, PARL_IO_BASE, reg_bit_check, reg_bit_write, reg_ro, reg_rw, write_bits,
    write_field, write_reg,
};
use crate::driver::config::{BitPackOrder, BusConfig, SampleEdge};
use crate::driver::error::ResourceError;
use crate::driver::interrupt::InterruptStatus;
use crate::hal::clock::ClockSource;
use crate::hal::gpio::GpioConfig;
use crate::hal::group::UnitId;
use crate::hal::peripheral::TxPeripheral;
use crate::internal::constants::MAX_DATA_WIDTH;

// =============================================================================
// Register Offsets (ESP32-C6)
// =============================================================================

/// TX configuration 0 (length, start, bus shape)
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const TX_CFG0_OFFSET: usize = 0x08;
/// TX configuration 1 (idle value)
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const TX_CFG1_OFFSET: usize = 0x0C;
/// Status register
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const ST_OFFSET: usize = 0x10;
/// Interrupt enable register
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const INT_ENA_OFFSET: usize = 0x14;
/// Interrupt masked status register
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const INT_ST_OFFSET: usize = 0x1C;
/// Interrupt clear register (write 1 to clear)
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const INT_CLR_OFFSET: usize = 0x20;

// Fields shared by the length, start and bus shape accessors
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
mod layout {
    use super::{TX_CFG0_OFFSET, TX_CFG1_OFFSET};

    pub const LEN_OFFSET: usize = TX_CFG0_OFFSET;
    /// Frame length in bytes, 16 bits
    pub const LEN_SHIFT: u32 = 2;
    pub const LEN_MASK: u32 = 0xFFFF << 2;
    /// Length register counts bytes
    pub const LEN_IN_BITS: bool = false;

    pub const START_OFFSET: usize = TX_CFG0_OFFSET;
    pub const START: u32 = 1 << 19;

    pub const BUS_OFFSET: usize = TX_CFG0_OFFSET;
    pub const GATING_EN: u32 = 1 << 18;
    pub const HW_VALID_EN: u32 = 1 << 20;
    pub const SMP_EDGE_NEG: u32 = 1 << 21;
    pub const BIT_ORDER_MSB: u32 = 1 << 22;
    pub const BUS_WID_SHIFT: u32 = 23;
    pub const BUS_WID_MASK: u32 = 0x7 << 23;
    pub const FIFO_SRST: u32 = 1 << 30;

    pub const IDLE_OFFSET: usize = TX_CFG1_OFFSET;
    pub const IDLE_SHIFT: u32 = 16;
    pub const IDLE_MASK: u32 = 0xFFFF << 16;
}

// =============================================================================
// Register Offsets (ESP32-P4)
// =============================================================================

/// TX data configuration (bit length, bus width, bit order)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const TX_DATA_CFG_OFFSET: usize = 0x10;
/// TX general configuration (idle value, gating, valid output)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const TX_GENRL_CFG_OFFSET: usize = 0x14;
/// TX start configuration
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const TX_START_CFG_OFFSET: usize = 0x18;
/// Status register
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const ST_OFFSET: usize = 0x1C;
/// Interrupt enable register
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const INT_ENA_OFFSET: usize = 0x20;
/// Interrupt masked status register
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const INT_ST_OFFSET: usize = 0x28;
/// Interrupt clear register (write 1 to clear)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const INT_CLR_OFFSET: usize = 0x2C;
/// TX clock configuration (edge inversion)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const TX_CLK_CFG_OFFSET: usize = 0x34;

#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
mod layout {
    use super::{TX_DATA_CFG_OFFSET, TX_GENRL_CFG_OFFSET, TX_START_CFG_OFFSET};

    pub const LEN_OFFSET: usize = TX_DATA_CFG_OFFSET;
    /// Frame length in bits, 19 bits
    pub const LEN_SHIFT: u32 = 0;
    pub const LEN_MASK: u32 = 0x7FFFF;
    /// Length register counts bits
    pub const LEN_IN_BITS: bool = true;

    pub const START_OFFSET: usize = TX_START_CFG_OFFSET;
    pub const START: u32 = 1 << 31;

    pub const BUS_OFFSET: usize = TX_DATA_CFG_OFFSET;
    pub const BIT_ORDER_MSB: u32 = 1 << 19;
    pub const BUS_WID_SHIFT: u32 = 20;
    pub const BUS_WID_MASK: u32 = 0x7 << 20;

    pub const GENRL_OFFSET: usize = TX_GENRL_CFG_OFFSET;
    pub const GATING_EN: u32 = 1 << 12;
    pub const HW_VALID_EN: u32 = 1 << 29;
    pub const FIFO_SRST: u32 = 1 << 30;

    pub const IDLE_OFFSET: usize = TX_GENRL_CFG_OFFSET;
    pub const IDLE_SHIFT: u32 = 13;
    pub const IDLE_MASK: u32 = 0xFFFF << 13;

    /// Output clock inversion selects the negative sample edge
    pub const SMP_EDGE_NEG: u32 = 1 << 31;
}

// =============================================================================
// Status and Interrupt Bits
// =============================================================================

/// TX FIFO holds data and the unit can start
pub const ST_TX_READY: u32 = 1 << 31;

/// TX FIFO became empty
pub const INT_TX_FIFO_REMPTY: u32 = 1 << 0;
/// Whole frame shifted out
pub const INT_TX_EOF: u32 = 1 << 2;

// =============================================================================
// Clock / Reset Control
// =============================================================================

/// TX clock configuration register in the clock/reset block
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const CLK_TX_CONF_OFFSET: usize = 0xAC;
/// TX clock configuration register in the clock/reset block (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const CLK_TX_CONF_OFFSET: usize = 0x54;

/// Clock divider field (divider - 1)
pub const CLK_TX_DIV_SHIFT: u32 = 0;
/// Clock divider field mask
pub const CLK_TX_DIV_MASK: u32 = 0xFFFF;
/// Clock source select shift
pub const CLK_TX_SEL_SHIFT: u32 = 16;
/// Clock source select mask
pub const CLK_TX_SEL_MASK: u32 = 0x3 << 16;
/// TX output clock enable
pub const CLK_TX_EN: u32 = 1 << 18;
/// TX core clock domain reset
pub const CLK_TX_RST: u32 = 1 << 19;

// =============================================================================
// GPIO Matrix
// =============================================================================

/// Output enable set register for GPIO0..31 (W1TS)
pub const GPIO_ENABLE_W1TS_OFFSET: usize = 0x24;
/// Output enable set register for GPIO32 and up (W1TS)
pub const GPIO_ENABLE1_W1TS_OFFSET: usize = 0x30;

/// Output signal select for GPIO N lives at `GPIO_BASE + base + N * 4`
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const GPIO_FUNC_OUT_SEL_CFG_BASE: usize = 0x554;
/// Input pin select for signal S lives at `GPIO_BASE + base + S * 4`
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const GPIO_FUNC_IN_SEL_CFG_BASE: usize = 0x154;

/// Output signal select base (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const GPIO_FUNC_OUT_SEL_CFG_BASE: usize = 0x558;
/// Input pin select base (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const GPIO_FUNC_IN_SEL_CFG_BASE: usize = 0x158;

/// Invert the routed output signal
pub const GPIO_OUT_INV_SEL: u32 = 1 << 8;
/// Route the input signal through the matrix
pub const GPIO_SIG_IN_SEL: u32 = 1 << 6;

/// Matrix index of TX data line 0 (lines are consecutive)
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const PARL_TX_DATA0_IDX: u32 = 47;
/// Matrix index of the TX clock (output and input)
#[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
pub const PARL_TX_CLK_IDX: u32 = 70;

/// Matrix index of TX data line 0 (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const PARL_TX_DATA0_IDX: u32 = 172;
/// Matrix index of the TX clock (ESP32-P4)
#[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
pub const PARL_TX_CLK_IDX: u32 = 188;

// =============================================================================
// Register Access
// =============================================================================

/// Encode a bus width for the `bus_wid_sel` field.
#[must_use]
pub const fn bus_width_bits(width: usize) -> u32 {
    match width {
        16 => 0,
        8 => 1,
        4 => 2,
        2 => 3,
        _ => 4,
    }
}

/// Encode a clock source for the `clk_tx_sel` field.
#[must_use]
pub const fn clock_source_bits(source: ClockSource) -> u32 {
    match source {
        ClockSource::Xtal => 0,
        #[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
        ClockSource::PllF240m => 1,
        #[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
        ClockSource::PllF160m => 1,
        ClockSource::RcFast => 2,
        ClockSource::External { .. } => 3,
    }
}

static INTERRUPT_BOUND: AtomicBool = AtomicBool::new(false);

/// PARL_IO transmitter register block
///
/// Zero-sized handle; every accessor goes straight to MMIO.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParlIoRegs;

impl ParlIoRegs {
    // -------------------------------------------------------------------------
    // Register accessors (generated by macros)
    // -------------------------------------------------------------------------

    reg_rw!(int_ena, set_int_ena, PARL_IO_BASE, INT_ENA_OFFSET, "Interrupt Enable register");
    reg_ro!(int_st, PARL_IO_BASE, INT_ST_OFFSET, "Interrupt Status register");
    reg_rw!(clk_tx_conf, set_clk_tx_conf, CLKRST_BASE, CLK_TX_CONF_OFFSET, "TX Clock Configuration register");

    // -------------------------------------------------------------------------
    // Bit operations (generated by macros)
    // -------------------------------------------------------------------------

    reg_bit_write!(write_tx_start, PARL_IO_BASE, layout::START_OFFSET, layout::START, "transmit start bit");
    reg_bit_write!(write_eof_int_ena, PARL_IO_BASE, INT_ENA_OFFSET, INT_TX_EOF, "EOF interrupt enable");
    reg_bit_write!(write_clk_tx_en, CLKRST_BASE, CLK_TX_CONF_OFFSET, CLK_TX_EN, "TX output clock enable");
    reg_bit_write!(write_clk_tx_rst, CLKRST_BASE, CLK_TX_CONF_OFFSET, CLK_TX_RST, "TX core clock reset");

    reg_bit_check!(tx_ready, PARL_IO_BASE, ST_OFFSET, ST_TX_READY, "Check if the TX FIFO has been staged");

    // -------------------------------------------------------------------------
    // Special operations (cannot be generated by simple macros)
    // -------------------------------------------------------------------------

    /// Clear interrupt bits (write 1 to clear)
    #[inline(always)]
    pub fn clear_int(bits: u32) {
        unsafe { write_reg(PARL_IO_BASE + INT_CLR_OFFSET, bits) }
    }

    /// Write the frame length field
    #[inline(always)]
    pub fn set_frame_length(value: u32) {
        unsafe {
            write_field(
                PARL_IO_BASE + layout::LEN_OFFSET,
                layout::LEN_MASK,
                layout::LEN_SHIFT,
                value,
            )
        }
    }

    /// Write the idle value field
    #[inline(always)]
    pub fn set_idle(value: u32) {
        unsafe {
            write_field(
                PARL_IO_BASE + layout::IDLE_OFFSET,
                layout::IDLE_MASK,
                layout::IDLE_SHIFT,
                value,
            )
        }
    }

    /// Pulse the TX FIFO soft reset
    pub fn pulse_fifo_reset() {
        #[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
        let addr = PARL_IO_BASE + layout::BUS_OFFSET;
        #[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
        let addr = PARL_IO_BASE + layout::GENRL_OFFSET;

        unsafe {
            write_bits(addr, layout::FIFO_SRST, true);
            write_bits(addr, layout::FIFO_SRST, false);
        }
    }

    /// Route one output signal to a pad
    fn route_output(gpio: u8, signal: u32, invert: bool) {
        let cfg = signal | if invert { GPIO_OUT_INV_SEL } else { 0 };
        unsafe {
            write_reg(
                GPIO_BASE + GPIO_FUNC_OUT_SEL_CFG_BASE + (gpio as usize) * 4,
                cfg,
            );
            if gpio < 32 {
                write_reg(GPIO_BASE + GPIO_ENABLE_W1TS_OFFSET, 1 << gpio);
            } else {
                write_reg(GPIO_BASE + GPIO_ENABLE1_W1TS_OFFSET, 1 << (gpio - 32));
            }
        }
    }

    /// Route a pad to one input signal
    fn route_input(gpio: u8, signal: u32) {
        unsafe {
            write_reg(
                GPIO_BASE + GPIO_FUNC_IN_SEL_CFG_BASE + (signal as usize) * 4,
                GPIO_SIG_IN_SEL | gpio as u32,
            );
        }
    }
}

impl TxPeripheral for ParlIoRegs {
    fn configure_bus(&self, bus: &BusConfig) {
        let addr = PARL_IO_BASE + layout::BUS_OFFSET;
        unsafe {
            write_field(
                addr,
                layout::BUS_WID_MASK,
                layout::BUS_WID_SHIFT,
                bus_width_bits(bus.data_width),
            );
            write_bits(
                addr,
                layout::BIT_ORDER_MSB,
                bus.bit_pack_order == BitPackOrder::Msb,
            );
        }

        #[cfg(any(feature = "esp32c6", not(feature = "esp32p4")))]
        unsafe {
            write_bits(addr, layout::SMP_EDGE_NEG, bus.sample_edge == SampleEdge::Neg);
            write_bits(addr, layout::HW_VALID_EN, bus.valid_line);
            write_bits(addr, layout::GATING_EN, bus.clock_gating);
        }

        #[cfg(all(feature = "esp32p4", not(feature = "esp32c6")))]
        unsafe {
            write_bits(
                PARL_IO_BASE + TX_CLK_CFG_OFFSET,
                layout::SMP_EDGE_NEG,
                bus.sample_edge == SampleEdge::Neg,
            );
            let genrl = PARL_IO_BASE + layout::GENRL_OFFSET;
            write_bits(genrl, layout::HW_VALID_EN, bus.valid_line);
            write_bits(genrl, layout::GATING_EN, bus.clock_gating);
        }
    }

    fn configure_clock(&self, source: ClockSource, divider: u32) {
        let mut conf = Self::clk_tx_conf();
        conf &= !(CLK_TX_SEL_MASK | CLK_TX_DIV_MASK);
        conf |= (clock_source_bits(source) << CLK_TX_SEL_SHIFT) & CLK_TX_SEL_MASK;
        conf |= (divider.saturating_sub(1) << CLK_TX_DIV_SHIFT) & CLK_TX_DIV_MASK;
        // Output stays gated until a transaction starts
        conf &= !CLK_TX_EN;
        Self::set_clk_tx_conf(conf);
    }

    fn route_gpio(&self, gpio: &GpioConfig, bus: &BusConfig) {
        for (line, pin) in gpio.data_pins(bus.data_width) {
            Self::route_output(pin, PARL_TX_DATA0_IDX + line as u32, false);
        }
        if let Some(pin) = gpio.valid {
            // The valid signal is driven on the top data line
            Self::route_output(
                pin,
                PARL_TX_DATA0_IDX + (MAX_DATA_WIDTH as u32 - 1),
                bus.invert_valid,
            );
        }
        if let Some(pin) = gpio.clk_out {
            Self::route_output(pin, PARL_TX_CLK_IDX, false);
        }
        if let Some(pin) = gpio.clk_in {
            Self::route_input(pin, PARL_TX_CLK_IDX);
        }
    }

    fn reset_fifo(&self) {
        Self::pulse_fifo_reset();
    }

    fn reset_core_clock(&self) {
        Self::write_clk_tx_rst(true);
        Self::write_clk_tx_rst(false);
    }

    fn set_idle_value(&self, value: u32) {
        Self::set_idle(value);
    }

    fn set_bit_length(&self, bits: u32) {
        if layout::LEN_IN_BITS {
            Self::set_frame_length(bits);
        } else {
            Self::set_frame_length(bits.div_ceil(8));
        }
    }

    fn set_tx_start(&self, on: bool) {
        Self::write_tx_start(on);
    }

    fn enable_clock_output(&self, on: bool) {
        Self::write_clk_tx_en(on);
    }

    fn is_tx_ready(&self) -> bool {
        Self::tx_ready()
    }

    fn set_eof_interrupt(&self, on: bool) {
        Self::write_eof_int_ena(on);
    }

    fn interrupt_status(&self) -> InterruptStatus {
        InterruptStatus::from_raw(Self::int_st())
    }

    fn clear_interrupt(&self, status: InterruptStatus) {
        Self::clear_int(status.to_raw());
    }

    fn bind_interrupt(&self, unit: UnitId) -> Result<(), ResourceError> {
        if INTERRUPT_BOUND
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ResourceError::InterruptUnavailable);
        }
        // Start from a clean, masked source
        let ena = Self::int_ena();
        Self::set_int_ena(ena & !INT_TX_EOF);
        Self::clear_int(INT_TX_EOF | INT_TX_FIFO_REMPTY);
        debug!("tx interrupt bound to unit {}", unit.index());
        Ok(())
    }

    fn unbind_interrupt(&self) {
        Self::write_eof_int_ena(false);
        INTERRUPT_BOUND.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_width_encoding() {
        assert_eq!(bus_width_bits(16), 0);
        assert_eq!(bus_width_bits(8), 1);
        assert_eq!(bus_width_bits(4), 2);
        assert_eq!(bus_width_bits(2), 3);
        assert_eq!(bus_width_bits(1), 4);
    }

    #[test]
    fn clock_source_encoding() {
        assert_eq!(clock_source_bits(ClockSource::Xtal), 0);
        assert_eq!(clock_source_bits(ClockSource::RcFast), 2);
        assert_eq!(
            clock_source_bits(ClockSource::External { freq_hz: 1_000_000 }),
            3
        );
    }

    #[test]
    fn interrupt_bits_distinct() {
        assert_eq!(INT_TX_EOF & INT_TX_FIFO_REMPTY, 0);
    }

    #[test]
    fn fields_do_not_overlap() {
        assert_eq!(layout::LEN_MASK & layout::BUS_WID_MASK, 0);
        assert_eq!(CLK_TX_SEL_MASK & CLK_TX_DIV_MASK, 0);
        assert_eq!(CLK_TX_EN & (CLK_TX_SEL_MASK | CLK_TX_DIV_MASK), 0);
    }
}
