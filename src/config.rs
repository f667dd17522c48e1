//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, timing parameters, and USB identity constants
//! live here so they can be tuned in one place.

// Inputs

/// Number of physical input lines.
pub const LINE_COUNT: usize = 6;

/// Input poll period (ms). One scan/resolve/dispatch pass per tick.
pub const POLL_INTERVAL_MS: u64 = 10;

// GPIO pin assignments (nRF52840-DK)
//
// These are logical names; the concrete `embassy_nrf::peripherals::*`
// are picked in `main.rs`.  All inputs are active-low with pull-ups.
//
//   Line 0 (key B)            → P0.11
//   Line 1 (key C)            → P0.12
//   Line 2 (key D)            → P0.24
//   Line 3 (mouse back)       → P0.25
//   Line 4 (Ctrl+Shift+7)     → P0.08
//   Line 5 (mouse forward)    → P0.07
//   Status LED                → P0.13

// Indicator blink pattern

/// Blink half-period while the device is not mounted (ms).
pub const BLINK_NOT_MOUNTED_MS: u32 = 250;

/// Blink half-period while the device is mounted (ms).
pub const BLINK_MOUNTED_MS: u32 = 1000;

/// Blink half-period while the bus is suspended (ms).
pub const BLINK_SUSPENDED_MS: u32 = 2500;

// USB

/// USB VID/PID - "pid.codes" open-source test VID.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "macropad";
pub const USB_PRODUCT: &str = "Six-Button HID Pad";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// Bus power budget requested in the configuration descriptor (mA).
pub const USB_MAX_POWER_MA: u16 = 100;

/// HID endpoint polling interval (ms). Matches the input poll period.
pub const USB_HID_POLL_MS: u8 = 10;

/// Depth of the lifecycle-event queue between the USB callbacks and
/// the connection monitor.
pub const LIFECYCLE_QUEUE_DEPTH: usize = 4;
