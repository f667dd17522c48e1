//! Unified error type for macropad.
//!
//! No `alloc` - all variants carry only fixed-size data. None of these
//! are fatal: callers drop the affected report or event and carry on.

use crate::hid::ReportKind;

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // USB
    /// The endpoint for this report kind still holds an unsent report.
    EndpointBusy(ReportKind),

    /// The device is not configured or the bus is suspended.
    NotReady,

    /// USB stack returned an error.
    Usb,

    /// A HID class control request this device does not answer.
    UnsupportedRequest,

    // Lifecycle
    /// A lifecycle event could not be queued for the monitor.
    QueueFull,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

pub type Result<T> = core::result::Result<T, Error>;
