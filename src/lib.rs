//! macropad - six-button USB HID pad for the nRF52840.
//!
//! This library holds the decision logic of the firmware: scanning the
//! input lines, resolving one action per tick, gating report dispatch on
//! endpoint readiness, and tracking the USB connection lifecycle that
//! drives the status blink and remote wakeup. None of it touches the
//! hardware directly, so it runs under plain `cargo test` on the host.
//!
//! The embedded binary (`src/main.rs`, feature `embedded`) wires these
//! pieces to Embassy tasks, GPIO and the `embassy-usb` device stack.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to later modules.
#[macro_use]
mod fmt;

pub mod action;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod hid;
pub mod indicator;
pub mod input;

pub use action::{resolve, ActionKind, ButtonMapping, BUTTON_MAPPING};
pub use connection::{ConnectionCell, ConnectionMonitor, ConnectionState, IndicatorPeriod, LifecycleEvent};
pub use dispatch::{dispatch, Dispatch, HidBus, PollLoop, Tick};
pub use error::{Error, Result};
pub use hid::{HidReport, ReportKind};
pub use input::{ActiveLines, InputLine, InputScanner};
