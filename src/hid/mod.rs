//! HID report types sent to the host.
//!
//! Keyboard and mouse each sit on their own HID interface, so every
//! [`ReportKind`] has its own IN endpoint and its own readiness.

pub mod control;
pub mod keyboard;
pub mod mouse;
pub mod queue;

#[cfg(test)]
mod tests;

use crate::error::Result;
use keyboard::KeyboardReport;
use mouse::MouseReport;

/// Largest serialised report, in bytes.
pub const MAX_REPORT_SIZE: usize = keyboard::KEYBOARD_REPORT_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportKind {
    Keyboard,
    Mouse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
}

impl HidReport {
    pub fn kind(&self) -> ReportKind {
        match self {
            HidReport::Keyboard(_) => ReportKind::Keyboard,
            HidReport::Mouse(_) => ReportKind::Mouse,
        }
    }

    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize> {
        match self {
            HidReport::Keyboard(k) => k.serialize(buf),
            HidReport::Mouse(m) => m.serialize(buf),
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, HidReport::Keyboard(_))
    }
}
