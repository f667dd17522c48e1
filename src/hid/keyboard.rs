//! USB HID keyboard report (boot protocol compatible).
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```

use crate::error::{Error, Result};

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// Keyboard/Keypad usage codes used by the button mapping.
pub mod keycode {
    pub const B: u8 = 0x05;
    pub const C: u8 = 0x06;
    pub const D: u8 = 0x07;
    pub const NUM_7: u8 = 0x24;
}

/// Modifier byte bits.
pub mod modifier {
    pub const LEFT_CTRL: u8 = 1 << 0;
    pub const LEFT_SHIFT: u8 = 1 << 1;
}

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte, always 0x00.
    pub reserved: u8,
    /// Up to 6 simultaneously pressed key codes.
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// A report holding one key in slot 0 plus the given modifiers.
    pub const fn with_key(modifier: u8, key: u8) -> Self {
        Self {
            modifier,
            reserved: 0,
            keycodes: [key, 0, 0, 0, 0, 0],
        }
    }

    /// Serialise into a byte slice for USB HID transmission.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return Err(Error::BufferOverflow);
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..8].copy_from_slice(&self.keycodes);
        Ok(KEYBOARD_REPORT_SIZE)
    }
}

/// Keyboard LED state carried by the host's output report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardLeds(u8);

impl KeyboardLeds {
    const NUM_LOCK: u8 = 1 << 0;
    const CAPS_LOCK: u8 = 1 << 1;
    const SCROLL_LOCK: u8 = 1 << 2;
    const COMPOSE: u8 = 1 << 3;
    const KANA: u8 = 1 << 4;

    /// Keep only the five LED bits the descriptor declares.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x1F)
    }

    /// Parse the one-byte LED output report. Empty payloads are rejected.
    pub fn from_output_report(data: &[u8]) -> Option<Self> {
        data.first().map(|&bits| Self::from_bits(bits))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn num_lock(self) -> bool {
        self.0 & Self::NUM_LOCK != 0
    }

    pub fn caps_lock(self) -> bool {
        self.0 & Self::CAPS_LOCK != 0
    }

    pub fn scroll_lock(self) -> bool {
        self.0 & Self::SCROLL_LOCK != 0
    }

    pub fn compose(self) -> bool {
        self.0 & Self::COMPOSE != 0
    }

    pub fn kana(self) -> bool {
        self.0 & Self::KANA != 0
    }
}
