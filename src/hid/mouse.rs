//! USB HID mouse report.
//!
//! Layout (5 bytes):
//! ```text
//! Byte 0: Button bitfield
//!         Bit 0 = Left, Bit 1 = Right, Bit 2 = Middle,
//!         Bit 3 = Back, Bit 4 = Forward
//! Byte 1: X displacement (signed)
//! Byte 2: Y displacement (signed)
//! Byte 3: Scroll wheel   (signed)
//! Byte 4: Horizontal pan (signed)
//! ```

use crate::error::{Error, Result};

/// Mouse report size in bytes.
pub const MOUSE_REPORT_SIZE: usize = 5;

/// Button mask bits.
pub mod button {
    pub const BACK: u8 = 1 << 3;
    pub const FORWARD: u8 = 1 << 4;
}

/// Relative mouse report with wheel and pan.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Button bitfield, see [`button`].
    pub buttons: u8,
    /// Relative X movement (signed).
    pub x: i8,
    /// Relative Y movement (signed).
    pub y: i8,
    /// Scroll wheel delta (signed).
    pub wheel: i8,
    /// Horizontal pan delta (signed).
    pub pan: i8,
}

impl MouseReport {
    /// A report pressing `buttons` with every delta at zero.
    pub const fn with_buttons(buttons: u8) -> Self {
        Self {
            buttons,
            x: 0,
            y: 0,
            wheel: 0,
            pan: 0,
        }
    }

    /// Serialise into a byte slice for USB HID transmission.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.len() < MOUSE_REPORT_SIZE {
            return Err(Error::BufferOverflow);
        }
        buf[0] = self.buttons;
        buf[1] = self.x as u8;
        buf[2] = self.y as u8;
        buf[3] = self.wheel as u8;
        buf[4] = self.pan as u8;
        Ok(MOUSE_REPORT_SIZE)
    }
}
