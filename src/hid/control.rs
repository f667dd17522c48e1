//! HID class control requests (GET_REPORT / SET_REPORT).
//!
//! GET_REPORT is not supported: the handler answers with no data, which
//! makes the stack STALL the request. SET_REPORT output reports on the keyboard interface
//! carry the host's LED state, which is recorded and logged; everything
//! else is accepted and ignored.

use super::keyboard::KeyboardLeds;
use super::ReportKind;
use crate::error::{Error, Result};

/// Report type addressed by a control request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportType {
    Input,
    Output,
    Feature,
}

/// Per-interface control request handler state.
#[derive(Debug)]
pub struct ControlRequests {
    interface: ReportKind,
    leds: KeyboardLeds,
}

impl ControlRequests {
    pub const fn new(interface: ReportKind) -> Self {
        Self {
            interface,
            leds: KeyboardLeds::from_bits(0),
        }
    }

    /// Answer a GET_REPORT request with the number of bytes written.
    ///
    /// Always fails with [`Error::UnsupportedRequest`].
    pub fn get_report(&mut self, report_type: ReportType, report_id: u8, _buf: &mut [u8]) -> Result<usize> {
        debug!(
            "GET_REPORT {} type={} id={} - stalled",
            self.interface,
            report_type,
            report_id
        );
        Err(Error::UnsupportedRequest)
    }

    /// Handle a SET_REPORT request.
    ///
    /// Returns the new LED state when the request changed it.
    pub fn set_report(&mut self, report_type: ReportType, report_id: u8, data: &[u8]) -> Option<KeyboardLeds> {
        match (self.interface, report_type) {
            (ReportKind::Keyboard, ReportType::Output) => {
                let leds = KeyboardLeds::from_output_report(data)?;
                if leds == self.leds {
                    return None;
                }
                self.leds = leds;
                info!(
                    "Host LEDs: num={} caps={} scroll={}",
                    leds.num_lock(),
                    leds.caps_lock(),
                    leds.scroll_lock()
                );
                Some(leds)
            }
            _ => {
                debug!(
                    "SET_REPORT {} type={} id={} len={} - ignored",
                    self.interface,
                    report_type,
                    report_id,
                    data.len()
                );
                None
            }
        }
    }

    /// Last LED state reported by the host.
    pub fn leds(&self) -> KeyboardLeds {
        self.leds
    }
}
