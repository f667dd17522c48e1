//! Unit tests for HID report serialization and control requests.
//!
//! These tests run on the host (not embedded).

use super::control::{ControlRequests, ReportType};
use super::keyboard::{keycode, modifier, KeyboardLeds, KeyboardReport, KEYBOARD_REPORT_SIZE};
use super::mouse::{button, MouseReport, MOUSE_REPORT_SIZE};
use super::{HidReport, ReportKind, MAX_REPORT_SIZE};
use crate::error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Keyboard Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn keyboard_report_with_key_fills_slot_zero_only() {
    let report = KeyboardReport::with_key(0, keycode::B);
    assert_eq!(report.keycodes, [keycode::B, 0, 0, 0, 0, 0]);
    assert_eq!(report.reserved, 0);
    assert_eq!(report.modifier, 0);
}

#[test]
fn keyboard_report_serialize_layout() {
    let report = KeyboardReport::with_key(modifier::LEFT_CTRL | modifier::LEFT_SHIFT, keycode::NUM_7);
    let mut buf = [0xAAu8; 8];
    let written = report.serialize(&mut buf).unwrap();

    assert_eq!(written, KEYBOARD_REPORT_SIZE);
    assert_eq!(buf, [0x03, 0x00, 0x24, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn keyboard_report_serialize_buffer_too_small() {
    let report = KeyboardReport::with_key(0, keycode::B);
    let mut buf = [0u8; 4];
    assert_eq!(report.serialize(&mut buf), Err(Error::BufferOverflow));
}

// ═══════════════════════════════════════════════════════════════════════════
// Mouse Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn mouse_report_with_buttons_zeroes_deltas() {
    let report = MouseReport::with_buttons(button::BACK);
    assert_eq!(report.buttons, 0x08);
    assert_eq!((report.x, report.y, report.wheel, report.pan), (0, 0, 0, 0));
}

#[test]
fn mouse_report_serialize_signed_deltas() {
    let report = MouseReport {
        buttons: button::FORWARD,
        x: -1,
        y: 127,
        wheel: -128,
        pan: 3,
    };
    let mut buf = [0u8; 5];
    let written = report.serialize(&mut buf).unwrap();

    assert_eq!(written, MOUSE_REPORT_SIZE);
    assert_eq!(buf, [0x10, 0xFF, 0x7F, 0x80, 0x03]);
}

#[test]
fn mouse_report_serialize_buffer_too_small() {
    let mut buf = [0u8; 4];
    let report = MouseReport::with_buttons(button::FORWARD);
    assert_eq!(report.serialize(&mut buf), Err(Error::BufferOverflow));
}

// ═══════════════════════════════════════════════════════════════════════════
// HidReport Enum Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn hid_report_kind_and_type_checks() {
    let kb = HidReport::Keyboard(KeyboardReport::with_key(0, keycode::C));
    let mouse = HidReport::Mouse(MouseReport::with_buttons(button::FORWARD));

    assert_eq!(kb.kind(), ReportKind::Keyboard);
    assert!(kb.is_keyboard());

    assert_eq!(mouse.kind(), ReportKind::Mouse);
    assert!(!mouse.is_keyboard());
}

#[test]
fn hid_report_serialize_dispatches_by_kind() {
    let mut buf = [0u8; MAX_REPORT_SIZE];

    let kb = HidReport::Keyboard(KeyboardReport::with_key(0, keycode::D));
    assert_eq!(kb.serialize(&mut buf), Ok(8));
    assert_eq!(buf[2], keycode::D);

    let mouse = HidReport::Mouse(MouseReport::with_buttons(button::BACK));
    assert_eq!(mouse.serialize(&mut buf), Ok(5));
    assert_eq!(&buf[..5], &[0x08, 0, 0, 0, 0]);
}


// ═══════════════════════════════════════════════════════════════════════════
// Control Request Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn get_report_always_stalls() {
    let mut kb = ControlRequests::new(ReportKind::Keyboard);
    let mut buf = [0u8; 8];
    assert_eq!(kb.get_report(ReportType::Input, 0, &mut buf), Err(Error::UnsupportedRequest));
    assert_eq!(kb.get_report(ReportType::Feature, 0, &mut buf), Err(Error::UnsupportedRequest));
    assert_eq!(buf, [0u8; 8]);

    let mut mouse = ControlRequests::new(ReportKind::Mouse);
    assert_eq!(mouse.get_report(ReportType::Input, 0, &mut buf), Err(Error::UnsupportedRequest));
}

#[test]
fn set_report_records_keyboard_leds() {
    let mut kb = ControlRequests::new(ReportKind::Keyboard);

    let leds = kb.set_report(ReportType::Output, 0, &[0x02]).unwrap();
    assert!(leds.caps_lock());
    assert!(!leds.num_lock());
    assert_eq!(kb.leds(), leds);

    // Unchanged state reports nothing new.
    assert_eq!(kb.set_report(ReportType::Output, 0, &[0x02]), None);
}

#[test]
fn set_report_ignores_other_interfaces_and_types() {
    let mut mouse = ControlRequests::new(ReportKind::Mouse);
    assert_eq!(mouse.set_report(ReportType::Output, 0, &[0x01]), None);

    let mut kb = ControlRequests::new(ReportKind::Keyboard);
    assert_eq!(kb.set_report(ReportType::Feature, 0, &[0x01]), None);
    assert_eq!(kb.set_report(ReportType::Output, 0, &[]), None);
    assert_eq!(kb.leds(), KeyboardLeds::default());
}

#[test]
fn keyboard_leds_mask_undeclared_bits() {
    let leds = KeyboardLeds::from_bits(0xFF);
    assert_eq!(leds.bits(), 0x1F);
    assert!(leds.num_lock() && leds.caps_lock() && leds.scroll_lock());
    assert!(leds.compose() && leds.kana());
}
