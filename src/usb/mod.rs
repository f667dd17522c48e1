//! USB Device subsystem - presents a composite HID device to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`.  We create a **composite device** with two HID
//! interfaces:
//!
//! - Interface 0: Keyboard
//! - Interface 1: Mouse (5 buttons, wheel, pan)
//!
//! Device-state callbacks become lifecycle events for the connection
//! monitor; the poll loop submits reports through [`hid_device::UsbReportBus`].

pub mod hid_device;
pub mod lifecycle;
