//! USB device-state callbacks and the remote-wake signal.
//!
//! `embassy-usb` calls the [`Handler`] from inside the device task, so
//! each callback only translates the state change and `try_send`s it to
//! the lifecycle queue; the connection monitor task does the rest.

use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_usb::Handler;
use macropad::config::LIFECYCLE_QUEUE_DEPTH;
use macropad::connection::{LifecycleEvent, UsbLifecycle};
use macropad::Error;

pub type LifecycleQueue = Channel<CriticalSectionRawMutex, LifecycleEvent, LIFECYCLE_QUEUE_DEPTH>;

static LIFECYCLE_EVENTS: LifecycleQueue = Channel::new();
static REMOTE_WAKEUP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Lifecycle events, consumed by exactly one monitor task.
pub fn events() -> &'static LifecycleQueue {
    &LIFECYCLE_EVENTS
}

/// Raised by the poll loop; the USB device task answers it while suspended.
pub fn remote_wakeup_signal() -> &'static Signal<CriticalSectionRawMutex, ()> {
    &REMOTE_WAKEUP
}

pub struct LifecycleHandler {
    usb: UsbLifecycle,
}

impl LifecycleHandler {
    pub const fn new() -> Self {
        Self {
            usb: UsbLifecycle::new(),
        }
    }
}

impl Handler for LifecycleHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            post(self.usb.on_detached());
        }
    }

    fn reset(&mut self) {
        post(self.usb.on_detached());
    }

    fn configured(&mut self, configured: bool) {
        post(self.usb.on_configured(configured));
    }

    fn suspended(&mut self, suspended: bool) {
        post(self.usb.on_suspended(suspended));
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        info!("Host remote wakeup permission: {}", enabled);
        self.usb.on_remote_wakeup_enabled(enabled);
    }
}

fn post(event: Option<LifecycleEvent>) {
    let Some(event) = event else {
        return;
    };
    if let Err(e) = LIFECYCLE_EVENTS.try_send(event).map_err(|_| Error::QueueFull) {
        warn!("Dropped lifecycle event {}: {}", event, e);
    }
}
