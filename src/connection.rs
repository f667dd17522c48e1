//! Connection state monitor - mirrors the USB lifecycle.
//!
//! The USB stack reports mount / unmount / suspend / resume as
//! [`LifecycleEvent`]s. A single [`ConnectionMonitor`] consumes them in
//! order and publishes the result into a [`ConnectionCell`], which the
//! poll loop and the indicator read concurrently.
//!
//! ```text
//!   NotMounted --mount--> Mounted --suspend--> Suspended
//!        ^                 |   ^                  |
//!        +----unmount------+   +-----resume-------+
//! ```
//!
//! Remote wake is armed when the bus is suspended with the host's
//! permission, and disarmed by any other transition. The poll loop claims
//! the armed flag at most once per suspend episode.

use crate::config::{BLINK_MOUNTED_MS, BLINK_NOT_MOUNTED_MS, BLINK_SUSPENDED_MS};
use crate::input::ActiveLines;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConnectionState {
    NotMounted = 0,
    Mounted = 1,
    Suspended = 2,
}

impl ConnectionState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ConnectionState::Mounted,
            2 => ConnectionState::Suspended,
            _ => ConnectionState::NotMounted,
        }
    }

    /// Blink period shown while in this state.
    pub const fn indicator_period(self) -> IndicatorPeriod {
        match self {
            ConnectionState::NotMounted => IndicatorPeriod::NOT_MOUNTED,
            ConnectionState::Mounted => IndicatorPeriod::MOUNTED,
            ConnectionState::Suspended => IndicatorPeriod::SUSPENDED,
        }
    }
}

/// Indicator toggle period, derived from [`ConnectionState`] only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorPeriod(u32);

impl IndicatorPeriod {
    pub const NOT_MOUNTED: IndicatorPeriod = IndicatorPeriod(BLINK_NOT_MOUNTED_MS);
    pub const MOUNTED: IndicatorPeriod = IndicatorPeriod(BLINK_MOUNTED_MS);
    pub const SUSPENDED: IndicatorPeriod = IndicatorPeriod(BLINK_SUSPENDED_MS);

    pub const fn as_millis(self) -> u32 {
        self.0
    }
}

/// Lifecycle notifications from the USB stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleEvent {
    /// Enumeration completed; the host selected a configuration.
    Mount,
    /// The device was disconnected or deconfigured.
    Unmount,
    /// The host suspended the bus.
    Suspend { remote_wake_allowed: bool },
    /// The bus resumed.
    Resume,
}

/// Connection state shared between the monitor (writer) and the poll
/// and indicator tasks (readers).
#[derive(Debug)]
pub struct ConnectionCell {
    state: AtomicU8,
    wake_armed: AtomicBool,
}

impl ConnectionCell {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::NotMounted as u8),
            wake_armed: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_mounted(&self) -> bool {
        self.state() == ConnectionState::Mounted
    }

    pub fn is_suspended(&self) -> bool {
        self.state() == ConnectionState::Suspended
    }

    pub fn indicator_period(&self) -> IndicatorPeriod {
        self.state().indicator_period()
    }

    /// `true` while a remote wake may still be requested this episode.
    pub fn is_wake_armed(&self) -> bool {
        self.wake_armed.load(Ordering::Acquire)
    }

    /// Decide whether this poll tick issues a remote-wake request.
    ///
    /// Succeeds at most once per suspend episode: only while suspended,
    /// armed, and with at least one line active.
    pub fn claim_remote_wakeup(&self, active: ActiveLines) -> bool {
        if !active.any() || !self.is_suspended() {
            return false;
        }
        self.wake_armed.swap(false, Ordering::AcqRel)
    }

    fn publish(&self, state: ConnectionState, wake_armed: bool) {
        // Arm after the state is visible so a claim never sees a stale
        // non-suspended state with the flag set.
        self.wake_armed.store(false, Ordering::Release);
        self.state.store(state as u8, Ordering::Release);
        if wake_armed {
            self.wake_armed.store(true, Ordering::Release);
        }
    }
}

impl Default for ConnectionCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of applying one lifecycle event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: ConnectionState,
    pub to: ConnectionState,
    pub period: IndicatorPeriod,
    pub wake_armed: bool,
}

/// Single consumer of lifecycle events and the only writer of the
/// shared [`ConnectionCell`].
pub struct ConnectionMonitor<'a> {
    cell: &'a ConnectionCell,
    state: ConnectionState,
}

impl<'a> ConnectionMonitor<'a> {
    /// Start in `NotMounted` with remote wake disarmed.
    pub fn new(cell: &'a ConnectionCell) -> Self {
        cell.publish(ConnectionState::NotMounted, false);
        Self {
            cell,
            state: ConnectionState::NotMounted,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn handle(&mut self, event: LifecycleEvent) -> Transition {
        let (next, wake_armed) = match event {
            LifecycleEvent::Mount => (ConnectionState::Mounted, false),
            LifecycleEvent::Unmount => (ConnectionState::NotMounted, false),
            LifecycleEvent::Suspend {
                remote_wake_allowed,
            } => (ConnectionState::Suspended, remote_wake_allowed),
            LifecycleEvent::Resume => (ConnectionState::Mounted, false),
        };

        let from = self.state;
        self.state = next;
        self.cell.publish(next, wake_armed);

        let period = next.indicator_period();
        info!(
            "Connection: {} -> {} on {} (blink {} ms, wake armed: {})",
            from,
            next,
            event,
            period.as_millis(),
            wake_armed
        );

        Transition {
            from,
            to: next,
            period,
            wake_armed,
        }
    }
}

/// Translates raw USB device callbacks into lifecycle events.
///
/// Suspend and resume are only forwarded while configured; a bus that
/// sleeps before enumeration stays `NotMounted`.
#[derive(Debug, Default)]
pub struct UsbLifecycle {
    configured: bool,
    remote_wake_allowed: bool,
}

impl UsbLifecycle {
    pub const fn new() -> Self {
        Self {
            configured: false,
            remote_wake_allowed: false,
        }
    }

    pub fn on_configured(&mut self, configured: bool) -> Option<LifecycleEvent> {
        if configured {
            if self.configured {
                return None;
            }
            self.configured = true;
            Some(LifecycleEvent::Mount)
        } else {
            self.on_detached()
        }
    }

    /// Bus reset, VBUS loss and deconfiguration all end the mount.
    pub fn on_detached(&mut self) -> Option<LifecycleEvent> {
        if !self.configured {
            return None;
        }
        self.configured = false;
        self.remote_wake_allowed = false;
        Some(LifecycleEvent::Unmount)
    }

    pub fn on_suspended(&mut self, suspended: bool) -> Option<LifecycleEvent> {
        if !self.configured {
            return None;
        }
        Some(if suspended {
            LifecycleEvent::Suspend {
                remote_wake_allowed: self.remote_wake_allowed,
            }
        } else {
            LifecycleEvent::Resume
        })
    }

    /// Host SET_FEATURE / CLEAR_FEATURE(DEVICE_REMOTE_WAKEUP).
    pub fn on_remote_wakeup_enabled(&mut self, enabled: bool) {
        self.remote_wake_allowed = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputLine;

    fn pressed() -> ActiveLines {
        ActiveLines::from_lines(&[InputLine::Line3])
    }

    #[test]
    fn starts_not_mounted_with_short_blink() {
        let cell = ConnectionCell::new();
        let monitor = ConnectionMonitor::new(&cell);
        assert_eq!(monitor.state(), ConnectionState::NotMounted);
        assert_eq!(cell.indicator_period().as_millis(), 250);
        assert!(!cell.is_wake_armed());
    }

    #[test]
    fn transition_table() {
        let cell = ConnectionCell::new();
        let mut monitor = ConnectionMonitor::new(&cell);

        let t = monitor.handle(LifecycleEvent::Mount);
        assert_eq!((t.from, t.to), (ConnectionState::NotMounted, ConnectionState::Mounted));
        assert_eq!(t.period, IndicatorPeriod::MOUNTED);
        assert_eq!(cell.indicator_period().as_millis(), 1000);

        let t = monitor.handle(LifecycleEvent::Suspend {
            remote_wake_allowed: true,
        });
        assert_eq!(t.to, ConnectionState::Suspended);
        assert_eq!(cell.indicator_period().as_millis(), 2500);
        assert!(t.wake_armed);
        assert!(cell.is_suspended());

        let t = monitor.handle(LifecycleEvent::Resume);
        assert_eq!(t.to, ConnectionState::Mounted);
        assert_eq!(cell.indicator_period(), IndicatorPeriod::MOUNTED);
        assert!(!cell.is_wake_armed());

        let t = monitor.handle(LifecycleEvent::Unmount);
        assert_eq!(t.to, ConnectionState::NotMounted);
        assert_eq!(cell.indicator_period(), IndicatorPeriod::NOT_MOUNTED);
    }

    #[test]
    fn suspend_without_permission_does_not_arm() {
        let cell = ConnectionCell::new();
        let mut monitor = ConnectionMonitor::new(&cell);
        monitor.handle(LifecycleEvent::Mount);
        monitor.handle(LifecycleEvent::Suspend {
            remote_wake_allowed: false,
        });

        assert!(cell.is_suspended());
        assert!(!cell.claim_remote_wakeup(pressed()));
    }

    #[test]
    fn wake_claimed_once_per_suspend_episode() {
        let cell = ConnectionCell::new();
        let mut monitor = ConnectionMonitor::new(&cell);
        monitor.handle(LifecycleEvent::Mount);
        monitor.handle(LifecycleEvent::Suspend {
            remote_wake_allowed: true,
        });

        assert!(!cell.claim_remote_wakeup(ActiveLines::NONE));
        assert!(cell.claim_remote_wakeup(pressed()));
        assert!(!cell.claim_remote_wakeup(pressed()));

        // Next episode re-arms.
        monitor.handle(LifecycleEvent::Resume);
        monitor.handle(LifecycleEvent::Suspend {
            remote_wake_allowed: true,
        });
        assert!(cell.claim_remote_wakeup(pressed()));
    }

    #[test]
    fn no_wake_while_mounted() {
        let cell = ConnectionCell::new();
        let mut monitor = ConnectionMonitor::new(&cell);
        monitor.handle(LifecycleEvent::Mount);
        assert!(!cell.claim_remote_wakeup(pressed()));
    }

    #[test]
    fn unmount_while_suspended_disarms() {
        let cell = ConnectionCell::new();
        let mut monitor = ConnectionMonitor::new(&cell);
        monitor.handle(LifecycleEvent::Mount);
        monitor.handle(LifecycleEvent::Suspend {
            remote_wake_allowed: true,
        });
        monitor.handle(LifecycleEvent::Unmount);

        assert_eq!(cell.state(), ConnectionState::NotMounted);
        assert!(!cell.is_wake_armed());
        assert!(!cell.claim_remote_wakeup(pressed()));
    }

    #[test]
    fn usb_callbacks_map_to_lifecycle_events() {
        let mut usb = UsbLifecycle::new();

        // Suspend before enumeration is not a lifecycle event.
        assert_eq!(usb.on_suspended(true), None);
        assert_eq!(usb.on_detached(), None);

        assert_eq!(usb.on_configured(true), Some(LifecycleEvent::Mount));
        assert_eq!(usb.on_configured(true), None);

        usb.on_remote_wakeup_enabled(true);
        assert_eq!(
            usb.on_suspended(true),
            Some(LifecycleEvent::Suspend {
                remote_wake_allowed: true
            })
        );
        assert_eq!(usb.on_suspended(false), Some(LifecycleEvent::Resume));

        assert_eq!(usb.on_configured(false), Some(LifecycleEvent::Unmount));
        assert_eq!(usb.on_configured(false), None);
    }

    #[test]
    fn detach_forgets_remote_wake_permission() {
        let mut usb = UsbLifecycle::new();
        usb.on_configured(true);
        usb.on_remote_wakeup_enabled(true);
        assert_eq!(usb.on_detached(), Some(LifecycleEvent::Unmount));

        usb.on_configured(true);
        assert_eq!(
            usb.on_suspended(true),
            Some(LifecycleEvent::Suspend {
                remote_wake_allowed: false
            })
        );
    }
}
