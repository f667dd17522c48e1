//! Report dispatcher and the per-tick poll sequence.
//!
//! Each tick runs scan → remote-wake arbitration → resolve → dispatch.
//! A report goes out only when the bus is awake and the endpoint for its
//! kind is free; otherwise the tick's action is dropped. Nothing is
//! buffered or retried - a held line is simply resolved again next tick.

use crate::action::{ActionKind, ButtonMapping};
use crate::connection::ConnectionCell;
use crate::error::{Error, Result};
use crate::hid::{HidReport, ReportKind};
use crate::input::{ActiveLines, InputScanner};
use embedded_hal::digital::InputPin;

/// The slice of the USB stack the poll loop talks to.
pub trait HidBus {
    /// The host has suspended the bus.
    fn is_suspended(&self) -> bool;

    /// The IN endpoint for `kind` can take a new report right now.
    fn is_endpoint_ready(&self, kind: ReportKind) -> bool;

    /// Hand one report to the transmission path. Must not block.
    fn submit(&mut self, report: HidReport) -> Result<()>;

    /// Ask the stack to signal remote wakeup to the host.
    fn request_remote_wakeup(&mut self);
}

/// What the dispatcher did with one tick's action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// No action this tick.
    Idle,
    /// One report was submitted.
    Sent(ReportKind),
    /// Bus suspended; action dropped.
    Suspended,
    /// Endpoint busy; action dropped.
    NotReady(ReportKind),
    /// The transmission path refused the report; action dropped.
    Failed(Error),
}

/// Submit `action`'s report if the bus and its endpoint allow it.
pub fn dispatch<B: HidBus>(bus: &mut B, action: ActionKind) -> Dispatch {
    let Some(report) = action.report() else {
        return Dispatch::Idle;
    };

    if bus.is_suspended() {
        return Dispatch::Suspended;
    }

    let kind = report.kind();
    if !bus.is_endpoint_ready(kind) {
        trace!("{} endpoint busy, dropping report", kind);
        return Dispatch::NotReady(kind);
    }

    match bus.submit(report) {
        Ok(()) => Dispatch::Sent(kind),
        Err(e) => {
            warn!("{} report dropped: {}", kind, e);
            Dispatch::Failed(e)
        }
    }
}

/// Outcome of one poll tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    pub active: ActiveLines,
    pub action: ActionKind,
    pub woke_host: bool,
    pub dispatch: Dispatch,
}

/// The poll context: owns the scanner, reads the shared connection state.
pub struct PollLoop<'a, P> {
    scanner: InputScanner<P>,
    mapping: &'a ButtonMapping,
    connection: &'a ConnectionCell,
}

impl<'a, P: InputPin> PollLoop<'a, P> {
    pub fn new(scanner: InputScanner<P>, mapping: &'a ButtonMapping, connection: &'a ConnectionCell) -> Self {
        Self {
            scanner,
            mapping,
            connection,
        }
    }

    /// Run one scan/resolve/dispatch pass.
    pub fn tick<B: HidBus>(&mut self, bus: &mut B) -> Tick {
        let active = self.scanner.scan();

        let woke_host = self.connection.claim_remote_wakeup(active);
        if woke_host {
            info!("Input while suspended, requesting remote wakeup");
            bus.request_remote_wakeup();
        }

        let action = self.mapping.resolve(active);
        let dispatch = dispatch(bus, action);

        Tick {
            active,
            action,
            woke_host,
            dispatch,
        }
    }
}
