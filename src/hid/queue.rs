//! One-slot report queue in front of an IN endpoint.
//!
//! The poll loop submits into the slot and the endpoint's writer task
//! drains it. The slot counts as taken from `submit` until the writer
//! calls [`ReportQueue::complete`], so a report that is still being
//! written keeps the endpoint "not ready".

use super::HidReport;
use crate::error::{Error, Result};
use core::sync::atomic::{AtomicBool, Ordering};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

pub struct ReportQueue<M: RawMutex> {
    channel: Channel<M, HidReport, 1>,
    in_flight: AtomicBool,
}

impl<M: RawMutex> ReportQueue<M> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// `true` when a new report would be accepted.
    pub fn is_ready(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    /// Take the slot. Never waits: a busy slot is an error and the
    /// report is dropped.
    pub fn submit(&self, report: HidReport) -> Result<()> {
        let kind = report.kind();
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(Error::EndpointBusy(kind));
        }
        self.channel.try_send(report).map_err(|_| {
            self.in_flight.store(false, Ordering::Release);
            Error::EndpointBusy(kind)
        })
    }

    /// Wait for the next submitted report.
    pub async fn next(&self) -> HidReport {
        self.channel.receive().await
    }

    /// Release the slot once the endpoint write has finished.
    pub fn complete(&self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

impl<M: RawMutex> Default for ReportQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}
