//! macropad firmware entry point (nRF52840).
//!
//! Tasks:
//! - `usb_task`        - runs the `embassy-usb` device, answers remote-wake requests
//! - `lifecycle_task`  - single consumer of USB lifecycle events, owns the monitor
//! - `poll_task`       - scan → resolve → dispatch every `POLL_INTERVAL_MS`
//! - `*_writer_task`   - drain the keyboard / mouse report slots into their endpoints
//! - `indicator_task`  - blinks the status LED at the connection-state period
//!
//! The only planned failure is a task that cannot be spawned at start-up,
//! which resets the chip.

#![no_std]
#![no_main]

mod usb;

use cortex_m::peripheral::SCB;
use defmt::{error, info};
use embassy_executor::{SpawnToken, Spawner};
use embassy_nrf::config::HfclkSource;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_time::{Duration, Ticker, Timer};
use macropad::config::{self, LINE_COUNT};
use macropad::connection::{ConnectionCell, ConnectionMonitor};
use macropad::dispatch::PollLoop;
use macropad::hid::ReportKind;
use macropad::indicator::Indicator;
use macropad::input::InputScanner;
use macropad::BUTTON_MAPPING;
use usb::hid_device::{self, UsbHidWriter, UsbReportBus};
use {defmt_rtt as _, panic_probe as _};

static CONNECTION: ConnectionCell = ConnectionCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // USB needs the external high-frequency crystal.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    info!("========================================");
    info!("macropad v{}", env!("CARGO_PKG_VERSION"));
    info!("USB: VID=0x{:04X} PID=0x{:04X}", config::USB_VID, config::USB_PID);
    info!("Lines: {}, poll every {} ms", LINE_COUNT, config::POLL_INTERVAL_MS);
    info!("========================================");

    let lines = [
        Input::new(p.P0_11, Pull::Up),
        Input::new(p.P0_12, Pull::Up),
        Input::new(p.P0_24, Pull::Up),
        Input::new(p.P0_25, Pull::Up),
        Input::new(p.P0_08, Pull::Up),
        Input::new(p.P0_07, Pull::Up),
    ];
    let led = Output::new(p.P0_13, Level::High, OutputDrive::Standard);

    let usb = hid_device::init(p.USBD);

    spawn_or_reset(&spawner, lifecycle_task(&CONNECTION));
    spawn_or_reset(&spawner, usb_task(usb.device));
    spawn_or_reset(&spawner, keyboard_writer_task(usb.keyboard_writer));
    spawn_or_reset(&spawner, mouse_writer_task(usb.mouse_writer));
    spawn_or_reset(&spawner, poll_task(lines, &CONNECTION));
    spawn_or_reset(&spawner, indicator_task(led, &CONNECTION));

    info!("All tasks spawned, waiting for USB host");
}

fn spawn_or_reset<S>(spawner: &Spawner, token: SpawnToken<S>) {
    if spawner.spawn(token).is_err() {
        error!("Task spawn failed, resetting");
        SCB::sys_reset();
    }
}

#[embassy_executor::task]
async fn usb_task(device: embassy_usb::UsbDevice<'static, hid_device::UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn keyboard_writer_task(writer: UsbHidWriter) -> ! {
    hid_device::run_report_writer(ReportKind::Keyboard, writer).await
}

#[embassy_executor::task]
async fn mouse_writer_task(writer: UsbHidWriter) -> ! {
    hid_device::run_report_writer(ReportKind::Mouse, writer).await
}

#[embassy_executor::task]
async fn lifecycle_task(connection: &'static ConnectionCell) -> ! {
    info!("Lifecycle task started");
    let mut monitor = ConnectionMonitor::new(connection);
    let events = usb::lifecycle::events();

    loop {
        monitor.handle(events.receive().await);
    }
}

#[embassy_executor::task]
async fn poll_task(lines: [Input<'static>; LINE_COUNT], connection: &'static ConnectionCell) -> ! {
    info!("Poll task started");
    let mut poll = PollLoop::new(InputScanner::new(lines), &BUTTON_MAPPING, connection);
    let mut bus = UsbReportBus::new(connection);
    let mut ticker = Ticker::every(Duration::from_millis(config::POLL_INTERVAL_MS));

    loop {
        ticker.next().await;
        poll.tick(&mut bus);
    }
}

#[embassy_executor::task]
async fn indicator_task(mut led: Output<'static>, connection: &'static ConnectionCell) -> ! {
    let mut indicator = Indicator::new();

    loop {
        led.set_level(if indicator.step() { Level::High } else { Level::Low });
        let period = indicator.next_period(connection);
        Timer::after(Duration::from_millis(period.as_millis().into())).await;
    }
}
