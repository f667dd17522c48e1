//! USB HID composite device - keyboard + mouse.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes two HID interfaces, each with its own IN
//! endpoint. Reports reach an endpoint through a one-slot queue; the
//! slot stays taken until the write completes, which is what the poll
//! loop sees as "endpoint not ready".

use crate::usb::lifecycle::{remote_wakeup_signal, LifecycleHandler};
use defmt::{info, warn, Debug2Format};
use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, UsbDevice};
use macropad::config;
use macropad::connection::ConnectionCell;
use macropad::dispatch::HidBus;
use macropad::hid::control::{ControlRequests, ReportType};
use macropad::hid::queue::ReportQueue;
use macropad::hid::{HidReport, ReportKind, MAX_REPORT_SIZE};
use macropad::{Error, Result};
use static_cell::StaticCell;
use usbd_hid::descriptor::{KeyboardReport as KeyboardDescriptor, MouseReport as MouseDescriptor, SerializedDescriptor};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Max packet size of both HID IN endpoints.
const HID_PACKET_SIZE: usize = 8;

pub type UsbHidWriter = HidWriter<'static, UsbDriver, HID_PACKET_SIZE>;

static KB_STATE: StaticCell<State> = StaticCell::new();
static MOUSE_STATE: StaticCell<State> = StaticCell::new();
static KB_REQUESTS: StaticCell<HidRequests> = StaticCell::new();
static MOUSE_REQUESTS: StaticCell<HidRequests> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_LIFECYCLE_HANDLER: StaticCell<LifecycleHandler> = StaticCell::new();

type EndpointQueue = ReportQueue<CriticalSectionRawMutex>;

static KEYBOARD_QUEUE: EndpointQueue = ReportQueue::new();
static MOUSE_QUEUE: EndpointQueue = ReportQueue::new();

fn queue_for(kind: ReportKind) -> &'static EndpointQueue {
    match kind {
        ReportKind::Keyboard => &KEYBOARD_QUEUE,
        ReportKind::Mouse => &MOUSE_QUEUE,
    }
}

/// The poll loop's view of the USB stack.
pub struct UsbReportBus {
    connection: &'static ConnectionCell,
}

impl UsbReportBus {
    pub fn new(connection: &'static ConnectionCell) -> Self {
        Self { connection }
    }
}

impl HidBus for UsbReportBus {
    fn is_suspended(&self) -> bool {
        self.connection.is_suspended()
    }

    fn is_endpoint_ready(&self, kind: ReportKind) -> bool {
        self.connection.is_mounted() && queue_for(kind).is_ready()
    }

    fn submit(&mut self, report: HidReport) -> Result<()> {
        if !self.connection.is_mounted() {
            return Err(Error::NotReady);
        }
        queue_for(report.kind()).submit(report)
    }

    fn request_remote_wakeup(&mut self) {
        remote_wakeup_signal().signal(());
    }
}

/// GET_REPORT / SET_REPORT for one HID interface.
struct HidRequests {
    control: ControlRequests,
}

impl HidRequests {
    const fn new(interface: ReportKind) -> Self {
        Self {
            control: ControlRequests::new(interface),
        }
    }
}

fn split_report_id(id: ReportId) -> (ReportType, u8) {
    match id {
        ReportId::In(id) => (ReportType::Input, id),
        ReportId::Out(id) => (ReportType::Output, id),
        ReportId::Feature(id) => (ReportType::Feature, id),
    }
}

impl RequestHandler for HidRequests {
    fn get_report(&mut self, id: ReportId, buf: &mut [u8]) -> Option<usize> {
        let (report_type, report_id) = split_report_id(id);
        self.control.get_report(report_type, report_id, buf).ok()
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        let (report_type, report_id) = split_report_id(id);
        self.control.set_report(report_type, report_id, data);
        OutResponse::Accepted
    }
}

/// Build result containing the USB device runner and the two HID writers.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard_writer: UsbHidWriter,
    pub mouse_writer: UsbHidWriter,
}

/// Initialise the USB stack and create the composite HID device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;
    usb_config.supports_remote_wakeup = true;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(driver, usb_config, config_desc, bos_desc, msos_desc, ctrl_buf);

    builder.handler(USB_LIFECYCLE_HANDLER.init(LifecycleHandler::new()));

    let kb_config = HidConfig {
        report_descriptor: KeyboardDescriptor::desc(),
        request_handler: Some(KB_REQUESTS.init(HidRequests::new(ReportKind::Keyboard))),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: HID_PACKET_SIZE as u16,
    };
    let keyboard_writer = HidWriter::new(&mut builder, KB_STATE.init(State::new()), kb_config);

    let mouse_config = HidConfig {
        report_descriptor: MouseDescriptor::desc(),
        request_handler: Some(MOUSE_REQUESTS.init(HidRequests::new(ReportKind::Mouse))),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: HID_PACKET_SIZE as u16,
    };
    let mouse_writer = HidWriter::new(&mut builder, MOUSE_STATE.init(State::new()), mouse_config);

    let device = builder.build();

    info!("USB HID composite device initialised (keyboard + mouse)");

    UsbHidDevice {
        device,
        keyboard_writer,
        mouse_writer,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// While the bus is suspended, waits for either a host resume or a
/// remote-wake request from the poll loop, whichever comes first.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    let wake = remote_wakeup_signal();

    loop {
        device.run_until_suspend().await;
        // A request raised before this suspend belongs to an old episode.
        wake.reset();

        match select(device.wait_resume(), wake.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                info!("Signalling remote wakeup");
                if let Err(e) = device.remote_wakeup().await {
                    warn!("Remote wakeup failed: {}", Debug2Format(&e));
                }
            }
        }
    }
}

/// Drain one report queue into its HID endpoint.
pub async fn run_report_writer(kind: ReportKind, mut writer: UsbHidWriter) -> ! {
    info!("{} report writer started", kind);
    let queue = queue_for(kind);
    let mut buf = [0u8; MAX_REPORT_SIZE];

    loop {
        let report = queue.next().await;
        if let Err(e) = write_report(&mut writer, &report, &mut buf).await {
            warn!("{} report dropped: {}", kind, e);
        }
        queue.complete();
    }
}

async fn write_report(writer: &mut UsbHidWriter, report: &HidReport, buf: &mut [u8]) -> Result<()> {
    let n = report.serialize(buf)?;
    writer.write(&buf[..n]).await.map_err(|e| {
        warn!("USB write failed: {}", Debug2Format(&e));
        Error::Usb
    })
}
