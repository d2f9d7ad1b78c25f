//! Device transport — `Connection` trait, USB backend, discovery.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::models::{DeviceModel, KNOWN_PIDS, lookup_model};
use crate::protocol::*;

// ── Error types ──

/// A transport failure, reported with the libusb code and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbError {
    pub code: i32,
    pub name: &'static str,
    pub message: String,
}

impl UsbError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        UsbError {
            code,
            name: libusb_error_name(code),
            message: message.into(),
        }
    }
}

impl fmt::Display for UsbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, code {})", self.message, self.name, self.code)
    }
}

impl std::error::Error for UsbError {}

/// Device communication errors.
///
/// String payloads follow the convention **"context: details"** where
/// *context* names the step (e.g. `"USB open"`) and *details* describes
/// what went wrong.
#[derive(Debug)]
pub enum DeviceError {
    NotFound,
    /// Only a device in firmware-update mode is attached.
    UpdateMode(u16),
    OpenFailed(String),
    /// Transfer attempted on a closed connection.
    NotOpen,
    Usb(UsbError),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NotFound => write!(f, "No device found"),
            DeviceError::UpdateMode(pid) => write!(
                f,
                "Device 0x{pid:04x} is in firmware update mode; power-cycle the amp"
            ),
            DeviceError::OpenFailed(e) => write!(f, "Failed to open device: {e}"),
            DeviceError::NotOpen => write!(f, "Device not connected"),
            DeviceError::Usb(e) => write!(f, "USB error: {e}"),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::Usb(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UsbError> for DeviceError {
    fn from(e: UsbError) -> Self {
        DeviceError::Usb(e)
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;

fn usb_error_from_io(e: &std::io::Error, context: &str) -> UsbError {
    use std::io::ErrorKind;
    let code = match e.kind() {
        ErrorKind::PermissionDenied => LIBUSB_ERROR_ACCESS,
        ErrorKind::NotFound => LIBUSB_ERROR_NOT_FOUND,
        ErrorKind::ResourceBusy => LIBUSB_ERROR_BUSY,
        ErrorKind::TimedOut => LIBUSB_ERROR_TIMEOUT,
        ErrorKind::Interrupted => LIBUSB_ERROR_INTERRUPTED,
        _ => LIBUSB_ERROR_IO,
    };
    UsbError::new(code, format!("{context}: {e}"))
}

fn usb_error_from_transfer(e: nusb::transfer::TransferError, context: &str) -> UsbError {
    use nusb::transfer::TransferError;
    let code = match e {
        TransferError::Stall => LIBUSB_ERROR_PIPE,
        TransferError::Disconnected => LIBUSB_ERROR_NO_DEVICE,
        TransferError::Fault => LIBUSB_ERROR_IO,
        TransferError::Cancelled => LIBUSB_ERROR_TIMEOUT,
        _ => LIBUSB_ERROR_OTHER,
    };
    UsbError::new(code, format!("{context}: {e}"))
}

// ── Connection trait ──

/// Byte-level link to an amp. One frame per call.
pub trait Connection {
    /// Write one frame; returns the number of bytes transferred.
    fn send(&mut self, data: &[u8]) -> Result<usize>;

    /// Read one frame of at most `size` bytes. An empty buffer means the
    /// amp has nothing more to say.
    fn receive(&mut self, size: usize) -> Result<Vec<u8>>;

    /// Release the device. Safe to call more than once.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn send(&mut self, data: &[u8]) -> Result<usize> {
        (**self).send(data)
    }

    fn receive(&mut self, size: usize) -> Result<Vec<u8>> {
        (**self).receive(size)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

// ── USB backend ──

/// Interrupt-endpoint connection to a Mustang over nusb.
///
/// Transfers are futures; a private current-thread runtime drives each one
/// to completion under the configured timeout.
pub struct UsbConnection {
    interface: Option<nusb::Interface>,
    runtime: tokio::runtime::Runtime,
    timeout: Duration,
}

impl UsbConnection {
    fn new(interface: nusb::Interface, timeout: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| DeviceError::OpenFailed(format!("transfer runtime: {e}")))?;
        Ok(UsbConnection {
            interface: Some(interface),
            runtime,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Connection for UsbConnection {
    fn send(&mut self, data: &[u8]) -> Result<usize> {
        let interface = self.interface.as_ref().ok_or(DeviceError::NotOpen)?;
        let timeout = self.timeout;
        let transfer = interface.interrupt_out(ENDPOINT_SEND, data.to_vec());
        let completion = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, transfer).await })
            .map_err(|_| {
                UsbError::new(
                    LIBUSB_ERROR_TIMEOUT,
                    format!("interrupt write: no answer within {} ms", timeout.as_millis()),
                )
            })?;
        let sent = completion
            .into_result()
            .map_err(|e| usb_error_from_transfer(e, "interrupt write"))?;
        Ok(sent.actual_length())
    }

    fn receive(&mut self, size: usize) -> Result<Vec<u8>> {
        let interface = self.interface.as_ref().ok_or(DeviceError::NotOpen)?;
        let timeout = self.timeout;
        let transfer =
            interface.interrupt_in(ENDPOINT_RECEIVE, nusb::transfer::RequestBuffer::new(size));
        let Ok(completion) = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, transfer).await })
        else {
            // The amp stops answering once a response stream is complete.
            return Ok(Vec::new());
        };
        completion
            .into_result()
            .map_err(|e| usb_error_from_transfer(e, "interrupt read").into())
    }

    fn close(&mut self) {
        if self.interface.take().is_some() {
            log::info!("USB connection closed");
        }
    }

    fn is_open(&self) -> bool {
        self.interface.is_some()
    }
}

impl Drop for UsbConnection {
    fn drop(&mut self) {
        self.close();
    }
}

// ── Device enumeration ──

/// An attached Fender device (not opened).
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredDevice {
    /// Bus location, e.g. `usb:001/004 [1ed8:0005]`.
    pub path: String,
    pub product_id: u16,
    pub serial: Option<String>,
    /// `None` for update-mode devices.
    pub model: Option<DeviceModel>,
    pub update_mode: bool,
}

fn is_known_pid(pid: u16) -> bool {
    KNOWN_PIDS.contains(&pid) || UPDATE_MODE_PIDS.contains(&pid)
}

/// List attached Mustang devices, including ones in update mode.
///
/// Enumeration failures yield an empty list.
pub fn enumerate_devices() -> Vec<DiscoveredDevice> {
    let Ok(devices) = nusb::list_devices() else {
        return Vec::new();
    };

    devices
        .filter(|dev| dev.vendor_id() == FENDER_VID && is_known_pid(dev.product_id()))
        .map(|dev| {
            let pid = dev.product_id();
            DiscoveredDevice {
                path: format!(
                    "usb:{:03}/{:03} [{:04x}:{:04x}]",
                    dev.bus_number(),
                    dev.device_address(),
                    dev.vendor_id(),
                    pid,
                ),
                product_id: pid,
                serial: dev.serial_number().map(|s| s.to_string()),
                model: lookup_model(pid).cloned(),
                update_mode: UPDATE_MODE_PIDS.contains(&pid),
            }
        })
        .collect()
}

/// Open the first attached amp in control mode.
///
/// With `preferred_pid` set, only that product ID is considered. A bus that
/// can't be enumerated counts as having no amp, as in [`enumerate_devices`].
pub fn open_connection(
    preferred_pid: Option<u16>,
    timeout: Duration,
) -> Result<(UsbConnection, DeviceModel)> {
    let devices: Vec<nusb::DeviceInfo> = match nusb::list_devices() {
        Ok(devices) => devices
            .filter(|dev| dev.vendor_id() == FENDER_VID)
            .collect(),
        Err(e) => {
            log::debug!("USB enumeration failed: {e}");
            return Err(DeviceError::NotFound);
        }
    };

    let found = devices.iter().find_map(|dev| {
        let pid = dev.product_id();
        if preferred_pid.is_some_and(|want| want != pid) {
            return None;
        }
        lookup_model(pid).map(|model| (dev, model))
    });

    let Some((device_info, model)) = found else {
        if let Some(dev) = devices
            .iter()
            .find(|dev| UPDATE_MODE_PIDS.contains(&dev.product_id()))
        {
            return Err(DeviceError::UpdateMode(dev.product_id()));
        }
        return Err(DeviceError::NotFound);
    };

    log::info!(
        "Found {} on bus {} addr {}",
        model.name,
        device_info.bus_number(),
        device_info.device_address()
    );

    let device = device_info
        .open()
        .map_err(|e| usb_error_from_io(&e, "USB open"))?;
    let interface = device
        .detach_and_claim_interface(USB_INTERFACE)
        .map_err(|e| usb_error_from_io(&e, "claim interface"))?;

    let connection = UsbConnection::new(interface, timeout)?;
    Ok((connection, model.clone()))
}

// ── Mock connection for testing ──

/// In-memory connection for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;

    /// Records every frame sent and replays scripted responses. Once the
    /// script runs dry every receive returns an empty buffer.
    #[derive(Debug)]
    pub struct MockConnection {
        /// Frames passed to `send`, in order.
        pub sent: Vec<Vec<u8>>,
        /// Number of `receive` calls.
        pub receives: usize,
        responses: VecDeque<Vec<u8>>,
        open: bool,
        /// If true, `send` fails with a stalled-pipe error.
        pub fail_send: bool,
    }

    impl Default for MockConnection {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockConnection {
        pub fn new() -> Self {
            MockConnection {
                sent: Vec::new(),
                receives: 0,
                responses: VecDeque::new(),
                open: true,
                fail_send: false,
            }
        }

        /// Queue one response frame.
        pub fn push_response(&mut self, frame: impl Into<Vec<u8>>) {
            self.responses.push_back(frame.into());
        }

        /// Queue several response frames.
        pub fn push_responses<I, F>(&mut self, frames: I)
        where
            I: IntoIterator<Item = F>,
            F: Into<Vec<u8>>,
        {
            self.responses.extend(frames.into_iter().map(Into::into));
        }

        /// Queue `count` single-frame acknowledgements.
        pub fn push_acks(&mut self, count: usize) {
            for _ in 0..count {
                self.responses.push_back(vec![0u8; PACKET_SIZE]);
            }
        }

        /// Queue the empty read that ends a response stream.
        pub fn push_end(&mut self) {
            self.responses.push_back(Vec::new());
        }

        pub fn pending_responses(&self) -> usize {
            self.responses.len()
        }
    }

    impl Connection for MockConnection {
        fn send(&mut self, data: &[u8]) -> Result<usize> {
            if !self.open {
                return Err(DeviceError::NotOpen);
            }
            if self.fail_send {
                return Err(UsbError::new(LIBUSB_ERROR_PIPE, "mock: send failure injected").into());
            }
            self.sent.push(data.to_vec());
            Ok(data.len())
        }

        fn receive(&mut self, size: usize) -> Result<Vec<u8>> {
            if !self.open {
                return Err(DeviceError::NotOpen);
            }
            self.receives += 1;
            let mut frame = self.responses.pop_front().unwrap_or_default();
            frame.truncate(size);
            Ok(frame)
        }

        fn close(&mut self) {
            self.open = false;
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }
}
