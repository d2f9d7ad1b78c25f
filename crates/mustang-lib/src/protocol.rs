//! Protocol constants for Fender Mustang amplifiers.
//!
//! Values decoded from USB captures of the vendor editor software.
//!
//! ## Cross-model compatibility
//!
//! Frame size, endpoints and the header/payload split are shared by every
//! V1 and V2 device. Preset counts differ between the small (I/II, Mini) and
//! big (III/IV/V, Floor) families and live in [`crate::models`].

// ── Frame geometry ──

/// Size of one interrupt frame (header + payload).
pub const PACKET_SIZE: usize = 64;

/// Size of the frame header.
pub const HEADER_SIZE: usize = 16;

/// Size of the frame payload.
pub const PAYLOAD_SIZE: usize = PACKET_SIZE - HEADER_SIZE;

/// Longest preset name the device stores.
pub const NAME_MAX_LEN: usize = 32;

/// Longest name accepted for an effect-only preset.
pub const EFFECT_NAME_MAX_LEN: usize = 24;

/// Number of frames that make up one stored preset
/// (name, amp, four effects, USB gain).
pub const BANK_FRAME_COUNT: usize = 7;

/// Number of DSP effect slots.
pub const FX_SLOT_COUNT: usize = 4;

// ── Fender USB identifiers ──

/// Fender Musical Instruments vendor ID.
pub const FENDER_VID: u16 = 0x1ed8;

/// Mustang I and II.
pub const SMALL_AMPS_PID: u16 = 0x0004;

/// Mustang III, IV and V.
pub const BIG_AMPS_PID: u16 = 0x0005;

/// Mustang Mini.
pub const MINI_PID: u16 = 0x0010;

/// Mustang Floor.
pub const FLOOR_PID: u16 = 0x0012;

/// Mustang I and II (v2 firmware generation).
pub const SMALL_AMPS_V2_PID: u16 = 0x0014;

/// Mustang III, IV and V (v2 firmware generation).
pub const BIG_AMPS_V2_PID: u16 = 0x0016;

/// Product IDs reported while a device sits in firmware-update mode.
/// Recognised during enumeration but never opened for control traffic.
pub const UPDATE_MODE_PIDS: [u16; 6] = [0x0006, 0x0007, 0x0011, 0x0013, 0x0015, 0x0017];

// ── USB transfer parameters ──

/// Interface carrying the interrupt endpoints.
pub const USB_INTERFACE: u8 = 0;

/// Interrupt OUT endpoint (host → amp).
pub const ENDPOINT_SEND: u8 = 0x01;

/// Interrupt IN endpoint (amp → host).
pub const ENDPOINT_RECEIVE: u8 = 0x81;

/// Default timeout per interrupt transfer in milliseconds.
pub const USB_TIMEOUT_MS: u64 = 500;

// ── Preset-list sizing ──

/// Response size above which the device is assumed to be a big amp.
///
/// Small amps answer the load command with 48 name frames + 7 bank frames +
/// a few trailers; big amps send 200 name frames.
pub const BIG_RESPONSE_THRESHOLD: usize = 143;

/// Name frames sent by small amps (24 presets, interleaved).
pub const SMALL_PRESET_FRAMES: usize = 48;

/// Name frames sent by big amps (100 presets, interleaved).
pub const BIG_PRESET_FRAMES: usize = 200;

// ── libusb error codes ──
//
// Transport errors are reported with the libusb code and symbolic name so
// messages match what users see from other tools talking to the amp.

pub const LIBUSB_ERROR_IO: i32 = -1;
pub const LIBUSB_ERROR_ACCESS: i32 = -3;
pub const LIBUSB_ERROR_NO_DEVICE: i32 = -4;
pub const LIBUSB_ERROR_NOT_FOUND: i32 = -5;
pub const LIBUSB_ERROR_BUSY: i32 = -6;
pub const LIBUSB_ERROR_TIMEOUT: i32 = -7;
pub const LIBUSB_ERROR_PIPE: i32 = -9;
pub const LIBUSB_ERROR_INTERRUPTED: i32 = -10;
pub const LIBUSB_ERROR_OTHER: i32 = -99;

/// Symbolic name for a libusb error code.
pub fn libusb_error_name(code: i32) -> &'static str {
    match code {
        0 => "LIBUSB_SUCCESS",
        LIBUSB_ERROR_IO => "LIBUSB_ERROR_IO",
        LIBUSB_ERROR_ACCESS => "LIBUSB_ERROR_ACCESS",
        LIBUSB_ERROR_NO_DEVICE => "LIBUSB_ERROR_NO_DEVICE",
        LIBUSB_ERROR_NOT_FOUND => "LIBUSB_ERROR_NOT_FOUND",
        LIBUSB_ERROR_BUSY => "LIBUSB_ERROR_BUSY",
        LIBUSB_ERROR_TIMEOUT => "LIBUSB_ERROR_TIMEOUT",
        LIBUSB_ERROR_PIPE => "LIBUSB_ERROR_PIPE",
        LIBUSB_ERROR_INTERRUPTED => "LIBUSB_ERROR_INTERRUPTED",
        _ => "LIBUSB_ERROR_OTHER",
    }
}
