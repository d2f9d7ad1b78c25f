//! Frame codec — 16-byte header + 48-byte payload.
//!
//! Every exchange with the amp is one 64-byte interrupt frame. The header
//! says what phase of the protocol the frame belongs to, what kind of frame
//! it is and which DSP it addresses; the payload layout depends on that
//! target. Offsets below are fixed by the firmware.

use std::fmt;

use crate::protocol::{HEADER_SIZE, NAME_MAX_LEN, PACKET_SIZE, PAYLOAD_SIZE};

// ── Error type ──

/// Frame decoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    InvalidLength { expected: usize, actual: usize },
    UnknownType(u8),
    UnknownDsp(u8),
    /// A valid DSP byte that doesn't belong where it was found
    /// (e.g. an amp frame in an effect position).
    UnexpectedDsp(u8),
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::InvalidLength { expected, actual } => {
                write!(f, "Invalid frame length: expected {expected} bytes, got {actual}")
            }
            PacketError::UnknownType(b) => write!(f, "Unknown frame type 0x{b:02x}"),
            PacketError::UnknownDsp(b) => write!(f, "Unknown DSP target 0x{b:02x}"),
            PacketError::UnexpectedDsp(b) => write!(f, "Unexpected DSP target 0x{b:02x}"),
        }
    }
}

impl std::error::Error for PacketError {}

pub type Result<T> = std::result::Result<T, PacketError>;

// ── Header fields ──

/// Protocol phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init0,
    Init1,
    Ready,
    /// Any byte outside the known phases. Encodes as `0xff`, which is what
    /// the load command carries.
    Unknown,
}

impl Stage {
    pub fn to_byte(self) -> u8 {
        match self {
            Stage::Init0 => 0x00,
            Stage::Init1 => 0x1a,
            Stage::Ready => 0x1c,
            Stage::Unknown => 0xff,
        }
    }

    pub fn from_byte(b: u8) -> Self {
        match b {
            0x00 => Stage::Init0,
            0x1a => Stage::Init1,
            0x1c => Stage::Ready,
            _ => Stage::Unknown,
        }
    }
}

/// Frame kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Operation,
    Data,
    Init0,
    Load,
}

impl Type {
    /// Second init frame. Shares its byte with [`Type::Data`].
    pub const INIT1: Type = Type::Data;

    pub fn to_byte(self) -> u8 {
        match self {
            Type::Operation => 0x01,
            Type::Data => 0x03,
            Type::Init0 => 0xc3,
            Type::Load => 0xc1,
        }
    }

    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0x01 => Ok(Type::Operation),
            0x03 => Ok(Type::Data),
            0xc3 => Ok(Type::Init0),
            0xc1 => Ok(Type::Load),
            other => Err(PacketError::UnknownType(other)),
        }
    }
}

/// Amp subsystem a frame targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dsp {
    None,
    Amp,
    UsbGain,
    Effect0,
    Effect1,
    Effect2,
    Effect3,
    OpSave,
    OpSaveEffectName,
    OpSelectMemBank,
}

impl Dsp {
    pub fn to_byte(self) -> u8 {
        match self {
            Dsp::None => 0x00,
            Dsp::Amp => 0x05,
            Dsp::UsbGain => 0x0d,
            Dsp::Effect0 => 0x06,
            Dsp::Effect1 => 0x07,
            Dsp::Effect2 => 0x08,
            Dsp::Effect3 => 0x09,
            Dsp::OpSave => 0x03,
            Dsp::OpSaveEffectName => 0x04,
            Dsp::OpSelectMemBank => 0x01,
        }
    }

    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0x00 => Ok(Dsp::None),
            0x05 => Ok(Dsp::Amp),
            0x0d => Ok(Dsp::UsbGain),
            0x06 => Ok(Dsp::Effect0),
            0x07 => Ok(Dsp::Effect1),
            0x08 => Ok(Dsp::Effect2),
            0x09 => Ok(Dsp::Effect3),
            0x03 => Ok(Dsp::OpSave),
            0x04 => Ok(Dsp::OpSaveEffectName),
            0x01 => Ok(Dsp::OpSelectMemBank),
            other => Err(PacketError::UnknownDsp(other)),
        }
    }

    /// Effect DSP for a family index (0..4).
    pub fn effect(index: usize) -> Option<Self> {
        match index {
            0 => Some(Dsp::Effect0),
            1 => Some(Dsp::Effect1),
            2 => Some(Dsp::Effect2),
            3 => Some(Dsp::Effect3),
            _ => None,
        }
    }

    /// Family index (0..4) of an effect DSP, `None` for other targets.
    pub fn effect_index(self) -> Option<usize> {
        match self {
            Dsp::Effect0 => Some(0),
            Dsp::Effect1 => Some(1),
            Dsp::Effect2 => Some(2),
            Dsp::Effect3 => Some(3),
            _ => None,
        }
    }
}

// ── Header ──

const OFF_STAGE: usize = 0;
const OFF_TYPE: usize = 1;
const OFF_DSP: usize = 2;
const OFF_QUIRK0: usize = 3;
const OFF_SLOT: usize = 4;
const OFF_QUIRK1: usize = 6;
const OFF_QUIRK2: usize = 7;

/// Frame header. Bytes 5 and 8..16 are always zero on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    stage: Stage,
    ty: Type,
    dsp: Dsp,
    slot: u8,
    quirk: [u8; 3],
}

impl Header {
    pub fn new(stage: Stage, ty: Type, dsp: Dsp) -> Self {
        Header {
            stage,
            ty,
            dsp,
            slot: 0,
            quirk: [0; 3],
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub fn packet_type(&self) -> Type {
        self.ty
    }

    pub fn set_type(&mut self, ty: Type) {
        self.ty = ty;
    }

    pub fn dsp(&self) -> Dsp {
        self.dsp
    }

    pub fn set_dsp(&mut self, dsp: Dsp) {
        self.dsp = dsp;
    }

    /// Preset slot (save / select-bank frames).
    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub fn set_slot(&mut self, slot: u8) {
        self.slot = slot;
    }

    /// Bytes 3, 6 and 7. Byte 3 doubles as the effect family code in
    /// save and apply frames.
    pub fn unknown(&self) -> (u8, u8, u8) {
        (self.quirk[0], self.quirk[1], self.quirk[2])
    }

    pub fn set_unknown(&mut self, value0: u8, value1: u8, value2: u8) {
        self.quirk = [value0, value1, value2];
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[OFF_STAGE] = self.stage.to_byte();
        bytes[OFF_TYPE] = self.ty.to_byte();
        bytes[OFF_DSP] = self.dsp.to_byte();
        bytes[OFF_QUIRK0] = self.quirk[0];
        bytes[OFF_SLOT] = self.slot;
        bytes[OFF_QUIRK1] = self.quirk[1];
        bytes[OFF_QUIRK2] = self.quirk[2];
        bytes
    }

    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        Ok(Header {
            stage: Stage::from_byte(bytes[OFF_STAGE]),
            ty: Type::from_byte(bytes[OFF_TYPE])?,
            dsp: Dsp::from_byte(bytes[OFF_DSP])?,
            slot: bytes[OFF_SLOT],
            quirk: [bytes[OFF_QUIRK0], bytes[OFF_QUIRK1], bytes[OFF_QUIRK2]],
        })
    }
}

// ── Payloads ──

mod sealed {
    pub trait Sealed {}
}

/// One of the fixed payload layouts. The set is closed: empty, name,
/// effect and amp.
pub trait Payload: sealed::Sealed + Default + Clone + PartialEq + fmt::Debug {
    fn from_bytes(bytes: &[u8; PAYLOAD_SIZE]) -> Self;
    fn to_bytes(&self) -> [u8; PAYLOAD_SIZE];
}

macro_rules! byte_field {
    ($(#[$meta:meta])* $get:ident, $set:ident, $offset:expr) => {
        $(#[$meta])*
        pub fn $get(&self) -> u8 {
            self.bytes[$offset]
        }

        pub fn $set(&mut self, value: u8) {
            self.bytes[$offset] = value;
        }
    };
}

/// Payload of command frames (init, load, apply, select bank).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmptyPayload;

impl sealed::Sealed for EmptyPayload {}

impl Payload for EmptyPayload {
    fn from_bytes(_bytes: &[u8; PAYLOAD_SIZE]) -> Self {
        EmptyPayload
    }

    fn to_bytes(&self) -> [u8; PAYLOAD_SIZE] {
        [0; PAYLOAD_SIZE]
    }
}

/// Preset name, NUL-padded ASCII.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePayload {
    bytes: [u8; PAYLOAD_SIZE],
}

impl Default for NamePayload {
    fn default() -> Self {
        NamePayload {
            bytes: [0; PAYLOAD_SIZE],
        }
    }
}

impl NamePayload {
    /// Name up to the first NUL, at most [`NAME_MAX_LEN`] bytes.
    pub fn name(&self) -> String {
        parse_name(&self.bytes[..NAME_MAX_LEN])
    }

    /// Store `name`, truncated to [`NAME_MAX_LEN`] bytes.
    pub fn set_name(&mut self, name: &str) {
        self.bytes[..NAME_MAX_LEN].fill(0);
        let src = name.as_bytes();
        let len = src.len().min(NAME_MAX_LEN);
        self.bytes[..len].copy_from_slice(&src[..len]);
    }
}

impl sealed::Sealed for NamePayload {}

impl Payload for NamePayload {
    fn from_bytes(bytes: &[u8; PAYLOAD_SIZE]) -> Self {
        NamePayload { bytes: *bytes }
    }

    fn to_bytes(&self) -> [u8; PAYLOAD_SIZE] {
        self.bytes
    }
}

/// Parse a NUL-terminated name field.
pub fn parse_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

const EFFECT_OFF_MODEL: usize = 0;
const EFFECT_OFF_SLOT: usize = 2;
const EFFECT_OFF_UNKNOWN: usize = 3;
const EFFECT_OFF_KNOBS: usize = 16;

/// Number of knobs an effect frame carries.
pub const KNOB_COUNT: usize = 6;

/// Effect model, slot and knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectPayload {
    bytes: [u8; PAYLOAD_SIZE],
}

impl Default for EffectPayload {
    fn default() -> Self {
        EffectPayload {
            bytes: [0; PAYLOAD_SIZE],
        }
    }
}

impl EffectPayload {
    byte_field!(
        /// Effect model ID.
        model,
        set_model,
        EFFECT_OFF_MODEL
    );
    byte_field!(
        /// Physical slot; 4..8 means the effects loop.
        slot,
        set_slot,
        EFFECT_OFF_SLOT
    );

    pub fn unknown(&self) -> (u8, u8, u8) {
        let u = &self.bytes[EFFECT_OFF_UNKNOWN..EFFECT_OFF_UNKNOWN + 3];
        (u[0], u[1], u[2])
    }

    pub fn set_unknown(&mut self, value0: u8, value1: u8, value2: u8) {
        self.bytes[EFFECT_OFF_UNKNOWN..EFFECT_OFF_UNKNOWN + 3]
            .copy_from_slice(&[value0, value1, value2]);
    }

    pub fn knobs(&self) -> [u8; KNOB_COUNT] {
        let mut knobs = [0u8; KNOB_COUNT];
        knobs.copy_from_slice(&self.bytes[EFFECT_OFF_KNOBS..EFFECT_OFF_KNOBS + KNOB_COUNT]);
        knobs
    }

    pub fn set_knobs(&mut self, knobs: [u8; KNOB_COUNT]) {
        self.bytes[EFFECT_OFF_KNOBS..EFFECT_OFF_KNOBS + KNOB_COUNT].copy_from_slice(&knobs);
    }
}

impl sealed::Sealed for EffectPayload {}

impl Payload for EffectPayload {
    fn from_bytes(bytes: &[u8; PAYLOAD_SIZE]) -> Self {
        EffectPayload { bytes: *bytes }
    }

    fn to_bytes(&self) -> [u8; PAYLOAD_SIZE] {
        self.bytes
    }
}

/// Amplifier voice. Also used for the USB gain sub-frame, where only
/// byte 0 is meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmpPayload {
    bytes: [u8; PAYLOAD_SIZE],
}

impl Default for AmpPayload {
    fn default() -> Self {
        AmpPayload {
            bytes: [0; PAYLOAD_SIZE],
        }
    }
}

const AMP_OFF_UNKNOWN: [usize; 5] = [28, 29, 30, 34, 38];

impl AmpPayload {
    byte_field!(
        /// Amp model ID.
        model,
        set_model,
        0
    );
    byte_field!(
        /// USB gain; shares byte 0 with the model ID.
        usb_gain,
        set_usb_gain,
        0
    );
    byte_field!(volume, set_volume, 16);
    byte_field!(gain, set_gain, 17);
    byte_field!(gain2, set_gain2, 18);
    byte_field!(master_volume, set_master_volume, 19);
    byte_field!(treble, set_treble, 20);
    byte_field!(middle, set_middle, 21);
    byte_field!(bass, set_bass, 22);
    byte_field!(presence, set_presence, 23);
    byte_field!(depth, set_depth, 25);
    byte_field!(bias, set_bias, 26);
    byte_field!(noise_gate, set_noise_gate, 31);
    byte_field!(threshold, set_threshold, 32);
    byte_field!(cabinet, set_cabinet, 33);
    byte_field!(sag, set_sag, 35);
    byte_field!(brightness, set_brightness, 36);

    /// Model quirk bytes at 28, 29, 30, 34 and 38.
    pub fn unknown(&self) -> [u8; 5] {
        AMP_OFF_UNKNOWN.map(|off| self.bytes[off])
    }

    pub fn set_unknown(&mut self, values: [u8; 5]) {
        for (off, value) in AMP_OFF_UNKNOWN.into_iter().zip(values) {
            self.bytes[off] = value;
        }
    }
}

impl sealed::Sealed for AmpPayload {}

impl Payload for AmpPayload {
    fn from_bytes(bytes: &[u8; PAYLOAD_SIZE]) -> Self {
        AmpPayload { bytes: *bytes }
    }

    fn to_bytes(&self) -> [u8; PAYLOAD_SIZE] {
        self.bytes
    }
}

// ── Packet ──

/// One 64-byte frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet<P: Payload> {
    header: Header,
    payload: P,
}

impl<P: Payload> Packet<P> {
    pub fn new(header: Header, payload: P) -> Self {
        Packet { header, payload }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn set_header(&mut self, header: Header) {
        self.header = header;
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn set_payload(&mut self, payload: P) {
        self.payload = payload;
    }

    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut frame = [0u8; PACKET_SIZE];
        frame[..HEADER_SIZE].copy_from_slice(&self.header.to_bytes());
        frame[HEADER_SIZE..].copy_from_slice(&self.payload.to_bytes());
        frame
    }

    /// Decode a raw frame. Fails on a wrong length or an unknown
    /// type/DSP byte.
    pub fn from_bytes(frame: &[u8]) -> Result<Self> {
        let frame: &[u8; PACKET_SIZE] =
            frame.try_into().map_err(|_| PacketError::InvalidLength {
                expected: PACKET_SIZE,
                actual: frame.len(),
            })?;
        let mut head = [0u8; HEADER_SIZE];
        head.copy_from_slice(&frame[..HEADER_SIZE]);
        let mut body = [0u8; PAYLOAD_SIZE];
        body.copy_from_slice(&frame[HEADER_SIZE..]);
        Ok(Packet {
            header: Header::from_bytes(&head)?,
            payload: P::from_bytes(&body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Stage / Type / Dsp ──

    #[test]
    fn stage_bytes() {
        assert_eq!(Stage::Init0.to_byte(), 0x00);
        assert_eq!(Stage::Init1.to_byte(), 0x1a);
        assert_eq!(Stage::Ready.to_byte(), 0x1c);
        assert_eq!(Stage::from_byte(0x1c), Stage::Ready);
        assert_eq!(Stage::from_byte(0x1a), Stage::Init1);
    }

    #[test]
    fn unrecognized_stage_is_unknown() {
        assert_eq!(Stage::from_byte(0x42), Stage::Unknown);
        assert_eq!(Stage::from_byte(0xff), Stage::Unknown);
    }

    #[test]
    fn type_bytes() {
        assert_eq!(Type::Operation.to_byte(), 0x01);
        assert_eq!(Type::Data.to_byte(), 0x03);
        assert_eq!(Type::Init0.to_byte(), 0xc3);
        assert_eq!(Type::Load.to_byte(), 0xc1);
        assert_eq!(Type::INIT1.to_byte(), 0x03);
        assert_eq!(Type::from_byte(0x03), Ok(Type::Data));
    }

    #[test]
    fn unrecognized_type_fails() {
        assert_eq!(Type::from_byte(0x77), Err(PacketError::UnknownType(0x77)));
    }

    #[test]
    fn dsp_round_trip_all_variants() {
        let all = [
            Dsp::None,
            Dsp::Amp,
            Dsp::UsbGain,
            Dsp::Effect0,
            Dsp::Effect1,
            Dsp::Effect2,
            Dsp::Effect3,
            Dsp::OpSave,
            Dsp::OpSaveEffectName,
            Dsp::OpSelectMemBank,
        ];
        for dsp in all {
            assert_eq!(Dsp::from_byte(dsp.to_byte()), Ok(dsp));
        }
    }

    #[test]
    fn unrecognized_dsp_fails() {
        assert_eq!(Dsp::from_byte(0x0a), Err(PacketError::UnknownDsp(0x0a)));
        assert_eq!(Dsp::from_byte(0xff), Err(PacketError::UnknownDsp(0xff)));
    }

    #[test]
    fn effect_dsp_index_mapping() {
        for i in 0..4 {
            let dsp = Dsp::effect(i).unwrap();
            assert_eq!(dsp.effect_index(), Some(i));
        }
        assert_eq!(Dsp::effect(4), None);
        assert_eq!(Dsp::Amp.effect_index(), None);
    }

    // ── Header ──

    #[test]
    fn header_layout() {
        let mut header = Header::new(Stage::Ready, Type::Operation, Dsp::OpSave);
        header.set_slot(5);
        header.set_unknown(0x02, 0x01, 0x01);
        let bytes = header.to_bytes();
        assert_eq!(
            bytes,
            [0x1c, 0x01, 0x03, 0x02, 0x05, 0x00, 0x01, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn header_decode_reads_fields() {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0] = 0x1c;
        bytes[1] = 0x03;
        bytes[2] = 0x08;
        bytes[4] = 0x07;
        let header = Header::from_bytes(&bytes).unwrap();
        assert_eq!(header.stage(), Stage::Ready);
        assert_eq!(header.packet_type(), Type::Data);
        assert_eq!(header.dsp(), Dsp::Effect2);
        assert_eq!(header.slot(), 7);
        assert_eq!(header.unknown(), (0, 0, 0));
    }

    #[test]
    fn header_decode_rejects_bad_type() {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[1] = 0x55;
        assert_eq!(
            Header::from_bytes(&bytes),
            Err(PacketError::UnknownType(0x55))
        );
    }

    // ── Payloads ──

    #[test]
    fn name_payload_truncates_at_32() {
        let mut payload = NamePayload::default();
        payload.set_name(&"x".repeat(40));
        assert_eq!(payload.name().len(), NAME_MAX_LEN);
        assert!(payload.to_bytes()[NAME_MAX_LEN..].iter().all(|&b| b == 0));
    }

    #[test]
    fn name_payload_overwrite_clears_old_name() {
        let mut payload = NamePayload::default();
        payload.set_name("long preset name");
        payload.set_name("abc");
        assert_eq!(payload.name(), "abc");
        assert_eq!(payload.to_bytes()[3], 0);
    }

    #[test]
    fn parse_name_stops_at_nul() {
        assert_eq!(parse_name(b"Clean\0junk"), "Clean");
        assert_eq!(parse_name(b"NoNul"), "NoNul");
        assert_eq!(parse_name(b"\0\0\0"), "");
    }

    #[test]
    fn effect_payload_offsets() {
        let mut payload = EffectPayload::default();
        payload.set_model(0x3c);
        payload.set_slot(2);
        payload.set_unknown(0x01, 0x02, 0x03);
        payload.set_knobs([1, 2, 3, 4, 5, 6]);
        let bytes = payload.to_bytes();
        assert_eq!(bytes[0], 0x3c);
        assert_eq!(bytes[2], 2);
        assert_eq!(&bytes[3..6], &[1, 2, 3]);
        assert_eq!(&bytes[16..22], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(payload.knobs(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn amp_payload_offsets() {
        let mut payload = AmpPayload::default();
        payload.set_model(0x61);
        payload.set_volume(1);
        payload.set_gain(2);
        payload.set_gain2(3);
        payload.set_master_volume(4);
        payload.set_treble(5);
        payload.set_middle(6);
        payload.set_bass(7);
        payload.set_presence(8);
        payload.set_depth(9);
        payload.set_bias(10);
        payload.set_noise_gate(11);
        payload.set_threshold(12);
        payload.set_cabinet(13);
        payload.set_sag(14);
        payload.set_brightness(15);
        payload.set_unknown([21, 22, 23, 24, 25]);
        let b = payload.to_bytes();
        assert_eq!(b[0], 0x61);
        assert_eq!(&b[16..24], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(b[25], 9);
        assert_eq!(b[26], 10);
        assert_eq!(b[31], 11);
        assert_eq!(b[32], 12);
        assert_eq!(b[33], 13);
        assert_eq!(b[35], 14);
        assert_eq!(b[36], 15);
        assert_eq!([b[28], b[29], b[30], b[34], b[38]], [21, 22, 23, 24, 25]);
    }

    #[test]
    fn usb_gain_shares_model_byte() {
        let mut payload = AmpPayload::default();
        payload.set_usb_gain(0x44);
        assert_eq!(payload.model(), 0x44);
    }

    // ── Packet ──

    #[test]
    fn packet_places_payload_after_header() {
        let mut payload = AmpPayload::default();
        payload.set_volume(0xaa);
        let packet = Packet::new(Header::new(Stage::Ready, Type::Data, Dsp::Amp), payload);
        let frame = packet.to_bytes();
        assert_eq!(frame.len(), PACKET_SIZE);
        assert_eq!(frame[2], 0x05);
        assert_eq!(frame[32], 0xaa);
    }

    #[test]
    fn packet_decode_round_trip() {
        let mut payload = EffectPayload::default();
        payload.set_model(0x12);
        payload.set_knobs([9, 8, 7, 6, 5, 4]);
        let mut header = Header::new(Stage::Ready, Type::Data, Dsp::Effect1);
        header.set_unknown(0x00, 0x01, 0x01);
        let packet = Packet::new(header, payload);
        let decoded = Packet::<EffectPayload>::from_bytes(&packet.to_bytes()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn packet_decode_rejects_short_frame() {
        let err = Packet::<EmptyPayload>::from_bytes(&[0x1c, 0x03]).unwrap_err();
        assert_eq!(
            err,
            PacketError::InvalidLength {
                expected: 64,
                actual: 2
            }
        );
    }

    #[test]
    fn empty_payload_is_all_zero() {
        let packet = Packet::new(
            Header::new(Stage::Ready, Type::Data, Dsp::None),
            EmptyPayload,
        );
        assert!(packet.to_bytes()[HEADER_SIZE..].iter().all(|&b| b == 0));
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            PacketError::UnknownDsp(0x0a).to_string(),
            "Unknown DSP target 0x0a"
        );
        assert_eq!(
            PacketError::UnknownType(0x55).to_string(),
            "Unknown frame type 0x55"
        );
    }
}
