//! Hardware ID catalogues — amp, cabinet and effect models.
//!
//! Encoding is total (every variant has a byte); decoding is partial and
//! fails with [`IdError::InvalidId`] for bytes the firmware tables don't
//! contain. IDs and quirk bytes were taken from USB captures and must be
//! reproduced exactly for the amp to accept a frame.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Error type ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// `kind` is `"amp"`, `"cabinet"` or `"effect"`.
    InvalidId { kind: &'static str, id: u8 },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::InvalidId { kind, id } => write!(f, "Invalid {kind} ID 0x{id:02x}"),
        }
    }
}

impl std::error::Error for IdError {}

pub type Result<T> = std::result::Result<T, IdError>;

// ── Amplifiers ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amp {
    Fender57Deluxe,
    Fender59Bassman,
    Fender57Champ,
    Fender65DeluxeReverb,
    Fender65Princeton,
    Fender65TwinReverb,
    FenderSuperSonic,
    British60s,
    British70s,
    British80s,
    American90s,
    Metal2000,
}

impl Amp {
    pub const ALL: [Amp; 12] = [
        Amp::Fender57Deluxe,
        Amp::Fender59Bassman,
        Amp::Fender57Champ,
        Amp::Fender65DeluxeReverb,
        Amp::Fender65Princeton,
        Amp::Fender65TwinReverb,
        Amp::FenderSuperSonic,
        Amp::British60s,
        Amp::British70s,
        Amp::British80s,
        Amp::American90s,
        Amp::Metal2000,
    ];

    pub fn to_id(self) -> u8 {
        match self {
            Amp::Fender57Deluxe => 0x67,
            Amp::Fender59Bassman => 0x64,
            Amp::Fender57Champ => 0x7c,
            Amp::Fender65DeluxeReverb => 0x53,
            Amp::Fender65Princeton => 0x6a,
            Amp::Fender65TwinReverb => 0x75,
            Amp::FenderSuperSonic => 0x72,
            Amp::British60s => 0x61,
            Amp::British70s => 0x79,
            Amp::British80s => 0x5e,
            Amp::American90s => 0x5d,
            Amp::Metal2000 => 0x6d,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        Amp::ALL
            .into_iter()
            .find(|a| a.to_id() == id)
            .ok_or(IdError::InvalidId { kind: "amp", id })
    }

    /// Quirk bytes for frame offsets 44, 45, 46, 50 and 54. Fixed per model,
    /// independent of the knob settings.
    pub fn unknown_bytes(self) -> [u8; 5] {
        let (a, b) = match self {
            Amp::Fender57Deluxe => (0x01, 0x53),
            Amp::Fender59Bassman => (0x02, 0x67),
            Amp::Fender57Champ => (0x0c, 0x00),
            Amp::Fender65DeluxeReverb => (0x03, 0x6a),
            Amp::Fender65Princeton => (0x04, 0x61),
            Amp::Fender65TwinReverb => (0x05, 0x72),
            Amp::FenderSuperSonic => (0x06, 0x79),
            Amp::British60s => (0x07, 0x5e),
            Amp::British70s => (0x0b, 0x7c),
            Amp::British80s => (0x09, 0x5d),
            Amp::American90s => (0x0a, 0x6d),
            Amp::Metal2000 => (0x08, 0x75),
        };
        [a, a, a, a, b]
    }

    pub fn name(self) -> &'static str {
        match self {
            Amp::Fender57Deluxe => "Fender '57 Deluxe",
            Amp::Fender59Bassman => "Fender '59 Bassman",
            Amp::Fender57Champ => "Fender '57 Champ",
            Amp::Fender65DeluxeReverb => "Fender '65 Deluxe Reverb",
            Amp::Fender65Princeton => "Fender '65 Princeton",
            Amp::Fender65TwinReverb => "Fender '65 Twin Reverb",
            Amp::FenderSuperSonic => "Fender Super-Sonic",
            Amp::British60s => "British '60s",
            Amp::British70s => "British '70s",
            Amp::British80s => "British '80s",
            Amp::American90s => "American '90s",
            Amp::Metal2000 => "Metal 2000",
        }
    }
}

impl fmt::Display for Amp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Cabinets ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cabinet {
    Off,
    Cab57Dlx,
    CabBssmn,
    Cab65Dlx,
    Cab65Prn,
    CabChamp,
    Cab4x12M,
    Cab2x12C,
    Cab4x12G,
    Cab65Twn,
    Cab4x12V,
    CabSs212,
    CabSs112,
}

impl Cabinet {
    pub const ALL: [Cabinet; 13] = [
        Cabinet::Off,
        Cabinet::Cab57Dlx,
        Cabinet::CabBssmn,
        Cabinet::Cab65Dlx,
        Cabinet::Cab65Prn,
        Cabinet::CabChamp,
        Cabinet::Cab4x12M,
        Cabinet::Cab2x12C,
        Cabinet::Cab4x12G,
        Cabinet::Cab65Twn,
        Cabinet::Cab4x12V,
        Cabinet::CabSs212,
        Cabinet::CabSs112,
    ];

    pub fn to_id(self) -> u8 {
        match self {
            Cabinet::Off => 0x00,
            Cabinet::Cab57Dlx => 0x01,
            Cabinet::CabBssmn => 0x02,
            Cabinet::Cab65Dlx => 0x03,
            Cabinet::Cab65Prn => 0x04,
            Cabinet::CabChamp => 0x05,
            Cabinet::Cab4x12M => 0x06,
            Cabinet::Cab2x12C => 0x07,
            Cabinet::Cab4x12G => 0x08,
            Cabinet::Cab65Twn => 0x09,
            Cabinet::Cab4x12V => 0x0a,
            Cabinet::CabSs212 => 0x0b,
            Cabinet::CabSs112 => 0x0c,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        Cabinet::ALL
            .into_iter()
            .find(|c| c.to_id() == id)
            .ok_or(IdError::InvalidId { kind: "cabinet", id })
    }

    pub fn name(self) -> &'static str {
        match self {
            Cabinet::Off => "Off",
            Cabinet::Cab57Dlx => "'57 DLX",
            Cabinet::CabBssmn => "Bassman",
            Cabinet::Cab65Dlx => "'65 DLX",
            Cabinet::Cab65Prn => "'65 PRN",
            Cabinet::CabChamp => "Champ",
            Cabinet::Cab4x12M => "4x12 M",
            Cabinet::Cab2x12C => "2x12 C",
            Cabinet::Cab4x12G => "4x12 G",
            Cabinet::Cab65Twn => "'65 TWN",
            Cabinet::Cab4x12V => "4x12 V",
            Cabinet::CabSs212 => "SS 2x12",
            Cabinet::CabSs112 => "SS 1x12",
        }
    }
}

impl fmt::Display for Cabinet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Effects ──

/// Effect family. Each family owns one DSP; at most one effect per family
/// is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Stomp,
    Modulation,
    Delay,
    Reverb,
}

/// Effect models in catalogue order. The order matters: everything from
/// [`Effect::SineChorus`] on can be stored as an effect-only preset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    #[default]
    Empty,
    Overdrive,
    Wah,
    TouchWah,
    Fuzz,
    FuzzTouchWah,
    SimpleComp,
    Compressor,
    SineChorus,
    TriangleChorus,
    SineFlanger,
    TriangleFlanger,
    Vibratone,
    VintageTremolo,
    SineTremolo,
    RingModulator,
    StepFilter,
    Phaser,
    PitchShifter,
    MonoDelay,
    MonoEchoFilter,
    StereoEchoFilter,
    MultitapDelay,
    PingPongDelay,
    DuckingDelay,
    ReverseDelay,
    TapeDelay,
    StereoTapeDelay,
    SmallHallReverb,
    LargeHallReverb,
    SmallRoomReverb,
    LargeRoomReverb,
    SmallPlateReverb,
    LargePlateReverb,
    AmbientReverb,
    ArenaReverb,
    Fender63SpringReverb,
    Fender65SpringReverb,
}

impl Effect {
    pub const ALL: [Effect; 38] = [
        Effect::Empty,
        Effect::Overdrive,
        Effect::Wah,
        Effect::TouchWah,
        Effect::Fuzz,
        Effect::FuzzTouchWah,
        Effect::SimpleComp,
        Effect::Compressor,
        Effect::SineChorus,
        Effect::TriangleChorus,
        Effect::SineFlanger,
        Effect::TriangleFlanger,
        Effect::Vibratone,
        Effect::VintageTremolo,
        Effect::SineTremolo,
        Effect::RingModulator,
        Effect::StepFilter,
        Effect::Phaser,
        Effect::PitchShifter,
        Effect::MonoDelay,
        Effect::MonoEchoFilter,
        Effect::StereoEchoFilter,
        Effect::MultitapDelay,
        Effect::PingPongDelay,
        Effect::DuckingDelay,
        Effect::ReverseDelay,
        Effect::TapeDelay,
        Effect::StereoTapeDelay,
        Effect::SmallHallReverb,
        Effect::LargeHallReverb,
        Effect::SmallRoomReverb,
        Effect::LargeRoomReverb,
        Effect::SmallPlateReverb,
        Effect::LargePlateReverb,
        Effect::AmbientReverb,
        Effect::ArenaReverb,
        Effect::Fender63SpringReverb,
        Effect::Fender65SpringReverb,
    ];

    pub fn to_id(self) -> u8 {
        match self {
            Effect::Empty => 0x00,
            Effect::Overdrive => 0x3c,
            Effect::Wah => 0x49,
            Effect::TouchWah => 0x4a,
            Effect::Fuzz => 0x1a,
            Effect::FuzzTouchWah => 0x1c,
            Effect::SimpleComp => 0x88,
            Effect::Compressor => 0x07,
            Effect::SineChorus => 0x12,
            Effect::TriangleChorus => 0x13,
            Effect::SineFlanger => 0x18,
            Effect::TriangleFlanger => 0x19,
            Effect::Vibratone => 0x2d,
            Effect::VintageTremolo => 0x40,
            Effect::SineTremolo => 0x41,
            Effect::RingModulator => 0x22,
            Effect::StepFilter => 0x29,
            Effect::Phaser => 0x4f,
            Effect::PitchShifter => 0x1f,
            Effect::MonoDelay => 0x16,
            Effect::MonoEchoFilter => 0x43,
            Effect::StereoEchoFilter => 0x48,
            Effect::MultitapDelay => 0x44,
            Effect::PingPongDelay => 0x45,
            Effect::DuckingDelay => 0x15,
            Effect::ReverseDelay => 0x46,
            Effect::TapeDelay => 0x2b,
            Effect::StereoTapeDelay => 0x2a,
            Effect::SmallHallReverb => 0x24,
            Effect::LargeHallReverb => 0x3a,
            Effect::SmallRoomReverb => 0x26,
            Effect::LargeRoomReverb => 0x3b,
            Effect::SmallPlateReverb => 0x4e,
            Effect::LargePlateReverb => 0x4b,
            Effect::AmbientReverb => 0x4c,
            Effect::ArenaReverb => 0x4d,
            Effect::Fender63SpringReverb => 0x21,
            Effect::Fender65SpringReverb => 0x0b,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        Effect::ALL
            .into_iter()
            .find(|e| e.to_id() == id)
            .ok_or(IdError::InvalidId { kind: "effect", id })
    }

    /// Family the effect belongs to; `None` for [`Effect::Empty`].
    pub fn family(self) -> Option<Family> {
        match self {
            Effect::Empty => None,
            e if e <= Effect::Compressor => Some(Family::Stomp),
            e if e <= Effect::PitchShifter => Some(Family::Modulation),
            e if e <= Effect::StereoTapeDelay => Some(Family::Delay),
            _ => Some(Family::Reverb),
        }
    }

    /// Effects that use the sixth knob.
    pub fn has_extra_knob(self) -> bool {
        matches!(
            self,
            Effect::MonoEchoFilter
                | Effect::StereoEchoFilter
                | Effect::TapeDelay
                | Effect::StereoTapeDelay
        )
    }

    /// Quirk bytes written at payload offsets 3..6 (frame 19..22).
    pub fn unknown_bytes(self) -> (u8, u8, u8) {
        match self {
            Effect::Wah | Effect::TouchWah => (0x01, 0x00, 0x00),
            Effect::SimpleComp => (0x08, 0x00, 0x00),
            Effect::SineChorus | Effect::StepFilter | Effect::Phaser => (0x01, 0x01, 0x00),
            Effect::TriangleChorus
            | Effect::SineFlanger
            | Effect::TriangleFlanger
            | Effect::Vibratone
            | Effect::VintageTremolo
            | Effect::SineTremolo
            | Effect::RingModulator
            | Effect::PitchShifter => (0x01, 0x00, 0x00),
            e if e.family() == Some(Family::Delay) => (0x02, 0x01, 0x00),
            _ => (0x00, 0x00, 0x00),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Effect::Empty => "Empty",
            Effect::Overdrive => "Overdrive",
            Effect::Wah => "Wah",
            Effect::TouchWah => "Touch Wah",
            Effect::Fuzz => "Fuzz",
            Effect::FuzzTouchWah => "Fuzz Touch Wah",
            Effect::SimpleComp => "Simple Comp",
            Effect::Compressor => "Compressor",
            Effect::SineChorus => "Sine Chorus",
            Effect::TriangleChorus => "Triangle Chorus",
            Effect::SineFlanger => "Sine Flanger",
            Effect::TriangleFlanger => "Triangle Flanger",
            Effect::Vibratone => "Vibratone",
            Effect::VintageTremolo => "Vintage Tremolo",
            Effect::SineTremolo => "Sine Tremolo",
            Effect::RingModulator => "Ring Modulator",
            Effect::StepFilter => "Step Filter",
            Effect::Phaser => "Phaser",
            Effect::PitchShifter => "Pitch Shifter",
            Effect::MonoDelay => "Mono Delay",
            Effect::MonoEchoFilter => "Mono Echo Filter",
            Effect::StereoEchoFilter => "Stereo Echo Filter",
            Effect::MultitapDelay => "Multitap Delay",
            Effect::PingPongDelay => "Ping Pong Delay",
            Effect::DuckingDelay => "Ducking Delay",
            Effect::ReverseDelay => "Reverse Delay",
            Effect::TapeDelay => "Tape Delay",
            Effect::StereoTapeDelay => "Stereo Tape Delay",
            Effect::SmallHallReverb => "Small Hall Reverb",
            Effect::LargeHallReverb => "Large Hall Reverb",
            Effect::SmallRoomReverb => "Small Room Reverb",
            Effect::LargeRoomReverb => "Large Room Reverb",
            Effect::SmallPlateReverb => "Small Plate Reverb",
            Effect::LargePlateReverb => "Large Plate Reverb",
            Effect::AmbientReverb => "Ambient Reverb",
            Effect::ArenaReverb => "Arena Reverb",
            Effect::Fender63SpringReverb => "Fender '63 Spring Reverb",
            Effect::Fender65SpringReverb => "Fender '65 Spring Reverb",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
