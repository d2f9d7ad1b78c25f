//! Settings ↔ frame translation.
//!
//! Pure functions only: every `serialize_*` builds fresh [`Packet`]s from
//! domain values, every `decode_*` turns raw frames from the amp back into
//! [`AmpSettings`], [`FxPedalSettings`] or a whole [`SignalChain`]. Device
//! quirks (clamping, conditional fields, per-model filler bytes) are applied
//! here so the orchestrator never touches payload offsets.

use crate::error::{MustangError, Result};
use crate::ids::{Amp, Cabinet, Effect, Family};
use crate::packet::{
    AmpPayload, Dsp, EffectPayload, EmptyPayload, Header, NamePayload, Packet, PacketError, Stage,
    Type, parse_name,
};
use crate::protocol::{
    BANK_FRAME_COUNT, BIG_PRESET_FRAMES, BIG_RESPONSE_THRESHOLD, EFFECT_NAME_MAX_LEN,
    FX_SLOT_COUNT, HEADER_SIZE, NAME_MAX_LEN, SMALL_PRESET_FRAMES,
};
use crate::settings::{
    AmpSettings, DEPTH_NEUTRAL, FxPedalSettings, NOISE_GATE_CUSTOM, Position, SAG_MAX,
    SignalChain, THRESHOLD_MAX,
};

/// Family code for modulation effects in save/apply frames.
const FX_KNOB_MODULATION: u8 = 0x01;
/// Family code for everything else.
const FX_KNOB_OTHER: u8 = 0x02;

/// Slot offset for effects placed in the effects loop.
const EFFECTS_LOOP_SLOT_OFFSET: u8 = 4;

/// DSP that processes `effect`. [`Effect::Empty`] routes to the stomp DSP.
pub fn dsp_from_effect(effect: Effect) -> Dsp {
    match effect.family() {
        None | Some(Family::Stomp) => Dsp::Effect0,
        Some(Family::Modulation) => Dsp::Effect1,
        Some(Family::Delay) => Dsp::Effect2,
        Some(Family::Reverb) => Dsp::Effect3,
    }
}

/// Family code stamped into byte 3 of save and apply frames.
pub fn get_fx_knob(effect: Effect) -> u8 {
    if effect.family() == Some(Family::Modulation) {
        FX_KNOB_MODULATION
    } else {
        FX_KNOB_OTHER
    }
}

fn data_header(dsp: Dsp) -> Header {
    let mut header = Header::new(Stage::Ready, Type::Data, dsp);
    header.set_unknown(0x00, 0x01, 0x01);
    header
}

// ── Commands ──

/// The two handshake frames sent before anything else.
pub fn serialize_init_commands() -> [Packet<EmptyPayload>; 2] {
    [
        Packet::new(Header::new(Stage::Init0, Type::Init0, Dsp::None), EmptyPayload),
        Packet::new(Header::new(Stage::Init1, Type::INIT1, Dsp::None), EmptyPayload),
    ]
}

/// Request for the preset names and the active bank.
pub fn serialize_load_command() -> Packet<EmptyPayload> {
    Packet::new(Header::new(Stage::Unknown, Type::Load, Dsp::None), EmptyPayload)
}

/// Commit the previous settings frame.
pub fn serialize_apply_command() -> Packet<EmptyPayload> {
    Packet::new(Header::new(Stage::Ready, Type::Data, Dsp::None), EmptyPayload)
}

/// Apply command closing an effect-only save.
pub fn serialize_apply_command_with_fx_knob(fx_knob: u8) -> Packet<EmptyPayload> {
    let mut packet = serialize_apply_command();
    let mut header = *packet.header();
    header.set_unknown(fx_knob, 0x00, 0x00);
    packet.set_header(header);
    packet
}

/// Select (and read back) the preset stored in `slot`.
pub fn serialize_load_slot_command(slot: u8) -> Packet<EmptyPayload> {
    let mut header = Header::new(Stage::Ready, Type::Operation, Dsp::OpSelectMemBank);
    header.set_slot(slot);
    header.set_unknown(0x00, 0x01, 0x00);
    Packet::new(header, EmptyPayload)
}

/// Store the current state under `name` in `slot`.
pub fn serialize_name(slot: u8, name: &str) -> Packet<NamePayload> {
    let mut header = Header::new(Stage::Ready, Type::Operation, Dsp::OpSave);
    header.set_slot(slot);
    header.set_unknown(0x00, 0x01, 0x01);
    let mut payload = NamePayload::default();
    payload.set_name(name);
    Packet::new(header, payload)
}

// ── Amp ──

pub fn serialize_amp_settings(amp: &AmpSettings) -> Packet<AmpPayload> {
    let mut payload = AmpPayload::default();
    payload.set_model(amp.amp_num.to_id());
    payload.set_volume(amp.volume);
    payload.set_gain(amp.gain);
    payload.set_gain2(amp.gain2);
    payload.set_master_volume(amp.master_vol);
    payload.set_treble(amp.treble);
    payload.set_middle(amp.middle);
    payload.set_bass(amp.bass);
    payload.set_presence(amp.presence);
    payload.set_bias(amp.bias);
    payload.set_cabinet(amp.cabinet.to_id());

    let gate = amp.noise_gate.min(NOISE_GATE_CUSTOM);
    payload.set_noise_gate(gate);
    if gate == NOISE_GATE_CUSTOM {
        payload.set_threshold(amp.threshold.min(THRESHOLD_MAX));
        payload.set_depth(amp.depth);
    } else {
        payload.set_threshold(0);
        payload.set_depth(DEPTH_NEUTRAL);
    }

    payload.set_sag(amp.sag.min(SAG_MAX));
    payload.set_brightness(u8::from(amp.brightness));
    payload.set_unknown(amp.amp_num.unknown_bytes());

    Packet::new(data_header(Dsp::Amp), payload)
}

/// USB gain travels in its own frame.
pub fn serialize_amp_settings_usb_gain(amp: &AmpSettings) -> Packet<AmpPayload> {
    let mut payload = AmpPayload::default();
    payload.set_usb_gain(amp.usb_gain);
    Packet::new(data_header(Dsp::UsbGain), payload)
}

// ── Effects ──

fn effect_slot_byte(fx: &FxPedalSettings) -> u8 {
    let slot = fx.fx_slot & 0x03;
    match fx.position {
        Position::Input => slot,
        Position::EffectsLoop => slot + EFFECTS_LOOP_SLOT_OFFSET,
    }
}

fn clamped_knobs(fx: &FxPedalSettings) -> [u8; 6] {
    let mut knobs = fx.knobs();
    if !fx.effect_num.has_extra_knob() {
        knobs[5] = 0;
    }
    match fx.effect_num {
        Effect::RingModulator => knobs[3] = knobs[3].min(1),
        Effect::Phaser => knobs[4] = knobs[4].min(1),
        Effect::MultitapDelay => knobs[4] = knobs[4].min(3),
        Effect::SimpleComp => {
            knobs[0] = knobs[0].min(3);
            knobs[1..5].fill(0);
        }
        _ => {}
    }
    knobs
}

pub fn serialize_effect_settings(fx: &FxPedalSettings) -> Packet<EffectPayload> {
    let mut payload = EffectPayload::default();
    payload.set_model(fx.effect_num.to_id());
    payload.set_slot(effect_slot_byte(fx));
    let (u0, u1, u2) = fx.effect_num.unknown_bytes();
    payload.set_unknown(u0, u1, u2);
    payload.set_knobs(clamped_knobs(fx));

    Packet::new(data_header(dsp_from_effect(fx.effect_num)), payload)
}

/// Empty effect frame wiping whatever `dsp` currently holds.
pub fn serialize_clear_effect_settings(fx: &FxPedalSettings, dsp: Dsp) -> Packet<EffectPayload> {
    let mut payload = EffectPayload::default();
    payload.set_slot(effect_slot_byte(fx));
    Packet::new(data_header(dsp), payload)
}

/// How many effect frames an effect-only save carries.
pub fn save_effects_repeat(effects: &[FxPedalSettings]) -> usize {
    match effects.first() {
        _ if effects.len() > 2 => 1,
        Some(first) if first.effect_num.family() == Some(Family::Modulation) => 1,
        _ => effects.len(),
    }
}

fn check_save_effects(effects: &[FxPedalSettings]) -> Result<usize> {
    let repeat = save_effects_repeat(effects);
    if repeat == 0 {
        return Err(MustangError::InvalidArgument(
            "No effects to save".to_string(),
        ));
    }
    if let Some(bad) = effects[..repeat]
        .iter()
        .find(|fx| fx.effect_num < Effect::SineChorus)
    {
        return Err(MustangError::InvalidArgument(format!(
            "Effect '{}' cannot be saved as an effect preset",
            bad.effect_num
        )));
    }
    Ok(repeat)
}

/// Name frame opening an effect-only save. The name is capped at
/// [`EFFECT_NAME_MAX_LEN`] bytes.
pub fn serialize_save_effect_name(
    slot: u8,
    name: &str,
    effects: &[FxPedalSettings],
) -> Result<Packet<NamePayload>> {
    check_save_effects(effects)?;
    let mut header = Header::new(Stage::Ready, Type::Operation, Dsp::OpSaveEffectName);
    header.set_slot(slot);
    header.set_unknown(get_fx_knob(effects[0].effect_num), 0x01, 0x01);

    let end = name
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= EFFECT_NAME_MAX_LEN)
        .last()
        .unwrap_or(0);
    let mut payload = NamePayload::default();
    payload.set_name(&name[..end]);
    Ok(Packet::new(header, payload))
}

/// Effect frames of an effect-only save, re-stamped for `slot`.
pub fn serialize_save_effect_packets(
    slot: u8,
    effects: &[FxPedalSettings],
) -> Result<Vec<Packet<EffectPayload>>> {
    let repeat = check_save_effects(effects)?;
    let fx_knob = get_fx_knob(effects[0].effect_num);
    Ok(effects[..repeat]
        .iter()
        .map(|fx| {
            let mut packet = serialize_effect_settings(fx);
            let mut header = *packet.header();
            header.set_type(Type::Operation);
            header.set_slot(slot);
            header.set_unknown(fx_knob, 0x01, 0x01);
            packet.set_header(header);
            packet
        })
        .collect())
}

// ── Decoding ──

/// Name field of a raw frame. The header is not inspected.
pub fn decode_name_from_data(frame: &[u8]) -> String {
    let start = HEADER_SIZE.min(frame.len());
    let end = (HEADER_SIZE + NAME_MAX_LEN).min(frame.len());
    parse_name(&frame[start..end])
}

/// Frames of the name list a response of `total` frames carries.
pub fn preset_frame_cap(total: usize) -> usize {
    if total > BIG_RESPONSE_THRESHOLD {
        BIG_PRESET_FRAMES
    } else {
        SMALL_PRESET_FRAMES
    }
}

/// Names from an interleaved name/filler stream, one per frame pair.
pub fn decode_preset_names<F: AsRef<[u8]>>(frames: &[F]) -> Vec<String> {
    frames
        .chunks_exact(2)
        .map(|pair| decode_name_from_data(pair[0].as_ref()))
        .collect()
}

/// Names from the head of a load response, sized by the frame-count
/// heuristic.
pub fn decode_preset_list_from_data<F: AsRef<[u8]>>(frames: &[F]) -> Vec<String> {
    let cap = preset_frame_cap(frames.len());
    decode_preset_names(&frames[..frames.len().min(cap)])
}

pub fn decode_amp_from_data(amp_frame: &[u8], usb_gain_frame: &[u8]) -> Result<AmpSettings> {
    let amp = Packet::<AmpPayload>::from_bytes(amp_frame)?;
    let usb = Packet::<AmpPayload>::from_bytes(usb_gain_frame)?;
    let p = amp.payload();
    let noise_gate = p.noise_gate().min(NOISE_GATE_CUSTOM);

    Ok(AmpSettings {
        amp_num: Amp::from_id(p.model())?,
        gain: p.gain(),
        volume: p.volume(),
        treble: p.treble(),
        middle: p.middle(),
        bass: p.bass(),
        cabinet: Cabinet::from_id(p.cabinet())?,
        noise_gate,
        master_vol: p.master_volume(),
        gain2: p.gain2(),
        presence: p.presence(),
        threshold: p.threshold().min(THRESHOLD_MAX),
        depth: p.depth(),
        bias: p.bias(),
        sag: p.sag().min(SAG_MAX),
        brightness: p.brightness() != 0,
        usb_gain: usb.payload().usb_gain(),
    })
}

/// One effect frame, with the DSP it came from.
pub fn decode_effect_from_data(frame: &[u8]) -> Result<(Dsp, FxPedalSettings)> {
    let packet = Packet::<EffectPayload>::from_bytes(frame)?;
    let dsp = packet.header().dsp();
    if dsp.effect_index().is_none() {
        return Err(PacketError::UnexpectedDsp(dsp.to_byte()).into());
    }
    let p = packet.payload();
    let slot = p.slot();
    let position = if slot >= EFFECTS_LOOP_SLOT_OFFSET {
        Position::EffectsLoop
    } else {
        Position::Input
    };
    let mut fx = FxPedalSettings {
        fx_slot: slot & 0x03,
        effect_num: Effect::from_id(p.model())?,
        position,
        ..Default::default()
    };
    fx.set_knobs(p.knobs());
    Ok((dsp, fx))
}

/// Four effect frames, placed by the DSP each one names.
///
/// Two frames naming the same DSP fail with
/// [`PacketError::UnexpectedDsp`].
pub fn decode_effects_from_data<F: AsRef<[u8]>>(
    frames: &[F],
) -> Result<[FxPedalSettings; FX_SLOT_COUNT]> {
    let mut effects: [FxPedalSettings; FX_SLOT_COUNT] = Default::default();
    let mut seen = [false; FX_SLOT_COUNT];
    for frame in frames.iter().take(FX_SLOT_COUNT) {
        let (dsp, fx) = decode_effect_from_data(frame.as_ref())?;
        if let Some(index) = dsp.effect_index() {
            if seen[index] {
                return Err(PacketError::UnexpectedDsp(dsp.to_byte()).into());
            }
            seen[index] = true;
            effects[index] = fx;
        }
    }
    Ok(effects)
}

/// One stored preset: name, amp, four effects, USB gain.
pub fn decode_bank<F: AsRef<[u8]>>(frames: &[F]) -> Result<SignalChain> {
    if frames.len() < BANK_FRAME_COUNT {
        return Err(MustangError::Communication(format!(
            "Incomplete response: expected {BANK_FRAME_COUNT} bank frames, got {}",
            frames.len()
        )));
    }
    let name = decode_name_from_data(frames[0].as_ref());
    let amp = decode_amp_from_data(frames[1].as_ref(), frames[6].as_ref())?;
    let effects = decode_effects_from_data(&frames[2..6])?;
    Ok(SignalChain::new(name, amp, effects))
}
