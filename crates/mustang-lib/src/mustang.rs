//! Protocol orchestrator — one logical operation per method.
//!
//! Every method is a complete, strictly ordered exchange: each frame sent is
//! answered by exactly one frame, except for the load and select-bank
//! commands, whose answers are read until the amp goes quiet.

use crate::config::Config;
use crate::device::{Connection, DeviceError, UsbConnection, open_connection};
use crate::error::{MustangError, Result};
use crate::ids::Effect;
use crate::models::DeviceModel;
use crate::packet::{Dsp, Packet, Payload};
use crate::protocol::{BANK_FRAME_COUNT, FX_SLOT_COUNT, PACKET_SIZE};
use crate::serializer::*;
use crate::settings::{AmpSettings, FxPedalSettings, SignalChain};

/// Hard stop for a response stream that never ends.
const MAX_RESPONSE_FRAMES: usize = 512;

/// A connected amplifier.
pub struct Mustang<C: Connection> {
    conn: C,
    model: DeviceModel,
    preset_count_override: Option<usize>,
    /// DSP currently holding an effect, per physical slot.
    previous_effects: [Option<Dsp>; FX_SLOT_COUNT],
}

/// Open the amp described by `config` (or the first one attached).
///
/// An invalid config is rejected before the bus is touched.
pub fn connect(config: &Config) -> Result<Mustang<UsbConnection>> {
    config.ensure_valid()?;
    let (conn, model) =
        open_connection(config.preferred_pid()?, config.timeout()).map_err(connection_error)?;
    let mut amp = Mustang::new(conn, model);
    amp.set_preset_count_override(config.preset_count());
    Ok(amp)
}

/// No amp attached is a connection-state error; the rest stay device errors.
fn connection_error(e: DeviceError) -> MustangError {
    match e {
        DeviceError::NotFound => MustangError::Communication(e.to_string()),
        other => MustangError::Device(other),
    }
}

impl<C: Connection> Mustang<C> {
    pub fn new(conn: C, model: DeviceModel) -> Self {
        Mustang {
            conn,
            model,
            preset_count_override: None,
            previous_effects: [None; FX_SLOT_COUNT],
        }
    }

    /// Read this many presets from load responses instead of the model's count.
    pub fn set_preset_count_override(&mut self, count: Option<usize>) {
        self.preset_count_override = count.filter(|&n| n > 0);
    }

    pub fn device_model(&self) -> &DeviceModel {
        &self.model
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_open()
    }

    // ── Transport helpers ──

    fn ensure_connected(&self) -> Result<()> {
        if self.conn.is_open() {
            Ok(())
        } else {
            Err(MustangError::Communication("Device not connected".into()))
        }
    }

    fn send_frame<P: Payload>(&mut self, packet: &Packet<P>) -> Result<()> {
        let frame = packet.to_bytes();
        log::debug!("-> {}", hex(&frame[..8]));
        self.conn.send(&frame)?;
        Ok(())
    }

    /// Send one frame and read its single answer.
    fn send_command<P: Payload>(&mut self, packet: &Packet<P>) -> Result<Vec<u8>> {
        self.send_frame(packet)?;
        let answer = self.conn.receive(PACKET_SIZE)?;
        log::debug!("<- {} bytes", answer.len());
        Ok(answer)
    }

    /// Read frames until an empty one.
    fn receive_all(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut frames = Vec::new();
        loop {
            let frame = self.conn.receive(PACKET_SIZE)?;
            if frame.is_empty() {
                break;
            }
            if frames.len() == MAX_RESPONSE_FRAMES {
                return Err(MustangError::Communication(format!(
                    "Response exceeded {MAX_RESPONSE_FRAMES} frames"
                )));
            }
            frames.push(frame);
        }
        log::debug!("<- {} frames", frames.len());
        Ok(frames)
    }

    /// Name frames at the head of a load response of `total` frames.
    fn preset_name_frames(&self, total: usize) -> usize {
        let heuristic = preset_frame_cap(total);
        let known = self
            .preset_count_override
            .map(|n| n * 2)
            .or_else(|| self.model.preset_frame_count());
        match known {
            Some(frames) => {
                if frames != heuristic {
                    log::warn!(
                        "{} reports {} presets but a {total}-frame response suggests {}; using {}",
                        self.model.name,
                        frames / 2,
                        heuristic / 2,
                        frames / 2
                    );
                }
                frames
            }
            None => heuristic,
        }
    }

    fn remember_effects(&mut self, effects: &[FxPedalSettings]) {
        self.previous_effects = [None; FX_SLOT_COUNT];
        for fx in effects.iter().filter(|fx| fx.effect_num != Effect::Empty) {
            self.previous_effects[usize::from(fx.fx_slot & 0x03)] = Some(dsp_from_effect(fx.effect_num));
        }
    }

    // ── Operations ──

    /// Handshake, then read the preset names and the active preset.
    pub fn start_amp(&mut self) -> Result<(SignalChain, Vec<String>)> {
        self.ensure_connected()?;

        for init in serialize_init_commands() {
            self.send_command(&init)?;
        }

        self.send_frame(&serialize_load_command())?;
        let frames = self.receive_all()?;

        let name_frames = self.preset_name_frames(frames.len());
        if frames.len() < name_frames + BANK_FRAME_COUNT {
            return Err(MustangError::Communication(format!(
                "Incomplete response: expected at least {} frames, got {}",
                name_frames + BANK_FRAME_COUNT,
                frames.len()
            )));
        }

        let names = decode_preset_names(&frames[..name_frames]);
        let chain = decode_bank(&frames[name_frames..name_frames + BANK_FRAME_COUNT])?;
        self.remember_effects(&chain.effects);
        log::info!(
            "{} ready: {} presets, active \"{}\"",
            self.model.name,
            names.len(),
            chain.name
        );
        Ok((chain, names))
    }

    /// Close the connection. No frames are sent.
    pub fn stop_amp(&mut self) {
        self.conn.close();
    }

    /// Replace the effect in `fx.fx_slot`.
    ///
    /// The DSP is cleared first so knob values of the previous effect don't
    /// carry over; a disabled or empty effect leaves the slot cleared.
    pub fn set_effect(&mut self, fx: &FxPedalSettings) -> Result<()> {
        self.ensure_connected()?;

        let slot = usize::from(fx.fx_slot);
        if slot >= FX_SLOT_COUNT {
            return Err(MustangError::InvalidArgument(format!(
                "fx_slot {slot} is out of range (0..={})",
                FX_SLOT_COUNT - 1
            )));
        }
        let clear_dsp = self.previous_effects[slot].unwrap_or_else(|| {
            if fx.effect_num == Effect::Empty {
                Dsp::effect(slot).unwrap_or(Dsp::Effect0)
            } else {
                dsp_from_effect(fx.effect_num)
            }
        });

        self.send_command(&serialize_clear_effect_settings(fx, clear_dsp))?;
        self.send_command(&serialize_apply_command())?;
        self.previous_effects[slot] = None;

        if fx.enabled && fx.effect_num != Effect::Empty {
            self.send_command(&serialize_effect_settings(fx))?;
            self.send_command(&serialize_apply_command())?;
            self.previous_effects[slot] = Some(dsp_from_effect(fx.effect_num));
        }
        Ok(())
    }

    /// Push amp voice and USB gain; two separate transactions.
    pub fn set_amplifier(&mut self, amp: &AmpSettings) -> Result<()> {
        self.ensure_connected()?;
        self.send_command(&serialize_amp_settings(amp))?;
        self.send_command(&serialize_apply_command())?;
        self.send_command(&serialize_amp_settings_usb_gain(amp))?;
        self.send_command(&serialize_apply_command())?;
        Ok(())
    }

    /// Store the current sound as `name` in `slot` and read back what the
    /// amp actually stored.
    pub fn save_on_amp(&mut self, name: &str, slot: u8) -> Result<SignalChain> {
        self.ensure_connected()?;
        self.send_command(&serialize_name(slot, name))?;
        self.load_memory_bank(slot)
    }

    /// Switch to the preset in `slot`.
    pub fn load_memory_bank(&mut self, slot: u8) -> Result<SignalChain> {
        self.ensure_connected()?;
        self.send_frame(&serialize_load_slot_command(slot))?;
        let frames = self.receive_all()?;
        let chain = decode_bank(&frames)?;
        self.remember_effects(&chain.effects);
        Ok(chain)
    }

    /// Store an effect-only preset. Only modulation, delay and reverb
    /// effects can be saved; anything else is rejected before sending.
    pub fn save_effects(&mut self, slot: u8, name: &str, effects: &[FxPedalSettings]) -> Result<()> {
        self.ensure_connected()?;

        let name_packet = serialize_save_effect_name(slot, name, effects)?;
        let effect_packets = serialize_save_effect_packets(slot, effects)?;
        let fx_knob = get_fx_knob(effects[0].effect_num);

        self.send_command(&name_packet)?;
        for packet in &effect_packets {
            self.send_command(packet)?;
        }
        self.send_command(&serialize_apply_command_with_fx_knob(fx_knob))?;
        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::MockConnection;
    use crate::models::lookup_model;
    use crate::protocol::{BIG_AMPS_PID, SMALL_AMPS_PID};

    fn small_model() -> DeviceModel {
        lookup_model(SMALL_AMPS_PID).unwrap().clone()
    }

    #[test]
    fn hex_formats_bytes() {
        assert_eq!(hex(&[0x1c, 0x03, 0x00]), "1c 03 00");
    }

    #[test]
    fn model_count_wins_over_heuristic() {
        let amp = Mustang::new(
            MockConnection::new(),
            lookup_model(BIG_AMPS_PID).unwrap().clone(),
        );
        assert_eq!(amp.preset_name_frames(60), 200);
    }

    #[test]
    fn heuristic_used_without_model_count() {
        let model = DeviceModel {
            number_of_presets: 0,
            ..small_model()
        };
        let amp = Mustang::new(MockConnection::new(), model);
        assert_eq!(amp.preset_name_frames(60), 48);
        assert_eq!(amp.preset_name_frames(300), 200);
    }

    #[test]
    fn override_beats_model() {
        let mut amp = Mustang::new(MockConnection::new(), small_model());
        amp.set_preset_count_override(Some(10));
        assert_eq!(amp.preset_name_frames(60), 20);
        amp.set_preset_count_override(Some(0));
        assert_eq!(amp.preset_name_frames(60), 48);
    }

    #[test]
    fn remember_effects_skips_empty() {
        let mut amp = Mustang::new(MockConnection::new(), small_model());
        let effects = [
            FxPedalSettings::new(0, Effect::Empty, [0; 6]),
            FxPedalSettings::new(1, Effect::Phaser, [0; 6]),
            FxPedalSettings::new(2, Effect::Empty, [0; 6]),
            FxPedalSettings::new(3, Effect::SmallRoomReverb, [0; 6]),
        ];
        amp.remember_effects(&effects);
        assert_eq!(
            amp.previous_effects,
            [None, Some(Dsp::Effect1), None, Some(Dsp::Effect3)]
        );
    }

    #[test]
    fn missing_device_is_a_communication_error() {
        let err = connection_error(DeviceError::NotFound);
        assert!(matches!(err, MustangError::Communication(_)));
        assert_eq!(err.to_string(), "Communication error: No device found");
    }

    #[test]
    fn other_device_errors_pass_through() {
        let err = connection_error(DeviceError::UpdateMode(0x0006));
        assert!(matches!(err, MustangError::Device(DeviceError::UpdateMode(0x0006))));
        let err = connection_error(DeviceError::OpenFailed("claim interface: busy".into()));
        assert!(matches!(err, MustangError::Device(DeviceError::OpenFailed(_))));
    }

    #[test]
    fn connect_rejects_invalid_config_before_opening() {
        let config = Config {
            timeout_ms: 0,
            preset_count_override: 500,
            ..Config::default()
        };
        let Err(err) = connect(&config) else {
            panic!("invalid config should not connect");
        };
        assert!(matches!(err, MustangError::Config(_)));
        let msg = err.to_string();
        assert!(msg.contains("timeout_ms 0"), "{msg}");
        assert!(msg.contains("preset_count_override 500"), "{msg}");
    }

    #[test]
    fn receive_all_stops_at_cap() {
        let mut conn = MockConnection::new();
        conn.push_responses(std::iter::repeat_n(vec![0u8; PACKET_SIZE], MAX_RESPONSE_FRAMES + 1));
        let mut amp = Mustang::new(conn, small_model());
        let err = amp.receive_all().unwrap_err();
        assert!(err.to_string().contains("exceeded"));
    }
}
