//! Preset data model — amp voice, effect slots, full signal chain.

use serde::{Deserialize, Serialize};

use crate::ids::{Amp, Cabinet, Effect};
use crate::protocol::FX_SLOT_COUNT;

/// Highest noise gate setting; only this one uses threshold and depth.
pub const NOISE_GATE_CUSTOM: u8 = 5;

/// Highest threshold step for the custom noise gate.
pub const THRESHOLD_MAX: u8 = 9;

/// Highest sag setting.
pub const SAG_MAX: u8 = 2;

/// Depth sent whenever the custom noise gate is off.
pub const DEPTH_NEUTRAL: u8 = 0x80;

/// One amplifier voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmpSettings {
    pub amp_num: Amp,
    #[serde(default)]
    pub gain: u8,
    #[serde(default)]
    pub volume: u8,
    #[serde(default)]
    pub treble: u8,
    #[serde(default)]
    pub middle: u8,
    #[serde(default)]
    pub bass: u8,
    #[serde(default = "default_cabinet")]
    pub cabinet: Cabinet,
    /// 0..=5; 5 enables the custom gate (threshold + depth).
    #[serde(default)]
    pub noise_gate: u8,
    #[serde(default)]
    pub master_vol: u8,
    #[serde(default)]
    pub gain2: u8,
    #[serde(default)]
    pub presence: u8,
    /// 0..=9, custom gate only.
    #[serde(default)]
    pub threshold: u8,
    /// Custom gate only; otherwise [`DEPTH_NEUTRAL`].
    #[serde(default = "default_depth")]
    pub depth: u8,
    #[serde(default)]
    pub bias: u8,
    /// 0..=2.
    #[serde(default)]
    pub sag: u8,
    #[serde(default)]
    pub brightness: bool,
    #[serde(default)]
    pub usb_gain: u8,
}

fn default_cabinet() -> Cabinet {
    Cabinet::Off
}

fn default_depth() -> u8 {
    DEPTH_NEUTRAL
}

impl Default for AmpSettings {
    fn default() -> Self {
        AmpSettings {
            amp_num: Amp::Fender57Deluxe,
            gain: 0,
            volume: 0,
            treble: 0,
            middle: 0,
            bass: 0,
            cabinet: Cabinet::Off,
            noise_gate: 0,
            master_vol: 0,
            gain2: 0,
            presence: 0,
            threshold: 0,
            depth: DEPTH_NEUTRAL,
            bias: 0,
            sag: 0,
            brightness: false,
            usb_gain: 0,
        }
    }
}

/// Where an effect sits relative to the amp stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Input,
    EffectsLoop,
}

/// One effect slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxPedalSettings {
    /// Physical slot, 0..=3.
    #[serde(default)]
    pub fx_slot: u8,
    #[serde(default)]
    pub effect_num: Effect,
    #[serde(default)]
    pub knob1: u8,
    #[serde(default)]
    pub knob2: u8,
    #[serde(default)]
    pub knob3: u8,
    #[serde(default)]
    pub knob4: u8,
    #[serde(default)]
    pub knob5: u8,
    #[serde(default)]
    pub knob6: u8,
    #[serde(default)]
    pub position: Position,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FxPedalSettings {
    fn default() -> Self {
        FxPedalSettings {
            fx_slot: 0,
            effect_num: Effect::Empty,
            knob1: 0,
            knob2: 0,
            knob3: 0,
            knob4: 0,
            knob5: 0,
            knob6: 0,
            position: Position::Input,
            enabled: true,
        }
    }
}

impl FxPedalSettings {
    /// Effect with the given knobs at `fx_slot`, input position, enabled.
    pub fn new(fx_slot: u8, effect_num: Effect, knobs: [u8; 6]) -> Self {
        let [knob1, knob2, knob3, knob4, knob5, knob6] = knobs;
        FxPedalSettings {
            fx_slot,
            effect_num,
            knob1,
            knob2,
            knob3,
            knob4,
            knob5,
            knob6,
            ..Default::default()
        }
    }

    pub fn knobs(&self) -> [u8; 6] {
        [
            self.knob1, self.knob2, self.knob3, self.knob4, self.knob5, self.knob6,
        ]
    }

    pub fn set_knobs(&mut self, knobs: [u8; 6]) {
        [
            self.knob1, self.knob2, self.knob3, self.knob4, self.knob5, self.knob6,
        ] = knobs;
    }
}

/// A complete preset: name, amp, and one effect per DSP in DSP order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalChain {
    pub name: String,
    pub amp: AmpSettings,
    pub effects: [FxPedalSettings; FX_SLOT_COUNT],
}

impl SignalChain {
    pub fn new(name: impl Into<String>, amp: AmpSettings, effects: [FxPedalSettings; FX_SLOT_COUNT]) -> Self {
        SignalChain {
            name: name.into(),
            amp,
            effects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amp_defaults() {
        let amp = AmpSettings::default();
        assert_eq!(amp.depth, DEPTH_NEUTRAL);
        assert_eq!(amp.cabinet, Cabinet::Off);
        assert_eq!(amp.noise_gate, 0);
    }

    #[test]
    fn fx_default_is_enabled_empty() {
        let fx = FxPedalSettings::default();
        assert!(fx.enabled);
        assert_eq!(fx.effect_num, Effect::Empty);
        assert_eq!(fx.position, Position::Input);
    }

    #[test]
    fn knobs_accessors() {
        let mut fx = FxPedalSettings::new(2, Effect::MonoDelay, [1, 2, 3, 4, 5, 6]);
        assert_eq!(fx.fx_slot, 2);
        assert_eq!(fx.knobs(), [1, 2, 3, 4, 5, 6]);
        fx.set_knobs([6, 5, 4, 3, 2, 1]);
        assert_eq!(fx.knob1, 6);
        assert_eq!(fx.knob6, 1);
    }

    #[test]
    fn fx_json_missing_fields_use_defaults() {
        let fx: FxPedalSettings =
            serde_json::from_str(r#"{ "effect_num": "phaser", "knob1": 10 }"#).unwrap();
        assert_eq!(fx.effect_num, Effect::Phaser);
        assert_eq!(fx.knob1, 10);
        assert!(fx.enabled);
        assert_eq!(fx.position, Position::Input);
    }

    #[test]
    fn amp_json_minimal() {
        let amp: AmpSettings =
            serde_json::from_str(r#"{ "amp_num": "metal2000", "cabinet": "cab2x12_c" }"#).unwrap();
        assert_eq!(amp.amp_num, Amp::Metal2000);
        assert_eq!(amp.cabinet, Cabinet::Cab2x12C);
        assert_eq!(amp.depth, DEPTH_NEUTRAL);
    }

    #[test]
    fn amp_json_unknown_model_rejected() {
        let result: Result<AmpSettings, _> = serde_json::from_str(r#"{ "amp_num": "tube_screamer" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn signal_chain_json_round_trip() {
        let chain = SignalChain::new(
            "Lead",
            AmpSettings::default(),
            [
                FxPedalSettings::new(0, Effect::Overdrive, [1, 2, 3, 4, 5, 0]),
                FxPedalSettings::default(),
                FxPedalSettings::default(),
                FxPedalSettings::default(),
            ],
        );
        let json = serde_json::to_string(&chain).unwrap();
        let back: SignalChain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chain);
    }
}
