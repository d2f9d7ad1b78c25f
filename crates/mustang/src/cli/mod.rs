//! CLI subcommands — device listing, preset browsing, settings push.

mod config_cmd;
mod current;
mod devices;
mod presets;
mod save;
mod set;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub(super) use mustang_lib::config::Config;
pub(super) use mustang_lib::device::{self, DiscoveredDevice, UsbConnection};
pub(super) use mustang_lib::error::{MustangError, Result};
pub(super) use mustang_lib::mustang::{Mustang, connect};
pub(super) use mustang_lib::settings::{AmpSettings, FxPedalSettings, SignalChain};

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {}", format_kv(key, value, w - 2));
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{text}");
    Ok(())
}

/// Read a JSON settings file.
pub(super) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    parse_json(&contents).map_err(|e| {
        MustangError::InvalidArgument(format!("{}: {e}", path.display()))
    })
}

fn parse_json<T: DeserializeOwned>(contents: &str) -> std::result::Result<T, serde_json::Error> {
    serde_json::from_str(contents)
}

/// Config from `custom_path` or the default location; parse problems are
/// logged and defaults used.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    let (config, warnings) = match custom_path {
        Some(path) => Config::load_from(path),
        None => Config::load_with_warnings(),
    };
    for w in &warnings {
        log::warn!("{w}");
    }
    config
}

/// Connect, run the handshake, then hand the amp and its start-up state
/// to `f`. The connection is closed afterwards whether `f` succeeds or not.
pub(super) fn with_amp<T>(
    custom_path: Option<&Path>,
    f: impl FnOnce(&mut Mustang<UsbConnection>, SignalChain, Vec<String>) -> Result<T>,
) -> Result<T> {
    let config = load_config(custom_path);
    let mut amp = connect(&config)?;
    let result = amp
        .start_amp()
        .and_then(|(chain, names)| f(&mut amp, chain, names));
    amp.stop_amp();
    result
}

/// Reject slots the amp doesn't have.
pub(super) fn check_slot(slot: u8, number_of_presets: usize) -> Result<()> {
    if number_of_presets > 0 && usize::from(slot) >= number_of_presets {
        return Err(MustangError::InvalidArgument(format!(
            "slot {slot} is out of range (device has {number_of_presets} presets, 0..={})",
            number_of_presets - 1
        )));
    }
    Ok(())
}

/// Human-readable dump of one preset.
pub(super) fn print_chain(chain: &SignalChain) {
    let amp = &chain.amp;
    let w = kv_width(
        &["Name:", "Amp:", "Effects:"],
        &["master volume:", "noise gate:", "brightness:"],
    );

    kv("Name:", &chain.name, w);
    kv("Amp:", amp.amp_num, w);
    kv_indent("cabinet:", amp.cabinet, w);
    kv_indent("gain:", amp.gain, w);
    kv_indent("gain2:", amp.gain2, w);
    kv_indent("volume:", amp.volume, w);
    kv_indent("master volume:", amp.master_vol, w);
    kv_indent("treble:", amp.treble, w);
    kv_indent("middle:", amp.middle, w);
    kv_indent("bass:", amp.bass, w);
    kv_indent("presence:", amp.presence, w);
    kv_indent("bias:", amp.bias, w);
    if amp.noise_gate == mustang_lib::settings::NOISE_GATE_CUSTOM {
        kv_indent(
            "noise gate:",
            format_args!(
                "custom (threshold {}, depth {})",
                amp.threshold, amp.depth
            ),
            w,
        );
    } else {
        kv_indent("noise gate:", amp.noise_gate, w);
    }
    kv_indent("sag:", amp.sag, w);
    kv_indent("brightness:", if amp.brightness { "on" } else { "off" }, w);
    kv_indent("usb gain:", amp.usb_gain, w);

    println!("Effects:");
    for fx in &chain.effects {
        println!("  {}", format_effect(fx));
    }
}

pub(super) fn format_effect(fx: &FxPedalSettings) -> String {
    use mustang_lib::ids::Effect;
    use mustang_lib::settings::Position;

    if fx.effect_num == Effect::Empty {
        return format!("[{}] (empty)", fx.fx_slot);
    }
    let knobs = fx
        .knobs()
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let loop_marker = match fx.position {
        Position::Input => "",
        Position::EffectsLoop => " (fx loop)",
    };
    format!("[{}] {}{loop_marker}: {knobs}", fx.fx_slot, fx.effect_num)
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct DevicesOutput {
    pub count: usize,
    pub devices: Vec<DiscoveredDevice>,
}

#[derive(Serialize)]
pub(super) struct PresetsOutput {
    pub device: String,
    pub count: usize,
    pub presets: Vec<PresetEntry>,
}

#[derive(Serialize)]
pub(super) struct PresetEntry {
    pub slot: usize,
    pub name: String,
}

#[derive(Serialize)]
pub(super) struct PresetOutput {
    pub device: String,
    pub slot: Option<u8>,
    pub preset: SignalChain,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub problems: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List connected Mustang amplifiers
    Devices,

    /// List the presets stored on the amp
    Presets,

    /// Show the active preset
    Current,

    /// Switch to a stored preset
    Load {
        /// Preset slot (0-based)
        slot: u8,
    },

    /// Push amp settings from a JSON file
    SetAmp {
        /// JSON file with amp settings
        file: PathBuf,
    },

    /// Push one effect from a JSON file
    SetEffect {
        /// JSON file with effect settings
        file: PathBuf,
    },

    /// Store the current sound in a preset slot
    Save {
        /// Preset slot (0-based)
        slot: u8,
        /// Preset name (at most 32 characters)
        name: String,
    },

    /// Store an effect-only preset (modulation, delay and reverb only)
    SaveEffects {
        /// Preset slot (0-based)
        slot: u8,
        /// Preset name (at most 24 characters)
        name: String,
        /// JSON file with a list of effect settings
        file: PathBuf,
    },

    /// Show current configuration and file paths
    Config {
        /// Write a default config file first (fails if one exists)
        #[arg(long)]
        init: bool,
    },
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, json: bool, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Command::Devices => devices::cmd_devices(json),
        Command::Presets => presets::cmd_presets(json, config_path),
        Command::Current => current::cmd_current(json, config_path),
        Command::Load { slot } => current::cmd_load(slot, json, config_path),
        Command::SetAmp { file } => {
            if json {
                warn_json_unsupported("set-amp");
            }
            set::cmd_set_amp(&file, config_path)
        }
        Command::SetEffect { file } => {
            if json {
                warn_json_unsupported("set-effect");
            }
            set::cmd_set_effect(&file, config_path)
        }
        Command::Save { slot, name } => save::cmd_save(slot, &name, json, config_path),
        Command::SaveEffects { slot, name, file } => {
            if json {
                warn_json_unsupported("save-effects");
            }
            save::cmd_save_effects(slot, &name, &file, config_path)
        }
        Command::Config { init } => config_cmd::cmd_config(init, json, config_path),
    }
}
