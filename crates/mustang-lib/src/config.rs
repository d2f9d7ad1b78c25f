//! Application configuration — TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{KNOWN_PIDS, lookup_model};
use crate::protocol::USB_TIMEOUT_MS;

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# Mustang configuration. Changes made outside the tool may be overwritten.\n\n";

/// Timeouts below this make every read look like end-of-stream.
pub const MIN_TIMEOUT_MS: u64 = 50;

/// Upper bound on a single transfer timeout.
pub const MAX_TIMEOUT_MS: u64 = 10_000;

/// Largest preset count any amp stores.
pub const MAX_PRESET_COUNT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Preferred product ID in hex (e.g. "0005"). Empty = first known device.
    #[serde(default)]
    pub device: String,

    /// Per-transfer USB timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Presets to read from the load response. 0 = use the model table.
    #[serde(default)]
    pub preset_count_override: usize,
}

fn default_timeout_ms() -> u64 {
    USB_TIMEOUT_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: String::new(),
            timeout_ms: USB_TIMEOUT_MS,
            preset_count_override: 0,
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `device` is not a hex product ID.
    InvalidDevice(String),
    /// `device` parses but names no known amp.
    UnknownDevice(u16),
    TimeoutOutOfRange(u64),
    PresetCountOutOfRange(usize),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidDevice(e) => write!(f, "Invalid device: {e}"),
            ValidationError::UnknownDevice(pid) => {
                let known: Vec<String> = KNOWN_PIDS.iter().map(|p| format!("{p:04x}")).collect();
                write!(
                    f,
                    "Unknown device 0x{pid:04x} (known: {})",
                    known.join(", ")
                )
            }
            ValidationError::TimeoutOutOfRange(ms) => write!(
                f,
                "timeout_ms {ms} is out of range ({MIN_TIMEOUT_MS}..={MAX_TIMEOUT_MS})"
            ),
            ValidationError::PresetCountOutOfRange(n) => write!(
                f,
                "preset_count_override {n} is out of range (0..={MAX_PRESET_COUNT})"
            ),
        }
    }
}

/// Parse a product ID written as `0005`, `5` or `0x0005`.
pub fn parse_pid(s: &str) -> std::result::Result<u16, String> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u16::from_str_radix(digits, 16).map_err(|e| format!("\"{trimmed}\" is not a hex product ID ({e})"))
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mustang"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    ///
    /// A header comment is prepended to warn that manual edits may be overwritten.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Preferred product ID, `None` when `device` is empty.
    pub fn preferred_pid(&self) -> crate::error::Result<Option<u16>> {
        if self.device.trim().is_empty() {
            return Ok(None);
        }
        parse_pid(&self.device)
            .map(Some)
            .map_err(crate::error::MustangError::Config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Preset count override, `None` when unset.
    pub fn preset_count(&self) -> Option<usize> {
        (self.preset_count_override > 0).then_some(self.preset_count_override)
    }

    /// [`validate`](Self::validate) as a single error listing every problem.
    pub fn ensure_valid(&self) -> crate::error::Result<()> {
        self.validate().map_err(|errors| {
            let problems: Vec<String> = errors.iter().map(ToString::to_string).collect();
            crate::error::MustangError::Config(problems.join("; "))
        })
    }

    /// Check every field.
    ///
    /// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all problems found.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !self.device.trim().is_empty() {
            match parse_pid(&self.device) {
                Ok(pid) if lookup_model(pid).is_none() => {
                    errors.push(ValidationError::UnknownDevice(pid));
                }
                Ok(_) => {}
                Err(e) => errors.push(ValidationError::InvalidDevice(e)),
            }
        }

        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            errors.push(ValidationError::TimeoutOutOfRange(self.timeout_ms));
        }

        if self.preset_count_override > MAX_PRESET_COUNT {
            errors.push(ValidationError::PresetCountOutOfRange(
                self.preset_count_override,
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
