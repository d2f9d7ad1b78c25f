//! `config` subcommand — show current configuration and file paths.

use std::path::Path;

use super::{Config, ConfigOutput, MustangError, Result, kv, kv_indent, kv_width, print_json};
use mustang_lib::models::lookup_model;

pub(super) fn cmd_config(init: bool, json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);

    if init {
        let Some(path) = &config_path else {
            return Err(MustangError::Config("No config directory".into()));
        };
        if path.exists() {
            return Err(MustangError::Config(format!(
                "{} already exists",
                path.display()
            )));
        }
        Config::default().save_to(path)?;
        log::info!("Wrote default config to {}", path.display());
    }

    let config = super::load_config(custom_path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());
    let problems: Vec<String> = match config.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    };

    if json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            problems,
        };
        return print_json(&output);
    }

    // Human-readable output
    let w = kv_width(
        &["Config file:"],
        &["device:", "timeout_ms:", "preset_count_override:"],
    );

    match &config_path {
        Some(p) => {
            if config_exists {
                kv("Config file:", format_args!("{} (loaded)", p.display()), w);
            } else {
                kv(
                    "Config file:",
                    format_args!("{} (not found, using defaults)", p.display()),
                    w,
                );
            }
        }
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    let device_display = match config.preferred_pid() {
        Ok(None) => "(first found)".to_string(),
        Ok(Some(pid)) => match lookup_model(pid) {
            Some(model) => format!("{} -> {}", config.device, model.name),
            None => format!("{} (unknown)", config.device),
        },
        Err(_) => format!("{} (invalid)", config.device),
    };
    kv_indent("device:", &device_display, w);
    kv_indent("timeout_ms:", config.timeout_ms, w);
    let count_display = match config.preset_count() {
        Some(n) => n.to_string(),
        None => "(from model)".to_string(),
    };
    kv_indent("preset_count_override:", &count_display, w);

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for problem in &problems {
            println!("  {problem}");
        }
    }
    Ok(())
}
