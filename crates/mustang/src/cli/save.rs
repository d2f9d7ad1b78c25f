//! `save` and `save-effects` subcommands — write presets to the amp.

use std::path::Path;

use super::{
    FxPedalSettings, PresetOutput, Result, check_slot, print_chain, print_json, read_json_file,
    with_amp,
};

pub(super) fn cmd_save(slot: u8, name: &str, json: bool, custom_path: Option<&Path>) -> Result<()> {
    let (device, chain) = with_amp(custom_path, |amp, _chain, names| {
        check_slot(slot, names.len())?;
        let stored = amp.save_on_amp(name, slot)?;
        Ok((amp.device_model().name.to_string(), stored))
    })?;

    if json {
        return print_json(&PresetOutput {
            device,
            slot: Some(slot),
            preset: chain,
        });
    }

    println!("Saved to slot {slot} on {device}.");
    println!();
    print_chain(&chain);
    Ok(())
}

pub(super) fn cmd_save_effects(
    slot: u8,
    name: &str,
    file: &Path,
    custom_path: Option<&Path>,
) -> Result<()> {
    let effects: Vec<FxPedalSettings> = read_json_file(file)?;
    with_amp(custom_path, |amp, _chain, names| {
        check_slot(slot, names.len())?;
        amp.save_effects(slot, name, &effects)
    })?;
    println!("Saved effect preset \"{name}\" to slot {slot}.");
    Ok(())
}
