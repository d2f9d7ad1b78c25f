//! `current` and `load` subcommands — show the active preset, switch presets.

use std::path::Path;

use super::{PresetOutput, Result, SignalChain, check_slot, print_chain, print_json, with_amp};

fn show(device: String, slot: Option<u8>, chain: SignalChain, json: bool) -> Result<()> {
    if json {
        return print_json(&PresetOutput {
            device,
            slot,
            preset: chain,
        });
    }
    match slot {
        Some(slot) => println!("{device}, slot {slot}"),
        None => println!("{device}"),
    }
    println!();
    print_chain(&chain);
    Ok(())
}

pub(super) fn cmd_current(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let (device, chain) = with_amp(custom_path, |amp, chain, _names| {
        Ok((amp.device_model().name.to_string(), chain))
    })?;
    show(device, None, chain, json)
}

pub(super) fn cmd_load(slot: u8, json: bool, custom_path: Option<&Path>) -> Result<()> {
    let (device, chain) = with_amp(custom_path, |amp, _chain, names| {
        check_slot(slot, names.len())?;
        let chain = amp.load_memory_bank(slot)?;
        Ok((amp.device_model().name.to_string(), chain))
    })?;
    show(device, Some(slot), chain, json)
}
