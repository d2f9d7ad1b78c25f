//! `presets` subcommand — list preset names stored on the amp.

use std::path::Path;

use super::{PresetEntry, PresetsOutput, Result, print_json, with_amp};

pub(super) fn cmd_presets(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let (device, names) = with_amp(custom_path, |amp, _chain, names| {
        Ok((amp.device_model().name.to_string(), names))
    })?;

    if json {
        let output = PresetsOutput {
            device,
            count: names.len(),
            presets: names
                .into_iter()
                .enumerate()
                .map(|(slot, name)| PresetEntry { slot, name })
                .collect(),
        };
        return print_json(&output);
    }

    println!("{device}: {} presets", names.len());
    println!();
    let digits = names.len().saturating_sub(1).to_string().len();
    for (slot, name) in names.iter().enumerate() {
        println!("  {slot:>digits$}  {name}");
    }
    Ok(())
}
