//! `set-amp` and `set-effect` subcommands — push settings read from JSON files.

use std::path::Path;

use super::{AmpSettings, FxPedalSettings, MustangError, Result, read_json_file, with_amp};
use mustang_lib::protocol::FX_SLOT_COUNT;

pub(super) fn cmd_set_amp(file: &Path, custom_path: Option<&Path>) -> Result<()> {
    let settings: AmpSettings = read_json_file(file)?;
    with_amp(custom_path, |amp, _chain, _names| amp.set_amplifier(&settings))?;
    println!("Amp set to {}.", settings.amp_num);
    Ok(())
}

pub(super) fn cmd_set_effect(file: &Path, custom_path: Option<&Path>) -> Result<()> {
    let fx: FxPedalSettings = read_json_file(file)?;
    if usize::from(fx.fx_slot) >= FX_SLOT_COUNT {
        return Err(MustangError::InvalidArgument(format!(
            "fx_slot {} is out of range (0..={})",
            fx.fx_slot,
            FX_SLOT_COUNT - 1
        )));
    }
    with_amp(custom_path, |amp, _chain, _names| amp.set_effect(&fx))?;

    if fx.enabled && fx.effect_num != mustang_lib::ids::Effect::Empty {
        println!("Slot {} set to {}.", fx.fx_slot, fx.effect_num);
    } else {
        println!("Slot {} cleared.", fx.fx_slot);
    }
    Ok(())
}
