//! `devices` subcommand — list attached Mustang amplifiers.

use super::{DevicesOutput, Result, device, print_json};

pub(super) fn cmd_devices(json: bool) -> Result<()> {
    let devices = device::enumerate_devices();

    if json {
        let output = DevicesOutput {
            count: devices.len(),
            devices,
        };
        return print_json(&output);
    }

    if devices.is_empty() {
        println!("No Mustang devices found.");
        return Ok(());
    }

    println!(
        "Found {} Mustang device{}:",
        devices.len(),
        if devices.len() == 1 { "" } else { "s" }
    );
    println!();

    for (i, dev) in devices.iter().enumerate() {
        let label = match &dev.model {
            Some(model) => model.name.to_string(),
            None if dev.update_mode => "firmware update mode".to_string(),
            None => "unknown model".to_string(),
        };
        println!("  [{}] {} ({label})", i + 1, dev.path);
        if let Some(ref serial) = dev.serial {
            println!("      Serial: {serial}");
        }
    }

    Ok(())
}
