//! Parameter listing.

use clap::Args;
use waveclip_core::{ParamFlags, params};

#[derive(Args)]
pub struct ParamsArgs {}

pub fn run(_args: ParamsArgs) -> anyhow::Result<()> {
    println!("Waveclip parameters:\n");
    println!("  {:<10} {:<6} {:<8} {:<16} {:<10}", "ID", "Key", "Name", "Range", "Default");
    println!("  {}", "-".repeat(54));

    for desc in &params::PARAMS {
        let range = format!("{} .. {}", desc.min, desc.max);
        println!(
            "  {:<10} {:<6} {:<8} {:<16} {:<10}",
            desc.id.0, desc.key, desc.name, range, desc.default
        );

        let mut flags = Vec::new();
        if desc.flags.contains(ParamFlags::AUTOMATABLE) {
            flags.push("automatable");
        }
        if desc.flags.contains(ParamFlags::STEPPED) {
            flags.push("stepped");
        }
        if !flags.is_empty() {
            println!("  {:<10} flags: {}", "", flags.join(", "));
        }
        for (index, label) in desc.step_labels.iter().enumerate() {
            println!("  {:<10} {index} = {label}", "");
        }
    }

    Ok(())
}
