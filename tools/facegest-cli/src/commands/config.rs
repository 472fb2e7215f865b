//! Show or persist the effective configuration.

use facegest_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let path = config.save()?;
        println!("\nSaved to {}", path.display());
    } else {
        println!("\nConfig file: {}", config_file_path().display());
    }
    Ok(())
}
