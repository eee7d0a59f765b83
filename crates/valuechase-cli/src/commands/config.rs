use anyhow::{bail, Result};

use valuechase_core::AppConfig;

pub fn path() -> Result<()> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() && !force {
        bail!(
            "Config already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    let written = AppConfig::default().save()?;
    println!("Wrote default configuration to {}", written.display());
    Ok(())
}
