use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use devolution_core::AppConfig;

pub fn run(
    config: &AppConfig,
    override_path: Option<&Path>,
    path_only: bool,
    init: bool,
) -> Result<()> {
    let path = override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path);

    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    if init {
        if path.exists() {
            println!("{} already exists, leaving it alone", path.display());
            return Ok(());
        }
        match override_path {
            Some(path) => write_to(config, path)?,
            None => config.save()?,
        }
        info!(path = %path.display(), "wrote default config");
        println!("Wrote {}", path.display());
        return Ok(());
    }

    if !path.exists() {
        println!("# {} not found, showing defaults", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

fn write_to(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, config.to_toml()?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
