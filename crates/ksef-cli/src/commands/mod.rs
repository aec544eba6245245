//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod render;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use ksef_core::KsefConfig;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ksef-pdf")
        .join("config.json")
}

/// Load the configuration given with `-c`, else the user file if it exists,
/// else the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<KsefConfig> {
    if let Some(path) = config_path {
        return Ok(KsefConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(KsefConfig::from_file(&path)?)
    } else {
        Ok(KsefConfig::default())
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// so the target either gets the full content or is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.persist(path)?;
    Ok(())
}
