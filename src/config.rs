use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SheetfuseConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("sheetfuse.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("sheetfuse.db")
}

pub const DEFAULT_PORT: u16 = 8080;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<SheetfuseConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: SheetfuseConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &SheetfuseConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// CLI flag wins over the config file, which wins over the default.
pub fn resolve_database(explicit: Option<PathBuf>, config: Option<&SheetfuseConfig>) -> PathBuf {
    explicit
        .or_else(|| config.and_then(|c| c.database.as_ref().map(PathBuf::from)))
        .unwrap_or_else(default_database_path)
}

pub fn resolve_port(explicit: Option<u16>, config: Option<&SheetfuseConfig>) -> u16 {
    explicit
        .or_else(|| config.and_then(|c| c.port))
        .unwrap_or(DEFAULT_PORT)
}
