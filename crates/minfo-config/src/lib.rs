mod config;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use minfo_core::{MinfoError, MinfoResult, ViewMode};

pub use config::{ApiConfig, MinfoConfig, OutputConfig};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn config_path() -> MinfoResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MinfoError::Config("home directory not found".to_string()))?;
    Ok(home.join(".minfo").join("config.toml"))
}

pub fn config_exists() -> MinfoResult<bool> {
    let path = config_path()?;
    Ok(path.exists())
}

pub fn load_config() -> MinfoResult<MinfoConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(MinfoConfig::default());
    }
    let content = fs::read_to_string(&path)
        .map_err(|err| MinfoError::Config(format!("failed to read config: {err}")))?;
    let config = toml::from_str(&content)
        .map_err(|err| MinfoError::Config(format!("failed to parse config: {err}")))?;
    Ok(config)
}

pub fn save_config(config: &MinfoConfig) -> MinfoResult<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| MinfoError::Config(format!("failed to create config dir: {err}")))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|err| MinfoError::Config(format!("failed to serialize config: {err}")))?;
    fs::write(&path, content)
        .map_err(|err| MinfoError::Config(format!("failed to write config: {err}")))?;
    Ok(())
}

/// Endpoint resolution order: `MINFO_ENDPOINT`, then the config file.
pub fn resolve_endpoint(config: &MinfoConfig) -> Option<String> {
    if let Ok(value) = env::var("MINFO_ENDPOINT")
        && !value.trim().is_empty()
    {
        return Some(value);
    }
    config.api.endpoint.clone()
}

/// Request timeout: `MINFO_TIMEOUT_SECS`, then the config file, then 30 s.
/// Unparseable values fall through to the next source.
pub fn resolve_timeout(config: &MinfoConfig) -> Duration {
    let secs = env::var("MINFO_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .or(config.api.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Default view for finished analyses: `MINFO_VIEW`, then the config file.
/// Anything other than "structured"/"text" is ignored.
pub fn resolve_view(config: &MinfoConfig) -> Option<ViewMode> {
    if let Ok(value) = env::var("MINFO_VIEW")
        && let Some(mode) = parse_view(&value)
    {
        return Some(mode);
    }
    config.output.view.as_deref().and_then(parse_view)
}

pub fn resolve_bell(config: &MinfoConfig) -> bool {
    config.output.bell.unwrap_or(false)
}

fn parse_view(value: &str) -> Option<ViewMode> {
    match value.trim().to_lowercase().as_str() {
        "text" => Some(ViewMode::Text),
        "structured" => Some(ViewMode::Structured),
        _ => None,
    }
}

pub fn get_config_value(config: &MinfoConfig, key_path: &str) -> Option<String> {
    let parts: Vec<&str> = key_path.split('.').collect();

    match parts.as_slice() {
        ["api", "endpoint"] => config.api.endpoint.clone(),
        ["api", "timeout_secs"] => config.api.timeout_secs.map(|secs| secs.to_string()),
        ["output", "view"] => config.output.view.clone(),
        ["output", "bell"] => config.output.bell.map(|flag| flag.to_string()),
        _ => None,
    }
}

pub fn set_config_value(key_path: &str, value: &str) -> MinfoResult<()> {
    let path = config_path()?;
    let content = if path.exists() {
        fs::read_to_string(&path)
            .map_err(|err| MinfoError::Config(format!("failed to read config: {err}")))?
    } else {
        String::new()
    };

    let mut doc = content.parse::<toml_edit::DocumentMut>().unwrap_or_default();

    let parts: Vec<&str> = key_path.split('.').collect();
    if parts.len() < 2 {
        return Err(MinfoError::Config(
            "key path must have at least 2 parts (e.g., 'api.endpoint')".to_string(),
        ));
    }

    let table = doc.as_table_mut();
    let mut current = table;
    for part in &parts[..parts.len() - 1] {
        current = current
            .entry(part)
            .or_insert(toml_edit::Item::Table(Default::default()))
            .as_table_mut()
            .ok_or_else(|| {
                MinfoError::Config(format!("cannot set nested value in '{}'", key_path))
            })?;
    }

    let last_part = parts.last().unwrap();
    current[last_part] = parse_literal(value);

    let content = doc.to_string();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| MinfoError::Config(format!("failed to create config dir: {err}")))?;
    }
    fs::write(&path, content)
        .map_err(|err| MinfoError::Config(format!("failed to write config: {err}")))?;

    Ok(())
}

/// Booleans and integers are written as their native TOML types so that
/// `config set api.timeout_secs 60` round-trips through serde.
fn parse_literal(value: &str) -> toml_edit::Item {
    if let Ok(flag) = value.parse::<bool>() {
        return toml_edit::value(flag);
    }
    if let Ok(number) = value.parse::<i64>() {
        return toml_edit::value(number);
    }
    toml_edit::value(value)
}

pub fn open_in_editor() -> MinfoResult<()> {
    let path = config_path()?;
    if !path.exists() {
        save_config(&MinfoConfig::default())?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "vim".to_string()
        } else if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else {
            "nano".to_string()
        }
    });

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .map_err(|err| MinfoError::Config(format!("failed to open editor '{}': {}", editor, err)))?;

    if !status.success() {
        return Err(MinfoError::Config(format!(
            "editor exited with status: {}",
            status
        )));
    }

    Ok(())
}
