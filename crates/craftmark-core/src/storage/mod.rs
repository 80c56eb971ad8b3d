mod config;

pub use config::{Config, EffectsConfig, HapticsConfig, NebulaConfig, SessionConfig, TimerConfig};

use std::path::PathBuf;

/// Returns `~/.config/craftmark[-dev]/` based on CRAFTMARK_ENV.
///
/// Set CRAFTMARK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CRAFTMARK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("craftmark-dev")
    } else {
        base_dir.join("craftmark")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
