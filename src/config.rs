//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.
//!
//! ```toml
//! [general]
//! level = "levels/warrens.txt"   # omit for the built-in level
//!
//! [map]
//! reveal_radius = 2
//!
//! [audio]
//! enabled = true
//! volume = 0.6
//! ```

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::map::DEFAULT_REVEAL_RADIUS;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Level file; `None` plays the built-in level.
    pub level: Option<PathBuf>,
    pub reveal_radius: i32,
    pub audio: AudioConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioConfig {
    pub enabled: bool,
    pub volume: f32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    map: TomlMap,
    #[serde(default)]
    audio: TomlAudio,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    level: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlMap {
    #[serde(default = "default_reveal_radius")]
    reveal_radius: i32,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_audio_enabled")]
    enabled: bool,
    #[serde(default = "default_volume")]
    volume: f32,
}

// ── Defaults ──

fn default_reveal_radius() -> i32 { DEFAULT_REVEAL_RADIUS }
fn default_audio_enabled() -> bool { true }
fn default_volume() -> f32 { 0.6 }

impl Default for TomlMap {
    fn default() -> Self {
        TomlMap { reveal_radius: default_reveal_radius() }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { enabled: default_audio_enabled(), volume: default_volume() }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly. Relative level paths stay relative.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(cfg, &[]))
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Resolve a relative level path against the first dir that has it.
        let level = cfg.general.level.map(|s| {
            let p = PathBuf::from(&s);
            if p.is_absolute() {
                return p;
            }
            search_dirs.iter()
                .map(|d| d.join(&p))
                .find(|candidate| candidate.is_file())
                .unwrap_or(p)
        });

        GameConfig {
            level,
            reveal_radius: cfg.map.reveal_radius.max(0),
            audio: AudioConfig {
                enabled: cfg.audio.enabled,
                volume: cfg.audio.volume.clamp(0.0, 1.0),
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    tracing::info!("config loaded from {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    tracing::warn!("config.toml parse error: {e}; using default settings");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                tracing::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.level, None);
        assert_eq!(cfg.reveal_radius, DEFAULT_REVEAL_RADIUS);
        assert!(cfg.audio.enabled);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str("[audio]\nenabled = false\n").unwrap();
        assert!(!cfg.audio.enabled);
        assert!((cfg.audio.volume - 0.6).abs() < f32::EPSILON);
        assert_eq!(cfg.reveal_radius, DEFAULT_REVEAL_RADIUS);
    }

    #[test]
    fn values_are_clamped() {
        let cfg = GameConfig::from_toml_str("[map]\nreveal_radius = -4\n[audio]\nvolume = 3.5\n").unwrap();
        assert_eq!(cfg.reveal_radius, 0);
        assert_eq!(cfg.audio.volume, 1.0);
    }

    #[test]
    fn level_path_is_kept() {
        let cfg = GameConfig::from_toml_str("[general]\nlevel = \"levels/pit.txt\"\n").unwrap();
        assert_eq!(cfg.level, Some(PathBuf::from("levels/pit.txt")));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GameConfig::from_toml_str("[map\nreveal_radius = ").is_err());
    }
}
