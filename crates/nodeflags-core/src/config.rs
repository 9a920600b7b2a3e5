use crate::error::{FlagError, Result};
use crate::registry::Registry;
use crate::time_window::{is_t_flag_shape, parse_hhmm, TimeWindow};
use crate::types::{FlagCategory, FlagInfo};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

pub const CONFIG_FILE: &str = "nodeflags.yaml";

const CURRENT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ExtraFlag
// ---------------------------------------------------------------------------

/// A site-specific flag added on top of the standard vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraFlag {
    pub category: FlagCategory,
    #[serde(default)]
    pub has_value: bool,
    #[serde(default)]
    pub description: String,
}

impl ExtraFlag {
    pub fn to_flag_info(&self) -> FlagInfo {
        FlagInfo {
            category: self.category,
            has_value: self.has_value,
            description: self.description.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// ZmhEntry
// ---------------------------------------------------------------------------

/// Either a time-letter pair (`"SU"`) or explicit `HH:MM` bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZmhEntry {
    Letters(String),
    Times { start: String, end: String },
}

impl ZmhEntry {
    pub fn to_window(&self) -> Result<TimeWindow> {
        match self {
            ZmhEntry::Letters(letters) => {
                if letters.chars().count() != 2 {
                    return Err(FlagError::InvalidConfig(format!(
                        "zone mail hour '{letters}' must be two time letters"
                    )));
                }
                format!("T{letters}").parse()
            }
            ZmhEntry::Times { start, end } => {
                Ok(TimeWindow::new(parse_hhmm(start)?, parse_hhmm(end)?))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Flag name checks
// ---------------------------------------------------------------------------

static FLAG_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn flag_name_re() -> &'static Regex {
    FLAG_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9#!$]{1,5}$").unwrap())
}

/// Reasons a configured flag name cannot join the registry.
pub fn check_extra_flag_name(token: &str) -> std::result::Result<(), String> {
    if !flag_name_re().is_match(token) {
        return Err("must be 1-5 letters, digits, '#', '!' or '$'".to_string());
    }
    if Registry::standard().classify(token).is_some() {
        return Err("shadows a standard flag".to_string());
    }
    if is_t_flag_shape(token) {
        return Err("collides with the Txy time-window grammar".to_string());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// FlagsConfig (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagsConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_flags: BTreeMap<String, ExtraFlag>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub zone_mail_hours: BTreeMap<u16, ZmhEntry>,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            extra_flags: BTreeMap::new(),
            zone_mail_hours: BTreeMap::new(),
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

impl FlagsConfig {
    /// Load YAML, or JSON when the file ends in `.json`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FlagError::ConfigNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: FlagsConfig = if is_json(path) {
            serde_json::from_str(&data)?
        } else {
            serde_yaml::from_str(&data)?
        };
        if cfg.version > CURRENT_VERSION {
            return Err(FlagError::InvalidConfig(format!(
                "unsupported config version {}",
                cfg.version
            )));
        }
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        crate::io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for token in self.extra_flags.keys() {
            if let Err(reason) = check_extra_flag_name(token) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("extra flag '{}' ignored: {}", token, reason),
                });
            }
        }

        for (zone, entry) in &self.zone_mail_hours {
            if *zone == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "zone_mail_hours has an entry for zone 0".to_string(),
                });
            }
            if let Err(e) = entry.to_window() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("zone {} mail hour ignored: {}", zone, e),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
