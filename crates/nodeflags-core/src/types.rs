use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FlagCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCategory {
    Modem,
    Internet,
    Capability,
    Schedule,
    User,
}

impl FlagCategory {
    pub fn all() -> &'static [FlagCategory] {
        &[
            FlagCategory::Modem,
            FlagCategory::Internet,
            FlagCategory::Capability,
            FlagCategory::Schedule,
            FlagCategory::User,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlagCategory::Modem => "modem",
            FlagCategory::Internet => "internet",
            FlagCategory::Capability => "capability",
            FlagCategory::Schedule => "schedule",
            FlagCategory::User => "user",
        }
    }
}

impl fmt::Display for FlagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FlagCategory {
    type Err = crate::error::FlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modem" => Ok(FlagCategory::Modem),
            "internet" => Ok(FlagCategory::Internet),
            "capability" => Ok(FlagCategory::Capability),
            "schedule" => Ok(FlagCategory::Schedule),
            "user" => Ok(FlagCategory::User),
            _ => Err(crate::error::FlagError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FlagInfo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagInfo {
    pub category: FlagCategory,
    /// True when the flag is followed by a `:value` suffix in the nodelist.
    pub has_value: bool,
    pub description: String,
}

impl FlagInfo {
    pub fn parser_flag(&self) -> ParserFlag {
        ParserFlag {
            category: self.category,
            has_value: self.has_value,
        }
    }
}

/// Reduced form of [`FlagInfo`] for line parsers that only need to know
/// whether to consume a trailing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserFlag {
    pub category: FlagCategory,
    pub has_value: bool,
}

// ---------------------------------------------------------------------------
// Token helpers
// ---------------------------------------------------------------------------

/// Split `INA:host.example` into `("INA", Some("host.example"))`.
pub fn split_value(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((name, value)) => (name, Some(value)),
        None => (token, None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
