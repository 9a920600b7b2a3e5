use serde::{Deserialize, Serialize};

/// The seven file-request flags, in FTS-5001 table order.
pub const FILE_REQUEST_FLAGS: [&str; 7] = ["XA", "XB", "XC", "XP", "XR", "XW", "XX"];

// ---------------------------------------------------------------------------
// FileRequestCapabilities
// ---------------------------------------------------------------------------

/// Bark and WaZOO request support advertised by a node's file-request flag.
/// The default value (empty flag, all false) means no file-request support.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRequestCapabilities {
    pub flag: String,
    pub bark_file: bool,
    pub bark_update: bool,
    pub wazoo_file: bool,
    pub wazoo_update: bool,
}

impl FileRequestCapabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.flag.is_empty()
    }

    pub fn has_any(&self) -> bool {
        self.bark_file || self.bark_update || self.wazoo_file || self.wazoo_update
    }

    pub fn has_bark_support(&self) -> bool {
        self.bark_file || self.bark_update
    }

    pub fn has_wazoo_support(&self) -> bool {
        self.wazoo_file || self.wazoo_update
    }

    pub fn has_full_support(&self) -> bool {
        self.bark_file && self.bark_update && self.wazoo_file && self.wazoo_update
    }
}

fn caps(flag: &str, bits: [bool; 4]) -> FileRequestCapabilities {
    let [bark_file, bark_update, wazoo_file, wazoo_update] = bits;
    FileRequestCapabilities {
        flag: flag.to_string(),
        bark_file,
        bark_update,
        wazoo_file,
        wazoo_update,
    }
}

pub fn capabilities_for(flag: &str) -> Option<FileRequestCapabilities> {
    let bits = match flag {
        "XA" => [true, true, true, true],
        "XB" => [true, true, true, false],
        "XC" => [true, false, true, true],
        "XP" => [true, true, false, false],
        "XR" => [true, false, true, false],
        "XW" => [false, false, true, false],
        "XX" => [false, false, true, true],
        _ => return None,
    };
    Some(caps(flag, bits))
}

/// Capabilities of the first file-request flag in `flags`. A node should
/// carry at most one; when several are present the earliest one wins.
pub fn capabilities_from_flags<S: AsRef<str>>(flags: &[S]) -> FileRequestCapabilities {
    flags
        .iter()
        .find_map(|f| capabilities_for(f.as_ref()))
        .unwrap_or_default()
}

/// Mailers historically documented as advertising each flag.
pub fn known_software_for(flag: &str) -> &'static [&'static str] {
    match flag {
        "XA" => &[
            "Frontdoor 1.99b and lower",
            "Frontdoor 2.01 and higher",
            "Dutchie 2.90c",
            "Binkleyterm 2.1 and higher",
            "D'Bridge 1.2 and lower",
            "Melmail",
            "TIMS",
            "Argus",
            "T-Mail",
            "McMail",
            "Taurus",
        ],
        "XB" => &["Binkleyterm 2.0", "Dutchie 2.90b"],
        "XC" => &["Opus 1.1"],
        "XP" => &["Seadog"],
        "XR" => &["Opus 1.03"],
        "XW" => &["Fido 12N and higher", "Tabby"],
        "XX" => &[
            "D'Bridge 1.30 and higher",
            "Frontdoor 1.99c/2.00",
            "InterMail 2.00",
        ],
        _ => &[],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
