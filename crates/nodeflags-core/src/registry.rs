use crate::config::FlagsConfig;
use crate::error::Result;
use crate::time_window::{decode_t_flag, TFlag, TimeWindow};
use crate::types::{split_value, FlagCategory, FlagInfo, ParserFlag};
use crate::zmh;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use FlagCategory::{Capability, Internet, Modem, Schedule, User};

// ---------------------------------------------------------------------------
// Standard flag table
// ---------------------------------------------------------------------------

/// `(token, category, has_value, description)` for every statically known
/// flag. `Txy` time windows are decoded, never listed here.
pub const STANDARD_FLAGS: &[(&str, FlagCategory, bool, &str)] = &[
    // Modulation and error correction
    ("V21", Modem, false, "ITU-T V.21 300 bps full duplex"),
    ("V22", Modem, false, "ITU-T V.22 1200 bps full duplex"),
    ("V29", Modem, false, "ITU-T V.29 9600 bps half duplex"),
    ("V32", Modem, false, "ITU-T V.32 9600 bps full duplex"),
    ("V32B", Modem, false, "ITU-T V.32bis 14400 bps full duplex"),
    ("V32T", Modem, false, "V.32terbo 21600 bps full duplex"),
    ("V33", Modem, false, "ITU-T V.33 14400 bps half duplex"),
    ("V34", Modem, false, "ITU-T V.34 28800 bps full duplex"),
    ("V42", Modem, false, "LAP-M error correction with MNP 1-4 fallback"),
    ("V42B", Modem, false, "LAP-M error correction and V.42bis compression"),
    ("MNP", Modem, false, "Microcom Networking Protocol error correction"),
    ("H96", Modem, false, "Hayes V9600"),
    ("HST", Modem, false, "USRobotics HST 9600 bps"),
    ("H14", Modem, false, "USRobotics HST 14400 bps"),
    ("H16", Modem, false, "USRobotics HST 16800 bps"),
    ("MAX", Modem, false, "Microcom AX/96xx series"),
    ("PEP", Modem, false, "Packet Ensemble Protocol"),
    ("CSP", Modem, false, "Compucom Speedmodem"),
    ("ZYX", Modem, false, "Zyxel 19200 bps"),
    ("Z19", Modem, false, "Zyxel 19200 bps with V.32terbo"),
    ("VFC", Modem, false, "Rockwell V.Fast Class"),
    ("V90C", Modem, false, "ITU-T V.90 client"),
    ("V90S", Modem, false, "ITU-T V.90 server"),
    ("X2C", Modem, false, "USRobotics x2 client"),
    ("X2S", Modem, false, "USRobotics x2 server"),
    ("V110L", Modem, false, "ISDN V.110 19200 bps"),
    ("V110H", Modem, false, "ISDN V.110 38400 bps"),
    ("V120L", Modem, false, "ISDN V.120 56 kbps"),
    ("V120H", Modem, false, "ISDN V.120 64 kbps"),
    ("X75", Modem, false, "ISDN X.75 SLP"),
    // Internet transports
    ("INA", Internet, true, "Internet host name or address"),
    ("IBN", Internet, true, "BinkP over TCP"),
    ("IFC", Internet, true, "EMSI/raw ifcico over TCP"),
    ("ITN", Internet, true, "Telnet"),
    ("IVM", Internet, true, "VModem"),
    ("IFT", Internet, true, "FTP"),
    ("ITX", Internet, true, "TransX email"),
    ("IUC", Internet, true, "UUencoded email"),
    ("IMI", Internet, true, "MIME email"),
    ("ISE", Internet, true, "SEAT email"),
    ("IEM", Internet, true, "Email address"),
    // Operating conditions and file requests
    ("CM", Capability, false, "Continuous mail"),
    ("ICM", Capability, false, "Internet continuous mail"),
    ("MO", Capability, false, "Mail only, no human callers"),
    ("LO", Capability, false, "Accepts calls only from listed nodes"),
    ("MN", Capability, false, "No compression supported"),
    ("XA", Capability, false, "Bark and WaZOO file and update requests"),
    ("XB", Capability, false, "Bark file and update requests, WaZOO file requests"),
    ("XC", Capability, false, "Bark file requests, WaZOO file and update requests"),
    ("XP", Capability, false, "Bark file and update requests"),
    ("XR", Capability, false, "Bark and WaZOO file requests"),
    ("XW", Capability, false, "WaZOO file requests"),
    ("XX", Capability, false, "WaZOO file and update requests"),
    // Schedule
    ("T", Schedule, false, "Time zone"),
    ("U", Schedule, true, "Availability"),
    ("#01", Schedule, false, "Zone 5 mail hour (01:00-02:00 UTC)"),
    ("#02", Schedule, false, "Zone 2 mail hour (02:30-03:30 UTC)"),
    ("#08", Schedule, false, "Zone 4 mail hour (08:00-09:00 UTC)"),
    ("#09", Schedule, false, "Zone 1 mail hour (09:00-10:00 UTC)"),
    ("#18", Schedule, false, "Zone 3 mail hour (18:00-19:00 UTC)"),
    ("#20", Schedule, false, "Zone 6 mail hour (20:00-21:00 UTC)"),
    // User flags
    ("ENC", User, false, "Accepts encrypted mail"),
    ("NC", User, false, "Network coordinator"),
    ("NEC", User, false, "Net echomail coordinator"),
    ("REC", User, false, "Region echomail coordinator"),
    ("ZEC", User, false, "Zone echomail coordinator"),
    ("SDS", User, false, "Software Distribution System"),
    ("SMH", User, false, "Secure Mail Hub"),
    ("PING", User, false, "Answers PING and TRACE messages"),
    ("RPK", User, false, "Regional pointlist keeper"),
    ("NPK", User, false, "Net pointlist keeper"),
];

// ---------------------------------------------------------------------------
// FlagKind
// ---------------------------------------------------------------------------

/// Normalized classification of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind<'a> {
    Static(&'a FlagInfo),
    TimeWindow(TFlag),
    Unrecognized,
}

impl FlagKind<'_> {
    pub fn category(&self) -> Option<FlagCategory> {
        match self {
            FlagKind::Static(info) => Some(info.category),
            FlagKind::TimeWindow(TFlag::Window(_)) => Some(FlagCategory::Schedule),
            _ => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.category().is_some()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable flag and Zone Mail Hour tables. The standard registry is built
/// once per process; custom registries come from [`Registry::from_config`].
#[derive(Debug, Clone)]
pub struct Registry {
    flags: HashMap<String, FlagInfo>,
    parser: HashMap<String, ParserFlag>,
    zone_mail_hours: BTreeMap<u16, TimeWindow>,
}

static STANDARD: OnceLock<Registry> = OnceLock::new();

impl Registry {
    pub fn standard() -> &'static Registry {
        STANDARD.get_or_init(Registry::build_standard)
    }

    fn build_standard() -> Self {
        let flags: HashMap<String, FlagInfo> = STANDARD_FLAGS
            .iter()
            .map(|&(token, category, has_value, description)| {
                (
                    token.to_string(),
                    FlagInfo {
                        category,
                        has_value,
                        description: description.to_string(),
                    },
                )
            })
            .collect();
        Self::assemble(flags, zmh::standard_zone_mail_hours())
    }

    fn assemble(flags: HashMap<String, FlagInfo>, zone_mail_hours: BTreeMap<u16, TimeWindow>) -> Self {
        let parser = flags
            .iter()
            .map(|(token, info)| (token.clone(), info.parser_flag()))
            .collect();
        Self {
            flags,
            parser,
            zone_mail_hours,
        }
    }

    /// Standard tables plus the site-specific flags and ZMH entries in
    /// `config`. Entries that would collide with the standard vocabulary
    /// or fail to parse are skipped.
    pub fn from_config(config: &FlagsConfig) -> Self {
        let base = Registry::standard();
        let mut flags = base.flags.clone();
        let mut zone_mail_hours = base.zone_mail_hours.clone();

        for (token, extra) in &config.extra_flags {
            if let Err(reason) = crate::config::check_extra_flag_name(token) {
                tracing::warn!(flag = %token, %reason, "skipping configured flag");
                continue;
            }
            flags.insert(token.clone(), extra.to_flag_info());
        }

        for (zone, entry) in &config.zone_mail_hours {
            match entry.to_window() {
                Ok(window) => {
                    zone_mail_hours.insert(*zone, window);
                }
                Err(e) => {
                    tracing::warn!(zone, error = %e, "skipping configured zone mail hour");
                }
            }
        }

        Self::assemble(flags, zone_mail_hours)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let config = FlagsConfig::load(path)?;
        let registry = Self::from_config(&config);
        tracing::info!(
            path = %path.display(),
            flags = registry.flags.len(),
            zones = registry.zone_mail_hours.len(),
            "loaded flag registry"
        );
        Ok(registry)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn classify(&self, token: &str) -> Option<&FlagInfo> {
        let (name, _) = split_value(token);
        self.flags.get(name)
    }

    pub fn has_value(&self, token: &str) -> bool {
        self.classify(token).map(|i| i.has_value).unwrap_or(false)
    }

    pub fn parser_view(&self) -> &HashMap<String, ParserFlag> {
        &self.parser
    }

    /// Static table first, then the T-flag decoder.
    pub fn lookup(&self, token: &str) -> FlagKind<'_> {
        let (name, _) = split_value(token);
        if let Some(info) = self.flags.get(name) {
            return FlagKind::Static(info);
        }
        match decode_t_flag(name) {
            TFlag::NotApplicable => FlagKind::Unrecognized,
            decoded => FlagKind::TimeWindow(decoded),
        }
    }

    pub fn zone_mail_hour(&self, zone: u16) -> Option<TimeWindow> {
        self.zone_mail_hours.get(&zone).copied()
    }

    pub fn zones(&self) -> impl Iterator<Item = u16> + '_ {
        self.zone_mail_hours.keys().copied()
    }

    /// Known tokens in sorted order.
    pub fn tokens(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.flags.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Standard-registry shortcuts
// ---------------------------------------------------------------------------

pub fn classify(token: &str) -> Option<&'static FlagInfo> {
    Registry::standard().classify(token)
}

pub fn has_value(token: &str) -> bool {
    Registry::standard().has_value(token)
}

pub fn parser_view() -> &'static HashMap<String, ParserFlag> {
    Registry::standard().parser_view()
}

pub fn lookup(token: &str) -> FlagKind<'static> {
    Registry::standard().lookup(token)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExtraFlag, ZmhEntry};
    use crate::time_window::is_t_flag_shape;
    use std::collections::HashSet;

    #[test]
    fn standard_tokens_are_unique() {
        let mut seen = HashSet::new();
        for (token, ..) in STANDARD_FLAGS {
            assert!(seen.insert(*token), "duplicate flag {token}");
        }
        assert_eq!(Registry::standard().len(), STANDARD_FLAGS.len());
    }

    #[test]
    fn every_token_has_one_known_category() {
        for (token, ..) in STANDARD_FLAGS {
            let info = classify(token).unwrap();
            assert!(FlagCategory::all().contains(&info.category), "{token}");
        }
        for &cat in FlagCategory::all() {
            assert!(
                STANDARD_FLAGS.iter().any(|(_, c, ..)| *c == cat),
                "no flags in {cat}"
            );
        }
    }

    #[test]
    fn static_table_never_holds_t_flags() {
        for (token, ..) in STANDARD_FLAGS {
            assert!(!is_t_flag_shape(token), "{token} collides with the T-flag grammar");
            assert!((1..=5).contains(&token.chars().count()), "{token}");
        }
    }

    #[test]
    fn classify_known_flags() {
        assert_eq!(classify("V34").unwrap().category, FlagCategory::Modem);
        assert_eq!(classify("IBN").unwrap().category, FlagCategory::Internet);
        assert_eq!(classify("XA").unwrap().category, FlagCategory::Capability);
        assert_eq!(classify("CM").unwrap().category, FlagCategory::Capability);
        assert_eq!(classify("NEC").unwrap().category, FlagCategory::User);
    }

    #[test]
    fn classify_is_case_sensitive() {
        assert!(classify("v34").is_none());
        assert!(classify("ibn").is_none());
        assert!(classify("cm").is_none());
    }

    #[test]
    fn classify_strips_inline_value() {
        let info = classify("INA:foo.example.com").unwrap();
        assert_eq!(info.category, FlagCategory::Internet);
        assert!(info.has_value);
        assert!(has_value("IBN:24555"));
        assert!(!has_value("V34"));
        assert!(!has_value("NOPE"));
    }

    #[test]
    fn unknown_tokens_unrecognized() {
        assert!(classify("QQQ").is_none());
        assert_eq!(lookup("QQQ"), FlagKind::Unrecognized);
        assert_eq!(lookup(""), FlagKind::Unrecognized);
    }

    #[test]
    fn parser_view_mirrors_registry() {
        let view = parser_view();
        assert_eq!(view.len(), STANDARD_FLAGS.len());
        assert_eq!(
            view.get("INA"),
            Some(&ParserFlag {
                category: FlagCategory::Internet,
                has_value: true
            })
        );
        assert!(!view["V34"].has_value);
    }

    #[test]
    fn lookup_dispatches_t_flags() {
        match lookup("TAB") {
            FlagKind::TimeWindow(TFlag::Window(w)) => assert_eq!(w.to_string(), "00:00-00:30"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            lookup("TA1"),
            FlagKind::TimeWindow(TFlag::Unrecognized { letter: '1' })
        );
        assert_eq!(lookup("TA1").category(), None);
        assert_eq!(lookup("TAB").category(), Some(FlagCategory::Schedule));
    }

    #[test]
    fn bare_t_and_u_stay_opaque() {
        // The value grammar of the bare T and U flags is unresolved; they
        // classify as schedule flags and are never decoded.
        let t = classify("T").unwrap();
        assert_eq!(t.category, FlagCategory::Schedule);
        assert!(!t.has_value);
        let u = classify("U:ABC").unwrap();
        assert_eq!(u.category, FlagCategory::Schedule);
        assert!(u.has_value);
        assert!(matches!(lookup("T"), FlagKind::Static(_)));
        assert!(matches!(lookup("U:MON"), FlagKind::Static(_)));
    }

    #[test]
    fn standard_zone_mail_hours() {
        let reg = Registry::standard();
        assert_eq!(reg.zone_mail_hour(1).unwrap().to_string(), "09:00-10:00");
        assert_eq!(reg.zone_mail_hour(2).unwrap().to_string(), "02:30-03:30");
        assert!(reg.zone_mail_hour(7).is_none());
        assert_eq!(reg.zones().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn from_config_adds_extras_and_overrides_zmh() {
        let mut cfg = FlagsConfig::default();
        cfg.extra_flags.insert(
            "BEER".to_string(),
            ExtraFlag {
                category: FlagCategory::User,
                has_value: false,
                description: "Sysop accepts beer".to_string(),
            },
        );
        cfg.zone_mail_hours
            .insert(7, ZmhEntry::Letters("Ab".to_string()));
        cfg.zone_mail_hours.insert(
            1,
            ZmhEntry::Times {
                start: "10:00".to_string(),
                end: "11:00".to_string(),
            },
        );

        let reg = Registry::from_config(&cfg);
        assert_eq!(reg.classify("BEER").unwrap().category, FlagCategory::User);
        assert!(reg.parser_view().contains_key("BEER"));
        assert_eq!(reg.zone_mail_hour(7).unwrap().to_string(), "00:00-12:30");
        assert_eq!(reg.zone_mail_hour(1).unwrap().to_string(), "10:00-11:00");
        // The standard registry is untouched.
        assert!(classify("BEER").is_none());
        assert!(Registry::standard().zone_mail_hour(7).is_none());
    }

    #[test]
    fn from_config_skips_colliding_and_bad_entries() {
        let mut cfg = FlagsConfig::default();
        let extra = ExtraFlag {
            category: FlagCategory::User,
            has_value: false,
            description: String::new(),
        };
        for name in ["V34", "TAB", "TOOLONG", "A:B", ""] {
            cfg.extra_flags.insert(name.to_string(), extra.clone());
        }
        cfg.zone_mail_hours
            .insert(9, ZmhEntry::Letters("A1".to_string()));

        let reg = Registry::from_config(&cfg);
        assert_eq!(reg.len(), Registry::standard().len());
        assert_eq!(reg.classify("V34").unwrap().category, FlagCategory::Modem);
        assert!(matches!(reg.lookup("TAB"), FlagKind::TimeWindow(_)));
        assert!(reg.zone_mail_hour(9).is_none());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nodeflags.yaml");
        std::fs::write(
            &path,
            "version: 1\nextra_flags:\n  GATE:\n    category: capability\n    description: Gateway\n",
        )
        .unwrap();
        let reg = Registry::load(&path).unwrap();
        assert_eq!(reg.classify("GATE").unwrap().category, FlagCategory::Capability);
    }

    #[test]
    fn registry_is_shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Registry::standard() as *const Registry as usize))
            .collect();
        let addrs: HashSet<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(addrs.len(), 1);
    }
}
