use nodeflags_core::config::{ExtraFlag, FlagsConfig, ZmhEntry};
use nodeflags_core::schedule::ScheduleComposer;
use nodeflags_core::*;
use tempfile::TempDir;

fn node(flags: &[&str], zone: u16) -> NodeScheduleInput {
    NodeScheduleInput::from_flags(flags, zone, "7-495-555-0100")
}

// ---------------------------------------------------------------------------
// Whole-node decoding
// ---------------------------------------------------------------------------

#[test]
fn binkp_node_with_time_window() {
    let flags = ["XA", "V34", "IBN:24554", "INA:bbs.example.org", "TJL", "U"];

    let summary = summarize(&flags);
    assert_eq!(summary.tokens_in(FlagCategory::Internet).len(), 2);
    assert!(summary.unrecognized.is_empty());

    let caps = capabilities_from_flags(&flags);
    assert!(caps.has_full_support());
    assert!(!known_software_for(&caps.flag).is_empty());

    let schedule = compose_schedule(&node(&flags, 2));
    assert_eq!(schedule.source, ScheduleSource::TimeWindows);
    assert_eq!(schedule.text, "Available 04:30-05:30 UTC");
}

#[test]
fn continuous_mail_node() {
    let flags = ["CM", "XX", "V34", "TAB"];
    let schedule = compose_schedule(&node(&flags, 1));
    assert_eq!(schedule.text, "Continuous Mail — available 24/7");
    assert_eq!(capabilities_from_flags(&flags).flag, "XX");
}

#[test]
fn plain_node_falls_back_to_zone_mail_hour() {
    let flags = ["V32B", "V42B", "XW"];
    let schedule = compose_schedule(&node(&flags, 3));
    assert_eq!(schedule.text, "ZMH only: 18:00-19:00 UTC daily");
}

#[test]
fn exotic_zone_without_schedule() {
    let schedule = compose_schedule(&node(&["V34"], 42));
    assert_eq!(schedule.text, "Schedule unknown");
}

#[test]
fn lookup_partitions_token_space() {
    assert!(matches!(lookup("T"), FlagKind::Static(_)));
    assert!(matches!(lookup("TAB"), FlagKind::TimeWindow(TFlag::Window(_))));
    assert!(matches!(
        lookup("T?B"),
        FlagKind::TimeWindow(TFlag::Unrecognized { letter: '?' })
    ));
    assert!(matches!(lookup("XYZ"), FlagKind::Unrecognized));
    assert_eq!(decode_t_flag("XYZ"), TFlag::NotApplicable);
}

// ---------------------------------------------------------------------------
// Site configuration
// ---------------------------------------------------------------------------

#[test]
fn configured_registry_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nodeflags.yaml");

    let mut cfg = FlagsConfig::default();
    cfg.extra_flags.insert(
        "BEER".to_string(),
        ExtraFlag {
            category: FlagCategory::User,
            has_value: false,
            description: "Sysop accepts beer".to_string(),
        },
    );
    cfg.zone_mail_hours.insert(
        42,
        ZmhEntry::Times {
            start: "06:00".to_string(),
            end: "07:00".to_string(),
        },
    );
    assert!(cfg.validate().is_empty());
    cfg.save(&path).unwrap();

    let registry = Registry::load(&path).unwrap();
    let summary = registry.summarize(&["BEER", "V34"]);
    assert_eq!(summary.tokens_in(FlagCategory::User), ["BEER"]);

    let schedule = ScheduleComposer::new(&registry).compose(&node(&["BEER"], 42));
    assert_eq!(schedule.text, "ZMH only: 06:00-07:00 UTC daily");

    // Standard helpers are unaffected by a custom registry.
    assert!(classify("BEER").is_none());
    assert_eq!(compose_schedule(&node(&[], 42)).text, "Schedule unknown");
}

#[test]
fn decoding_from_many_threads() {
    let handles: Vec<_> = (0..8)
        .map(|zone| {
            std::thread::spawn(move || compose_schedule(&node(&["V34"], zone)).source)
        })
        .collect();
    let sources: Vec<ScheduleSource> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(sources[0], ScheduleSource::Unknown);
    assert!(sources[1..=6]
        .iter()
        .all(|s| *s == ScheduleSource::ZoneMailHour));
    assert_eq!(sources[7], ScheduleSource::Unknown);
}
