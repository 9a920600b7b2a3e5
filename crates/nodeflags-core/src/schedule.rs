use crate::registry::{FlagKind, Registry};
use crate::time_window::{TFlag, TimeWindow};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CONTINUOUS_MAIL_FLAG: &str = "CM";

pub const CONTINUOUS_MAIL_TEXT: &str = "Continuous Mail — available 24/7";
pub const UNKNOWN_TEXT: &str = "Schedule unknown";

// ---------------------------------------------------------------------------
// NodeScheduleInput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeScheduleInput {
    pub flags: Vec<String>,
    pub zone: u16,
    /// Accepted for callers' convenience; not used when composing.
    pub phone: String,
    pub is_continuous_mail: bool,
}

impl NodeScheduleInput {
    /// Build an input with `is_continuous_mail` taken from a literal `CM` flag.
    pub fn from_flags<S: AsRef<str>>(flags: &[S], zone: u16, phone: impl Into<String>) -> Self {
        let flags: Vec<String> = flags.iter().map(|f| f.as_ref().to_string()).collect();
        let is_continuous_mail = flags.iter().any(|f| f == CONTINUOUS_MAIL_FLAG);
        Self {
            flags,
            zone,
            phone: phone.into(),
            is_continuous_mail,
        }
    }
}

// ---------------------------------------------------------------------------
// ScheduleDescription (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSource {
    ContinuousMail,
    TimeWindows,
    ZoneMailHour,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDescription {
    pub source: ScheduleSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub windows: Vec<TimeWindow>,
    pub text: String,
}

impl fmt::Display for ScheduleDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

pub struct EvalContext<'a> {
    pub input: &'a NodeScheduleInput,
    pub registry: &'a Registry,
}

/// Evaluated in order; the first rule that resolves decides the schedule.
pub struct ScheduleRule {
    pub id: &'static str,
    pub source: ScheduleSource,
    pub resolve: fn(&EvalContext) -> Option<Vec<TimeWindow>>,
}

fn continuous_mail(ctx: &EvalContext) -> Option<Vec<TimeWindow>> {
    ctx.input.is_continuous_mail.then(Vec::new)
}

fn explicit_windows(ctx: &EvalContext) -> Option<Vec<TimeWindow>> {
    let mut windows = Vec::new();
    for token in &ctx.input.flags {
        match ctx.registry.lookup(token) {
            FlagKind::TimeWindow(TFlag::Window(w)) => windows.push(w),
            FlagKind::TimeWindow(TFlag::Unrecognized { letter }) => {
                tracing::debug!(%token, %letter, "ignoring T-flag with unknown time letter");
            }
            _ => {}
        }
    }
    (!windows.is_empty()).then_some(windows)
}

fn zone_mail_hour(ctx: &EvalContext) -> Option<Vec<TimeWindow>> {
    ctx.registry.zone_mail_hour(ctx.input.zone).map(|w| vec![w])
}

pub static DEFAULT_RULES: [ScheduleRule; 3] = [
    ScheduleRule {
        id: "continuous_mail",
        source: ScheduleSource::ContinuousMail,
        resolve: continuous_mail,
    },
    ScheduleRule {
        id: "explicit_windows",
        source: ScheduleSource::TimeWindows,
        resolve: explicit_windows,
    },
    ScheduleRule {
        id: "zone_mail_hour",
        source: ScheduleSource::ZoneMailHour,
        resolve: zone_mail_hour,
    },
];

fn render(source: ScheduleSource, windows: &[TimeWindow]) -> String {
    match source {
        ScheduleSource::ContinuousMail => CONTINUOUS_MAIL_TEXT.to_string(),
        ScheduleSource::TimeWindows => windows
            .iter()
            .map(TimeWindow::describe)
            .collect::<Vec<_>>()
            .join("\n"),
        ScheduleSource::ZoneMailHour => match windows.first() {
            Some(w) => format!("ZMH only: {} UTC daily", w),
            None => UNKNOWN_TEXT.to_string(),
        },
        ScheduleSource::Unknown => UNKNOWN_TEXT.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

pub struct ScheduleComposer<'a> {
    registry: &'a Registry,
    rules: &'static [ScheduleRule],
}

impl<'a> ScheduleComposer<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            rules: &DEFAULT_RULES,
        }
    }

    pub fn compose(&self, input: &NodeScheduleInput) -> ScheduleDescription {
        let ctx = EvalContext {
            input,
            registry: self.registry,
        };
        for rule in self.rules {
            if let Some(windows) = (rule.resolve)(&ctx) {
                tracing::trace!(rule = rule.id, zone = input.zone, "schedule rule matched");
                return ScheduleDescription {
                    source: rule.source,
                    text: render(rule.source, &windows),
                    windows,
                };
            }
        }

        tracing::trace!(zone = input.zone, "no schedule source for node");
        ScheduleDescription {
            source: ScheduleSource::Unknown,
            windows: Vec::new(),
            text: UNKNOWN_TEXT.to_string(),
        }
    }
}

/// Compose against the standard registry.
pub fn compose_schedule(input: &NodeScheduleInput) -> ScheduleDescription {
    ScheduleComposer::new(Registry::standard()).compose(input)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
