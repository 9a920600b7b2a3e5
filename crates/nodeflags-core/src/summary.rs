use crate::file_request::{capabilities_from_flags, FileRequestCapabilities};
use crate::registry::{FlagKind, Registry};
use crate::time_window::{TFlag, TimeWindow};
use crate::types::FlagCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every token on one node, sorted into categories. Tokens keep their
/// inline value (`IBN:24555`) and their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSummary {
    pub by_category: BTreeMap<FlagCategory, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_windows: Vec<TimeWindow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unrecognized: Vec<String>,
    pub file_requests: FileRequestCapabilities,
}

impl FlagSummary {
    pub fn tokens_in(&self, category: FlagCategory) -> &[String] {
        self.by_category
            .get(&category)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

impl Registry {
    pub fn summarize<S: AsRef<str>>(&self, flags: &[S]) -> FlagSummary {
        let mut summary = FlagSummary {
            file_requests: capabilities_from_flags(flags),
            ..FlagSummary::default()
        };

        for flag in flags {
            let token: &str = flag.as_ref();
            match self.lookup(token) {
                FlagKind::Static(info) => summary
                    .by_category
                    .entry(info.category)
                    .or_default()
                    .push(token.to_string()),
                FlagKind::TimeWindow(TFlag::Window(window)) => {
                    summary
                        .by_category
                        .entry(FlagCategory::Schedule)
                        .or_default()
                        .push(token.to_string());
                    summary.time_windows.push(window);
                }
                FlagKind::TimeWindow(_) | FlagKind::Unrecognized => {
                    tracing::debug!(%token, "unrecognized nodelist flag");
                    summary.unrecognized.push(token.to_string());
                }
            }
        }

        summary
    }
}

pub fn summarize<S: AsRef<str>>(flags: &[S]) -> FlagSummary {
    Registry::standard().summarize(flags)
}
