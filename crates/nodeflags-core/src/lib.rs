pub mod config;
pub mod error;
pub mod file_request;
pub mod io;
pub mod registry;
pub mod schedule;
pub mod summary;
pub mod time_window;
pub mod types;
pub mod zmh;

pub use error::{FlagError, Result};
pub use file_request::{
    capabilities_for, capabilities_from_flags, known_software_for, FileRequestCapabilities,
};
pub use registry::{classify, has_value, lookup, parser_view, FlagKind, Registry};
pub use schedule::{compose_schedule, NodeScheduleInput, ScheduleDescription, ScheduleSource};
pub use summary::{summarize, FlagSummary};
pub use time_window::{decode_t_flag, TFlag, TimeWindow};
pub use types::{FlagCategory, FlagInfo, ParserFlag};
