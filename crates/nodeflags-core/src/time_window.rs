use crate::error::{FlagError, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minute-of-day that `Y`, `Z`, `y` and `z` all decode to.
pub const END_OF_DAY_MINUTES: u16 = 23 * 60 + 59;

// ---------------------------------------------------------------------------
// Time letters
// ---------------------------------------------------------------------------

/// Upper-case `A`..`X` cover 00:00..11:30 and lower-case `a`..`x` cover
/// 12:00..23:30, one half hour per letter. `Y`/`Z`/`y`/`z` are the legacy
/// end-of-day letters.
pub fn letter_minutes(letter: char) -> Option<u16> {
    match letter {
        'A'..='X' => Some((letter as u16 - 'A' as u16) * 30),
        'a'..='x' => Some(12 * 60 + (letter as u16 - 'a' as u16) * 30),
        'Y' | 'Z' | 'y' | 'z' => Some(END_OF_DAY_MINUTES),
        _ => None,
    }
}

pub fn letter_time(letter: char) -> Option<NaiveTime> {
    letter_minutes(letter).and_then(time_from_minutes)
}

fn time_from_minutes(minutes: u16) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(u32::from(minutes / 60), u32::from(minutes % 60), 0)
}

fn minutes_of(time: NaiveTime) -> u16 {
    (time.hour() * 60 + time.minute()) as u16
}

/// `HH:MM` parser used by config files.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| FlagError::InvalidTime(s.to_string()))
}

// ---------------------------------------------------------------------------
// TimeWindow
// ---------------------------------------------------------------------------

/// A daily UTC availability window. `end_utc` earlier than `start_utc` means
/// the window runs past midnight into the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_utc: NaiveTime,
    pub end_utc: NaiveTime,
}

impl TimeWindow {
    pub fn new(start_utc: NaiveTime, end_utc: NaiveTime) -> Self {
        Self { start_utc, end_utc }
    }

    /// Build a window from two time letters, e.g. `('J', 'L')`.
    pub fn from_letters(start: char, end: char) -> Option<Self> {
        Some(Self::new(letter_time(start)?, letter_time(end)?))
    }

    pub fn wraps_midnight(&self) -> bool {
        self.end_utc < self.start_utc
    }

    /// Linear `[start, end)` minute-of-day ranges covered by this window.
    pub fn segments(&self) -> Vec<(u16, u16)> {
        let start = minutes_of(self.start_utc);
        let end = minutes_of(self.end_utc);
        if self.wraps_midnight() {
            let mut out = vec![(start, MINUTES_PER_DAY)];
            if end > 0 {
                out.push((0, end));
            }
            out
        } else {
            vec![(start, end)]
        }
    }

    pub fn duration_minutes(&self) -> u16 {
        self.segments().iter().map(|(s, e)| e - s).sum()
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        let m = minutes_of(time);
        self.segments().iter().any(|&(s, e)| m >= s && m < e)
    }

    /// `"Available 09:00-10:00 UTC"`
    pub fn describe(&self) -> String {
        format!("Available {} UTC", self)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start_utc.format("%H:%M"),
            self.end_utc.format("%H:%M")
        )
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = FlagError;

    /// Parses a `Txy` token.
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let (Some('T'), Some(start), Some(end), None) =
            (chars.next(), chars.next(), chars.next(), chars.next())
        else {
            return Err(FlagError::NotTFlag(s.to_string()));
        };
        for letter in [start, end] {
            if letter_minutes(letter).is_none() {
                return Err(FlagError::UnknownTimeLetter {
                    token: s.to_string(),
                    letter,
                });
            }
        }
        Self::from_letters(start, end).ok_or_else(|| FlagError::NotTFlag(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// T-flag decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TFlag {
    /// Not shaped like `Txy`; route to another decoder.
    NotApplicable,
    /// Shaped like `Txy` but a letter is outside the time-letter table.
    Unrecognized { letter: char },
    Window(TimeWindow),
}

impl TFlag {
    pub fn window(&self) -> Option<TimeWindow> {
        match self {
            TFlag::Window(w) => Some(*w),
            _ => None,
        }
    }
}

pub fn decode_t_flag(token: &str) -> TFlag {
    match token.parse::<TimeWindow>() {
        Ok(window) => TFlag::Window(window),
        Err(FlagError::UnknownTimeLetter { letter, .. }) => TFlag::Unrecognized { letter },
        Err(_) => TFlag::NotApplicable,
    }
}

pub fn is_t_flag_shape(token: &str) -> bool {
    !matches!(decode_t_flag(token), TFlag::NotApplicable)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
