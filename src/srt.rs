use crate::error::SubvoxError;
use crate::parser;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A subtitle timestamp in `HH:MM:SS,mmm` form.
///
/// Parsing is lenient about padding (`1:2:3,4` is accepted), but the value is
/// always rendered back in the canonical zero-padded form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub fn from_millis(millis: u64) -> Self {
        Timestamp(Duration::from_millis(millis))
    }

    pub fn as_millis(&self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl From<Duration> for Timestamp {
    fn from(duration: Duration) -> Self {
        // Sub-millisecond precision has no representation in the format.
        Timestamp::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

impl FromStr for Timestamp {
    type Err = SubvoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_timestamp(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        let millis = self.0.as_millis() % 1000;
        write!(f, "{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

/// One caption entry of an SRT document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    /// Sequence number exactly as it appeared in the source.
    pub index: u32,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Caption lines joined by `\n`. May be empty.
    pub text: String,
}

impl SubtitleBlock {
    pub fn new(
        index: u32,
        start_time: Timestamp,
        end_time: Timestamp,
        text: impl Into<String>,
    ) -> Self {
        Self {
            index,
            start_time,
            end_time,
            text: text.into(),
        }
    }

    /// Returns a copy of this block carrying different caption text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{} --> {}\n{}",
            self.index, self.start_time, self.end_time, self.text
        )
    }
}
