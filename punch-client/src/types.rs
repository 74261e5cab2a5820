use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Identifier of the employee using the kiosk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId(pub i32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which way a clock action goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockDirection {
    #[default]
    ClockIn,
    ClockOut,
}

/// Time window for a records query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordRange {
    #[default]
    Today,
    LastSevenDays,
}

/// Outcome of a clock action, as assigned by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockReply {
    pub result: String,
    pub time: OffsetDateTime,
}

/// One day of clock history. Times are preformatted by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub date: String,
    pub clock_in: String,
    pub clock_out: String,
}

impl Record {
    pub fn new(
        date: impl Into<String>,
        clock_in: impl Into<String>,
        clock_out: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            clock_in: clock_in.into(),
            clock_out: clock_out.into(),
        }
    }
}
