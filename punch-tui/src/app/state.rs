use punch_client::{ClockDirection, ClockReply, Record, RecordRange};

/// Ticks an alert stays on screen.
pub const ALERT_INTERVAL: u32 = 480;
/// Ticks before the kiosk closes itself after a successful clock action.
pub const COUNTDOWN_INTERVAL: u32 = 300;
/// Update/render rate of the main loop.
pub const TICKS_PER_SECOND: u32 = 60;

pub const CONNECT_FAILED_ALERT: &str = "連線異常";
pub const CLOCK_FAILED_ALERT: &str = "打卡失敗";
pub const QUERY_FAILED_ALERT: &str = "查詢失敗";
pub const CONNECTING_STATUS: &str = "連線中";
pub const WAITING_STATUS: &str = "請稍候";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Connecting,
    Loading,
    Select,
    Clock,
    Record,
    Clocking,
    Querying,
    CountDown,
    Result,
}

impl Screen {
    /// Screens that wait on a remote call.
    pub fn is_working(self) -> bool {
        matches!(self, Screen::Loading | Screen::Clocking | Screen::Querying)
    }
}

/// Top-level choice on the select screen when records can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Function {
    #[default]
    Clock,
    Record,
}

/// The options last chosen on each menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub function: Function,
    pub direction: ClockDirection,
    pub range: RecordRange,
}

/// A transient error line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub text: String,
    pub remaining: u32,
}

/// Result of a background call, delivered back to the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Connected,
    ConnectFailed(String),
    Clocked(ClockReply),
    ClockFailed(String),
    Queried(Vec<Record>),
    QueryFailed(String),
}

/// Work the runtime performs on behalf of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Connect,
    SubmitClock(ClockDirection),
    QueryRecords(RecordRange),
    Shutdown,
}
