//! Kiosk interaction state machine.
//!
//! [`App`] owns everything shown on screen and advances once per tick. It
//! never performs I/O: keys and finished background calls go in, at most one
//! [`Effect`] comes out for the runtime to carry out.

mod state;

pub use state::*;

use punch_client::{ClockDirection, ClockReply, Record, RecordRange};
use time::UtcOffset;

use crate::input::{Key, Keys};
use crate::time_utils::format_timestamp;

#[derive(Debug, Clone)]
pub struct App {
    screen: Screen,
    selection: Selection,
    /// Frame counter driving the loading animation.
    counter: u16,
    countdown: u32,
    alert: Option<Alert>,
    status: Option<String>,
    records: Vec<Record>,
    query_enabled: bool,
    offset: UtcOffset,
}

impl App {
    pub fn new(query_enabled: bool, offset: UtcOffset) -> Self {
        Self {
            screen: Screen::Connecting,
            selection: Selection::default(),
            counter: 0,
            countdown: 0,
            alert: None,
            status: None,
            records: Vec::new(),
            query_enabled,
            offset,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn counter(&self) -> u16 {
        self.counter
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Whole seconds left before the kiosk closes, rounded up.
    pub fn seconds_left(&self) -> u32 {
        self.countdown / TICKS_PER_SECOND + 1
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_ref().map(|a| a.text.as_str())
    }

    pub fn alert_remaining(&self) -> u32 {
        self.alert.as_ref().map_or(0, |a| a.remaining)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn query_enabled(&self) -> bool {
        self.query_enabled
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Advance one tick.
    ///
    /// Ages the alert, reacts to `keys` for the current screen, steps the
    /// counters and finally applies the background results delivered during
    /// this tick.
    pub fn update(
        &mut self,
        keys: &Keys,
        completions: impl IntoIterator<Item = Completion>,
    ) -> Option<Effect> {
        self.age_alert();
        let effect = self.handle_screen(keys);
        self.counter = self.counter.wrapping_add(1);
        self.countdown = self.countdown.saturating_sub(1);
        for completion in completions {
            self.complete(completion);
        }
        effect
    }

    fn age_alert(&mut self) {
        if let Some(alert) = &mut self.alert {
            alert.remaining = alert.remaining.saturating_sub(1);
            if alert.remaining == 0 {
                self.alert = None;
            }
        }
    }

    fn set_alert(&mut self, text: &str) {
        self.alert = Some(Alert {
            text: text.to_string(),
            remaining: ALERT_INTERVAL,
        });
    }

    fn handle_screen(&mut self, keys: &Keys) -> Option<Effect> {
        let confirm = keys.activated(Key::Enter) || keys.activated(Key::Right);
        match self.screen {
            Screen::Connecting => {
                self.screen = Screen::Loading;
                self.status = Some(CONNECTING_STATUS.to_string());
                Some(Effect::Connect)
            }
            Screen::Select => {
                if confirm {
                    return self.confirm_select();
                }
                if keys.activated(Key::Up) {
                    self.choose_first();
                } else if keys.activated(Key::Down) {
                    self.choose_second();
                }
                None
            }
            Screen::Clock => {
                if confirm {
                    return Some(self.start_clock());
                }
                if keys.activated(Key::Left) {
                    self.screen = Screen::Select;
                } else if keys.activated(Key::Up) {
                    self.selection.direction = ClockDirection::ClockIn;
                } else if keys.activated(Key::Down) {
                    self.selection.direction = ClockDirection::ClockOut;
                }
                None
            }
            Screen::Record => {
                if confirm {
                    return Some(self.start_query());
                }
                if keys.activated(Key::Left) {
                    self.screen = Screen::Select;
                } else if keys.activated(Key::Up) {
                    self.selection.range = RecordRange::Today;
                } else if keys.activated(Key::Down) {
                    self.selection.range = RecordRange::LastSevenDays;
                }
                None
            }
            Screen::CountDown => {
                if keys.activated(Key::Enter) || self.countdown == 0 {
                    tracing::info!("shutdown requested");
                    return Some(Effect::Shutdown);
                }
                None
            }
            Screen::Result => {
                if keys.activated(Key::Left) {
                    self.screen = Screen::Record;
                }
                None
            }
            Screen::Loading | Screen::Clocking | Screen::Querying => None,
        }
    }

    fn choose_first(&mut self) {
        if self.query_enabled {
            self.selection.function = Function::Clock;
        } else {
            self.selection.direction = ClockDirection::ClockIn;
        }
    }

    fn choose_second(&mut self) {
        if self.query_enabled {
            self.selection.function = Function::Record;
        } else {
            self.selection.direction = ClockDirection::ClockOut;
        }
    }

    fn confirm_select(&mut self) -> Option<Effect> {
        if !self.query_enabled {
            return Some(self.start_clock());
        }
        self.screen = match self.selection.function {
            Function::Clock => Screen::Clock,
            Function::Record => Screen::Record,
        };
        None
    }

    fn start_clock(&mut self) -> Effect {
        self.screen = Screen::Clocking;
        self.status = Some(WAITING_STATUS.to_string());
        Effect::SubmitClock(self.selection.direction)
    }

    fn start_query(&mut self) -> Effect {
        self.screen = Screen::Querying;
        self.status = Some(WAITING_STATUS.to_string());
        Effect::QueryRecords(self.selection.range)
    }

    /// The menu a failed clock action returns to.
    fn clock_menu(&self) -> Screen {
        if self.query_enabled {
            Screen::Clock
        } else {
            Screen::Select
        }
    }

    fn complete(&mut self, completion: Completion) {
        let expected = match completion {
            Completion::Connected | Completion::ConnectFailed(_) => Screen::Loading,
            Completion::Clocked(_) | Completion::ClockFailed(_) => Screen::Clocking,
            Completion::Queried(_) | Completion::QueryFailed(_) => Screen::Querying,
        };
        if self.screen != expected {
            tracing::warn!(screen = ?self.screen, ?completion, "ignoring stale completion");
            return;
        }

        match completion {
            Completion::Connected => {
                self.selection = Selection::default();
                self.status = None;
                self.screen = Screen::Select;
            }
            Completion::ConnectFailed(reason) => {
                tracing::warn!(%reason, "failed to connect");
                self.set_alert(CONNECT_FAILED_ALERT);
                self.screen = Screen::Connecting;
            }
            Completion::Clocked(reply) => self.show_clock_reply(reply),
            Completion::ClockFailed(reason) => {
                tracing::warn!(%reason, "failed to clock in/out");
                self.set_alert(CLOCK_FAILED_ALERT);
                self.screen = self.clock_menu();
            }
            Completion::Queried(records) => {
                self.records = records;
                self.status = None;
                self.screen = Screen::Result;
            }
            Completion::QueryFailed(reason) => {
                tracing::warn!(%reason, "failed to query records");
                self.set_alert(QUERY_FAILED_ALERT);
                self.screen = Screen::Record;
            }
        }
    }

    fn show_clock_reply(&mut self, reply: ClockReply) {
        self.status = Some(format!(
            "{} {}",
            reply.result,
            format_timestamp(reply.time, self.offset)
        ));
        self.countdown = COUNTDOWN_INTERVAL;
        self.screen = Screen::CountDown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    fn tick(app: &mut App) -> Option<Effect> {
        app.update(&Keys::none(), [])
    }

    fn press(app: &mut App, key: Key) -> Option<Effect> {
        app.update(&Keys::pressed(&[key]), [])
    }

    fn deliver(app: &mut App, completion: Completion) -> Option<Effect> {
        app.update(&Keys::none(), [completion])
    }

    fn connected(query_enabled: bool) -> App {
        let mut app = App::new(query_enabled, UtcOffset::UTC);
        assert_eq!(tick(&mut app), Some(Effect::Connect));
        deliver(&mut app, Completion::Connected);
        assert_eq!(app.screen(), Screen::Select);
        app
    }

    fn clocked_reply() -> ClockReply {
        ClockReply {
            result: "上班打卡成功".to_string(),
            time: datetime!(2024-01-01 01:00:00 UTC),
        }
    }

    #[test]
    fn starts_connecting_and_issues_one_connect() {
        let mut app = App::new(true, UtcOffset::UTC);
        assert_eq!(app.screen(), Screen::Connecting);

        assert_eq!(tick(&mut app), Some(Effect::Connect));
        assert_eq!(app.screen(), Screen::Loading);
        assert_eq!(app.status(), Some(CONNECTING_STATUS));

        for _ in 0..100 {
            assert_eq!(tick(&mut app), None);
        }
    }

    #[test]
    fn connect_failure_alerts_and_retries_once() {
        let mut app = App::new(true, UtcOffset::UTC);
        tick(&mut app);

        deliver(&mut app, Completion::ConnectFailed("deadline exceeded".into()));
        assert_eq!(app.alert(), Some("連線異常"));
        assert_eq!(app.screen(), Screen::Connecting);

        assert_eq!(tick(&mut app), Some(Effect::Connect));
        assert_eq!(app.screen(), Screen::Loading);
        for _ in 0..10 {
            assert_eq!(tick(&mut app), None);
        }
        assert_eq!(app.alert(), Some("連線異常"));
    }

    #[test]
    fn connect_success_preselects_defaults() {
        let app = connected(true);
        assert_eq!(app.selection(), Selection::default());
        assert_eq!(app.selection().function, Function::Clock);
        assert_eq!(app.status(), None);
    }

    #[test]
    fn alert_visible_for_exactly_alert_interval_ticks() {
        let mut app = connected(false);
        assert_eq!(press(&mut app, Key::Enter), Some(Effect::SubmitClock(ClockDirection::ClockIn)));
        deliver(&mut app, Completion::ClockFailed("unavailable".into()));
        assert_eq!(app.screen(), Screen::Select);
        assert_eq!(app.alert(), Some("打卡失敗"));

        for _ in 0..ALERT_INTERVAL - 1 {
            tick(&mut app);
            assert_eq!(app.alert(), Some("打卡失敗"));
        }
        tick(&mut app);
        assert_eq!(app.alert(), None);
        assert_eq!(app.alert_remaining(), 0);
    }

    #[test]
    fn reduced_configuration_toggles_directions() {
        let mut app = connected(false);
        press(&mut app, Key::Down);
        assert_eq!(app.selection().direction, ClockDirection::ClockOut);
        press(&mut app, Key::Up);
        assert_eq!(app.selection().direction, ClockDirection::ClockIn);
        press(&mut app, Key::Down);

        assert_eq!(
            press(&mut app, Key::Right),
            Some(Effect::SubmitClock(ClockDirection::ClockOut))
        );
        assert_eq!(app.screen(), Screen::Clocking);
        assert_eq!(app.status(), Some(WAITING_STATUS));
    }

    #[test]
    fn no_second_call_while_working() {
        let mut app = connected(true);
        press(&mut app, Key::Enter);
        assert_eq!(app.screen(), Screen::Clock);
        assert!(matches!(press(&mut app, Key::Enter), Some(Effect::SubmitClock(_))));

        for duration in 1..120 {
            let keys = Keys::held(Key::Enter, duration);
            assert_eq!(app.update(&keys, []), None);
            assert_eq!(app.screen(), Screen::Clocking);
        }
        for key in [Key::Up, Key::Down, Key::Left, Key::Right] {
            assert_eq!(press(&mut app, key), None);
        }
    }

    #[test]
    fn clock_success_counts_down_with_formatted_message() {
        let mut app = connected(false);
        press(&mut app, Key::Enter);
        deliver(&mut app, Completion::Clocked(clocked_reply()));

        assert_eq!(app.screen(), Screen::CountDown);
        assert_eq!(app.countdown(), COUNTDOWN_INTERVAL);
        assert_eq!(app.status(), Some("上班打卡成功 2024/01/01 01:00:00"));
        assert_eq!(app.seconds_left(), 6);
    }

    #[test]
    fn clock_message_uses_local_offset() {
        let mut app = App::new(false, offset!(+8));
        tick(&mut app);
        deliver(&mut app, Completion::Connected);
        press(&mut app, Key::Enter);
        deliver(&mut app, Completion::Clocked(clocked_reply()));
        assert_eq!(app.status(), Some("上班打卡成功 2024/01/01 09:00:00"));
    }

    #[test]
    fn countdown_shuts_down_exactly_at_zero() {
        let mut app = connected(false);
        press(&mut app, Key::Enter);
        deliver(&mut app, Completion::Clocked(clocked_reply()));

        for _ in 0..COUNTDOWN_INTERVAL {
            assert_eq!(tick(&mut app), None);
            assert_eq!(app.seconds_left(), app.countdown() / 60 + 1);
        }
        assert_eq!(app.countdown(), 0);
        assert_eq!(app.seconds_left(), 1);
        assert_eq!(tick(&mut app), Some(Effect::Shutdown));
    }

    #[test]
    fn countdown_seconds_round_up() {
        let mut app = connected(false);
        press(&mut app, Key::Enter);
        deliver(&mut app, Completion::Clocked(clocked_reply()));
        for _ in 0..61 {
            tick(&mut app);
        }
        assert_eq!(app.countdown(), 239);
        assert_eq!(app.seconds_left(), 4);
    }

    #[test]
    fn enter_closes_countdown_early() {
        let mut app = connected(false);
        press(&mut app, Key::Enter);
        deliver(&mut app, Completion::Clocked(clocked_reply()));
        tick(&mut app);
        assert_eq!(press(&mut app, Key::Enter), Some(Effect::Shutdown));
    }

    #[test]
    fn countdown_never_underflows() {
        let mut app = connected(true);
        for _ in 0..10 {
            tick(&mut app);
        }
        assert_eq!(app.countdown(), 0);
    }

    /// The range screen sits between Select and Querying, so the query takes
    /// Down, Enter, Enter.
    #[test]
    fn query_round_trip_lands_on_result() {
        let mut app = connected(true);
        press(&mut app, Key::Down);
        assert_eq!(app.selection().function, Function::Record);
        assert_eq!(press(&mut app, Key::Enter), None);
        assert_eq!(app.screen(), Screen::Record);

        assert_eq!(
            press(&mut app, Key::Enter),
            Some(Effect::QueryRecords(RecordRange::Today))
        );
        assert_eq!(app.screen(), Screen::Querying);

        let records = vec![Record::new("2024/01/01", "09:00", "18:00")];
        deliver(&mut app, Completion::Queried(records.clone()));
        assert_eq!(app.screen(), Screen::Result);
        assert_eq!(app.records(), records.as_slice());

        press(&mut app, Key::Left);
        assert_eq!(app.screen(), Screen::Record);
        press(&mut app, Key::Left);
        assert_eq!(app.screen(), Screen::Select);
    }

    #[test]
    fn query_replaces_previous_records() {
        let mut app = connected(true);
        press(&mut app, Key::Down);
        press(&mut app, Key::Enter);
        press(&mut app, Key::Enter);
        deliver(
            &mut app,
            Completion::Queried(vec![Record::new("2024/01/01", "09:00", "18:00")]),
        );
        press(&mut app, Key::Left);
        press(&mut app, Key::Down);
        assert_eq!(
            press(&mut app, Key::Enter),
            Some(Effect::QueryRecords(RecordRange::LastSevenDays))
        );
        deliver(&mut app, Completion::Queried(vec![]));
        assert!(app.records().is_empty());
    }

    #[test]
    fn query_failure_returns_to_record_menu() {
        let mut app = connected(true);
        press(&mut app, Key::Down);
        press(&mut app, Key::Enter);
        press(&mut app, Key::Enter);
        deliver(&mut app, Completion::QueryFailed("timeout".into()));
        assert_eq!(app.screen(), Screen::Record);
        assert_eq!(app.alert(), Some("查詢失敗"));
    }

    #[test]
    fn clock_failure_returns_to_clock_menu_when_query_enabled() {
        let mut app = connected(true);
        press(&mut app, Key::Enter);
        press(&mut app, Key::Down);
        assert_eq!(
            press(&mut app, Key::Enter),
            Some(Effect::SubmitClock(ClockDirection::ClockOut))
        );
        deliver(&mut app, Completion::ClockFailed("unavailable".into()));
        assert_eq!(app.screen(), Screen::Clock);
        assert_eq!(app.selection().direction, ClockDirection::ClockOut);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut app = connected(true);
        deliver(&mut app, Completion::Queried(vec![Record::new("a", "b", "c")]));
        assert_eq!(app.screen(), Screen::Select);
        assert!(app.records().is_empty());
    }

    #[test]
    fn held_navigation_key_auto_repeats() {
        let mut app = connected(true);
        press(&mut app, Key::Enter);
        assert_eq!(app.screen(), Screen::Clock);

        // Held Left: fires on the first tick only until the repeat delay.
        app.update(&Keys::held(Key::Left, 2), []);
        assert_eq!(app.screen(), Screen::Clock);
        app.update(&Keys::held(Key::Left, 30), []);
        assert_eq!(app.screen(), Screen::Select);
    }

    #[test]
    fn clock_reply_at_end_of_time_does_not_panic() {
        let mut app = App::new(false, offset!(+8));
        tick(&mut app);
        deliver(&mut app, Completion::Connected);
        press(&mut app, Key::Enter);
        deliver(
            &mut app,
            Completion::Clocked(ClockReply {
                result: "上班打卡成功".to_string(),
                time: datetime!(9999-12-31 23:00:00 UTC),
            }),
        );
        assert_eq!(app.screen(), Screen::CountDown);
        assert_eq!(app.status(), Some("上班打卡成功 9999/12/31 23:00:00"));
    }

    #[test]
    fn counter_wraps() {
        let mut app = connected(true);
        for _ in 0..u16::MAX as u32 + 10 {
            tick(&mut app);
        }
        assert!(app.counter() < 20);
    }
}
