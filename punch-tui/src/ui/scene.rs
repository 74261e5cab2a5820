//! Pure mapping from [`App`] state to draw primitives on the kiosk canvas.

use punch_client::{ClockDirection, RecordRange};
use time::OffsetDateTime;

use crate::app::{App, Function, Screen};
use crate::time_utils::format_timestamp;

pub const SCREEN_WIDTH: i32 = 480;
pub const SCREEN_HEIGHT: i32 = 270;
pub const PADDING: i32 = 18;
pub const ROW: i32 = 24;
/// Offset of option labels from their marker.
const LABEL_INDENT: i32 = 20;
const DATE_COLUMN: i32 = PADDING;
const IN_COLUMN: i32 = PADDING + 160;
const OUT_COLUMN: i32 = PADDING + 280;
const FIRST_RECORD_ROW: i32 = 4;
/// Records that fit under the header on the canvas.
pub const MAX_RECORD_ROWS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Alert,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    /// Text whose baseline sits at `y`.
    Text {
        x: i32,
        y: i32,
        text: String,
        tone: Tone,
    },
    /// A selection marker with its top edge at `y`.
    Marker { x: i32, y: i32, checked: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    pub ops: Vec<DrawOp>,
}

impl Scene {
    fn text(&mut self, x: i32, y: i32, text: impl Into<String>, tone: Tone) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.into(),
            tone,
        });
    }

    fn label(&mut self, row: i32, text: impl Into<String>) {
        self.text(PADDING, PADDING + ROW * row, text, Tone::Normal);
    }

    /// Two options on rows 7 and 8 with the marker on the chosen one.
    fn options(&mut self, first: &str, second: &str, first_chosen: bool) {
        self.ops.push(DrawOp::Marker {
            x: PADDING,
            y: ROW * 7 + 2,
            checked: first_chosen,
        });
        self.ops.push(DrawOp::Marker {
            x: PADDING,
            y: ROW * 8 + 2,
            checked: !first_chosen,
        });
        self.text(PADDING + LABEL_INDENT, PADDING + ROW * 7, first, Tone::Normal);
        self.text(PADDING + LABEL_INDENT, PADDING + ROW * 8, second, Tone::Normal);
    }

    fn back_hint(&mut self, row: i32) {
        self.text(PADDING, PADDING + ROW * row, "<←> 返回", Tone::Hint);
    }

    /// All text in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Marker { .. } => None,
            })
            .collect()
    }

    /// Text drawn on the given layout row.
    pub fn row_texts(&self, row: i32) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { y, text, .. } if *y == PADDING + ROW * row => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Rows (by marker top edge) of checked markers.
    pub fn checked_marker_rows(&self) -> Vec<i32> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Marker { y, checked: true, .. } => Some(y / ROW),
                _ => None,
            })
            .collect()
    }
}

/// Loading ellipsis: up to five dots cycling every 180 ticks.
pub fn ellipsis(counter: u16) -> String {
    ".".repeat(usize::from(counter % 180 / 30))
}

pub fn render(app: &App, now: OffsetDateTime) -> Scene {
    let mut scene = Scene::default();

    scene.label(1, format!("現在時間: {}", format_timestamp(now, app.offset())));
    if let Some(alert) = app.alert() {
        scene.text(PADDING, PADDING + ROW * 2, alert, Tone::Alert);
    }

    let selection = app.selection();
    match app.screen() {
        Screen::Select if app.query_enabled() => {
            scene.label(5, "請選擇功能:");
            scene.options("打卡", "查詢打卡紀錄", selection.function == Function::Clock);
        }
        Screen::Select => {
            scene.label(5, "請選擇:");
            scene.options(
                "上班打卡",
                "下班打卡",
                selection.direction == ClockDirection::ClockIn,
            );
        }
        Screen::Clock => {
            scene.label(5, "請選擇:");
            scene.options(
                "上班打卡",
                "下班打卡",
                selection.direction == ClockDirection::ClockIn,
            );
            scene.back_hint(10);
        }
        Screen::Record => {
            scene.label(5, "請選擇查詢範圍:");
            scene.options("今日", "最近七日", selection.range == RecordRange::Today);
            scene.back_hint(10);
        }
        Screen::Loading | Screen::Clocking | Screen::Querying => {
            let status = app.status().unwrap_or_default();
            scene.label(5, format!("{}{}", status, ellipsis(app.counter())));
        }
        Screen::CountDown => {
            scene.label(5, app.status().unwrap_or_default());
            scene.label(
                7,
                format!(
                    "將於 {} 秒後自動關閉或按<Enter>直接關閉",
                    app.seconds_left()
                ),
            );
        }
        Screen::Result => render_records(&mut scene, app),
        Screen::Connecting => {}
    }

    scene
}

fn render_records(scene: &mut Scene, app: &App) {
    let header_y = PADDING + ROW * (FIRST_RECORD_ROW - 1);
    scene.text(DATE_COLUMN, header_y, "日期", Tone::Normal);
    scene.text(IN_COLUMN, header_y, "上班", Tone::Normal);
    scene.text(OUT_COLUMN, header_y, "下班", Tone::Normal);
    scene.text(SCREEN_WIDTH - 100, header_y, "<←> 返回", Tone::Hint);

    for (i, record) in app.records().iter().take(MAX_RECORD_ROWS).enumerate() {
        let y = PADDING + ROW * (FIRST_RECORD_ROW + i as i32);
        scene.text(DATE_COLUMN, y, record.date.as_str(), Tone::Normal);
        scene.text(IN_COLUMN, y, record.clock_in.as_str(), Tone::Normal);
        scene.text(OUT_COLUMN, y, record.clock_out.as_str(), Tone::Normal);
    }
}
