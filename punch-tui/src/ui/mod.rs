use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    Frame,
};

pub mod scene;

pub use scene::{render, DrawOp, Scene, Tone};

/// Logical pixels per terminal column.
pub const CELL_WIDTH: i32 = 6;
/// Logical pixels per terminal row.
pub const CELL_HEIGHT: i32 = scene::ROW;

const CHECKED_MARKER: &str = "◉";
const UNCHECKED_MARKER: &str = "○";

pub fn draw(frame: &mut Frame, scene: &Scene) {
    let area = frame.area();
    paint(frame.buffer_mut(), area, scene);
}

/// Paint `scene` into `buf`, mapping canvas pixels to cells inside `area`.
///
/// Anything that falls outside `area` is dropped.
pub fn paint(buf: &mut Buffer, area: Rect, scene: &Scene) {
    for op in &scene.ops {
        match op {
            DrawOp::Text { x, y, text, tone } => {
                put(buf, area, *x, *y, text, tone_style(*tone));
            }
            DrawOp::Marker { x, y, checked } => {
                let (symbol, style) = if *checked {
                    (CHECKED_MARKER, Style::default().fg(Color::Green))
                } else {
                    (UNCHECKED_MARKER, Style::default().fg(Color::DarkGray))
                };
                put(buf, area, *x, *y, symbol, style);
            }
        }
    }
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Normal => Style::default().fg(Color::White),
        Tone::Alert => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Tone::Hint => Style::default().fg(Color::DarkGray),
    }
}

fn put(buf: &mut Buffer, area: Rect, x: i32, y: i32, text: &str, style: Style) {
    let column = x / CELL_WIDTH;
    let row = y / CELL_HEIGHT;
    if column < 0 || row < 0 || column >= i32::from(area.width) || row >= i32::from(area.height) {
        return;
    }
    let (column, row) = (column as u16, row as u16);
    let max_width = usize::from(area.width - column);
    buf.set_stringn(area.x + column, area.y + row, text, max_width, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{App, Completion};
    use crate::input::Keys;
    use time::macros::datetime;
    use time::UtcOffset;

    fn row_string(buf: &Buffer, row: u16) -> String {
        let area = buf.area;
        (0..area.width)
            .map(|x| buf[(x, row)].symbol().to_string())
            .collect::<String>()
    }

    #[test]
    fn select_screen_maps_onto_cells() {
        let mut app = App::new(false, UtcOffset::UTC);
        app.update(&Keys::none(), []);
        app.update(&Keys::none(), [Completion::Connected]);
        let scene = render(&app, datetime!(2024-01-01 08:30:00 UTC));

        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        paint(&mut buf, area, &scene);

        assert!(row_string(&buf, 1).contains("2024/01/01 08:30:00"));
        // Wide glyphs leave a blank continuation cell behind them.
        assert!(row_string(&buf, 5).replace(' ', "").contains("請選擇"));
        assert!(row_string(&buf, 7).contains(CHECKED_MARKER));
        assert!(row_string(&buf, 8).contains(UNCHECKED_MARKER));
        assert!(scene.texts().contains(&"上班打卡"));
    }

    #[test]
    fn ops_outside_area_are_dropped() {
        let scene = Scene {
            ops: vec![
                DrawOp::Text {
                    x: 0,
                    y: 240,
                    text: "off screen".to_string(),
                    tone: Tone::Normal,
                },
                DrawOp::Text {
                    x: 6,
                    y: 0,
                    text: "clipped text".to_string(),
                    tone: Tone::Normal,
                },
            ],
        };
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        paint(&mut buf, area, &scene);

        assert_eq!(row_string(&buf, 0), " clip");
        assert_eq!(row_string(&buf, 2).trim(), "");
    }
}
