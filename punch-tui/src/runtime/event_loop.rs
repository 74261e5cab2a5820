use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use punch_client::Connector;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::MissedTickBehavior;

use crate::app::TICKS_PER_SECOND;
use crate::error::KioskError;
use crate::input::KeyTracker;
use crate::ui;

use super::driver::Driver;

/// Drive `driver` at a fixed tick rate until it asks to stop.
///
/// Only ever returns an error; [`KioskError::Terminated`] marks a requested
/// shutdown.
pub async fn run_app<C: Connector>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    driver: &mut Driver<C>,
    reports_release: bool,
) -> Result<(), KioskError> {
    let mut keys = KeyTracker::new(reports_release);
    let mut ticker =
        tokio::time::interval(Duration::from_secs(1) / TICKS_PER_SECOND);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if is_interrupt(&key) {
                    tracing::info!("interrupted");
                    return Err(KioskError::Terminated);
                }
                keys.handle_event(key);
            }
        }

        driver.step(&keys.advance())?;

        let scene = ui::render(driver.app(), OffsetDateTime::now_utc());
        terminal.draw(|f| ui::draw(f, &scene))?;
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}
