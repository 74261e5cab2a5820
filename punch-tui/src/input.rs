//! Keyboard handling: held-duration tracking and key-repeat debouncing.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Ticks a key must be held before it starts auto-repeating.
pub const REPEAT_DELAY: u32 = 30;
/// Ticks between auto-repeat activations once the delay has passed.
pub const REPEAT_INTERVAL: u32 = 3;

/// Whether a key held for `duration` ticks activates on this tick.
///
/// Fires on the first tick of a press, then once the key has been held for
/// [`REPEAT_DELAY`] ticks, and every [`REPEAT_INTERVAL`] ticks after that.
pub fn repeating_key_pressed(duration: u32) -> bool {
    if duration == 1 {
        return true;
    }
    duration >= REPEAT_DELAY && (duration - REPEAT_DELAY) % REPEAT_INTERVAL == 0
}

/// The keys the kiosk reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
}

impl Key {
    const ALL: [Key; 5] = [Key::Up, Key::Down, Key::Left, Key::Right, Key::Enter];

    fn index(self) -> usize {
        self as usize
    }

    pub fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Enter => Some(Key::Enter),
            _ => None,
        }
    }
}

/// Snapshot of how long each key has been held, in ticks. Zero means up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keys {
    durations: [u32; 5],
}

impl Keys {
    pub fn none() -> Self {
        Self::default()
    }

    /// Keys pressed on this very tick.
    pub fn pressed(keys: &[Key]) -> Self {
        let mut snapshot = Self::default();
        for key in keys {
            snapshot.durations[key.index()] = 1;
        }
        snapshot
    }

    pub fn held(key: Key, duration: u32) -> Self {
        let mut snapshot = Self::default();
        snapshot.durations[key.index()] = duration;
        snapshot
    }

    pub fn duration(&self, key: Key) -> u32 {
        self.durations[key.index()]
    }

    /// Debounced activation for `key` on this tick.
    pub fn activated(&self, key: Key) -> bool {
        repeating_key_pressed(self.duration(key))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Hold {
    down: bool,
    duration: u32,
    released: bool,
}

/// Turns terminal key events into per-key held durations.
///
/// With release reporting every key is held from press to release. Without
/// it each press counts as a one-tick tap and the terminal's own auto-repeat
/// supplies further presses.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    holds: [Hold; 5],
    reports_release: bool,
}

impl KeyTracker {
    pub fn new(reports_release: bool) -> Self {
        Self {
            holds: [Hold::default(); 5],
            reports_release,
        }
    }

    pub fn handle_event(&mut self, event: KeyEvent) {
        let Some(key) = Key::from_code(event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press => self.press(key),
            KeyEventKind::Repeat => {
                if !self.reports_release {
                    self.press(key);
                }
            }
            KeyEventKind::Release => self.release(key),
        }
    }

    pub fn press(&mut self, key: Key) {
        let hold = &mut self.holds[key.index()];
        if self.reports_release && hold.down && !hold.released {
            return;
        }
        *hold = Hold {
            down: true,
            duration: 0,
            released: !self.reports_release,
        };
    }

    pub fn release(&mut self, key: Key) {
        let hold = &mut self.holds[key.index()];
        if hold.down {
            hold.released = true;
        }
    }

    /// Advance one tick and return the durations for this tick.
    ///
    /// A key released before it was ever observed still counts as held for
    /// this one tick.
    pub fn advance(&mut self) -> Keys {
        let mut snapshot = Keys::default();
        for key in Key::ALL {
            let hold = &mut self.holds[key.index()];
            if !hold.down {
                continue;
            }
            hold.duration = hold.duration.saturating_add(1);
            snapshot.durations[key.index()] = hold.duration;
            if hold.released {
                *hold = Hold::default();
            }
        }
        snapshot
    }
}
