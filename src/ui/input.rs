/// Input state tracker.
///
/// Answers "which direction key is held right now?", the terminal
/// equivalent of polling the OS key state every tick.
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't
/// support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

use crate::domain::entity::{resolve_pressed, Direction};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::F(1), KeyCode::Char('p'), KeyCode::Char('P')];

/// Anything that can report the currently pressed direction.
pub trait InputSource {
    /// Refresh internal state. Call once per frame.
    fn update(&mut self) {}

    /// Direction currently held, or `None` if no direction key is down.
    fn poll_direction(&mut self) -> Option<Direction>;

    fn pause_pressed(&self) -> bool { false }

    fn quit_pressed(&self) -> bool { false }

    /// Any key or button freshly pressed this frame (used to dismiss the
    /// game-over screen).
    fn acknowledged(&self) -> bool { false }
}

fn keys_for(dir: Direction) -> &'static [KeyCode] {
    match dir {
        Direction::Left => KEYS_LEFT,
        Direction::Right => KEYS_RIGHT,
        Direction::Up => KEYS_UP,
        Direction::Down => KEYS_DOWN,
    }
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        self.expire(Instant::now());
    }

    /// Apply one key event observed at `now`.
    fn record(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Not trusted without enhancement; timeout handles it
            }
            _ => {
                let was_held = self.is_held_at(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active.get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

impl InputSource for InputState {
    fn update(&mut self) {
        self.drain_events();
    }

    fn poll_direction(&mut self) -> Option<Direction> {
        resolve_pressed(|d| {
            let keys = keys_for(d);
            self.any_held(keys) || self.any_pressed(keys)
        })
    }

    fn pause_pressed(&self) -> bool {
        self.any_pressed(KEYS_PAUSE)
    }

    fn quit_pressed(&self) -> bool {
        self.ctrl_c_pressed() || self.any_pressed(&[KeyCode::Esc])
    }

    fn acknowledged(&self) -> bool {
        !self.fresh_presses.is_empty()
    }
}

/// Keyboard and gamepad together: a direction held on either counts, and
/// the usual Left, Right, Up, Down priority applies across both.
pub struct CombinedInput<A, B> {
    pub primary: A,
    pub secondary: B,
}

impl<A: InputSource, B: InputSource> InputSource for CombinedInput<A, B> {
    fn update(&mut self) {
        self.primary.update();
        self.secondary.update();
    }

    fn poll_direction(&mut self) -> Option<Direction> {
        let a = self.primary.poll_direction();
        let b = self.secondary.poll_direction();
        resolve_pressed(|d| a == Some(d) || b == Some(d))
    }

    fn pause_pressed(&self) -> bool {
        self.primary.pause_pressed() || self.secondary.pause_pressed()
    }

    fn quit_pressed(&self) -> bool {
        self.primary.quit_pressed() || self.secondary.quit_pressed()
    }

    fn acknowledged(&self) -> bool {
        self.primary.acknowledged() || self.secondary.acknowledged()
    }
}
