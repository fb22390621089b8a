use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use tracing::trace;

/// A pointer gesture ready for the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    SingleClick { x: i32, y: i32 },
    DoubleClick { x: i32, y: i32 },
    Drag { start: (i32, i32), end: (i32, i32) },
}

#[derive(Debug, Clone, Copy)]
struct PendingClick {
    x: i32,
    y: i32,
    at: Instant,
}

/// Holds back a single click until it is certain no second click follows.
///
/// A click is kept pending for `delay`. A second click on the same cell
/// inside that window cancels it and yields a double click instead; any
/// other click flushes it as a single click.
#[derive(Debug, Clone)]
pub struct ClickDisambiguator {
    /// How long a click waits for a partner
    delay: Duration,
    pending: Option<PendingClick>,
}

impl ClickDisambiguator {
    /// Create a disambiguator with the specified delay in milliseconds
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            pending: None,
        }
    }

    /// Register a click. Returns a gesture that is already decided: either
    /// the double click this completes, or an older click it flushed.
    pub fn register_click(&mut self, x: i32, y: i32, now: Instant) -> Option<PointerEvent> {
        let click = PendingClick { x, y, at: now };
        match self.pending.take() {
            Some(first)
                if first.x == x && first.y == y && now.duration_since(first.at) < self.delay =>
            {
                trace!(target: "input", "double click at ({}, {})", x, y);
                Some(PointerEvent::DoubleClick { x, y })
            }
            Some(first) => {
                self.pending = Some(click);
                Some(PointerEvent::SingleClick {
                    x: first.x,
                    y: first.y,
                })
            }
            None => {
                self.pending = Some(click);
                None
            }
        }
    }

    /// Release the pending click once its window has passed.
    pub fn poll(&mut self, now: Instant) -> Option<PointerEvent> {
        let pending = self.pending?;
        if now.duration_since(pending.at) < self.delay {
            return None;
        }
        self.pending = None;
        Some(PointerEvent::SingleClick {
            x: pending.x,
            y: pending.y,
        })
    }

    /// Release the pending click immediately, whatever its age.
    pub fn flush(&mut self) -> Option<PointerEvent> {
        self.pending
            .take()
            .map(|p| PointerEvent::SingleClick { x: p.x, y: p.y })
    }

    /// Get the time remaining before the pending click fires.
    /// Returns None if no click is pending
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|p| self.delay.saturating_sub(now.duration_since(p.at)))
    }

    /// Cancel any pending click
    pub fn reset(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Turns raw left-button press/release pairs into clicks and drags.
/// Press and release on the same cell is a click; anything else is a drag.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    pressed: Option<(i32, i32)>,
    clicks: ClickDisambiguator,
}

impl PointerTracker {
    pub fn new(double_click_ms: u64) -> Self {
        Self {
            pressed: None,
            clicks: ClickDisambiguator::new(double_click_ms),
        }
    }

    pub fn on_mouse(&mut self, event: &MouseEvent, now: Instant) -> Vec<PointerEvent> {
        let position = (i32::from(event.column), i32::from(event.row));
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed = Some(position);
                Vec::new()
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(start) = self.pressed.take() else {
                    return Vec::new();
                };
                if start == position {
                    return self
                        .clicks
                        .register_click(position.0, position.1, now)
                        .into_iter()
                        .collect();
                }
                let mut events: Vec<PointerEvent> = self.clicks.flush().into_iter().collect();
                events.push(PointerEvent::Drag {
                    start,
                    end: position,
                });
                events
            }
            _ => Vec::new(),
        }
    }

    pub fn poll(&mut self, now: Instant) -> Option<PointerEvent> {
        self.clicks.poll(now)
    }

    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.clicks.time_remaining(now)
    }
}
