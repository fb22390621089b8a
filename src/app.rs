use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame as TerminalFrame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::Config;
use crate::input::{KeyAction, KeyMapper, PointerEvent, PointerTracker};
use crate::manager::TableManager;
use crate::utils::logging::LogRingBuffer;
use crate::window::ViewManager;

/// The terminal host: decodes crossterm events, feeds them to the window
/// manager and repaints when something changed.
pub struct TablrApp {
    manager: ViewManager,
    pointer: PointerTracker,
    keys: KeyMapper,
    logs: LogRingBuffer,
    tick: Duration,
    should_quit: bool,
    dirty: bool,
}

impl TablrApp {
    pub fn new(config: &Config, logs: LogRingBuffer) -> Self {
        let mut manager = ViewManager::new(TableManager::new(), config.frames.clone());
        manager.open_default_view();
        Self {
            manager,
            pointer: PointerTracker::new(config.input.double_click_ms),
            keys: KeyMapper::new(config.input.tab_as_ctrl_enter),
            logs,
            tick: Duration::from_millis(config.input.tick_ms.max(1)),
            should_quit: false,
            dirty: true,
        }
    }

    pub fn manager(&self) -> &ViewManager {
        &self.manager
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let Some(action) = self.keys.map(&key) else {
            return;
        };
        match action {
            KeyAction::View(input) => {
                self.dirty |= self.manager.handle_key(input);
            }
            KeyAction::NewWindow => {
                self.dirty |= self.manager.handle_new_window();
            }
            KeyAction::Quit => {
                info!(target: "tablr", "quit requested");
                self.should_quit = true;
            }
        }
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, now: Instant) {
        for pointer in self.pointer.on_mouse(&mouse, now) {
            self.handle_pointer(pointer);
        }
    }

    pub fn handle_pointer(&mut self, pointer: PointerEvent) {
        debug!(target: "input", "{:?}", pointer);
        let changed = match pointer {
            PointerEvent::SingleClick { x, y } => self.manager.handle_single_click(x, y),
            PointerEvent::DoubleClick { x, y } => self.manager.handle_double_click(x, y),
            PointerEvent::Drag { start, end } => {
                self.manager.handle_mouse_drag(start.0, start.1, end.0, end.1)
            }
        };
        self.dirty |= changed;
    }

    /// Release a held single click once the double-click window expires.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(pointer) = self.pointer.poll(now) {
            self.handle_pointer(pointer);
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            if self.dirty {
                terminal.draw(|f| self.draw(f))?;
                self.dirty = false;
            }

            let now = Instant::now();
            let timeout = self
                .pointer
                .time_remaining(now)
                .map_or(self.tick, |remaining| remaining.min(self.tick));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key_event(key),
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse, Instant::now()),
                    Event::Resize(_, _) => self.dirty = true,
                    _ => {}
                }
            }
            self.on_tick(Instant::now());
        }
        Ok(())
    }

    /// Frames share the screen above a one-line status bar.
    pub fn draw(&mut self, f: &mut TerminalFrame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(f.area());

        self.manager.paint(f.buffer_mut(), chunks[0]);
        f.render_widget(Paragraph::new(self.status_line()), chunks[1]);
    }

    fn status_line(&self) -> Line<'static> {
        let history = self.manager.tables().history();
        let title = self
            .manager
            .title()
            .unwrap_or_else(|| "No windows open. Ctrl+T opens one, Ctrl+Q quits.".to_string());

        let mut spans = vec![
            Span::styled(format!(" {} ", title), Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(format!(" undo {}/{} ", history.applied_count(), history.len())),
        ];
        if let Some(entry) = self.logs.latest() {
            spans.push(Span::styled(
                format!(" {} {}", entry.level, entry.message),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }
}

pub fn run_tui_app(config: &Config, logs: LogRingBuffer) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TablrApp::new(config, logs);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::backend::TestBackend;

    fn app() -> TablrApp {
        TablrApp::new(&Config::default(), LogRingBuffer::new())
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_starts_with_one_tables_window() {
        let app = app();
        assert_eq!(app.manager().frames().len(), 1);
        assert_eq!(app.manager().title().as_deref(), Some("Tables"));
        assert!(app.is_dirty());
    }

    #[test]
    fn test_quit_and_new_window_keys() {
        let mut app = app();
        app.handle_key_event(press(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert_eq!(app.manager().frames().len(), 2);

        app.handle_key_event(press(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut app = app();
        let mut release = press(KeyCode::Char('t'), KeyModifiers::CONTROL);
        release.kind = KeyEventKind::Release;
        app.handle_key_event(release);
        assert_eq!(app.manager().frames().len(), 1);
    }

    #[test]
    fn test_double_click_below_list_adds_table() {
        let mut app = app();
        let frame = app.manager().frames()[0].clone();
        // Body row 0 is the header; row 3 is below the (empty) list.
        let (x, y) = ((frame.x + 5) as u16, (frame.y + 4) as u16);
        let now = Instant::now();

        for offset in [0, 100] {
            let at = now + Duration::from_millis(offset);
            app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), x, y), at);
            app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), x, y), at);
        }
        assert_eq!(app.manager().tables().store().len(), 1);

        app.on_tick(now + Duration::from_secs(5));
        assert_eq!(app.manager().tables().store().len(), 1);
    }

    #[test]
    fn test_draw_shows_status_line() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let status: String = (0..80)
            .map(|x| buffer[(x, 23)].symbol().to_string())
            .collect();
        assert!(status.contains("Tables"));
        assert!(status.contains("undo 0/0"));
    }
}
