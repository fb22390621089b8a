use std::collections::VecDeque;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, info};

use super::frame::{
    Frame, FrameDrag, FrameHit, FrameId, CLOSE_BUTTON, CLOSE_BUTTON_WIDTH, TITLE_BAR_HEIGHT,
};
use super::surface::{BufferSurface, Surface};
use crate::config::config::FrameConfig;
use crate::manager::TableManager;
use crate::view::{KeyInput, TablesView, View, ViewArena, ViewContext, ViewId, ViewRequest};

/// Owns the frames, the views they host and the table data.
///
/// Frames are kept in z-order: the last frame is on top and is the active
/// one. Pointer events go to the topmost frame under the pointer, keyboard
/// events to the active frame. Every event method returns whether anything
/// may have changed, so the host knows when to repaint.
#[derive(Debug)]
pub struct ViewManager {
    frames: Vec<Frame>,
    arena: ViewArena,
    tables: TableManager,
    layout: FrameConfig,
    next_frame_id: u64,
}

impl ViewManager {
    pub fn new(tables: TableManager, layout: FrameConfig) -> Self {
        Self {
            frames: Vec::new(),
            arena: ViewArena::new(),
            tables,
            layout,
            next_frame_id: 0,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn active_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn active_view(&self) -> Option<ViewId> {
        self.active_frame().and_then(Frame::view)
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.arena.get(id)
    }

    pub fn arena(&self) -> &ViewArena {
        &self.arena
    }

    pub fn frame_of(&self, view: ViewId) -> Option<&Frame> {
        self.frames.iter().find(|f| f.view() == Some(view))
    }

    pub fn tables(&self) -> &TableManager {
        &self.tables
    }

    /// Direct data access, e.g. for seeding. Views catch up on the next event.
    pub fn tables_mut(&mut self) -> &mut TableManager {
        &mut self.tables
    }

    /// Title of the active view.
    pub fn title(&self) -> Option<String> {
        self.active_view()
            .and_then(|id| self.arena.get(id))
            .map(|v| v.title(&self.tables))
    }

    // ---- window stack ----

    /// Open `view` in a new frame on top, cascaded from the active frame.
    pub fn open_view(&mut self, view: View) -> ViewId {
        let kind = view.kind();
        let id = self.arena.insert(view);
        let (x, y) = match self.frames.last() {
            Some(active) => (active.x + self.layout.cascade_x, active.y + self.layout.cascade_y),
            None => (self.layout.origin_x, self.layout.origin_y),
        };
        let frame_id = FrameId(self.next_frame_id);
        self.next_frame_id += 1;
        self.frames.push(Frame::new(
            frame_id,
            x,
            y,
            self.layout.width,
            self.layout.height,
            id,
        ));
        info!(target: "views", "opened {} view {} in {} at ({}, {})", kind, id, frame_id, x, y);
        id
    }

    /// A fresh root list in a new frame.
    pub fn open_default_view(&mut self) -> ViewId {
        self.open_view(View::Tables(TablesView::new()))
    }

    /// Close the frame hosting `view`, then tell every other frame that
    /// `view` is gone. Frames left without a view close too, and their views
    /// are reported dead in turn.
    pub fn close_view(&mut self, view: ViewId) -> bool {
        match self.frames.iter().position(|f| f.view() == Some(view)) {
            Some(index) => self.close_frame_at(index),
            None => {
                debug!(target: "views", "close_view: {} is not hosted by any frame", view);
                false
            }
        }
    }

    fn close_frame_at(&mut self, index: usize) -> bool {
        let frame = self.frames.remove(index);
        info!(target: "views", "closed {}", frame.id());

        let mut dead: VecDeque<ViewId> = frame.view().into_iter().collect();
        while let Some(dead_view) = dead.pop_front() {
            // Frames may disappear while we walk, so look each one up again.
            let snapshot: Vec<FrameId> = self.frames.iter().map(Frame::id).collect();
            for frame_id in snapshot {
                let Some(position) = self.frames.iter().position(|f| f.id() == frame_id) else {
                    continue;
                };
                let hosted = self.frames[position].view();
                if self.frames[position].handle_dead_view(dead_view, &mut self.arena) {
                    info!(target: "views", "closed {} after {} died", frame_id, dead_view);
                    self.frames.remove(position);
                    dead.extend(hosted);
                }
            }
        }

        self.release_unreachable();
        true
    }

    /// Put the registered view `new` in place of `old`, keeping the frame's
    /// position and size.
    pub fn substitute_view(&mut self, old: ViewId, new: ViewId) -> bool {
        if !self.arena.contains(new) {
            debug_assert!(false, "substitute_view with unregistered view {}", new);
            return false;
        }
        let Some(frame) = self.frames.iter_mut().find(|f| f.view() == Some(old)) else {
            debug!(target: "views", "substitute_view: {} is not hosted by any frame", old);
            return false;
        };
        frame.substitute_view(old, new);
        debug!(target: "views", "{}: {} -> {}", frame.id(), old, new);
        self.release_unreachable();
        true
    }

    pub fn move_view_location(&mut self, view: ViewId, dx: i32, dy: i32) -> bool {
        match self.frames.iter_mut().find(|f| f.view() == Some(view)) {
            Some(frame) => {
                frame.move_by(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Bring the frame at `index` to the top. False if it already was.
    fn activate(&mut self, index: usize) -> bool {
        if index + 1 >= self.frames.len() {
            return false;
        }
        let frame = self.frames.remove(index);
        debug!(target: "views", "activated {}", frame.id());
        self.frames.push(frame);
        true
    }

    fn hit_test(&self, x: i32, y: i32) -> Option<usize> {
        self.frames.iter().rposition(|f| f.contains(x, y))
    }

    fn release_unreachable(&mut self) {
        let roots: Vec<ViewId> = self.frames.iter().filter_map(Frame::view).collect();
        self.arena.retain_reachable(roots);
    }

    fn reap_empty_frames(&mut self) {
        let before = self.frames.len();
        self.frames.retain(|f| f.view().is_some());
        if self.frames.len() != before {
            info!(target: "views", "reaped {} empty frame(s)", before - self.frames.len());
            self.release_unreachable();
        }
    }

    // ---- event dispatch ----

    pub fn handle_single_click(&mut self, x: i32, y: i32) -> bool {
        self.handle_click(x, y, false)
    }

    pub fn handle_double_click(&mut self, x: i32, y: i32) -> bool {
        self.handle_click(x, y, true)
    }

    fn handle_click(&mut self, x: i32, y: i32, double: bool) -> bool {
        let Some(index) = self.hit_test(x, y) else {
            return false;
        };
        self.activate(index);
        let Some(frame) = self.frames.last() else {
            return false;
        };
        let (local_x, local_y) = frame.to_local(x, y);
        match frame.route_click(local_x, local_y) {
            FrameHit::Body { x, y } => self.dispatch(|view, ctx| {
                if double {
                    view.handle_double_click(x, y, ctx)
                } else {
                    view.handle_single_click(x, y, ctx)
                }
            }),
            FrameHit::CloseButton => {
                let index = self.frames.len() - 1;
                self.close_frame_at(index)
            }
            FrameHit::TitleBar => true,
        }
    }

    /// Hit-tested on the start point only; both ends are translated relative
    /// to that frame.
    pub fn handle_mouse_drag(
        &mut self,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
    ) -> bool {
        let Some(index) = self.hit_test(start_x, start_y) else {
            return false;
        };
        self.activate(index);
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        let start = frame.to_local(start_x, start_y);
        let end = frame.to_local(end_x, end_y);
        match frame.route_drag(start, end) {
            FrameDrag::Move { dx, dy } => {
                frame.move_by(dx, dy);
                debug!(target: "views", "moved {} by ({}, {})", frame.id(), dx, dy);
                true
            }
            FrameDrag::Body { start, end } => {
                self.dispatch(|view, ctx| view.handle_mouse_drag(start, end, ctx.tables))
            }
        }
    }

    /// Keyboard-class input goes to the active frame without hit-testing.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        self.dispatch(|view, ctx| view.handle_key(key, ctx))
    }

    /// The reserved new-window combination. Works with no frames open.
    pub fn handle_new_window(&mut self) -> bool {
        self.open_default_view();
        true
    }

    fn dispatch(
        &mut self,
        handler: impl FnOnce(&mut View, &mut ViewContext<'_>) -> ViewRequest,
    ) -> bool {
        let Some(view_id) = self.active_view() else {
            return false;
        };
        let Some(view) = self.arena.get_mut(view_id) else {
            return false;
        };
        let mut ctx = ViewContext {
            tables: &mut self.tables,
            view_id,
        };
        let request = handler(view, &mut ctx);
        self.apply_request(view_id, request);
        self.reconcile();
        true
    }

    fn apply_request(&mut self, origin: ViewId, request: ViewRequest) {
        match request {
            ViewRequest::None => {}
            ViewRequest::Substitute(view) => {
                let new = self.arena.insert(view);
                if !self.substitute_view(origin, new) {
                    self.release_unreachable();
                }
            }
            ViewRequest::Return(view) => {
                self.substitute_view(origin, view);
            }
            ViewRequest::Close => {
                self.close_view(origin);
            }
        }
    }

    /// Move every frame off views whose data disappeared, e.g. after an undo
    /// removed the table a design view was showing.
    fn reconcile(&mut self) {
        let snapshot: Vec<FrameId> = self.frames.iter().map(Frame::id).collect();
        for frame_id in snapshot {
            // Each step drops one stale view, so the chain length bounds it.
            for _ in 0..=self.arena.len() {
                let Some(view_id) = self
                    .frames
                    .iter()
                    .find(|f| f.id() == frame_id)
                    .and_then(Frame::view)
                else {
                    break;
                };
                let Some(view) = self.arena.get(view_id) else {
                    break;
                };
                if !view.is_stale(&self.tables) {
                    break;
                }
                debug!(target: "views", "{} view {} is stale", view.kind(), view_id);
                let fallback = view.stale_fallback();
                self.apply_request(view_id, fallback);
            }
        }
    }

    // ---- painting ----

    /// Paint every frame bottom to top into `area`. Frame coordinates are
    /// relative to the top-left corner of `area`.
    pub fn paint(&mut self, buf: &mut Buffer, area: Rect) {
        self.reap_empty_frames();
        let active = self.frames.last().map(Frame::id);

        for frame in &self.frames {
            let mut surface = BufferSurface::new(
                buf,
                area,
                i32::from(area.x) + frame.x,
                i32::from(area.y) + frame.y,
                frame.width,
                frame.height,
            );
            surface.clear();

            let bar = if Some(frame.id()) == active {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray).bg(Color::DarkGray)
            };
            surface.fill_row(0, bar);
            let title = frame
                .view()
                .and_then(|v| self.arena.get(v))
                .map(|v| v.title(&self.tables))
                .unwrap_or_default();
            let room = usize::from(frame.width).saturating_sub(CLOSE_BUTTON_WIDTH as usize + 2);
            let title: String = title.chars().take(room).collect();
            surface.put_str(1, 0, &title, bar);
            surface.put_str(i32::from(frame.width) - CLOSE_BUTTON_WIDTH, 0, CLOSE_BUTTON, bar);

            let mut body = surface.child(0, TITLE_BAR_HEIGHT, frame.width, frame.body_height());
            if let Some(view) = frame.view() {
                self.paint_view(view, &mut body);
            }
        }
    }

    /// Editing views have no body of their own: paint the first non-editing
    /// view below them with the edited field highlighted.
    fn paint_view(&self, view: ViewId, surface: &mut dyn Surface) {
        let mut editing = None;
        for id in self.arena.chain(view) {
            match self.arena.get(id) {
                Some(View::Edit(edit)) => {
                    editing.get_or_insert(*edit.target());
                }
                Some(base) => {
                    base.paint(surface, &self.tables, editing.as_ref());
                    return;
                }
                None => break,
            }
        }
        if let Some(top) = self.arena.get(view) {
            top.paint(surface, &self.tables, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ViewManager {
        ViewManager::new(TableManager::new(), FrameConfig::default())
    }

    #[test]
    fn test_open_view_becomes_active() {
        let mut manager = manager();
        let first = manager.open_default_view();
        assert_eq!(manager.active_view(), Some(first));
        let second = manager.open_default_view();
        assert_eq!(manager.active_view(), Some(second));

        let frames = manager.frames();
        let layout = FrameConfig::default();
        assert_eq!(frames[0].x, layout.origin_x);
        assert_eq!(frames[1].x, layout.origin_x + layout.cascade_x);
        assert_eq!(frames[1].y, layout.origin_y + layout.cascade_y);
    }

    #[test]
    fn test_events_without_frames_are_noops() {
        let mut manager = manager();
        assert!(!manager.handle_key(KeyInput::Escape));
        assert!(!manager.handle_single_click(5, 5));
        assert!(!manager.handle_mouse_drag(0, 0, 4, 4));
        assert!(manager.title().is_none());
    }

    #[test]
    fn test_close_only_frame_empties_stack() {
        let mut manager = manager();
        let view = manager.open_default_view();
        assert!(manager.close_view(view));
        assert!(manager.frames().is_empty());
        assert!(manager.arena().is_empty());
        assert!(!manager.close_view(view));
    }

    #[test]
    fn test_substitute_keeps_geometry() {
        let mut manager = manager();
        let old = manager.open_default_view();
        manager.move_view_location(old, 3, 4);
        let (x, y) = (manager.frames()[0].x, manager.frames()[0].y);

        let table = manager.tables_mut().add_table();
        let new = manager.arena.insert(View::Design(crate::view::DesignView::new(table)));
        assert!(manager.substitute_view(old, new));

        let frame = manager.active_frame().unwrap();
        assert_eq!((frame.x, frame.y), (x, y));
        assert_eq!(frame.view(), Some(new));
        assert!(manager.view(old).is_none());
    }

    #[test]
    fn test_paint_draws_title_bar() {
        let mut manager = manager();
        manager.open_default_view();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        manager.paint(&mut buf, area);

        let frame = manager.active_frame().unwrap();
        let row: String = (0..area.width)
            .map(|x| buf[(x, frame.y as u16)].symbol().to_string())
            .collect();
        assert!(row.contains("Tables"));
        assert!(row.contains(CLOSE_BUTTON));
    }
}
