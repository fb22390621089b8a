#![allow(dead_code)]

use tablr::config::config::FrameConfig;
use tablr::manager::TableManager;
use tablr::view::{KeyInput, View, ViewId};
use tablr::window::frame::TITLE_BAR_HEIGHT;
use tablr::window::ViewManager;

/// Drives a `ViewManager` the way the terminal host would, with clicks given
/// in body coordinates of the active frame.
pub struct Session {
    pub manager: ViewManager,
}

impl Session {
    pub fn new() -> Self {
        let mut manager = ViewManager::new(TableManager::new(), FrameConfig::default());
        manager.open_default_view();
        Self { manager }
    }

    pub fn body_origin(&self) -> (i32, i32) {
        let frame = self.manager.active_frame().expect("no active frame");
        (frame.x, frame.y + TITLE_BAR_HEIGHT)
    }

    pub fn click_body(&mut self, x: i32, y: i32) -> bool {
        let (ox, oy) = self.body_origin();
        self.manager.handle_single_click(ox + x, oy + y)
    }

    pub fn double_click_body(&mut self, x: i32, y: i32) -> bool {
        let (ox, oy) = self.body_origin();
        self.manager.handle_double_click(ox + x, oy + y)
    }

    pub fn key(&mut self, key: KeyInput) -> bool {
        self.manager.handle_key(key)
    }

    pub fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            self.key(KeyInput::Char(c));
        }
    }

    pub fn active(&self) -> &View {
        let id = self.active_id();
        self.manager.view(id).expect("active view missing from arena")
    }

    pub fn active_id(&self) -> ViewId {
        self.manager.active_view().expect("no active view")
    }

    pub fn active_kind(&self) -> Option<&'static str> {
        self.manager
            .active_view()
            .and_then(|id| self.manager.view(id))
            .map(View::kind)
    }

    pub fn tables(&self) -> &TableManager {
        self.manager.tables()
    }

    /// From the root list: create a table with one column and one row, and
    /// end up in its rows view.
    pub fn table_with_one_cell(&mut self) {
        self.double_click_body(5, 1); // new table
        self.double_click_body(5, 1); // open its design
        self.double_click_body(5, 2); // new column
        self.key(KeyInput::CtrlEnter); // to rows
        self.double_click_body(5, 1); // new row
    }
}
