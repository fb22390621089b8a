//! View state machine
//!
//! Views are a closed set of variants living in a [`ViewArena`]. A view never
//! changes the window stack itself: its handlers return a [`ViewRequest`]
//! that the window manager applies after the handler returns.

pub mod arena;
pub mod design;
pub mod edit;
pub mod layout;
pub mod rows;
pub mod tables;

use std::fmt;

pub use arena::ViewArena;
pub use design::DesignView;
pub use edit::{EditTarget, EditView};
pub use rows::RowsView;
pub use tables::TablesView;

use crate::manager::TableManager;
use crate::window::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Keyboard-class input, already decoded from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Escape,
    Enter,
    CtrlEnter,
    Backspace,
    Delete,
    Char(char),
    Undo,
    Redo,
}

/// What a view asks its frame to do once a handler returns.
#[derive(Debug)]
pub enum ViewRequest {
    None,
    /// Replace the requesting view with a new one in the same frame.
    Substitute(View),
    /// Replace the requesting view with a view already in the arena,
    /// typically the one an editing view covers.
    Return(ViewId),
    /// Close the requesting view's frame.
    Close,
}

/// Handed to view handlers for the duration of one event.
pub struct ViewContext<'a> {
    pub tables: &'a mut TableManager,
    /// Id of the view handling the event.
    pub view_id: ViewId,
}

#[derive(Debug)]
pub enum View {
    Tables(TablesView),
    Design(DesignView),
    Rows(RowsView),
    Edit(EditView),
}

impl View {
    pub fn title(&self, tables: &TableManager) -> String {
        match self {
            View::Tables(v) => v.title(),
            View::Design(v) => v.title(tables),
            View::Rows(v) => v.title(tables),
            View::Edit(v) => v.title(tables),
        }
    }

    /// Paint into a body-sized surface. `editing` marks the field an
    /// editing view stacked on top of this one is working on.
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        tables: &TableManager,
        editing: Option<&EditTarget>,
    ) {
        match self {
            View::Tables(v) => v.paint(surface, tables, editing),
            View::Design(v) => v.paint(surface, tables, editing),
            View::Rows(v) => v.paint(surface, tables, editing),
            View::Edit(v) => v.paint(surface),
        }
    }

    pub fn handle_single_click(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_>,
    ) -> ViewRequest {
        match self {
            View::Tables(v) => v.handle_single_click(x, y, ctx),
            View::Design(v) => v.handle_single_click(x, y, ctx),
            View::Rows(v) => v.handle_single_click(x, y, ctx),
            View::Edit(v) => v.handle_click(),
        }
    }

    pub fn handle_double_click(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_>,
    ) -> ViewRequest {
        match self {
            View::Tables(v) => v.handle_double_click(x, y, ctx),
            View::Design(v) => v.handle_double_click(y, ctx),
            View::Rows(v) => v.handle_double_click(y, ctx),
            View::Edit(v) => v.handle_click(),
        }
    }

    pub fn handle_mouse_drag(
        &mut self,
        start: (i32, i32),
        end: (i32, i32),
        tables: &TableManager,
    ) -> ViewRequest {
        match self {
            View::Design(v) => v.handle_mouse_drag(start, end),
            View::Rows(v) => v.handle_mouse_drag(start, end, tables),
            View::Tables(_) | View::Edit(_) => ViewRequest::None,
        }
    }

    pub fn handle_key(&mut self, key: KeyInput, ctx: &mut ViewContext<'_>) -> ViewRequest {
        if let KeyInput::Undo | KeyInput::Redo = key {
            let applied = if key == KeyInput::Undo {
                ctx.tables.undo()
            } else {
                ctx.tables.redo()
            };
            if applied {
                if let View::Edit(edit) = self {
                    edit.resync(ctx.tables);
                }
            }
            return ViewRequest::None;
        }

        match self {
            View::Tables(v) => v.handle_key(key, ctx),
            View::Design(v) => v.handle_key(key, ctx),
            View::Rows(v) => v.handle_key(key, ctx),
            View::Edit(v) => v.handle_key(key, ctx),
        }
    }

    /// The view an editing view covers.
    pub fn underlying(&self) -> Option<ViewId> {
        match self {
            View::Edit(v) => v.underlying(),
            _ => None,
        }
    }

    /// True once the data this view shows no longer exists.
    pub fn is_stale(&self, tables: &TableManager) -> bool {
        match self {
            View::Tables(_) => false,
            View::Design(v) => tables.table(v.table()).is_none(),
            View::Rows(v) => tables.table(v.table()).is_none(),
            View::Edit(v) => v.is_stale(tables),
        }
    }

    /// Transition applied to a stale view.
    pub fn stale_fallback(&self) -> ViewRequest {
        match self {
            View::Edit(v) => v.leave(),
            View::Design(_) | View::Rows(_) => {
                ViewRequest::Substitute(View::Tables(TablesView::new()))
            }
            View::Tables(_) => ViewRequest::None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            View::Tables(_) => "tables",
            View::Design(_) => "design",
            View::Rows(_) => "rows",
            View::Edit(_) => "edit",
        }
    }
}
