use std::collections::BTreeSet;

use tracing::debug;

use super::layout::{self, MARGIN};
use super::{DesignView, EditTarget, EditView, KeyInput, View, ViewContext, ViewRequest};
use crate::manager::TableManager;
use crate::model::TableId;
use crate::window::surface::Surface;

const FIRST_ROW: i32 = 1;

/// Root view: one line per table.
#[derive(Debug, Clone, Default)]
pub struct TablesView {
    selected: BTreeSet<TableId>,
}

impl TablesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<TableId> {
        &self.selected
    }

    pub fn title(&self) -> String {
        "Tables".to_string()
    }

    fn row_at(y: i32) -> Option<usize> {
        usize::try_from(y - FIRST_ROW).ok()
    }

    fn table_at(y: i32, tables: &TableManager) -> Option<TableId> {
        let row = Self::row_at(y)?;
        tables.store().tables().get(row).map(|t| t.id())
    }

    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        tables: &TableManager,
        editing: Option<&EditTarget>,
    ) {
        surface.put_str(MARGIN, 0, "Name", layout::header_style());
        let width = surface.width().saturating_sub(MARGIN as u16);
        for (row, table) in tables.store().tables().iter().enumerate() {
            let y = FIRST_ROW + row as i32;
            layout::paint_marker(surface, y, self.selected.contains(&table.id()));
            let field = match editing {
                Some(EditTarget::TableName(id)) if *id == table.id() => Some(0),
                _ => None,
            };
            let style = if self.selected.contains(&table.id()) {
                layout::selected_style()
            } else {
                Default::default()
            };
            let name = [table.name().to_string()];
            layout::paint_fields(surface, y, &[width], &name, style, field);
        }
    }

    pub fn handle_single_click(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_>,
    ) -> ViewRequest {
        let Some(table) = Self::table_at(y, ctx.tables) else {
            return ViewRequest::None;
        };
        if layout::in_margin(x) {
            if !self.selected.remove(&table) {
                self.selected.insert(table);
            }
            return ViewRequest::None;
        }
        match EditView::new(EditTarget::TableName(table), ctx.view_id, ctx.tables) {
            Some(edit) => ViewRequest::Substitute(View::Edit(edit)),
            None => ViewRequest::None,
        }
    }

    pub fn handle_double_click(
        &mut self,
        _x: i32,
        y: i32,
        ctx: &mut ViewContext<'_>,
    ) -> ViewRequest {
        if y < FIRST_ROW {
            return ViewRequest::None;
        }
        match Self::table_at(y, ctx.tables) {
            Some(table) => ViewRequest::Substitute(View::Design(DesignView::new(table))),
            None => {
                let table = ctx.tables.add_table();
                debug!(target: "views", "created table {}", table);
                ViewRequest::None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyInput, ctx: &mut ViewContext<'_>) -> ViewRequest {
        match key {
            KeyInput::Delete => {
                for table in std::mem::take(&mut self.selected) {
                    if let Err(e) = ctx.tables.remove_table(table) {
                        debug!(target: "views", "skipping removal of {}: {}", table, e);
                    }
                }
                ViewRequest::None
            }
            _ => ViewRequest::None,
        }
    }
}
