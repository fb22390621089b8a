use std::collections::BTreeSet;

use tracing::debug;

use super::layout::{self, MARGIN};
use super::{EditTarget, EditView, KeyInput, RowsView, TablesView, View, ViewContext, ViewRequest};
use crate::manager::TableManager;
use crate::model::{CellValue, ColumnId, ColumnType, TableId};
use crate::window::surface::Surface;

const NAME_LINE: i32 = 0;
const HEADER_LINE: i32 = 1;
const FIRST_COLUMN: i32 = 2;

const FIELD_NAME: usize = 0;
const FIELD_TYPE: usize = 1;
const FIELD_BLANKS: usize = 2;
const FIELD_DEFAULT: usize = 3;

pub const DESIGN_FIELD_WIDTHS: [u16; 4] = [16, 9, 8, 14];

/// Column design of one table: name, type, blanks flag and default per line.
#[derive(Debug, Clone)]
pub struct DesignView {
    table: TableId,
    selected: BTreeSet<ColumnId>,
    widths: [u16; 4],
}

impl DesignView {
    pub fn new(table: TableId) -> Self {
        Self {
            table,
            selected: BTreeSet::new(),
            widths: DESIGN_FIELD_WIDTHS,
        }
    }

    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn widths(&self) -> &[u16; 4] {
        &self.widths
    }

    pub fn selected(&self) -> &BTreeSet<ColumnId> {
        &self.selected
    }

    pub fn title(&self, tables: &TableManager) -> String {
        match tables.table(self.table) {
            Some(t) => format!("Design: {}", t.name()),
            None => "Design".to_string(),
        }
    }

    fn column_at(&self, y: i32, tables: &TableManager) -> Option<ColumnId> {
        let index = usize::try_from(y - FIRST_COLUMN).ok()?;
        tables
            .table(self.table)?
            .columns()
            .get(index)
            .map(|c| c.id())
    }

    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        tables: &TableManager,
        editing: Option<&EditTarget>,
    ) {
        let Some(table) = tables.table(self.table) else {
            return;
        };

        let name_editing = matches!(editing, Some(EditTarget::TableName(id)) if *id == self.table);
        surface.put_str(MARGIN, NAME_LINE, "Table:", layout::header_style());
        let name_style = if name_editing {
            layout::editing_style()
        } else {
            Default::default()
        };
        let mut name = table.name().to_string();
        if name_editing {
            name.push('_');
        }
        surface.put_str(MARGIN + 7, NAME_LINE, &name, name_style);

        let headers = ["Name", "Type", "Blanks", "Default"].map(String::from);
        let header_style = layout::header_style();
        layout::paint_fields(surface, HEADER_LINE, &self.widths, &headers, header_style, None);

        for (index, column) in table.columns().iter().enumerate() {
            let y = FIRST_COLUMN + index as i32;
            let selected = self.selected.contains(&column.id());
            layout::paint_marker(surface, y, selected);

            let field = match editing {
                Some(EditTarget::ColumnName(_, id)) if *id == column.id() => Some(FIELD_NAME),
                Some(EditTarget::DefaultValue(_, id)) if *id == column.id() => Some(FIELD_DEFAULT),
                _ => None,
            };
            let texts = [
                column.name().to_string(),
                column.column_type().to_string(),
                (if column.allows_blanks() { "[x]" } else { "[ ]" }).to_string(),
                column.default_value().to_string(),
            ];
            let style = if selected {
                layout::selected_style()
            } else {
                Default::default()
            };
            layout::paint_fields(surface, y, &self.widths, &texts, style, field);
        }
    }

    pub fn handle_single_click(
        &mut self,
        x: i32,
        y: i32,
        ctx: &mut ViewContext<'_>,
    ) -> ViewRequest {
        if y == NAME_LINE && x >= MARGIN {
            return edit(EditTarget::TableName(self.table), ctx);
        }
        let Some(column) = self.column_at(y, ctx.tables) else {
            return ViewRequest::None;
        };
        if layout::in_margin(x) {
            if !self.selected.remove(&column) {
                self.selected.insert(column);
            }
            return ViewRequest::None;
        }

        let table = self.table;
        match layout::field_at(&self.widths, x) {
            Some(FIELD_NAME) => edit(EditTarget::ColumnName(table, column), ctx),
            Some(FIELD_TYPE) => {
                if let Err(e) = ctx.tables.change_type(table, column) {
                    debug!(target: "views", "type change refused: {}", e);
                }
                ViewRequest::None
            }
            Some(FIELD_BLANKS) => {
                if let Err(e) = ctx.tables.toggle_allow_blanks(table, column) {
                    debug!(target: "views", "blanks toggle refused: {}", e);
                }
                ViewRequest::None
            }
            Some(FIELD_DEFAULT) => self.click_default(table, column, ctx),
            _ => ViewRequest::None,
        }
    }

    /// Boolean defaults toggle in place; everything else opens an editor.
    fn click_default(
        &self,
        table: TableId,
        column: ColumnId,
        ctx: &mut ViewContext<'_>,
    ) -> ViewRequest {
        let is_boolean = ctx
            .tables
            .table(table)
            .and_then(|t| t.column(column))
            .is_some_and(|c| c.column_type() == ColumnType::Boolean);
        if !is_boolean {
            return edit(EditTarget::DefaultValue(table, column), ctx);
        }

        let next = match ctx.tables.default_value(table, column) {
            Some(CellValue::Boolean(value)) => !value,
            _ => true,
        };
        if let Err(e) = ctx.tables.set_default_value(table, column, &next.to_string()) {
            debug!(target: "views", "default toggle refused: {}", e);
        }
        ViewRequest::None
    }

    pub fn handle_double_click(&mut self, y: i32, ctx: &mut ViewContext<'_>) -> ViewRequest {
        let Some(table) = ctx.tables.table(self.table) else {
            return ViewRequest::None;
        };
        if y >= FIRST_COLUMN + table.columns().len() as i32 {
            match ctx.tables.add_column(self.table) {
                Ok(column) => debug!(target: "views", "added column {}", column),
                Err(e) => debug!(target: "views", "add column refused: {}", e),
            }
        }
        ViewRequest::None
    }

    /// Resize the field under the drag's start point by the horizontal distance.
    pub fn handle_mouse_drag(&mut self, start: (i32, i32), end: (i32, i32)) -> ViewRequest {
        if let Some(field) = layout::field_at(&self.widths, start.0) {
            layout::resize_field(&mut self.widths, field, end.0 - start.0);
        }
        ViewRequest::None
    }

    pub fn handle_key(&mut self, key: KeyInput, ctx: &mut ViewContext<'_>) -> ViewRequest {
        match key {
            KeyInput::Escape => ViewRequest::Substitute(View::Tables(TablesView::new())),
            KeyInput::CtrlEnter => ViewRequest::Substitute(View::Rows(RowsView::new(self.table))),
            KeyInput::Delete => {
                for column in std::mem::take(&mut self.selected) {
                    if let Err(e) = ctx.tables.remove_column(self.table, column) {
                        debug!(target: "views", "skipping removal of {}: {}", column, e);
                    }
                }
                ViewRequest::None
            }
            _ => ViewRequest::None,
        }
    }
}

fn edit(target: EditTarget, ctx: &mut ViewContext<'_>) -> ViewRequest {
    match EditView::new(target, ctx.view_id, ctx.tables) {
        Some(edit) => ViewRequest::Substitute(View::Edit(edit)),
        None => ViewRequest::None,
    }
}
