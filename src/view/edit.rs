use tracing::{debug, warn};

use super::layout;
use super::{KeyInput, ViewContext, ViewId, ViewRequest};
use crate::manager::TableManager;
use crate::model::{ColumnId, ModelError, ModelResult, RowId, TableId};
use crate::window::surface::Surface;

/// The value an editing view works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    TableName(TableId),
    ColumnName(TableId, ColumnId),
    DefaultValue(TableId, ColumnId),
    /// Rows are named by id so the target follows its row when rows
    /// above it are removed.
    Cell {
        table: TableId,
        column: ColumnId,
        row: RowId,
    },
}

impl EditTarget {
    pub fn table(&self) -> TableId {
        match *self {
            EditTarget::TableName(table)
            | EditTarget::ColumnName(table, _)
            | EditTarget::DefaultValue(table, _)
            | EditTarget::Cell { table, .. } => table,
        }
    }

    /// Text of the target as stored, or `None` once it no longer exists.
    pub fn current_text(&self, tables: &TableManager) -> Option<String> {
        match *self {
            EditTarget::TableName(table) => tables.table(table).map(|t| t.name().to_string()),
            EditTarget::ColumnName(table, column) => tables
                .table(table)
                .and_then(|t| t.column(column))
                .map(|c| c.name().to_string()),
            EditTarget::DefaultValue(table, column) => {
                tables.default_value(table, column).map(ToString::to_string)
            }
            EditTarget::Cell { table, column, row } => {
                let index = tables.row_index(table, row)?;
                tables.cell(table, column, index).map(ToString::to_string)
            }
        }
    }

    fn apply(&self, tables: &mut TableManager, text: &str) -> ModelResult<()> {
        match *self {
            EditTarget::TableName(table) => tables.rename_table(table, text),
            EditTarget::ColumnName(table, column) => tables.rename_column(table, column, text),
            EditTarget::DefaultValue(table, column) => {
                tables.set_default_value(table, column, text)
            }
            EditTarget::Cell { table, column, row } => {
                let index = tables
                    .row_index(table, row)
                    .ok_or(ModelError::RowNotFound { table, row })?;
                tables.update_cell(table, column, index, text)
            }
        }
    }

    fn describe(&self, tables: &TableManager) -> String {
        let column_name = |table: TableId, column: ColumnId| {
            tables
                .table(table)
                .and_then(|t| t.column(column))
                .map(|c| c.name().to_string())
                .unwrap_or_default()
        };
        match *self {
            EditTarget::TableName(_) => "name".to_string(),
            EditTarget::ColumnName(..) => "column name".to_string(),
            EditTarget::DefaultValue(table, column) => {
                format!("default value of {}", column_name(table, column))
            }
            EditTarget::Cell { table, column, row } => match tables.row_index(table, row) {
                Some(index) => format!("{} in row {}", column_name(table, column), index),
                None => format!("{} in a removed row", column_name(table, column)),
            },
        }
    }
}

/// Transient editor stacked on top of another view.
///
/// Every accepted keystroke is committed to the model as its own command, so
/// other frames see the edit as it happens. Escape commits one more command
/// restoring the value captured when editing began.
#[derive(Debug, Clone)]
pub struct EditView {
    target: EditTarget,
    underlying: Option<ViewId>,
    original: String,
    buffer: String,
}

impl EditView {
    /// `None` when the target does not exist.
    pub fn new(target: EditTarget, underlying: ViewId, tables: &TableManager) -> Option<Self> {
        let original = target.current_text(tables)?;
        Some(Self {
            target,
            underlying: Some(underlying),
            buffer: original.clone(),
            original,
        })
    }

    pub fn target(&self) -> &EditTarget {
        &self.target
    }

    pub fn underlying(&self) -> Option<ViewId> {
        self.underlying
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub(crate) fn detach(&mut self) {
        self.underlying = None;
    }

    pub fn title(&self, tables: &TableManager) -> String {
        format!("Editing {} {}.", self.target.describe(tables), self.original)
    }

    /// Only painted when nothing is left underneath.
    pub fn paint(&self, surface: &mut dyn Surface) {
        let mut shown = self.buffer.clone();
        shown.push('_');
        surface.put_str(layout::MARGIN, 0, &shown, layout::editing_style());
    }

    pub fn is_stale(&self, tables: &TableManager) -> bool {
        self.target.current_text(tables).is_none()
    }

    /// Re-read the buffer after undo/redo moved the model underneath us.
    pub fn resync(&mut self, tables: &TableManager) {
        if let Some(text) = self.target.current_text(tables) {
            self.buffer = text;
        }
    }

    /// Go back to the covered view, or close the frame if there is none.
    pub fn leave(&self) -> ViewRequest {
        match self.underlying {
            Some(view) => ViewRequest::Return(view),
            None => ViewRequest::Close,
        }
    }

    pub fn handle_click(&mut self) -> ViewRequest {
        self.leave()
    }

    fn try_commit(&mut self, text: String, tables: &mut TableManager) {
        match self.target.apply(tables, &text) {
            Ok(()) => self.buffer = text,
            Err(e) => debug!(target: "views", "keystroke rejected for {:?}: {}", self.target, e),
        }
    }

    pub fn handle_key(&mut self, key: KeyInput, ctx: &mut ViewContext<'_>) -> ViewRequest {
        match key {
            KeyInput::Char(c) => {
                let mut text = self.buffer.clone();
                text.push(c);
                self.try_commit(text, ctx.tables);
                ViewRequest::None
            }
            KeyInput::Backspace => {
                let mut text = self.buffer.clone();
                if text.pop().is_some() {
                    self.try_commit(text, ctx.tables);
                }
                ViewRequest::None
            }
            KeyInput::Escape => {
                let current = self.target.current_text(ctx.tables);
                if current.as_deref() != Some(self.original.as_str()) {
                    if let Err(e) = self.target.apply(ctx.tables, &self.original) {
                        warn!(target: "views", "could not revert {:?}: {}", self.target, e);
                    }
                }
                self.leave()
            }
            KeyInput::Enter => self.leave(),
            _ => ViewRequest::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TableManager, EditTarget) {
        let mut tables = TableManager::new();
        let table = tables.add_table();
        let column = tables.add_column(table).unwrap();
        tables.add_row(table).unwrap();
        let row = tables.row_id(table, 0).unwrap();
        (tables, EditTarget::Cell { table, column, row })
    }

    fn key(view: &mut EditView, tables: &mut TableManager, key: KeyInput) -> ViewRequest {
        let mut ctx = ViewContext {
            tables,
            view_id: ViewId(9),
        };
        view.handle_key(key, &mut ctx)
    }

    #[test]
    fn test_each_keystroke_commits() {
        let (mut tables, target) = setup();
        let mut view = EditView::new(target, ViewId(1), &tables).unwrap();

        key(&mut view, &mut tables, KeyInput::Backspace);
        key(&mut view, &mut tables, KeyInput::Char('o'));
        key(&mut view, &mut tables, KeyInput::Char('k'));

        assert_eq!(view.buffer(), "ok");
        assert_eq!(target.current_text(&tables).as_deref(), Some("ok"));
        // add table, add column, add row, then three edits
        assert_eq!(tables.history().len(), 6);
    }

    #[test]
    fn test_escape_reverts_and_returns() {
        let (mut tables, target) = setup();
        let mut view = EditView::new(target, ViewId(1), &tables).unwrap();

        key(&mut view, &mut tables, KeyInput::Char('y'));
        let request = key(&mut view, &mut tables, KeyInput::Escape);

        assert!(matches!(request, ViewRequest::Return(ViewId(1))));
        assert_eq!(target.current_text(&tables).as_deref(), Some("x"));
    }

    #[test]
    fn test_escape_without_change_pushes_nothing() {
        let (mut tables, target) = setup();
        let mut view = EditView::new(target, ViewId(1), &tables).unwrap();
        let before = tables.history().len();

        key(&mut view, &mut tables, KeyInput::Escape);
        assert_eq!(tables.history().len(), before);
    }

    #[test]
    fn test_rejected_keystroke_leaves_buffer() {
        let (mut tables, target) = setup();
        let EditTarget::Cell { table, column, .. } = target else {
            unreachable!()
        };
        tables.change_type(table, column).unwrap();
        tables.change_type(table, column).unwrap();
        let mut view = EditView::new(target, ViewId(1), &tables).unwrap();
        let before = tables.history().len();

        key(&mut view, &mut tables, KeyInput::Char('a'));
        assert_eq!(view.buffer(), "0");
        assert_eq!(tables.history().len(), before);

        key(&mut view, &mut tables, KeyInput::Char('5'));
        assert_eq!(view.buffer(), "05");
        assert_eq!(target.current_text(&tables).as_deref(), Some("5"));
    }

    #[test]
    fn test_cell_target_follows_its_row() {
        let (mut tables, target) = setup();
        let EditTarget::Cell { table, column, .. } = target else {
            unreachable!()
        };
        tables.add_row(table).unwrap();
        tables.update_cell(table, column, 1, "y").unwrap();
        let second = EditTarget::Cell {
            table,
            column,
            row: tables.row_id(table, 1).unwrap(),
        };
        let mut view = EditView::new(second, ViewId(1), &tables).unwrap();

        tables.remove_row(table, 0).unwrap();
        assert_eq!(view.title(&tables), "Editing Column0 in row 0 y.");

        key(&mut view, &mut tables, KeyInput::Char('z'));
        assert_eq!(tables.cell(table, column, 0).unwrap().to_string(), "yz");

        tables.remove_row(table, 0).unwrap();
        assert!(view.is_stale(&tables));
        key(&mut view, &mut tables, KeyInput::Char('q'));
        assert_eq!(view.buffer(), "yz");
    }

    #[test]
    fn test_detached_editor_closes() {
        let (tables, target) = setup();
        let mut view = EditView::new(target, ViewId(1), &tables).unwrap();
        view.detach();
        assert!(matches!(view.handle_click(), ViewRequest::Close));
    }

    #[test]
    fn test_title_names_the_value() {
        let (tables, target) = setup();
        let table = target.table();
        let view = EditView::new(EditTarget::TableName(table), ViewId(1), &tables).unwrap();
        assert_eq!(view.title(&tables), "Editing name Table0.");

        let cell = EditView::new(target, ViewId(1), &tables).unwrap();
        assert_eq!(cell.title(&tables), "Editing Column0 in row 0 x.");
    }
}
