use tablr::manager::TableManager;
use tablr::model::{CellValue, ColumnType, Table};

fn snapshot(tables: &TableManager) -> Vec<Table> {
    tables.store().tables().to_vec()
}

/// A mixed workload touching every kind of command.
fn run_workload(tables: &mut TableManager) -> usize {
    let before = tables.history().len();

    let people = tables.add_table();
    let scratch = tables.add_table();
    tables.rename_table(people, "People").unwrap();
    let name = tables.add_column(people).unwrap();
    let age = tables.add_column(people).unwrap();
    tables.rename_column(people, age, "Age").unwrap();
    tables.change_type(people, age).unwrap(); // Boolean
    tables.change_type(people, age).unwrap(); // Integer
    tables.set_default_value(people, age, "18").unwrap();
    tables.add_row(people).unwrap();
    tables.add_row(people).unwrap();
    tables.update_cell(people, name, 0, "Ada").unwrap();
    tables.update_cell(people, age, 1, "36").unwrap();
    tables.toggle_allow_blanks(people, age).unwrap();
    tables.remove_row(people, 0).unwrap();
    tables.remove_column(people, name).unwrap();
    tables.remove_table(scratch).unwrap();

    tables.history().len() - before
}

#[test]
fn test_undo_all_restores_initial_state() {
    let mut tables = TableManager::new();
    let seed = tables.add_table();
    tables.add_column(seed).unwrap();
    let before = snapshot(&tables);

    let n = run_workload(&mut tables);
    let after = snapshot(&tables);
    assert_eq!(n, 17);

    for _ in 0..n {
        assert!(tables.undo());
    }
    assert_eq!(snapshot(&tables), before);

    for _ in 0..n {
        assert!(tables.redo());
    }
    assert_eq!(snapshot(&tables), after);
    assert!(!tables.redo());
}

#[test]
fn test_new_command_after_undo_drops_redo_tail() {
    let mut tables = TableManager::new();
    let table = tables.add_table();
    tables.rename_table(table, "A").unwrap();
    tables.rename_table(table, "B").unwrap();
    tables.rename_table(table, "C").unwrap();

    assert!(tables.undo());
    assert!(tables.undo());
    assert_eq!(tables.table(table).unwrap().name(), "A");
    assert!(tables.history().can_redo());

    tables.rename_table(table, "D").unwrap();
    assert!(!tables.history().can_redo());
    assert!(!tables.redo());
    assert_eq!(tables.table(table).unwrap().name(), "D");
    assert_eq!(tables.history().len(), 3);
}

#[test]
fn test_type_change_round_trips_cells() {
    let mut tables = TableManager::new();
    let table = tables.add_table();
    let column = tables.add_column(table).unwrap();
    tables.add_row(table).unwrap();
    tables.update_cell(table, column, 0, "hello").unwrap();

    // "hello" is not an integer, so it falls back once converted
    tables.change_type(table, column).unwrap();
    tables.change_type(table, column).unwrap();
    assert_eq!(
        tables.table(table).unwrap().column(column).unwrap().column_type(),
        ColumnType::Integer
    );
    assert_eq!(tables.cell(table, column, 0), Some(&CellValue::Integer(0)));

    tables.undo();
    tables.undo();
    assert_eq!(
        tables.cell(table, column, 0),
        Some(&CellValue::Text("hello".to_string()))
    );
}

#[test]
fn test_rejected_input_records_nothing() {
    let mut tables = TableManager::new();
    let table = tables.add_table();
    let column = tables.add_column(table).unwrap();
    tables.add_row(table).unwrap();
    tables.change_type(table, column).unwrap();
    tables.change_type(table, column).unwrap();
    let len = tables.history().len();

    assert!(tables.update_cell(table, column, 0, "12a").is_err());
    assert!(tables.update_cell(table, column, 5, "1").is_err());
    assert!(tables.set_default_value(table, column, "many").is_err());
    assert_eq!(tables.history().len(), len);
}
