use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tablr::manager::TableManager;

/// A table with `rows` rows, then one cell edit per row.
fn build_history(rows: usize) -> TableManager {
    let mut tables = TableManager::new();
    let table = tables.add_table();
    let name = tables.add_column(table).unwrap();
    let age = tables.add_column(table).unwrap();
    tables.change_type(table, age).unwrap();
    tables.change_type(table, age).unwrap();

    for i in 0..rows {
        tables.add_row(table).unwrap();
        tables
            .update_cell(table, name, i, &format!("person {}", i))
            .unwrap();
    }
    tables
}

fn benchmark_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_replay");

    for rows in [100, 1_000, 5_000] {
        group.bench_function(format!("undo_redo_all_{}_rows", rows), |b| {
            b.iter_batched(
                || build_history(rows),
                |mut tables| {
                    while tables.undo() {}
                    while tables.redo() {}
                    black_box(tables.history().len())
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.bench_function("type_change_1000_rows", |b| {
        b.iter_batched(
            || build_history(1_000),
            |mut tables| {
                let table = tables.store().tables()[0].id();
                let column = tables.store().tables()[0].columns()[0].id();
                for _ in 0..3 {
                    tables.change_type(table, column).unwrap();
                }
                black_box(tables.undo())
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, benchmark_undo_redo);
criterion_main!(benches);
