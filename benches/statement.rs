use backup_stmt::constructs::{AnalysisContext, Validatable};
use backup_stmt::sql::{parse_statement, Statement};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const STATEMENT: &str = "BACKUP SNAPSHOT example_db.snapshot_label
TO example_repo
ON (
    example_tbl PARTITION (p1, p2),
    example_tbl2,
    other_db.example_tbl3
)
PROPERTIES (\"type\" = \"incremental\", \"timeout\" = \"3600\")";

fn parse(c: &mut Criterion) {
    c.bench_function("parse backup snapshot", |b| {
        b.iter(|| parse_statement(black_box(STATEMENT)))
    });
}

fn validate_and_render(c: &mut Criterion) {
    let context = AnalysisContext::default();
    let statement = match parse_statement(STATEMENT) {
        Ok(statement) => statement,
        Err(error) => panic!("{}", error),
    };
    c.bench_function("validate and render backup snapshot", |b| {
        b.iter(|| {
            let mut statement = statement.clone();
            statement.validate(&context).ok();
            let Statement::Backup(backup) = &statement;
            backup.render()
        })
    });
}

criterion_group!(benches, parse, validate_and_render);
criterion_main!(benches);
