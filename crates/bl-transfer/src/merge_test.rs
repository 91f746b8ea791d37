use super::*;
use crate::error::TransferError;
use crate::progress::{MemorySink, Progress};
use crate::test_utils::{count_users, registries, seed, step};
use bl_db::DuckDbBackend;

const SINGLE: &str = r#"
name: upsert
kind: merge
target: users
query: all_work
join_columns: [user_id]
"#;

const CHUNKED: &str = r#"
name: upsert
kind: merge
target: users
query: window_work
join_columns: [user_id]
chunk:
  size: 2
  watermark: users_work
"#;

fn plan(yaml: &str, dialect: Dialect) -> TransferResult<MergeStep> {
    let (entities, queries) = registries();
    let catalogs = Catalogs {
        entities: &entities,
        queries: &queries,
    };
    MergeStep::plan("nightly", &step(yaml), dialect, catalogs)
}

#[test]
fn test_missing_join_columns() {
    let yaml = SINGLE.replace("join_columns: [user_id]\n", "");
    let err = plan(&yaml, Dialect::Oracle).unwrap_err();
    assert!(matches!(
        &err,
        TransferError::Core(CoreError::MissingField { field, .. }) if field == "join_columns"
    ));
    assert!(err.to_string().contains("upsert"));
}

#[test]
fn test_missing_target_checked_first() {
    let yaml = "name: upsert\nkind: merge\nquery: all_work";
    let err = plan(yaml, Dialect::Oracle).unwrap_err();
    assert!(err.to_string().contains("'target'"));
}

#[test]
fn test_join_column_must_be_target_column() {
    let yaml = SINGLE.replace("[user_id]", "[email]");
    let err = plan(&yaml, Dialect::Oracle).unwrap_err();
    assert!(matches!(
        &err,
        TransferError::InvalidJoinColumns { table, .. } if table == "users"
    ));
    assert!(err.is_configuration());
    let message = err.to_string();
    assert!(message.contains("job 'nightly', step 'upsert'"));
    assert!(message.contains("'email' is not a column"));
}

#[test]
fn test_unmapped_target_names_step() {
    let yaml = SINGLE.replace("target: users", "target: customers");
    let err = plan(&yaml, Dialect::Oracle).unwrap_err();
    assert!(matches!(
        &err,
        TransferError::UnmappedEntity { field, .. } if *field == "target"
    ));
    assert!(err.to_string().contains("job 'nightly', step 'upsert'"));
}

#[test]
fn test_replace_only_options_rejected() {
    for extra in ["insert_mode: direct_path\n", "clean: truncate\n", "clean: delete\n"] {
        let err = plan(&format!("{SINGLE}{extra}"), Dialect::Oracle).unwrap_err();
        assert!(
            matches!(
                err,
                TransferError::Core(CoreError::IncompatibleOptions { .. })
            ),
            "{extra}"
        );
    }
    assert!(plan(&format!("{SINGLE}clean: none\n"), Dialect::Oracle).is_ok());
}

#[test]
fn test_statement_per_dialect() {
    let oracle = plan(SINGLE, Dialect::Oracle).unwrap();
    assert!(oracle.statement().sql.starts_with("MERGE INTO users tgt\n"));
    assert!(oracle
        .statement()
        .sql
        .contains("WHEN MATCHED THEN UPDATE SET tgt.name = src.name\n"));

    let h2 = plan(SINGLE, Dialect::H2).unwrap();
    assert!(h2.statement().sql.starts_with("MERGE INTO users (user_id, name)\nKEY (user_id)"));

    let pg = plan(SINGLE, Dialect::PostgreSql).unwrap();
    assert!(pg
        .statement()
        .sql
        .ends_with("ON CONFLICT (user_id) DO UPDATE SET name = excluded.name"));

    let mssql = plan(SINGLE, Dialect::SqlServer).unwrap();
    assert!(mssql.statement().sql.ends_with(';'));
    assert_eq!(mssql.statements().len(), 1);
}

#[test]
fn test_set_clause_excludes_join_column() {
    let step = plan(SINGLE, Dialect::PostgreSql).unwrap();
    assert_eq!(step.merge_plan().update_columns, vec!["name"]);
    let set = step.statement().sql.split("SET ").nth(1).unwrap().to_string();
    assert!(!set.contains("user_id"), "{set}");
}

#[tokio::test]
async fn test_merge_updates_and_inserts() {
    let db = DuckDbBackend::in_memory().unwrap();
    seed(&db, true, &[3], 5).await;
    let sink = MemorySink::new();

    let outcome = plan(SINGLE, Dialect::PostgreSql)
        .unwrap()
        .process(&db, &sink)
        .await
        .unwrap();
    assert_eq!(outcome.status, CompletionStatus::Success);
    assert_eq!(outcome.rows_cleaned, None);
    assert_eq!(outcome.windows, 0);

    assert_eq!(count_users(&db, "true").await, 5);
    assert_eq!(count_users(&db, "user_id = 3 AND name = 'work_3'").await, 1);
    assert_eq!(count_users(&db, "name LIKE 'old_%'").await, 0);
    assert!(matches!(
        sink.records().as_slice(),
        [r] if matches!(r.progress, Progress::Completed { .. })
    ));
}

#[tokio::test]
async fn test_merge_leaves_unmatched_target_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    seed(&db, true, &[42], 3).await;
    let sink = MemorySink::new();

    plan(SINGLE, Dialect::PostgreSql)
        .unwrap()
        .process(&db, &sink)
        .await
        .unwrap();
    assert_eq!(count_users(&db, "true").await, 4);
    assert_eq!(count_users(&db, "user_id = 42 AND name = 'old_42'").await, 1);
}

#[tokio::test]
async fn test_chunked_merge() {
    let db = DuckDbBackend::in_memory().unwrap();
    seed(&db, true, &[3], 5).await;
    let sink = MemorySink::new();

    let outcome = plan(CHUNKED, Dialect::PostgreSql)
        .unwrap()
        .process(&db, &sink)
        .await
        .unwrap();
    assert_eq!(outcome.windows, 3);

    db.rollback().await.unwrap();
    assert_eq!(count_users(&db, "true").await, 5);
}
