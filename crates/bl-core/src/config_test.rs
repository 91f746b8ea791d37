use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: JobConfig = serde_yaml::from_str("name: nightly").unwrap();
    assert_eq!(config.name, "nightly");
    assert_eq!(config.database.path, ":memory:");
    assert!(config.database.url.is_none());
    assert!(config.steps.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: nightly_users
database:
  path: ./warehouse.duckdb
  url: "jdbc:postgresql://db/warehouse"
entities:
  users:
    table: app.users
    columns: [user_id, name]
    keys: [user_id]
queries:
  users_from_work: SELECT user_id, name FROM staging.users_work
steps:
  - name: load_users
    kind: replace
    target: users
    query: users_from_work
    chunk:
      size: 5000
      watermark: users_work
    clean: truncate
  - name: merge_users
    kind: merge
    target: users
    query: users_from_work
    join_columns: [user_id]
targets:
  prod:
    database:
      path: /data/prod.duckdb
"#;
    let config: JobConfig = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();

    assert_eq!(config.steps.len(), 2);
    let load = config.get_step("load_users").unwrap();
    assert_eq!(load.kind, StepKind::Replace);
    assert_eq!(load.clean_mode(), CleanMode::Truncate);
    assert_eq!(load.insert_mode(), InsertMode::Normal);
    let chunk = load.chunk.as_ref().unwrap();
    assert_eq!(chunk.size, Some(5000));
    assert_eq!(chunk.watermark.as_deref(), Some("users_work"));
    assert_eq!(chunk.sequence_column, "row_seq");

    let merge = config.get_step("merge_users").unwrap();
    assert_eq!(merge.kind, StepKind::Merge);
    assert_eq!(merge.join_columns, vec!["user_id"]);
    assert!(merge.chunk.is_none());
}

#[test]
fn test_step_defaults() {
    let yaml = "name: s\nkind: replace\n";
    let step: StepConfig = serde_yaml::from_str(yaml).unwrap();
    assert!(step.target.is_none());
    assert!(step.query.is_none());
    assert_eq!(step.clean_mode(), CleanMode::Delete);
    assert_eq!(step.insert_mode(), InsertMode::Normal);
}

#[test]
fn test_insert_mode_direct_path() {
    let yaml = "name: s\nkind: replace\ninsert_mode: direct_path\n";
    let step: StepConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(step.insert_mode(), InsertMode::DirectPath);
}

#[test]
fn test_unknown_step_kind_rejected() {
    let yaml = "name: s\nkind: upsert\n";
    assert!(serde_yaml::from_str::<StepConfig>(yaml).is_err());
}

#[test]
fn test_unknown_field_rejected() {
    let yaml = "name: j\nstepz: []\n";
    assert!(serde_yaml::from_str::<JobConfig>(yaml).is_err());
}

#[test]
fn test_duplicate_step_names() {
    let yaml = r#"
name: j
steps:
  - name: a
    kind: replace
  - name: a
    kind: merge
"#;
    let config: JobConfig = serde_yaml::from_str(yaml).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, CoreError::DuplicateStep { .. }));
    assert!(err.to_string().contains("'a'"));
}

#[test]
fn test_empty_job_name() {
    let config: JobConfig = serde_yaml::from_str("name: '  '").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_target_override() {
    let yaml = r#"
name: j
database:
  path: dev.duckdb
targets:
  prod:
    database:
      path: prod.duckdb
      url: "jdbc:oracle:thin:@prod:1521/ORCL"
  empty: {}
"#;
    let config: JobConfig = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(config.get_database_config(None).unwrap().path, "dev.duckdb");

    let prod = config.get_database_config(Some("prod")).unwrap();
    assert_eq!(prod.path, "prod.duckdb");
    assert_eq!(
        prod.url.as_deref(),
        Some("jdbc:oracle:thin:@prod:1521/ORCL")
    );

    let empty = config.get_database_config(Some("empty")).unwrap();
    assert_eq!(empty.path, "dev.duckdb");

    let err = config.get_database_config(Some("qa")).unwrap_err();
    assert!(err.to_string().contains("Available targets: empty, prod"));
}

#[test]
fn test_load_missing_file() {
    let err = JobConfig::load(Path::new("/definitely/not/here.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_parse_error_names_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bulkline.yml");
    std::fs::write(&path, "name: [unclosed").unwrap();
    let err = JobConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("bulkline.yml"));
}
