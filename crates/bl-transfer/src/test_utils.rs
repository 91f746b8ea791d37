//! Shared fixtures for unit tests

use bl_core::{EntityDef, EntityId, EntityRegistry, QueryId, QueryRegistry, StepConfig};
use bl_db::{Database, DuckDbBackend};
use std::collections::BTreeMap;

pub(crate) const ALL_WORK: &str = "SELECT user_id, name FROM users_work ORDER BY row_seq";
pub(crate) const WINDOW_WORK: &str =
    "SELECT user_id, name FROM users_work WHERE row_seq BETWEEN ? AND ? ORDER BY row_seq";

/// Entities `users` (keyed on user_id) and `users_work`; queries
/// `all_work` and `window_work`.
pub(crate) fn registries() -> (EntityRegistry, QueryRegistry) {
    let mut defs = BTreeMap::new();
    defs.insert(
        EntityId::try_new("users").unwrap(),
        EntityDef {
            table: "users".to_string(),
            columns: vec!["user_id".to_string(), "name".to_string()],
            keys: vec!["user_id".to_string()],
        },
    );
    defs.insert(
        EntityId::try_new("users_work").unwrap(),
        EntityDef {
            table: "users_work".to_string(),
            columns: vec![
                "row_seq".to_string(),
                "user_id".to_string(),
                "name".to_string(),
            ],
            keys: vec![],
        },
    );
    let entities = EntityRegistry::from_defs(&defs).unwrap();

    let mut queries = QueryRegistry::default();
    queries.insert(QueryId::try_new("all_work").unwrap(), ALL_WORK);
    queries.insert(QueryId::try_new("window_work").unwrap(), WINDOW_WORK);
    (entities, queries)
}

pub(crate) fn step(yaml: &str) -> StepConfig {
    serde_yaml::from_str(yaml).unwrap()
}

/// Create `users` holding `existing` user ids and `users_work` holding
/// rows 1..=`work_rows` (user_id = row_seq), then commit.
pub(crate) async fn seed(db: &DuckDbBackend, primary_key: bool, existing: &[i64], work_rows: u64) {
    let key = if primary_key { " PRIMARY KEY" } else { "" };
    db.execute_batch(&format!(
        "CREATE TABLE users (user_id INTEGER{key}, name VARCHAR);
         CREATE TABLE users_work (row_seq BIGINT, user_id INTEGER, name VARCHAR);
         INSERT INTO users_work
             SELECT range + 1, range + 1, 'work_' || (range + 1) FROM range({work_rows});"
    ))
    .await
    .unwrap();
    for id in existing {
        db.execute(&format!("INSERT INTO users VALUES ({id}, 'old_{id}')"))
            .await
            .unwrap();
    }
    db.commit().await.unwrap();
}

/// Rows of `users` matching `predicate`
pub(crate) async fn count_users(db: &DuckDbBackend, predicate: &str) -> usize {
    db.query_count(&format!("SELECT * FROM users WHERE {predicate}"))
        .await
        .unwrap()
}
