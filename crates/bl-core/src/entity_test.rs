use super::*;

fn id(name: &str) -> EntityId {
    EntityId::try_new(name).unwrap()
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_table_entity_accessors() {
    let entity = TableEntity::new(
        id("users"),
        "app.users",
        cols(&["user_id", "name", "email"]),
        cols(&["user_id"]),
    )
    .unwrap();

    assert_eq!(entity.table, "app.users");
    assert_eq!(entity.columns, cols(&["user_id", "name", "email"]));
    assert!(entity.is_key("USER_ID"));
    assert!(!entity.is_key("name"));
}

#[test]
fn test_table_entity_rejects_empty_columns() {
    let err = TableEntity::new(id("empty"), "t", vec![], vec![]).unwrap_err();
    assert!(err.to_string().contains("declares no columns"));
}

#[test]
fn test_table_entity_rejects_duplicate_columns() {
    let err = TableEntity::new(id("dup"), "t", cols(&["a", "A"]), vec![]).unwrap_err();
    assert!(err.to_string().contains("twice"));
}

#[test]
fn test_table_entity_rejects_foreign_key_column() {
    let err = TableEntity::new(id("users"), "t", cols(&["a", "b"]), cols(&["c"])).unwrap_err();
    assert!(err.to_string().contains("Key column 'c'"));
}

#[test]
fn test_table_entity_rejects_bad_identifiers() {
    assert!(TableEntity::new(id("x"), "bad table", cols(&["a"]), vec![]).is_err());
    assert!(TableEntity::new(id("x"), "t", cols(&["a;--"]), vec![]).is_err());
}

#[test]
fn test_registry_resolve() {
    let yaml = r#"
users:
  table: app.users
  columns: [user_id, name]
  keys: [user_id]
users_work:
  table: staging.users_work
  columns: [row_seq, user_id, name]
"#;
    let defs: BTreeMap<EntityId, EntityDef> = serde_yaml::from_str(yaml).unwrap();
    let registry = EntityRegistry::from_defs(&defs).unwrap();

    assert_eq!(registry.len(), 2);
    let users = registry.resolve("users").unwrap();
    assert_eq!(users.table, "app.users");
    assert_eq!(users.columns, vec!["user_id", "name"]);

    let work = registry.resolve("users_work").unwrap();
    assert!(work.keys.is_empty());
}

#[test]
fn test_registry_unmapped_entity() {
    let registry = EntityRegistry::default();
    assert!(registry.is_empty());
    let err = registry.resolve("com.acme.Invoice").unwrap_err();
    assert!(matches!(err, CoreError::UnmappedEntity { .. }));
    assert!(err.to_string().contains("com.acme.Invoice"));
}

#[test]
fn test_entity_def_rejects_unknown_fields() {
    let yaml = "table: t\ncolumns: [a]\nprimary: [a]\n";
    assert!(serde_yaml::from_str::<EntityDef>(yaml).is_err());
}

#[test]
fn test_entity_id_rejects_empty() {
    assert!(EntityId::try_new("").is_none());
    assert!(serde_yaml::from_str::<EntityId>("''").is_err());
}
