use super::*;
use bl_core::EntityId;

fn orders() -> TableEntity {
    TableEntity::new(
        EntityId::try_new("orders").unwrap(),
        "sales.orders",
        vec!["id".to_string(), "total".to_string()],
        vec!["id".to_string()],
    )
    .unwrap()
}

#[test]
fn test_truncate_db2_is_immediate() {
    assert_eq!(
        truncate_table(Dialect::Db2, &orders()),
        "TRUNCATE TABLE sales.orders IMMEDIATE"
    );
}

#[test]
fn test_truncate_other_dialects() {
    for dialect in [
        Dialect::Oracle,
        Dialect::H2,
        Dialect::SqlServer,
        Dialect::PostgreSql,
    ] {
        let sql = truncate_table(dialect, &orders());
        assert_eq!(sql, "TRUNCATE TABLE sales.orders", "{dialect}");
        assert!(!sql.contains("IMMEDIATE"));
    }
}

#[test]
fn test_only_db2_needs_rollback_before_truncate() {
    for dialect in Dialect::ALL {
        assert_eq!(
            dialect.truncate_requires_rollback(),
            dialect == Dialect::Db2
        );
    }
}

#[test]
fn test_delete_all() {
    assert_eq!(delete_all(&orders()), "DELETE FROM sales.orders");
}
