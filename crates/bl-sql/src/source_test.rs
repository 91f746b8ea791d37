use super::*;

#[test]
fn test_plain_select_has_no_placeholders() {
    let q = SourceQuery::inspect("  SELECT user_id, name FROM users_work  ").unwrap();
    assert_eq!(q.sql(), "SELECT user_id, name FROM users_work");
    assert_eq!(q.placeholders(), 0);
}

#[test]
fn test_range_filter_has_two_placeholders() {
    let q = SourceQuery::inspect(
        "SELECT user_id, name FROM users_work WHERE row_seq BETWEEN ? AND ?",
    )
    .unwrap();
    assert_eq!(q.placeholders(), 2);
}

#[test]
fn test_placeholders_in_literals_and_comments_ignored() {
    let q = SourceQuery::inspect(
        "SELECT 'why?' AS q -- really?\nFROM t /* ? */ WHERE seq >= ? AND seq <= ?",
    )
    .unwrap();
    assert_eq!(q.placeholders(), 2);
}

#[test]
fn test_with_and_parenthesized_queries() {
    assert!(SourceQuery::inspect("WITH w AS (SELECT 1 AS a) SELECT a FROM w").is_ok());
    assert!(SourceQuery::inspect("(SELECT 1) UNION ALL (SELECT 2)").is_ok());
    assert!(SourceQuery::inspect("select lower_case from t").is_ok());
}

#[test]
fn test_leading_comment_allowed() {
    let q = SourceQuery::inspect("-- users feed\nSELECT 1").unwrap();
    assert_eq!(q.placeholders(), 0);
}

#[test]
fn test_rejects_non_query() {
    let err = SourceQuery::inspect("DELETE FROM users WHERE 1 = 1").unwrap_err();
    assert!(matches!(err, SqlError::NotAQuery(_)));
    assert!(err.to_string().contains("DELETE FROM users"));
}

#[test]
fn test_rejects_empty() {
    assert!(matches!(
        SourceQuery::inspect("   ").unwrap_err(),
        SqlError::EmptySql
    ));
    assert!(matches!(
        SourceQuery::inspect("-- nothing here").unwrap_err(),
        SqlError::EmptySql
    ));
}

#[test]
fn test_unterminated_literal_is_tokenize_error() {
    let err = SourceQuery::inspect("SELECT 'oops FROM t").unwrap_err();
    assert!(matches!(err, SqlError::Tokenize(_)));
}
