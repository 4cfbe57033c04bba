//! Closed word lists used to keep SQL syntax out of extracted references.

use std::collections::HashSet;
use std::sync::LazyLock;

const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "JOIN", "LEFT", "RIGHT", "INNER", "OUTER", "ON",
    "AS", "IN", "NOT", "NULL", "IS", "LIKE", "BETWEEN", "EXISTS", "GROUP", "BY", "ORDER",
    "HAVING", "LIMIT", "OFFSET", "ASC", "DESC", "INSERT", "INTO", "VALUES", "UPDATE", "SET",
    "DELETE", "CREATE", "ALTER", "DROP", "TABLE", "INDEX", "VIEW", "DISTINCT", "ALL", "CASE",
    "WHEN", "THEN", "ELSE", "END", "UNION", "WITH", "OVER", "PARTITION", "TRUE", "FALSE",
    "INTERVAL", "CURRENT_DATE", "CURRENT_TIMESTAMP", "IF", "TRUNCATE",
];

const SQL_FUNCTIONS: &[&str] = &[
    "COUNT", "SUM", "AVG", "MIN", "MAX", "COALESCE", "NULLIF", "CAST", "CONCAT", "LOWER",
    "UPPER", "TRIM", "LENGTH", "SUBSTRING", "REPLACE", "DATE_TRUNC", "NOW", "EXTRACT",
    "TO_CHAR", "TO_DATE", "ROUND", "FLOOR", "CEIL", "ABS", "ROW_NUMBER", "RANK", "DENSE_RANK",
    "LAG", "LEAD", "DATE", "YEAR", "MONTH", "DAY",
];

static KEYWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| SQL_KEYWORDS.iter().copied().collect());

static FUNCTION_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| SQL_FUNCTIONS.iter().copied().collect());

/// Case-insensitive membership in the keyword list.
pub fn is_sql_keyword(word: &str) -> bool {
    KEYWORD_SET.contains(word.to_ascii_uppercase().as_str())
}

/// Case-insensitive membership in the built-in function list.
pub fn is_sql_function(word: &str) -> bool {
    FUNCTION_SET.contains(word.to_ascii_uppercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_case_insensitive() {
        assert!(is_sql_keyword("select"));
        assert!(is_sql_keyword("Where"));
        assert!(!is_sql_keyword("users"));
    }

    #[test]
    fn test_functions() {
        assert!(is_sql_function("count"));
        assert!(is_sql_function("DATE_TRUNC"));
        assert!(!is_sql_function("email"));
        assert!(!is_sql_keyword("count"));
    }
}
