use phf::phf_set;

/// Words that are case-normalized when `keyword_case` is not `preserve`.
/// Lookups use the upper-cased word.
static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUTO_INCREMENT",
    "BEGIN", "BETWEEN", "BIGINT", "BODY", "BOOLEAN", "BY",
    "CASCADE", "CASE", "CHAR", "CHECK", "COLUMN", "COMMENT", "COMMIT",
    "CONSTRAINT", "CREATE", "CROSS", "CURSOR",
    "DATABASE", "DATE", "DECIMAL", "DECLARE", "DEFAULT", "DELETE", "DESC",
    "DISTINCT", "DO", "DROP",
    "ELSE", "ELSIF", "END", "EXCEPT", "EXCEPTION", "EXECUTE", "EXISTS",
    "FOR", "FOREIGN", "FROM", "FULL", "FUNCTION",
    "GRANT", "GROUP",
    "HAVING",
    "IF", "IN", "INDEX", "INNER", "INSERT", "INT", "INTEGER", "INTERSECT",
    "INTO", "IS",
    "JOIN",
    "KEY",
    "LANGUAGE", "LEFT", "LIKE", "LIMIT", "LOOP",
    "MERGE", "MINUS",
    "NATURAL", "NOT", "NULL", "NUMBER", "NUMERIC",
    "OF", "OFFSET", "ON", "OR", "ORDER", "OUTER",
    "PACKAGE", "PRIMARY", "PROCEDURE",
    "REFERENCES", "RENAME", "REPLACE", "RETURN", "RETURNING", "RETURNS",
    "REVOKE", "RIGHT", "ROLLBACK",
    "SCHEMA", "SELECT", "SEQUENCE", "SET", "SHOW", "SMALLINT",
    "TABLE", "TEXT", "THEN", "TIMESTAMP", "TO", "TRIGGER", "TRUNCATE",
    "TYPE",
    "UNION", "UNIQUE", "UPDATE", "USING",
    "VALUES", "VARCHAR", "VARCHAR2", "VIEW",
    "WHEN", "WHERE", "WHILE", "WITH",
};

pub fn is_keyword(word: &str) -> bool {
    if word.len() > 16 {
        return false;
    }
    KEYWORDS.contains(word.to_ascii_uppercase().as_str())
}
