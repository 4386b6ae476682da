use crate::error::SqltidyError;

/// How a procedural block (function, procedure, trigger or package body)
/// is terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTerminator {
    /// The block runs until a dialect delimiter token (`/`, `GO`) or the end
    /// of input. Semicolons inside the body never close it.
    Delimiter,
    /// The block closes at the first `;` outside any parenthesis and
    /// BEGIN/END nesting. A delimiter token also closes it.
    Semicolon,
}

/// A SQL dialect defines the lexical and statement-termination rules for a
/// specific SQL variant.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    fn block_terminator(&self) -> BlockTerminator {
        BlockTerminator::Semicolon
    }

    /// Keywords that open an anonymous procedural block at a statement boundary.
    fn anonymous_block_keywords(&self) -> &'static [&'static str] {
        &[]
    }

    /// `#` starts a line comment.
    fn hash_comments(&self) -> bool {
        false
    }

    /// `` `name` `` is a quoted identifier.
    fn backtick_names(&self) -> bool {
        false
    }

    /// `[name]` is a quoted identifier.
    fn bracket_names(&self) -> bool {
        false
    }

    /// Backslash escapes the next character inside string literals.
    fn backslash_escapes(&self) -> bool {
        false
    }

    /// `$tag$ ... $tag$` bodies.
    fn dollar_quoting(&self) -> bool {
        false
    }

    /// `/* /* */ */` nests.
    fn nested_block_comments(&self) -> bool {
        false
    }

    /// A line holding only `/` is a delimiter (SQL*Plus).
    fn slash_delimiter(&self) -> bool {
        false
    }

    /// A line holding only `GO` is a batch delimiter.
    fn go_delimiter(&self) -> bool {
        false
    }

    /// The client-side `DELIMITER <token>` directive.
    fn delimiter_directive(&self) -> bool {
        false
    }
}

/// ANSI-flavoured SQL with no vendor extensions.
pub struct Standard;

impl Dialect for Standard {
    fn name(&self) -> &'static str {
        "standard"
    }
}

pub struct PostgreSql;

impl Dialect for PostgreSql {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn anonymous_block_keywords(&self) -> &'static [&'static str] {
        &["DO"]
    }

    fn dollar_quoting(&self) -> bool {
        true
    }

    fn nested_block_comments(&self) -> bool {
        true
    }
}

pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn backtick_names(&self) -> bool {
        true
    }

    fn bracket_names(&self) -> bool {
        true
    }
}

pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn hash_comments(&self) -> bool {
        true
    }

    fn backtick_names(&self) -> bool {
        true
    }

    fn backslash_escapes(&self) -> bool {
        true
    }

    fn delimiter_directive(&self) -> bool {
        true
    }
}

/// MariaDB: same lexical rules as MySQL.
pub struct MariaDb;

impl Dialect for MariaDb {
    fn name(&self) -> &'static str {
        "mariadb"
    }

    fn hash_comments(&self) -> bool {
        true
    }

    fn backtick_names(&self) -> bool {
        true
    }

    fn backslash_escapes(&self) -> bool {
        true
    }

    fn delimiter_directive(&self) -> bool {
        true
    }
}

/// T-SQL. Procedure bodies run to the end of the batch.
pub struct MsSql;

impl Dialect for MsSql {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn block_terminator(&self) -> BlockTerminator {
        BlockTerminator::Delimiter
    }

    fn bracket_names(&self) -> bool {
        true
    }

    fn go_delimiter(&self) -> bool {
        true
    }
}

/// Oracle SQL and PL/SQL as run by SQL*Plus.
pub struct Oracle;

impl Dialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn block_terminator(&self) -> BlockTerminator {
        BlockTerminator::Delimiter
    }

    fn anonymous_block_keywords(&self) -> &'static [&'static str] {
        &["DECLARE", "BEGIN"]
    }

    fn slash_delimiter(&self) -> bool {
        true
    }
}

/// Names accepted by `dialect_from_name`.
pub const DIALECT_NAMES: &[&str] = &[
    "mariadb",
    "mssql",
    "mysql",
    "oracle",
    "postgresql",
    "sqlite",
    "standard",
];

/// Create a dialect from a string name.
pub fn dialect_from_name(name: &str) -> Result<Box<dyn Dialect>, SqltidyError> {
    match name.to_ascii_lowercase().as_str() {
        "standard" => Ok(Box::new(Standard)),
        "postgresql" | "postgres" => Ok(Box::new(PostgreSql)),
        "sqlite" => Ok(Box::new(Sqlite)),
        "mysql" => Ok(Box::new(MySql)),
        "mariadb" => Ok(Box::new(MariaDb)),
        "mssql" | "tsql" => Ok(Box::new(MsSql)),
        "oracle" => Ok(Box::new(Oracle)),
        _ => Err(SqltidyError::Config(format!("Unknown dialect: {}", name))),
    }
}
