use serde::Deserialize;

use crate::dialect::{self, Dialect};
use crate::error::SqltidyError;
use crate::taggers::FormatOptions;
use crate::unit::KeywordCase;

/// Formatting options plus the runner switches that the command line and
/// `sqltidy.toml` share. Keys missing from a config file keep their default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Mode {
    #[serde(alias = "dialect")]
    pub dialect_name: String,
    /// Spaces per indent level.
    pub indent_width: usize,
    pub keyword_case: KeywordCase,

    pub check: bool,
    pub diff: bool,
    /// Skip the token equivalence check.
    pub fast: bool,
    /// Glob patterns matched against entry names and full paths.
    pub exclude: Vec<String>,
    pub verbose: bool,
    pub quiet: bool,
    pub no_progressbar: bool,
    pub no_color: bool,
    pub force_color: bool,
    /// Worker threads; 0 lets rayon use every core.
    pub threads: usize,
    pub single_process: bool,
}

impl Mode {
    /// Create the dialect for the configured dialect_name.
    pub fn dialect(&self) -> Result<Box<dyn Dialect>, SqltidyError> {
        dialect::dialect_from_name(&self.dialect_name)
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            keyword_case: self.keyword_case,
        }
    }

    /// The string written once per indent level.
    pub fn indent(&self) -> String {
        " ".repeat(self.indent_width)
    }

    /// `--force-color` wins over both `--no-color` and `NO_COLOR`.
    pub fn color(&self) -> bool {
        self.force_color || !(self.no_color || std::env::var_os("NO_COLOR").is_some())
    }

    /// Re-lex the output only when it is about to be written back.
    pub fn should_safety_check(&self) -> bool {
        !(self.fast || self.check || self.diff)
    }

    pub fn show_progress(&self) -> bool {
        !self.no_progressbar && !self.quiet
    }

    /// Extensions picked up when walking directories.
    pub fn sql_extensions(&self) -> &[&str] {
        &["sql", "ddl", "dml", "pls", "pks", "pkb"]
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            dialect_name: "standard".to_string(),
            indent_width: 4,
            keyword_case: KeywordCase::default(),
            check: false,
            diff: false,
            fast: false,
            exclude: Vec::new(),
            verbose: false,
            quiet: false,
            no_progressbar: false,
            no_color: false,
            force_color: false,
            threads: 0,
            single_process: false,
        }
    }
}
