use std::io::Write;
use std::path::{Path, PathBuf};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    /// Rewritten, or only reported when nothing is written.
    Changed,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl FileResult {
    pub fn unchanged(path: &Path) -> Self {
        Self::new(path, Outcome::Unchanged)
    }

    pub fn changed(path: &Path) -> Self {
        Self::new(path, Outcome::Changed)
    }

    pub fn error(path: &Path, message: impl Into<String>) -> Self {
        Self::new(path, Outcome::Failed(message.into()))
    }

    fn new(path: &Path, outcome: Outcome) -> Self {
        Self {
            path: path.to_path_buf(),
            outcome,
        }
    }

    /// The error message of a failed file.
    pub fn failure(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Per-outcome counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub unchanged: usize,
    pub changed: usize,
    pub failed: usize,
}

/// Results of one run over a set of files.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
    /// Nothing was written; changes are only reported.
    pub check_only: bool,
}

impl Report {
    pub fn new(check_only: bool) -> Self {
        Self {
            results: Vec::new(),
            check_only,
        }
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for result in &self.results {
            match result.outcome {
                Outcome::Unchanged => tally.unchanged += 1,
                Outcome::Changed => tally.changed += 1,
                Outcome::Failed(_) => tally.failed += 1,
            }
        }
        tally
    }

    pub fn has_errors(&self) -> bool {
        self.tally().failed > 0
    }

    pub fn has_changes(&self) -> bool {
        self.tally().changed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.results
            .iter()
            .filter_map(|r| r.failure().map(|message| (r.path.as_path(), message)))
    }

    /// One line such as `3 file(s) processed, 1 reformatted, 2 unchanged`;
    /// zero counts are left out.
    pub fn summary(&self) -> String {
        let tally = self.tally();
        let changed_verb = if self.check_only {
            "would be reformatted"
        } else {
            "reformatted"
        };
        let mut line = format!("{} file(s) processed", self.results.len());
        for (count, label) in [
            (tally.changed, changed_verb),
            (tally.unchanged, "unchanged"),
            (tally.failed, "error(s)"),
        ] {
            if count > 0 {
                line.push_str(&format!(", {} {}", count, label));
            }
        }
        line
    }

    /// Changed files (verbose only), every failure, then the summary, all
    /// on stderr.
    pub fn print(&self, verbose: bool, color: bool) -> std::io::Result<()> {
        let choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);

        for result in &self.results {
            let (tag, color_spec, detail) = match &result.outcome {
                Outcome::Changed if verbose => (
                    "reformatted",
                    ColorSpec::new().set_fg(Some(Color::Yellow)).clone(),
                    None,
                ),
                Outcome::Failed(message) => (
                    "error",
                    ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true).clone(),
                    Some(message.as_str()),
                ),
                _ => continue,
            };
            stderr.set_color(&color_spec)?;
            write!(stderr, "{}", tag)?;
            stderr.reset()?;
            match detail {
                Some(message) => writeln!(stderr, ": {}: {}", result.path.display(), message)?,
                None => writeln!(stderr, " {}", result.path.display())?,
            }
        }
        writeln!(stderr, "{}", self.summary())
    }
}
