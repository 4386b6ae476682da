use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::dump::dump;
use crate::error::{Result, SqltidyError};
use crate::lexer::tokenize;
use crate::mode::Mode;
use crate::pipeline::Pipeline;
use crate::queue::WorkQueue;
use crate::render::render;
use crate::report::{FileResult, Report};
use crate::token::Token;

/// Tokenize, classify and format `source`, returning the annotated queue.
pub fn format_queue(source: &str, mode: &Mode) -> Result<WorkQueue> {
    let dialect = mode.dialect()?;
    let pipeline = Pipeline::for_dialect(dialect.as_ref(), mode.format_options())?;
    let mut queue = WorkQueue::from_tokens(tokenize(source, dialect.as_ref())?);
    pipeline.run(&mut queue);
    Ok(queue)
}

/// Format `source` and render it, re-lexing the result first when the mode
/// asks for the equivalence check.
pub fn format_string(source: &str, mode: &Mode) -> Result<String> {
    let queue = format_queue(source, mode)?;
    let result = render(&queue, &mode.indent());

    if mode.should_safety_check() {
        safety_check(source, &result, mode)?;
    }

    Ok(result)
}

/// The classification listing for `source`, headed with `file_name`.
pub fn dump_string(source: &str, mode: &Mode, file_name: &str) -> Result<String> {
    let queue = format_queue(source, mode)?;
    Ok(dump(&queue, &mode.dialect_name, file_name))
}

/// Format every SQL file under `files`, in parallel unless the mode says
/// otherwise.
pub fn run(files: &[PathBuf], mode: &Mode) -> Report {
    let matching_paths = get_matching_paths(files, mode);
    let mut report = Report::new(mode.check || mode.diff);
    log::debug!("{} matching file(s)", matching_paths.len());

    let progress = if mode.show_progress() && matching_paths.len() > 1 {
        progress_bar(matching_paths.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let format_one = |path: &PathBuf| {
        let result = format_file(path, mode);
        progress.inc(1);
        result
    };

    let results: Vec<FileResult> = if mode.single_process || matching_paths.len() <= 1 {
        matching_paths.iter().map(format_one).collect()
    } else {
        use rayon::prelude::*;

        // rayon default when zero: all available cores
        match rayon::ThreadPoolBuilder::new()
            .num_threads(mode.threads)
            .build()
        {
            Ok(pool) => pool.install(|| matching_paths.par_iter().map(format_one).collect()),
            Err(e) => {
                log::warn!("falling back to a single thread: {}", e);
                matching_paths.iter().map(format_one).collect()
            }
        }
    };
    progress.finish_and_clear();

    for result in results {
        report.add(result);
    }
    report
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {wide_msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Read, format and then write back, diff or only report one file.
fn format_file(path: &Path, mode: &Mode) -> FileResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => return FileResult::error(path, format!("Read error: {}", e)),
    };
    let formatted = match format_string(&source, mode) {
        Ok(f) => f,
        Err(e) => return FileResult::error(path, e.to_string()),
    };

    if formatted == source {
        FileResult::unchanged(path)
    } else if mode.diff {
        if let Err(e) = print_diff(path, &source, &formatted, mode.color()) {
            log::warn!("could not print diff for {}: {}", path.display(), e);
        }
        FileResult::changed(path)
    } else if mode.check {
        FileResult::changed(path)
    } else {
        std::fs::write(path, &formatted).map_or_else(
            |e| FileResult::error(path, format!("Write error: {}", e)),
            |()| FileResult::changed(path),
        )
    }
}

/// Expand files and directories into the sorted, de-duplicated list of SQL
/// files to format. Hidden entries below a directory are skipped.
pub fn get_matching_paths(paths: &[PathBuf], mode: &Mode) -> Vec<PathBuf> {
    let extensions = mode.sql_extensions();
    let exclude = compile_excludes(&mode.exclude);
    let wanted = |path: &Path| is_sql_file(path, extensions) && !is_excluded(path, &exclude);

    let mut found = BTreeSet::new();
    let mut pending: Vec<PathBuf> = Vec::new();
    for path in paths {
        if path.is_dir() {
            pending.push(path.clone());
        } else if path.is_file() && wanted(path) {
            found.insert(path.clone());
        }
    }

    while let Some(dir) = pending.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("cannot read {}: {}", dir.display(), e);
                continue;
            }
        };
        for path in entries.flatten().map(|entry| entry.path()) {
            if is_hidden(&path) || is_excluded(&path, &exclude) {
                continue;
            }
            if path.is_dir() {
                pending.push(path);
            } else if is_sql_file(&path, extensions) {
                found.insert(path);
            }
        }
    }

    found.into_iter().collect()
}

fn compile_excludes(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|pattern| {
            glob::Pattern::new(pattern)
                .map_err(|e| log::warn!("ignoring exclude pattern {:?}: {}", pattern, e))
                .ok()
        })
        .collect()
}

fn is_sql_file(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// Patterns match either the entry name or its whole path.
fn is_excluded(path: &Path, exclude: &[glob::Pattern]) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy());
    exclude.iter().any(|pattern| {
        name.as_deref().is_some_and(|n| pattern.matches(n)) || pattern.matches_path(path)
    })
}

/// Re-lex the output and require the same token sequence as the source,
/// ignoring keyword case.
fn safety_check(original: &str, formatted: &str, mode: &Mode) -> Result<()> {
    let dialect = mode.dialect()?;
    let before = tokenize(original, dialect.as_ref())?;
    let after = tokenize(formatted, dialect.as_ref())
        .map_err(|e| SqltidyError::Equivalence(format!("formatted output does not lex: {}", e)))?;

    if let Some(i) = before
        .iter()
        .zip(after.iter())
        .position(|(a, b)| !same_token(a, b))
    {
        let (a, b) = (&before[i], &after[i]);
        return Err(SqltidyError::Equivalence(format!(
            "token {} changed from {} {:?} to {} {:?}",
            i,
            a.kind.name(),
            a.text.as_str(),
            b.kind.name(),
            b.text.as_str()
        )));
    }
    if before.len() != after.len() {
        return Err(SqltidyError::Equivalence(format!(
            "source has {} tokens but the output has {}",
            before.len(),
            after.len()
        )));
    }
    Ok(())
}

fn same_token(a: &Token, b: &Token) -> bool {
    a.kind == b.kind && a.text.eq_ignore_ascii_case(&b.text)
}

/// Unified-style line diff on stderr.
fn print_diff(path: &Path, original: &str, formatted: &str, color: bool) -> std::io::Result<()> {
    use similar::{ChangeTag, TextDiff};

    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let stream = StandardStream::stderr(choice);
    let mut out = stream.lock();

    writeln!(out, "--- {}", path.display())?;
    writeln!(out, "+++ {}", path.display())?;

    let diff = TextDiff::from_lines(original, formatted);
    for change in diff.iter_all_changes() {
        let (sign, fg) = match change.tag() {
            ChangeTag::Delete => ("-", Some(Color::Red)),
            ChangeTag::Insert => ("+", Some(Color::Green)),
            ChangeTag::Equal => (" ", None),
        };
        out.set_color(ColorSpec::new().set_fg(fg))?;
        write!(out, "{}{}", sign, change)?;
        if change.missing_newline() {
            writeln!(out)?;
        }
        out.reset()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::KeywordCase;

    #[test]
    fn test_format_simple_statement() {
        let mode = Mode::default();
        let result = format_string("create table t (x int);", &mode).unwrap();
        assert_eq!(result, "create table t ( x int ) ;\n");
    }

    #[test]
    fn test_blank_input_renders_empty() {
        assert_eq!(format_string("\n  \n", &Mode::default()).unwrap(), "");
    }

    #[test]
    fn test_keyword_case_passes_safety_check() {
        let mode = Mode {
            keyword_case: KeywordCase::Upper,
            ..Mode::default()
        };
        let result = format_string("select a from t;", &mode).unwrap();
        assert_eq!(result, "SELECT a\nFROM t ;\n");
    }

    #[test]
    fn test_lex_error_is_reported() {
        let err = format_string("SELECT 'open", &Mode::default()).unwrap_err();
        assert!(matches!(err, SqltidyError::Parsing { line: 1, .. }));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let extensions = &["sql", "pks", "ddl"];
        assert!(is_sql_file(Path::new("PKG.PKS"), extensions));
        assert!(is_sql_file(Path::new("dir/create.ddl"), extensions));
        assert!(!is_sql_file(Path::new("notes.txt"), extensions));
        assert!(!is_sql_file(Path::new("mysql"), extensions));
    }

    #[test]
    fn test_exclude_matches_name_or_path() {
        let exclude = compile_excludes(&["tmp_*".to_string(), "*/vendor/*".to_string()]);
        assert!(is_excluded(Path::new("db/tmp_load.sql"), &exclude));
        assert!(is_excluded(Path::new("db/vendor/x.sql"), &exclude));
        assert!(!is_excluded(Path::new("db/load.sql"), &exclude));
    }

    #[test]
    fn test_safety_check_detects_lost_token() {
        let err = safety_check("SELECT a, b;", "SELECT a b;", &Mode::default()).unwrap_err();
        assert!(matches!(err, SqltidyError::Equivalence(_)));
    }

    #[test]
    fn test_dump_string_header() {
        let text = dump_string("DROP t;", &Mode::default(), "-").unwrap();
        assert!(text.starts_with("Parsed\nInputFile   -\nDialect     standard\n\n"));
    }
}
