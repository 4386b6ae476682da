use std::path::{Path, PathBuf};

use crate::error::SqltidyError;
use crate::mode::Mode;

const CONFIG_FILE_NAME: &str = "sqltidy.toml";
const PYPROJECT: &str = "pyproject.toml";

/// Load configuration for the given inputs.
///
/// An explicit `config_path` must exist. Otherwise the nearest
/// `sqltidy.toml`, or `pyproject.toml` with a `[tool.sqltidy]` table, found
/// walking up from the inputs is used, then the per-user config file. With
/// no file at all the defaults apply.
pub fn load_config(files: &[PathBuf], config_path: Option<&Path>) -> Result<Mode, SqltidyError> {
    let config_file = match config_path {
        Some(path) if !path.exists() => {
            return Err(SqltidyError::Config(format!(
                "config file {} does not exist",
                path.display()
            )))
        }
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(files).or_else(user_config_file),
    };

    match config_file {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            load_config_from_path(&path)
        }
        None => {
            log::debug!("no config file found, using defaults");
            Ok(Mode::default())
        }
    }
}

/// The first `sqltidy.toml`, or `pyproject.toml` that has a
/// `[tool.sqltidy]` table, in the directories around `files`.
fn find_config_file(files: &[PathBuf]) -> Option<PathBuf> {
    for parent in search_dirs(files) {
        let config = parent.join(CONFIG_FILE_NAME);
        if config.is_file() {
            return Some(config);
        }
        let pyproject = parent.join(PYPROJECT);
        if pyproject.is_file() && has_tool_section(&pyproject) {
            return Some(pyproject);
        }
    }
    None
}

/// `<user config dir>/sqltidy/sqltidy.toml`, when it exists.
fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("sqltidy").join(CONFIG_FILE_NAME);
    path.is_file().then_some(path)
}

fn has_tool_section(pyproject: &Path) -> bool {
    std::fs::read_to_string(pyproject)
        .map(|content| content.contains("[tool.sqltidy]"))
        .unwrap_or(false)
}

/// Directories to search, nearest first: each input's own directory and
/// then its ancestors, without repeats.
fn search_dirs(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for file in files {
        let start = if file.is_dir() {
            file.as_path()
        } else {
            match file.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            }
        };
        let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
        for dir in start.ancestors() {
            if !dirs.iter().any(|seen| seen == dir) {
                dirs.push(dir.to_path_buf());
            }
        }
    }
    dirs
}

/// Parse a config file into a Mode. `pyproject.toml` keeps its settings in
/// `[tool.sqltidy]`; any other file holds them at the top level.
fn load_config_from_path(path: &Path) -> Result<Mode, SqltidyError> {
    let content = std::fs::read_to_string(path)?;
    let parsed: toml::Table = content
        .parse()
        .map_err(|e| SqltidyError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    let is_pyproject = path.file_name().is_some_and(|n| n == PYPROJECT);
    let section = if is_pyproject {
        match parsed.get("tool").and_then(|t| t.get("sqltidy")) {
            Some(toml::Value::Table(table)) => table.clone(),
            Some(_) => {
                return Err(SqltidyError::Config(format!(
                    "[tool.sqltidy] in {} must be a table",
                    path.display()
                )))
            }
            None => toml::Table::new(),
        }
    } else {
        parsed
    };

    let mode: Mode = toml::Value::Table(section).try_into()?;
    mode.dialect()?;
    Ok(mode)
}
