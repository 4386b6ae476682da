use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use sqltidy::logging::{self, LogLevelArg};
use sqltidy::mode::Mode;
use sqltidy::unit::KeywordCase;

/// sqltidy - a multi-dialect SQL reformatter.
#[derive(Parser, Debug)]
#[command(name = "sqltidy", version, about)]
struct Cli {
    /// Files or directories to format. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// SQL dialect: standard, postgresql, sqlite, mysql, mariadb, mssql, oracle.
    #[arg(short = 'd', long)]
    dialect: Option<String>,

    /// Spaces per indent level.
    #[arg(short = 'i', long)]
    indent_width: Option<usize>,

    /// Keyword case: preserve, upper, lower.
    #[arg(short = 'c', long, value_parser = parse_keyword_case)]
    keyword_case: Option<KeywordCase>,

    /// Check formatting without writing changes.
    #[arg(long)]
    check: bool,

    /// Show formatting diff.
    #[arg(long)]
    diff: bool,

    /// Skip safety equivalence check (faster).
    #[arg(long)]
    fast: bool,

    /// Print the classification listing instead of formatting.
    #[arg(long)]
    dump: bool,

    /// Glob patterns to exclude.
    #[arg(long)]
    exclude: Vec<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progressbar: bool,

    /// Force color output.
    #[arg(long)]
    force_color: bool,

    /// Disable color output.
    #[arg(long)]
    no_color: bool,

    /// Number of threads for parallel processing (0 = all cores).
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Disable multi-threaded processing.
    #[arg(long)]
    single_process: bool,

    /// Path to config file (sqltidy.toml or pyproject.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (overrides RUST_LOG).
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevelArg>,
}

fn parse_keyword_case(value: &str) -> Result<KeywordCase, String> {
    KeywordCase::from_name(value)
        .ok_or_else(|| format!("expected preserve, upper or lower, got {value:?}"))
}

impl Cli {
    /// Command-line values override the config file; flags only ever switch
    /// an option on.
    fn apply(self, base: Mode) -> Mode {
        Mode {
            dialect_name: self.dialect.unwrap_or(base.dialect_name),
            indent_width: self.indent_width.unwrap_or(base.indent_width),
            keyword_case: self.keyword_case.unwrap_or(base.keyword_case),
            check: self.check || base.check,
            diff: self.diff || base.diff,
            fast: self.fast || base.fast,
            exclude: if self.exclude.is_empty() {
                base.exclude
            } else {
                self.exclude
            },
            verbose: self.verbose || base.verbose,
            quiet: self.quiet || base.quiet,
            no_progressbar: self.no_progressbar || base.no_progressbar,
            no_color: self.no_color || base.no_color,
            force_color: self.force_color || base.force_color,
            threads: self.threads.unwrap_or(base.threads),
            single_process: self.single_process || base.single_process,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    match run_cli(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    let is_stdin = cli.files.len() == 1 && cli.files[0].as_os_str() == "-";
    let dump = cli.dump;
    let files = cli.files.clone();

    let base_mode = sqltidy::load_config(&files, cli.config.as_deref())
        .context("Configuration error")?;
    let mode = cli.apply(base_mode);
    mode.dialect().context("Configuration error")?;

    if is_stdin {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Error reading stdin")?;
        let output = if dump {
            sqltidy::dump_string(&source, &mode, "-")?
        } else {
            sqltidy::format_string(&source, &mode)?
        };
        print!("{}", output);
        return Ok(ExitCode::SUCCESS);
    }

    if dump {
        for path in sqltidy::get_matching_paths(&files, &mode) {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("Error reading {}", path.display()))?;
            let name = path.display().to_string();
            print!("{}", sqltidy::dump_string(&source, &mode, &name)?);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let report = sqltidy::run(&files, &mode);
    if mode.quiet {
        for (path, message) in report.failures() {
            eprintln!("error: {}: {}", path.display(), message);
        }
    } else {
        report
            .print(mode.verbose, mode.color())
            .context("Error writing report")?;
    }

    if report.has_errors() {
        Ok(ExitCode::from(2))
    } else if mode.check && report.has_changes() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
