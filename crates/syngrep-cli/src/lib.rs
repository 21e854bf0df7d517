//! CLI runtime for the syngrep structural search tool.
//!
//! The binary delegates to [`run`], which parses arguments, compiles the
//! pattern, loads the corpus, and reports one line per match:
//!
//! ```text
//! <file>:<line>:<col>: <single-line rendering of the matched subtree>
//! ```
//!
//! Exit codes: 0 on success (zero matches included), 1 on runtime errors
//! (pattern compile, load, or parse failures), 2 on usage errors.

mod cli;
mod errors;
mod loader;
mod render;

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser as _;
use tracing::debug;

use syngrep_syntax::CompiledPattern;

use crate::cli::{Cli, OutputFormat};
use crate::errors::AppError;
use crate::render::{MatchRecord, single_line};

/// Parses arguments, runs the search, and writes matches to `stdout`.
///
/// Diagnostics go to `stderr`; the returned exit code follows the
/// documented mapping.
pub fn run<'a, I, T>(args: I, stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version render to stdout with a zero exit code;
            // genuine usage errors render to stderr.
            let target = if err.use_stderr() { stderr } else { stdout };
            let _ = write!(target, "{}", err.render());
            return u8::try_from(err.exit_code())
                .map(ExitCode::from)
                .unwrap_or(ExitCode::FAILURE);
        }
    };

    match execute(&cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(stderr, "syngrep: {err}");
            err.exit_code()
        }
    }
}

fn execute(cli: &Cli, stdout: &mut dyn Write) -> Result<(), AppError> {
    let mut commands = cli.patterns.clone();
    let mut paths = cli.paths.clone();

    // Without an explicit -x, the first positional argument is the pattern.
    if commands.is_empty() && !paths.is_empty() {
        commands.push(paths.remove(0));
    }
    let Some(pattern_text) = commands.first() else {
        return Err(AppError::MissingCommand);
    };
    if commands.len() > 1 {
        return Err(AppError::MultipleCommands);
    }

    let pattern = CompiledPattern::compile(pattern_text, cli.lang)?;
    debug!(category = ?pattern.category(), "pattern compiled");

    let search_paths = if paths.is_empty() {
        vec![".".to_owned()]
    } else {
        paths
    };
    let trees = loader::load(&search_paths, cli.lang, cli.recursive)?;

    let cwd = std::env::current_dir().ok();
    for tree in &trees {
        let display = display_path(tree.path(), cwd.as_deref());
        for found in pattern.search(tree.parsed()) {
            let position = found.start_position();
            match cli.format {
                OutputFormat::Human => {
                    writeln!(
                        stdout,
                        "{display}:{position}: {}",
                        single_line(found.text())
                    )?;
                }
                OutputFormat::Json => {
                    let record = MatchRecord {
                        path: &display,
                        line: position.line,
                        column: position.column,
                        text: single_line(found.text()),
                    };
                    writeln!(stdout, "{}", serde_json::to_string(&record)?)?;
                }
            }
        }
    }

    Ok(())
}

/// Paths under the working directory are printed relative to it.
fn display_path(path: &Path, cwd: Option<&Path>) -> String {
    let relative = cwd.and_then(|base| path.strip_prefix(base).ok()).unwrap_or(path);
    let relative = relative.strip_prefix(".").unwrap_or(relative);
    relative.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(patterns: &[&str], paths: &[&str]) -> Cli {
        Cli {
            patterns: patterns.iter().map(|s| (*s).to_owned()).collect(),
            recursive: false,
            lang: syngrep_syntax::SupportedLanguage::Rust,
            format: OutputFormat::Human,
            paths: paths.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn no_command_is_a_usage_error() {
        let mut out = Vec::new();
        let result = execute(&cli_for(&[], &[]), &mut out);
        assert!(matches!(result, Err(AppError::MissingCommand)));
    }

    #[test]
    fn multiple_commands_are_rejected() {
        let mut out = Vec::new();
        let result = execute(&cli_for(&["a", "b"], &[]), &mut out);
        assert!(matches!(result, Err(AppError::MultipleCommands)));
    }

    #[test]
    fn first_positional_argument_becomes_the_pattern() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let file = dir.path().join("sample.rs");
        std::fs::write(&file, "fn main() { foo(1); }")
            .unwrap_or_else(|err| panic!("write: {err}"));

        let mut out = Vec::new();
        let cli = cli_for(&[], &["foo($_)", &file.display().to_string()]);
        execute(&cli, &mut out).unwrap_or_else(|err| panic!("execute: {err}"));

        let printed = String::from_utf8(out).unwrap_or_else(|err| panic!("utf8: {err}"));
        assert!(printed.contains("foo(1)"), "output was: {printed}");
    }

    #[test]
    fn zero_matches_is_a_success() {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let file = dir.path().join("sample.rs");
        std::fs::write(&file, "fn main() {}").unwrap_or_else(|err| panic!("write: {err}"));

        let mut out = Vec::new();
        let cli = cli_for(&["never_called($*_)"], &[&file.display().to_string()]);
        execute(&cli, &mut out).unwrap_or_else(|err| panic!("execute: {err}"));
        assert!(out.is_empty());
    }

    #[test]
    fn display_path_relativises_under_the_working_directory() {
        let cwd = Path::new("/work");
        assert_eq!(
            display_path(Path::new("/work/src/main.rs"), Some(cwd)),
            "src/main.rs"
        );
        assert_eq!(
            display_path(Path::new("/elsewhere/main.rs"), Some(cwd)),
            "/elsewhere/main.rs"
        );
        assert_eq!(display_path(Path::new("./src/main.rs"), Some(cwd)), "src/main.rs");
    }
}
