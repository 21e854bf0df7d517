//! Command-line argument definitions for the syngrep tool.

use clap::Parser;

use syngrep_syntax::SupportedLanguage;

/// Output format for match reporting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// One `<file>:<line>:<col>: <match>` line per match.
    #[default]
    Human,
    /// One JSON object per match.
    Json,
}

const AFTER_HELP: &str = "\
A pattern is a piece of source code which may include wildcards. It can be
an expression, an expression list, one or more statements, a type, or one
or more declarations.

Wildcards consist of '$' and a name. All wildcards with the same name
within a pattern must match the same node, excluding \"_\". Example:

    $x.$_ = $x       assignment of a field of x to x itself

If '*' is before the name, it will match any number of nodes. Example:

    f($*_)           calls to f with any number of arguments

Regexes can be used to match certain identifier names only; '.*' matches
every identifier. Example:

    $(_, /Fprint.*/)($*_)

A leading '~' enables aggressive matching.";

/// Command-line interface for the syngrep structural search tool.
#[derive(Parser, Debug)]
#[command(
    name = "syngrep",
    about = "Search for syntax tree patterns in source code",
    after_help = AFTER_HELP
)]
pub(crate) struct Cli {
    /// Find all nodes matching the pattern.
    ///
    /// Exactly one command is supported per run. Without `-x`, the first
    /// positional argument is taken as the pattern.
    #[arg(short = 'x', value_name = "PATTERN")]
    pub(crate) patterns: Vec<String>,

    /// Also search subdirectories of the given paths recursively.
    #[arg(short = 'r')]
    pub(crate) recursive: bool,

    /// Language grammar for the pattern and the corpus files.
    #[arg(long, value_name = "LANG", default_value = "rust")]
    pub(crate) lang: SupportedLanguage,

    /// Controls how matches are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub(crate) format: OutputFormat,

    /// Files or directories to search; defaults to the working directory.
    #[arg(value_name = "PATH")]
    pub(crate) paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied())
            .unwrap_or_else(|err| panic!("parse {args:?}: {err}"))
    }

    #[test]
    fn pattern_flag_is_repeatable() {
        let cli = parse_args(&["syngrep", "-x", "a", "-x", "b"]);
        assert_eq!(cli.patterns, vec!["a", "b"]);
    }

    #[test]
    fn language_defaults_to_rust() {
        let cli = parse_args(&["syngrep", "-x", "a"]);
        assert_eq!(cli.lang, SupportedLanguage::Rust);
        assert_eq!(cli.format, OutputFormat::Human);
        assert!(!cli.recursive);
    }

    #[test]
    fn language_accepts_aliases() {
        let cli = parse_args(&["syngrep", "--lang", "py", "-x", "a"]);
        assert_eq!(cli.lang, SupportedLanguage::Python);
    }

    #[test]
    fn positional_arguments_are_paths() {
        let cli = parse_args(&["syngrep", "-r", "-x", "a", "src", "lib"]);
        assert!(cli.recursive);
        assert_eq!(cli.paths, vec!["src", "lib"]);
    }
}
