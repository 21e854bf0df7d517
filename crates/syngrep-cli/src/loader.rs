//! Corpus loading: resolves command-line paths to parsed syntax trees.
//!
//! Directories contribute their source files of the selected language; with
//! `-r` they are walked to any depth, otherwise only their top level is
//! visited. Explicitly named files are loaded regardless of extension. Any
//! file that fails to parse aborts the load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use syngrep_syntax::{ParseResult, Parser, SupportedLanguage};

use crate::errors::AppError;

/// One parsed source file of the corpus.
#[derive(Debug)]
pub(crate) struct SourceTree {
    path: PathBuf,
    parsed: ParseResult,
}

impl SourceTree {
    /// Returns the path the file was loaded from.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the parsed syntax tree.
    pub(crate) const fn parsed(&self) -> &ParseResult {
        &self.parsed
    }
}

/// Loads every source file of `language` reachable from `paths`.
///
/// Files are visited in sorted order within each directory so output is
/// deterministic.
pub(crate) fn load(
    paths: &[String],
    language: SupportedLanguage,
    recursive: bool,
) -> Result<Vec<SourceTree>, AppError> {
    let mut parser = Parser::new(language)?;
    let mut trees = Vec::new();

    for raw in paths {
        let path = Path::new(raw);
        if path.is_dir() {
            load_directory(&mut parser, path, language, recursive, &mut trees)?;
        } else if path.is_file() {
            trees.push(load_file(&mut parser, path)?);
        } else {
            return Err(AppError::MissingPath {
                path: path.to_path_buf(),
            });
        }
    }

    debug!(files = trees.len(), "corpus loaded");
    Ok(trees)
}

fn load_directory(
    parser: &mut Parser,
    path: &Path,
    language: SupportedLanguage,
    recursive: bool,
    trees: &mut Vec<SourceTree>,
) -> Result<(), AppError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let walk = WalkDir::new(path).max_depth(max_depth).sort_by_file_name();

    for entry in walk {
        let entry = entry.map_err(|e| AppError::Read {
            path: path.to_path_buf(),
            source: io::Error::other(e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if SupportedLanguage::from_path(entry.path()) != Some(language) {
            continue;
        }
        trees.push(load_file(parser, entry.path())?);
    }

    Ok(())
}

fn load_file(parser: &mut Parser, path: &Path) -> Result<SourceTree, AppError> {
    let source = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parser.parse(&source)?;

    if let Some(error) = parsed.first_error() {
        return Err(AppError::Unparsable {
            path: path.to_path_buf(),
            position: error.position,
            message: error.message,
        });
    }

    debug!(path = %path.display(), "loaded source file");
    Ok(SourceTree {
        path: path.to_path_buf(),
        parsed,
    })
}
