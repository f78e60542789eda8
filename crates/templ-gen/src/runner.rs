//! File discovery and per-file processing.

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use std::fs;
use templ_generator::{format_embedded, generate, GenerateError, NullFormatter, TemplSignatureResolver};
use templ_parser::{diagnose, parse_source};
use thiserror::Error;
use walkdir::WalkDir;

use crate::cli::Command;
use crate::output::{FileError, FileReport};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to read {path}: {source}")]
    Walk {
        path: Utf8PathBuf,
        source: walkdir::Error,
    },

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),

    #[error("no template files found under {0}")]
    NoFiles(Utf8PathBuf),
}

/// Runs the command over every template file under its path. Files are
/// independent, so they are processed in parallel; each one reports its own
/// findings rather than aborting the run.
pub fn run(cmd: &Command) -> Result<Vec<FileReport>, RunnerError> {
    let files = discover(cmd.path())?;
    let mut reports: Vec<FileReport> = files
        .into_par_iter()
        .map(|path| match cmd {
            Command::Generate { .. } => generate_file(&path),
            Command::Fmt { check, .. } => format_file(&path, *check),
        })
        .collect();
    reports.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(reports)
}

/// Finds the template files to process. A file path is taken as-is; a
/// directory is walked recursively.
fn discover(path: &Utf8Path) -> Result<Vec<Utf8PathBuf>, RunnerError> {
    if path.is_file() {
        return Ok(vec![path.to_owned()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| RunnerError::Walk {
            path: path.to_owned(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let p = Utf8PathBuf::try_from(entry.into_path())
            .map_err(|e| RunnerError::NonUtf8Path(e.into_path_buf()))?;
        if p.extension() == Some("templ") {
            files.push(p);
        }
    }
    if files.is_empty() {
        return Err(RunnerError::NoFiles(path.to_owned()));
    }
    Ok(files)
}

/// Where the generated Go for a template file lands: a sibling with the
/// `.templ` extension replaced by `_templ.go`, so the Go build tooling picks
/// it up next to the rest of the package.
fn generated_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut s = path.with_extension("").into_string();
    s.push_str("_templ.go");
    Utf8PathBuf::from(s)
}

fn generate_file(path: &Utf8Path) -> FileReport {
    let mut report = FileReport {
        path: path.to_owned(),
        diagnostics: Vec::new(),
        error: None,
        changed: false,
    };
    let src = match fs::read_to_string(path) {
        Ok(src) => src,
        Err(e) => {
            report.error = Some(FileError {
                message: format!("failed to read file: {e}"),
                position: None,
            });
            return report;
        }
    };
    let tf = match parse_source(&src, path.as_str()) {
        Ok(tf) => tf,
        Err(e) => {
            report.error = Some(FileError {
                message: e.to_string(),
                position: e.position(),
            });
            return report;
        }
    };
    report.diagnostics = diagnose(&tf);

    let resolver = TemplSignatureResolver::from_file(&tf);
    let generated = match generate(&tf, &resolver) {
        Ok(g) => g,
        Err(e) => {
            let position = match &e {
                GenerateError::ComponentNotFound { position, .. }
                | GenerateError::MissingAttribute { position, .. } => Some(*position),
            };
            report.error = Some(FileError {
                message: e.to_string(),
                position,
            });
            return report;
        }
    };

    let target = generated_path(path);
    let up_to_date = fs::read_to_string(&target)
        .map(|existing| existing == generated.code)
        .unwrap_or(false);
    if !up_to_date {
        if let Err(e) = fs::write(&target, &generated.code) {
            report.error = Some(FileError {
                message: format!("failed to write {target}: {e}"),
                position: None,
            });
            return report;
        }
        report.changed = true;
    }
    report
}

fn format_file(path: &Utf8Path, check: bool) -> FileReport {
    let mut report = FileReport {
        path: path.to_owned(),
        diagnostics: Vec::new(),
        error: None,
        changed: false,
    };
    let src = match fs::read_to_string(path) {
        Ok(src) => src,
        Err(e) => {
            report.error = Some(FileError {
                message: format!("failed to read file: {e}"),
                position: None,
            });
            return report;
        }
    };
    let mut tf = match parse_source(&src, path.as_str()) {
        Ok(tf) => tf,
        Err(e) => {
            report.error = Some(FileError {
                message: e.to_string(),
                position: e.position(),
            });
            return report;
        }
    };
    report.diagnostics = diagnose(&tf);

    format_embedded(&mut tf, &NullFormatter);
    let mut formatted = String::new();
    tf.write(&mut formatted);
    if formatted != src {
        report.changed = true;
        if !check {
            if let Err(e) = fs::write(path, &formatted) {
                report.error = Some(FileError {
                    message: format!("failed to write file: {e}"),
                    position: None,
                });
            }
        }
    }
    report
}
