//! Output formatting.

use camino::Utf8PathBuf;
use serde::Serialize;
use source_map::Position;
use templ_parser::Diagnostic;

use crate::cli::OutputFormat;

/// The result of processing one template file.
#[derive(Debug)]
pub struct FileReport {
    pub path: Utf8PathBuf,
    /// Non-fatal findings from the parsed file.
    pub diagnostics: Vec<Diagnostic>,
    /// The fatal error that stopped processing, if any.
    pub error: Option<FileError>,
    /// Whether the run wrote (or, under `fmt --check`, would write) output
    /// that differs from what was on disk.
    pub changed: bool,
}

/// A fatal per-file failure with the position it concerns, when known.
#[derive(Debug)]
pub struct FileError {
    pub message: String,
    pub position: Option<Position>,
}

/// One finding in the JSON report.
#[derive(Debug, Serialize)]
pub struct JsonFinding {
    #[serde(rename = "type")]
    pub finding_type: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub findings: Vec<JsonFinding>,
    pub file_count: usize,
    pub error_count: usize,
    pub diagnostic_count: usize,
    pub changed_count: usize,
}

/// Formats per-file reports for the terminal or for machines.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the full run. Human output ends with a summary line; JSON
    /// output is a single document.
    pub fn format(&self, reports: &[FileReport]) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(reports),
            OutputFormat::Json => self.format_json(reports),
        }
    }

    fn format_human(&self, reports: &[FileReport]) -> String {
        let mut out = String::new();
        for report in reports {
            for d in &report.diagnostics {
                out.push_str(&format!(
                    "{}:{}:{}\nWarning: {}\n\n",
                    report.path,
                    d.range.from.line + 1,
                    d.range.from.col + 1,
                    d.message
                ));
            }
            if let Some(err) = &report.error {
                match err.position {
                    Some(p) => out.push_str(&format!(
                        "{}:{}:{}\nError: {}\n\n",
                        report.path,
                        p.line + 1,
                        p.col + 1,
                        err.message
                    )),
                    None => out.push_str(&format!("{}\nError: {}\n\n", report.path, err.message)),
                }
            }
        }
        out.push_str(&summary(reports).format());
        out.push('\n');
        out
    }

    fn format_json(&self, reports: &[FileReport]) -> String {
        let mut findings = Vec::new();
        for report in reports {
            for d in &report.diagnostics {
                findings.push(JsonFinding {
                    finding_type: "Warning".to_string(),
                    filename: report.path.to_string(),
                    line: Some(d.range.from.line + 1),
                    col: Some(d.range.from.col + 1),
                    message: d.message.clone(),
                });
            }
            if let Some(err) = &report.error {
                findings.push(JsonFinding {
                    finding_type: "Error".to_string(),
                    filename: report.path.to_string(),
                    line: err.position.map(|p| p.line + 1),
                    col: err.position.map(|p| p.col + 1),
                    message: err.message.clone(),
                });
            }
        }
        let s = summary(reports);
        let doc = JsonReport {
            findings,
            file_count: s.file_count,
            error_count: s.error_count,
            diagnostic_count: s.diagnostic_count,
            changed_count: s.changed_count,
        };
        serde_json::to_string_pretty(&doc).unwrap_or_default()
    }
}

/// Summary of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub file_count: usize,
    pub error_count: usize,
    pub diagnostic_count: usize,
    pub changed_count: usize,
}

impl RunSummary {
    /// Formats the summary line.
    pub fn format(&self) -> String {
        let error_word = if self.error_count == 1 {
            "error"
        } else {
            "errors"
        };
        let warning_word = if self.diagnostic_count == 1 {
            "warning"
        } else {
            "warnings"
        };
        let file_word = if self.file_count == 1 {
            "file"
        } else {
            "files"
        };
        format!(
            "templ-gen found {} {} and {} {} in {} {}",
            self.error_count,
            error_word,
            self.diagnostic_count,
            warning_word,
            self.file_count,
            file_word
        )
    }
}

/// Totals the per-file reports.
pub fn summary(reports: &[FileReport]) -> RunSummary {
    RunSummary {
        file_count: reports.len(),
        error_count: reports.iter().filter(|r| r.error.is_some()).count(),
        diagnostic_count: reports.iter().map(|r| r.diagnostics.len()).sum(),
        changed_count: reports.iter().filter(|r| r.changed).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use source_map::Range;

    fn report_with_error() -> FileReport {
        FileReport {
            path: Utf8PathBuf::from("site/home.templ"),
            diagnostics: vec![Diagnostic {
                message: "void element <br> should not have child content".to_string(),
                range: Range::new(Position::new(10, 2, 1), Position::new(12, 2, 3)),
            }],
            error: Some(FileError {
                message: "expected close brace".to_string(),
                position: Some(Position::new(40, 5, 0)),
            }),
            changed: false,
        }
    }

    #[test]
    fn test_format_human() {
        let output = Formatter::new(OutputFormat::Human).format(&[report_with_error()]);
        assert!(output.contains("site/home.templ:3:2"));
        assert!(output.contains("Warning: void element"));
        assert!(output.contains("site/home.templ:6:1"));
        assert!(output.contains("Error: expected close brace"));
        assert!(output.contains("templ-gen found 1 error and 1 warning in 1 file"));
    }

    #[test]
    fn test_format_json() {
        let output = Formatter::new(OutputFormat::Json).format(&[report_with_error()]);
        assert!(output.contains("\"filename\""));
        assert!(output.contains("site/home.templ"));
        assert!(output.contains("\"error_count\": 1"));
    }

    #[test]
    fn test_summary_pluralization() {
        let s = RunSummary {
            file_count: 2,
            error_count: 0,
            diagnostic_count: 1,
            changed_count: 0,
        };
        assert_eq!(s.format(), "templ-gen found 0 errors and 1 warning in 2 files");
    }
}
