//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

/// Compiler and formatter for templ template files.
#[derive(Debug, Parser)]
#[command(name = "templ-gen")]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate Go code from template files
    Generate {
        /// File or directory to process
        #[arg(default_value = ".")]
        path: Utf8PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        output: OutputFormat,

        /// Treat diagnostics as errors
        #[arg(long = "fail-on-diagnostics")]
        fail_on_diagnostics: bool,
    },

    /// Rewrite template files in canonical form
    Fmt {
        /// File or directory to process
        #[arg(default_value = ".")]
        path: Utf8PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        output: OutputFormat,

        /// Report files that would change without rewriting them
        #[arg(long)]
        check: bool,
    },
}

impl Command {
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Command::Generate { path, .. } | Command::Fmt { path, .. } => path,
        }
    }

    pub fn output(&self) -> OutputFormat {
        match self {
            Command::Generate { output, .. } | Command::Fmt { output, .. } => *output,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults() {
        let args = Args::parse_from(["templ-gen", "generate"]);
        let Command::Generate {
            path,
            output,
            fail_on_diagnostics,
        } = args.command
        else {
            panic!("expected generate");
        };
        assert_eq!(path.as_str(), ".");
        assert!(matches!(output, OutputFormat::Human));
        assert!(!fail_on_diagnostics);
    }

    #[test]
    fn test_fmt_check_flag() {
        let args = Args::parse_from(["templ-gen", "fmt", "src", "--check"]);
        let Command::Fmt { path, check, .. } = args.command else {
            panic!("expected fmt");
        };
        assert_eq!(path.as_str(), "src");
        assert!(check);
    }

    #[test]
    fn test_json_output() {
        let args = Args::parse_from(["templ-gen", "generate", "--output", "json"]);
        assert!(matches!(args.command.output(), OutputFormat::Json));
    }
}
