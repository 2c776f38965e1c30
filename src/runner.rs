//! Subprocess runner for the DIAMOND binary
//!
//! Builds the aligner's argument list from a [`Config`] and runs it to
//! completion. Arguments are passed straight to the process, never through
//! a shell.

use crate::config::{Config, InputType};
use crate::emitter::format_float;
use crate::error::{Result, SearchError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Targets kept per query for protein/CDS input when a taxon is excluded.
pub const MAX_TARGET_SEQS_EXCLUDING: u32 = 25;

/// Hits kept within this percentage of the best score for protein/CDS input.
pub const TOP_PERCENTAGE: u32 = 3;

/// A fully built aligner invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DiamondCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl DiamondCommand {
    /// Builds the invocation that aligns `query_fasta` and writes tabular
    /// output to `raw_output`.
    pub fn build(config: &Config, program: &Path, query_fasta: &Path, raw_output: &Path) -> Self {
        let mut args: Vec<OsString> = vec![config.input_type.tool().into(), "-d".into()];
        args.push(config.database.clone().into());
        args.push("-q".into());
        args.push(query_fasta.into());

        if let Some(flag) = config.sensitivity.flag() {
            args.push(flag.into());
        }

        args.push("--threads".into());
        args.push(config.num_threads.to_string().into());
        args.push("-e".into());
        args.push(format_float(config.max_evalue).into());
        args.push("-o".into());
        args.push(raw_output.into());
        args.push("--query-cover".into());
        args.push(format_float(config.query_cover).into());
        args.push("--subject-cover".into());
        args.push(format_float(config.subject_cover).into());

        if let Some(matrix) = &config.matrix {
            args.push("--matrix".into());
            args.push(matrix.into());
        }
        if let Some(gap_open) = config.gap_open {
            args.push("--gapopen".into());
            args.push(gap_open.to_string().into());
        }
        if let Some(gap_extend) = config.gap_extend {
            args.push("--gapextend".into());
            args.push(gap_extend.to_string().into());
        }

        match config.input_type {
            InputType::Cds | InputType::Proteins => {
                if config.excluded_taxon().is_some() {
                    args.push("--max-target-seqs".into());
                    args.push(MAX_TARGET_SEQS_EXCLUDING.to_string().into());
                } else {
                    args.push("--top".into());
                    args.push(TOP_PERCENTAGE.to_string().into());
                }
            }
            InputType::Genome | InputType::Metagenome => {
                // every HSP is a potential gene call
                for arg in ["--max-target-seqs", "0", "--max-hsps", "0"] {
                    args.push(arg.into());
                }
            }
        }

        DiamondCommand {
            program: program.to_path_buf(),
            args,
        }
    }

    /// Space-joined command line, program first.
    pub fn render(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the aligner and blocks until it exits.
    ///
    /// A non-zero exit becomes [`SearchError::InvocationFailure`] carrying
    /// the last line the aligner wrote to stderr.
    pub fn run(&self) -> Result<()> {
        log::info!("  {}", self.render());

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SearchError::ToolUnavailable(self.program.display().to_string())
                }
                _ => SearchError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = last_line(&stderr)
                .map(str::to_string)
                .unwrap_or_else(|| format!("aligner exited with {}", output.status));
            return Err(SearchError::InvocationFailure(message));
        }

        log::debug!("aligner finished: {}", output.status);
        Ok(())
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}
