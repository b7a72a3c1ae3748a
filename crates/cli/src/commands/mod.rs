pub mod info;
pub mod ioc;

use std::{
    path::{Path, PathBuf},
    thread,
};

use anyhow::anyhow;
use clap::{Args, Subcommand};
use crossbeam::channel;
pub use info::InfoArgs;
pub use ioc::IocArgs;
use secutils_fs::{FileRecord, WalkSummary, inspect_tree};

use crate::printer::{ColorChoice, OutputFormat, PrinterConfig};

/// Common error type for command handlers
pub type CommandResult<T> = anyhow::Result<T>;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a file or directory and report a forensic fingerprint of it.
    ///
    /// Leaving PATH out inspects the current working directory.
    ///
    /// Example:
    ///   secutils info /path/to/file
    ///   secutils info --recursive --output case.json /path/to/directory
    Info(InfoArgs),

    /// Extract indicators of compromise from a text file or directory.
    ///
    /// Example:
    ///   secutils ioc /path/to/file.eml
    Ioc(IocArgs),
}

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output results as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// When to use colors: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Suppress the closing summary line
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl OutputOptions {
    pub fn printer_config(&self) -> PrinterConfig {
        PrinterConfig {
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
            color: ColorChoice::parse(&self.color),
            show_summary: !self.quiet,
        }
    }
}

/// Inspect everything under `root` on `threads` workers.
///
/// Records are returned sorted by absolute path so repeated runs over an
/// unchanged tree print identically.
pub fn collect_tree(root: &Path, threads: usize) -> CommandResult<(Vec<FileRecord>, WalkSummary)> {
    let (tx, rx) = channel::unbounded();

    let (mut records, summary) = thread::scope(|s| {
        let walker = s.spawn(move || inspect_tree(root, tx, threads));

        let records: Vec<FileRecord> = rx.iter().flatten().collect();
        let summary = walker
            .join()
            .map_err(|_| anyhow!("inspection worker panicked"))??;

        Ok::<_, anyhow::Error>((records, summary))
    })?;

    records.sort_by(|a, b| a.absolute_path().cmp(b.absolute_path()));
    Ok((records, summary))
}

/// Resolve the optional PATH argument.
pub fn target_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(secutils_runtime::default_inspect_root)
}
