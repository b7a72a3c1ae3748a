use std::{path::PathBuf, process::ExitCode};

use clap::Args;
use log::{debug, warn};
use secutils_fs::{EntryKind, inspect};
use secutils_ioc::{IocError, scan_record};
use secutils_runtime::default_worker_threads;

use crate::{
    commands::{CommandResult, OutputOptions, collect_tree, target_path},
    printer::{RunSummary, make_printer},
};

#[derive(Debug, Args)]
pub struct IocArgs {
    /// Text file, or directory of text files, to scan (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Worker threads used to inspect a directory
    #[arg(long, short = 'j', default_value_t = default_worker_threads())]
    pub threads: usize,

    /// Output formatting options
    #[command(flatten)]
    pub output_opts: OutputOptions,
}

pub fn run(args: IocArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[ioc] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: IocArgs) -> CommandResult<ExitCode> {
    let path = target_path(args.path.clone());
    let root = inspect(&path)?;

    let mut printer = make_printer(args.output_opts.printer_config());

    // A single file is scanned strictly: binary content is an error.
    if root.kind() != EntryKind::Directory {
        let report = scan_record(root)?;
        printer.print_ioc(&report)?;
        printer.finish(&RunSummary {
            kind: "ioc",
            inspected: 1,
            indicators: Some(report.indicators.len()),
            ..RunSummary::default()
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    let (records, walk) = collect_tree(&path, args.threads)?;

    let mut summary = RunSummary {
        kind: "ioc",
        failed: walk.failed,
        indicators: Some(0),
        ..RunSummary::default()
    };

    for record in records {
        if record.kind() != EntryKind::File {
            continue;
        }
        summary.inspected += 1;

        match scan_record(record) {
            Ok(report) => {
                if report.indicators.is_empty() {
                    continue;
                }
                summary.indicators = summary.indicators.map(|n| n + report.indicators.len());
                printer.print_ioc(&report)?;
            }
            Err(IocError::Binary { path }) => {
                debug!("[ioc] skipping binary file {}", path.display());
                summary.skipped += 1;
            }
            Err(e) => {
                warn!("[ioc] {e}");
                summary.failed += 1;
            }
        }
    }

    printer.finish(&summary)?;

    Ok(if summary.failed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
