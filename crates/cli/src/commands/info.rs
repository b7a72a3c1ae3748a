use std::{path::PathBuf, process::ExitCode};

use clap::Args;
use log::info;
use secutils_fs::{inspect, persist, persist_all};
use secutils_runtime::default_worker_threads;

use crate::{
    commands::{CommandResult, OutputOptions, collect_tree, target_path},
    printer::{RunSummary, make_printer},
};

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// File or directory to inspect (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Inspect every entry below a directory, not just the directory itself
    #[arg(long, short = 'r')]
    pub recursive: bool,

    /// Write the record (or all records, with --recursive) as JSON to FILE
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Worker threads for --recursive
    #[arg(long, short = 'j', default_value_t = default_worker_threads())]
    pub threads: usize,

    /// Output formatting options
    #[command(flatten)]
    pub output_opts: OutputOptions,
}

pub fn run(args: InfoArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[info] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: InfoArgs) -> CommandResult<ExitCode> {
    let path = target_path(args.path.clone());

    if args.recursive {
        inspect_recursive(path, &args)
    } else {
        inspect_single(path, &args)
    }
}

fn inspect_single(path: PathBuf, args: &InfoArgs) -> CommandResult<ExitCode> {
    let record = inspect(&path)?;

    match &args.output {
        Some(dest) => {
            persist(&record, dest)?;
            eprintln!("[info] record written to {}", dest.display());
        }
        None => {
            let mut printer = make_printer(args.output_opts.printer_config());
            printer.print_record(&record)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn inspect_recursive(root: PathBuf, args: &InfoArgs) -> CommandResult<ExitCode> {
    let (records, walk) = collect_tree(&root, args.threads)?;
    info!(
        "[info] {} records under {} ({} failed)",
        walk.inspected,
        root.display(),
        walk.failed
    );

    let mut printer = make_printer(args.output_opts.printer_config());

    match &args.output {
        Some(dest) => {
            persist_all(&records, dest)?;
            eprintln!(
                "[info] {} records written to {}",
                records.len(),
                dest.display()
            );
        }
        None => {
            for record in &records {
                printer.print_record(record)?;
            }
        }
    }

    printer.finish(&RunSummary {
        kind: "info",
        inspected: walk.inspected,
        failed: walk.failed,
        ..RunSummary::default()
    })?;

    Ok(if walk.failed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
