use std::{
    fs::read_dir,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::Duration,
};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use log::{debug, warn};
use secutils_runtime::BATCH_SIZE;

use crate::{
    error::Result,
    inspect::inspect,
    record::{EntryKind, FileRecord},
};

/// Totals for one batch inspection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    /// Records sent to the channel.
    pub inspected: usize,
    /// Entries or directories that could not be inspected or listed.
    pub failed: usize,
}

#[derive(Default)]
struct Counters {
    inspected: AtomicUsize,
    failed: AtomicUsize,
}

/// Inspect `root` and, when it is a directory, every entry below it.
///
/// Directories are listed on `num_threads` workers sharing one work queue and
/// records are sent in batches. Symlinked directories are reported but never
/// descended. Failures below the root are logged and counted, only a failure
/// to inspect the root itself is returned.
pub fn inspect_tree(
    root: &Path,
    record_tx: Sender<Vec<FileRecord>>,
    num_threads: usize,
) -> Result<WalkSummary> {
    let root_record = inspect(root)?;
    let descend = should_descend(&root_record);
    let _ = record_tx.send(vec![root_record]);

    let counters = Counters::default();
    counters.inspected.store(1, Ordering::Relaxed);

    if descend {
        walk_parallel(root.to_path_buf(), &record_tx, &counters, num_threads.max(1));
    }

    Ok(WalkSummary {
        inspected: counters.inspected.into_inner(),
        failed: counters.failed.into_inner(),
    })
}

fn walk_parallel(
    root: PathBuf,
    record_tx: &Sender<Vec<FileRecord>>,
    counters: &Counters,
    num_threads: usize,
) {
    let (work_tx, work_rx) = channel::unbounded::<PathBuf>();

    // Directories queued or being listed; the walk ends when it reaches zero.
    let pending = AtomicUsize::new(1);
    let _ = work_tx.send(root);

    debug!("[walk] starting with {} threads", num_threads);

    thread::scope(|s| {
        for _ in 0..num_threads {
            let work_rx = work_rx.clone();
            let work_tx = work_tx.clone();
            let record_tx = record_tx.clone();
            let pending = &pending;

            s.spawn(move || {
                worker_loop(work_rx, work_tx, record_tx, counters, pending);
            });
        }
    });
}

fn worker_loop(
    work_rx: channel::Receiver<PathBuf>,
    work_tx: channel::Sender<PathBuf>,
    record_tx: Sender<Vec<FileRecord>>,
    counters: &Counters,
    pending: &AtomicUsize,
) {
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    loop {
        match work_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(dir) => {
                scan_dir(&dir, &work_tx, &mut batch, counters, pending);

                let last = pending.fetch_sub(1, Ordering::AcqRel) == 1;

                if batch.len() >= BATCH_SIZE {
                    let to_send = std::mem::take(&mut batch);
                    if record_tx.send(to_send).is_err() {
                        debug!("[walk] record receiver dropped, worker exiting");
                        return;
                    }
                }

                if last {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if pending.load(Ordering::Acquire) == 0 {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    if !batch.is_empty() {
        let _ = record_tx.send(batch);
    }
}

/// List one directory, inspect each entry and queue subdirectories.
fn scan_dir(
    dir: &Path,
    work_tx: &channel::Sender<PathBuf>,
    batch: &mut Vec<FileRecord>,
    counters: &Counters,
    pending: &AtomicUsize,
) {
    let rd = match read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("[walk] read_dir({:?}) failed: {e}", dir);
            counters.failed.fetch_add(1, Ordering::Relaxed);
            return;
        }
    };

    for entry_res in rd {
        let entry = match entry_res {
            Ok(e) => e,
            Err(e) => {
                warn!("[walk] error reading entry in {:?}: {e}", dir);
                counters.failed.fetch_add(1, Ordering::Relaxed);
                continue;
            }
        };

        let path = entry.path();
        match inspect(&path) {
            Ok(record) => {
                if should_descend(&record) {
                    pending.fetch_add(1, Ordering::AcqRel);
                    let _ = work_tx.send(path);
                }
                counters.inspected.fetch_add(1, Ordering::Relaxed);
                batch.push(record);
            }
            Err(e) => {
                warn!("[walk] {e}");
                counters.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

fn should_descend(record: &FileRecord) -> bool {
    record.kind() == EntryKind::Directory
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
