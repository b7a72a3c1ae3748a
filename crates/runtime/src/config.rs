use std::{num::NonZeroUsize, path::PathBuf};

pub const PROGRAM_NAME: &str = "secutils";
pub const PROGRAM_LOG_LEVEL: &str = "SECUTILS_LOG_LEVEL";

/// Read chunk used when streaming file content through the digest accumulators.
pub const HASH_BUF_SIZE: usize = 64 * 1024;

/// Batch size for sending records through the channel.
/// Larger batches reduce channel overhead but increase latency.
pub const BATCH_SIZE: usize = 64;

/// Leading bytes checked for NUL when deciding whether a file is text.
pub const TEXT_SNIFF_LEN: usize = 8 * 1024;

/// Default root to inspect when no path is given on the command line.
pub fn default_inspect_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Worker count for batch inspection, one per available core.
pub fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}
