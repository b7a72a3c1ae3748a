mod config;
pub mod logging;

pub use config::{
    BATCH_SIZE, HASH_BUF_SIZE, PROGRAM_LOG_LEVEL, PROGRAM_NAME, TEXT_SNIFF_LEN,
    default_inspect_root, default_worker_threads,
};

pub use logging::init;
