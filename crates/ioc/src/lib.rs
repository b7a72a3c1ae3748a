//! Indicator-of-compromise extraction from text files.

mod extract;
mod scan;

pub use extract::{Indicator, IndicatorKind, extract, refang};
pub use scan::{IocError, IocReport, looks_binary, scan_file, scan_record};
