use std::io::{self, Write};

use secutils_fs::FileRecord;
use secutils_ioc::IocReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with optional colors.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Automatically detect TTY and enable colors if appropriate.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorChoice {
    pub fn parse(when: &str) -> Self {
        match when {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    pub color: ColorChoice,
    /// Whether to print the closing summary line.
    pub show_summary: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorChoice::Auto,
            show_summary: true,
        }
    }
}

/// Totals printed once a command has processed all its paths.
#[derive(Debug, Default)]
pub struct RunSummary<'a> {
    /// Label of the command, e.g. `info`.
    pub kind: &'a str,
    pub inspected: usize,
    pub failed: usize,
    /// Files left out, e.g. binary files for IOC scanning.
    pub skipped: usize,
    /// Indicator total, for IOC runs only.
    pub indicators: Option<usize>,
}

/// Sink for inspection output.
pub trait ReportPrinter {
    fn print_record(&mut self, record: &FileRecord) -> io::Result<()>;

    fn print_ioc(&mut self, report: &IocReport) -> io::Result<()>;

    /// Called once after everything was printed.
    fn finish(&mut self, summary: &RunSummary<'_>) -> io::Result<()>;
}

pub fn make_printer(cfg: PrinterConfig) -> Box<dyn ReportPrinter> {
    match cfg.format {
        OutputFormat::Human => Box::new(HumanPrinter::<io::Stdout, io::Stderr>::stdout(cfg)),
        OutputFormat::Json => Box::new(JsonPrinter::<io::Stdout, io::Stderr>::stdout(cfg)),
    }
}

/// Human-readable printer with optional color support.
pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
    printed: usize,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    /// Printer over arbitrary writers. `Auto` color means no color here since
    /// a generic writer cannot be checked for a TTY.
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        let use_color = cfg.color == ColorChoice::Always;

        Self {
            out,
            err,
            cfg,
            use_color,
            printed: 0,
        }
    }

    /// Create a printer that writes to stdout and stderr with TTY detection.
    pub fn stdout(cfg: PrinterConfig) -> HumanPrinter<io::Stdout, io::Stderr> {
        use std::io::IsTerminal;

        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };

        HumanPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
            use_color,
            printed: 0,
        }
    }

    #[inline]
    fn format_path(&self, path: &str) -> String {
        if self.use_color {
            format!("\x1b[32m{}\x1b[0m", path)
        } else {
            path.to_owned()
        }
    }

    fn separator(&mut self) -> io::Result<()> {
        if self.printed > 0 {
            writeln!(self.out)?;
        }
        self.printed += 1;
        Ok(())
    }
}

impl<W: Write, E: Write> ReportPrinter for HumanPrinter<W, E> {
    fn print_record(&mut self, record: &FileRecord) -> io::Result<()> {
        self.separator()?;

        let path = self.format_path(&record.absolute_path().display().to_string());
        let ft = record.file_type();

        writeln!(self.out, "{:<12} {}", "Name:", record.name().to_string_lossy())?;
        writeln!(self.out, "{:<12} {}", "Path:", path)?;
        writeln!(self.out, "{:<12} {}", "Kind:", record.kind().as_str())?;
        writeln!(self.out, "{:<12} {} bytes", "Size:", record.size())?;
        writeln!(
            self.out,
            "{:<12} {:o} ({})",
            "Mode:",
            record.mode(),
            record.permissions()
        )?;
        writeln!(self.out, "{:<12} {}", "Owner:", record.owner())?;
        writeln!(self.out, "{:<12} {}", "Group:", record.group())?;
        writeln!(
            self.out,
            "{:<12} {}",
            "Modified:",
            record.modified_at().format("%Y-%m-%d %H:%M:%S %:z")
        )?;
        if let Some(target) = record.link_target() {
            writeln!(self.out, "{:<12} {}", "Link target:", target.display())?;
        }
        writeln!(
            self.out,
            "{:<12} {} ({})",
            "Type:", ft.extension, ft.description
        )?;
        if let Some(d) = record.digests() {
            writeln!(self.out, "{:<12} {}", "MD5:", d.md5)?;
            writeln!(self.out, "{:<12} {}", "SHA1:", d.sha1)?;
            writeln!(self.out, "{:<12} {}", "SHA256:", d.sha256)?;
        }

        Ok(())
    }

    fn print_ioc(&mut self, report: &IocReport) -> io::Result<()> {
        self.separator()?;

        let path = self.format_path(&report.record.absolute_path().display().to_string());
        match report.record.sha256() {
            Some(sha256) => writeln!(self.out, "{} (sha256 {})", path, sha256)?,
            None => writeln!(self.out, "{}", path)?,
        }

        for indicator in &report.indicators {
            writeln!(self.out, "  {:<8} {}", indicator.kind.as_str(), indicator.value)?;
        }

        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary<'_>) -> io::Result<()> {
        if !self.cfg.show_summary {
            return Ok(());
        }

        let mut line = format!(
            "[{}] {} inspected, {} failed",
            summary.kind, summary.inspected, summary.failed
        );
        if summary.skipped > 0 {
            line.push_str(&format!(", {} skipped", summary.skipped));
        }
        if let Some(n) = summary.indicators {
            line.push_str(&format!(", {} indicators", n));
        }
        writeln!(self.err, "{line}")
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    /// Create a printer that writes to stdout and stderr.
    pub fn stdout(cfg: PrinterConfig) -> JsonPrinter<io::Stdout, io::Stderr> {
        JsonPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
        }
    }
}

impl<W: Write, E: Write> ReportPrinter for JsonPrinter<W, E> {
    fn print_record(&mut self, record: &FileRecord) -> io::Result<()> {
        let line = serde_json::to_string(record).map_err(io::Error::other)?;
        writeln!(self.out, "{}", line)
    }

    fn print_ioc(&mut self, report: &IocReport) -> io::Result<()> {
        let line = serde_json::to_string(report).map_err(io::Error::other)?;
        writeln!(self.out, "{}", line)
    }

    fn finish(&mut self, summary: &RunSummary<'_>) -> io::Result<()> {
        if !self.cfg.show_summary {
            return Ok(());
        }

        let obj = serde_json::json!({
            "type": "summary",
            "kind": summary.kind,
            "inspected": summary.inspected,
            "failed": summary.failed,
            "skipped": summary.skipped,
            "indicators": summary.indicators,
        });
        writeln!(self.err, "{}", obj)
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
