//! Reporter: drains the history in order and renders samples and statistics

use std::io::Write;

use pmon_core::Result;

use crate::history::{RunSummary, SampleHistory};

/// Sample line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Space-separated columns
    #[default]
    Plain,
    /// Comma-separated values
    Csv,
}

impl OutputFormat {
    fn separator(self) -> char {
        match self {
            OutputFormat::Plain => ' ',
            OutputFormat::Csv => ',',
        }
    }
}

/// Consumer side of the monitoring pipeline.
///
/// Writes one header line, one line per sample in arrival order, and the
/// end-of-run summary when at least one sample was collected. A sink write
/// failure is fatal: there is no useful way to continue with broken output.
pub struct Reporter<W: Write> {
    sink: W,
    format: OutputFormat,
    command: String,
}

impl<W: Write> Reporter<W> {
    pub fn new(sink: W, format: OutputFormat, command: String) -> Self {
        Self {
            sink,
            format,
            command,
        }
    }

    /// Drain the history until it is terminated and empty, then render the
    /// summary block.
    pub fn run(&mut self, history: &SampleHistory) -> Result<()> {
        let sep = self.format.separator();
        writeln!(self.sink, "Command{sep}CPU[%]{sep}RSS[kB]")?;

        while let Some(sample) = history.get() {
            writeln!(
                self.sink,
                "{}{sep}{:.1}{sep}{}",
                self.command, sample.cpu_percent, sample.rss_kb
            )?;
        }

        if let Some(summary) = history.summary() {
            self.write_summary(&summary)?;
        }

        Ok(())
    }

    fn write_summary(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(self.sink)?;
        writeln!(self.sink, "------ Summary ------")?;
        writeln!(self.sink, "      CPU[%]  RSS[kB]")?;
        writeln!(self.sink, "Max:   {:5.1}  {}", summary.max.0, summary.max.1)?;
        writeln!(self.sink, "Min:   {:5.1}  {}", summary.min.0, summary.min.1)?;
        writeln!(
            self.sink,
            "Ave:   {:5.1}  {}",
            summary.mean.0, summary.mean.1
        )?;
        Ok(())
    }
}
