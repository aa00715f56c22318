use clap::{Parser, ValueEnum};
use pmon::OutputFormat;

#[derive(Parser)]
#[command(name = "pmon-ctl")]
#[command(version, about = "Sample a process's CPU and memory usage from /proc", long_about = None)]
#[command(after_help = "EXAMPLES:
    # One sample per second until interrupted
    pmon-ctl $(pidof firefox)

    # Ten samples per second for one minute
    pmon-ctl --rate 10 --duration 60 1234

    # Comma-separated output for spreadsheets
    pmon-ctl --type csv 1234 > usage.csv
")]
pub struct Cli {
    /// Process ID to monitor, e.g. $(pidof foo)
    #[arg(value_name = "PID")]
    pub pid: i32,

    /// Samples per second (must stay at or below CLK_TCK/2)
    #[arg(short, long, value_name = "HZ", default_value_t = 1.0)]
    pub rate: f64,

    /// Monitoring duration in seconds, 0 runs until interrupted
    #[arg(short, long, value_name = "SECONDS", default_value_t = 0)]
    pub duration: u64,

    /// Output format for sample lines
    #[arg(short = 't', long = "type", value_name = "FORMAT", value_enum, default_value = "plain")]
    pub format: OutputKind,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// Space-separated columns
    Plain,
    /// Comma-separated values
    Csv,
}

impl From<OutputKind> for OutputFormat {
    fn from(kind: OutputKind) -> Self {
        match kind {
            OutputKind::Plain => OutputFormat::Plain,
            OutputKind::Csv => OutputFormat::Csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pid_with_defaults() {
        let cli = Cli::try_parse_from(["pmon-ctl", "1234"]).unwrap();
        assert_eq!(cli.pid, 1234);
        assert_eq!(cli.rate, 1.0);
        assert_eq!(cli.duration, 0);
        assert_eq!(cli.format, OutputKind::Plain);
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_all_options() {
        let cli = Cli::try_parse_from([
            "pmon-ctl", "-r", "2.5", "-d", "30", "-t", "csv", "-v", "999",
        ])
        .unwrap();
        assert_eq!(cli.pid, 999);
        assert_eq!(cli.rate, 2.5);
        assert_eq!(cli.duration, 30);
        assert_eq!(cli.format, OutputKind::Csv);
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_missing_pid() {
        assert!(Cli::try_parse_from(["pmon-ctl"]).is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["pmon-ctl", "-t", "json", "1"]).is_err());
    }

    #[test]
    fn output_kind_maps_to_format() {
        assert_eq!(OutputFormat::from(OutputKind::Plain), OutputFormat::Plain);
        assert_eq!(OutputFormat::from(OutputKind::Csv), OutputFormat::Csv);
    }
}
