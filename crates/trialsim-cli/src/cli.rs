//! CLI argument definitions for the trial data generator.

use std::path::PathBuf;

use std::io::{self, IsTerminal};

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "trialsim",
    version,
    about = "Synthetic clinical-trial data generator",
    long_about = "Generate a fictitious but internally consistent clinical-trial dataset.\n\n\
                  The disposition table is generated first; the demographic and\n\
                  vital-sign tables are derived from the persisted disposition table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging configuration from the global flags.
    ///
    /// `--log-level` wins over `-v`/`-q`; either one disables the `RUST_LOG`
    /// override.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig::default()
            .with_format(self.log_format.into())
            .with_log_file(self.log_file.clone());
        config = match self.log_level {
            Some(level) => config.with_level(level.into()),
            None if self.verbosity.is_present() => {
                config.with_level(self.verbosity.tracing_level_filter())
            }
            None => LogConfig {
                level_filter: self.verbosity.tracing_level_filter(),
                ..config
            },
        };
        config.with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        config
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the subject disposition table.
    Disposition(DispositionArgs),

    /// Derive the demographic table from a disposition table.
    Demographics(DemographicsArgs),

    /// Derive the vital-signs table from a disposition table.
    VitalSigns(VitalSignsArgs),

    /// Generate all three tables in one run.
    Generate(GenerateArgs),

    /// Print subject counts, demographics and blood-pressure means.
    Summary(TableArgs),

    /// List randomized subjects' demographics by treatment arm.
    List(ListArgs),

    /// Check the three tables against each other.
    ///
    /// Exits with status 1 when any issue is found.
    Check(CheckArgs),
}

/// Random seed shared by the generating commands.
#[derive(Args, Clone, Copy, Default)]
pub struct SeedArg {
    /// Seed for the random generator. A seed is drawn and logged when omitted.
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,
}

/// Study design overrides.
#[derive(Args, Clone, Default)]
pub struct DesignArgs {
    /// JSON file with study design parameters; missing keys keep their defaults.
    #[arg(long = "design", value_name = "FILE")]
    pub design: Option<PathBuf>,

    /// Number of subjects to generate (overrides the design file).
    #[arg(long = "subjects", value_name = "N")]
    pub subjects: Option<u32>,
}

#[derive(Args)]
pub struct DispositionArgs {
    /// Disposition table to write.
    #[arg(short = 'o', long = "output", default_value = "sc3.csv")]
    pub output: PathBuf,

    #[command(flatten)]
    pub seed: SeedArg,

    #[command(flatten)]
    pub design: DesignArgs,
}

#[derive(Args)]
pub struct DemographicsArgs {
    /// Disposition table to read.
    #[arg(short = 'i', long = "input", default_value = "sc3.csv")]
    pub input: PathBuf,

    /// Demographic table to write.
    #[arg(short = 'o', long = "output", default_value = "dm3.csv")]
    pub output: PathBuf,

    #[command(flatten)]
    pub seed: SeedArg,

    /// JSON file with study design parameters.
    #[arg(long = "design", value_name = "FILE")]
    pub design: Option<PathBuf>,
}

#[derive(Args)]
pub struct VitalSignsArgs {
    /// Disposition table to read.
    #[arg(short = 'i', long = "input", default_value = "sc3.csv")]
    pub input: PathBuf,

    /// Vital-signs table to write.
    #[arg(short = 'o', long = "output", default_value = "vs3.csv")]
    pub output: PathBuf,

    #[command(flatten)]
    pub seed: SeedArg,

    /// JSON file with study design parameters.
    #[arg(long = "design", value_name = "FILE")]
    pub design: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Directory that receives sc3.csv, dm3.csv and vs3.csv.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub seed: SeedArg,

    #[command(flatten)]
    pub design: DesignArgs,
}

/// Locations of the three persisted tables.
#[derive(Args, Clone)]
pub struct TableArgs {
    #[arg(long = "disposition", value_name = "PATH", default_value = "sc3.csv")]
    pub disposition: PathBuf,

    #[arg(long = "demographics", value_name = "PATH", default_value = "dm3.csv")]
    pub demographics: PathBuf,

    #[arg(long = "vital-signs", value_name = "PATH", default_value = "vs3.csv")]
    pub vital_signs: PathBuf,
}

#[derive(Args)]
pub struct ListArgs {
    /// Demographic table to read.
    #[arg(short = 'i', long = "input", default_value = "dm3.csv")]
    pub demographics: PathBuf,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub tables: TableArgs,

    /// JSON file with the study design the tables were generated with.
    #[arg(long = "design", value_name = "FILE")]
    pub design: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generator_defaults() {
        let cli = Cli::try_parse_from(["trialsim", "vital-signs"]).unwrap();
        let Command::VitalSigns(args) = cli.command else {
            panic!("expected vital-signs");
        };
        assert_eq!(args.input, PathBuf::from("sc3.csv"));
        assert_eq!(args.output, PathBuf::from("vs3.csv"));
        assert_eq!(args.seed.seed, None);
    }

    #[test]
    fn parses_design_overrides() {
        let cli = Cli::try_parse_from([
            "trialsim",
            "disposition",
            "-o",
            "out.csv",
            "--seed",
            "42",
            "--subjects",
            "10",
        ])
        .unwrap();
        let Command::Disposition(args) = cli.command else {
            panic!("expected disposition");
        };
        assert_eq!(args.output, PathBuf::from("out.csv"));
        assert_eq!(args.seed.seed, Some(42));
        assert_eq!(args.design.subjects, Some(10));
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["trialsim", "check", "--log-format", "json"]).unwrap();
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn explicit_log_flags_fix_the_level() {
        let cli = Cli::try_parse_from([
            "trialsim",
            "list",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--log-file",
            "run.log",
        ])
        .unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from("run.log")));
        assert!(!config.with_ansi);
    }

    #[test]
    fn default_log_config_defers_to_rust_log() {
        let cli = Cli::try_parse_from(["trialsim", "summary"]).unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);

        let cli = Cli::try_parse_from(["trialsim", "summary", "-v"]).unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::INFO);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn list_reads_the_demographic_table() {
        let cli = Cli::try_parse_from(["trialsim", "list"]).unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.demographics, PathBuf::from("dm3.csv"));
    }

    #[test]
    fn rejects_non_numeric_seed() {
        assert!(Cli::try_parse_from(["trialsim", "generate", "--seed", "abc"]).is_err());
    }
}
