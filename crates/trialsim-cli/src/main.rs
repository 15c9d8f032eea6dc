//! Synthetic clinical-trial data generator CLI.

use clap::Parser;

use trialsim_cli::cli::{Cli, Command};
use trialsim_cli::commands::{
    run_check, run_demographics, run_disposition, run_generate, run_list, run_summary,
    run_vital_signs,
};
use trialsim_cli::logging::init_logging;
use trialsim_cli::summary::{print_check, print_generation, print_listing, print_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Disposition(args) => run_disposition(args).map(|result| {
            print_generation(&result);
            0
        }),
        Command::Demographics(args) => run_demographics(args).map(|result| {
            print_generation(&result);
            0
        }),
        Command::VitalSigns(args) => run_vital_signs(args).map(|result| {
            print_generation(&result);
            0
        }),
        Command::Generate(args) => run_generate(args).map(|result| {
            print_generation(&result);
            0
        }),
        Command::Summary(args) => run_summary(args).map(|report| {
            print_summary(&report);
            0
        }),
        Command::List(args) => run_list(args).map(|listing| {
            print_listing(&listing);
            0
        }),
        Command::Check(args) => run_check(args).map(|report| {
            print_check(&report);
            if report.is_clean() { 0 } else { 1 }
        }),
    };
    let exit_code = match outcome {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
