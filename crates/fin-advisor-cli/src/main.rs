mod commands;
mod config;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::health::HealthArgs;
use commands::loan::{CompareOffersArgs, EmiArgs, ScheduleArgs};
use config::CliConfig;

/// Loan and financial health calculations
#[derive(Parser)]
#[command(
    name = "fina",
    version,
    about = "Loan EMI and financial health calculations",
    long_about = "A CLI for loan EMI, amortisation schedules, loan offer comparison \
                  and financial health scoring with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level or tracing filter (overrides FINA_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the equated monthly installment of a loan
    Emi(EmiArgs),
    /// Month-by-month amortisation schedule
    Schedule(ScheduleArgs),
    /// Price and rank competing loan offers
    CompareOffers(CompareOffersArgs),
    /// Score a financial profile
    Health(HealthArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let policy_flag = match &cli.command {
        Commands::Health(args) => args.policy.clone(),
        _ => None,
    };
    let config = CliConfig::load().with_overrides(cli.log_level.clone(), policy_flag);

    if let Err(e) = telemetry::init(&config.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loan::run_emi(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::CompareOffers(args) => commands::loan::run_compare_offers(args),
        Commands::Health(args) => commands::health::run_health(args, config.policy_path.as_deref()),
        Commands::Version => {
            println!("fina {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
