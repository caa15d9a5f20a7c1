use anyhow::Result;
use chrono::NaiveDate;
use cidadao::core::log::init_logging;
use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SimulationArgs {
    /// Initial balance
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    initial: f64,

    /// First month to simulate (YYYY-MM-DD)
    #[arg(short, long)]
    start: Option<NaiveDate>,

    /// Last date to simulate, inclusive (YYYY-MM-DD)
    #[arg(short, long)]
    end: Option<NaiveDate>,

    /// Add the vacation bonus every 14th month
    #[arg(short, long, overrides_with = "no_bonus")]
    bonus: bool,

    /// Leave the bonus out even if the config enables it
    #[arg(long, overrides_with = "bonus")]
    no_bonus: bool,
}

impl SimulationArgs {
    fn into_options(self, index: Option<String>, json: bool) -> cidadao::SimulateOptions {
        cidadao::SimulateOptions {
            initial_balance: self.initial,
            start_date: self.start,
            end_date: self.end,
            index,
            include_bonus: match (self.bonus, self.no_bonus) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            json,
        }
    }
}

impl From<Commands> for cidadao::AppCommand {
    fn from(cmd: Commands) -> cidadao::AppCommand {
        match cmd {
            Commands::Simulate { args, index, json } => {
                cidadao::AppCommand::Simulate(args.into_options(index, json))
            }
            Commands::Compare { args } => {
                cidadao::AppCommand::Compare(args.into_options(None, false))
            }
            Commands::Rates { index } => cidadao::AppCommand::Rates { index },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Simulate a balance corrected by an index
    Simulate {
        #[command(flatten)]
        args: SimulationArgs,

        /// Index to apply (defaults to `default_index` from config)
        #[arg(short = 'x', long)]
        index: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Simulate against every configured index and compare final balances
    Compare {
        #[command(flatten)]
        args: SimulationArgs,
    },
    /// Display the monthly rates of an index
    Rates {
        /// Index name (defaults to `default_index` from config)
        index: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cidadao::cli::setup::setup(),
        Some(cmd) => cidadao::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
