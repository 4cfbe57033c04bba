use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "qry", version, about = "Check generated SQL against a qry security policy")]
struct Cli {
    /// Log policy decisions to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

/// Where the policy comes from.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Configuration file. Defaults to .qry.yaml in the working directory.
    #[arg(long, short = 'c', env = "QRY_CONFIG")]
    config: Option<PathBuf>,
}

/// Where the SQL comes from: the argument, a file, or stdin.
#[derive(Args, Debug, Clone)]
pub struct SqlArgs {
    /// SQL statement. Read from stdin when neither this nor --file is given.
    sql: Option<String>,

    /// Read the statement from a file
    #[arg(long, short = 'f', conflicts_with = "sql")]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a statement and print what should happen to it. Exits with 2 when blocked.
    Check {
        #[command(flatten)]
        sql: SqlArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Print the assessment as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the instructions appended to the SQL generation prompt
    Prompt {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Show the resolved security policy
    Policy {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List the table and column references found in a statement
    Refs {
        #[command(flatten)]
        sql: SqlArgs,

        /// Print the references as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "qry_core=debug,qry_policy=debug,qry_guardrails=debug,info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Check { sql, config, json } => commands::check::run(&sql, &config, json),
        Command::Prompt { config } => commands::prompt::run(&config).map(|()| ExitCode::SUCCESS),
        Command::Policy { config } => commands::policy::run(&config).map(|()| ExitCode::SUCCESS),
        Command::Refs { sql, json } => commands::refs::run(&sql, json).map(|()| ExitCode::SUCCESS),
    }
}
