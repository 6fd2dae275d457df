use crate::report::{
    run_assess, run_checkpoints_list, run_rules_list, AssessArgs, CheckpointListArgs, RulesListArgs,
};
use crate::server;
use backyard_bud::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Backyard Bud",
    about = "Check sheds, carports and decks against the NSW exempt development rules",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Assess a `{property, userInputs}` request file and print the outcome
    Assess(AssessArgs),
    /// Inspect the legislative rule table
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
    /// Inspect persisted assessment checkpoints
    Checkpoints {
        #[command(subcommand)]
        command: CheckpointsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// List rules, optionally filtered by structure type and category
    List(RulesListArgs),
}

#[derive(Subcommand, Debug)]
enum CheckpointsCommand {
    /// List checkpoints, newest first
    List(CheckpointListArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured rule table path
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Keep checkpoints in memory instead of writing them to CHECKPOINT_DIR
    #[arg(long)]
    pub(crate) ephemeral_checkpoints: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Rules {
            command: RulesCommand::List(args),
        } => run_rules_list(args),
        Command::Checkpoints {
            command: CheckpointsCommand::List(args),
        } => run_checkpoints_list(args),
    }
}
