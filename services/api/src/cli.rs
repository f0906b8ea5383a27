use crate::demo::{
    run_case_view, run_coaching_suggest, run_demo, CaseViewArgs, CoachingSuggestArgs, DemoArgs,
};
use crate::server;
use casebook::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Casebook",
    about = "Run the negotiation casebook service or inspect cases and coaching advice from the command line",
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
    /// Inspect a stored case snapshot
    Case {
        #[command(subcommand)]
        command: CaseCommand,
    },
    /// Leader evaluation tooling
    Coaching {
        #[command(subcommand)]
        command: CoachingCommand,
    },
    /// Walk a sample case through its lifecycle and print the coaching advice
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CaseCommand {
    /// Print the workflow view derived from a case JSON file
    View(CaseViewArgs),
}

#[derive(Subcommand, Debug)]
enum CoachingCommand {
    /// Suggest the next coaching action from an evaluation history file
    Suggest(CoachingSuggestArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Case {
            command: CaseCommand::View(args),
        } => run_case_view(args),
        Command::Coaching {
            command: CoachingCommand::Suggest(args),
        } => run_coaching_suggest(args),
        Command::Demo(args) => run_demo(args),
    }
}
