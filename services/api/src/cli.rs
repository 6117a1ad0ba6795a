use crate::commands::{
    run_evaluate, run_followups, run_summary, EvaluateArgs, FollowupArgs, SummaryArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use jobwright::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Jobwright",
    about = "Evaluate job postings and track applications from the command line",
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
    /// Classify and score collected postings into a decisions file
    Evaluate(EvaluateArgs),
    /// Print aggregate counts for the tracked applications
    Summary(SummaryArgs),
    /// List applications whose follow-up date has arrived
    Followups(FollowupArgs),
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Summary(args) => run_summary(args),
        Command::Followups(args) => run_followups(args),
    }
}
