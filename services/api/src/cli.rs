use crate::commands::{
    run_bundle, run_check_start, run_export, run_match, BundleArgs, CheckStartArgs, ExportArgs,
    MatchArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use qualybuss::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "QualyBuss",
    about = "Run the QualyBuss back-office service and its HR helpers from the command line",
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
    /// Leave scheduling helpers
    Leave {
        #[command(subcommand)]
        command: LeaveCommand,
    },
    /// Bulk document import helpers
    Documents {
        #[command(subcommand)]
        command: DocumentsCommand,
    },
    /// Spreadsheet exports
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },
}

#[derive(Subcommand, Debug)]
enum LeaveCommand {
    /// Check whether a date may open a vacation period
    CheckStart(CheckStartArgs),
}

#[derive(Subcommand, Debug)]
enum DocumentsCommand {
    /// Match one page of text against a collaborator roster
    Match(MatchArgs),
    /// Zip a set of documents into one archive
    Bundle(BundleArgs),
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
    /// Write the collaborator list as CSV
    Collaborators(ExportArgs),
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
        Command::Leave {
            command: LeaveCommand::CheckStart(args),
        } => run_check_start(args).await,
        Command::Documents {
            command: DocumentsCommand::Match(args),
        } => run_match(args),
        Command::Documents {
            command: DocumentsCommand::Bundle(args),
        } => run_bundle(args),
        Command::Export {
            command: ExportCommand::Collaborators(args),
        } => run_export(args),
    }
}
