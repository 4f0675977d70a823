use crate::demo::{run_demo, run_plan_report, DemoArgs, PlanReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use depot_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Depot Induction Orchestrator",
    about = "Plan, simulate, and serve nightly train induction for a metro depot",
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
    /// Run one induction plan against a fleet snapshot and print the result
    Plan(PlanReportArgs),
    /// Run an end-to-end CLI demo covering planning, simulation, and learning
    Demo(DemoArgs),
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
        Command::Plan(args) => run_plan_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
