use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing();
    match cli.command {
        Command::Plan(args) => args.run(),
        Command::Kins(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(name = "ostinato", about = "Offline simulation of the ostinato motion core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the axis command segments through the trajectory planner.
    Plan(cli::plan::PlanArgs),
    /// Drive the kinematics switch through its selector changes.
    Kins(cli::kins::KinsArgs),
}
