use anyhow::Result;
use clap::Parser;
use xshell::Shell;

mod commands;

/// Developer tasks for the ostinato workspace
#[derive(Parser)]
#[command(name = "xtask")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    sh.change_dir(workspace_root());

    cli.command.run(&sh)
}

/// Tasks resolve `demos/` and `target/` from here regardless of the
/// directory cargo was invoked from
fn workspace_root() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/..")
}
