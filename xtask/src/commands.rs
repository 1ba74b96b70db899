use anyhow::Result;
use clap::Subcommand;
use xshell::Shell;

pub mod ci;
pub mod common;
pub mod demos;
pub mod fmt;
pub mod test;

#[derive(Subcommand)]
pub enum Command {
    /// Run CI checks (fmt, clippy, test, demos). Runs all if no subcommand specified.
    Ci(ci::Ci),
    /// Run every demo configuration through the simulator
    Demos(demos::Demos),
    /// Apply rustfmt to all files
    Fmt(fmt::Fmt),
    /// Run tests
    Test(test::Test),
}

impl Command {
    pub fn run(self, sh: &Shell) -> Result<()> {
        match self {
            Command::Ci(cmd) => cmd.run(sh),
            Command::Demos(cmd) => cmd.run(sh),
            Command::Fmt(cmd) => cmd.run(sh),
            Command::Test(cmd) => cmd.run(sh),
        }
    }
}
