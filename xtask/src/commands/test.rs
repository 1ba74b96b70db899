use anyhow::Result;
use clap::Args;
use xshell::Shell;

use super::common;

#[derive(Args)]
pub struct Test {
    #[arg(long, default_value = "dev")]
    profile: String,

    /// Additional arguments to pass to cargo test
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Test {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        common::run_tests(sh, &self.profile, &self.args)
    }
}
