use anyhow::Result;
use xshell::{Shell, cmd};

/// Fail if any workspace file is not rustfmt-clean
pub fn run_fmt_check(sh: &Shell) -> Result<()> {
    eprintln!("Checking formatting...");
    cmd!(sh, "cargo fmt --all -- --check").run()?;
    Ok(())
}

/// Rewrite workspace files with rustfmt
pub fn run_fmt(sh: &Shell) -> Result<()> {
    eprintln!("Formatting workspace...");
    cmd!(sh, "cargo fmt --all").run()?;
    Ok(())
}

/// Clippy over every crate and target, warnings denied
pub fn run_clippy(sh: &Shell) -> Result<()> {
    eprintln!("Running cargo clippy...");
    cmd!(sh, "cargo clippy --all-targets --workspace -- -D warnings").run()?;
    Ok(())
}

/// Unit, property and integration tests for the whole workspace. The
/// planner and switch property tests run under bolero's default harness.
pub fn run_tests(sh: &Shell, profile: &str, args: &[String]) -> Result<()> {
    eprintln!("Running cargo test ({profile})...");
    cmd!(sh, "cargo test --workspace --profile {profile} {args...}").run()?;
    Ok(())
}
