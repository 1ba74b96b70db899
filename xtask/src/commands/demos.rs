use anyhow::{Context, Result};
use clap::Args;
use xshell::{Shell, cmd};

#[derive(Args)]
pub struct Demos {
    /// Directory holding the demo configurations
    #[arg(long, default_value = "demos")]
    dir: String,

    /// Directory the sample output is written to
    #[arg(long, default_value = "target/demos")]
    out: String,
}

impl Default for Demos {
    fn default() -> Self {
        Self {
            dir: "demos".into(),
            out: "target/demos".into(),
        }
    }
}

impl Demos {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        cmd!(sh, "cargo build -p ostinato").run()?;
        sh.create_dir(&self.out)?;

        let mut configs = sh
            .read_dir(&self.dir)
            .with_context(|| format!("failed to list {}", self.dir))?;
        configs.retain(|path| {
            path.extension()
                .is_some_and(|ext| ext == "toml" || ext == "json")
        });
        configs.sort();

        for config in configs {
            let stem = config
                .file_stem()
                .and_then(|s| s.to_str())
                .context("demo config has no file name")?
                .to_string();

            let contents = sh.read_file(&config)?;
            for sim in ["plan", "kins"] {
                // configs only describe the scenarios they exercise
                if !contents.contains(section(sim)) {
                    continue;
                }
                eprintln!("Running {sim} on {}...", config.display());
                let output = cmd!(sh, "cargo run -q -p ostinato -- {sim} {config}").read()?;
                sh.write_file(format!("{}/{stem}.{sim}.csv", self.out), output)?;
            }
        }

        Ok(())
    }
}

fn section(sim: &str) -> &'static str {
    match sim {
        "plan" => "segments",
        _ => "kinematics",
    }
}
