use super::Format;
use anyhow::{Context, Result};
use clap::Args;
use ostinato::{
    config::Config,
    sim::{KinsSample, run_kins},
};
use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

const AXES: [&str; 9] = ["x", "y", "z", "a", "b", "c", "u", "v", "w"];

#[derive(Args)]
pub struct KinsArgs {
    /// Path to the configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Output format for the per-period samples.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,
}

impl KinsArgs {
    pub fn run(&self) -> Result<()> {
        let config = Config::from_file(&self.config)?;
        config.validate()?;

        tracing::info!(
            config = %self.config.display(),
            ticks = config.kinematics.ticks,
            switches = config.kinematics.switches.len(),
            "driving kinematics switch"
        );

        let mut out = BufWriter::new(io::stdout().lock());
        if self.format == Format::Csv {
            let pose = AXES.join(",");
            let joints = (0..AXES.len())
                .map(|i| format!("j{i}"))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(out, "tick,selector,method,changed,{pose},{joints}")?;
        }

        run_kins(&config, |sample| write_sample(&mut out, self.format, sample))?;
        out.flush().context("failed to flush output")?;

        Ok(())
    }
}

fn write_sample<W: Write>(out: &mut W, format: Format, sample: &KinsSample) -> Result<()> {
    match format {
        Format::Csv => {
            write!(
                out,
                "{},{},{},{}",
                sample.tick, sample.selector, sample.method, sample.changed
            )?;
            for value in sample.pose.iter().chain(&sample.joints) {
                write!(out, ",{value}")?;
            }
            writeln!(out)?;
        }
        Format::Json => {
            serde_json::to_writer(&mut *out, sample)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
