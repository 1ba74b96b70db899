use super::Format;
use anyhow::{Context, Result};
use clap::Args;
use ostinato::{
    config::Config,
    sim::{PlanSample, run_plan},
};
use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

#[derive(Args)]
pub struct PlanArgs {
    /// Path to the configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Output format for the per-period samples.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,
}

impl PlanArgs {
    pub fn run(&self) -> Result<()> {
        let config = Config::from_file(&self.config)?;
        config.validate()?;

        tracing::info!(
            config = %self.config.display(),
            segments = config.axis.segments.len(),
            period = config.period,
            "planning axis"
        );

        let mut out = BufWriter::new(io::stdout().lock());
        if self.format == Format::Csv {
            writeln!(out, "tick,time,pos_cmd,curr_pos,curr_vel,active,in_limit,branch")?;
        }

        run_plan(&config, |sample| write_sample(&mut out, self.format, sample))?;
        out.flush().context("failed to flush output")?;

        Ok(())
    }
}

fn write_sample<W: Write>(out: &mut W, format: Format, sample: &PlanSample) -> Result<()> {
    match format {
        Format::Csv => writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            sample.tick,
            sample.time,
            sample.pos_cmd,
            sample.curr_pos,
            sample.curr_vel,
            sample.active,
            sample.in_limit,
            sample.branch
        )?,
        Format::Json => {
            serde_json::to_writer(&mut *out, sample)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
