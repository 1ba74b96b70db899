use anyhow::{Context, Result};
use ostinato_core::{
    Limits,
    kinematics::{JOINT_COUNT, JointVector},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Simulation configuration for the motion core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Control period in seconds
    #[serde(default = "default_period")]
    pub period: f64,

    /// Single axis driven by the planner
    #[serde(default)]
    pub axis: AxisConfig,

    /// Kinematics switch scenario
    #[serde(default)]
    pub kinematics: KinematicsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            period: default_period(),
            axis: AxisConfig::default(),
            kinematics: KinematicsConfig::default(),
        }
    }
}

/// Axis limits and the command profile fed to the planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Lower travel bound, unbounded when absent
    pub min_pos: Option<f64>,

    /// Upper travel bound, unbounded when absent
    pub max_pos: Option<f64>,

    #[serde(default = "default_max_vel")]
    pub max_vel: f64,

    #[serde(default = "default_max_acc")]
    pub max_acc: f64,

    #[serde(default)]
    pub disallow_backoff: bool,

    /// Position the axis rests at before the first segment
    #[serde(default)]
    pub initial_pos: f64,

    /// Command segments, run in order
    #[serde(default)]
    pub segments: Vec<SegmentConfig>,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            min_pos: None,
            max_pos: None,
            max_vel: default_max_vel(),
            max_acc: default_max_acc(),
            disallow_backoff: false,
            initial_pos: 0.0,
            segments: Vec::new(),
        }
    }
}

impl AxisConfig {
    pub fn limits(&self) -> Limits {
        Limits::new(self.max_vel, self.max_acc).with_bounds(
            self.min_pos.unwrap_or(f64::NEG_INFINITY),
            self.max_pos.unwrap_or(f64::INFINITY),
        )
    }
}

/// A command held for a fixed time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Seconds to hold this command
    pub duration: f64,

    /// Commanded position
    pub pos_cmd: f64,

    #[serde(default = "default_enable")]
    pub enable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicsConfig {
    /// Joint position the machine starts at
    #[serde(default)]
    pub joints: JointVector,

    /// Number of control periods to simulate
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Cartesian X/Y/Z velocity applied to the commanded pose
    #[serde(default)]
    pub pose_rate: [f64; 3],

    /// Selector changes, applied at the start of their tick
    #[serde(default)]
    pub switches: Vec<SwitchConfig>,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            joints: [0.0; JOINT_COUNT],
            ticks: default_ticks(),
            pose_rate: [0.0; 3],
            switches: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchConfig {
    pub tick: u64,
    pub selector: u32,
}

fn default_period() -> f64 {
    0.001
}

fn default_max_vel() -> f64 {
    10.0
}

fn default_max_acc() -> f64 {
    100.0
}

fn default_enable() -> bool {
    true
}

fn default_ticks() -> u64 {
    10
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.period.is_finite() && self.period > 0.0) {
            anyhow::bail!("period must be finite and positive, got {}", self.period);
        }

        self.axis
            .limits()
            .validate()
            .context("invalid [axis] limits")?;

        if !self.axis.initial_pos.is_finite() {
            anyhow::bail!("axis.initial_pos must be finite");
        }

        for (index, segment) in self.axis.segments.iter().enumerate() {
            if !(segment.duration.is_finite() && segment.duration > 0.0) {
                anyhow::bail!(
                    "axis.segments[{index}].duration must be finite and positive, got {}",
                    segment.duration
                );
            }
            if !segment.pos_cmd.is_finite() {
                anyhow::bail!("axis.segments[{index}].pos_cmd must be finite");
            }
        }

        if self.kinematics.joints.iter().any(|j| !j.is_finite()) {
            anyhow::bail!("kinematics.joints must all be finite");
        }
        if self.kinematics.pose_rate.iter().any(|r| !r.is_finite()) {
            anyhow::bail!("kinematics.pose_rate must all be finite");
        }

        Ok(())
    }
}
