//! Offline drivers for the motion core.
//!
//! These stand in for the real-time host: they feed configured commands to
//! the planner or the kinematics switch one control period at a time and
//! hand each period's state to a sink.

use crate::config::Config;
use anyhow::Result;
use ostinato_core::{
    AxisPlanner, JointVector, KinematicsSwitch, Pose,
    kinematics::{ForwardFlags, InverseFlags},
};
use serde::Serialize;

/// Planner state after one control period
#[derive(Debug, Clone, Serialize)]
pub struct PlanSample {
    pub tick: u64,
    pub time: f64,
    pub pos_cmd: f64,
    pub curr_pos: f64,
    pub curr_vel: f64,
    pub active: bool,
    pub in_limit: bool,
    pub branch: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanSummary {
    pub ticks: u64,
    pub peak_vel: f64,
    /// Largest per-period velocity change divided by the period, not
    /// counting the instantaneous stop when the axis is disabled
    pub peak_acc: f64,
    pub final_pos: f64,
    pub final_vel: f64,
    /// The axis ended at rest on its command
    pub settled: bool,
}

/// Run the configured axis segments through the planner
pub fn run_plan<F>(config: &Config, mut sink: F) -> Result<PlanSummary>
where
    F: FnMut(&PlanSample) -> Result<()>,
{
    let axis = &config.axis;
    if axis.segments.is_empty() {
        anyhow::bail!("[axis] needs at least one segment to plan");
    }

    let period = config.period;
    let mut planner = AxisPlanner::new(axis.limits());
    planner.disallow_backoff = axis.disallow_backoff;
    planner.set_position(axis.initial_pos);

    let mut summary = PlanSummary {
        final_pos: planner.curr_pos(),
        ..Default::default()
    };
    let mut tick = 0u64;

    for (index, segment) in axis.segments.iter().enumerate() {
        let ticks = (segment.duration / period).round() as u64;
        tracing::debug!(
            index,
            ticks,
            pos_cmd = segment.pos_cmd,
            enable = segment.enable,
            "starting segment"
        );

        for _ in 0..ticks {
            planner.enable = segment.enable;
            planner.pos_cmd = segment.pos_cmd;

            let prev_vel = planner.curr_vel();
            let step = planner.update(period);
            tick += 1;

            if segment.enable {
                let acc = (planner.curr_vel() - prev_vel).abs() / period;
                summary.peak_acc = summary.peak_acc.max(acc);
            }
            summary.peak_vel = summary.peak_vel.max(planner.curr_vel().abs());

            let sample = PlanSample {
                tick,
                time: tick as f64 * period,
                pos_cmd: planner.pos_cmd,
                curr_pos: planner.curr_pos(),
                curr_vel: planner.curr_vel(),
                active: planner.is_active(),
                in_limit: step.in_limit,
                branch: step.branch.as_str(),
            };
            sink(&sample)?;
        }
    }

    summary.ticks = tick;
    summary.final_pos = planner.curr_pos();
    summary.final_vel = planner.curr_vel();
    summary.settled = !planner.is_active() && planner.curr_pos() == planner.pos_cmd;

    tracing::info!(
        ticks = summary.ticks,
        peak_vel = summary.peak_vel,
        peak_acc = summary.peak_acc,
        final_pos = summary.final_pos,
        settled = summary.settled,
        "plan complete"
    );

    Ok(summary)
}

/// Switch state and transforms after one control period
#[derive(Debug, Clone, Serialize)]
pub struct KinsSample {
    pub tick: u64,
    pub selector: u32,
    pub method: String,
    /// Whether this period detected a method change
    pub changed: bool,
    pub pose: [f64; 9],
    pub joints: JointVector,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KinsSummary {
    pub ticks: u64,
    pub switches: usize,
    /// Largest single-period joint move beyond what the pose rate asks for
    pub max_joint_jump: f64,
}

/// Drive the kinematics switch the way a host would: forward then inverse
/// every period, with the configured selector changes in between.
pub fn run_kins<F>(config: &Config, mut sink: F) -> Result<KinsSummary>
where
    F: FnMut(&KinsSample) -> Result<()>,
{
    let kins_config = &config.kinematics;
    let period = config.period;

    let mut kins = KinematicsSwitch::new();
    let mut joints = kins_config.joints;
    let mut pose = Pose::default();

    // establish a consistent joint/pose pair before the first period
    kins.home(
        &joints,
        &mut pose,
        &mut ForwardFlags::default(),
        &mut InverseFlags::default(),
    );

    let rate = kins_config.pose_rate;
    let expected_move = rate.iter().map(|r| (r * period).abs()).fold(0.0, f64::max);
    let mut summary = KinsSummary::default();

    for tick in 0..kins_config.ticks {
        for switch in kins_config.switches.iter().filter(|s| s.tick == tick) {
            tracing::debug!(tick, selector = switch.selector, "setting selector");
            kins.set_selector(switch.selector);
        }

        kins.forward(&joints, &mut pose);
        let changed = kins.method_changed();
        if changed {
            summary.switches += 1;
        }

        pose.x += rate[0] * period;
        pose.y += rate[1] * period;
        pose.z += rate[2] * period;

        let next = kins.inverse(&pose);
        let jump = next
            .iter()
            .zip(&joints)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        summary.max_joint_jump = summary.max_joint_jump.max(jump - expected_move);
        joints = next;

        let sample = KinsSample {
            tick,
            selector: kins.selector(),
            method: kins.active_method().to_string(),
            changed,
            pose: pose.to_array(),
            joints,
        };
        sink(&sample)?;
    }

    summary.ticks = kins_config.ticks;
    tracing::info!(
        ticks = summary.ticks,
        switches = summary.switches,
        max_joint_jump = summary.max_joint_jump,
        method = %kins.active_method(),
        "kinematics run complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SegmentConfig, SwitchConfig};

    fn segment(duration: f64, pos_cmd: f64, enable: bool) -> SegmentConfig {
        SegmentConfig {
            duration,
            pos_cmd,
            enable,
        }
    }

    #[test]
    fn plan_requires_segments() {
        let config = Config::default();
        assert!(run_plan(&config, |_| Ok(())).is_err());
    }

    #[test]
    fn plan_step_settles_on_command() {
        let mut config = Config::default();
        config.axis.segments.push(segment(1.0, 5.0, true));

        let mut samples = Vec::new();
        let summary = run_plan(&config, |s| {
            samples.push(s.clone());
            Ok(())
        })
        .unwrap();

        assert_eq!(summary.ticks, 1000);
        assert_eq!(samples.len(), 1000);
        assert_eq!(samples[0].tick, 1);
        assert!(summary.settled);
        assert_eq!(summary.final_pos, 5.0);
        assert!(summary.peak_vel <= 10.0 + 1e-9);
        assert!(summary.peak_acc <= 100.0 * (1.0 + 1e-6));
        assert_eq!(samples.last().unwrap().branch, "Track");
    }

    #[test]
    fn plan_disabled_segment_holds() {
        let mut config = Config::default();
        config.axis.initial_pos = 2.0;
        config.axis.segments.push(segment(0.1, 7.0, false));

        let summary = run_plan(&config, |s| {
            assert_eq!(s.curr_pos, 2.0);
            assert_eq!(s.pos_cmd, 2.0);
            assert_eq!(s.branch, "Hold");
            Ok(())
        })
        .unwrap();
        assert!(summary.settled);
    }

    #[test]
    fn plan_samples_serialize_branch_labels() {
        let mut config = Config::default();
        config.axis.segments.push(segment(0.01, 0.0, true));

        run_plan(&config, |s| {
            let value = serde_json::to_value(s)?;
            assert_eq!(value["branch"], "Track");
            assert_eq!(value["in_limit"], false);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn plan_sink_errors_stop_the_run() {
        let mut config = Config::default();
        config.axis.segments.push(segment(1.0, 5.0, true));

        let mut calls = 0;
        let result = run_plan(&config, |_| {
            calls += 1;
            anyhow::bail!("sink closed")
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn kins_switch_is_continuous() {
        let mut config = Config::default();
        config.kinematics.joints = [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        config.kinematics.ticks = 6;
        config.kinematics.switches = vec![
            SwitchConfig {
                tick: 2,
                selector: 1,
            },
            SwitchConfig {
                tick: 4,
                selector: 0,
            },
        ];

        let mut samples = Vec::new();
        let summary = run_kins(&config, |s| {
            samples.push(s.clone());
            Ok(())
        })
        .unwrap();

        assert_eq!(summary.switches, 2);
        assert_eq!(summary.max_joint_jump, 0.0);
        assert!(samples[2].changed);
        assert_eq!(samples[2].method, "swap_xz(1)");
        assert!(samples[4].changed);
        assert_eq!(samples[5].method, "identity(0)");
        for sample in &samples {
            assert_eq!(sample.joints, config.kinematics.joints);
        }
    }

    #[test]
    fn kins_pose_rate_moves_the_mapped_joint() {
        let mut config = Config::default();
        config.kinematics.ticks = 3;
        config.kinematics.pose_rate = [1000.0, 0.0, 0.0];
        config.kinematics.switches = vec![SwitchConfig {
            tick: 0,
            selector: 1,
        }];

        let mut samples = Vec::new();
        run_kins(&config, |s| {
            samples.push(s.clone());
            Ok(())
        })
        .unwrap();

        // with X and Z swapped, X motion drives joint 2
        let last = samples.last().unwrap();
        assert_eq!(last.pose[0], 3.0);
        assert_eq!(last.joints[0], 0.0);
        assert_eq!(last.joints[2], 3.0);
    }
}
