//! Single-axis, velocity and acceleration limited trajectory planner.
//!
//! [`AxisPlanner::update`] advances one axis by exactly one control period.
//! No multi-period profile is ever built: each call evaluates a fixed list of
//! candidate moves against the positions and velocities reachable within the
//! period and commits the first candidate whose condition holds. The list, in
//! priority order:
//!
//! 1. decelerate when the stopping point lies past a position bound,
//! 2. park on (or head toward) a bound the command is heading past,
//! 3. track the command exactly when it is reachable,
//! 4. close in on the command, backing off when an overshoot is predicted.
//!
//! Every candidate finally passes a containment stage that keeps the axis
//! able to stop inside `[min_pos, max_pos]`.

use core::fmt;
use thiserror::Error;

/// Settle tolerance, in units of `max_acc * period^2`
const TINY_DP_SCALE: f64 = 1e-3;

/// Position error below which an axis counts as settled
pub fn tiny_dp(max_acc: f64, period: f64) -> f64 {
    max_acc * period * period * TINY_DP_SCALE
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LimitsError {
    #[error("max velocity must be finite and positive, got {0}")]
    NonPositiveVelocity(f64),
    #[error("max acceleration must be finite and positive, got {0}")]
    NonPositiveAcceleration(f64),
    #[error("position bounds must not be NaN")]
    NanBound,
    #[error("min position {min} is above max position {max}")]
    InvertedBounds { min: f64, max: f64 },
}

/// Motion limits of one axis.
///
/// Position bounds may be infinite for callers that enforce travel limits
/// elsewhere. The defaults leave velocity and acceleration at zero, which
/// [`Limits::validate`] rejects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    pub min_pos: f64,
    pub max_pos: f64,
    pub max_vel: f64,
    pub max_acc: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_pos: f64::NEG_INFINITY,
            max_pos: f64::INFINITY,
            max_vel: 0.0,
            max_acc: 0.0,
        }
    }
}

impl Limits {
    /// Velocity and acceleration limits with unbounded travel
    pub fn new(max_vel: f64, max_acc: f64) -> Self {
        Self {
            max_vel,
            max_acc,
            ..Self::default()
        }
    }

    pub fn with_bounds(self, min_pos: f64, max_pos: f64) -> Self {
        Self {
            min_pos,
            max_pos,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), LimitsError> {
        if !(self.max_vel.is_finite() && self.max_vel > 0.0) {
            return Err(LimitsError::NonPositiveVelocity(self.max_vel));
        }
        if !(self.max_acc.is_finite() && self.max_acc > 0.0) {
            return Err(LimitsError::NonPositiveAcceleration(self.max_acc));
        }
        if self.min_pos.is_nan() || self.max_pos.is_nan() {
            return Err(LimitsError::NanBound);
        }
        if self.min_pos > self.max_pos {
            return Err(LimitsError::InvertedBounds {
                min: self.min_pos,
                max: self.max_pos,
            });
        }
        Ok(())
    }
}

/// The candidate move committed by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Disabled: hold position at zero velocity
    Hold,
    /// Stopping point lies above `max_pos`: brake
    AvoidMaxOvershoot,
    /// Stopping point lies below `min_pos`: brake
    AvoidMinOvershoot,
    /// Command below `min_pos` and the bound is reachable at rest
    ParkAtMin,
    /// Command below `min_pos`: head toward the bound
    ApproachMin,
    /// Command above `max_pos` and the bound is reachable at rest
    ParkAtMax,
    /// Command above `max_pos`: head toward the bound
    ApproachMax,
    /// Command position and velocity reachable this period
    Track,
    /// Output above command, no overshoot predicted
    CloseDown,
    /// Output below command, no overshoot predicted
    CloseUp,
    /// Output above command, overshoot predicted, backoff disallowed
    OverrunDown,
    /// Output below command, overshoot predicted, backoff disallowed
    OverrunUp,
    /// Output above command, overshoot predicted: back off upward
    BackOffUp,
    /// Output below command, overshoot predicted: back off downward
    BackOffDown,
    /// Candidate replaced to keep the axis stoppable inside its bounds
    Contain,
}

impl Branch {
    /// Static label for logs and sample output
    pub const fn as_str(self) -> &'static str {
        match self {
            Branch::Hold => "Hold",
            Branch::AvoidMaxOvershoot => "AvoidMaxOvershoot",
            Branch::AvoidMinOvershoot => "AvoidMinOvershoot",
            Branch::ParkAtMin => "ParkAtMin",
            Branch::ApproachMin => "ApproachMin",
            Branch::ParkAtMax => "ParkAtMax",
            Branch::ApproachMax => "ApproachMax",
            Branch::Track => "Track",
            Branch::CloseDown => "CloseDown",
            Branch::CloseUp => "CloseUp",
            Branch::OverrunDown => "OverrunDown",
            Branch::OverrunUp => "OverrunUp",
            Branch::BackOffUp => "BackOffUp",
            Branch::BackOffDown => "BackOffDown",
            Branch::Contain => "Contain",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informational result of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub branch: Branch,
    /// The output still differs from the command
    pub in_limit: bool,
}

/// Trajectory state of one axis.
///
/// Inputs are public fields written by the host before each update; outputs
/// are read through accessors.
#[derive(Debug, Clone, Default)]
pub struct AxisPlanner {
    pub enable: bool,
    pub pos_cmd: f64,
    pub limits: Limits,
    /// Forbid backing away from the command to avoid overshooting it
    pub disallow_backoff: bool,
    curr_pos: f64,
    curr_vel: f64,
    in_pos_old: f64,
    out_vel_old: f64,
    active: bool,
}

impl AxisPlanner {
    /// A disabled planner at rest at zero
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn curr_pos(&self) -> f64 {
        self.curr_pos
    }

    pub fn curr_vel(&self) -> f64 {
        self.curr_vel
    }

    /// The output has not yet settled on the command
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Re-seat the trajectory at rest at `pos`, with the command following
    pub fn set_position(&mut self, pos: f64) {
        self.pos_cmd = pos;
        self.curr_pos = pos;
        self.curr_vel = 0.0;
        self.in_pos_old = pos;
        self.out_vel_old = 0.0;
        self.active = false;
    }

    /// Advance the axis by one control period
    pub fn update(&mut self, period: f64) -> Step {
        debug_assert!(period > 0.0, "control period must be positive");

        if !self.enable {
            self.pos_cmd = self.curr_pos;
            let hold = Next {
                pos: self.curr_pos,
                vel: 0.0,
                branch: Branch::Hold,
            };
            return self.commit(hold, self.curr_pos, period);
        }

        debug_assert!(
            self.limits.max_vel > 0.0 && self.limits.max_acc > 0.0,
            "max_vel and max_acc must be positive, got {:?}",
            self.limits
        );

        let projection = Projection::new(self, period);
        let next = projection.contain(projection.select(self.disallow_backoff));
        let step = self.commit(next, self.pos_cmd, period);

        tracing::trace!(
            branch = step.branch.as_str(),
            pos_cmd = self.pos_cmd,
            curr_pos = self.curr_pos,
            curr_vel = self.curr_vel,
            active = self.active,
            "axis update"
        );

        step
    }

    fn commit(&mut self, next: Next, in_pos: f64, period: f64) -> Step {
        self.curr_pos = next.pos;
        self.out_vel_old = next.vel;
        self.curr_vel = next.vel;
        self.in_pos_old = in_pos;
        self.active =
            (self.curr_pos - self.pos_cmd).abs() > tiny_dp(self.limits.max_acc, period).abs();
        Step {
            branch: next.branch,
            in_limit: self.curr_pos != self.pos_cmd,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Next {
    pos: f64,
    vel: f64,
    branch: Branch,
}

/// Positions and velocities reachable within one period
#[derive(Debug, Clone, Copy)]
struct Reach {
    min_vel: f64,
    max_vel: f64,
    min_pos: f64,
    max_pos: f64,
}

impl Reach {
    fn new(curr_pos: f64, out_vel_old: f64, limits: &Limits, period: f64) -> Self {
        let slowest = out_vel_old - limits.max_acc * period;
        let fastest = out_vel_old + limits.max_acc * period;
        // over-speed after a limit change: the acceleration bound wins
        let min_vel = slowest.max(-limits.max_vel).min(fastest);
        let max_vel = fastest.min(limits.max_vel).max(slowest);
        Self {
            min_vel,
            max_vel,
            min_pos: curr_pos + min_vel * period,
            max_pos: curr_pos + max_vel * period,
        }
    }

    fn contains(&self, pos: f64, vel: f64) -> bool {
        pos <= self.max_pos && pos >= self.min_pos && vel <= self.max_vel && vel >= self.min_vel
    }

    fn clamp_vel(&self, vel: f64) -> f64 {
        vel.max(self.min_vel).min(self.max_vel)
    }
}

/// Largest speed from which an axis can cover one more period and still
/// stop within `dist`, signed like `dist`.
fn brake_speed(dist: f64, max_acc: f64, period: f64) -> f64 {
    let speed = max_acc * ((period * period + 2.0 * dist.abs() / max_acc).sqrt() - period);
    speed.copysign(dist)
}

/// Everything one update decides on
struct Projection {
    period: f64,
    limits: Limits,
    pos_cmd: f64,
    curr_pos: f64,
    out_vel_old: f64,
    in_vel: f64,
    reach: Reach,
    /// Position after braking to a stop at full deceleration
    vel_0_pos: f64,
    /// Command position once output velocity matches the command's
    vel_match_in_pos: f64,
    /// Output position once its velocity matches the command's
    vel_match_out_pos: f64,
}

impl Projection {
    fn new(tp: &AxisPlanner, period: f64) -> Self {
        let limits = tp.limits;
        let max_acc = limits.max_acc;
        let out_vel_old = tp.out_vel_old;

        let in_vel = (tp.pos_cmd - tp.in_pos_old) / period;
        let reach = Reach::new(tp.curr_pos, out_vel_old, &limits, period);

        let out_dir = if out_vel_old < 0.0 { -1.0 } else { 1.0 };
        let out_dir_rel = if out_vel_old - in_vel < 0.0 { -1.0 } else { 1.0 };

        let vel_0_time = (out_vel_old / max_acc).abs();
        let vel_0_pos = tp.curr_pos
            + out_vel_old * (vel_0_time + period)
            + 0.5 * (-out_dir * max_acc) * vel_0_time.powi(2);

        let vel_match_time = (out_vel_old - in_vel).abs() / max_acc;
        let vel_match_in_pos = tp.pos_cmd + in_vel * vel_match_time;
        let vel_match_out_pos = tp.curr_pos
            + out_vel_old * (vel_match_time + period)
            + 0.5 * (-out_dir_rel * max_acc) * vel_match_time.powi(2);

        Self {
            period,
            limits,
            pos_cmd: tp.pos_cmd,
            curr_pos: tp.curr_pos,
            out_vel_old,
            in_vel,
            reach,
            vel_0_pos,
            vel_match_in_pos,
            vel_match_out_pos,
        }
    }

    fn next(&self, vel: f64, branch: Branch) -> Next {
        let vel = self.reach.clamp_vel(vel);
        Next {
            pos: self.curr_pos + vel * self.period,
            vel,
            branch,
        }
    }

    fn park(&self, pos: f64, branch: Branch) -> Next {
        Next {
            pos,
            vel: 0.0,
            branch,
        }
    }

    fn down(&self, branch: Branch) -> Next {
        self.next(self.reach.min_vel, branch)
    }

    fn up(&self, branch: Branch) -> Next {
        self.next(self.reach.max_vel, branch)
    }

    fn brake(&self, dist: f64) -> f64 {
        brake_speed(dist, self.limits.max_acc, self.period)
    }

    /// Fastest move toward `goal`, moving at `goal_vel`, that can still
    /// match its velocity without passing it.
    ///
    /// `goal` is where the target sits at the end of this period, so the
    /// gap is measured in the target's frame from where it was one period
    /// ago. Otherwise an axis level with a moving command would keep a
    /// lead of one period of travel.
    fn toward(&self, goal: f64, goal_vel: f64, branch: Branch) -> Next {
        let gap = goal - goal_vel * self.period - self.curr_pos;
        self.next(goal_vel + self.brake(gap), branch)
    }

    fn select(&self, disallow_backoff: bool) -> Next {
        let Limits {
            min_pos, max_pos, ..
        } = self.limits;
        let pos_cmd = self.pos_cmd;
        let reach = &self.reach;

        // Stopping point beyond a bound and the bound itself is out of reach
        if self.vel_0_pos >= max_pos && !reach.contains(max_pos, 0.0) {
            let vel = self.out_vel_old.min(self.brake(max_pos - self.curr_pos));
            return self.next(vel, Branch::AvoidMaxOvershoot);
        }
        if self.vel_0_pos <= min_pos && !reach.contains(min_pos, 0.0) {
            let vel = self.out_vel_old.max(-self.brake(self.curr_pos - min_pos));
            return self.next(vel, Branch::AvoidMinOvershoot);
        }

        // Command headed out of bounds: the bound becomes the goal
        if self.vel_match_in_pos < min_pos
            || (pos_cmd <= min_pos && self.vel_match_in_pos < self.vel_match_out_pos)
        {
            if reach.contains(min_pos, 0.0) {
                return self.park(min_pos, Branch::ParkAtMin);
            }
            return self.toward(min_pos, 0.0, Branch::ApproachMin);
        }
        if self.vel_match_in_pos > max_pos
            || (pos_cmd >= max_pos && self.vel_match_in_pos > self.vel_match_out_pos)
        {
            if reach.contains(max_pos, 0.0) {
                return self.park(max_pos, Branch::ParkAtMax);
            }
            return self.toward(max_pos, 0.0, Branch::ApproachMax);
        }

        if reach.contains(pos_cmd, self.in_vel) {
            return Next {
                pos: pos_cmd,
                vel: self.in_vel,
                branch: Branch::Track,
            };
        }

        let ahead = match self.curr_pos.partial_cmp(&pos_cmd) {
            Some(core::cmp::Ordering::Greater) => true,
            Some(core::cmp::Ordering::Less) => false,
            // level with the command: whichever way the output is drifting
            _ => self.out_vel_old >= self.in_vel,
        };

        if ahead {
            if self.vel_match_in_pos < self.vel_match_out_pos {
                self.toward(pos_cmd, self.in_vel, Branch::CloseDown)
            } else if disallow_backoff {
                self.toward(pos_cmd, self.in_vel, Branch::OverrunDown)
            } else {
                self.up(Branch::BackOffUp)
            }
        } else if self.vel_match_in_pos > self.vel_match_out_pos {
            self.toward(pos_cmd, self.in_vel, Branch::CloseUp)
        } else if disallow_backoff {
            self.toward(pos_cmd, self.in_vel, Branch::OverrunUp)
        } else {
            self.down(Branch::BackOffDown)
        }
    }

    /// Replace a candidate that would leave the axis unable to stop inside
    /// its bounds with the fastest move that can.
    fn contain(&self, next: Next) -> Next {
        let Limits {
            min_pos,
            max_pos,
            max_acc,
            ..
        } = self.limits;
        let stop = next.pos + next.vel * next.vel.abs() / (2.0 * max_acc);
        let inside = next.pos >= min_pos && next.pos <= max_pos;
        if inside && stop >= min_pos && stop <= max_pos {
            return next;
        }

        let vel = next
            .vel
            .max(-self.brake(self.curr_pos - min_pos))
            .min(self.brake(max_pos - self.curr_pos));
        self.next(vel, Branch::Contain)
    }
}
