//! Joint space <-> Cartesian space transforms.
//!
//! Each kinematics method is a fixed, stateless transform pair. The
//! [`switch::KinematicsSwitch`] selects one of them at runtime and keeps the
//! commanded joint position continuous when the selection changes.

use core::fmt;

pub mod identity;
pub mod swap_xz;
pub mod switch;

pub use identity::IdentityKins;
pub use swap_xz::SwapXzKins;
pub use switch::KinematicsSwitch;

/// Number of joints handled by every transform
pub const JOINT_COUNT: usize = 9;

/// Leading joints that carry a switch correction. Joints past this index
/// (rotary and auxiliary axes) pass through the transforms unchanged.
pub const CORRECTED_JOINTS: usize = 3;

pub type JointVector = [f64; JOINT_COUNT];

/// A Cartesian pose: three linear axes, three rotary axes and three
/// auxiliary linear axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

impl Pose {
    /// Build a pose from values in `x y z a b c u v w` order
    pub const fn from_array(values: [f64; JOINT_COUNT]) -> Self {
        let [x, y, z, a, b, c, u, v, w] = values;
        Self {
            x,
            y,
            z,
            a,
            b,
            c,
            u,
            v,
            w,
        }
    }

    pub const fn to_array(&self) -> [f64; JOINT_COUNT] {
        [
            self.x, self.y, self.z, self.a, self.b, self.c, self.u, self.v, self.w,
        ]
    }
}

/// A raw, correction-free transform pair
pub trait Kinematics {
    fn forward(&self, joints: &JointVector) -> Pose;
    fn inverse(&self, pose: &Pose) -> JointVector;
}

/// Which directions a kinematics module can transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KinematicsType {
    /// Forward only
    ForwardOnly,
    /// Inverse only
    InverseOnly,
    /// Joints map one-to-one onto axes
    Identity,
    /// Both forward and inverse are available
    Both,
}

/// Flags passed alongside forward transforms. No method defines any bits;
/// homing resets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardFlags(pub u64);

/// Flags passed alongside inverse transforms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InverseFlags(pub u64);

/// The set of transform pairs the switcher can select
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// Joints align with the Cartesian axes
    #[default]
    Identity,
    /// The X and Z joints trade places
    SwapXz,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Identity, Method::SwapXz];
    pub const COUNT: usize = Self::ALL.len();

    /// Map an externally driven selector onto a method, wrapping values
    /// past the last method.
    pub const fn from_selector(selector: u32) -> Self {
        Self::ALL[selector as usize % Self::COUNT]
    }

    pub const fn index(self) -> usize {
        match self {
            Method::Identity => 0,
            Method::SwapXz => 1,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "identity" | "0" => Some(Method::Identity),
            "swap_xz" | "swap-xz" | "1" => Some(Method::SwapXz),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Identity => write!(f, "identity({})", self.index()),
            Method::SwapXz => write!(f, "swap_xz({})", self.index()),
        }
    }
}

impl Kinematics for Method {
    fn forward(&self, joints: &JointVector) -> Pose {
        match self {
            Method::Identity => IdentityKins.forward(joints),
            Method::SwapXz => SwapXzKins.forward(joints),
        }
    }

    fn inverse(&self, pose: &Pose) -> JointVector {
        match self {
            Method::Identity => IdentityKins.inverse(pose),
            Method::SwapXz => SwapXzKins.inverse(pose),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_wraps_modulo_method_count() {
        assert_eq!(Method::from_selector(0), Method::Identity);
        assert_eq!(Method::from_selector(1), Method::SwapXz);
        assert_eq!(Method::from_selector(2), Method::Identity);
        assert_eq!(Method::from_selector(7), Method::SwapXz);
        assert_eq!(Method::from_selector(u32::MAX), Method::SwapXz);
    }

    #[test]
    fn method_parse() {
        assert_eq!(Method::parse("identity"), Some(Method::Identity));
        assert_eq!(Method::parse("SWAP_XZ"), Some(Method::SwapXz));
        assert_eq!(Method::parse("1"), Some(Method::SwapXz));
        assert_eq!(Method::parse("polar"), None);
    }

    #[test]
    fn pose_array_order() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let pose = Pose::from_array(values);
        assert_eq!(pose.x, 1.0);
        assert_eq!(pose.c, 6.0);
        assert_eq!(pose.w, 9.0);
        assert_eq!(pose.to_array(), values);
    }

    #[test]
    fn raw_round_trip_for_every_method() {
        bolero::check!()
            .with_type::<[i32; JOINT_COUNT]>()
            .cloned()
            .for_each(|raw| {
                let joints = raw.map(|v| v as f64 / 1024.0);
                for method in Method::ALL {
                    let back = method.inverse(&method.forward(&joints));
                    assert_eq!(back, joints, "{method}");
                }
            });
    }
}
