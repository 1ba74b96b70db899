// Identity kinematics - joint i drives Cartesian axis i

use crate::kinematics::{JointVector, Kinematics, Pose};

/// Joints map one-to-one onto `x y z a b c u v w`
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityKins;

impl Kinematics for IdentityKins {
    fn forward(&self, joints: &JointVector) -> Pose {
        Pose::from_array(*joints)
    }

    fn inverse(&self, pose: &Pose) -> JointVector {
        pose.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_copies_joints_in_axis_order() {
        let joints = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let pose = IdentityKins.forward(&joints);
        assert_eq!(pose.x, 1.0);
        assert_eq!(pose.y, 2.0);
        assert_eq!(pose.z, 3.0);
        assert_eq!(pose.a, 4.0);
        assert_eq!(pose.w, 9.0);
    }

    #[test]
    fn inverse_undoes_forward() {
        let joints = [-0.5, 12.0, 3.25, 90.0, 0.0, -45.0, 1.0, 2.0, 3.0];
        assert_eq!(IdentityKins.inverse(&IdentityKins.forward(&joints)), joints);
    }
}
