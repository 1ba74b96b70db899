// Swapped X/Z kinematics - joint 0 drives Z and joint 2 drives X

use crate::kinematics::{JointVector, Kinematics, Pose};

/// Like [`IdentityKins`](super::IdentityKins) with the first and third
/// translational joints trading places
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapXzKins;

impl Kinematics for SwapXzKins {
    fn forward(&self, joints: &JointVector) -> Pose {
        let mut swapped = *joints;
        swapped.swap(0, 2);
        Pose::from_array(swapped)
    }

    fn inverse(&self, pose: &Pose) -> JointVector {
        let mut joints = pose.to_array();
        joints.swap(0, 2);
        joints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_swaps_x_and_z() {
        let joints = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let pose = SwapXzKins.forward(&joints);
        assert_eq!(pose.x, 3.0);
        assert_eq!(pose.y, 2.0);
        assert_eq!(pose.z, 1.0);
        assert_eq!(
            [pose.a, pose.b, pose.c, pose.u, pose.v, pose.w],
            [4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
        );
    }

    #[test]
    fn inverse_swaps_back() {
        let pose = Pose {
            x: 10.0,
            y: 20.0,
            z: 30.0,
            ..Pose::default()
        };
        let joints = SwapXzKins.inverse(&pose);
        assert_eq!(joints[0], 30.0);
        assert_eq!(joints[1], 20.0);
        assert_eq!(joints[2], 10.0);
        assert_eq!(SwapXzKins.forward(&joints), pose);
    }
}
