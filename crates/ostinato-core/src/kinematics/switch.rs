//! Runtime-selectable kinematics with continuous joint output.
//!
//! The host calls [`KinematicsSwitch::forward`] and then
//! [`KinematicsSwitch::inverse`] once per control period. A change of the
//! selector is detected in `forward`, which recomputes a per-method joint
//! correction from the last consistent joint/pose pair. `inverse` adds the
//! active correction, so the joint command handed to the position loop
//! does not jump when the transform changes underneath it.

use crate::kinematics::{
    CORRECTED_JOINTS, ForwardFlags, InverseFlags, JOINT_COUNT, JointVector, Kinematics,
    KinematicsType, Method, Pose,
};

#[derive(Debug, Clone)]
pub struct KinematicsSwitch {
    selector: u32,
    active: Method,
    previous: Method,
    /// Set by `forward` on a switch, cleared by the following `inverse`
    method_changed: bool,
    corrections: [JointVector; Method::COUNT],
}

impl Default for KinematicsSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl KinematicsSwitch {
    pub const fn new() -> Self {
        Self {
            selector: 0,
            active: Method::Identity,
            previous: Method::Identity,
            method_changed: false,
            corrections: [[0.0; JOINT_COUNT]; Method::COUNT],
        }
    }

    /// Latch the externally driven method selector. It takes effect on the
    /// next `forward` call.
    pub fn set_selector(&mut self, selector: u32) {
        self.selector = selector;
    }

    pub fn selector(&self) -> u32 {
        self.selector
    }

    pub fn active_method(&self) -> Method {
        self.active
    }

    /// A switch was detected by `forward` and not yet applied by `inverse`
    pub fn method_changed(&self) -> bool {
        self.method_changed
    }

    pub fn correction(&self, method: Method) -> &JointVector {
        &self.corrections[method.index()]
    }

    pub fn kinematics_type(&self) -> KinematicsType {
        KinematicsType::Both
    }

    /// Joints to Cartesian pose.
    ///
    /// On entry `pose` must hold the pose the host last commanded, which is
    /// what the corrections are computed against when a switch is detected.
    pub fn forward(&mut self, joints: &JointVector, pose: &mut Pose) {
        self.active = Method::from_selector(self.selector);
        if self.active != self.previous {
            self.method_changed = true;
            tracing::info!(
                old = %self.previous,
                new = %self.active,
                x = pose.x,
                y = pose.y,
                z = pose.z,
                j0 = joints[0],
                j1 = joints[1],
                j2 = joints[2],
                "kinematics method changed"
            );
            self.compute_corrections(joints, pose);
            self.previous = self.active;
        }

        let correction = &self.corrections[self.active.index()];
        let mut raw = *joints;
        for (joint, offset) in raw.iter_mut().zip(correction).take(CORRECTED_JOINTS) {
            *joint -= offset;
        }
        *pose = self.active.forward(&raw);
    }

    /// Cartesian pose to joints
    pub fn inverse(&mut self, pose: &Pose) -> JointVector {
        let correction = &self.corrections[self.active.index()];
        let mut joints = self.active.inverse(pose);
        for (joint, offset) in joints.iter_mut().zip(correction).take(CORRECTED_JOINTS) {
            *joint += offset;
        }

        if self.method_changed {
            tracing::info!(
                method = %self.active,
                x = pose.x,
                y = pose.y,
                z = pose.z,
                c0 = correction[0],
                c1 = correction[1],
                c2 = correction[2],
                j0 = joints[0],
                j1 = joints[1],
                j2 = joints[2],
                "kinematics correction applied"
            );
            self.previous = self.active;
            self.method_changed = false;
        }

        joints
    }

    /// Service a home request: clear both flag sets and run `forward`
    pub fn home(
        &mut self,
        joints: &JointVector,
        world: &mut Pose,
        fflags: &mut ForwardFlags,
        iflags: &mut InverseFlags,
    ) {
        *fflags = ForwardFlags::default();
        *iflags = InverseFlags::default();
        self.forward(joints, world);
    }

    fn compute_corrections(&mut self, joints: &JointVector, pose: &Pose) {
        for method in Method::ALL {
            let raw = method.inverse(pose);
            let correction = &mut self.corrections[method.index()];
            for ((offset, joint), raw) in correction
                .iter_mut()
                .zip(joints)
                .zip(&raw)
                .take(CORRECTED_JOINTS)
            {
                *offset = joint - raw;
            }
        }
    }
}
