//! Joint hierarchies the inertializer reads target poses from and writes blended poses to.

use crate::{
    animation::InertiaError,
    math::{Rotor3, Vec3},
};

/// Anything holding a hierarchy of joints with local poses.
///
/// Joints are addressed by dense indices in `0..joint_count()`.
/// Implement this for your engine's skeleton representation
/// to drive it with an [`Inertializer`][crate::Inertializer],
/// or use the provided [`Skin`].
pub trait Skeleton {
    fn joint_count(&self) -> usize;
    /// Index of the joint's parent, or `None` for a root.
    fn parent(&self, joint: usize) -> Option<usize>;
    fn joint_name(&self, joint: usize) -> Option<&str>;
    /// Pose of the joint relative to its parent.
    fn local_pose(&self, joint: usize) -> TransformDecomp;
    fn set_local_pose(&mut self, joint: usize, pose: TransformDecomp);

    /// Find the first joint with the given name.
    fn find_joint(&self, name: &str) -> Option<usize> {
        (0..self.joint_count()).find(|&j| self.joint_name(j) == Some(name))
    }
}

/// A hierarchy of joints with local poses.
#[derive(Debug, Clone, Default)]
pub struct Skin {
    pub joints: Vec<Joint>,
}

#[derive(Debug, Clone)]
pub struct Joint {
    pub name: Option<String>,
    /// index of the joint's parent joint in the skin's `joints` array
    pub parent_idx: Option<usize>,
    /// pose relative to the parent joint, written by animations and the inertializer
    pub local_pose: TransformDecomp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformDecomp {
    pub pos: Vec3,
    pub rot: Rotor3,
    pub scale: Vec3,
}

impl Default for TransformDecomp {
    fn default() -> Self {
        Self {
            pos: Vec3::zero(),
            rot: Rotor3::identity(),
            scale: Vec3::one(),
        }
    }
}

impl TransformDecomp {
    pub fn new(pos: Vec3, rot: Rotor3) -> Self {
        Self {
            pos,
            rot,
            scale: Vec3::one(),
        }
    }
}

impl Skin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a joint and return its index.
    ///
    /// Parents must be added before their children,
    /// which keeps the hierarchy free of cycles.
    pub fn add_joint(
        &mut self,
        name: impl Into<String>,
        parent_idx: Option<usize>,
        local_pose: TransformDecomp,
    ) -> Result<usize, InertiaError> {
        if let Some(parent) = parent_idx {
            if parent >= self.joints.len() {
                return Err(InertiaError::UnknownJoint(parent));
            }
        }
        self.joints.push(Joint {
            name: Some(name.into()),
            parent_idx,
            local_pose,
        });
        Ok(self.joints.len() - 1)
    }
}

impl Skeleton for Skin {
    #[inline]
    fn joint_count(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    fn parent(&self, joint: usize) -> Option<usize> {
        self.joints[joint].parent_idx
    }

    #[inline]
    fn joint_name(&self, joint: usize) -> Option<&str> {
        self.joints[joint].name.as_deref()
    }

    #[inline]
    fn local_pose(&self, joint: usize) -> TransformDecomp {
        self.joints[joint].local_pose
    }

    #[inline]
    fn set_local_pose(&mut self, joint: usize, pose: TransformDecomp) {
        self.joints[joint].local_pose = pose;
    }
}

/// Number of ancestors of a joint.
///
/// Stops counting after `joint_count` steps in case the parent links form a cycle.
fn depth(skeleton: &impl Skeleton, joint: usize) -> usize {
    let mut depth = 0;
    let mut curr = joint;
    while let Some(parent) = skeleton.parent(curr) {
        depth += 1;
        if depth > skeleton.joint_count() {
            break;
        }
        curr = parent;
    }
    depth
}

/// Order a set of joints so that every joint comes after all of its ancestors.
///
/// Duplicates are removed. Joints at the same depth keep their index order.
pub fn sort_parent_to_child(
    skeleton: &impl Skeleton,
    joints: impl IntoIterator<Item = usize>,
) -> Vec<usize> {
    let mut keyed: Vec<(usize, usize)> = joints
        .into_iter()
        .map(|j| (depth(skeleton, j), j))
        .collect();
    keyed.sort_unstable();
    keyed.dedup();
    keyed.into_iter().map(|(_, j)| j).collect()
}
