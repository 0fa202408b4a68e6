//! Choosing which joints of a humanoid skeleton get inertialized.
//!
//! Humanoid bones are grouped into [`BodyPart`]s.
//! A [`JointMask`] enables or disables whole body parts and can add extra joints by name;
//! [`JointMask::resolve`] turns it into the ordered joint list
//! an [`Inertializer`][crate::Inertializer] is created with.

use std::collections::BTreeSet;

use crate::skin::{sort_parent_to_child, Skeleton};

macro_rules! human_bones {
    ($($bone:ident,)+) => {
        /// Standard humanoid bones that can be mapped onto a skeleton's joints.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
        pub enum HumanBone {
            $($bone,)+
        }

        impl HumanBone {
            pub const ALL: &'static [HumanBone] = &[$(HumanBone::$bone,)+];
            pub const COUNT: usize = HumanBone::ALL.len();

            /// The bone's name, also used as the default joint name when mapping by name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(HumanBone::$bone => stringify!($bone),)+
                }
            }
        }
    };
}

human_bones! {
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,
    Jaw,
    LeftEye,
    RightEye,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    LeftToes,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
    RightToes,
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
}

/// Groups of humanoid bones that are masked together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyPart {
    Body,
    Head,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    LeftFingers,
    RightFingers,
}

impl BodyPart {
    pub const ALL: [BodyPart; 8] = [
        BodyPart::Body,
        BodyPart::Head,
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftLeg,
        BodyPart::RightLeg,
        BodyPart::LeftFingers,
        BodyPart::RightFingers,
    ];

    /// Bones belonging to this body part.
    pub const fn bones(self) -> &'static [HumanBone] {
        use HumanBone::*;
        match self {
            BodyPart::Body => &[Chest, Hips, Spine, UpperChest],
            BodyPart::Head => &[Head, Neck, LeftEye, RightEye, Jaw],
            BodyPart::LeftArm => &[LeftUpperArm, LeftLowerArm, LeftHand],
            BodyPart::RightArm => &[RightUpperArm, RightLowerArm, RightHand],
            BodyPart::LeftLeg => &[LeftUpperLeg, LeftLowerLeg, LeftFoot, LeftToes],
            BodyPart::RightLeg => &[RightUpperLeg, RightLowerLeg, RightFoot, RightToes],
            BodyPart::LeftFingers => &[
                LeftThumbProximal,
                LeftThumbIntermediate,
                LeftThumbDistal,
                LeftIndexProximal,
                LeftIndexIntermediate,
                LeftIndexDistal,
                LeftMiddleProximal,
                LeftMiddleIntermediate,
                LeftMiddleDistal,
                LeftRingProximal,
                LeftRingIntermediate,
                LeftRingDistal,
                LeftLittleProximal,
                LeftLittleIntermediate,
                LeftLittleDistal,
            ],
            BodyPart::RightFingers => &[
                RightThumbProximal,
                RightThumbIntermediate,
                RightThumbDistal,
                RightIndexProximal,
                RightIndexIntermediate,
                RightIndexDistal,
                RightMiddleProximal,
                RightMiddleIntermediate,
                RightMiddleDistal,
                RightRingProximal,
                RightRingIntermediate,
                RightRingDistal,
                RightLittleProximal,
                RightLittleIntermediate,
                RightLittleDistal,
            ],
        }
    }
}

/// Which joint of a particular skeleton each humanoid bone corresponds to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HumanoidMap {
    joints: [Option<usize>; HumanBone::COUNT],
}

impl Default for HumanoidMap {
    fn default() -> Self {
        Self {
            joints: [None; HumanBone::COUNT],
        }
    }
}

impl HumanoidMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every bone to the joint named like it (see [`HumanBone::as_str`]), where one exists.
    pub fn from_joint_names(skeleton: &impl Skeleton) -> Self {
        let mut map = Self::new();
        for &bone in HumanBone::ALL {
            map.joints[bone as usize] = skeleton.find_joint(bone.as_str());
        }
        map
    }

    #[inline]
    pub fn with_bone(mut self, bone: HumanBone, joint: usize) -> Self {
        self.insert(bone, joint);
        self
    }

    #[inline]
    pub fn insert(&mut self, bone: HumanBone, joint: usize) {
        self.joints[bone as usize] = Some(joint);
    }

    #[inline]
    pub fn get(&self, bone: HumanBone) -> Option<usize> {
        self.joints[bone as usize]
    }
}

/// Selection of joints to inertialize.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct JointMask {
    /// enable flags indexed by `BodyPart as usize`
    parts: [bool; 8],
    /// names of joints to include in addition to the humanoid ones
    extra_joints: Vec<String>,
}

impl Default for JointMask {
    fn default() -> Self {
        Self::all()
    }
}

impl JointMask {
    /// Every body part enabled.
    pub fn all() -> Self {
        Self {
            parts: [true; 8],
            extra_joints: Vec::new(),
        }
    }

    /// Every body part disabled.
    pub fn none() -> Self {
        Self {
            parts: [false; 8],
            extra_joints: Vec::new(),
        }
    }

    #[inline]
    pub fn with_part(mut self, part: BodyPart, active: bool) -> Self {
        self.set_part_active(part, active);
        self
    }

    /// Also track the joint with the given name.
    #[inline]
    pub fn with_joint(mut self, name: impl Into<String>) -> Self {
        self.extra_joints.push(name.into());
        self
    }

    #[inline]
    pub fn set_part_active(&mut self, part: BodyPart, active: bool) {
        self.parts[part as usize] = active;
    }

    #[inline]
    pub fn is_part_active(&self, part: BodyPart) -> bool {
        self.parts[part as usize]
    }

    /// Build the list of joints to track, ordered parent to child.
    ///
    /// Extra joints are added first, then the bones of active body parts;
    /// bones of inactive body parts are removed even if they were listed as extras.
    /// Root joints are never included,
    /// they carry the character's placement rather than its pose.
    /// `None` as the mask enables every body part.
    pub fn resolve(
        mask: Option<&JointMask>,
        skeleton: &impl Skeleton,
        humanoid: &HumanoidMap,
    ) -> Vec<usize> {
        let mut joints = BTreeSet::new();

        if let Some(mask) = mask {
            for name in &mask.extra_joints {
                match skeleton.find_joint(name) {
                    Some(joint) => {
                        joints.insert(joint);
                    }
                    None => log::warn!("Masked joint {name} not found in skeleton"),
                }
            }
        }

        for part in BodyPart::ALL {
            let active = mask.map_or(true, |m| m.is_part_active(part));
            for &bone in part.bones() {
                let Some(joint) = humanoid.get(bone) else {
                    continue;
                };
                if active {
                    joints.insert(joint);
                } else {
                    joints.remove(&joint);
                }
            }
        }

        joints.retain(|&joint| joint < skeleton.joint_count() && skeleton.parent(joint).is_some());

        sort_parent_to_child(skeleton, joints)
    }
}
