//! Per-joint blend configuration for a transition.

use crate::animation::EvaluateSpace;

/// How one tracked joint blends during a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformConfig {
    #[cfg_attr(feature = "serde-types", serde(default))]
    pub space: EvaluateSpace,
    pub blend_time: f32,
}

/// Blend settings for every tracked joint of an [`Inertializer`][crate::Inertializer],
/// index-aligned with its joint list.
///
/// Lets a transition settle different parts of the body at different speeds,
/// e.g. a quick blend on the spine and a slower one on the arms.
/// Apply with [`Inertializer::trigger_profile`][crate::Inertializer::trigger_profile].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(transparent))]
pub struct TransitionProfile {
    configs: Vec<TransformConfig>,
}

impl TransitionProfile {
    pub fn new(configs: Vec<TransformConfig>) -> Self {
        Self { configs }
    }

    /// The same blend time for `joint_count` joints.
    pub fn uniform(joint_count: usize, blend_time: f32) -> Self {
        Self {
            configs: vec![
                TransformConfig {
                    space: EvaluateSpace::Local,
                    blend_time,
                };
                joint_count
            ],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    #[inline]
    pub fn configs(&self) -> &[TransformConfig] {
        &self.configs
    }

    #[inline]
    pub fn configs_mut(&mut self) -> &mut [TransformConfig] {
        &mut self.configs
    }
}
