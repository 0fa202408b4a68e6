use itertools::izip;

use super::{
    settings::InertializerSettings,
    trigger::{validate_blend_time, TriggerHandle, TriggerRequest},
};
use crate::{
    math::{Rotor3, Vec3},
    profile::TransitionProfile,
    skin::{Skeleton, TransformDecomp},
};

/// Error type for invalid arguments to the inertializer and its helpers.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum InertiaError {
    #[error("Tracked joint index {index} out of range for {len} tracked joints")]
    JointOutOfRange { index: usize, len: usize },
    #[error("Blend duration must be finite and non-negative, got {0}")]
    InvalidDuration(f32),
    #[error("Joint {0} does not exist in the skeleton")]
    UnknownJoint(usize),
    #[error("Transition profile has {found} entries but {expected} joints are tracked")]
    ProfileMismatch { expected: usize, found: usize },
    #[error("Invalid inertializer settings: {0}")]
    InvalidSettings(&'static str),
}

/// Coordinate frame a joint's blend is evaluated in.
///
/// Only `Local` is currently evaluated;
/// the others are accepted in profiles but blended as `Local`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum EvaluateSpace {
    /// Relative to the parent joint.
    #[default]
    Local,
    /// Relative to the skeleton root.
    Character,
    World,
}

/// Blend bookkeeping for one tracked joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendState {
    /// Blended position written to the joint two updates ago.
    pub prev_pos: Vec3,
    /// Blended position written to the joint on the last update.
    pub pos: Vec3,
    pub prev_rot: Rotor3,
    pub rot: Rotor3,
    pub space: EvaluateSpace,
    pub begin_time: f32,
    pub end_time: f32,
}

impl BlendState {
    /// State with no blend in flight, resting at the given pose.
    pub fn at_rest(pose: TransformDecomp) -> Self {
        Self {
            prev_pos: pose.pos,
            pos: pose.pos,
            prev_rot: pose.rot,
            rot: pose.rot,
            space: EvaluateSpace::Local,
            begin_time: 0.0,
            end_time: 0.0,
        }
    }

    /// Whether the blend window contains `time`.
    #[inline]
    pub fn is_blending(&self, time: f32) -> bool {
        self.begin_time <= time && time < self.end_time
    }

    fn start_window(&mut self, now: f32, blend_time: f32) {
        self.begin_time = now;
        self.end_time = now + blend_time;
        self.space = EvaluateSpace::Local;
    }

    /// Blend one frame toward `target` and record the result.
    fn step(
        &mut self,
        target: &mut TransformDecomp,
        settings: &InertializerSettings,
        current_time: f32,
        dt: f32,
    ) {
        let tf = (self.end_time - current_time).max(settings.min_remaining);

        let pos = settings
            .position_mode
            .blend_vec3(self.prev_pos, self.pos, target.pos, dt, tf);
        let rot = settings
            .rotation_mode
            .blend_rotor3(self.prev_rot, self.rot, target.rot, dt, tf);

        self.prev_pos = self.pos;
        self.prev_rot = self.rot;
        self.pos = pos;
        self.rot = rot;

        target.pos = pos;
        target.rot = rot;
    }
}

/// Smooths out discontinuities in the poses of a set of joints.
///
/// Every update, the inertializer reads each tracked joint's local pose
/// as written by the animation system (the *target*),
/// and replaces it with a pose that continues the joint's previous motion
/// and decays toward the target over the active blend window.
/// Outside of a blend window the target passes through unchanged.
///
/// Call one of the trigger methods whenever the upstream animation jumps,
/// e.g. when an animation transition fires instantly.
///
/// # Example
///
/// ```
/// # use inertia_blend::{Inertializer, InertializerSettings, Skin, TransformDecomp, Skeleton, math::Vec3};
/// let mut skin = Skin::new();
/// let hand = skin.add_joint("hand", None, TransformDecomp::default()).unwrap();
///
/// let mut inertializer =
///     Inertializer::new(&skin, vec![hand], InertializerSettings::default()).unwrap();
///
/// // the animation jumps
/// skin.joints[hand].local_pose.pos = Vec3::new(1.0, 0.0, 0.0);
/// inertializer.trigger(0.2).unwrap();
///
/// inertializer.update(&mut skin, 0.0, 1.0 / 60.0);
/// // the joint only moved a little toward the new pose
/// assert!(skin.local_pose(hand).pos.x < 0.1);
/// ```
#[derive(Debug)]
pub struct Inertializer {
    joints: Vec<usize>,
    states: Vec<BlendState>,
    /// target poses gathered from the skeleton, overwritten with blended poses
    poses: Vec<TransformDecomp>,
    pending: Vec<TriggerRequest>,
    triggers: TriggerHandle,
    settings: InertializerSettings,
}

impl Inertializer {
    /// Start tracking `joints` of `skeleton`, seeded at their current poses.
    ///
    /// `joints` should be ordered parent to child
    /// (see [`sort_parent_to_child`][crate::skin::sort_parent_to_child]).
    /// Tracked joints are afterwards addressed by their position in this list.
    pub fn new(
        skeleton: &impl Skeleton,
        joints: Vec<usize>,
        settings: InertializerSettings,
    ) -> Result<Self, InertiaError> {
        settings.validate()?;
        if let Some(&bad) = joints.iter().find(|&&j| j >= skeleton.joint_count()) {
            return Err(InertiaError::UnknownJoint(bad));
        }

        let poses: Vec<TransformDecomp> = joints.iter().map(|&j| skeleton.local_pose(j)).collect();
        let states = poses.iter().map(|&pose| BlendState::at_rest(pose)).collect();
        log::debug!("Inertializer tracking {} joints", joints.len());

        Ok(Self {
            triggers: TriggerHandle::new(joints.len()),
            joints,
            states,
            poses,
            pending: Vec::new(),
            settings,
        })
    }

    /// Skeleton joint indices of the tracked joints, in update order.
    #[inline]
    pub fn joints(&self) -> &[usize] {
        &self.joints
    }

    /// Blend states, index-aligned with [`joints`][Self::joints].
    #[inline]
    pub fn states(&self) -> &[BlendState] {
        &self.states
    }

    #[inline]
    pub fn settings(&self) -> &InertializerSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut InertializerSettings {
        &mut self.settings
    }

    /// A handle that can trigger blends on this inertializer from elsewhere.
    pub fn trigger_handle(&self) -> TriggerHandle {
        self.triggers.clone()
    }

    /// Start a blend window of `blend_time` seconds on every tracked joint.
    ///
    /// The window starts at the time given to the next [`update`][Self::update].
    pub fn trigger(&self, blend_time: f32) -> Result<(), InertiaError> {
        self.triggers.trigger(blend_time)
    }

    /// Start a blend window of the configured default length on every tracked joint.
    pub fn trigger_default(&self) -> Result<(), InertiaError> {
        self.triggers.trigger(self.settings.blend_time)
    }

    /// Start a blend window of `blend_time` seconds on the tracked joint at `index`.
    pub fn trigger_joint(&self, index: usize, blend_time: f32) -> Result<(), InertiaError> {
        self.triggers.trigger_joint(index, blend_time)
    }

    /// Start a blend window on every tracked joint with the duration from its profile entry.
    pub fn trigger_profile(&self, profile: &TransitionProfile) -> Result<(), InertiaError> {
        if profile.len() != self.joints.len() {
            return Err(InertiaError::ProfileMismatch {
                expected: self.joints.len(),
                found: profile.len(),
            });
        }
        let mut requests = Vec::with_capacity(profile.len());
        for (index, config) in profile.configs().iter().enumerate() {
            let blend_time = validate_blend_time(config.blend_time)?;
            if config.space != EvaluateSpace::Local {
                log::debug!(
                    "Joint {index} requested {:?} space, blending in local space",
                    config.space
                );
            }
            requests.push(TriggerRequest::Joint { index, blend_time });
        }
        self.triggers.push_all(requests);
        Ok(())
    }

    /// Whether the tracked joint at `index` is inside its blend window at `time`.
    pub fn is_blending(&self, index: usize, time: f32) -> bool {
        self.states
            .get(index)
            .map_or(false, |state| state.is_blending(time))
    }

    /// Whether any tracked joint is inside its blend window at `time`.
    pub fn any_blending(&self, time: f32) -> bool {
        self.states.iter().any(|state| state.is_blending(time))
    }

    /// Step all tracked joints one frame forward,
    /// replacing their target poses in `skeleton` with blended ones.
    ///
    /// Call once per frame after the animation system has written the target poses.
    /// `current_time` must not decrease between calls.
    /// `skeleton` must contain every tracked joint,
    /// normally it is the same skeleton the inertializer was created with.
    pub fn update(&mut self, skeleton: &mut impl Skeleton, current_time: f32, frame_dt: f32) {
        debug_assert!(current_time.is_finite(), "non-finite update time");
        debug_assert!(
            self.joints.iter().all(|&j| j < skeleton.joint_count()),
            "skeleton has fewer joints than the inertializer tracks"
        );
        self.apply_triggers(current_time);

        for (pose, &joint) in izip!(&mut self.poses, &self.joints) {
            *pose = skeleton.local_pose(joint);
        }

        // settings_mut bypasses validation, so never let the step reach zero
        let dt = frame_dt.max(self.settings.min_dt).max(f32::EPSILON);
        step_all(
            &mut self.states,
            &mut self.poses,
            &self.settings,
            current_time,
            dt,
        );

        for (pose, &joint) in izip!(&self.poses, &self.joints) {
            skeleton.set_local_pose(joint, *pose);
        }

        log::trace!(
            "Inertialized {} of {} joints at t={current_time}",
            self.states
                .iter()
                .filter(|state| state.is_blending(current_time))
                .count(),
            self.joints.len()
        );
    }

    fn apply_triggers(&mut self, now: f32) {
        self.triggers.drain_into(&mut self.pending);
        for request in self.pending.drain(..) {
            match request {
                TriggerRequest::All { blend_time } => {
                    log::debug!("Blending all joints over {blend_time}s from t={now}");
                    for state in &mut self.states {
                        state.start_window(now, blend_time);
                    }
                }
                TriggerRequest::Joint { index, blend_time } => {
                    log::debug!("Blending joint {index} over {blend_time}s from t={now}");
                    self.states[index].start_window(now, blend_time);
                }
            }
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn step_all(
    states: &mut [BlendState],
    poses: &mut [TransformDecomp],
    settings: &InertializerSettings,
    current_time: f32,
    dt: f32,
) {
    for (state, pose) in izip!(states, poses) {
        state.step(pose, settings, current_time, dt);
    }
}

// joints don't depend on each other, so each one can go to a different thread
#[cfg(feature = "parallel")]
fn step_all(
    states: &mut [BlendState],
    poses: &mut [TransformDecomp],
    settings: &InertializerSettings,
    current_time: f32,
    dt: f32,
) {
    use rayon::prelude::*;
    states
        .par_iter_mut()
        .zip(poses.par_iter_mut())
        .for_each(|(state, pose)| state.step(pose, settings, current_time, dt));
}
