//! Inertialization of skeletal animation poses.
//!
//! When the animation driving a skeleton switches source instantly,
//! e.g. a state machine transition without a crossfade, the pose jumps.
//! An [`Inertializer`] removes the jump by continuing each joint's previous motion
//! and decaying its offset from the new pose to zero over a short blend window,
//! following a closed-form quintic curve
//! (see [`animation::interpolation`]).
//!
//! The usual setup is:
//! 1. pick the joints to smooth, e.g. with a [`JointMask`],
//! 2. create an [`Inertializer`] for them,
//! 3. every frame, after the animation system has posed the skeleton,
//!    call [`Inertializer::update`],
//! 4. call [`Inertializer::trigger`] whenever the animation jumps.

pub mod animation;
pub use animation::{
    BlendMode, BlendState, EvaluateSpace, InertiaError, Inertializer, InertializerSettings,
    TriggerHandle, TriggerRequest,
};

pub mod mask;
pub use mask::{BodyPart, HumanBone, HumanoidMap, JointMask};

pub mod math;
pub use math::uv;

pub mod profile;
pub use profile::{TransformConfig, TransitionProfile};

pub mod skin;
pub use skin::{sort_parent_to_child, Joint, Skeleton, Skin, TransformDecomp};
