pub mod blend;
pub mod inertializer;
pub use inertializer::{BlendState, EvaluateSpace, InertiaError, Inertializer};
pub mod interpolation;
pub mod settings;
pub use settings::{BlendMode, InertializerSettings};
pub mod trigger;
pub use trigger::{TriggerHandle, TriggerRequest};
