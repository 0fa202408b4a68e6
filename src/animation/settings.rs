use super::{blend, inertializer::InertiaError, trigger::validate_blend_time};
use crate::math::{Rotor3, Vec3};

/// Which blend to use for a joint property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendMode {
    /// Decay the distance (or angle) to the target along a single direction (or axis).
    #[default]
    Magnitude,
    /// Decay every component separately.
    Direct,
}

impl BlendMode {
    #[inline]
    pub(crate) fn blend_vec3(self, prev: Vec3, curr: Vec3, target: Vec3, dt: f32, tf: f32) -> Vec3 {
        match self {
            BlendMode::Magnitude => {
                blend::inertialize_magnitude_vec3(prev, curr, target, dt, tf, dt)
            }
            BlendMode::Direct => blend::inertialize_direct_vec3(prev, curr, target, dt, tf, dt),
        }
    }

    #[inline]
    pub(crate) fn blend_rotor3(
        self,
        prev: Rotor3,
        curr: Rotor3,
        target: Rotor3,
        dt: f32,
        tf: f32,
    ) -> Rotor3 {
        match self {
            BlendMode::Magnitude => {
                blend::inertialize_magnitude_rotor3(prev, curr, target, dt, tf, dt)
            }
            BlendMode::Direct => blend::inertialize_direct_rotor3(prev, curr, target, dt, tf, dt),
        }
    }
}

/// Tunable parameters of an [`Inertializer`][super::Inertializer].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-types", serde(default))]
pub struct InertializerSettings {
    /// Blend window length in seconds used by
    /// [`trigger_default`][super::Inertializer::trigger_default].
    pub blend_time: f32,
    pub position_mode: BlendMode,
    pub rotation_mode: BlendMode,
    /// Lower bound for the time step velocities are estimated over.
    /// Stalled frames would otherwise produce huge velocity estimates.
    pub min_dt: f32,
    /// Lower bound for the remaining window length.
    pub min_remaining: f32,
}

impl Default for InertializerSettings {
    fn default() -> Self {
        Self {
            blend_time: 0.5,
            position_mode: BlendMode::Magnitude,
            rotation_mode: BlendMode::Magnitude,
            min_dt: 1.0 / 120.0,
            min_remaining: 1e-4,
        }
    }
}

impl InertializerSettings {
    #[inline]
    pub fn with_blend_time(mut self, blend_time: f32) -> Self {
        self.blend_time = blend_time;
        self
    }

    #[inline]
    pub fn with_position_mode(mut self, mode: BlendMode) -> Self {
        self.position_mode = mode;
        self
    }

    #[inline]
    pub fn with_rotation_mode(mut self, mode: BlendMode) -> Self {
        self.rotation_mode = mode;
        self
    }

    #[inline]
    pub fn with_min_dt(mut self, min_dt: f32) -> Self {
        self.min_dt = min_dt;
        self
    }

    #[inline]
    pub fn with_min_remaining(mut self, min_remaining: f32) -> Self {
        self.min_remaining = min_remaining;
        self
    }

    /// Check that every value is usable.
    ///
    /// The lower bounds must be finite and positive
    /// and the default blend time finite and non-negative.
    pub fn validate(&self) -> Result<(), InertiaError> {
        validate_blend_time(self.blend_time).map_err(|_| {
            InertiaError::InvalidSettings("blend_time must be finite and non-negative")
        })?;
        if !(self.min_dt.is_finite() && self.min_dt > 0.0) {
            return Err(InertiaError::InvalidSettings("min_dt must be finite and positive"));
        }
        if !(self.min_remaining.is_finite() && self.min_remaining > 0.0) {
            return Err(InertiaError::InvalidSettings(
                "min_remaining must be finite and positive",
            ));
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "serde-types"))]
mod tests {
    use super::*;

    #[test]
    fn ron_round_trip() {
        let settings = InertializerSettings::default()
            .with_blend_time(0.25)
            .with_rotation_mode(BlendMode::Direct);
        let text = ron::to_string(&settings).unwrap();
        let back: InertializerSettings = ron::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: InertializerSettings = ron::from_str("(blend_time: 0.3)").unwrap();
        assert_eq!(settings, InertializerSettings::default().with_blend_time(0.3));
    }
}
