//! Closed-form decay curves for inertialization.
//!
//! An offset `x0` from the target that is changing at rate `v0` is decayed to zero
//! over `tf` seconds with a quintic polynomial.
//! At `t = 0` the curve and its derivative equal `x0` and `v0`,
//! at `t = tf` value, velocity and acceleration are all zero,
//! so the blended motion continues the old motion and lands on the target smoothly.

/// Windows shorter than this snap straight to the target.
pub const MIN_DURATION: f32 = 1e-5;

/// Coefficients of a decay curve, solved once and evaluated at any time in the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayCurve {
    x0: f32,
    v0: f32,
    a0: f32,
    a: f32,
    b: f32,
    c: f32,
    /// duration after the overshoot clamp
    tf: f32,
}

impl DecayCurve {
    /// Fit a curve to the offset `x0` and its velocity `v0` over a window of `tf` seconds.
    ///
    /// If continuing at `v0` would cross the target sooner than `tf`
    /// (specifically, within `5 * x0 / |v0|` seconds),
    /// the window is shortened so the curve doesn't overshoot.
    pub fn new(x0: f32, v0: f32, tf: f32) -> Self {
        let mut tf = tf;
        if v0 != 0.0 {
            let tf1 = -5.0 * x0 / v0;
            if tf1 > 0.0 {
                tf = tf.min(tf1);
            }
        }

        if tf < MIN_DURATION {
            return Self {
                x0,
                v0,
                a0: 0.0,
                a: 0.0,
                b: 0.0,
                c: 0.0,
                tf: 0.0,
            };
        }

        let tf2 = tf * tf;
        let tf3 = tf2 * tf;
        let tf4 = tf3 * tf;
        let tf5 = tf4 * tf;

        let a0 = (-8.0 * v0 * tf - 20.0 * x0) / tf2;
        let a = -(a0 * tf2 + 6.0 * v0 * tf + 12.0 * x0) / (2.0 * tf5);
        let b = (3.0 * a0 * tf2 + 16.0 * v0 * tf + 30.0 * x0) / (2.0 * tf4);
        let c = -(3.0 * a0 * tf2 + 12.0 * v0 * tf + 20.0 * x0) / (2.0 * tf3);

        Self {
            x0,
            v0,
            a0,
            a,
            b,
            c,
            tf,
        }
    }

    /// Length of the window after clamping. Zero if the curve snaps immediately.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.tf
    }

    /// Offset from the target `t` seconds into the window.
    ///
    /// Past the end of the window this is exactly zero.
    pub fn eval(&self, t: f32) -> f32 {
        if self.tf < MIN_DURATION {
            return 0.0;
        }
        let t = t.min(self.tf);
        if t >= self.tf {
            return 0.0;
        }

        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;
        let t5 = t4 * t;

        self.a * t5 + self.b * t4 + self.c * t3 + (self.a0 / 2.0) * t2 + self.v0 * t + self.x0
    }
}

/// Offset from the target `t` seconds into a blend window of `tf` seconds,
/// starting from offset `x0` moving at `v0` units per second.
///
/// `dt` is the frame time step the velocity was measured over.
pub fn inertialize(x0: f32, v0: f32, dt: f32, tf: f32, t: f32) -> f32 {
    debug_assert!(dt > 0.0, "inertialize called with a non-positive time step");
    debug_assert!(
        x0.is_finite() && v0.is_finite(),
        "inertialize called with a non-finite offset"
    );
    DecayCurve::new(x0, v0, tf).eval(t)
}

/// [`inertialize`] with the offset and velocity estimated from two consecutive samples
/// (`prev` one step of `dt` before `curr`) and the target value.
#[inline]
pub fn inertialize_from_samples(prev: f32, curr: f32, target: f32, dt: f32, tf: f32, t: f32) -> f32 {
    let x0 = curr - target;
    let v0 = (curr - prev) / dt;
    inertialize(x0, v0, dt, tf, t)
}
