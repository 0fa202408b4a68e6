use parking_lot::Mutex;
use std::sync::Arc;

use super::inertializer::InertiaError;

/// A request to (re)start a blend window, applied at the start of the next update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerRequest {
    /// Start a window of `blend_time` seconds on every tracked joint.
    All { blend_time: f32 },
    /// Start a window of `blend_time` seconds on the tracked joint at `index`.
    Joint { index: usize, blend_time: f32 },
}

/// Handle for triggering blends on an [`Inertializer`][super::Inertializer]
/// from outside the code that owns it, possibly from another thread.
///
/// Requests are queued and applied together at the start of the next
/// [`update`][super::Inertializer::update],
/// so a trigger never becomes visible halfway through a frame.
/// The window's start time is the time passed to that update.
#[derive(Clone, Debug)]
pub struct TriggerHandle {
    queue: Arc<Mutex<Vec<TriggerRequest>>>,
    joint_count: usize,
}

impl TriggerHandle {
    pub(crate) fn new(joint_count: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Vec::new())),
            joint_count,
        }
    }

    /// Start a blend window of `blend_time` seconds on every tracked joint.
    pub fn trigger(&self, blend_time: f32) -> Result<(), InertiaError> {
        let blend_time = validate_blend_time(blend_time)?;
        self.queue.lock().push(TriggerRequest::All { blend_time });
        Ok(())
    }

    /// Start a blend window of `blend_time` seconds on the tracked joint at `index`.
    ///
    /// `index` is a position in the tracked joint list, not a skeleton joint index.
    pub fn trigger_joint(&self, index: usize, blend_time: f32) -> Result<(), InertiaError> {
        if index >= self.joint_count {
            return Err(InertiaError::JointOutOfRange {
                index,
                len: self.joint_count,
            });
        }
        let blend_time = validate_blend_time(blend_time)?;
        self.queue
            .lock()
            .push(TriggerRequest::Joint { index, blend_time });
        Ok(())
    }

    /// Queue several per-joint requests under one lock,
    /// so they all land in the same update.
    pub(crate) fn push_all(&self, requests: impl IntoIterator<Item = TriggerRequest>) {
        self.queue.lock().extend(requests);
    }

    /// Number of requests waiting for the next update.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Move all queued requests into `out`, leaving the queue empty.
    pub(crate) fn drain_into(&self, out: &mut Vec<TriggerRequest>) {
        out.append(&mut self.queue.lock());
    }
}

pub(crate) fn validate_blend_time(blend_time: f32) -> Result<f32, InertiaError> {
    if blend_time.is_finite() && blend_time >= 0.0 {
        Ok(blend_time)
    } else {
        Err(InertiaError::InvalidDuration(blend_time))
    }
}
