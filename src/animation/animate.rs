//! Discrete frame animation: frame data plus the `Animate` driver.

use std::fmt;
use std::rc::Rc;

use crate::animation::action::{Kind, Leaf};
use crate::foundation::core::FrameId;
use crate::foundation::error::{ActionError, ActionResult};
use crate::scene::target::Target;

fn one() -> f64 {
    1.0
}

fn one_loop() -> u32 {
    1
}

/// One entry of an [`Animation`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationFrame {
    pub frame: FrameId,
    /// Display time in units of [`Animation::delay_per_unit`].
    #[serde(default = "one")]
    pub delay_units: f64,
    /// Metadata delivered to the frame listener when this frame is displayed.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub user_info: serde_json::Map<String, serde_json::Value>,
}

impl AnimationFrame {
    pub fn new(frame: impl Into<FrameId>, delay_units: f64) -> Self {
        Self {
            frame: frame.into(),
            delay_units,
            user_info: serde_json::Map::new(),
        }
    }

    pub fn with_user_info(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.user_info.insert(key.into(), value);
        self
    }
}

/// Frame sequence consumed by `Animate`. Produced by external loaders or built in code.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Animation {
    pub frames: Vec<AnimationFrame>,
    /// Seconds per delay unit.
    pub delay_per_unit: f64,
    #[serde(default = "one_loop")]
    pub loops: u32,
    #[serde(default)]
    pub restore_original_frame: bool,
}

impl Animation {
    /// One unit per frame, a single loop.
    pub fn from_frames<I, F>(frames: I, delay_per_unit: f64) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FrameId>,
    {
        Self {
            frames: frames
                .into_iter()
                .map(|f| AnimationFrame::new(f, 1.0))
                .collect(),
            delay_per_unit,
            loops: 1,
            restore_original_frame: false,
        }
    }

    pub fn with_loops(mut self, loops: u32) -> Self {
        self.loops = loops;
        self
    }

    pub fn restoring_original_frame(mut self, on: bool) -> Self {
        self.restore_original_frame = on;
        self
    }

    pub fn total_units(&self) -> f64 {
        self.frames.iter().map(|f| f.delay_units).sum()
    }

    /// Seconds for all loops.
    pub fn duration(&self) -> f64 {
        self.total_units() * self.delay_per_unit * f64::from(self.loops)
    }

    pub fn validate(&self) -> ActionResult<()> {
        if self.frames.is_empty() {
            return Err(ActionError::validation("animation has no frames"));
        }
        if self.loops == 0 {
            return Err(ActionError::validation("animation loops must be >= 1"));
        }
        if !self.delay_per_unit.is_finite() || self.delay_per_unit < 0.0 {
            return Err(ActionError::validation(format!(
                "delay_per_unit must be finite and >= 0 (got {})",
                self.delay_per_unit
            )));
        }
        if self
            .frames
            .iter()
            .any(|f| !f.delay_units.is_finite() || f.delay_units < 0.0)
        {
            return Err(ActionError::validation(
                "frame delay units must be finite and >= 0",
            ));
        }
        if self.total_units() <= 0.0 {
            return Err(ActionError::validation("animation has zero total delay"));
        }
        Ok(())
    }

    /// Same frames in reverse order.
    pub fn reversed(&self) -> Self {
        let mut out = self.clone();
        out.frames.reverse();
        out
    }

    /// Cumulative start time of each frame as a fraction of one loop.
    fn split_times(&self) -> Vec<f64> {
        let total = self.total_units();
        let mut acc = 0.0;
        self.frames
            .iter()
            .map(|f| {
                let at = acc / total;
                acc += f.delay_units;
                at
            })
            .collect()
    }
}

/// Frame-displayed notification: the target and the frame that was just shown.
#[derive(Clone)]
pub(crate) struct FrameFn(pub(crate) Rc<dyn Fn(&mut dyn Target, &AnimationFrame)>);

impl fmt::Debug for FrameFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FrameFn(..)")
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Animate {
    animation: Animation,
    split_times: Vec<f64>,
    next_frame: usize,
    executed_loops: u32,
    original: Option<FrameId>,
    listener: Option<FrameFn>,
}

impl Animate {
    /// `animation` must already be validated.
    pub(crate) fn new(animation: Animation, listener: Option<FrameFn>) -> Self {
        let split_times = animation.split_times();
        Self {
            animation,
            split_times,
            next_frame: 0,
            executed_loops: 0,
            original: None,
            listener,
        }
    }

    fn show(&self, idx: usize, target: &mut dyn Target) {
        let entry = &self.animation.frames[idx];
        if !target.set_display_frame(&entry.frame) {
            tracing::warn!(frame = %entry.frame, "target has no such frame; skipping");
            return;
        }
        if entry.user_info.is_empty() {
            return;
        }
        if let Some(listener) = &self.listener {
            (listener.0)(target, entry);
        }
    }
}

impl Leaf for Animate {
    fn start(&mut self, target: &mut dyn Target) {
        self.original = target.display_frame();
        self.next_frame = 0;
        self.executed_loops = 0;
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        let mut t = t;
        if t < 1.0 {
            t *= f64::from(self.animation.loops);
            let loop_number = t.max(0.0) as u32;
            if loop_number > self.executed_loops {
                self.next_frame = 0;
                self.executed_loops += 1;
            }
            t %= 1.0;
        }

        let frames = self.split_times.len();
        for i in self.next_frame..frames {
            if self.split_times[i] > t {
                break;
            }
            self.show(i, target);
            self.next_frame = i + 1;
        }
    }

    fn at_stop(&mut self, target: &mut dyn Target) {
        if !self.animation.restore_original_frame {
            return;
        }
        if let Some(original) = &self.original {
            target.set_display_frame(original);
        }
    }

    fn reversed(&self) -> ActionResult<Kind> {
        Ok(Kind::Animate(Self::new(
            self.animation.reversed(),
            self.listener.clone(),
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animate.rs"]
mod tests;
