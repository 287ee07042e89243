//! Leaf motion primitives: the interval tweens, the instants and their reverse rules.
//!
//! Every primitive captures its start values in `start` and computes
//! `start + delta * t` in `step`, so driving it with an eased or remapped `t` is always valid.

use std::fmt;
use std::rc::Rc;

use crate::animation::action::{Kind, Leaf};
use crate::foundation::core::{Rgb8, Size, Vec2};
use crate::foundation::error::{ActionError, ActionResult};
use crate::foundation::math::{bezier_at, lerp, offset_u8, shortest_arc};
use crate::scene::target::Target;

/// Additive position bookkeeping shared by the position-driving primitives.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Stack {
    pub(crate) enabled: bool,
    previous: Vec2,
}

impl Stack {
    pub(crate) fn reset(&mut self, position: Vec2) {
        self.previous = position;
    }

    /// Movement applied to the target by someone else since the last write.
    pub(crate) fn drift(&self, current: Vec2) -> Vec2 {
        if self.enabled {
            current - self.previous
        } else {
            Vec2::ZERO
        }
    }

    pub(crate) fn record(&mut self, position: Vec2) {
        self.previous = position;
    }
}

/// Closure driven by `ActionFloat` with the tweened value.
#[derive(Clone)]
pub(crate) struct FloatFn(pub(crate) Rc<dyn Fn(&mut dyn Target, f64)>);

impl fmt::Debug for FloatFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FloatFn(..)")
    }
}

/// Closure run once by `CallFunc`.
#[derive(Clone)]
pub(crate) struct CallFn(pub(crate) Rc<dyn Fn(&mut dyn Target)>);

impl fmt::Debug for CallFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallFn(..)")
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Instant {
    Show,
    Hide,
    ToggleVisibility,
    Place(Vec2),
    Call(CallFn),
}

impl Instant {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Show => "Show",
            Self::Hide => "Hide",
            Self::ToggleVisibility => "ToggleVisibility",
            Self::Place(_) => "Place",
            Self::Call(_) => "CallFunc",
        }
    }
}

impl Leaf for Instant {
    fn start(&mut self, _target: &mut dyn Target) {}

    fn step(&mut self, _t: f64, target: &mut dyn Target) {
        match self {
            Self::Show => target.set_visible(true),
            Self::Hide => target.set_visible(false),
            Self::ToggleVisibility => {
                let visible = target.is_visible();
                target.set_visible(!visible);
            }
            Self::Place(p) => target.set_position(*p),
            Self::Call(f) => (f.0)(target),
        }
    }

    fn reversed(&self) -> ActionResult<Kind> {
        let inv = match self {
            Self::Show => Self::Hide,
            Self::Hide => Self::Show,
            Self::ToggleVisibility => Self::ToggleVisibility,
            Self::Call(f) => Self::Call(f.clone()),
            Self::Place(_) => return Err(ActionError::NotReversible("Place")),
        };
        Ok(Kind::Instant(inv))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Delay;

impl Leaf for Delay {
    fn start(&mut self, _target: &mut dyn Target) {}

    fn step(&mut self, _t: f64, _target: &mut dyn Target) {}

    fn reversed(&self) -> ActionResult<Kind> {
        Ok(Kind::Delay(Delay))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Move {
    delta: Vec2,
    delta_z: f64,
    dest: Option<Vec2>,
    dest_z: Option<f64>,
    three_d: bool,
    start: Vec2,
    start_z: f64,
    pub(crate) stack: Stack,
}

impl Move {
    pub(crate) fn by(delta: Vec2) -> Self {
        Self::new(delta, 0.0, None, None, false)
    }

    pub(crate) fn to(dest: Vec2) -> Self {
        Self::new(Vec2::ZERO, 0.0, Some(dest), None, false)
    }

    pub(crate) fn by_3d(delta: Vec2, delta_z: f64) -> Self {
        Self::new(delta, delta_z, None, None, true)
    }

    pub(crate) fn to_3d(dest: Vec2, dest_z: f64) -> Self {
        Self::new(Vec2::ZERO, 0.0, Some(dest), Some(dest_z), true)
    }

    fn new(
        delta: Vec2,
        delta_z: f64,
        dest: Option<Vec2>,
        dest_z: Option<f64>,
        three_d: bool,
    ) -> Self {
        Self {
            delta,
            delta_z,
            dest,
            dest_z,
            three_d,
            start: Vec2::ZERO,
            start_z: 0.0,
            stack: Stack::default(),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match (self.dest.is_some(), self.three_d) {
            (false, false) => "MoveBy",
            (true, false) => "MoveTo",
            (false, true) => "MoveBy3D",
            (true, true) => "MoveTo3D",
        }
    }
}

impl Leaf for Move {
    fn start(&mut self, target: &mut dyn Target) {
        self.start = target.position();
        self.start_z = target.position_z();
        if let Some(dest) = self.dest {
            self.delta = dest - self.start;
        }
        if let Some(z) = self.dest_z {
            self.delta_z = z - self.start_z;
        }
        self.stack.reset(self.start);
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        self.start += self.stack.drift(target.position());
        let p = self.start + self.delta * t;
        target.set_position(p);
        self.stack.record(p);
        if self.three_d {
            target.set_position_z(self.start_z + self.delta_z * t);
        }
    }

    fn reversed(&self) -> ActionResult<Kind> {
        if self.dest.is_some() {
            return Err(ActionError::NotReversible(self.name()));
        }
        let mut inv = Self::new(-self.delta, -self.delta_z, None, None, self.three_d);
        inv.stack.enabled = self.stack.enabled;
        Ok(Kind::Move(inv))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Rotate {
    delta: Vec2,
    dest: Option<Vec2>,
    start: Vec2,
}

impl Rotate {
    pub(crate) fn by(delta: Vec2) -> Self {
        Self {
            delta,
            dest: None,
            start: Vec2::ZERO,
        }
    }

    pub(crate) fn to(dest: Vec2) -> Self {
        Self {
            delta: Vec2::ZERO,
            dest: Some(dest),
            start: Vec2::ZERO,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        if self.dest.is_some() { "RotateTo" } else { "RotateBy" }
    }
}

impl Leaf for Rotate {
    fn start(&mut self, target: &mut dyn Target) {
        let current = target.rotation();
        match self.dest {
            Some(dest) => {
                let (sx, dx) = shortest_arc(current.x, dest.x, 360.0);
                let (sy, dy) = shortest_arc(current.y, dest.y, 360.0);
                self.start = Vec2::new(sx, sy);
                self.delta = Vec2::new(dx, dy);
            }
            None => self.start = current,
        }
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        target.set_rotation(self.start + self.delta * t);
    }

    fn reversed(&self) -> ActionResult<Kind> {
        if self.dest.is_some() {
            return Err(ActionError::NotReversible("RotateTo"));
        }
        Ok(Kind::Rotate(Self::by(-self.delta)))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Scale {
    amount: Vec2,
    relative: bool,
    start: Vec2,
    delta: Vec2,
}

impl Scale {
    pub(crate) fn by(factor: Vec2) -> Self {
        Self::new(factor, true)
    }

    pub(crate) fn to(scale: Vec2) -> Self {
        Self::new(scale, false)
    }

    fn new(amount: Vec2, relative: bool) -> Self {
        Self {
            amount,
            relative,
            start: Vec2::ZERO,
            delta: Vec2::ZERO,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        if self.relative { "ScaleBy" } else { "ScaleTo" }
    }
}

impl Leaf for Scale {
    fn start(&mut self, target: &mut dyn Target) {
        self.start = target.scale();
        let end = if self.relative {
            Vec2::new(self.start.x * self.amount.x, self.start.y * self.amount.y)
        } else {
            self.amount
        };
        self.delta = end - self.start;
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        target.set_scale(self.start + self.delta * t);
    }

    fn reversed(&self) -> ActionResult<Kind> {
        if !self.relative {
            return Err(ActionError::NotReversible("ScaleTo"));
        }
        if self.amount.x == 0.0 || self.amount.y == 0.0 {
            return Err(ActionError::validation(
                "ScaleBy with a zero factor has no inverse",
            ));
        }
        Ok(Kind::Scale(Self::by(Vec2::new(
            1.0 / self.amount.x,
            1.0 / self.amount.y,
        ))))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Skew {
    amount: Vec2,
    relative: bool,
    start: Vec2,
    delta: Vec2,
}

impl Skew {
    pub(crate) fn by(delta: Vec2) -> Self {
        Self::new(delta, true)
    }

    pub(crate) fn to(skew: Vec2) -> Self {
        Self::new(skew, false)
    }

    fn new(amount: Vec2, relative: bool) -> Self {
        Self {
            amount,
            relative,
            start: Vec2::ZERO,
            delta: Vec2::ZERO,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        if self.relative { "SkewBy" } else { "SkewTo" }
    }
}

impl Leaf for Skew {
    fn start(&mut self, target: &mut dyn Target) {
        let current = target.skew();
        if self.relative {
            self.start = current;
            self.delta = self.amount;
        } else {
            let (sx, dx) = shortest_arc(current.x, self.amount.x, 180.0);
            let (sy, dy) = shortest_arc(current.y, self.amount.y, 180.0);
            self.start = Vec2::new(sx, sy);
            self.delta = Vec2::new(dx, dy);
        }
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        target.set_skew(self.start + self.delta * t);
    }

    fn reversed(&self) -> ActionResult<Kind> {
        if !self.relative {
            return Err(ActionError::NotReversible("SkewTo"));
        }
        Ok(Kind::Skew(Self::by(-self.amount)))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Resize {
    amount: Size,
    relative: bool,
    start: Size,
    delta: Size,
}

impl Resize {
    pub(crate) fn by(delta: Size) -> Self {
        Self::new(delta, true)
    }

    pub(crate) fn to(size: Size) -> Self {
        Self::new(size, false)
    }

    fn new(amount: Size, relative: bool) -> Self {
        Self {
            amount,
            relative,
            start: Size::ZERO,
            delta: Size::ZERO,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        if self.relative { "ResizeBy" } else { "ResizeTo" }
    }
}

impl Leaf for Resize {
    fn start(&mut self, target: &mut dyn Target) {
        self.start = target.content_size();
        self.delta = if self.relative {
            self.amount
        } else {
            Size::new(
                self.amount.width - self.start.width,
                self.amount.height - self.start.height,
            )
        };
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        target.set_content_size(Size::new(
            self.start.width + self.delta.width * t,
            self.start.height + self.delta.height * t,
        ));
    }

    fn reversed(&self) -> ActionResult<Kind> {
        if !self.relative {
            return Err(ActionError::NotReversible("ResizeTo"));
        }
        Ok(Kind::Resize(Self::by(Size::new(
            -self.amount.width,
            -self.amount.height,
        ))))
    }
}

/// Parabolic hops along a straight baseline.
#[derive(Clone, Debug)]
pub(crate) struct Jump {
    delta: Vec2,
    dest: Option<Vec2>,
    height: f64,
    jumps: u32,
    start: Vec2,
    pub(crate) stack: Stack,
}

impl Jump {
    pub(crate) fn by(delta: Vec2, height: f64, jumps: u32) -> Self {
        Self::new(delta, None, height, jumps)
    }

    pub(crate) fn to(dest: Vec2, height: f64, jumps: u32) -> Self {
        Self::new(Vec2::ZERO, Some(dest), height, jumps)
    }

    fn new(delta: Vec2, dest: Option<Vec2>, height: f64, jumps: u32) -> Self {
        Self {
            delta,
            dest,
            height,
            jumps,
            start: Vec2::ZERO,
            stack: Stack::default(),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        if self.dest.is_some() { "JumpTo" } else { "JumpBy" }
    }
}

impl Leaf for Jump {
    fn start(&mut self, target: &mut dyn Target) {
        self.start = target.position();
        if let Some(dest) = self.dest {
            self.delta = dest - self.start;
        }
        self.stack.reset(self.start);
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        let frac = (t * f64::from(self.jumps)) % 1.0;
        let y = self.height * 4.0 * frac * (1.0 - frac) + self.delta.y * t;
        let x = self.delta.x * t;

        self.start += self.stack.drift(target.position());
        let p = self.start + Vec2::new(x, y);
        target.set_position(p);
        self.stack.record(p);
    }

    fn reversed(&self) -> ActionResult<Kind> {
        if self.dest.is_some() {
            return Err(ActionError::NotReversible("JumpTo"));
        }
        let mut inv = Self::by(-self.delta, self.height, self.jumps);
        inv.stack.enabled = self.stack.enabled;
        Ok(Kind::Jump(inv))
    }
}

/// Control points of a cubic Bezier path, relative for `BezierBy`, absolute for `BezierTo`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BezierConfig {
    pub control_1: Vec2,
    pub control_2: Vec2,
    pub end: Vec2,
}

#[derive(Clone, Debug)]
pub(crate) struct Bezier {
    config: BezierConfig,
    dest: Option<BezierConfig>,
    start: Vec2,
    pub(crate) stack: Stack,
}

impl Bezier {
    pub(crate) fn by(config: BezierConfig) -> Self {
        Self {
            config,
            dest: None,
            start: Vec2::ZERO,
            stack: Stack::default(),
        }
    }

    pub(crate) fn to(config: BezierConfig) -> Self {
        Self {
            config,
            dest: Some(config),
            start: Vec2::ZERO,
            stack: Stack::default(),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        if self.dest.is_some() { "BezierTo" } else { "BezierBy" }
    }
}

impl Leaf for Bezier {
    fn start(&mut self, target: &mut dyn Target) {
        self.start = target.position();
        if let Some(abs) = self.dest {
            self.config = BezierConfig {
                control_1: abs.control_1 - self.start,
                control_2: abs.control_2 - self.start,
                end: abs.end - self.start,
            };
        }
        self.stack.reset(self.start);
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        let c = &self.config;
        let x = bezier_at(0.0, c.control_1.x, c.control_2.x, c.end.x, t);
        let y = bezier_at(0.0, c.control_1.y, c.control_2.y, c.end.y, t);

        self.start += self.stack.drift(target.position());
        let p = self.start + Vec2::new(x, y);
        target.set_position(p);
        self.stack.record(p);
    }

    fn reversed(&self) -> ActionResult<Kind> {
        if self.dest.is_some() {
            return Err(ActionError::NotReversible("BezierTo"));
        }
        let c = &self.config;
        let mut inv = Self::by(BezierConfig {
            control_1: c.control_2 - c.end,
            control_2: c.control_1 - c.end,
            end: -c.end,
        });
        inv.stack.enabled = self.stack.enabled;
        Ok(Kind::Bezier(inv))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Tint {
    delta: [f64; 3],
    dest: Option<Rgb8>,
    from: [u8; 3],
}

impl Tint {
    pub(crate) fn by(dr: i16, dg: i16, db: i16) -> Self {
        Self {
            delta: [f64::from(dr), f64::from(dg), f64::from(db)],
            dest: None,
            from: [0; 3],
        }
    }

    pub(crate) fn to(color: Rgb8) -> Self {
        Self {
            delta: [0.0; 3],
            dest: Some(color),
            from: [0; 3],
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        if self.dest.is_some() { "TintTo" } else { "TintBy" }
    }
}

impl Leaf for Tint {
    fn start(&mut self, target: &mut dyn Target) {
        self.from = target.color().channels();
        if let Some(dest) = self.dest {
            let to = dest.channels();
            for i in 0..3 {
                self.delta[i] = f64::from(to[i]) - f64::from(self.from[i]);
            }
        }
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        let mut out = [0u8; 3];
        for (i, ch) in out.iter_mut().enumerate() {
            *ch = offset_u8(self.from[i], self.delta[i], t);
        }
        target.set_color(Rgb8::from_channels(out));
    }

    fn reversed(&self) -> ActionResult<Kind> {
        if self.dest.is_some() {
            return Err(ActionError::NotReversible("TintTo"));
        }
        Ok(Kind::Tint(Self {
            delta: self.delta.map(|d| -d),
            dest: None,
            from: [0; 3],
        }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FadeMode {
    In,
    Out,
    To(u8),
}

#[derive(Clone, Debug)]
pub(crate) struct Fade {
    mode: FadeMode,
    from: u8,
}

impl Fade {
    pub(crate) fn new(mode: FadeMode) -> Self {
        Self { mode, from: 0 }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self.mode {
            FadeMode::In => "FadeIn",
            FadeMode::Out => "FadeOut",
            FadeMode::To(_) => "FadeTo",
        }
    }

    fn goal(&self) -> u8 {
        match self.mode {
            FadeMode::In => u8::MAX,
            FadeMode::Out => 0,
            FadeMode::To(v) => v,
        }
    }
}

impl Leaf for Fade {
    fn start(&mut self, target: &mut dyn Target) {
        self.from = target.opacity();
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        let delta = f64::from(self.goal()) - f64::from(self.from);
        target.set_opacity(offset_u8(self.from, delta, t));
    }

    fn reversed(&self) -> ActionResult<Kind> {
        let mode = match self.mode {
            FadeMode::In => FadeMode::Out,
            FadeMode::Out => FadeMode::In,
            FadeMode::To(_) => return Err(ActionError::NotReversible("FadeTo")),
        };
        Ok(Kind::Fade(Self::new(mode)))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Blink {
    times: u32,
    original: bool,
}

impl Blink {
    pub(crate) fn new(times: u32) -> Self {
        Self {
            times,
            original: true,
        }
    }
}

impl Leaf for Blink {
    fn start(&mut self, target: &mut dyn Target) {
        self.original = target.is_visible();
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        let slice = 1.0 / f64::from(self.times);
        let m = t % slice;
        target.set_visible(m > slice / 2.0);
    }

    fn at_stop(&mut self, target: &mut dyn Target) {
        target.set_visible(self.original);
    }

    fn reversed(&self) -> ActionResult<Kind> {
        Ok(Kind::Blink(Self::new(self.times)))
    }
}

#[derive(Clone, Debug)]
pub(crate) enum FloatSink {
    Callback(FloatFn),
    Property(String),
}

/// Scalar tween `from -> to` feeding a callback or a named target property.
#[derive(Clone, Debug)]
pub(crate) struct FloatTween {
    from: f64,
    to: f64,
    sink: FloatSink,
    /// Read `from` off the target's property at start.
    snapshot: bool,
    warned: bool,
}

impl FloatTween {
    pub(crate) fn new(from: f64, to: f64, sink: FloatSink) -> Self {
        Self {
            from,
            to,
            sink,
            snapshot: false,
            warned: false,
        }
    }

    pub(crate) fn from_current(key: String, to: f64) -> Self {
        Self {
            snapshot: true,
            ..Self::new(0.0, to, FloatSink::Property(key))
        }
    }
}

impl Leaf for FloatTween {
    fn start(&mut self, target: &mut dyn Target) {
        self.warned = false;
        if !self.snapshot {
            return;
        }
        if let FloatSink::Property(key) = &self.sink {
            match target.float_property(key) {
                Some(current) => self.from = current,
                None => {
                    tracing::warn!(property = %key, "target has no such float property; skipping");
                    self.warned = true;
                }
            }
        }
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        let value = lerp(self.from, self.to, t);
        match &self.sink {
            FloatSink::Callback(f) => (f.0)(target, value),
            FloatSink::Property(key) => {
                if !target.set_float_property(key, value) && !self.warned {
                    tracing::warn!(property = %key, "target has no such float property; skipping");
                    self.warned = true;
                }
            }
        }
    }

    fn reversed(&self) -> ActionResult<Kind> {
        if self.snapshot {
            return Err(ActionError::NotReversible("ActionFloat"));
        }
        Ok(Kind::Float(Self::new(self.to, self.from, self.sink.clone())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
