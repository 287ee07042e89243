//! Action state machine and timing model.
//!
//! A [`FiniteAction`] is anything with a fixed duration (instants have duration 0). It moves
//! through `Unbound -> Started -> Running -> Stopped`; a stopped action may be started again,
//! which is how `Repeat` and `RepeatForever` restart their child.
//!
//! [`Action`] is what a clock drives: a finite action, an unbounded `RepeatForever`, or a `Speed`
//! wrapper. The latter two have no fixed duration and therefore cannot be children of
//! `Sequence`/`Spawn`/`Repeat`, which only accept [`FiniteAction`]s.

use crate::animation::animate::Animate;
use crate::animation::combinators::{
    Eased, Forever, Repeat, ReverseTime, Sequence, Spawn, SpeedRamp, Targeted,
};
use crate::animation::motion::{
    Blink, Delay, Fade, FloatTween, Instant, Jump, Move, Resize, Rotate, Scale, Skew, Tint,
};
use crate::animation::motion::{Bezier, Stack};
use crate::animation::spline::Spline;
use crate::foundation::core::{Tag, TargetId};
use crate::foundation::error::{ActionError, ActionResult};
use crate::scene::target::{Target, Targets};

/// Lifecycle state of an action instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionState {
    /// Constructed or cloned; not bound to a target.
    Unbound,
    /// Bound by `start`, not yet stepped.
    Started,
    /// Stepped at least once since `start`.
    Running,
    /// `stop` ran; the stop hook has fired.
    Stopped,
}

/// Motion primitive operating on a single resolved target.
pub(crate) trait Leaf {
    /// Capture start values from the target.
    fn start(&mut self, target: &mut dyn Target);

    /// Apply progress `t` on top of the captured start values.
    fn step(&mut self, t: f64, target: &mut dyn Target);

    /// Stop hook. Runs once per `start`.
    fn at_stop(&mut self, _target: &mut dyn Target) {}

    /// Inverse motion with the same duration.
    fn reversed(&self) -> ActionResult<Kind>;
}

/// Action defined in terms of owned child actions.
pub(crate) trait Composite {
    fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()>;

    fn step(&mut self, t: f64, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()>;

    fn at_stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()>;

    fn reversed(&self) -> ActionResult<FiniteAction>;
}

#[derive(Clone, Debug)]
pub(crate) enum Kind {
    Instant(Instant),
    Delay(Delay),
    Move(Move),
    Rotate(Rotate),
    Scale(Scale),
    Skew(Skew),
    Resize(Resize),
    Jump(Jump),
    Bezier(Bezier),
    Spline(Spline),
    Tint(Tint),
    Fade(Fade),
    Blink(Blink),
    Float(FloatTween),
    Animate(Animate),
    Eased(Eased),
    Sequence(Sequence),
    Spawn(Spawn),
    Repeat(Repeat),
    Targeted(Targeted),
    ReverseTime(ReverseTime),
}

enum PartMut<'a> {
    Leaf(&'a mut dyn Leaf),
    Composite(&'a mut dyn Composite),
}

enum PartRef<'a> {
    Leaf(&'a dyn Leaf),
    Composite(&'a dyn Composite),
}

impl Kind {
    fn part_mut(&mut self) -> PartMut<'_> {
        match self {
            Self::Instant(k) => PartMut::Leaf(k),
            Self::Delay(k) => PartMut::Leaf(k),
            Self::Move(k) => PartMut::Leaf(k),
            Self::Rotate(k) => PartMut::Leaf(k),
            Self::Scale(k) => PartMut::Leaf(k),
            Self::Skew(k) => PartMut::Leaf(k),
            Self::Resize(k) => PartMut::Leaf(k),
            Self::Jump(k) => PartMut::Leaf(k),
            Self::Bezier(k) => PartMut::Leaf(k),
            Self::Spline(k) => PartMut::Leaf(k),
            Self::Tint(k) => PartMut::Leaf(k),
            Self::Fade(k) => PartMut::Leaf(k),
            Self::Blink(k) => PartMut::Leaf(k),
            Self::Float(k) => PartMut::Leaf(k),
            Self::Animate(k) => PartMut::Leaf(k),
            Self::Eased(k) => PartMut::Composite(k),
            Self::Sequence(k) => PartMut::Composite(k),
            Self::Spawn(k) => PartMut::Composite(k),
            Self::Repeat(k) => PartMut::Composite(k),
            Self::Targeted(k) => PartMut::Composite(k),
            Self::ReverseTime(k) => PartMut::Composite(k),
        }
    }

    fn part(&self) -> PartRef<'_> {
        match self {
            Self::Instant(k) => PartRef::Leaf(k),
            Self::Delay(k) => PartRef::Leaf(k),
            Self::Move(k) => PartRef::Leaf(k),
            Self::Rotate(k) => PartRef::Leaf(k),
            Self::Scale(k) => PartRef::Leaf(k),
            Self::Skew(k) => PartRef::Leaf(k),
            Self::Resize(k) => PartRef::Leaf(k),
            Self::Jump(k) => PartRef::Leaf(k),
            Self::Bezier(k) => PartRef::Leaf(k),
            Self::Spline(k) => PartRef::Leaf(k),
            Self::Tint(k) => PartRef::Leaf(k),
            Self::Fade(k) => PartRef::Leaf(k),
            Self::Blink(k) => PartRef::Leaf(k),
            Self::Float(k) => PartRef::Leaf(k),
            Self::Animate(k) => PartRef::Leaf(k),
            Self::Eased(k) => PartRef::Composite(k),
            Self::Sequence(k) => PartRef::Composite(k),
            Self::Spawn(k) => PartRef::Composite(k),
            Self::Repeat(k) => PartRef::Composite(k),
            Self::Targeted(k) => PartRef::Composite(k),
            Self::ReverseTime(k) => PartRef::Composite(k),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Instant(k) => k.name(),
            Self::Delay(_) => "DelayTime",
            Self::Move(k) => k.name(),
            Self::Rotate(k) => k.name(),
            Self::Scale(k) => k.name(),
            Self::Skew(k) => k.name(),
            Self::Resize(k) => k.name(),
            Self::Jump(k) => k.name(),
            Self::Bezier(k) => k.name(),
            Self::Spline(k) => k.name(),
            Self::Tint(k) => k.name(),
            Self::Fade(k) => k.name(),
            Self::Blink(_) => "Blink",
            Self::Float(_) => "ActionFloat",
            Self::Animate(_) => "Animate",
            Self::Eased(_) => "Ease",
            Self::Sequence(_) => "Sequence",
            Self::Spawn(_) => "Spawn",
            Self::Repeat(_) => "Repeat",
            Self::Targeted(_) => "TargetedAction",
            Self::ReverseTime(_) => "ReverseTime",
        }
    }

    fn stack_mut(&mut self) -> Option<&mut Stack> {
        match self {
            Self::Move(k) => Some(&mut k.stack),
            Self::Jump(k) => Some(&mut k.stack),
            Self::Bezier(k) => Some(&mut k.stack),
            Self::Spline(k) => Some(&mut k.stack),
            _ => None,
        }
    }
}

pub(crate) fn resolve(targets: &mut dyn Targets, id: TargetId) -> ActionResult<&mut dyn Target> {
    targets
        .target_mut(id)
        .ok_or(ActionError::UnknownTarget(id))
}

/// Action with a fixed duration (`0` for instants).
#[derive(Debug)]
pub struct FiniteAction {
    pub(crate) kind: Kind,
    duration: f64,
    elapsed: f64,
    first_tick: bool,
    done: bool,
    state: ActionState,
    target: Option<TargetId>,
    tag: Option<Tag>,
}

impl FiniteAction {
    pub(crate) fn new(duration: f64, kind: Kind) -> ActionResult<Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(ActionError::validation(format!(
                "{} duration must be finite and >= 0 (got {duration})",
                kind.name()
            )));
        }
        Ok(Self {
            kind,
            duration,
            elapsed: 0.0,
            first_tick: true,
            done: false,
            state: ActionState::Unbound,
            target: None,
            tag: None,
        })
    }

    pub(crate) fn instant(kind: Kind) -> Self {
        Self {
            kind,
            duration: 0.0,
            elapsed: 0.0,
            first_tick: true,
            done: false,
            state: ActionState::Unbound,
            target: None,
            tag: None,
        }
    }

    /// Short kind name (`"MoveBy"`, `"Sequence"`, ...).
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Target bound by the last `start`.
    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Opt into additive position updates for position-driving primitives.
    ///
    /// A stackable action re-reads the target's position every step and keeps any movement
    /// applied by other actions in between. Ignored by kinds that do not drive position.
    pub fn stackable(mut self, on: bool) -> Self {
        match self.kind.stack_mut() {
            Some(stack) => stack.enabled = on,
            None => tracing::debug!(kind = self.kind.name(), "stackable mode ignored"),
        }
        self
    }

    pub fn is_instant(&self) -> bool {
        matches!(self.kind, Kind::Instant(_))
    }

    /// `true` once time-driven updates reached the duration, or an instant has run.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Progress fraction for the accumulated elapsed time; zero duration snaps to `1`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Bind to `id` and capture start values. Fails while already started or running.
    pub fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        if matches!(self.state, ActionState::Started | ActionState::Running) {
            return Err(ActionError::state(format!(
                "{} started twice (bound to {})",
                self.name(),
                self.target.map_or_else(|| "nothing".to_owned(), |t| t.to_string())
            )));
        }
        match self.kind.part_mut() {
            PartMut::Leaf(leaf) => leaf.start(resolve(targets, id)?),
            PartMut::Composite(c) => c.start(targets, id)?,
        }
        self.target = Some(id);
        self.elapsed = 0.0;
        self.first_tick = true;
        self.done = false;
        self.state = ActionState::Started;
        Ok(())
    }

    /// Advance by `dt` seconds and apply the resulting progress.
    ///
    /// The first call after `start` does not accumulate `dt`.
    pub fn update(&mut self, dt: f64, targets: &mut dyn Targets) -> ActionResult<()> {
        self.bound("update")?;
        if self.first_tick {
            self.first_tick = false;
        } else {
            self.elapsed += dt;
        }
        self.step(self.progress(), targets)?;
        if self.elapsed >= self.duration {
            self.done = true;
        }
        Ok(())
    }

    /// Apply normalized progress `t` directly.
    pub fn step(&mut self, t: f64, targets: &mut dyn Targets) -> ActionResult<()> {
        let id = self.bound("step")?;
        match self.kind.part_mut() {
            PartMut::Leaf(leaf) => leaf.step(t, resolve(targets, id)?),
            PartMut::Composite(c) => c.step(t, targets, id)?,
        }
        if self.is_instant() {
            self.done = true;
        }
        self.state = ActionState::Running;
        Ok(())
    }

    /// Stop the action and run its stop hook. A no-op unless started or running.
    pub fn stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        let Some(id) = self.target else {
            return Ok(());
        };
        if !matches!(self.state, ActionState::Started | ActionState::Running) {
            return Ok(());
        }
        self.state = ActionState::Stopped;
        match self.kind.part_mut() {
            PartMut::Leaf(leaf) => {
                // A vanished target leaves nothing to restore.
                if let Some(target) = targets.target_mut(id) {
                    leaf.at_stop(target);
                }
                Ok(())
            }
            PartMut::Composite(c) => c.at_stop(targets),
        }
    }

    /// The action's exact motion inverse, unbound.
    pub fn reverse(&self) -> ActionResult<Self> {
        match self.kind.part() {
            PartRef::Leaf(leaf) => {
                let kind = leaf.reversed()?;
                if self.is_instant() {
                    Ok(Self::instant(kind))
                } else {
                    Self::new(self.duration, kind)
                }
            }
            PartRef::Composite(c) => c.reversed(),
        }
    }

    fn bound(&self, op: &str) -> ActionResult<TargetId> {
        match (self.state, self.target) {
            (ActionState::Started | ActionState::Running, Some(id)) => Ok(id),
            (state, _) => Err(ActionError::state(format!(
                "{op} on {} in state {state:?}",
                self.name()
            ))),
        }
    }
}

impl Clone for FiniteAction {
    /// Deep copy; the copy is unbound and starts from zero elapsed time.
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            duration: self.duration,
            elapsed: 0.0,
            first_tick: true,
            done: false,
            state: ActionState::Unbound,
            target: None,
            tag: self.tag,
        }
    }
}

#[derive(Clone, Debug)]
enum Body {
    Finite(FiniteAction),
    Forever(Forever),
    Speed(SpeedRamp),
}

/// A runnable action: finite, unbounded (`RepeatForever`) or rate-scaled (`Speed`).
#[derive(Clone, Debug)]
pub struct Action {
    body: Body,
    tag: Option<Tag>,
}

impl From<FiniteAction> for Action {
    fn from(action: FiniteAction) -> Self {
        let tag = action.tag();
        Self {
            body: Body::Finite(action),
            tag,
        }
    }
}

impl Action {
    pub(crate) fn forever(inner: Forever) -> Self {
        Self {
            body: Body::Forever(inner),
            tag: None,
        }
    }

    pub(crate) fn speed(inner: SpeedRamp) -> Self {
        Self {
            body: Body::Speed(inner),
            tag: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match &self.body {
            Body::Finite(a) => a.name(),
            Body::Forever(_) => "RepeatForever",
            Body::Speed(_) => "Speed",
        }
    }

    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Fixed duration, or `None` for unbounded and rate-dependent actions.
    pub fn duration(&self) -> Option<f64> {
        match &self.body {
            Body::Finite(a) => Some(a.duration()),
            Body::Forever(_) | Body::Speed(_) => None,
        }
    }

    pub fn as_finite(&self) -> Option<&FiniteAction> {
        match &self.body {
            Body::Finite(a) => Some(a),
            _ => None,
        }
    }

    pub fn state(&self) -> ActionState {
        match &self.body {
            Body::Finite(a) => a.state(),
            Body::Forever(f) => f.state(),
            Body::Speed(s) => s.state(),
        }
    }

    pub fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        match &mut self.body {
            Body::Finite(a) => a.start(targets, id),
            Body::Forever(f) => f.start(targets, id),
            Body::Speed(s) => s.start(targets, id),
        }
    }

    pub fn update(&mut self, dt: f64, targets: &mut dyn Targets) -> ActionResult<()> {
        match &mut self.body {
            Body::Finite(a) => a.update(dt, targets),
            Body::Forever(f) => f.update(dt, targets),
            Body::Speed(s) => s.update(dt, targets),
        }
    }

    /// Never `true` for `RepeatForever`.
    pub fn is_done(&self) -> bool {
        match &self.body {
            Body::Finite(a) => a.is_done(),
            Body::Forever(_) => false,
            Body::Speed(s) => s.is_done(),
        }
    }

    pub fn stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        match &mut self.body {
            Body::Finite(a) => a.stop(targets),
            Body::Forever(f) => f.stop(targets),
            Body::Speed(s) => s.stop(targets),
        }
    }

    pub fn reverse(&self) -> ActionResult<Self> {
        let body = match &self.body {
            Body::Finite(a) => Body::Finite(a.reverse()?),
            Body::Forever(f) => Body::Forever(f.reversed()?),
            Body::Speed(s) => Body::Speed(s.reversed()?),
        };
        Ok(Self { body, tag: None })
    }

    /// Current rate multiplier when this is a `Speed` action.
    pub fn speed_factor(&self) -> Option<f64> {
        match &self.body {
            Body::Speed(s) => Some(s.factor()),
            _ => None,
        }
    }

    /// Change the rate of a `Speed` action; other actions reject the call.
    pub fn set_speed(&mut self, factor: f64) -> ActionResult<()> {
        match &mut self.body {
            Body::Speed(s) => s.set_factor(factor),
            _ => Err(ActionError::state(format!(
                "set_speed on {}, which is not a Speed action",
                self.name()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/action.rs"]
mod tests;
