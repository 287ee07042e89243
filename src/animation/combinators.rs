//! Actions built from child actions.
//!
//! Children are owned exclusively (`Box<FiniteAction>`); a child handed to a combinator moves in
//! and never aliases. All combinators drive their children through the normalized `step(t)`
//! entry point, except `RepeatForever` and `Speed`, which forward time deltas.

use crate::animation::action::{Action, ActionState, Composite, FiniteAction, Kind};
use crate::animation::ease::Ease;
use crate::animation::motion::Delay;
use crate::foundation::core::TargetId;
use crate::foundation::error::{ActionError, ActionResult};
use crate::scene::target::Targets;

const EPSILON: f64 = 1e-9;

/// Progress remapped through an easing curve before reaching the inner action.
#[derive(Clone, Debug)]
pub(crate) struct Eased {
    inner: Box<FiniteAction>,
    ease: Ease,
}

impl Eased {
    pub(crate) fn action(inner: FiniteAction, ease: Ease) -> ActionResult<FiniteAction> {
        ease.validate()?;
        FiniteAction::new(
            inner.duration(),
            Kind::Eased(Self {
                inner: Box::new(inner),
                ease,
            }),
        )
    }
}

impl Composite for Eased {
    fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        self.inner.start(targets, id)
    }

    fn step(&mut self, t: f64, targets: &mut dyn Targets, _id: TargetId) -> ActionResult<()> {
        self.inner.step(self.ease.apply(t), targets)
    }

    fn at_stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        self.inner.stop(targets)
    }

    fn reversed(&self) -> ActionResult<FiniteAction> {
        Self::action(self.inner.reverse()?, self.ease.counterpart())
    }
}

/// Two children run back to back.
#[derive(Clone, Debug)]
pub(crate) struct Sequence {
    children: [Box<FiniteAction>; 2],
    split: f64,
    last: usize,
}

impl Sequence {
    pub(crate) fn action(first: FiniteAction, second: FiniteAction) -> ActionResult<FiniteAction> {
        let total = first.duration() + second.duration();
        let split = if total > 0.0 {
            first.duration() / total
        } else {
            0.0
        };
        FiniteAction::new(
            total,
            Kind::Sequence(Self {
                children: [Box::new(first), Box::new(second)],
                split,
                last: 0,
            }),
        )
    }

    /// Active child and its local progress for global progress `t`.
    fn locate(&self, t: f64) -> (usize, f64) {
        if t < self.split {
            let local = if self.split != 0.0 { t / self.split } else { 1.0 };
            (0, local)
        } else {
            let local = if self.split == 1.0 {
                1.0
            } else {
                (t - self.split) / (1.0 - self.split)
            };
            (1, local)
        }
    }
}

impl Composite for Sequence {
    fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        self.children[0].start(targets, id)?;
        self.last = 0;
        Ok(())
    }

    fn step(&mut self, t: f64, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        let (found, local) = self.locate(t);

        if found == 1 && self.last == 0 {
            // Finish the first child before handing over.
            self.children[0].step(1.0, targets)?;
            self.children[0].stop(targets)?;
        } else if found == 0 && self.last == 1 {
            // Stepping backwards across the split: rewind the second child.
            self.children[1].step(0.0, targets)?;
            self.children[1].stop(targets)?;
        }

        if found == self.last && self.children[found].is_done() {
            return Ok(());
        }
        if found != self.last {
            self.children[found].start(targets, id)?;
        }
        self.children[found].step(local, targets)?;
        self.last = found;
        Ok(())
    }

    fn at_stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        self.children[self.last].stop(targets)
    }

    fn reversed(&self) -> ActionResult<FiniteAction> {
        Self::action(self.children[1].reverse()?, self.children[0].reverse()?)
    }
}

/// Two children run in parallel. The shorter one is padded with a delay.
#[derive(Clone, Debug)]
pub(crate) struct Spawn {
    one: Box<FiniteAction>,
    two: Box<FiniteAction>,
}

impl Spawn {
    pub(crate) fn action(one: FiniteAction, two: FiniteAction) -> ActionResult<FiniteAction> {
        let (d1, d2) = (one.duration(), two.duration());
        let pad = |action: FiniteAction, by: f64| -> ActionResult<FiniteAction> {
            Sequence::action(action, FiniteAction::new(by, Kind::Delay(Delay))?)
        };
        let (one, two) = if d1 > d2 {
            (one, pad(two, d1 - d2)?)
        } else if d2 > d1 {
            (pad(one, d2 - d1)?, two)
        } else {
            (one, two)
        };
        FiniteAction::new(
            d1.max(d2),
            Kind::Spawn(Self {
                one: Box::new(one),
                two: Box::new(two),
            }),
        )
    }
}

impl Composite for Spawn {
    fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        self.one.start(targets, id)?;
        self.two.start(targets, id)
    }

    fn step(&mut self, t: f64, targets: &mut dyn Targets, _id: TargetId) -> ActionResult<()> {
        self.one.step(t, targets)?;
        self.two.step(t, targets)
    }

    fn at_stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        self.one.stop(targets)?;
        self.two.stop(targets)
    }

    fn reversed(&self) -> ActionResult<FiniteAction> {
        Self::action(self.one.reverse()?, self.two.reverse()?)
    }
}

/// Runs the inner action `times` times, restarting it at every boundary.
#[derive(Clone, Debug)]
pub(crate) struct Repeat {
    inner: Box<FiniteAction>,
    times: u32,
    total: u32,
    /// Inner duration as a fraction of the whole; 0 for zero-length repeats.
    ratio: f64,
    next_dt: f64,
}

impl Repeat {
    pub(crate) fn action(inner: FiniteAction, times: u32) -> ActionResult<FiniteAction> {
        if times == 0 {
            return Err(ActionError::validation("Repeat times must be >= 1"));
        }
        let duration = inner.duration() * f64::from(times);
        let ratio = if duration > 0.0 {
            inner.duration() / duration
        } else {
            0.0
        };
        FiniteAction::new(
            duration,
            Kind::Repeat(Self {
                inner: Box::new(inner),
                times,
                total: 0,
                ratio,
                next_dt: ratio,
            }),
        )
    }

    /// Progress of the current run for global progress `t`.
    fn local(&self, t: f64) -> f64 {
        (t * f64::from(self.times) - f64::from(self.total)).clamp(0.0, 1.0)
    }

    fn finish_run(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        self.inner.step(1.0, targets)?;
        self.total += 1;
        self.inner.stop(targets)?;
        if self.total < self.times {
            self.inner.start(targets, id)?;
        }
        self.next_dt = self.ratio * f64::from(self.total + 1);
        Ok(())
    }
}

impl Composite for Repeat {
    fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        self.total = 0;
        self.next_dt = self.ratio;
        self.inner.start(targets, id)
    }

    fn step(&mut self, t: f64, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        if self.total >= self.times {
            return Ok(());
        }

        if t < self.next_dt {
            let local = self.local(t);
            return self.inner.step(local, targets);
        }

        while t >= self.next_dt && self.total < self.times {
            self.finish_run(targets, id)?;
        }
        if (t - 1.0).abs() < EPSILON && self.total < self.times {
            self.finish_run(targets, id)?;
        }

        // The first frame of the next run is applied in the same tick that closed the previous
        // one, from the run-local remainder rather than the raw global fraction.
        if self.total < self.times && !self.inner.is_instant() {
            let local = self.local(t);
            self.inner.step(local, targets)?;
        }
        Ok(())
    }

    fn at_stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        self.inner.stop(targets)
    }

    fn reversed(&self) -> ActionResult<FiniteAction> {
        Self::action(self.inner.reverse()?, self.times)
    }
}

/// Runs the inner action on a fixed target, whatever the combinator itself is bound to.
#[derive(Clone, Debug)]
pub(crate) struct Targeted {
    forced: TargetId,
    inner: Box<FiniteAction>,
}

impl Targeted {
    pub(crate) fn action(forced: TargetId, inner: FiniteAction) -> ActionResult<FiniteAction> {
        FiniteAction::new(
            inner.duration(),
            Kind::Targeted(Self {
                forced,
                inner: Box::new(inner),
            }),
        )
    }
}

impl Composite for Targeted {
    fn start(&mut self, targets: &mut dyn Targets, _id: TargetId) -> ActionResult<()> {
        self.inner.start(targets, self.forced)
    }

    fn step(&mut self, t: f64, targets: &mut dyn Targets, _id: TargetId) -> ActionResult<()> {
        self.inner.step(t, targets)
    }

    fn at_stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        self.inner.stop(targets)
    }

    fn reversed(&self) -> ActionResult<FiniteAction> {
        Self::action(self.forced, self.inner.reverse()?)
    }
}

/// Plays the inner action with progress `1 - t`.
#[derive(Clone, Debug)]
pub(crate) struct ReverseTime {
    inner: Box<FiniteAction>,
}

impl ReverseTime {
    pub(crate) fn action(inner: FiniteAction) -> ActionResult<FiniteAction> {
        FiniteAction::new(
            inner.duration(),
            Kind::ReverseTime(Self {
                inner: Box::new(inner),
            }),
        )
    }
}

impl Composite for ReverseTime {
    fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        self.inner.start(targets, id)
    }

    fn step(&mut self, t: f64, targets: &mut dyn Targets, _id: TargetId) -> ActionResult<()> {
        self.inner.step(1.0 - t, targets)
    }

    fn at_stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        self.inner.stop(targets)
    }

    fn reversed(&self) -> ActionResult<FiniteAction> {
        Ok(self.inner.as_ref().clone())
    }
}

/// Unbounded loop of a finite action with positive duration.
#[derive(Clone, Debug)]
pub(crate) struct Forever {
    inner: FiniteAction,
}

impl Forever {
    pub(crate) fn new(inner: FiniteAction) -> ActionResult<Self> {
        if inner.duration() <= 0.0 {
            return Err(ActionError::validation(format!(
                "RepeatForever needs an inner action with positive duration ({} has {})",
                inner.name(),
                inner.duration()
            )));
        }
        Ok(Self { inner })
    }

    pub(crate) fn state(&self) -> ActionState {
        self.inner.state()
    }

    pub(crate) fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        self.inner.start(targets, id)
    }

    pub(crate) fn update(&mut self, dt: f64, targets: &mut dyn Targets) -> ActionResult<()> {
        self.inner.update(dt, targets)?;
        if !self.inner.is_done() {
            return Ok(());
        }

        let id = self
            .inner
            .target()
            .ok_or_else(|| ActionError::state("RepeatForever inner action lost its target"))?;
        let d = self.inner.duration();
        let mut overshoot = self.inner.elapsed() - d;
        if overshoot > d {
            overshoot %= d;
        }

        self.inner.stop(targets)?;
        self.inner.start(targets, id)?;
        self.inner.update(0.0, targets)?;
        self.inner.update(overshoot, targets)
    }

    pub(crate) fn stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        self.inner.stop(targets)
    }

    pub(crate) fn reversed(&self) -> ActionResult<Self> {
        Self::new(self.inner.reverse()?)
    }
}

/// Scales the rate at which time reaches the inner action.
#[derive(Clone, Debug)]
pub(crate) struct SpeedRamp {
    inner: Box<Action>,
    factor: f64,
}

fn check_factor(factor: f64) -> ActionResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ActionError::validation(format!(
            "speed must be finite and > 0 (got {factor})"
        )));
    }
    Ok(())
}

impl SpeedRamp {
    pub(crate) fn new(inner: Action, factor: f64) -> ActionResult<Self> {
        check_factor(factor)?;
        Ok(Self {
            inner: Box::new(inner),
            factor,
        })
    }

    pub(crate) fn factor(&self) -> f64 {
        self.factor
    }

    pub(crate) fn set_factor(&mut self, factor: f64) -> ActionResult<()> {
        check_factor(factor)?;
        self.factor = factor;
        Ok(())
    }

    pub(crate) fn state(&self) -> ActionState {
        self.inner.state()
    }

    pub(crate) fn start(&mut self, targets: &mut dyn Targets, id: TargetId) -> ActionResult<()> {
        self.inner.start(targets, id)
    }

    pub(crate) fn update(&mut self, dt: f64, targets: &mut dyn Targets) -> ActionResult<()> {
        self.inner.update(dt * self.factor, targets)
    }

    pub(crate) fn is_done(&self) -> bool {
        self.inner.is_done()
    }

    pub(crate) fn stop(&mut self, targets: &mut dyn Targets) -> ActionResult<()> {
        self.inner.stop(targets)
    }

    pub(crate) fn reversed(&self) -> ActionResult<Self> {
        Self::new(self.inner.reverse()?, 1.0 / self.factor)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/combinators.rs"]
mod tests;
