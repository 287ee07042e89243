//! Cardinal / Catmull-Rom spline paths.

use crate::animation::action::{Kind, Leaf};
use crate::animation::motion::Stack;
use crate::foundation::core::Vec2;
use crate::foundation::error::ActionResult;
use crate::foundation::math::cardinal_spline_at;
use crate::scene::target::Target;

/// Tension used by the Catmull-Rom shorthands.
pub const CATMULL_ROM_TENSION: f64 = 0.0;

#[derive(Clone, Debug)]
pub(crate) struct Spline {
    points: Vec<Vec2>,
    tension: f64,
    relative: bool,
    catmull_rom: bool,
    delta_t: f64,
    start: Vec2,
    accumulated: Vec2,
    pub(crate) stack: Stack,
}

impl Spline {
    /// `points` must hold at least two entries; the constructor in `ops` checks it.
    pub(crate) fn new(points: Vec<Vec2>, tension: f64, relative: bool, catmull_rom: bool) -> Self {
        Self {
            points,
            tension,
            relative,
            catmull_rom,
            delta_t: 1.0,
            start: Vec2::ZERO,
            accumulated: Vec2::ZERO,
            stack: Stack::default(),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match (self.catmull_rom, self.relative) {
            (false, false) => "CardinalSplineTo",
            (false, true) => "CardinalSplineBy",
            (true, false) => "CatmullRomTo",
            (true, true) => "CatmullRomBy",
        }
    }

    fn point(&self, idx: isize) -> Vec2 {
        let last = self.points.len() as isize - 1;
        self.points[idx.clamp(0, last) as usize]
    }

    /// Segment index and local parameter for global progress `t`.
    fn segment(&self, t: f64) -> (isize, f64) {
        let last = self.points.len() as isize - 1;
        if t >= 1.0 {
            return (last, 1.0);
        }
        let p = ((t / self.delta_t).floor() as isize).clamp(0, last);
        let lt = (t - self.delta_t * p as f64) / self.delta_t;
        (p, lt)
    }

    /// Control points for running this path backwards from its end.
    fn reversed_points(&self) -> Vec<Vec2> {
        if !self.relative {
            return self.points.iter().rev().copied().collect();
        }

        // absolute offsets -> per-segment diffs
        let mut diffs = self.points.clone();
        let mut prev = diffs[0];
        for p in diffs.iter_mut().skip(1) {
            let current = *p;
            *p = current - prev;
            prev = current;
        }

        // diffs reversed, the origin moves to the front negated
        diffs.reverse();
        let origin = diffs.pop().unwrap_or(Vec2::ZERO);
        let mut acc = -origin;
        diffs.insert(0, acc);

        // re-accumulate the negated diffs
        for p in diffs.iter_mut().skip(1) {
            acc = -*p + acc;
            *p = acc;
        }
        diffs
    }
}

impl Leaf for Spline {
    fn start(&mut self, target: &mut dyn Target) {
        self.delta_t = 1.0 / (self.points.len() - 1) as f64;
        self.start = target.position();
        self.accumulated = Vec2::ZERO;
        self.stack.reset(self.start);
    }

    fn step(&mut self, t: f64, target: &mut dyn Target) {
        let (p, lt) = self.segment(t);
        let mut pos = cardinal_spline_at(
            self.point(p - 1),
            self.point(p),
            self.point(p + 1),
            self.point(p + 2),
            self.tension,
            lt,
        );

        self.accumulated += self.stack.drift(target.position());
        pos += self.accumulated;
        if self.relative {
            pos += self.start;
        }

        target.set_position(pos);
        self.stack.record(pos);
    }

    fn reversed(&self) -> ActionResult<Kind> {
        let mut inv = Self::new(
            self.reversed_points(),
            self.tension,
            self.relative,
            self.catmull_rom,
        );
        inv.stack.enabled = self.stack.enabled;
        Ok(Kind::Spline(inv))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spline.rs"]
mod tests;
