//! Constructors for every action kind.
//!
//! Interval constructors reject negative or non-finite durations; counts must be `>= 1`.

use std::rc::Rc;

use crate::animation::action::{Action, FiniteAction, Kind};
use crate::animation::animate::{Animate, Animation, AnimationFrame, FrameFn};
use crate::animation::combinators::{
    Eased, Forever, Repeat, ReverseTime, Sequence, Spawn, SpeedRamp, Targeted,
};
use crate::animation::ease::Ease;
use crate::animation::motion::{
    Bezier, BezierConfig, Blink, CallFn, Delay, Fade, FadeMode, FloatFn, FloatSink, FloatTween,
    Instant, Jump, Move, Resize, Rotate, Scale, Skew, Tint,
};
use crate::animation::spline::{CATMULL_ROM_TENSION, Spline};
use crate::foundation::core::{Rgb8, Size, TargetId, Vec2};
use crate::foundation::error::{ActionError, ActionResult};
use crate::scene::target::Target;

fn interval(duration: f64, kind: Kind) -> ActionResult<FiniteAction> {
    FiniteAction::new(duration, kind)
}

fn at_least_one(what: &str, n: u32) -> ActionResult<()> {
    if n == 0 {
        return Err(ActionError::validation(format!("{what} must be >= 1")));
    }
    Ok(())
}

pub fn move_by(duration: f64, delta: Vec2) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Move(Move::by(delta)))
}

pub fn move_to(duration: f64, position: Vec2) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Move(Move::to(position)))
}

pub fn move_by_3d(duration: f64, delta: Vec2, delta_z: f64) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Move(Move::by_3d(delta, delta_z)))
}

pub fn move_to_3d(duration: f64, position: Vec2, z: f64) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Move(Move::to_3d(position, z)))
}

/// Uniform rotation by `degrees` on both axes.
pub fn rotate_by(duration: f64, degrees: f64) -> ActionResult<FiniteAction> {
    rotate_by_xy(duration, Vec2::new(degrees, degrees))
}

pub fn rotate_by_xy(duration: f64, degrees: Vec2) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Rotate(Rotate::by(degrees)))
}

/// Rotate along the shortest arc to `degrees`.
pub fn rotate_to(duration: f64, degrees: f64) -> ActionResult<FiniteAction> {
    rotate_to_xy(duration, Vec2::new(degrees, degrees))
}

pub fn rotate_to_xy(duration: f64, degrees: Vec2) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Rotate(Rotate::to(degrees)))
}

pub fn scale_by(duration: f64, factor: f64) -> ActionResult<FiniteAction> {
    scale_by_xy(duration, Vec2::new(factor, factor))
}

pub fn scale_by_xy(duration: f64, factor: Vec2) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Scale(Scale::by(factor)))
}

pub fn scale_to(duration: f64, scale: f64) -> ActionResult<FiniteAction> {
    scale_to_xy(duration, Vec2::new(scale, scale))
}

pub fn scale_to_xy(duration: f64, scale: Vec2) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Scale(Scale::to(scale)))
}

pub fn skew_by(duration: f64, degrees: Vec2) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Skew(Skew::by(degrees)))
}

pub fn skew_to(duration: f64, degrees: Vec2) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Skew(Skew::to(degrees)))
}

pub fn resize_by(duration: f64, delta: Size) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Resize(Resize::by(delta)))
}

pub fn resize_to(duration: f64, size: Size) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Resize(Resize::to(size)))
}

pub fn jump_by(duration: f64, delta: Vec2, height: f64, jumps: u32) -> ActionResult<FiniteAction> {
    at_least_one("jumps", jumps)?;
    interval(duration, Kind::Jump(Jump::by(delta, height, jumps)))
}

pub fn jump_to(
    duration: f64,
    position: Vec2,
    height: f64,
    jumps: u32,
) -> ActionResult<FiniteAction> {
    at_least_one("jumps", jumps)?;
    interval(duration, Kind::Jump(Jump::to(position, height, jumps)))
}

/// Control points relative to the start position.
pub fn bezier_by(duration: f64, config: BezierConfig) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Bezier(Bezier::by(config)))
}

/// Control points in absolute coordinates.
pub fn bezier_to(duration: f64, config: BezierConfig) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Bezier(Bezier::to(config)))
}

fn spline(
    duration: f64,
    points: Vec<Vec2>,
    tension: f64,
    relative: bool,
    catmull_rom: bool,
) -> ActionResult<FiniteAction> {
    if points.len() < 2 {
        return Err(ActionError::validation(format!(
            "spline needs at least 2 control points (got {})",
            points.len()
        )));
    }
    if !tension.is_finite() {
        return Err(ActionError::validation("spline tension must be finite"));
    }
    interval(
        duration,
        Kind::Spline(Spline::new(points, tension, relative, catmull_rom)),
    )
}

/// Path through absolute `points`.
pub fn cardinal_spline_to(
    duration: f64,
    points: Vec<Vec2>,
    tension: f64,
) -> ActionResult<FiniteAction> {
    spline(duration, points, tension, false, false)
}

/// Path through `points` taken relative to the start position.
pub fn cardinal_spline_by(
    duration: f64,
    points: Vec<Vec2>,
    tension: f64,
) -> ActionResult<FiniteAction> {
    spline(duration, points, tension, true, false)
}

pub fn catmull_rom_to(duration: f64, points: Vec<Vec2>) -> ActionResult<FiniteAction> {
    spline(duration, points, CATMULL_ROM_TENSION, false, true)
}

pub fn catmull_rom_by(duration: f64, points: Vec<Vec2>) -> ActionResult<FiniteAction> {
    spline(duration, points, CATMULL_ROM_TENSION, true, true)
}

pub fn tint_by(duration: f64, dr: i16, dg: i16, db: i16) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Tint(Tint::by(dr, dg, db)))
}

pub fn tint_to(duration: f64, color: Rgb8) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Tint(Tint::to(color)))
}

pub fn fade_in(duration: f64) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Fade(Fade::new(FadeMode::In)))
}

pub fn fade_out(duration: f64) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Fade(Fade::new(FadeMode::Out)))
}

pub fn fade_to(duration: f64, opacity: u8) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Fade(Fade::new(FadeMode::To(opacity))))
}

pub fn blink(duration: f64, times: u32) -> ActionResult<FiniteAction> {
    at_least_one("blink times", times)?;
    interval(duration, Kind::Blink(Blink::new(times)))
}

pub fn delay_time(duration: f64) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Delay(Delay))
}

/// Tween `from -> to` and hand each value to `f`.
pub fn action_float<F>(duration: f64, from: f64, to: f64, f: F) -> ActionResult<FiniteAction>
where
    F: Fn(&mut dyn Target, f64) + 'static,
{
    let sink = FloatSink::Callback(FloatFn(Rc::new(f)));
    interval(duration, Kind::Float(FloatTween::new(from, to, sink)))
}

/// Tween the target's named float property.
pub fn tween_property(
    duration: f64,
    key: impl Into<String>,
    from: f64,
    to: f64,
) -> ActionResult<FiniteAction> {
    let sink = FloatSink::Property(key.into());
    interval(duration, Kind::Float(FloatTween::new(from, to, sink)))
}

/// Tween the target's named float property from its value at start to `to`.
///
/// Not reversible: the start value is only known once bound.
pub fn tween_property_to(
    duration: f64,
    key: impl Into<String>,
    to: f64,
) -> ActionResult<FiniteAction> {
    interval(duration, Kind::Float(FloatTween::from_current(key.into(), to)))
}

pub fn show() -> FiniteAction {
    FiniteAction::instant(Kind::Instant(Instant::Show))
}

pub fn hide() -> FiniteAction {
    FiniteAction::instant(Kind::Instant(Instant::Hide))
}

pub fn toggle_visibility() -> FiniteAction {
    FiniteAction::instant(Kind::Instant(Instant::ToggleVisibility))
}

pub fn place(position: Vec2) -> FiniteAction {
    FiniteAction::instant(Kind::Instant(Instant::Place(position)))
}

pub fn call_func<F>(f: F) -> FiniteAction
where
    F: Fn(&mut dyn Target) + 'static,
{
    FiniteAction::instant(Kind::Instant(Instant::Call(CallFn(Rc::new(f)))))
}

/// Frame animation; duration is derived from the animation data.
pub fn animate(animation: Animation) -> ActionResult<FiniteAction> {
    animation.validate()?;
    interval(animation.duration(), Kind::Animate(Animate::new(animation, None)))
}

/// Like [`animate`], notifying `listener` whenever a frame carrying user info is displayed.
pub fn animate_with_listener<F>(animation: Animation, listener: F) -> ActionResult<FiniteAction>
where
    F: Fn(&mut dyn Target, &AnimationFrame) + 'static,
{
    animation.validate()?;
    let listener = FrameFn(Rc::new(listener));
    interval(
        animation.duration(),
        Kind::Animate(Animate::new(animation, Some(listener))),
    )
}

pub fn ease(inner: FiniteAction, ease: Ease) -> ActionResult<FiniteAction> {
    Eased::action(inner, ease)
}

pub fn ease_in(inner: FiniteAction, rate: f64) -> ActionResult<FiniteAction> {
    ease(inner, Ease::In { rate })
}

pub fn ease_out(inner: FiniteAction, rate: f64) -> ActionResult<FiniteAction> {
    ease(inner, Ease::Out { rate })
}

pub fn ease_in_out(inner: FiniteAction, rate: f64) -> ActionResult<FiniteAction> {
    ease(inner, Ease::InOut { rate })
}

/// Cubic Bezier easing with scalar weights `p0..p3`.
pub fn ease_bezier(
    inner: FiniteAction,
    p0: f64,
    p1: f64,
    p2: f64,
    p3: f64,
) -> ActionResult<FiniteAction> {
    ease(inner, Ease::Bezier { p0, p1, p2, p3 })
}

/// Left-folds `actions` into nested two-child sequences.
pub fn sequence(actions: Vec<FiniteAction>) -> ActionResult<FiniteAction> {
    let mut iter = actions.into_iter();
    let Some(mut out) = iter.next() else {
        return Err(ActionError::validation("sequence needs at least one action"));
    };
    for next in iter {
        out = Sequence::action(out, next)?;
    }
    Ok(out)
}

/// Left-folds `actions` into nested two-child spawns.
pub fn spawn(actions: Vec<FiniteAction>) -> ActionResult<FiniteAction> {
    let mut iter = actions.into_iter();
    let Some(mut out) = iter.next() else {
        return Err(ActionError::validation("spawn needs at least one action"));
    };
    for next in iter {
        out = Spawn::action(out, next)?;
    }
    Ok(out)
}

pub fn repeat(inner: FiniteAction, times: u32) -> ActionResult<FiniteAction> {
    Repeat::action(inner, times)
}

pub fn repeat_forever(inner: FiniteAction) -> ActionResult<Action> {
    Ok(Action::forever(Forever::new(inner)?))
}

pub fn speed(inner: impl Into<Action>, factor: f64) -> ActionResult<Action> {
    Ok(Action::speed(SpeedRamp::new(inner.into(), factor)?))
}

/// Runs `inner` on `target` regardless of where the returned action is added.
pub fn targeted(target: TargetId, inner: FiniteAction) -> ActionResult<FiniteAction> {
    Targeted::action(target, inner)
}

pub fn reverse_time(inner: FiniteAction) -> ActionResult<FiniteAction> {
    ReverseTime::action(inner)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ops.rs"]
mod tests;
