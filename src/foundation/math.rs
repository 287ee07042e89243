//! Stateless tween math shared by the motion primitives.

use crate::foundation::core::Vec2;

/// Cubic Bezier in Bernstein form over scalar weights `a..d` at parameter `t`.
///
/// Exact at the ends: `t == 0` yields `a`, `t == 1` yields `d`.
pub fn bezier_at(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u.powi(3) * a + 3.0 * t * u.powi(2) * b + 3.0 * t.powi(2) * u * c + t.powi(3) * d
}

/// Cardinal spline through `p1 -> p2` with neighbours `p0`, `p3`.
///
/// `tension == 0` is Catmull-Rom. `t == 0` returns `p1` and `t == 1` returns `p2` exactly.
pub fn cardinal_spline_at(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, tension: f64, t: f64) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;

    let s = (1.0 - tension) / 2.0;

    let b1 = s * ((-t3 + (2.0 * t2)) - t);
    let b2 = s * (-t3 + t2) + (2.0 * t3 - 3.0 * t2 + 1.0);
    let b3 = s * (t3 - 2.0 * t2 + t) + (-2.0 * t3 + 3.0 * t2);
    let b4 = s * (t3 - t2);

    Vec2::new(
        p0.x * b1 + p1.x * b2 + p2.x * b3 + p3.x * b4,
        p0.y * b1 + p1.y * b2 + p2.y * b3 + p3.y * b4,
    )
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// `from + delta * t`, rounded and clamped into a color/opacity channel.
pub(crate) fn offset_u8(from: u8, delta: f64, t: f64) -> u8 {
    (f64::from(from) + delta * t).round().clamp(0.0, 255.0) as u8
}

/// Fold `start` into `(-period, period)` and return it with the shortest signed delta to `dst`.
///
/// `period` is 360 for rotation and 180 for skew; the delta is wrapped into `[-180, 180]`.
pub(crate) fn shortest_arc(start: f64, dst: f64, period: f64) -> (f64, f64) {
    let start = start % period;
    let mut diff = dst - start;
    if diff > 180.0 {
        diff -= 360.0;
    }
    if diff < -180.0 {
        diff += 360.0;
    }
    (start, diff)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
