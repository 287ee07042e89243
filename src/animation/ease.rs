//! Easing curves: pure `[0, 1] -> R` remappings of an action's progress fraction.
//!
//! Every curve except [`Ease::Bezier`] returns exactly `0` at `t == 0` and exactly `1` at
//! `t == 1`. Back, bounce and elastic curves leave `[0, 1]` transiently.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::foundation::error::{ActionError, ActionResult};
use crate::foundation::math::bezier_at;

const DEFAULT_RATE: f64 = 2.0;
const DEFAULT_PERIOD: f64 = 0.3;
const BACK_OVERSHOOT: f64 = 1.70158;

/// Easing functions used to remap normalized action progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    /// `t^rate`.
    In { rate: f64 },
    /// `t^(1/rate)`.
    Out { rate: f64 },
    /// Piecewise `In`/`Out` joined at `t = 0.5`.
    InOut { rate: f64 },
    ExponentialIn,
    ExponentialOut,
    ExponentialInOut,
    SineIn,
    SineOut,
    SineInOut,
    ElasticIn { period: f64 },
    ElasticOut { period: f64 },
    ElasticInOut { period: f64 },
    BounceIn,
    BounceOut,
    BounceInOut,
    BackIn,
    BackOut,
    BackInOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    CircIn,
    CircOut,
    CircInOut,
    /// 1-D cubic Bezier over four scalar weights.
    Bezier { p0: f64, p1: f64, p2: f64, p3: f64 },
}

impl Ease {
    /// Names accepted by [`Ease::by_name`].
    pub const NAMES: &'static [&'static str] = &[
        "linear",
        "in",
        "out",
        "in_out",
        "exponential_in",
        "exponential_out",
        "exponential_in_out",
        "sine_in",
        "sine_out",
        "sine_in_out",
        "elastic_in",
        "elastic_out",
        "elastic_in_out",
        "bounce_in",
        "bounce_out",
        "bounce_in_out",
        "back_in",
        "back_out",
        "back_in_out",
        "quad_in",
        "quad_out",
        "quad_in_out",
        "cubic_in",
        "cubic_out",
        "cubic_in_out",
        "quart_in",
        "quart_out",
        "quart_in_out",
        "quint_in",
        "quint_out",
        "quint_in_out",
        "circ_in",
        "circ_out",
        "circ_in_out",
    ];

    /// Resolve a curve by its snake_case name.
    ///
    /// `param` overrides the rate (`in`/`out`/`in_out`, default 2) or the period (elastic
    /// curves, default 0.3) and is ignored by parameterless curves.
    pub fn by_name(name: &str, param: Option<f64>) -> ActionResult<Self> {
        let rate = param.unwrap_or(DEFAULT_RATE);
        let period = param.unwrap_or(DEFAULT_PERIOD);
        let ease = match name {
            "linear" => Self::Linear,
            "in" => Self::In { rate },
            "out" => Self::Out { rate },
            "in_out" => Self::InOut { rate },
            "exponential_in" => Self::ExponentialIn,
            "exponential_out" => Self::ExponentialOut,
            "exponential_in_out" => Self::ExponentialInOut,
            "sine_in" => Self::SineIn,
            "sine_out" => Self::SineOut,
            "sine_in_out" => Self::SineInOut,
            "elastic_in" => Self::ElasticIn { period },
            "elastic_out" => Self::ElasticOut { period },
            "elastic_in_out" => Self::ElasticInOut { period },
            "bounce_in" => Self::BounceIn,
            "bounce_out" => Self::BounceOut,
            "bounce_in_out" => Self::BounceInOut,
            "back_in" => Self::BackIn,
            "back_out" => Self::BackOut,
            "back_in_out" => Self::BackInOut,
            "quad_in" => Self::QuadIn,
            "quad_out" => Self::QuadOut,
            "quad_in_out" => Self::QuadInOut,
            "cubic_in" => Self::CubicIn,
            "cubic_out" => Self::CubicOut,
            "cubic_in_out" => Self::CubicInOut,
            "quart_in" => Self::QuartIn,
            "quart_out" => Self::QuartOut,
            "quart_in_out" => Self::QuartInOut,
            "quint_in" => Self::QuintIn,
            "quint_out" => Self::QuintOut,
            "quint_in_out" => Self::QuintInOut,
            "circ_in" => Self::CircIn,
            "circ_out" => Self::CircOut,
            "circ_in_out" => Self::CircInOut,
            other => {
                return Err(ActionError::validation(format!(
                    "unknown ease \"{other}\""
                )));
            }
        };
        ease.validate()?;
        Ok(ease)
    }

    pub fn validate(self) -> ActionResult<()> {
        match self {
            Self::In { rate } | Self::Out { rate } | Self::InOut { rate } => {
                if !(rate.is_finite() && rate > 0.0) {
                    return Err(ActionError::validation("ease rate must be finite and > 0"));
                }
            }
            Self::ElasticIn { period }
            | Self::ElasticOut { period }
            | Self::ElasticInOut { period } => {
                if !(period.is_finite() && period > 0.0) {
                    return Err(ActionError::validation(
                        "elastic period must be finite and > 0",
                    ));
                }
            }
            Self::Bezier { p0, p1, p2, p3 } => {
                if ![p0, p1, p2, p3].iter().all(|w| w.is_finite()) {
                    return Err(ActionError::validation("bezier weights must be finite"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Curve used when the eased action is reversed.
    pub fn counterpart(self) -> Self {
        match self {
            Self::Linear => Self::Linear,
            Self::In { rate } => Self::Out { rate },
            Self::Out { rate } => Self::In { rate },
            Self::InOut { rate } => Self::InOut { rate },
            Self::ExponentialIn => Self::ExponentialOut,
            Self::ExponentialOut => Self::ExponentialIn,
            Self::ExponentialInOut => Self::ExponentialInOut,
            Self::SineIn => Self::SineOut,
            Self::SineOut => Self::SineIn,
            Self::SineInOut => Self::SineInOut,
            Self::ElasticIn { period } => Self::ElasticOut { period },
            Self::ElasticOut { period } => Self::ElasticIn { period },
            Self::ElasticInOut { period } => Self::ElasticInOut { period },
            Self::BounceIn => Self::BounceOut,
            Self::BounceOut => Self::BounceIn,
            Self::BounceInOut => Self::BounceInOut,
            Self::BackIn => Self::BackOut,
            Self::BackOut => Self::BackIn,
            Self::BackInOut => Self::BackInOut,
            Self::QuadIn => Self::QuadOut,
            Self::QuadOut => Self::QuadIn,
            Self::QuadInOut => Self::QuadInOut,
            Self::CubicIn => Self::CubicOut,
            Self::CubicOut => Self::CubicIn,
            Self::CubicInOut => Self::CubicInOut,
            Self::QuartIn => Self::QuartOut,
            Self::QuartOut => Self::QuartIn,
            Self::QuartInOut => Self::QuartInOut,
            Self::QuintIn => Self::QuintOut,
            Self::QuintOut => Self::QuintIn,
            Self::QuintInOut => Self::QuintInOut,
            Self::CircIn => Self::CircOut,
            Self::CircOut => Self::CircIn,
            Self::CircInOut => Self::CircInOut,
            Self::Bezier { p0, p1, p2, p3 } => Self::Bezier {
                p0: p3,
                p1: p2,
                p2: p1,
                p3: p0,
            },
        }
    }

    /// Apply this curve to progress `t`. `t` is not clamped so eases can be nested.
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Bezier { p0, p1, p2, p3 } => bezier_at(p0, p1, p2, p3, t),
            _ if t == 0.0 || t == 1.0 => t,
            Self::Linear => t,
            Self::In { rate } => t.powf(rate),
            Self::Out { rate } => t.powf(1.0 / rate),
            Self::InOut { rate } => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t.powf(rate)
                } else {
                    1.0 - 0.5 * (2.0 - t).powf(rate)
                }
            }
            Self::ExponentialIn => 2f64.powf(10.0 * (t - 1.0)),
            Self::ExponentialOut => 1.0 - 2f64.powf(-10.0 * t),
            Self::ExponentialInOut => {
                if t < 0.5 {
                    0.5 * 2f64.powf(10.0 * (t * 2.0 - 1.0))
                } else {
                    0.5 * (2.0 - 2f64.powf(-10.0 * (t * 2.0 - 1.0)))
                }
            }
            Self::SineIn => 1.0 - (t * FRAC_PI_2).cos(),
            Self::SineOut => (t * FRAC_PI_2).sin(),
            Self::SineInOut => -0.5 * ((PI * t).cos() - 1.0),
            Self::ElasticIn { period } => {
                let s = period / 4.0;
                let t = t - 1.0;
                -(2f64.powf(10.0 * t)) * ((t - s) * TAU / period).sin()
            }
            Self::ElasticOut { period } => {
                let s = period / 4.0;
                2f64.powf(-10.0 * t) * ((t - s) * TAU / period).sin() + 1.0
            }
            Self::ElasticInOut { period } => {
                let s = period / 4.0;
                let t = t * 2.0 - 1.0;
                if t < 0.0 {
                    -0.5 * 2f64.powf(10.0 * t) * ((t - s) * TAU / period).sin()
                } else {
                    2f64.powf(-10.0 * t) * ((t - s) * TAU / period).sin() * 0.5 + 1.0
                }
            }
            Self::BounceIn => 1.0 - bounce_time(1.0 - t),
            Self::BounceOut => bounce_time(t),
            Self::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_time(1.0 - t * 2.0)) * 0.5
                } else {
                    bounce_time(t * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
            Self::BackIn => t * t * ((BACK_OVERSHOOT + 1.0) * t - BACK_OVERSHOOT),
            Self::BackOut => {
                let t = t - 1.0;
                t * t * ((BACK_OVERSHOOT + 1.0) * t + BACK_OVERSHOOT) + 1.0
            }
            Self::BackInOut => {
                let overshoot = BACK_OVERSHOOT * 1.525;
                let t = t * 2.0;
                if t < 1.0 {
                    (t * t * ((overshoot + 1.0) * t - overshoot)) / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * ((overshoot + 1.0) * t + overshoot)) / 2.0 + 1.0
                }
            }
            Self::QuadIn => t * t,
            Self::QuadOut => -t * (t - 2.0),
            Self::QuadInOut => in_out_poly(t, 2),
            Self::CubicIn => t.powi(3),
            Self::CubicOut => (t - 1.0).powi(3) + 1.0,
            Self::CubicInOut => in_out_poly(t, 3),
            Self::QuartIn => t.powi(4),
            Self::QuartOut => 1.0 - (t - 1.0).powi(4),
            Self::QuartInOut => in_out_poly(t, 4),
            Self::QuintIn => t.powi(5),
            Self::QuintOut => (t - 1.0).powi(5) + 1.0,
            Self::QuintInOut => in_out_poly(t, 5),
            Self::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Self::CircOut => {
                let t = t - 1.0;
                (1.0 - t * t).sqrt()
            }
            Self::CircInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    -0.5 * ((1.0 - t * t).sqrt() - 1.0)
                } else {
                    let t = t - 2.0;
                    0.5 * ((1.0 - t * t).sqrt() + 1.0)
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::In { .. } => "in",
            Self::Out { .. } => "out",
            Self::InOut { .. } => "in_out",
            Self::ExponentialIn => "exponential_in",
            Self::ExponentialOut => "exponential_out",
            Self::ExponentialInOut => "exponential_in_out",
            Self::SineIn => "sine_in",
            Self::SineOut => "sine_out",
            Self::SineInOut => "sine_in_out",
            Self::ElasticIn { .. } => "elastic_in",
            Self::ElasticOut { .. } => "elastic_out",
            Self::ElasticInOut { .. } => "elastic_in_out",
            Self::BounceIn => "bounce_in",
            Self::BounceOut => "bounce_out",
            Self::BounceInOut => "bounce_in_out",
            Self::BackIn => "back_in",
            Self::BackOut => "back_out",
            Self::BackInOut => "back_in_out",
            Self::QuadIn => "quad_in",
            Self::QuadOut => "quad_out",
            Self::QuadInOut => "quad_in_out",
            Self::CubicIn => "cubic_in",
            Self::CubicOut => "cubic_out",
            Self::CubicInOut => "cubic_in_out",
            Self::QuartIn => "quart_in",
            Self::QuartOut => "quart_out",
            Self::QuartInOut => "quart_in_out",
            Self::QuintIn => "quint_in",
            Self::QuintOut => "quint_out",
            Self::QuintInOut => "quint_in_out",
            Self::CircIn => "circ_in",
            Self::CircOut => "circ_out",
            Self::CircInOut => "circ_in_out",
            Self::Bezier { .. } => "bezier",
        }
    }
}

/// `n`-th power ease-in/out, joined at `t = 0.5`.
fn in_out_poly(t: f64, n: i32) -> f64 {
    let t = t * 2.0;
    if t < 1.0 {
        0.5 * t.powi(n)
    } else {
        1.0 - 0.5 * (2.0 - t).powi(n)
    }
}

fn bounce_time(t: f64) -> f64 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
