use std::cell::Cell;

use super::*;
use crate::scene::node::Node;

fn approx(a: Vec2, b: Vec2) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn move_by_interpolates_from_start() {
    let mut n = Node::at(10.0, 10.0);
    let mut m = Move::by(Vec2::new(100.0, 0.0));
    m.start(&mut n);
    m.step(0.5, &mut n);
    assert_eq!(n.position, Vec2::new(60.0, 10.0));
    m.step(0.0, &mut n);
    assert_eq!(n.position, Vec2::new(10.0, 10.0));
    m.step(1.0, &mut n);
    assert_eq!(n.position, Vec2::new(110.0, 10.0));
}

#[test]
fn move_to_resolves_delta_at_start() {
    let mut n = Node::at(5.0, 5.0);
    let mut m = Move::to(Vec2::new(15.0, -5.0));
    m.start(&mut n);
    m.step(0.5, &mut n);
    assert_eq!(n.position, Vec2::new(10.0, 0.0));
    assert!(matches!(m.reversed(), Err(ActionError::NotReversible("MoveTo"))));
}

#[test]
fn move_3d_drives_depth() {
    let mut n = Node::default();
    n.position_z = 2.0;
    let mut m = Move::to_3d(Vec2::new(4.0, 0.0), 6.0);
    m.start(&mut n);
    m.step(0.5, &mut n);
    assert_eq!(n.position, Vec2::new(2.0, 0.0));
    assert_eq!(n.position_z, 4.0);

    let mut flat = Move::by(Vec2::new(1.0, 0.0));
    flat.start(&mut n);
    flat.step(1.0, &mut n);
    assert_eq!(n.position_z, 4.0);
}

#[test]
fn stackable_move_keeps_external_drift() {
    let mut n = Node::default();
    let mut m = Move::by(Vec2::new(10.0, 0.0));
    m.stack.enabled = true;
    m.start(&mut n);
    m.step(0.5, &mut n);
    n.position += Vec2::new(0.0, 3.0);
    m.step(1.0, &mut n);
    assert_eq!(n.position, Vec2::new(10.0, 3.0));

    let mut plain = Move::by(Vec2::new(10.0, 0.0));
    let mut n = Node::default();
    plain.start(&mut n);
    plain.step(0.5, &mut n);
    n.position += Vec2::new(0.0, 3.0);
    plain.step(1.0, &mut n);
    assert_eq!(n.position, Vec2::new(10.0, 0.0));
}

#[test]
fn stackable_jump_keeps_external_drift() {
    let mut n = Node::default();
    let mut j = Jump::by(Vec2::new(20.0, 0.0), 10.0, 2);
    j.stack.enabled = true;
    j.start(&mut n);
    j.step(0.5, &mut n);
    assert_eq!(n.position, Vec2::new(10.0, 0.0));
    n.position += Vec2::new(0.0, 5.0);
    j.step(1.0, &mut n);
    assert_eq!(n.position, Vec2::new(20.0, 5.0));
}

#[test]
fn stackable_bezier_keeps_external_drift() {
    let config = BezierConfig {
        control_1: Vec2::new(0.0, 10.0),
        control_2: Vec2::new(20.0, 10.0),
        end: Vec2::new(20.0, 0.0),
    };
    let mut n = Node::default();
    let mut b = Bezier::by(config);
    b.stack.enabled = true;
    b.start(&mut n);
    b.step(0.5, &mut n);
    assert!(approx(n.position, Vec2::new(10.0, 7.5)));
    n.position += Vec2::new(0.0, 5.0);
    b.step(1.0, &mut n);
    assert!(approx(n.position, Vec2::new(20.0, 5.0)));

    // The same drift is overwritten without stackable mode.
    let mut n = Node::default();
    let mut plain = Bezier::by(config);
    plain.start(&mut n);
    plain.step(0.5, &mut n);
    n.position += Vec2::new(0.0, 5.0);
    plain.step(1.0, &mut n);
    assert!(approx(n.position, Vec2::new(20.0, 0.0)));
}

#[test]
fn rotate_to_takes_shortest_arc() {
    let mut n = Node::default();
    n.rotation = Vec2::new(350.0, 350.0);
    let mut r = Rotate::to(Vec2::new(10.0, 10.0));
    r.start(&mut n);
    r.step(0.5, &mut n);
    assert_eq!(n.rotation, Vec2::new(360.0, 360.0));
    r.step(1.0, &mut n);
    assert_eq!(n.rotation, Vec2::new(370.0, 370.0));
}

#[test]
fn rotate_by_reverses_by_negation() {
    let mut n = Node::default();
    let mut r = Rotate::by(Vec2::new(90.0, 45.0));
    r.start(&mut n);
    r.step(1.0, &mut n);
    let Kind::Rotate(mut back) = r.reversed().unwrap() else {
        panic!("expected a rotation");
    };
    back.start(&mut n);
    back.step(1.0, &mut n);
    assert_eq!(n.rotation, Vec2::ZERO);
}

#[test]
fn scale_by_multiplies_and_reverses_reciprocally() {
    let mut n = Node::default();
    n.scale = Vec2::new(2.0, 2.0);
    let mut s = Scale::by(Vec2::new(3.0, 0.5));
    s.start(&mut n);
    s.step(1.0, &mut n);
    assert_eq!(n.scale, Vec2::new(6.0, 1.0));

    let Kind::Scale(mut back) = s.reversed().unwrap() else {
        panic!("expected a scale");
    };
    back.start(&mut n);
    back.step(1.0, &mut n);
    assert!(approx(n.scale, Vec2::new(2.0, 2.0)));

    assert!(matches!(
        Scale::by(Vec2::new(0.0, 1.0)).reversed(),
        Err(ActionError::Validation(_))
    ));
    assert!(Scale::to(Vec2::new(1.0, 1.0)).reversed().is_err());
}

#[test]
fn skew_to_folds_into_half_turn() {
    let mut n = Node::default();
    n.skew = Vec2::new(200.0, 0.0);
    let mut s = Skew::to(Vec2::new(30.0, 10.0));
    s.start(&mut n);
    s.step(0.0, &mut n);
    assert_eq!(n.skew, Vec2::new(20.0, 0.0));
    s.step(1.0, &mut n);
    assert_eq!(n.skew, Vec2::new(30.0, 10.0));
}

#[test]
fn resize_by_and_to() {
    let mut n = Node::default();
    n.content_size = Size::new(10.0, 20.0);
    let mut r = Resize::by(Size::new(10.0, -10.0));
    r.start(&mut n);
    r.step(0.5, &mut n);
    assert_eq!(n.content_size, Size::new(15.0, 15.0));

    let mut to = Resize::to(Size::new(0.0, 0.0));
    to.start(&mut n);
    to.step(1.0, &mut n);
    assert_eq!(n.content_size, Size::ZERO);
    assert!(to.reversed().is_err());
}

#[test]
fn jump_peaks_mid_hop_and_lands_exactly() {
    let mut n = Node::default();
    let mut j = Jump::by(Vec2::new(100.0, 0.0), 50.0, 2);
    j.start(&mut n);
    j.step(0.25, &mut n);
    assert_eq!(n.position, Vec2::new(25.0, 50.0));
    j.step(0.5, &mut n);
    assert_eq!(n.position, Vec2::new(50.0, 0.0));
    j.step(1.0, &mut n);
    assert_eq!(n.position, Vec2::new(100.0, 0.0));
}

#[test]
fn bezier_endpoints_and_reverse_retrace() {
    let cfg = BezierConfig {
        control_1: Vec2::new(0.0, 100.0),
        control_2: Vec2::new(100.0, 100.0),
        end: Vec2::new(100.0, 0.0),
    };
    let mut n = Node::default();
    let mut b = Bezier::by(cfg);
    b.start(&mut n);
    b.step(0.5, &mut n);
    let mid = n.position;
    assert!(approx(mid, Vec2::new(50.0, 75.0)));
    b.step(1.0, &mut n);
    assert_eq!(n.position, Vec2::new(100.0, 0.0));

    let Kind::Bezier(mut back) = b.reversed().unwrap() else {
        panic!("expected a bezier");
    };
    back.start(&mut n);
    back.step(0.5, &mut n);
    assert!(approx(n.position, mid));
    back.step(1.0, &mut n);
    assert!(approx(n.position, Vec2::ZERO));
}

#[test]
fn bezier_to_uses_absolute_points() {
    let mut n = Node::at(10.0, 10.0);
    let mut b = Bezier::to(BezierConfig {
        control_1: Vec2::new(10.0, 50.0),
        control_2: Vec2::new(50.0, 50.0),
        end: Vec2::new(50.0, 10.0),
    });
    b.start(&mut n);
    b.step(1.0, &mut n);
    assert_eq!(n.position, Vec2::new(50.0, 10.0));
    assert!(b.reversed().is_err());
}

#[test]
fn tint_by_clamps_channels() {
    let mut n = Node::default();
    let mut t = Tint::by(-255, 40, -100);
    t.start(&mut n);
    t.step(1.0, &mut n);
    assert_eq!(n.color, Rgb8::new(0, 255, 155));

    let mut to = Tint::to(Rgb8::new(100, 100, 100));
    let mut n = Node::default();
    to.start(&mut n);
    to.step(0.5, &mut n);
    assert_eq!(n.color, Rgb8::new(178, 178, 178));
}

#[test]
fn fades_have_named_counterparts() {
    let mut n = Node::default();
    let mut out = Fade::new(FadeMode::Out);
    out.start(&mut n);
    out.step(0.5, &mut n);
    assert_eq!(n.opacity, 128);
    out.step(1.0, &mut n);
    assert_eq!(n.opacity, 0);

    let Kind::Fade(mut back) = out.reversed().unwrap() else {
        panic!("expected a fade");
    };
    assert_eq!(back.name(), "FadeIn");
    back.start(&mut n);
    back.step(1.0, &mut n);
    assert_eq!(n.opacity, 255);

    assert!(Fade::new(FadeMode::To(9)).reversed().is_err());
}

#[test]
fn blink_toggles_and_restores() {
    let mut n = Node::default();
    let mut b = Blink::new(2);
    b.start(&mut n);
    b.step(0.1, &mut n);
    assert!(!n.visible);
    b.step(0.4, &mut n);
    assert!(n.visible);
    b.step(0.6, &mut n);
    assert!(!n.visible);
    b.at_stop(&mut n);
    assert!(n.visible);
}

#[test]
fn float_tween_feeds_callback() {
    let seen = std::rc::Rc::new(Cell::new(f64::NAN));
    let sink = seen.clone();
    let mut f = FloatTween::new(
        2.0,
        4.0,
        FloatSink::Callback(FloatFn(Rc::new(move |_t: &mut dyn Target, v: f64| {
            sink.set(v)
        }))),
    );
    let mut n = Node::default();
    f.start(&mut n);
    f.step(0.25, &mut n);
    assert_eq!(seen.get(), 2.5);

    let Kind::Float(mut back) = f.reversed().unwrap() else {
        panic!("expected a float tween");
    };
    back.step(0.25, &mut n);
    assert_eq!(seen.get(), 3.5);
}

#[test]
fn property_tween_from_current_reads_start_value() {
    let mut n = Node::default().with_property("glow", 2.0);
    let mut f = FloatTween::from_current("glow".into(), 4.0);
    f.start(&mut n);
    f.step(0.5, &mut n);
    assert_eq!(n.float_property("glow"), Some(3.0));
    f.step(1.0, &mut n);
    assert_eq!(n.float_property("glow"), Some(4.0));
    assert!(matches!(f.reversed(), Err(ActionError::NotReversible("ActionFloat"))));

    let mut missing = FloatTween::from_current("nope".into(), 1.0);
    missing.start(&mut n);
    missing.step(0.5, &mut n);
    assert_eq!(n.float_property("nope"), None);
}

#[test]
fn float_tween_writes_known_property_and_skips_unknown() {
    let mut n = Node::default().with_property("glow", 0.0);
    let mut f = FloatTween::new(0.0, 1.0, FloatSink::Property("glow".into()));
    f.start(&mut n);
    f.step(0.5, &mut n);
    assert_eq!(n.float_property("glow"), Some(0.5));

    let mut missing = FloatTween::new(0.0, 1.0, FloatSink::Property("nope".into()));
    missing.start(&mut n);
    missing.step(0.5, &mut n);
    missing.step(0.7, &mut n);
    assert_eq!(n.float_property("nope"), None);
}

#[test]
fn instant_reverse_rules() {
    assert!(matches!(
        Instant::Show.reversed(),
        Ok(Kind::Instant(Instant::Hide))
    ));
    assert!(matches!(
        Instant::Hide.reversed(),
        Ok(Kind::Instant(Instant::Show))
    ));
    assert!(matches!(
        Instant::ToggleVisibility.reversed(),
        Ok(Kind::Instant(Instant::ToggleVisibility))
    ));
    assert!(matches!(
        Instant::Place(Vec2::ZERO).reversed(),
        Err(ActionError::NotReversible("Place"))
    ));

    let mut n = Node::default();
    Instant::ToggleVisibility.step(0.0, &mut n);
    assert!(!n.visible);
    Instant::Place(Vec2::new(3.0, 4.0)).step(0.0, &mut n);
    assert_eq!(n.position, Vec2::new(3.0, 4.0));
}
