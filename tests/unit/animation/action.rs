use super::*;
use crate::animation::ops;
use crate::foundation::core::Vec2;
use crate::scene::node::{Node, NodeStore};

fn store_with(node: Node) -> (NodeStore, TargetId) {
    let mut store = NodeStore::new();
    let id = store.insert(node);
    (store, id)
}

#[test]
fn rejects_bad_durations() {
    assert!(matches!(
        ops::move_by(-1.0, Vec2::ZERO),
        Err(ActionError::Validation(_))
    ));
    assert!(ops::delay_time(f64::NAN).is_err());
    assert!(ops::delay_time(f64::INFINITY).is_err());
    assert!(ops::delay_time(0.0).is_ok());
}

#[test]
fn start_twice_is_a_state_error() {
    let (mut store, id) = store_with(Node::default());
    let mut a = ops::move_by(1.0, Vec2::new(1.0, 0.0)).unwrap();
    a.start(&mut store, id).unwrap();
    assert!(matches!(a.start(&mut store, id), Err(ActionError::State(_))));
    a.step(0.5, &mut store).unwrap();
    assert_eq!(a.state(), ActionState::Running);
    assert!(matches!(a.start(&mut store, id), Err(ActionError::State(_))));
}

#[test]
fn step_and_update_need_start() {
    let (mut store, _) = store_with(Node::default());
    let mut a = ops::fade_out(1.0).unwrap();
    assert!(matches!(a.step(0.5, &mut store), Err(ActionError::State(_))));
    assert!(matches!(
        a.update(0.1, &mut store),
        Err(ActionError::State(_))
    ));
}

#[test]
fn unknown_target_is_reported() {
    let mut store = NodeStore::new();
    let mut a = ops::fade_out(1.0).unwrap();
    let err = a.start(&mut store, TargetId(42)).unwrap_err();
    assert!(matches!(err, ActionError::UnknownTarget(TargetId(42))));
    assert_eq!(a.state(), ActionState::Unbound);
}

#[test]
fn first_update_does_not_accumulate() {
    let (mut store, id) = store_with(Node::default());
    let mut a = ops::move_by(1.0, Vec2::new(10.0, 0.0)).unwrap();
    a.start(&mut store, id).unwrap();

    a.update(0.5, &mut store).unwrap();
    assert_eq!(a.elapsed(), 0.0);
    assert_eq!(store.get(id).unwrap().position, Vec2::ZERO);

    a.update(0.5, &mut store).unwrap();
    assert_eq!(a.elapsed(), 0.5);
    assert_eq!(store.get(id).unwrap().position, Vec2::new(5.0, 0.0));
    assert!(!a.is_done());

    a.update(0.75, &mut store).unwrap();
    assert!(a.is_done());
    assert_eq!(a.progress(), 1.0);
    assert_eq!(store.get(id).unwrap().position, Vec2::new(10.0, 0.0));
}

#[test]
fn zero_duration_finishes_on_first_update() {
    let (mut store, id) = store_with(Node::at(1.0, 1.0));
    let mut a = ops::move_to(0.0, Vec2::new(7.0, 7.0)).unwrap();
    a.start(&mut store, id).unwrap();
    a.update(0.016, &mut store).unwrap();
    assert!(a.is_done());
    assert_eq!(store.get(id).unwrap().position, Vec2::new(7.0, 7.0));
}

#[test]
fn stop_hook_runs_once_and_restart_is_allowed() {
    let (mut store, id) = store_with(Node::default());
    let mut a = ops::blink(1.0, 2).unwrap();
    a.start(&mut store, id).unwrap();
    a.step(0.1, &mut store).unwrap();
    assert!(!store.get(id).unwrap().visible);

    a.stop(&mut store).unwrap();
    assert_eq!(a.state(), ActionState::Stopped);
    assert!(store.get(id).unwrap().visible);

    store.get_mut(id).unwrap().visible = false;
    a.stop(&mut store).unwrap();
    assert!(!store.get(id).unwrap().visible);

    a.start(&mut store, id).unwrap();
    assert_eq!(a.state(), ActionState::Started);
}

#[test]
fn stop_before_start_is_a_no_op() {
    let (mut store, _) = store_with(Node::default());
    let mut a = ops::blink(1.0, 3).unwrap();
    a.stop(&mut store).unwrap();
    assert_eq!(a.state(), ActionState::Unbound);
}

#[test]
fn clone_is_unbound_and_keeps_tag() {
    let (mut store, id) = store_with(Node::default());
    let mut a = ops::move_by(1.0, Vec2::new(3.0, 0.0))
        .unwrap()
        .with_tag(Tag(3));
    a.start(&mut store, id).unwrap();
    a.update(0.0, &mut store).unwrap();
    a.update(0.4, &mut store).unwrap();

    let copy = a.clone();
    assert_eq!(copy.state(), ActionState::Unbound);
    assert_eq!(copy.elapsed(), 0.0);
    assert_eq!(copy.target(), None);
    assert_eq!(copy.tag(), Some(Tag(3)));
    assert_eq!(copy.duration(), 1.0);
}

#[test]
fn instants_report_done_after_step() {
    let (mut store, id) = store_with(Node::default());
    let mut a = ops::hide();
    assert!(a.is_instant());
    assert_eq!(a.duration(), 0.0);
    a.start(&mut store, id).unwrap();
    assert!(!a.is_done());
    a.step(0.0, &mut store).unwrap();
    assert!(a.is_done());
    assert!(!store.get(id).unwrap().visible);
}

#[test]
fn reverse_is_unbound_with_same_duration() {
    let a = ops::rotate_by(2.5, 90.0).unwrap();
    let r = a.reverse().unwrap();
    assert_eq!(r.duration(), 2.5);
    assert_eq!(r.state(), ActionState::Unbound);
    assert_eq!(r.name(), "RotateBy");
}

#[test]
fn set_speed_only_applies_to_speed_actions() {
    let mut plain = Action::from(ops::delay_time(1.0).unwrap());
    assert!(plain.set_speed(2.0).is_err());
    assert_eq!(plain.duration(), Some(1.0));

    let mut fast = ops::speed(ops::delay_time(1.0).unwrap(), 2.0).unwrap();
    fast.set_speed(3.0).unwrap();
    assert_eq!(fast.speed_factor(), Some(3.0));
    assert!(fast.set_speed(0.0).is_err());
    assert_eq!(fast.duration(), None);
}

#[test]
fn stackable_is_ignored_on_non_positional_kinds() {
    let a = ops::fade_in(1.0).unwrap().stackable(true);
    assert_eq!(a.name(), "FadeIn");
}
