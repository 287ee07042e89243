use super::*;
use crate::animation::ops;
use crate::foundation::core::Vec2;
use crate::scene::node::{Node, NodeStore};

fn setup() -> (NodeStore, TargetId, ActionManager) {
    let mut store = NodeStore::new();
    let id = store.insert(Node::default());
    (store, id, ActionManager::new())
}

fn x(store: &NodeStore, id: TargetId) -> f64 {
    store.get(id).map_or(f64::NAN, |n| n.position.x)
}

#[test]
fn finished_actions_are_removed() {
    let (mut store, id, mut mgr) = setup();
    mgr.add(ops::move_by(1.0, Vec2::new(10.0, 0.0)).unwrap(), id, &mut store)
        .unwrap();
    assert_eq!(mgr.running_on(id), 1);
    mgr.update(0.0, &mut store).unwrap();
    mgr.update(0.5, &mut store).unwrap();
    assert_eq!(x(&store, id), 5.0);
    mgr.update(0.5, &mut store).unwrap();
    assert_eq!(x(&store, id), 10.0);
    assert!(mgr.is_empty());
}

#[test]
fn pause_preserves_elapsed_time() {
    let (mut store, id, mut mgr) = setup();
    mgr.add(ops::move_by(2.0, Vec2::new(100.0, 0.0)).unwrap(), id, &mut store)
        .unwrap();
    mgr.update(0.0, &mut store).unwrap();
    mgr.update(0.5, &mut store).unwrap();
    assert_eq!(x(&store, id), 25.0);

    mgr.pause_target(id);
    assert!(mgr.is_paused(id));
    for _ in 0..3 {
        mgr.update(1.0, &mut store).unwrap();
    }
    assert_eq!(x(&store, id), 25.0);

    mgr.resume_target(id);
    mgr.update(0.5, &mut store).unwrap();
    assert_eq!(x(&store, id), 50.0);
    assert_eq!(mgr.len(), 1);
}

#[test]
fn opts_scale_and_clamp_ticks() {
    let mut store = NodeStore::new();
    let id = store.insert(Node::default());
    let mut mgr = ActionManager::with_opts(ManagerOpts {
        time_scale: 2.0,
        max_step: Some(0.5),
    })
    .unwrap();
    mgr.add(ops::move_by(4.0, Vec2::new(40.0, 0.0)).unwrap(), id, &mut store)
        .unwrap();
    mgr.update(0.0, &mut store).unwrap();
    mgr.update(0.1, &mut store).unwrap();
    assert!((x(&store, id) - 2.0).abs() < 1e-9);
    mgr.update(10.0, &mut store).unwrap();
    assert!((x(&store, id) - 7.0).abs() < 1e-9);
}

#[test]
fn rejects_bad_ticks_and_options() {
    let (mut store, _, mut mgr) = setup();
    assert!(mgr.update(-0.1, &mut store).is_err());
    assert!(mgr.update(f64::NAN, &mut store).is_err());
    assert!(
        ActionManager::with_opts(ManagerOpts {
            time_scale: -1.0,
            max_step: None
        })
        .is_err()
    );
    assert!(
        ActionManager::with_opts(ManagerOpts {
            time_scale: 1.0,
            max_step: Some(0.0)
        })
        .is_err()
    );
}

#[test]
fn add_on_unknown_target_fails() {
    let (mut store, _, mut mgr) = setup();
    let err = mgr
        .add(ops::fade_out(1.0).unwrap(), TargetId(99), &mut store)
        .unwrap_err();
    assert!(matches!(err, ActionError::UnknownTarget(TargetId(99))));
    assert!(mgr.is_empty());
}

#[test]
fn stop_by_tag_and_target() {
    let (mut store, id, mut mgr) = setup();
    let other = store.insert(Node::default());
    let tagged = ops::rotate_by(1.0, 90.0).unwrap().with_tag(Tag(7));
    mgr.add(tagged, id, &mut store).unwrap();
    mgr.add(ops::fade_out(1.0).unwrap(), id, &mut store).unwrap();
    mgr.add(ops::fade_out(1.0).unwrap(), other, &mut store).unwrap();

    assert!(mgr.get_by_tag(id, Tag(7)).is_some());
    assert!(mgr.get_by_tag(other, Tag(7)).is_none());
    assert!(mgr.stop_by_tag(id, Tag(7), &mut store).unwrap());
    assert!(!mgr.stop_by_tag(id, Tag(7), &mut store).unwrap());
    assert_eq!(mgr.running_on(id), 1);

    assert_eq!(mgr.stop_all_for(id, &mut store).unwrap(), 1);
    assert_eq!(mgr.running_on(other), 1);
    assert_eq!(mgr.stop_all(&mut store).unwrap(), 1);
    assert!(mgr.is_empty());
}

#[test]
fn stop_action_runs_stop_hook() {
    let (mut store, id, mut mgr) = setup();
    let handle = mgr.add(ops::blink(1.0, 2).unwrap(), id, &mut store).unwrap();
    mgr.update(0.0, &mut store).unwrap();
    mgr.update(0.1, &mut store).unwrap();
    assert!(!store.get(id).unwrap().visible);
    assert!(mgr.get(handle).is_some());
    assert!(mgr.stop_action(handle, &mut store).unwrap());
    assert!(store.get(id).unwrap().visible);
    assert!(!mgr.stop_action(handle, &mut store).unwrap());
}

#[test]
fn actions_tick_in_insertion_order() {
    let (mut store, id, mut mgr) = setup();
    mgr.add(ops::move_to(1.0, Vec2::new(10.0, 0.0)).unwrap(), id, &mut store)
        .unwrap();
    mgr.add(ops::move_to(1.0, Vec2::new(-10.0, 0.0)).unwrap(), id, &mut store)
        .unwrap();
    mgr.update(0.0, &mut store).unwrap();
    mgr.update(1.0, &mut store).unwrap();
    assert_eq!(x(&store, id), -10.0);
}

#[test]
fn forever_actions_stay_registered() {
    let (mut store, id, mut mgr) = setup();
    let handle = mgr
        .add(
            ops::repeat_forever(ops::rotate_by(0.5, 10.0).unwrap()).unwrap(),
            id,
            &mut store,
        )
        .unwrap();
    for _ in 0..20 {
        mgr.update(0.1, &mut store).unwrap();
    }
    assert_eq!(mgr.len(), 1);
    assert_eq!(mgr.get(handle).map(|a| a.name()), Some("RepeatForever"));
}

#[test]
fn opts_deserialize_with_defaults() {
    let opts: ManagerOpts = serde_json::from_str("{}").unwrap();
    assert_eq!(opts, ManagerOpts::default());
    let opts: ManagerOpts = serde_json::from_str(r#"{ "time_scale": 0.5 }"#).unwrap();
    assert_eq!(opts.time_scale, 0.5);
    assert_eq!(opts.max_step, None);
}

#[test]
fn removed_target_does_not_stall_other_actions() {
    let (mut store, a, mut mgr) = setup();
    let b = store.insert(Node::default());
    mgr.add(ops::move_by(1.0, Vec2::new(10.0, 0.0)).unwrap(), a, &mut store)
        .unwrap();
    mgr.add(ops::move_by(1.0, Vec2::new(10.0, 0.0)).unwrap(), b, &mut store)
        .unwrap();
    mgr.update(0.0, &mut store).unwrap();

    store.remove(a);
    mgr.update(0.5, &mut store).unwrap();
    assert_eq!(mgr.running_on(a), 0);
    assert_eq!(mgr.running_on(b), 1);
    assert_eq!(x(&store, b), 5.0);

    mgr.update(0.5, &mut store).unwrap();
    assert_eq!(x(&store, b), 10.0);
    assert!(mgr.is_empty());
}

#[test]
fn failing_action_is_dropped_and_reported_after_the_tick() {
    let (mut store, id, mut mgr) = setup();
    let other = store.insert(Node::default());
    mgr.add(
        ops::targeted(TargetId(404), ops::rotate_by(1.0, 90.0).unwrap()).unwrap(),
        id,
        &mut store,
    )
    .unwrap_err();

    let handle = mgr
        .add(ops::move_by(1.0, Vec2::new(10.0, 0.0)).unwrap(), id, &mut store)
        .unwrap();
    mgr.add(ops::move_by(1.0, Vec2::new(20.0, 0.0)).unwrap(), other, &mut store)
        .unwrap();
    // Unbinding the first action behind the manager's back makes its next tick fail.
    if let Some(action) = mgr.get_mut(handle) {
        action.stop(&mut store).unwrap();
    }

    let err = mgr.update(0.0, &mut store).unwrap_err();
    assert!(matches!(err, ActionError::State(_)));
    assert!(mgr.get(handle).is_none());
    assert_eq!(mgr.running_on(other), 1);

    mgr.update(0.5, &mut store).unwrap();
    assert_eq!(x(&store, other), 10.0);
}
