use super::*;

#[test]
fn defaults_are_identity_transform() {
    let n = Node::default();
    assert_eq!(n.scale, Vec2::new(1.0, 1.0));
    assert_eq!(n.opacity, 255);
    assert!(n.visible);
    assert_eq!(n.frame, None);
}

#[test]
fn frame_set_rejects_unknown_frames() {
    let mut n = Node::default().with_frames(["a", "b"]);
    assert!(n.set_display_frame(&FrameId::from("a")));
    assert!(!n.set_display_frame(&FrameId::from("zzz")));
    assert_eq!(n.display_frame(), Some(FrameId::from("a")));

    let mut open = Node::default();
    assert!(open.set_display_frame(&FrameId::from("anything")));
}

#[test]
fn float_properties_need_declaration() {
    let mut n = Node::default().with_property("glow", 0.5);
    assert!(n.set_float_property("glow", 0.75));
    assert_eq!(n.float_property("glow"), Some(0.75));
    assert!(!n.set_float_property("missing", 1.0));
    assert_eq!(n.float_property("missing"), None);
}

#[test]
fn store_hands_out_distinct_ids() {
    let mut store = NodeStore::new();
    let a = store.insert(Node::at(1.0, 2.0));
    let b = store.insert(Node::at(3.0, 4.0));
    assert_ne!(a, b);
    assert_eq!(store.len(), 2);

    store
        .target_mut(b)
        .unwrap()
        .set_position(Vec2::new(9.0, 9.0));
    assert_eq!(store.get(b).unwrap().position, Vec2::new(9.0, 9.0));

    store.remove(a);
    assert!(store.target_mut(a).is_none());
    let c = store.insert(Node::default());
    assert_ne!(c, a);
}
