use super::*;

#[test]
fn ids_display_and_order() {
    assert_eq!(TargetId(3).to_string(), "target#3");
    assert!(TargetId(1) < TargetId(2));
    assert_eq!(FrameId::from("walk_01").to_string(), "walk_01");
}

#[test]
fn frame_id_serializes_as_plain_string() {
    let s = serde_json::to_string(&FrameId::new("idle")).unwrap();
    assert_eq!(s, "\"idle\"");
    let back: FrameId = serde_json::from_str(&s).unwrap();
    assert_eq!(back.as_str(), "idle");
}

#[test]
fn rgb_channels_roundtrip() {
    let c = Rgb8::new(10, 20, 30);
    assert_eq!(Rgb8::from_channels(c.channels()), c);
    assert_eq!(Rgb8::default(), Rgb8::WHITE);
}
