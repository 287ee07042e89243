//! The Target capability: everything an action is allowed to read or write on a node.

use crate::foundation::core::{FrameId, Rgb8, Size, TargetId, Vec2};

/// Mutable transform and appearance of one scene node.
///
/// The engine never owns a target. Implementations live in the host scene graph; [`Node`] is a
/// plain reference implementation used by the runner, the CLI and tests.
///
/// [`Node`]: crate::Node
pub trait Target {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);

    /// Depth coordinate for 3D moves. 2D-only targets can keep the default no-op.
    fn position_z(&self) -> f64 {
        0.0
    }
    fn set_position_z(&mut self, _z: f64) {}

    /// Per-axis rotation in degrees `(x, y)`; a uniform rotation has `x == y`.
    fn rotation(&self) -> Vec2;
    fn set_rotation(&mut self, rotation: Vec2);

    fn scale(&self) -> Vec2;
    fn set_scale(&mut self, scale: Vec2);

    /// Skew angles in degrees `(x, y)`.
    fn skew(&self) -> Vec2;
    fn set_skew(&mut self, skew: Vec2);

    fn content_size(&self) -> Size;
    fn set_content_size(&mut self, size: Size);

    fn opacity(&self) -> u8;
    fn set_opacity(&mut self, opacity: u8);

    fn color(&self) -> Rgb8;
    fn set_color(&mut self, color: Rgb8);

    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    /// Currently displayed discrete frame, if any.
    fn display_frame(&self) -> Option<FrameId>;

    /// Switch to `frame`. Returns `false` when the target does not know that frame.
    fn set_display_frame(&mut self, frame: &FrameId) -> bool;

    /// Arbitrary named float property (tween-by-key).
    fn float_property(&self, key: &str) -> Option<f64>;

    /// Returns `false` when `key` is not a property of this target.
    fn set_float_property(&mut self, key: &str, value: f64) -> bool;
}

/// Resolves target handles. Passed into every `start`/`update`/`step`/`stop` call.
pub trait Targets {
    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn Target>;
}
