use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::{FrameId, Rgb8, Size, TargetId, Vec2};
use crate::scene::target::{Target, Targets};

/// Plain-data scene node implementing [`Target`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub position: Vec2,
    pub position_z: f64,
    pub rotation: Vec2,
    pub scale: Vec2, // default (1,1)
    pub skew: Vec2,
    pub content_size: Size,
    pub opacity: u8,
    pub color: Rgb8,
    pub visible: bool,
    pub frame: Option<FrameId>,
    /// Frames this node can display; an empty set accepts any frame.
    pub frames: BTreeSet<FrameId>,
    pub properties: BTreeMap<String, f64>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            position_z: 0.0,
            rotation: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            skew: Vec2::ZERO,
            content_size: Size::ZERO,
            opacity: 255,
            color: Rgb8::WHITE,
            visible: true,
            frame: None,
            frames: BTreeSet::new(),
            properties: BTreeMap::new(),
        }
    }
}

impl Node {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::default()
        }
    }

    /// Restrict the displayable frames to `frames`.
    pub fn with_frames<I, F>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FrameId>,
    {
        self.frames = frames.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: f64) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

impl Target for Node {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn position_z(&self) -> f64 {
        self.position_z
    }

    fn set_position_z(&mut self, z: f64) {
        self.position_z = z;
    }

    fn rotation(&self) -> Vec2 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Vec2) {
        self.rotation = rotation;
    }

    fn scale(&self) -> Vec2 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    fn skew(&self) -> Vec2 {
        self.skew
    }

    fn set_skew(&mut self, skew: Vec2) {
        self.skew = skew;
    }

    fn content_size(&self) -> Size {
        self.content_size
    }

    fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    fn opacity(&self) -> u8 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    fn color(&self) -> Rgb8 {
        self.color
    }

    fn set_color(&mut self, color: Rgb8) {
        self.color = color;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn display_frame(&self) -> Option<FrameId> {
        self.frame.clone()
    }

    fn set_display_frame(&mut self, frame: &FrameId) -> bool {
        if !self.frames.is_empty() && !self.frames.contains(frame) {
            return false;
        }
        self.frame = Some(frame.clone());
        true
    }

    fn float_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).copied()
    }

    fn set_float_property(&mut self, key: &str, value: f64) -> bool {
        match self.properties.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Id-addressed collection of [`Node`]s implementing [`Targets`].
#[derive(Clone, Debug, Default)]
pub struct NodeStore {
    nodes: BTreeMap<TargetId, Node>,
    next_id: u64,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    pub fn remove(&mut self, id: TargetId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: TargetId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Targets for NodeStore {
    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn Target> {
        self.nodes.get_mut(&id).map(|n| n as &mut dyn Target)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
