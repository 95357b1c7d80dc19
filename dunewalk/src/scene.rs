//! Retained table of visual nodes a renderer can read.
//!
//! Gameplay never draws; it only writes positions, alpha, text and the
//! current animation frame here. A host walks the table each frame.

use crate::assets::AssetCatalog;
use crate::camera::CameraModel;
use crate::math::Vec2;

/// Handle to a node in a [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Coordinate space a node's position is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Space {
    /// Moves with the world offset, zoom and camera.
    World,
    /// Fixed screen pixels (HUD, cursor).
    Screen,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub space: Space,
    pub position: Vec2,
    /// Pixel size of the texture, once known.
    pub size: Vec2,
    pub scale: Vec2,
    pub alpha: f32,
    pub texture: Option<String>,
    /// Named atlas frame, for sprite-sheet nodes.
    pub frame: Option<String>,
    pub text: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, space: Space, position: Vec2) -> Self {
        Self {
            name: name.into(),
            space,
            position,
            size: Vec2::ZERO,
            scale: Vec2::ONE,
            alpha: 1.0,
            texture: None,
            frame: None,
            text: None,
        }
    }

    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.position = position;
        }
    }

    pub fn set_alpha(&mut self, id: NodeId, alpha: f32) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Set a text node's contents. Empty string hides the text but keeps the node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            match node.text.as_mut() {
                Some(current) if current == text => {}
                Some(current) => {
                    current.clear();
                    current.push_str(text);
                }
                None => node.text = Some(text.to_string()),
            }
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| n.text.as_deref())
    }

    /// Screen position of a node.
    pub fn global_position(&self, id: NodeId, camera: &CameraModel, world_offset: Vec2) -> Option<Vec2> {
        let node = self.get(id)?;
        Some(match node.space {
            Space::World => camera.world_to_screen(node.position, world_offset),
            Space::Screen => node.position,
        })
    }

    /// Fill in node sizes from loaded image metadata. Returns how many nodes were sized.
    pub fn apply_texture_sizes(&mut self, assets: &AssetCatalog) -> usize {
        let mut sized = 0;
        for node in &mut self.nodes {
            let Some(info) = node.texture.as_deref().and_then(|key| assets.get(key)) else {
                continue;
            };
            node.size = Vec2::new(info.width as f32, info.height as f32);
            sized += 1;
        }
        sized
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}
