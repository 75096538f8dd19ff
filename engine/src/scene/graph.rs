//! Scene Graph
//!
//! Flat list of drawable nodes. Each node owns one uploaded mesh and may
//! reference a texture; parent links only group nodes for removal (frames
//! and panels under their wall).

use std::collections::BTreeMap;

use glam::{Mat4, Quat, Vec3};

use crate::material::Material;
use crate::render::{MeshHandle, TextureHandle};

/// Stable id of a node within one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// What a node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Floor,
    Room,
    Wall,
    DoorFrame,
    DoorPanel,
    TokenSprite,
    TokenProxy,
}

/// Placement of a node's mesh in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    /// Rotation about +Y in radians
    pub rotation_y: f32,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_y: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_y(self.rotation_y),
            self.translation,
        )
    }
}

/// One drawable object.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub kind: NodeKind,
    /// Floorplan element this node was built from (surface, door or token id)
    pub element_id: String,
    pub mesh: MeshHandle,
    pub material: Material,
    pub transform: Transform,
    pub visible: bool,
    /// Rotate to face the camera every frame
    pub billboard: bool,
    pub parent: Option<NodeId>,
    /// Vertex count of the uploaded mesh
    pub vertex_count: usize,
}

impl SceneNode {
    pub fn new(kind: NodeKind, element_id: impl Into<String>, mesh: MeshHandle, material: Material) -> Self {
        Self {
            kind,
            element_id: element_id.into(),
            mesh,
            material,
            transform: Transform::default(),
            visible: true,
            billboard: false,
            parent: None,
            vertex_count: 0,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_vertex_count(mut self, count: usize) -> Self {
        self.vertex_count = count;
        self
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.material.texture
    }
}

/// All nodes of the live scene, in insertion order.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Remove one node. Children are left in place.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        self.nodes.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut SceneNode)> {
        self.nodes.iter_mut().map(|(id, node)| (*id, node))
    }

    /// Nodes of one kind.
    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.iter().filter(move |(_, node)| node.kind == kind)
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.of_kind(kind).count()
    }

    /// First node of `kind` built from `element_id`.
    pub fn find(&self, kind: NodeKind, element_id: &str) -> Option<NodeId> {
        self.of_kind(kind)
            .find(|(_, node)| node.element_id == element_id)
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every node, returning them so their resources can be released.
    pub fn drain(&mut self) -> Vec<SceneNode> {
        std::mem::take(&mut self.nodes).into_values().collect()
    }
}
