//! Textures still loading for nodes that already exist.

use std::sync::Arc;

use crate::material::{Material, MaterialBinding, ResolvedTexture};
use crate::scene::NodeId;
use crate::texture::TextureSlot;

enum Art {
    /// Surface walking the material fallback chain
    Surface(MaterialBinding),
    /// Single bitmap with a fixed material (floor, door panels)
    Bitmap { slot: TextureSlot, material: Material },
}

/// A node waiting for its bitmap.
pub struct PendingTexture {
    pub node: NodeId,
    art: Art,
}

impl PendingTexture {
    pub fn surface(node: NodeId, binding: MaterialBinding) -> Self {
        Self {
            node,
            art: Art::Surface(binding),
        }
    }

    pub fn bitmap(node: NodeId, slot: TextureSlot, material: Material) -> Self {
        Self {
            node,
            art: Art::Bitmap { slot, material },
        }
    }

    /// Check for a finished bitmap without blocking.
    pub fn poll(&mut self) -> Option<ResolvedTexture> {
        match &mut self.art {
            Art::Surface(binding) => binding.poll(),
            Art::Bitmap { slot, material } => {
                slot.poll();
                let image = Arc::clone(slot.image()?);
                Some(ResolvedTexture {
                    material: material.clone(),
                    image,
                })
            }
        }
    }

    /// Nothing further can arrive.
    pub fn is_settled(&self) -> bool {
        match &self.art {
            Art::Surface(binding) => binding.is_settled(),
            Art::Bitmap { slot, .. } => !slot.is_pending(),
        }
    }
}
