//! Material Binder
//!
//! Picks the texture a surface is drawn with. Candidates are tried in
//! order until one loads:
//!
//! 1. the explicit assignment for the surface id (walls look in `walls`,
//!    rooms in `floors`)
//! 2. the asset store's default for the surface type
//! 3. the legacy `WallTexture` / `RoomTexture` region of the floor bitmap
//! 4. a flat colour (`0xcccccc` walls, `0x666666` floors)
//!
//! Loading never blocks. A binding starts on the flat colour and is polled
//! each frame; when a bitmap arrives the caller uploads it and swaps the
//! node's material. A failed load moves on to the next candidate.

use std::collections::VecDeque;
use std::sync::Arc;

use image::RgbaImage;

use super::assets::{AssetSource, TextureAsset};
use super::assignment::AssignmentTable;
use super::category::{TextureCategory, flat_fallback, legacy_policy};
use super::descriptor::Material;
use crate::floorplan::{Floorplan, ROOM_TEXTURE_REGION, Surface, SurfaceKind, WALL_TEXTURE_REGION};
use crate::texture::{TextureSlot, TileRepeat, crop_region};

enum Candidate {
    Assigned(TextureAsset),
    Default(TextureAsset),
    Legacy(Arc<RgbaImage>),
}

impl Candidate {
    fn label(&self) -> &'static str {
        match self {
            Candidate::Assigned(_) => "assigned",
            Candidate::Default(_) => "default",
            Candidate::Legacy(_) => "legacy",
        }
    }

    fn open(self) -> (Material, TextureSlot, &'static str) {
        let label = self.label();
        match self {
            Candidate::Assigned(asset) | Candidate::Default(asset) => {
                (asset.category.policy(), asset.source.open(), label)
            }
            Candidate::Legacy(image) => (legacy_policy(), TextureSlot::Ready(image), label),
        }
    }
}

/// A loaded texture and the material it should be drawn with.
#[derive(Clone, Debug)]
pub struct ResolvedTexture {
    pub material: Material,
    pub image: Arc<RgbaImage>,
}

/// Texture resolution in progress for one surface.
pub struct MaterialBinding {
    surface_id: String,
    fallback: Material,
    repeat: TileRepeat,
    queue: VecDeque<Candidate>,
    active: Option<(Material, TextureSlot, &'static str)>,
}

impl MaterialBinding {
    /// Material to draw with until a texture loads.
    pub fn fallback(&self) -> &Material {
        &self.fallback
    }

    /// Tiling to bake into the mesh UVs. One when nothing could ever load.
    pub fn repeat(&self) -> TileRepeat {
        self.repeat
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    /// True once the binding has nothing left to wait for.
    pub fn is_settled(&self) -> bool {
        self.active.is_none()
    }

    /// Advance loading without blocking.
    ///
    /// Returns the texture once a candidate finishes loading. Failed
    /// candidates are skipped; when all fail the surface keeps its flat
    /// fallback and the binding settles.
    pub fn poll(&mut self) -> Option<ResolvedTexture> {
        loop {
            let (_, slot, _) = self.active.as_mut()?;
            slot.poll();
            match slot {
                TextureSlot::Pending(_) => return None,
                TextureSlot::Ready(_) => {
                    let (material, slot, label) = self.active.take()?;
                    tracing::debug!("[MaterialBinder] {} uses its {} texture", self.surface_id, label);
                    let image = Arc::clone(slot.image()?);
                    return Some(ResolvedTexture { material, image });
                }
                TextureSlot::Failed => {
                    let label = self.active.as_ref().map(|a| a.2).unwrap_or_default();
                    tracing::warn!(
                        "[MaterialBinder] {} texture for {} failed, trying next",
                        label,
                        self.surface_id
                    );
                    self.active = self.queue.pop_front().map(Candidate::open);
                    if self.active.is_none() {
                        tracing::warn!("[MaterialBinder] {} falls back to a flat colour", self.surface_id);
                    }
                }
            }
        }
    }
}

/// Resolves surface materials.
#[derive(Default)]
pub struct MaterialBinder {
    assignments: AssignmentTable,
    legacy_wall: Option<Arc<RgbaImage>>,
    legacy_room: Option<Arc<RgbaImage>>,
    cell_size: f32,
}

impl MaterialBinder {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            ..Self::default()
        }
    }

    pub fn assignments(&self) -> &AssignmentTable {
        &self.assignments
    }

    pub fn assignments_mut(&mut self) -> &mut AssignmentTable {
        &mut self.assignments
    }

    pub fn set_cell_size(&mut self, cell_size: f32) {
        self.cell_size = cell_size;
    }

    /// Set the bitmap used for surfaces of `kind` that have no asset texture.
    pub fn set_legacy(&mut self, kind: SurfaceKind, image: Option<Arc<RgbaImage>>) {
        match kind {
            SurfaceKind::Wall => self.legacy_wall = image,
            SurfaceKind::Room => self.legacy_room = image,
        }
    }

    pub fn has_legacy(&self, kind: SurfaceKind) -> bool {
        match kind {
            SurfaceKind::Wall => self.legacy_wall.is_some(),
            SurfaceKind::Room => self.legacy_room.is_some(),
        }
    }

    /// Crop the `WallTexture` and `RoomTexture` regions out of the floor
    /// bitmap. Regions that are missing or fall outside the bitmap are cleared.
    pub fn load_legacy_regions(&mut self, floorplan: &Floorplan) {
        for (kind, name) in [
            (SurfaceKind::Wall, WALL_TEXTURE_REGION),
            (SurfaceKind::Room, ROOM_TEXTURE_REGION),
        ] {
            let cropped = match (floorplan.bitmap(), floorplan.named(name)) {
                (Some(bitmap), Some(region)) => crop_region(bitmap, &region.bounds).map(Arc::new),
                _ => None,
            };
            if cropped.is_some() {
                tracing::debug!("[MaterialBinder] loaded legacy {} region", name);
            }
            self.set_legacy(kind, cropped);
        }
    }

    /// Start resolving the material for `surface` extruded to `height`.
    pub fn bind(&self, surface: &Surface, height: f32, assets: &dyn AssetSource) -> MaterialBinding {
        let mut queue = VecDeque::new();

        if let Some(assignment) = self.assignments.get(&surface.id) {
            let category = TextureCategory::for_surface(surface.kind);
            match assets.get_texture(&assignment.texture_id, category) {
                Some(asset) => queue.push_back(Candidate::Assigned(asset)),
                None => tracing::warn!(
                    "[MaterialBinder] {} is assigned missing texture {}",
                    surface.id,
                    assignment.texture_id
                ),
            }
        }
        if let Some(asset) = assets.default_texture(surface.kind) {
            queue.push_back(Candidate::Default(asset));
        }
        let legacy = match surface.kind {
            SurfaceKind::Wall => self.legacy_wall.as_ref(),
            SurfaceKind::Room => self.legacy_room.as_ref(),
        };
        if let Some(image) = legacy {
            queue.push_back(Candidate::Legacy(Arc::clone(image)));
        }

        let repeat = TileRepeat::for_extrusion(&surface.bounds, height, self.cell_size).or_one(!queue.is_empty());
        let active = queue.pop_front().map(Candidate::open);
        MaterialBinding {
            surface_id: surface.id.clone(),
            fallback: flat_fallback(surface.kind),
            repeat,
            queue,
            active,
        }
    }
}
