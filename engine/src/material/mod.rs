//! Material Module
//!
//! Material descriptors, texture categories, the per-surface assignment
//! table and the binder that resolves which bitmap a surface is drawn with.

pub mod assets;
pub mod assignment;
pub mod binder;
pub mod category;
pub mod descriptor;

pub use assets::{AssetSource, NoAssets, StaticAssets, TextureAsset, TextureSource};
pub use assignment::{Assignment, AssignmentTable};
pub use binder::{MaterialBinder, MaterialBinding, ResolvedTexture};
pub use category::{TextureCategory, flat_fallback, legacy_policy};
pub use descriptor::{Material, Side};
