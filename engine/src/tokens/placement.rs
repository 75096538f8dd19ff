//! Token sizing and placement.

use glam::Vec3;

use crate::config::ViewerConfig;
use crate::floorplan::{Token, TokenKind};
use crate::world::GridConfig;

/// Height of the floor proxy slab
pub const PROXY_THICKNESS: f32 = 0.1;

/// Where and how large token sprites are drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TokenLayout {
    pub grid: GridConfig,
    /// Base float height of a sprite
    pub token_height: f32,
    /// Cell size token art is authored against
    pub reference_cell: f32,
}

impl TokenLayout {
    pub fn new(grid: GridConfig, config: &ViewerConfig) -> Self {
        Self {
            grid,
            token_height: config.token_height,
            reference_cell: config.token_reference_cell,
        }
    }

    /// Sprite edge length: size squares times the cell ratio.
    pub fn scale(&self, token: &Token) -> f32 {
        token.size_category.squares() * (self.grid.cell_size / self.reference_cell)
    }

    /// Sprite centre height.
    ///
    /// Monsters float at `token_height × size`, so larger creatures sit
    /// higher as well as growing wider. Kept as the map editor does it.
    pub fn elevation(&self, token: &Token) -> f32 {
        match token.kind {
            TokenKind::Monster => self.token_height * token.size_category.squares(),
            TokenKind::Other => self.token_height,
        }
    }

    pub fn sprite_position(&self, token: &Token) -> Vec3 {
        self.grid.to_world_at(token.x, token.y, self.elevation(token))
    }

    pub fn proxy_position(&self, token: &Token) -> Vec3 {
        self.grid.to_world_at(token.x, token.y, PROXY_THICKNESS / 2.0)
    }
}

impl Default for TokenLayout {
    fn default() -> Self {
        Self::new(GridConfig::default(), &ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floorplan::SizeCategory;

    fn layout() -> TokenLayout {
        TokenLayout::new(GridConfig::from_pixels(1000.0, 1000.0, 50.0), &ViewerConfig::default())
    }

    #[test]
    fn test_scale_follows_size_and_cell() {
        let layout = layout();
        let medium = Token::monster("m", 0.0, 0.0, SizeCategory::Medium, "");
        let huge = Token::monster("h", 0.0, 0.0, SizeCategory::Huge, "");
        assert_eq!(layout.scale(&medium), 2.0);
        assert_eq!(layout.scale(&huge), 6.0);

        let small_cells = TokenLayout::new(GridConfig::from_pixels(1000.0, 1000.0, 25.0), &ViewerConfig::default());
        assert_eq!(small_cells.scale(&medium), 1.0);
    }

    #[test]
    fn test_monster_elevation_scales_with_size() {
        let layout = layout();
        let large = Token::monster("l", 0.0, 0.0, SizeCategory::Large, "");
        assert_eq!(layout.elevation(&large), 4.0);

        let mut other = large.clone();
        other.kind = TokenKind::Other;
        assert_eq!(layout.elevation(&other), 2.0);
    }

    #[test]
    fn test_positions_share_ground_point() {
        let layout = layout();
        let token = Token::monster("m", 750.0, 250.0, SizeCategory::Medium, "");
        let sprite = layout.sprite_position(&token);
        let proxy = layout.proxy_position(&token);
        assert_eq!((sprite.x, sprite.z), (5.0, -5.0));
        assert_eq!((proxy.x, proxy.z), (5.0, -5.0));
        assert!((proxy.y - 0.05).abs() < 1e-6);
    }
}
