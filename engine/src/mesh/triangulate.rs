//! Planar polygon triangulation for extrusion caps.

use glam::Vec2;

/// Twice the signed area of a closed polygon (shoelace). Positive when the
/// points run counter-clockwise in a y-up plane.
pub fn signed_area2(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum()
}

/// Ear-clip a simple polygon (no holes) into index triples.
///
/// Returns `None` for fewer than three points or when the triangulator
/// rejects the outline.
pub fn triangulate(points: &[Vec2]) -> Option<Vec<[usize; 3]>> {
    if points.len() < 3 {
        return None;
    }
    let flat: Vec<f64> = points
        .iter()
        .flat_map(|p| [p.x as f64, p.y as f64])
        .collect();
    let Ok(indices) = earcutr::earcut(&flat, &[], 2) else {
        tracing::debug!("[Triangulate] earcut rejected a {}-point outline", points.len());
        return None;
    };
    let triangles: Vec<[usize; 3]> = indices
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect();
    if triangles.is_empty() { None } else { Some(triangles) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_signed_area_orientation() {
        let mut points = square();
        assert_eq!(signed_area2(&points), 2.0);
        points.reverse();
        assert_eq!(signed_area2(&points), -2.0);
    }

    #[test]
    fn test_triangulate_square() {
        let triangles = triangulate(&square()).unwrap();
        assert_eq!(triangles.len(), 2);
    }

    #[test]
    fn test_triangulate_concave_l_shape() {
        let l_shape = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let triangles = triangulate(&l_shape).unwrap();
        assert_eq!(triangles.len(), 4);
    }

    #[test]
    fn test_too_few_points() {
        assert!(triangulate(&[Vec2::ZERO, Vec2::X]).is_none());
        assert_eq!(signed_area2(&[Vec2::ZERO, Vec2::X]), 0.0);
    }
}
