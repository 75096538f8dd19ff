//! Scene Tests - Building, Driving and Tearing Down a Walkthrough Scene
//!
//! Runs the scene driver end to end against the headless renderer.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec3;
use image::{Rgba, RgbaImage};

use map_walker_engine::config::ViewerConfig;
use map_walker_engine::floorplan::{
    Bounds, DoorMarker, EncounterMarker, Floorplan, Marker, MonsterRecord, PixelPoint, Shape,
    SizeCategory, Surface, SurfaceKind, Token,
};
use map_walker_engine::material::NoAssets;
use map_walker_engine::render::HeadlessRenderer;
use map_walker_engine::scene::{FrameStatus, NodeKind, SceneDriver};
use map_walker_engine::SceneError;

type SharedRenderer = Rc<RefCell<HeadlessRenderer>>;

fn driver() -> (SceneDriver, SharedRenderer) {
    let renderer = Rc::new(RefCell::new(HeadlessRenderer::new(1280, 720)));
    let driver = SceneDriver::new(
        ViewerConfig::default(),
        Box::new(Rc::clone(&renderer)),
        Box::new(NoAssets),
    );
    (driver, renderer)
}

fn goblin(x: f32, y: f32) -> Marker {
    let mut monster = MonsterRecord::default();
    monster.name = Some("Goblin".into());
    monster.basic.size = Some("medium".into());
    Marker::Encounter(EncounterMarker {
        id: "e1".into(),
        x,
        y,
        monster: Some(monster),
    })
}

fn door(id: &str, x: f32, y: f32, wall: Option<&str>) -> Marker {
    Marker::Door(DoorMarker {
        id: id.into(),
        position: PixelPoint::new(x, y),
        parent_wall_id: wall.map(String::from),
        texture_ref: None,
    })
}

/// One 1000x1000 room, one wall with a door, one medium goblin at the centre.
fn dungeon() -> Floorplan {
    let floor = Arc::new(RgbaImage::from_pixel(1000, 1000, Rgba([90, 90, 90, 255])));
    Floorplan::new(1000.0, 1000.0, 50.0)
        .with_bitmap(floor)
        .with_surface(Surface::new(
            "room",
            SurfaceKind::Room,
            Shape::Box,
            Bounds::new(0.0, 0.0, 1000.0, 1000.0),
        ))
        .with_surface(Surface::new(
            "wall",
            SurfaceKind::Wall,
            Shape::Box,
            Bounds::new(200.0, 300.0, 500.0, 50.0),
        ))
        .with_marker(door("door", 450.0, 325.0, Some("wall")))
        .with_marker(goblin(500.0, 500.0))
}

// ============================================================================
// Scene construction
// ============================================================================

#[test]
fn test_end_to_end_node_counts() {
    let (mut driver, _) = driver();
    driver.initialize_map(dungeon()).unwrap();

    let graph = driver.graph().unwrap();
    assert_eq!(graph.count(NodeKind::Floor), 1);
    assert_eq!(graph.count(NodeKind::Room), 1);
    assert_eq!(graph.count(NodeKind::Wall), 1);
    assert_eq!(graph.count(NodeKind::DoorFrame), 1);
    assert_eq!(graph.count(NodeKind::TokenSprite), 1);
    assert_eq!(graph.count(NodeKind::TokenProxy), 1);
    assert_eq!(graph.count(NodeKind::DoorPanel), 0);
    assert_eq!(graph.len(), 6);
}

#[test]
fn test_wall_mesh_is_cut() {
    let (mut driver, renderer) = driver();
    driver.initialize_map(dungeon()).unwrap();

    let graph = driver.graph().unwrap();
    let wall = graph.find(NodeKind::Wall, "wall").unwrap();
    let node = graph.get(wall).unwrap();
    // An uncut box has 24 vertices
    assert!(node.vertex_count > 24);
    assert_eq!(renderer.borrow().mesh_vertex_count(node.mesh), Some(node.vertex_count));
}

#[test]
fn test_token_sprite_sits_at_map_centre() {
    let (mut driver, _) = driver();
    driver.initialize_map(dungeon()).unwrap();

    let graph = driver.graph().unwrap();
    let sprite = graph.find(NodeKind::TokenSprite, "e1").unwrap();
    let node = graph.get(sprite).unwrap();
    assert_eq!(node.transform.translation, Vec3::new(0.0, 2.0, 0.0));
    assert!(node.billboard);
}

#[test]
fn test_orphan_doors_are_skipped() {
    let (mut driver, _) = driver();
    let plan = dungeon()
        .with_marker(door("lost", 100.0, 100.0, None))
        .with_marker(door("ghost", 100.0, 100.0, Some("missing")))
        .with_marker(door("on-room", 100.0, 100.0, Some("room")));
    driver.initialize_map(plan).unwrap();

    let graph = driver.graph().unwrap();
    assert_eq!(graph.count(NodeKind::Wall), 1);
    assert_eq!(graph.count(NodeKind::DoorFrame), 1);
}

#[test]
fn test_degenerate_polygon_is_skipped() {
    let (mut driver, _) = driver();
    let plan = dungeon().with_surface(Surface::new(
        "sliver",
        SurfaceKind::Room,
        Shape::Polygon(vec![PixelPoint::new(0.0, 0.0), PixelPoint::new(50.0, 0.0)]),
        Bounds::new(0.0, 0.0, 50.0, 50.0),
    ));
    driver.initialize_map(plan).unwrap();
    assert!(driver.graph().unwrap().find(NodeKind::Room, "sliver").is_none());
}

#[test]
fn test_floor_bitmap_binds_on_first_frame() {
    let (mut driver, renderer) = driver();
    driver.initialize_map(dungeon()).unwrap();

    let floor = driver.graph().unwrap().find(NodeKind::Floor, "floor").unwrap();
    assert!(!driver.graph().unwrap().get(floor).unwrap().material.is_textured());

    assert_eq!(driver.frame().unwrap(), FrameStatus::Continue);
    let node = driver.graph().unwrap().get(floor).unwrap();
    let texture = node.texture().unwrap();
    assert_eq!(renderer.borrow().texture_size(texture), Some((1000, 1000)));
}

#[test]
fn test_legacy_wall_region_textures_walls() {
    let (mut driver, _) = driver();
    let plan = dungeon().with_surface(
        Surface::new(
            "swatch",
            SurfaceKind::Room,
            Shape::Box,
            Bounds::new(900.0, 900.0, 50.0, 50.0),
        )
        .with_name("WallTexture"),
    );
    driver.initialize_map(plan).unwrap();
    driver.frame().unwrap();

    let graph = driver.graph().unwrap();
    assert!(graph.find(NodeKind::Room, "swatch").is_none());
    let wall = graph.find(NodeKind::Wall, "wall").unwrap();
    assert!(graph.get(wall).unwrap().material.is_textured());
    let room = graph.find(NodeKind::Room, "room").unwrap();
    assert!(!graph.get(room).unwrap().material.is_textured());
}

// ============================================================================
// Token operations
// ============================================================================

#[test]
fn test_remove_token_twice_is_noop() {
    let (mut driver, _) = driver();
    driver.initialize_map(dungeon()).unwrap();

    assert!(driver.remove_token("e1"));
    assert!(!driver.remove_token("e1"));
    let graph = driver.graph().unwrap();
    assert_eq!(graph.count(NodeKind::TokenSprite), 0);
    // The floor proxy lives until the scene is cleared
    assert_eq!(graph.count(NodeKind::TokenProxy), 1);
}

#[test]
fn test_update_token_position_moves_ground_only() {
    let (mut driver, _) = driver();
    driver.initialize_map(dungeon()).unwrap();
    let id = driver
        .create_token(Token::monster("ogre", 100.0, 100.0, SizeCategory::Large, ""))
        .unwrap();

    assert!(driver.update_token_position("ogre", 900.0, 100.0));
    let node = driver.graph().unwrap().get(id).unwrap();
    assert_eq!(node.transform.translation, Vec3::new(8.0, 4.0, -8.0));
    // Floor proxies stay where the tokens were created
    let graph = driver.graph().unwrap();
    assert!(graph
        .of_kind(NodeKind::TokenProxy)
        .all(|(_, proxy)| proxy.transform.translation.x != 8.0));
    assert!(!driver.update_token_position("nobody", 0.0, 0.0));
}

// ============================================================================
// Frame loop and teardown
// ============================================================================

#[test]
fn test_frames_draw_visible_nodes() {
    let (mut driver, renderer) = driver();
    driver.initialize_map(dungeon()).unwrap();
    driver.set_fog(0x000000, 1.0, 50.0).unwrap();
    driver.frame().unwrap();

    let renderer = renderer.borrow();
    let frame = renderer.frames().last().unwrap();
    // The collision proxy is hidden
    assert_eq!(frame.draws, 5);
    assert_eq!(frame.billboards, 1);
    assert!(frame.fogged);
}

#[test]
fn test_cleanup_is_idempotent() {
    let (mut driver, renderer) = driver();
    driver.initialize_map(dungeon()).unwrap();
    driver.frame().unwrap();

    driver.cleanup();
    driver.cleanup();

    assert!(!driver.is_active());
    assert!(driver.graph().is_none());
    assert_eq!(driver.frame().unwrap(), FrameStatus::Stopped);
    let renderer = renderer.borrow();
    assert!(renderer.is_disposed());
    assert_eq!(renderer.live_meshes(), 0);
    assert_eq!(renderer.live_textures(), 0);
}

#[test]
fn test_operations_after_cleanup() {
    let (mut driver, _) = driver();
    driver.initialize_map(dungeon()).unwrap();
    driver.cleanup();

    assert!(!driver.remove_token("e1"));
    assert!(matches!(driver.reset_view(), Err(SceneError::NotInitialized)));
    assert!(matches!(driver.initialize_map(dungeon()), Err(SceneError::NotInitialized)));
}

// ============================================================================
// Saved scenes
// ============================================================================

const SAVED_SCENE: &str = r#"{
    "gridSettings": { "width": 20, "height": 20 },
    "rooms": [
        { "id": 1, "type": "room", "shape": "rectangle",
          "bounds": { "x": 0, "y": 0, "width": 1000, "height": 1000 } },
        { "id": 2, "type": "wall", "shape": "rectangle",
          "bounds": { "x": 200, "y": 300, "width": 500, "height": 50 } }
    ],
    "playerStart": { "x": 250, "y": 750 },
    "markers": [
        { "id": 3, "type": "door", "x": 450, "y": 325,
          "data": { "door": { "position": { "x": 450, "y": 325 } }, "parentWall": { "id": 2 } } },
        { "id": 4, "type": "encounter", "x": 500, "y": 500,
          "data": { "monster": { "name": "Goblin", "basic": { "size": "Medium" }, "token": { "data": "" } } } }
    ]
}"#;

#[test]
fn test_load_from_json_builds_scene() {
    let (mut driver, _) = driver();
    driver.load_from_json(SAVED_SCENE).unwrap();

    let graph = driver.graph().unwrap();
    assert_eq!(graph.count(NodeKind::Room), 1);
    assert_eq!(graph.count(NodeKind::Wall), 1);
    assert_eq!(graph.count(NodeKind::DoorFrame), 1);
    assert_eq!(graph.count(NodeKind::TokenSprite), 1);
    assert_eq!(graph.count(NodeKind::TokenProxy), 1);

    let camera = &driver.navigation().unwrap().camera;
    assert_eq!(camera.position, Vec3::new(-5.0, 1.7, 5.0));
}

#[test]
fn test_load_from_json_rejects_garbage() {
    let (mut driver, _) = driver();
    assert!(matches!(driver.load_from_json("{ rooms: "), Err(SceneError::Json(_))));
    assert!(!driver.is_active());
}
