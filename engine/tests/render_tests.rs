//! Render Tests - Shader Validation and Uniform Serialization
//!
//! Validates the scene WGSL with naga and checks that the uniform structs
//! pack frames and materials the way the shader reads them.

use glam::{Mat4, Vec3};
use image::RgbaImage;

use map_walker_engine::config::ViewerConfig;
use map_walker_engine::material::Material;
use map_walker_engine::mesh::box_mesh;
use map_walker_engine::render::{
    CameraView, Fog, FrameView, GlobalUniforms, HeadlessRenderer, Lighting, ObjectUniforms,
    RenderContext, SCENE_SHADER,
};
use map_walker_engine::scene::SceneGraph;
use map_walker_engine::SceneError;

fn frame_view<'a>(graph: &'a SceneGraph, fog: Option<Fog>) -> FrameView<'a> {
    FrameView {
        graph,
        camera: CameraView {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            position: Vec3::new(1.0, 1.7, -3.0),
        },
        lighting: Lighting::from_config(&ViewerConfig::default()),
        fog,
        clear_color: [0.0; 3],
        wireframe: false,
    }
}

// ============================================================================
// Shader
// ============================================================================

#[test]
fn test_scene_shader_validates() {
    let module = naga::front::wgsl::parse_str(SCENE_SHADER).expect("WGSL should parse");
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).expect("WGSL should validate");

    let entry_points: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    assert!(entry_points.contains(&"vs_main"));
    assert!(entry_points.contains(&"fs_main"));
}

// ============================================================================
// Uniforms
// ============================================================================

#[test]
fn test_uniform_sizes() {
    // WGSL uniform structs round to 16 bytes
    assert_eq!(std::mem::size_of::<GlobalUniforms>(), 144);
    assert_eq!(std::mem::size_of::<ObjectUniforms>(), 96);
    assert_eq!(std::mem::size_of::<GlobalUniforms>() % 16, 0);
}

#[test]
fn test_global_uniforms_without_fog() {
    let graph = SceneGraph::new();
    let uniforms = GlobalUniforms::from_frame(&frame_view(&graph, None));

    assert_eq!(uniforms.fog_enabled, 0.0);
    assert_eq!(uniforms.camera_pos, [1.0, 1.7, -3.0]);
    let ambient = 0x40 as f32 / 255.0 * 0.5;
    for channel in uniforms.ambient {
        assert!((channel - ambient).abs() < 1e-6);
    }
    // Sun at (5, 10, 5) shines down towards the origin
    let dir = Vec3::from(uniforms.sun_dir);
    assert!((dir.length() - 1.0).abs() < 1e-5);
    assert!(dir.y < 0.0);
}

#[test]
fn test_global_uniforms_with_fog() {
    let graph = SceneGraph::new();
    let fog = Fog::new(0xff0000, 2.0, 30.0);
    let uniforms = GlobalUniforms::from_frame(&frame_view(&graph, Some(fog)));

    assert_eq!(uniforms.fog_enabled, 1.0);
    assert_eq!(uniforms.fog_color, [1.0, 0.0, 0.0]);
    assert_eq!(uniforms.fog_near, 2.0);
    assert_eq!(uniforms.fog_far, 30.0);
}

#[test]
fn test_object_uniforms_bytes() {
    let material = Material::flat(0x808080);
    let model = Mat4::from_translation(Vec3::new(4.0, 0.0, -2.0));
    let uniforms = ObjectUniforms::new(model, &material);

    let bytes: &[u8] = bytemuck::bytes_of(&uniforms);
    assert_eq!(bytes.len(), 96);
    assert_eq!(uniforms.model[3], [4.0, 0.0, -2.0, 1.0]);
    assert_eq!(uniforms.color[3], material.opacity);
    assert_eq!(uniforms.params[2], 0.0);
}

#[test]
fn test_sprites_are_unlit() {
    let uniforms = ObjectUniforms::new(Mat4::IDENTITY, &Material::sprite());
    assert_eq!(uniforms.params[2], 1.0);
}

// ============================================================================
// Headless renderer
// ============================================================================

#[test]
fn test_headless_records_frames() {
    let mut renderer = HeadlessRenderer::new(640, 480);
    let graph = SceneGraph::new();

    renderer.render(&frame_view(&graph, None)).unwrap();
    renderer.render(&frame_view(&graph, Some(Fog::new(0, 1.0, 10.0)))).unwrap();

    let frames = renderer.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].draws, 0);
    assert!(!frames[0].fogged);
    assert!(frames[1].fogged);
}

#[test]
fn test_headless_refuses_frames_after_dispose() {
    let mut renderer = HeadlessRenderer::new(640, 480);
    renderer.upload_mesh(&box_mesh(Vec3::ZERO, Vec3::ONE));
    renderer.upload_texture(&RgbaImage::new(2, 2));
    renderer.dispose();

    assert_eq!(renderer.live_meshes(), 0);
    assert_eq!(renderer.live_textures(), 0);
    assert_eq!(renderer.released_meshes(), 1);
    assert_eq!(renderer.released_textures(), 1);

    let graph = SceneGraph::new();
    assert!(matches!(
        renderer.render(&frame_view(&graph, None)),
        Err(SceneError::NotInitialized)
    ));
}
