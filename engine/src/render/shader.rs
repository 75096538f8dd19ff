//! Scene shader and its uniform layouts.
//!
//! One lit, textured pipeline covers every node. Untextured materials bind
//! a 1x1 white texture so the fragment stage always samples.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use super::context::{FrameView, Lighting};
use crate::material::Material;

/// Per-frame data, bind group 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlobalUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub fog_near: f32,
    pub fog_color: [f32; 3],
    pub fog_far: f32,
    /// Ambient colour premultiplied by intensity
    pub ambient: [f32; 3],
    /// 1.0 when fog is on
    pub fog_enabled: f32,
    pub sun_dir: [f32; 3],
    pub _pad0: f32,
    /// Sun colour premultiplied by intensity
    pub sun_color: [f32; 3],
    pub _pad1: f32,
}

static_assertions::assert_eq_size!(GlobalUniforms, [u8; 144]);

impl GlobalUniforms {
    pub fn from_frame(frame: &FrameView<'_>) -> Self {
        let Lighting {
            ambient_color,
            ambient_intensity,
            sun_color,
            sun_intensity,
            ..
        } = frame.lighting;
        let (fog_color, fog_near, fog_far, fog_enabled) = match frame.fog {
            Some(fog) => (fog.color, fog.near, fog.far, 1.0),
            None => ([0.0; 3], 0.0, 1.0, 0.0),
        };
        Self {
            view_proj: (frame.camera.projection * frame.camera.view).to_cols_array_2d(),
            camera_pos: frame.camera.position.to_array(),
            fog_near,
            fog_color,
            fog_far,
            ambient: (Vec3::from(ambient_color) * ambient_intensity).to_array(),
            fog_enabled,
            sun_dir: frame.lighting.sun_direction().to_array(),
            _pad0: 0.0,
            sun_color: (Vec3::from(sun_color) * sun_intensity).to_array(),
            _pad1: 0.0,
        }
    }
}

/// Per-node data, bind group 1 binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    /// rgb + opacity
    pub color: [f32; 4],
    /// roughness, metalness, unlit, unused
    pub params: [f32; 4],
}

static_assertions::assert_eq_size!(ObjectUniforms, [u8; 96]);

impl ObjectUniforms {
    pub fn new(model: Mat4, material: &Material) -> Self {
        let [r, g, b] = material.color;
        Self {
            model: model.to_cols_array_2d(),
            color: [r, g, b, material.opacity],
            params: [
                material.roughness,
                material.metalness,
                if material.unlit { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }
}

pub const SCENE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec3<f32>,
    fog_near: f32,
    fog_color: vec3<f32>,
    fog_far: f32,
    ambient: vec3<f32>,
    fog_enabled: f32,
    sun_dir: vec3<f32>,
    _pad0: f32,
    sun_color: vec3<f32>,
    _pad1: f32,
};

struct Object {
    model: mat4x4<f32>,
    color: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> globals: Globals;
@group(1) @binding(0) var<uniform> object: Object;
@group(1) @binding(1) var base_texture: texture_2d<f32>;
@group(1) @binding(2) var base_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = object.model * vec4<f32>(in.position, 1.0);
    out.clip_position = globals.view_proj * world;
    out.world_pos = world.xyz;
    out.normal = (object.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    let base = object.color * textureSample(base_texture, base_sampler, in.uv);
    if (base.a < 0.01) {
        discard;
    }

    var color = base.rgb;
    if (object.params.z < 0.5) {
        var n = normalize(in.normal);
        if (!front) {
            n = -n;
        }
        let roughness = object.params.x;
        let metalness = object.params.y;
        let light_dir = -globals.sun_dir;
        let view_dir = normalize(globals.camera_pos - in.world_pos);
        let half_dir = normalize(light_dir + view_dir);

        let diffuse = max(dot(n, light_dir), 0.0);
        let shininess = mix(64.0, 4.0, roughness);
        let specular = pow(max(dot(n, half_dir), 0.0), shininess)
            * (1.0 - roughness) * mix(0.04, 1.0, metalness);

        color = base.rgb * (globals.ambient + globals.sun_color * diffuse * (1.0 - 0.5 * metalness))
            + globals.sun_color * specular;
    }

    if (globals.fog_enabled > 0.5) {
        let dist = length(globals.camera_pos - in.world_pos);
        let span = max(globals.fog_far - globals.fog_near, 0.0001);
        let fog = clamp((dist - globals.fog_near) / span, 0.0, 1.0);
        color = mix(color, globals.fog_color, fog);
    }

    return vec4<f32>(color, base.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_uniforms_pack_material() {
        let material = Material::collision_proxy();
        let uniforms = ObjectUniforms::new(Mat4::IDENTITY, &material);
        assert_eq!(uniforms.color[0], 1.0);
        assert!((uniforms.color[3] - 0.2).abs() < 1e-6);
        assert_eq!(uniforms.params[2], 1.0);

        let frame = ObjectUniforms::new(Mat4::IDENTITY, &Material::door_frame());
        assert_eq!(frame.params[2], 0.0);
        assert!((frame.params[1] - 0.3).abs() < 1e-6);
    }
}
