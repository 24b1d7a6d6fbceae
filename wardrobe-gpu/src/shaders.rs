//! WGSL sources for the stage renderer

/// Lit pass for stage geometry and garments.
///
/// Group 0 holds frame data, group 1 the material, group 2 the per-draw
/// transform.
pub const MESH_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
};

struct Lights {
    ambient: vec4<f32>,
    directional_position: vec4<f32>,
    directional_color: vec4<f32>,
};

struct MaterialParams {
    base_color: vec4<f32>,
    // metalness, roughness, has_map, unused
    params: vec4<f32>,
};

struct Model {
    transform: mat4x4<f32>,
    outline: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(0) @binding(1) var<uniform> lights: Lights;
@group(1) @binding(0) var<uniform> material: MaterialParams;
@group(1) @binding(1) var base_map: texture_2d<f32>;
@group(1) @binding(2) var base_sampler: sampler;
@group(2) @binding(0) var<uniform> model: Model;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = model.transform * vec4<f32>(in.position, 1.0);
    out.clip_position = camera.view_proj * world;
    out.world_position = world.xyz;
    out.world_normal = normalize((model.transform * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var albedo = material.base_color.rgb;
    if (material.params.z > 0.5) {
        albedo = albedo * textureSample(base_map, base_sampler, in.uv).rgb;
    }

    var n = normalize(in.world_normal);
    if (!front) {
        n = -n;
    }
    let l = normalize(lights.directional_position.xyz - in.world_position);
    let v = normalize(camera.eye.xyz - in.world_position);
    let h = normalize(l + v);

    let roughness = clamp(material.params.y, 0.04, 1.0);
    let shininess = 2.0 / (roughness * roughness) - 2.0;
    let diffuse = max(dot(n, l), 0.0);
    let specular = pow(max(dot(n, h), 0.0), max(shininess, 1.0)) * (1.0 - roughness);
    let metal = material.params.x;

    let ambient = lights.ambient.rgb * lights.ambient.w * albedo;
    let direct = lights.directional_color.rgb * lights.directional_color.w
        * (albedo * diffuse * (1.0 - metal) + mix(vec3<f32>(0.04), albedo, metal) * specular);

    // Intensities follow the physical-light convention, so tone map
    let color = ambient / 3.14159 + direct / 3.14159;
    let mapped = color / (color + vec3<f32>(1.0));
    return vec4<f32>(mapped, 1.0);
}
"#;

/// Inverted-hull selection outline: back faces extruded along their normals.
///
/// Group 0 is shared with [`MESH_SHADER`]; the per-draw transform sits in
/// group 1 here.
pub const OUTLINE_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
};

struct Model {
    transform: mat4x4<f32>,
    outline: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var<uniform> model: Model;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_outline(in: VertexInput) -> @builtin(position) vec4<f32> {
    let world = model.transform * vec4<f32>(in.position, 1.0);
    let normal = normalize((model.transform * vec4<f32>(in.normal, 0.0)).xyz);
    let extruded = world.xyz + normal * model.outline.w;
    return camera.view_proj * vec4<f32>(extruded, 1.0);
}

@fragment
fn fs_outline() -> @location(0) vec4<f32> {
    return vec4<f32>(model.outline.rgb, 1.0);
}
"#;
