/// WGSL for the `basic_mesh` pipeline: flat color, MVP-only uniform.
pub const BASIC_MESH_SHADER: &str = r#"
struct Uniforms {
    mvp: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local_pos: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.mvp * vec4<f32>(position, 1.0);
    out.local_pos = position;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let shade = 0.75 + 0.25 * clamp(in.local_pos.y, -1.0, 1.0);
    return vec4<f32>(vec3<f32>(0.2, 0.6, 1.0) * shade, 1.0);
}
"#;

/// WGSL for the `tinted_mesh` pipeline: MVP followed by an RGBA tint.
pub const TINTED_MESH_SHADER: &str = r#"
struct Uniforms {
    mvp: mat4x4<f32>,
    tint: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local_pos: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.mvp * vec4<f32>(position, 1.0);
    out.local_pos = position;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let shade = 0.75 + 0.25 * clamp(in.local_pos.y, -1.0, 1.0);
    return vec4<f32>(uniforms.tint.rgb * shade, uniforms.tint.a);
}
"#;
