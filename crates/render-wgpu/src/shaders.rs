/// WGSL shader for unlit textured quads.
pub const QUAD_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    time: vec4<f32>,
};

struct Object {
    model: mat4x4<f32>,
    // width, height, repeat u, repeat v
    size_repeat: vec4<f32>,
    // x: 1.0 when only the front face is visible
    flags: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0)
var<uniform> object: Object;
@group(1) @binding(1)
var tex: texture_2d<f32>;
@group(1) @binding(2)
var tex_sampler: sampler;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_quad(vertex: VertexInput) -> VertexOutput {
    let local = vec4<f32>(vertex.position * object.size_repeat.xy, 0.0, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * object.model * local;
    out.uv = vertex.uv * object.size_repeat.zw;
    return out;
}

@fragment
fn fs_quad(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    if (object.flags.x > 0.5 && !front) {
        discard;
    }
    return textureSample(tex, tex_sampler, in.uv);
}
"#;

/// WGSL shader for the water surface: a tinted, translucent plane with
/// ripples drifting along the flow direction.
pub const WATER_SHADER: &str = r#"
struct Frame {
    view_proj: mat4x4<f32>,
    time: vec4<f32>,
};

struct Water {
    model: mat4x4<f32>,
    // width, height, ripple scale, unused
    size_scale: vec4<f32>,
    color: vec4<f32>,
    // flow direction xy
    flow: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: Frame;

@group(1) @binding(0)
var<uniform> water: Water;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_water(vertex: VertexInput) -> VertexOutput {
    let local = vec4<f32>(vertex.position * water.size_scale.xy, 0.0, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * water.model * local;
    out.uv = vertex.uv;
    return out;
}

fn ripple(p: vec2<f32>) -> f32 {
    return sin(p.x * 6.2831) * cos(p.y * 6.2831 * 0.7) + sin((p.x + p.y) * 9.1) * 0.5;
}

@fragment
fn fs_water(in: VertexOutput) -> @location(0) vec4<f32> {
    let t = frame.time.x;
    let scale = water.size_scale.z;
    let p1 = in.uv * scale + water.flow.xy * t * 0.25;
    let p2 = in.uv * scale * 1.7 - water.flow.yx * t * 0.15;
    let r = (ripple(p1) + ripple(p2)) * 0.25;
    let highlight = smoothstep(0.35, 0.75, r) * 0.35;
    let rgb = water.color.rgb * (0.85 + r * 0.15) + vec3<f32>(highlight);
    return vec4<f32>(rgb, 0.8);
}
"#;
