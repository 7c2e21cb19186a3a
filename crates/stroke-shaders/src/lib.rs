//! stroke-shaders: WGSL shader sources for the stroke canvas.

/// Stroke ribbon pipeline: positions in pixel coordinates (y-down), mapped
/// to NDC by a viewport uniform; solid stroke color from a second uniform
/// (premultiplied linear RGBA).
pub const STROKE_WGSL: &str = r#"
struct ViewportUniform {
    scale: vec2<f32>,      // 2/W, -2/H
    translate: vec2<f32>,  // (-1, +1)
};

struct StrokeUniform {
    color: vec4<f32>,      // premultiplied linear
};

@group(0) @binding(0) var<uniform> vp: ViewportUniform;
@group(0) @binding(1) var<uniform> stroke: StrokeUniform;

@vertex
fn vs_main(@location(0) in_pos: vec2<f32>) -> @builtin(position) vec4<f32> {
    let ndc = vec2<f32>(in_pos.x * vp.scale.x + vp.translate.x,
                        in_pos.y * vp.scale.y + vp.translate.y);
    return vec4<f32>(ndc, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return stroke.color;
}
"#;
