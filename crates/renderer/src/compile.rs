use std::borrow::Cow;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use wgpu::naga::ShaderStage;

/// Uniform names whose declarations are stripped from user sources because the
/// injected header provides them through the `QuadParams` block.
const INJECTED_UNIFORMS: [&str; 5] = [
    "iResolution",
    "iTimeDelta",
    "iTime",
    "iFrame",
    "iFrameRate",
];

/// Reads a shader stage source file fully into memory.
pub(crate) fn load_shader_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shader source at {}", path.display()))
}

/// Compiles one wrapped GLSL stage through wgpu's naga frontend.
///
/// The compile runs inside a validation error scope so that frontend
/// diagnostics are captured and surfaced in the returned error instead of
/// being routed to the device's uncaptured-error handler. A broken shader
/// must fail here, before any pipeline exists.
pub(crate) fn compile_stage(
    device: &wgpu::Device,
    source: &str,
    stage: ShaderStage,
    path: &Path,
) -> Result<wgpu::ShaderModule> {
    let label = match stage {
        ShaderStage::Vertex => "quad vertex stage",
        ShaderStage::Fragment => "quad fragment stage",
        _ => "quad shader stage",
    };
    let wrapped = wrap_stage_source(source);

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(wrapped),
            stage,
            defines: &[],
        },
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!(
            "failed to compile {label} from {}: {err}",
            path.display()
        ));
    }
    Ok(module)
}

/// Produces a self-contained Vulkan-GLSL stage from a GL-style source file.
///
/// Steps performed:
///
/// 1. Strip the `#version` directive and declarations of the uniforms the
///    header injects, so sources written against a plain GL context compile
///    unchanged.
/// 2. Rewrite every other default-block uniform into a zeroed constant of its
///    declared type. The driver never sets those names, so under GL they read
///    as all-zero; the constant preserves that while keeping the frontend
///    happy (loose uniforms are not valid Vulkan GLSL).
/// 3. Pin explicit locations onto unqualified `in`/`out` declarations, which
///    Vulkan GLSL requires and GL 3.3 sources usually omit.
/// 4. Prepend [`HEADER`], which declares the std140 uniform block plus macro
///    aliases for the public uniform names.
fn wrap_stage_source(source: &str) -> String {
    let mut sanitized = String::new();
    let mut skipped_version = false;
    let mut next_input_location = 0u32;
    let mut next_output_location = 0u32;

    for line in source.lines() {
        let trimmed = line.trim_start();
        if !skipped_version && trimmed.starts_with("#version") {
            skipped_version = true;
            continue;
        }
        if let Some(decl) = parse_loose_uniform(trimmed) {
            if INJECTED_UNIFORMS.iter().any(|name| *name == decl.name) {
                continue;
            }
            let indent = &line[..line.len() - trimmed.len()];
            sanitized.push_str(&format!(
                "{indent}const {ty} {name} = {ty}(0);\n",
                ty = decl.ty,
                name = decl.name
            ));
            continue;
        }
        if let Some(rewritten) =
            pin_io_location(line, &mut next_input_location, &mut next_output_location)
        {
            sanitized.push_str(&rewritten);
        } else {
            sanitized.push_str(line);
        }
        sanitized.push('\n');
    }

    format!("{HEADER}\n#line 1\n{sanitized}")
}

struct LooseUniform<'a> {
    ty: &'a str,
    name: &'a str,
}

/// Recognises a default-block uniform declaration: `uniform TYPE NAME;`,
/// tolerating precision qualifiers and a trailing comment. The declared
/// identifier is compared exactly against the injected set, so a user name
/// that merely embeds an injected name (`iTimeScale`) is never confused with
/// it. Arrays and initialised declarations are left unrecognised and pass
/// through untouched.
fn parse_loose_uniform(trimmed: &str) -> Option<LooseUniform<'_>> {
    let rest = trimmed.strip_prefix("uniform ")?;
    let body = rest[..rest.find(';')?].trim();
    let mut tokens = body
        .split_whitespace()
        .filter(|token| !matches!(*token, "lowp" | "mediump" | "highp"));
    let ty = tokens.next()?;
    let name = tokens.next()?;
    if tokens.next().is_some() || ty.contains('[') || name.contains('[') {
        return None;
    }
    Some(LooseUniform { ty, name })
}

/// Assigns sequential locations to bare `in`/`out` declarations.
///
/// Declarations that already carry a `layout(...)` qualifier are left alone.
/// Locations are handed out in declaration order per direction, which matches
/// how the quad's single position attribute is bound by the pipeline.
fn pin_io_location(line: &str, next_input: &mut u32, next_output: &mut u32) -> Option<String> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("layout") {
        return None;
    }

    let counter = if trimmed.starts_with("in ") {
        next_input
    } else if trimmed.starts_with("out ") {
        next_output
    } else {
        return None;
    };

    // Declarations only; a trailing comment after the semicolon is fine, but
    // `in`/`out` parameters inside function signatures carry no semicolon.
    if !trimmed.contains(';') {
        return None;
    }

    let indent_len = line.len() - trimmed.len();
    let location = *counter;
    *counter += 1;
    Some(format!(
        "{}layout(location = {location}) {trimmed}",
        &line[..indent_len]
    ))
}

/// GLSL prologue injected ahead of both user stages.
///
/// The block layout must match `QuadUniforms` in `gpu/uniforms.rs`. Member
/// names are prefixed so they cannot clash with user identifiers; the macro
/// aliases expose the public names.
const HEADER: &str = r"#version 450

layout(std140, set = 0, binding = 0) uniform QuadParams {
    vec3 _iResolution;
    float _iTime;
    float _iTimeDelta;
    int _iFrame;
    uint _iFrameRate;
    float _padding0;
} ubo;

#define iResolution ubo._iResolution
#define iTime ubo._iTime
#define iTimeDelta ubo._iTimeDelta
#define iFrame ubo._iFrame
#define iFrameRate ubo._iFrameRate
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_strips_version_and_injected_uniforms() {
        let source = r#"#version 330 core
uniform float iTime;
uniform vec3 iResolution;
out vec4 frag_color;
void main() {
    frag_color = vec4(iResolution.xy, iTime, 1.0);
}
"#;

        let wrapped = wrap_stage_source(source);
        assert!(!wrapped.contains("#version 330"));
        assert!(!wrapped.contains("uniform float iTime"));
        assert!(!wrapped.contains("uniform vec3 iResolution"));
        assert!(wrapped.starts_with("#version 450"));
        assert!(wrapped.contains("uniform QuadParams"));
    }

    #[test]
    fn wrap_keeps_user_uniforms_that_embed_injected_names() {
        let source = "uniform float iTimeScale;\nvoid main() { float t = iTime * iTimeScale; }\n";
        let wrapped = wrap_stage_source(source);
        assert!(wrapped.contains("const float iTimeScale = float(0);"));
        assert!(!wrapped.contains("uniform float iTimeScale"));
        // The genuine injected name still resolves through the block alias.
        assert!(wrapped.contains("#define iTime ubo._iTime"));
    }

    #[test]
    fn wrap_zeroes_unset_user_uniforms() {
        let source = r#"uniform float user_gain;
uniform vec2 user_offset; // pan
uniform highp vec3 tint;
void main() {}
"#;

        let wrapped = wrap_stage_source(source);
        assert!(wrapped.contains("const float user_gain = float(0);"));
        assert!(wrapped.contains("const vec2 user_offset = vec2(0);"));
        assert!(wrapped.contains("const vec3 tint = vec3(0);"));
        assert!(!wrapped.contains("uniform float user_gain"));
        assert!(!wrapped.contains("uniform vec2 user_offset"));
    }

    #[test]
    fn wrap_pins_locations_on_bare_io() {
        let source = "#version 330 core\nin vec2 position;\nvoid main() {}\n";
        let wrapped = wrap_stage_source(source);
        assert!(wrapped.contains("layout(location = 0) in vec2 position;"));
    }

    #[test]
    fn wrap_numbers_io_per_direction() {
        let source = "in vec2 position;\nin vec2 velocity;\nout vec4 color;\n";
        let wrapped = wrap_stage_source(source);
        assert!(wrapped.contains("layout(location = 0) in vec2 position;"));
        assert!(wrapped.contains("layout(location = 1) in vec2 velocity;"));
        assert!(wrapped.contains("layout(location = 0) out vec4 color;"));
    }

    #[test]
    fn wrap_leaves_qualified_io_alone() {
        let source = "layout(location = 3) in vec2 position;\n";
        let wrapped = wrap_stage_source(source);
        assert!(wrapped.contains("layout(location = 3) in vec2 position;"));
        assert!(!wrapped.contains("location = 0) in"));
    }

    #[test]
    fn wrap_pins_io_with_trailing_comments() {
        let source = "in vec2 position; // clip-space corner\n";
        let wrapped = wrap_stage_source(source);
        assert!(wrapped.contains("layout(location = 0) in vec2 position; // clip-space corner"));
    }

    #[test]
    fn missing_source_file_is_an_error() {
        let err = load_shader_source(Path::new("/nonexistent/quad.frag")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/quad.frag"));
    }
}
