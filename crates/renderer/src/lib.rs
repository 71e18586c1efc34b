//! Renderer crate for shaderquad.
//!
//! Glues the winit window, `wgpu` rendering pipeline, and GLSL shader
//! wrapping together. The overall flow is:
//!
//! ```text
//!   CLI / shaderquad
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ GpuState::render()
//!          ▲                                    │
//!          │                                    └─▶ QuadParams block ─▶ GPU UBO
//! ```
//!
//! `GpuState` owns all GPU resources (surface, device, program, quad buffer,
//! uniforms), while `Renderer` is the thin entry point that opens the window
//! and drives the loop. The vertex/fragment sources read from disk are
//! wrapped at runtime so GL 3.3-style GLSL compiles as Vulkan GLSL and sees
//! the expected `iTime`/`iResolution` uniforms.

mod compile;
mod gpu;
mod runtime;
mod window;

use std::path::PathBuf;

use anyhow::Result;

/// Immutable configuration passed to the renderer at start-up.
///
/// Mirrors the CLI flags: which shader pair to compile, how large the window
/// should be, and whether frames are paced.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Path to the vertex shader source.
    pub vertex_source: PathBuf,
    /// Path to the fragment shader source.
    pub fragment_source: PathBuf,
    /// Title of the created window.
    pub window_title: String,
    /// Optional FPS cap; None renders as fast as the swapchain allows.
    pub target_fps: Option<f32>,
}

impl Default for RendererConfig {
    /// The demo's stock configuration: 640×640, shader pair from `Shaders/`.
    fn default() -> Self {
        Self {
            surface_size: (640, 640),
            vertex_source: PathBuf::from("Shaders/vertex.vert"),
            fragment_source: PathBuf::from("Shaders/fragment.frag"),
            window_title: "Graphics Demo".to_string(),
            target_fps: None,
        }
    }
}

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside `WindowState`; `Renderer` simply opens the
/// window path and forwards the request.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and runs the render loop until the window closes.
    ///
    /// Returns an error if any initialization step fails: window creation,
    /// GPU adapter/device acquisition, or shader compile/link. None of these
    /// have a recovery path, so the error is expected to terminate the
    /// process before a single frame is drawn.
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_demo() {
        let config = RendererConfig::default();
        assert_eq!(config.surface_size, (640, 640));
        assert_eq!(config.window_title, "Graphics Demo");
        assert_eq!(config.vertex_source, PathBuf::from("Shaders/vertex.vert"));
        assert_eq!(
            config.fragment_source,
            PathBuf::from("Shaders/fragment.frag")
        );
        assert_eq!(config.target_fps, None);
    }
}
