//! GPU orchestration for the fullscreen-quad demo.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `geometry` holds the immutable 6-vertex quad and its attribute layout.
//! - `pipeline` compiles the wrapped vertex/fragment pair into a render
//!   pipeline behind an opaque `ShaderProgram` handle.
//! - `uniforms` mirrors the injected `QuadParams` block and exposes the
//!   name-addressed setters with GL-style silent misses.
//! - `state` glues everything together and exposes the `GpuState` API used
//!   by `window`.

mod context;
mod geometry;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
