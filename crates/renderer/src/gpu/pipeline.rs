use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wgpu::naga::ShaderStage;

use crate::compile::{compile_stage, load_shader_source};

use super::geometry::QuadVertex;

/// Bind group layout for the `QuadParams` uniform block, visible to both
/// stages so either one may read the injected uniforms.
pub(crate) fn create_uniform_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("uniform layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Compiled-and-linked GPU program for the fullscreen quad.
///
/// Owns the render pipeline built from a vertex/fragment source pair; the
/// value itself is the program handle, and binding it inside a render pass is
/// the "use" operation. Dropping it releases the pipeline, so the scene stays
/// leak-free without explicit destroy calls.
pub(crate) struct ShaderProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub fragment_source: PathBuf,
}

impl ShaderProgram {
    /// Reads, compiles, and links the shader pair.
    ///
    /// Either stage failing to compile, or the pipeline failing validation,
    /// is fatal to the caller: there is no render loop worth entering with a
    /// broken program.
    pub(crate) fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Self> {
        let vertex_code = load_shader_source(vertex_path)?;
        let fragment_code = load_shader_source(fragment_path)?;

        let vertex_module = compile_stage(device, &vertex_code, ShaderStage::Vertex, vertex_path)
            .context("vertex stage rejected")?;
        let fragment_module =
            compile_stage(device, &fragment_code, ShaderStage::Fragment, fragment_path)
                .context("fragment stage rejected")?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad pipeline layout"),
            bind_group_layouts: &[uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[QuadVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        tracing::debug!(
            vertex = %vertex_path.display(),
            fragment = %fragment_path.display(),
            "linked shader program"
        );

        Ok(Self {
            pipeline,
            fragment_source: fragment_path.to_path_buf(),
        })
    }
}
