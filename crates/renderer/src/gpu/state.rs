use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::debug;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::runtime::TimeSample;

use super::context::GpuContext;
use super::geometry::{QuadVertex, QUAD_VERTICES};
use super::pipeline::{create_uniform_layout, ShaderProgram};
use super::uniforms::QuadUniforms;

/// Glues context, program, geometry, and uniforms into the per-frame API
/// used by `window.rs`.
///
/// All GPU objects are created once before the loop begins; the quad vertex
/// buffer is written exactly once and never touched again.
pub(crate) struct GpuState {
    context: GpuContext,
    program: ShaderProgram,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: QuadUniforms,
    vertex_buffer: wgpu::Buffer,
    last_sample: Option<TimeSample>,
    last_fps_update: Instant,
    frames_since_last_update: u32,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        vertex_path: &Path,
        fragment_path: &Path,
        target_fps: Option<f32>,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;

        let uniform_layout = create_uniform_layout(&context.device);
        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<QuadUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let program = ShaderProgram::new(
            &context.device,
            &uniform_layout,
            context.surface_format,
            vertex_path,
            fragment_path,
        )?;

        let vertex_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad vertex buffer"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });
        debug_assert_eq!(
            vertex_buffer.size(),
            (QUAD_VERTICES.len() * std::mem::size_of::<QuadVertex>()) as u64,
        );

        let mut uniforms = QuadUniforms::new(context.size.width, context.size.height);
        if let Some(fps) = target_fps {
            uniforms.set_unsigned_int("iFrameRate", fps.round().max(0.0) as u32);
        }
        Self::write_uniforms(&context.queue, &uniform_buffer, &uniforms);

        Ok(Self {
            context,
            program,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            vertex_buffer,
            last_sample: None,
            last_fps_update: Instant::now(),
            frames_since_last_update: 0,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.uniforms
            .set_resolution(new_size.width as f32, new_size.height as f32);
        debug!(resolution = ?self.uniforms.resolution(), "resized render target");
    }

    /// Renders one frame: clear to opaque black, bind the program and quad,
    /// draw 6 vertices, present.
    pub(crate) fn render(&mut self, sample: TimeSample) -> Result<(), wgpu::SurfaceError> {
        // Acquire first; under Fifo this is where the loop blocks on vsync.
        let frame = self.context.surface.get_current_texture()?;

        let now = Instant::now();
        self.frames_since_last_update += 1;
        let elapsed = now.saturating_duration_since(self.last_fps_update);
        if elapsed >= Duration::from_secs(1) {
            debug!(
                fps = (self.frames_since_last_update as f32 / elapsed.as_secs_f32()).round(),
                frame_index = sample.frame_index,
                time = sample.seconds,
                shader = %self.program.fragment_source.display(),
                "render stats"
            );
            self.frames_since_last_update = 0;
            self.last_fps_update = now;
        }

        let delta_seconds = self
            .last_sample
            .map(|previous| (sample.seconds - previous.seconds).max(0.0))
            .unwrap_or(0.0);
        self.last_sample = Some(sample);
        self.uniforms.update_time(sample, delta_seconds);
        // The resolution rides along unchanged in the same block write, so it
        // is re-uploaded every frame like the rest of the uniforms.
        Self::write_uniforms(&self.context.queue, &self.uniform_buffer, &self.uniforms);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.program.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }

    fn write_uniforms(queue: &wgpu::Queue, buffer: &wgpu::Buffer, uniforms: &QuadUniforms) {
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(uniforms));
    }
}
