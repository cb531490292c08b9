use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::PixelRect;
use crate::gl::CompareFunc;
use crate::hw::{
    ClipRegion, DepthWrite, HardwareViewport, HwContext, HwCull, HwPolygonMode, Primitive,
    ProgramId, StencilConfig, Uniform,
};

use super::pipeline::{PipelineCache, PipelineKey};
use super::{Gpu, TargetTextures};

/// Per-draw uniform block shared by the built-in programs.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub positions: [f32; 8],
    pub color: [f32; 4],
    pub depth: f32,
    pub stencil: f32,
    pub y_sign: f32,
    pub _pad: f32, // 16-byte alignment
}

impl DrawUniforms {
    fn write(&mut self, uniform: Uniform, data: &[f32]) {
        let dst: &mut [f32] = match uniform {
            Uniform::ClearPosition => &mut self.positions,
            Uniform::ClearColor => &mut self.color,
            Uniform::ClearDepth => std::slice::from_mut(&mut self.depth),
            Uniform::ClearStencil => std::slice::from_mut(&mut self.stencil),
        };
        let n = dst.len().min(data.len());
        dst[..n].copy_from_slice(&data[..n]);
    }
}

/// Converts any supported primitive into a triangle list.
pub fn triangle_list(primitive: Primitive, indices: &[u16]) -> Vec<u16> {
    match primitive {
        Primitive::Triangles => indices[..indices.len() - indices.len() % 3].to_vec(),
        Primitive::TriangleFan => {
            let Some((&hub, rest)) = indices.split_first() else { return Vec::new() };
            rest.windows(2).flat_map(|w| [hub, w[0], w[1]]).collect()
        }
        Primitive::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .flat_map(|(i, w)| if i % 2 == 0 { [w[0], w[1], w[2]] } else { [w[1], w[0], w[2]] })
            .collect(),
    }
}

/// wgpu viewport `(x, y, w, h, min_depth, max_depth)` clamped to the target.
///
/// `None` when nothing of the viewport lies inside the target.
pub fn wgpu_viewport(vp: &HardwareViewport, width: u32, height: u32) -> Option<[f32; 6]> {
    let x0 = (vp.x_center - vp.x_half.abs()).max(0.0);
    let y0 = (vp.y_center - vp.y_half.abs()).max(0.0);
    let x1 = (vp.x_center + vp.x_half.abs()).min(width as f32);
    let y1 = (vp.y_center + vp.y_half.abs()).min(height as f32);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let near = (vp.z_center - vp.z_half).clamp(0.0, 1.0);
    let far = (vp.z_center + vp.z_half).clamp(0.0, 1.0);
    Some([x0, y0, x1 - x0, y1 - y0, near.min(far), near.max(far)])
}

/// Scissor rectangle for a region clip; the full target when clipping is off.
pub fn scissor_rect(region: Option<ClipRegion>, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let rect = region.unwrap_or(PixelRect::new(0, 0, width as i32, height as i32));
    let r = rect.clamp_to(width, height)?;
    Some((r.x as u32, r.y as u32, r.width as u32, r.height as u32))
}

#[derive(Debug, Clone)]
struct PendingDraw {
    key: PipelineKey,
    viewport: HardwareViewport,
    region: Option<ClipRegion>,
    stencil_reference: u8,
    uniforms: DrawUniforms,
    first_index: u32,
    index_count: u32,
}

#[derive(Debug, Default)]
struct Warnings {
    client_program: bool,
    depth_order: bool,
    wide_lines: bool,
    split_faces: bool,
}

/// [`HwContext`] executed on a wgpu device.
///
/// State calls update the current hardware settings; `draw` snapshots them into a
/// pending list. [`WgpuHw::end_scene`] encodes all pending draws into one render
/// pass against a target and submits it.
///
/// Only the built-in programs have shaders here. Draws bound to client programs
/// are dropped with a one-time warning.
pub struct WgpuHw {
    device: wgpu::Device,
    queue: wgpu::Queue,

    bind_group_layout: wgpu::BindGroupLayout,
    pipelines: PipelineCache,
    uniform_stride: u64,
    uniform_buffer: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: usize,

    // Current hardware settings.
    cull: HwCull,
    front_bias: (i32, i32),
    back_bias: (i32, i32),
    front_polygon_mode: HwPolygonMode,
    back_polygon_mode: HwPolygonMode,
    viewport: HardwareViewport,
    depth_func: CompareFunc,
    depth_write: DepthWrite,
    front_stencil: StencilConfig,
    back_stencil: StencilConfig,
    region_clip: Option<ClipRegion>,
    vertex_program: ProgramId,
    fragment_program: ProgramId,
    uniforms: DrawUniforms,

    pending: Vec<PendingDraw>,
    indices: Vec<u16>,
    warned: Warnings,
}

impl WgpuHw {
    pub fn new(gpu: &Gpu) -> Self {
        let device = gpu.device().clone();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fixgl draw uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(size_of::<DrawUniforms>() as u64),
                },
                count: None,
            }],
        });

        let pipelines = PipelineCache::new(
            &device,
            &bind_group_layout,
            gpu.color_format(),
            gpu.depth_stencil_format(),
            gpu.features(),
        );

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let uniform_stride = wgpu::util::align_to(size_of::<DrawUniforms>() as u64, alignment);

        Self {
            device,
            queue: gpu.queue().clone(),
            bind_group_layout,
            pipelines,
            uniform_stride,
            uniform_buffer: None,
            uniform_bind_group: None,
            uniform_capacity: 0,

            cull: HwCull::None,
            front_bias: (0, 0),
            back_bias: (0, 0),
            front_polygon_mode: HwPolygonMode::TriangleFill,
            back_polygon_mode: HwPolygonMode::TriangleFill,
            viewport: HardwareViewport::default(),
            depth_func: CompareFunc::Always,
            depth_write: DepthWrite::Enabled,
            front_stencil: StencilConfig::PASSTHROUGH,
            back_stencil: StencilConfig::PASSTHROUGH,
            region_clip: None,
            vertex_program: ProgramId::CLEAR_VERTEX,
            fragment_program: ProgramId::CLEAR_COLOR,
            uniforms: DrawUniforms::default(),

            pending: Vec::new(),
            indices: Vec::new(),
            warned: Warnings::default(),
        }
    }

    pub fn cached_pipelines(&self) -> usize {
        self.pipelines.len()
    }

    fn current_key(&self) -> PipelineKey {
        PipelineKey {
            cull: self.cull,
            // One rasterization mode per pipeline; the front face's is used.
            polygon_mode: self.front_polygon_mode,
            depth_func: self.depth_func,
            depth_write: self.depth_write,
            front_stencil: self.front_stencil,
            back_stencil: self.back_stencil,
            depth_bias: self.front_bias,
            fragment: self.fragment_program,
        }
    }

    /// Encodes every pending draw into one render pass on `target` and submits.
    ///
    /// Returns the number of draws actually issued; draws whose viewport or
    /// scissor falls outside the target are skipped.
    pub fn end_scene(&mut self, target: &TargetTextures) -> Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let pending = std::mem::take(&mut self.pending);
        let indices = std::mem::take(&mut self.indices);
        let width = target.color().width();
        let height = target.color().height();

        for draw in &pending {
            self.pipelines.ensure(&self.device, draw.key);
        }
        self.ensure_uniform_capacity(pending.len());
        self.write_uniforms(&pending);

        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fixgl scene indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let Some(bind_group) = self.uniform_bind_group.as_ref() else {
            anyhow::bail!("uniform bind group missing after allocation");
        };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("fixgl scene encoder"),
        });

        let mut issued = 0;
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("fixgl scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target.depth_stencil_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for (slot, draw) in pending.iter().enumerate() {
                let Some([x, y, w, h, min_depth, max_depth]) = wgpu_viewport(&draw.viewport, width, height)
                else {
                    continue;
                };
                let Some((sx, sy, sw, sh)) = scissor_rect(draw.region, width, height) else {
                    continue;
                };
                let Some(pipeline) = self.pipelines.get(&draw.key) else { continue };

                let offset = slot as u64 * self.uniform_stride;
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, bind_group, &[offset as u32]);
                rpass.set_viewport(x, y, w, h, min_depth, max_depth);
                rpass.set_scissor_rect(sx, sy, sw, sh);
                rpass.set_stencil_reference(u32::from(draw.stencil_reference));
                rpass.draw_indexed(draw.first_index..draw.first_index + draw.index_count, 0, 0..1);
                issued += 1;
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        log::debug!("scene: {issued}/{} draws on {width}x{height}", pending.len());
        Ok(issued)
    }

    fn ensure_uniform_capacity(&mut self, required: usize) {
        if required <= self.uniform_capacity && self.uniform_buffer.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(16);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fixgl draw uniforms"),
            size: new_cap as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fixgl draw uniforms bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(size_of::<DrawUniforms>() as u64),
                }),
            }],
        });

        self.uniform_buffer = Some(buffer);
        self.uniform_bind_group = Some(bind_group);
        self.uniform_capacity = new_cap;
    }

    fn write_uniforms(&self, pending: &[PendingDraw]) {
        let Some(buffer) = self.uniform_buffer.as_ref() else { return };
        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; pending.len() * stride];
        for (slot, draw) in pending.iter().enumerate() {
            let at = slot * stride;
            bytes[at..at + size_of::<DrawUniforms>()].copy_from_slice(bytemuck::bytes_of(&draw.uniforms));
        }
        self.queue.write_buffer(buffer, 0, &bytes);
    }
}

impl HwContext for WgpuHw {
    fn set_cull_mode(&mut self, mode: HwCull) {
        self.cull = mode;
    }

    fn set_front_depth_bias(&mut self, factor: i32, units: i32) {
        self.front_bias = (factor, units);
    }

    fn set_back_depth_bias(&mut self, factor: i32, units: i32) {
        self.back_bias = (factor, units);
    }

    fn set_front_polygon_mode(&mut self, mode: HwPolygonMode) {
        self.front_polygon_mode = mode;
    }

    fn set_back_polygon_mode(&mut self, mode: HwPolygonMode) {
        self.back_polygon_mode = mode;
    }

    fn set_viewport(&mut self, viewport: HardwareViewport) {
        if viewport.z_half < 0.0 && !self.warned.depth_order {
            log::warn!("depth range with near > far is not supported; using ordered range");
            self.warned.depth_order = true;
        }
        self.viewport = viewport;
    }

    fn set_depth_func(&mut self, func: CompareFunc) {
        self.depth_func = func;
    }

    fn set_depth_write(&mut self, write: DepthWrite) {
        self.depth_write = write;
    }

    fn set_front_stencil(&mut self, stencil: StencilConfig) {
        self.front_stencil = stencil;
    }

    fn set_back_stencil(&mut self, stencil: StencilConfig) {
        self.back_stencil = stencil;
    }

    fn set_point_line_width(&mut self, width: f32) {
        if width != 1.0 && !self.warned.wide_lines {
            log::debug!("point/line width {width} ignored: wgpu rasterizes 1px lines and points");
            self.warned.wide_lines = true;
        }
    }

    fn set_region_clip(&mut self, region: Option<ClipRegion>) {
        self.region_clip = region;
    }

    fn set_vertex_program(&mut self, program: ProgramId) {
        self.vertex_program = program;
    }

    fn set_fragment_program(&mut self, program: ProgramId) {
        self.fragment_program = program;
    }

    fn set_vertex_uniform(&mut self, uniform: Uniform, data: &[f32]) {
        self.uniforms.write(uniform, data);
    }

    fn set_fragment_uniform(&mut self, uniform: Uniform, data: &[f32]) {
        self.uniforms.write(uniform, data);
    }

    fn draw(&mut self, primitive: Primitive, indices: &[u16]) {
        if !self.vertex_program.is_builtin() || !self.fragment_program.is_builtin() {
            if !self.warned.client_program {
                log::warn!(
                    "draw with client programs {:?}/{:?} dropped: no shader attached",
                    self.vertex_program,
                    self.fragment_program
                );
                self.warned.client_program = true;
            }
            return;
        }

        let list = triangle_list(primitive, indices);
        if list.is_empty() {
            return;
        }

        let split = self.front_bias != self.back_bias || self.front_polygon_mode != self.back_polygon_mode;
        if split && !self.warned.split_faces {
            log::warn!("per-face polygon mode/offset differ; the front face's settings are used");
            self.warned.split_faces = true;
        }

        let mut uniforms = self.uniforms;
        uniforms.y_sign = if self.viewport.y_half > 0.0 { -1.0 } else { 1.0 };

        self.pending.push(PendingDraw {
            key: self.current_key(),
            viewport: self.viewport,
            region: self.region_clip,
            stencil_reference: self.front_stencil.reference,
            uniforms,
            first_index: self.indices.len() as u32,
            index_count: list.len() as u32,
        });
        self.indices.extend_from_slice(&list);
    }
}
