use std::collections::HashMap;

use crate::gl::{CompareFunc, StencilOp};
use crate::hw::{DepthWrite, HwCull, HwPolygonMode, ProgramId, StencilConfig};

/// Fixed-function raster/depth/stencil state baked into one render pipeline.
///
/// The stencil reference is dynamic render-pass state and is not part of the key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineKey {
    pub cull: HwCull,
    pub polygon_mode: HwPolygonMode,
    pub depth_func: CompareFunc,
    pub depth_write: DepthWrite,
    pub front_stencil: StencilConfig,
    pub back_stencil: StencilConfig,
    /// `(factor, units)`.
    pub depth_bias: (i32, i32),
    pub fragment: ProgramId,
}

impl PipelineKey {
    /// Drops the per-draw stencil reference so equal pipelines share a key.
    pub fn normalized(mut self) -> Self {
        self.front_stencil.reference = 0;
        self.back_stencil.reference = 0;
        self
    }
}

pub fn compare_function(func: CompareFunc) -> wgpu::CompareFunction {
    match func {
        CompareFunc::Never => wgpu::CompareFunction::Never,
        CompareFunc::Less => wgpu::CompareFunction::Less,
        CompareFunc::Equal => wgpu::CompareFunction::Equal,
        CompareFunc::LessEqual => wgpu::CompareFunction::LessEqual,
        CompareFunc::Greater => wgpu::CompareFunction::Greater,
        CompareFunc::NotEqual => wgpu::CompareFunction::NotEqual,
        CompareFunc::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
        CompareFunc::Always => wgpu::CompareFunction::Always,
    }
}

pub fn stencil_operation(op: StencilOp) -> wgpu::StencilOperation {
    match op {
        StencilOp::Keep => wgpu::StencilOperation::Keep,
        StencilOp::Zero => wgpu::StencilOperation::Zero,
        StencilOp::Replace => wgpu::StencilOperation::Replace,
        StencilOp::Incr => wgpu::StencilOperation::IncrementClamp,
        StencilOp::Decr => wgpu::StencilOperation::DecrementClamp,
        StencilOp::Invert => wgpu::StencilOperation::Invert,
        StencilOp::IncrWrap => wgpu::StencilOperation::IncrementWrap,
        StencilOp::DecrWrap => wgpu::StencilOperation::DecrementWrap,
    }
}

fn stencil_face(config: StencilConfig) -> wgpu::StencilFaceState {
    wgpu::StencilFaceState {
        compare: compare_function(config.func),
        fail_op: stencil_operation(config.stencil_fail),
        depth_fail_op: stencil_operation(config.depth_fail),
        pass_op: stencil_operation(config.depth_pass),
    }
}

/// Hardware cull winding in wgpu terms: winding is judged in NDC with CCW front.
pub fn cull_face(cull: HwCull) -> Option<wgpu::Face> {
    match cull {
        HwCull::None => None,
        HwCull::Cw => Some(wgpu::Face::Back),
        HwCull::Ccw => Some(wgpu::Face::Front),
    }
}

/// Polygon mode, falling back to fill when the device lacks the feature.
pub fn polygon_mode(mode: HwPolygonMode, features: wgpu::Features) -> (wgpu::PolygonMode, bool) {
    match mode {
        HwPolygonMode::TriangleFill => (wgpu::PolygonMode::Fill, false),
        HwPolygonMode::TriangleLine if features.contains(wgpu::Features::POLYGON_MODE_LINE) => {
            (wgpu::PolygonMode::Line, false)
        }
        HwPolygonMode::TrianglePoint if features.contains(wgpu::Features::POLYGON_MODE_POINT) => {
            (wgpu::PolygonMode::Point, false)
        }
        _ => (wgpu::PolygonMode::Fill, true),
    }
}

/// Render pipelines keyed by [`PipelineKey`], built on first use.
pub struct PipelineCache {
    shader: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    depth_stencil_format: wgpu::TextureFormat,
    features: wgpu::Features,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    warned_polygon_mode: bool,
}

impl PipelineCache {
    pub fn new(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        depth_stencil_format: wgpu::TextureFormat,
        features: wgpu::Features,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fixgl clear shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/clear.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fixgl pipeline layout"),
            bind_group_layouts: &[bind_group_layout],
            immediate_size: 0,
        });

        Self {
            shader,
            layout,
            color_format,
            depth_stencil_format,
            features,
            pipelines: HashMap::new(),
            warned_polygon_mode: false,
        }
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&key.normalized())
    }

    /// Builds the pipeline for `key` unless it is cached already.
    pub fn ensure(&mut self, device: &wgpu::Device, key: PipelineKey) {
        let key = key.normalized();
        if self.pipelines.contains_key(&key) {
            return;
        }

        let (polygon_mode, fell_back) = polygon_mode(key.polygon_mode, self.features);
        if fell_back && !self.warned_polygon_mode {
            log::warn!("{:?} unsupported on this device; drawing filled", key.polygon_mode);
            self.warned_polygon_mode = true;
        }

        let (fs_entry, write_mask) = if key.fragment == ProgramId::CLEAR_COLOR {
            ("fs_color", wgpu::ColorWrites::ALL)
        } else {
            ("fs_depth_stencil", wgpu::ColorWrites::empty())
        };

        // wgpu has one mask pair and one bias per pipeline: the front face's win.
        let stencil = wgpu::StencilState {
            front: stencil_face(key.front_stencil),
            back: stencil_face(key.back_stencil),
            read_mask: u32::from(key.front_stencil.compare_mask),
            write_mask: u32::from(key.front_stencil.write_mask),
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fixgl pipeline"),
            layout: Some(&self.layout),

            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some(fs_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: None,
                    write_mask,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: cull_face(key.cull),
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: self.depth_stencil_format,
                depth_write_enabled: key.depth_write == DepthWrite::Enabled,
                depth_compare: compare_function(key.depth_func),
                stencil,
                bias: wgpu::DepthBiasState {
                    constant: key.depth_bias.1,
                    slope_scale: key.depth_bias.0 as f32,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        log::debug!("pipeline cache: built #{} for {key:?}", self.pipelines.len() + 1);
        self.pipelines.insert(key, pipeline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> PipelineKey {
        PipelineKey {
            cull: HwCull::None,
            polygon_mode: HwPolygonMode::TriangleFill,
            depth_func: CompareFunc::Always,
            depth_write: DepthWrite::Enabled,
            front_stencil: StencilConfig::PASSTHROUGH,
            back_stencil: StencilConfig::PASSTHROUGH,
            depth_bias: (0, 0),
            fragment: ProgramId::CLEAR_COLOR,
        }
    }

    #[test]
    fn stencil_reference_does_not_split_keys() {
        let mut a = key();
        let mut b = key();
        a.front_stencil.reference = 3;
        b.front_stencil.reference = 200;
        assert_eq!(a.normalized(), b.normalized());
        b.front_stencil.write_mask = 0;
        assert_ne!(a.normalized(), b.normalized());
    }

    #[test]
    fn cull_winding_maps_to_faces() {
        assert_eq!(cull_face(HwCull::None), None);
        assert_eq!(cull_face(HwCull::Cw), Some(wgpu::Face::Back));
        assert_eq!(cull_face(HwCull::Ccw), Some(wgpu::Face::Front));
    }

    #[test]
    fn polygon_mode_falls_back_without_feature() {
        let none = wgpu::Features::empty();
        assert_eq!(polygon_mode(HwPolygonMode::TriangleLine, none), (wgpu::PolygonMode::Fill, true));
        assert_eq!(
            polygon_mode(HwPolygonMode::TriangleLine, wgpu::Features::POLYGON_MODE_LINE),
            (wgpu::PolygonMode::Line, false)
        );
        assert_eq!(polygon_mode(HwPolygonMode::TriangleFill, none), (wgpu::PolygonMode::Fill, false));
    }

    #[test]
    fn stencil_ops_map_saturating_and_wrapping() {
        assert_eq!(stencil_operation(StencilOp::Incr), wgpu::StencilOperation::IncrementClamp);
        assert_eq!(stencil_operation(StencilOp::IncrWrap), wgpu::StencilOperation::IncrementWrap);
        assert_eq!(compare_function(CompareFunc::GreaterEqual), wgpu::CompareFunction::GreaterEqual);
    }
}
