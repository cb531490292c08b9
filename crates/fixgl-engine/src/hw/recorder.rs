use crate::gl::CompareFunc;

use super::{
    ClipRegion, DepthWrite, HardwareViewport, HwContext, HwCull, HwPolygonMode, Primitive,
    ProgramId, StencilConfig, Uniform,
};

/// One hardware command, as issued.
#[derive(Debug, Clone, PartialEq)]
pub enum HwCmd {
    CullMode(HwCull),
    FrontDepthBias { factor: i32, units: i32 },
    BackDepthBias { factor: i32, units: i32 },
    FrontPolygonMode(HwPolygonMode),
    BackPolygonMode(HwPolygonMode),
    Viewport(HardwareViewport),
    DepthFunc(CompareFunc),
    DepthWrite(DepthWrite),
    FrontStencil(StencilConfig),
    BackStencil(StencilConfig),
    PointLineWidth(f32),
    RegionClip(Option<ClipRegion>),
    VertexProgram(ProgramId),
    FragmentProgram(ProgramId),
    VertexUniform(Uniform, Vec<f32>),
    FragmentUniform(Uniform, Vec<f32>),
    Draw { primitive: Primitive, indices: Vec<u16> },
}

/// Latest value of every hardware setting. `None` = never set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HwSnapshot {
    pub cull: Option<HwCull>,
    pub front_depth_bias: Option<(i32, i32)>,
    pub back_depth_bias: Option<(i32, i32)>,
    pub front_polygon_mode: Option<HwPolygonMode>,
    pub back_polygon_mode: Option<HwPolygonMode>,
    pub viewport: Option<HardwareViewport>,
    pub depth_func: Option<CompareFunc>,
    pub depth_write: Option<DepthWrite>,
    pub front_stencil: Option<StencilConfig>,
    pub back_stencil: Option<StencilConfig>,
    pub point_line_width: Option<f32>,
    pub region_clip: Option<Option<ClipRegion>>,
    pub vertex_program: Option<ProgramId>,
    pub fragment_program: Option<ProgramId>,
}

/// Hardware context that records instead of executing.
///
/// Used by tests and by tooling that wants to inspect what a sequence of GL calls
/// turns into.
#[derive(Debug, Default)]
pub struct RecordingHw {
    cmds: Vec<HwCmd>,
    snapshot: HwSnapshot,
}

impl RecordingHw {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in issue order.
    #[inline]
    pub fn cmds(&self) -> &[HwCmd] {
        &self.cmds
    }

    #[inline]
    pub fn snapshot(&self) -> &HwSnapshot {
        &self.snapshot
    }

    /// Forgets recorded commands but keeps the snapshot.
    #[inline]
    pub fn clear_log(&mut self) {
        self.cmds.clear();
    }

    pub fn draw_count(&self) -> usize {
        self.cmds.iter().filter(|c| matches!(c, HwCmd::Draw { .. })).count()
    }

    /// Last recorded command matching `pred`.
    pub fn last_where(&self, pred: impl Fn(&HwCmd) -> bool) -> Option<&HwCmd> {
        self.cmds.iter().rev().find(|c| pred(c))
    }

    fn push(&mut self, cmd: HwCmd) {
        log::trace!("hw: {cmd:?}");
        self.cmds.push(cmd);
    }
}

impl HwContext for RecordingHw {
    fn set_cull_mode(&mut self, mode: HwCull) {
        self.snapshot.cull = Some(mode);
        self.push(HwCmd::CullMode(mode));
    }

    fn set_front_depth_bias(&mut self, factor: i32, units: i32) {
        self.snapshot.front_depth_bias = Some((factor, units));
        self.push(HwCmd::FrontDepthBias { factor, units });
    }

    fn set_back_depth_bias(&mut self, factor: i32, units: i32) {
        self.snapshot.back_depth_bias = Some((factor, units));
        self.push(HwCmd::BackDepthBias { factor, units });
    }

    fn set_front_polygon_mode(&mut self, mode: HwPolygonMode) {
        self.snapshot.front_polygon_mode = Some(mode);
        self.push(HwCmd::FrontPolygonMode(mode));
    }

    fn set_back_polygon_mode(&mut self, mode: HwPolygonMode) {
        self.snapshot.back_polygon_mode = Some(mode);
        self.push(HwCmd::BackPolygonMode(mode));
    }

    fn set_viewport(&mut self, viewport: HardwareViewport) {
        self.snapshot.viewport = Some(viewport);
        self.push(HwCmd::Viewport(viewport));
    }

    fn set_depth_func(&mut self, func: CompareFunc) {
        self.snapshot.depth_func = Some(func);
        self.push(HwCmd::DepthFunc(func));
    }

    fn set_depth_write(&mut self, write: DepthWrite) {
        self.snapshot.depth_write = Some(write);
        self.push(HwCmd::DepthWrite(write));
    }

    fn set_front_stencil(&mut self, stencil: StencilConfig) {
        self.snapshot.front_stencil = Some(stencil);
        self.push(HwCmd::FrontStencil(stencil));
    }

    fn set_back_stencil(&mut self, stencil: StencilConfig) {
        self.snapshot.back_stencil = Some(stencil);
        self.push(HwCmd::BackStencil(stencil));
    }

    fn set_point_line_width(&mut self, width: f32) {
        self.snapshot.point_line_width = Some(width);
        self.push(HwCmd::PointLineWidth(width));
    }

    fn set_region_clip(&mut self, region: Option<ClipRegion>) {
        self.snapshot.region_clip = Some(region);
        self.push(HwCmd::RegionClip(region));
    }

    fn set_vertex_program(&mut self, program: ProgramId) {
        self.snapshot.vertex_program = Some(program);
        self.push(HwCmd::VertexProgram(program));
    }

    fn set_fragment_program(&mut self, program: ProgramId) {
        self.snapshot.fragment_program = Some(program);
        self.push(HwCmd::FragmentProgram(program));
    }

    fn set_vertex_uniform(&mut self, uniform: Uniform, data: &[f32]) {
        self.push(HwCmd::VertexUniform(uniform, data.to_vec()));
    }

    fn set_fragment_uniform(&mut self, uniform: Uniform, data: &[f32]) {
        self.push(HwCmd::FragmentUniform(uniform, data.to_vec()));
    }

    fn draw(&mut self, primitive: Primitive, indices: &[u16]) {
        self.push(HwCmd::Draw { primitive, indices: indices.to_vec() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tracks_latest_value() {
        let mut hw = RecordingHw::new();
        hw.set_cull_mode(HwCull::Cw);
        hw.set_cull_mode(HwCull::None);
        assert_eq!(hw.snapshot().cull, Some(HwCull::None));
        assert_eq!(hw.cmds().len(), 2);
    }

    #[test]
    fn clear_log_keeps_snapshot() {
        let mut hw = RecordingHw::new();
        hw.set_depth_write(DepthWrite::Disabled);
        hw.clear_log();
        assert!(hw.cmds().is_empty());
        assert_eq!(hw.snapshot().depth_write, Some(DepthWrite::Disabled));
    }

    #[test]
    fn draws_are_counted() {
        let mut hw = RecordingHw::new();
        hw.draw(Primitive::TriangleFan, &[0, 1, 2, 3]);
        hw.set_depth_func(CompareFunc::Always);
        hw.draw(Primitive::Triangles, &[0, 1, 2]);
        assert_eq!(hw.draw_count(), 2);
    }

    #[test]
    fn forwards_through_mut_ref() {
        fn widen(mut hw: impl HwContext) {
            hw.set_point_line_width(2.0);
        }

        let mut hw = RecordingHw::new();
        widen(&mut hw);
        assert_eq!(hw.snapshot().point_line_width, Some(2.0));
    }
}
