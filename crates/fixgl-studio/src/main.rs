//! Headless demo: drives a GL context through the wgpu backend and reads back
//! the clears of a display target and an offscreen target.

use anyhow::{Context, Result};
use fixgl_engine::context::{ContextConfig, GlContext, RenderTarget};
use fixgl_engine::device::{read_color, Gpu, GpuInit, TargetTextures, WgpuHw};
use fixgl_engine::gl::types::*;
use fixgl_engine::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu = Gpu::new_blocking(GpuInit::default()).context("no usable GPU adapter")?;
    let config = ContextConfig::default();

    let display = TargetTextures::new(&gpu, config.display_target());
    let offscreen = TargetTextures::new(&gpu, RenderTarget::offscreen(256, 256));

    let mut gl = GlContext::new(WgpuHw::new(&gpu), config);

    // Display: dark blue background, then a red quarter through the scissor.
    gl.set_clear_color(0.05, 0.05, 0.2, 1.0);
    gl.set_clear_depth(1.0);
    gl.set_clear_stencil(0);
    gl.clear(GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT | GL_STENCIL_BUFFER_BIT)?;

    gl.enable(GL_SCISSOR_TEST)?;
    gl.set_scissor(0, 0, 480, 272)?;
    gl.set_clear_color(0.8, 0.1, 0.1, 1.0);
    gl.clear(GL_COLOR_BUFFER_BIT)?;
    gl.disable(GL_SCISSOR_TEST)?;

    // Culling state survives the clear untouched.
    gl.enable(GL_CULL_FACE)?;
    gl.set_cull_face(GL_BACK)?;
    gl.set_viewport(100, 50, 320, 240)?;

    let drawn = gl.hw_mut().end_scene(&display)?;
    log::info!("display: {drawn} draws, {} pipelines", gl.hw().cached_pipelines());
    report("display", &read_color(&gpu, &display)?, &[(10, 10), (10, 534), (950, 534)]);

    // Offscreen: the scissor clips the same stored rows the viewport draws into.
    gl.bind_render_target(offscreen.target());
    gl.set_clear_color(0.1, 0.7, 0.2, 1.0);
    gl.clear(GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT)?;

    gl.enable(GL_SCISSOR_TEST)?;
    gl.set_scissor(0, 0, 64, 64)?;
    gl.set_clear_color(1.0, 1.0, 1.0, 1.0);
    gl.clear(GL_COLOR_BUFFER_BIT)?;

    let drawn = gl.hw_mut().end_scene(&offscreen)?;
    log::info!("offscreen: {drawn} draws");
    report("offscreen", &read_color(&gpu, &offscreen)?, &[(10, 10), (10, 250), (200, 200)]);

    if let Some(err) = gl.peek_error() {
        log::warn!("context error latched: {err:?}");
    }
    Ok(())
}

fn report(name: &str, image: &fixgl_engine::device::ColorImage, samples: &[(u32, u32)]) {
    for &(x, y) in samples {
        match image.pixel(x, y) {
            Some(px) => log::info!("{name} ({x},{y}) = {px:?}"),
            None => log::warn!("{name} ({x},{y}) outside {}x{}", image.width, image.height),
        }
    }
}
