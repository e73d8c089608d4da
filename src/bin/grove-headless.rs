//! Generates the world from a resource directory and steps it on the
//! recording device.
//!
//! Usage: `grove-headless [RESOURCE_DIR] [FRAMES]`

use std::time::Duration;

use anyhow::{bail, Context};
use grove::prelude::*;
use log::{info, warn};

const DEFAULT_FRAMES: u32 = 120;
const FRAME_TIME: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "res".to_string());
    let frames = match args.next() {
        Some(arg) => arg
            .parse::<u32>()
            .with_context(|| format!("invalid frame count `{arg}`"))?,
        None => DEFAULT_FRAMES,
    };
    if !std::path::Path::new(&root).is_dir() {
        bail!("resource directory `{root}` does not exist");
    }

    let provider = FsResourceProvider::new(&root);
    let config = EngineConfig::default();
    let mut device = HeadlessDevice::new();
    let mut world = WorldGenerator::new(&provider, config)
        .with_touch_pad(true)
        .generate(&mut device)
        .with_context(|| format!("failed to generate the world from `{root}`"))?;

    let provided = ProvidedShaders::new(&provider);
    let shaders: &dyn ShaderSource = if provider.root().join("shaders").is_dir() {
        &provided
    } else {
        &BuiltinShaders
    };
    let mut render = MasterRender::new(device, shaders, config);
    render.resize(1280, 720);
    for err in render.shader_errors() {
        warn!("{err}");
    }

    // Walk forward while turning, jumping every second.
    let mut input = InputState::new();
    input.set_key(GamePadKey::Up, true);
    input.set_key(GamePadKey::Right, true);
    let mut total = Duration::ZERO;
    for frame in 0..frames {
        input.set_key(GamePadKey::X, frame % 60 == 0);
        world.update(FRAME_TIME, &mut input);
        render.device_mut().take_commands();
        render.render(&world, world.camera());
        total += render.last_frame_time();
        input.end_frame();
    }

    let player = world.player.position();
    info!(
        "{} frames, avg {:?}/frame, player at ({:.1}, {:.1}, {:.1}), {} bytes uploaded",
        render.frames(),
        total.checked_div(frames.max(1)).unwrap_or_default(),
        player.x,
        player.y,
        player.z,
        render.device().uploaded_bytes()
    );

    world.dispose(render.device_mut());
    render.dispose();
    info!(
        "released: {} models, {} textures, {} programs still live",
        render.device().live_models(),
        render.device().live_textures(),
        render.device().live_programs()
    );
    Ok(())
}
