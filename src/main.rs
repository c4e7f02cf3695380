use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use raylib::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod constants;
mod demos;
mod error;
mod observer;
mod panel;
mod presentation;
mod recorder;
mod registry;
mod render;
mod spring;
mod state;
mod theme;

use crate::config::{Config, ScrollConfig};
use crate::panel::Viewport;
use crate::presentation::Presentation;
use crate::recorder::Recorder;
use crate::state::Playback;

/// Scroll-driven portfolio presentation.
#[derive(Parser, Debug)]
#[command(name = "scrollfolio", version, about)]
struct Cli {
    /// TOML configuration file (window, spring, scroll and an optional custom deck)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scroll through the deck on its own and exit at the end
    #[arg(long)]
    autoplay: bool,

    /// Record an autoplay run to a video file through ffmpeg
    #[arg(long, value_name = "FILE")]
    record: Option<PathBuf>,

    /// Render width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// Render height in pixels
    #[arg(long)]
    height: Option<i32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }
    config.validate().context("invalid configuration")?;

    let registry = config.registry().context("invalid deck")?;
    let (width, height, fps) = (config.window.width, config.window.height, config.window.fps);
    info!(steps = registry.len(), width, height, fps, config = ?cli.config, "starting presentation");

    let (mut rl, thread) = raylib::init()
        .size(width / 2, height / 2)
        .title(&config.window.title)
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(fps);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let mut framebuffer = rl
        .load_render_texture(&thread, width as u32, height as u32)
        .map_err(|e| anyhow!("failed to create render texture: {e}"))?;

    let viewport = Viewport::new(width as f32, height as f32);
    let mut presentation = Presentation::new(registry, config.spring, &config.scroll, viewport);

    let mut recorder = match &cli.record {
        Some(path) => Some(Recorder::start(width, height, fps, path).context("starting ffmpeg")?),
        None => None,
    };
    let mut playback = if cli.autoplay || recorder.is_some() {
        Playback::autoplay(&config.scroll)
    } else {
        Playback::interactive()
    };

    // --- Main Loop ---
    while !rl.window_should_close() {
        // Recording renders at a fixed rate regardless of how fast frames are produced
        let dt = if recorder.is_some() { 1.0 / fps as f32 } else { rl.get_frame_time() };

        if playback.accepts_input() {
            handle_input(&rl, &mut presentation, &config.scroll);
        }
        playback.advance(dt, &mut presentation);
        presentation.update(dt);
        if playback.is_finished() {
            break;
        }

        rl.draw_texture_mode(&thread, &mut framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(&thread);
            presentation.draw(&mut d);
        });

        // Scale the framebuffer to the window; render textures are stored upside down
        let mut d = rl.begin_drawing(&thread);
        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;
        d.clear_background(Color::BLACK);
        d.draw_texture_pro(
            &framebuffer,
            Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
            Rectangle::new(0.0, 0.0, sw, sh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
        drop(d);

        if let Some(recorder) = recorder.as_mut() {
            let image = framebuffer
                .load_image()
                .map_err(|e| anyhow!("failed to read framebuffer: {e}"))?;
            recorder.write_image(&image)?;
        }
    }

    if let Some(recorder) = recorder {
        recorder.finish().context("finishing recording")?;
    }
    info!("presentation closed");
    Ok(())
}

fn handle_input(rl: &RaylibHandle, presentation: &mut Presentation, scroll: &ScrollConfig) {
    let wheel = rl.get_mouse_wheel_move();
    if wheel != 0.0 {
        presentation.scroll_by(-wheel * scroll.wheel_step);
    }

    let page = presentation.viewport().height;
    if rl.is_key_down(KeyboardKey::KEY_DOWN) {
        presentation.scroll_by(scroll.wheel_step * 0.25);
    }
    if rl.is_key_down(KeyboardKey::KEY_UP) {
        presentation.scroll_by(-scroll.wheel_step * 0.25);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_PAGE_DOWN) {
        presentation.scroll_by(page);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_PAGE_UP) {
        presentation.scroll_by(-page);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_HOME) {
        presentation.scroll_to(0.0);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_END) {
        presentation.scroll_to(presentation.max_scroll());
    }
    if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
        presentation.next_step();
    }
    if rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
        presentation.previous_step();
    }
}
