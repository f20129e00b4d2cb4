mod audio;
mod config;
mod display;
mod effects;
mod error;
mod game;
mod geometry;
mod tuner;
mod util;

use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

use config::Config;
use display::{draw_text, resolve_key, Display, InputEvent, PixelBuffer, RenderTarget};
use error::GameError;
use game::{Controls, FrameStatus, Game};
use util::{FpsCounter, FramePacer, SessionClock};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON config file; built-in defaults are used when omitted
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed the random source for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Run without sound and skip loading sound assets
    #[arg(long)]
    no_audio: bool,

    /// Disable VSync and pace frames with a sleep instead
    #[arg(long)]
    no_vsync: bool,

    /// Write the effective config as JSON and exit
    #[arg(long, value_name = "PATH")]
    dump_config: Option<PathBuf>,
}

fn main() -> Result<(), GameError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if args.no_audio {
        config.audio.enabled = false;
    }
    if args.no_vsync {
        config.display.vsync = false;
    }
    config.validate()?;

    if let Some(path) = &args.dump_config {
        config.save(path)?;
        info!("Config written to {}", path.display());
        return Ok(());
    }

    let start_key = resolve_key(&config.controls.start_key)?;
    let action_key = resolve_key(&config.controls.action_key)?;
    let quit_key = resolve_key(&config.controls.quit_key)?;
    let fps_key = resolve_key(&config.controls.fps_key)?;

    // Sound assets load before the window opens so a missing file fails fast
    let mut audio = audio::open(&config.audio)?;

    let (width, height) = (config.display.width, config.display.height);
    let (mut display, texture_creator) = Display::with_options(
        &config.display.title,
        width,
        height,
        config.display.window_scale,
        config.display.vsync,
    )?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut buffer = PixelBuffer::with_size(width, height);

    let rng = match args.seed {
        Some(seed) => {
            info!("Seed: {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        },
        None => ChaCha8Rng::from_entropy(),
    };
    let mut game = Game::new(&config, rng, audio.as_mut());

    info!("=== access tuner ===");
    info!("Resolution: {}x{} (window x{})", width, height, config.display.window_scale);
    if config.display.vsync {
        info!("VSync: ON. Use --no-vsync to pace with a timer.");
    } else {
        info!("VSync: OFF, pacing to {} fps", config.display.fps);
    }
    info!(
        "Controls: {} start, {} lock frequency, {} fps overlay, {} quit",
        config.controls.start_key, config.controls.action_key, config.controls.fps_key, config.controls.quit_key
    );

    let clock = SessionClock::start();
    let mut pacer = FramePacer::new(if config.display.vsync { 0 } else { config.display.fps });
    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;

    'main: loop {
        fps_counter.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) if key == quit_key => break 'main,
                InputEvent::KeyDown(key) if key == fps_key => show_fps = !show_fps,
                InputEvent::KeyDown(_) => {},
            }
        }

        let controls = Controls {
            start: display.is_key_down(start_key),
            action: display.is_key_down(action_key),
        };
        let status = game.frame(&mut buffer, controls, clock.elapsed_millis(), audio.as_mut())?;
        if status == FrameStatus::Finished {
            info!("Session finished");
            break;
        }

        // FPS overlay with a drop shadow, inside the screen border
        if show_fps {
            let fps_text = fps_counter.summary();
            let y = buffer.height() as i32 - 20;
            draw_text(&mut buffer, 13, y + 1, &fps_text, 0, 0, 0);
            draw_text(&mut buffer, 12, y, &fps_text, 255, 255, 0);
        }

        display.present(&mut target, &buffer)?;
        pacer.wait();
    }

    info!("Quit with slots validated: {:?}", game.puzzle().validated());
    audio.stop();
    Ok(())
}
