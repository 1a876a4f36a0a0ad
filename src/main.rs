//! Escape from Celestria headless runner
//!
//! Loads the level data, then drives the simulation with a fixed-timestep
//! accumulator. With `--demo-seed` a seeded stream of key presses plays the
//! game; without it the world just runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use celestria::audio::{AudioManager, AudioRequest};
use celestria::dialog;
use celestria::consts::*;
use celestria::sim::{DataDir, Key, KeyAction, Modifiers, World, tick};
use celestria::{Settings, TutorialClock};

#[derive(Parser, Debug)]
#[command(name = "celestria")]
#[command(about = "Run the Escape from Celestria simulation without a window")]
struct Cli {
    /// Directory holding levels/, dialog/ and audio/
    #[arg(long)]
    data: Option<PathBuf>,

    /// Level to start on instead of the start menu
    #[arg(long)]
    level: Option<u32>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// Play with seeded random key presses
    #[arg(long)]
    demo_seed: Option<u64>,

    /// Settings file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Clock for the tutorial's reading delay: `wall-clock` or `simulation`
    #[arg(long)]
    tutorial_clock: Option<String>,

    /// Skip the audio asset check
    #[arg(long)]
    no_audio: bool,
}

const DEMO_KEYS: [Key; 9] = [
    Key::A,
    Key::D,
    Key::Left,
    Key::Right,
    Key::Space,
    Key::J,
    Key::H,
    Key::Enter,
    Key::Down,
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    log::info!("Escape from Celestria starting...");

    let mut settings = Settings::load(&cli.settings);
    if let Some(data) = cli.data {
        settings.data_dir = data;
    }
    if let Some(name) = cli.tutorial_clock.as_deref() {
        settings.tutorial_clock = TutorialClock::from_str(name)
            .with_context(|| format!("unknown tutorial clock {name:?}"))?;
    }
    log::info!(
        "Tutorial delay: {:.1}s on the {} clock",
        settings.tutorial_gate_secs,
        settings.tutorial_clock.as_str()
    );

    let mut audio = if cli.no_audio {
        AudioManager::silent()
    } else {
        AudioManager::open(&settings.data_dir.join("audio"))
            .context("audio initialisation failed")?
    };
    audio.set_master_volume(settings.master_volume);
    audio.set_muted(settings.muted);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_music_volume(settings.music_volume);

    let data = DataDir::new(settings.data_dir.clone());
    let mut world = World::new(settings, Box::new(data), audio);
    if let Some(level) = cli.level {
        world.goto_level(level);
    }

    let mut rng = cli.demo_seed.map(Pcg32::seed_from_u64);
    let total_ms = cli.seconds * 1000.0;
    let mut elapsed_ms = 0.0;
    let mut accumulator = 0.0;
    let mut frames = 0u64;
    let mut last_line = String::new();

    while elapsed_ms < total_ms && !world.is_over() {
        // Uneven frame times, like a real display loop
        let frame_ms = match rng.as_mut() {
            Some(rng) => rng.random_range(8.0..40.0),
            None => SIM_DT_MS,
        };
        elapsed_ms += frame_ms;
        accumulator += frame_ms.min(100.0);

        if let Some(rng) = rng.as_mut() {
            demo_input(&mut world, rng);
        }

        let mut substeps = 0;
        while accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            tick(&mut world, SIM_DT_MS);
            accumulator -= SIM_DT_MS;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            accumulator = 0.0;
        }

        let said = world
            .dialog
            .speech_entity()
            .and_then(|speech| dialog::current_line(&world.registry, speech));
        if let Some((speaker, text)) = said {
            if text != last_line {
                log::info!("{speaker:?}: {text}");
                last_line = text.to_string();
            }
        }

        for request in world.audio.drain() {
            match request {
                AudioRequest::Sound { effect, volume } => {
                    log::debug!("sound {effect:?} at {volume:.2}")
                }
                AudioRequest::Music { track, looping, volume } => {
                    log::debug!("music {track:?} (loop: {looping}) at {volume:.2}")
                }
            }
        }
        frames += 1;
    }

    log::info!(
        "Stopped after {frames} frames on level {} with {} hp, {} bullets",
        world.level.current,
        world.level.hp,
        world.level.bullets
    );
    Ok(())
}

/// Occasionally press or release one of the keys a player would use
fn demo_input(world: &mut World, rng: &mut Pcg32) {
    if rng.random_range(0..10) != 0 {
        return;
    }
    let key = DEMO_KEYS[rng.random_range(0..DEMO_KEYS.len())];
    let action = if rng.random_bool(0.6) {
        KeyAction::Press
    } else {
        KeyAction::Release
    };
    world.on_key(key, action, Modifiers::default());
}
