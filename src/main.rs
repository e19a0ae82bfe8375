/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::{error, info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simplelog::WriteLogger;

use config::{GameConfig, LoggingConfig};
use domain::entity::Direction;
use sim::event::GameEvent;
use sim::step;
use sim::world::GameState;
use ui::gamepad::GamepadState;
use ui::input::{CombinedInput, InputSource, InputState};
use ui::renderer::{Renderer, Screen};
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Keys still held from the last move must not dismiss the game-over screen.
const ACK_GRACE: Duration = Duration::from_millis(400);

/// How a session ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Outcome {
    Crashed,
    Quit,
}

fn main() {
    let config = GameConfig::load();
    init_logging(&config.logging);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut rng = StdRng::seed_from_u64(seed);
    info!(
        "starting: board {}x{}, max length {}, tick {}ms, seed {seed}",
        config.board.width, config.board.height,
        config.board.max_length, config.speed.tick_rate_ms,
    );

    let mut world = GameState::new(&config, &mut rng);
    let mut renderer = Renderer::new(config.glyphs);

    let enhanced_keys = match renderer.init() {
        Ok(e) => e,
        Err(e) => {
            error!("terminal init failed: {e}");
            eprintln!("Terminal init failed: {e}");
            // Leave the terminal usable even if init stopped halfway
            let _ = renderer.cleanup();
            return;
        }
    };
    info!("key release events: {}", if enhanced_keys { "reported" } else { "timeout-based" });

    let mut keyboard = InputState::new();
    keyboard.honor_release = enhanced_keys;
    let mut gamepad = GamepadState::new();
    gamepad.load_button_config(&config.gamepad);
    if gamepad.connected {
        info!("gamepad detected");
    }
    let mut input = CombinedInput { primary: keyboard, secondary: gamepad };

    let sound = SoundEngine::new();
    if sound.is_none() {
        warn!("no audio output, sound disabled");
    }

    let result = game_loop(&mut world, &mut renderer, &mut input, &mut rng, sound.as_ref(), &config);

    if let Ok(Outcome::Crashed) = result {
        wait_for_ack(&mut input);
    }

    if let Err(e) = renderer.cleanup() {
        error!("terminal cleanup failed: {e}");
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(outcome) => info!("session ended ({outcome:?}), final score {}", world.score),
        Err(e) => {
            error!("game error: {e}");
            eprintln!("Game error: {e}");
        }
    }

    println!();
    println!("Game Over!");
    println!("Final Score: {}", world.score);
}

/// Route `log` output to a file; the terminal belongs to the game.
fn init_logging(cfg: &LoggingConfig) {
    let path = match &cfg.file {
        Some(p) if cfg.level != LevelFilter::Off => p,
        _ => return,
    };
    match File::create(path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(cfg.level, simplelog::Config::default(), file) {
                eprintln!("Warning: logger init failed: {e}");
            }
        }
        Err(e) => eprintln!("Warning: could not create log file {}: {e}", path.display()),
    }
}

fn game_loop<S: Screen, I: InputSource, R: Rng>(
    world: &mut GameState,
    renderer: &mut S,
    input: &mut I,
    rng: &mut R,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let mut last_tick = Instant::now();
    // Latest direction seen since the previous tick
    let mut pending: Option<Direction> = None;

    renderer.render(world)?;

    loop {
        input.update();

        if input.quit_pressed() {
            info!("quit requested at tick {}", world.tick);
            return Ok(Outcome::Quit);
        }
        if input.pause_pressed() {
            world.toggle_pause();
            info!("{}", if world.paused { "paused" } else { "resumed" });
            renderer.render(world)?;
        }
        if let Some(dir) = input.poll_direction() {
            pending = Some(dir);
        }

        if last_tick.elapsed() >= tick_rate {
            if !world.paused {
                let events = step::advance(world, pending.take(), rng);
                process_events(sound, &events, world);
                renderer.render(world)?;
                if world.game_over {
                    return Ok(Outcome::Crashed);
                }
            }
            last_tick = Instant::now();
        }

        std::thread::sleep(FRAME_SLEEP);
    }
}

fn process_events(sound: Option<&SoundEngine>, events: &[GameEvent], world: &GameState) {
    for event in events {
        match event {
            GameEvent::FoodEaten { at, grew } => {
                if let Some(sfx) = sound { sfx.play_eat(); }
                info!("food eaten at ({}, {}), score {}, length {}", at.x, at.y, world.score, world.snake.len());
                if !grew {
                    info!("snake at capacity ({}), growth skipped", world.snake.capacity());
                }
            }
            GameEvent::FoodSpawned { at } => {
                log::debug!("food spawned at ({}, {})", at.x, at.y);
            }
            GameEvent::WallHit { at } => {
                if let Some(sfx) = sound { sfx.play_crash(); }
                info!("hit wall at ({}, {}) on tick {}, final score {}", at.x, at.y, world.tick, world.score);
            }
        }
    }
}

/// Block on the game-over screen until a fresh key or button press.
fn wait_for_ack<I: InputSource>(input: &mut I) {
    std::thread::sleep(ACK_GRACE);
    input.update(); // discard anything pressed during the crash
    loop {
        input.update();
        if input.acknowledged() {
            return;
        }
        std::thread::sleep(FRAME_SLEEP);
    }
}
