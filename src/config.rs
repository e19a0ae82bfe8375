/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to the classic 30×20 board, 150ms ticks and 10 points per
/// food if the file is missing or incomplete.

use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;
use unicode_width::UnicodeWidthChar;

/// Board sides outside this range either put the spawn cell in a wall or
/// overflow the grid arithmetic.
const BOARD_SIDE_RANGE: std::ops::RangeInclusive<i32> = 2..=1000;

/// Upper bound on `board.max_length`; the body is reserved up front.
const MAX_SNAKE_LENGTH: usize = 100_000;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub speed: SpeedConfig,
    pub scoring: ScoringConfig,
    pub glyphs: Glyphs,
    pub gamepad: GamepadConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    pub max_length: usize,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct ScoringConfig {
    pub food_reward: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub wall: char,
    pub food: char,
    pub body: char,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub pause: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// `None` disables logging entirely.
    pub file: Option<PathBuf>,
    pub level: LevelFilter,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    scoring: TomlScoring,
    #[serde(default)]
    glyphs: TomlGlyphs,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    logging: TomlLogging,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_width")]
    width: i32,
    #[serde(default = "default_height")]
    height: i32,
    #[serde(default = "default_max_length")]
    max_length: usize,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlScoring {
    #[serde(default = "default_food_reward")]
    food_reward: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGlyphs {
    #[serde(default = "default_wall")]
    wall: String,
    #[serde(default = "default_food")]
    food: String,
    #[serde(default = "default_body")]
    body: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLogging {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_width() -> i32 { 30 }
fn default_height() -> i32 { 20 }
fn default_max_length() -> usize { 100 }
fn default_tick_rate() -> u64 { 150 }
fn default_food_reward() -> u32 { 10 }
fn default_wall() -> String { "#".into() }
fn default_food() -> String { "*".into() }
fn default_body() -> String { "O".into() }
fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_file() -> String { "snake.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            width: default_width(),
            height: default_height(),
            max_length: default_max_length(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlScoring {
    fn default() -> Self {
        TomlScoring { food_reward: default_food_reward() }
    }
}

impl Default for TomlGlyphs {
    fn default() -> Self {
        TomlGlyphs {
            wall: default_wall(),
            food: default_food(),
            body: default_body(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            pause: default_pause(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlLogging {
    fn default() -> Self {
        TomlLogging {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default()).0
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file, missing keys or out-of-range values fall back to defaults.
    pub fn load() -> Self {
        let (cfg, warnings) = match read_config_text(&candidate_dirs()) {
            Some(text) => GameConfig::parse(&text).unwrap_or_else(|e| {
                eprintln!("Warning: config.toml parse error: {e}");
                eprintln!("Using default settings.");
                GameConfig::from_toml(TomlConfig::default())
            }),
            None => GameConfig::from_toml(TomlConfig::default()),
        };
        for w in &warnings {
            eprintln!("Warning: {w}");
        }
        cfg
    }

    /// Parse a config document. Returns the config plus any value warnings.
    pub fn parse(text: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(toml_cfg))
    }

    fn from_toml(t: TomlConfig) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let width = side_or(t.board.width, default_width(), "board.width", &mut warnings);
        let height = side_or(t.board.height, default_height(), "board.height", &mut warnings);
        let max_length = if (1..=MAX_SNAKE_LENGTH).contains(&t.board.max_length) {
            t.board.max_length
        } else {
            warnings.push(format!(
                "board.max_length must be between 1 and {MAX_SNAKE_LENGTH}, using {}",
                default_max_length(),
            ));
            default_max_length()
        };

        let tick_rate_ms = if t.speed.tick_rate_ms == 0 {
            warnings.push(format!("speed.tick_rate_ms must be positive, using {}", default_tick_rate()));
            default_tick_rate()
        } else {
            t.speed.tick_rate_ms
        };

        let glyphs = Glyphs {
            wall: glyph_or(&t.glyphs.wall, '#', "glyphs.wall", &mut warnings),
            food: glyph_or(&t.glyphs.food, '*', "glyphs.food", &mut warnings),
            body: glyph_or(&t.glyphs.body, 'O', "glyphs.body", &mut warnings),
        };

        let level = LevelFilter::from_str(t.logging.level.trim()).unwrap_or_else(|_| {
            warnings.push(format!("unknown logging.level {:?}, using info", t.logging.level));
            LevelFilter::Info
        });
        let file = match t.logging.file.trim() {
            "" => None,
            path => Some(PathBuf::from(path)),
        };

        let cfg = GameConfig {
            board: BoardConfig { width, height, max_length },
            speed: SpeedConfig { tick_rate_ms },
            scoring: ScoringConfig { food_reward: t.scoring.food_reward },
            glyphs,
            gamepad: GamepadConfig {
                pause: t.gamepad.pause,
                quit: t.gamepad.quit,
            },
            logging: LoggingConfig { file, level },
        };
        (cfg, warnings)
    }
}

fn side_or(value: i32, fallback: i32, key: &str, warnings: &mut Vec<String>) -> i32 {
    if BOARD_SIDE_RANGE.contains(&value) {
        value
    } else {
        warnings.push(format!(
            "{key} must be between {} and {}, using {fallback}",
            BOARD_SIDE_RANGE.start(),
            BOARD_SIDE_RANGE.end(),
        ));
        fallback
    }
}

/// Glyphs occupy exactly one terminal column, so only the first char is used
/// and it must be a single-width printable char.
fn glyph_or(value: &str, fallback: char, key: &str, warnings: &mut Vec<String>) -> char {
    match value.chars().next() {
        Some(c) if c.width() == Some(1) => c,
        Some(c) => {
            warnings.push(format!("{key} {c:?} is not one column wide, using {fallback:?}"));
            fallback
        }
        None => {
            warnings.push(format!("{key} is empty, using {fallback:?}"));
            fallback
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories; first readable file wins.
fn read_config_text(search_dirs: &[PathBuf]) -> Option<String> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return Some(text),
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    None
}
