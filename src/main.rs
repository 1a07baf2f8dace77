//! Shiftrow: row-shifting match-three puzzle in the terminal.

mod app;
mod input;
mod logging;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use shiftrow::FieldConfig;
use clap::builder::RangedU64ValueParser;
use shiftrow::config::{
    DEFAULT_CELL_SIZE, DEFAULT_COLORS, DEFAULT_HEIGHT, DEFAULT_STEP, DEFAULT_WIDTH, MAX_HEIGHT,
    MAX_WIDTH,
};

/// Options derived from CLI that drive the session (board setup, pacing, effects).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub field: FieldConfig,
    /// Fixed seed; `None` draws a fresh one for every new board.
    pub seed: Option<u64>,
    pub tick_rate: f64,
    pub frame_rate: f64,
    pub no_animation: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        logging::init(path, args.log_level)
            .with_context(|| format!("opening log file {}", path.display()))?;
    }
    let theme = match theme::Theme::load(args.theme.as_deref(), args.palette) {
        Ok(t) => t,
        Err(e) => {
            log::warn!("theme not loaded, using default: {e}");
            theme::Theme::default_for_palette(args.palette)
        }
    };
    let field = FieldConfig::new(args.width, args.height, args.colors)
        .with_animation(args.cell_size, args.step);
    field.validate().context("invalid field setup")?;
    let config = GameConfig {
        field,
        seed: args.seed,
        tick_rate: args.tick_rate.max(1.0),
        frame_rate: args.frame_rate.max(1.0),
        no_animation: args.no_animation,
    };
    let mut app = App::new(config, theme)?;
    app.run()?;
    Ok(())
}

/// Row-shifting match-three puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "shiftrow",
    version,
    about = "Row-shifting match-three puzzle in the terminal. Slide rows to line up three or more blocks of one colour.",
    long_about = "Shiftrow is a terminal puzzle game.\n\n\
        Pick a row with the cursor and slide it left or right; blocks leaving one edge come \
        back in on the other. Three or more blocks of one colour in a line pop, and the blocks \
        above fall into the gaps.\n\n\
        CONTROLS:\n  Up/Down  (w/s, k/j)  Move cursor   Left/Right (a/d, h/l)  Shift row\n  \
        P  Pause   R  New board   Q / Esc  Quit menu\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Field width in columns.
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_name = "COLS",
          value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_WIDTH as u64))]
    pub width: usize,

    /// Field height in rows, including the empty bottom buffer row.
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_name = "ROWS",
          value_parser = RangedU64ValueParser::<usize>::new().range(2..=MAX_HEIGHT as u64))]
    pub height: usize,

    /// Number of block colours.
    #[arg(long, default_value_t = DEFAULT_COLORS, value_name = "N",
          value_parser = clap::value_parser!(u8).range(1..=6))]
    pub colors: u8,

    /// Board seed. Without it every new board gets a random one.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Animation units per cell.
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE, value_name = "UNITS")]
    pub cell_size: i32,

    /// Animation units a block moves per tick; must divide --cell-size.
    #[arg(long, default_value_t = DEFAULT_STEP, value_name = "UNITS")]
    pub step: i32,

    /// Engine ticks per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Disable the fade when a block pops.
    #[arg(long)]
    pub no_animation: bool,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Append log records to this file (the terminal is taken by the game).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,

    /// Maximum log level written to --log-file.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: log::LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
