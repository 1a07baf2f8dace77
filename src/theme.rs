//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Number of block colours a theme carries.
pub const BLOCK_COLORS: usize = 6;

/// Block palette and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Block faces by colour index: red, blue, yellow, purple, green, cyan.
    pub blocks: [Color; BLOCK_COLORS],
    /// Board background.
    pub bg: Color,
    /// Window background around the board.
    pub outer_bg: Color,
    /// Border / grid.
    pub div_line: Color,
    /// Text.
    pub main_fg: Color,
    /// Titles and the cursor markers.
    pub title: Color,
    /// Secondary text (controls help).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const ONEDARK_BLOCKS: [Color; BLOCK_COLORS] = [
    rgb(0xE06C75), // red
    rgb(0x61AFEF), // blue
    rgb(0xE5C07B), // yellow
    rgb(0xC678DD), // purple
    rgb(0x98C379), // green
    rgb(0x56B6C2), // cyan
];

const HIGH_CONTRAST_BLOCKS: [Color; BLOCK_COLORS] = [
    rgb(0xFF0000),
    rgb(0x0088FF),
    rgb(0xFFFF00),
    rgb(0xFF00FF),
    rgb(0x00FF00),
    rgb(0x00FFFF),
];

/// Blue/orange-led set that stays distinct without red/green.
const COLORBLIND_BLOCKS: [Color; BLOCK_COLORS] = [
    rgb(0xCC3311),
    rgb(0x0077BB),
    rgb(0xEE7733),
    rgb(0xEE3377),
    rgb(0x009988),
    rgb(0xBBBB00),
];

/// Theme keys read for each block colour, in priority order.
const BLOCK_KEYS: [&[&str]; BLOCK_COLORS] = [
    &["cpu_end", "temp_end"],
    &["cpu_box"],
    &["title", "cpu_mid"],
    &["net_box"],
    &["mem_box", "cpu_start"],
    &["hi_fg", "proc_misc"],
];

impl Theme {
    /// One Dark defaults (hex values from onedark.theme).
    pub fn onedark_default() -> Self {
        Self {
            blocks: ONEDARK_BLOCKS,
            bg: rgb(0x1E2127),
            outer_bg: rgb(0x282C34),
            div_line: rgb(0x3F444F),
            main_fg: rgb(0xABB2BF),
            title: rgb(0xE5C07B),
            inactive_fg: rgb(0x5C6370),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Uses One Dark when no path is given or the file does not exist.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Default theme for a palette when no file is loaded.
    pub fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Swap block colours for the high-contrast or colorblind set.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => self.blocks = HIGH_CONTRAST_BLOCKS,
            crate::Palette::Colorblind => self.blocks = COLORBLIND_BLOCKS,
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let defaults = Self::onedark_default();
        let mut blocks = defaults.blocks;
        for (slot, keys) in blocks.iter_mut().zip(BLOCK_KEYS) {
            if let Some(c) = keys.iter().find_map(|&k| get(k)) {
                *slot = c;
            }
        }
        Self {
            blocks,
            bg: get("meter_bg").unwrap_or(defaults.bg),
            outer_bg: get("main_bg").unwrap_or(defaults.outer_bg),
            div_line: get("div_line").unwrap_or(defaults.div_line),
            main_fg: get("main_fg").unwrap_or(defaults.main_fg),
            title: get("title").unwrap_or(defaults.title),
            inactive_fg: get("inactive_fg").unwrap_or(defaults.inactive_fg),
        }
    }

    /// Face colour for a block colour index.
    #[inline]
    pub fn block_color(&self, index: u8) -> Color {
        self.blocks[index as usize % BLOCK_COLORS]
    }

    /// Darker inner shade of a block face.
    pub fn block_accent(&self, index: u8) -> Color {
        darken(self.block_color(index), 50)
    }
}

/// Subtract `amount` from each channel. Named colours pass through.
pub fn darken(color: Color, amount: u8) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            r.saturating_sub(amount),
            g.saturating_sub(amount),
            b.saturating_sub(amount),
        ),
        other => other,
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let Some((_, value)) = stripped[end + 1..].split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        if !value.is_empty() {
            map.insert(key.to_string(), value.to_string());
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let digits = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(digits.to_string());
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|d| u8::from_str_radix(d, 16).ok())
            .ok_or_else(invalid)
    };
    match digits.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}
