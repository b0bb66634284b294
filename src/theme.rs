use std::path::PathBuf;
use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use tracing::warn;

use crate::calendar::palette::STANDARD;
use crate::config;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Get the active theme (loaded once on first call).
pub fn current() -> &'static Theme {
    THEME.get_or_init(|| Theme::load().unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    #[allow(dead_code)]
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
    /// Text drawn on top of a currency-colored chip.
    pub chip_text: Color,
}

/// The handful of colors a preset is made of; every style derives from it.
struct Palette {
    name: &'static str,
    text: Color,
    muted: Color,
    panel: Color,
    border: Color,
    today: Color,
    selected: Color,
    chip_text: Color,
}

const DEFAULT: Palette = Palette {
    name: "default",
    text: Color::White,
    muted: Color::DarkGray,
    panel: Color::DarkGray,
    border: Color::Gray,
    today: Color::Yellow,
    selected: Color::Cyan,
    chip_text: Color::Black,
};

const PRESETS: [Palette; 3] = [
    Palette {
        name: "dracula",
        text: Color::Rgb(248, 248, 242),
        muted: Color::Rgb(98, 114, 164),
        panel: Color::Rgb(68, 71, 90),
        border: Color::Rgb(68, 71, 90),
        today: Color::Rgb(189, 147, 249),
        selected: Color::Rgb(139, 233, 253),
        chip_text: Color::Rgb(40, 42, 54),
    },
    Palette {
        name: "gruvbox",
        text: Color::Rgb(235, 219, 178),
        muted: Color::Rgb(146, 131, 116),
        panel: Color::Rgb(80, 73, 69),
        border: Color::Rgb(102, 92, 84),
        today: Color::Rgb(250, 189, 47),
        selected: Color::Rgb(131, 165, 152),
        chip_text: Color::Rgb(40, 40, 40),
    },
    Palette {
        name: "nord",
        text: Color::Rgb(229, 233, 240),
        muted: Color::Rgb(76, 86, 106),
        panel: Color::Rgb(67, 76, 94),
        border: Color::Rgb(67, 76, 94),
        today: Color::Rgb(235, 203, 139),
        selected: Color::Rgb(136, 192, 208),
        chip_text: Color::Rgb(46, 52, 64),
    },
];

impl From<&Palette> for Theme {
    fn from(p: &Palette) -> Self {
        Self {
            name: p.name.to_string(),
            today: Style::default().fg(Color::Black).bg(p.today),
            selected: Style::default().fg(Color::Black).bg(p.selected),
            header: Style::default().fg(p.text).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(p.muted),
            border: Style::default().fg(p.border),
            status: Style::default().fg(p.text).bg(p.panel),
            highlight: Style::default().bg(p.panel).add_modifier(Modifier::BOLD),
            chip_text: p.chip_text,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from(&DEFAULT)
    }
}

impl Theme {
    pub fn load() -> Option<Self> {
        let path = theme_path()?;
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str::<ThemeConfig>(&content) {
            Ok(config) => Some(config.into_theme()),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring invalid theme file");
                None
            }
        }
    }

    /// Built-in preset by name, the default theme for unknown names.
    pub fn preset(name: &str) -> Self {
        PRESETS
            .iter()
            .find(|p| p.name == name)
            .map(Theme::from)
            .unwrap_or_default()
    }

    /// Style for a day cell that may be today, selected, both or neither.
    pub fn day_style(&self, is_today: bool, is_selected: bool) -> Style {
        match (is_today, is_selected) {
            (true, true) => self.today.add_modifier(Modifier::BOLD),
            (false, true) => self.selected,
            (true, false) => self.today,
            (false, false) => Style::default(),
        }
    }
}

fn theme_path() -> Option<PathBuf> {
    config::config_dir().map(|d| d.join("theme.toml"))
}

/// `theme.toml`: a preset plus optional per-style color overrides.
#[derive(Debug, Deserialize, Default)]
struct ThemeConfig {
    preset: Option<String>,
    today_fg: Option<String>,
    today_bg: Option<String>,
    selected_fg: Option<String>,
    selected_bg: Option<String>,
    header_fg: Option<String>,
    dim_fg: Option<String>,
    border_fg: Option<String>,
    status_fg: Option<String>,
    status_bg: Option<String>,
    highlight_bg: Option<String>,
    chip_fg: Option<String>,
}

impl ThemeConfig {
    fn into_theme(self) -> Theme {
        let mut theme = self.preset.as_deref().map(Theme::preset).unwrap_or_default();

        let fg = |style: &mut Style, value: &Option<String>| {
            if let Some(c) = value.as_deref().and_then(parse_color) {
                *style = style.fg(c);
            }
        };
        fg(&mut theme.today, &self.today_fg);
        fg(&mut theme.selected, &self.selected_fg);
        fg(&mut theme.header, &self.header_fg);
        fg(&mut theme.dim, &self.dim_fg);
        fg(&mut theme.border, &self.border_fg);
        fg(&mut theme.status, &self.status_fg);

        let bg = |style: &mut Style, value: &Option<String>| {
            if let Some(c) = value.as_deref().and_then(parse_color) {
                *style = style.bg(c);
            }
        };
        bg(&mut theme.today, &self.today_bg);
        bg(&mut theme.selected, &self.selected_bg);
        bg(&mut theme.status, &self.status_bg);
        bg(&mut theme.highlight, &self.highlight_bg);

        if let Some(c) = self.chip_fg.as_deref().and_then(parse_color) {
            theme.chip_text = c;
        }
        theme
    }
}

/// `#rrggbb`, one of the currency palette names (`"slateblue"`), or a basic
/// terminal color name.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let rgb = u32::from_str_radix(hex, 16).ok()?;
        return Some(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8));
    }
    let name = s.to_lowercase();
    match name.as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "yellow" => Some(Color::Yellow),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        other => STANDARD.named(other).map(|c| c.to_color(1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#1e90ff"), Some(Color::Rgb(30, 144, 255)));
        assert_eq!(parse_color(" Grey "), Some(Color::Gray));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("slateblue"), Some(Color::Rgb(106, 90, 205)));
        assert_eq!(parse_color("Red"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn non_ascii_hex_is_rejected() {
        assert_eq!(parse_color("#1\u{e9}234"), None);
        assert_eq!(parse_color("#\u{e9}\u{e9}\u{e9}"), None);
        assert_eq!(parse_color("#+12345"), None);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let config: ThemeConfig = toml::from_str(
            r##"
            preset = "nord"
            selected_bg = "#ff0000"
            chip_fg = "white"
            "##,
        )
        .unwrap();
        let theme = config.into_theme();
        assert_eq!(theme.name, "nord");
        assert_eq!(theme.selected.bg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(theme.chip_text, Color::White);
        assert_eq!(theme.today, Theme::preset("nord").today);
    }

    #[test]
    fn presets_derive_from_palette() {
        let dracula = Theme::preset("dracula");
        assert_eq!(dracula.name, "dracula");
        assert_eq!(dracula.today.bg, Some(Color::Rgb(189, 147, 249)));
        assert_eq!(dracula.status.bg, dracula.highlight.bg);
        assert_eq!(Theme::default().border.fg, Some(Color::Gray));
    }

    #[test]
    fn unknown_preset_is_default() {
        assert_eq!(Theme::preset("solarized"), Theme::default());
    }
}
