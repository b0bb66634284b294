use ratatui::style::Color;
use serde::{Serialize, Serializer};

use super::record::EventRecord;

/// A named display color. The name is what a web calendar widget expects,
/// the RGB triple is what the terminal renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayColor {
    pub name: &'static str,
    pub rgb: (u8, u8, u8),
}

impl DisplayColor {
    pub const fn new(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self { name, rgb: (r, g, b) }
    }

    /// Terminal color at the given opacity, blended over a black background.
    pub fn to_color(self, opacity: f32) -> Color {
        let alpha = opacity.clamp(0.0, 1.0);
        let blend = |c: u8| (c as f32 * alpha).round() as u8;
        let (r, g, b) = self.rgb;
        Color::Rgb(blend(r), blend(g), blend(b))
    }

    /// CSS `rgba(...)` form, as used for translucent background bands.
    pub fn rgba(self, opacity: f32) -> String {
        let (r, g, b) = self.rgb;
        format!("rgba({}, {}, {}, {})", r, g, b, opacity.clamp(0.0, 1.0))
    }
}

impl Serialize for DisplayColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

pub const DEFAULT_COLOR: DisplayColor = DisplayColor::new("gray", 128, 128, 128);

const STANDARD_ENTRIES: [(&str, DisplayColor); 16] = [
    ("USD", DisplayColor::new("blue", 0, 0, 255)),
    ("EUR", DisplayColor::new("green", 0, 128, 0)),
    ("GBP", DisplayColor::new("red", 255, 0, 0)),
    ("JPY", DisplayColor::new("orange", 255, 165, 0)),
    ("CHF", DisplayColor::new("purple", 128, 0, 128)),
    ("AUD", DisplayColor::new("teal", 0, 128, 128)),
    ("NZD", DisplayColor::new("brown", 165, 42, 42)),
    ("CAD", DisplayColor::new("pink", 255, 192, 203)),
    ("SEK", DisplayColor::new("cyan", 0, 255, 255)),
    ("PLN", DisplayColor::new("gold", 255, 215, 0)),
    ("HUF", DisplayColor::new("lime", 0, 255, 0)),
    ("DKK", DisplayColor::new("magenta", 255, 0, 255)),
    ("CZK", DisplayColor::new("indigo", 75, 0, 130)),
    ("NOK", DisplayColor::new("olive", 128, 128, 0)),
    ("ZAR", DisplayColor::new("coral", 255, 127, 80)),
    ("BRL", DisplayColor::new("slateblue", 106, 90, 205)),
];

/// Fixed currency -> color table. Entry order is also the display order
/// of currencies in filters.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyPalette {
    entries: &'static [(&'static str, DisplayColor)],
    default: DisplayColor,
}

pub const STANDARD: CurrencyPalette = CurrencyPalette {
    entries: &STANDARD_ENTRIES,
    default: DEFAULT_COLOR,
};

impl CurrencyPalette {
    pub fn lookup(&self, currency: &str) -> DisplayColor {
        self.entries
            .iter()
            .find(|(code, _)| *code == currency)
            .map(|(_, color)| *color)
            .unwrap_or(self.default)
    }

    /// Palette entry by its color name, e.g. `"slateblue"`.
    pub fn named(&self, name: &str) -> Option<DisplayColor> {
        self.entries
            .iter()
            .map(|(_, color)| *color)
            .chain(std::iter::once(self.default))
            .find(|color| color.name == name)
    }

    pub fn position(&self, currency: &str) -> Option<usize> {
        self.entries.iter().position(|(code, _)| *code == currency)
    }
}

/// Palette color for a currency, gray when the code is not in the table.
pub fn lookup_color(currency: &str) -> DisplayColor {
    STANDARD.lookup(currency)
}

/// Distinct currencies present in `rows`: palette order first, then any
/// unknown codes in order of first appearance.
pub fn currencies_in_display_order(rows: &[EventRecord]) -> Vec<String> {
    let mut known: Vec<(usize, &str)> = Vec::new();
    let mut unknown: Vec<&str> = Vec::new();

    for row in rows {
        let code = row.currency.as_str();
        match STANDARD.position(code) {
            Some(pos) => {
                if !known.iter().any(|(_, c)| *c == code) {
                    known.push((pos, code));
                }
            }
            None => {
                if !unknown.contains(&code) {
                    unknown.push(code);
                }
            }
        }
    }

    known.sort_by_key(|(pos, _)| *pos);
    known
        .into_iter()
        .map(|(_, code)| code)
        .chain(unknown)
        .map(str::to_string)
        .collect()
}
