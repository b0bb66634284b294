pub mod currency_bar;
pub mod day_view;
pub mod month_view;
pub mod status_bar;
pub mod week_view;
pub mod year_grid;

pub use currency_bar::CurrencyBar;
pub use day_view::DayView;
pub use month_view::MonthView;
pub use status_bar::StatusBar;
pub use week_view::WeekView;
pub use year_grid::YearGrid;

use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::calendar::{OpacityTier, RenderableEvent};
use crate::theme;

/// Key-tier events sit on a solid block of their currency color. Ordinary
/// ones get the faded color as background and the full color as text.
pub fn event_style(ev: &RenderableEvent) -> Style {
    match ev.opacity_tier {
        OpacityTier::Key => Style::default()
            .fg(theme::current().chip_text)
            .bg(ev.color.to_color(1.0)),
        OpacityTier::Ordinary => Style::default()
            .fg(ev.color.to_color(1.0))
            .bg(ev.color.to_color(ev.opacity_tier.opacity())),
    }
}

/// An event title clipped and padded to exactly `width` columns.
pub fn event_chip(ev: &RenderableEvent, width: usize) -> Line<'static> {
    let title: String = ev.title.chars().take(width).collect();
    Line::from(Span::styled(format!("{:<width$}", title, width = width), event_style(ev)))
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
