use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::calendar::lookup_color;
use crate::theme;

/// One toggle button per currency, drawn in its palette color.
pub struct CurrencyBar;

impl CurrencyBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        currencies: &[String],
        is_selected: impl Fn(&str) -> bool,
        cursor: Option<usize>,
    ) {
        let theme = theme::current();
        let mut spans = vec![Span::styled(" Currencies ", theme.header)];

        if currencies.is_empty() {
            spans.push(Span::styled("(none loaded)", theme.dim));
        }

        for (i, code) in currencies.iter().enumerate() {
            let color = lookup_color(code).to_color(1.0);
            let mut style = if is_selected(code) {
                Style::default()
                    .fg(theme.chip_text)
                    .bg(color)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };
            let (open, close) = if cursor == Some(i) {
                style = style.add_modifier(Modifier::UNDERLINED);
                ("[", "]")
            } else {
                (" ", " ")
            };
            spans.push(Span::styled(open, theme.dim));
            spans.push(Span::styled(format!(" {} ", code), style));
            spans.push(Span::styled(close, theme.dim));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
