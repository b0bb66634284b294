use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::calendar::{OpacityTier, RenderableEvent};
use crate::theme;

pub struct DayView;

impl DayView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        events: &[&RenderableEvent],
        scroll: usize,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count_str = match events.len() {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {} events ", n),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No events").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let items: Vec<ListItem> = events
            .iter()
            .skip(scroll)
            .map(|ev| format_event(ev))
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn format_event(ev: &RenderableEvent) -> ListItem<'static> {
    let opacity = ev.opacity_tier.opacity();
    let indicator = Span::styled("  ", Style::default().bg(ev.color.to_color(opacity)));

    let title_style = match ev.opacity_tier {
        OpacityTier::Key => Style::default().add_modifier(Modifier::BOLD),
        OpacityTier::Ordinary => theme::current().dim,
    };

    ListItem::new(Line::from(vec![
        indicator,
        Span::raw(" "),
        Span::styled(ev.title.clone(), title_style),
        Span::styled(format!("  {}", ev.currency), theme::current().dim),
    ]))
}
