use chrono::{Duration, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::event_chip;
use crate::calendar::CalendarView;
use crate::theme;

pub struct WeekView;

impl WeekView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        week_start: NaiveDate,
        view: &CalendarView,
    ) {
        let theme = theme::current();
        let block = Block::default()
            .title(format!(" Week of {} ", week_start.format("%b %d, %Y")))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 14 || inner.height < 2 {
            return;
        }

        let col_w = (inner.width / 7).max(1);
        let mut col_constraints = vec![Constraint::Length(col_w); 7];
        col_constraints.push(Constraint::Min(0));
        let cols = Layout::horizontal(col_constraints).split(inner);

        for day_offset in 0..7 {
            let date = week_start + Duration::days(day_offset as i64);
            let col = cols[day_offset];

            let label = if col_w >= 10 {
                date.format("%a %d").to_string()
            } else if col_w >= 5 {
                date.format("%a").to_string()
            } else {
                date.format("%d").to_string()
            };
            let style = if date == today || date == selected_date {
                theme.day_style(date == today, date == selected_date)
            } else {
                theme.header
            };

            let chip_w = col_w.saturating_sub(1) as usize;
            let mut lines = vec![Line::from(Span::styled(
                format!("{:^width$}", label, width = col_w as usize),
                style,
            ))];

            let events = view.events_on(date);
            let room = col.height.saturating_sub(1) as usize;
            if events.len() <= room {
                lines.extend(events.iter().map(|ev| event_chip(ev, chip_w)));
            } else if room > 0 {
                let shown = room - 1;
                lines.extend(events.iter().take(shown).map(|ev| event_chip(ev, chip_w)));
                lines.push(Line::from(Span::styled(
                    format!("+{} more", events.len() - shown),
                    theme.dim,
                )));
            }

            frame.render_widget(Paragraph::new(lines), col);
        }
    }
}
