use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame,
};

use super::month_name;
use super::month_view::{events_by_day, render_month_grid};
use crate::calendar::{CalendarOptions, MonthBucket};
use crate::theme;

const COLS_PER_ROW: usize = 3;

/// Twelve small month panels, three per row.
pub struct YearGrid;

impl YearGrid {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        year: i32,
        selected_date: NaiveDate,
        today: NaiveDate,
        buckets: &[MonthBucket],
    ) {
        let theme = theme::current();
        let block = Block::default()
            .title(format!(" Year Overview: {} ", year))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let row_count = buckets.len().div_ceil(COLS_PER_ROW);
        let rows = Layout::vertical(vec![Constraint::Ratio(1, row_count.max(1) as u32); row_count]).split(inner);

        for (row_idx, row_buckets) in buckets.chunks(COLS_PER_ROW).enumerate() {
            let cols = Layout::horizontal(vec![Constraint::Ratio(1, COLS_PER_ROW as u32); COLS_PER_ROW])
                .split(rows[row_idx]);
            for (bucket, cell) in row_buckets.iter().zip(cols.iter()) {
                render_panel(frame, *cell, year, selected_date, today, bucket);
            }
        }
    }
}

fn render_panel(
    frame: &mut Frame,
    area: Rect,
    year: i32,
    selected_date: NaiveDate,
    today: NaiveDate,
    bucket: &MonthBucket,
) {
    let theme = theme::current();
    let options = CalendarOptions::mini(year, bucket.month);
    let is_current = selected_date.year() == year && selected_date.month() == bucket.month;

    let count = match bucket.events.len() {
        0 => String::new(),
        n => format!(" {} ", n),
    };
    let block = Block::default()
        .title(format!(" {} {} ", month_name(bucket.month), year))
        .title_style(if is_current { theme.highlight } else { theme.header })
        .title_bottom(Line::from(Span::styled(count, theme.dim)))
        .borders(Borders::ALL)
        .border_style(theme.border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Buckets are already filtered; with loose year matching they hold
    // events from other years too.
    let by_day = events_by_day(bucket.events.iter(), year, bucket.month, true);
    let selected = is_current.then_some(selected_date);
    render_month_grid(frame, inner, year, bucket.month, selected, today, &by_day, &options);
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::calendar::{build_events, CalendarView, EventRecord, ViewConfig, ViewMode, YearSelection};

    #[test]
    fn renders_all_twelve_months() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let rows = vec![EventRecord::new(day, "USD", "CPI")];
        let config = ViewConfig::new(["USD"], ViewMode::YearGrid).with_year(YearSelection::Year(2025));
        let CalendarView::YearGrid(buckets) = build_events(&rows, &config) else {
            panic!("expected year grid");
        };

        let mut terminal = Terminal::new(TestBackend::new(120, 60)).unwrap();
        terminal
            .draw(|frame| YearGrid::render(frame, frame.area(), 2025, day, day, &buckets))
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Year Overview: 2025"));
        for month in 1..=12 {
            assert!(content.contains(&format!("{} 2025", month_name(month))));
        }
    }
}
