use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{event_chip, month_name};
use crate::app::days_in_month;
use crate::calendar::{CalendarOptions, RenderableEvent};
use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MARKER: &str = "\u{25cf}";

pub type EventsByDay<'a> = BTreeMap<u32, Vec<&'a RenderableEvent>>;

pub struct MonthView;

impl MonthView {
    pub fn render<'a>(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        events: impl Iterator<Item = &'a RenderableEvent>,
        options: &CalendarOptions,
    ) {
        let theme = theme::current();
        let year = selected_date.year();
        let month = selected_date.month();

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border);
        if options.shows_title() {
            block = block
                .title(format!(" {} {} ", month_name(month), year))
                .title_style(theme.header);
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let by_day = events_by_day(events, year, month, false);
        render_month_grid(frame, inner, year, month, Some(selected_date), today, &by_day, options);
    }
}

/// Group events by day of month within `year`/`month`. With `any_year` the
/// year is not checked, and days past the end of the grid month (Feb 29 of
/// a leap year shown in a common year) move to its last day.
pub fn events_by_day<'a>(
    events: impl Iterator<Item = &'a RenderableEvent>,
    year: i32,
    month: u32,
    any_year: bool,
) -> EventsByDay<'a> {
    let last_day = days_in_month(year, month);
    let mut by_day = EventsByDay::new();
    for ev in events {
        if ev.date.month() != month || (!any_year && ev.date.year() != year) {
            continue;
        }
        by_day.entry(ev.date.day().min(last_day)).or_default().push(ev);
    }
    by_day
}

/// Draw a Sunday-first month grid into `area` (no border).
#[allow(clippy::too_many_arguments)]
pub fn render_month_grid(
    frame: &mut Frame,
    area: Rect,
    year: i32,
    month: u32,
    selected: Option<NaiveDate>,
    today: NaiveDate,
    by_day: &EventsByDay<'_>,
    options: &CalendarOptions,
) {
    let theme = theme::current();
    if area.width < 7 || area.height < 2 {
        return;
    }
    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return;
    };

    let lead = first_day.weekday().num_days_from_sunday();
    let days = days_in_month(year, month);
    let weeks = if options.fixed_week_count {
        6
    } else {
        (lead + days).div_ceil(7)
    };

    let col_w = area.width / 7;
    let rows_per_week = ((area.height - 1) / weeks as u16).max(1);
    let bottom = area.y + area.height;

    for (i, name) in DAY_NAMES.iter().enumerate() {
        let cell = Rect::new(area.x + i as u16 * col_w, area.y, col_w, 1);
        let label: String = name.chars().take(col_w as usize).collect();
        let header = Span::styled(format!("{:^width$}", label, width = col_w as usize), theme.header);
        frame.render_widget(Paragraph::new(Line::from(header)), cell);
    }

    for week in 0..weeks {
        let y = area.y + 1 + week as u16 * rows_per_week;
        if y >= bottom {
            break;
        }
        let height = rows_per_week.min(bottom - y);

        for col in 0..7u32 {
            let offset = week * 7 + col;
            if offset < lead || offset - lead >= days {
                continue;
            }
            let day = offset - lead + 1;
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            let events = by_day.get(&day).map(Vec::as_slice).unwrap_or(&[]);
            let lines = day_cell(
                date,
                events,
                selected == Some(date),
                date == today,
                col_w as usize,
                height as usize,
                options.day_max_event_rows,
            );
            let cell = Rect::new(area.x + col as u16 * col_w, y, col_w, height);
            frame.render_widget(Paragraph::new(lines), cell);
        }
    }
}

/// Lines for one day cell. A one-row cell gets colored markers next to the
/// day number; taller cells list events, capped at `max_rows` including
/// the "+n more" line.
fn day_cell(
    date: NaiveDate,
    events: &[&RenderableEvent],
    is_selected: bool,
    is_today: bool,
    width: usize,
    height: usize,
    max_rows: usize,
) -> Vec<Line<'static>> {
    let theme = theme::current();
    let number = Span::styled(format!("{:>2}", date.day()), theme.day_style(is_today, is_selected));

    if height <= 1 {
        let room = width.saturating_sub(3).min(max_rows);
        let mut spans = vec![number, Span::raw(" ")];
        for ev in events.iter().take(room) {
            let color = ev.color.to_color(ev.opacity_tier.opacity());
            spans.push(Span::styled(MARKER, Style::default().fg(color)));
        }
        if events.len() > room && room > 0 {
            spans.pop();
            spans.push(Span::styled("+", theme.dim));
        }
        return vec![Line::from(spans)];
    }

    let mut lines = vec![Line::from(number)];
    let slots = (height - 1).min(max_rows);
    if slots == 0 {
        return lines;
    }

    if events.len() <= slots {
        lines.extend(events.iter().map(|ev| event_chip(ev, width)));
    } else {
        let shown = slots - 1;
        lines.extend(events.iter().take(shown).map(|ev| event_chip(ev, width)));
        let more = format!("+{} more", events.len() - shown);
        lines.push(Line::from(Span::styled(more, theme.dim)));
    }
    lines
}
