use std::collections::BTreeSet;

use chrono::{Datelike, Duration, Local, NaiveDate};
use tracing::debug;

use crate::calendar::{
    build_events, currencies_in_display_order, CalendarView, EventRecord, ViewConfig, ViewMode,
    YearSelection,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
}

/// What the user has picked so far. Owned by the session and turned into a
/// fresh `ViewConfig` on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub currencies: BTreeSet<String>,
    pub year: YearSelection,
    pub view_mode: ViewMode,
    pub prefix_currency: bool,
    pub classify_key_events: bool,
    pub strict_year_match: bool,
    pub pin_year: bool,
}

pub struct App {
    pub running: bool,
    pub input_mode: InputMode,
    pub selection: Selection,
    /// Currencies present in the data, in display order.
    pub currencies: Vec<String>,
    pub filter_cursor: usize,
    pub years: Vec<i32>,
    pub key_events: Vec<String>,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub view: CalendarView,
    pub day_scroll: usize,
    pub show_help: bool,
    pub status_message: Option<String>,
    rows: Vec<EventRecord>,
}

impl App {
    pub fn new(
        rows: Vec<EventRecord>,
        mut selection: Selection,
        years: Vec<i32>,
        key_events: Vec<String>,
    ) -> Self {
        let today = Local::now().date_naive();
        let currencies = currencies_in_display_order(&rows);

        // Nothing picked: start with the first currency in display order.
        if selection.currencies.is_empty() {
            if let Some(first) = currencies.first() {
                selection.currencies.insert(first.clone());
            }
        }

        let selected_date = match selection.year {
            YearSelection::Year(year) if year != today.year() => date_in_year(today, year),
            _ => today,
        };

        let mut app = Self {
            running: true,
            input_mode: InputMode::Normal,
            selection,
            currencies,
            filter_cursor: 0,
            years,
            key_events,
            selected_date,
            today,
            view: CalendarView::Events(Vec::new()),
            day_scroll: 0,
            show_help: false,
            status_message: None,
            rows,
        };
        app.refresh_events();
        app
    }

    pub fn view_config(&self) -> ViewConfig {
        let mut config = ViewConfig::new(self.selection.currencies.iter().cloned(), self.selection.view_mode)
            .with_year(self.selection.year);
        config.pin_year = self.selection.pin_year;
        config.prefix_currency = self.selection.prefix_currency;
        config.classify_key_events = self.selection.classify_key_events;
        config.key_events = self.key_events.clone();
        config.strict_year_match = self.selection.strict_year_match;
        config.today = self.today;
        config
    }

    pub fn refresh_events(&mut self) {
        self.view = build_events(&self.rows, &self.view_config());
        debug!(
            view = self.selection.view_mode.label(),
            currencies = ?self.selection.currencies,
            events = self.view.len(),
            "view rebuilt"
        );
        if self.view.is_empty() {
            debug!("no events match the current selection");
        }
    }

    pub fn year(&self) -> i32 {
        self.selection.year.resolve(self.today)
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.selection.view_mode == mode {
            return;
        }
        self.selection.view_mode = mode;
        self.day_scroll = 0;
        self.refresh_events();
    }

    pub fn week_start(&self) -> NaiveDate {
        let offset = self.selected_date.weekday().num_days_from_sunday() as i64;
        self.selected_date - Duration::days(offset)
    }

    pub fn next_day(&mut self) {
        self.selected_date = self.selected_date.succ_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn prev_day(&mut self) {
        self.selected_date = self.selected_date.pred_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn next_week(&mut self) {
        self.selected_date += Duration::weeks(1);
        self.on_date_changed();
    }

    pub fn prev_week(&mut self) {
        self.selected_date -= Duration::weeks(1);
        self.on_date_changed();
    }

    pub fn next_month(&mut self) {
        let (year, month) = match self.selected_date.month() {
            12 => (self.selected_date.year() + 1, 1),
            m => (self.selected_date.year(), m + 1),
        };
        self.selected_date = clamp_date(year, month, self.selected_date.day()).unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn prev_month(&mut self) {
        let (year, month) = match self.selected_date.month() {
            1 => (self.selected_date.year() - 1, 12),
            m => (self.selected_date.year(), m - 1),
        };
        self.selected_date = clamp_date(year, month, self.selected_date.day()).unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.selected_date = self.today;
        self.on_date_changed();
    }

    fn on_date_changed(&mut self) {
        self.day_scroll = 0;
    }

    pub fn scroll_day_down(&mut self) {
        let count = self.view.events_on(self.selected_date).len();
        if self.day_scroll + 1 < count {
            self.day_scroll += 1;
        }
    }

    pub fn scroll_day_up(&mut self) {
        self.day_scroll = self.day_scroll.saturating_sub(1);
    }

    /// Step through the configured years, wrapping at either end.
    pub fn cycle_year(&mut self, forward: bool) {
        if self.years.is_empty() {
            return;
        }
        let current = self.year();
        let next = match self.years.iter().position(|y| *y == current) {
            Some(i) if forward => self.years[(i + 1) % self.years.len()],
            Some(i) => self.years[(i + self.years.len() - 1) % self.years.len()],
            None => self.years[0],
        };
        self.selection.year = YearSelection::Year(next);
        self.selected_date = date_in_year(self.selected_date, next);
        self.day_scroll = 0;
        self.refresh_events();
        self.status_message = Some(format!("Year {}", next));
    }

    // ── currency filter ──

    pub fn enter_filter(&mut self) {
        self.input_mode = InputMode::Filter;
    }

    pub fn leave_filter(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn filter_next(&mut self) {
        if !self.currencies.is_empty() {
            self.filter_cursor = (self.filter_cursor + 1) % self.currencies.len();
        }
    }

    pub fn filter_prev(&mut self) {
        if !self.currencies.is_empty() {
            self.filter_cursor = (self.filter_cursor + self.currencies.len() - 1) % self.currencies.len();
        }
    }

    pub fn toggle_currency(&mut self) {
        let Some(code) = self.currencies.get(self.filter_cursor).cloned() else {
            return;
        };
        if !self.selection.currencies.remove(&code) {
            self.selection.currencies.insert(code);
        }
        self.refresh_events();
    }

    pub fn select_all_currencies(&mut self) {
        self.selection.currencies = self.currencies.iter().cloned().collect();
        self.refresh_events();
    }

    pub fn clear_currencies(&mut self) {
        self.selection.currencies.clear();
        self.refresh_events();
    }

    pub fn is_currency_selected(&self, code: &str) -> bool {
        self.selection.currencies.contains(code)
    }

    // ── display toggles ──

    pub fn toggle_prefix(&mut self) {
        self.selection.prefix_currency = !self.selection.prefix_currency;
        self.refresh_events();
        self.status_message = Some(on_off("Currency prefix", self.selection.prefix_currency));
    }

    pub fn toggle_key_events(&mut self) {
        self.selection.classify_key_events = !self.selection.classify_key_events;
        self.refresh_events();
        self.status_message = Some(on_off("Key event emphasis", self.selection.classify_key_events));
    }

    pub fn toggle_strict_year(&mut self) {
        self.selection.strict_year_match = !self.selection.strict_year_match;
        self.refresh_events();
        self.status_message = Some(on_off("Strict year match", self.selection.strict_year_match));
    }
}

fn on_off(label: &str, on: bool) -> String {
    format!("{}: {}", label, if on { "on" } else { "off" })
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// `day` of the given month, pulled back to the month's last day if needed.
pub fn clamp_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

fn date_in_year(date: NaiveDate, year: i32) -> NaiveDate {
    clamp_date(year, date.month(), date.day()).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rows() -> Vec<EventRecord> {
        vec![
            EventRecord::new(date(2025, 1, 15), "USD", "NFP"),
            EventRecord::new(date(2025, 2, 1), "EUR", "Holiday"),
            EventRecord::new(date(2026, 3, 1), "USD", "CPI"),
            EventRecord::new(date(2025, 3, 20), "GBP", "Monetary Policy"),
        ]
    }

    fn selection(currencies: &[&str], year: YearSelection) -> Selection {
        Selection {
            currencies: currencies.iter().map(|c| c.to_string()).collect(),
            year,
            view_mode: ViewMode::Month,
            prefix_currency: true,
            classify_key_events: false,
            strict_year_match: true,
            pin_year: false,
        }
    }

    fn app(currencies: &[&str]) -> App {
        App::new(
            rows(),
            selection(currencies, YearSelection::Year(2025)),
            vec![2025, 2026, 2027],
            vec!["NFP".to_string(), "CPI".to_string()],
        )
    }

    #[test]
    fn defaults_to_first_currency_in_display_order() {
        let app = app(&[]);
        assert_eq!(app.currencies, vec!["USD", "EUR", "GBP"]);
        assert!(app.is_currency_selected("USD"));
        assert_eq!(app.selection.currencies.len(), 1);
        assert_eq!(app.view.len(), 2);
    }

    #[test]
    fn toggling_currencies_rebuilds_the_view() {
        let mut app = app(&["USD"]);
        app.filter_next();
        app.toggle_currency();
        assert!(app.is_currency_selected("EUR"));
        assert_eq!(app.view.len(), 3);

        app.clear_currencies();
        assert!(app.view.is_empty());

        app.select_all_currencies();
        assert_eq!(app.view.len(), 4);
    }

    #[test]
    fn filter_cursor_wraps() {
        let mut app = app(&["USD"]);
        app.filter_prev();
        assert_eq!(app.filter_cursor, 2);
        app.filter_next();
        assert_eq!(app.filter_cursor, 0);
    }

    #[test]
    fn year_grid_uses_selected_year() {
        let mut app = app(&["USD"]);
        app.set_view_mode(ViewMode::YearGrid);
        assert_eq!(app.view.len(), 1);

        app.cycle_year(true);
        assert_eq!(app.year(), 2026);
        assert_eq!(app.selected_date.year(), 2026);
        let dates: Vec<&str> = app.view.events().map(|e| e.start_date.as_str()).collect();
        assert_eq!(dates, vec!["2026-03-01"]);

        app.cycle_year(false);
        app.cycle_year(false);
        assert_eq!(app.year(), 2027);
    }

    #[test]
    fn display_toggles_change_titles_and_tiers() {
        let mut app = app(&["USD"]);
        app.toggle_prefix();
        assert_eq!(app.view.events().next().map(|e| e.title.as_str()), Some("NFP"));

        app.set_view_mode(ViewMode::YearGrid);
        app.toggle_strict_year();
        assert_eq!(app.view.len(), 2);
        assert_eq!(app.status_message.as_deref(), Some("Strict year match: off"));
    }

    #[test]
    fn month_navigation_clamps_day() {
        let mut app = app(&["USD"]);
        app.selected_date = date(2025, 1, 31);
        app.next_month();
        assert_eq!(app.selected_date, date(2025, 2, 28));
        app.prev_month();
        assert_eq!(app.selected_date, date(2025, 1, 28));
        app.selected_date = date(2025, 12, 31);
        app.next_month();
        assert_eq!(app.selected_date, date(2026, 1, 31));
    }

    #[test]
    fn week_starts_on_sunday() {
        let mut app = app(&["USD"]);
        app.selected_date = date(2025, 1, 15); // Wednesday
        assert_eq!(app.week_start(), date(2025, 1, 12));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 4), 30);
    }
}
