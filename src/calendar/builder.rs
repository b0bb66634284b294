use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::palette::{lookup_color, DisplayColor};
use super::record::EventRecord;

/// Event names that render at full opacity when key-event emphasis is on.
pub const DEFAULT_KEY_EVENTS: [&str; 3] = ["Monetary Policy", "CPI", "NFP"];

/// Opacity used for ordinary events when key-event emphasis is on.
pub const ORDINARY_OPACITY: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
    #[serde(rename = "year")]
    YearGrid,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Month => "Month",
            ViewMode::Week => "Week",
            ViewMode::Day => "Day",
            ViewMode::YearGrid => "Year",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(ViewMode::Month),
            "week" => Ok(ViewMode::Week),
            "day" => Ok(ViewMode::Day),
            "year" | "year-grid" | "yeargrid" => Ok(ViewMode::YearGrid),
            other => Err(format!("unknown view '{}', expected month|week|day|year", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearSelection {
    #[default]
    Current,
    Year(i32),
}

impl YearSelection {
    pub fn resolve(self, today: NaiveDate) -> i32 {
        match self {
            YearSelection::Current => today.year(),
            YearSelection::Year(year) => year,
        }
    }
}

impl FromStr for YearSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("current") {
            return Ok(YearSelection::Current);
        }
        s.parse::<i32>()
            .map(YearSelection::Year)
            .map_err(|_| format!("invalid year '{}', expected a number or 'current'", s))
    }
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelection::Current => write!(f, "current"),
            YearSelection::Year(year) => write!(f, "{}", year),
        }
    }
}

/// Selections for a single render pass. Built fresh every time the user
/// changes something; never shared or mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub selected_currencies: BTreeSet<String>,
    pub selected_year: YearSelection,
    pub view_mode: ViewMode,
    /// Apply the year filter outside the year grid too.
    pub pin_year: bool,
    pub prefix_currency: bool,
    pub classify_key_events: bool,
    pub key_events: Vec<String>,
    /// Year grid filters by year and buckets by month. When off, the grid
    /// buckets by month only and every loaded year shares the buckets.
    pub strict_year_match: bool,
    /// Reference date that `YearSelection::Current` resolves against.
    pub today: NaiveDate,
}

impl ViewConfig {
    pub fn new<I, S>(currencies: I, view_mode: ViewMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_currencies: currencies.into_iter().map(Into::into).collect(),
            selected_year: YearSelection::Current,
            view_mode,
            pin_year: false,
            prefix_currency: true,
            classify_key_events: false,
            key_events: DEFAULT_KEY_EVENTS.iter().map(|s| s.to_string()).collect(),
            strict_year_match: true,
            today: Local::now().date_naive(),
        }
    }

    pub fn with_year(mut self, year: YearSelection) -> Self {
        self.selected_year = year;
        self
    }

    pub fn year(&self) -> i32 {
        self.selected_year.resolve(self.today)
    }

    fn filters_by_year(&self) -> bool {
        self.pin_year || (self.view_mode == ViewMode::YearGrid && self.strict_year_match)
    }

    fn is_key_event(&self, event_name: &str) -> bool {
        self.key_events.iter().any(|k| k == event_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpacityTier {
    Key,
    Ordinary,
}

impl OpacityTier {
    pub fn opacity(self) -> f32 {
        match self {
            OpacityTier::Key => 1.0,
            OpacityTier::Ordinary => ORDINARY_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableEvent {
    pub title: String,
    #[serde(rename = "start")]
    pub start_date: String,
    pub all_day: bool,
    pub color: DisplayColor,
    pub opacity_tier: OpacityTier,
    #[serde(skip)]
    pub date: NaiveDate,
    #[serde(skip)]
    pub currency: String,
}

impl RenderableEvent {
    fn from_record(record: &EventRecord, config: &ViewConfig) -> Self {
        let title = if config.prefix_currency {
            format!("{}: {}", record.currency, record.event_name)
        } else {
            record.event_name.clone()
        };

        let opacity_tier = if !config.classify_key_events || config.is_key_event(&record.event_name) {
            OpacityTier::Key
        } else {
            OpacityTier::Ordinary
        };

        Self {
            title,
            start_date: record.date.format("%Y-%m-%d").to_string(),
            all_day: true,
            color: lookup_color(&record.currency),
            opacity_tier,
            date: record.date,
            currency: record.currency.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub month: u32,
    pub events: Vec<RenderableEvent>,
}

/// Output of one build pass: a flat list for month/week/day, twelve
/// month buckets for the year grid.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarView {
    Events(Vec<RenderableEvent>),
    YearGrid(Vec<MonthBucket>),
}

impl CalendarView {
    /// Every event in the view, in build order.
    pub fn events(&self) -> Box<dyn Iterator<Item = &RenderableEvent> + '_> {
        match self {
            CalendarView::Events(events) => Box::new(events.iter()),
            CalendarView::YearGrid(buckets) => Box::new(buckets.iter().flat_map(|b| b.events.iter())),
        }
    }

    pub fn len(&self) -> usize {
        self.events().count()
    }

    pub fn is_empty(&self) -> bool {
        self.events().next().is_none()
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&RenderableEvent> {
        self.events().filter(|e| e.date == date).collect()
    }
}

/// Filter, classify, map and (for the year grid) bucket the loaded rows.
///
/// Output keeps input order and does not deduplicate. Unknown currencies
/// take the default color; an empty currency selection gives an empty view.
pub fn build_events(rows: &[EventRecord], config: &ViewConfig) -> CalendarView {
    let year = config.year();
    let by_year = config.filters_by_year();

    let events: Vec<RenderableEvent> = rows
        .iter()
        .filter(|r| config.selected_currencies.contains(&r.currency))
        .filter(|r| !by_year || r.date.year() == year)
        .map(|r| RenderableEvent::from_record(r, config))
        .collect();

    if config.view_mode != ViewMode::YearGrid {
        return CalendarView::Events(events);
    }

    CalendarView::YearGrid(bucket_by_month(events))
}

fn bucket_by_month(events: Vec<RenderableEvent>) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = (1..=12)
        .map(|month| MonthBucket {
            month,
            events: Vec::new(),
        })
        .collect();

    for event in events {
        // month() is always 1..=12
        buckets[event.date.month0() as usize].events.push(event);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_rows() -> Vec<EventRecord> {
        vec![
            EventRecord::new(date(2025, 1, 15), "USD", "NFP"),
            EventRecord::new(date(2025, 2, 1), "EUR", "Holiday"),
        ]
    }

    fn config(currencies: &[&str], mode: ViewMode) -> ViewConfig {
        let mut config = ViewConfig::new(currencies.iter().copied(), mode);
        config.today = date(2025, 6, 1);
        config
    }

    fn flat(view: CalendarView) -> Vec<RenderableEvent> {
        match view {
            CalendarView::Events(events) => events,
            CalendarView::YearGrid(_) => panic!("expected a flat event list"),
        }
    }

    fn buckets(view: CalendarView) -> Vec<MonthBucket> {
        match view {
            CalendarView::YearGrid(buckets) => buckets,
            CalendarView::Events(_) => panic!("expected year grid buckets"),
        }
    }

    fn summary(events: &[RenderableEvent]) -> Vec<(&str, &str, bool, &str)> {
        events
            .iter()
            .map(|e| (e.title.as_str(), e.start_date.as_str(), e.all_day, e.color.name))
            .collect()
    }

    #[test]
    fn month_view_maps_selected_currencies_in_order() {
        let events = flat(build_events(&sample_rows(), &config(&["USD", "EUR"], ViewMode::Month)));
        assert_eq!(
            summary(&events),
            vec![
                ("USD: NFP", "2025-01-15", true, "blue"),
                ("EUR: Holiday", "2025-02-01", true, "green"),
            ]
        );
    }

    #[test]
    fn unselected_currency_is_dropped() {
        let events = flat(build_events(&sample_rows(), &config(&["USD"], ViewMode::Month)));
        assert_eq!(summary(&events), vec![("USD: NFP", "2025-01-15", true, "blue")]);
    }

    #[test]
    fn empty_selection_gives_empty_view() {
        let view = build_events(&sample_rows(), &config(&[], ViewMode::Month));
        assert!(view.is_empty());

        let grid = buckets(build_events(&sample_rows(), &config(&[], ViewMode::YearGrid)));
        assert_eq!(grid.len(), 12);
        assert!(grid.iter().all(|b| b.events.is_empty()));
    }

    #[test]
    fn unknown_currency_gets_gray() {
        let rows = vec![EventRecord::new(date(2025, 3, 3), "MXN", "Holiday")];
        let events = flat(build_events(&rows, &config(&["MXN"], ViewMode::Week)));
        assert_eq!(events[0].color.name, "gray");
    }

    #[test]
    fn prefix_can_be_disabled() {
        let mut cfg = config(&["USD"], ViewMode::Day);
        cfg.prefix_currency = false;
        let events = flat(build_events(&sample_rows(), &cfg));
        assert_eq!(events[0].title, "NFP");
    }

    #[test]
    fn duplicate_rows_are_kept() {
        let mut rows = sample_rows();
        rows.push(rows[0].clone());
        let events = flat(build_events(&rows, &config(&["USD"], ViewMode::Month)));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], events[1]);
    }

    #[test]
    fn month_view_spans_years_unless_pinned() {
        let mut rows = sample_rows();
        rows.push(EventRecord::new(date(2026, 3, 1), "USD", "CPI"));

        let cfg = config(&["USD"], ViewMode::Month).with_year(YearSelection::Year(2025));
        assert_eq!(flat(build_events(&rows, &cfg)).len(), 2);

        let mut pinned = cfg.clone();
        pinned.pin_year = true;
        let events = flat(build_events(&rows, &pinned));
        assert_eq!(summary(&events), vec![("USD: NFP", "2025-01-15", true, "blue")]);
    }

    #[test]
    fn current_year_resolves_against_today() {
        let mut cfg = config(&["USD"], ViewMode::YearGrid);
        cfg.today = date(2026, 7, 4);
        assert_eq!(cfg.year(), 2026);
        assert_eq!(cfg.with_year(YearSelection::Year(2027)).year(), 2027);
    }

    #[test]
    fn key_events_are_tagged_when_classifying() {
        let rows = vec![
            EventRecord::new(date(2025, 1, 10), "USD", "CPI"),
            EventRecord::new(date(2025, 1, 11), "USD", "Holiday"),
            EventRecord::new(date(2025, 1, 12), "EUR", "Monetary Policy"),
        ];
        let mut cfg = config(&["USD", "EUR"], ViewMode::Month);

        let plain = flat(build_events(&rows, &cfg));
        assert!(plain.iter().all(|e| e.opacity_tier == OpacityTier::Key));

        cfg.classify_key_events = true;
        let tiers: Vec<OpacityTier> = flat(build_events(&rows, &cfg))
            .iter()
            .map(|e| e.opacity_tier)
            .collect();
        assert_eq!(tiers, vec![OpacityTier::Key, OpacityTier::Ordinary, OpacityTier::Key]);
        assert_eq!(OpacityTier::Ordinary.opacity(), ORDINARY_OPACITY);
    }

    #[test]
    fn year_grid_drops_other_years() {
        let mut rows = sample_rows();
        rows.push(EventRecord::new(date(2026, 3, 1), "USD", "CPI"));
        let cfg = config(&["USD", "EUR"], ViewMode::YearGrid).with_year(YearSelection::Year(2025));

        let grid = buckets(build_events(&rows, &cfg));
        assert_eq!(grid.len(), 12);
        assert!(grid[2].events.is_empty());
        assert!(grid.iter().flat_map(|b| &b.events).all(|e| e.date.year() == 2025));
    }

    #[test]
    fn year_grid_buckets_partition_filtered_events() {
        let rows = vec![
            EventRecord::new(date(2025, 1, 15), "USD", "NFP"),
            EventRecord::new(date(2025, 12, 31), "EUR", "Holiday"),
            EventRecord::new(date(2025, 1, 2), "EUR", "CPI"),
            EventRecord::new(date(2025, 6, 18), "GBP", "Monetary Policy"),
            EventRecord::new(date(2025, 6, 19), "JPY", "Holiday"),
        ];
        let cfg = config(&["USD", "EUR", "GBP"], ViewMode::YearGrid).with_year(YearSelection::Year(2025));

        let mut month_cfg = cfg.clone();
        month_cfg.view_mode = ViewMode::Month;
        month_cfg.pin_year = true;
        let expected = flat(build_events(&rows, &month_cfg));

        let grid = buckets(build_events(&rows, &cfg));
        assert_eq!(grid.iter().map(|b| b.month).collect::<Vec<_>>(), (1..=12).collect::<Vec<_>>());
        for bucket in &grid {
            assert!(bucket.events.iter().all(|e| e.date.month() == bucket.month));
        }

        let mut union: Vec<RenderableEvent> = grid.into_iter().flat_map(|b| b.events).collect();
        let mut expected_sorted = expected.clone();
        union.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        expected_sorted.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        assert_eq!(union, expected_sorted);

        let grid = buckets(build_events(&rows, &cfg));
        let january: Vec<&str> = grid[0]
            .events
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(january, vec!["USD: NFP", "EUR: CPI"]);
    }

    #[test]
    fn loose_year_match_shares_month_buckets_across_years() {
        let rows = vec![
            EventRecord::new(date(2025, 3, 5), "USD", "CPI"),
            EventRecord::new(date(2026, 3, 1), "USD", "CPI"),
        ];
        let mut cfg = config(&["USD"], ViewMode::YearGrid).with_year(YearSelection::Year(2025));
        cfg.strict_year_match = false;

        let grid = buckets(build_events(&rows, &cfg));
        let march: Vec<&str> = grid[2].events.iter().map(|e| e.start_date.as_str()).collect();
        assert_eq!(march, vec!["2025-03-05", "2026-03-01"]);
    }

    #[test]
    fn build_is_idempotent() {
        let cfg = config(&["USD", "EUR"], ViewMode::YearGrid).with_year(YearSelection::Year(2025));
        assert_eq!(build_events(&sample_rows(), &cfg), build_events(&sample_rows(), &cfg));
    }

    #[test]
    fn parses_view_and_year_arguments() {
        assert_eq!("year".parse::<ViewMode>(), Ok(ViewMode::YearGrid));
        assert_eq!("Week".parse::<ViewMode>(), Ok(ViewMode::Week));
        assert!("agenda".parse::<ViewMode>().is_err());
        assert_eq!("current".parse::<YearSelection>(), Ok(YearSelection::Current));
        assert_eq!("2026".parse::<YearSelection>(), Ok(YearSelection::Year(2026)));
        assert!("next".parse::<YearSelection>().is_err());
    }
}
