//! JSON payload for a web calendar widget: the built events plus the
//! options that widget needs to lay them out.

use serde::Serialize;

use crate::calendar::{CalendarOptions, CalendarView, RenderableEvent, ViewConfig, ViewMode};
use crate::components::month_name;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportEvent<'a> {
    #[serde(flatten)]
    event: &'a RenderableEvent,
    background_color: String,
}

impl<'a> From<&'a RenderableEvent> for ExportEvent<'a> {
    fn from(event: &'a RenderableEvent) -> Self {
        Self {
            event,
            background_color: event.color.rgba(event.opacity_tier.opacity()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportMonth<'a> {
    month: u32,
    title: String,
    options: CalendarOptions,
    events: Vec<ExportEvent<'a>>,
}

#[derive(Debug, Serialize)]
struct Export<'a> {
    view: ViewMode,
    year: i32,
    currencies: Vec<&'a str>,
    options: CalendarOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<ExportEvent<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    months: Option<Vec<ExportMonth<'a>>>,
}

pub fn to_json(view: &CalendarView, config: &ViewConfig, pretty: bool) -> serde_json::Result<String> {
    let year = config.year();
    let (events, months) = match view {
        CalendarView::Events(events) => (Some(events.iter().map(ExportEvent::from).collect()), None),
        CalendarView::YearGrid(buckets) => {
            let months = buckets
                .iter()
                .map(|bucket| ExportMonth {
                    month: bucket.month,
                    title: format!("{} {}", month_name(bucket.month), year),
                    options: CalendarOptions::mini(year, bucket.month),
                    events: bucket.events.iter().map(ExportEvent::from).collect(),
                })
                .collect();
            (None, Some(months))
        }
    };

    let export = Export {
        view: config.view_mode,
        year,
        currencies: config.selected_currencies.iter().map(String::as_str).collect(),
        options: CalendarOptions::for_view(config.view_mode),
        events,
        months,
    };

    if pretty {
        serde_json::to_string_pretty(&export)
    } else {
        serde_json::to_string(&export)
    }
}
