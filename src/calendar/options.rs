use serde::{Serialize, Serializer};

use super::builder::ViewMode;

/// Rendering options handed to the calendar host alongside the events.
/// Field names serialize to the keys a web day-grid calendar understands.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarOptions {
    pub initial_view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_date: Option<String>,
    pub editable: bool,
    pub height: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_height: Option<&'static str>,
    #[serde(serialize_with = "toolbar_or_false")]
    pub header_toolbar: Option<Toolbar>,
    pub day_max_event_rows: usize,
    pub fixed_week_count: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_format: Option<TitleFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toolbar {
    pub left: &'static str,
    pub center: &'static str,
    pub right: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleFormat {
    pub year: &'static str,
    pub month: &'static str,
}

// The host reads `headerToolbar: false` as "no toolbar".
fn toolbar_or_false<S: Serializer>(toolbar: &Option<Toolbar>, serializer: S) -> Result<S::Ok, S::Error> {
    match toolbar {
        Some(toolbar) => toolbar.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}

impl CalendarOptions {
    /// Full-size month calendar.
    pub fn standard() -> Self {
        Self {
            initial_view: "dayGridMonth",
            initial_date: None,
            editable: false,
            height: 900,
            content_height: Some("auto"),
            header_toolbar: Some(Toolbar {
                left: "prev,next today",
                center: "title",
                right: "",
            }),
            day_max_event_rows: 5,
            fixed_week_count: false,
            title_format: None,
        }
    }

    /// One small month panel of the year grid.
    pub fn mini(year: i32, month: u32) -> Self {
        Self {
            initial_view: "dayGridMonth",
            initial_date: Some(format!("{:04}-{:02}-01", year, month)),
            editable: false,
            height: 450,
            content_height: None,
            header_toolbar: None,
            day_max_event_rows: 3,
            fixed_week_count: false,
            title_format: Some(TitleFormat {
                year: "numeric",
                month: "short",
            }),
        }
    }

    pub fn for_view(mode: ViewMode) -> Self {
        let initial_view = match mode {
            ViewMode::Month | ViewMode::YearGrid => "dayGridMonth",
            ViewMode::Week => "dayGridWeek",
            ViewMode::Day => "dayGridDay",
        };
        Self {
            initial_view,
            ..Self::standard()
        }
    }

    pub fn shows_title(&self) -> bool {
        self.header_toolbar
            .as_ref()
            .is_some_and(|t| t.center.contains("title"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn standard_options_serialize_with_host_keys() {
        let value = serde_json::to_value(CalendarOptions::standard()).unwrap();
        assert_eq!(
            value,
            json!({
                "initialView": "dayGridMonth",
                "editable": false,
                "height": 900,
                "contentHeight": "auto",
                "headerToolbar": {"left": "prev,next today", "center": "title", "right": ""},
                "dayMaxEventRows": 5,
                "fixedWeekCount": false
            })
        );
    }

    #[test]
    fn mini_options_disable_toolbar() {
        let options = CalendarOptions::mini(2025, 3);
        assert!(!options.shows_title());

        let value = serde_json::to_value(options).unwrap();
        assert_eq!(value["headerToolbar"], json!(false));
        assert_eq!(value["initialDate"], json!("2025-03-01"));
        assert_eq!(value["titleFormat"], json!({"year": "numeric", "month": "short"}));
        assert_eq!(value["dayMaxEventRows"], json!(3));
    }

    #[test]
    fn view_mode_picks_initial_view() {
        assert_eq!(CalendarOptions::for_view(ViewMode::Week).initial_view, "dayGridWeek");
        assert_eq!(CalendarOptions::for_view(ViewMode::Day).initial_view, "dayGridDay");
        assert_eq!(CalendarOptions::for_view(ViewMode::YearGrid).initial_view, "dayGridMonth");
        assert!(CalendarOptions::for_view(ViewMode::Month).shows_title());
    }
}
