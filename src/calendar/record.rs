use chrono::NaiveDate;

/// One economic event occurrence as loaded from the calendar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub date: NaiveDate,
    pub currency: String,
    pub event_name: String,
}

impl EventRecord {
    pub fn new(date: NaiveDate, currency: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            date,
            currency: currency.into(),
            event_name: event_name.into(),
        }
    }
}
