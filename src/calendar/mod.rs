pub mod builder;
pub mod loader;
pub mod options;
pub mod palette;
pub mod record;

pub use builder::{
    build_events, CalendarView, MonthBucket, OpacityTier, RenderableEvent, ViewConfig, ViewMode,
    YearSelection,
};
pub use loader::{load_events, DateFormat};
pub use options::CalendarOptions;
pub use palette::{currencies_in_display_order, lookup_color};
pub use record::EventRecord;
