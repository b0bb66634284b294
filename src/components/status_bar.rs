use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode};
use crate::calendar::ViewMode;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = theme::current();
        let w = area.width as usize;

        let mode_str = match app.selection.view_mode {
            ViewMode::Month => "[1]Month",
            ViewMode::Week => "[2]Week",
            ViewMode::Day => "[3]Day",
            ViewMode::YearGrid => "[4]Year",
        };

        let focus_indicator = match app.input_mode {
            InputMode::Filter => " [Filter]",
            InputMode::Normal => "",
        };

        let left = format!(
            " {}{}  {}  {}/{} events ",
            mode_str,
            focus_indicator,
            app.year(),
            app.view.len(),
            app.total_rows(),
        );

        let right = if let Some(ref msg) = app.status_message {
            format!(" {} ", msg)
        } else {
            match app.input_mode {
                InputMode::Filter if w >= 60 => " hl:Move Space:Toggle a:All n:None Esc:Done ".to_string(),
                InputMode::Filter => " Space:Toggle Esc:Done ".to_string(),
                InputMode::Normal if w >= 90 => {
                    " hjkl:Nav [/]:Mon t:Today y:Year f:Filter e:Key p:Prefix ?:Help q:Quit ".to_string()
                }
                InputMode::Normal if w >= 50 => " f:Filter y:Year ?:Help q:Quit ".to_string(),
                InputMode::Normal => " ?:Help q:Quit ".to_string(),
            }
        };

        let padding = " ".repeat(w.saturating_sub(left.len() + right.len()));

        let line = Line::from(vec![
            Span::styled(left, theme.status),
            Span::styled(padding, theme.status),
            Span::styled(right, theme.status),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme.status), area);
    }
}
