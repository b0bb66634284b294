mod app;
mod calendar;
mod cli;
mod components;
mod config;
mod export;
mod theme;
mod tui;

use std::time::Duration;

use app::{App, InputMode};
use calendar::{load_events, CalendarOptions, CalendarView, ViewMode};
use clap::Parser;
use cli::{Cli, Command, LogTarget};
use color_eyre::eyre::{Result, WrapErr};
use config::Settings;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).wrap_err("failed to load configuration")?;

    let log_target = match (&cli.command, cli.log_file.clone().or_else(config::default_log_path)) {
        (Some(Command::Export { .. }), _) | (None, None) => LogTarget::Stderr,
        (None, Some(path)) => LogTarget::File(path),
    };
    cli::init_tracing(cli.verbose, log_target)?;

    let csv_path = cli.csv_path(&settings)?;
    let rows = load_events(&csv_path, cli.date_format(&settings))
        .wrap_err_with(|| format!("failed to load {}", csv_path.display()))?;

    let selection = cli.selection(&settings);
    let mut app = App::new(rows, selection, settings.years.clone(), settings.key_events.clone());

    if let Some(Command::Export { pretty }) = cli.command {
        let json = export::to_json(&app.view, &app.view_config(), pretty).wrap_err("failed to encode export")?;
        println!("{}", json);
        return Ok(());
    }

    info!(file = %csv_path.display(), rows = app.total_rows(), "starting calendar");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            let layout = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

            let cursor = (app.input_mode == InputMode::Filter).then_some(app.filter_cursor);
            components::CurrencyBar::render(
                frame,
                layout[0],
                &app.currencies,
                |code| app.is_currency_selected(code),
                cursor,
            );

            let content_area = layout[1];
            match &app.view {
                CalendarView::YearGrid(buckets) => {
                    components::YearGrid::render(
                        frame,
                        content_area,
                        app.year(),
                        app.selected_date,
                        app.today,
                        buckets,
                    );
                }
                CalendarView::Events(_) => match app.selection.view_mode {
                    ViewMode::Week => {
                        components::WeekView::render(
                            frame,
                            content_area,
                            app.selected_date,
                            app.today,
                            app.week_start(),
                            &app.view,
                        );
                    }
                    ViewMode::Day => {
                        components::DayView::render(
                            frame,
                            content_area,
                            app.selected_date,
                            &app.view.events_on(app.selected_date),
                            app.day_scroll,
                        );
                    }
                    ViewMode::Month | ViewMode::YearGrid => {
                        render_month_layout(frame, content_area, app);
                    }
                },
            }

            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(frame, layout[2], app);
        })?;

        if let Some(key) = tui::next_key_press(Duration::from_millis(250))? {
            app.status_message = None;

            if app.show_help {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    app.show_help = false;
                }
                continue;
            }

            match app.input_mode {
                InputMode::Filter => handle_filter_input(app, key.code),
                InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
            }
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('1'), _) => app.set_view_mode(ViewMode::Month),
        (KeyCode::Char('2'), _) => app.set_view_mode(ViewMode::Week),
        (KeyCode::Char('3'), _) => app.set_view_mode(ViewMode::Day),
        (KeyCode::Char('4'), _) => app.set_view_mode(ViewMode::YearGrid),
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('y'), _) => app.cycle_year(true),
        (KeyCode::Char('Y'), _) => app.cycle_year(false),
        (KeyCode::Char('f'), _) => app.enter_filter(),
        (KeyCode::Char('p'), _) => app.toggle_prefix(),
        (KeyCode::Char('e'), _) => app.toggle_key_events(),
        (KeyCode::Char('s'), _) => app.toggle_strict_year(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
            if app.selection.view_mode == ViewMode::Day {
                app.scroll_day_up();
            } else {
                app.prev_week();
            }
        }
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
            if app.selection.view_mode == ViewMode::Day {
                app.scroll_day_down();
            } else {
                app.next_week();
            }
        }
        (KeyCode::Char('['), _) => app.prev_month(),
        (KeyCode::Char(']'), _) => app.next_month(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_filter_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('f') => app.leave_filter(),
        KeyCode::Left | KeyCode::Char('h') => app.filter_prev(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.filter_next(),
        KeyCode::Char(' ') => app.toggle_currency(),
        KeyCode::Char('a') => app.select_all_currencies(),
        KeyCode::Char('n') => app.clear_currencies(),
        _ => {}
    }
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let options = CalendarOptions::standard();

    if area.width < 100 {
        components::MonthView::render(frame, area, app.selected_date, app.today, app.view.events(), &options);
        return;
    }

    let content = Layout::horizontal([Constraint::Percentage(70), Constraint::Min(30)]).split(area);

    components::MonthView::render(
        frame,
        content[0],
        app.selected_date,
        app.today,
        app.view.events(),
        &options,
    );

    components::DayView::render(
        frame,
        content[1],
        app.selected_date,
        &app.view.events_on(app.selected_date),
        app.day_scroll,
    );
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.clamp(30, 56);
    let popup_h = area.height.clamp(12, 26);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w.min(area.width), popup_h.min(area.height));

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let dim = theme::current().dim;

    let binding = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        binding("h/l", "Previous/next day"),
        binding("j/k", "Next/previous week, scroll in day view"),
        binding("[/]", "Previous/next month"),
        binding("t", "Jump to today"),
        binding("y/Y", "Next/previous year"),
        Line::from(""),
        Line::from(Span::styled("Views", section_style)),
        binding("1/2/3/4", "Month / Week / Day / Year grid"),
        Line::from(""),
        Line::from(Span::styled("Filters", section_style)),
        binding("f", "Currency filter (Space, a, n, Esc)"),
        binding("e", "Emphasise key events"),
        binding("p", "Currency prefix in titles"),
        binding("s", "Strict year match in year grid"),
        Line::from(""),
        binding("?", "Toggle this help"),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", dim),
            Span::styled("Ctrl-C  ", key_style),
            Span::raw("Quit"),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
