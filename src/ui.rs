//! TUI rendering for the fleet terminal dashboard
//!
//! This module draws the three dashboards (overview, aircraft status and
//! type diagnostics) with `ratatui`, plus the loading screen shown until
//! the first ETA fetch completes.

use crate::app::{App, FleetSnapshot, ViewMode};
use crate::dashboard::TypeCount;
use ratatui::{prelude::*, widgets::*};

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .bg(Color::Rgb(30, 30, 60))
        .add_modifier(Modifier::BOLD)
}

/// Renders one frame of the TUI based on current application state.
///
/// Draws the tab header and key help, then either the loading screen (no
/// snapshot yet) or the view selected by [`App::view_mode`].
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.size());

    render_header(f, app, chunks[0]);

    match &app.snapshot {
        None => render_loading_screen(f, app, chunks[1]),
        Some(snapshot) => {
            let body = match snapshot.error() {
                Some(_) if app.view_mode != ViewMode::Types => {
                    render_error_banner(f, snapshot.error(), chunks[1])
                }
                _ => chunks[1],
            };
            match app.view_mode {
                ViewMode::Overview => render_overview_view(f, snapshot, body),
                ViewMode::Aircraft => render_aircraft_view(f, app, body),
                ViewMode::Types => render_types_view(f, snapshot, body),
            }
        }
    }

    let help = Paragraph::new(" 1/2/3 or Tab views   ↑/↓ select   r refresh   q quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = ViewMode::ALL
        .iter()
        .map(|v| Line::from(format!(" {} ", v.title())))
        .collect();

    let mut status = match &app.snapshot {
        Some(s) => format!(" updated {} ", s.fetched_at.format("%H:%M:%S")),
        None => " waiting for ETA ".to_string(),
    };
    if app.refreshing && app.snapshot.is_some() {
        status.push_str("· refreshing ");
    }

    let mut title = String::from(" ETA Fleet ");
    if !app.location.is_empty() {
        title = format!(" ETA Fleet · {} ", app.location);
    }

    let tabs = Tabs::new(titles)
        .select(app.view_mode.index())
        .highlight_style(selected_style())
        .block(
            Block::default()
                .title(title)
                .title(block::Title::from(status).alignment(Alignment::Right))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(tabs, area);
}

/// Draws the degraded-data banner at the top of `area` and returns the
/// space left below it.
fn render_error_banner(f: &mut Frame, error: Option<&str>, area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let banner = Paragraph::new(Line::from(vec![
        Span::styled(
            "Live ETA data unavailable: ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(error.unwrap_or_default()),
    ]))
    .style(Style::default().fg(Color::Red))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
    f.render_widget(banner, chunks[0]);
    chunks[1]
}

/// Overview: totals on top, type breakdown (40%) beside the sample (60%).
fn render_overview_view(f: &mut Frame, snapshot: &FleetSnapshot, area: Rect) {
    let overview = &snapshot.overview;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let stats = Paragraph::new(Line::from(vec![
        Span::styled("  AIRCRAFT: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            overview.total_aircraft.to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  │  "),
        Span::styled("TOTAL HOBBS: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("{:.1}", overview.total_hobbs),
            Style::default().fg(Color::Yellow),
        ),
    ]))
    .block(
        Block::default()
            .title(" Fleet ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(stats, chunks[0]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    f.render_widget(type_count_list(&overview.type_breakdown, " By Type "), lower[0]);

    let sample: Vec<ListItem> = overview
        .sample_aircraft
        .iter()
        .map(|a| {
            ListItem::new(format!(
                " {:<10} {:<12} {:>10.1}",
                a.tail, a.aircraft_type, a.hobbs
            ))
        })
        .collect();
    let sample = List::new(sample).block(
        Block::default()
            .title(format!(" Sample ({}) ", overview.sample_aircraft.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(sample, lower[1]);
}

/// Aircraft status: tail list sidebar (30%) + details of the selected aircraft.
fn render_aircraft_view(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let items: Vec<ListItem> = app
        .aircraft()
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let style = if i == app.selected_index {
                selected_style()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<9}", a.tail), style),
                Span::styled(
                    format!(" │ {}", a.aircraft_type),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Aircraft ({}) ", app.aircraft().len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(list, chunks[0]);

    let Some(a) = app.selected() else {
        return;
    };

    let label = |text: &'static str| Span::styled(text, Style::default().add_modifier(Modifier::BOLD));
    let or_dash = |text: &str| {
        if text.is_empty() {
            "---".to_string()
        } else {
            text.to_string()
        }
    };

    let details = vec![
        Line::from(vec![
            label("Tail:           "),
            Span::styled(a.tail.clone(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![label("Type:           "), Span::raw(or_dash(&a.aircraft_type))]),
        Line::from(""),
        Line::from(vec![label("Resource type:  "), Span::raw(or_dash(&a.resource_type))]),
        Line::from(vec![label("Aircraft class: "), Span::raw(or_dash(&a.aircraft_class))]),
        Line::from(vec![label("Description:    "), Span::raw(or_dash(&a.description))]),
        Line::from(""),
        Line::from(vec![label("Hobbs:          "), Span::raw(format!("{:.1}", a.hobbs))]),
        Line::from(vec![
            label("Obsolete:       "),
            if a.obsolete {
                Span::styled("YES", Style::default().fg(Color::Red))
            } else {
                Span::raw("no")
            },
        ]),
    ];

    let p = Paragraph::new(details).block(
        Block::default()
            .title(" Aircraft Detail ")
            .borders(Borders::ALL)
            .padding(Padding::new(2, 2, 1, 1)),
    );
    f.render_widget(p, chunks[1]);
}

/// Type diagnostics over the unfiltered export. Errors are shown in place
/// of the list since there is no placeholder data here.
fn render_types_view(f: &mut Frame, snapshot: &FleetSnapshot, area: Rect) {
    let types = &snapshot.types;
    match &types.error {
        Some(e) => {
            let p = Paragraph::new(e.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .title(" Raw ETA fetch failed ")
                        .borders(Borders::ALL),
                );
            f.render_widget(p, area);
        }
        None => f.render_widget(
            type_count_list(&types.type_counts, " Unfiltered Types "),
            area,
        ),
    }
}

fn type_count_list<'a>(counts: &'a [TypeCount], title: &'a str) -> List<'a> {
    let items: Vec<ListItem> = counts
        .iter()
        .map(|t| ListItem::new(format!(" {:<16} {:>5}", t.aircraft_type, t.count)))
        .collect();

    List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
}

/// Shown until the first fetch lands.
fn render_loading_screen(f: &mut Frame, app: &App, area: Rect) {
    let dots = ".".repeat(app.tick_count % 4);
    let msg = Paragraph::new(format!("Fetching fleet from ETA{dots}"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().padding(Padding::new(0, 0, area.height / 2, 0)));
    f.render_widget(msg, area);
}
