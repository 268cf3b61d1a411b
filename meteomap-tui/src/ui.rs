use meteomap_core::DISPLAY_HOURS;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph,
        canvas::{Canvas, Map, MapResolution},
    },
};

use crate::app::App;

const TEMPERATURE_COLOR: Color = Color::Yellow;
const HUMIDITY_COLOR: Color = Color::Blue;
const WIND_COLOR: Color = Color::Green;

pub fn render(frame: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(frame.area());

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(columns[1]);

    draw_map(frame, app, columns[0]);
    draw_readout(frame, app, right[0]);
    draw_chart(frame, app, right[1]);
    draw_help(frame, right[2]);
}

fn draw_map(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app.session.coordinate();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(" Map ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::Gray,
                resolution: MapResolution::High,
            });
            ctx.print(
                selected.longitude,
                selected.latitude,
                Line::styled("●", Style::default().fg(Color::Red)),
            );
            ctx.print(
                app.cursor_lon,
                app.cursor_lat,
                Line::styled(
                    "✛",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            );
        });

    frame.render_widget(canvas, area);
}

fn draw_readout(frame: &mut Frame, app: &App, area: Rect) {
    let coordinate = app.session.coordinate();

    let (temperature, wind) = match app.session.snapshot() {
        Some(snapshot) => (
            format!("{:.1} °C", snapshot.temperature),
            format!("{:.1} km/h", snapshot.wind_speed),
        ),
        None => ("--".to_string(), "--".to_string()),
    };

    let status = if app.fetching { "fetching…" } else { "" };

    let lines = vec![
        Line::from(vec![
            Span::styled("Coordinate  ", Style::default().fg(Color::DarkGray)),
            Span::raw(coordinate.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Temperature ", Style::default().fg(Color::DarkGray)),
            Span::styled(temperature, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Wind        ", Style::default().fg(Color::DarkGray)),
            Span::styled(wind, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(status, Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .title(" Current ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_chart(frame: &mut Frame, app: &App, area: Rect) {
    let hourly = app.session.hourly();
    let window = &hourly[..hourly.len().min(DISPLAY_HOURS)];

    let block = Block::default()
        .title(" Hourly forecast ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    if window.is_empty() {
        frame.render_widget(
            Paragraph::new("no data yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let temperature: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.temperature))
        .collect();
    let humidity: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.humidity))
        .collect();
    let wind: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.wind))
        .collect();

    let values = || {
        temperature
            .iter()
            .chain(&humidity)
            .chain(&wind)
            .map(|&(_, y)| y)
    };
    let min = values().fold(f64::INFINITY, f64::min);
    let max = values().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min) * 0.1).max(1.0);
    let (lo, hi) = (min - pad, max + pad);

    let datasets = vec![
        Dataset::default()
            .name("temp °C")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(TEMPERATURE_COLOR))
            .data(&temperature),
        Dataset::default()
            .name("humidity %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(HUMIDITY_COLOR))
            .data(&humidity),
        Dataset::default()
            .name("wind km/h")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(WIND_COLOR))
            .data(&wind),
    ];

    let x_labels = vec![
        window[0].time.clone(),
        window[window.len() / 2].time.clone(),
        window[window.len() - 1].time.clone(),
    ];
    let y_labels = vec![
        format!("{lo:.0}"),
        format!("{:.0}", (lo + hi) / 2.0),
        format!("{hi:.0}"),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, window.len().saturating_sub(1).max(1) as f64])
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(y_labels)
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan);

    let help = Line::from(vec![
        Span::styled("←↑↓→", key),
        Span::raw(" move  "),
        Span::styled("shift", key),
        Span::raw(" fine  "),
        Span::styled("ctrl", key),
        Span::raw(" coarse  "),
        Span::styled("enter", key),
        Span::raw(" fetch  "),
        Span::styled("r", key),
        Span::raw(" refresh  "),
        Span::styled("q", key),
        Span::raw(" quit"),
    ]);

    frame.render_widget(Paragraph::new(help), area);
}
