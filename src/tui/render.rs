use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::forms::Feedback;
use crate::tui::app::{App, Item, Popup, Tab};

// ---------------------------------------------------------------------------
// Frame layout
// ---------------------------------------------------------------------------

pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_tabs(f, app, chunks[0]);
    match app.tab.active() {
        Tab::Utilities => render_utilities(f, app, chunks[1]),
        tab => render_form(f, app, tab, chunks[1]),
    }
    render_footer(f, app, chunks[2]);

    if let Some(popup) = &app.popup {
        render_popup(f, popup, area);
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("F{} {}", i + 1, t.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.active().index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    " Club Roster ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

fn item_lines(app: &App, tab: Tab) -> Vec<Line<'static>> {
    let focused = app.tab.focus();
    tab.items()
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let is_focused = i == focused;
            match item {
                Item::Field { index, label } => {
                    let value = app.field(tab, index).to_string();
                    let cursor = if is_focused { "▏" } else { "" };
                    let value_style = if is_focused {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    Some(Line::from(vec![
                        Span::styled(format!("{label:>28}: "), Style::default().fg(Color::Yellow)),
                        Span::styled(format!("{value}{cursor}"), value_style),
                    ]))
                }
                Item::Button(action) => {
                    let style = if is_focused {
                        Style::default().fg(Color::Black).bg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::Cyan)
                    };
                    Some(Line::from(vec![
                        Span::raw(format!("{:>30}", "")),
                        Span::styled(format!("[ {} ]", action.label()), style),
                    ]))
                }
                Item::Grid => None,
            }
        })
        .collect()
}

fn render_form(f: &mut Frame, app: &App, tab: Tab, area: Rect) {
    let paragraph = Paragraph::new(item_lines(app, tab)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {} ", tab.title().to_uppercase()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(paragraph, area);
}

fn render_utilities(f: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(56), Constraint::Min(0)])
        .split(area);

    render_form(f, app, Tab::Utilities, halves[0]);
    render_results(f, app, halves[1]);
}

fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let grid_focused = app.focused_item() == Item::Grid;
    let border = if grid_focused { Color::Cyan } else { Color::DarkGray };

    let Some(table) = &app.utilities.results else {
        let empty = Paragraph::new(Line::from(Span::styled(
            "Run a display or search to see results.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(" RESULTS "),
        );
        f.render_widget(empty, area);
        return;
    };

    let header = Row::new(table.headers.iter().map(|h| {
        Cell::from(h.as_str()).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|r| Row::new(r.iter().map(|v| Cell::from(v.as_str()))))
        .collect();

    let widths: Vec<Constraint> = table
        .headers
        .iter()
        .enumerate()
        .map(|(col, h)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|r| r.get(col))
                .map(|v| v.chars().count())
                .max()
                .unwrap_or(0);
            Constraint::Length(widest.max(h.chars().count()).min(32) as u16)
        })
        .collect();

    let widget = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(Span::styled(
                    format!(" {} ({}) ", table.shape.title().to_uppercase(), table.rows.len()),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default();
    state.select(app.utilities.selected);
    f.render_stateful_widget(widget, area, &mut state);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" [F1-F5] ", Style::default().fg(Color::Yellow)),
        Span::raw("tab  "),
        Span::styled("[Tab/↑↓] ", Style::default().fg(Color::Yellow)),
        Span::raw("move  "),
        Span::styled("[Enter] ", Style::default().fg(Color::Yellow)),
        Span::raw("press  "),
        Span::styled("[Ctrl+Q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
    ];
    if app.busy {
        spans.push(Span::styled("working…", Style::default().fg(Color::Cyan)));
    }
    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Popups
// ---------------------------------------------------------------------------

fn render_popup(f: &mut Frame, popup: &Popup, area: Rect) {
    let (title, body, color, hint) = match popup {
        Popup::Message(fb) => {
            let color = match fb {
                Feedback::Info(_) | Feedback::NoData => Color::Green,
                Feedback::Warning(_) | Feedback::Cancelled => Color::Yellow,
                Feedback::Error(_) => Color::Red,
            };
            (fb.title().to_string(), fb.message().to_string(), color, "[Enter] ok")
        }
        Popup::Confirm(action) => (
            "Confirm".to_string(),
            action.prompt(),
            Color::Red,
            "[y] yes  [n] no",
        ),
    };

    let rect = centered(area, 60, 9);
    let mut lines: Vec<Line> = body.lines().map(|l| Line::from(l.to_string())).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::Yellow))));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                format!(" {title} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}

/// A `width` x `height` rect centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
