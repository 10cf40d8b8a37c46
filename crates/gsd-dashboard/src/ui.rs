use crate::state::{App, Tab};
use crate::theme::{self, icons};
use crate::view::{self, roadmap_view, stats_view, target_phase};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_tabs(f, app, chunks[1]);
    match view::tab_document(app.tab, &app.snapshot) {
        Some(document) => render_document(f, app, chunks[2], &document),
        None => render_dashboard(f, app, chunks[2]),
    }
    render_footer(f, app, chunks[3]);

    if app.show_help {
        render_help(f, centered_rect(60, 60, area));
    }
    render_notification(f, app, area);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let p = Paragraph::new(Line::from(Span::styled(app.title(), theme::HEADER_STYLE)));
    f.render_widget(p, area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|tab| Line::from(tab.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .highlight_style(theme::TAB_SELECTED_STYLE)
        .divider("|");
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("q", Color::Cyan),
        Span::raw(" quit  "),
        Span::styled("r", Color::Cyan),
        Span::raw(" refresh  "),
        Span::styled("t", Color::Cyan),
        Span::raw(" auto-refresh  "),
        Span::styled("e", Color::Cyan),
        Span::raw(" expand roadmap  "),
        Span::styled("←/→", Color::Cyan),
        Span::raw(" tabs  "),
        Span::styled("?", Color::Cyan),
        Span::raw(" help"),
    ];
    if let Some(at) = &app.last_refreshed {
        spans.push(Span::styled(format!("   updated {at}"), theme::MUTED_STYLE));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_roadmap(f, app, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Percentage(30),
        ])
        .split(columns[1]);
    render_stats(f, app, right[0]);
    render_todos(f, app, right[1]);
    render_concerns(f, app, right[2]);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, theme::HEADER_STYLE))
}

fn empty_state(message: &str) -> ListItem<'_> {
    ListItem::new(Line::from(Span::styled(message, theme::EMPTY_STATE_STYLE)))
}

fn render_roadmap(f: &mut Frame, app: &App, area: Rect) {
    let block = panel("Roadmap");
    let phases = &app.snapshot.roadmap.phases;
    if phases.is_empty() {
        f.render_widget(List::new(vec![empty_state(view::NO_ROADMAP)]).block(block), area);
        return;
    }

    let target = target_phase(
        &app.snapshot.state,
        app.snapshot.inferred_active_phase.as_ref(),
    );
    let roadmap = roadmap_view(phases, &target, app.expand_level());

    let mut items = Vec::with_capacity(roadmap.rows.len() + 1);
    if let Some(label) = roadmap.collapsed_label() {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("  {label}"),
            theme::COLLAPSED_STYLE,
        ))));
    }
    for row in &roadmap.rows {
        let line = if row.active {
            let style = if app.pulse_on {
                theme::ACTIVE_PHASE_STYLE
            } else {
                theme::ACTIVE_PHASE_DIM_STYLE
            };
            Line::from(Span::styled(format!("{} {}", row.icon, row.name), style))
        } else {
            Line::from(vec![
                Span::styled(row.icon, theme::status_color(row.status)),
                Span::raw(format!(" {}", row.name)),
            ])
        };
        items.push(ListItem::new(line));
    }

    f.render_widget(List::new(items).block(block), area);
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let block = panel("Project Stats");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let stats = stats_view(&app.snapshot.state);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let phase_style = if app.snapshot.state.milestone_complete {
        Style::default()
            .fg(theme::status_color(gsd_core::PhaseStatus::Completed))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(Span::styled(stats.phase_line, phase_style)),
        rows[0],
    );
    f.render_widget(Paragraph::new(stats.last_activity), rows[1]);

    let gauge = Gauge::default()
        .gauge_style(theme::GAUGE_STYLE)
        .percent(u16::from(stats.progress))
        .label(format!("{}%", stats.progress));
    f.render_widget(gauge, rows[2]);
}

fn render_todos(f: &mut Frame, app: &App, area: Rect) {
    let pending = &app.snapshot.pending_todos;
    let completed = &app.snapshot.completed_todos;

    let items: Vec<ListItem> = if pending.is_empty() && completed.is_empty() {
        vec![empty_state(view::NO_TODOS)]
    } else {
        let mut items: Vec<ListItem> = pending
            .iter()
            .map(|todo| ListItem::new(format!("  {} {}", icons::TODO, todo.text)))
            .collect();
        if !pending.is_empty() && !completed.is_empty() {
            items.push(ListItem::new(""));
        }
        items.extend(completed.iter().map(|todo| {
            ListItem::new(Line::from(Span::styled(
                format!("  {} {}", icons::TODO_DONE, todo.text),
                theme::MUTED_STYLE,
            )))
        }));
        items
    };

    f.render_widget(List::new(items).block(panel("Todos")), area);
}

fn render_concerns(f: &mut Frame, app: &App, area: Rect) {
    let concerns = &app.snapshot.concerns;
    let items: Vec<ListItem> = if concerns.is_empty() {
        vec![empty_state(view::NO_CONCERNS)]
    } else {
        concerns
            .iter()
            .map(|concern| {
                ListItem::new(Line::from(Span::styled(
                    format!("  {} {}", icons::CONCERN, concern.text),
                    theme::CONCERN_STYLE,
                )))
            })
            .collect()
    };

    f.render_widget(
        List::new(items).block(panel("Blockers / Concerns")),
        area,
    );
}

fn render_document(f: &mut Frame, app: &mut App, area: Rect, document: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.tab.title())
        .border_style(Style::default().fg(Color::Cyan));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let lines = markdown_lines(document);
    let total_height = wrapped_height(&lines, inner_area.width);
    app.max_scroll = total_height.saturating_sub(inner_area.height);
    app.page_height = inner_area.height;
    if app.scroll > app.max_scroll {
        app.scroll = app.max_scroll;
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    f.render_widget(p, inner_area);
}

/// Light styling for headings, rules, code fences and whole-line emphasis.
/// Everything else is shown as written.
fn markdown_lines(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code = false;

    for raw in text.lines() {
        let trimmed = raw.trim_end();
        if trimmed.trim_start().starts_with("```") {
            in_code = !in_code;
            lines.push(Line::from(Span::styled(
                trimmed.to_string(),
                theme::MUTED_STYLE,
            )));
            continue;
        }
        if in_code {
            lines.push(Line::from(Span::styled(
                trimmed.to_string(),
                theme::MARKDOWN_CODE_STYLE,
            )));
            continue;
        }

        if let Some((_, title)) = gsd_core::markdown::heading(trimmed) {
            lines.push(Line::from(Span::styled(
                title.to_string(),
                theme::MARKDOWN_HEADING_STYLE,
            )));
        } else if trimmed == "---" {
            lines.push(Line::from(Span::styled("─".repeat(40), theme::MUTED_STYLE)));
        } else if let Some(inner) = whole_line_emphasis(trimmed) {
            lines.push(Line::from(Span::styled(
                inner.to_string(),
                theme::EMPTY_STATE_STYLE,
            )));
        } else {
            lines.push(Line::from(trimmed.to_string()));
        }
    }

    lines
}

fn whole_line_emphasis(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('*')?.strip_suffix('*')?;
    if inner.is_empty() || inner.starts_with('*') {
        return None;
    }
    Some(inner)
}

fn render_help(f: &mut Frame, area: Rect) {
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Help")
        .border_style(Style::default().fg(Color::Yellow));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let key = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("{keys:<12}"), Color::Cyan),
            Span::raw(action),
        ])
    };
    let text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("Left/Right", "Previous / next tab"),
        key("j/k", "Scroll document"),
        key("PgUp/PgDn", "Scroll a page"),
        key("Home/End", "Jump to top / bottom"),
        key("r", "Refresh now"),
        key("t", "Toggle auto-refresh"),
        key("e", "Show more of the roadmap"),
        key("?", "Toggle help"),
        key("q", "Quit"),
    ];

    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner_area);
}

fn render_notification(f: &mut Frame, app: &App, area: Rect) {
    let Some(note) = &app.notification else {
        return;
    };
    let width = (note.message.chars().count() as u16 + 4)
        .min(area.width.saturating_sub(2))
        .max(10);
    let toast = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.y + 2,
        width: width.min(area.width),
        height: 3,
    }
    .intersection(area);
    if toast.area() == 0 {
        return;
    }

    f.render_widget(Clear, toast);
    let style = theme::notification_style(note.is_error);
    let p = Paragraph::new(Span::styled(note.message.as_str(), style))
        .block(Block::default().borders(Borders::ALL).border_style(style));
    f.render_widget(p, toast);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100u16.saturating_sub(percent_y)) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100u16.saturating_sub(percent_y)) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100u16.saturating_sub(percent_x)) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100u16.saturating_sub(percent_x)) / 2),
        ])
        .split(vertical[1])[1]
}

fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let mut total: usize = 0;
    for line in lines {
        let line_width = line.width();
        if line_width == 0 {
            total += 1;
        } else {
            total += (line_width + width - 1) / width;
        }
    }
    total.min(u16::MAX as usize) as u16
}
