use gsd_core::PhaseStatus;
use ratatui::style::{Color, Modifier, Style};

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Rgb(142, 192, 124))
    .add_modifier(Modifier::BOLD);
pub const TAB_SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(131, 165, 152))
    .fg(Color::Black)
    .add_modifier(Modifier::BOLD);
pub const ACTIVE_PHASE_STYLE: Style = Style::new()
    .fg(Color::Rgb(184, 187, 38))
    .bg(Color::Rgb(40, 48, 40))
    .add_modifier(Modifier::BOLD);
pub const ACTIVE_PHASE_DIM_STYLE: Style = Style::new()
    .fg(Color::Rgb(104, 157, 106))
    .bg(Color::Rgb(40, 48, 40));
pub const MUTED_STYLE: Style = Style::new()
    .fg(Color::Rgb(146, 131, 116))
    .add_modifier(Modifier::DIM);
pub const EMPTY_STATE_STYLE: Style = Style::new()
    .fg(Color::Rgb(146, 131, 116))
    .add_modifier(Modifier::ITALIC);
pub const COLLAPSED_STYLE: Style = Style::new()
    .fg(Color::Rgb(146, 131, 116))
    .add_modifier(Modifier::DIM)
    .add_modifier(Modifier::ITALIC);
pub const CONCERN_STYLE: Style = Style::new().fg(Color::Rgb(254, 128, 25));
pub const GAUGE_STYLE: Style = Style::new()
    .fg(Color::Rgb(131, 165, 152))
    .bg(Color::Rgb(24, 27, 34));
pub const MARKDOWN_HEADING_STYLE: Style = Style::new()
    .fg(Color::Rgb(250, 189, 47))
    .add_modifier(Modifier::BOLD);
pub const MARKDOWN_CODE_STYLE: Style = Style::new().fg(Color::Rgb(142, 192, 124));

pub mod icons {
    pub const FINISHED: &str = "●";
    pub const IN_PROGRESS: &str = "◐";
    pub const PENDING: &str = "○";
    pub const TODO: &str = "•";
    pub const TODO_DONE: &str = "✓";
    pub const CONCERN: &str = "⚠";
}

pub fn status_icon(status: PhaseStatus) -> &'static str {
    match status {
        PhaseStatus::Completed | PhaseStatus::Shipped => icons::FINISHED,
        PhaseStatus::InProgress => icons::IN_PROGRESS,
        PhaseStatus::Pending => icons::PENDING,
    }
}

pub fn status_color(status: PhaseStatus) -> Color {
    match status {
        PhaseStatus::Completed => Color::Rgb(184, 187, 38),
        PhaseStatus::Shipped => Color::Rgb(104, 157, 106),
        PhaseStatus::InProgress => Color::Rgb(131, 165, 152),
        PhaseStatus::Pending => Color::Rgb(146, 131, 116),
    }
}

pub fn notification_style(is_error: bool) -> Style {
    if is_error {
        Style::new()
            .fg(Color::Rgb(251, 73, 52))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(Color::Rgb(131, 165, 152))
    }
}
