use crate::view::{expand_label, EXPAND_LEVELS};
use crossterm::event::{KeyCode, KeyEvent};
use gsd_core::{PlanningRoot, ProjectSnapshot};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Summary,
    Context,
    Research,
    Plans,
    Review,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Summary,
        Tab::Context,
        Tab::Research,
        Tab::Plans,
        Tab::Review,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Summary => "Summary",
            Tab::Context => "Context (Discuss)",
            Tab::Research => "Research",
            Tab::Plans => "Plans",
            Tab::Review => "Review (Verify)",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
    expires_at: Instant,
}

pub struct App {
    pub planning: PlanningRoot,
    pub project_name: String,
    pub snapshot: ProjectSnapshot,
    pub tab: Tab,
    pub expand_index: usize,
    pub auto_refresh: bool,
    pub show_help: bool,
    pub scroll: u16,
    pub max_scroll: u16,
    pub page_height: u16,
    pub pulse_on: bool,
    pub notification: Option<Notification>,
    pub last_refreshed: Option<String>,
    pub last_title: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(root: PathBuf, auto_refresh: bool) -> Self {
        let project_name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        Self {
            planning: PlanningRoot::new(root),
            project_name,
            snapshot: ProjectSnapshot::default(),
            tab: Tab::Dashboard,
            expand_index: 0,
            auto_refresh,
            show_help: false,
            scroll: 0,
            max_scroll: 0,
            page_height: 0,
            pulse_on: true,
            notification: None,
            last_refreshed: None,
            last_title: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn title(&self) -> String {
        let status = if self.auto_refresh { "ON" } else { "OFF" };
        format!(
            "GSD Dashboard - {} [Auto-Refresh: {status}]",
            self.project_name
        )
    }

    /// Returns the window title when it differs from the last one handed out.
    pub fn take_title_change(&mut self) -> Option<String> {
        let title = self.title();
        if self.last_title.as_ref() == Some(&title) {
            return None;
        }
        self.last_title = Some(title.clone());
        Some(title)
    }

    pub fn expand_level(&self) -> Option<usize> {
        EXPAND_LEVELS[self.expand_index % EXPAND_LEVELS.len()]
    }

    pub fn refresh(&mut self) {
        let snapshot = self.planning.snapshot();
        if !snapshot.issues.is_empty() {
            self.notify_error(format!("Refresh error: {}", snapshot.issues.join("; ")));
        }
        debug!(
            phases = snapshot.roadmap.phases.len(),
            issues = snapshot.issues.len(),
            "dashboard refreshed"
        );
        self.snapshot = snapshot;
        self.last_refreshed = Some(chrono::Local::now().format("%H:%M:%S").to_string());
    }

    /// A change was seen under `.planning/`. Dropped while auto-refresh is off.
    pub fn on_planning_changed(&mut self) {
        if self.auto_refresh {
            self.refresh();
        }
    }

    pub fn on_tick(&mut self) {
        self.pulse_on = !self.pulse_on;
        self.expire_notification(Instant::now());
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.set_notification(message.into(), false);
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.set_notification(message.into(), true);
    }

    fn set_notification(&mut self, message: String, is_error: bool) {
        self.notification = Some(Notification {
            message,
            is_error,
            expires_at: Instant::now() + NOTIFICATION_TTL,
        });
    }

    fn expire_notification(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|note| note.expires_at <= now)
        {
            self.notification = None;
        }
    }

    pub fn toggle_auto_refresh(&mut self) {
        self.auto_refresh = !self.auto_refresh;
        info!(enabled = self.auto_refresh, "auto-refresh toggled");
        if self.auto_refresh {
            self.notify("Auto-Refresh Enabled");
            self.refresh();
        } else {
            self.notify("Auto-Refresh Disabled");
        }
    }

    pub fn cycle_expand(&mut self) {
        self.expand_index = (self.expand_index + 1) % EXPAND_LEVELS.len();
        self.notify(format!(
            "Roadmap: show last {}",
            expand_label(self.expand_level())
        ));
    }

    fn select_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.scroll = 0;
            self.max_scroll = 0;
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll as i32 + delta).clamp(0, self.max_scroll as i32);
        self.scroll = next as u16;
    }

    fn page(&self) -> i32 {
        self.page_height.max(1) as i32
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                self.refresh();
            }
            KeyCode::Char('t') => {
                self.toggle_auto_refresh();
            }
            KeyCode::Char('e') => {
                self.cycle_expand();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Right | KeyCode::Tab => {
                self.select_tab(self.tab.next());
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.select_tab(self.tab.prev());
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::PageDown => self.scroll_by(self.page()),
            KeyCode::PageUp => self.scroll_by(-self.page()),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = self.max_scroll,
            _ => {}
        }
    }
}
