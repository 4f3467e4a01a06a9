//! Application state and page navigation.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::config::Settings;
use crate::pages::{
    AlertsPage, AlertsSnapshot, DashboardPage, DashboardSnapshot, ErrorsPage, ErrorsSnapshot,
    LogsPage, LogsSnapshot,
};
use crate::source::LogSource;
use crate::theme::{Theme, ThemeHandle, ThemeMode, ThemeProvider};

/// The page shown in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Summary cards and the latest logs.
    #[default]
    Dashboard,
    /// Filtered, paginated log search.
    Logs,
    /// Error trend, severity and per-service breakdowns.
    Errors,
    /// Alert trend and active alerts.
    Alerts,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Dashboard, Page::Logs, Page::Errors, Page::Alerts];

    /// Cycle to the next page.
    pub fn next(self) -> Self {
        match self {
            Page::Dashboard => Page::Logs,
            Page::Logs => Page::Errors,
            Page::Errors => Page::Alerts,
            Page::Alerts => Page::Dashboard,
        }
    }

    /// Cycle to the previous page.
    pub fn prev(self) -> Self {
        match self {
            Page::Dashboard => Page::Alerts,
            Page::Logs => Page::Dashboard,
            Page::Errors => Page::Logs,
            Page::Alerts => Page::Errors,
        }
    }

    /// Returns the display label for this page.
    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Logs => "Logs",
            Page::Errors => "Errors",
            Page::Alerts => "Alerts",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The queries of whichever page is open.
#[derive(Debug)]
pub enum Mounted {
    Dashboard(DashboardPage),
    Logs(LogsPage),
    Errors(ErrorsPage),
    Alerts(AlertsPage),
}

impl Mounted {
    pub fn page(&self) -> Page {
        match self {
            Mounted::Dashboard(_) => Page::Dashboard,
            Mounted::Logs(_) => Page::Logs,
            Mounted::Errors(_) => Page::Errors,
            Mounted::Alerts(_) => Page::Alerts,
        }
    }
}

/// What an open page currently shows, as exported.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum PageSnapshot {
    Dashboard(DashboardSnapshot),
    Logs(LogsSnapshot),
    Errors(ErrorsSnapshot),
    Alerts(AlertsSnapshot),
}

/// Main application state.
///
/// Owns the log source, settings and theme. At most one page is mounted at
/// a time; opening another drops the previous page's queries first.
pub struct App {
    pub running: bool,
    source: Arc<dyn LogSource>,
    settings: Settings,
    theme: ThemeProvider,
    current_page: Page,
    mounted: Option<Mounted>,
}

impl App {
    pub fn new(source: Arc<dyn LogSource>, settings: Settings, theme: ThemeMode) -> Self {
        Self {
            running: true,
            source,
            settings,
            theme: ThemeProvider::new(theme),
            current_page: Page::default(),
            mounted: None,
        }
    }

    pub fn source_description(&self) -> String {
        self.source.description()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn theme_handle(&self) -> ThemeHandle {
        self.theme.handle()
    }

    pub fn toggle_theme(&self) -> ThemeMode {
        self.theme.toggle()
    }

    pub fn current_page(&self) -> Page {
        self.current_page
    }

    /// Unmount the current page and mount `page`.
    pub fn open(&mut self, page: Page) {
        self.close();

        let source = &self.source;
        let mounted = match page {
            Page::Dashboard => Mounted::Dashboard(DashboardPage::mount(source, &self.settings)),
            Page::Logs => Mounted::Logs(LogsPage::mount(source, &self.settings)),
            Page::Errors => Mounted::Errors(ErrorsPage::mount(source, &self.settings)),
            Page::Alerts => Mounted::Alerts(AlertsPage::mount(source)),
        };
        self.mounted = Some(mounted);
        self.current_page = page;
        info!(page = page.label(), "page opened");
    }

    /// Unmount the current page, cancelling its queries.
    pub fn close(&mut self) {
        if let Some(previous) = self.mounted.take() {
            info!(page = previous.page().label(), "page closed");
        }
    }

    pub fn next_page(&mut self) {
        self.open(self.current_page.next());
    }

    pub fn prev_page(&mut self) {
        self.open(self.current_page.prev());
    }

    pub fn mounted(&self) -> Option<&Mounted> {
        self.mounted.as_ref()
    }

    pub fn mounted_mut(&mut self) -> Option<&mut Mounted> {
        self.mounted.as_mut()
    }

    pub fn logs_mut(&mut self) -> Option<&mut LogsPage> {
        match self.mounted.as_mut() {
            Some(Mounted::Logs(logs)) => Some(logs),
            _ => None,
        }
    }

    pub fn errors_mut(&mut self) -> Option<&mut ErrorsPage> {
        match self.mounted.as_mut() {
            Some(Mounted::Errors(errors)) => Some(errors),
            _ => None,
        }
    }

    /// Wait until every query on the open page has stopped loading.
    pub async fn settled(&self) {
        match self.mounted.as_ref() {
            Some(Mounted::Dashboard(page)) => page.settled().await,
            Some(Mounted::Logs(page)) => {
                page.settled().await;
            }
            Some(Mounted::Errors(page)) => page.settled().await,
            Some(Mounted::Alerts(page)) => page.settled().await,
            None => {}
        }
    }

    pub fn snapshot(&self) -> Option<PageSnapshot> {
        let snapshot = match self.mounted.as_ref()? {
            Mounted::Dashboard(page) => PageSnapshot::Dashboard(page.snapshot()),
            Mounted::Logs(page) => PageSnapshot::Logs(page.snapshot()),
            Mounted::Errors(page) => PageSnapshot::Errors(page.snapshot()),
            Mounted::Alerts(page) => PageSnapshot::Alerts(page.snapshot()),
        };
        Some(snapshot)
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
        self.close();
    }

    /// Export the open page's state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(snapshot) = self.snapshot() else {
            anyhow::bail!("No page open to export");
        };

        let mut export = serde_json::Map::new();
        export.insert("source".to_string(), serde_json::json!(self.source_description()));
        export.insert("theme".to_string(), serde_json::json!(self.theme.mode().as_str()));
        export.insert("view".to_string(), serde_json::to_value(&snapshot)?);

        let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "state exported");
        Ok(())
    }
}
