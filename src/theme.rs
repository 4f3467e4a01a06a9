//! Theme configuration.
//!
//! Supports light and dark palettes with automatic terminal detection.
//! The root [`ThemeProvider`] is the only thing that can change the mode;
//! everything else holds a read-only [`ThemeHandle`].

use std::fmt;

use logwatch_types::{AlertSeverity, Environment, LogLevel};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::queries::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// Pick a mode from the terminal background luminance.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color and style palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub mode: ThemeMode,
    /// Accent color for highlights and active elements.
    pub primary: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
}

impl Theme {
    /// Gold on black.
    pub fn dark() -> Self {
        let primary = Color::Rgb(0xFF, 0xD7, 0x00);
        Self {
            mode: ThemeMode::Dark,
            primary,
            error: Color::Rgb(0xFF, 0x5A, 0x5F),
            warning: Color::Rgb(0xFF, 0xD7, 0x00),
            info: Color::Rgb(0x4D, 0xA3, 0xFF),
            text: Color::Rgb(0xF5, 0xF6, 0xF8),
            muted: Color::Rgb(0xB9, 0xBD, 0xC7),
            border: Color::Rgb(0x5C, 0x51, 0x1A),
            header: Style::default().fg(primary).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::Rgb(0x1E, 0x1F, 0x24)).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(primary).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Rgb(0xB9, 0xBD, 0xC7)),
        }
    }

    /// Gold on white.
    pub fn light() -> Self {
        let primary = Color::Rgb(0xC1, 0x9A, 0x2B);
        Self {
            mode: ThemeMode::Light,
            primary,
            error: Color::Rgb(0xC6, 0x28, 0x28),
            warning: Color::Rgb(0xF9, 0xA8, 0x25),
            info: Color::Rgb(0x15, 0x65, 0xC0),
            text: Color::Rgb(0x1A, 0x1A, 0x1A),
            muted: Color::Rgb(0x55, 0x55, 0x55),
            border: Color::Rgb(0xE0, 0xE0, 0xE0),
            header: Style::default().fg(primary).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::Rgb(0xEC, 0xEC, 0xEC)).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(primary).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Rgb(0x55, 0x55, 0x55)),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        Self::for_mode(ThemeMode::detect())
    }

    pub fn level_style(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Error => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
            LogLevel::Warn => Style::default().fg(self.warning).add_modifier(Modifier::BOLD),
            LogLevel::Info | LogLevel::Debug | LogLevel::Trace => Style::default().fg(self.info),
        }
    }

    pub fn env_style(&self, env: Environment) -> Style {
        match env {
            Environment::Prod => Style::default().fg(self.error),
            Environment::Stage => Style::default().fg(self.warning),
            Environment::Dev | Environment::Staging | Environment::Qa => {
                Style::default().fg(self.info)
            }
        }
    }

    pub fn alert_style(&self, severity: AlertSeverity) -> Style {
        match severity {
            AlertSeverity::High => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
            AlertSeverity::Medium => Style::default().fg(self.warning),
            AlertSeverity::Low => Style::default().fg(self.info),
        }
    }

    /// Slice color for the severity distribution.
    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Error => self.error,
            Severity::Warn => self.warning,
            Severity::Info => self.info,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Root-owned theme state. The single place the mode can change.
#[derive(Debug)]
pub struct ThemeProvider {
    mode: watch::Sender<ThemeMode>,
}

impl ThemeProvider {
    pub fn new(mode: ThemeMode) -> Self {
        let (mode, _) = watch::channel(mode);
        Self { mode }
    }

    pub fn mode(&self) -> ThemeMode {
        *self.mode.borrow()
    }

    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.mode())
    }

    /// A read-only view for consumers.
    pub fn handle(&self) -> ThemeHandle {
        ThemeHandle {
            mode: self.mode.subscribe(),
        }
    }

    pub fn set_mode(&self, mode: ThemeMode) {
        let previous = self.mode.send_replace(mode);
        if previous != mode {
            info!(%mode, "theme changed");
        }
    }

    /// Flip between dark and light, returning the new mode.
    pub fn toggle(&self) -> ThemeMode {
        let mode = self.mode().toggled();
        self.set_mode(mode);
        mode
    }
}

impl Default for ThemeProvider {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

/// Read-only access to the current theme.
#[derive(Debug, Clone)]
pub struct ThemeHandle {
    mode: watch::Receiver<ThemeMode>,
}

impl ThemeHandle {
    pub fn mode(&self) -> ThemeMode {
        *self.mode.borrow()
    }

    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.mode())
    }

    /// Wait for the next mode change. Returns `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<ThemeMode> {
        self.mode.changed().await.ok()?;
        Some(*self.mode.borrow_and_update())
    }
}
