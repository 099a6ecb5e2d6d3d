//! In-memory, append-only log of user-facing notifications.

use std::io::Write;

use chrono::{DateTime, Local};
use crossterm::style::Color;

use crate::console::Console;

const HISTORY_RULE: &str = "═══════════════════════════════════════";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

/// How a severity is shown on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub symbol: &'static str,
    pub color: Color,
}

// Indexed by `Severity as usize`; keep in declaration order.
const PRESENTATIONS: [Presentation; 4] = [
    Presentation { symbol: "[i]", color: Color::Blue },
    Presentation { symbol: "[!]", color: Color::Yellow },
    Presentation { symbol: "[X]", color: Color::Red },
    Presentation { symbol: "[✓]", color: Color::Green },
];

impl Severity {
    pub const ALL: [Severity; 4] =
        [Severity::Info, Severity::Warning, Severity::Error, Severity::Success];

    pub fn presentation(self) -> Presentation {
        PRESENTATIONS[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notification and show it on `console` right away.
    pub fn append<W: Write>(
        &mut self,
        console: &mut Console<W>,
        message: impl Into<String>,
        severity: Severity,
    ) {
        let notification =
            Notification { message: message.into(), severity, timestamp: Local::now() };
        tracing::debug!(%severity, message = %notification.message, "notification");

        render_entry(console, &notification);
        self.entries.push(notification);
    }

    pub fn info<W: Write>(&mut self, console: &mut Console<W>, message: impl Into<String>) {
        self.append(console, message, Severity::Info);
    }

    pub fn append_weather_alert<W: Write>(
        &mut self,
        console: &mut Console<W>,
        city: &str,
        condition: &str,
    ) {
        self.append(console, format!("Weather Alert for {city}: {condition}"), Severity::Warning);
    }

    pub fn render_history<W: Write>(&self, console: &mut Console<W>) {
        if self.entries.is_empty() {
            console.println("No notifications.");
            return;
        }

        console.println(&format!("\n{HISTORY_RULE}"));
        console.println("         NOTIFICATION HISTORY          ");
        console.println(HISTORY_RULE);

        for notification in &self.entries {
            console.print(&format!("[{}] ", notification.timestamp.format("%H:%M:%S")));
            render_entry(console, notification);
        }

        console.println(&format!("{HISTORY_RULE}\n"));
    }

    /// Drop every entry, then record the "cleared" notice, so the log holds
    /// exactly one entry afterwards.
    pub fn clear<W: Write>(&mut self, console: &mut Console<W>) {
        self.entries.clear();
        self.info(console, "All notifications cleared.");
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn render_entry<W: Write>(console: &mut Console<W>, notification: &Notification) {
    let presentation = notification.severity.presentation();
    console.print_colored(&format!("{} ", presentation.symbol), presentation.color);
    console.println(&notification.message);
}
