//! Line-oriented console output with optional color.

use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::style::{Color, Stylize};

/// Output sink shared by the dispatcher and the notification log.
///
/// Write failures are logged and swallowed: nothing shown to the user is
/// worth aborting the session for.
#[derive(Debug)]
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<Stdout> {
    /// Console on stdout, colored only when stdout is a terminal and neither
    /// `--no-color` nor `NO_COLOR` asks otherwise.
    pub fn stdout(no_color: bool) -> Self {
        let color =
            !no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn print(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()) {
            tracing::debug!(error = %err, "console write failed");
        }
    }

    pub fn println(&mut self, text: &str) {
        self.print(text);
        self.print("\n");
    }

    pub fn print_colored(&mut self, text: &str, color: Color) {
        if self.color {
            let styled = text.with(color).to_string();
            self.print(&styled);
        } else {
            self.print(text);
        }
    }

    pub fn flush(&mut self) {
        if let Err(err) = self.out.flush() {
            tracing::debug!(error = %err, "console flush failed");
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
