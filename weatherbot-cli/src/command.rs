//! Parsing of one line of user input into a [`Command`].

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Weather,
    Location,
    Help,
    Notifications,
    Clear,
    Exit,
    Unknown(String),
}

impl Verb {
    /// Case-insensitive; aliases map onto the same verb.
    pub fn from_token(token: &str) -> Self {
        let lower = token.to_lowercase();

        match lower.as_str() {
            "weather" | "w" => Verb::Weather,
            "location" | "loc" => Verb::Location,
            "help" | "h" => Verb::Help,
            "notifications" | "notif" => Verb::Notifications,
            "clear" => Verb::Clear,
            "exit" | "quit" | "q" => Verb::Exit,
            _ => Verb::Unknown(lower),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    pub args: Vec<String>,
}

impl Command {
    /// Split a line on whitespace. Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let verb = Verb::from_token(tokens.next()?);
        let args = tokens.map(str::to_owned).collect();

        Some(Self { verb, args })
    }

    /// Arguments re-joined with single spaces, e.g. a multi-word city name.
    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }
}

/// A latitude or longitude token. Rejects anything that is not a finite number.
pub fn parse_coordinate(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}
