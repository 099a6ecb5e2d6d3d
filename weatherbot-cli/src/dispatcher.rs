//! The read-eval loop: reads commands, routes them, reports through the
//! notification log.

use std::io::{BufRead, Write};

use anyhow::Context;
use weatherbot_core::{WeatherProvider, WeatherResult, format_report};

use crate::command::{Command, Verb, parse_coordinate};
use crate::console::Console;
use crate::notification::{NotificationLog, Severity};

const PROMPT: &str = "\nweatherbot> ";

const WELCOME: &str = "
╔═══════════════════════════════════════════════════════╗
║                                                       ║
║               WEATHER FORECAST CHATBOT                ║
║                                                       ║
║     Get instant weather information for any city!     ║
║                                                       ║
╚═══════════════════════════════════════════════════════╝
";

const HELP: &str = "
═══════════════════════════════════════════════════════
                    COMMAND HELP
═══════════════════════════════════════════════════════
  Commands:
    weather <city>          - Get weather for a city (alias: w)
    location <lat> <lon>    - Get weather by coordinates (alias: loc)
    help                    - Show this help message (alias: h)
    notifications           - View notification history (alias: notif)
    clear                   - Clear notifications
    exit / quit             - Exit the application (alias: q)

  Examples:
    weather London
    weather New York
    location 51.5074 -0.1278
═══════════════════════════════════════════════════════
";

const FREEZING_BELOW_C: f64 = 0.0;
const HOT_ABOVE_C: f64 = 35.0;
const STRONG_WIND_ABOVE_MPS: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

/// Owns the session: one provider, one notification log, one console.
///
/// Commands are handled strictly one at a time; a lookup is awaited to
/// completion before the next line is read.
#[derive(Debug)]
pub struct Dispatcher<W: Write> {
    provider: Box<dyn WeatherProvider>,
    notifications: NotificationLog,
    console: Console<W>,
    state: State,
}

impl<W: Write> Dispatcher<W> {
    pub fn new(provider: Box<dyn WeatherProvider>, console: Console<W>) -> Self {
        Self { provider, notifications: NotificationLog::new(), console, state: State::Running }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    /// Greet the user, then read and handle lines until the session stops.
    ///
    /// End of input counts as `exit`. Bytes that are not valid UTF-8 are
    /// replaced, not rejected. Only an I/O failure on `input` is returned as
    /// an error.
    pub async fn run<R: BufRead>(&mut self, mut input: R) -> anyhow::Result<()> {
        self.show_welcome();
        self.show_help();

        let mut buf = Vec::new();
        while self.state == State::Running {
            self.console.print(PROMPT);
            self.console.flush();

            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .context("Failed to read command from console")?;

            if read == 0 {
                tracing::debug!("end of input, stopping session");
                self.console.println("");
                self.exit();
                continue;
            }

            // Invalid UTF-8 bytes become U+FFFD.
            let line = String::from_utf8_lossy(&buf);
            self.process_line(&line).await;
        }

        self.console.flush();
        Ok(())
    }

    /// Handle one line of input. Blank lines are ignored.
    pub async fn process_line(&mut self, line: &str) {
        let Some(command) = Command::parse(line) else {
            return;
        };
        tracing::debug!(?command, "dispatching");

        match &command.verb {
            Verb::Weather => self.handle_weather(&command).await,
            Verb::Location => self.handle_location(&command).await,
            Verb::Help => self.show_help(),
            Verb::Notifications => self.notifications.render_history(&mut self.console),
            Verb::Clear => self.notifications.clear(&mut self.console),
            Verb::Exit => self.exit(),
            Verb::Unknown(verb) => {
                tracing::debug!(%verb, "unknown command");
                self.notify(
                    "Unknown command. Type 'help' to see available commands.",
                    Severity::Warning,
                );
            }
        }
    }

    async fn handle_weather(&mut self, command: &Command) {
        if command.args.is_empty() {
            self.notify("Please provide a city name. Usage: weather <city>", Severity::Warning);
            return;
        }

        let city = command.joined_args();
        self.notify(format!("Fetching weather data for {city}..."), Severity::Info);

        let result = self.provider.fetch_by_city(&city).await;
        self.console.print(&format_report(&result));

        if !result.is_valid() {
            self.notify(
                "Failed to retrieve weather data. Please check the city name and try again.",
                Severity::Error,
            );
            return;
        }

        self.notify("Weather data retrieved successfully!", Severity::Success);
        for condition in extreme_conditions(&result) {
            self.notifications.append_weather_alert(&mut self.console, &result.city, condition);
        }
    }

    async fn handle_location(&mut self, command: &Command) {
        let [lat, lon] = command.args.as_slice() else {
            self.notify(
                "Please provide latitude and longitude. Usage: location <lat> <lon>",
                Severity::Warning,
            );
            return;
        };

        let (Some(latitude), Some(longitude)) = (parse_coordinate(lat), parse_coordinate(lon))
        else {
            self.notify(
                "Invalid coordinates. Please provide valid latitude and longitude.",
                Severity::Error,
            );
            return;
        };

        self.notify("Fetching weather data for coordinates...", Severity::Info);

        let result = self.provider.fetch_by_coordinates(latitude, longitude).await;
        self.console.print(&format_report(&result));

        if result.is_valid() {
            self.notify("Weather data retrieved successfully!", Severity::Success);
        } else {
            self.notify(
                "Failed to retrieve weather data for the given coordinates.",
                Severity::Error,
            );
        }
    }

    fn show_welcome(&mut self) {
        self.console.print(WELCOME);
        self.console.println("");
        self.notify("Welcome! Type 'help' to see available commands.", Severity::Info);
    }

    fn show_help(&mut self) {
        self.console.print(HELP);
    }

    fn exit(&mut self) {
        self.notify("Thank you for using Weather Bot! Goodbye!", Severity::Info);
        self.state = State::Stopped;
    }

    fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notifications.append(&mut self.console, message, severity);
    }
}

/// Alert conditions for a city lookup. Each check is independent.
pub fn extreme_conditions(result: &WeatherResult) -> Vec<&'static str> {
    let mut alerts = Vec::new();

    if result.temperature_c < FREEZING_BELOW_C {
        alerts.push("Freezing temperatures!");
    }
    if result.temperature_c > HOT_ABOVE_C {
        alerts.push("Very hot weather!");
    }
    if result.wind_speed_mps > STRONG_WIND_ABOVE_MPS {
        alerts.push("Strong winds detected!");
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use weatherbot_core::WeatherQuery;

    type Calls = Arc<Mutex<Vec<WeatherQuery>>>;

    #[derive(Debug)]
    struct FakeProvider {
        result: WeatherResult,
        calls: Calls,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch(&self, query: &WeatherQuery) -> WeatherResult {
            self.calls.lock().unwrap().push(query.clone());
            self.result.clone()
        }
    }

    fn weather(city: &str, temperature_c: f64, wind_speed_mps: f64) -> WeatherResult {
        WeatherResult {
            city: city.into(),
            country: "GB".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
            temperature_c,
            feels_like_c: temperature_c,
            humidity_pct: 50.0,
            wind_speed_mps,
            valid: true,
        }
    }

    fn dispatcher(result: WeatherResult) -> (Dispatcher<Vec<u8>>, Calls) {
        let calls: Calls = Arc::default();
        let provider = FakeProvider { result, calls: Arc::clone(&calls) };
        let console = Console::new(Vec::new(), false);
        (Dispatcher::new(Box::new(provider), console), calls)
    }

    fn messages(d: &Dispatcher<Vec<u8>>) -> Vec<(Severity, String)> {
        d.notifications().entries().iter().map(|n| (n.severity, n.message.clone())).collect()
    }

    fn output(d: &Dispatcher<Vec<u8>>) -> String {
        String::from_utf8_lossy(d.console().get_ref()).into_owned()
    }

    #[tokio::test]
    async fn freezing_city_gets_success_and_alert() {
        let (mut d, calls) = dispatcher(weather("London", -5.0, 3.0));

        d.process_line("weather London").await;

        assert_eq!(*calls.lock().unwrap(), vec![WeatherQuery::City("London".into())]);
        assert_eq!(
            messages(&d),
            vec![
                (Severity::Info, "Fetching weather data for London...".to_string()),
                (Severity::Success, "Weather data retrieved successfully!".to_string()),
                (Severity::Warning, "Weather Alert for London: Freezing temperatures!".to_string()),
            ]
        );
        assert!(output(&d).contains("WEATHER FORECAST REPORT"));
        assert!(output(&d).contains("Temperature: -5°C"));
    }

    #[tokio::test]
    async fn hot_and_windy_alerts_are_independent() {
        let (mut d, _) = dispatcher(weather("Dubai", 41.0, 18.0));

        d.process_line("w Dubai").await;

        let alerts: Vec<_> = messages(&d)
            .into_iter()
            .filter(|(s, _)| *s == Severity::Warning)
            .map(|(_, m)| m)
            .collect();
        assert_eq!(
            alerts,
            vec![
                "Weather Alert for Dubai: Very hot weather!",
                "Weather Alert for Dubai: Strong winds detected!",
            ]
        );
    }

    #[tokio::test]
    async fn mild_weather_raises_no_alerts() {
        let (mut d, _) = dispatcher(weather("Paris", 20.0, 15.0));
        d.process_line("weather Paris").await;
        assert!(messages(&d).iter().all(|(s, _)| *s != Severity::Warning));
    }

    #[tokio::test]
    async fn weather_without_city_warns_and_skips_query() {
        let (mut d, calls) = dispatcher(weather("London", 10.0, 1.0));

        d.process_line("weather").await;

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(
            messages(&d),
            vec![(
                Severity::Warning,
                "Please provide a city name. Usage: weather <city>".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn verb_case_and_aliases_reach_the_same_handler() {
        for line in ["WEATHER Paris", "weather Paris", "w Paris"] {
            let (mut d, calls) = dispatcher(weather("Paris", 18.0, 2.0));
            d.process_line(line).await;
            assert_eq!(*calls.lock().unwrap(), vec![WeatherQuery::City("Paris".into())]);
        }
    }

    #[tokio::test]
    async fn multi_word_city_is_joined_with_single_spaces() {
        let (mut d, calls) = dispatcher(weather("New York", 18.0, 2.0));
        d.process_line("weather  New   York ").await;
        assert_eq!(*calls.lock().unwrap(), vec![WeatherQuery::City("New York".into())]);
    }

    #[tokio::test]
    async fn invalid_city_result_reports_error() {
        let (mut d, calls) = dispatcher(WeatherResult::invalid());

        d.process_line("weather Atlantis").await;

        assert_eq!(calls.lock().unwrap().len(), 1);
        let last = messages(&d).pop().unwrap();
        assert_eq!(last.0, Severity::Error);
        assert!(last.1.starts_with("Failed to retrieve weather data"));
        assert!(output(&d).contains(weatherbot_core::report::INVALID_REPORT));
    }

    #[tokio::test]
    async fn location_queries_by_coordinates_without_alerts() {
        let (mut d, calls) = dispatcher(weather("London", -5.0, 20.0));

        d.process_line("location 51.5074 -0.1278").await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec![WeatherQuery::Coordinates { latitude: 51.5074, longitude: -0.1278 }]
        );
        assert_eq!(
            messages(&d),
            vec![
                (Severity::Info, "Fetching weather data for coordinates...".to_string()),
                (Severity::Success, "Weather data retrieved successfully!".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn non_numeric_coordinates_are_rejected() {
        let (mut d, calls) = dispatcher(weather("London", 10.0, 1.0));

        d.process_line("location abc xyz").await;

        assert!(calls.lock().unwrap().is_empty());
        let msgs = messages(&d);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].0, Severity::Error);
        assert!(msgs[0].1.starts_with("Invalid coordinates"));
    }

    #[tokio::test]
    async fn location_needs_exactly_two_tokens() {
        for line in ["location", "loc 51.5", "location 1 2 3"] {
            let (mut d, calls) = dispatcher(weather("London", 10.0, 1.0));
            d.process_line(line).await;
            assert!(calls.lock().unwrap().is_empty(), "line {line:?}");
            assert_eq!(messages(&d)[0].0, Severity::Warning);
        }
    }

    #[tokio::test]
    async fn invalid_coordinate_result_reports_error() {
        let (mut d, _) = dispatcher(WeatherResult::invalid());
        d.process_line("loc 0 0").await;
        let last = messages(&d).pop().unwrap();
        assert_eq!(
            last,
            (Severity::Error, "Failed to retrieve weather data for the given coordinates.".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_and_blank_lines() {
        let (mut d, _) = dispatcher(weather("London", 10.0, 1.0));

        d.process_line("   ").await;
        assert!(d.notifications().is_empty());

        d.process_line("forecast tomorrow").await;
        assert_eq!(
            messages(&d),
            vec![(
                Severity::Warning,
                "Unknown command. Type 'help' to see available commands.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn help_notifications_and_clear() {
        let (mut d, _) = dispatcher(weather("London", 10.0, 1.0));

        d.process_line("h").await;
        assert!(output(&d).contains("COMMAND HELP"));

        d.process_line("notif").await;
        assert!(output(&d).contains("No notifications."));

        d.process_line("bogus").await;
        d.process_line("CLEAR").await;
        assert_eq!(messages(&d), vec![(Severity::Info, "All notifications cleared.".to_string())]);
    }

    #[tokio::test]
    async fn exit_stops_and_nothing_after_is_read() {
        let (mut d, calls) = dispatcher(weather("London", 10.0, 1.0));

        d.run("exit\nweather London\n".as_bytes()).await.unwrap();

        assert_eq!(d.state(), State::Stopped);
        assert!(calls.lock().unwrap().is_empty());
        let last = messages(&d).pop().unwrap();
        assert_eq!(last.1, "Thank you for using Weather Bot! Goodbye!");
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_the_session() {
        let (mut d, calls) = dispatcher(weather("Munich", 5.0, 1.0));

        d.run(&b"weather M\xfcnchen\nhelp\nexit\n"[..]).await.unwrap();

        assert_eq!(d.state(), State::Stopped);
        assert_eq!(
            *calls.lock().unwrap(),
            vec![WeatherQuery::City("M\u{FFFD}nchen".into())]
        );
        assert_eq!(output(&d).matches("COMMAND HELP").count(), 2);
        let last = messages(&d).pop().unwrap();
        assert_eq!(last.1, "Thank you for using Weather Bot! Goodbye!");
    }

    #[tokio::test]
    async fn read_failure_is_returned() {
        struct Broken;

        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("console gone"))
            }
        }

        let (mut d, _) = dispatcher(weather("London", 10.0, 1.0));
        let err = d.run(std::io::BufReader::new(Broken)).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read command"));
    }

    #[tokio::test]
    async fn quit_aliases_stop_the_session() {
        for line in ["quit", "Q", "EXIT"] {
            let (mut d, _) = dispatcher(weather("London", 10.0, 1.0));
            d.process_line(line).await;
            assert_eq!(d.state(), State::Stopped);
        }
    }

    #[tokio::test]
    async fn end_of_input_is_an_implicit_exit() {
        let (mut d, calls) = dispatcher(weather("Oslo", 5.0, 1.0));

        d.run("\nweather Oslo\n".as_bytes()).await.unwrap();

        assert_eq!(d.state(), State::Stopped);
        assert_eq!(calls.lock().unwrap().len(), 1);
        let msgs = messages(&d);
        assert_eq!(msgs[0].1, "Welcome! Type 'help' to see available commands.");
        assert_eq!(msgs.last().unwrap().1, "Thank you for using Weather Bot! Goodbye!");
    }

    #[test]
    fn extreme_condition_thresholds_are_strict() {
        assert!(extreme_conditions(&weather("X", 0.0, 15.0)).is_empty());
        assert!(extreme_conditions(&weather("X", 35.0, 0.0)).is_empty());
        assert_eq!(extreme_conditions(&weather("X", -0.1, 0.0)), vec!["Freezing temperatures!"]);
        assert_eq!(
            extreme_conditions(&weather("X", -10.0, 15.1)),
            vec!["Freezing temperatures!", "Strong winds detected!"]
        );
    }
}
