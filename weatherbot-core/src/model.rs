/// The two shapes of a current-conditions lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQuery::City(name) => f.write_str(name),
            WeatherQuery::Coordinates { latitude, longitude } => {
                write!(f, "{latitude}, {longitude}")
            }
        }
    }
}

/// Outcome of a single weather lookup.
///
/// When `valid` is false none of the other fields carry data; they are left
/// at their zero values and must not be shown to the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherResult {
    pub city: String,
    pub country: String,
    pub description: String,
    pub icon: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub valid: bool,
}

impl WeatherResult {
    /// The result every failed lookup collapses to.
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
