//! Human-readable rendering of a [`WeatherResult`].

use crate::model::WeatherResult;

pub const INVALID_REPORT: &str =
    "Error: Unable to retrieve weather data. Please check the city name or your API key.";

const BORDER: &str = "════════════════════════════════════════";

/// Render a bordered report panel, or [`INVALID_REPORT`] for an invalid result.
///
/// Numbers are truncated toward zero to whole display units; text longer than
/// its column is clipped so the panel keeps a fixed width.
pub fn format_report(result: &WeatherResult) -> String {
    if !result.is_valid() {
        return INVALID_REPORT.to_string();
    }

    let location = format!("{}, {}", result.city, result.country);
    let temperature = format!("{}°C", result.temperature_c.trunc() as i64);
    let feels_like = format!("{}°C", result.feels_like_c.trunc() as i64);
    let humidity = format!("{}%", result.humidity_pct.trunc() as i64);
    let wind = format!("{} m/s", result.wind_speed_mps.trunc() as i64);

    let mut out = String::new();
    out.push_str(&format!("\n╔{BORDER}╗\n"));
    out.push_str("║        WEATHER FORECAST REPORT         ║\n");
    out.push_str(&format!("╠{BORDER}╣\n"));
    out.push_str(&format!("║ Location: {location:<29.29}║\n"));
    out.push_str(&format!("║ Condition: {:<28.28}║\n", result.description));
    out.push_str(&format!("║ Temperature: {temperature:<26}║\n"));
    out.push_str(&format!("║ Feels Like: {feels_like:<27}║\n"));
    out.push_str(&format!("║ Humidity: {humidity:<29}║\n"));
    out.push_str(&format!("║ Wind Speed: {wind:<27}║\n"));
    out.push_str(&format!("╚{BORDER}╝\n"));
    out
}
