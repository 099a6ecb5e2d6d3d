use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{WeatherQuery, WeatherResult};

use super::WeatherProvider;

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything that can go wrong between sending a query and holding a result.
/// Never leaves this module: [`OpenWeatherProvider::fetch`] logs it and
/// returns an invalid result instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to OpenWeather failed: {0}")]
    Transport(reqwest::Error),

    #[error("OpenWeather responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse OpenWeather JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("OpenWeather rejected the query (cod {cod}): {message}")]
    Rejected { cod: String, message: String },
}

// The request URL carries `appid`, so it is stripped before the error is
// stored or logged.
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.without_url())
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

#[derive(Debug)]
pub struct OpenWeatherProviderBuilder {
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

impl OpenWeatherProviderBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> anyhow::Result<OpenWeatherProvider> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(OpenWeatherProvider { api_key: self.api_key, endpoint: self.endpoint, http })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: impl Into<String>) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherResult, FetchError> {
        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::City(name) => vec![("q", name.clone())],
            WeatherQuery::Coordinates { latitude, longitude } => {
                vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
            }
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let res = self.http.get(&self.endpoint).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%status, bytes = body.len(), "received OpenWeather response");

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        parse_current(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch(&self, query: &WeatherQuery) -> WeatherResult {
        match self.fetch_current(query).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "weather lookup failed");
                WeatherResult::invalid()
            }
        }
    }
}

// Every field is optional; a missing one leaves the output at its zero value.

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    cod: Option<Value>,
    message: Option<Value>,
    name: Option<String>,
    sys: Option<OwSys>,
    weather: Option<Vec<OwWeather>>,
    main: Option<OwMain>,
    wind: Option<OwWind>,
}

fn parse_current(body: &str) -> Result<WeatherResult, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    if let Some(cod) = parsed.cod.as_ref().filter(|c| !is_success_code(c)) {
        return Err(FetchError::Rejected {
            cod: value_text(cod),
            message: parsed.message.as_ref().map(value_text).unwrap_or_default(),
        });
    }

    let condition = parsed.weather.as_ref().and_then(|w| w.first());
    let main = parsed.main.as_ref();

    Ok(WeatherResult {
        city: parsed.name.unwrap_or_default(),
        country: parsed.sys.and_then(|s| s.country).unwrap_or_default(),
        description: condition.and_then(|c| c.description.clone()).unwrap_or_default(),
        icon: condition.and_then(|c| c.icon.clone()).unwrap_or_default(),
        temperature_c: main.and_then(|m| m.temp).unwrap_or_default(),
        feels_like_c: main.and_then(|m| m.feels_like).unwrap_or_default(),
        humidity_pct: main.and_then(|m| m.humidity).unwrap_or_default(),
        wind_speed_mps: parsed.wind.and_then(|w| w.speed).unwrap_or_default(),
        valid: true,
    })
}

/// OpenWeather reports `cod` as a number on success and as a string on most
/// errors, so accept both spellings of 200.
fn is_success_code(cod: &Value) -> bool {
    match cod {
        Value::Number(n) => n.as_i64() == Some(200),
        Value::String(s) => s.trim() == "200",
        _ => false,
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
