use crate::{
    Config, WeatherQuery, WeatherResult, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of current weather conditions.
///
/// Implementations never return an error: every failure collapses into
/// [`WeatherResult::invalid`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> WeatherResult;

    async fn fetch_by_city(&self, name: &str) -> WeatherResult {
        self.fetch(&WeatherQuery::City(name.to_owned())).await
    }

    async fn fetch_by_coordinates(&self, latitude: f64, longitude: f64) -> WeatherResult {
        self.fetch(&WeatherQuery::Coordinates { latitude, longitude }).await
    }
}

/// Construct the OpenWeather provider from config and a resolved API key.
pub fn provider_from_config(
    api_key: &str,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow::anyhow!(
            "An API key is required to use the weather service.\n\
             Hint: get a free key from https://openweathermap.org/api and run `weatherbot configure`."
        ));
    }

    let provider = OpenWeatherProvider::builder(api_key)
        .endpoint(config.endpoint())
        .timeout(config.timeout())
        .build()?;

    Ok(Box::new(provider))
}
