//! Core library for the `weatherbot` CLI.
//!
//! This crate defines:
//! - Configuration & credentials storage
//! - The weather provider abstraction and its OpenWeatherMap implementation
//! - Shared domain models (queries, results) and report rendering
//!
//! It is used by `weatherbot-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod model;
pub mod provider;
pub mod report;

pub use config::Config;
pub use model::{WeatherQuery, WeatherResult};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use report::format_report;
