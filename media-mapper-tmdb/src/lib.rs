//! TMDB discover API client.
//!
//! Implements [`media_mapper_core::MediaFetcher`] on top of the
//! `/discover/movie` and `/discover/tv` endpoints, filtered by production
//! company.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::TmdbClient;
pub use config::{ConfigOverrides, TmdbConfig, config_path};
pub use error::TmdbError;
pub use types::{DiscoverResponse, DiscoverResult};
