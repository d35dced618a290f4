//! Core types and file formats for mapping production companies to their
//! catalog media.
//!
//! This crate has no network dependencies. It owns the in-memory mapping,
//! the mapping CSV that persists it between runs, the comparison CSV that
//! drives a run, and the [`MediaFetcher`] seam that remote catalogs
//! implement.

pub mod error;
pub mod fetcher;
pub mod source;
pub mod store;
pub mod types;

pub use error::CatalogError;
pub use fetcher::MediaFetcher;
pub use source::{SourceReader, SourceRow, count_rows};
pub use store::{MAPPING_HEADER, load, save, try_load};
pub use types::{Cache, CompanyMedia, CompanyNames, MediaItem, MediaKind};
