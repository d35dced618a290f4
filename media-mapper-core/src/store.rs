//! Mapping file persistence.
//!
//! The mapping CSV is both the program's output and its resume state. Every
//! company that has been checked appears at least once: companies without
//! any media get a single placeholder row carrying only the id and name.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::types::{Cache, CompanyNames, MediaItem, MediaKind};

/// Column order of the mapping file.
pub const MAPPING_HEADER: [&str; 8] = [
    "company_id",
    "company_name",
    "id",
    "type",
    "title",
    "year",
    "popularity",
    "poster",
];

#[derive(Debug, Deserialize)]
struct MappingRow {
    company_id: String,
    company_name: String,
    id: String,
    #[serde(rename = "type")]
    kind: String,
    title: String,
    year: String,
    popularity: String,
    poster: String,
}

#[derive(Debug, Serialize)]
struct MappingRecord<'a> {
    company_id: &'a str,
    company_name: &'a str,
    id: &'a str,
    #[serde(rename = "type")]
    kind: Option<MediaKind>,
    title: &'a str,
    year: &'a str,
    popularity: &'a str,
    poster: &'a str,
}

impl<'a> MappingRecord<'a> {
    fn placeholder(company_id: &'a str, company_name: &'a str) -> Self {
        Self {
            company_id,
            company_name,
            id: "",
            kind: None,
            title: "",
            year: "",
            popularity: "",
            poster: "",
        }
    }

    fn item(company_id: &'a str, company_name: &'a str, item: &'a MediaItem) -> Self {
        Self {
            company_id,
            company_name,
            id: &item.id,
            kind: Some(item.kind),
            title: &item.title,
            year: &item.year,
            popularity: &item.popularity,
            poster: item.poster.as_deref().unwrap_or(""),
        }
    }
}

/// Load a mapping file, starting empty if it cannot be read.
///
/// A missing file is the normal first-run case and is only logged at debug
/// level; any other failure is logged as a warning.
pub fn load(path: &Path) -> (Cache, CompanyNames) {
    match try_load(path) {
        Ok(loaded) => loaded,
        Err(CatalogError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No existing mapping at {}, starting fresh", path.display());
            (Cache::new(), CompanyNames::new())
        }
        Err(e) => {
            log::warn!(
                "Error while loading existing mapping {}: {e}. Starting with an empty cache",
                path.display()
            );
            (Cache::new(), CompanyNames::new())
        }
    }
}

/// Load a mapping file, returning the first error encountered.
pub fn try_load(path: &Path) -> Result<(Cache, CompanyNames), CatalogError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut cache = Cache::new();
    let mut names = CompanyNames::new();

    for result in reader.deserialize::<MappingRow>() {
        let row = result?;
        if row.company_id.is_empty() {
            continue;
        }

        names.record_first(&row.company_id, &row.company_name);
        let media = cache.insert_company(&row.company_id);

        // Blank id marks a company that was checked and had no results
        if row.id.is_empty() {
            continue;
        }

        media.upsert(MediaItem {
            id: row.id,
            kind: row.kind.parse()?,
            title: row.title,
            year: row.year,
            poster: if row.poster.is_empty() {
                None
            } else {
                Some(row.poster)
            },
            popularity: row.popularity,
        });
    }

    log::debug!(
        "Loaded {} companies ({} items) from {}",
        cache.len(),
        cache.item_count(),
        path.display()
    );
    Ok((cache, names))
}

/// Path of the sibling file a save is staged in.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Write the whole mapping, replacing `path` only once the new file is complete.
///
/// Returns the number of data rows written.
pub fn save(cache: &Cache, names: &CompanyNames, path: &Path) -> Result<usize, CatalogError> {
    let staged = staging_path(path);
    let result = write_staged(cache, names, &staged)
        .and_then(|rows| fs::rename(&staged, path).map(|()| rows).map_err(CatalogError::from));
    let rows = match result {
        Ok(rows) => rows,
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&staged) {
                log::debug!("Could not remove {}: {cleanup}", staged.display());
            }
            return Err(e);
        }
    };

    log::debug!("Saved {rows} rows to {}", path.display());
    Ok(rows)
}

fn write_staged(cache: &Cache, names: &CompanyNames, staged: &Path) -> Result<usize, CatalogError> {
    let file = File::create(staged)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(MAPPING_HEADER)?;
    let mut rows = 0usize;

    for (company_id, media) in cache.iter() {
        let company_name = names.get(company_id).unwrap_or("");
        if media.is_empty() {
            writer.serialize(MappingRecord::placeholder(company_id, company_name))?;
            rows += 1;
            continue;
        }
        for item in media.items() {
            writer.serialize(MappingRecord::item(company_id, company_name, item))?;
            rows += 1;
        }
    }

    // Named companies that never made it into the cache are still "checked"
    for company_id in names.ids() {
        if cache.contains(company_id) {
            continue;
        }
        let company_name = names.get(company_id).unwrap_or("");
        writer.serialize(MappingRecord::placeholder(company_id, company_name))?;
        rows += 1;
    }

    writer.flush()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(rows)
}
