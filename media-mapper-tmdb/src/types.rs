use serde::Deserialize;
use serde_json::Number;

use media_mapper_core::{MediaItem, MediaKind};

use crate::error::TmdbError;

/// Response body of `/discover/movie` and `/discover/tv`.
#[derive(Debug, Deserialize)]
pub struct DiscoverResponse {
    pub results: Vec<DiscoverResult>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl DiscoverResponse {
    /// Convert every result into a [`MediaItem`] of the given kind.
    pub fn into_items(self, kind: MediaKind) -> Result<Vec<MediaItem>, TmdbError> {
        self.results
            .into_iter()
            .map(|result| result.into_item(kind))
            .collect()
    }
}

/// A single discover result. Movies carry `title`/`release_date`, shows
/// carry `name`/`first_air_date`.
#[derive(Debug, Deserialize)]
pub struct DiscoverResult {
    pub id: i64,
    pub popularity: Number,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

impl DiscoverResult {
    pub fn into_item(self, kind: MediaKind) -> Result<MediaItem, TmdbError> {
        let (title, date, field) = match kind {
            MediaKind::Movie => (self.title, self.release_date, "title"),
            MediaKind::Tv => (self.name, self.first_air_date, "name"),
        };
        let title = title.ok_or_else(|| {
            TmdbError::api(format!("{kind} result {} has no '{field}'", self.id))
        })?;

        Ok(MediaItem {
            id: self.id.to_string(),
            kind,
            title,
            year: year_of(date.as_deref()),
            poster: self.poster_path,
            popularity: format_popularity(&self.popularity),
        })
    }
}

/// First four characters of a `YYYY-MM-DD` date, or empty when absent.
pub fn year_of(date: Option<&str>) -> String {
    date.map(|d| d.chars().take(4).collect::<String>())
        .unwrap_or_default()
}

/// Text form of a popularity score.
///
/// JSON integers stay integral. Floats use the shortest round-trip digits,
/// always carry a fractional part, and switch to exponent notation outside
/// `1e-4..1e16` with a signed two-digit exponent (`1e-05`, `1.5e+16`).
pub fn format_popularity(value: &Number) -> String {
    if value.is_i64() || value.is_u64() {
        return value.to_string();
    }
    match value.as_f64() {
        Some(f) => format_float(f),
        None => value.to_string(),
    }
}

fn format_float(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value:?}");
    }
    // `{:e}` gives the shortest digits, e.g. "1.5e16" or "1e-5"
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIE_PAGE: &str = r#"{
        "page": 1,
        "results": [
            {"id": 7, "popularity": 3.2, "poster_path": null, "title": "Widget", "release_date": "2020-05-01"},
            {"id": 8, "popularity": 41, "poster_path": "/g.jpg", "title": "Gadget"}
        ],
        "total_pages": 3,
        "total_results": 41
    }"#;

    const TV_PAGE: &str = r#"{
        "results": [
            {"id": 100, "popularity": 0.6, "name": "Sprockets", "first_air_date": "1998-01-04", "poster_path": "/s.jpg"},
            {"id": 101, "popularity": 1.25, "name": "Cogs", "first_air_date": ""}
        ]
    }"#;

    #[test]
    fn test_movie_results() {
        let response: DiscoverResponse = serde_json::from_str(MOVIE_PAGE).unwrap();
        assert_eq!(response.total_pages, Some(3));

        let items = response.into_items(MediaKind::Movie).unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].id, "7");
        assert_eq!(items[0].kind, MediaKind::Movie);
        assert_eq!(items[0].title, "Widget");
        assert_eq!(items[0].year, "2020");
        assert_eq!(items[0].poster, None);
        assert_eq!(items[0].popularity, "3.2");

        assert_eq!(items[1].year, "");
        assert_eq!(items[1].poster.as_deref(), Some("/g.jpg"));
        assert_eq!(items[1].popularity, "41");
    }

    #[test]
    fn test_tv_results_use_name_and_first_air_date() {
        let response: DiscoverResponse = serde_json::from_str(TV_PAGE).unwrap();
        assert_eq!(response.total_pages, None);

        let items = response.into_items(MediaKind::Tv).unwrap();
        assert_eq!(items[0].title, "Sprockets");
        assert_eq!(items[0].year, "1998");
        assert_eq!(items[0].kind, MediaKind::Tv);
        assert_eq!(items[1].year, "");
        assert_eq!(items[1].popularity, "1.25");
    }

    #[test]
    fn test_missing_title_is_an_error() {
        let response: DiscoverResponse = serde_json::from_str(TV_PAGE).unwrap();
        // TV results have no "title" field
        let err = response.into_items(MediaKind::Movie).unwrap_err();
        assert!(matches!(err, TmdbError::Api(_)));
    }

    #[test]
    fn test_missing_results_fails_to_parse() {
        let parsed = serde_json::from_str::<DiscoverResponse>(r#"{"status_code": 7}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(Some("2021-12-31")), "2021");
        assert_eq!(year_of(Some("20")), "20");
        assert_eq!(year_of(Some("")), "");
        assert_eq!(year_of(None), "");
    }

    #[test]
    fn test_format_popularity() {
        let popularity = |json: &str| format_popularity(&serde_json::from_str(json).unwrap());
        assert_eq!(popularity("3.2"), "3.2");
        assert_eq!(popularity("0.6"), "0.6");
        assert_eq!(popularity("41"), "41");
        assert_eq!(popularity("10.0"), "10.0");
        assert_eq!(popularity("0.0"), "0.0");
        assert_eq!(popularity("123.456"), "123.456");
        assert_eq!(popularity("0.0001"), "0.0001");
        assert_eq!(popularity("1e-05"), "1e-05");
        assert_eq!(popularity("2.5e-7"), "2.5e-07");
        assert_eq!(popularity("1e16"), "1e+16");
        assert_eq!(popularity("1234567890123456.0"), "1234567890123456.0");
    }
}
