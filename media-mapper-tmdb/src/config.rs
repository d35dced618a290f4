use std::path::PathBuf;

use crate::error::TmdbError;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Pages read per discover query unless configured otherwise.
pub const DEFAULT_MAX_PAGES: u32 = 1;

pub const API_KEY_VAR: &str = "TMDB_API_KEY";
pub const BASE_URL_VAR: &str = "TMDB_BASE_URL";

/// Settings for [`crate::TmdbClient`].
#[derive(Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    /// Upper bound on pages followed per query (at least 1).
    pub max_pages: u32,
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_pages: Option<u32>,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    tmdb: Option<TmdbSection>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct TmdbSection {
    api_key: Option<String>,
    base_url: Option<String>,
    max_pages: Option<u32>,
}

impl TmdbConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Resolve settings from overrides, environment, config file, then defaults.
    ///
    /// Priority: overrides > env vars > config file > built-in defaults.
    /// The API key is required.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, TmdbError> {
        let file = load_config_file();
        resolve(overrides, |var| std::env::var(var).ok(), file.as_ref())
    }
}

fn resolve(
    overrides: ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
    file: Option<&TmdbSection>,
) -> Result<TmdbConfig, TmdbError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let api_key = non_empty(overrides.api_key)
        .or_else(|| non_empty(env(API_KEY_VAR)))
        .or_else(|| non_empty(file.and_then(|f| f.api_key.clone())))
        .ok_or_else(|| {
            TmdbError::config(format!(
                "Missing API key. Set {API_KEY_VAR} env var, pass --api-key, or add api_key to the [tmdb] section of the config file"
            ))
        })?;

    let base_url = non_empty(overrides.base_url)
        .or_else(|| non_empty(env(BASE_URL_VAR)))
        .or_else(|| non_empty(file.and_then(|f| f.base_url.clone())))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let max_pages = overrides
        .max_pages
        .or_else(|| file.and_then(|f| f.max_pages))
        .unwrap_or(DEFAULT_MAX_PAGES);
    if max_pages == 0 {
        return Err(TmdbError::config("max_pages must be at least 1"));
    }

    Ok(TmdbConfig {
        api_key,
        base_url: base_url.trim_end_matches('/').to_string(),
        max_pages,
    })
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("media-mapper").join("config.toml"))
}

fn parse_config_file(content: &str) -> Result<Option<TmdbSection>, toml::de::Error> {
    let config: ConfigFile = toml::from_str(content)?;
    Ok(config.tmdb)
}

fn load_config_file() -> Option<TmdbSection> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    match parse_config_file(&content) {
        Ok(section) => section,
        Err(e) => {
            log::warn!("Ignoring unreadable config file {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn section(content: &str) -> TmdbSection {
        parse_config_file(content).unwrap().unwrap()
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = resolve(ConfigOverrides::default(), no_env, None).unwrap_err();
        assert!(matches!(err, TmdbError::Config(ref msg) if msg.contains(API_KEY_VAR)));
    }

    #[test]
    fn test_defaults() {
        let config = resolve(
            ConfigOverrides::default(),
            |var| (var == API_KEY_VAR).then(|| "env-key".to_string()),
            None,
        )
        .unwrap();

        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_pages, 1);
    }

    #[test]
    fn test_override_beats_env_beats_file() {
        let file = section(
            r#"
[tmdb]
api_key = "file-key"
base_url = "http://file.example/3"
max_pages = 4
"#,
        );
        let env = |var: &str| match var {
            API_KEY_VAR => Some("env-key".to_string()),
            _ => None,
        };

        let from_env = resolve(ConfigOverrides::default(), env, Some(&file)).unwrap();
        assert_eq!(from_env.api_key, "env-key");
        assert_eq!(from_env.base_url, "http://file.example/3");
        assert_eq!(from_env.max_pages, 4);

        let overrides = ConfigOverrides {
            api_key: Some("cli-key".to_string()),
            base_url: None,
            max_pages: Some(2),
        };
        let from_cli = resolve(overrides, env, Some(&file)).unwrap();
        assert_eq!(from_cli.api_key, "cli-key");
        assert_eq!(from_cli.max_pages, 2);
    }

    #[test]
    fn test_blank_env_key_falls_through() {
        let file = section("[tmdb]\napi_key = \"file-key\"\n");
        let config = resolve(
            ConfigOverrides::default(),
            |_| Some(String::new()),
            Some(&file),
        )
        .unwrap();
        assert_eq!(config.api_key, "file-key");
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let overrides = ConfigOverrides {
            api_key: Some("k".to_string()),
            base_url: None,
            max_pages: Some(0),
        };
        assert!(resolve(overrides, no_env, None).is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let overrides = ConfigOverrides {
            api_key: Some("k".to_string()),
            base_url: Some("http://localhost:9000/3/".to_string()),
            max_pages: None,
        };
        let config = resolve(overrides, no_env, None).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/3");
    }

    #[test]
    fn test_file_without_tmdb_section() {
        assert!(parse_config_file("").unwrap().is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let shown = format!("{:?}", TmdbConfig::new("secret-key"));
        assert!(!shown.contains("secret-key"));
    }
}
