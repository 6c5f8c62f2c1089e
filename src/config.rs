//! Settings for the hosted storage service.
//!
//! Settings start from built-in defaults, are overlaid by an optional TOML
//! document, and finally by `TASKBOARD__*` environment variables.

use serde::{Deserialize, Deserializer};
use std::{fs, io, path::Path, time::Duration};
use thiserror::Error;
use url::Url;

const ENV_PREFIX: &str = "TASKBOARD__";
const DEFAULT_STORAGE_URL: &str = "http://localhost:54321/storage/v1/";

/// Errors returned while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// Path of the settings file.
        path: String,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The settings document is not valid TOML for [`Settings`].
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting holds a value that cannot be used.
    #[error("invalid value '{value}' for setting {key}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Storage bucket holding task reference images.
    pub storage_bucket: String,
    /// Path prefix for uploaded task images inside the bucket.
    pub image_prefix: String,
    /// Lifetime of signed image URLs, in seconds.
    pub signed_url_ttl_secs: u64,
    /// Cache-control max-age attached to uploads, in seconds.
    pub upload_cache_control_secs: u64,
    /// Base URL of the storage API, always ending in `/`.
    #[serde(deserialize_with = "deserialize_base_url")]
    pub storage_url: Url,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_bucket: "task-assets".to_owned(),
            image_prefix: "task-images".to_owned(),
            signed_url_ttl_secs: 3600,
            upload_cache_control_secs: 3600,
            storage_url: default_storage_url(),
        }
    }
}

impl Settings {
    /// Parses settings from a TOML document. Missing keys keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed TOML and
    /// [`SettingsError::InvalidValue`] when a value fails validation.
    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the file cannot be read or parsed, or
    /// when an override is invalid.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let base = match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `TASKBOARD__*` overrides resolved through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] when an override cannot be
    /// parsed or the result fails validation.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("STORAGE_BUCKET") {
            self.storage_bucket = value;
        }
        if let Some(value) = var("IMAGE_PREFIX") {
            self.image_prefix = value;
        }
        if let Some(value) = var("SIGNED_URL_TTL_SECS") {
            self.signed_url_ttl_secs = parse_secs("signed_url_ttl_secs", value)?;
        }
        if let Some(value) = var("UPLOAD_CACHE_CONTROL_SECS") {
            self.upload_cache_control_secs = parse_secs("upload_cache_control_secs", value)?;
        }
        if let Some(value) = var("STORAGE_URL") {
            let url = Url::parse(value.trim()).map_err(|_| SettingsError::InvalidValue {
                key: "storage_url",
                value,
            })?;
            self.storage_url = as_base_url(url);
        }

        self.validate()?;
        Ok(self)
    }

    /// Returns the signed URL lifetime.
    #[must_use]
    pub const fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }

    /// Returns the storage base URL.
    #[must_use]
    pub const fn storage_base_url(&self) -> &Url {
        &self.storage_url
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.storage_bucket.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                key: "storage_bucket",
                value: self.storage_bucket.clone(),
            });
        }
        if self.image_prefix.trim_matches('/').is_empty() {
            return Err(SettingsError::InvalidValue {
                key: "image_prefix",
                value: self.image_prefix.clone(),
            });
        }
        if self.signed_url_ttl_secs == 0 {
            return Err(SettingsError::InvalidValue {
                key: "signed_url_ttl_secs",
                value: "0".to_owned(),
            });
        }
        if self.storage_url.cannot_be_a_base() {
            return Err(SettingsError::InvalidValue {
                key: "storage_url",
                value: self.storage_url.to_string(),
            });
        }
        Ok(())
    }
}

/// Returns `url` with a trailing `/` so relative joins extend its last path
/// segment instead of replacing it.
#[must_use]
pub fn as_base_url(mut url: Url) -> Url {
    if !url.cannot_be_a_base() && !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[expect(
    clippy::expect_used,
    reason = "DEFAULT_STORAGE_URL is a literal absolute URL"
)]
fn default_storage_url() -> Url {
    Url::parse(DEFAULT_STORAGE_URL).expect("default storage URL parses")
}

fn deserialize_base_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    Url::deserialize(deserializer).map(as_base_url)
}

fn parse_secs(key: &'static str, value: String) -> Result<u64, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidValue { key, value })
}
