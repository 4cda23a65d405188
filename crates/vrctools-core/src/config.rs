//! Application configuration.
//!
//! Configuration comes from the environment (a `.env` file is loaded by the
//! binary before this runs):
//!
//! - `DATA_FILE`: path of the token store, defaults to `./data.json`
//! - `VRCHAT_API_URL`: API base URL, defaults to the public VRChat API

use std::path::PathBuf;

/// Environment variable overriding the token store path
pub const DATA_FILE_ENV: &str = "DATA_FILE";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "VRCHAT_API_URL";

/// Token store path used when `DATA_FILE` is unset or empty
const DEFAULT_DATA_FILE: &str = "./data.json";

/// Base URL for all VRChat API endpoints
const DEFAULT_API_BASE_URL: &str = "https://api.vrchat.cloud/api/1";

/// Application name sent in the User-Agent header
const APP_NAME: &str = "zuedev/vrctools";

/// Contact sent in the User-Agent header
const APP_CONTACT: &str = "https://github.com/zuedev/vrctools";

/// Fixed application identity reported to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub contact: &'static str,
}

impl AppInfo {
    pub const fn current() -> Self {
        Self {
            name: APP_NAME,
            version: env!("CARGO_PKG_VERSION"),
            contact: APP_CONTACT,
        }
    }

    pub fn user_agent(&self) -> String {
        format!("{}/{} {}", self.name, self.version, self.contact)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub api_base_url: String,
    pub app: AppInfo,
}

impl Config {
    /// Load configuration from the process environment
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_file = non_empty(DATA_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let api_base_url = non_empty(API_URL_ENV)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Self {
            data_file,
            api_base_url,
            app: AppInfo::current(),
        }
    }
}
