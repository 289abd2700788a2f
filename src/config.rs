use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub export_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = normalize_base_url(
            &std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.into()),
        );
        anyhow::ensure!(!api_base_url.is_empty(), "API_BASE_URL must not be empty");

        let export_dir = std::env::var("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            api_base_url,
            export_dir,
        })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
