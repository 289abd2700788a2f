use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

use crate::api::{AnalysisApi, HttpAnalysisApi};
use crate::config::AppConfig;

/// Where downloaded files end up.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn save(&self, file_name: &str, body: Bytes) -> anyhow::Result<PathBuf>;
}

#[derive(Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn save(&self, file_name: &str, body: Bytes) -> anyhow::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: Arc<dyn AnalysisApi>,
    pub downloads: Arc<dyn DownloadSink>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let api = Arc::new(
            HttpAnalysisApi::new(&config.api_base_url).context("build http client")?,
        ) as Arc<dyn AnalysisApi>;
        let downloads = Arc::new(DirectorySink::new(&config.export_dir)) as Arc<dyn DownloadSink>;

        Ok(Self {
            config,
            api,
            downloads,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        api: Arc<dyn AnalysisApi>,
        downloads: Arc<dyn DownloadSink>,
    ) -> Self {
        Self {
            config,
            api,
            downloads,
        }
    }
}
