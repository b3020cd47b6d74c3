use std::{io::ErrorKind, path::PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Website {
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access website list: {0}")]
    Io(#[from] std::io::Error),
    #[error("website list is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url is empty")]
    EmptyUrl,
    #[error("url must start with http:// or https://: {0}")]
    InvalidUrl(String),
    #[error("website already exists: {0}")]
    Duplicate(String),
    #[error("no website at index {0}")]
    NotFound(usize),
}

/// Ordered list of source websites persisted as a JSON file.
pub struct WebsiteStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl WebsiteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        WebsiteStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// A missing file reads as an empty list.
    pub async fn list(&self) -> Result<Vec<Website>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn add(&self, url: &str) -> Result<Website, StoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StoreError::EmptyUrl);
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(StoreError::InvalidUrl(url.to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let mut websites = self.list().await?;
        if websites.iter().any(|w| w.url == url) {
            return Err(StoreError::Duplicate(url.to_string()));
        }

        let website = Website {
            url: url.to_string(),
        };
        websites.push(website.clone());
        self.save(&websites).await?;
        log::info!("Added website {}, {} in list", url, websites.len());

        Ok(website)
    }

    pub async fn remove(&self, index: usize) -> Result<Website, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut websites = self.list().await?;
        if index >= websites.len() {
            return Err(StoreError::NotFound(index));
        }

        let removed = websites.remove(index);
        self.save(&websites).await?;
        log::info!("Removed website {}, {} left", removed.url, websites.len());

        Ok(removed)
    }

    /// Writes a sibling temp file and renames it over the list, so readers
    /// never see a half-written file.
    async fn save(&self, websites: &[Website]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(websites)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tmp.into()
    }
}
