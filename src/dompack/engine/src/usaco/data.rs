//! Test data archives: cache, download and unpacking
use super::Scraper;
use crate::archive::Archive;
use anyhow::Context as _;
use dompack_api::scrape_problems::Update;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Input and answer of the first test become the sample
const SAMPLE_TEST: &str = "1";

impl Scraper {
    async fn validate_cached(&self, path: &Path) -> anyhow::Result<bool> {
        let archive = Arc::clone(&self.archive);
        let path = path.to_path_buf();
        Ok(tokio::task::spawn_blocking(move || archive.validate(&path)).await?)
    }

    async fn download(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        let body = self.fetch.fetch(url).await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        tokio::fs::write(dest, body)
            .await
            .with_context(|| format!("write {}", dest.display()))?;
        let archive = Arc::clone(&self.archive);
        let path = dest.to_path_buf();
        let checked = tokio::task::spawn_blocking(move || archive.check(&path)).await?;
        if let Err(err) = checked {
            tokio::fs::remove_file(dest).await.ok();
            return Err(err.into());
        }
        Ok(())
    }

    /// Makes sure a valid archive for `secondary_id` is in cache.
    ///
    /// Invalid cached archive is removed and fetched again. Download failure is
    /// only logged: the problem using this archive fails later.
    #[tracing::instrument(skip(self))]
    pub async fn download_data(&self, secondary_id: &str) {
        let dest = self.config.archive_path(secondary_id);
        let url = self.config.archive_url(secondary_id);
        if dest.exists() {
            match self.validate_cached(&dest).await {
                Ok(true) => {
                    tracing::debug!(path = %dest.display(), "cached archive is valid");
                    self.tx.send_event(Update::ArchiveCached {
                        path: dest.display().to_string(),
                    });
                    return;
                }
                Ok(false) => {}
                Err(err) => tracing::warn!("failed to validate {}: {:#}", dest.display(), err),
            }
            tracing::info!(path = %dest.display(), "cached archive is invalid, removing");
            self.tx.send_event(Update::ArchiveInvalid {
                path: dest.display().to_string(),
            });
            if let Err(err) = tokio::fs::remove_file(&dest).await {
                tracing::warn!("failed to remove {}: {}", dest.display(), err);
            }
        }
        self.tx.send_event(Update::Downloading { url: url.clone() });
        match self.download(&url, &dest).await {
            Ok(()) => {
                tracing::info!(%url, "downloaded");
                self.tx.send_event(Update::Downloaded { url });
            }
            Err(err) => {
                let message = format!("failed to download {}: {:#}", url, err);
                tracing::warn!("{}", message);
                self.tx.send_event(Update::Warning(message));
            }
        }
    }

    /// Fetches archives of all problems in the index, `workers` at a time
    pub async fn prefetch(&self, secondary_ids: &[String]) {
        use futures_util::stream::StreamExt as _;
        futures_util::stream::iter(secondary_ids)
            .map(|sid| self.download_data(sid))
            .buffer_unordered(self.config.workers.max(1))
            .collect::<Vec<()>>()
            .await;
    }

    /// Unpacks test data of problem into `<problem_root>/data`.
    ///
    /// If `download` is set, cached archive is validated first and fetched
    /// again when missing or invalid.
    #[tracing::instrument(skip(self, problem_root))]
    pub async fn extract_data(
        &self,
        problem_root: &Path,
        secondary_id: &str,
        download: bool,
    ) -> anyhow::Result<()> {
        let archive_path = self.config.archive_path(secondary_id);
        if download {
            self.download_data(secondary_id).await;
            if !archive_path.exists() {
                anyhow::bail!(
                    "test data archive {} could not be downloaded",
                    archive_path.display()
                );
            }
        } else if !archive_path.exists() {
            anyhow::bail!("test data archive {} not found", archive_path.display());
        }
        let archive = Arc::clone(&self.archive);
        let data_dir = problem_root.join("data");
        tracing::info!(from = %archive_path.display(), to = %data_dir.display(), "extracting");
        tokio::task::spawn_blocking(move || unpack(&*archive, &archive_path, &data_dir)).await?
    }
}

/// Extracts into `secret`, renames `*.out` to `*.ans` and moves first test to `sample`
pub(crate) fn unpack(archive: &dyn Archive, path: &Path, data_dir: &Path) -> anyhow::Result<()> {
    let secret = data_dir.join("secret");
    let sample = data_dir.join("sample");
    for dir in [&secret, &sample] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create directory {}", dir.display()))?;
    }
    archive.extract(path, &secret)?;

    let outputs: Vec<PathBuf> = std::fs::read_dir(&secret)
        .with_context(|| format!("read dir {}", secret.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().map_or(false, |ext| ext == "out"))
        .collect();
    for out in outputs {
        let ans = out.with_extension("ans");
        std::fs::rename(&out, &ans)
            .with_context(|| format!("rename {} to {}", out.display(), ans.display()))?;
    }

    for ext in ["in", "ans"] {
        let name = format!("{}.{}", SAMPLE_TEST, ext);
        let from = secret.join(&name);
        let to = sample.join(&name);
        std::fs::rename(&from, &to)
            .with_context(|| format!("move {} to {}", from.display(), to.display()))?;
    }
    Ok(())
}
