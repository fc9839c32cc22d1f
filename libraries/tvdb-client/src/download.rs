//! Series record download.

use crate::client::TvdbClient;
use crate::error::{Result, TvdbError};
use futures_util::StreamExt;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

impl TvdbClient {
    /// Download the full record of a series into `dest_dir`.
    ///
    /// Writes `<language>.xml` (series plus episodes), `banners.xml` and
    /// `actors.xml`. Each file is streamed to a temporary sibling and renamed
    /// into place, so a failed download never leaves a truncated document
    /// behind. `dest_dir` must already exist.
    pub async fn download_series(
        &self,
        series_id: &str,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let documents = [
            (format!("all/{}.xml", self.language), format!("{}.xml", self.language)),
            ("banners.xml".to_string(), "banners.xml".to_string()),
            ("actors.xml".to_string(), "actors.xml".to_string()),
        ];

        let mut total_bytes = 0u64;
        for (remote, local) in &documents {
            let url = self.series_url(series_id, remote)?;
            total_bytes += self.download_file(url, &dest_dir.join(local), cancel).await?;
        }

        info!(
            series_id = %series_id,
            dest = %dest_dir.display(),
            size = total_bytes,
            "Series record downloaded"
        );

        Ok(())
    }

    fn series_url(&self, series_id: &str, document: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| TvdbError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| TvdbError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", self.api_key.as_str(), "series", series_id])
            .extend(document.split('/'));
        Ok(url)
    }

    async fn download_file(
        &self,
        url: Url,
        dest_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        debug!(url = %url, dest = %dest_path.display(), "Downloading document");

        let _permit = self.pool.acquire(cancel).await?;
        let response = self.send(url, cancel).await?;

        let tmp_path = dest_path.with_extension("xml.part");
        let mut file = File::create(&tmp_path).await?;
        let mut downloaded: u64 = 0;

        let mut stream = response.bytes_stream();
        let streamed: Result<()> = async {
            loop {
                let chunk = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(TvdbError::Cancelled),
                    chunk = stream.next() => chunk,
                };
                let Some(chunk) = chunk else { break };
                let chunk = chunk.map_err(TvdbError::from_request)?;
                file.write_all(&chunk).await?;
                downloaded += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = streamed {
            drop(file);
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e);
        }

        drop(file);
        fs::rename(&tmp_path, dest_path).await?;

        Ok(downloaded)
    }
}
