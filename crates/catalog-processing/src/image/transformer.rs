use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use super::{encode_resized, ImageError, OutputFormat};

/// Fetch, resize and write one image.
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    /// Fetch `source_url` and write it to `output_path`, resized into
    /// `target_width`x`target_height` and encoded per the path's extension.
    /// An existing file at `output_path` is overwritten.
    async fn transform(
        &self,
        source_url: &str,
        output_path: &Path,
        target_width: u32,
        target_height: u32,
    ) -> Result<(), ImageError>;
}

/// Transformer that fetches source images over HTTP.
///
/// The body is staged to a temporary file beside the output before decoding;
/// the staging file is removed whether the transform succeeds or not.
#[derive(Clone)]
pub struct HttpImageTransformer {
    client: reqwest::Client,
}

impl HttpImageTransformer {
    pub fn new(fetch_timeout: Duration) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| ImageError::Task(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn stage_body(
        &self,
        source_url: &str,
        staging: &tempfile::NamedTempFile,
    ) -> Result<u64, ImageError> {
        let staging_path = staging.path().to_path_buf();
        let write_err = |source| ImageError::Write {
            path: staging_path.clone(),
            source,
        };

        let mut response = self
            .client
            .get(source_url)
            .send()
            .await
            .map_err(|e| ImageError::fetch(source_url, e))?;

        if !response.status().is_success() {
            return Err(ImageError::Status {
                url: source_url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let handle = staging.as_file().try_clone().map_err(write_err)?;
        let mut file = tokio::fs::File::from_std(handle);
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ImageError::fetch(source_url, e))?
        {
            file.write_all(&chunk).await.map_err(write_err)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(write_err)?;

        Ok(written)
    }
}

#[async_trait]
impl ImageTransformer for HttpImageTransformer {
    #[tracing::instrument(skip(self), fields(output = %output_path.display()))]
    async fn transform(
        &self,
        source_url: &str,
        output_path: &Path,
        target_width: u32,
        target_height: u32,
    ) -> Result<(), ImageError> {
        let format = OutputFormat::from_path(output_path)?;

        let staging_dir = match output_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempfile_in(&staging_dir)
            .map_err(|source| ImageError::FileCreate {
                path: staging_dir.clone(),
                source,
            })?;

        let bytes = self.stage_body(source_url, &staging).await?;
        tracing::debug!(url = %source_url, bytes, "Source image staged");

        let staging_path = staging.path().to_path_buf();
        let output = output_path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let data = std::fs::read(&staging_path).map_err(|source| ImageError::Write {
                path: staging_path.clone(),
                source,
            })?;
            let encoded = encode_resized(&data, format, target_width, target_height)?;
            write_output(&output, &encoded)
        })
        .await
        .map_err(|e| ImageError::Task(e.to_string()))??;

        drop(staging);
        Ok(())
    }
}

fn write_output(path: &Path, data: &[u8]) -> Result<(), ImageError> {
    use std::io::Write;

    let mut file = std::fs::File::create(path).map_err(|source| ImageError::FileCreate {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(data).map_err(|source| ImageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
