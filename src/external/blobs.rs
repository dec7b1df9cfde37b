use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config;
use crate::error::{self, Context};

use super::{BlobUploader, ExternalError};

/// disk backed uploader. files land under <data>/uploads and are referenced
/// as /uploads/<name>
pub struct LocalBlobs {
    directory: PathBuf,
}

impl LocalBlobs {
    pub fn from_config(config: &config::Config) -> error::Result<Self> {
        let directory = config.settings.data.join("uploads");

        match std::fs::metadata(&directory) {
            Ok(meta) => {
                if !meta.is_dir() {
                    return Err(error::Error::new()
                        .message("uploads data directory is not a directory"));
                }
            },
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => {
                    std::fs::create_dir(&directory)
                        .context("failed to create uploads directory")?;
                },
                _ => {
                    return Err(err.into());
                }
            }
        }

        Ok(LocalBlobs { directory })
    }
}

#[async_trait]
impl BlobUploader for LocalBlobs {
    async fn store(&self, basename: &str, bytes: Bytes) -> Result<String, ExternalError> {
        let full = self.directory.join(basename);

        tokio::fs::write(&full, &bytes).await?;

        Ok(format!("/uploads/{basename}"))
    }
}
