//! Filesystem Storage Writer Implementation
//!
//! This module implements the `StorageWriter` port on top of two flat
//! directories: one holding uploaded files, one holding processed files.
//! Files are named after their identifier. Both directories must already
//! exist; the writer never creates them.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use filedrop_domain::{
    ingestion::{FileId, StorageError, StoredFile},
    ports::StorageWriter,
};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, debug_span, error, info, warn, Instrument};

use super::sniff::{sniff_mime, SNIFF_LEN};

const COPY_BUF_LEN: usize = 64 * 1024;

/// Filesystem-based implementation of the StorageWriter port
///
/// Concurrent uploads of the same identifier are not coordinated: whichever
/// write finishes last determines the stored content.
#[derive(Debug, Clone)]
pub struct FsStorageWriter {
    uploads_dir: PathBuf,
    processed_dir: PathBuf,
}

impl FsStorageWriter {
    /// Create a new filesystem storage writer
    ///
    /// # Arguments
    ///
    /// * `uploads_dir` - Root receiving uploaded files
    /// * `processed_dir` - Root receiving processed files
    pub fn new(uploads_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        let uploads_dir = uploads_dir.into();
        let processed_dir = processed_dir.into();
        info!(
            uploads = %uploads_dir.display(),
            processed = %processed_dir.display(),
            "Initializing FsStorageWriter"
        );
        Self {
            uploads_dir,
            processed_dir,
        }
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// Where an upload with this identifier is stored
    pub fn upload_path(&self, file_id: &FileId) -> PathBuf {
        self.uploads_dir.join(file_id.as_str())
    }

    /// Where the processed copy for this identifier is created
    pub fn processed_path(&self, file_id: &FileId) -> PathBuf {
        self.processed_dir.join(file_id.as_str())
    }

    /// Roots that do not currently exist as directories
    pub fn missing_roots(&self) -> Vec<&Path> {
        [self.uploads_dir.as_path(), self.processed_dir.as_path()]
            .into_iter()
            .filter(|root| !root.is_dir())
            .collect()
    }
}

/// Copy `reader` into `writer`, keeping the first `SNIFF_LEN` bytes aside
async fn copy_sniffing<R, W>(reader: &mut R, writer: &mut W) -> io::Result<(u64, Vec<u8>)>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; COPY_BUF_LEN];
    let mut head = Vec::with_capacity(SNIFF_LEN);
    let mut written = 0u64;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }

        if head.len() < SNIFF_LEN {
            let take = (SNIFF_LEN - head.len()).min(n);
            head.extend_from_slice(&buf[..take]);
        }

        writer.write_all(&buf[..n]).await?;
        written += n as u64;
    }

    writer.flush().await?;
    Ok((written, head))
}

impl StorageWriter for FsStorageWriter {
    fn store<R>(
        &self,
        file_id: &FileId,
        mut reader: R,
    ) -> impl Future<Output = Result<StoredFile, StorageError>> + Send
    where
        R: AsyncRead + Unpin + Send,
    {
        let path = self.upload_path(file_id);
        let file_id = file_id.clone();
        let span = debug_span!("fs_store", file_id = %file_id);

        async move {
            debug!(path = %path.display(), "Writing upload");

            let mut file = match File::create(&path).await {
                Ok(file) => file,
                Err(source) => {
                    error!(path = %path.display(), error = %source, "Unable to create destination");
                    return Err(StorageError::Create { path, source });
                }
            };

            let copied = match copy_sniffing(&mut reader, &mut file).await {
                Ok(copied) => file.sync_all().await.map(|_| copied),
                Err(err) => Err(err),
            };

            let (size_bytes, head) = match copied {
                Ok(copied) => copied,
                Err(source) => {
                    error!(path = %path.display(), error = %source, "Error copying upload");
                    drop(file);
                    if let Err(err) = fs::remove_file(&path).await {
                        warn!(path = %path.display(), error = %err, "Failed to remove partial upload");
                    }
                    return Err(StorageError::Copy { path, source });
                }
            };

            let mime_type = sniff_mime(&head).to_string();
            info!(
                path = %path.display(),
                size = size_bytes,
                mime = %mime_type,
                "Upload written"
            );

            Ok(StoredFile {
                file_id,
                path,
                size_bytes,
                mime_type,
            })
        }
        .instrument(span)
    }

    fn prepare_output(
        &self,
        stored: &StoredFile,
    ) -> impl Future<Output = Result<PathBuf, StorageError>> + Send {
        let source_path = stored.path.clone();
        let output_path = self.processed_path(&stored.file_id);
        let span = debug_span!("fs_prepare_output", file_id = %stored.file_id);

        async move {
            if let Err(source) = File::open(&source_path).await {
                error!(path = %source_path.display(), error = %source, "Unable to open stored file");
                return Err(StorageError::SourceOpen {
                    path: source_path,
                    source,
                });
            }

            match File::create(&output_path).await {
                Ok(_) => {
                    debug!(path = %output_path.display(), "Processed file created");
                    Ok(output_path)
                }
                Err(source) => {
                    error!(path = %output_path.display(), error = %source, "Unable to create processed file");
                    Err(StorageError::OutputCreate {
                        path: output_path,
                        source,
                    })
                }
            }
        }
        .instrument(span)
    }
}
