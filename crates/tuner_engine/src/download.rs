use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::{JobId, ServiceApi, ServiceError};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedAdapter {
    pub job_id: JobId,
    pub path: PathBuf,
    pub byte_len: u64,
    /// Hex digest of the artifact, logged so a re-download can be compared.
    pub sha256: String,
}

/// Fetches a job's adapter artifact and writes it atomically as
/// `adapter_job_{id}.zip` in `dir`.
pub async fn download_adapter_to(
    api: &dyn ServiceApi,
    job_id: JobId,
    dir: &Path,
) -> Result<DownloadedAdapter, DownloadError> {
    let bytes = api.download_adapter(job_id).await?;
    let filename = format!("adapter_job_{job_id}.zip");
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.write_bytes(&filename, &bytes)?;
    Ok(DownloadedAdapter {
        job_id,
        path,
        byte_len: bytes.len() as u64,
        sha256: hex_digest(&bytes),
    })
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
