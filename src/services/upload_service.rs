//! src/services/upload_service.rs
//!
//! UploadService — writes submitted photos to the public upload directory
//! under generated names and hands back their public paths.
//!
//! A request's files are committed all-or-nothing: every file is first
//! written to a hidden temp name, and only once all of them are on disk are
//! they renamed to their final names. On any failure the temps and the
//! finals already renamed for this request are removed.

use bytes::Bytes;
use chrono::Utc;
use rand::Rng;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::{debug, warn};

/// On-disk directory that receives uploaded photos.
pub const UPLOAD_DIR: &str = "public/uploads";

/// URL prefix under which the upload directory is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

const SUFFIX_LEN: usize = 6;
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One file entry taken from the `photos` form field.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename; only its extension is used.
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: Option<impl Into<String>>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.map(Into::into),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no files were provided")]
    NoFiles,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type UploadResult<T> = Result<T, UploadError>;

/// A file written to its temp name and waiting to be renamed.
struct Staged {
    tmp_path: PathBuf,
    final_path: PathBuf,
    public_path: String,
}

#[derive(Clone, Debug)]
pub struct UploadService {
    base_path: PathBuf,
}

impl UploadService {
    /// Create an UploadService that writes beneath `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Persist every non-empty file and return their public paths in
    /// submission order.
    ///
    /// Fails with `NoFiles` before touching the disk when `files` is empty.
    /// Zero-length entries are skipped and not reported.
    pub async fn store_all(&self, files: Vec<UploadedFile>) -> UploadResult<Vec<String>> {
        self.store_all_with(files, |file| generate_stored_name(file.file_name.as_deref()))
            .await
    }

    async fn store_all_with(
        &self,
        files: Vec<UploadedFile>,
        mut name_for: impl FnMut(&UploadedFile) -> String,
    ) -> UploadResult<Vec<String>> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }

        // Concurrent requests may race here; create_dir_all tolerates that.
        fs::create_dir_all(&self.base_path).await?;

        let mut staged: Vec<Staged> = Vec::with_capacity(files.len());
        for file in &files {
            if file.size() == 0 {
                debug!("skipping empty upload {:?}", file.file_name);
                continue;
            }
            match self.stage(file, name_for(file)).await {
                Ok(entry) => staged.push(entry),
                Err(err) => {
                    discard(&staged, 0).await;
                    return Err(UploadError::Io(err));
                }
            }
        }

        for (committed, entry) in staged.iter().enumerate() {
            if let Err(err) = fs::rename(&entry.tmp_path, &entry.final_path).await {
                for done in &staged[..committed] {
                    remove_quietly(&done.final_path).await;
                }
                discard(&staged, committed).await;
                return Err(UploadError::Io(err));
            }
        }

        Ok(staged.into_iter().map(|entry| entry.public_path).collect())
    }

    /// Write one file to `.tmp-{stored_name}` inside the upload directory.
    async fn stage(&self, file: &UploadedFile, stored_name: String) -> io::Result<Staged> {
        let tmp_path = self.base_path.join(format!(".tmp-{}", stored_name));

        if let Err(err) = write_synced(&tmp_path, &file.bytes).await {
            remove_quietly(&tmp_path).await;
            return Err(err);
        }

        Ok(Staged {
            tmp_path,
            final_path: self.base_path.join(&stored_name),
            public_path: format!("{}/{}", PUBLIC_PREFIX, stored_name),
        })
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

/// Remove the temp files of `staged[from..]`.
async fn discard(staged: &[Staged], from: usize) {
    for entry in &staged[from..] {
        remove_quietly(&entry.tmp_path).await;
    }
}

async fn remove_quietly(path: &Path) {
    match fs::remove_file(path).await {
        Ok(_) => debug!("removed {}", path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!("failed to remove {}: {}", path.display(), err),
    }
}

/// Build `{epoch-millis}-{6 base-36 chars}{ext}` for an uploaded file.
pub fn generate_stored_name(original: Option<&str>) -> String {
    let ext = original.map(extension_of).unwrap_or("");
    format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        random_suffix(),
        ext
    )
}

/// Extension of the final path component, dot included.
///
/// Names without a dot, or whose only dot is the first character, have no
/// extension.
pub fn extension_of(file_name: &str) -> &str {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => &base[idx..],
        _ => "",
    }
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
